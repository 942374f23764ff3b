//! CLI library components for the terminology dictionary engine.

pub mod logging;
