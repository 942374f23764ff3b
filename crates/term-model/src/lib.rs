pub mod code;
pub mod color;
pub mod context;
pub mod entry;
pub mod error;

pub use code::{Coded, CodeIdentifier, find_code};
pub use color::RecommendedColor;
pub use context::{
    AnatomicCodes, AnatomicContext, Category, SegmentationCodes, TerminologyContext, TypeTerm,
};
pub use entry::TerminologyEntry;
pub use error::{ModelError, Result};
