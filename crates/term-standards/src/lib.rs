#![deny(unsafe_code)]

pub mod descriptor;
pub mod error;
pub mod label;
pub mod loader;
pub mod serializer;
pub mod store;

pub use crate::descriptor::{MergeSummary, SegmentDescriptor, merge_descriptor, merge_descriptor_file};
pub use crate::error::{ContextError, Result};
pub use crate::label::entry_from_slicer_label;
pub use crate::loader::{ContextKind, LoadedContext, load_context_file};
pub use crate::serializer::{
    code_meanings, deserialize_entry, entry_from_code_meanings, serialize_entry,
};
pub use crate::store::{ContextStore, default_dictionaries_root};
