//! Context dictionary loading and schema detection.
//!
//! Dictionary files self-describe through a mandatory `@schema` field.
//! The schema URI is matched once at load time against the four accepted
//! URIs and carried thereafter as a [`ContextKind`] tag; no schema string
//! comparison happens after routing.

use std::fmt;
use std::path::Path;

use serde_json::Value;
use tracing::warn;

use term_model::{AnatomicContext, TerminologyContext, TypeTerm};

use crate::error::{ContextError, Result};

/// Accepted `@schema` URIs for terminology (category/type) dictionaries.
/// The first entry is written into documents this crate creates.
pub const TERMINOLOGY_SCHEMAS: &[&str] = &[
    "https://raw.githubusercontent.com/qiicr/dcmqi/master/doc/schemas/segment-context-schema.json#",
    "https://raw.githubusercontent.com/QIICR/dcmqi/master/doc/segment-context-schema.json#",
];

/// Accepted `@schema` URIs for anatomic (region/region-modifier) dictionaries.
pub const ANATOMIC_SCHEMAS: &[&str] = &[
    "https://raw.githubusercontent.com/qiicr/dcmqi/master/doc/schemas/anatomic-context-schema.json#",
    "https://raw.githubusercontent.com/QIICR/dcmqi/master/doc/anatomic-context-schema.json#",
];

/// Which of the two dictionary stores a document belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContextKind {
    Terminology,
    Anatomic,
}

impl fmt::Display for ContextKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ContextKind::Terminology => f.write_str("terminology"),
            ContextKind::Anatomic => f.write_str("anatomic"),
        }
    }
}

/// A fully parsed and validated dictionary document.
#[derive(Debug, Clone)]
pub enum LoadedContext {
    Terminology(TerminologyContext),
    Anatomic(AnatomicContext),
}

impl LoadedContext {
    pub fn name(&self) -> &str {
        match self {
            LoadedContext::Terminology(context) => &context.name,
            LoadedContext::Anatomic(context) => &context.name,
        }
    }

    pub fn kind(&self) -> ContextKind {
        match self {
            LoadedContext::Terminology(_) => ContextKind::Terminology,
            LoadedContext::Anatomic(_) => ContextKind::Anatomic,
        }
    }
}

/// Route a parsed document by its `@schema` field.
pub fn context_kind(document: &Value, path: &Path) -> Result<ContextKind> {
    let schema = document
        .get("@schema")
        .and_then(Value::as_str)
        .ok_or_else(|| ContextError::MissingSchema {
            path: path.to_path_buf(),
        })?;

    if TERMINOLOGY_SCHEMAS.contains(&schema) {
        Ok(ContextKind::Terminology)
    } else if ANATOMIC_SCHEMAS.contains(&schema) {
        Ok(ContextKind::Anatomic)
    } else {
        Err(ContextError::UnknownSchema {
            path: path.to_path_buf(),
            schema: schema.to_string(),
        })
    }
}

/// Parse a dictionary file into a typed, validated document.
///
/// Nothing is registered anywhere on failure; the caller receives either
/// a complete document or an error.
pub fn load_context_file(path: &Path) -> Result<LoadedContext> {
    let contents =
        std::fs::read_to_string(path).map_err(|e| ContextError::io(path, e))?;
    let document: Value =
        serde_json::from_str(&contents).map_err(|e| ContextError::Json {
            path: path.to_path_buf(),
            source: e,
        })?;
    load_context_value(document, path)
}

/// Typed parse of an already-read document; `path` is for error reporting.
pub fn load_context_value(document: Value, path: &Path) -> Result<LoadedContext> {
    let kind = context_kind(&document, path)?;
    match kind {
        ContextKind::Terminology => {
            let context: TerminologyContext =
                serde_json::from_value(document).map_err(|e| ContextError::Json {
                    path: path.to_path_buf(),
                    source: e,
                })?;
            context
                .validate()
                .map_err(|e| ContextError::InvalidDocument {
                    path: path.to_path_buf(),
                    source: e,
                })?;
            for category in context.categories() {
                for type_term in &category.types {
                    warn_on_conflicting_color(type_term, &context.name);
                }
            }
            Ok(LoadedContext::Terminology(context))
        }
        ContextKind::Anatomic => {
            let context: AnatomicContext =
                serde_json::from_value(document).map_err(|e| ContextError::Json {
                    path: path.to_path_buf(),
                    source: e,
                })?;
            context
                .validate()
                .map_err(|e| ContextError::InvalidDocument {
                    path: path.to_path_buf(),
                    source: e,
                })?;
            Ok(LoadedContext::Anatomic(context))
        }
    }
}

fn warn_on_conflicting_color(type_term: &TypeTerm, context_name: &str) {
    if type_term.has_conflicting_color() {
        warn!(
            context = context_name,
            code = %type_term.code,
            "type carries both modifiers and its own color; the color is ignored"
        );
    }
}
