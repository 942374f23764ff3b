use std::path::PathBuf;

use term_model::ModelError;

#[derive(Debug, thiserror::Error)]
pub enum ContextError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse JSON {path}: {source}")]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("{path} has no @schema field")]
    MissingSchema { path: PathBuf },

    #[error("{path} has unrecognized @schema \"{schema}\"")]
    UnknownSchema { path: PathBuf, schema: String },

    #[error("invalid document {path}: {source}")]
    InvalidDocument {
        path: PathBuf,
        #[source]
        source: ModelError,
    },

    #[error("context {name} is not loaded")]
    ContextNotFound { name: String },

    #[error("no {what} matching {code} in {scope}")]
    CodeNotFound {
        what: &'static str,
        code: String,
        scope: String,
    },

    #[error("invalid serialized entry: {message}")]
    InvalidSerialization { message: String },

    #[error("descriptor contained no usable segment attributes")]
    EmptyDescriptor,

    #[error(transparent)]
    Model(#[from] ModelError),
}

impl ContextError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}

pub type Result<T> = std::result::Result<T, ContextError>;
