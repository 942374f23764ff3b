use thiserror::Error;

#[derive(Debug, Error)]
pub enum ModelError {
    #[error("{node}: empty {field}")]
    EmptyField { node: String, field: &'static str },
    #[error("index {index} out of range for {count} entries")]
    IndexOutOfRange { index: usize, count: usize },
}

pub type Result<T> = std::result::Result<T, ModelError>;
