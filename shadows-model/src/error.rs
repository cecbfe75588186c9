//! Error types for the entity model.

use thiserror::Error;

/// Result type for model operations.
pub type ModelResult<T> = Result<T, ModelError>;

/// Errors raised while interpreting backend records.
#[derive(Debug, Error)]
pub enum ModelError {
    /// A record is missing `id`, `attributes`, or has them in the wrong shape.
    #[error("malformed record: {0}")]
    MalformedRecord(String),

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}
