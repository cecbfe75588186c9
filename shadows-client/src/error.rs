//! Client error types.

use shadows_model::ModelError;
use thiserror::Error;

/// Result type for client operations.
pub type ClientResult<T> = Result<T, ClientError>;

/// Errors that can occur while talking to the backend.
#[derive(Debug, Error)]
pub enum ClientError {
    #[error("invalid configuration: {0}")]
    Config(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("API request failed with status {status}: {body}")]
    Api { status: u16, body: String },

    /// The backend answered, but without the fields the protocol requires.
    #[error("malformed response: {0}")]
    MalformedResponse(String),

    #[error("{collection} record has no id; spawn or pull it first")]
    MissingId { collection: String },

    #[error("{collection} record has no name to look it up by")]
    MissingName { collection: String },

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl From<ModelError> for ClientError {
    fn from(err: ModelError) -> Self {
        match err {
            ModelError::MalformedRecord(msg) => ClientError::MalformedResponse(msg),
            ModelError::Serialization(e) => ClientError::Serialization(e),
        }
    }
}

impl ClientError {
    /// Returns the HTTP status behind this error, if there was one.
    pub fn status(&self) -> Option<u16> {
        match self {
            ClientError::Api { status, .. } => Some(*status),
            ClientError::Http(e) => e.status().map(|s| s.as_u16()),
            _ => None,
        }
    }

    /// Returns true if the backend reported the record as missing.
    pub fn is_not_found(&self) -> bool {
        self.status() == Some(404)
    }
}
