//! Error types for corkboard.

use thiserror::Error;

/// Result type alias using corkboard's Error type.
pub type Result<T> = std::result::Result<T, Error>;

/// Core error type for corkboard operations.
#[derive(Error, Debug)]
pub enum Error {
    /// Record store operation failed
    #[error("Store error: {0}")]
    Store(String),

    /// Resource not found
    #[error("Not found: {0}")]
    NotFound(String),

    /// Record not found
    #[error("Record not found: {0}")]
    RecordNotFound(uuid::Uuid),

    /// External assist collaborator failed (transport or response shape)
    #[error("Assist error: {0}")]
    Assist(String),

    /// Serialization/deserialization error
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Invalid input
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// HTTP/network request failed
    #[error("Request error: {0}")]
    Request(String),

    /// Internal error
    #[error("Internal error: {0}")]
    Internal(String),
}

impl From<serde_json::Error> for Error {
    fn from(e: serde_json::Error) -> Self {
        Error::Serialization(e.to_string())
    }
}

impl From<reqwest::Error> for Error {
    fn from(e: reqwest::Error) -> Self {
        Error::Request(e.to_string())
    }
}
