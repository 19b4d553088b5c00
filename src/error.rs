//! Error types for service-support utilities.

use thiserror::Error;

#[cfg(feature = "config")]
use crate::config::ConfigError;

/// Result type for svckit operations.
pub type Result<T> = std::result::Result<T, SvckitError>;

/// Errors that can occur in svckit operations.
#[derive(Debug, Error)]
pub enum SvckitError {
    /// Configuration schema error.
    #[cfg(feature = "config")]
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// HTTP error.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Database error.
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Serialization/deserialization error.
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Logging setup error.
    #[error("Logging error: {0}")]
    Logging(String),

    /// Client error.
    #[error("Client error: {0}")]
    Client(String),
}

impl From<serde_json::Error> for SvckitError {
    fn from(err: serde_json::Error) -> Self {
        SvckitError::Serialization(err.to_string())
    }
}
