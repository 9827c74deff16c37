//! Error types for the destination testkit
//!
//! This module defines the error taxonomy shared by the config helpers,
//! the cloud lifecycle helpers and the record dumpers.

use thiserror::Error;

/// Error type for testkit operations
///
/// Payloads are plain strings so errors stay `Clone` and can be carried
/// into teardown outcomes and test assertions.
#[derive(Debug, Clone, Error)]
pub enum TestkitError {
    /// Invalid configuration error
    ///
    /// Occurs when a config document cannot be parsed or is missing
    /// required fields.
    #[error("Configuration error: {0}")]
    ConfigurationError(String),

    /// A protocol message could not be parsed or serialized
    #[error("Message error: {0}")]
    MessageError(String),

    /// I/O failure while reading or writing a local file
    #[error("I/O error: {0}")]
    IoError(String),

    /// Authentication failure error
    ///
    /// Occurs when the cloud API rejects the supplied credentials.
    #[error("Authentication error: {0}")]
    AuthenticationError(String),

    /// Token refresh failure
    #[error("Token refresh error: {0}")]
    TokenRefreshError(String),

    /// Network/connection error
    #[error("Connection error: {0}")]
    ConnectionError(String),

    /// The resource being created already exists
    #[error("Already exists: {0}")]
    AlreadyExists(String),

    /// The requested resource does not exist
    #[error("Not found: {0}")]
    NotFound(String),

    /// Any other non-success response from a cloud API
    #[error("API error (status {status}): {message}")]
    ApiError { status: u16, message: String },

    /// Object store failure (listing or deleting staged objects)
    #[error("Storage error: {0}")]
    StorageError(String),

    /// The capability is intentionally unsupported for this destination
    #[error("Not applicable: {0}")]
    NotApplicable(String),
}

impl TestkitError {
    /// Check if the error reports a create conflict
    pub fn is_already_exists(&self) -> bool {
        matches!(self, TestkitError::AlreadyExists(_))
    }

    /// Check if the error reports a missing resource
    pub fn is_not_found(&self) -> bool {
        matches!(self, TestkitError::NotFound(_))
    }
}

impl From<object_store::Error> for TestkitError {
    fn from(err: object_store::Error) -> Self {
        match err {
            object_store::Error::NotFound { path, .. } => TestkitError::NotFound(path),
            other => TestkitError::StorageError(other.to_string()),
        }
    }
}

impl From<reqwest::Error> for TestkitError {
    fn from(err: reqwest::Error) -> Self {
        TestkitError::ConnectionError(err.to_string())
    }
}
