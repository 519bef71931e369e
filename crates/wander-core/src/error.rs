//! Error types for wander-core

use std::time::Duration;

use thiserror::Error;

/// Result type alias using wander-core's Error
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur in wander-core operations
///
/// Errors are cloneable so the list synchronizer can keep the last failure
/// around for display after it has been surfaced to the caller.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Error {
    /// Connectivity failure (DNS, refused connection, broken body)
    #[error("Network error: {0}")]
    Network(String),

    /// Request exceeded the configured timeout ceiling
    #[error("Request timed out after {}s", .0.as_secs_f32())]
    Timeout(Duration),

    /// Non-success HTTP status, `status: false` envelope, or shape mismatch
    #[error("Server error: {0}")]
    Server(String),

    /// Malformed query or request (unknown sort key, out-of-range rating, ...)
    #[error("Invalid input: {0}")]
    Validation(String),

    /// Invalid client configuration
    #[error("Configuration error: {0}")]
    Config(String),
}

impl Error {
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }

    pub fn server(message: impl Into<String>) -> Self {
        Self::Server(message.into())
    }

    /// Whether this failure belongs to the network family (connectivity or timeout).
    #[must_use]
    pub const fn is_network(&self) -> bool {
        matches!(self, Self::Network(_) | Self::Timeout(_))
    }
}
