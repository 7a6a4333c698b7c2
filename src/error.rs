//! Error types for network queries and settings

use reqwest::StatusCode;
use thiserror::Error;

/// Fault captured by a network query
#[derive(Debug, Error)]
pub enum QueryError {
    /// The URL could not be parsed
    #[error("invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    /// The request did not complete within the configured timeout
    #[error("the request timed out after {timeout_ms} ms")]
    Timeout { timeout_ms: u64 },

    /// The caller cancelled the request
    #[error("the request was cancelled")]
    Cancelled,

    /// The client was disposed before or during the request
    #[error("the network client has been disposed")]
    Disposed,

    /// The server answered with a non-success status
    #[error("unexpected HTTP status {0}")]
    Status(StatusCode),

    /// Connection, DNS, TLS or body read failure
    #[error("{0}")]
    Transport(#[source] reqwest::Error),

    /// The underlying HTTP client could not be built
    #[error("failed to build HTTP client: {0}")]
    Build(#[source] reqwest::Error),

    /// Invalid settings
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// Percent-decoding produced invalid UTF-8
    #[error("failed to decode escaped text: {0}")]
    Decode(String),
}

impl QueryError {
    /// True for faults raised by the client-level timeout
    pub fn is_timeout(&self) -> bool {
        matches!(self, QueryError::Timeout { .. })
    }

    /// True when the caller's cancellation token fired
    pub fn is_cancelled(&self) -> bool {
        matches!(self, QueryError::Cancelled)
    }
}

/// Settings loading and validation errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read settings file: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to parse settings file: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("network timeout must be greater than zero")]
    InvalidTimeout,

    #[error("invalid user agent {0:?}")]
    InvalidUserAgent(String),
}

/// Result alias for query operations
pub type Result<T> = std::result::Result<T, QueryError>;
