//! Error types for the fetch layer

use thiserror::Error;

/// Result type alias for fetch operations
pub type Result<T> = std::result::Result<T, FetchError>;

/// Errors that can occur while talking to the upstream API
#[derive(Error, Debug)]
pub enum FetchError {
    /// Connection failures, timeouts and other transport faults
    #[error("Transport error for {url}: {message}")]
    Transport { url: String, message: String },

    /// The requested resource does not exist (HTTP 404)
    #[error("Resource not found: {url}")]
    NotFound { url: String },

    /// Non-success status that is not worth retrying, or a retryable one
    /// observed on the last attempt
    #[error("Unexpected status {status} for {url}")]
    Status { url: String, status: u16 },

    /// The body could not be decoded into the expected shape
    #[error("Failed to decode response from {url}: {source}")]
    Decode {
        url: String,
        #[source]
        source: serde_json::Error,
    },

    /// Every attempt failed with a retryable error
    #[error("Gave up on {url} after {attempts} attempts: {last}")]
    RetriesExhausted { url: String, attempts: u32, last: Box<FetchError> },

    /// The HTTP client could not be constructed
    #[error("HTTP client error: {0}")]
    Client(String),
}

impl FetchError {
    /// Create a new transport error
    pub fn transport(url: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Transport { url: url.into(), message: message.into() }
    }

    /// Create a new not found error
    pub fn not_found(url: impl Into<String>) -> Self {
        Self::NotFound { url: url.into() }
    }

    /// Create a new status error
    pub fn status(url: impl Into<String>, status: u16) -> Self {
        Self::Status { url: url.into(), status }
    }

    /// Whether another attempt could plausibly succeed.
    ///
    /// Transport faults, rate limiting (429) and server errors (5xx) are
    /// retried. A 404 or any other client error is permanent.
    pub fn is_retryable(&self) -> bool {
        match self {
            Self::Transport { .. } => true,
            Self::Status { status, .. } => *status == 429 || (500..600).contains(status),
            _ => false,
        }
    }

    /// Whether a failed per-record fetch should be read as "no data".
    pub fn is_soft_missing(&self) -> bool {
        matches!(self, Self::NotFound { .. } | Self::Status { .. } | Self::RetriesExhausted { .. })
    }
}
