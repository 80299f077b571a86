use std::time::Duration;
use thiserror::Error;

/// Failure of a single call to a remote provider.
///
/// Every variant is per-request; none of them is fatal to the process.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ProviderError {
    #[error("Request timed out after {0:?}")]
    Timeout(Duration),

    #[error("HTTP error {status}: {message}")]
    Http { status: u16, message: String },

    #[error("Transport error: {0}")]
    Transport(String),

    #[error("Malformed response: {0}")]
    MalformedResponse(String),

    #[error("Response length mismatch: expected {expected} items, got {actual}")]
    LengthMismatch { expected: usize, actual: usize },

    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    #[error("Configuration error: {0}")]
    Configuration(String),
}

pub type ProviderResult<T> = Result<T, ProviderError>;

impl ProviderError {
    /// Map a reqwest failure, keeping timeouts distinguishable
    pub fn from_reqwest(error: reqwest::Error, timeout: Duration) -> Self {
        if error.is_timeout() {
            ProviderError::Timeout(timeout)
        } else if error.is_decode() {
            ProviderError::MalformedResponse(error.to_string())
        } else if let Some(status) = error.status() {
            ProviderError::Http {
                status: status.as_u16(),
                message: error.to_string(),
            }
        } else {
            ProviderError::Transport(error.to_string())
        }
    }

    pub fn is_timeout(&self) -> bool {
        matches!(self, ProviderError::Timeout(_))
    }
}
