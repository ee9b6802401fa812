use thiserror::Error;

use crate::resilience::ResilienceError;

#[derive(Debug, Error)]
/// The only failure `resolve` surfaces to callers.
pub enum ResolveError {
    #[error("invalid input: {reason}")]
    InvalidInput { reason: String },
}

/// Convenience result type for resolution.
pub type ResolveResult<T> = Result<T, ResolveError>;

#[derive(Debug, Error)]
/// Failures inside the external nutrition tier. Never leave the tier.
pub enum ExternalSourceError {
    /// The request could not be sent or the connection failed.
    #[error("request failed: {0}")]
    Transport(#[from] reqwest::Error),

    /// The service answered with a non-success status.
    #[error("unexpected status {status}")]
    Status { status: u16 },

    /// The body was not the expected JSON shape.
    #[error("malformed response: {reason}")]
    Malformed { reason: String },

    /// The attempt exceeded its timeout.
    #[error(transparent)]
    Resilience(#[from] ResilienceError),
}

impl ExternalSourceError {
    /// Rate limiting and server errors are worth another attempt.
    pub fn is_retryable(&self) -> bool {
        match self {
            ExternalSourceError::Status { status } => *status == 429 || (500..=599).contains(status),
            _ => false,
        }
    }
}
