use std::time::Duration;

use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
/// Errors produced by the resilience wrappers themselves.
pub enum ResilienceError {
    /// The wrapped future did not finish in time.
    #[error("{label} timed out after {after:?}")]
    TimedOut {
        /// Name of the guarded operation.
        label: String,
        /// Budget that was exceeded.
        after: Duration,
    },

    /// The wrapped future panicked.
    #[error("{label} panicked")]
    Panicked {
        /// Name of the guarded operation.
        label: String,
    },
}

/// Convenience result type for resilience helpers.
pub type ResilienceResult<T> = Result<T, ResilienceError>;
