use std::fmt::Display;
use std::future::Future;
use std::panic::AssertUnwindSafe;

use futures_util::FutureExt;
use tracing::warn;

use super::error::{ResilienceError, ResilienceResult};

/// Awaits `fut`; on error logs it and returns `fallback()` instead.
pub async fn with_fallback<T, E, Fut, D>(label: &str, fut: Fut, fallback: D) -> T
where
    Fut: Future<Output = Result<T, E>>,
    E: Display,
    D: FnOnce() -> T,
{
    match fut.await {
        Ok(value) => value,
        Err(err) => {
            warn!(label, error = %err, "Operation failed, using fallback");
            fallback()
        }
    }
}

/// Awaits `fut`, converting a panic inside it into [`ResilienceError::Panicked`].
pub async fn contain_panic<F>(label: &str, fut: F) -> ResilienceResult<F::Output>
where
    F: Future,
{
    AssertUnwindSafe(fut)
        .catch_unwind()
        .await
        .map_err(|_| ResilienceError::Panicked {
            label: label.to_string(),
        })
}
