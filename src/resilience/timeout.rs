use std::future::Future;
use std::time::Duration;

use super::error::{ResilienceError, ResilienceResult};

/// Races `fut` against a timer; the loser is dropped.
pub async fn with_timeout<F>(after: Duration, label: &str, fut: F) -> ResilienceResult<F::Output>
where
    F: Future,
{
    tokio::time::timeout(after, fut)
        .await
        .map_err(|_| ResilienceError::TimedOut {
            label: label.to_string(),
            after,
        })
}
