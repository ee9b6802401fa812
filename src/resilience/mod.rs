//! Retry, timeout and fallback wrappers for fallible async work.
//!
//! Only the external nutrition tier retries; everything else uses these helpers to
//! bound latency or to contain a failure so a scan always completes.

pub mod error;
pub mod fallback;
pub mod retry;
pub mod timeout;


pub use error::{ResilienceError, ResilienceResult};
pub use fallback::{contain_panic, with_fallback};
pub use retry::{RetryPolicy, retry_with_backoff};
pub use timeout::with_timeout;
