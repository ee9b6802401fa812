use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Current wall-clock time in unix milliseconds.
#[inline]
pub fn now_millis() -> i64 {
    chrono::Utc::now().timestamp_millis()
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
/// One cached value with its creation time and time-to-live.
pub struct CacheEntry<V> {
    /// Lookup key (a normalized ingredient name).
    pub key: String,
    /// Cached value.
    pub value: V,
    /// Creation time in unix milliseconds.
    pub created_at: i64,
    /// Time-to-live in milliseconds.
    pub ttl_ms: u64,
    #[serde(skip)]
    pub(crate) sequence: u64,
}

impl<V> CacheEntry<V> {
    /// Creates an entry stamped with `created_at`.
    pub fn new(key: impl Into<String>, value: V, ttl: Duration, created_at: i64) -> Self {
        Self {
            key: key.into(),
            value,
            created_at,
            ttl_ms: u64::try_from(ttl.as_millis()).unwrap_or(u64::MAX),
            sequence: 0,
        }
    }

    /// Returns the time-to-live.
    #[inline]
    pub fn ttl(&self) -> Duration {
        Duration::from_millis(self.ttl_ms)
    }

    /// Returns `true` once `now - created_at > ttl`.
    #[inline]
    pub fn is_expired_at(&self, now: i64) -> bool {
        let age = now.saturating_sub(self.created_at);
        age > 0 && age as u64 > self.ttl_ms
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
/// Counters describing cache behaviour since construction.
pub struct CacheStats {
    /// Live entries (expired entries not yet evicted included).
    pub entries: usize,
    /// Lookups that returned a fresh value.
    pub hits: u64,
    /// Lookups that found nothing fresh.
    pub misses: u64,
    /// Entries removed because they expired or the cap was exceeded.
    pub evictions: u64,
}
