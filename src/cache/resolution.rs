//! Bounded TTL cache for resolved ingredient records.
//!
//! Expired entries are treated as absent on read and removed opportunistically: on the
//! read that finds them, or when an insert pushes the cache past its cap. Capacity
//! enforcement drops expired entries first, then the oldest by creation time.

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use parking_lot::RwLock;
use tracing::debug;

use super::types::{CacheEntry, CacheStats, now_millis};
use crate::constants::{DEFAULT_CACHE_MAX_ENTRIES, DEFAULT_CACHE_TTL};

/// Concurrent key → value store with per-entry TTL and a hard entry cap.
pub struct ResolutionCache<V> {
    entries: RwLock<HashMap<String, CacheEntry<V>>>,
    max_entries: usize,
    default_ttl: Duration,
    sequence: AtomicU64,
    hits: AtomicU64,
    misses: AtomicU64,
    evictions: AtomicU64,
}

impl<V: Clone> ResolutionCache<V> {
    /// Creates a cache with the default cap and TTL.
    pub fn new() -> Self {
        Self::with_limits(DEFAULT_CACHE_MAX_ENTRIES, DEFAULT_CACHE_TTL)
    }

    /// Creates a cache holding at most `max_entries` (minimum 1).
    pub fn with_limits(max_entries: usize, default_ttl: Duration) -> Self {
        Self {
            entries: RwLock::new(HashMap::new()),
            max_entries: max_entries.max(1),
            default_ttl,
            sequence: AtomicU64::new(0),
            hits: AtomicU64::new(0),
            misses: AtomicU64::new(0),
            evictions: AtomicU64::new(0),
        }
    }

    /// Returns the configured entry cap.
    #[inline]
    pub fn max_entries(&self) -> usize {
        self.max_entries
    }

    /// Returns the TTL used by [`insert`](Self::insert).
    #[inline]
    pub fn default_ttl(&self) -> Duration {
        self.default_ttl
    }

    /// Returns a fresh value for `key`, evicting it if it has expired.
    pub fn get(&self, key: &str) -> Option<V> {
        let now = now_millis();
        {
            let entries = self.entries.read();
            match entries.get(key) {
                Some(entry) if !entry.is_expired_at(now) => {
                    self.hits.fetch_add(1, Ordering::Relaxed);
                    return Some(entry.value.clone());
                }
                Some(_) => {}
                None => {
                    self.misses.fetch_add(1, Ordering::Relaxed);
                    return None;
                }
            }
        }

        let mut entries = self.entries.write();
        if entries.get(key).is_some_and(|e| e.is_expired_at(now)) {
            entries.remove(key);
            self.evictions.fetch_add(1, Ordering::Relaxed);
            debug!(key, "Evicted expired cache entry on read");
        }
        self.misses.fetch_add(1, Ordering::Relaxed);
        None
    }

    /// Stores `value` under `key` with the default TTL.
    pub fn insert(&self, key: impl Into<String>, value: V) {
        self.set(key, value, self.default_ttl);
    }

    /// Stores `value` under `key`, replacing any previous entry.
    pub fn set(&self, key: impl Into<String>, value: V, ttl: Duration) {
        self.set_with_timestamp(key, value, ttl, now_millis());
    }

    /// Stores an entry with an explicit creation time (unix millis).
    pub fn set_with_timestamp(
        &self,
        key: impl Into<String>,
        value: V,
        ttl: Duration,
        created_at: i64,
    ) {
        let mut entry = CacheEntry::new(key, value, ttl, created_at);
        entry.sequence = self.sequence.fetch_add(1, Ordering::Relaxed);

        let mut entries = self.entries.write();
        entries.insert(entry.key.clone(), entry);
        if entries.len() > self.max_entries {
            self.enforce_capacity(&mut entries, now_millis());
        }
    }

    fn enforce_capacity(&self, entries: &mut HashMap<String, CacheEntry<V>>, now: i64) {
        let before = entries.len();
        entries.retain(|_, e| !e.is_expired_at(now));

        if entries.len() > self.max_entries {
            let mut by_age: Vec<(i64, u64, String)> = entries
                .values()
                .map(|e| (e.created_at, e.sequence, e.key.clone()))
                .collect();
            by_age.sort_unstable();

            let excess = entries.len() - self.max_entries;
            for (_, _, key) in by_age.into_iter().take(excess) {
                entries.remove(&key);
            }
        }

        let evicted = (before - entries.len()) as u64;
        if evicted > 0 {
            self.evictions.fetch_add(evicted, Ordering::Relaxed);
            debug!(evicted, remaining = entries.len(), "Cache over capacity, evicted entries");
        }
    }

    /// Removes `key`, returning its value even if it had expired.
    pub fn remove(&self, key: &str) -> Option<V> {
        self.entries.write().remove(key).map(|e| e.value)
    }

    /// Removes every entry.
    pub fn clear(&self) {
        self.entries.write().clear();
    }

    /// Drops all expired entries and returns how many were removed.
    pub fn purge_expired(&self) -> usize {
        let now = now_millis();
        let mut entries = self.entries.write();
        let before = entries.len();
        entries.retain(|_, e| !e.is_expired_at(now));
        let removed = before - entries.len();
        self.evictions.fetch_add(removed as u64, Ordering::Relaxed);
        removed
    }

    /// Number of stored entries, including expired ones not yet evicted.
    #[inline]
    pub fn len(&self) -> usize {
        self.entries.read().len()
    }

    /// Returns `true` if nothing is stored.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.entries.read().is_empty()
    }

    /// Fresh entries ordered oldest first.
    pub fn snapshot(&self) -> Vec<CacheEntry<V>> {
        let now = now_millis();
        let mut live: Vec<CacheEntry<V>> = self
            .entries
            .read()
            .values()
            .filter(|e| !e.is_expired_at(now))
            .cloned()
            .collect();
        live.sort_by_key(|e| (e.created_at, e.sequence));
        live
    }

    /// Loads previously snapshotted entries, keeping their creation times.
    ///
    /// Expired entries are skipped. Returns the number of entries restored.
    pub fn restore(&self, mut restored: Vec<CacheEntry<V>>) -> usize {
        let now = now_millis();
        restored.retain(|e| !e.is_expired_at(now));
        restored.sort_by_key(|e| e.created_at);

        let count = restored.len();
        for entry in restored {
            let ttl = entry.ttl();
            self.set_with_timestamp(entry.key, entry.value, ttl, entry.created_at);
        }
        count
    }

    /// Returns hit/miss/eviction counters.
    pub fn stats(&self) -> CacheStats {
        CacheStats {
            entries: self.len(),
            hits: self.hits.load(Ordering::Relaxed),
            misses: self.misses.load(Ordering::Relaxed),
            evictions: self.evictions.load(Ordering::Relaxed),
        }
    }
}

impl<V: Clone> Default for ResolutionCache<V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<V> std::fmt::Debug for ResolutionCache<V> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ResolutionCache")
            .field("entries", &self.entries.read().len())
            .field("max_entries", &self.max_entries)
            .field("default_ttl", &self.default_ttl)
            .finish()
    }
}
