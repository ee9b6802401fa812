//! Tiered ingredient resolution.
//!
//! A name is normalized, then offered to each tier in order until one returns a
//! record: cache → curated table → external database → heuristic classifier →
//! fallback. Tier failures (errors, timeouts, panics) count as misses; the only error
//! callers ever see is [`ResolveError::InvalidInput`] for a blank name.
//!
//! Records from the external, heuristic and fallback tiers are written to the shared
//! cache. When a mirror is configured, the cache is copied to durable storage once per
//! `resolve` or `resolve_all` call on a best-effort basis. Mirror writes run on the
//! blocking pool, one at a time, so an older snapshot never replaces a newer one.

pub mod curated;
pub mod error;
pub mod external;
pub mod heuristic;
#[cfg(any(test, feature = "mock"))]
pub mod mock;
pub mod tier;
pub mod types;


use std::collections::HashMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use futures_util::future::join_all;
use tokio::sync::Mutex;
use tracing::{debug, info, instrument, warn};

pub use curated::{CuratedTier, curated_record};
pub use error::{ExternalSourceError, ResolveError, ResolveResult};
pub use external::{
    DEFAULT_NUTRITION_DB_URL, ExternalTier, NutritionSource, OpenFoodFactsClient, ProductSummary,
};
pub use heuristic::{HeuristicTier, heuristic_record};
#[cfg(any(test, feature = "mock"))]
pub use mock::{MockNutritionSource, MockResponse};
pub use tier::{CacheTier, FallbackTier, ResolutionTier, fallback_record};
pub use types::{IngredientRecord, ResolutionSource, normalize_name};

use crate::cache::{CacheMirror, ResolutionCache};
use crate::constants::DEFAULT_EXTERNAL_TIMEOUT;
use crate::resilience::{RetryPolicy, contain_panic, with_fallback};

/// Name used for records produced from blank batch entries.
const UNKNOWN_INGREDIENT: &str = "unknown ingredient";

/// Orchestrates the tier chain over a shared cache.
pub struct TieredIngredientResolver {
    tiers: Vec<Box<dyn ResolutionTier>>,
    cache: Arc<ResolutionCache<IngredientRecord>>,
    cache_ttl: Duration,
    mirror: Option<MirrorSync>,
}

/// Mirror handle plus the state that keeps its writes ordered.
struct MirrorSync {
    mirror: Arc<dyn CacheMirror<IngredientRecord>>,
    /// Set on every cache write not yet reflected in the mirror.
    dirty: Arc<AtomicBool>,
    /// Held from snapshot until the file is replaced.
    write_lock: Arc<Mutex<()>>,
}

impl MirrorSync {
    fn new(mirror: Arc<dyn CacheMirror<IngredientRecord>>) -> Self {
        Self {
            mirror,
            dirty: Arc::new(AtomicBool::new(false)),
            write_lock: Arc::new(Mutex::new(())),
        }
    }
}

impl std::fmt::Debug for TieredIngredientResolver {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let tiers: Vec<&'static str> = self.tiers.iter().map(|t| t.source().as_str()).collect();
        f.debug_struct("TieredIngredientResolver")
            .field("tiers", &tiers)
            .field("cache", &self.cache)
            .field("cache_ttl", &self.cache_ttl)
            .field("mirror", &self.mirror.is_some())
            .finish()
    }
}

impl TieredIngredientResolver {
    /// Starts a builder around `cache`.
    pub fn builder(cache: Arc<ResolutionCache<IngredientRecord>>) -> ResolverBuilder {
        ResolverBuilder::new(cache)
    }

    /// Creates a resolver from an explicit tier list (no implicit fallback tier).
    pub fn with_tiers(
        cache: Arc<ResolutionCache<IngredientRecord>>,
        tiers: Vec<Box<dyn ResolutionTier>>,
    ) -> Self {
        Self {
            tiers,
            cache_ttl: cache.default_ttl(),
            cache,
            mirror: None,
        }
    }

    /// Returns the shared cache.
    pub fn cache(&self) -> &Arc<ResolutionCache<IngredientRecord>> {
        &self.cache
    }

    /// Source tags of the configured tiers, in order.
    pub fn tier_sources(&self) -> Vec<ResolutionSource> {
        self.tiers.iter().map(|t| t.source()).collect()
    }

    /// Resolves one ingredient name to a record.
    pub async fn resolve(&self, name: &str) -> ResolveResult<IngredientRecord> {
        let record = self.resolve_tiers(name).await?;
        self.flush_mirror(false).await;
        Ok(record)
    }

    #[instrument(name = "resolve", skip(self), fields(normalized = tracing::field::Empty))]
    async fn resolve_tiers(&self, name: &str) -> ResolveResult<IngredientRecord> {
        let normalized = normalize_name(name);
        if normalized.is_empty() {
            return Err(ResolveError::InvalidInput {
                reason: "ingredient name is empty".to_string(),
            });
        }
        tracing::Span::current().record("normalized", normalized.as_str());

        for tier in &self.tiers {
            let source = tier.source();
            match contain_panic(source.as_str(), tier.lookup(&normalized)).await {
                Ok(Some(record)) => {
                    debug!(tier = %source, "Tier hit");
                    if tier.writes_back() {
                        self.remember(&normalized, &record);
                    }
                    return Ok(record);
                }
                Ok(None) => debug!(tier = %source, "Tier miss"),
                Err(e) => warn!(tier = %source, error = %e, "Tier failed, advancing"),
            }
        }

        debug!("All tiers missed, using fallback record");
        let record = fallback_record(&normalized);
        self.remember(&normalized, &record);
        Ok(record)
    }

    /// Resolves a batch, returning exactly one record per input name in input order.
    ///
    /// Distinct names are resolved concurrently; duplicates share one resolution.
    /// Blank names yield a fallback record instead of an error.
    #[instrument(skip(self, names), fields(count = names.len()))]
    pub async fn resolve_all(&self, names: &[String]) -> Vec<IngredientRecord> {
        let normalized: Vec<String> = names.iter().map(|n| normalize_name(n)).collect();

        let mut distinct: Vec<&str> = Vec::new();
        for name in &normalized {
            if !name.is_empty() && !distinct.contains(&name.as_str()) {
                distinct.push(name);
            }
        }

        let resolved = join_all(distinct.iter().map(|name| async move {
            let resolved = with_fallback("resolve", self.resolve_tiers(name), || fallback_record(name));
            let record = contain_panic("resolve", resolved)
                .await
                .unwrap_or_else(|e| {
                    warn!(name, error = %e, "Resolution panicked, using fallback");
                    fallback_record(name)
                });
            (name.to_string(), record)
        }))
        .await;

        let by_name: HashMap<String, IngredientRecord> = resolved.into_iter().collect();
        info!(distinct = by_name.len(), "Resolved ingredient batch");
        self.flush_mirror(false).await;

        normalized
            .iter()
            .map(|name| match by_name.get(name) {
                Some(record) => record.clone(),
                None => fallback_record(UNKNOWN_INGREDIENT),
            })
            .collect()
    }

    fn remember(&self, key: &str, record: &IngredientRecord) {
        self.cache.set(key, record.clone(), self.cache_ttl);
        if let Some(sync) = &self.mirror {
            sync.dirty.store(true, Ordering::Release);
        }
    }

    /// Writes the cache to the mirror if it changed since the last write, or always
    /// when `force` is set.
    async fn flush_mirror(&self, force: bool) {
        let Some(sync) = &self.mirror else {
            return;
        };

        // The guard moves into the blocking task, so a dropped caller cannot let a
        // newer write start before this one lands.
        let guard = Arc::clone(&sync.write_lock).lock_owned().await;
        if !sync.dirty.swap(false, Ordering::AcqRel) && !force {
            return;
        }
        let entries = self.cache.snapshot();
        let mirror = Arc::clone(&sync.mirror);
        let dirty = Arc::clone(&sync.dirty);

        let written = tokio::task::spawn_blocking(move || {
            let _guard = guard;
            let result = mirror.persist(&entries);
            if result.is_err() {
                dirty.store(true, Ordering::Release);
            }
            result.map(|()| entries.len())
        })
        .await;

        match written {
            Ok(Ok(count)) => debug!(count, "Mirrored resolution cache"),
            Ok(Err(e)) => warn!(error = %e, "Failed to mirror resolution cache"),
            Err(e) => warn!(error = %e, "Mirror write task failed"),
        }
    }

    /// Loads the mirrored snapshot into the cache. Failures are logged and ignored.
    pub fn hydrate(&self) -> usize {
        let Some(sync) = &self.mirror else {
            return 0;
        };
        match sync.mirror.load() {
            Ok(entries) => {
                let restored = self.cache.restore(entries);
                info!(restored, "Hydrated resolution cache");
                restored
            }
            Err(e) => {
                warn!(error = %e, "Failed to load cache snapshot, starting empty");
                0
            }
        }
    }

    /// Writes the current cache contents to the mirror. Failures are logged and ignored.
    pub async fn dehydrate(&self) {
        self.flush_mirror(true).await;
    }
}

/// Builder for the standard tier chain.
pub struct ResolverBuilder {
    cache: Arc<ResolutionCache<IngredientRecord>>,
    cache_ttl: Duration,
    external: Option<Arc<dyn NutritionSource>>,
    retry_policy: RetryPolicy,
    external_timeout: Duration,
    heuristic: bool,
    mirror: Option<Arc<dyn CacheMirror<IngredientRecord>>>,
}

impl ResolverBuilder {
    fn new(cache: Arc<ResolutionCache<IngredientRecord>>) -> Self {
        Self {
            cache_ttl: cache.default_ttl(),
            cache,
            external: None,
            retry_policy: RetryPolicy::default(),
            external_timeout: DEFAULT_EXTERNAL_TIMEOUT,
            heuristic: true,
            mirror: None,
        }
    }

    /// TTL applied to records written back by the resolver.
    pub fn cache_ttl(mut self, ttl: Duration) -> Self {
        self.cache_ttl = ttl;
        self
    }

    /// Enables the external tier backed by `source`.
    pub fn external(mut self, source: Arc<dyn NutritionSource>) -> Self {
        self.external = Some(source);
        self
    }

    pub fn retry_policy(mut self, policy: RetryPolicy) -> Self {
        self.retry_policy = policy;
        self
    }

    /// Per-attempt timeout for the external tier.
    pub fn external_timeout(mut self, timeout: Duration) -> Self {
        self.external_timeout = timeout;
        self
    }

    /// Enables or disables the heuristic tier.
    pub fn heuristic(mut self, enabled: bool) -> Self {
        self.heuristic = enabled;
        self
    }

    /// Mirrors cache writes to `mirror`.
    pub fn mirror(mut self, mirror: Arc<dyn CacheMirror<IngredientRecord>>) -> Self {
        self.mirror = Some(mirror);
        self
    }

    pub fn build(self) -> TieredIngredientResolver {
        let mut tiers: Vec<Box<dyn ResolutionTier>> = vec![
            Box::new(CacheTier::new(Arc::clone(&self.cache))),
            Box::new(CuratedTier),
        ];
        if let Some(source) = self.external {
            tiers.push(Box::new(
                ExternalTier::new(source)
                    .with_policy(self.retry_policy)
                    .with_timeout(self.external_timeout),
            ));
        }
        if self.heuristic {
            tiers.push(Box::new(HeuristicTier));
        }
        tiers.push(Box::new(FallbackTier));

        TieredIngredientResolver {
            tiers,
            cache: self.cache,
            cache_ttl: self.cache_ttl,
            mirror: self.mirror.map(MirrorSync::new),
        }
    }
}
