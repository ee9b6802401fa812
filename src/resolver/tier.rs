//! Tier trait plus the cache and fallback tiers.

use std::sync::Arc;

use async_trait::async_trait;

use super::types::{IngredientRecord, ResolutionSource};
use crate::cache::ResolutionCache;
use crate::constants::NEUTRAL_NUTRITION_SCORE;

#[async_trait]
/// One stage of the resolution chain.
///
/// `lookup` receives an already-normalized name and owns its error handling: any
/// failure is reported as `None` so the resolver moves on to the next tier.
pub trait ResolutionTier: Send + Sync {
    /// Source tag attached to records this tier produces.
    fn source(&self) -> ResolutionSource;

    /// Whether the resolver should cache records from this tier.
    fn writes_back(&self) -> bool;

    async fn lookup(&self, name: &str) -> Option<IngredientRecord>;
}

/// Exact-key lookup in the shared [`ResolutionCache`].
pub struct CacheTier {
    cache: Arc<ResolutionCache<IngredientRecord>>,
}

impl CacheTier {
    pub fn new(cache: Arc<ResolutionCache<IngredientRecord>>) -> Self {
        Self { cache }
    }
}

#[async_trait]
impl ResolutionTier for CacheTier {
    fn source(&self) -> ResolutionSource {
        ResolutionSource::Cache
    }

    fn writes_back(&self) -> bool {
        false
    }

    async fn lookup(&self, name: &str) -> Option<IngredientRecord> {
        self.cache
            .get(name)
            .map(|record| record.with_source(ResolutionSource::Cache))
    }
}

/// Builds the last-resort record: neutral score, generic explanation.
pub fn fallback_record(name: &str) -> IngredientRecord {
    IngredientRecord::new(name, ResolutionSource::Fallback)
        .with_score(NEUTRAL_NUTRITION_SCORE)
        .with_explanation(format!(
            "No data available for {name}; scored as a neutral ingredient."
        ))
}

/// Always-succeeding final tier.
#[derive(Debug, Default, Clone, Copy)]
pub struct FallbackTier;

#[async_trait]
impl ResolutionTier for FallbackTier {
    fn source(&self) -> ResolutionSource {
        ResolutionSource::Fallback
    }

    fn writes_back(&self) -> bool {
        true
    }

    async fn lookup(&self, name: &str) -> Option<IngredientRecord> {
        Some(fallback_record(name))
    }
}
