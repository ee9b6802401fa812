//! Labelscore library crate (used by the server and integration tests).
//!
//! # Public API Surface
//!
//! - [`TextIngredientExtractor`] - finds and cleans the ingredient list in label text
//! - [`TieredIngredientResolver`] - cache, curated table, external database, heuristic
//!   and fallback tiers behind one `resolve` call
//! - [`PatternScoringEngine`], [`HealthScoreAggregator`] - explainable factors and the
//!   clamped 0-100 score
//! - [`ScanPipeline`] - the whole flow for one scan
//! - [`Config`] - `LABELSCORE_*` environment configuration
//!
//! ## Test/Mock Support
//! [`MockNutritionSource`] is available behind `#[cfg(any(test, feature = "mock"))]`.

pub mod cache;
pub mod config;
pub mod constants;
pub mod extract;
pub mod gateway;
pub mod pipeline;
pub mod resilience;
pub mod resolver;
pub mod scoring;

pub use cache::{
    CACHE_NAMESPACE, CacheEntry, CacheMirror, CacheStats, FileCacheMirror, ResolutionCache,
    StorageError, StorageResult,
};
pub use config::{Config, ConfigError};
pub use extract::TextIngredientExtractor;
pub use pipeline::{ScanPipeline, ScanReport, ScanRequest};
pub use resilience::{ResilienceError, RetryPolicy};
#[cfg(any(test, feature = "mock"))]
pub use resolver::{MockNutritionSource, MockResponse};
pub use resolver::{
    ExternalSourceError, IngredientRecord, NutritionSource, OpenFoodFactsClient,
    ResolutionSource, ResolveError, TieredIngredientResolver,
};
pub use scoring::{
    FactorCategory, HealthScore, HealthScoreAggregator, PatternScoringEngine, ScoreColor,
    ScoreFactor,
};
