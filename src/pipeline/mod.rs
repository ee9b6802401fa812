//! End-to-end scan: label text in, health report out.


use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::{info, instrument};

use crate::extract::TextIngredientExtractor;
use crate::resolver::{IngredientRecord, TieredIngredientResolver};
use crate::scoring::{HealthScore, HealthScoreAggregator, PatternScoringEngine};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
/// Recognized label text plus the recognizer's confidence.
pub struct ScanRequest {
    pub text: String,
    /// Recognition confidence in `0..=100`, echoed back untouched.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub confidence: Option<f32>,
}

impl ScanRequest {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            confidence: None,
        }
    }

    pub fn with_confidence(mut self, confidence: f32) -> Self {
        self.confidence = Some(confidence);
        self
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScanReport {
    pub score: HealthScore,
    /// One record per extracted name, in label order.
    pub ingredients: Vec<IngredientRecord>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub confidence: Option<f32>,
}

/// Extract, resolve, analyze and aggregate.
///
/// A scan never fails. Dropping the returned future cancels any in-flight external
/// lookups.
#[derive(Debug, Clone)]
pub struct ScanPipeline {
    extractor: TextIngredientExtractor,
    resolver: Arc<TieredIngredientResolver>,
    engine: PatternScoringEngine,
    aggregator: HealthScoreAggregator,
}

impl ScanPipeline {
    pub fn new(resolver: Arc<TieredIngredientResolver>) -> Self {
        Self {
            extractor: TextIngredientExtractor::new(),
            resolver,
            engine: PatternScoringEngine::new(),
            aggregator: HealthScoreAggregator::new(),
        }
    }

    pub fn resolver(&self) -> &Arc<TieredIngredientResolver> {
        &self.resolver
    }

    #[instrument(skip(self, request), fields(text_len = request.text.len()))]
    pub async fn scan(&self, request: &ScanRequest) -> ScanReport {
        let names = self.extractor.extract(&request.text);
        let ingredients = self.resolver.resolve_all(&names).await;
        let factors = self.engine.analyze_all(&ingredients);
        let score = self.aggregator.aggregate(ingredients.len(), factors);

        info!(
            ingredients = ingredients.len(),
            overall = score.overall,
            color = %score.color,
            "Scan complete"
        );

        ScanReport {
            score,
            ingredients,
            confidence: request.confidence,
        }
    }
}
