//! External nutrition database tier (Open Food Facts compatible search API).

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use serde::Deserialize;
use tracing::{debug, warn};

use super::error::ExternalSourceError;
use super::tier::ResolutionTier;
use super::types::{IngredientRecord, ResolutionSource};
use crate::constants::{
    ADDITIVE_CLASS_HIGH_RISK, ADDITIVE_CLASS_MODERATE_RISK, ADDITIVE_SCORE_CAP,
    DEFAULT_EXTERNAL_TIMEOUT, HIGH_RISK_ADDITIVE_TAGS, grade_to_score,
};
use crate::resilience::{RetryPolicy, retry_with_backoff, with_timeout};

/// Default base URL of the nutrition database.
pub const DEFAULT_NUTRITION_DB_URL: &str = "https://world.openfoodfacts.org";

#[derive(Debug, Clone, Default, PartialEq, Eq)]
/// Fields consulted from the first matching product.
pub struct ProductSummary {
    pub nutrition_grade: Option<String>,
    pub additives_tags: Vec<String>,
}

#[async_trait]
/// A searchable nutrition database.
pub trait NutritionSource: Send + Sync {
    /// Returns the first product matching `term`, or `None` when nothing matches.
    async fn search(&self, term: &str) -> Result<Option<ProductSummary>, ExternalSourceError>;
}

#[derive(Debug, Deserialize)]
struct SearchResponse {
    #[serde(default)]
    products: Vec<ProductPayload>,
}

#[derive(Debug, Deserialize)]
struct ProductPayload {
    #[serde(default)]
    nutrition_grades: Option<String>,
    #[serde(default)]
    additives_tags: Option<Vec<String>>,
}

#[derive(Clone)]
/// HTTP client for the Open Food Facts search endpoint.
pub struct OpenFoodFactsClient {
    http: reqwest::Client,
    base_url: String,
}

impl OpenFoodFactsClient {
    const USER_AGENT: &'static str = concat!("labelscore/", env!("CARGO_PKG_VERSION"));

    /// Creates a client for `base_url`.
    pub fn new(base_url: impl Into<String>) -> Result<Self, ExternalSourceError> {
        let http = reqwest::Client::builder()
            .user_agent(Self::USER_AGENT)
            .build()?;
        Ok(Self {
            http,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        })
    }

    /// Returns the configured base URL.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn search_url(&self) -> String {
        format!("{}/cgi/search.pl", self.base_url)
    }
}

impl std::fmt::Debug for OpenFoodFactsClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OpenFoodFactsClient")
            .field("base_url", &self.base_url)
            .finish()
    }
}

#[async_trait]
impl NutritionSource for OpenFoodFactsClient {
    async fn search(&self, term: &str) -> Result<Option<ProductSummary>, ExternalSourceError> {
        let response = self
            .http
            .get(self.search_url())
            .query(&[
                ("search_terms", term),
                ("search_simple", "1"),
                ("action", "process"),
                ("json", "1"),
                ("page_size", "1"),
                ("fields", "nutrition_grades,additives_tags"),
            ])
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(ExternalSourceError::Status {
                status: status.as_u16(),
            });
        }

        let body: SearchResponse =
            response
                .json()
                .await
                .map_err(|e| ExternalSourceError::Malformed {
                    reason: e.to_string(),
                })?;

        Ok(body.products.into_iter().next().map(|p| ProductSummary {
            nutrition_grade: p.nutrition_grades,
            additives_tags: p.additives_tags.unwrap_or_default(),
        }))
    }
}

/// Picks the additive class for a product's additive tags.
pub fn classify_additive_tags(tags: &[String]) -> Option<&'static str> {
    if tags.is_empty() {
        return None;
    }
    let high_risk = tags.iter().any(|tag| {
        let tag = tag.trim().to_lowercase();
        HIGH_RISK_ADDITIVE_TAGS.contains(&tag.as_str())
    });
    Some(if high_risk {
        ADDITIVE_CLASS_HIGH_RISK
    } else {
        ADDITIVE_CLASS_MODERATE_RISK
    })
}

/// Turns a product into a record; products without a usable grade are a miss.
pub fn product_to_record(name: &str, product: &ProductSummary) -> Option<IngredientRecord> {
    let grade = product.nutrition_grade.as_deref()?;
    let mut score = grade_to_score(grade)?;

    let mut explanation = format!(
        "Nutrition grade {} from the external food database.",
        grade.trim().to_uppercase()
    );

    let additive_class = classify_additive_tags(&product.additives_tags);
    if additive_class.is_some() {
        score = score.min(ADDITIVE_SCORE_CAP);
        explanation.push_str(&format!(
            " Listed with {} additive(s).",
            product.additives_tags.len()
        ));
    }

    let record = IngredientRecord::new(name, ResolutionSource::External)
        .with_score(score)
        .with_explanation(explanation);
    Some(match additive_class {
        Some(class) => record.with_additive_class(class),
        None => record,
    })
}

/// Tier that queries a [`NutritionSource`] with timeout and retry.
pub struct ExternalTier {
    source: Arc<dyn NutritionSource>,
    policy: RetryPolicy,
    timeout: Duration,
}

impl ExternalTier {
    pub fn new(source: Arc<dyn NutritionSource>) -> Self {
        Self {
            source,
            policy: RetryPolicy::default(),
            timeout: DEFAULT_EXTERNAL_TIMEOUT,
        }
    }

    pub fn with_policy(mut self, policy: RetryPolicy) -> Self {
        self.policy = policy;
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    async fn fetch(&self, name: &str) -> Result<Option<ProductSummary>, ExternalSourceError> {
        retry_with_backoff(
            &self.policy,
            "nutrition_db",
            ExternalSourceError::is_retryable,
            |_| async {
                with_timeout(self.timeout, "nutrition_db", self.source.search(name)).await?
            },
        )
        .await
    }
}

#[async_trait]
impl ResolutionTier for ExternalTier {
    fn source(&self) -> ResolutionSource {
        ResolutionSource::External
    }

    fn writes_back(&self) -> bool {
        true
    }

    async fn lookup(&self, name: &str) -> Option<IngredientRecord> {
        match self.fetch(name).await {
            Ok(Some(product)) => {
                let record = product_to_record(name, &product);
                if record.is_none() {
                    debug!(name, "External product has no usable grade");
                }
                record
            }
            Ok(None) => {
                debug!(name, "No external product matched");
                None
            }
            Err(e) => {
                warn!(name, error = %e, "External nutrition lookup failed");
                None
            }
        }
    }
}
