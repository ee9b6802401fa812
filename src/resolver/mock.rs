//! Scriptable [`NutritionSource`] for tests.

use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use parking_lot::Mutex;

use super::error::ExternalSourceError;
use super::external::{NutritionSource, ProductSummary};

#[derive(Debug, Clone, PartialEq, Eq)]
/// One canned answer.
pub enum MockResponse {
    Product(ProductSummary),
    NoMatch,
    Status(u16),
    Malformed,
    /// Sleeps, then answers [`MockResponse::NoMatch`].
    Delay(Duration),
    Panic,
}

impl MockResponse {
    /// Product with a grade and optional additive tags.
    pub fn graded(grade: &str, additives: &[&str]) -> Self {
        MockResponse::Product(ProductSummary {
            nutrition_grade: Some(grade.to_string()),
            additives_tags: additives.iter().map(|t| t.to_string()).collect(),
        })
    }
}

/// Answers from a script, then from a default response.
pub struct MockNutritionSource {
    script: Mutex<VecDeque<MockResponse>>,
    default: MockResponse,
    calls: AtomicUsize,
    terms: Mutex<Vec<String>>,
}

impl MockNutritionSource {
    /// Source that always answers `default`.
    pub fn new(default: MockResponse) -> Self {
        Self {
            script: Mutex::new(VecDeque::new()),
            default,
            calls: AtomicUsize::new(0),
            terms: Mutex::new(Vec::new()),
        }
    }

    /// Source that never matches anything.
    pub fn empty() -> Self {
        Self::new(MockResponse::NoMatch)
    }

    /// Source that always fails with HTTP 503.
    pub fn unavailable() -> Self {
        Self::new(MockResponse::Status(503))
    }

    /// Queues responses served before the default.
    pub fn with_script(self, responses: impl IntoIterator<Item = MockResponse>) -> Self {
        self.script.lock().extend(responses);
        self
    }

    /// Number of `search` calls so far.
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    /// Search terms received, in call order.
    pub fn terms(&self) -> Vec<String> {
        self.terms.lock().clone()
    }
}

#[async_trait]
impl NutritionSource for MockNutritionSource {
    async fn search(&self, term: &str) -> Result<Option<ProductSummary>, ExternalSourceError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.terms.lock().push(term.to_string());
        let response = self
            .script
            .lock()
            .pop_front()
            .unwrap_or_else(|| self.default.clone());

        match response {
            MockResponse::Product(product) => Ok(Some(product)),
            MockResponse::NoMatch => Ok(None),
            MockResponse::Status(status) => Err(ExternalSourceError::Status { status }),
            MockResponse::Malformed => Err(ExternalSourceError::Malformed {
                reason: "mock malformed body".to_string(),
            }),
            MockResponse::Delay(delay) => {
                tokio::time::sleep(delay).await;
                Ok(None)
            }
            MockResponse::Panic => panic!("mock nutrition source panicked"),
        }
    }
}
