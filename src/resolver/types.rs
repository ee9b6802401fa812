use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
/// Tier that produced an [`IngredientRecord`].
pub enum ResolutionSource {
    Cache,
    Curated,
    External,
    Heuristic,
    Fallback,
}

impl ResolutionSource {
    #[inline]
    pub fn as_str(&self) -> &'static str {
        match self {
            ResolutionSource::Cache => "cache",
            ResolutionSource::Curated => "curated",
            ResolutionSource::External => "external",
            ResolutionSource::Heuristic => "heuristic",
            ResolutionSource::Fallback => "fallback",
        }
    }
}

impl std::fmt::Display for ResolutionSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
/// Nutritional/safety metadata resolved for one normalized ingredient name.
///
/// Records are built once by a tier and never mutated; a refresh replaces the whole
/// record.
pub struct IngredientRecord {
    name: String,
    source: ResolutionSource,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    nutrition_score: Option<u8>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    additive_class: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    explanation: Option<String>,
}

impl IngredientRecord {
    /// Starts a record for an already-normalized `name`.
    pub fn new(name: impl Into<String>, source: ResolutionSource) -> Self {
        Self {
            name: name.into(),
            source,
            nutrition_score: None,
            additive_class: None,
            explanation: None,
        }
    }

    /// Sets the nutrition score, clamped to `0..=100`.
    pub fn with_score(mut self, score: u8) -> Self {
        self.nutrition_score = Some(score.min(100));
        self
    }

    /// Sets the additive class tag; blank tags are ignored.
    pub fn with_additive_class(mut self, class: impl Into<String>) -> Self {
        let class = class.into();
        self.additive_class = (!class.trim().is_empty()).then_some(class);
        self
    }

    pub fn with_explanation(mut self, explanation: impl Into<String>) -> Self {
        self.explanation = Some(explanation.into());
        self
    }

    /// Copy of this record attributed to another tier.
    pub fn with_source(&self, source: ResolutionSource) -> Self {
        Self {
            source,
            ..self.clone()
        }
    }

    #[inline]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[inline]
    pub fn source(&self) -> ResolutionSource {
        self.source
    }

    #[inline]
    pub fn nutrition_score(&self) -> Option<u8> {
        self.nutrition_score
    }

    #[inline]
    pub fn additive_class(&self) -> Option<&str> {
        self.additive_class.as_deref()
    }

    #[inline]
    pub fn explanation(&self) -> Option<&str> {
        self.explanation.as_deref()
    }

    /// Returns `true` if both records carry the same data, ignoring the source tier.
    pub fn same_payload(&self, other: &IngredientRecord) -> bool {
        self.name == other.name
            && self.nutrition_score == other.nutrition_score
            && self.additive_class == other.additive_class
            && self.explanation == other.explanation
    }
}

/// Trims, lowercases and collapses inner whitespace.
pub fn normalize_name(raw: &str) -> String {
    raw.split_whitespace()
        .map(str::to_lowercase)
        .collect::<Vec<_>>()
        .join(" ")
}
