use serde::{Deserialize, Serialize};

use crate::constants::{GREEN_THRESHOLD, YELLOW_THRESHOLD};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
/// Pattern category that produced a [`ScoreFactor`].
pub enum FactorCategory {
    ArtificialAdditive,
    HighSodium,
    TransFat,
    ArtificialSweetener,
    Preservative,
    Organic,
    Natural,
    WholeGrain,
    /// Generic penalty for classified additives no named pattern caught.
    FoodAdditive,
    /// Placeholder emitted when a scan found no ingredients.
    NoIngredients,
}

impl FactorCategory {
    #[inline]
    pub fn as_str(&self) -> &'static str {
        match self {
            FactorCategory::ArtificialAdditive => "artificial_additive",
            FactorCategory::HighSodium => "high_sodium",
            FactorCategory::TransFat => "trans_fat",
            FactorCategory::ArtificialSweetener => "artificial_sweetener",
            FactorCategory::Preservative => "preservative",
            FactorCategory::Organic => "organic",
            FactorCategory::Natural => "natural",
            FactorCategory::WholeGrain => "whole_grain",
            FactorCategory::FoodAdditive => "food_additive",
            FactorCategory::NoIngredients => "no_ingredients",
        }
    }
}

impl std::fmt::Display for FactorCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
/// One explainable contribution to a health score.
pub struct ScoreFactor {
    pub ingredient: String,
    /// Signed adjustment applied to the base score.
    pub impact: i32,
    pub reason: String,
    pub category: FactorCategory,
}

impl ScoreFactor {
    pub fn new(
        ingredient: impl Into<String>,
        impact: i32,
        reason: impl Into<String>,
        category: FactorCategory,
    ) -> Self {
        Self {
            ingredient: ingredient.into(),
            impact,
            reason: reason.into(),
            category,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
/// Traffic-light band of a score.
pub enum ScoreColor {
    Green,
    Yellow,
    Red,
}

impl ScoreColor {
    /// Band for `score`: green at 70 and above, yellow at 40 and above, red below.
    pub fn from_score(score: u8) -> Self {
        if score >= GREEN_THRESHOLD {
            ScoreColor::Green
        } else if score >= YELLOW_THRESHOLD {
            ScoreColor::Yellow
        } else {
            ScoreColor::Red
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ScoreColor::Green => "green",
            ScoreColor::Yellow => "yellow",
            ScoreColor::Red => "red",
        }
    }
}

impl std::fmt::Display for ScoreColor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
/// Final score of one scan. Built fresh per scan, never cached.
pub struct HealthScore {
    /// Always within `0..=100`.
    pub overall: u8,
    pub color: ScoreColor,
    /// Ingredient input order, then rule order within an ingredient.
    pub factors: Vec<ScoreFactor>,
}

impl HealthScore {
    /// Sum of all factor impacts before clamping.
    pub fn total_impact(&self) -> i64 {
        self.factors.iter().map(|f| i64::from(f.impact)).sum()
    }
}
