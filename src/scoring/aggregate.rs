use tracing::debug;

use super::types::{FactorCategory, HealthScore, ScoreColor, ScoreFactor};
use crate::constants::{
    BASE_SCORE, EMPTY_SCAN_INGREDIENT, EMPTY_SCAN_SCORE, MAX_SCORE, MIN_SCORE,
};

#[derive(Debug, Default, Clone, Copy)]
/// Folds factors into a clamped overall score.
pub struct HealthScoreAggregator;

impl HealthScoreAggregator {
    pub fn new() -> Self {
        Self
    }

    /// Builds the [`HealthScore`] for a scan of `ingredient_count` ingredients.
    ///
    /// A scan with no ingredients scores a neutral 50 with a single zero-impact
    /// placeholder factor, whatever `factors` holds.
    pub fn aggregate(&self, ingredient_count: usize, factors: Vec<ScoreFactor>) -> HealthScore {
        if ingredient_count == 0 {
            return HealthScore {
                overall: EMPTY_SCAN_SCORE,
                color: ScoreColor::from_score(EMPTY_SCAN_SCORE),
                factors: vec![ScoreFactor::new(
                    EMPTY_SCAN_INGREDIENT,
                    0,
                    "No ingredients could be read from the label",
                    FactorCategory::NoIngredients,
                )],
            };
        }

        // i64 so hundreds of penalties cannot overflow before clamping.
        let total: i64 = factors.iter().map(|f| i64::from(f.impact)).sum();
        let clamped = (BASE_SCORE + total).clamp(MIN_SCORE, MAX_SCORE);
        let overall = u8::try_from(clamped).unwrap_or(u8::MIN);

        debug!(
            ingredient_count,
            factors = factors.len(),
            total,
            overall,
            "Aggregated health score"
        );

        HealthScore {
            overall,
            color: ScoreColor::from_score(overall),
            factors,
        }
    }
}
