//! Health scoring for resolved ingredients.
//!
//! [`PatternScoringEngine`] turns each [`IngredientRecord`](crate::resolver::IngredientRecord)
//! into explainable [`ScoreFactor`]s by running a fixed rule table over the ingredient
//! name. [`HealthScoreAggregator`] folds the factors of a whole scan into one clamped
//! [`HealthScore`].
//!
//! Both stages are pure: the same records always produce the same factors in the
//! same order.

pub mod aggregate;
pub mod engine;
pub mod patterns;
pub mod types;


pub use aggregate::HealthScoreAggregator;
pub use engine::{PatternScoringEngine, additive_severity};
pub use patterns::{Impact, PATTERN_RULES, PatternRule};
pub use types::{FactorCategory, HealthScore, ScoreColor, ScoreFactor};
