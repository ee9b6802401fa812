use tracing::trace;

use super::patterns::{COMPILED_RULES, Impact};
use super::types::{FactorCategory, ScoreFactor};
use crate::constants::{ADDITIVE_CLASS_HIGH_RISK, ADDITIVE_CLASS_MODERATE_RISK};
use crate::resolver::IngredientRecord;

/// Penalty for an additive, from its class first and its nutrition score second.
pub fn additive_severity(record: &IngredientRecord) -> i32 {
    match record.additive_class() {
        Some(ADDITIVE_CLASS_HIGH_RISK) => -15,
        Some(ADDITIVE_CLASS_MODERATE_RISK) => -10,
        _ => match record.nutrition_score() {
            Some(score) if score <= 2 => -15,
            Some(score) if score <= 4 => -10,
            _ => -5,
        },
    }
}

#[derive(Debug, Default, Clone, Copy)]
/// Maps one ingredient record to its score factors.
pub struct PatternScoringEngine;

impl PatternScoringEngine {
    pub fn new() -> Self {
        Self
    }

    /// Runs every rule against `record`. Pure and deterministic.
    pub fn analyze(&self, record: &IngredientRecord) -> Vec<ScoreFactor> {
        let name = record.name();
        let mut factors: Vec<ScoreFactor> = Vec::new();

        for (rule, matcher) in COMPILED_RULES.iter() {
            let suppressed = rule
                .suppressed_by
                .is_some_and(|by| factors.iter().any(|f| f.category == by));
            if suppressed || !matcher.is_match(name) {
                continue;
            }

            let impact = match rule.impact {
                Impact::Fixed(value) => value,
                Impact::AdditiveSeverity => additive_severity(record),
            };
            factors.push(ScoreFactor::new(
                name,
                impact,
                rule.reason_for(name),
                rule.category,
            ));
        }

        if factors.is_empty()
            && let Some(class) = record.additive_class()
        {
            factors.push(ScoreFactor::new(
                name,
                additive_severity(record),
                format!("{name} is classified as a {class} additive"),
                FactorCategory::FoodAdditive,
            ));
        }

        trace!(ingredient = name, factors = factors.len(), "Analyzed ingredient");
        factors
    }

    /// Analyzes records in order, concatenating their factors.
    pub fn analyze_all<'a>(
        &self,
        records: impl IntoIterator<Item = &'a IngredientRecord>,
    ) -> Vec<ScoreFactor> {
        records
            .into_iter()
            .flat_map(|record| self.analyze(record))
            .collect()
    }
}
