//! Rule table driving [`PatternScoringEngine`](super::PatternScoringEngine).
//!
//! Rules are evaluated in table order against the normalized ingredient name and are
//! not mutually exclusive: one ingredient can trip several rules.

use std::sync::LazyLock;

use regex::Regex;

use super::types::FactorCategory;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
/// How a rule computes its impact.
pub enum Impact {
    Fixed(i32),
    /// Derived from the record's additive class and nutrition score.
    AdditiveSeverity,
}

#[derive(Debug, Clone, Copy)]
pub struct PatternRule {
    pub category: FactorCategory,
    /// Case-insensitive regex matched against the ingredient name.
    pub pattern: &'static str,
    pub impact: Impact,
    /// `{ingredient}` is replaced with the ingredient name.
    pub reason: &'static str,
    /// Rule is skipped when this category already matched the same ingredient.
    pub suppressed_by: Option<FactorCategory>,
}

impl PatternRule {
    pub fn reason_for(&self, ingredient: &str) -> String {
        self.reason.replace("{ingredient}", ingredient)
    }
}

pub const PATTERN_RULES: &[PatternRule] = &[
    PatternRule {
        category: FactorCategory::ArtificialAdditive,
        pattern: r"\b(?:artificial|synthetic)\b|\b(?:fd&c\s+)?(?:red|yellow|blue|green)\s+(?:no\.?\s*)?\d+\b|\be1\d{2}[a-z]?\b|\b(?:tartrazine|erythrosine|allura red|sunset yellow|titanium dioxide)\b",
        impact: Impact::AdditiveSeverity,
        reason: "{ingredient} is an artificial additive",
        suppressed_by: None,
    },
    PatternRule {
        category: FactorCategory::HighSodium,
        pattern: r"\bsalt\b|\bsodium\b|\bmsg\b|\bmonosodium glutamate\b",
        impact: Impact::Fixed(-10),
        reason: "{ingredient} adds sodium",
        suppressed_by: None,
    },
    PatternRule {
        category: FactorCategory::TransFat,
        pattern: r"\bpartially hydrogenated\b|\btrans[\s-]?fats?\b",
        impact: Impact::Fixed(-20),
        reason: "{ingredient} is a source of trans fat",
        suppressed_by: None,
    },
    PatternRule {
        category: FactorCategory::ArtificialSweetener,
        pattern: r"\b(?:aspartame|sucralose|saccharin|acesulfame(?:[\s-]?(?:k|potassium))?|neotame|advantame|cyclamates?)\b|\bartificial sweeteners?\b",
        impact: Impact::Fixed(-8),
        reason: "{ingredient} is an artificial sweetener",
        suppressed_by: None,
    },
    PatternRule {
        category: FactorCategory::Preservative,
        pattern: r"\b(?:benzoates?|sorbates?|nitrites?|nitrates?|sulfites?|sulphites?|metabisulfites?|propionates?|bht|bha|tbhq|edta|preservatives?)\b|\b(?:benzoic|sorbic) acid\b",
        impact: Impact::Fixed(-5),
        reason: "{ingredient} is a preservative",
        suppressed_by: None,
    },
    PatternRule {
        category: FactorCategory::Organic,
        pattern: r"\borganic\b",
        impact: Impact::Fixed(10),
        reason: "{ingredient} is organic",
        suppressed_by: None,
    },
    PatternRule {
        category: FactorCategory::Natural,
        pattern: r"\b(?:natural|fresh|fruits?|vegetables?|herbs?|spices?|honey|juice)\b",
        impact: Impact::Fixed(2),
        reason: "{ingredient} is a natural ingredient",
        suppressed_by: Some(FactorCategory::Organic),
    },
    PatternRule {
        category: FactorCategory::WholeGrain,
        pattern: r"\bwhole[\s-]?(?:wheat|grains?|oats?|rye|corn|spelt|barley)\b|\b(?:brown rice|quinoa|rolled oats|bulgur|millet)\b",
        impact: Impact::Fixed(5),
        reason: "{ingredient} is a whole grain",
        suppressed_by: None,
    },
];

/// [`PATTERN_RULES`] paired with their compiled matchers, in table order.
pub(crate) static COMPILED_RULES: LazyLock<Vec<(&'static PatternRule, Regex)>> =
    LazyLock::new(|| {
        PATTERN_RULES
            .iter()
            .map(|rule| {
                let matcher = Regex::new(&format!("(?i){}", rule.pattern))
                    .expect("Invalid scoring pattern");
                (rule, matcher)
            })
            .collect()
    });
