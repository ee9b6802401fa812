//! Cross-cutting, shared constants.
//!
//! Score bands, the canonical grade table and the tier defaults live here so the
//! resolver, the scoring engine and the HTTP surface agree on one set of numbers.

use std::time::Duration;

/// Lower bound of every health score.
pub const MIN_SCORE: i64 = 0;
/// Upper bound of every health score.
pub const MAX_SCORE: i64 = 100;
/// Starting point before factor impacts are applied.
pub const BASE_SCORE: i64 = 100;

/// Overall score at or above which a scan is shown green.
pub const GREEN_THRESHOLD: u8 = 70;
/// Overall score at or above which a scan is shown yellow (below is red).
pub const YELLOW_THRESHOLD: u8 = 40;

/// Score reported when a scan produced no ingredients.
pub const EMPTY_SCAN_SCORE: u8 = 50;
/// Synthetic ingredient name used for the empty-scan factor.
pub const EMPTY_SCAN_INGREDIENT: &str = "no ingredients detected";

/// Neutral nutrition score used by the fallback tier and unmatched heuristics.
pub const NEUTRAL_NUTRITION_SCORE: u8 = 50;

/// Score ceiling for external records that list additives.
pub const ADDITIVE_SCORE_CAP: u8 = 60;

/// Additive class tag with the harshest severity.
pub const ADDITIVE_CLASS_HIGH_RISK: &str = "high_risk";
/// Additive class tag with moderate severity.
pub const ADDITIVE_CLASS_MODERATE_RISK: &str = "moderate_risk";

/// Canonical nutrition-grade table (`a` best, `e` worst).
pub const GRADE_SCORES: [(char, u8); 5] = [('a', 90), ('b', 75), ('c', 60), ('d', 45), ('e', 30)];

/// Additive tags (Open Food Facts `en:eNNN` form) treated as high risk.
pub const HIGH_RISK_ADDITIVE_TAGS: &[&str] = &[
    "en:e102", "en:e104", "en:e110", "en:e122", "en:e124", "en:e129", "en:e171", "en:e250",
    "en:e251", "en:e320", "en:e321",
];

/// Per-attempt timeout for the external nutrition database.
pub const DEFAULT_EXTERNAL_TIMEOUT: Duration = Duration::from_secs(8);
/// Attempt budget (first try included) for the external nutrition database.
pub const DEFAULT_EXTERNAL_MAX_ATTEMPTS: u32 = 3;
/// First backoff delay between external attempts.
pub const DEFAULT_RETRY_BASE_DELAY: Duration = Duration::from_secs(1);
/// Backoff multiplier between external attempts.
pub const DEFAULT_RETRY_MULTIPLIER: u32 = 2;

/// How long a resolved record stays fresh in the cache.
pub const DEFAULT_CACHE_TTL: Duration = Duration::from_secs(24 * 60 * 60);
/// Maximum number of cached records before eviction kicks in.
pub const DEFAULT_CACHE_MAX_ENTRIES: usize = 500;

/// Largest recognized text accepted by the HTTP surface.
pub const MAX_SCAN_TEXT_BYTES: usize = 64 * 1024;

/// Maps a single-letter nutrition grade to a score using [`GRADE_SCORES`].
pub fn grade_to_score(grade: &str) -> Option<u8> {
    let mut chars = grade.trim().chars();
    let letter = chars.next()?.to_ascii_lowercase();
    if chars.next().is_some() {
        return None;
    }
    GRADE_SCORES
        .iter()
        .find(|(g, _)| *g == letter)
        .map(|(_, score)| *score)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_grade_to_score_table() {
        assert_eq!(grade_to_score("a"), Some(90));
        assert_eq!(grade_to_score("B"), Some(75));
        assert_eq!(grade_to_score(" c "), Some(60));
        assert_eq!(grade_to_score("d"), Some(45));
        assert_eq!(grade_to_score("e"), Some(30));
    }

    #[test]
    fn test_grade_to_score_rejects_unknown() {
        assert_eq!(grade_to_score(""), None);
        assert_eq!(grade_to_score("f"), None);
        assert_eq!(grade_to_score("unknown"), None);
        assert_eq!(grade_to_score("not-applicable"), None);
    }

    #[test]
    fn test_thresholds_are_ordered() {
        assert!(GREEN_THRESHOLD > YELLOW_THRESHOLD);
        assert!(i64::from(EMPTY_SCAN_SCORE) <= MAX_SCORE);
    }
}
