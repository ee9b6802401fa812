//! Ingredient list extraction from recognized label text.
//!
//! Label text arrives as one noisy blob. The extractor finds the ingredient span,
//! splits it into candidate names and cleans each one. It never fails: text with no
//! recognizable list yields an empty vector.


use std::sync::LazyLock;

use regex::Regex;
use tracing::debug;

/// Shortest fallback segment still treated as an ingredient list.
const MIN_FALLBACK_SEGMENT_CHARS: usize = 20;

/// Shortest cleaned token kept as an ingredient name.
const MIN_TOKEN_CHARS: usize = 3;

static WHITESPACE_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\s+").expect("Invalid whitespace regex"));

/// Span markers in priority order.
static MARKER_REGEXES: LazyLock<Vec<Regex>> = LazyLock::new(|| {
    [
        r"(?i)\bcontains\s*:\s*",
        r"(?i)\bingredients?\s*:\s*",
        r"(?i)\bmade\s+with\s*:\s*",
    ]
    .iter()
    .map(|pattern| Regex::new(pattern).expect("Invalid span marker regex"))
    .collect()
});

#[derive(Debug, Default, Clone, Copy)]
/// Turns recognized label text into an ordered list of ingredient names.
pub struct TextIngredientExtractor;

impl TextIngredientExtractor {
    pub fn new() -> Self {
        Self
    }

    /// Extracts cleaned, lowercase ingredient names.
    ///
    /// Primary tokens come first in label order, followed by tokens lifted out of
    /// comma-separated parenthetical sub-lists.
    pub fn extract(&self, text: &str) -> Vec<String> {
        let normalized = normalize_whitespace(text);
        if normalized.is_empty() {
            return Vec::new();
        }

        let Some(span) = locate_span(&normalized) else {
            debug!("No ingredient span found in text");
            return Vec::new();
        };

        let (remainder, nested) = lift_parentheticals(span);

        let mut names: Vec<String> = split_tokens(&remainder)
            .filter_map(clean_token)
            .collect();
        names.extend(nested.iter().filter_map(|token| clean_token(token)));

        debug!(count = names.len(), "Extracted ingredient names");
        names
    }
}

fn normalize_whitespace(text: &str) -> String {
    WHITESPACE_REGEX.replace_all(text, " ").trim().to_string()
}

fn locate_span(text: &str) -> Option<&str> {
    for marker in MARKER_REGEXES.iter() {
        if let Some(found) = marker.find(text) {
            let rest = &text[found.end()..];
            let span = rest[..sentence_end(rest)].trim();
            if !span.is_empty() {
                return Some(span);
            }
        }
    }

    fallback_segment(text)
}

/// Byte offset of the first sentence terminator outside brackets, or the text length.
///
/// A terminator only counts when followed by whitespace or the end of text, so
/// decimals such as `2.5%` stay inside the span.
fn sentence_end(text: &str) -> usize {
    let mut depth = 0usize;
    let mut chars = text.char_indices().peekable();
    while let Some((idx, ch)) = chars.next() {
        match ch {
            '(' | '[' => depth += 1,
            ')' | ']' => depth = depth.saturating_sub(1),
            '.' | '!' | '?' if depth == 0 => {
                let at_boundary = chars.peek().is_none_or(|(_, next)| next.is_whitespace());
                if at_boundary {
                    return idx;
                }
            }
            _ => {}
        }
    }
    text.len()
}

fn fallback_segment(text: &str) -> Option<&str> {
    let mut rest = text;
    while !rest.is_empty() {
        let end = sentence_end(rest);
        let segment = rest[..end].trim();
        if segment.contains(',') && segment.chars().count() > MIN_FALLBACK_SEGMENT_CHARS {
            return Some(segment);
        }
        // Skip past the terminator itself.
        rest = rest[end..].get(1..).unwrap_or_default();
    }
    None
}

/// Splits comma-bearing bracket groups out of `span`.
///
/// Returns the span with those groups removed and the raw tokens found inside them.
/// Nested groups are lifted too: an outer group's own tokens come before the tokens
/// of the groups inside it. Groups without a comma at their own level stay in place
/// and lose their brackets during cleanup.
fn lift_parentheticals(span: &str) -> (String, Vec<String>) {
    let mut remainder = String::with_capacity(span.len());
    let mut nested = Vec::new();
    let mut rest = span;

    while let Some(open) = rest.find(['(', '[']) {
        remainder.push_str(&rest[..open]);
        let Some(close) = matching_close(&rest[open..]) else {
            // Unbalanced opener: keep it and let cleanup drop it.
            remainder.push_str(&rest[open..=open]);
            rest = &rest[open + 1..];
            continue;
        };

        let (inner, inner_nested) = lift_parentheticals(&rest[open + 1..open + close]);
        if inner.contains(',') {
            nested.extend(inner.split(',').map(str::to_string));
        } else {
            remainder.push('(');
            remainder.push_str(&inner);
            remainder.push(')');
        }
        nested.extend(inner_nested);
        rest = &rest[open + close + 1..];
    }

    remainder.push_str(rest);
    (remainder, nested)
}

/// Byte offset of the bracket closing the group `group` starts with.
fn matching_close(group: &str) -> Option<usize> {
    let mut depth = 0usize;
    for (idx, ch) in group.char_indices() {
        match ch {
            '(' | '[' => depth += 1,
            ')' | ']' => {
                depth = depth.saturating_sub(1);
                if depth == 0 {
                    return Some(idx);
                }
            }
            _ => {}
        }
    }
    None
}

fn split_tokens(span: &str) -> impl Iterator<Item = &str> {
    span.split([',', ';'])
}

/// Cleans one raw token, returning `None` for tokens that are not ingredient names.
fn clean_token(raw: &str) -> Option<String> {
    let unbracketed: String = raw
        .chars()
        .filter(|c| !matches!(c, '(' | ')' | '[' | ']' | '{' | '}'))
        .collect();
    let collapsed = normalize_whitespace(&unbracketed);
    // Digits survive at the edges so names like "red 40" keep their number.
    let trimmed = collapsed.trim_matches(|c: char| !c.is_alphanumeric());

    if trimmed.chars().count() < MIN_TOKEN_CHARS {
        return None;
    }
    if !trimmed.chars().any(char::is_alphabetic) {
        return None;
    }
    Some(trimmed.to_lowercase())
}
