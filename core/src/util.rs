use std::collections::HashSet;

use once_cell::sync::Lazy;
use regex_lite::Regex;
use serde::Serialize;

static WORD_RE: Lazy<Option<Regex>> = Lazy::new(|| Regex::new(r"[A-Za-z0-9_-]+").ok());

/// Round to three decimals.
pub fn round3(x: f64) -> f64 {
    (x * 1000.0).round() / 1000.0
}

/// Heuristic confidence: more sources raise it and lower overlap with
/// existing knowledge adds a novelty bonus. Always in `[0, 1]`.
pub fn confidence_from_counts(num_sources: usize, overlap: f64) -> f64 {
    let base = (0.4 + 0.15 * num_sources as f64).min(1.0);
    let bonus = 0.6 * (1.0 - overlap);
    round3((base + bonus).clamp(0.0, 1.0))
}

/// Render a score the way it appears in answers: shortest round-trip form,
/// always with a decimal point (`0.8`, `1.0`).
pub fn format_score(x: f64) -> String {
    let s = format!("{x}");
    if s.contains(['.', 'e', 'E']) || !x.is_finite() {
        s
    } else {
        format!("{s}.0")
    }
}

/// First `max` characters of `s`.
pub fn truncate_chars(s: &str, max: usize) -> String {
    s.chars().take(max).collect()
}

/// Up to six distinct words longer than three characters, in order of first
/// appearance.
pub fn infer_topics(text: &str) -> Vec<String> {
    let Some(re) = WORD_RE.as_ref() else { return Vec::new() };
    let mut seen = HashSet::new();
    re.find_iter(text)
        .map(|m| m.as_str())
        .filter(|w| w.chars().count() > 3)
        .filter(|w| seen.insert(w.to_string()))
        .take(6)
        .map(str::to_string)
        .collect()
}

/// Pretty JSON, falling back to the debug representation.
pub fn to_json<T: Serialize + std::fmt::Debug>(value: &T) -> String {
    serde_json::to_string_pretty(value).unwrap_or_else(|_| format!("{value:?}"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn confidence_base_case_with_full_overlap() {
        assert_eq!(confidence_from_counts(0, 1.0), 0.4);
    }

    #[test]
    fn confidence_is_non_decreasing_in_sources_and_capped() {
        let mut last = 0.0;
        for n in 0..20 {
            let c = confidence_from_counts(n, 0.0);
            assert!(c >= last);
            assert!(c <= 1.0);
            last = c;
        }
        assert_eq!(confidence_from_counts(2, 1.0), 0.7);
        assert_eq!(confidence_from_counts(3, 0.0), 1.0);
    }

    #[test]
    fn format_score_keeps_a_decimal_point() {
        assert_eq!(format_score(0.8), "0.8");
        assert_eq!(format_score(0.85), "0.85");
        assert_eq!(format_score(1.0), "1.0");
        assert_eq!(format_score(0.0), "0.0");
    }

    #[test]
    fn infer_topics_dedups_and_limits() {
        let t = infer_topics("What are the main types of neural networks? neural nets, self-attention layers, model");
        assert_eq!(t, vec!["What", "main", "types", "neural", "networks", "nets"]);
        assert!(infer_topics("a an the").is_empty());
    }

    #[test]
    fn truncate_chars_counts_characters() {
        assert_eq!(truncate_chars("≈O(n log n)", 3), "≈O(");
        assert_eq!(truncate_chars("ab", 10), "ab");
    }
}
