//! Pattern scoring.
//!
//! Every registered pattern is scored against the message; the winner and
//! its clamped score become the classification.  The formula is fixed:
//!
//! ```text
//! raw   = 0.5 · regex_hits
//!       + 0.3 · substring_hits / max(keyword_count, 1)
//!       + 0.1 · exact_hits
//! final = min(raw, 1.0) × weight
//! ```
//!
//! `final` is the single definition of confidence: it drives both ranking
//! and the value reported to callers (clamped into `[0, 1]`).

use crate::pattern::IntentPattern;

/// Score breakdown for one pattern against one message.
#[derive(Debug, Clone, PartialEq)]
pub struct PatternScore {
    /// Regexes that matched the raw message.
    pub regex_hits: usize,
    /// Tokens that substring-match (either direction) some keyword.
    pub substring_hits: usize,
    /// Tokens exactly equal to some keyword.
    pub exact_hits: usize,
    /// Weighted, pre-clamp score.
    pub final_score: f64,
}

/// Score a single pattern against the raw message and its tokens.
pub fn score_pattern(pattern: &IntentPattern, raw: &str, tokens: &[String]) -> PatternScore {
    let regex_hits = pattern.regexes().iter().filter(|r| r.is_match(raw)).count();

    let substring_hits = tokens
        .iter()
        .filter(|t| {
            pattern
                .keywords
                .iter()
                .any(|k| t.contains(k.as_str()) || k.contains(t.as_str()))
        })
        .count();

    let exact_hits = tokens
        .iter()
        .filter(|t| pattern.keywords.iter().any(|k| k == *t))
        .count();

    let keyword_count = pattern.keywords.len().max(1) as f64;
    let raw_score = 0.5 * regex_hits as f64
        + 0.3 * substring_hits as f64 / keyword_count
        + 0.1 * exact_hits as f64;

    PatternScore {
        regex_hits,
        substring_hits,
        exact_hits,
        final_score: raw_score.min(1.0) * pattern.weight,
    }
}

/// Score every pattern and return the index and breakdown of the winner.
///
/// Ties resolve to the first-registered pattern among those tied: the scan
/// runs in registration order and only a strictly greater score displaces
/// the current best.  Returns `None` for an empty pattern list.
pub fn best_match(
    patterns: &[IntentPattern],
    raw: &str,
    tokens: &[String],
) -> Option<(usize, PatternScore)> {
    let mut best: Option<(usize, PatternScore)> = None;

    for (index, pattern) in patterns.iter().enumerate() {
        let score = score_pattern(pattern, raw, tokens);
        match &best {
            Some((_, current)) if score.final_score <= current.final_score => {}
            _ => best = Some((index, score)),
        }
    }

    best
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tokenize::normalize;

    fn plan_pattern() -> IntentPattern {
        IntentPattern::new("compute-plan")
            .with_keywords(&["business", "plan", "roi"])
            .with_regex(r"(?i)business\s*plan")
            .unwrap()
    }

    #[test]
    fn regex_hit_contributes_half_point() {
        let pattern = plan_pattern();
        let n = normalize("BUSINESS PLAN");
        let score = score_pattern(&pattern, &n.raw, &n.tokens);
        assert_eq!(score.regex_hits, 1);
        assert!(score.final_score >= 0.5);
    }

    #[test]
    fn keyword_hits_are_normalized_by_keyword_count() {
        let pattern = IntentPattern::new("p").with_keywords(&["alpha", "beta", "gamma"]);
        let n = normalize("alpha beta");
        let score = score_pattern(&pattern, &n.raw, &n.tokens);
        assert_eq!(score.substring_hits, 2);
        assert_eq!(score.exact_hits, 2);
        // 0.3 * 2/3 + 0.1 * 2
        assert!((score.final_score - 0.4).abs() < 1e-9);
    }

    #[test]
    fn substring_matches_in_either_direction() {
        let pattern = IntentPattern::new("p").with_keywords(&["valutazione"]);
        // Token is a prefix of the keyword.
        let n = normalize("valuta");
        let score = score_pattern(&pattern, &n.raw, &n.tokens);
        assert_eq!(score.substring_hits, 1);
        assert_eq!(score.exact_hits, 0);
    }

    #[test]
    fn weight_is_applied_after_the_clamp() {
        let pattern = IntentPattern::new("p")
            .with_keywords(&["x"])
            .with_regex("x")
            .unwrap()
            .with_regex("x")
            .unwrap()
            .with_regex("x")
            .unwrap()
            .with_weight(0.5);
        let n = normalize("x");
        let score = score_pattern(&pattern, &n.raw, &n.tokens);
        // Raw score 0.5*3 + 0.3 + 0.1 = 1.9, clamped to 1.0, then weighted.
        assert!((score.final_score - 0.5).abs() < 1e-9);
    }

    #[test]
    fn tie_resolves_to_first_registered() {
        let patterns = vec![
            IntentPattern::new("first").with_keywords(&["match"]),
            IntentPattern::new("second").with_keywords(&["match"]),
        ];
        let n = normalize("match");
        let (index, _) = best_match(&patterns, &n.raw, &n.tokens).unwrap();
        assert_eq!(index, 0);
    }

    #[test]
    fn higher_score_displaces_earlier_pattern() {
        let patterns = vec![
            IntentPattern::new("weak").with_keywords(&["match"]),
            IntentPattern::new("strong")
                .with_keywords(&["match"])
                .with_regex("match")
                .unwrap(),
        ];
        let n = normalize("match");
        let (index, score) = best_match(&patterns, &n.raw, &n.tokens).unwrap();
        assert_eq!(index, 1);
        assert!(score.final_score > 0.5);
    }

    #[test]
    fn empty_pattern_list_has_no_winner() {
        let n = normalize("anything");
        assert!(best_match(&[], &n.raw, &n.tokens).is_none());
    }

    #[test]
    fn zero_score_input_still_picks_first_pattern() {
        let patterns = vec![
            IntentPattern::new("fallback"),
            IntentPattern::new("other").with_keywords(&["specific"]),
        ];
        let n = normalize("completely unrelated text");
        let (index, score) = best_match(&patterns, &n.raw, &n.tokens).unwrap();
        assert_eq!(index, 0);
        assert_eq!(score.final_score, 0.0);
    }
}
