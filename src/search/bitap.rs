//! Bitap approximate string matching.
//!
//! Scores how well a short pattern matches anywhere inside a longer text,
//! tolerating edits (insertions, deletions, substitutions). The score is a
//! dissimilarity in [0, 1]: 0 is a perfect match at the start of the text,
//! 1 is no match. Two knobs bound what counts as a match at all:
//!
//! - `threshold`: maximum dissimilarity before a candidate is rejected
//!   outright rather than ranked.
//! - `distance`: how far from the start of the text a match may sit before
//!   the location penalty alone pushes it over the threshold. Compact
//!   matches near the head of the name win over scattered hits deep in it.

use std::collections::HashMap;

/// Bitmask registers cap the usable pattern length.
pub const MAX_PATTERN_LEN: usize = 32;

#[derive(Debug, Clone, Copy)]
pub struct BitapConfig {
    /// Maximum dissimilarity in [0, 1] for a candidate to match at all.
    pub threshold: f64,
    /// Location tolerance: penalty is `offset / distance` added to the
    /// error ratio.
    pub distance: usize,
    /// Patterns shorter than this match nothing.
    pub min_pattern_len: usize,
}

impl Default for BitapConfig {
    fn default() -> Self {
        Self {
            threshold: 0.3,
            distance: 200,
            min_pattern_len: 2,
        }
    }
}

/// A compiled search pattern: lowercased, truncated to `MAX_PATTERN_LEN`
/// characters, with per-character bitmasks precomputed.
pub struct Pattern {
    len: usize,
    masks: HashMap<char, u64>,
}

impl Pattern {
    /// Compile a query into a pattern. Returns `None` when the trimmed
    /// query is shorter than the configured minimum.
    pub fn compile(query: &str, config: &BitapConfig) -> Option<Self> {
        let chars: Vec<char> = query
            .trim()
            .to_lowercase()
            .chars()
            .take(MAX_PATTERN_LEN)
            .collect();
        if chars.len() < config.min_pattern_len.max(1) {
            return None;
        }

        // Bit i of a character's mask marks pattern position i (LSB first),
        // so a register reaching bit m-1 means the whole pattern matched.
        let len = chars.len();
        let mut masks: HashMap<char, u64> = HashMap::new();
        for (i, c) in chars.iter().enumerate() {
            *masks.entry(*c).or_insert(0) |= 1 << i;
        }

        Some(Self { len, masks })
    }

    pub fn len(&self) -> usize {
        self.len
    }
}

/// Score one match given its error count and start offset.
fn match_score(errors: usize, start: usize, pattern_len: usize, distance: usize) -> f64 {
    let accuracy = errors as f64 / pattern_len as f64;
    if distance == 0 {
        if start == 0 {
            return accuracy;
        }
        return 1.0;
    }
    accuracy + start as f64 / distance as f64
}

/// Search `text` (must already be lowercased) for the pattern. Returns the
/// best dissimilarity in [0, 1] when it clears the threshold, `None` when
/// nothing matches well enough.
pub fn bitap_search(text: &str, pattern: &Pattern, config: &BitapConfig) -> Option<f64> {
    let m = pattern.len;
    let match_bit = 1u64 << (m - 1);
    let max_errors = ((config.threshold * m as f64) as usize).min(m - 1);

    // One register per error level, Wu-Manber style. Bit k of level d set
    // means the first k+1 pattern chars match ending here with <= d edits.
    let mut registers = vec![0u64; max_errors + 1];
    let mut best: Option<f64> = None;

    for (j, c) in text.chars().enumerate() {
        let char_mask = pattern.masks.get(&c).copied().unwrap_or(0);
        let mut prev_old = 0u64;
        let mut prev_new = 0u64;

        for (d, register) in registers.iter_mut().enumerate() {
            let old = *register;
            let mut next = ((old << 1) | 1) & char_mask;
            if d > 0 {
                // substitution / insertion on the previous level, plus
                // deletion carrying the previous level forward unchanged
                next |= (((prev_old | prev_new) << 1) | 1) | prev_old;
            }
            *register = next;
            prev_old = old;
            prev_new = next;

            if next & match_bit != 0 {
                let start = (j + 1).saturating_sub(m);
                let score = match_score(d, start, m, config.distance);
                if score <= config.threshold && best.map_or(true, |b| score < b) {
                    best = Some(score);
                }
            }
        }
    }

    best
}

#[cfg(test)]
mod tests {
    use super::*;

    fn score(text: &str, query: &str) -> Option<f64> {
        let config = BitapConfig::default();
        let pattern = Pattern::compile(query, &config)?;
        bitap_search(&text.to_lowercase(), &pattern, &config)
    }

    #[test]
    fn test_exact_prefix_match_is_perfect() {
        assert_eq!(score("dota 2", "dota"), Some(0.0));
    }

    #[test]
    fn test_full_exact_match() {
        assert_eq!(score("dota 2", "dota 2"), Some(0.0));
    }

    #[test]
    fn test_query_case_folded() {
        assert_eq!(score("dota 2", "DOTA"), Some(0.0));
        assert_eq!(score("dota 2", "DoTa 2"), Some(0.0));
    }

    #[test]
    fn test_single_typo_matches() {
        // One substitution in a 6-char pattern: accuracy 1/6 <= 0.3
        let s = score("portal", "portel").unwrap();
        assert!(s > 0.0 && s <= 0.3);
    }

    #[test]
    fn test_unrelated_text_rejected() {
        assert_eq!(score("team fortress 2", "dota"), None);
    }

    #[test]
    fn test_short_query_compiles_to_nothing() {
        let config = BitapConfig::default();
        assert!(Pattern::compile("2", &config).is_none());
        assert!(Pattern::compile(" a ", &config).is_none());
        assert!(Pattern::compile("", &config).is_none());
    }

    #[test]
    fn test_offset_match_scores_worse_than_prefix_match() {
        let near = score("half-life", "life").unwrap();
        let at_start = score("life is strange", "life").unwrap();
        assert!(at_start < near);
    }

    #[test]
    fn test_distant_match_rejected_by_location_penalty() {
        // Match sits ~70 chars in: location penalty 70/200 = 0.35 > 0.3
        let padding = "x".repeat(70);
        let text = format!("{} dota", padding);
        assert_eq!(score(&text, "dota"), None);
    }

    #[test]
    fn test_scores_bounded() {
        for (text, query) in [
            ("counter-strike 2", "counter"),
            ("left 4 dead 2", "left"),
            ("grand theft auto v", "gta v"),
        ] {
            if let Some(s) = score(text, query) {
                assert!((0.0..=1.0).contains(&s), "{} / {}: {}", text, query, s);
            }
        }
    }

    #[test]
    fn test_long_query_truncated() {
        let config = BitapConfig::default();
        let long = "a".repeat(100);
        let pattern = Pattern::compile(&long, &config).unwrap();
        assert_eq!(pattern.len(), MAX_PATTERN_LEN);
    }
}
