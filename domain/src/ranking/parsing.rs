//! Ranking extraction from free-form review responses.
//!
//! Reviewers are asked to end with a `FINAL RANKING:` numbered list, but the
//! parser must not depend on it. Extraction is attempted in order:
//!
//! | Step | Format | Result |
//! |------|--------|--------|
//! | 1 | JSON `{"ranking": ["Response C", ...]}` | [`ParsedRanking::Ordered`] |
//! | 1 | JSON `{"scores": {"Response A": 8, ...}}` | [`ParsedRanking::Scored`] |
//! | 2 | `FINAL RANKING:` section, numbered lines | [`ParsedRanking::Ordered`] |
//! | 3 | `FINAL RANKING:` section, any label mention | [`ParsedRanking::Ordered`] |
//! | 4 | Whole text, first mention of each label | [`ParsedRanking::Ordered`] |
//!
//! Nothing extractable yields [`ParsedRanking::Unparsed`], which carries no
//! signal into aggregation.

use crate::anonymize::Label;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::sync::LazyLock;

static NUMBERED_LABEL: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?m)^\s*\d+\s*[.):-]\s*\**\s*(?i:response)\s+([A-Z]{1,3})\b")
        .expect("valid numbered label regex")
});

static ANY_LABEL: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i:response)\s+([A-Z]{1,3})\b").expect("valid label regex")
});

static SECTION_MARKER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)final\s+ranking").expect("valid section regex"));

/// A per-label score from a scored submission
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LabelScore {
    pub label: Label,
    pub score: f64,
}

/// Result of parsing one review response
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ParsedRanking {
    /// Labels from most to least preferred
    Ordered { labels: Vec<Label> },
    /// Per-label scores (higher is better)
    Scored { scores: Vec<LabelScore> },
    /// No ordering could be extracted
    Unparsed,
}

impl ParsedRanking {
    pub fn is_parsed(&self) -> bool {
        !matches!(self, ParsedRanking::Unparsed)
    }

    /// Groups of equally preferred labels, best group first.
    ///
    /// An ordered submission yields one label per group. A scored submission
    /// is sorted by descending score and labels with equal scores share a
    /// group.
    pub fn tiers(&self) -> Vec<Vec<Label>> {
        match self {
            ParsedRanking::Ordered { labels } => labels.iter().map(|l| vec![l.clone()]).collect(),
            ParsedRanking::Scored { scores } => {
                let mut sorted: Vec<&LabelScore> = scores.iter().collect();
                sorted.sort_by(|a, b| b.score.total_cmp(&a.score));

                let mut tiers: Vec<Vec<Label>> = Vec::new();
                let mut previous: Option<f64> = None;
                for entry in sorted {
                    match tiers.last_mut() {
                        Some(tier) if previous == Some(entry.score) => tier.push(entry.label.clone()),
                        _ => tiers.push(vec![entry.label.clone()]),
                    }
                    previous = Some(entry.score);
                }
                tiers
            }
            ParsedRanking::Unparsed => Vec::new(),
        }
    }
}

/// Parse a reviewer's free-text response into a ranking.
///
/// # Examples
///
/// ```
/// use council_domain::ranking::parsing::{parse_ranking, ParsedRanking};
/// use council_domain::anonymize::Label;
///
/// let text = "A is thorough, C is terse.\n\nFINAL RANKING:\n1. Response A\n2. Response C";
/// assert_eq!(
///     parse_ranking(text),
///     ParsedRanking::Ordered { labels: vec![Label::from_index(0), Label::from_index(2)] }
/// );
/// assert_eq!(parse_ranking("I liked them all."), ParsedRanking::Unparsed);
/// ```
pub fn parse_ranking(response: &str) -> ParsedRanking {
    if let Some(parsed) = parse_json(response) {
        return parsed;
    }

    // A marker with no labels after it (e.g. prose that mentions the final
    // ranking after the list) falls back to the previous marker.
    let markers: Vec<_> = SECTION_MARKER.find_iter(response).collect();
    for marker in markers.iter().rev() {
        let section = &response[marker.end()..];

        let numbered = collect_labels(&NUMBERED_LABEL, section);
        if !numbered.is_empty() {
            return ParsedRanking::Ordered { labels: numbered };
        }

        let mentioned = collect_labels(&ANY_LABEL, section);
        if !mentioned.is_empty() {
            return ParsedRanking::Ordered { labels: mentioned };
        }
    }

    let mentioned = collect_labels(&ANY_LABEL, response);
    if mentioned.is_empty() {
        ParsedRanking::Unparsed
    } else {
        ParsedRanking::Ordered { labels: mentioned }
    }
}

fn collect_labels(pattern: &Regex, text: &str) -> Vec<Label> {
    let mut labels: Vec<Label> = Vec::new();
    for captures in pattern.captures_iter(text) {
        if let Some(label) = captures.get(1).and_then(|m| Label::from_letters(m.as_str()))
            && !labels.contains(&label)
        {
            labels.push(label);
        }
    }
    labels
}

/// Accept "Response C", "response c" or a bare "C"
fn normalize_label(raw: &str) -> Option<Label> {
    let trimmed = raw.trim();
    let suffix = match trimmed.get(..9) {
        Some(prefix) if prefix.eq_ignore_ascii_case("response ") => trimmed[9..].trim(),
        _ => trimmed,
    };
    Label::from_letters(suffix)
}

fn parse_json(response: &str) -> Option<ParsedRanking> {
    let start = response.find('{')?;
    let end = response[start..].rfind('}')?;
    let value: serde_json::Value = serde_json::from_str(&response[start..start + end + 1]).ok()?;

    if let Some(items) = value.get("ranking").and_then(|v| v.as_array()) {
        let mut labels: Vec<Label> = Vec::new();
        for label in items.iter().filter_map(|v| v.as_str()).filter_map(normalize_label) {
            if !labels.contains(&label) {
                labels.push(label);
            }
        }
        if !labels.is_empty() {
            return Some(ParsedRanking::Ordered { labels });
        }
    }

    if let Some(map) = value.get("scores").and_then(|v| v.as_object()) {
        let mut scores: Vec<LabelScore> = Vec::new();
        for (key, score) in map {
            if let (Some(label), Some(score)) = (normalize_label(key), score.as_f64())
                && score.is_finite()
                && !scores.iter().any(|s| s.label == label)
            {
                scores.push(LabelScore { label, score });
            }
        }
        if !scores.is_empty() {
            return Some(ParsedRanking::Scored { scores });
        }
    }

    None
}

#[cfg(test)]
mod tests {
    use super::*;

    fn l(letter: &str) -> Label {
        Label::from_letters(letter).unwrap()
    }

    fn ordered(letters: &[&str]) -> ParsedRanking {
        ParsedRanking::Ordered {
            labels: letters.iter().map(|s| l(s)).collect(),
        }
    }

    #[test]
    fn test_final_ranking_numbered_list() {
        let response = r#"Response A is accurate but verbose.
Response B misses the point.
Response C is concise.

FINAL RANKING:
1. Response C
2. Response A
3. Response B"#;
        assert_eq!(parse_ranking(response), ordered(&["C", "A", "B"]));
    }

    #[test]
    fn test_numbered_list_with_markdown_and_notes() {
        let response = "**Final Ranking:**\n1) **Response B** - best\n2) Response A - fine";
        assert_eq!(parse_ranking(response), ordered(&["B", "A"]));
    }

    #[test]
    fn test_section_without_numbers() {
        let response = "FINAL RANKING: Response B > Response A > Response C";
        assert_eq!(parse_ranking(response), ordered(&["B", "A", "C"]));
    }

    #[test]
    fn test_last_section_marker_wins() {
        let response = "I will end with a FINAL RANKING.\n\nResponse A is weak.\n\nFINAL RANKING:\n1. Response B\n2. Response A";
        assert_eq!(parse_ranking(response), ordered(&["B", "A"]));
    }

    #[test]
    fn test_trailing_mention_of_final_ranking_is_skipped() {
        let response = "Response A is good. Response B is weak. Response C is best.\n\n\
FINAL RANKING:\n1. Response C\n2. Response A\n3. Response B\n\n\
This final ranking reflects accuracy.";
        assert_eq!(parse_ranking(response), ordered(&["C", "A", "B"]));
    }

    #[test]
    fn test_free_text_fallback_first_mention() {
        let response = "Response B is clearly the strongest, then Response A. Response B again.";
        assert_eq!(parse_ranking(response), ordered(&["B", "A"]));
    }

    #[test]
    fn test_json_ranking() {
        let response = r#"```json
{"ranking": ["Response C", "a"]}
```"#;
        assert_eq!(parse_ranking(response), ordered(&["C", "A"]));
    }

    #[test]
    fn test_json_scores() {
        let response = r#"{"scores": {"Response A": 6, "Response B": 9.5}}"#;
        let parsed = parse_ranking(response);
        assert!(matches!(parsed, ParsedRanking::Scored { .. }));
        assert_eq!(parsed.tiers(), vec![vec![l("B")], vec![l("A")]]);
    }

    #[test]
    fn test_equal_scores_share_a_tier() {
        let response = r#"{"scores": {"Response C": 4, "Response A": 7, "Response B": 7}}"#;
        let tiers = parse_ranking(response).tiers();
        assert_eq!(tiers.len(), 2);
        assert_eq!(tiers[0].len(), 2);
        assert!(tiers[0].contains(&l("A")) && tiers[0].contains(&l("B")));
        assert_eq!(tiers[1], vec![l("C")]);
    }

    #[test]
    fn test_unparsed() {
        assert_eq!(parse_ranking(""), ParsedRanking::Unparsed);
        assert_eq!(parse_ranking("They are all equally good."), ParsedRanking::Unparsed);
        assert!(ParsedRanking::Unparsed.tiers().is_empty());
    }

    #[test]
    fn test_ignores_words_after_response() {
        // "Response ABOVE" is not a label
        assert_eq!(parse_ranking("See the Response ABOVE."), ParsedRanking::Unparsed);
    }

    #[test]
    fn test_serde_tagged() {
        let json = serde_json::to_string(&ordered(&["A"])).unwrap();
        assert_eq!(json, r#"{"kind":"ordered","labels":["Response A"]}"#);
        assert_eq!(
            serde_json::to_string(&ParsedRanking::Unparsed).unwrap(),
            r#"{"kind":"unparsed"}"#
        );
    }
}
