//! Highlight spans for the analyzed text.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::patterns::PatternMatchResult;

/// Most spans kept per report.
pub const MAX_HIGHLIGHTS: usize = 200;

/// Which way a highlighted span leans.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, JsonSchema,
)]
#[serde(rename_all = "UPPERCASE")]
pub enum HighlightCategory {
    /// Evidence of generated text.
    Ai,
    /// Evidence of human authorship.
    Human,
}

/// A highlighted region of the analyzed text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct HighlightSpan {
    /// Byte offset where the span starts.
    pub start: usize,
    /// Byte offset one past the end of the span.
    pub end: usize,
    /// The highlighted text.
    pub source_text: String,
    /// Which way the span leans.
    pub category: HighlightCategory,
    /// Description of the rule that produced the span.
    pub description: String,
}

/// Accumulates spans from several rule sets.
#[derive(Debug)]
pub struct HighlightBuilder<'a> {
    text: &'a str,
    spans: Vec<HighlightSpan>,
}

impl<'a> HighlightBuilder<'a> {
    /// Start collecting spans over `text`.
    pub const fn new(text: &'a str) -> Self {
        Self {
            text,
            spans: Vec::new(),
        }
    }

    /// Add every match of an AI-leaning rule set.
    ///
    /// Negative-weight rules in the set lean the other way.
    pub fn ai_leaning(self, matches: &[PatternMatchResult]) -> Self {
        self.extend(matches, HighlightCategory::Ai, HighlightCategory::Human)
    }

    /// Add every match of a human-leaning rule set.
    ///
    /// Negative-weight rules in the set lean the other way.
    pub fn human_leaning(self, matches: &[PatternMatchResult]) -> Self {
        self.extend(matches, HighlightCategory::Human, HighlightCategory::Ai)
    }

    fn extend(
        mut self,
        matches: &[PatternMatchResult],
        positive: HighlightCategory,
        negative: HighlightCategory,
    ) -> Self {
        for result in matches {
            let category = if result.weight >= 0 { positive } else { negative };
            for span in &result.spans {
                let Some(source) = self.text.get(span.start..span.end) else {
                    continue;
                };
                self.spans.push(HighlightSpan {
                    start: span.start,
                    end: span.end,
                    source_text: source.to_string(),
                    category,
                    description: result.description.clone(),
                });
            }
        }
        self
    }

    /// Sorted, deduplicated spans, truncated to [`MAX_HIGHLIGHTS`].
    ///
    /// One span survives per region and category, whichever order the
    /// rule sets were added in.
    pub fn build(mut self) -> Vec<HighlightSpan> {
        self.spans.sort_by(|a, b| {
            a.start
                .cmp(&b.start)
                .then(a.end.cmp(&b.end))
                .then(a.category.cmp(&b.category))
                .then(a.description.cmp(&b.description))
        });
        self.spans
            .dedup_by(|a, b| a.start == b.start && a.end == b.end && a.category == b.category);
        self.spans.truncate(MAX_HIGHLIGHTS);
        self.spans
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::patterns::MatchSpan;

    fn result(description: &str, weight: i32, spans: &[(usize, usize)]) -> PatternMatchResult {
        PatternMatchResult {
            description: description.to_string(),
            weight,
            match_count: spans.len(),
            contributed_score: 0.0,
            example_snippets: Vec::new(),
            spans: spans
                .iter()
                .map(|&(start, end)| MatchSpan { start, end })
                .collect(),
        }
    }

    #[test]
    fn spans_are_sorted_and_labelled() {
        let text = "Além disso, eu acho que sim.";
        let spans = HighlightBuilder::new(text)
            .human_leaning(&[result("eu", 3, &[(13, 15)])])
            .ai_leaning(&[result("aditivo", 12, &[(0, 12)])])
            .build();
        assert_eq!(spans.len(), 2);
        assert_eq!(spans[0].category, HighlightCategory::Ai);
        assert_eq!(spans[0].source_text, "Além disso,");
        assert_eq!(spans[1].source_text, "eu");
    }

    #[test]
    fn negative_weights_flip_category() {
        let text = "talvez";
        let spans = HighlightBuilder::new(text)
            .ai_leaning(&[result("incerteza", -30, &[(0, 6)])])
            .build();
        assert_eq!(spans[0].category, HighlightCategory::Human);
    }

    #[test]
    fn duplicates_and_bad_offsets_are_dropped() {
        let text = "abc";
        let spans = HighlightBuilder::new(text)
            .ai_leaning(&[result("x", 1, &[(0, 3), (0, 3), (2, 9)])])
            .build();
        assert_eq!(spans.len(), 1);
    }

    #[test]
    fn interleaved_categories_on_one_region_collapse() {
        let text = "talvez";
        let spans = HighlightBuilder::new(text)
            .ai_leaning(&[result("a-ia", 5, &[(0, 6)])])
            .human_leaning(&[result("b-humano", 5, &[(0, 6)])])
            .ai_leaning(&[result("c-ia", 5, &[(0, 6)])])
            .build();
        assert_eq!(spans.len(), 2);
        assert_eq!(spans[0].category, HighlightCategory::Ai);
        assert_eq!(spans[0].description, "a-ia");
        assert_eq!(spans[1].category, HighlightCategory::Human);
    }

    #[test]
    fn category_serializes_uppercase() {
        assert_eq!(
            serde_json::to_string(&HighlightCategory::Human).unwrap(),
            "\"HUMAN\""
        );
    }
}
