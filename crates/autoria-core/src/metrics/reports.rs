//! Records produced by the metric extractors.
//!
//! All structs derive `Serialize`, `Deserialize`, and `JsonSchema` for
//! use in both CLI JSON output and MCP tool responses.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::cross_validation::CrossValidationResult;
use crate::error::StageError;
use crate::patterns::{CatalogScore, PatternMatchResult};

/// Every signal computed for one document.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct MetricBundle {
    /// Parenthetical citations per 1000 words.
    pub citation_density: f64,
    /// First-person and reflective language, 0 to 100.
    pub personal_voice_score: f64,
    /// Percentage of words with eight or more characters.
    pub complexity_score: f64,
    /// Structural polish bonus, 0 to 60.
    pub perfection_score: f64,
    /// Unique words as a percentage of all words.
    pub lexical_richness: f64,
    /// Heading, bold, and numbered-list density.
    pub structure: StructureReport,
    /// Sentence-level diversity and repetition.
    pub perplexity: PerplexityResult,
    /// Canned phrasing in the closing paragraph.
    pub conclusion: ConclusionResult,
    /// AI-leaning catalog score (academic catalog in academic-level mode).
    pub ai_catalog: CatalogScore,
    /// Human-leaning catalog score.
    pub human_catalog: CatalogScore,
    /// Stylistic variance across sections.
    pub cross_validation: CrossValidationResult,
}

/// Markdown structure counts and the penalty they imply.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct StructureReport {
    /// Markdown headings.
    pub headings: usize,
    /// Bold (`**strong**`) spans.
    pub bold_spans: usize,
    /// Items of ordered lists.
    pub numbered_items: usize,
    /// Combined penalty, between -30 and 0.
    pub penalty: f64,
}

/// Perplexity proxy outcome.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct PerplexityResult {
    /// Score between 0 and 100; 50 when there is too little text.
    pub score: f64,
    /// Consecutive long sentences sharing the same three-word ending.
    pub similar_ending_count: usize,
    /// Sentences with at least five tokens.
    pub sentence_count: usize,
    /// Explanation when the proxy could not be assessed.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
}

impl Default for PerplexityResult {
    fn default() -> Self {
        Self {
            score: 50.0,
            similar_ending_count: 0,
            sentence_count: 0,
            note: None,
        }
    }
}

impl PerplexityResult {
    /// Whether the score sits in either tail (below 20 or above 80).
    pub fn is_extreme(&self) -> bool {
        self.score < 20.0 || self.score > 80.0
    }
}

/// Conclusion-pattern outcome.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct ConclusionResult {
    /// Sum of matched rule weights, capped at 50.
    pub score: f64,
    /// Rules that matched, with spans relative to the whole document.
    pub matched_patterns: Vec<PatternMatchResult>,
    /// Explanation when the closing paragraph could not be assessed.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
    /// Rules skipped during the scan.
    #[serde(skip)]
    pub failures: Vec<StageError>,
}
