//! Canned-conclusion detection.

use std::time::Duration;

use super::reports::ConclusionResult;
use crate::patterns::{Catalog, MatchSpan};
use crate::text;

/// Paragraphs must be longer than this (in characters) to qualify.
pub const MIN_PARAGRAPH_CHARS: usize = 50;
/// Qualifying paragraphs needed before the closing one is examined.
pub const MIN_QUALIFYING_PARAGRAPHS: usize = 2;
/// Highest conclusion score.
pub const SCORE_CAP: f64 = 50.0;

/// Scan the last qualifying paragraph for canned conclusion phrasing.
///
/// Each matching rule adds its weight once, however often it matches.
#[tracing::instrument(skip_all, fields(text_len = text.len()))]
pub fn conclusion_score(text: &str, catalog: &Catalog, budget: Duration) -> ConclusionResult {
    let qualifying: Vec<&str> = text::split_paragraphs(text)
        .into_iter()
        .filter(|p| p.chars().count() > MIN_PARAGRAPH_CHARS)
        .collect();

    let Some(last) = qualifying.last().filter(|_| qualifying.len() >= MIN_QUALIFYING_PARAGRAPHS)
    else {
        return ConclusionResult {
            note: Some(format!(
                "Parágrafos insuficientes para avaliar a conclusão ({} de {MIN_QUALIFYING_PARAGRAPHS} necessários)",
                qualifying.len()
            )),
            ..ConclusionResult::default()
        };
    };

    let offset = text::offset_of(text, last);
    let scan = catalog.score(last, budget);
    let mut matched = scan.matched_patterns;
    for result in &mut matched {
        for span in &mut result.spans {
            *span = MatchSpan {
                start: span.start + offset,
                end: span.end + offset,
            };
        }
    }

    let score = matched
        .iter()
        .map(|m| f64::from(m.weight))
        .sum::<f64>()
        .clamp(0.0, SCORE_CAP);

    ConclusionResult {
        score,
        matched_patterns: matched,
        note: None,
        failures: scan.failures,
    }
}
