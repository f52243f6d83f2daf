//! Intra-document stylistic consistency check.
//!
//! Sections written by a person drift in vocabulary; generated text tends to
//! hold the same lexical richness from start to finish. The check compares
//! richness across sections and nudges the running probability.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::metrics::lexical_richness;
use crate::text;

/// Sections must be longer than this (in characters) to qualify.
pub const MIN_SECTION_CHARS: usize = 100;
/// Qualifying sections needed before the check runs.
pub const MIN_SECTIONS: usize = 3;
/// Variance above which the text is treated as stylistically varied.
pub const HIGH_VARIANCE: f64 = 50.0;
/// Variance below which the text is treated as uniform.
pub const LOW_VARIANCE: f64 = 15.0;
/// Probability adjustment applied in either direction.
pub const ADJUSTMENT: f64 = 15.0;

/// Outcome of the cross-section check.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct CrossValidationResult {
    /// Probability after the adjustment (not clamped here).
    pub adjusted_probability: f64,
    /// Population variance of per-section lexical richness.
    pub variance: f64,
    /// Change applied to the incoming probability.
    pub adjustment_delta: f64,
    /// Sections that qualified.
    pub section_count: usize,
    /// Explanation when the check could not run.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
}

/// Adjust `prior_probability` by the stylistic variance across sections.
#[tracing::instrument(skip_all, fields(text_len = text.len(), prior = prior_probability))]
pub fn cross_validate(text: &str, prior_probability: f64) -> CrossValidationResult {
    let richness: Vec<f64> = text::split_paragraphs(text)
        .into_iter()
        .filter(|s| s.chars().count() > MIN_SECTION_CHARS)
        .map(lexical_richness)
        .collect();

    if richness.len() < MIN_SECTIONS {
        return CrossValidationResult {
            adjusted_probability: prior_probability,
            variance: 0.0,
            adjustment_delta: 0.0,
            section_count: richness.len(),
            note: Some(format!(
                "Seções insuficientes para validação cruzada ({} de {MIN_SECTIONS} necessárias)",
                richness.len()
            )),
        };
    }

    let variance = variance(&richness);
    let delta = if variance > HIGH_VARIANCE {
        ADJUSTMENT
    } else if variance < LOW_VARIANCE {
        -ADJUSTMENT
    } else {
        0.0
    };
    tracing::debug!(variance, delta, sections = richness.len(), "cross-validation");

    CrossValidationResult {
        adjusted_probability: prior_probability + delta,
        variance,
        adjustment_delta: delta,
        section_count: richness.len(),
        note: None,
    }
}

fn variance(values: &[f64]) -> f64 {
    let n = values.len() as f64;
    let mean = values.iter().sum::<f64>() / n;
    values.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / n
}
