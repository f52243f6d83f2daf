//! Categorical overrides.
//!
//! Two markers settle the question regardless of every other signal: the
//! text calling itself an AI, and an explicit note declaring it generated.
//! Either one caps the human probability. The caps are ceilings, so the
//! engine re-applies them after every later adjustment.

use std::time::Duration;

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::error::StageError;
use crate::patterns::{Catalogs, PatternMatchResult};

/// Ceiling applied when the text identifies itself as an AI.
pub const SELF_IDENTIFICATION_CEILING: f64 = 5.0;
/// Minimum drop applied when an AI note is present.
pub const AI_NOTE_DROP: f64 = 40.0;
/// Ceiling applied when an AI note is present.
pub const AI_NOTE_CEILING: f64 = 10.0;

/// Which overrides fired, and where.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct OverrideReport {
    /// Self-identification phrases found.
    pub self_identification: Vec<PatternMatchResult>,
    /// Explicit AI-note markers found.
    pub ai_note: Vec<PatternMatchResult>,
    /// Rules skipped during the scan.
    #[serde(skip)]
    pub failures: Vec<StageError>,
}

impl OverrideReport {
    /// Whether the text identifies itself as an AI.
    pub fn self_identified(&self) -> bool {
        !self.self_identification.is_empty()
    }

    /// Whether an explicit AI note is present.
    pub fn ai_note_detected(&self) -> bool {
        !self.ai_note.is_empty()
    }

    /// Whether any override fired.
    pub fn any(&self) -> bool {
        self.self_identified() || self.ai_note_detected()
    }

    /// Apply the ceilings to a running score.
    ///
    /// A score already below a ceiling is left alone, except that an AI note
    /// always costs at least [`AI_NOTE_DROP`] the first time it is applied.
    pub fn apply(&self, score: f64) -> f64 {
        let mut score = score;
        if self.ai_note_detected() {
            score = (score - AI_NOTE_DROP).min(AI_NOTE_CEILING);
        }
        if self.self_identified() {
            score = score.min(SELF_IDENTIFICATION_CEILING);
        }
        score
    }

    /// Re-apply the ceilings without the one-off drop.
    pub fn cap(&self, score: f64) -> f64 {
        let mut score = score;
        if self.ai_note_detected() {
            score = score.min(AI_NOTE_CEILING);
        }
        if self.self_identified() {
            score = score.min(SELF_IDENTIFICATION_CEILING);
        }
        score
    }
}

/// Scan `text` for override markers.
#[tracing::instrument(skip_all, fields(text_len = text.len()))]
pub fn detect_overrides(text: &str, catalogs: &Catalogs, budget: Duration) -> OverrideReport {
    let self_id = catalogs.self_identification.score(text, budget);
    let note = catalogs.ai_note.score(text, budget);

    let mut failures = self_id.failures;
    failures.extend(note.failures);

    let report = OverrideReport {
        self_identification: self_id.matched_patterns,
        ai_note: note.matched_patterns,
        failures,
    };
    if report.any() {
        tracing::info!(
            self_identified = report.self_identified(),
            ai_note = report.ai_note_detected(),
            "override marker found"
        );
    }
    report
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::patterns::DEFAULT_BACKTRACK_LIMIT;

    fn detect(text: &str) -> OverrideReport {
        let catalogs = Catalogs::compile(DEFAULT_BACKTRACK_LIMIT);
        detect_overrides(text, &catalogs, Duration::from_millis(250))
    }

    #[test]
    fn clean_text_triggers_nothing() {
        let report = detect("Escrevi este texto sozinho, numa tarde chuvosa.");
        assert!(!report.any());
        assert!((report.apply(80.0) - 80.0).abs() < f64::EPSILON);
    }

    #[test]
    fn self_identification_caps_at_five() {
        let report = detect("Como um modelo de IA, não posso opinar.");
        assert!(report.self_identified());
        assert!((report.apply(95.0) - SELF_IDENTIFICATION_CEILING).abs() < f64::EPSILON);
        assert!((report.apply(3.0) - 3.0).abs() < f64::EPSILON);
    }

    #[test]
    fn ai_note_drops_and_caps() {
        let report = detect("**Nota de IA:** gerado por ChatGPT");
        assert!(report.ai_note_detected());
        assert!((report.apply(90.0) - AI_NOTE_CEILING).abs() < f64::EPSILON);
        assert!((report.apply(45.0) - 5.0).abs() < f64::EPSILON);
    }

    #[test]
    fn cap_does_not_drop_again() {
        let report = detect("Nota de IA: texto assistido.");
        assert!((report.cap(8.0) - 8.0).abs() < f64::EPSILON);
        assert!((report.cap(30.0) - AI_NOTE_CEILING).abs() < f64::EPSILON);
    }
}
