//! The analysis report record.
//!
//! [`AnalysisReport`] is the data contract handed to callers and to
//! external renderers; its JSON Schema is available via
//! [`report_schema`](crate::report_schema).

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::context::{AdjustedContext, AnalysisMode};
use crate::engine::AnalysisConfig;
use crate::explain::{Alert, AlertKind, MetricCard, Recommendation, Severity, Verdict, VerdictCategory};
use crate::highlight::HighlightSpan;
use crate::metrics::MetricBundle;
use crate::overrides::OverrideReport;
use crate::text;

/// A stage error that was absorbed during analysis.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct StageIssue {
    /// Stage that failed.
    pub stage: String,
    /// What went wrong.
    pub message: String,
    /// The neutral value used instead, if the whole stage was replaced.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub substituted: Option<String>,
}

/// Complete outcome of one analysis.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct AnalysisReport {
    /// Probability of human authorship, in whole percent.
    pub human_probability: u8,
    /// Probability of generated text; always `100 - human_probability`.
    pub ai_probability: u8,
    /// Confidence in the estimate, in whole percent.
    pub confidence: u8,
    /// Categorical reading of the probability.
    pub verdict: Verdict,
    /// Mode the analysis ran in.
    pub mode: AnalysisMode,
    /// Context adjustment and the reweighted catalog scores.
    pub context: AdjustedContext,
    /// Whitespace-delimited words.
    pub word_count: usize,
    /// Sentences.
    pub sentence_count: usize,
    /// Blank-line delimited paragraphs.
    pub paragraph_count: usize,
    /// Every computed signal.
    pub metrics: MetricBundle,
    /// Categorical overrides that fired.
    pub overrides: OverrideReport,
    /// Highlighted spans, ordered by position.
    pub highlights: Vec<HighlightSpan>,
    /// Categorized findings.
    pub alerts: Vec<Alert>,
    /// Suggested next steps.
    pub recommendations: Vec<Recommendation>,
    /// Headline metrics for display.
    pub metric_cards: Vec<MetricCard>,
    /// Plain-language account of what moved the score.
    pub explanation: Vec<String>,
    /// Stage errors absorbed along the way.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub stage_issues: Vec<StageIssue>,
    /// Whether this is the neutral result shown when analysis failed.
    #[serde(default)]
    pub fallback: bool,
}

impl AnalysisReport {
    /// Neutral 50/50 result for a text that could not be analyzed.
    ///
    /// Hosts show this whenever [`analyze`](crate::analyze) returns an error.
    pub fn fallback(text: &str, config: &AnalysisConfig, reason: impl std::fmt::Display) -> Self {
        let mode = config.mode;
        let counts = text::count(text);
        let (confidence_floor, _) = mode.confidence_bounds();

        Self {
            human_probability: 50,
            ai_probability: 50,
            confidence: confidence_floor as u8,
            verdict: Verdict {
                category: VerdictCategory::Mixed,
                label: "ANÁLISE INDISPONÍVEL".to_string(),
                description: "Não foi possível concluir a análise; resultado neutro exibido"
                    .to_string(),
            },
            mode,
            context: mode.adjustment().apply(0.0, 0.0),
            word_count: counts.words,
            sentence_count: counts.sentences,
            paragraph_count: counts.paragraphs,
            metrics: MetricBundle::default(),
            overrides: OverrideReport::default(),
            highlights: Vec::new(),
            alerts: vec![Alert {
                kind: AlertKind::Warning,
                severity: Severity::Low,
                title: "Análise Limitada".to_string(),
                message: format!("Análise limitada: {reason}"),
            }],
            recommendations: vec![Recommendation {
                kind: AlertKind::Info,
                text: "Análise básica devido a limitações técnicas".to_string(),
            }],
            metric_cards: Vec::new(),
            explanation: Vec::new(),
            stage_issues: Vec::new(),
            fallback: true,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::context::{AcademicLevel, SubjectArea};

    #[test]
    fn fallback_is_neutral() {
        let config = AnalysisConfig::default();
        let report = AnalysisReport::fallback("curto demais. mesmo.", &config, "texto curto");
        assert_eq!(report.human_probability, 50);
        assert_eq!(report.ai_probability, 50);
        assert_eq!(report.confidence, 30);
        assert_eq!(report.word_count, 3);
        assert_eq!(report.sentence_count, 2);
        assert!(report.fallback);
        assert!(report.alerts[0].message.contains("texto curto"));
    }

    #[test]
    fn fallback_confidence_follows_mode_floor() {
        let config = AnalysisConfig::default()
            .with_mode(AnalysisMode::academic(AcademicLevel::Doctoral, SubjectArea::Applied));
        let report = AnalysisReport::fallback("", &config, "vazio");
        assert_eq!(report.confidence, 50);
        assert_eq!(report.word_count, 0);
    }

    #[test]
    fn issues_are_omitted_from_json_when_empty() {
        let report = AnalysisReport::fallback("texto", &AnalysisConfig::default(), "x");
        let json = serde_json::to_value(&report).unwrap();
        assert!(json.get("stage_issues").is_none());
        assert_eq!(json["fallback"], true);
        assert_eq!(json["mode"]["mode"], "content-type");
    }
}
