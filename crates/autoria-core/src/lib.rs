//! Scoring engine for autoria.
//!
//! Scores a document for the likelihood that a person, rather than a
//! language model, wrote it. The score comes from weighted regex catalogs
//! and lexical statistics, reweighted by the document's context and
//! blended into a bounded probability with a confidence estimate.
//!
//! # Modules
//!
//! - [`patterns`] - Rule catalogs and the saturating matcher
//! - [`metrics`] - Per-document extractors (citations, voice, perplexity proxy, ...)
//! - [`context`] - Content-type and academic-level adjustment tables
//! - [`cross_validation`] - Stylistic variance across sections
//! - [`overrides`] - Self-identification and AI-note ceilings
//! - [`engine`] - The aggregator
//! - [`explain`] - Alerts, recommendations, metric cards, verdict
//! - [`report`] - The [`AnalysisReport`] record
//! - [`config`] - Configuration loading
//! - [`error`] - Error types and result aliases
//!
//! # Quick Start
//!
//! ```no_run
//! use autoria_core::{AnalysisConfig, analyze};
//!
//! let text = std::fs::read_to_string("redacao.txt").unwrap();
//! match analyze(&text, &AnalysisConfig::default()) {
//!     Ok(report) => println!("{}% humano ({})", report.human_probability, report.verdict.label),
//!     Err(e) => eprintln!("{e}"),
//! }
//! ```
#![deny(unsafe_code)]

pub mod config;
pub mod context;
pub mod cross_validation;
pub mod engine;
pub mod error;
pub mod explain;
pub mod highlight;
pub mod metrics;
pub mod overrides;
pub mod patterns;
pub mod report;
pub mod text;

pub use config::{Config, ConfigLoader, ConfigSources, LogLevel};
pub use context::{
    AcademicLevel, AdjustedContext, AnalysisMode, ContentType, ContextAdjustment, LevelProfile,
    ModeKind, SubjectArea, adjust_for_context, adjust_for_selector,
};
pub use cross_validation::{CrossValidationResult, cross_validate};
pub use engine::{AnalysisConfig, Analyzer, analyze};
pub use error::{AnalysisError, AnalysisResult, ConfigError, ConfigResult, StageError};
pub use explain::{Alert, AlertKind, CardTone, MetricCard, Recommendation, Severity, Verdict, VerdictCategory};
pub use highlight::{HighlightCategory, HighlightSpan};
pub use metrics::MetricBundle;
pub use overrides::OverrideReport;
pub use patterns::{Catalog, CatalogScore, Catalogs, PatternMatchResult, PatternRule, score_catalog};
pub use report::{AnalysisReport, StageIssue};

/// Default maximum input size: 5 MiB.
pub const DEFAULT_MAX_INPUT_BYTES: usize = 5 * 1024 * 1024;

/// JSON Schema of [`AnalysisReport`], the contract for external renderers.
pub fn report_schema() -> schemars::Schema {
    schemars::schema_for!(AnalysisReport)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn schema_describes_report_fields() {
        let schema = serde_json::to_value(report_schema()).unwrap();
        let props = &schema["properties"];
        for field in ["human_probability", "ai_probability", "confidence", "metrics", "highlights"] {
            assert!(props.get(field).is_some(), "missing {field}");
        }
    }
}
