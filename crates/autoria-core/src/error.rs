//! Error types for autoria-core.
//!
//! Two families live here. [`ConfigError`] and [`AnalysisError`] propagate
//! to callers. [`StageError`] never does: the engine absorbs it, logs it,
//! substitutes the stage's neutral default, and records a
//! [`StageIssue`](crate::report::StageIssue) on the report.

use thiserror::Error;

/// Errors that can occur when working with configuration.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Failed to deserialize configuration.
    #[error("invalid configuration: {0}")]
    Deserialize(#[from] Box<figment::Error>),

    /// Configuration file not found after searching all locations.
    #[error("no configuration file found")]
    NotFound,
}

/// Result type alias using [`ConfigError`].
pub type ConfigResult<T> = Result<T, ConfigError>;

/// Errors that abort an analysis and reach the caller.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AnalysisError {
    /// The text is shorter than the minimum the selected mode accepts.
    #[error("insufficient input: {length} characters (minimum: {minimum})")]
    InsufficientInput {
        /// Characters in the trimmed input.
        length: usize,
        /// Minimum required by the analysis mode.
        minimum: usize,
    },

    /// The input has no scorable content at all.
    #[error("no scorable text in input")]
    EmptyInput,
}

impl AnalysisError {
    /// Whether the caller can recover by supplying more text.
    pub const fn is_insufficient_input(&self) -> bool {
        matches!(self, Self::InsufficientInput { .. })
    }
}

/// Result type alias using [`AnalysisError`].
pub type AnalysisResult<T> = Result<T, AnalysisError>;

/// Per-stage failures, always absorbed by the engine.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum StageError {
    /// A catalog rule failed to compile or to evaluate.
    #[error("pattern '{rule}' failed: {reason}")]
    PatternEvaluation {
        /// Description of the offending rule.
        rule: String,
        /// Underlying regex engine message.
        reason: String,
    },

    /// A catalog rule exceeded its evaluation time budget.
    #[error("pattern '{rule}' exceeded its {budget_ms} ms budget")]
    PatternTimeout {
        /// Description of the offending rule.
        rule: String,
        /// Budget that was exceeded.
        budget_ms: u64,
    },

    /// A metric extractor failed or produced an unusable value.
    #[error("extractor '{stage}' failed: {reason}")]
    Extractor {
        /// Name of the extractor stage.
        stage: &'static str,
        /// What went wrong.
        reason: String,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn insufficient_input_message_names_both_lengths() {
        let err = AnalysisError::InsufficientInput {
            length: 10,
            minimum: 200,
        };
        let msg = err.to_string();
        assert!(msg.contains("10"));
        assert!(msg.contains("200"));
        assert!(err.is_insufficient_input());
    }

    #[test]
    fn empty_input_is_not_recoverable_by_more_text() {
        assert!(!AnalysisError::EmptyInput.is_insufficient_input());
    }

    #[test]
    fn stage_errors_render_rule_and_budget() {
        let err = StageError::PatternTimeout {
            rule: "Repetição vocabular".to_string(),
            budget_ms: 250,
        };
        assert!(err.to_string().contains("250 ms"));
    }
}
