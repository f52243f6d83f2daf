//! Context adjustment tables.
//!
//! An analysis runs in exactly one of two modes. Content-type mode keys the
//! adjustment on the kind of document ([`ContentType`]); academic-level mode
//! keys it on the author's level ([`AcademicLevel`]) and additionally carries
//! a [`LevelProfile`] with the expectations the aggregator compares against.
//! The tables are fixed at compile time.

use std::borrow::Cow;

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Kind of document being analyzed (content-type mode).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Deserialize, Serialize, JsonSchema)]
#[serde(rename_all = "kebab-case")]
#[cfg_attr(feature = "clap", derive(clap::ValueEnum))]
pub enum ContentType {
    /// Essays, papers, and coursework.
    #[default]
    Academic,
    /// Documentation and technical writing.
    Technical,
    /// Fiction, poetry, and other creative prose.
    Creative,
    /// Reports, emails, and corporate communication.
    Business,
    /// Informal messages and posts.
    Casual,
}

impl ContentType {
    /// All content types, in display order.
    pub const ALL: [Self; 5] = [
        Self::Academic,
        Self::Technical,
        Self::Creative,
        Self::Business,
        Self::Casual,
    ];

    /// Returns the selector string for this content type.
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Academic => "academic",
            Self::Technical => "technical",
            Self::Creative => "creative",
            Self::Business => "business",
            Self::Casual => "casual",
        }
    }

    /// Resolve a selector string, falling back to [`ContentType::Academic`].
    pub fn from_selector(selector: &str) -> Self {
        Self::parse(selector).unwrap_or_default()
    }

    fn parse(selector: &str) -> Option<Self> {
        let selector = selector.trim();
        Self::ALL
            .into_iter()
            .find(|c| c.as_str().eq_ignore_ascii_case(selector))
    }

    /// The adjustment applied for this content type.
    pub const fn adjustment(&self) -> ContextAdjustment {
        match self {
            Self::Academic => ContextAdjustment::new(1.0, 1.0, 0.0, "Acadêmico"),
            Self::Technical => ContextAdjustment::new(0.8, 1.1, 5.0, "Técnico"),
            Self::Creative => ContextAdjustment::new(1.2, 0.9, 0.0, "Criativo"),
            Self::Business => ContextAdjustment::new(0.9, 1.0, 0.0, "Empresarial"),
            Self::Casual => ContextAdjustment::new(1.3, 0.8, -5.0, "Casual"),
        }
    }
}

impl std::fmt::Display for ContentType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Author's academic level (academic-level mode).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Deserialize, Serialize, JsonSchema)]
#[serde(rename_all = "kebab-case")]
#[cfg_attr(feature = "clap", derive(clap::ValueEnum))]
pub enum AcademicLevel {
    /// Undergraduate coursework.
    Undergrad,
    /// Master's level.
    #[default]
    Masters,
    /// Doctoral level.
    Doctoral,
    /// Established researcher.
    Researcher,
}

impl AcademicLevel {
    /// All levels, from least to most advanced.
    pub const ALL: [Self; 4] = [
        Self::Undergrad,
        Self::Masters,
        Self::Doctoral,
        Self::Researcher,
    ];

    /// Returns the selector string for this level.
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Undergrad => "undergrad",
            Self::Masters => "masters",
            Self::Doctoral => "doctoral",
            Self::Researcher => "researcher",
        }
    }

    /// Resolve a selector string, falling back to [`AcademicLevel::Masters`].
    pub fn from_selector(selector: &str) -> Self {
        Self::parse(selector).unwrap_or_default()
    }

    fn parse(selector: &str) -> Option<Self> {
        let selector = selector.trim();
        Self::ALL
            .into_iter()
            .find(|l| l.as_str().eq_ignore_ascii_case(selector))
    }

    /// Expectations for documents written at this level.
    pub const fn profile(&self) -> LevelProfile {
        match self {
            Self::Undergrad => LevelProfile {
                max_citation_density: 3.0,
                expected_complexity: 40.0,
                personal_voice_weight: 1.2,
                perfection_threshold: 30.0,
            },
            Self::Masters => LevelProfile {
                max_citation_density: 5.0,
                expected_complexity: 60.0,
                personal_voice_weight: 1.0,
                perfection_threshold: 40.0,
            },
            Self::Doctoral => LevelProfile {
                max_citation_density: 8.0,
                expected_complexity: 80.0,
                personal_voice_weight: 0.8,
                perfection_threshold: 50.0,
            },
            Self::Researcher => LevelProfile {
                max_citation_density: 10.0,
                expected_complexity: 90.0,
                personal_voice_weight: 0.6,
                perfection_threshold: 60.0,
            },
        }
    }

    /// The adjustment applied for this level.
    ///
    /// The human multiplier mirrors the profile's personal-voice weight.
    pub const fn adjustment(&self) -> ContextAdjustment {
        let voice = self.profile().personal_voice_weight;
        match self {
            Self::Undergrad => ContextAdjustment::new(1.1, voice, 0.0, "Graduação"),
            Self::Masters => ContextAdjustment::new(1.0, voice, 0.0, "Mestrado"),
            Self::Doctoral => ContextAdjustment::new(0.9, voice, 0.0, "Doutorado"),
            Self::Researcher => ContextAdjustment::new(0.8, voice, 0.0, "Pesquisador"),
        }
    }
}

impl std::fmt::Display for AcademicLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Subject area. Carried for display only; never affects scoring.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Deserialize, Serialize, JsonSchema)]
#[serde(rename_all = "kebab-case")]
#[cfg_attr(feature = "clap", derive(clap::ValueEnum))]
pub enum SubjectArea {
    /// Humanities.
    #[default]
    Humanities,
    /// Social sciences.
    Social,
    /// Natural sciences.
    Natural,
    /// Applied sciences and engineering.
    Applied,
}

impl SubjectArea {
    /// Returns the selector string for this area.
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Humanities => "humanities",
            Self::Social => "social",
            Self::Natural => "natural",
            Self::Applied => "applied",
        }
    }

    /// Portuguese display label.
    pub const fn label(&self) -> &'static str {
        match self {
            Self::Humanities => "Ciências Humanas",
            Self::Social => "Ciências Sociais",
            Self::Natural => "Ciências Naturais",
            Self::Applied => "Ciências Aplicadas",
        }
    }
}

impl std::fmt::Display for SubjectArea {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Which configuration axis selects the context (used by config files).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize, JsonSchema)]
#[serde(rename_all = "kebab-case")]
#[cfg_attr(feature = "clap", derive(clap::ValueEnum))]
pub enum ModeKind {
    /// Key the adjustment on the document's content type.
    #[default]
    ContentType,
    /// Key the adjustment on the author's academic level.
    AcademicLevel,
}

/// The analysis mode together with its selector.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize, JsonSchema)]
#[serde(tag = "mode", rename_all = "kebab-case")]
pub enum AnalysisMode {
    /// General analysis keyed on content type.
    ContentType {
        /// The document's content type.
        content_type: ContentType,
    },
    /// Academic analysis keyed on the author's level.
    AcademicLevel {
        /// The author's level.
        level: AcademicLevel,
        /// Display-only subject area.
        subject: SubjectArea,
    },
}

impl Default for AnalysisMode {
    fn default() -> Self {
        Self::ContentType {
            content_type: ContentType::default(),
        }
    }
}

impl AnalysisMode {
    /// Shorthand for content-type mode.
    pub const fn content_type(content_type: ContentType) -> Self {
        Self::ContentType { content_type }
    }

    /// Shorthand for academic-level mode.
    pub const fn academic(level: AcademicLevel, subject: SubjectArea) -> Self {
        Self::AcademicLevel { level, subject }
    }

    /// Whether this is academic-level mode.
    pub const fn is_academic_level(&self) -> bool {
        matches!(self, Self::AcademicLevel { .. })
    }

    /// The context adjustment selected by this mode.
    pub const fn adjustment(&self) -> ContextAdjustment {
        match self {
            Self::ContentType { content_type } => content_type.adjustment(),
            Self::AcademicLevel { level, .. } => level.adjustment(),
        }
    }

    /// The level profile, present only in academic-level mode.
    pub const fn profile(&self) -> Option<LevelProfile> {
        match self {
            Self::ContentType { .. } => None,
            Self::AcademicLevel { level, .. } => Some(level.profile()),
        }
    }

    /// Minimum input length, in characters of the trimmed text.
    pub const fn min_chars(&self) -> usize {
        match self {
            Self::ContentType { .. } => MIN_CHARS_CONTENT_TYPE,
            Self::AcademicLevel { .. } => MIN_CHARS_ACADEMIC_LEVEL,
        }
    }

    /// Bounds applied to the final human probability.
    pub const fn probability_bounds(&self) -> (f64, f64) {
        match self {
            Self::ContentType { .. } => (5.0, 95.0),
            Self::AcademicLevel { .. } => (10.0, 95.0),
        }
    }

    /// Bounds applied to the confidence estimate.
    pub const fn confidence_bounds(&self) -> (f64, f64) {
        match self {
            Self::ContentType { .. } => (30.0, 95.0),
            Self::AcademicLevel { .. } => (50.0, 95.0),
        }
    }

    /// Selector string of the active axis.
    pub const fn selector(&self) -> &'static str {
        match self {
            Self::ContentType { content_type } => content_type.as_str(),
            Self::AcademicLevel { level, .. } => level.as_str(),
        }
    }
}

/// Minimum characters accepted in content-type mode.
pub const MIN_CHARS_CONTENT_TYPE: usize = 50;

/// Minimum characters accepted in academic-level mode.
pub const MIN_CHARS_ACADEMIC_LEVEL: usize = 200;

/// Multipliers and threshold shift selected for one analysis run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct ContextAdjustment {
    /// Multiplier applied to the AI catalog score.
    pub ai_multiplier: f64,
    /// Multiplier applied to the human catalog score.
    pub human_multiplier: f64,
    /// Added to the base score before blending.
    pub threshold_shift: f64,
    /// Display label.
    pub label: Cow<'static, str>,
}

impl ContextAdjustment {
    const fn new(
        ai_multiplier: f64,
        human_multiplier: f64,
        threshold_shift: f64,
        label: &'static str,
    ) -> Self {
        Self {
            ai_multiplier,
            human_multiplier,
            threshold_shift,
            label: Cow::Borrowed(label),
        }
    }

    /// Apply the multipliers to a pair of catalog scores.
    pub fn apply(self, ai_score: f64, human_score: f64) -> AdjustedContext {
        AdjustedContext {
            ai_adjusted: ai_score * self.ai_multiplier,
            human_adjusted: human_score * self.human_multiplier,
            adjustment: self,
        }
    }
}

/// A [`ContextAdjustment`] together with the reweighted scores.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct AdjustedContext {
    /// The adjustment that was applied.
    #[serde(flatten)]
    pub adjustment: ContextAdjustment,
    /// AI catalog score after the multiplier.
    pub ai_adjusted: f64,
    /// Human catalog score after the multiplier.
    pub human_adjusted: f64,
}

/// Per-level expectations used in academic-level mode.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct LevelProfile {
    /// Citations per 1000 words above which the text is penalized.
    pub max_citation_density: f64,
    /// Expected lexical complexity percentage.
    pub expected_complexity: f64,
    /// Weight applied to the personal-voice score.
    pub personal_voice_weight: f64,
    /// Perfection score above which the text is penalized.
    pub perfection_threshold: f64,
}

/// Reweight catalog scores for the given mode.
pub fn adjust_for_context(mode: &AnalysisMode, ai_score: f64, human_score: f64) -> AdjustedContext {
    mode.adjustment().apply(ai_score, human_score)
}

/// Reweight catalog scores using a raw selector string.
///
/// Content-type selectors are tried first, then academic levels. Anything
/// else resolves to the `academic` content type.
pub fn adjust_for_selector(selector: &str, ai_score: f64, human_score: f64) -> AdjustedContext {
    let adjustment = ContentType::parse(selector)
        .map(|c| c.adjustment())
        .or_else(|| AcademicLevel::parse(selector).map(|l| l.adjustment()))
        .unwrap_or_else(|| ContentType::default().adjustment());
    adjustment.apply(ai_score, human_score)
}
