//! The aggregator.
//!
//! [`Analyzer::analyze`] validates the input, runs every extractor and
//! catalog as an isolated stage, blends the signals into one bounded human
//! probability, and packages the [`AnalysisReport`].
//!
//! The pass is deterministic and single-shot. Stage failures never abort
//! it: a failing extractor is replaced by its neutral default and the
//! substitution is recorded as a [`StageIssue`].

use std::fmt::Debug;
use std::panic::{AssertUnwindSafe, catch_unwind};
use std::sync::Arc;
use std::time::Duration;

use crate::context::{AdjustedContext, AnalysisMode, adjust_for_context};
use crate::cross_validation::{CrossValidationResult, cross_validate};
use crate::error::{AnalysisError, AnalysisResult, StageError};
use crate::explain;
use crate::highlight::HighlightBuilder;
use crate::metrics::{self, MetricBundle, PerplexityResult};
use crate::overrides::{OverrideReport, detect_overrides};
use crate::patterns::{
    CatalogScore, Catalogs, DEFAULT_BACKTRACK_LIMIT, DEFAULT_PATTERN_BUDGET_MS, catalogs_for,
};
use crate::report::{AnalysisReport, StageIssue};
use crate::text;

/// Starting score in content-type mode, before the threshold shift.
pub const GENERAL_BASE_SCORE: f64 = 50.0;
/// Starting score in academic-level mode.
pub const ACADEMIC_BASE_SCORE: f64 = 70.0;
/// Weight of the adjusted AI catalog score.
pub const AI_BLEND: f64 = 0.7;
/// Weight of the adjusted human catalog score.
pub const HUMAN_BLEND: f64 = 0.8;
/// Structural-penalty weight for academic writing.
pub const ACADEMIC_STRUCTURE_WEIGHT: f64 = 0.5;

/// Perplexity below this lowers the score.
pub const LOW_PERPLEXITY: f64 = 20.0;
/// Perplexity above this raises the score.
pub const HIGH_PERPLEXITY: f64 = 50.0;
/// Penalty for low perplexity.
pub const LOW_PERPLEXITY_PENALTY: f64 = 25.0;
/// Bonus for high perplexity.
pub const HIGH_PERPLEXITY_BONUS: f64 = 20.0;
/// Weight of the conclusion-pattern score.
pub const CONCLUSION_WEIGHT: f64 = 0.6;

/// Points lost per citation above the profile's maximum density.
pub const CITATION_EXCESS_WEIGHT: f64 = 5.0;
/// Points lost per point of complexity deviation.
pub const COMPLEXITY_DEVIATION_WEIGHT: f64 = 0.7;
/// Weight of the (profile-weighted) personal-voice score.
pub const VOICE_WEIGHT: f64 = 0.3;
/// Points lost per point of perfection above the profile threshold.
pub const PERFECTION_EXCESS_WEIGHT: f64 = 0.6;

const BASE_CONFIDENCE: f64 = 70.0;

/// Options for one analysis run.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AnalysisConfig {
    /// Mode and selector.
    pub mode: AnalysisMode,
    /// Time budget for a single catalog rule.
    pub pattern_budget: Duration,
    /// Backtrack limit handed to the regex engine.
    pub backtrack_limit: usize,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            mode: AnalysisMode::default(),
            pattern_budget: Duration::from_millis(DEFAULT_PATTERN_BUDGET_MS),
            backtrack_limit: DEFAULT_BACKTRACK_LIMIT,
        }
    }
}

impl AnalysisConfig {
    /// Replace the analysis mode.
    #[must_use]
    pub const fn with_mode(mut self, mode: AnalysisMode) -> Self {
        self.mode = mode;
        self
    }

    /// Replace the per-rule time budget.
    #[must_use]
    pub const fn with_pattern_budget(mut self, budget: Duration) -> Self {
        self.pattern_budget = budget;
        self
    }

    /// Replace the regex backtrack limit.
    #[must_use]
    pub const fn with_backtrack_limit(mut self, limit: usize) -> Self {
        self.backtrack_limit = limit;
        self
    }
}

/// Reusable analyzer holding compiled catalogs.
///
/// Analyses share no mutable state, so one analyzer can serve concurrent
/// callers.
#[derive(Debug, Clone)]
pub struct Analyzer {
    config: AnalysisConfig,
    catalogs: Arc<Catalogs>,
}

impl Default for Analyzer {
    fn default() -> Self {
        Self::new(AnalysisConfig::default())
    }
}

impl Analyzer {
    /// Create an analyzer, compiling catalogs for the configured backtrack
    /// limit (the default limit reuses a shared compilation).
    pub fn new(config: AnalysisConfig) -> Self {
        Self {
            catalogs: catalogs_for(config.backtrack_limit),
            config,
        }
    }

    /// The configuration in use.
    pub const fn config(&self) -> &AnalysisConfig {
        &self.config
    }

    /// The compiled catalogs.
    pub fn catalogs(&self) -> &Catalogs {
        &self.catalogs
    }

    /// Score `text` for human versus AI authorship.
    ///
    /// # Errors
    ///
    /// Returns [`AnalysisError::InsufficientInput`] when the trimmed text is
    /// shorter than the mode's minimum, and [`AnalysisError::EmptyInput`]
    /// when it contains no words at all.
    #[tracing::instrument(skip_all, fields(text_len = text.len(), mode = self.config.mode.selector()))]
    pub fn analyze(&self, text: &str) -> AnalysisResult<AnalysisReport> {
        let mode = self.config.mode;
        let length = text::char_length(text);
        let minimum = mode.min_chars();
        if length < minimum {
            return Err(AnalysisError::InsufficientInput { length, minimum });
        }
        if text::extract_words(text).is_empty() {
            return Err(AnalysisError::EmptyInput);
        }

        let budget = self.config.pattern_budget;
        let catalogs = &*self.catalogs;
        let mut stages = StageRunner::default();

        let counts = stages.run("counts", text::TextCounts::default(), || text::count(text));
        let citation_density = stages.metric("citation_density", || metrics::citation_density(text));
        let personal_voice_score = stages.metric("personal_voice", || metrics::personal_voice(text));
        let complexity_score = stages.metric("complexity", || metrics::lexical_complexity(text));
        let perfection_score = stages.metric("perfection", || metrics::perfection_score(text));
        let lexical_richness = stages.metric("lexical_richness", || metrics::lexical_richness(text));
        let structure = stages.run("structure", Default::default(), || {
            metrics::structural_penalty(text)
        });
        let perplexity = stages.run("perplexity", PerplexityResult::default(), || {
            metrics::perplexity_proxy(text)
        });
        let conclusion = stages.run("conclusion", Default::default(), || {
            metrics::conclusion_score(text, &catalogs.conclusion, budget)
        });
        stages.absorb("conclusion", &conclusion.failures);

        let ai_source = if mode.is_academic_level() {
            &catalogs.academic
        } else {
            &catalogs.general_ai
        };
        let ai_catalog = stages.run("ai_catalog", CatalogScore::default(), || {
            ai_source.score(text, budget)
        });
        stages.absorb("ai_catalog", &ai_catalog.failures);
        let human_catalog = stages.run("human_catalog", CatalogScore::default(), || {
            catalogs.human.score(text, budget)
        });
        stages.absorb("human_catalog", &human_catalog.failures);
        let overrides = stages.run("overrides", OverrideReport::default(), || {
            detect_overrides(text, catalogs, budget)
        });
        stages.absorb("overrides", &overrides.failures);

        let context = adjust_for_context(
            &mode,
            ai_catalog.normalized_score.max(0.0),
            human_catalog.normalized_score,
        );

        let mut bundle = MetricBundle {
            citation_density,
            personal_voice_score,
            complexity_score,
            perfection_score,
            lexical_richness,
            structure,
            perplexity,
            conclusion,
            ai_catalog,
            human_catalog,
            cross_validation: CrossValidationResult::default(),
        };

        let running = blend(&mode, &context, &bundle, &overrides);
        let cross = stages.run(
            "cross_validation",
            CrossValidationResult {
                adjusted_probability: running,
                ..CrossValidationResult::default()
            },
            || cross_validate(text, running),
        );
        let score = overrides.cap(cross.adjusted_probability);
        bundle.cross_validation = cross;

        let (floor, ceiling) = mode.probability_bounds();
        let human_probability = score.clamp(floor, ceiling).round() as u8;
        let ai_probability = 100 - human_probability;
        let confidence = confidence(&mode, &bundle, human_probability);

        let highlights = HighlightBuilder::new(text)
            .ai_leaning(&bundle.ai_catalog.matched_patterns)
            .human_leaning(&bundle.human_catalog.matched_patterns)
            .ai_leaning(&overrides.self_identification)
            .ai_leaning(&overrides.ai_note)
            .ai_leaning(&bundle.conclusion.matched_patterns)
            .build();
        let alerts = explain::alerts(&mode, &bundle, &overrides);
        let recommendations = explain::recommendations(&mode, human_probability, &alerts);
        let metric_cards =
            explain::metric_cards(&bundle, counts.words, counts.sentences, counts.paragraphs);
        let explanation = explain::explanation(&mode, &context, &bundle, &overrides);
        let verdict = explain::verdict(&mode, human_probability);

        tracing::info!(
            human_probability,
            confidence,
            verdict = %verdict.label,
            issues = stages.issues.len(),
            "analysis complete"
        );

        Ok(AnalysisReport {
            human_probability,
            ai_probability,
            confidence,
            verdict,
            mode,
            context,
            word_count: counts.words,
            sentence_count: counts.sentences,
            paragraph_count: counts.paragraphs,
            metrics: bundle,
            overrides,
            highlights,
            alerts,
            recommendations,
            metric_cards,
            explanation,
            stage_issues: stages.issues,
            fallback: false,
        })
    }
}

/// Analyze `text` with a one-off configuration.
///
/// # Errors
///
/// See [`Analyzer::analyze`].
pub fn analyze(text: &str, config: &AnalysisConfig) -> AnalysisResult<AnalysisReport> {
    Analyzer::new(*config).analyze(text)
}

/// Running score up to, but not including, cross-validation.
fn blend(
    mode: &AnalysisMode,
    context: &AdjustedContext,
    metrics: &MetricBundle,
    overrides: &OverrideReport,
) -> f64 {
    let base = if mode.is_academic_level() {
        ACADEMIC_BASE_SCORE
    } else {
        GENERAL_BASE_SCORE
    };
    let mut score = base + context.adjustment.threshold_shift;
    score -= context.ai_adjusted * AI_BLEND;
    score += context.human_adjusted * HUMAN_BLEND;

    if let Some(profile) = mode.profile() {
        score -= CITATION_EXCESS_WEIGHT
            * (metrics.citation_density - profile.max_citation_density).max(0.0);
        score -= COMPLEXITY_DEVIATION_WEIGHT
            * (metrics.complexity_score - profile.expected_complexity).abs();
        score += VOICE_WEIGHT * metrics.personal_voice_score * profile.personal_voice_weight;
        score -= PERFECTION_EXCESS_WEIGHT
            * (metrics.perfection_score - profile.perfection_threshold).max(0.0);
    }

    score += metrics.structure.penalty * structure_weight(mode);
    score = overrides.apply(score);

    if metrics.perplexity.note.is_none() {
        if metrics.perplexity.score < LOW_PERPLEXITY {
            score -= LOW_PERPLEXITY_PENALTY;
        } else if metrics.perplexity.score > HIGH_PERPLEXITY {
            score += HIGH_PERPLEXITY_BONUS;
        }
    }
    score -= metrics.conclusion.score * CONCLUSION_WEIGHT;

    tracing::debug!(score, "blended before cross-validation");
    overrides.cap(score)
}

fn structure_weight(mode: &AnalysisMode) -> f64 {
    match mode {
        AnalysisMode::ContentType {
            content_type: crate::context::ContentType::Academic,
        }
        | AnalysisMode::AcademicLevel { .. } => ACADEMIC_STRUCTURE_WEIGHT,
        AnalysisMode::ContentType { .. } => 1.0,
    }
}

/// Confidence estimate for a final probability, clamped to the mode's bounds.
pub fn confidence(mode: &AnalysisMode, metrics: &MetricBundle, human_probability: u8) -> u8 {
    let extreme = (f64::from(human_probability) - 50.0).abs() > 30.0;
    let mut confidence = BASE_CONFIDENCE;

    match mode.profile() {
        Some(profile) => {
            if metrics.citation_density > 10.0 || metrics.personal_voice_score > 50.0 {
                confidence += 10.0;
            }
            if (metrics.complexity_score - profile.expected_complexity).abs() < 20.0 {
                confidence += 8.0;
            }
            if metrics.ai_catalog.normalized_score > 30.0 {
                confidence += 12.0;
            }
            if extreme {
                confidence += 5.0;
            }
        }
        None => {
            if metrics.ai_catalog.normalized_score > 50.0
                || metrics.human_catalog.normalized_score > 50.0
            {
                confidence += 12.0;
            }
            if extreme {
                confidence += 8.0;
            }
        }
    }
    if metrics.perplexity.is_extreme() {
        confidence += 5.0;
    }

    let (floor, ceiling) = mode.confidence_bounds();
    confidence.clamp(floor, ceiling).round() as u8
}

/// Runs extractors in isolation and records what had to be substituted.
#[derive(Debug, Default)]
struct StageRunner {
    issues: Vec<StageIssue>,
}

impl StageRunner {
    /// Run a stage, replacing a panic with `default`.
    fn run<T: Debug>(&mut self, stage: &'static str, default: T, f: impl FnOnce() -> T) -> T {
        match catch_unwind(AssertUnwindSafe(f)) {
            Ok(value) => value,
            Err(payload) => {
                let reason = panic_message(payload.as_ref());
                self.substitute(StageError::Extractor { stage, reason }, &default);
                default
            }
        }
    }

    /// Run a scalar stage, also rejecting non-finite values.
    fn metric(&mut self, stage: &'static str, f: impl FnOnce() -> f64) -> f64 {
        let value = self.run(stage, 0.0, f);
        if value.is_finite() {
            value
        } else {
            self.substitute(
                StageError::Extractor {
                    stage,
                    reason: format!("non-finite value {value}"),
                },
                &0.0,
            );
            0.0
        }
    }

    fn substitute(&mut self, error: StageError, default: &impl Debug) {
        tracing::warn!(error = %error, "stage failed, substituting default");
        let stage = match &error {
            StageError::Extractor { stage, .. } => (*stage).to_string(),
            _ => "pattern".to_string(),
        };
        self.issues.push(StageIssue {
            stage,
            message: error.to_string(),
            substituted: Some(format!("{default:?}")),
        });
    }

    /// Record rule-level failures a catalog already absorbed.
    fn absorb(&mut self, stage: &str, failures: &[StageError]) {
        self.issues.extend(failures.iter().map(|e| StageIssue {
            stage: stage.to_string(),
            message: e.to_string(),
            substituted: None,
        }));
    }
}

fn panic_message(payload: &(dyn std::any::Any + Send)) -> String {
    payload
        .downcast_ref::<&str>()
        .map(|s| (*s).to_string())
        .or_else(|| payload.downcast_ref::<String>().cloned())
        .unwrap_or_else(|| "panic".to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::context::{AcademicLevel, ContentType, SubjectArea};
    use crate::explain::{AlertKind, VerdictCategory};
    use proptest::prelude::*;

    const NARRATIVE: &str = "Eu cresci numa cidade pequena do interior, onde a biblioteca abria só às terças. \
Na minha experiência, aquelas tardes silenciosas moldaram quem eu sou hoje como leitor. \
Lembro que minha avó me levava pela mão até o balcão de madeira escura. \
Eu escolhia sempre livros de aventura com capas gastas e páginas amareladas pelo tempo. \
Acho que foi ali que aprendi a gostar de histórias compridas e personagens teimosos. \
Quando eu era criança, passava horas sentado no chão frio lendo sem parar. \
A bibliotecária, dona Cida, fingia não ver quando eu levava quatro volumes escondidos. \
Ontem encontrei um daqueles exemplares num sebo perto do trabalho e quase chorei. \
O cheiro do papel trouxe de volta memórias que eu julgava perdidas faz tempo. \
Comprei o livro por cinco reais e li metade dele no ônibus voltando pra casa. \
Acho que nunca vou entender direito por que certas coisas pequenas nos marcam tanto. \
Minha mãe diz que eu exagero, mas ela também guarda cartas antigas numa caixa. \
Na semana passada mostrei o livro para meu sobrinho, que riu da capa desbotada. \
Ele prefere jogos no celular, e eu entendo, cada geração tem seus refúgios. \
Mesmo assim deixei o volume na estante dele, torcendo para que um dia abra. \
Não sei se vai funcionar, porém gosto de imaginar aquela cena acontecendo sem pressa. \
Talvez ele descubra sozinho o prazer de virar páginas numa tarde chuvosa qualquer. \
Escrevo isto porque percebi que minhas lembranças mais felizes envolvem papel, tinta e silêncio. \
Guardo até hoje o cartão da biblioteca antiga, com meu nome escrito a lápis pela bibliotecária. \
Às vezes abro a gaveta só para olhar aquela letra miúda e sorrir sozinho. \
Meu irmão mais velho jura que nunca pisou lá, embora eu lembre dele dormindo numa poltrona. \
Eu mesmo ainda procuro bibliotecas pequenas quando viajo para cidades desconhecidas do interior.";

    fn general() -> AnalysisConfig {
        AnalysisConfig::default()
    }

    fn academic(level: AcademicLevel) -> AnalysisConfig {
        AnalysisConfig::default().with_mode(AnalysisMode::academic(level, SubjectArea::Humanities))
    }

    #[test]
    fn personal_narrative_reads_as_human() {
        let report = analyze(NARRATIVE, &general()).unwrap();
        assert!(report.metrics.ai_catalog.matched_patterns.is_empty());
        assert!(report.human_probability > 65, "got {}", report.human_probability);
        assert_eq!(report.verdict.category, VerdictCategory::LikelyHuman);
        assert_eq!(report.verdict.label, "PROVÁVEL CONTEÚDO HUMANO");
        assert!(report.word_count >= 300);
        assert!(!report.fallback);
    }

    #[test]
    fn self_identification_overrides_everything() {
        let text = format!(
            "Como um modelo de IA, não tenho lembranças próprias, mas posso ajudar.\n\n{NARRATIVE}"
        );
        let report = analyze(&text, &general()).unwrap();
        assert!(report.human_probability <= 10);
        assert!(report.overrides.self_identified());
        assert!(
            report
                .alerts
                .iter()
                .any(|a| a.title == "Autoidentificação como IA")
        );
    }

    #[test]
    fn ai_note_block_is_flagged() {
        let text = "Resumo da unidade sobre fotossíntese e cadeia alimentar.\n\n**Nota de IA:** gerado por ChatGPT";
        let report = analyze(text, &general()).unwrap();
        assert!(report.human_probability <= 10);
        assert!(report.overrides.ai_note_detected());
        assert!(report.alerts.iter().any(|a| a.kind == AlertKind::Danger
            && a.title == "Nota Explícita de IA Detectada"));
    }

    #[test]
    fn ai_note_cap_survives_narrative() {
        let text = format!("{NARRATIVE}\n\nNota de IA: revisado automaticamente.");
        let report = analyze(&text, &general()).unwrap();
        assert!(report.human_probability <= 10);
    }

    #[test]
    fn ten_characters_is_insufficient_in_both_modes() {
        for config in [general(), academic(AcademicLevel::Masters)] {
            let err = analyze("curtinho!!", &config).unwrap_err();
            assert!(err.is_insufficient_input());
            assert!(matches!(
                err,
                AnalysisError::InsufficientInput { length: 10, .. }
            ));
        }
    }

    #[test]
    fn exactly_minimum_length_is_accepted() {
        let mut short = "abcde ".repeat(10);
        short.truncate(50);
        assert_eq!(text::char_length(&short), 50);
        assert!(analyze(&short, &general()).is_ok());

        let mut long = "abcde ".repeat(40);
        long.truncate(200);
        assert_eq!(text::char_length(&long), 200);
        assert!(analyze(&long, &academic(AcademicLevel::Undergrad)).is_ok());
    }

    #[test]
    fn punctuation_only_input_is_empty() {
        let text = "… — ".repeat(30);
        assert_eq!(analyze(&text, &general()), Err(AnalysisError::EmptyInput));
    }

    #[test]
    fn academic_mode_uses_its_own_bounds() {
        let report = analyze(NARRATIVE, &academic(AcademicLevel::Undergrad)).unwrap();
        assert!((10..=95).contains(&report.human_probability));
        assert!((50..=95).contains(&report.confidence));
        assert_eq!(report.context.adjustment.label, "Graduação");
    }

    #[test]
    fn broken_budget_is_absorbed_into_issues() {
        let config = general().with_pattern_budget(Duration::ZERO);
        let text = format!("Além disso, {NARRATIVE}");
        let report = analyze(&text, &config).unwrap();
        assert!(!report.stage_issues.is_empty());
        assert!(report.stage_issues.iter().all(|i| i.substituted.is_none()));
    }

    #[test]
    fn stage_runner_substitutes_panics() {
        let mut stages = StageRunner::default();
        let value = stages.metric("boom", || panic!("extractor exploded"));
        assert!(value.abs() < f64::EPSILON);
        assert_eq!(stages.issues.len(), 1);
        assert_eq!(stages.issues[0].stage, "boom");
        assert!(stages.issues[0].message.contains("extractor exploded"));
    }

    #[test]
    fn stage_runner_rejects_non_finite() {
        let mut stages = StageRunner::default();
        let value = stages.metric("nan", || f64::NAN);
        assert!(value.abs() < f64::EPSILON);
        assert_eq!(stages.issues[0].substituted.as_deref(), Some("0.0"));
    }

    #[test]
    fn structure_weight_is_halved_for_academic_writing() {
        let halved = [
            AnalysisMode::content_type(ContentType::Academic),
            AnalysisMode::academic(AcademicLevel::Doctoral, SubjectArea::Natural),
        ];
        for mode in halved {
            assert!((structure_weight(&mode) - 0.5).abs() < f64::EPSILON);
        }
        let full = AnalysisMode::content_type(ContentType::Business);
        assert!((structure_weight(&full) - 1.0).abs() < f64::EPSILON);
    }

    #[test]
    fn confidence_grows_with_extremity() {
        let mode = AnalysisMode::default();
        let metrics = MetricBundle::default();
        assert_eq!(confidence(&mode, &metrics, 50), 70);
        assert_eq!(confidence(&mode, &metrics, 85), 78);
        assert_eq!(confidence(&mode, &metrics, 10), 78);
    }

    #[test]
    fn academic_confidence_without_bonuses() {
        let mode = AnalysisMode::academic(AcademicLevel::Researcher, SubjectArea::Social);
        let metrics = MetricBundle::default();
        // Complexity 0 is 90 away from the researcher expectation.
        assert_eq!(confidence(&mode, &metrics, 50), 70);
    }

    /// A block of distinct filler tokens, plus `repeats` copies of one word.
    fn section(seed: &str, unique: usize, repeats: usize) -> String {
        let mut words: Vec<String> = (0..unique).map(|i| format!("{seed}{i}")).collect();
        words.extend(std::iter::repeat_n("igual".to_string(), repeats));
        words.join(" ")
    }

    #[test]
    fn canned_closing_lowers_final_score_by_weighted_conclusion() {
        let body = format!("{}\n\n{}", section("a", 30, 0), section("b", 30, 0));
        let plain = format!(
            "{body}\n\ndizem que estas mudanças alcancem a cidade inteira durante os próximos meses"
        );
        let canned = format!(
            "{body}\n\nespera-se que estas mudanças alcancem a sociedade como um todo nos próximos anos"
        );

        let plain = analyze(&plain, &general()).unwrap();
        let canned = analyze(&canned, &general()).unwrap();

        assert!(plain.metrics.conclusion.score.abs() < f64::EPSILON);
        assert!((canned.metrics.conclusion.score - 15.0).abs() < f64::EPSILON);
        assert!(plain.metrics.cross_validation.adjustment_delta.abs() < f64::EPSILON);
        assert!(canned.metrics.cross_validation.adjustment_delta.abs() < f64::EPSILON);
        // 15 * CONCLUSION_WEIGHT
        assert_eq!(plain.human_probability, 50);
        assert_eq!(canned.human_probability, 41);
    }

    #[test]
    fn section_variance_moves_final_score_both_ways() {
        let uniform = [section("a", 30, 0), section("b", 30, 0), section("c", 30, 0)].join("\n\n");
        let varied = [section("a", 30, 0), section("b", 20, 40), section("c", 30, 0)].join("\n\n");

        let uniform = analyze(&uniform, &general()).unwrap();
        let varied = analyze(&varied, &general()).unwrap();

        let low = &uniform.metrics.cross_validation;
        let high = &varied.metrics.cross_validation;
        assert!((low.adjustment_delta + crate::cross_validation::ADJUSTMENT).abs() < f64::EPSILON);
        assert!((high.adjustment_delta - crate::cross_validation::ADJUSTMENT).abs() < f64::EPSILON);
        assert!(
            (low.adjusted_probability - low.adjustment_delta
                - (high.adjusted_probability - high.adjustment_delta))
                .abs()
                < f64::EPSILON
        );
        assert_eq!(uniform.human_probability, 35);
        assert_eq!(varied.human_probability, 65);
    }

    const WORDS: &[&str] = &[
        "eu", "casa", "livro", "Além", "disso,", "portanto", "crucial", "talvez", "ontem",
        "escola", "professor", "análise", "resultado.", "pesquisa", "acho", "que", "Em",
        "suma,", "**negrito**", "1.", "\n\n", "fica", "evidente", "papel", "fundamental!",
    ];

    fn arb_text() -> impl Strategy<Value = String> {
        prop::collection::vec(prop::sample::select(WORDS), 40..200)
            .prop_map(|words| words.join(" "))
            .prop_filter("long enough", |t| text::char_length(t) >= 200)
    }

    fn arb_mode() -> impl Strategy<Value = AnalysisMode> {
        prop_oneof![
            prop::sample::select(ContentType::ALL.to_vec()).prop_map(AnalysisMode::content_type),
            prop::sample::select(AcademicLevel::ALL.to_vec())
                .prop_map(|l| AnalysisMode::academic(l, SubjectArea::Humanities)),
        ]
    }

    proptest! {
        #[test]
        fn probabilities_sum_to_one_hundred(text in arb_text(), mode in arb_mode()) {
            let report = analyze(&text, &general().with_mode(mode)).unwrap();
            prop_assert_eq!(
                u16::from(report.human_probability) + u16::from(report.ai_probability),
                100
            );
        }

        #[test]
        fn probability_and_confidence_stay_in_bounds(text in arb_text(), mode in arb_mode()) {
            let report = analyze(&text, &general().with_mode(mode)).unwrap();
            let (lo, hi) = mode.probability_bounds();
            let p = f64::from(report.human_probability);
            prop_assert!(p >= lo && p <= hi);
            let (clo, chi) = mode.confidence_bounds();
            let c = f64::from(report.confidence);
            prop_assert!(c >= clo && c <= chi);
        }

        #[test]
        fn analysis_is_idempotent(text in arb_text(), mode in arb_mode()) {
            let config = general().with_mode(mode);
            prop_assert_eq!(analyze(&text, &config), analyze(&text, &config));
        }

        #[test]
        fn confidence_is_monotonic_in_extremity(a in 0u8..=100, b in 0u8..=100, mode in arb_mode()) {
            let metrics = MetricBundle::default();
            let (near, far) = if a.abs_diff(50) <= b.abs_diff(50) { (a, b) } else { (b, a) };
            prop_assert!(confidence(&mode, &metrics, near) <= confidence(&mode, &metrics, far));
        }
    }
}
