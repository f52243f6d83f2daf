//! Human-readable output derived from the metrics.
//!
//! Nothing here feeds back into scoring. Every generator is a pure function
//! of the mode, the metric bundle, the override report, and the final
//! probability.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::context::{AcademicLevel, AdjustedContext, AnalysisMode, LevelProfile};
use crate::metrics::MetricBundle;
use crate::overrides::OverrideReport;

/// Visual category of an alert or recommendation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "lowercase")]
pub enum AlertKind {
    /// Positive finding.
    Success,
    /// Neutral information.
    Info,
    /// Worth a closer look.
    Warning,
    /// Strong evidence of generated text.
    Danger,
}

/// How much an alert should weigh on the reader.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    /// Informational.
    Low,
    /// Noteworthy.
    Medium,
    /// Critical.
    High,
}

/// A categorized finding.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct Alert {
    /// Visual category.
    pub kind: AlertKind,
    /// Weight of the finding.
    pub severity: Severity,
    /// Short title.
    pub title: String,
    /// One-line detail.
    pub message: String,
}

impl Alert {
    fn new(kind: AlertKind, severity: Severity, title: &str, message: impl Into<String>) -> Self {
        Self {
            kind,
            severity,
            title: title.to_string(),
            message: message.into(),
        }
    }
}

/// A suggested next step for the reviewer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct Recommendation {
    /// Visual category.
    pub kind: AlertKind,
    /// The suggestion.
    pub text: String,
}

impl Recommendation {
    fn new(kind: AlertKind, text: impl Into<String>) -> Self {
        Self {
            kind,
            text: text.into(),
        }
    }
}

/// Display tone of a metric card.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "lowercase")]
pub enum CardTone {
    /// Within the expected range.
    Good,
    /// Borderline.
    Warning,
    /// Outside the expected range.
    Danger,
    /// Purely informational.
    Info,
}

/// A headline metric for display.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct MetricCard {
    /// Metric name.
    pub title: String,
    /// Formatted value.
    pub value: String,
    /// Display tone.
    pub tone: CardTone,
    /// Short qualitative label.
    pub label: String,
}

/// Verdict category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "kebab-case")]
pub enum VerdictCategory {
    /// Most signals point to a human author.
    LikelyHuman,
    /// Signals disagree.
    Mixed,
    /// Most signals point to generated text.
    LikelyAi,
}

/// Final categorical reading of the probability.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct Verdict {
    /// Category.
    pub category: VerdictCategory,
    /// Headline label.
    pub label: String,
    /// One-sentence description.
    pub description: String,
}

/// Probability thresholds (likely human, mixed) for the mode.
pub const fn verdict_thresholds(mode: &AnalysisMode) -> (u8, u8) {
    if mode.is_academic_level() {
        (70, 40)
    } else {
        (65, 35)
    }
}

/// Categorize a final human probability.
pub fn verdict(mode: &AnalysisMode, human_probability: u8) -> Verdict {
    let (human_min, mixed_min) = verdict_thresholds(mode);
    let category = if human_probability >= human_min {
        VerdictCategory::LikelyHuman
    } else if human_probability >= mixed_min {
        VerdictCategory::Mixed
    } else {
        VerdictCategory::LikelyAi
    };

    let (label, description) = match (mode.is_academic_level(), category) {
        (true, VerdictCategory::LikelyHuman) => (
            "PROVÁVEL AUTORIA ESTUDANTIL",
            "O trabalho apresenta características consistentes com autoria humana",
        ),
        (true, VerdictCategory::Mixed) => (
            "CARACTERÍSTICAS MISTAS",
            "Recomenda-se análise cuidadosa e diálogo com o estudante",
        ),
        (true, VerdictCategory::LikelyAi) => (
            "FORTES INDÍCIOS DE USO DE IA",
            "Múltiplos indicadores sugerem uso de inteligência artificial",
        ),
        (false, VerdictCategory::LikelyHuman) => (
            "PROVÁVEL CONTEÚDO HUMANO",
            "O texto apresenta características consistentes com escrita humana",
        ),
        (false, VerdictCategory::Mixed) => (
            "CONTEÚDO MISTO",
            "Sinais humanos e de IA aparecem juntos; revise com atenção",
        ),
        (false, VerdictCategory::LikelyAi) => (
            "PROVÁVEL CONTEÚDO DE IA",
            "Múltiplos indicadores sugerem geração por inteligência artificial",
        ),
    };

    Verdict {
        category,
        label: label.to_string(),
        description: description.to_string(),
    }
}

/// Alert thresholds shared by both modes.
const AI_PATTERN_ALERT: f64 = 40.0;
const HUMAN_PATTERN_ALERT: f64 = 30.0;
const STRUCTURE_ALERT: f64 = -15.0;
const LOW_PERPLEXITY: f64 = 20.0;
const REPEATED_ENDINGS_ALERT: usize = 2;
const CONCLUSION_ALERT: f64 = 20.0;

/// Build the alert list for a finished analysis.
pub fn alerts(mode: &AnalysisMode, metrics: &MetricBundle, overrides: &OverrideReport) -> Vec<Alert> {
    let mut alerts = Vec::new();

    if let Some(first) = overrides.self_identification.first() {
        let snippet = first.example_snippets.first().map_or("", String::as_str);
        alerts.push(Alert::new(
            AlertKind::Danger,
            Severity::High,
            "Autoidentificação como IA",
            format!("O texto se apresenta como inteligência artificial: \"{snippet}\""),
        ));
    }
    if overrides.ai_note_detected() {
        alerts.push(Alert::new(
            AlertKind::Danger,
            Severity::High,
            "Nota Explícita de IA Detectada",
            "O texto contém uma marcação declarando geração por IA",
        ));
    }

    if let AnalysisMode::AcademicLevel { level, .. } = mode {
        academic_alerts(&mut alerts, *level, &level.profile(), metrics);
    }

    if metrics.ai_catalog.normalized_score > AI_PATTERN_ALERT {
        alerts.push(Alert::new(
            AlertKind::Danger,
            Severity::High,
            "Padrões de IA Detectados",
            "Múltiplos padrões característicos de textos gerados por IA",
        ));
    }
    if metrics.human_catalog.normalized_score > HUMAN_PATTERN_ALERT {
        alerts.push(Alert::new(
            AlertKind::Success,
            Severity::Low,
            "Fortes Indicadores Humanos",
            "Marcas de experiência pessoal e escrita espontânea",
        ));
    }
    if metrics.structure.penalty <= STRUCTURE_ALERT {
        alerts.push(Alert::new(
            AlertKind::Warning,
            Severity::Medium,
            "Formatação Excessiva",
            format!(
                "{} títulos, {} trechos em negrito, {} itens numerados",
                metrics.structure.headings,
                metrics.structure.bold_spans,
                metrics.structure.numbered_items
            ),
        ));
    }
    if metrics.perplexity.note.is_none() && metrics.perplexity.score < LOW_PERPLEXITY {
        alerts.push(Alert::new(
            AlertKind::Warning,
            Severity::Medium,
            "Baixa Perplexidade",
            format!(
                "Diversidade lexical por frase de apenas {:.0}%",
                metrics.perplexity.score
            ),
        ));
    }
    if metrics.perplexity.similar_ending_count >= REPEATED_ENDINGS_ALERT {
        alerts.push(Alert::new(
            AlertKind::Warning,
            Severity::Medium,
            "Finais de Frase Repetidos",
            format!(
                "{} pares de frases consecutivas terminam da mesma forma",
                metrics.perplexity.similar_ending_count
            ),
        ));
    }
    if metrics.conclusion.score >= CONCLUSION_ALERT {
        alerts.push(Alert::new(
            AlertKind::Warning,
            Severity::Medium,
            "Conclusão Formulaica",
            "O parágrafo final usa fórmulas de encerramento típicas de IA",
        ));
    }
    let delta = metrics.cross_validation.adjustment_delta;
    if delta < 0.0 {
        alerts.push(Alert::new(
            AlertKind::Info,
            Severity::Low,
            "Estilo Uniforme Entre Seções",
            format!(
                "Variância de riqueza lexical de {:.1} entre seções",
                metrics.cross_validation.variance
            ),
        ));
    } else if delta > 0.0 {
        alerts.push(Alert::new(
            AlertKind::Success,
            Severity::Low,
            "Variação Estilística Natural",
            format!(
                "Variância de riqueza lexical de {:.1} entre seções",
                metrics.cross_validation.variance
            ),
        ));
    }

    if alerts.is_empty() {
        alerts.push(Alert::new(
            AlertKind::Success,
            Severity::Low,
            "Nenhum alerta crítico",
            "O texto não apresentou desvios significativos",
        ));
    }
    alerts
}

fn academic_alerts(
    alerts: &mut Vec<Alert>,
    level: AcademicLevel,
    profile: &LevelProfile,
    metrics: &MetricBundle,
) {
    let density = metrics.citation_density;
    if density > profile.max_citation_density * 1.5 {
        let severity = if density > profile.max_citation_density * 2.0 {
            Severity::High
        } else {
            Severity::Medium
        };
        alerts.push(Alert::new(
            AlertKind::Warning,
            severity,
            "Densidade de Citações Elevada",
            format!(
                "{density:.1} citações por 1000 palavras (esperado: {})",
                profile.max_citation_density
            ),
        ));
    }

    let complexity = metrics.complexity_score;
    if complexity > profile.expected_complexity + 25.0 {
        alerts.push(Alert::new(
            AlertKind::Warning,
            Severity::High,
            "Complexidade Incompatível",
            format!(
                "Complexidade lexical: {complexity:.0}% (esperado: {}%)",
                profile.expected_complexity
            ),
        ));
    } else if complexity < profile.expected_complexity - 20.0 {
        alerts.push(Alert::new(
            AlertKind::Info,
            Severity::Low,
            "Complexidade Abaixo do Esperado",
            format!(
                "Complexidade lexical: {complexity:.0}% (esperado: {}%)",
                profile.expected_complexity
            ),
        ));
    }

    let voice = metrics.personal_voice_score;
    if voice < 20.0 && level == AcademicLevel::Undergrad {
        alerts.push(Alert::new(
            AlertKind::Warning,
            Severity::Medium,
            "Pouca Voz Pessoal",
            format!("Voz pessoal: {voice:.0}% (espera-se mais posicionamento próprio)"),
        ));
    }

    if metrics.perfection_score > profile.perfection_threshold + 20.0 {
        alerts.push(Alert::new(
            AlertKind::Danger,
            Severity::High,
            "Estrutura Excessivamente Perfeita",
            "Padrão comum em textos gerados por IA",
        ));
    }

    if voice > 60.0 {
        alerts.push(Alert::new(
            AlertKind::Success,
            Severity::Low,
            "Forte Voz Pessoal Detectada",
            "Bom indicador de autoria humana",
        ));
    }
}

/// Build the reviewer's next steps.
pub fn recommendations(mode: &AnalysisMode, human_probability: u8, alerts: &[Alert]) -> Vec<Recommendation> {
    let academic = mode.is_academic_level();
    let (human_min, mixed_min) = verdict_thresholds(mode);
    let mut recs = Vec::new();

    if human_probability >= human_min {
        recs.push(Recommendation::new(
            AlertKind::Success,
            if academic {
                "Alta probabilidade de autoria estudantil"
            } else {
                "Alta probabilidade de autoria humana"
            },
        ));
    } else if human_probability >= mixed_min {
        recs.push(Recommendation::new(
            AlertKind::Warning,
            "Características mistas - análise cuidadosa recomendada",
        ));
    } else {
        recs.push(Recommendation::new(
            AlertKind::Danger,
            "Fortes indícios de uso de IA - ação recomendada",
        ));
    }

    let critical = alerts.iter().filter(|a| a.severity == Severity::High).count();
    if critical > 0 {
        let who = if academic { "o estudante" } else { "o autor" };
        recs.push(Recommendation::new(
            AlertKind::Danger,
            format!("{critical} alertas críticos - considere uma conversa com {who}"),
        ));
    }

    if matches!(
        mode,
        AnalysisMode::AcademicLevel {
            level: AcademicLevel::Undergrad,
            ..
        }
    ) && human_probability < 50
    {
        recs.push(Recommendation::new(
            AlertKind::Info,
            "Para graduação: verificar consistência com habilidades anteriores",
        ));
    }

    recs.push(Recommendation::new(
        AlertKind::Info,
        if academic {
            "Solicite que o estudante explique pontos-chave do trabalho"
        } else {
            "Solicite que o autor explique pontos-chave do texto"
        },
    ));
    recs
}

/// Build the headline metric cards.
pub fn metric_cards(
    metrics: &MetricBundle,
    words: usize,
    sentences: usize,
    paragraphs: usize,
) -> Vec<MetricCard> {
    let tiered = |value: f64, high: f64, mid: f64, labels: [&str; 3], tones: [CardTone; 3]| {
        let idx = if value > high {
            0
        } else if value > mid {
            1
        } else {
            2
        };
        (tones[idx], labels[idx].to_string())
    };
    const RISING: [CardTone; 3] = [CardTone::Danger, CardTone::Warning, CardTone::Good];
    const FALLING: [CardTone; 3] = [CardTone::Good, CardTone::Warning, CardTone::Danger];

    let citation = metrics.citation_density;
    let voice = metrics.personal_voice_score;
    let complexity = metrics.complexity_score;
    let perfection = metrics.perfection_score;
    let patterns = metrics.ai_catalog.normalized_score.max(0.0);

    let mut cards = Vec::with_capacity(6);
    let (tone, label) = tiered(citation, 8.0, 5.0, ["Alta", "Moderada", "Normal"], RISING);
    cards.push(MetricCard {
        title: "Densidade de Citações".to_string(),
        value: format!("{citation:.1}/1000"),
        tone,
        label,
    });
    let (tone, label) = tiered(voice, 60.0, 30.0, ["Forte", "Moderada", "Fraca"], FALLING);
    cards.push(MetricCard {
        title: "Voz Pessoal".to_string(),
        value: format!("{voice:.0}%"),
        tone,
        label,
    });
    let (tone, label) = tiered(complexity, 80.0, 50.0, ["Alta", "Média", "Baixa"], RISING);
    cards.push(MetricCard {
        title: "Complexidade".to_string(),
        value: format!("{complexity:.0}%"),
        tone,
        label,
    });
    let (tone, label) = tiered(perfection, 60.0, 40.0, ["Alta", "Média", "Normal"], RISING);
    cards.push(MetricCard {
        title: "Perfeição Estrutural".to_string(),
        value: format!("{perfection:.0}%"),
        tone,
        label,
    });
    let (tone, label) = tiered(patterns, 40.0, 20.0, ["Fortes", "Moderados", "Fracos"], RISING);
    cards.push(MetricCard {
        title: "Padrões de IA".to_string(),
        value: format!("{patterns:.0}%"),
        tone,
        label,
    });
    cards.push(MetricCard {
        title: "Estatísticas".to_string(),
        value: words.to_string(),
        tone: CardTone::Info,
        label: format!("{sentences} frases, {paragraphs} parágrafos"),
    });
    cards
}

/// Describe, in order, each signal that moved the score.
pub fn explanation(
    mode: &AnalysisMode,
    context: &AdjustedContext,
    metrics: &MetricBundle,
    overrides: &OverrideReport,
) -> Vec<String> {
    let mut lines = vec![format!(
        "Contexto {}: multiplicador de IA {:.1}, multiplicador humano {:.1}, deslocamento {:+.0}",
        context.adjustment.label,
        context.adjustment.ai_multiplier,
        context.adjustment.human_multiplier,
        context.adjustment.threshold_shift
    )];

    let ai = &metrics.ai_catalog;
    if !ai.matched_patterns.is_empty() {
        lines.push(format!(
            "{} padrão(ões) de IA encontrados; pontuação normalizada {:.1} (ajustada {:.1})",
            ai.matched_patterns.len(),
            ai.normalized_score,
            context.ai_adjusted
        ));
    }
    let human = &metrics.human_catalog;
    if !human.matched_patterns.is_empty() {
        lines.push(format!(
            "{} indicador(es) humano(s) encontrados; pontuação normalizada {:.1} (ajustada {:.1})",
            human.matched_patterns.len(),
            human.normalized_score,
            context.human_adjusted
        ));
    }

    if let Some(profile) = mode.profile() {
        lines.push(format!(
            "Perfil acadêmico: citações {:.1}/1000 (máx. {}), complexidade {:.0}% (esperada {}%), voz pessoal {:.0}, perfeição {:.0} (limite {})",
            metrics.citation_density,
            profile.max_citation_density,
            metrics.complexity_score,
            profile.expected_complexity,
            metrics.personal_voice_score,
            metrics.perfection_score,
            profile.perfection_threshold
        ));
    }

    if metrics.structure.penalty < 0.0 {
        lines.push(format!(
            "Penalidade estrutural de {:.1} por formatação densa",
            metrics.structure.penalty
        ));
    }
    if overrides.self_identified() {
        lines.push("Autoidentificação como IA limita a probabilidade humana a 5%".to_string());
    }
    if overrides.ai_note_detected() {
        lines.push("Nota explícita de IA reduz a probabilidade humana para no máximo 10%".to_string());
    }

    match &metrics.perplexity.note {
        Some(note) => lines.push(note.clone()),
        None => lines.push(format!(
            "Perplexidade estimada em {:.0} ({} final(is) de frase repetido(s))",
            metrics.perplexity.score, metrics.perplexity.similar_ending_count
        )),
    }

    if metrics.conclusion.score > 0.0 {
        lines.push(format!(
            "Conclusão formulaica: {:.0} pontos",
            metrics.conclusion.score
        ));
    } else if let Some(note) = &metrics.conclusion.note {
        lines.push(note.clone());
    }

    match &metrics.cross_validation.note {
        Some(note) => lines.push(note.clone()),
        None => lines.push(format!(
            "Validação cruzada em {} seções: variância {:.1}, ajuste {:+.0}",
            metrics.cross_validation.section_count,
            metrics.cross_validation.variance,
            metrics.cross_validation.adjustment_delta
        )),
    }

    lines
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::context::{ContentType, SubjectArea};

    fn general() -> AnalysisMode {
        AnalysisMode::content_type(ContentType::Academic)
    }

    fn undergrad() -> AnalysisMode {
        AnalysisMode::academic(AcademicLevel::Undergrad, SubjectArea::Humanities)
    }

    #[test]
    fn verdict_boundaries_follow_mode() {
        assert_eq!(verdict(&general(), 65).category, VerdictCategory::LikelyHuman);
        assert_eq!(verdict(&general(), 64).category, VerdictCategory::Mixed);
        assert_eq!(verdict(&general(), 34).category, VerdictCategory::LikelyAi);
        assert_eq!(verdict(&undergrad(), 69).category, VerdictCategory::Mixed);
        assert_eq!(verdict(&undergrad(), 70).label, "PROVÁVEL AUTORIA ESTUDANTIL");
        assert_eq!(verdict(&general(), 80).label, "PROVÁVEL CONTEÚDO HUMANO");
    }

    #[test]
    fn quiet_document_gets_single_success_alert() {
        let alerts = alerts(&general(), &MetricBundle::default(), &OverrideReport::default());
        assert_eq!(alerts.len(), 1);
        assert_eq!(alerts[0].kind, AlertKind::Success);
    }

    #[test]
    fn undergrad_weak_voice_is_flagged() {
        let metrics = MetricBundle {
            complexity_score: 40.0,
            ..MetricBundle::default()
        };
        let alerts = alerts(&undergrad(), &metrics, &OverrideReport::default());
        assert!(alerts.iter().any(|a| a.title == "Pouca Voz Pessoal"));
    }

    #[test]
    fn citation_alert_severity_scales() {
        let mut metrics = MetricBundle {
            citation_density: 5.0,
            complexity_score: 40.0,
            personal_voice_score: 50.0,
            ..MetricBundle::default()
        };
        let medium = alerts(&undergrad(), &metrics, &OverrideReport::default());
        assert_eq!(medium[0].severity, Severity::Medium);

        metrics.citation_density = 7.0;
        let high = alerts(&undergrad(), &metrics, &OverrideReport::default());
        assert_eq!(high[0].severity, Severity::High);
    }

    #[test]
    fn recommendations_count_critical_alerts() {
        let critical = vec![
            Alert::new(AlertKind::Danger, Severity::High, "a", "a"),
            Alert::new(AlertKind::Danger, Severity::High, "b", "b"),
        ];
        let recs = recommendations(&undergrad(), 30, &critical);
        assert_eq!(recs[0].kind, AlertKind::Danger);
        assert!(recs[1].text.starts_with("2 alertas críticos"));
        assert!(recs[2].text.starts_with("Para graduação"));
        assert_eq!(recs.len(), 4);
    }

    #[test]
    fn cards_use_tiered_tones() {
        let metrics = MetricBundle {
            citation_density: 9.0,
            personal_voice_score: 45.0,
            ..MetricBundle::default()
        };
        let cards = metric_cards(&metrics, 120, 8, 3);
        assert_eq!(cards.len(), 6);
        assert_eq!(cards[0].tone, CardTone::Danger);
        assert_eq!(cards[1].tone, CardTone::Warning);
        assert_eq!(cards[5].label, "8 frases, 3 parágrafos");
    }

    #[test]
    fn explanation_starts_with_context() {
        let mode = general();
        let context = mode.adjustment().apply(0.0, 0.0);
        let lines = explanation(&mode, &context, &MetricBundle::default(), &OverrideReport::default());
        assert!(lines[0].starts_with("Contexto Acadêmico"));
    }
}
