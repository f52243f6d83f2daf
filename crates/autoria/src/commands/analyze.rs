//! Analyze command: authorship scoring for one or more files.

use anyhow::bail;
use autoria_core::config::Config;
use autoria_core::{
    AcademicLevel, AlertKind, AnalysisConfig, AnalysisError, AnalysisMode, AnalysisReport,
    Analyzer, CardTone, ContentType, HighlightCategory, ModeKind, SubjectArea, VerdictCategory,
};
use camino::Utf8PathBuf;
use clap::Args;
use indicatif::{ProgressBar, ProgressStyle};
use owo_colors::OwoColorize;
use serde::Serialize;
use tracing::{debug, info, instrument, warn};

use super::{extract_text, source_label};
use crate::history::{AnalysisHistory, HistoryEntry};

/// Arguments for the `analyze` subcommand.
#[derive(Args, Debug, Default)]
pub struct AnalyzeArgs {
    /// Files to analyze (.txt or .md; `-` reads stdin).
    #[arg(required = true, value_name = "FILES")]
    pub files: Vec<Utf8PathBuf>,

    /// Analysis mode (implied by --content-type or --level when omitted).
    #[arg(long, value_enum)]
    pub mode: Option<ModeKind>,

    /// Content type for content-type mode.
    #[arg(long, value_enum)]
    pub content_type: Option<ContentType>,

    /// Author's level for academic-level mode.
    #[arg(long, value_enum)]
    pub level: Option<AcademicLevel>,

    /// Subject area (display only).
    #[arg(long, value_enum)]
    pub subject: Option<SubjectArea>,

    /// Print a summary table after all files.
    #[arg(long)]
    pub summary: bool,

    /// Show highlighted passages.
    #[arg(long)]
    pub highlights: bool,
}

impl AnalyzeArgs {
    /// Resolve the analysis mode from flags over configuration.
    ///
    /// `--content-type` implies content-type mode and `--level`/`--subject`
    /// imply academic-level mode unless `--mode` says otherwise.
    pub fn resolve_mode(&self, config: &Config) -> AnalysisMode {
        let implied = if self.level.is_some() || self.subject.is_some() {
            Some(ModeKind::AcademicLevel)
        } else if self.content_type.is_some() {
            Some(ModeKind::ContentType)
        } else {
            None
        };
        match self.mode.or(implied).unwrap_or(config.mode) {
            ModeKind::ContentType => {
                AnalysisMode::content_type(self.content_type.unwrap_or(config.content_type))
            }
            ModeKind::AcademicLevel => AnalysisMode::academic(
                self.level.unwrap_or(config.academic_level),
                self.subject.unwrap_or(config.subject_area),
            ),
        }
    }
}

#[derive(Serialize)]
struct Summary {
    analyzed: usize,
    failed: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    mean_human_probability: Option<f64>,
}

#[derive(Serialize)]
struct BatchOutput<'a> {
    results: Vec<&'a HistoryEntry>,
    #[serde(skip_serializing_if = "Option::is_none")]
    summary: Option<Summary>,
}

/// Run the analysis over every input file.
///
/// Inputs that cannot be analyzed get the neutral fallback report; the
/// command still fails afterwards so scripts see a non-zero exit.
#[instrument(name = "cmd_analyze", skip_all, fields(files = args.files.len()))]
pub fn cmd_analyze(
    args: AnalyzeArgs,
    global_json: bool,
    config: &Config,
    max_input: Option<usize>,
) -> anyhow::Result<()> {
    let analysis_config = AnalysisConfig {
        mode: args.resolve_mode(config),
        ..config.analysis_config()
    };
    debug!(mode = analysis_config.mode.selector(), "executing analyze command");

    let analyzer = Analyzer::new(analysis_config);
    let mut history = AnalysisHistory::new(config.history_limit.max(args.files.len()));
    let mut failed = 0usize;

    let progress = (args.files.len() > 1 && !global_json).then(|| new_progress(args.files.len()));

    for path in &args.files {
        let label = source_label(path);
        if let Some(pb) = &progress {
            pb.set_message(label.clone());
        }

        let report = match extract_text(path, max_input) {
            Ok(text) => match analyzer.analyze(&text) {
                Ok(report) => report,
                Err(err) => {
                    failed += 1;
                    report_failure(&label, &err);
                    AnalysisReport::fallback(&text, &analysis_config, &err)
                }
            },
            Err(err) => {
                failed += 1;
                warn!(source = %label, error = %err, "could not extract text");
                AnalysisReport::fallback("", &analysis_config, &err)
            }
        };
        info!(
            source = %label,
            human = report.human_probability,
            confidence = report.confidence,
            fallback = report.fallback,
            "analysis complete"
        );
        history.record(label, report);

        if let Some(pb) = &progress {
            pb.inc(1);
        }
    }
    if let Some(pb) = progress {
        pb.finish_and_clear();
    }

    // History is newest first; print in argument order.
    let mut entries: Vec<&HistoryEntry> = history.entries().collect();
    entries.reverse();

    let summary = args.summary.then(|| Summary {
        analyzed: entries.len() - failed,
        failed,
        mean_human_probability: history.mean_human_probability(),
    });

    if global_json {
        if entries.len() == 1 && summary.is_none() {
            println!("{}", serde_json::to_string_pretty(&entries[0].report)?);
        } else {
            let output = BatchOutput {
                results: entries,
                summary,
            };
            println!("{}", serde_json::to_string_pretty(&output)?);
        }
    } else {
        for (i, entry) in entries.iter().enumerate() {
            if i > 0 {
                println!();
            }
            print_report(&entry.source, &entry.report, args.highlights);
        }
        if let Some(summary) = &summary {
            print_summary(&entries, summary);
        }
    }

    if failed > 0 {
        bail!(
            "{failed} of {} input(s) could not be analyzed",
            args.files.len()
        );
    }
    Ok(())
}

fn report_failure(label: &str, err: &AnalysisError) {
    if err.is_insufficient_input() {
        warn!(source = %label, error = %err, "text too short to analyze");
    } else {
        warn!(source = %label, error = %err, "analysis failed");
    }
}

fn new_progress(len: usize) -> ProgressBar {
    let pb = ProgressBar::new(len as u64);
    if let Ok(style) = ProgressStyle::default_bar().template("{bar:30.cyan/blue} {pos}/{len} {msg}")
    {
        pb.set_style(style);
    }
    pb
}

fn print_report(source: &str, report: &AnalysisReport, show_highlights: bool) {
    println!("{}", source.bold());

    let verdict = match report.verdict.category {
        VerdictCategory::LikelyHuman => report.verdict.label.green().bold().to_string(),
        VerdictCategory::Mixed => report.verdict.label.yellow().bold().to_string(),
        VerdictCategory::LikelyAi => report.verdict.label.red().bold().to_string(),
    };
    println!("  {verdict}");
    println!("  {}", report.verdict.description.dimmed());
    println!(
        "\n  {} {}%   {} {}%   {} {}%",
        "Humano:".cyan(),
        report.human_probability,
        "IA:".cyan(),
        report.ai_probability,
        "Confiança:".cyan(),
        report.confidence,
    );
    println!(
        "  {} {} palavras, {} frases, {} parágrafos",
        "Texto:".cyan(),
        report.word_count,
        report.sentence_count,
        report.paragraph_count,
    );
    println!("  {} {}", "Contexto:".cyan(), report.context.adjustment.label);

    if !report.metric_cards.is_empty() {
        println!("\n  {}", "Métricas".bold().underline());
        for card in &report.metric_cards {
            let value = match card.tone {
                CardTone::Good => card.value.green().to_string(),
                CardTone::Warning => card.value.yellow().to_string(),
                CardTone::Danger => card.value.red().to_string(),
                CardTone::Info => card.value.blue().to_string(),
            };
            println!("    {:<24} {value} {}", card.title, card.label.dimmed());
        }
    }

    println!("\n  {}", "Alertas".bold().underline());
    for alert in &report.alerts {
        let title = match alert.kind {
            AlertKind::Success => alert.title.green().to_string(),
            AlertKind::Info => alert.title.blue().to_string(),
            AlertKind::Warning => alert.title.yellow().to_string(),
            AlertKind::Danger => alert.title.red().to_string(),
        };
        println!("    {title}: {}", alert.message);
    }

    if !report.recommendations.is_empty() {
        println!("\n  {}", "Recomendações".bold().underline());
        for rec in &report.recommendations {
            println!("    - {}", rec.text);
        }
    }

    if !report.explanation.is_empty() {
        println!("\n  {}", "Explicação".bold().underline());
        for line in &report.explanation {
            println!("    {line}");
        }
    }

    if show_highlights && !report.highlights.is_empty() {
        println!("\n  {}", "Trechos".bold().underline());
        for span in &report.highlights {
            let tag = match span.category {
                HighlightCategory::Ai => "IA".red().to_string(),
                HighlightCategory::Human => "HUMANO".green().to_string(),
            };
            println!(
                "    [{tag}] {}..{} \"{}\" {}",
                span.start,
                span.end,
                span.source_text,
                span.description.dimmed()
            );
        }
    }

    for issue in &report.stage_issues {
        println!(
            "  {} {}: {}",
            "aviso:".yellow(),
            issue.stage,
            issue.message.dimmed()
        );
    }
}

fn print_summary(entries: &[&HistoryEntry], summary: &Summary) {
    println!("\n{}", "Resumo".bold().underline());
    for entry in entries {
        let status = if entry.report.fallback {
            "falhou".red().to_string()
        } else {
            format!("{}% humano", entry.report.human_probability)
        };
        println!("  {:<32} {status}", entry.source);
    }
    print!("  {} analisados, {} com falha", summary.analyzed, summary.failed);
    match summary.mean_human_probability {
        Some(mean) => println!(", média {mean:.1}% humano"),
        None => println!(),
    }
}
