//! Patterns command: list the rule catalogs.

use autoria_core::Analyzer;
use autoria_core::patterns::Catalog;
use clap::Args;
use owo_colors::OwoColorize;
use serde::Serialize;
use tracing::{debug, instrument};

/// Arguments for the `patterns` subcommand.
#[derive(Args, Debug, Default)]
pub struct PatternsArgs {
    /// Only list this catalog (e.g. `ia-geral`, `humano`).
    #[arg(long)]
    pub catalog: Option<String>,

    /// Include the regular expression of each rule.
    #[arg(long)]
    pub show_regex: bool,
}

#[derive(Serialize)]
struct RuleRow<'a> {
    weight: i32,
    description: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pattern: Option<&'a str>,
}

#[derive(Serialize)]
struct CatalogRow<'a> {
    name: &'a str,
    divisor: f64,
    rules: Vec<RuleRow<'a>>,
}

impl<'a> CatalogRow<'a> {
    fn from_catalog(catalog: &'a Catalog, show_regex: bool) -> Self {
        let rules = catalog
            .rules()
            .iter()
            .map(|rule| RuleRow {
                weight: rule.weight(),
                description: rule.description(),
                pattern: show_regex.then(|| rule.pattern()),
            })
            .collect();
        Self {
            name: catalog.name(),
            divisor: catalog.normalization().divisor,
            rules,
        }
    }
}

/// Print every catalog rule with its weight and description.
#[instrument(name = "cmd_patterns", skip_all)]
pub fn cmd_patterns(args: PatternsArgs, global_json: bool, analyzer: &Analyzer) -> anyhow::Result<()> {
    debug!(catalog = ?args.catalog, "executing patterns command");

    let catalogs = analyzer.catalogs();
    let rows: Vec<CatalogRow<'_>> = catalogs
        .all()
        .into_iter()
        .filter(|c| args.catalog.as_deref().is_none_or(|name| c.name() == name))
        .map(|c| CatalogRow::from_catalog(c, args.show_regex))
        .collect();

    if let Some(name) = &args.catalog
        && rows.is_empty()
    {
        let known: Vec<_> = catalogs.all().iter().map(|c| c.name()).collect();
        anyhow::bail!("unknown catalog '{name}' (known: {})", known.join(", "));
    }

    if global_json {
        println!("{}", serde_json::to_string_pretty(&rows)?);
        return Ok(());
    }

    for (i, row) in rows.iter().enumerate() {
        if i > 0 {
            println!();
        }
        println!(
            "{} {}",
            row.name.bold(),
            format!("({} regras, divisor {})", row.rules.len(), row.divisor).dimmed()
        );
        for rule in &row.rules {
            let weight = if rule.weight < 0 {
                format!("{:>4}", rule.weight).red().to_string()
            } else {
                format!("{:>4}", rule.weight).green().to_string()
            };
            println!("  {weight}  {}", rule.description);
            if let Some(pattern) = rule.pattern {
                println!("        {}", pattern.dimmed());
            }
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unknown_catalog_is_an_error() {
        let args = PatternsArgs {
            catalog: Some("inexistente".into()),
            show_regex: false,
        };
        let err = cmd_patterns(args, true, &Analyzer::default()).unwrap_err();
        assert!(err.to_string().contains("humano"));
    }

    #[test]
    fn rows_carry_regex_only_on_request() {
        let analyzer = Analyzer::default();
        let catalog = &analyzer.catalogs().human;
        let plain = CatalogRow::from_catalog(catalog, false);
        assert!(plain.rules.iter().all(|r| r.pattern.is_none()));
        let full = CatalogRow::from_catalog(catalog, true);
        assert!(full.rules.iter().all(|r| r.pattern.is_some()));
        assert_eq!(full.name, "humano");
    }
}
