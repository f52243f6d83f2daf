//! Weighted pattern catalogs and the matcher that scores them.
//!
//! A [`Catalog`] is an ordered list of [`PatternRule`]s plus the constants
//! that damp its raw sum into a bounded [`CatalogScore`]. Rules are scored
//! independently: each contributes `match_count * weight`, saturated at
//! ±[`RULE_SATURATION`], and the contributions are summed.
//!
//! Scanning never fails as a whole. A rule that cannot be compiled, that
//! trips the regex engine's backtrack limit, or that runs past its time
//! budget contributes zero and is reported in [`CatalogScore::failures`].

pub mod catalogs;

use std::sync::{Arc, LazyLock};
use std::time::{Duration, Instant};

use fancy_regex::{Regex, RegexBuilder};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::error::StageError;

pub use catalogs::Catalogs;

/// Largest absolute contribution a single rule can make.
pub const RULE_SATURATION: f64 = 100.0;

/// Snippets kept per matched rule.
pub const MAX_EXAMPLE_SNIPPETS: usize = 3;

/// Default per-rule evaluation budget, in milliseconds.
pub const DEFAULT_PATTERN_BUDGET_MS: u64 = 250;

/// Default backtrack limit handed to the regex engine.
pub const DEFAULT_BACKTRACK_LIMIT: usize = 1_000_000;

/// Longest snippet kept for display.
const SNIPPET_CHARS: usize = 80;

/// Static description of a rule, compiled into a [`PatternRule`].
#[derive(Debug, Clone, Copy)]
pub struct RuleSpec {
    /// Regular expression source (fancy-regex syntax).
    pub pattern: &'static str,
    /// Signed weight per match.
    pub weight: i32,
    /// Human-readable description, shown in reports.
    pub description: &'static str,
}

/// A compiled, immutable catalog rule.
#[derive(Debug, Clone)]
pub struct PatternRule {
    matcher: Regex,
    weight: i32,
    description: &'static str,
}

impl PatternRule {
    /// Signed weight per match.
    pub const fn weight(&self) -> i32 {
        self.weight
    }

    /// Human-readable description.
    pub const fn description(&self) -> &'static str {
        self.description
    }

    /// Regular expression source.
    pub fn pattern(&self) -> &str {
        self.matcher.as_str()
    }

    /// Contribution of `count` matches, saturated at ±[`RULE_SATURATION`].
    pub fn contribution(&self, count: usize) -> f64 {
        let raw = count as f64 * f64::from(self.weight);
        if self.weight >= 0 {
            raw.min(RULE_SATURATION)
        } else {
            raw.max(-RULE_SATURATION)
        }
    }
}

/// How a catalog damps its raw sum.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Normalization {
    /// Fixed damping divisor.
    pub divisor: f64,
    /// Lower clamp of the normalized score.
    pub floor: f64,
    /// Upper clamp of the normalized score.
    pub cap: f64,
}

impl Normalization {
    /// Divide by `divisor` and clamp to `[floor, cap]`.
    pub fn apply(&self, total: f64) -> f64 {
        (total / self.divisor).clamp(self.floor, self.cap)
    }

    /// Highest normalized score one saturated positive rule can reach on
    /// its own: `RULE_SATURATION / divisor`, clamped.
    ///
    /// Reaching [`cap`](Self::cap) takes several distinct rules firing.
    pub fn single_rule_ceiling(&self) -> f64 {
        self.apply(RULE_SATURATION)
    }
}

/// Position of one match in the scanned text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct MatchSpan {
    /// Byte offset of the first matched byte.
    pub start: usize,
    /// Byte offset one past the last matched byte.
    pub end: usize,
}

/// One rule's outcome for a document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct PatternMatchResult {
    /// Rule description.
    pub description: String,
    /// Signed weight per match.
    pub weight: i32,
    /// Number of non-overlapping matches.
    pub match_count: usize,
    /// Saturated contribution to the catalog total.
    pub contributed_score: f64,
    /// The first few matched snippets.
    pub example_snippets: Vec<String>,
    /// Every match position, used for highlighting.
    #[serde(default, skip_serializing)]
    pub spans: Vec<MatchSpan>,
}

/// A catalog's score for one document.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct CatalogScore {
    /// Sum of the per-rule contributions, sign preserved.
    pub total_score: f64,
    /// `total_score` damped and clamped by the catalog's normalization.
    pub normalized_score: f64,
    /// Rules that matched at least once.
    pub matched_patterns: Vec<PatternMatchResult>,
    /// Rules skipped because they failed or ran out of time.
    #[serde(skip)]
    pub failures: Vec<StageError>,
}

/// A named, compiled set of weighted rules.
#[derive(Debug, Clone)]
pub struct Catalog {
    name: &'static str,
    rules: Vec<PatternRule>,
    broken: Vec<StageError>,
    normalization: Normalization,
}

impl Catalog {
    /// Compile a catalog from static rule specs.
    ///
    /// Rules that fail to compile are kept aside and reported on every
    /// scan, so a single bad pattern never disables the whole catalog.
    pub fn compile(
        name: &'static str,
        specs: &[RuleSpec],
        normalization: Normalization,
        backtrack_limit: usize,
    ) -> Self {
        let mut rules = Vec::with_capacity(specs.len());
        let mut broken = Vec::new();
        for spec in specs {
            match compile_rule(spec.pattern, backtrack_limit) {
                Ok(matcher) => rules.push(PatternRule {
                    matcher,
                    weight: spec.weight,
                    description: spec.description,
                }),
                Err(e) => {
                    tracing::warn!(catalog = name, rule = spec.description, error = %e, "pattern failed to compile");
                    broken.push(StageError::PatternEvaluation {
                        rule: spec.description.to_string(),
                        reason: e.to_string(),
                    });
                }
            }
        }
        Self {
            name,
            rules,
            broken,
            normalization,
        }
    }

    /// Catalog name.
    pub const fn name(&self) -> &'static str {
        self.name
    }

    /// Compiled rules, in declaration order.
    pub fn rules(&self) -> &[PatternRule] {
        &self.rules
    }

    /// Normalization constants.
    pub const fn normalization(&self) -> Normalization {
        self.normalization
    }

    /// Score `text` against every rule.
    #[tracing::instrument(skip_all, fields(catalog = self.name, text_len = text.len()))]
    pub fn score(&self, text: &str, budget: Duration) -> CatalogScore {
        let mut total = 0.0;
        let mut matched = Vec::new();
        let mut failures = self.broken.clone();

        for rule in &self.rules {
            match scan_rule(rule, text, budget) {
                Ok(Some(result)) => {
                    total += result.contributed_score;
                    matched.push(result);
                }
                Ok(None) => {}
                Err(e) => {
                    tracing::warn!(catalog = self.name, error = %e, "pattern skipped");
                    failures.push(e);
                }
            }
        }

        let normalized = self.normalization.apply(total);
        tracing::debug!(
            catalog = self.name,
            total,
            normalized,
            matched = matched.len(),
            "catalog scored"
        );
        CatalogScore {
            total_score: total,
            normalized_score: normalized,
            matched_patterns: matched,
            failures,
        }
    }
}

/// Score `text` against a catalog with the default time budget.
pub fn score_catalog(text: &str, catalog: &Catalog) -> CatalogScore {
    catalog.score(text, Duration::from_millis(DEFAULT_PATTERN_BUDGET_MS))
}

fn compile_rule(pattern: &str, backtrack_limit: usize) -> Result<Regex, fancy_regex::Error> {
    let mut builder = RegexBuilder::new(pattern);
    builder.backtrack_limit(backtrack_limit);
    builder.build()
}

/// Scan one rule, checking the budget after every match, on failure, and
/// once the search ends.
///
/// A single search step cannot be interrupted; the backtrack limit bounds
/// it, and the elapsed check turns an overlong scan into a timeout.
fn scan_rule(
    rule: &PatternRule,
    text: &str,
    budget: Duration,
) -> Result<Option<PatternMatchResult>, StageError> {
    let started = Instant::now();
    let timeout = || StageError::PatternTimeout {
        rule: rule.description.to_string(),
        budget_ms: u64::try_from(budget.as_millis()).unwrap_or(u64::MAX),
    };
    let mut spans = Vec::new();
    let mut snippets = Vec::new();

    for found in rule.matcher.find_iter(text) {
        let m = match found {
            Ok(m) => m,
            Err(_) if started.elapsed() >= budget => return Err(timeout()),
            Err(e) => {
                return Err(StageError::PatternEvaluation {
                    rule: rule.description.to_string(),
                    reason: e.to_string(),
                });
            }
        };
        if started.elapsed() >= budget {
            return Err(timeout());
        }
        if snippets.len() < MAX_EXAMPLE_SNIPPETS {
            snippets.push(crate::text::truncate_chars(m.as_str().trim(), SNIPPET_CHARS));
        }
        spans.push(MatchSpan {
            start: m.start(),
            end: m.end(),
        });
    }

    if started.elapsed() >= budget {
        return Err(timeout());
    }
    if spans.is_empty() {
        return Ok(None);
    }

    Ok(Some(PatternMatchResult {
        description: rule.description.to_string(),
        weight: rule.weight,
        match_count: spans.len(),
        contributed_score: rule.contribution(spans.len()),
        example_snippets: snippets,
        spans,
    }))
}

static STANDARD: LazyLock<Arc<Catalogs>> =
    LazyLock::new(|| Arc::new(Catalogs::compile(DEFAULT_BACKTRACK_LIMIT)));

/// Catalogs compiled with the given backtrack limit.
///
/// The default limit shares one process-wide compilation.
pub fn catalogs_for(backtrack_limit: usize) -> Arc<Catalogs> {
    if backtrack_limit == DEFAULT_BACKTRACK_LIMIT {
        Arc::clone(&STANDARD)
    } else {
        Arc::new(Catalogs::compile(backtrack_limit))
    }
}
