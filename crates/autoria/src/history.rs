//! In-memory history of completed analyses.

use std::collections::VecDeque;

use autoria_core::AnalysisReport;
use serde::{Deserialize, Serialize};

/// Source label used for text that did not come from a file.
pub const PASTED_TEXT_LABEL: &str = "texto colado";

/// One completed analysis.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "mcp", derive(schemars::JsonSchema))]
pub struct HistoryEntry {
    /// When the analysis finished, RFC 3339.
    pub timestamp: String,
    /// File name, or [`PASTED_TEXT_LABEL`].
    pub source: String,
    /// Full copy of the report.
    pub report: AnalysisReport,
}

impl HistoryEntry {
    /// Stamp a report with the current time.
    pub fn now(source: impl Into<String>, report: AnalysisReport) -> Self {
        Self {
            timestamp: chrono::Local::now().to_rfc3339(),
            source: source.into(),
            report,
        }
    }
}

/// Bounded list of analyses, newest first.
#[derive(Debug, Clone)]
pub struct AnalysisHistory {
    entries: VecDeque<HistoryEntry>,
    limit: usize,
}

impl AnalysisHistory {
    /// Create an empty history holding at most `limit` entries.
    pub fn new(limit: usize) -> Self {
        Self {
            entries: VecDeque::with_capacity(limit.min(64)),
            limit,
        }
    }

    /// Record an analysis, evicting the oldest entry when full.
    pub fn record(&mut self, source: impl Into<String>, report: AnalysisReport) -> &HistoryEntry {
        self.push(HistoryEntry::now(source, report))
    }

    fn push(&mut self, entry: HistoryEntry) -> &HistoryEntry {
        // A zero limit still keeps the entry just recorded.
        self.entries.truncate(self.limit.saturating_sub(1));
        self.entries.push_front(entry);
        &self.entries[0]
    }

    /// Entries, newest first.
    pub fn entries(&self) -> impl Iterator<Item = &HistoryEntry> {
        self.entries.iter()
    }

    /// Number of stored entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether nothing has been recorded.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Maximum number of entries kept.
    pub const fn limit(&self) -> usize {
        self.limit
    }

    /// Mean human probability over non-fallback entries.
    pub fn mean_human_probability(&self) -> Option<f64> {
        let scored: Vec<u8> = self
            .entries
            .iter()
            .filter(|e| !e.report.fallback)
            .map(|e| e.report.human_probability)
            .collect();
        if scored.is_empty() {
            return None;
        }
        let sum: f64 = scored.iter().map(|&p| f64::from(p)).sum();
        Some(sum / scored.len() as f64)
    }
}
