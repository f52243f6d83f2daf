//! MCP (Model Context Protocol) server implementation.
//!
//! Exposes the authorship engine to AI assistants over stdio. The server is a
//! presentation layer: every tool delegates to `autoria-core` and keeps only
//! the in-memory [`AnalysisHistory`] of the session.

use std::sync::{Arc, Mutex, MutexGuard};

use autoria_core::{
    AcademicLevel, AnalysisConfig, AnalysisMode, AnalysisReport, Analyzer, ContentType, ModeKind,
    SubjectArea,
};
use rmcp::handler::server::router::tool::ToolRouter;
use rmcp::handler::server::wrapper::Parameters;
use rmcp::model::{CallToolResult, Content, Implementation, ServerCapabilities, ServerInfo};
use rmcp::schemars;
use rmcp::{ErrorData as McpError, ServerHandler, tool, tool_handler, tool_router};
use serde::Serialize;

use crate::history::{AnalysisHistory, HistoryEntry, PASTED_TEXT_LABEL};

/// Parameters for the `get_info` tool.
#[derive(Debug, serde::Deserialize, schemars::JsonSchema)]
pub struct GetInfoParams {
    /// Output format: "text" or "json"
    #[serde(default = "default_format")]
    pub format: String,
}

fn default_format() -> String {
    "text".to_string()
}

/// Parameters for the `analyze_authorship` tool.
#[derive(Debug, Default, serde::Deserialize, schemars::JsonSchema)]
pub struct AnalyzeAuthorshipParams {
    /// The text to analyze.
    pub text: String,
    /// "content-type" or "academic-level"; implied by the other selectors when omitted.
    pub mode: Option<ModeKind>,
    /// Content type for content-type mode.
    pub content_type: Option<ContentType>,
    /// Author's level for academic-level mode.
    pub level: Option<AcademicLevel>,
    /// Subject area, display only.
    pub subject: Option<SubjectArea>,
    /// Label stored in the history (defaults to "texto colado").
    pub source: Option<String>,
}

/// Parameters for the `list_history` tool.
#[derive(Debug, Default, serde::Deserialize, schemars::JsonSchema)]
pub struct ListHistoryParams {
    /// Maximum entries to return, newest first.
    pub limit: Option<usize>,
    /// Return full reports instead of one-line summaries.
    #[serde(default)]
    pub full: bool,
}

#[derive(Serialize)]
struct HistorySummary<'a> {
    timestamp: &'a str,
    source: &'a str,
    human_probability: u8,
    confidence: u8,
    verdict: &'a str,
    fallback: bool,
}

impl<'a> From<&'a HistoryEntry> for HistorySummary<'a> {
    fn from(entry: &'a HistoryEntry) -> Self {
        Self {
            timestamp: &entry.timestamp,
            source: &entry.source,
            human_probability: entry.report.human_probability,
            confidence: entry.report.confidence,
            verdict: &entry.report.verdict.label,
            fallback: entry.report.fallback,
        }
    }
}

/// MCP server exposing the authorship engine.
#[derive(Clone)]
pub struct AutoriaServer {
    tool_router: ToolRouter<Self>,
    defaults: AnalysisConfig,
    max_input: Option<usize>,
    history: Arc<Mutex<AnalysisHistory>>,
}

impl Default for AutoriaServer {
    fn default() -> Self {
        Self::new(
            AnalysisConfig::default(),
            Some(autoria_core::DEFAULT_MAX_INPUT_BYTES),
            autoria_core::config::DEFAULT_HISTORY_LIMIT,
        )
    }
}

#[tool_router]
impl AutoriaServer {
    /// Create a server with default engine options and a history bound.
    pub fn new(defaults: AnalysisConfig, max_input: Option<usize>, history_limit: usize) -> Self {
        Self {
            tool_router: Self::tool_router(),
            defaults,
            max_input,
            history: Arc::new(Mutex::new(AnalysisHistory::new(history_limit))),
        }
    }

    fn history(&self) -> Result<MutexGuard<'_, AnalysisHistory>, McpError> {
        self.history
            .lock()
            .map_err(|_| McpError::internal_error("history lock poisoned", None))
    }

    fn resolve_mode(&self, params: &AnalyzeAuthorshipParams) -> AnalysisMode {
        let (default_content, default_level, default_subject, default_kind) =
            match self.defaults.mode {
                AnalysisMode::ContentType { content_type } => (
                    content_type,
                    AcademicLevel::default(),
                    SubjectArea::default(),
                    ModeKind::ContentType,
                ),
                AnalysisMode::AcademicLevel { level, subject } => (
                    ContentType::default(),
                    level,
                    subject,
                    ModeKind::AcademicLevel,
                ),
            };
        let implied = if params.level.is_some() || params.subject.is_some() {
            Some(ModeKind::AcademicLevel)
        } else if params.content_type.is_some() {
            Some(ModeKind::ContentType)
        } else {
            None
        };
        match params.mode.or(implied).unwrap_or(default_kind) {
            ModeKind::ContentType => {
                AnalysisMode::content_type(params.content_type.unwrap_or(default_content))
            }
            ModeKind::AcademicLevel => AnalysisMode::academic(
                params.level.unwrap_or(default_level),
                params.subject.unwrap_or(default_subject),
            ),
        }
    }

    /// Get project information.
    #[tool(description = "Get project name, version, and description")]
    #[tracing::instrument(skip(self), fields(otel.kind = "server"))]
    fn get_info(
        &self,
        Parameters(params): Parameters<GetInfoParams>,
    ) -> Result<CallToolResult, McpError> {
        tracing::debug!(tool = "get_info", format = %params.format, "executing MCP tool");

        let info = serde_json::json!({
            "name": env!("CARGO_PKG_NAME"),
            "version": env!("CARGO_PKG_VERSION"),
            "description": env!("CARGO_PKG_DESCRIPTION"),
            "mode": self.defaults.mode,
        });

        let text = if params.format == "json" {
            serde_json::to_string_pretty(&info)
                .map_err(|e| McpError::internal_error(format!("serialization error: {e}"), None))?
        } else {
            format!(
                "{} v{}\n{}",
                env!("CARGO_PKG_NAME"),
                env!("CARGO_PKG_VERSION"),
                env!("CARGO_PKG_DESCRIPTION"),
            )
        };

        tracing::info!(tool = "get_info", "MCP tool completed");
        Ok(CallToolResult::success(vec![Content::text(text)]))
    }

    /// Score a text for human versus AI authorship.
    #[tool(
        description = "Estimate whether a text was written by a person or generated by AI. Returns probabilities, confidence, verdict, alerts, and highlighted passages as JSON."
    )]
    #[tracing::instrument(skip(self, params), fields(otel.kind = "server", text_len = params.text.len()))]
    fn analyze_authorship(
        &self,
        Parameters(params): Parameters<AnalyzeAuthorshipParams>,
    ) -> Result<CallToolResult, McpError> {
        if let Some(max) = self.max_input
            && params.text.len() > max
        {
            return Err(McpError::invalid_params(
                format!("input too large: {} bytes (limit: {max} bytes)", params.text.len()),
                None,
            ));
        }

        let config = AnalysisConfig {
            mode: self.resolve_mode(&params),
            ..self.defaults
        };
        tracing::debug!(tool = "analyze_authorship", mode = config.mode.selector(), "executing MCP tool");

        let (report, failed) = match Analyzer::new(config).analyze(&params.text) {
            Ok(report) => (report, false),
            Err(err) => {
                tracing::warn!(tool = "analyze_authorship", error = %err, "analysis failed, returning fallback");
                (AnalysisReport::fallback(&params.text, &config, &err), true)
            }
        };

        let json = serde_json::to_string_pretty(&report)
            .map_err(|e| McpError::internal_error(format!("serialization error: {e}"), None))?;

        tracing::info!(
            tool = "analyze_authorship",
            human = report.human_probability,
            fallback = failed,
            "MCP tool completed"
        );
        let source = params.source.unwrap_or_else(|| PASTED_TEXT_LABEL.to_string());
        self.history()?.record(source, report);

        let content = vec![Content::text(json)];
        if failed {
            Ok(CallToolResult::error(content))
        } else {
            Ok(CallToolResult::success(content))
        }
    }

    /// List analyses completed in this session.
    #[tool(description = "List analyses completed in this session, newest first.")]
    #[tracing::instrument(skip(self, params), fields(otel.kind = "server"))]
    fn list_history(
        &self,
        Parameters(params): Parameters<ListHistoryParams>,
    ) -> Result<CallToolResult, McpError> {
        tracing::debug!(tool = "list_history", limit = ?params.limit, "executing MCP tool");

        let history = self.history()?;
        let take = params.limit.unwrap_or(usize::MAX);
        let rendered = if params.full {
            let entries: Vec<&HistoryEntry> = history.entries().take(take).collect();
            serde_json::to_string_pretty(&entries)
        } else {
            let entries: Vec<HistorySummary<'_>> =
                history.entries().take(take).map(HistorySummary::from).collect();
            serde_json::to_string_pretty(&entries)
        };
        let json = rendered
            .map_err(|e| McpError::internal_error(format!("serialization error: {e}"), None))?;

        tracing::info!(tool = "list_history", entries = history.len(), "MCP tool completed");
        Ok(CallToolResult::success(vec![Content::text(json)]))
    }
}

#[tool_handler]
impl ServerHandler for AutoriaServer {
    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            protocol_version: Default::default(),
            capabilities: ServerCapabilities::builder().enable_tools().build(),
            server_info: Implementation {
                name: env!("CARGO_PKG_NAME").to_string(),
                version: env!("CARGO_PKG_VERSION").to_string(),
                ..Default::default()
            },
            instructions: Some(format!(
                "{} MCP server. Use analyze_authorship to score a text and list_history to review earlier results.",
                env!("CARGO_PKG_NAME"),
            )),
        }
    }
}
