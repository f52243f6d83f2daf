//! Serve command: run the MCP server on stdio.

use anyhow::Context;
use autoria_core::config::Config;
use clap::Args;
use rmcp::ServiceExt;
use rmcp::transport::stdio;
use tracing::{info, instrument};

use crate::server::AutoriaServer;

/// Arguments for the `serve` subcommand.
#[derive(Args, Debug, Default)]
pub struct ServeArgs {}

/// Serve until the client disconnects.
///
/// Logging must stay on stderr; stdout carries the protocol.
#[instrument(name = "cmd_serve", skip_all)]
pub async fn cmd_serve(
    _args: ServeArgs,
    max_input: Option<usize>,
    config: Config,
) -> anyhow::Result<()> {
    let server = AutoriaServer::new(config.analysis_config(), max_input, config.history_limit);
    info!(mode = config.analysis_mode().selector(), "starting MCP server on stdio");

    let service = server
        .serve(stdio())
        .await
        .context("failed to start MCP server")?;
    service.waiting().await.context("MCP server terminated")?;

    info!("MCP server stopped");
    Ok(())
}
