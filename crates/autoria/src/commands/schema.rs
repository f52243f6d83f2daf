//! Schema command: print the JSON Schema of the analysis report.

use clap::Args;
use tracing::{debug, instrument};

/// Arguments for the `schema` subcommand.
#[derive(Args, Debug, Default)]
pub struct SchemaArgs {
    /// Emit compact JSON on one line.
    #[arg(long)]
    pub compact: bool,
}

/// Print the report schema handed to external renderers.
#[instrument(name = "cmd_schema", skip_all)]
pub fn cmd_schema(args: SchemaArgs) -> anyhow::Result<()> {
    debug!(compact = args.compact, "executing schema command");
    let schema = autoria_core::report_schema();
    let rendered = if args.compact {
        serde_json::to_string(&schema)?
    } else {
        serde_json::to_string_pretty(&schema)?
    };
    println!("{rendered}");
    Ok(())
}
