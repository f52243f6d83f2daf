//! Command implementations.

use std::io::Read;

use anyhow::Context;
use camino::Utf8Path;

use crate::history::PASTED_TEXT_LABEL;

pub mod analyze;
pub mod info;
pub mod patterns;
pub mod schema;
#[cfg(feature = "mcp")]
pub mod serve;

/// Extensions the extraction layer decodes as plain text.
pub const TEXT_EXTENSIONS: &[&str] = &["txt", "md", "markdown"];

/// Path argument that reads from stdin.
pub const STDIN_PATH: &str = "-";

/// Raised for inputs the host cannot turn into text.
#[derive(Debug, thiserror::Error)]
#[error("unsupported format: {path} (supported: .txt, .md)")]
pub struct UnsupportedFormat {
    /// The rejected path.
    pub path: String,
}

/// Source label for an input path: its file name, or the pasted-text label.
pub fn source_label(path: &Utf8Path) -> String {
    if path.as_str() == STDIN_PATH {
        return PASTED_TEXT_LABEL.to_string();
    }
    path.file_name().unwrap_or(path.as_str()).to_string()
}

/// Read a file and validate its size against the configured limit.
pub fn read_input_file(path: &Utf8Path, max_bytes: Option<usize>) -> anyhow::Result<String> {
    // Preflight: check file size via metadata before reading into memory.
    let metadata =
        std::fs::metadata(path.as_std_path()).with_context(|| format!("failed to read {path}"))?;
    if let Some(max) = max_bytes {
        let size = metadata.len() as usize;
        if size > max {
            anyhow::bail!("input too large: {path} is {size} bytes (limit: {max} bytes)");
        }
    }

    let content = std::fs::read_to_string(path.as_std_path())
        .with_context(|| format!("failed to read {path}"))?;
    Ok(content)
}

/// Extract analysable text from `path` (`-` reads stdin).
///
/// Only plain-text formats are accepted; anything else fails with
/// [`UnsupportedFormat`].
pub fn extract_text(path: &Utf8Path, max_bytes: Option<usize>) -> anyhow::Result<String> {
    if path.as_str() == STDIN_PATH {
        return read_stdin(max_bytes);
    }
    let supported = path
        .extension()
        .is_some_and(|ext| TEXT_EXTENSIONS.iter().any(|e| e.eq_ignore_ascii_case(ext)));
    if !supported {
        return Err(UnsupportedFormat {
            path: path.to_string(),
        }
        .into());
    }
    read_input_file(path, max_bytes)
}

fn read_stdin(max_bytes: Option<usize>) -> anyhow::Result<String> {
    let mut buf = String::new();
    let stdin = std::io::stdin();
    match max_bytes {
        Some(max) => {
            stdin
                .lock()
                .take(max as u64 + 1)
                .read_to_string(&mut buf)
                .context("failed to read stdin")?;
            if buf.len() > max {
                anyhow::bail!("input too large: stdin exceeds {max} bytes");
            }
        }
        None => {
            stdin
                .lock()
                .read_to_string(&mut buf)
                .context("failed to read stdin")?;
        }
    }
    Ok(buf)
}
