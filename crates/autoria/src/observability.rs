//! Logging setup for the binary.
//!
//! Human-readable events go to stderr. When a log directory is writable,
//! JSON lines are also appended to a daily log file (`autoria.YYYY-MM-DD.log`,
//! the last [`MAX_LOG_FILES`] kept) through a non-blocking writer; the
//! returned guard flushes it on drop. An explicit `AUTORIA_LOG_PATH` is
//! appended to as is, without rotation.

use std::path::{Path, PathBuf};

use anyhow::Context;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_appender::rolling::{self, RollingFileAppender, Rotation};
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, fmt};

const ENV_LOG_PATH: &str = "AUTORIA_LOG_PATH";
const ENV_LOG_DIR: &str = "AUTORIA_LOG_DIR";
const LOG_FILE_PREFIX: &str = "autoria";
const LOG_FILE_SUFFIX: &str = "log";

/// Daily files kept in the log directory.
pub const MAX_LOG_FILES: usize = 14;

/// Where the file layer writes.
#[derive(Debug, Clone, PartialEq, Eq)]
enum LogTarget {
    /// One fixed file, never rotated.
    File { dir: PathBuf, file: String },
    /// Daily files in a directory.
    Daily { dir: PathBuf },
}

impl LogTarget {
    fn dir(&self) -> &Path {
        match self {
            Self::File { dir, .. } | Self::Daily { dir } => dir,
        }
    }

    fn appender(&self) -> Option<RollingFileAppender> {
        std::fs::create_dir_all(self.dir()).ok()?;
        match self {
            Self::File { dir, file } => Some(rolling::never(dir, file)),
            Self::Daily { dir } => RollingFileAppender::builder()
                .rotation(Rotation::DAILY)
                .filename_prefix(LOG_FILE_PREFIX)
                .filename_suffix(LOG_FILE_SUFFIX)
                .max_log_files(MAX_LOG_FILES)
                .build(dir)
                .ok(),
        }
    }
}

/// Where log files go.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ObservabilityConfig {
    /// Explicit log file; wins over `log_dir`.
    pub log_path: Option<PathBuf>,
    /// Directory for per-session log files.
    pub log_dir: Option<PathBuf>,
}

impl ObservabilityConfig {
    /// Resolve from the environment, then the configured directory, then the
    /// platform data directory.
    pub fn from_env_with_overrides(config_log_dir: Option<PathBuf>) -> Self {
        Self::resolve(
            non_empty_env(ENV_LOG_PATH),
            non_empty_env(ENV_LOG_DIR),
            config_log_dir,
        )
    }

    fn resolve(
        env_path: Option<PathBuf>,
        env_dir: Option<PathBuf>,
        config_dir: Option<PathBuf>,
    ) -> Self {
        let log_dir = env_dir.or(config_dir).or_else(|| {
            autoria_core::config::user_data_dir().map(|dir| dir.join("logs").into_std_path_buf())
        });
        Self {
            log_path: env_path,
            log_dir,
        }
    }

    /// Where the file layer writes, if anywhere.
    fn target(&self) -> Option<LogTarget> {
        if let Some(path) = &self.log_path {
            let dir = path
                .parent()
                .filter(|p| !p.as_os_str().is_empty())
                .map_or_else(|| PathBuf::from("."), Path::to_path_buf);
            let file = path.file_name()?.to_string_lossy().into_owned();
            return Some(LogTarget::File { dir, file });
        }
        self.log_dir.clone().map(|dir| LogTarget::Daily { dir })
    }
}

fn non_empty_env(key: &str) -> Option<PathBuf> {
    std::env::var(key)
        .ok()
        .filter(|v| !v.trim().is_empty())
        .map(PathBuf::from)
}

/// Build the filter from `-q`/`-v`, `RUST_LOG`, and the configured level.
///
/// `-q` and `-v` win over `RUST_LOG`, which wins over the config file.
pub fn env_filter(quiet: bool, verbose: u8, config_level: &str) -> EnvFilter {
    let flag_level = if quiet {
        Some("error")
    } else {
        match verbose {
            0 => None,
            1 => Some("debug"),
            _ => Some("trace"),
        }
    };
    if let Some(level) = flag_level {
        return EnvFilter::new(level);
    }
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(config_level))
}

/// Install the global subscriber.
///
/// Returns the file writer's guard, or `None` when only stderr is in use
/// because the log directory could not be created.
pub fn init_observability(
    config: &ObservabilityConfig,
    filter: EnvFilter,
) -> anyhow::Result<Option<WorkerGuard>> {
    let stderr_layer = fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(false)
        .compact();

    let file_target = config
        .target()
        .and_then(|target| target.appender().map(|appender| (target, appender)));

    let Some((target, appender)) = file_target else {
        tracing_subscriber::registry()
            .with(filter)
            .with(stderr_layer)
            .try_init()
            .context("failed to install tracing subscriber")?;
        return Ok(None);
    };

    let (writer, guard) = tracing_appender::non_blocking(appender);
    let file_layer = fmt::layer()
        .json()
        .with_writer(writer)
        .with_ansi(false)
        .with_target(true)
        .with_file(true)
        .with_line_number(true);

    tracing_subscriber::registry()
        .with(filter)
        .with(stderr_layer)
        .with(file_layer)
        .try_init()
        .context("failed to install tracing subscriber")?;

    tracing::debug!(log_dir = %target.dir().display(), "file logging enabled");
    Ok(Some(guard))
}
