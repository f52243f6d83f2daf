//! Configuration loading and discovery.
//!
//! Sources are merged with figment, lowest precedence first:
//!
//! 1. Built-in defaults ([`Config::default`])
//! 2. User config: `~/.config/autoria/config.<ext>`
//! 3. Project config: `.autoria.<ext>` then `autoria.<ext>`, taken from the
//!    closest directory (walking up from the search root) that has any
//! 4. Explicit files, in the order given
//! 5. `AUTORIA_*` environment variables
//!
//! Where `<ext>` is one of `toml`, `yaml`, `yml`, `json`. The walk stops at
//! a directory containing `.git` unless the boundary marker is changed.
//!
//! # Example
//! ```no_run
//! use camino::Utf8PathBuf;
//! use autoria_core::config::ConfigLoader;
//!
//! let cwd = Utf8PathBuf::try_from(std::env::current_dir().unwrap()).unwrap();
//! let (config, _sources) = ConfigLoader::new()
//!     .with_project_search(&cwd)
//!     .load()
//!     .unwrap();
//! let analysis = config.analysis_config();
//! ```

use std::time::Duration;

use camino::{Utf8Path, Utf8PathBuf};
use figment::Figment;
use figment::providers::{Env, Format, Json, Serialized, Toml, Yaml};
use serde::{Deserialize, Serialize};

use crate::context::{AcademicLevel, AnalysisMode, ContentType, ModeKind, SubjectArea};
use crate::engine::AnalysisConfig;
use crate::error::{ConfigError, ConfigResult};
use crate::patterns::{DEFAULT_BACKTRACK_LIMIT, DEFAULT_PATTERN_BUDGET_MS};

/// Default number of reports kept in a host's history.
pub const DEFAULT_HISTORY_LIMIT: usize = 50;

/// The configuration for autoria.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq, Eq)]
#[serde(default)]
pub struct Config {
    /// Log level (`debug`, `info`, `warn`, `error`).
    pub log_level: LogLevel,
    /// Directory for JSONL log files (falls back to platform defaults if unset).
    pub log_dir: Option<Utf8PathBuf>,
    /// Which axis selects the context adjustment.
    pub mode: ModeKind,
    /// Content type used in `content-type` mode.
    pub content_type: ContentType,
    /// Author level used in `academic-level` mode.
    pub academic_level: AcademicLevel,
    /// Subject area shown in `academic-level` mode.
    pub subject_area: SubjectArea,
    /// Per-rule regex time budget in milliseconds.
    pub pattern_budget_ms: u64,
    /// Backtrack limit handed to the regex engine.
    pub backtrack_limit: usize,
    /// Reports kept in the in-memory history.
    pub history_limit: usize,
    /// Maximum input size in bytes. Omit for the default (5 MiB).
    pub max_input_bytes: Option<usize>,
    /// Disable the input size limit entirely; `max_input_bytes` is then ignored.
    pub disable_input_limit: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            log_level: LogLevel::default(),
            log_dir: None,
            mode: ModeKind::default(),
            content_type: ContentType::default(),
            academic_level: AcademicLevel::default(),
            subject_area: SubjectArea::default(),
            pattern_budget_ms: DEFAULT_PATTERN_BUDGET_MS,
            backtrack_limit: DEFAULT_BACKTRACK_LIMIT,
            history_limit: DEFAULT_HISTORY_LIMIT,
            max_input_bytes: None,
            disable_input_limit: false,
        }
    }
}

impl Config {
    /// The analysis mode selected by `mode` and its selector keys.
    pub const fn analysis_mode(&self) -> AnalysisMode {
        match self.mode {
            ModeKind::ContentType => AnalysisMode::content_type(self.content_type),
            ModeKind::AcademicLevel => {
                AnalysisMode::academic(self.academic_level, self.subject_area)
            }
        }
    }

    /// Engine options derived from this configuration.
    pub const fn analysis_config(&self) -> AnalysisConfig {
        AnalysisConfig {
            mode: self.analysis_mode(),
            pattern_budget: Duration::from_millis(self.pattern_budget_ms),
            backtrack_limit: self.backtrack_limit,
        }
    }

    /// The input size limit in force, or `None` when disabled.
    pub fn input_limit(&self) -> Option<usize> {
        if self.disable_input_limit {
            None
        } else {
            Some(self.max_input_bytes.unwrap_or(crate::DEFAULT_MAX_INPUT_BYTES))
        }
    }
}

/// Log level configuration.
#[derive(Debug, Clone, Default, Deserialize, Serialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    /// Verbose output for debugging and development.
    Debug,
    /// Standard operational information (default).
    #[default]
    Info,
    /// Warnings about potential issues.
    Warn,
    /// Errors that indicate failures.
    Error,
}

impl LogLevel {
    /// Returns the log level as a lowercase string slice.
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Debug => "debug",
            Self::Info => "info",
            Self::Warn => "warn",
            Self::Error => "error",
        }
    }
}

/// Which configuration files were merged.
#[derive(Debug, Clone, Default, Serialize)]
pub struct ConfigSources {
    /// Project config files, low to high precedence.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub project_files: Vec<Utf8PathBuf>,
    /// User config file.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user_file: Option<Utf8PathBuf>,
    /// Files passed explicitly (e.g. `--config`).
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub explicit_files: Vec<Utf8PathBuf>,
}

impl ConfigSources {
    /// The highest-precedence file that was loaded, if any.
    pub fn primary_file(&self) -> Option<&Utf8Path> {
        self.explicit_files
            .last()
            .map(Utf8PathBuf::as_path)
            .or_else(|| self.project_files.last().map(Utf8PathBuf::as_path))
            .or(self.user_file.as_deref())
    }
}

const CONFIG_EXTENSIONS: &[&str] = &["toml", "yaml", "yml", "json"];

const APP_NAME: &str = "autoria";

const ENV_PREFIX: &str = "AUTORIA_";

/// Builder for loading configuration from multiple sources.
#[derive(Debug)]
pub struct ConfigLoader {
    project_search_root: Option<Utf8PathBuf>,
    include_user_config: bool,
    boundary_marker: Option<String>,
    explicit_files: Vec<Utf8PathBuf>,
}

impl Default for ConfigLoader {
    fn default() -> Self {
        Self::new()
    }
}

impl ConfigLoader {
    /// A loader that reads user config and stops project search at `.git`.
    pub fn new() -> Self {
        Self {
            project_search_root: None,
            include_user_config: true,
            boundary_marker: Some(".git".to_string()),
            explicit_files: Vec::new(),
        }
    }

    /// Walk up from `path` looking for project config.
    pub fn with_project_search<P: AsRef<Utf8Path>>(mut self, path: P) -> Self {
        self.project_search_root = Some(path.as_ref().to_path_buf());
        self
    }

    /// Whether to read `~/.config/autoria/config.<ext>`.
    pub const fn with_user_config(mut self, include: bool) -> Self {
        self.include_user_config = include;
        self
    }

    /// Stop the upward walk at a directory containing `marker`.
    pub fn with_boundary_marker<S: Into<String>>(mut self, marker: S) -> Self {
        self.boundary_marker = Some(marker.into());
        self
    }

    /// Walk all the way to the filesystem root.
    pub fn without_boundary_marker(mut self) -> Self {
        self.boundary_marker = None;
        self
    }

    /// Add an explicit config file. Later files win.
    pub fn with_file<P: AsRef<Utf8Path>>(mut self, path: P) -> Self {
        self.explicit_files.push(path.as_ref().to_path_buf());
        self
    }

    /// Merge every source and extract the configuration.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Deserialize`] when a source holds an invalid
    /// value (an unknown content type, say).
    #[tracing::instrument(skip(self), fields(search_root = ?self.project_search_root))]
    pub fn load(self) -> ConfigResult<(Config, ConfigSources)> {
        tracing::debug!("loading configuration");
        let mut figment = Figment::new().merge(Serialized::defaults(Config::default()));
        let mut sources = ConfigSources::default();

        if self.include_user_config
            && let Some(user_config) = find_user_config()
        {
            figment = merge_file(figment, &user_config);
            sources.user_file = Some(user_config);
        }

        if let Some(ref root) = self.project_search_root {
            let project_configs = self.find_project_configs(root);
            for path in &project_configs {
                figment = merge_file(figment, path);
            }
            sources.project_files = project_configs;
        }

        for file in &self.explicit_files {
            figment = merge_file(figment, file);
        }
        sources.explicit_files = self.explicit_files;

        // AUTORIA_CONTENT_TYPE=casual, AUTORIA_MODE=academic-level, ...
        figment = figment.merge(Env::prefixed(ENV_PREFIX).lowercase(true));

        let config: Config = figment
            .extract()
            .map_err(|e| ConfigError::Deserialize(Box::new(e)))?;
        tracing::info!(
            log_level = config.log_level.as_str(),
            mode = config.analysis_mode().selector(),
            "configuration loaded"
        );
        Ok((config, sources))
    }

    /// Like [`load`](Self::load), but fail when no file was found at all.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::NotFound`] when no source file exists, and
    /// anything [`load`](Self::load) returns.
    pub fn load_or_error(self) -> ConfigResult<(Config, ConfigSources)> {
        let has_user = self.include_user_config && find_user_config().is_some();
        let has_project = self
            .project_search_root
            .as_ref()
            .is_some_and(|root| !self.find_project_configs(root).is_empty());
        if !has_user && !has_project && self.explicit_files.is_empty() {
            return Err(ConfigError::NotFound);
        }
        self.load()
    }

    /// Config files in the closest directory that has any, dotfiles first.
    fn find_project_configs(&self, start: &Utf8Path) -> Vec<Utf8PathBuf> {
        let mut current = Some(start.to_path_buf());

        while let Some(dir) = current {
            let found: Vec<Utf8PathBuf> = [format!(".{APP_NAME}"), APP_NAME.to_string()]
                .iter()
                .flat_map(|stem| {
                    CONFIG_EXTENSIONS
                        .iter()
                        .map(move |ext| format!("{stem}.{ext}"))
                })
                .map(|name| dir.join(name))
                .filter(|path| path.is_file())
                .collect();

            if !found.is_empty() {
                return found;
            }

            // Checked after the files so a config beside the marker still counts.
            if let Some(ref marker) = self.boundary_marker
                && dir.join(marker).exists()
                && dir != start
            {
                break;
            }

            current = dir.parent().map(Utf8Path::to_path_buf);
        }

        Vec::new()
    }
}

fn find_user_config() -> Option<Utf8PathBuf> {
    let dir = user_config_dir()?;
    CONFIG_EXTENSIONS
        .iter()
        .map(|ext| dir.join(format!("config.{ext}")))
        .find(|path| path.is_file())
}

fn merge_file(figment: Figment, path: &Utf8Path) -> Figment {
    match path.extension() {
        Some("yaml" | "yml") => figment.merge(Yaml::file_exact(path.as_str())),
        Some("json") => figment.merge(Json::file_exact(path.as_str())),
        _ => figment.merge(Toml::file_exact(path.as_str())),
    }
}

fn project_dirs() -> Option<directories::ProjectDirs> {
    directories::ProjectDirs::from("", "", APP_NAME)
}

/// The user config directory (`~/.config/autoria/` on Linux).
pub fn user_config_dir() -> Option<Utf8PathBuf> {
    let dirs = project_dirs()?;
    Utf8PathBuf::from_path_buf(dirs.config_dir().to_path_buf()).ok()
}

/// The user data directory (`~/.local/share/autoria/` on Linux).
///
/// Log files default to a `logs` directory under it.
pub fn user_data_dir() -> Option<Utf8PathBuf> {
    let dirs = project_dirs()?;
    Utf8PathBuf::from_path_buf(dirs.data_dir().to_path_buf()).ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use std::sync::Mutex;
    use tempfile::TempDir;

    /// Serializes tests that mutate environment variables.
    static TEST_ENV_MUTEX: Mutex<()> = Mutex::new(());

    fn utf8(path: &std::path::Path) -> Utf8PathBuf {
        Utf8PathBuf::try_from(path.to_path_buf()).unwrap()
    }

    fn load_file(name: &str, contents: &str) -> Config {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join(name);
        fs::write(&path, contents).unwrap();
        ConfigLoader::new()
            .with_user_config(false)
            .with_file(utf8(&path))
            .load()
            .unwrap()
            .0
    }

    #[test]
    fn defaults_match_engine_defaults() {
        let config = Config::default();
        assert_eq!(config.log_level, LogLevel::Info);
        assert_eq!(config.analysis_config(), AnalysisConfig::default());
        assert_eq!(config.history_limit, DEFAULT_HISTORY_LIMIT);
        assert_eq!(config.input_limit(), Some(crate::DEFAULT_MAX_INPUT_BYTES));
    }

    #[test]
    fn loader_works_without_any_file() {
        let (config, sources) = ConfigLoader::new()
            .with_user_config(false)
            .without_boundary_marker()
            .load()
            .unwrap();
        assert_eq!(config, Config::default());
        assert!(sources.primary_file().is_none());
    }

    #[test]
    fn toml_selects_academic_level_mode() {
        let config = load_file(
            "config.toml",
            "mode = \"academic-level\"\nacademic_level = \"doctoral\"\nsubject_area = \"natural\"\n",
        );
        assert_eq!(
            config.analysis_mode(),
            AnalysisMode::academic(AcademicLevel::Doctoral, SubjectArea::Natural)
        );
    }

    #[test]
    fn yaml_sets_content_type_and_budget() {
        let config = load_file(
            "config.yaml",
            "content_type: technical\npattern_budget_ms: 40\nbacktrack_limit: 5000\n",
        );
        let analysis = config.analysis_config();
        assert_eq!(analysis.mode, AnalysisMode::content_type(ContentType::Technical));
        assert_eq!(analysis.pattern_budget, Duration::from_millis(40));
        assert_eq!(analysis.backtrack_limit, 5000);
    }

    #[test]
    fn unknown_content_type_is_rejected() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("config.toml");
        fs::write(&path, "content_type = \"poetry\"\n").unwrap();
        let result = ConfigLoader::new()
            .with_user_config(false)
            .with_file(utf8(&path))
            .load();
        assert!(matches!(result, Err(ConfigError::Deserialize(_))));
    }

    #[test]
    fn later_file_overrides_earlier() {
        let tmp = TempDir::new().unwrap();
        let base = tmp.path().join("base.toml");
        fs::write(&base, "content_type = \"business\"").unwrap();
        let over = tmp.path().join("override.json");
        fs::write(&over, r#"{"content_type": "casual"}"#).unwrap();
        let over = utf8(&over);

        let (config, sources) = ConfigLoader::new()
            .with_user_config(false)
            .with_file(utf8(&base))
            .with_file(&over)
            .load()
            .unwrap();
        assert_eq!(config.content_type, ContentType::Casual);
        assert_eq!(sources.primary_file(), Some(over.as_path()));
    }

    #[test]
    fn project_config_found_from_subdirectory() {
        let tmp = TempDir::new().unwrap();
        let project = tmp.path().join("project");
        let deep = project.join("capitulos").join("rascunhos");
        fs::create_dir_all(&deep).unwrap();
        fs::write(project.join(".autoria.toml"), "history_limit = 7").unwrap();

        let (config, sources) = ConfigLoader::new()
            .with_user_config(false)
            .without_boundary_marker()
            .with_project_search(utf8(&deep))
            .load()
            .unwrap();
        assert_eq!(config.history_limit, 7);
        assert_eq!(sources.project_files.len(), 1);
    }

    #[test]
    fn boundary_marker_stops_search() {
        let tmp = TempDir::new().unwrap();
        let parent = tmp.path().join("parent");
        let child = parent.join("child");
        let work = child.join("work");
        fs::create_dir_all(&work).unwrap();
        fs::write(parent.join(".autoria.toml"), "history_limit = 3").unwrap();
        fs::create_dir(child.join(".git")).unwrap();

        let (config, sources) = ConfigLoader::new()
            .with_user_config(false)
            .with_boundary_marker(".git")
            .with_project_search(utf8(&work))
            .load()
            .unwrap();
        assert_eq!(config.history_limit, DEFAULT_HISTORY_LIMIT);
        assert!(sources.project_files.is_empty());
    }

    #[test]
    fn regular_file_wins_over_dotfile() {
        let tmp = TempDir::new().unwrap();
        fs::write(tmp.path().join(".autoria.toml"), "log_level = \"debug\"").unwrap();
        fs::write(tmp.path().join("autoria.yaml"), "log_level: error\n").unwrap();

        let (config, sources) = ConfigLoader::new()
            .with_user_config(false)
            .without_boundary_marker()
            .with_project_search(utf8(tmp.path()))
            .load()
            .unwrap();
        assert_eq!(config.log_level, LogLevel::Error);
        assert_eq!(sources.project_files.len(), 2);
    }

    #[test]
    fn only_closest_directory_contributes() {
        let tmp = TempDir::new().unwrap();
        let parent = tmp.path().join("parent");
        let child = parent.join("child");
        fs::create_dir_all(&child).unwrap();
        fs::write(parent.join("autoria.toml"), "content_type = \"creative\"").unwrap();
        fs::write(child.join(".autoria.toml"), "log_level = \"warn\"").unwrap();

        let (config, sources) = ConfigLoader::new()
            .with_user_config(false)
            .without_boundary_marker()
            .with_project_search(utf8(&child))
            .load()
            .unwrap();
        assert_eq!(config.log_level, LogLevel::Warn);
        assert_eq!(config.content_type, ContentType::Academic);
        assert_eq!(sources.project_files.len(), 1);
    }

    #[test]
    fn load_or_error_requires_a_file() {
        let result = ConfigLoader::new()
            .with_user_config(false)
            .without_boundary_marker()
            .load_or_error();
        assert!(matches!(result, Err(ConfigError::NotFound)));
    }

    #[test]
    fn disable_input_limit_overrides_max_bytes() {
        let config = load_file(
            "config.toml",
            "max_input_bytes = 1024\ndisable_input_limit = true\n",
        );
        assert_eq!(config.max_input_bytes, Some(1024));
        assert_eq!(config.input_limit(), None);
    }

    #[test]
    fn config_round_trips_through_yaml() {
        let yaml = "mode: academic-level\nacademic_level: undergrad\n";
        let config: Config = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(config.academic_level, AcademicLevel::Undergrad);
        assert_eq!(config.pattern_budget_ms, DEFAULT_PATTERN_BUDGET_MS);
    }

    #[test]
    #[allow(unsafe_code)]
    fn env_var_overrides_file_config() {
        let _lock = TEST_ENV_MUTEX.lock().unwrap_or_else(|e| e.into_inner());

        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("config.toml");
        fs::write(&path, "content_type = \"business\"\n").unwrap();

        // SAFETY: the mutex serializes env access across tests.
        unsafe {
            std::env::set_var("AUTORIA_CONTENT_TYPE", "casual");
        }

        let result = ConfigLoader::new()
            .with_user_config(false)
            .with_file(utf8(&path))
            .load();

        // SAFETY: cleanup under the same lock.
        unsafe {
            std::env::remove_var("AUTORIA_CONTENT_TYPE");
        }

        assert_eq!(result.unwrap().0.content_type, ContentType::Casual);
    }

    #[test]
    #[allow(unsafe_code)]
    fn env_var_selects_mode() {
        let _lock = TEST_ENV_MUTEX.lock().unwrap_or_else(|e| e.into_inner());

        // SAFETY: the mutex serializes env access across tests.
        unsafe {
            std::env::set_var("AUTORIA_MODE", "academic-level");
            std::env::set_var("AUTORIA_ACADEMIC_LEVEL", "researcher");
        }

        let result = ConfigLoader::new()
            .with_user_config(false)
            .without_boundary_marker()
            .load();

        // SAFETY: cleanup under the same lock.
        unsafe {
            std::env::remove_var("AUTORIA_MODE");
            std::env::remove_var("AUTORIA_ACADEMIC_LEVEL");
        }

        let config = result.unwrap().0;
        assert!(config.analysis_mode().is_academic_level());
        assert_eq!(config.academic_level, AcademicLevel::Researcher);
    }
}
