//! Configuration management with layered loading
//!
//! Precedence (lowest to highest):
//! 1. Compiled defaults
//! 2. Global config: `$XDG_CONFIG_HOME/hscode/hscode.toml`
//! 3. Local config: `<dir>/.hscode.toml` (working directory unless given)
//! 4. Environment variables: `HSCODE_*` prefix

use std::path::{Path, PathBuf};

use config::{Config, ConfigError, Environment};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};

use crate::application::ApplicationError;
use crate::domain::{RowPolicy, DEFAULT_CANDIDATE_LIMIT};

/// Default number of ranked chapters shown by `search`.
pub const DEFAULT_TOP: usize = 5;

/// Unified configuration for hscode.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct Settings {
    /// Tariff table (CSV: level, code, local text, alternate text)
    pub table_path: PathBuf,
    /// Optional pre-built forest JSON; rebuilt from the table when absent
    pub tree_path: Option<PathBuf>,
    /// Fail on rows with an unparseable level instead of skipping them
    pub strict_rows: bool,
    /// Maximum candidates handed to the classifier
    pub candidate_limit: usize,
    /// Ranked chapters shown by `search`
    pub top: usize,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            table_path: PathBuf::from("data.csv"),
            tree_path: None,
            strict_rows: false,
            candidate_limit: DEFAULT_CANDIDATE_LIMIT,
            top: DEFAULT_TOP,
        }
    }
}

/// Raw settings for intermediate parsing (`None` means "not specified").
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct RawSettings {
    pub table_path: Option<PathBuf>,
    pub tree_path: Option<PathBuf>,
    pub strict_rows: Option<bool>,
    pub candidate_limit: Option<usize>,
    pub top: Option<usize>,
}

/// Get the XDG config directory for hscode.
pub fn global_config_dir() -> Option<PathBuf> {
    ProjectDirs::from("", "", "hscode").map(|dirs| dirs.config_dir().to_path_buf())
}

/// Get the path to the global config file.
pub fn global_config_path() -> Option<PathBuf> {
    global_config_dir().map(|dir| dir.join("hscode.toml"))
}

/// Get the path to the local config file in a directory.
pub fn local_config_path(dir: &Path) -> PathBuf {
    dir.join(".hscode.toml")
}

/// Expand `~`, `$VAR` and `${VAR}` in a path string.
pub fn expand_env_vars(path: &str) -> String {
    shellexpand::full(path)
        .map(|s| s.into_owned())
        .unwrap_or_else(|_| path.to_string())
}

/// Load a TOML file into RawSettings for manual merging.
///
/// Relative paths inside the file are resolved against the file's directory.
fn load_raw_settings(path: &Path) -> Result<RawSettings, ApplicationError> {
    let content = std::fs::read_to_string(path).map_err(|e| ApplicationError::Config {
        message: format!("read {}: {}", path.display(), e),
    })?;
    let mut raw: RawSettings = toml::from_str(&content).map_err(|e| ApplicationError::Config {
        message: format!("parse {}: {}", path.display(), e),
    })?;

    if let Some(dir) = path.parent() {
        let anchor = |p: PathBuf| {
            let expanded = PathBuf::from(expand_env_vars(&p.to_string_lossy()));
            if expanded.is_relative() {
                dir.join(expanded)
            } else {
                expanded
            }
        };
        raw.table_path = raw.table_path.map(anchor);
        raw.tree_path = raw.tree_path.map(anchor);
    }
    Ok(raw)
}

impl Settings {
    /// Row handling policy derived from `strict_rows`.
    pub fn row_policy(&self) -> RowPolicy {
        if self.strict_rows {
            RowPolicy::Strict
        } else {
            RowPolicy::Skip
        }
    }

    /// Expand shell variables and tilde in path fields.
    fn expand_paths(&mut self) {
        let expanded = expand_env_vars(self.table_path.to_string_lossy().as_ref());
        self.table_path = PathBuf::from(expanded);

        if let Some(tree_path) = &self.tree_path {
            self.tree_path = Some(PathBuf::from(expand_env_vars(
                tree_path.to_string_lossy().as_ref(),
            )));
        }
    }

    /// Overlay config onto self: every field the overlay specifies wins.
    fn merge_with(&self, overlay: &RawSettings) -> Self {
        Self {
            table_path: overlay
                .table_path
                .clone()
                .unwrap_or_else(|| self.table_path.clone()),
            tree_path: overlay.tree_path.clone().or_else(|| self.tree_path.clone()),
            strict_rows: overlay.strict_rows.unwrap_or(self.strict_rows),
            candidate_limit: overlay.candidate_limit.unwrap_or(self.candidate_limit),
            top: overlay.top.unwrap_or(self.top),
        }
    }

    /// Load settings with layered precedence.
    ///
    /// # Arguments
    /// * `local_dir` - Directory holding `.hscode.toml` (default: working directory)
    pub fn load(local_dir: Option<&Path>) -> Result<Self, ApplicationError> {
        // 1. Start with defaults
        let mut current = Self::default();

        // 2. Global config
        if let Some(global_path) = global_config_path() {
            if global_path.exists() {
                let raw = load_raw_settings(&global_path)?;
                current = current.merge_with(&raw);
            }
        }

        // 3. Local config
        let local_dir = match local_dir {
            Some(dir) => Some(dir.to_path_buf()),
            None => std::env::current_dir().ok(),
        };
        if let Some(dir) = local_dir {
            let local_path = local_config_path(&dir);
            if local_path.exists() {
                let raw = load_raw_settings(&local_path)?;
                current = current.merge_with(&raw);
            }
        }

        // 4. Environment variables (explicit override)
        current = Self::apply_env_overrides(current)?;

        current.expand_paths();

        Ok(current)
    }

    /// Apply HSCODE_* environment variables as explicit overrides.
    fn apply_env_overrides(mut settings: Self) -> Result<Self, ApplicationError> {
        let config = Config::builder()
            .add_source(Environment::with_prefix("HSCODE").separator("__"))
            .build()
            .map_err(config_err)?;

        if let Ok(val) = config.get_string("table_path") {
            settings.table_path = PathBuf::from(val);
        }
        if let Ok(val) = config.get_string("tree_path") {
            settings.tree_path = Some(PathBuf::from(val));
        }
        if let Ok(val) = config.get_bool("strict_rows") {
            settings.strict_rows = val;
        }
        if let Ok(val) = config.get::<usize>("candidate_limit") {
            settings.candidate_limit = val;
        }
        if let Ok(val) = config.get::<usize>("top") {
            settings.top = val;
        }

        Ok(settings)
    }

    /// Show the effective configuration as TOML.
    pub fn to_toml(&self) -> Result<String, ApplicationError> {
        toml::to_string_pretty(self).map_err(|e| ApplicationError::Config {
            message: format!("serialize config: {e}"),
        })
    }

    /// Generate a template config file.
    pub fn template() -> String {
        r#"# hscode configuration
#
# Locations (by precedence, lowest to highest):
#   Global: ~/.config/hscode/hscode.toml
#   Local:  ./.hscode.toml              (relative paths resolve against its directory)
#   Env:    HSCODE_* environment variables

# Tariff table: CSV with columns level, code, local text, alternate text
# table_path = "data.csv"

# Pre-built forest JSON (from `hscode export`); rebuilt from the table when unset
# tree_path = "output.json"

# Abort on rows whose level is not a number (default: skip them with a warning)
# strict_rows = false

# Maximum number of candidates handed to the classifier
# candidate_limit = 150

# Number of ranked chapters shown by `hscode search`
# top = 5
"#
        .to_string()
    }
}

fn config_err(e: ConfigError) -> ApplicationError {
    ApplicationError::Config {
        message: e.to_string(),
    }
}
