//! Configuration file loading with precedence handling.

use super::keybindings::{KeyBindingError, KeyBindings};
use crate::framework::{FrameworkCommand, DEFAULT_PROGRAM};
use serde::Deserialize;
use std::collections::HashMap;
use std::path::PathBuf;
use thiserror::Error;

/// Environment variable naming an explicit config file.
pub const CONFIG_ENV_VAR: &str = "TESTDECK_CONFIG";

/// Environment variable overriding the framework program.
pub const COMMAND_ENV_VAR: &str = "TESTDECK_COMMAND";

/// Errors that can occur during config loading.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ConfigError {
    /// Failed to read config file (permission issues, not a file, ...).
    #[error("Failed to read config file at {path}: {reason}")]
    ReadError {
        /// Path that failed to read.
        path: PathBuf,
        /// Reason for failure.
        reason: String,
    },

    /// Config file contains invalid TOML syntax or unknown fields.
    #[error("Invalid TOML in {path}: {reason}")]
    ParseError {
        /// Path with invalid TOML.
        path: PathBuf,
        /// Parse error details.
        reason: String,
    },

    /// The `[keybindings]` table is invalid.
    #[error("Invalid key bindings: {0}")]
    KeyBindings(#[from] KeyBindingError),
}

/// A key binding entry: one key string or a list of them.
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
#[serde(untagged)]
pub enum KeySpec {
    /// `run_selected = "r"`
    One(String),
    /// `run_selected = ["r", "enter"]`
    Many(Vec<String>),
}

impl KeySpec {
    fn into_vec(self) -> Vec<String> {
        match self {
            KeySpec::One(key) => vec![key],
            KeySpec::Many(keys) => keys,
        }
    }
}

/// TOML configuration file structure.
///
/// All fields are optional - if not specified, hardcoded defaults are used.
/// Corresponds to `~/.config/testdeck/config.toml`.
#[derive(Debug, Clone, Default, Deserialize, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct ConfigFile {
    /// Test framework program (e.g., "pytest", "python").
    #[serde(default)]
    pub command: Option<String>,

    /// Arguments placed before every framework invocation
    /// (e.g., `["-m", "pytest"]`).
    #[serde(default)]
    pub args: Option<Vec<String>>,

    /// Path to log file for tracing output.
    #[serde(default)]
    pub log_file_path: Option<PathBuf>,

    /// Key binding overrides keyed by action name.
    #[serde(default)]
    pub keybindings: Option<HashMap<String, KeySpec>>,
}

/// Resolved configuration after applying precedence rules.
///
/// Created by merging defaults, config file, env vars, and CLI args.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedConfig {
    /// Framework program.
    pub command: String,
    /// Leading framework arguments.
    pub args: Vec<String>,
    /// Path to log file for tracing output.
    pub log_file_path: PathBuf,
    /// Effective key bindings.
    pub keybindings: KeyBindings,
    /// Whether colours are disabled.
    pub no_color: bool,
}

impl Default for ResolvedConfig {
    fn default() -> Self {
        Self {
            command: DEFAULT_PROGRAM.to_string(),
            args: Vec::new(),
            log_file_path: default_log_path(),
            keybindings: KeyBindings::default(),
            no_color: false,
        }
    }
}

impl ResolvedConfig {
    /// Framework invocation described by this config.
    pub fn framework(&self) -> FrameworkCommand {
        FrameworkCommand::new(&self.command).with_args(self.args.iter().cloned())
    }
}

/// Resolve default log file path.
///
/// Returns `~/.local/state/testdeck/testdeck.log` on Unix-like systems,
/// or appropriate platform path on other systems.
///
/// If state directory cannot be determined, falls back to current directory.
pub fn default_log_path() -> PathBuf {
    if let Some(state_dir) = dirs::state_dir() {
        state_dir.join("testdeck").join("testdeck.log")
    } else {
        PathBuf::from("testdeck.log")
    }
}

/// Load configuration file from a specific path.
///
/// Returns `Ok(None)` if file doesn't exist (not an error - use defaults).
///
/// # Errors
///
/// Returns error if file exists but has read or parse errors.
pub fn load_config_file(path: impl Into<PathBuf>) -> Result<Option<ConfigFile>, ConfigError> {
    let path = path.into();

    // Missing file is not an error - use defaults
    if !path.exists() {
        return Ok(None);
    }

    let contents = std::fs::read_to_string(&path).map_err(|e| ConfigError::ReadError {
        path: path.clone(),
        reason: e.to_string(),
    })?;

    let config: ConfigFile = toml::from_str(&contents).map_err(|e| ConfigError::ParseError {
        path: path.clone(),
        reason: e.to_string(),
    })?;

    Ok(Some(config))
}

/// Resolve default config file path.
///
/// Returns `~/.config/testdeck/config.toml` on Unix, appropriate path on other platforms.
/// Returns `None` if home directory cannot be determined.
pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join("testdeck").join("config.toml"))
}

/// Load configuration with precedence handling.
///
/// Precedence (highest to lowest):
/// 1. Explicit `config_path` argument (CLI `--config`)
/// 2. `TESTDECK_CONFIG` environment variable
/// 3. Default path `~/.config/testdeck/config.toml`
///
/// Missing config files are NOT errors - defaults are used.
///
/// # Errors
///
/// Returns error only if a config file exists but cannot be read or parsed.
pub fn load_config_with_precedence(
    config_path: Option<PathBuf>,
) -> Result<Option<ConfigFile>, ConfigError> {
    if let Some(path) = config_path {
        return load_config_file(path);
    }

    if let Ok(env_path) = std::env::var(CONFIG_ENV_VAR) {
        return load_config_file(PathBuf::from(env_path));
    }

    if let Some(default_path) = default_config_path() {
        return load_config_file(default_path);
    }

    Ok(None)
}

/// Merge config file into defaults to create resolved config.
///
/// For each field in `ConfigFile`, if `Some(value)`, use it; otherwise use default.
///
/// # Errors
///
/// Returns `ConfigError::KeyBindings` if the `[keybindings]` table names an
/// unknown action or an unparseable key.
pub fn merge_config(config_file: Option<ConfigFile>) -> Result<ResolvedConfig, ConfigError> {
    let defaults = ResolvedConfig::default();

    let Some(config) = config_file else {
        return Ok(defaults);
    };

    let keybindings = match config.keybindings {
        Some(table) => {
            let overrides: HashMap<String, Vec<String>> = table
                .into_iter()
                .map(|(action, spec)| (action, spec.into_vec()))
                .collect();
            defaults.keybindings.clone().with_overrides(&overrides)?
        }
        None => defaults.keybindings.clone(),
    };

    Ok(ResolvedConfig {
        command: config.command.unwrap_or(defaults.command),
        args: config.args.unwrap_or(defaults.args),
        log_file_path: config.log_file_path.unwrap_or(defaults.log_file_path),
        keybindings,
        no_color: defaults.no_color,
    })
}

/// Apply environment variable overrides to resolved config.
///
/// Checks for:
/// - `TESTDECK_COMMAND`: Override framework program
/// - `NO_COLOR`: Any value disables colours
pub fn apply_env_overrides(mut config: ResolvedConfig) -> ResolvedConfig {
    if let Ok(command) = std::env::var(COMMAND_ENV_VAR) {
        if !command.is_empty() {
            config.command = command;
        }
    }

    if std::env::var_os("NO_COLOR").is_some() {
        config.no_color = true;
    }

    config
}

/// Apply CLI argument overrides to resolved config.
///
/// CLI args have the highest precedence and override all other sources.
/// Only applies overrides for flags that were explicitly set by the user.
///
/// Precedence chain: Defaults → Config File → Env Vars → CLI Args (highest)
pub fn apply_cli_overrides(
    mut config: ResolvedConfig,
    command_override: Option<String>,
    no_color_override: Option<bool>,
) -> ResolvedConfig {
    if let Some(command) = command_override {
        config.command = command;
    }

    if let Some(no_color) = no_color_override {
        config.no_color = no_color;
    }

    config
}

#[cfg(test)]
#[path = "loader_tests.rs"]
mod tests;

#[cfg(test)]
mod log_path_tests {
    use super::*;

    #[test]
    fn default_log_path_ends_with_testdeck_log() {
        let path = default_log_path();
        assert!(
            path.to_string_lossy().ends_with("testdeck.log"),
            "Default log path should end with 'testdeck.log', got: {:?}",
            path
        );
    }

    #[test]
    fn resolved_config_default_includes_log_path() {
        let config = ResolvedConfig::default();
        assert!(
            !config.log_file_path.as_os_str().is_empty(),
            "Default config should have non-empty log_file_path"
        );
    }

    #[test]
    fn config_file_log_path_overrides_default() {
        let custom_path = PathBuf::from("/custom/path/to/app.log");
        let config_file = ConfigFile {
            log_file_path: Some(custom_path.clone()),
            ..ConfigFile::default()
        };

        let resolved = merge_config(Some(config_file)).unwrap();
        assert_eq!(
            resolved.log_file_path, custom_path,
            "Config file log_file_path should override default"
        );
    }
}
