// Configuration is loaded in order of precedence:
// 1. Command-line flags (applied by the caller)
// 2. Config file (~/.config/tintweak/config.toml)
// 3. Built-in defaults

use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use serde::Deserialize;

use crate::adjust::Steps;

/// Logging configuration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoggingConfig {
    /// Write a log file at all. Off by default: the terminal is busy with the TUI.
    pub enabled: bool,

    /// Level filter used when RUST_LOG is unset: trace, debug, info, warn, error
    pub level: String,

    /// Directory holding tintweak.log
    pub dir: PathBuf,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            level: "info".to_string(),
            dir: dirs::cache_dir()
                .unwrap_or_else(std::env::temp_dir)
                .join("tintweak"),
        }
    }
}

/// Application configuration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// Directory scanned for base16-<name>.sh scripts
    pub themes_dir: PathBuf,

    /// Reset the terminal's colors to its defaults on quit
    pub restore_on_exit: bool,

    /// Adjustment step sizes
    pub steps: Steps,

    pub logging: LoggingConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            themes_dir: dirs::home_dir()
                .unwrap_or_default()
                .join(".themes")
                .join("shell")
                .join("scripts"),
            restore_on_exit: true,
            steps: Steps::default(),
            logging: LoggingConfig::default(),
        }
    }
}

/// Logging settings as loaded from config file
#[derive(Debug, Deserialize, Default)]
#[serde(deny_unknown_fields)]
struct FileLogging {
    enabled: Option<bool>,
    level: Option<String>,
    dir: Option<String>,
}

/// Config file structure
#[derive(Debug, Deserialize, Default)]
#[serde(deny_unknown_fields)]
struct FileConfig {
    themes_dir: Option<String>,
    restore_on_exit: Option<bool>,

    /// Optional [steps] section
    steps: Option<Steps>,

    /// Optional [logging] section
    logging: Option<FileLogging>,
}

impl Config {
    /// Default config file path: ~/.config/tintweak/config.toml
    pub fn config_path() -> Option<PathBuf> {
        Some(dirs::config_dir()?.join("tintweak").join("config.toml"))
    }

    /// Load from `path`, or from [`Config::config_path`] when `None`.
    ///
    /// A missing default file yields the defaults; a missing explicit file is
    /// an error.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let (path, explicit) = match path {
            Some(p) => (p.to_path_buf(), true),
            None => match Self::config_path() {
                Some(p) => (p, false),
                None => return Ok(Self::default()),
            },
        };
        if !explicit && !path.exists() {
            return Ok(Self::default());
        }
        let text = std::fs::read_to_string(&path)
            .with_context(|| format!("couldn't read config file {}", path.display()))?;
        Self::from_toml(&text)
            .with_context(|| format!("invalid config file {}", path.display()))
    }

    pub fn from_toml(text: &str) -> Result<Self> {
        let file: FileConfig = toml::from_str(text)?;
        let mut config = Self::default();

        if let Some(dir) = file.themes_dir {
            config.themes_dir = expand_tilde(&dir);
        }
        if let Some(restore) = file.restore_on_exit {
            config.restore_on_exit = restore;
        }
        if let Some(steps) = file.steps {
            if steps.fine <= 0 || steps.normal <= 0 || steps.coarse <= 0 {
                bail!("step sizes must be positive, got {steps:?}");
            }
            config.steps = steps;
        }
        if let Some(logging) = file.logging {
            if let Some(enabled) = logging.enabled {
                config.logging.enabled = enabled;
            }
            if let Some(level) = logging.level {
                config.logging.level = level;
            }
            if let Some(dir) = logging.dir {
                config.logging.dir = expand_tilde(&dir);
            }
        }
        Ok(config)
    }
}

/// Expand a leading `~/` to the home directory.
pub fn expand_tilde(path: &str) -> PathBuf {
    match (path.strip_prefix("~/"), dirs::home_dir()) {
        (Some(rest), Some(home)) => home.join(rest),
        _ => PathBuf::from(path),
    }
}
