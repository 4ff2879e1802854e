// src/config.rs
//
// Loaded from `$XDG_CONFIG_HOME/yellow-snow/config.toml` (~/.config/yellow-snow/config.toml).
// A missing file means defaults; command-line flags override whatever is set here.

use crate::error::{Error, Result};
use crate::heat::ThemeId;
use serde::Deserialize;
use std::path::{Path, PathBuf};

fn home_dir() -> PathBuf {
    std::env::var_os("HOME")
        .map(PathBuf::from)
        .or_else(dirs::home_dir)
        .unwrap_or_else(|| PathBuf::from("."))
}

fn xdg_config_home() -> PathBuf {
    std::env::var("XDG_CONFIG_HOME")
        .map(PathBuf::from)
        .unwrap_or_else(|_| home_dir().join(".config"))
}

#[derive(Debug, Deserialize, Default)]
pub struct Config {
    #[serde(default)]
    pub annotate: AnnotateConfig,

    #[serde(default)]
    pub display: DisplayConfig,

    #[serde(default)]
    pub logging: LoggingConfig,
}

/// How the annotate command is invoked
#[derive(Debug, Deserialize, Clone)]
pub struct AnnotateConfig {
    /// git executable, looked up on PATH unless absolute
    #[serde(default = "default_git")]
    pub git: PathBuf,

    /// Pass `-w` so whitespace-only changes do not steal authorship
    #[serde(default = "default_true")]
    pub ignore_whitespace: bool,

    /// Pass `--stat`
    #[serde(default = "default_true")]
    pub diffstat: bool,
}

impl Default for AnnotateConfig {
    fn default() -> Self {
        Self {
            git: default_git(),
            ignore_whitespace: true,
            diffstat: true,
        }
    }
}

#[derive(Debug, Deserialize, Clone)]
pub struct DisplayConfig {
    #[serde(default)]
    pub theme: ThemeId,

    #[serde(default = "default_true")]
    pub show_authors: bool,
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            theme: ThemeId::default(),
            show_authors: true,
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error)
    #[serde(default = "default_log_level")]
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

fn default_git() -> PathBuf {
    PathBuf::from("git")
}

fn default_true() -> bool {
    true
}

fn default_log_level() -> String {
    "warn".to_string()
}

impl Config {
    /// Load configuration from the default path
    pub fn load() -> Result<Self> {
        let config_path = Self::config_path();

        if !config_path.exists() {
            tracing::debug!("No config file found at {:?}, using defaults", config_path);
            return Ok(Config::default());
        }

        Self::load_from(&config_path)
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| Error::Config(format!("failed to read config file {:?}: {}", path, e)))?;

        Self::parse(&content)
    }

    pub fn parse(content: &str) -> Result<Self> {
        toml::from_str(content).map_err(|e| Error::Config(format!("failed to parse config: {}", e)))
    }

    pub fn config_path() -> PathBuf {
        xdg_config_home().join("yellow-snow").join("config.toml")
    }
}
