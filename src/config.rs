//! Configuration management for Crank applications.
//!
//! Handles loading application settings from an optional TOML file: metadata,
//! default command, extra aliases and help variables.

use crate::cli::Verbosity;
use crate::error::{CrankError, Result};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

/// Main configuration structure.
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq, Eq)]
pub struct Config {
    /// Application settings.
    #[serde(default)]
    pub app: AppConfig,

    /// Extra aliases, alias to canonical command name.
    #[serde(default)]
    pub aliases: BTreeMap<String, String>,

    /// Extra `{$name}` placeholders for help text.
    #[serde(default)]
    pub help_vars: BTreeMap<String, String>,

    /// Write logs to this file instead of stderr.
    pub log_file: Option<PathBuf>,
}

/// Application settings.
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq, Eq)]
pub struct AppConfig {
    /// Binary name shown in help (`{$binName}`).
    pub name: Option<String>,

    /// One-line description.
    pub description: Option<String>,

    /// Version string.
    pub version: Option<String>,

    /// Command to run when no command is given.
    pub default_command: Option<String>,

    /// Terminate the process with the computed exit code after a run.
    #[serde(default)]
    pub exit_on_end: bool,

    /// Base logging verbosity, raised by `-v`.
    pub verbosity: Option<Verbosity>,
}

impl Config {
    /// Returns the default config file path for the current platform.
    pub fn default_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("crank")
            .join("config.toml")
    }

    /// Loads configuration from a TOML file. A missing file yields defaults.
    pub fn load_from_file(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(path)
            .map_err(|e| CrankError::config(format!("Failed to read config file: {e}")))?;

        Self::parse_toml(&content, path)
    }

    /// Parses configuration from a TOML string.
    fn parse_toml(content: &str, path: &Path) -> Result<Self> {
        toml::from_str(content).map_err(|e| {
            CrankError::config(format!(
                "Configuration error in {}:\n  {}",
                path.display(),
                e
            ))
        })
    }
}
