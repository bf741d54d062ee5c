//! Configuration file loading for match hosting.
//!
//! Settings come from `chess-match.toml` in the working directory. Every
//! field has a default, so a missing file or a partial one is fine.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;
use thiserror::Error;

/// Errors that can occur when loading or parsing configuration.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Failed to read the configuration file from disk.
    #[error("Failed to read config file: {0}")]
    ReadError(#[from] std::io::Error),
    /// Failed to parse the configuration file as valid TOML.
    #[error("Failed to parse config: {0}")]
    ParseError(#[from] toml::de::Error),
}

/// Settings for hosting matches.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct MatchConfig {
    /// Time a member has for one turn, in milliseconds. Defaults to five
    /// minutes.
    #[serde(default = "default_turn_duration_ms")]
    pub turn_duration_ms: u64,
    /// Whether turns are timed at all. Defaults to true.
    #[serde(default = "default_clock_enabled")]
    pub clock_enabled: bool,
    /// `tracing` filter directive used when no `RUST_LOG` is set.
    #[serde(default = "default_log_filter")]
    pub log_filter: String,
}

fn default_turn_duration_ms() -> u64 {
    300_000
}

fn default_clock_enabled() -> bool {
    true
}

fn default_log_filter() -> String {
    "info".to_string()
}

impl Default for MatchConfig {
    fn default() -> Self {
        MatchConfig {
            turn_duration_ms: default_turn_duration_ms(),
            clock_enabled: default_clock_enabled(),
            log_filter: default_log_filter(),
        }
    }
}

impl MatchConfig {
    /// Loads the configuration from [`Self::config_path()`].
    ///
    /// If the file does not exist, returns the defaults.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::ReadError`] if the file exists but cannot be read,
    /// or [`ConfigError::ParseError`] if the file contains invalid TOML.
    pub fn load() -> Result<Self, ConfigError> {
        Self::load_from(Self::config_path())
    }

    /// Loads the configuration from `path`, falling back to defaults when
    /// the file is absent.
    pub fn load_from<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        if path.exists() {
            let content = std::fs::read_to_string(path)?;
            Ok(toml::from_str(&content)?)
        } else {
            Ok(Self::default())
        }
    }

    /// Returns the path to the configuration file.
    pub fn config_path() -> PathBuf {
        PathBuf::from("chess-match.toml")
    }

    pub fn turn_duration(&self) -> Duration {
        Duration::from_millis(self.turn_duration_ms)
    }
}
