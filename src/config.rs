//! Rolls configuration.
//!
//! Loaded from `~/.rolls/config.toml`. Every key is optional; a missing file
//! means all defaults.

use std::fs;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// Rolls configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct Config {
    /// Scenario used for a fresh profile and for `start` without an argument.
    pub default_scenario: String,

    /// Alternative scenario library, e.g. a translated one.
    /// The built-in library is used when unset.
    pub scenario_library: Option<PathBuf>,

    /// How often `--follow` checks for changes.
    pub follow_interval_ms: u64,

    /// Overrides where the profile store lives.
    pub profile_dir: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            default_scenario: "ddos-attack".to_string(),
            scenario_library: None,
            follow_interval_ms: 500,
            profile_dir: None,
        }
    }
}

impl Config {
    /// Load config from `~/.rolls/config.toml`, or defaults if it is absent.
    pub fn load() -> Result<Self, String> {
        let Some(path) = Self::path() else {
            return Ok(Self::default());
        };

        let contents = match fs::read_to_string(&path) {
            Ok(s) => s,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Self::default()),
            Err(e) => return Err(format!("failed to read {}: {e}", path.display())),
        };

        Self::parse(&contents).map_err(|e| format!("invalid config at {}: {e}", path.display()))
    }

    fn parse(contents: &str) -> Result<Self, String> {
        let config: Self = toml::from_str(contents).map_err(|e| e.to_string())?;

        if config.default_scenario.is_empty() {
            return Err("default-scenario is empty".to_string());
        }
        if config.follow_interval_ms == 0 {
            return Err("follow-interval-ms must be at least 1".to_string());
        }

        Ok(config)
    }

    /// The config file path: `~/.rolls/config.toml`.
    pub fn path() -> Option<PathBuf> {
        dirs::home_dir().map(|h| h.join(".rolls").join("config.toml"))
    }
}
