// SPDX-License-Identifier: AGPL-3.0-or-later
// SPDX-FileCopyrightText: 2025 Jonathan D.A. Jewell
//! Configuration management
//!
//! Settings are layered: built-in defaults, then an optional TOML file, then
//! `GRAPHREEL_*` environment variables.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Environment variable prefix for overrides
pub const ENV_PREFIX: &str = "GRAPHREEL";

/// Default pause between replayed steps, in milliseconds
pub const REPLAY_TIMEOUT_MS: u64 = 300;

/// Default increment when adjusting the pause, in milliseconds
pub const TIMEOUT_STEP_MS: u64 = 100;

fn project_dirs() -> Option<directories::ProjectDirs> {
    directories::ProjectDirs::from("com", "hyperpolymath", "graphreel")
}

/// Application configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Config {
    /// Directory holding named graph files
    pub data_dir: PathBuf,
    /// Pause between replayed steps, in milliseconds
    pub replay_timeout_ms: u64,
    /// Increment when adjusting the pause, in milliseconds
    pub timeout_step_ms: u64,
    /// Log level (trace, debug, info, warn, error)
    pub log_level: String,
    /// Graph used when none is named on the command line
    pub default_graph: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            data_dir: project_dirs()
                .map(|d| d.data_dir().to_path_buf())
                .unwrap_or_else(|| PathBuf::from(".graphreel")),
            replay_timeout_ms: REPLAY_TIMEOUT_MS,
            timeout_step_ms: TIMEOUT_STEP_MS,
            log_level: "info".to_string(),
            default_graph: "default".to_string(),
        }
    }
}

impl Config {
    /// Pause between replayed steps
    #[must_use]
    pub fn replay_timeout(&self) -> Duration {
        Duration::from_millis(self.replay_timeout_ms)
    }

    /// Render as TOML
    pub fn to_toml(&self) -> Result<String> {
        toml::to_string_pretty(self).context("Failed to serialize configuration")
    }
}

/// Default location of the configuration file
#[must_use]
pub fn default_path() -> Option<PathBuf> {
    project_dirs().map(|d| d.config_dir().join("graphreel.toml"))
}

/// Load configuration from `path` (or the default location) and the environment
pub fn load(path: Option<&Path>) -> Result<Config> {
    let defaults = Config::default();
    let file = path.map(Path::to_path_buf).or_else(default_path);

    let mut builder = config::Config::builder()
        .set_default("data_dir", defaults.data_dir.to_string_lossy().into_owned())?
        .set_default("replay_timeout_ms", i64::try_from(defaults.replay_timeout_ms)?)?
        .set_default("timeout_step_ms", i64::try_from(defaults.timeout_step_ms)?)?
        .set_default("log_level", defaults.log_level)?
        .set_default("default_graph", defaults.default_graph)?;

    if let Some(file) = file {
        // An explicitly named file must exist
        builder = builder.add_source(config::File::from(file.as_path()).required(path.is_some()));
    }

    builder
        .add_source(config::Environment::with_prefix(ENV_PREFIX))
        .build()
        .context("Failed to read configuration")?
        .try_deserialize()
        .context("Invalid configuration")
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.replay_timeout(), Duration::from_millis(300));
        assert_eq!(config.timeout_step_ms, 100);
        assert_eq!(config.default_graph, "default");
    }

    #[test]
    fn test_file_overrides_defaults() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("graphreel.toml");
        std::fs::write(&path, "replay_timeout_ms = 25\ndefault_graph = \"maze\"\n").unwrap();

        let config = load(Some(&path)).unwrap();
        assert_eq!(config.replay_timeout_ms, 25);
        assert_eq!(config.default_graph, "maze");
        assert_eq!(config.log_level, "info");
    }

    #[test]
    fn test_missing_explicit_file_fails() {
        let dir = TempDir::new().unwrap();
        assert!(load(Some(&dir.path().join("absent.toml"))).is_err());
    }

    #[test]
    fn test_to_toml() {
        let toml = Config::default().to_toml().unwrap();
        assert!(toml.contains("replay_timeout_ms = 300"));
    }
}
