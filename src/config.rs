//! Configuration loading for GrahaNav

use crate::error::{GrahaError, Result};
use crate::planet::StackMode;
use serde::Deserialize;
use std::path::Path;
use std::time::Duration;

/// Main configuration structure
#[derive(Clone, Debug, Default, Deserialize)]
pub struct GrahaConfig {
    #[serde(default)]
    pub mission: MissionConfig,
    #[serde(default)]
    pub timing: TimingConfig,
    #[serde(default)]
    pub exploration: ExplorationConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Mission identity
#[derive(Clone, Debug, Deserialize)]
pub struct MissionConfig {
    /// Group id used in topic names (default: "127")
    #[serde(default = "default_group_id")]
    pub group_id: String,

    /// Planet to request with `testPlanet` before `ready`
    #[serde(default)]
    pub test_planet: Option<String>,

    /// Use the `comtest/...` topics of the protocol test server
    #[serde(default)]
    pub comtest: bool,
}

/// Decision loop deadlines, all in milliseconds
#[derive(Clone, Debug, Deserialize)]
pub struct TimingConfig {
    /// Grace window for a remote override after proposing a heading (default: 3000)
    #[serde(default = "default_override_window")]
    pub override_window_ms: u64,

    /// Wait for the server's echo of a driven path (default: 2000)
    #[serde(default = "default_path_ack_timeout")]
    pub path_ack_timeout_ms: u64,

    /// Wait for the planet message after `ready` (default: 5000)
    #[serde(default = "default_planet_timeout")]
    pub planet_timeout_ms: u64,

    /// Wait for `done` after reporting completion (default: 5000)
    #[serde(default = "default_completion_timeout")]
    pub completion_timeout_ms: u64,
}

/// Exploration bookkeeping
#[derive(Clone, Debug, Deserialize)]
pub struct ExplorationConfig {
    /// How the exploration stack is reconciled (default: keyed)
    #[serde(default)]
    pub stack_mode: StackMode,

    /// Visit nodes known only from other agents' reports before
    /// declaring the exploration complete (default: true)
    #[serde(default = "default_visit_unscanned")]
    pub visit_unscanned: bool,
}

/// Logging configuration
#[derive(Clone, Debug, Deserialize)]
pub struct LoggingConfig {
    /// Default level for this crate when RUST_LOG is unset (default: "info")
    #[serde(default = "default_log_level")]
    pub level: String,
}

impl Default for MissionConfig {
    fn default() -> Self {
        Self {
            group_id: default_group_id(),
            test_planet: None,
            comtest: false,
        }
    }
}

impl Default for TimingConfig {
    fn default() -> Self {
        Self {
            override_window_ms: default_override_window(),
            path_ack_timeout_ms: default_path_ack_timeout(),
            planet_timeout_ms: default_planet_timeout(),
            completion_timeout_ms: default_completion_timeout(),
        }
    }
}

impl Default for ExplorationConfig {
    fn default() -> Self {
        Self {
            stack_mode: StackMode::default(),
            visit_unscanned: default_visit_unscanned(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

// Default value functions
fn default_group_id() -> String {
    "127".to_string()
}
fn default_override_window() -> u64 {
    3000
}
fn default_path_ack_timeout() -> u64 {
    2000
}
fn default_planet_timeout() -> u64 {
    5000
}
fn default_completion_timeout() -> u64 {
    5000
}
fn default_visit_unscanned() -> bool {
    true
}
fn default_log_level() -> String {
    "info".to_string()
}

impl TimingConfig {
    pub fn override_window(&self) -> Duration {
        Duration::from_millis(self.override_window_ms)
    }

    pub fn path_ack_timeout(&self) -> Duration {
        Duration::from_millis(self.path_ack_timeout_ms)
    }

    pub fn planet_timeout(&self) -> Duration {
        Duration::from_millis(self.planet_timeout_ms)
    }

    pub fn completion_timeout(&self) -> Duration {
        Duration::from_millis(self.completion_timeout_ms)
    }
}

impl GrahaConfig {
    /// Load configuration from a TOML file
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| GrahaError::Config(format!("Failed to read config file: {}", e)))?;
        let config: GrahaConfig = toml::from_str(&content)?;
        Ok(config)
    }
}
