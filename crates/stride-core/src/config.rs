use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::error::StrideError;

/// Top-level Stride configuration.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    #[serde(default)]
    pub stride: StrideConfig,
    #[serde(default)]
    pub store: StoreConfig,
    #[serde(default)]
    pub streaks: StreakConfig,
    #[serde(default)]
    pub messaging: MessagingConfig,
}

/// General settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StrideConfig {
    #[serde(default = "default_data_dir")]
    pub data_dir: String,
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

impl Default for StrideConfig {
    fn default() -> Self {
        Self {
            data_dir: default_data_dir(),
            log_level: default_log_level(),
        }
    }
}

/// Persistence config.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoreConfig {
    #[serde(default = "default_db_path")]
    pub db_path: String,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            db_path: default_db_path(),
        }
    }
}

/// Streak behavior config.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StreakConfig {
    /// Threshold applied to new users until they set their own.
    #[serde(default = "default_min_tasks")]
    pub default_min_tasks_required: i64,
}

impl Default for StreakConfig {
    fn default() -> Self {
        Self {
            default_min_tasks_required: default_min_tasks(),
        }
    }
}

/// Outbound messaging config.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MessagingConfig {
    /// When disabled, reminder fan-out is skipped entirely.
    #[serde(default = "default_true")]
    pub enabled: bool,
    /// Address shown as the sender on composed polls.
    #[serde(default)]
    pub from_address: String,
}

impl Default for MessagingConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            from_address: String::new(),
        }
    }
}

fn default_data_dir() -> String {
    "~/.stride".to_string()
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_db_path() -> String {
    "~/.stride/stride.db".to_string()
}

fn default_min_tasks() -> i64 {
    3
}

fn default_true() -> bool {
    true
}

/// Expand `~` to home directory.
pub fn shellexpand(path: &str) -> String {
    expand_with_home(path, std::env::var_os("HOME").as_deref())
}

fn expand_with_home(path: &str, home: Option<&std::ffi::OsStr>) -> String {
    if let Some(rest) = path.strip_prefix("~/") {
        if let Some(home) = home {
            return format!("{}/{rest}", home.to_string_lossy());
        }
    }
    path.to_string()
}

/// Load configuration from a TOML file, falling back to defaults when the
/// file does not exist.
pub fn load(path: &str) -> Result<Config, StrideError> {
    let path = Path::new(path);
    if !path.exists() {
        tracing::info!(
            "Config file not found at {}, using defaults",
            path.display()
        );
        return Ok(Config::default());
    }

    let content = std::fs::read_to_string(path)
        .map_err(|e| StrideError::Config(format!("failed to read {}: {}", path.display(), e)))?;

    let config: Config = toml::from_str(&content)
        .map_err(|e| StrideError::Config(format!("failed to parse config: {}", e)))?;

    Ok(config)
}
