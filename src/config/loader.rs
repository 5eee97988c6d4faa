//! Configuration loader for memory-monitor
//!
//! Handles loading configuration from TOML or JSON files and merging with
//! defaults. The format follows the file extension; anything other than
//! `.json` is read as TOML.

use super::defaults::default_config;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;
use thiserror::Error;

/// Configuration error type
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("TOML parsing error: {0}")]
    TomlParse(#[from] toml::de::Error),

    #[error("TOML serialization error: {0}")]
    TomlSerialize(#[from] toml::ser::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Configuration file not found: {0}")]
    FileNotFound(String),

    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

/// Main configuration structure
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    #[serde(default = "default_monitor")]
    pub monitor: MonitorConfig,

    #[serde(default = "default_memory")]
    pub memory: MemoryConfig,

    #[serde(default = "default_logging")]
    pub logging: LoggingConfig,
}

/// Monitor configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MonitorConfig {
    #[serde(default = "default_polling_interval_ms")]
    pub polling_interval_ms: u64,
}

impl MonitorConfig {
    /// Interval handed to monitor constructors
    pub fn polling_interval(&self) -> Duration {
        Duration::from_millis(self.polling_interval_ms)
    }
}

/// Memory I/O configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MemoryConfig {
    #[serde(default = "default_max_string_length")]
    pub max_string_length: usize,
}

/// Logging configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoggingConfig {
    #[serde(default = "default_log_level")]
    pub level: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Format {
    Toml,
    Json,
}

impl Format {
    fn of(path: &Path) -> Self {
        match path.extension().and_then(|ext| ext.to_str()) {
            Some(ext) if ext.eq_ignore_ascii_case("json") => Format::Json,
            _ => Format::Toml,
        }
    }
}

/// Configuration loader
pub struct ConfigLoader {
    config_path: PathBuf,
}

impl ConfigLoader {
    /// Creates a new configuration loader
    pub fn new<P: AsRef<Path>>(path: P) -> Self {
        ConfigLoader {
            config_path: path.as_ref().to_path_buf(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.config_path
    }

    /// Loads configuration from file
    pub fn load(&self) -> Result<Config, ConfigError> {
        if !self.config_path.exists() {
            return Err(ConfigError::FileNotFound(
                self.config_path.display().to_string(),
            ));
        }

        let contents = fs::read_to_string(&self.config_path)?;
        let config = match Format::of(&self.config_path) {
            Format::Toml => toml::from_str(&contents)?,
            Format::Json => serde_json::from_str(&contents)?,
        };
        Ok(config)
    }

    /// Loads configuration or returns defaults if the file is missing or
    /// unreadable
    pub fn load_or_default(&self) -> Config {
        self.load().unwrap_or_else(|e| {
            tracing::debug!(path = %self.config_path.display(), error = %e, "Using default configuration");
            Config::default()
        })
    }

    /// Saves configuration to file
    pub fn save(&self, config: &Config) -> Result<(), ConfigError> {
        let contents = match Format::of(&self.config_path) {
            Format::Toml => toml::to_string_pretty(config)?,
            Format::Json => serde_json::to_string_pretty(config)?,
        };
        fs::write(&self.config_path, contents)?;
        Ok(())
    }
}

/// Loads `memory-monitor.toml` from the working directory, or defaults
pub fn load_config() -> Config {
    ConfigLoader::new("memory-monitor.toml").load_or_default()
}

fn default_monitor() -> MonitorConfig {
    MonitorConfig {
        polling_interval_ms: default_polling_interval_ms(),
    }
}

fn default_memory() -> MemoryConfig {
    MemoryConfig {
        max_string_length: default_max_string_length(),
    }
}

fn default_logging() -> LoggingConfig {
    LoggingConfig {
        level: default_log_level(),
    }
}

fn default_polling_interval_ms() -> u64 {
    default_config().monitor.polling_interval_ms
}

fn default_max_string_length() -> usize {
    default_config().memory.max_string_length
}

fn default_log_level() -> String {
    default_config().logging.level
}

impl Default for Config {
    fn default() -> Self {
        Config {
            monitor: default_monitor(),
            memory: default_memory(),
            logging: default_logging(),
        }
    }
}

impl Default for MonitorConfig {
    fn default() -> Self {
        default_monitor()
    }
}

impl Default for MemoryConfig {
    fn default() -> Self {
        default_memory()
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        default_logging()
    }
}
