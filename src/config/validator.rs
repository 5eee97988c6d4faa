//! Configuration validator for memory-monitor
//!
//! Validates configuration values to ensure they are within acceptable ranges.

use super::loader::{Config, ConfigError, LoggingConfig, MemoryConfig, MonitorConfig};

/// Longest polling interval accepted, in milliseconds
pub const MAX_POLLING_INTERVAL_MS: u64 = 60_000;

/// Largest string read budget accepted, in bytes
pub const MAX_STRING_LENGTH_LIMIT: usize = 1024 * 1024;

/// Accepted `logging.level` values
pub const LOG_LEVELS: [&str; 6] = ["trace", "debug", "info", "warn", "error", "off"];

/// Configuration validator
pub struct ConfigValidator;

impl ConfigValidator {
    /// Validates the entire configuration
    pub fn validate(config: &Config) -> Result<(), ConfigError> {
        Self::validate_monitor(&config.monitor)?;
        Self::validate_memory(&config.memory)?;
        Self::validate_logging(&config.logging)?;
        Ok(())
    }

    fn validate_monitor(monitor: &MonitorConfig) -> Result<(), ConfigError> {
        if monitor.polling_interval_ms == 0 {
            return Err(ConfigError::Invalid(
                "Polling interval must be at least 1 ms".to_string(),
            ));
        }

        if monitor.polling_interval_ms > MAX_POLLING_INTERVAL_MS {
            return Err(ConfigError::Invalid(format!(
                "Polling interval cannot exceed {} ms",
                MAX_POLLING_INTERVAL_MS
            )));
        }

        Ok(())
    }

    fn validate_memory(memory: &MemoryConfig) -> Result<(), ConfigError> {
        if memory.max_string_length == 0 {
            return Err(ConfigError::Invalid(
                "Maximum string length must be greater than 0".to_string(),
            ));
        }

        if memory.max_string_length > MAX_STRING_LENGTH_LIMIT {
            return Err(ConfigError::Invalid(format!(
                "Maximum string length cannot exceed {} bytes",
                MAX_STRING_LENGTH_LIMIT
            )));
        }

        Ok(())
    }

    fn validate_logging(logging: &LoggingConfig) -> Result<(), ConfigError> {
        if !LOG_LEVELS.contains(&logging.level.to_lowercase().as_str()) {
            return Err(ConfigError::Invalid(format!(
                "Invalid log level: {}. Must be one of: {:?}",
                logging.level, LOG_LEVELS
            )));
        }

        Ok(())
    }
}

/// Validates a configuration
pub fn validate_config(config: &Config) -> Result<(), ConfigError> {
    ConfigValidator::validate(config)
}
