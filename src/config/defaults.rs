//! Default configuration values for memory-monitor

use serde::{Deserialize, Serialize};

/// Default configuration structure
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConfigDefaults {
    pub monitor: MonitorDefaults,
    pub memory: MemoryDefaults,
    pub logging: LoggingDefaults,
}

/// Default monitor configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MonitorDefaults {
    pub polling_interval_ms: u64,
}

/// Default memory configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MemoryDefaults {
    pub max_string_length: usize,
}

/// Default logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingDefaults {
    pub level: String,
}

/// Returns the default configuration
pub fn default_config() -> ConfigDefaults {
    ConfigDefaults {
        monitor: MonitorDefaults {
            polling_interval_ms: crate::monitor::DEFAULT_POLLING_INTERVAL.as_millis() as u64,
        },
        memory: MemoryDefaults {
            max_string_length: crate::memory::DEFAULT_MAX_STRING_LENGTH,
        },
        logging: LoggingDefaults {
            level: "info".to_string(),
        },
    }
}
