//! Configuration files feeding monitors and memory I/O

use memory_monitor::config::{validate_config, Config, ConfigError, ConfigLoader};
use memory_monitor::core::types::Address;
use memory_monitor::memory::{MemoryIO, SimulatedMemory};
use memory_monitor::monitor::{Monitor, RegionMonitor};
use std::fs;
use std::sync::Arc;
use std::time::Duration;
use tempfile::TempDir;

#[test]
fn test_toml_file_drives_monitor_and_io() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("memory-monitor.toml");
    fs::write(
        &path,
        r#"
            [monitor]
            polling_interval_ms = 125

            [memory]
            max_string_length = 32

            [logging]
            level = "debug"
        "#,
    )
    .unwrap();

    let config = ConfigLoader::new(&path).load().unwrap();
    validate_config(&config).unwrap();

    let io = Arc::new(
        MemoryIO::new(SimulatedMemory::new(Address::new(0x1000), 64))
            .with_max_string_length(config.memory.max_string_length),
    );
    assert_eq!(io.max_string_length(), 32);

    let monitor: RegionMonitor<_> = Monitor::region(
        io,
        Address::new(0x1000),
        8,
        config.monitor.polling_interval(),
    )
    .unwrap();
    assert_eq!(monitor.polling_interval(), Duration::from_millis(125));
}

#[test]
fn test_json_file_with_missing_sections() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("settings.json");
    fs::write(&path, r#"{ "monitor": { "polling_interval_ms": 50 } }"#).unwrap();

    let config = ConfigLoader::new(&path).load().unwrap();
    assert_eq!(config.monitor.polling_interval_ms, 50);
    assert_eq!(config.memory, Config::default().memory);
    assert_eq!(config.logging, Config::default().logging);
}

#[test]
fn test_out_of_range_values_fail_validation() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("bad.toml");
    fs::write(&path, "[monitor]\npolling_interval_ms = 0\n").unwrap();

    let config = ConfigLoader::new(&path).load().unwrap();
    assert!(matches!(validate_config(&config), Err(ConfigError::Invalid(_))));
}

#[test]
fn test_wrong_types_fail_to_parse() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("typed.toml");
    fs::write(&path, "[memory]\nmax_string_length = \"lots\"\n").unwrap();

    assert!(matches!(
        ConfigLoader::new(&path).load(),
        Err(ConfigError::TomlParse(_))
    ));
}

#[test]
fn test_logging_init_accepts_config() {
    let config = Config::default();
    let _ = memory_monitor::logging::init(&config.logging);
    assert!(!memory_monitor::logging::init(&config.logging));
}
