//! Integration tests for verity-config

use std::io::Write;
use verity_config::*;

fn write_file(suffix: &str, content: &str) -> tempfile::NamedTempFile {
    let mut file = tempfile::Builder::new().suffix(suffix).tempfile().unwrap();
    file.write_all(content.as_bytes()).unwrap();
    file
}

#[test]
fn test_server_config_from_toml() {
    let file = write_file(".toml", "host = \"0.0.0.0\"\nport = 8081\nlog_level = \"debug\"\n");

    let config = ServerConfig::from_file(file.path()).unwrap();
    assert_eq!(config.host, "0.0.0.0");
    assert_eq!(config.port, 8081);
    assert_eq!(config.log_level, "debug");
}

#[test]
fn test_server_config_from_env_file() {
    let file = write_file(".env", "# local overrides\nPORT=8080\nLOG_LEVEL=warn\n");

    let config = ServerConfig::from_file(file.path()).unwrap();
    assert_eq!(config.port, 8080);
    assert_eq!(config.log_level, "warn");
    assert_eq!(config.host, ServerConfig::default().host);
}

#[test]
fn test_server_config_partial_file_keeps_defaults() {
    let file = write_file(".json", r#"{"port": 7000}"#);

    let config = ServerConfig::from_file(file.path()).unwrap();
    assert_eq!(config.port, 7000);
    assert_eq!(config.host, ServerConfig::default().host);
}

#[test]
fn test_server_config_invalid_file_value() {
    let file = write_file(".toml", "port = 0\n");
    assert!(matches!(
        ServerConfig::from_file(file.path()),
        Err(ConfigError::ValidationError(_))
    ));
}

#[test]
fn test_unsupported_extension() {
    let file = write_file(".yaml", "port: 1\n");
    assert!(matches!(
        ServerConfig::from_file(file.path()),
        Err(ConfigError::LoadError(_))
    ));
}

#[test]
fn test_manager_env_prefix_and_coercion() {
    unsafe {
        std::env::set_var("VERITYTEST_PORT", "6060");
        std::env::set_var("VERITYTEST_HOST", "10.0.0.1");
    }

    let manager = ConfigManager::with_prefix("VERITYTEST");
    manager.load_env().unwrap();
    assert_eq!(manager.get::<u16>("port").unwrap(), 6060);
    assert_eq!(manager.get_string("host").unwrap(), "10.0.0.1");

    unsafe {
        std::env::remove_var("VERITYTEST_PORT");
        std::env::remove_var("VERITYTEST_HOST");
    }
}

#[test]
fn test_config_error_display() {
    let err = ConfigError::KeyNotFound("port".to_string());
    assert!(err.to_string().contains("port"));
}
