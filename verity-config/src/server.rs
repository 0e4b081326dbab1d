// Server settings

use crate::{ConfigManager, ConfigValidator, Result, Validate};
use serde::{Deserialize, Serialize};
use std::net::{IpAddr, SocketAddr};
use std::path::Path;

/// Environment prefix for server settings (`VERITY_PORT`, `VERITY_HOST`, ...)
pub const ENV_PREFIX: &str = "VERITY";

const LOG_LEVELS: &[&str] = &["trace", "debug", "info", "warn", "error", "off"];

/// Settings for the `verity-server` binary
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub log_level: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 5000,
            log_level: "info".to_string(),
        }
    }
}

impl Validate for ServerConfig {
    fn validate(&self) -> Result<()> {
        ConfigValidator::not_empty(&self.host, "host")?;
        ConfigValidator::is_port(self.port, "port")?;
        ConfigValidator::one_of(&self.log_level, LOG_LEVELS, "log_level")?;
        self.host.parse::<IpAddr>().map_err(|e| {
            crate::ConfigError::ValidationError(format!("host '{}': {}", self.host, e))
        })?;
        Ok(())
    }
}

impl ServerConfig {
    /// Defaults, then `file` (if given), then `.env`, then `VERITY_*` variables
    pub fn load(file: Option<&Path>) -> Result<Self> {
        let manager = Self::defaults_manager()?;
        if let Some(path) = file {
            manager.load_file(path)?;
        }
        manager.load_dotenv(None)?;
        manager.load_validated()
    }

    /// Defaults overlaid with `file` only; the environment is not consulted
    pub fn from_file(path: &Path) -> Result<Self> {
        let manager = Self::defaults_manager()?;
        manager.load_file(path)?;
        manager.load_validated()
    }

    fn defaults_manager() -> Result<ConfigManager> {
        let manager = ConfigManager::with_prefix(ENV_PREFIX);
        let defaults = Self::default();
        manager.set("host", &defaults.host)?;
        manager.set("port", defaults.port)?;
        manager.set("log_level", &defaults.log_level)?;
        Ok(manager)
    }

    pub fn socket_addr(&self) -> Result<SocketAddr> {
        let ip: IpAddr = self.host.parse().map_err(|e| {
            crate::ConfigError::ValidationError(format!("host '{}': {}", self.host, e))
        })?;
        Ok(SocketAddr::new(ip, self.port))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_valid() {
        let config = ServerConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.socket_addr().unwrap().to_string(), "127.0.0.1:5000");
    }

    #[test]
    fn test_rejects_bad_values() {
        let zero_port = ServerConfig {
            port: 0,
            ..ServerConfig::default()
        };
        assert!(zero_port.validate().is_err());

        let bad_level = ServerConfig {
            log_level: "chatty".into(),
            ..ServerConfig::default()
        };
        assert!(bad_level.validate().is_err());

        let bad_host = ServerConfig {
            host: "not a host".into(),
            ..ServerConfig::default()
        };
        assert!(bad_host.validate().is_err());
    }
}
