// Configuration management for Verity
//
// Values are layered into one key/value store; later loads override earlier
// ones. `ServerConfig::load` applies the standard order used by the server:
// defaults, config file, `.env`, process environment.

pub mod env;
pub mod error;
pub mod loader;
pub mod server;
pub mod validation;

pub use env::EnvLoader;
pub use error::{ConfigError, Result};
pub use loader::{ConfigLoader, FileFormat};

use loader::coerce_scalar;
pub use server::ServerConfig;
pub use validation::{ConfigValidator, Validate};

use parking_lot::RwLock;
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::collections::HashMap;
use std::path::Path;
use std::sync::Arc;

/// Thread-safe configuration store
#[derive(Clone, Default)]
pub struct ConfigManager {
    config: Arc<RwLock<HashMap<String, Value>>>,
    env_prefix: Option<String>,
}

impl ConfigManager {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store that only picks up environment variables starting with `prefix_`
    pub fn with_prefix(prefix: impl Into<String>) -> Self {
        Self {
            config: Arc::default(),
            env_prefix: Some(prefix.into()),
        }
    }

    /// Merge environment variables into the store
    ///
    /// Values that parse as JSON numbers or booleans are stored typed so that
    /// `VERITY_PORT=8080` deserialises into a `u16`.
    pub fn load_env(&self) -> Result<()> {
        let vars = EnvLoader::new(self.env_prefix.clone()).load();

        let mut config = self.config.write();
        for (key, raw) in vars {
            config.insert(key, coerce_scalar(raw));
        }
        Ok(())
    }

    /// Load a `.env` file into the process environment, then merge the environment
    ///
    /// A missing default `.env` is not an error; a missing explicit path is.
    pub fn load_dotenv(&self, path: Option<&Path>) -> Result<()> {
        match path {
            Some(path) => {
                dotenvy::from_path(path).map_err(|e| ConfigError::LoadError(e.to_string()))?;
            }
            None => {
                if let Ok(found) = dotenvy::dotenv() {
                    verity_log::debug!(target: "verity::config", "loaded {}", found.display());
                }
            }
        }
        self.load_env()
    }

    /// Merge the top-level keys of a JSON, TOML or env file
    pub fn load_file(&self, path: &Path) -> Result<()> {
        let format = FileFormat::from_path(path)?;
        let data = ConfigLoader::new(format).load_file(path)?;

        if let Value::Object(map) = data {
            self.config.write().extend(map);
        }
        verity_log::debug!(target: "verity::config", "loaded {}", path.display());
        Ok(())
    }

    pub fn set<T: serde::Serialize>(&self, key: &str, value: T) -> Result<()> {
        let json_value = serde_json::to_value(value)
            .map_err(|e| ConfigError::SerializationError(e.to_string()))?;

        self.config.write().insert(key.to_string(), json_value);
        Ok(())
    }

    /// Insert `value` only when `key` is not present yet
    pub fn set_default<T: serde::Serialize>(&self, key: &str, value: T) -> Result<()> {
        if self.has(key) {
            return Ok(());
        }
        self.set(key, value)
    }

    pub fn get<T: DeserializeOwned>(&self, key: &str) -> Result<T> {
        let value = self
            .config
            .read()
            .get(key)
            .cloned()
            .ok_or_else(|| ConfigError::KeyNotFound(key.to_string()))?;

        serde_json::from_value(value).map_err(|e| ConfigError::DeserializationError(e.to_string()))
    }

    pub fn get_or<T: DeserializeOwned>(&self, key: &str, default: T) -> T {
        self.get(key).unwrap_or(default)
    }

    pub fn get_string(&self, key: &str) -> Result<String> {
        self.get(key)
    }

    pub fn get_int(&self, key: &str) -> Result<i64> {
        self.get(key)
    }

    pub fn get_bool(&self, key: &str) -> Result<bool> {
        self.get(key)
    }

    pub fn has(&self, key: &str) -> bool {
        self.config.read().contains_key(key)
    }

    pub fn keys(&self) -> Vec<String> {
        self.config.read().keys().cloned().collect()
    }

    /// Copy every entry of `other` over this store
    pub fn merge(&self, other: &ConfigManager) {
        let other_config = other.config.read().clone();
        self.config.write().extend(other_config);
    }

    /// Deserialise the whole store into `T` and run its checks
    pub fn load_validated<T: DeserializeOwned + Validate>(&self) -> Result<T> {
        let snapshot: serde_json::Map<String, Value> = self
            .config
            .read()
            .iter()
            .map(|(k, v)| (k.clone(), v.clone()))
            .collect();

        let validated: T = serde_json::from_value(Value::Object(snapshot))
            .map_err(|e| ConfigError::DeserializationError(e.to_string()))?;

        validated.validate()?;
        Ok(validated)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_set_and_get() {
        let manager = ConfigManager::new();
        manager.set("host", "127.0.0.1").unwrap();
        assert_eq!(manager.get_string("host").unwrap(), "127.0.0.1");
        assert!(matches!(
            manager.get_string("missing"),
            Err(ConfigError::KeyNotFound(_))
        ));
    }

    #[test]
    fn test_set_default_does_not_override() {
        let manager = ConfigManager::new();
        manager.set("port", 9000).unwrap();
        manager.set_default("port", 5000).unwrap();
        manager.set_default("host", "0.0.0.0").unwrap();
        assert_eq!(manager.get_int("port").unwrap(), 9000);
        assert_eq!(manager.get_string("host").unwrap(), "0.0.0.0");
    }

    #[test]
    fn test_get_or_and_type_mismatch() {
        let manager = ConfigManager::new();
        manager.set("port", "not-a-number").unwrap();
        assert_eq!(manager.get_or("port", 5000u16), 5000);
        assert!(matches!(
            manager.get_int("port"),
            Err(ConfigError::DeserializationError(_))
        ));
    }

    #[test]
    fn test_coerce_scalar() {
        assert_eq!(coerce_scalar("8080".into()), Value::from(8080));
        assert_eq!(coerce_scalar("true".into()), Value::Bool(true));
        assert_eq!(coerce_scalar("debug".into()), Value::from("debug"));
        assert_eq!(coerce_scalar("[1]".into()), Value::from("[1]"));
    }

    #[test]
    fn test_merge() {
        let base = ConfigManager::new();
        base.set("host", "a").unwrap();
        let other = ConfigManager::new();
        other.set("host", "b").unwrap();
        other.set("port", 1).unwrap();

        base.merge(&other);
        assert_eq!(base.get_string("host").unwrap(), "b");
        let mut keys = base.keys();
        keys.sort();
        assert_eq!(keys, vec!["host", "port"]);
    }
}
