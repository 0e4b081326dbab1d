// Configuration errors

use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("no configuration value for '{0}'")]
    KeyNotFound(String),

    /// File missing, unreadable or of an unsupported kind
    #[error("cannot load configuration: {0}")]
    LoadError(String),

    #[error("malformed configuration: {0}")]
    ParseError(String),

    /// Values parsed but rejected by `Validate`
    #[error("invalid configuration: {0}")]
    ValidationError(String),

    #[error("cannot store configuration value: {0}")]
    SerializationError(String),

    #[error("configuration value has the wrong shape: {0}")]
    DeserializationError(String),

    #[error("environment variable: {0}")]
    EnvError(#[from] std::env::VarError),
}

pub type Result<T> = std::result::Result<T, ConfigError>;
