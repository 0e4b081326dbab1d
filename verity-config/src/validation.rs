// Configuration validation

use crate::{ConfigError, Result};

/// Implemented by configuration structs that check themselves after loading
pub trait Validate {
    fn validate(&self) -> Result<()>;
}

/// Reusable checks for configuration values
pub struct ConfigValidator;

impl ConfigValidator {
    pub fn not_empty(value: &str, field: &str) -> Result<()> {
        if value.trim().is_empty() {
            return Err(ConfigError::ValidationError(format!(
                "{} cannot be empty",
                field
            )));
        }
        Ok(())
    }

    pub fn one_of(value: &str, allowed: &[&str], field: &str) -> Result<()> {
        if !allowed.iter().any(|a| a.eq_ignore_ascii_case(value)) {
            return Err(ConfigError::ValidationError(format!(
                "{} must be one of {}, got '{}'",
                field,
                allowed.join(", "),
                value
            )));
        }
        Ok(())
    }

    pub fn is_port(value: u16, field: &str) -> Result<()> {
        if value == 0 {
            return Err(ConfigError::ValidationError(format!(
                "{} must be a non-zero port number",
                field
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_not_empty() {
        assert!(ConfigValidator::not_empty("localhost", "host").is_ok());
        assert!(ConfigValidator::not_empty("  ", "host").is_err());
    }

    #[test]
    fn test_one_of_ignores_case() {
        assert!(ConfigValidator::one_of("DEBUG", &["debug", "info"], "log_level").is_ok());
        let err = ConfigValidator::one_of("loud", &["debug", "info"], "log_level").unwrap_err();
        assert!(err.to_string().contains("loud"));
    }

    #[test]
    fn test_port() {
        assert!(ConfigValidator::is_port(5000, "port").is_ok());
        assert!(ConfigValidator::is_port(0, "port").is_err());
    }
}
