//! Configuration error types.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("environment variable not found: {0}")]
    EnvVarNotFound(String),

    #[error("invalid configuration value for {key}: {value} (expected {expected})")]
    InvalidValue { key: String, value: String, expected: String },

    #[error("validation failed: {0}")]
    ValidationFailed(String),

    #[error("parse error: {0}")]
    ParseError(String),

    #[error("required field missing: {0}")]
    RequiredFieldMissing(String),
}

impl ConfigError {
    pub fn env_var_not_found(key: &str) -> Self {
        ConfigError::EnvVarNotFound(key.to_string())
    }

    pub fn parse_error(message: impl Into<String>) -> Self {
        ConfigError::ParseError(message.into())
    }

    pub fn invalid_value(key: &str, value: &str, expected: &str) -> Self {
        ConfigError::InvalidValue { key: key.to_string(), value: value.to_string(), expected: expected.to_string() }
    }

    pub fn validation_failed(message: impl Into<String>) -> Self {
        ConfigError::ValidationFailed(message.into())
    }
}

pub type ConfigResult<T> = Result<T, ConfigError>;
