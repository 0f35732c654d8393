//! Environment variable loading and validation helpers.

use crate::config::{ConfigError, ConfigResult};
use std::env;
use std::str::FromStr;

/// Typed environment variable loader with default-value handling.
pub struct EnvLoader;

impl EnvLoader {
    pub fn load_required<T>(key: &str) -> ConfigResult<T>
    where
        T: FromStr,
        T::Err: std::fmt::Display,
    {
        let value = env::var(key).map_err(|_| ConfigError::env_var_not_found(key))?;
        value.parse().map_err(|e| ConfigError::parse_error(format!("{}: {}", key, e)))
    }

    pub fn load_with_default<T>(key: &str, default: T) -> ConfigResult<T>
    where
        T: FromStr + Clone,
        T::Err: std::fmt::Display,
    {
        match env::var(key) {
            Ok(value) => value.parse().map_err(|e| ConfigError::parse_error(format!("{}: {}", key, e))),
            Err(_) => Ok(default),
        }
    }

    pub fn load_optional<T>(key: &str) -> ConfigResult<Option<T>>
    where
        T: FromStr,
        T::Err: std::fmt::Display,
    {
        match env::var(key) {
            Ok(value) => {
                let parsed = value.parse().map_err(|e| ConfigError::parse_error(format!("{}: {}", key, e)))?;
                Ok(Some(parsed))
            }
            Err(_) => Ok(None),
        }
    }

    pub fn load_bool(key: &str, default: bool) -> bool {
        match env::var(key).as_deref() {
            Ok("true" | "True" | "TRUE" | "1" | "yes" | "Yes" | "YES" | "on" | "On" | "ON") => true,
            Ok("false" | "False" | "FALSE" | "0" | "no" | "No" | "NO" | "off" | "Off" | "OFF") => false,
            _ => default,
        }
    }

    pub fn load_list<T>(key: &str) -> ConfigResult<Vec<T>>
    where
        T: FromStr,
        T::Err: std::fmt::Display,
    {
        match env::var(key) {
            Ok(value) => {
                if value.trim().is_empty() {
                    return Ok(Vec::new());
                }

                value
                    .split(',')
                    .map(|s| s.trim().parse().map_err(|e| ConfigError::parse_error(format!("{}: {}", key, e))))
                    .collect()
            }
            Err(_) => Ok(Vec::new()),
        }
    }

    pub fn load_duration_seconds(key: &str, default_seconds: u64) -> ConfigResult<std::time::Duration> {
        let seconds = Self::load_with_default(key, default_seconds)?;
        Ok(std::time::Duration::from_secs(seconds))
    }

    pub fn validate_present(key: &str) -> ConfigResult<()> {
        env::var(key).map(|_| ()).map_err(|_| ConfigError::env_var_not_found(key))
    }

    pub fn validate_enum(key: &str, allowed_values: &[&str]) -> ConfigResult<()> {
        match env::var(key) {
            Ok(value) => {
                if allowed_values.contains(&value.as_str()) {
                    Ok(())
                } else {
                    Err(ConfigError::invalid_value(key, &value, &format!("one of: {}", allowed_values.join(", "))))
                }
            }
            Err(_) => Ok(()),
        }
    }
}

/// Environment variable validator used for pre-flight checks at bootstrap.
pub struct EnvValidator;

impl EnvValidator {
    pub fn validate_required_vars(required_vars: &[&str]) -> ConfigResult<()> {
        for var in required_vars {
            EnvLoader::validate_present(var)?;
        }
        Ok(())
    }

    pub fn validate_bool_var(key: &str) -> ConfigResult<()> {
        if let Ok(value) = env::var(key) {
            match value.to_lowercase().as_str() {
                "true" | "false" | "1" | "0" | "yes" | "no" | "on" | "off" => Ok(()),
                _ => Err(ConfigError::invalid_value(key, &value, "true/false, 1/0, yes/no, or on/off")),
            }
        } else {
            Ok(())
        }
    }

    pub fn validate_numeric_var<T>(key: &str) -> ConfigResult<()>
    where
        T: FromStr,
        T::Err: std::fmt::Display,
    {
        if let Ok(value) = env::var(key) {
            value.parse::<T>().map(|_| ()).map_err(|e| ConfigError::parse_error(format!("{}: {}", key, e)))
        } else {
            Ok(())
        }
    }

    pub fn validate_url_var(key: &str) -> ConfigResult<()> {
        if let Ok(url) = env::var(key) {
            if url.starts_with("http://") || url.starts_with("https://") {
                Ok(())
            } else {
                Err(ConfigError::invalid_value(key, &url, "URL starting with http:// or https://"))
            }
        } else {
            Ok(())
        }
    }

    pub fn validate_email_list(key: &str) -> ConfigResult<()> {
        if let Ok(emails) = env::var(key) {
            if emails.trim().is_empty() {
                return Ok(());
            }

            for email in emails.split(',') {
                let email = email.trim();
                if !email.contains('@') || !email.contains('.') {
                    return Err(ConfigError::invalid_value(key, &emails, "comma-separated list of valid email addresses"));
                }
            }
        }
        Ok(())
    }
}

/// Deployment preset, used to pick observability defaults at bootstrap.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigPreset {
    Development,
    Testing,
    Staging,
    Production,
}

impl ConfigPreset {
    pub fn from_env() -> Self {
        match env::var("ENVIRONMENT").as_deref() {
            Ok("development") | Ok("dev") => Self::Development,
            Ok("testing") | Ok("test") => Self::Testing,
            Ok("staging") | Ok("stage") => Self::Staging,
            Ok("production") | Ok("prod") => Self::Production,
            _ => Self::Development,
        }
    }

    /// Log level implied by this preset when `LOG_LEVEL` is unset.
    pub fn default_log_level(&self) -> &'static str {
        match self {
            Self::Development => "debug",
            Self::Testing => "warn",
            Self::Staging | Self::Production => "info",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;

    #[test]
    #[serial]
    fn load_required_succeeds_and_fails() {
        env::set_var("TEST_REQUIRED", "42");
        let result: ConfigResult<i32> = EnvLoader::load_required("TEST_REQUIRED");
        assert_eq!(result.unwrap(), 42);

        env::remove_var("TEST_REQUIRED");
        let result: ConfigResult<i32> = EnvLoader::load_required("TEST_REQUIRED");
        assert!(result.is_err());
    }

    #[test]
    #[serial]
    fn load_with_default_falls_back() {
        env::set_var("TEST_DEFAULT", "100");
        let result: ConfigResult<i32> = EnvLoader::load_with_default("TEST_DEFAULT", 50);
        assert_eq!(result.unwrap(), 100);

        env::remove_var("TEST_DEFAULT");
        let result: ConfigResult<i32> = EnvLoader::load_with_default("TEST_DEFAULT", 50);
        assert_eq!(result.unwrap(), 50);
    }

    #[test]
    #[serial]
    fn load_bool_parses_variants() {
        env::set_var("TEST_BOOL_TRUE", "true");
        assert!(EnvLoader::load_bool("TEST_BOOL_TRUE", false));

        env::set_var("TEST_BOOL_FALSE", "false");
        assert!(!EnvLoader::load_bool("TEST_BOOL_FALSE", true));

        env::remove_var("TEST_BOOL_MISSING");
        assert!(EnvLoader::load_bool("TEST_BOOL_MISSING", true));
    }

    #[test]
    #[serial]
    fn load_list_splits_on_comma() {
        env::set_var("TEST_LIST", "a,b,c");
        let result: ConfigResult<Vec<String>> = EnvLoader::load_list("TEST_LIST");
        assert_eq!(result.unwrap(), vec!["a", "b", "c"]);

        env::set_var("TEST_LIST_EMPTY", "");
        let result: ConfigResult<Vec<String>> = EnvLoader::load_list("TEST_LIST_EMPTY");
        assert!(result.unwrap().is_empty());
    }

    #[test]
    #[serial]
    fn validate_enum_rejects_unknown_values() {
        env::set_var("TEST_ENUM", "valid");
        assert!(EnvValidator::validate_required_vars(&["TEST_ENUM"]).is_ok());

        env::set_var("TEST_ENUM", "invalid");
        assert!(EnvLoader::validate_enum("TEST_ENUM", &["valid", "also_valid"]).is_err());
    }

    #[test]
    #[serial]
    fn config_preset_from_env() {
        env::set_var("ENVIRONMENT", "production");
        assert_eq!(ConfigPreset::from_env(), ConfigPreset::Production);

        env::set_var("ENVIRONMENT", "dev");
        assert_eq!(ConfigPreset::from_env(), ConfigPreset::Development);

        env::remove_var("ENVIRONMENT");
        assert_eq!(ConfigPreset::from_env(), ConfigPreset::Development);
    }
}
