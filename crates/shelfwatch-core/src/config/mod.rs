//! Process configuration, loaded from the environment via `dotenvy` +
//! typed sub-structs, one per concern.

pub mod env_utils;
pub mod error;
pub mod validation;

pub use error::{ConfigError, ConfigResult};

use env_utils::EnvLoader;
use serde::{Deserialize, Serialize};
use std::env;
use std::time::Duration;

/// Top-level process configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    pub database: DatabaseConfig,
    pub secret: SecretConfig,
    pub scheduler: SchedulerConfig,
    pub throttle_defaults: ThrottleDefaultsConfig,
    pub notification: NotificationConfig,
    pub observability: ObservabilityConfig,
    pub prowlarr: ProwlarrConfig,
    pub backup: BackupConfig,
}

/// Indexer aggregator, configured out-of-band since it has no row in
/// `connectors`. Absent unless both vars are set, in which case the
/// `prowlarr-health-check` job becomes a no-op.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProwlarrConfig {
    pub url: Option<String>,
    pub api_key: Option<String>,
}

impl ProwlarrConfig {
    fn from_env() -> ConfigResult<Self> {
        Ok(Self { url: EnvLoader::load_optional("PROWLARR_URL")?, api_key: EnvLoader::load_optional("PROWLARR_API_KEY")? })
    }
}

/// `scheduled-backup` job settings: where `pg_dump` snapshots land and how
/// many are kept.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BackupConfig {
    pub enabled: bool,
    pub output_dir: String,
    pub retention_count: u32,
}

impl BackupConfig {
    fn from_env() -> ConfigResult<Self> {
        Ok(Self {
            enabled: EnvLoader::load_bool("BACKUP_ENABLED", false),
            output_dir: env::var("BACKUP_OUTPUT_DIR").unwrap_or_else(|_| "./backups".to_string()),
            retention_count: EnvLoader::load_with_default("BACKUP_RETENTION_COUNT", 7)?,
        })
    }
}

/// Connection pool sizing for the Postgres backing store.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseConfig {
    pub database_url: String,
    pub max_connections: u32,
    pub min_connections: u32,
    pub connection_timeout: Duration,
}

/// Key used to encrypt/decrypt connector API keys at rest (AES-256-GCM,
/// 64 hex characters = 32 bytes).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SecretConfig {
    pub secret_key: String,
}

/// Per-job cron cadence overrides for the scheduler.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SchedulerConfig {
    pub sync_cron: String,
    pub dispatch_cron: String,
    pub reconnect_cron: String,
    pub command_poll_cron: String,
    pub analytics_rollup_cron: String,
    pub maintenance_cron: String,
}

/// Built-in fallback throttle preset, used when a connector has no
/// configured `ThrottleProfile` of its own.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ThrottleDefaultsConfig {
    pub daily_budget: u32,
    pub per_minute_budget: u32,
    pub cooldown_seconds: u64,
    pub no_results_markers: Vec<String>,
    /// Number of failed/no-results dispatch attempts a search registry may
    /// accumulate before it is parked as `exhausted` rather than cycling
    /// through another cooldown.
    pub max_attempts: i32,
}

/// Per-channel-type notification defaults.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NotificationConfig {
    pub batch_window_seconds: u64,
    pub max_batch_size: u32,
    pub webhook_signing_enabled: bool,
}

/// Logging, metrics, and ambient-HTTP-surface configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ObservabilityConfig {
    pub log_level: String,
    pub prometheus_port: u16,
    pub healthz_port: u16,
    /// Whether the ambient HTTP surface should trust `X-Forwarded-For` /
    /// `X-Real-IP` when logging the caller. Defaults to `false`: the
    /// surface sits behind nothing by default, so trusting proxy headers
    /// would let a caller spoof its own address in logs.
    pub trust_proxy_headers: bool,
}

impl Config {
    pub fn from_env() -> ConfigResult<Self> {
        Ok(Self {
            database: DatabaseConfig::from_env()?,
            secret: SecretConfig::from_env()?,
            scheduler: SchedulerConfig::from_env()?,
            throttle_defaults: ThrottleDefaultsConfig::from_env()?,
            notification: NotificationConfig::from_env()?,
            observability: ObservabilityConfig::from_env()?,
            prowlarr: ProwlarrConfig::from_env()?,
            backup: BackupConfig::from_env()?,
        })
    }

    pub fn validate(&self) -> ConfigResult<()> {
        self.database.validate()?;
        self.secret.validate()?;
        self.observability.validate()?;
        Ok(())
    }
}

impl DatabaseConfig {
    fn from_env() -> ConfigResult<Self> {
        Ok(Self {
            database_url: env::var("DATABASE_URL").map_err(|_| ConfigError::env_var_not_found("DATABASE_URL"))?,
            max_connections: EnvLoader::load_with_default("DATABASE_MAX_CONNECTIONS", 10)?,
            min_connections: EnvLoader::load_with_default("DATABASE_MIN_CONNECTIONS", 1)?,
            connection_timeout: EnvLoader::load_duration_seconds("DATABASE_CONNECTION_TIMEOUT_SECONDS", 30)?,
        })
    }

    fn validate(&self) -> ConfigResult<()> {
        validation::validate_non_empty_string(&self.database_url, "database_url")?;
        validation::validate_range(self.max_connections, 1, 100, "max_connections")?;
        if self.min_connections > self.max_connections {
            return Err(ConfigError::validation_failed("min_connections cannot exceed max_connections"));
        }
        Ok(())
    }
}

impl SecretConfig {
    fn from_env() -> ConfigResult<Self> {
        Ok(Self { secret_key: env::var("SECRET_KEY").map_err(|_| ConfigError::env_var_not_found("SECRET_KEY"))? })
    }

    fn validate(&self) -> ConfigResult<()> {
        if self.secret_key.len() != 64 || !self.secret_key.chars().all(|c| c.is_ascii_hexdigit()) {
            return Err(ConfigError::invalid_value(
                "SECRET_KEY",
                "<redacted>",
                "64 hex characters (32 bytes) for AES-256-GCM",
            ));
        }
        Ok(())
    }
}

impl SchedulerConfig {
    fn from_env() -> ConfigResult<Self> {
        Ok(Self {
            sync_cron: env::var("SYNC_CRON").unwrap_or_else(|_| "0 */15 * * * *".to_string()),
            dispatch_cron: env::var("DISPATCH_CRON").unwrap_or_else(|_| "0 * * * * *".to_string()),
            reconnect_cron: env::var("RECONNECT_CRON").unwrap_or_else(|_| "0 */5 * * * *".to_string()),
            command_poll_cron: env::var("COMMAND_POLL_CRON").unwrap_or_else(|_| "*/10 * * * * *".to_string()),
            analytics_rollup_cron: env::var("ANALYTICS_ROLLUP_CRON").unwrap_or_else(|_| "0 0 * * * *".to_string()),
            maintenance_cron: env::var("MAINTENANCE_CRON").unwrap_or_else(|_| "0 0 3 * * *".to_string()),
        })
    }
}

impl ThrottleDefaultsConfig {
    fn from_env() -> ConfigResult<Self> {
        Ok(Self {
            daily_budget: EnvLoader::load_with_default("THROTTLE_DAILY_BUDGET_DEFAULT", 500)?,
            per_minute_budget: EnvLoader::load_with_default("THROTTLE_PER_MINUTE_BUDGET_DEFAULT", 10)?,
            cooldown_seconds: EnvLoader::load_with_default("THROTTLE_COOLDOWN_SECONDS_DEFAULT", 300)?,
            no_results_markers: EnvLoader::load_list("THROTTLE_NO_RESULTS_MARKERS")
                .map(|markers| if markers.is_empty() { vec!["no results found".to_string()] } else { markers })?,
            max_attempts: EnvLoader::load_with_default("QUEUE_MAX_ATTEMPTS", 10)?,
        })
    }
}

impl NotificationConfig {
    fn from_env() -> ConfigResult<Self> {
        Ok(Self {
            batch_window_seconds: EnvLoader::load_with_default("NOTIFICATION_BATCH_WINDOW_SECONDS", 300)?,
            max_batch_size: EnvLoader::load_with_default("NOTIFICATION_MAX_BATCH_SIZE", 25)?,
            webhook_signing_enabled: EnvLoader::load_bool("NOTIFICATION_WEBHOOK_SIGNING_ENABLED", true),
        })
    }
}

impl ObservabilityConfig {
    fn from_env() -> ConfigResult<Self> {
        Ok(Self {
            log_level: env::var("LOG_LEVEL").unwrap_or_else(|_| "info".to_string()),
            prometheus_port: EnvLoader::load_with_default("PROMETHEUS_PORT", 9090)?,
            healthz_port: EnvLoader::load_with_default("HEALTHZ_PORT", 8080)?,
            trust_proxy_headers: EnvLoader::load_bool("TRUST_PROXY_HEADERS", false),
        })
    }

    fn validate(&self) -> ConfigResult<()> {
        let valid_log_levels = ["trace", "debug", "info", "warn", "error"];
        if !valid_log_levels.contains(&self.log_level.as_str()) {
            return Err(ConfigError::invalid_value(
                "LOG_LEVEL",
                &self.log_level,
                &format!("one of: {}", valid_log_levels.join(", ")),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn database_config_rejects_inverted_pool_bounds() {
        let config = DatabaseConfig {
            database_url: "postgres://localhost/shelfwatch".to_string(),
            max_connections: 5,
            min_connections: 10,
            connection_timeout: Duration::from_secs(30),
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn secret_config_requires_64_hex_chars() {
        let valid = SecretConfig { secret_key: "a".repeat(64) };
        assert!(valid.validate().is_ok());

        let too_short = SecretConfig { secret_key: "a".repeat(32) };
        assert!(too_short.validate().is_err());

        let non_hex = SecretConfig { secret_key: "z".repeat(64) };
        assert!(non_hex.validate().is_err());
    }

    #[test]
    fn observability_config_rejects_unknown_log_level() {
        let config = ObservabilityConfig {
            log_level: "verbose".to_string(),
            prometheus_port: 9090,
            healthz_port: 8080,
            trust_proxy_headers: false,
        };
        assert!(config.validate().is_err());
    }
}
