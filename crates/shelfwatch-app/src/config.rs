//! Application bootstrap configuration: loads [`shelfwatch_core::config::Config`]
//! from the environment, builds the connection pool, and runs migrations.

use std::sync::Arc;

use shelfwatch_core::config::Config;
use shelfwatch_core::crypto::secret::SecretStore;
use shelfwatch_engine::analytics::{AnalyticsCollector, AnalyticsEvent};
use shelfwatch_engine::db::{build_pool, DbPool};
use shelfwatch_engine::jobs::JobContext;
use shelfwatch_engine::notifications::{ChannelSender, WebhookChannelSender};
use shelfwatch_engine::scheduler::JobGuard;
use tokio::sync::mpsc::UnboundedReceiver;

#[derive(Debug, thiserror::Error)]
pub enum BootstrapError {
    #[error("configuration error: {0}")]
    Config(#[from] shelfwatch_core::config::ConfigError),

    #[error("database initialization failed: {0}")]
    Database(#[from] shelfwatch_core::error::EngineError),
}

pub struct AppContext {
    pub config: Config,
    pub database_pool: Arc<DbPool>,
    pub job_context: JobContext,
    pub job_guard: Arc<JobGuard>,
    pub analytics_events: Option<UnboundedReceiver<AnalyticsEvent>>,
}

impl AppContext {
    pub async fn new() -> Result<Self, BootstrapError> {
        let config = Config::from_env()?;
        config.validate()?;

        let pool = build_pool(&config.database)?;
        {
            let mut conn = shelfwatch_engine::db::get_connection(&pool)?;
            shelfwatch_engine::db::run_pending(&mut conn)?;
        }
        let database_pool = Arc::new(pool);

        let secrets = Arc::new(SecretStore::new(&config.secret.secret_key)?);
        let (analytics_tx, analytics_rx) = tokio::sync::mpsc::unbounded_channel();
        let analytics = AnalyticsCollector::new(analytics_tx);
        let notification_sender: Arc<dyn ChannelSender> = Arc::new(WebhookChannelSender::new());

        let job_context = JobContext { pool: database_pool.clone(), secrets, analytics, notification_sender };

        Ok(Self {
            config,
            database_pool,
            job_context,
            job_guard: Arc::new(JobGuard::new()),
            analytics_events: Some(analytics_rx),
        })
    }

    pub fn server_address(&self) -> String {
        format!("0.0.0.0:{}", self.config.observability.healthz_port)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn missing_database_url_surfaces_as_config_error() {
        std::env::remove_var("DATABASE_URL");
        let result = AppContext::new().await;
        assert!(matches!(result, Err(BootstrapError::Config(_))));
    }
}
