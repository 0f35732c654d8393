//! Process-wide PostgreSQL connection pool.

use diesel::r2d2::{ConnectionManager, Pool, PooledConnection};
use diesel::PgConnection;
use shelfwatch_core::config::DatabaseConfig;
use shelfwatch_core::error::EngineError;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

pub type DbPool = Pool<ConnectionManager<PgConnection>>;
pub type DbConnection = PooledConnection<ConnectionManager<PgConnection>>;

/// Builds the process-wide r2d2 pool from [`DatabaseConfig`].
pub fn build_pool(config: &DatabaseConfig) -> Result<DbPool, EngineError> {
    let manager = ConnectionManager::<PgConnection>::new(&config.database_url);

    Pool::builder()
        .max_size(config.max_connections)
        .min_idle(Some(config.min_connections))
        .connection_timeout(config.connection_timeout)
        .build(manager)
        .map_err(|e| EngineError::Database { message: format!("failed to build connection pool: {e}") })
}

/// Tracks pool checkout waits and errors for `/healthz`/`/metrics`.
#[derive(Default)]
pub struct PoolMetrics {
    wait_count: AtomicU64,
    error_count: AtomicU64,
}

impl PoolMetrics {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn record_checkout(&self, succeeded: bool) {
        self.wait_count.fetch_add(1, Ordering::Relaxed);
        if !succeeded {
            self.error_count.fetch_add(1, Ordering::Relaxed);
        }
    }

    pub fn error_count(&self) -> u64 {
        self.error_count.load(Ordering::Relaxed)
    }
}

/// Pulls a connection from `pool`, classifying the failure mode.
pub fn get_connection(pool: &DbPool) -> Result<DbConnection, EngineError> {
    pool.get().map_err(|e| EngineError::Database { message: format!("failed to check out connection: {e}") })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn metrics_track_checkout_failures() {
        let metrics = PoolMetrics::new();
        metrics.record_checkout(true);
        metrics.record_checkout(false);
        assert_eq!(metrics.error_count(), 1);
    }
}
