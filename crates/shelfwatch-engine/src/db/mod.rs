//! Persistence: connection pool, diesel schema, row types, and the
//! repository layer built on top of them.

pub mod migrations;
pub mod models;
pub mod pool;
pub mod repo;
pub mod schema;

pub use migrations::run_pending;
pub use pool::{build_pool, get_connection, DbConnection, DbPool, PoolMetrics};

use shelfwatch_core::error::EngineError;

/// Runs `f` against a pooled connection on the blocking thread pool,
/// generalizing the `spawn_blocking`-wrapped diesel call idiom used
/// throughout the repository layer so call sites never block the async
/// reactor on a synchronous diesel round trip.
pub async fn run_blocking<F, T>(pool: &DbPool, f: F) -> Result<T, EngineError>
where
    F: FnOnce(&mut DbConnection) -> Result<T, EngineError> + Send + 'static,
    T: Send + 'static,
{
    let pool = pool.clone();
    tokio::task::spawn_blocking(move || {
        let mut conn = get_connection(&pool)?;
        f(&mut conn)
    })
    .await
    .map_err(|e| EngineError::Database { message: format!("blocking task panicked: {e}") })?
}
