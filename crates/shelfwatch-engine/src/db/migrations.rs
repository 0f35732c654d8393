//! Embedded migration runner, applied once at process startup.

use diesel::PgConnection;
use diesel_migrations::{embed_migrations, EmbeddedMigrations, MigrationHarness};
use shelfwatch_core::error::EngineError;

pub const MIGRATIONS: EmbeddedMigrations = embed_migrations!("../../migrations");

pub fn run_pending(conn: &mut PgConnection) -> Result<(), EngineError> {
    conn.run_pending_migrations(MIGRATIONS)
        .map(|_| ())
        .map_err(|e| EngineError::Database { message: format!("failed to run migrations: {e}") })
}
