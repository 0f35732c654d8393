//! `db-maintenance`: vacuum/analyze, force-closes commands stuck past
//! [`commands::FORCE_CLOSE_AFTER_HOURS`], recovers exhausted registry rows
//! back into the backlog, and prunes history past each table's retention
//! window.

use chrono::Utc;
use diesel::prelude::*;
use diesel::sql_query;
use shelfwatch_core::error::EngineError;
use shelfwatch_core::models::CommandStatus;

use crate::commands::{eligible_for_cleanup, should_force_close};
use crate::db::repo::{commands, notifications, registry};
use crate::db::{run_blocking, DbPool};
use crate::jobs::JobContext;
use crate::maintenance::{prune_cutoff, recover_backlog, MaintenanceReport, RetentionPolicy};

pub async fn run(ctx: &JobContext, policy: RetentionPolicy) -> Result<MaintenanceReport, EngineError> {
    let now = Utc::now();
    let mut report = MaintenanceReport { vacuum_duration_ms: vacuum_analyze(&ctx.pool).await?, ..Default::default() };

    report.orphans_removed = force_close_stale_commands(ctx, now).await?;
    report.backlog_rows_recovered = recover_exhausted_registry(ctx, now).await?;

    let history_cutoff = prune_cutoff(now, policy.history_days);
    report.history_rows_pruned = commands::delete_terminal_before(&ctx.pool, history_cutoff).await? as u64
        + notifications::delete_sent_before(&ctx.pool, history_cutoff).await? as u64;

    Ok(report)
}

/// Runs a plain `VACUUM (ANALYZE)` against the whole database. Diesel has
/// no query-builder support for `VACUUM`, so this goes through `sql_query`
/// like the teacher's other maintenance statements.
async fn vacuum_analyze(pool: &DbPool) -> Result<u64, EngineError> {
    let start = Utc::now();
    run_blocking(pool, |conn| {
        sql_query("VACUUM (ANALYZE)").execute(conn)?;
        Ok(())
    })
    .await?;
    Ok((Utc::now() - start).num_milliseconds().max(0) as u64)
}

async fn force_close_stale_commands(ctx: &JobContext, now: chrono::DateTime<Utc>) -> Result<u64, EngineError> {
    let mut closed = 0;
    for command in commands::list_open(&ctx.pool).await? {
        let status = command.command_status().unwrap_or(CommandStatus::Started);
        if should_force_close(status, command.dispatched_at, now) {
            commands::update_status(&ctx.pool, command.id, CommandStatus::Failed).await?;
            closed += 1;
        } else if eligible_for_cleanup(status, command.dispatched_at, now) {
            // Already terminal and past the cleanup window; the retention
            // prune below picks these up, nothing to do here.
            continue;
        }
    }
    Ok(closed)
}

async fn recover_exhausted_registry(ctx: &JobContext, now: chrono::DateTime<Utc>) -> Result<u64, EngineError> {
    let mut recovered = 0;
    for row in registry::list_exhausted(&ctx.pool).await? {
        let recovery = recover_backlog(row.backlog_tier as u32, now);
        registry::recover_row(&ctx.pool, row.id, recovery.state, recovery.backlog_tier, recovery.next_eligible_at).await?;
        recovered += 1;
    }
    Ok(recovered)
}
