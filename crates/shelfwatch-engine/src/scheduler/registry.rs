//! Per-job overlap guards and graceful shutdown plumbing. Built atop
//! `tokio-cron-scheduler`'s `JobScheduler`; a panic inside a job body is
//! caught at the call site so it never takes down the scheduler thread.

use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::{Mutex, Notify};
use tokio_cron_scheduler::JobScheduler;
use uuid::Uuid;

use shelfwatch_core::error::EngineError;

use crate::db::repo::schedules;
use crate::db::DbPool;

/// One configured sweep schedule, resolved from a `schedules` row into the
/// shape the scheduler wiring needs: a job name to key the overlap guard on
/// and the cron expression to install.
#[derive(Debug, Clone)]
pub struct SweepSchedule {
    pub job_name: String,
    pub cron_expression: String,
    pub connector_id: Option<Uuid>,
    pub sweep_type: shelfwatch_core::models::SweepType,
}

/// Reads every enabled `schedules` row and returns the sweep schedules that
/// should be running. Called at startup and whenever an operator edits the
/// `schedules` table, since cron cadence for incremental/full sweeps is
/// configurable per connector rather than fixed at compile time.
pub async fn reload_sweep_schedules(pool: &DbPool) -> Result<Vec<SweepSchedule>, EngineError> {
    let rows = schedules::list_enabled(pool).await?;
    Ok(rows
        .into_iter()
        .filter_map(|row| {
            let sweep_type = row.sweep_type()?;
            Some(SweepSchedule { job_name: row.name, cron_expression: row.cron_expression, connector_id: row.connector_id, sweep_type })
        })
        .collect())
}

/// Held for the duration of one job execution. `try_acquire` returns `None`
/// if the previous run of the same job is still in flight, implementing
/// "skip, not queue".
pub struct JobGuard {
    locks: Mutex<HashMap<&'static str, Arc<Mutex<()>>>>,
}

impl JobGuard {
    pub fn new() -> Self {
        Self { locks: Mutex::new(HashMap::new()) }
    }

    /// Returns a held lock on success, or `None` if the job is already
    /// running. The returned guard releases the lock on drop.
    pub async fn try_acquire(&self, job_name: &'static str) -> Option<tokio::sync::OwnedMutexGuard<()>> {
        let lock = {
            let mut locks = self.locks.lock().await;
            locks.entry(job_name).or_insert_with(|| Arc::new(Mutex::new(()))).clone()
        };
        lock.try_lock_owned().ok()
    }
}

impl Default for JobGuard {
    fn default() -> Self {
        Self::new()
    }
}

/// Fresh per execution; propagated through every downstream call so log
/// lines for one job run can be correlated.
pub fn new_correlation_id() -> Uuid {
    Uuid::new_v4()
}

/// Wraps `JobScheduler` with the shutdown signal used by graceful
/// shutdown: `shutdown()` notifies then awaits the scheduler's own
/// shutdown future, bounded by a grace period at the call site.
pub struct SchedulerHandle {
    pub scheduler: JobScheduler,
    shutdown: Arc<Notify>,
}

impl SchedulerHandle {
    pub fn new(scheduler: JobScheduler) -> Self {
        Self { scheduler, shutdown: Arc::new(Notify::new()) }
    }

    pub fn shutdown_signal(&self) -> Arc<Notify> {
        self.shutdown.clone()
    }

    pub fn request_shutdown(&self) {
        self.shutdown.notify_waiters();
    }
}

/// Runs `job` under `guard`, catching panics so the scheduler loop survives
/// a misbehaving job body. Skips entirely if the job is still running.
pub async fn run_guarded<F, Fut>(guard: &JobGuard, job_name: &'static str, job: F)
where
    F: FnOnce(Uuid) -> Fut,
    Fut: std::future::Future<Output = ()>,
{
    let Some(_lock) = guard.try_acquire(job_name).await else {
        tracing::debug!(job = job_name, "skipping overlapping run");
        return;
    };
    let correlation_id = new_correlation_id();
    let span = tracing::info_span!("scheduled_job", job = job_name, %correlation_id);
    async move {
        tracing::info!("job started");
        let result = std::panic::AssertUnwindSafe(job(correlation_id)).catch_unwind().await;
        match result {
            Ok(()) => tracing::info!("job completed"),
            Err(_) => tracing::error!("job panicked"),
        }
    }
    .instrument(span)
    .await;
}

use futures_util::FutureExt;
use tracing::Instrument;

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn second_concurrent_acquire_is_rejected() {
        let guard = JobGuard::new();
        let first = guard.try_acquire("job").await;
        assert!(first.is_some());
        let second = guard.try_acquire("job").await;
        assert!(second.is_none());
    }

    #[tokio::test]
    async fn releasing_the_guard_allows_a_new_run() {
        let guard = JobGuard::new();
        {
            let _first = guard.try_acquire("job").await;
        }
        let second = guard.try_acquire("job").await;
        assert!(second.is_some());
    }
}
