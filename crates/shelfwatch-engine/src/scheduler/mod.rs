//! Cron job registry: the built-in job table, per-job overlap guards, and
//! correlation-id propagation for each execution.

mod jobs;
mod registry;

pub use jobs::{built_in_jobs, JobDefinition};
pub use registry::{new_correlation_id, reload_sweep_schedules, run_guarded, JobGuard, SchedulerHandle, SweepSchedule};
