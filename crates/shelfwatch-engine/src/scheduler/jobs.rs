//! The built-in job table. Sweep jobs (`incremental-sync-sweep`,
//! `full-reconciliation`) additionally exist as dynamic `schedules` rows;
//! `registry::reload_sweep_schedules` reads those rows and returns the
//! per-connector cron schedules to install, overriding the default cadence
//! listed here for any connector with its own `schedules` row.

#[derive(Debug, Clone, Copy)]
pub struct JobDefinition {
    pub name: &'static str,
    pub cron_expression: &'static str,
    pub description: &'static str,
}

pub fn built_in_jobs() -> Vec<JobDefinition> {
    vec![
        JobDefinition { name: "throttle-window-reset", cron_expression: "0 * * * * *", description: "window/pause reset" },
        JobDefinition { name: "prowlarr-health-check", cron_expression: "0 */5 * * * *", description: "external indexer aggregator health" },
        JobDefinition { name: "connector-health-check", cron_expression: "0 */5 * * * *", description: "per-connector ping + health" },
        JobDefinition { name: "connector-reconnect", cron_expression: "*/30 * * * * *", description: "process reconnect backoff table" },
        JobDefinition { name: "incremental-sync-sweep", cron_expression: "0 */15 * * * *", description: "sync + discovery + enqueue" },
        JobDefinition { name: "full-reconciliation", cron_expression: "0 0 3 * * *", description: "sync + deletions" },
        JobDefinition { name: "completion-snapshot", cron_expression: "0 0 4 * * *", description: "capture library completion per connector" },
        JobDefinition { name: "db-maintenance", cron_expression: "0 30 4 * * *", description: "vacuum/analyze, orphan/history/log prune" },
        JobDefinition { name: "queue-processor", cron_expression: "0 * * * * *", description: "orphan recovery, re-enqueue, dispatch" },
        JobDefinition { name: "notification-batch-processor", cron_expression: "0 * * * * *", description: "send batched notifications" },
        JobDefinition { name: "queue-depth-sampler", cron_expression: "0 */5 * * * *", description: "emit queue depth events" },
        JobDefinition { name: "analytics-hourly-aggregation", cron_expression: "0 5 * * * *", description: "roll up previous hour" },
        JobDefinition { name: "analytics-daily-aggregation", cron_expression: "0 0 1 * * *", description: "roll up previous day, prune raw events" },
        JobDefinition { name: "scheduled-backup", cron_expression: "0 0 2 * * *", description: "snapshot + retention cleanup" },
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_job_name_is_unique() {
        let jobs = built_in_jobs();
        let mut names: Vec<_> = jobs.iter().map(|j| j.name).collect();
        names.sort();
        names.dedup();
        assert_eq!(names.len(), jobs.len());
    }

    #[test]
    fn fourteen_jobs_are_registered() {
        assert_eq!(built_in_jobs().len(), 14);
    }
}
