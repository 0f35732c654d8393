//! Database maintenance: vacuum/analyze timing, orphan cleanup, retention
//! pruning, and exhausted-registry backlog recovery.

use chrono::{DateTime, Utc};

use crate::queue::tier_delay_seconds;
use shelfwatch_core::models::RegistryState;

pub const DEFAULT_HISTORY_RETENTION_DAYS: i64 = 90;
pub const DEFAULT_LOG_RETENTION_DAYS: i64 = 14;
pub const PRUNE_BATCH_SIZE: i64 = 10_000;

#[derive(Debug, Clone, Copy)]
pub struct RetentionPolicy {
    pub history_days: i64,
    pub log_days: i64,
}

impl Default for RetentionPolicy {
    fn default() -> Self {
        Self { history_days: DEFAULT_HISTORY_RETENTION_DAYS, log_days: DEFAULT_LOG_RETENTION_DAYS }
    }
}

pub fn prune_cutoff(now: DateTime<Utc>, retention_days: i64) -> DateTime<Utc> {
    now - chrono::Duration::days(retention_days)
}

/// Recovers an exhausted search-registry row into `Cooldown` with a bumped
/// backlog tier and a fresh `next_eligible_at` computed from the tier
/// schedule, rather than leaving it stuck in `Exhausted` forever.
#[derive(Debug, Clone)]
pub struct BacklogRecovery {
    pub state: RegistryState,
    pub backlog_tier: u32,
    pub next_eligible_at: DateTime<Utc>,
}

pub fn recover_backlog(current_tier: u32, now: DateTime<Utc>) -> BacklogRecovery {
    let tier = current_tier.max(1);
    let delay = tier_delay_seconds(tier);
    BacklogRecovery { state: RegistryState::Cooldown, backlog_tier: tier, next_eligible_at: now + chrono::Duration::seconds(delay) }
}

#[derive(Debug, Clone, Default)]
pub struct MaintenanceReport {
    pub vacuum_duration_ms: u64,
    pub orphans_removed: u64,
    pub history_rows_pruned: u64,
    pub log_rows_pruned: u64,
    pub backlog_rows_recovered: u64,
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn recovery_never_lowers_an_existing_tier() {
        let now = Utc.with_ymd_and_hms(2026, 7, 30, 4, 30, 0).unwrap();
        let recovery = recover_backlog(2, now);
        assert_eq!(recovery.backlog_tier, 2);
        assert_eq!(recovery.state, RegistryState::Cooldown);
    }

    #[test]
    fn recovery_floors_tier_zero_to_tier_one() {
        let now = Utc::now();
        let recovery = recover_backlog(0, now);
        assert_eq!(recovery.backlog_tier, 1);
    }

    #[test]
    fn prune_cutoff_subtracts_retention_window() {
        let now = Utc.with_ymd_and_hms(2026, 7, 30, 4, 30, 0).unwrap();
        let cutoff = prune_cutoff(now, 90);
        assert_eq!((now - cutoff).num_days(), 90);
    }
}
