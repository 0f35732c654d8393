//! Command monitor: tracks pending upstream search commands through to
//! completion, force-closing ones that never terminate.

use chrono::{DateTime, Utc};
use shelfwatch_core::models::CommandStatus;

/// A command left in a non-terminal state this long is presumed lost and
/// force-closed as timed out rather than polled forever.
pub const FORCE_CLOSE_AFTER_HOURS: i64 = 24;

/// Terminal rows older than this are eligible for periodic cleanup.
pub const CLEANUP_AFTER_DAYS: i64 = 7;

pub fn is_terminal(status: CommandStatus) -> bool {
    matches!(status, CommandStatus::Completed | CommandStatus::Failed)
}

pub fn should_force_close(status: CommandStatus, dispatched_at: DateTime<Utc>, now: DateTime<Utc>) -> bool {
    !is_terminal(status) && now - dispatched_at > chrono::Duration::hours(FORCE_CLOSE_AFTER_HOURS)
}

pub fn eligible_for_cleanup(status: CommandStatus, dispatched_at: DateTime<Utc>, now: DateTime<Utc>) -> bool {
    is_terminal(status) && now - dispatched_at > chrono::Duration::days(CLEANUP_AFTER_DAYS)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn completed_and_failed_are_terminal() {
        assert!(is_terminal(CommandStatus::Completed));
        assert!(is_terminal(CommandStatus::Failed));
        assert!(!is_terminal(CommandStatus::Started));
    }

    #[test]
    fn force_closes_only_after_the_deadline() {
        let now = Utc::now();
        let fresh = now - chrono::Duration::hours(1);
        let stale = now - chrono::Duration::hours(25);
        assert!(!should_force_close(CommandStatus::Started, fresh, now));
        assert!(should_force_close(CommandStatus::Started, stale, now));
        assert!(!should_force_close(CommandStatus::Completed, stale, now));
    }

    #[test]
    fn cleanup_only_targets_old_terminal_rows() {
        let now = Utc::now();
        let old = now - chrono::Duration::days(8);
        assert!(eligible_for_cleanup(CommandStatus::Completed, old, now));
        assert!(!eligible_for_cleanup(CommandStatus::Started, old, now));
    }
}
