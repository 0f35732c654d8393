//! Search dispatch queue: registry state machine, priority ordering, and
//! the backoff schedule applied on failure/no-results.

use chrono::{DateTime, Utc};
use shelfwatch_core::models::{ContentType, RegistryState, SearchType};

mod backoff;
pub mod dispatch;
mod priority;

pub use backoff::{backoff_delay_seconds, tier_delay_seconds, BackoffConfig, DEFAULT_BACKOFF};
pub use priority::{dequeue_order, round_robin_interleave, DispatchCandidate};

/// A single search-registry row, decoupled from diesel for the state-machine
/// logic below.
#[derive(Debug, Clone, PartialEq)]
pub struct RegistryEntry {
    pub connector_id: uuid::Uuid,
    pub content_type: ContentType,
    pub content_id: uuid::Uuid,
    pub search_type: SearchType,
    pub state: RegistryState,
    pub attempt_count: i32,
    pub next_eligible_at: Option<DateTime<Utc>>,
    pub backlog_tier: u32,
}

/// Orphan threshold: a row stuck in `Searching` for longer than this is
/// assumed abandoned (process crash mid-dispatch) and reverted to `Queued`.
pub const ORPHAN_THRESHOLD_MINUTES: i64 = 10;

pub fn is_orphaned(updated_at: DateTime<Utc>, now: DateTime<Utc>) -> bool {
    now - updated_at > chrono::Duration::minutes(ORPHAN_THRESHOLD_MINUTES)
}

/// Outcome of a dispatch attempt, driving the next state transition.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DispatchOutcome {
    Success,
    RateLimited,
    Failed,
    NoResults,
}

/// Default ceiling on `attempt_count` before a registry is parked as
/// `Exhausted` rather than cycling through cooldown again.
pub const DEFAULT_MAX_ATTEMPTS: i32 = 10;

/// Applies a dispatch outcome to `entry`, advancing its state and backoff
/// schedule. Returns the new `next_eligible_at` the caller should persist.
pub fn apply_outcome(
    entry: &mut RegistryEntry,
    outcome: DispatchOutcome,
    backoff: &BackoffConfig,
    max_attempts: i32,
    now: DateTime<Utc>,
) {
    match outcome {
        DispatchOutcome::Success => {
            // Upstream accepted the command; the registry clears on the next
            // discovery pass once the item's file/quality state resolves it.
            entry.state = RegistryState::Pending;
            entry.attempt_count = 0;
            entry.next_eligible_at = None;
        }
        DispatchOutcome::RateLimited => {
            entry.state = RegistryState::Queued;
        }
        DispatchOutcome::Failed | DispatchOutcome::NoResults => {
            entry.attempt_count += 1;
            entry.state = if entry.attempt_count >= max_attempts {
                entry.next_eligible_at = None;
                RegistryState::Exhausted
            } else {
                let delay = backoff_delay_seconds(backoff, entry.attempt_count, entry.backlog_tier);
                entry.next_eligible_at = Some(now + chrono::Duration::seconds(delay));
                RegistryState::Cooldown
            };
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use uuid::Uuid;

    fn entry() -> RegistryEntry {
        RegistryEntry {
            connector_id: Uuid::nil(),
            content_type: ContentType::Episode,
            content_id: Uuid::nil(),
            search_type: SearchType::Gap,
            state: RegistryState::Searching,
            attempt_count: 0,
            next_eligible_at: None,
            backlog_tier: 0,
        }
    }

    #[test]
    fn success_moves_to_pending_and_resets_attempts() {
        let now = Utc::now();
        let mut e = entry();
        e.attempt_count = 3;
        apply_outcome(&mut e, DispatchOutcome::Success, &DEFAULT_BACKOFF, DEFAULT_MAX_ATTEMPTS, now);
        assert_eq!(e.state, RegistryState::Pending);
        assert_eq!(e.attempt_count, 0);
        assert_eq!(e.next_eligible_at, None);
    }

    #[test]
    fn rate_limited_requeues_without_incrementing_attempts() {
        let now = Utc::now();
        let mut e = entry();
        apply_outcome(&mut e, DispatchOutcome::RateLimited, &DEFAULT_BACKOFF, DEFAULT_MAX_ATTEMPTS, now);
        assert_eq!(e.state, RegistryState::Queued);
        assert_eq!(e.attempt_count, 0);
    }

    #[test]
    fn failure_moves_to_cooldown_until_max_attempts_reached() {
        let now = Utc::now();
        let mut e = entry();
        for _ in 0..3 {
            apply_outcome(&mut e, DispatchOutcome::Failed, &DEFAULT_BACKOFF, 3, now);
        }
        assert_eq!(e.state, RegistryState::Exhausted);
        assert_eq!(e.attempt_count, 3);
        assert_eq!(e.next_eligible_at, None);
    }

    #[test]
    fn exhaustion_is_gated_on_attempt_count_not_backoff_delay() {
        let now = Utc::now();
        let mut e = entry();
        // base_delay (15 min) is nowhere near max_delay (24h) yet, so only
        // attempt_count reaching max_attempts should exhaust the entry.
        apply_outcome(&mut e, DispatchOutcome::Failed, &DEFAULT_BACKOFF, 1, now);
        assert_eq!(e.state, RegistryState::Exhausted);
    }

    #[test]
    fn orphan_detection_respects_the_ten_minute_threshold() {
        let now = Utc::now();
        assert!(!is_orphaned(now - chrono::Duration::minutes(9), now));
        assert!(is_orphaned(now - chrono::Duration::minutes(11), now));
    }
}
