//! Throttle enforcer: per-connector request budgets, pause state, and
//! profile resolution. The budget-never-exceeded invariant lives entirely
//! in [`try_consume`] — every call site must go through it before issuing
//! an upstream request.

use chrono::{DateTime, Utc};
use shelfwatch_core::models::PauseReason;
use shelfwatch_core::time::{minute_window_expired, start_of_utc_today};

mod profile;

pub use profile::{resolve_profile, ThrottleProfile, BUILT_IN_DEFAULT_PROFILE};

/// In-memory mirror of a `throttle_state` row, decoupled from diesel so the
/// decision logic below can be unit tested without a database.
#[derive(Debug, Clone, PartialEq)]
pub struct ThrottleState {
    pub requests_this_minute: i32,
    pub requests_today: i32,
    pub minute_window_start: DateTime<Utc>,
    pub day_window_start: DateTime<Utc>,
    pub paused_until: Option<DateTime<Utc>>,
    pub pause_reason: Option<PauseReason>,
    pub last_request_at: Option<DateTime<Utc>>,
}

impl ThrottleState {
    pub fn fresh(now: DateTime<Utc>) -> Self {
        Self {
            requests_this_minute: 0,
            requests_today: 0,
            minute_window_start: now,
            day_window_start: start_of_utc_today(now),
            paused_until: None,
            pause_reason: None,
            last_request_at: None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConsumeDecision {
    Allowed,
    Paused,
    MinuteBudgetExhausted,
    DailyBudgetExhausted,
}

/// Resets any window that has rolled over before evaluating the request.
/// Must run before every [`try_consume`] call so stale counters never leak
/// across a minute or day boundary.
pub fn reset_expired_windows(state: &mut ThrottleState, now: DateTime<Utc>) {
    if minute_window_expired(state.minute_window_start, now) {
        state.requests_this_minute = 0;
        state.minute_window_start = now;
    }
    let today = start_of_utc_today(now);
    if state.day_window_start < today {
        state.requests_today = 0;
        state.day_window_start = today;
    }
    if let Some(until) = state.paused_until {
        if until <= now {
            state.paused_until = None;
            state.pause_reason = None;
        }
    }
}

/// Attempts to consume one unit of budget. Never mutates `state` unless the
/// request is allowed, so a rejected attempt leaves counters untouched.
pub fn try_consume(state: &mut ThrottleState, profile: &ThrottleProfile, now: DateTime<Utc>) -> ConsumeDecision {
    reset_expired_windows(state, now);

    if let Some(until) = state.paused_until {
        if until > now {
            return ConsumeDecision::Paused;
        }
    }

    if state.requests_this_minute >= profile.requests_per_minute {
        return ConsumeDecision::MinuteBudgetExhausted;
    }

    if let Some(budget) = profile.daily_budget {
        if state.requests_today >= budget {
            return ConsumeDecision::DailyBudgetExhausted;
        }
    }

    state.requests_this_minute += 1;
    state.requests_today += 1;
    state.last_request_at = Some(now);
    ConsumeDecision::Allowed
}

/// Pauses a connector for `duration` seconds, recording why.
pub fn set_pause(state: &mut ThrottleState, reason: PauseReason, duration_seconds: i64, now: DateTime<Utc>) {
    state.paused_until = Some(now + chrono::Duration::seconds(duration_seconds));
    state.pause_reason = Some(reason);
}

/// Idempotent: clearing an unpaused state is a no-op.
pub fn clear_pause(state: &mut ThrottleState) {
    state.paused_until = None;
    state.pause_reason = None;
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn profile() -> ThrottleProfile {
        ThrottleProfile {
            name: "test".into(),
            requests_per_minute: 2,
            daily_budget: Some(3),
            batch_size: 1,
            batch_cooldown_seconds: 0,
            rate_limit_pause_seconds: 60,
        }
    }

    #[test]
    fn never_exceeds_the_per_minute_budget() {
        let now = Utc.with_ymd_and_hms(2026, 7, 30, 12, 0, 0).unwrap();
        let mut state = ThrottleState::fresh(now);
        let profile = profile();
        assert_eq!(try_consume(&mut state, &profile, now), ConsumeDecision::Allowed);
        assert_eq!(try_consume(&mut state, &profile, now), ConsumeDecision::Allowed);
        assert_eq!(try_consume(&mut state, &profile, now), ConsumeDecision::MinuteBudgetExhausted);
    }

    #[test]
    fn daily_budget_caps_across_minute_resets() {
        let now = Utc.with_ymd_and_hms(2026, 7, 30, 12, 0, 0).unwrap();
        let mut state = ThrottleState::fresh(now);
        let profile = profile();
        try_consume(&mut state, &profile, now);
        try_consume(&mut state, &profile, now);
        let next_minute = now + chrono::Duration::seconds(61);
        assert_eq!(try_consume(&mut state, &profile, next_minute), ConsumeDecision::Allowed);
        let later = now + chrono::Duration::seconds(122);
        assert_eq!(try_consume(&mut state, &profile, later), ConsumeDecision::DailyBudgetExhausted);
    }

    #[test]
    fn pause_blocks_consumption_until_expiry() {
        let now = Utc.with_ymd_and_hms(2026, 7, 30, 12, 0, 0).unwrap();
        let mut state = ThrottleState::fresh(now);
        let profile = profile();
        set_pause(&mut state, PauseReason::RateLimit, 30, now);
        assert_eq!(try_consume(&mut state, &profile, now), ConsumeDecision::Paused);
        let after = now + chrono::Duration::seconds(31);
        assert_eq!(try_consume(&mut state, &profile, after), ConsumeDecision::Allowed);
    }

    #[test]
    fn clear_pause_is_idempotent() {
        let now = Utc.with_ymd_and_hms(2026, 7, 30, 12, 0, 0).unwrap();
        let mut state = ThrottleState::fresh(now);
        clear_pause(&mut state);
        clear_pause(&mut state);
        assert!(state.paused_until.is_none());
    }
}
