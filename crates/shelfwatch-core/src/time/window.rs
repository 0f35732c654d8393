//! UTC day boundary and minute-window helpers.
//!
//! `minute_window_expired` resets to *now* rather than aligning to the next
//! wall-clock minute boundary, matching the legacy behavior spec.md
//! describes (a burst straddling a minute boundary can consume two
//! budgets); this is a recorded decision, not an oversight.

use chrono::{DateTime, Datelike, Duration, TimeZone, Utc};

/// Start of the UTC day containing `at`.
pub fn start_of_utc_day(at: DateTime<Utc>) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(at.year(), at.month(), at.day(), 0, 0, 0).single().expect("valid calendar date")
}

/// Start of today (UTC), relative to `now`.
pub fn start_of_utc_today(now: DateTime<Utc>) -> DateTime<Utc> {
    start_of_utc_day(now)
}

/// True once 60 seconds have elapsed since `window_start`.
pub fn minute_window_expired(window_start: DateTime<Utc>, now: DateTime<Utc>) -> bool {
    now - window_start >= Duration::seconds(60)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn start_of_day_truncates_to_midnight() {
        let at = Utc.with_ymd_and_hms(2026, 7, 30, 23, 59, 30).unwrap();
        let start = start_of_utc_day(at);
        assert_eq!(start, Utc.with_ymd_and_hms(2026, 7, 30, 0, 0, 0).unwrap());
    }

    #[test]
    fn minute_window_expires_at_exactly_sixty_seconds() {
        let start = Utc.with_ymd_and_hms(2026, 7, 30, 12, 0, 0).unwrap();
        assert!(!minute_window_expired(start, start + Duration::seconds(59)));
        assert!(minute_window_expired(start, start + Duration::seconds(60)));
    }

    #[test]
    fn day_rollover_crosses_midnight() {
        let before = Utc.with_ymd_and_hms(2026, 7, 30, 23, 59, 30).unwrap();
        let after = Utc.with_ymd_and_hms(2026, 7, 31, 0, 0, 1).unwrap();
        assert_ne!(start_of_utc_day(before), start_of_utc_day(after));
    }
}
