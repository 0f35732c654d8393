//! Per-channel quiet hours, evaluated in the channel's own timezone.

use chrono::NaiveTime;
use chrono_tz::Tz;

#[derive(Debug, Clone)]
pub struct QuietHours {
    pub start: NaiveTime,
    pub end: NaiveTime,
    pub timezone: Tz,
}

/// Handles the wrap-around case where `end` is earlier than `start`
/// (e.g. 22:00-07:00 spans midnight).
pub fn in_quiet_hours(quiet: &QuietHours, now_utc: chrono::DateTime<chrono::Utc>) -> bool {
    let local = now_utc.with_timezone(&quiet.timezone).time();
    if quiet.start <= quiet.end {
        local >= quiet.start && local < quiet.end
    } else {
        local >= quiet.start || local < quiet.end
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};

    #[test]
    fn same_day_window_is_inclusive_start_exclusive_end() {
        let quiet = QuietHours { start: NaiveTime::from_hms_opt(22, 0, 0).unwrap(), end: NaiveTime::from_hms_opt(23, 0, 0).unwrap(), timezone: chrono_tz::UTC };
        let inside = Utc.with_ymd_and_hms(2026, 7, 30, 22, 30, 0).unwrap();
        let outside = Utc.with_ymd_and_hms(2026, 7, 30, 23, 30, 0).unwrap();
        assert!(in_quiet_hours(&quiet, inside));
        assert!(!in_quiet_hours(&quiet, outside));
    }

    #[test]
    fn overnight_window_wraps_past_midnight() {
        let quiet = QuietHours { start: NaiveTime::from_hms_opt(22, 0, 0).unwrap(), end: NaiveTime::from_hms_opt(7, 0, 0).unwrap(), timezone: chrono_tz::UTC };
        let late_night = Utc.with_ymd_and_hms(2026, 7, 30, 23, 0, 0).unwrap();
        let early_morning = Utc.with_ymd_and_hms(2026, 7, 30, 5, 0, 0).unwrap();
        let midday = Utc.with_ymd_and_hms(2026, 7, 30, 12, 0, 0).unwrap();
        assert!(in_quiet_hours(&quiet, late_night));
        assert!(in_quiet_hours(&quiet, early_morning));
        assert!(!in_quiet_hours(&quiet, midday));
    }
}
