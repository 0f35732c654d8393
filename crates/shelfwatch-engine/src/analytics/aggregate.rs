//! Hourly and daily rollups. Both are idempotent: re-running against the
//! same input window must produce the same row, since a crash between
//! commit and the next scheduler tick can replay a bucket.

use chrono::{DateTime, Datelike, NaiveDate, TimeZone, Timelike, Utc};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HourlyBucket(pub DateTime<Utc>);

/// Truncates `at` to the start of its UTC hour.
pub fn hourly_bucket_of(at: DateTime<Utc>) -> HourlyBucket {
    HourlyBucket(Utc.with_ymd_and_hms(at.year(), at.month(), at.day(), at.hour(), 0, 0).unwrap())
}

#[derive(Debug, Clone, Default)]
pub struct DailyRollupInput {
    pub searches_dispatched: i32,
    pub searches_succeeded: i32,
    pub searches_failed: i32,
    pub gaps_discovered: i32,
    pub upgrades_discovered: i32,
    pub peak_queue_depth: i32,
}

/// Folds 24 hourly rows (or fewer, if some hours had no activity) into one
/// daily row. Summed fields add; `peak_queue_depth` takes the max.
#[derive(Debug, Clone, Default)]
pub struct HourlyStatsForDay {
    pub searches_dispatched: i32,
    pub searches_succeeded: i32,
    pub searches_failed: i32,
    pub gaps_discovered: i32,
    pub upgrades_discovered: i32,
    pub avg_queue_depth: f64,
}

pub fn daily_rollup(hourly: &[HourlyStatsForDay]) -> DailyRollupInput {
    let mut out = DailyRollupInput::default();
    let mut peak = 0.0_f64;
    for row in hourly {
        out.searches_dispatched += row.searches_dispatched;
        out.searches_succeeded += row.searches_succeeded;
        out.searches_failed += row.searches_failed;
        out.gaps_discovered += row.gaps_discovered;
        out.upgrades_discovered += row.upgrades_discovered;
        peak = peak.max(row.avg_queue_depth);
    }
    out.peak_queue_depth = peak.round() as i32;
    out
}

pub fn day_of(at: DateTime<Utc>) -> NaiveDate {
    at.date_naive()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn hourly_bucket_truncates_minutes_and_seconds() {
        let at = Utc.with_ymd_and_hms(2026, 7, 30, 14, 37, 52).unwrap();
        let bucket = hourly_bucket_of(at);
        assert_eq!(bucket.0, Utc.with_ymd_and_hms(2026, 7, 30, 14, 0, 0).unwrap());
    }

    #[test]
    fn daily_rollup_sums_counts_and_maxes_queue_depth() {
        let hourly = vec![
            HourlyStatsForDay { searches_dispatched: 3, avg_queue_depth: 2.0, ..Default::default() },
            HourlyStatsForDay { searches_dispatched: 5, avg_queue_depth: 7.0, ..Default::default() },
        ];
        let daily = daily_rollup(&hourly);
        assert_eq!(daily.searches_dispatched, 8);
        assert_eq!(daily.peak_queue_depth, 7);
    }
}
