//! Analytics: fire-and-forget event collection plus hourly/daily
//! aggregation and queue-depth sampling.

mod aggregate;
mod collector;

pub use aggregate::{daily_rollup, day_of, hourly_bucket_of, DailyRollupInput, HourlyBucket, HourlyStatsForDay};
pub use collector::{AnalyticsCollector, AnalyticsEvent};

/// Raw events older than this are pruned once rolled into daily stats.
pub const RAW_EVENT_RETENTION_DAYS: i64 = 7;
