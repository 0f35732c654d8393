//! `analytics_events`, `analytics_hourly_stats`, `analytics_daily_stats`.

use chrono::{DateTime, NaiveDate, Utc};
use diesel::prelude::*;
use shelfwatch_core::error::EngineError;
use uuid::Uuid;

use crate::analytics::AnalyticsEvent;
use crate::db::models::{AnalyticsDailyStatsRow, AnalyticsEventRow, AnalyticsHourlyStatsRow, NewAnalyticsEvent};
use crate::db::schema::{analytics_daily_stats, analytics_events, analytics_hourly_stats};
use crate::db::{run_blocking, DbPool};

pub async fn insert_event(pool: &DbPool, event: AnalyticsEvent) -> Result<(), EngineError> {
    run_blocking(pool, move |conn| {
        let new_row = NewAnalyticsEvent {
            id: Uuid::new_v4(),
            connector_id: event.connector_id,
            event_type: event.event_type.to_string(),
            event_data: event.data,
            created_at: event.occurred_at,
        };
        diesel::insert_into(analytics_events::table).values(&new_row).execute(conn)?;
        Ok(())
    })
    .await
}

/// Raw events for `connector_id` within `[start, end)`, used to compute one
/// hourly bucket. Events with no connector (`connector_id = NULL`) are
/// process-wide and excluded from per-connector rollups.
pub async fn events_in_range(
    pool: &DbPool,
    connector_id: Uuid,
    start: DateTime<Utc>,
    end: DateTime<Utc>,
) -> Result<Vec<AnalyticsEventRow>, EngineError> {
    run_blocking(pool, move |conn| {
        Ok(analytics_events::table
            .filter(analytics_events::connector_id.eq(connector_id))
            .filter(analytics_events::created_at.ge(start))
            .filter(analytics_events::created_at.lt(end))
            .load::<AnalyticsEventRow>(conn)?)
    })
    .await
}

pub async fn upsert_hourly(pool: &DbPool, row: AnalyticsHourlyStatsRow) -> Result<(), EngineError> {
    run_blocking(pool, move |conn| {
        diesel::insert_into(analytics_hourly_stats::table)
            .values(&row)
            .on_conflict((analytics_hourly_stats::connector_id, analytics_hourly_stats::hour_bucket))
            .do_update()
            .set((
                analytics_hourly_stats::searches_dispatched.eq(row.searches_dispatched),
                analytics_hourly_stats::searches_succeeded.eq(row.searches_succeeded),
                analytics_hourly_stats::searches_failed.eq(row.searches_failed),
                analytics_hourly_stats::gaps_discovered.eq(row.gaps_discovered),
                analytics_hourly_stats::upgrades_discovered.eq(row.upgrades_discovered),
                analytics_hourly_stats::avg_queue_depth.eq(row.avg_queue_depth),
            ))
            .execute(conn)?;
        Ok(())
    })
    .await
}

pub async fn upsert_daily(pool: &DbPool, row: AnalyticsDailyStatsRow) -> Result<(), EngineError> {
    run_blocking(pool, move |conn| {
        diesel::insert_into(analytics_daily_stats::table)
            .values(&row)
            .on_conflict((analytics_daily_stats::connector_id, analytics_daily_stats::day_bucket))
            .do_update()
            .set((
                analytics_daily_stats::searches_dispatched.eq(row.searches_dispatched),
                analytics_daily_stats::searches_succeeded.eq(row.searches_succeeded),
                analytics_daily_stats::searches_failed.eq(row.searches_failed),
                analytics_daily_stats::gaps_discovered.eq(row.gaps_discovered),
                analytics_daily_stats::upgrades_discovered.eq(row.upgrades_discovered),
                analytics_daily_stats::peak_queue_depth.eq(row.peak_queue_depth),
            ))
            .execute(conn)?;
        Ok(())
    })
    .await
}

pub async fn hourly_rows_for_day(
    pool: &DbPool,
    connector_id: Uuid,
    day: NaiveDate,
) -> Result<Vec<AnalyticsHourlyStatsRow>, EngineError> {
    run_blocking(pool, move |conn| {
        let start = day.and_hms_opt(0, 0, 0).unwrap().and_utc();
        let end = start + chrono::Duration::days(1);
        Ok(analytics_hourly_stats::table
            .filter(analytics_hourly_stats::connector_id.eq(connector_id))
            .filter(analytics_hourly_stats::hour_bucket.ge(start))
            .filter(analytics_hourly_stats::hour_bucket.lt(end))
            .load::<AnalyticsHourlyStatsRow>(conn)?)
    })
    .await
}

pub async fn delete_events_before(pool: &DbPool, cutoff: DateTime<Utc>) -> Result<usize, EngineError> {
    run_blocking(pool, move |conn| {
        Ok(diesel::delete(analytics_events::table.filter(analytics_events::created_at.lt(cutoff))).execute(conn)?)
    })
    .await
}

pub async fn list_connector_ids_with_events(
    pool: &DbPool,
    start: DateTime<Utc>,
    end: DateTime<Utc>,
) -> Result<Vec<Uuid>, EngineError> {
    run_blocking(pool, move |conn| {
        let ids: Vec<Option<Uuid>> = analytics_events::table
            .filter(analytics_events::created_at.ge(start))
            .filter(analytics_events::created_at.lt(end))
            .select(analytics_events::connector_id)
            .distinct()
            .load(conn)?;
        Ok(ids.into_iter().flatten().collect())
    })
    .await
}
