//! The analytics pipeline's consumer task plus the two scheduled rollups
//! that read what it persisted: `analytics-hourly-aggregation` rolls the
//! previous UTC hour into `analytics_hourly_stats`, and
//! `analytics-daily-aggregation` folds a day's hourly rows into
//! `analytics_daily_stats` and prunes raw events past the retention window.

use chrono::{Duration, Utc};
use shelfwatch_core::error::EngineError;
use shelfwatch_core::models::EventType;
use tokio::sync::mpsc::UnboundedReceiver;

use crate::analytics::{
    day_of, hourly_bucket_of, AnalyticsEvent, DailyRollupInput, HourlyStatsForDay, RAW_EVENT_RETENTION_DAYS,
};
use crate::db::models::{AnalyticsDailyStatsRow, AnalyticsHourlyStatsRow};
use crate::db::repo::analytics;
use crate::jobs::JobContext;
use crate::jobs::notifications::record_for_channels;

/// Drains the channel every [`AnalyticsCollector`](crate::analytics::AnalyticsCollector)
/// call site feeds, persisting each event and fanning it out to subscribed
/// notification channels. Runs for the lifetime of the process; exits once
/// every sender has been dropped.
pub async fn run_consumer(ctx: JobContext, mut events: UnboundedReceiver<AnalyticsEvent>) {
    while let Some(event) = events.recv().await {
        let event_type = event.event_type;
        let connector_id = event.connector_id;
        let data = event.data.clone();
        if let Err(e) = analytics::insert_event(&ctx.pool, event).await {
            tracing::error!(error = %e, "failed to persist analytics event");
            continue;
        }
        if let Err(e) = record_for_channels(&ctx, event_type, connector_id, data).await {
            tracing::error!(error = %e, "failed to fan analytics event out to notification channels");
        }
    }
    tracing::info!("analytics consumer exiting, sender side closed");
}

pub async fn run_hourly_aggregation(ctx: &JobContext) -> Result<usize, EngineError> {
    let now = Utc::now();
    let bucket = hourly_bucket_of(now - Duration::hours(1));
    let start = bucket.0;
    let end = start + Duration::hours(1);

    let connector_ids = analytics::list_connector_ids_with_events(&ctx.pool, start, end).await?;
    let mut rolled = 0;
    for connector_id in connector_ids {
        let events = analytics::events_in_range(&ctx.pool, connector_id, start, end).await?;
        let stats = fold_events(&events);
        analytics::upsert_hourly(
            &ctx.pool,
            AnalyticsHourlyStatsRow {
                id: uuid::Uuid::new_v4(),
                connector_id,
                hour_bucket: start,
                searches_dispatched: stats.searches_dispatched,
                searches_succeeded: stats.searches_succeeded,
                searches_failed: stats.searches_failed,
                gaps_discovered: stats.gaps_discovered,
                upgrades_discovered: stats.upgrades_discovered,
                avg_queue_depth: stats.avg_queue_depth,
            },
        )
        .await?;
        rolled += 1;
    }
    Ok(rolled)
}

pub async fn run_daily_aggregation(ctx: &JobContext) -> Result<usize, EngineError> {
    let now = Utc::now();
    let day = day_of(now - Duration::days(1));
    let cutoff = now - Duration::days(RAW_EVENT_RETENTION_DAYS);

    let start = day.and_hms_opt(0, 0, 0).unwrap().and_utc();
    let end = start + Duration::days(1);
    let connector_ids = analytics::list_connector_ids_with_events(&ctx.pool, start, end).await?;

    let mut rolled = 0;
    for connector_id in connector_ids {
        let hourly_rows = analytics::hourly_rows_for_day(&ctx.pool, connector_id, day).await?;
        let hourly: Vec<HourlyStatsForDay> = hourly_rows
            .iter()
            .map(|r| HourlyStatsForDay {
                searches_dispatched: r.searches_dispatched,
                searches_succeeded: r.searches_succeeded,
                searches_failed: r.searches_failed,
                gaps_discovered: r.gaps_discovered,
                upgrades_discovered: r.upgrades_discovered,
                avg_queue_depth: r.avg_queue_depth,
            })
            .collect();
        let rollup: DailyRollupInput = crate::analytics::daily_rollup(&hourly);
        analytics::upsert_daily(
            &ctx.pool,
            AnalyticsDailyStatsRow {
                id: uuid::Uuid::new_v4(),
                connector_id,
                day_bucket: day,
                searches_dispatched: rollup.searches_dispatched,
                searches_succeeded: rollup.searches_succeeded,
                searches_failed: rollup.searches_failed,
                gaps_discovered: rollup.gaps_discovered,
                upgrades_discovered: rollup.upgrades_discovered,
                peak_queue_depth: rollup.peak_queue_depth,
            },
        )
        .await?;
        rolled += 1;
    }

    analytics::delete_events_before(&ctx.pool, cutoff).await?;
    Ok(rolled)
}

fn fold_events(events: &[crate::db::models::AnalyticsEventRow]) -> HourlyStatsForDay {
    let mut stats = HourlyStatsForDay::default();
    let mut depth_samples = Vec::new();
    for event in events {
        match event.event_type() {
            Some(EventType::SearchDispatched) => stats.searches_dispatched += 1,
            Some(EventType::SearchCompleted) => stats.searches_succeeded += 1,
            Some(EventType::SearchFailed) => stats.searches_failed += 1,
            Some(EventType::GapDiscovered) => stats.gaps_discovered += 1,
            Some(EventType::UpgradeDiscovered) => stats.upgrades_discovered += 1,
            Some(EventType::QueueDepthSampled) => {
                if let Some(depth) = event.event_data.get("total").and_then(|v| v.as_f64()) {
                    depth_samples.push(depth);
                }
            }
            _ => {}
        }
    }
    stats.avg_queue_depth = if depth_samples.is_empty() { 0.0 } else { depth_samples.iter().sum::<f64>() / depth_samples.len() as f64 };
    stats
}
