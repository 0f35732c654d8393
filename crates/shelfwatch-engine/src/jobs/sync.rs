//! `incremental-sync-sweep`, `full-reconciliation`, and `completion-snapshot`:
//! mirror the upstream catalog, register new gaps/upgrades, resolve
//! registries the sync made unnecessary, and (full reconciliation only)
//! drop mirror rows the upstream no longer reports.

use chrono::Utc;
use shelfwatch_core::error::EngineError;
use shelfwatch_core::models::{ConnectorType, ContentType, SearchType};
use uuid::Uuid;

use crate::db::models::{ConnectorRow, EpisodeRow, MovieRow};
use crate::db::repo::{catalog, connectors, registry};
use crate::jobs::JobContext;
use crate::sync::{diff_movies, diff_series, discover_gaps_and_upgrades, search_type_for, ContentRef, SyncSummary};

pub async fn run_incremental(ctx: &JobContext) -> Result<Vec<SyncSummary>, EngineError> {
    run_sweep(ctx, false).await
}

pub async fn run_full_reconciliation(ctx: &JobContext) -> Result<Vec<SyncSummary>, EngineError> {
    run_sweep(ctx, true).await
}

async fn run_sweep(ctx: &JobContext, full: bool) -> Result<Vec<SyncSummary>, EngineError> {
    let rows = connectors::list_enabled(&ctx.pool).await?;
    let mut summaries = Vec::with_capacity(rows.len());
    for row in rows {
        let start = Utc::now();
        let mut summary = match sync_one_connector(ctx, &row, full).await {
            Ok(summary) => summary,
            Err(e) => {
                ctx.analytics.sync_failed(row.id, &e.to_string());
                continue;
            }
        };
        summary.duration_ms = (Utc::now() - start).num_milliseconds().max(0) as u64;
        ctx.analytics.sync_completed(row.id, serde_json::to_value(&summary).unwrap_or_default());
        connectors::update_health(&ctx.pool, row.id, row.health_status().unwrap_or(shelfwatch_core::models::HealthStatus::Unknown), Some(Utc::now())).await?;
        summaries.push(summary);
    }
    Ok(summaries)
}

async fn sync_one_connector(ctx: &JobContext, row: &ConnectorRow, full: bool) -> Result<SyncSummary, EngineError> {
    let mut summary = SyncSummary::default();
    let client = crate::upstream::client_for(row, &ctx.secrets)?;

    match row.connector_type().unwrap_or(ConnectorType::SeriesServer) {
        ConnectorType::SeriesServer => {
            let remote_series = client.list_series().await?;
            let known_ids = catalog::known_series_upstream_ids(&ctx.pool, row.id).await?;
            let diff = diff_series(remote_series, &known_ids, full);

            let series_rows = catalog::upsert_series(&ctx.pool, row.id, diff.upsert).await?;
            summary.items_synced += series_rows.len() as u64;
            if full {
                catalog::delete_stale_series(&ctx.pool, row.id, diff.stale_upstream_ids).await?;
            }

            for series in &series_rows {
                let remote_episodes = client.list_episodes(series.upstream_id).await?;
                let episode_rows = catalog::upsert_episodes(&ctx.pool, row.id, series.id, remote_episodes).await?;
                summary.items_synced += episode_rows.len() as u64;
                process_episodes(ctx, row.id, &episode_rows, &mut summary).await?;
            }
        }
        ConnectorType::MovieServer | ConnectorType::AdultMovieServer => {
            let remote_movies = client.list_movies().await?;
            let known_ids = catalog::known_movie_upstream_ids(&ctx.pool, row.id).await?;
            let diff = diff_movies(remote_movies, &known_ids, full);

            let movie_rows = catalog::upsert_movies(&ctx.pool, row.id, diff.upsert).await?;
            summary.items_synced += movie_rows.len() as u64;
            if full {
                catalog::delete_stale_movies(&ctx.pool, row.id, diff.stale_upstream_ids).await?;
            }
            process_movies(ctx, row.id, &movie_rows, &mut summary).await?;
        }
    }

    Ok(summary)
}

async fn process_episodes(ctx: &JobContext, connector_id: Uuid, rows: &[EpisodeRow], summary: &mut SyncSummary) -> Result<(), EngineError> {
    let refs: Vec<ContentRef> =
        rows.iter().map(|r| ContentRef { id: r.id, monitored: r.monitored, has_file: r.has_file, quality_cutoff_not_met: r.quality_cutoff_not_met }).collect();
    let outcome = discover_gaps_and_upgrades(&refs);
    summary.gaps_found += outcome.gaps.len() as u64;
    summary.upgrades_found += outcome.upgrades.len() as u64;

    for content_ref in &refs {
        match search_type_for(content_ref) {
            Some(search_type) => {
                registry::create_if_absent(&ctx.pool, connector_id, ContentType::Episode, content_ref.id, search_type).await?;
                summary.registries_created += 1;
            }
            None => {
                for search_type in [SearchType::Gap, SearchType::Upgrade] {
                    let removed = registry::resolve(&ctx.pool, connector_id, content_ref.id, search_type).await?;
                    summary.registries_resolved += removed as u64;
                }
            }
        }
    }
    Ok(())
}

async fn process_movies(ctx: &JobContext, connector_id: Uuid, rows: &[MovieRow], summary: &mut SyncSummary) -> Result<(), EngineError> {
    let refs: Vec<ContentRef> =
        rows.iter().map(|r| ContentRef { id: r.id, monitored: r.monitored, has_file: r.has_file, quality_cutoff_not_met: r.quality_cutoff_not_met }).collect();
    let outcome = discover_gaps_and_upgrades(&refs);
    summary.gaps_found += outcome.gaps.len() as u64;
    summary.upgrades_found += outcome.upgrades.len() as u64;

    for content_ref in &refs {
        match search_type_for(content_ref) {
            Some(search_type) => {
                registry::create_if_absent(&ctx.pool, connector_id, ContentType::Movie, content_ref.id, search_type).await?;
                summary.registries_created += 1;
            }
            None => {
                for search_type in [SearchType::Gap, SearchType::Upgrade] {
                    let removed = registry::resolve(&ctx.pool, connector_id, content_ref.id, search_type).await?;
                    summary.registries_resolved += removed as u64;
                }
            }
        }
    }
    Ok(())
}

/// `completion-snapshot`: percentage of monitored content with a file,
/// reported through the analytics channel rather than a dedicated table —
/// there's no entity in the data model for a point-in-time snapshot, and a
/// `syncCompleted` event with a `kind` tag is enough to reconstruct one.
pub async fn run_completion_snapshot(ctx: &JobContext) -> Result<(), EngineError> {
    let rows = connectors::list_enabled(&ctx.pool).await?;
    for row in rows {
        let (monitored, complete) = match row.connector_type().unwrap_or(ConnectorType::SeriesServer) {
            ConnectorType::SeriesServer => {
                let episodes = catalog::list_episodes(&ctx.pool, row.id).await?;
                let monitored = episodes.iter().filter(|e| e.monitored).count();
                let complete = episodes.iter().filter(|e| e.monitored && e.has_file).count();
                (monitored, complete)
            }
            ConnectorType::MovieServer | ConnectorType::AdultMovieServer => {
                let movies = catalog::list_movies(&ctx.pool, row.id).await?;
                let monitored = movies.iter().filter(|m| m.monitored).count();
                let complete = movies.iter().filter(|m| m.monitored && m.has_file).count();
                (monitored, complete)
            }
        };
        let completion_ratio = if monitored == 0 { 1.0 } else { complete as f64 / monitored as f64 };
        ctx.analytics.sync_completed(
            row.id,
            serde_json::json!({ "kind": "completionSnapshot", "monitored": monitored, "complete": complete, "ratio": completion_ratio }),
        );
    }
    Ok(())
}
