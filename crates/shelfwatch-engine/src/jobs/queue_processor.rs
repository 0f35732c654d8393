//! `queue-processor`: orphan recovery, cooldown re-enqueue, and the actual
//! dispatch cycle — claim a batch, run it through the throttle, hand
//! accepted searches to the upstream client, and persist the outcome.
//!
//! Pending-command polling (did a dispatched search finish?) rides the
//! same tick, since both need the same per-connector client.

use chrono::Utc;
use shelfwatch_core::error::EngineError;
use shelfwatch_core::models::{CommandStatus, RegistryState};
use uuid::Uuid;

use crate::db::repo::{catalog, commands, connectors, registry, throttle as throttle_repo};
use crate::db::models::ThrottleStateRow;
use crate::jobs::JobContext;
use crate::queue::{dispatch::dispatch_one, DEFAULT_BACKOFF, ORPHAN_THRESHOLD_MINUTES};
use crate::throttle::resolve_profile;

/// Rows claimed per connector per tick. Keeps one slow connector from
/// starving the others' dispatch budget within a single run.
const CLAIM_BATCH_SIZE: i64 = 25;

#[derive(Debug, Default)]
pub struct QueueProcessorReport {
    pub reenqueued_cooldowns: usize,
    pub reverted_orphans: usize,
    pub promoted_pending: usize,
    pub dispatched: usize,
    pub commands_completed: usize,
}

pub async fn run(ctx: &JobContext, max_attempts: i32) -> Result<QueueProcessorReport, EngineError> {
    let now = Utc::now();
    let mut report = QueueProcessorReport {
        reenqueued_cooldowns: registry::reenqueue_eligible_cooldowns(&ctx.pool, now).await?,
        reverted_orphans: registry::revert_orphans(&ctx.pool, ORPHAN_THRESHOLD_MINUTES, now).await?,
        promoted_pending: registry::enqueue_pending(&ctx.pool).await?,
        ..Default::default()
    };

    for row in connectors::list_enabled(&ctx.pool).await? {
        let client = match crate::upstream::client_for(&row, &ctx.secrets) {
            Ok(client) => client,
            Err(_) => continue,
        };

        report.commands_completed += poll_open_commands(ctx, row.id, &client).await?;

        let mut entries = registry::claim_batch(&ctx.pool, row.id, CLAIM_BATCH_SIZE).await?;
        if entries.is_empty() {
            continue;
        }

        let throttle_row = throttle_repo::load_or_init(&ctx.pool, row.id).await?;
        let mut throttle_state = throttle_row.to_logic();
        let profile_row = match row.throttle_profile_id {
            Some(id) => connectors::get_throttle_profile(&ctx.pool, id).await?,
            None => None,
        };
        let default_profile_row = connectors::get_default_throttle_profile(&ctx.pool).await?;
        let profile = resolve_profile(profile_row.map(|r| r.to_logic()), default_profile_row.map(|r| r.to_logic()));

        for entry in entries.iter_mut() {
            let upstream_id = catalog::upstream_id_for(&ctx.pool, entry.content_type, entry.content_id).await?;
            let Some(upstream_id) = upstream_id else {
                // Mirror row vanished since this entry was queued; next sweep will resolve it.
                continue;
            };
            let upstream_ids = [upstream_id];
            let result = dispatch_one(&*client, &mut throttle_state, &profile, entry, &upstream_ids, &DEFAULT_BACKOFF, max_attempts).await?;
            let Some(result) = result else { continue };
            report.dispatched += 1;
            if let Some(command_id) = result.command_id {
                commands::insert(&ctx.pool, row.id, command_id, entry.content_type, entry.content_id).await?;
                ctx.analytics.search_dispatched(row.id, entry.content_id);
            } else {
                ctx.analytics.search_failed(row.id, entry.content_id, "dispatch rejected");
            }
            registry::save_entry(&ctx.pool, entry).await?;
        }

        throttle_repo::save(&ctx.pool, ThrottleStateRow::from_logic(row.id, &throttle_state)).await?;
    }

    Ok(report)
}

async fn poll_open_commands(
    ctx: &JobContext,
    connector_id: Uuid,
    client: &std::sync::Arc<dyn shelfwatch_connectors::client::UpstreamClient>,
) -> Result<usize, EngineError> {
    let mut completed = 0;
    let open = commands::list_open(&ctx.pool).await?;
    for command in open.into_iter().filter(|c| c.connector_id == connector_id) {
        let status = match client.command_status(command.command_id).await {
            Ok(result) => result.status.parse::<CommandStatus>().unwrap_or(CommandStatus::Started),
            Err(_) => continue,
        };
        commands::update_status(&ctx.pool, command.id, status).await?;
        if matches!(status, CommandStatus::Completed) {
            ctx.analytics.search_completed(command.connector_id, command.content_id);
            completed += 1;
        } else if matches!(status, CommandStatus::Failed) {
            ctx.analytics.search_failed(command.connector_id, command.content_id, "command failed upstream");
        }
    }
    Ok(completed)
}

/// `queue-depth-sampler`: emits one `queueDepthSampled` analytics event per
/// connector with its current registry state breakdown, feeding the
/// `avgQueueDepth`/`peakQueueDepth` columns the rollup jobs compute.
pub async fn run_depth_sampler(ctx: &JobContext) -> Result<usize, EngineError> {
    let mut sampled = 0;
    for row in connectors::list_enabled(&ctx.pool).await? {
        let counts = registry::count_by_state(&ctx.pool, row.id).await?;
        let total: i64 = counts.values().sum();
        let queued = counts.get(&RegistryState::Queued).copied().unwrap_or(0);
        let searching = counts.get(&RegistryState::Searching).copied().unwrap_or(0);
        let cooldown = counts.get(&RegistryState::Cooldown).copied().unwrap_or(0);
        ctx.analytics.queue_depth_sampled(
            row.id,
            serde_json::json!({ "total": total, "queued": queued, "searching": searching, "cooldown": cooldown }),
        );
        sampled += 1;
    }
    Ok(sampled)
}
