//! `connector-reconnect`: advances the reconnect backoff table for
//! connectors the health check found unhealthy/offline, retrying a ping on
//! its own schedule rather than hammering a down server every health-check
//! tick.

use chrono::Utc;
use shelfwatch_core::error::EngineError;
use shelfwatch_core::models::HealthStatus;

use crate::db::repo::{connectors, sync_state};
use crate::jobs::JobContext;
use crate::reconnect::{record_failure, record_success, DEFAULT_RECONNECT_BACKOFF};

pub async fn run(ctx: &JobContext) -> Result<usize, EngineError> {
    let rows = connectors::list_enabled(&ctx.pool).await?;
    let mut attempted = 0;
    for row in rows {
        let unhealthy = matches!(row.health_status(), Some(HealthStatus::Unhealthy) | Some(HealthStatus::Offline) | None);
        if !unhealthy {
            continue;
        }

        let sync_row = sync_state::load_or_init(&ctx.pool, row.id).await?;
        let mut state = sync_row.to_logic();
        let now = Utc::now();
        if !state.is_due(now) {
            continue;
        }

        attempted += 1;
        let client = match crate::upstream::client_for(&row, &ctx.secrets) {
            Ok(client) => client,
            Err(e) => {
                record_failure(&mut state, &DEFAULT_RECONNECT_BACKOFF, e.to_string(), now);
                sync_state::save(&ctx.pool, crate::db::models::SyncStateRow::from_logic(row.id, &state)).await?;
                continue;
            }
        };

        match client.ping().await {
            Ok(()) => {
                record_success(&mut state, HealthStatus::Healthy);
                connectors::update_health(&ctx.pool, row.id, HealthStatus::Healthy, None).await?;
            }
            Err(e) => {
                record_failure(&mut state, &DEFAULT_RECONNECT_BACKOFF, e.to_string(), now);
            }
        }
        sync_state::save(&ctx.pool, crate::db::models::SyncStateRow::from_logic(row.id, &state)).await?;
    }
    Ok(attempted)
}
