//! `connector-health-check`: pings every enabled connector and records the
//! derived [`HealthStatus`] so reconnect and dispatch can react to it.
//!
//! `prowlarr-health-check` is a separate, optional probe: unlike the
//! `seriesServer`/`movieServer`/`adultMovieServer` connectors, an indexer
//! aggregator has no row of its own in `connectors` — it's configured
//! out-of-band via `PROWLARR_URL`/`PROWLARR_API_KEY` and the job is a no-op
//! when those are unset.

use shelfwatch_core::models::HealthStatus;
use tracing::warn;

use crate::db::repo::connectors;
use crate::jobs::JobContext;
use shelfwatch_core::error::EngineError;

pub async fn run(ctx: &JobContext) -> Result<usize, EngineError> {
    let rows = connectors::list_enabled(&ctx.pool).await?;
    let mut checked = 0;
    for row in rows {
        let client = match crate::upstream::client_for(&row, &ctx.secrets) {
            Ok(client) => client,
            Err(e) => {
                warn!(connector_id = %row.id, error = %e, "failed to build upstream client for health check");
                connectors::update_health(&ctx.pool, row.id, HealthStatus::Unknown, None).await?;
                continue;
            }
        };

        let status = match client.ping().await {
            Ok(()) => match client.health().await {
                Ok(checks) if checks.iter().any(|c| c.severity.eq_ignore_ascii_case("error")) => HealthStatus::Degraded,
                Ok(_) => HealthStatus::Healthy,
                Err(_) => HealthStatus::Degraded,
            },
            Err(_) => HealthStatus::Offline,
        };

        connectors::update_health(&ctx.pool, row.id, status, None).await?;
        checked += 1;
    }
    Ok(checked)
}

/// Optional indexer-aggregator ping. Returns `None` when not configured.
pub async fn run_prowlarr_check(prowlarr_url: Option<&str>) -> Option<HealthStatus> {
    let url = prowlarr_url?;
    let client = reqwest::Client::new();
    match client.get(format!("{}/ping", url.trim_end_matches('/'))).send().await {
        Ok(response) if response.status().is_success() => Some(HealthStatus::Healthy),
        Ok(_) => Some(HealthStatus::Degraded),
        Err(_) => Some(HealthStatus::Offline),
    }
}
