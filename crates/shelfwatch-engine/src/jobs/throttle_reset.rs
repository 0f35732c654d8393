//! `throttle-window-reset`: clears expired minute/day windows and expired
//! pauses for every connector so a stale counter never blocks dispatch.

use chrono::Utc;
use shelfwatch_core::error::EngineError;
use uuid::Uuid;

use crate::db::repo::{connectors, throttle};
use crate::jobs::JobContext;
use crate::throttle::reset_expired_windows;

pub async fn run(ctx: &JobContext) -> Result<usize, EngineError> {
    let rows = connectors::list_all(&ctx.pool).await?;
    let mut reset_count = 0;
    for row in rows {
        reset_count += run_for_connector(ctx, row.id).await?;
    }
    Ok(reset_count)
}

async fn run_for_connector(ctx: &JobContext, connector_id: Uuid) -> Result<usize, EngineError> {
    let row = throttle::load_or_init(&ctx.pool, connector_id).await?;
    let mut state = row.to_logic();
    let before = state.clone();
    reset_expired_windows(&mut state, Utc::now());
    if state == before {
        return Ok(0);
    }
    throttle::save(&ctx.pool, crate::db::models::ThrottleStateRow::from_logic(connector_id, &state)).await?;
    Ok(1)
}
