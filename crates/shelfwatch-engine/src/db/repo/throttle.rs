//! `throttle_state`: one row per connector, upserted on first use.

use chrono::Utc;
use diesel::prelude::*;
use shelfwatch_core::error::EngineError;
use uuid::Uuid;

use crate::db::models::ThrottleStateRow;
use crate::db::schema::throttle_state;
use crate::db::{run_blocking, DbPool};
use crate::throttle::ThrottleState as ThrottleLogicState;

impl ThrottleStateRow {
    pub fn to_logic(&self) -> ThrottleLogicState {
        ThrottleLogicState {
            requests_this_minute: self.requests_this_minute,
            requests_today: self.requests_today,
            minute_window_start: self.minute_window_start,
            day_window_start: self.day_window_start,
            paused_until: self.paused_until,
            pause_reason: self.pause_reason(),
            last_request_at: self.last_request_at,
        }
    }

    pub fn from_logic(connector_id: Uuid, state: &ThrottleLogicState) -> Self {
        Self {
            connector_id,
            requests_this_minute: state.requests_this_minute,
            requests_today: state.requests_today,
            minute_window_start: state.minute_window_start,
            day_window_start: state.day_window_start,
            paused_until: state.paused_until,
            pause_reason: state.pause_reason.map(|r| r.to_string()),
            last_request_at: state.last_request_at,
        }
    }
}

/// Loads the connector's throttle state, seeding a fresh row if none exists
/// yet (a connector's first-ever dispatch attempt).
pub async fn load_or_init(pool: &DbPool, connector_id: Uuid) -> Result<ThrottleStateRow, EngineError> {
    run_blocking(pool, move |conn| {
        if let Some(row) =
            throttle_state::table.filter(throttle_state::connector_id.eq(connector_id)).first::<ThrottleStateRow>(conn).optional()?
        {
            return Ok(row);
        }
        let fresh = ThrottleStateRow::from_logic(connector_id, &ThrottleLogicState::fresh(Utc::now()));
        diesel::insert_into(throttle_state::table)
            .values(&fresh)
            .on_conflict(throttle_state::connector_id)
            .do_nothing()
            .execute(conn)?;
        Ok(throttle_state::table.filter(throttle_state::connector_id.eq(connector_id)).first::<ThrottleStateRow>(conn)?)
    })
    .await
}

pub async fn save(pool: &DbPool, row: ThrottleStateRow) -> Result<(), EngineError> {
    run_blocking(pool, move |conn| {
        diesel::update(throttle_state::table.filter(throttle_state::connector_id.eq(row.connector_id)))
            .set(&row)
            .execute(conn)?;
        Ok(())
    })
    .await
}
