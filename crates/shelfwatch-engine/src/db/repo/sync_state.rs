//! `sync_state`: one row per connector tracking reconnect backoff.

use diesel::prelude::*;
use shelfwatch_core::error::EngineError;
use uuid::Uuid;

use crate::db::models::SyncStateRow;
use crate::db::schema::sync_state;
use crate::db::{run_blocking, DbPool};
use crate::reconnect::ReconnectState;

impl SyncStateRow {
    pub fn to_logic(&self) -> ReconnectState {
        ReconnectState {
            attempts: self.reconnect_attempts,
            next_reconnect_at: self.next_reconnect_at,
            last_error: self.last_reconnect_error.clone(),
            paused: self.reconnect_paused,
        }
    }

    pub fn from_logic(connector_id: Uuid, state: &ReconnectState) -> Self {
        Self {
            connector_id,
            reconnect_attempts: state.attempts,
            next_reconnect_at: state.next_reconnect_at,
            reconnect_started_at: None,
            last_reconnect_error: state.last_error.clone(),
            reconnect_paused: state.paused,
        }
    }
}

pub async fn load_or_init(pool: &DbPool, connector_id: Uuid) -> Result<SyncStateRow, EngineError> {
    run_blocking(pool, move |conn| {
        if let Some(row) =
            sync_state::table.filter(sync_state::connector_id.eq(connector_id)).first::<SyncStateRow>(conn).optional()?
        {
            return Ok(row);
        }
        let fresh = SyncStateRow {
            connector_id,
            reconnect_attempts: 0,
            next_reconnect_at: None,
            reconnect_started_at: None,
            last_reconnect_error: None,
            reconnect_paused: false,
        };
        diesel::insert_into(sync_state::table).values(&fresh).on_conflict(sync_state::connector_id).do_nothing().execute(conn)?;
        Ok(sync_state::table.filter(sync_state::connector_id.eq(connector_id)).first::<SyncStateRow>(conn)?)
    })
    .await
}

pub async fn save(pool: &DbPool, row: SyncStateRow) -> Result<(), EngineError> {
    run_blocking(pool, move |conn| {
        diesel::update(sync_state::table.filter(sync_state::connector_id.eq(row.connector_id))).set(&row).execute(conn)?;
        Ok(())
    })
    .await
}
