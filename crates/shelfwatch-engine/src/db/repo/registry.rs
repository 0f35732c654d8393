//! `search_registry`: creation on discovery, resolution on sync, and the
//! queue-processor claim/dispatch/re-enqueue cycle.

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use diesel::prelude::*;
use shelfwatch_core::error::EngineError;
use shelfwatch_core::models::{ContentType, RegistryState, SearchType};
use uuid::Uuid;

use crate::db::models::{NewSearchRegistry, SearchRegistryRow};
use crate::db::schema::search_registry;
use crate::db::{run_blocking, DbPool};
use crate::queue::RegistryEntry;

impl SearchRegistryRow {
    pub fn to_entry(&self) -> RegistryEntry {
        RegistryEntry {
            connector_id: self.connector_id,
            content_type: self.content_type().unwrap_or(ContentType::Movie),
            content_id: self.content_id,
            search_type: self.search_type().unwrap_or(SearchType::Gap),
            state: self.state().unwrap_or(RegistryState::Queued),
            attempt_count: self.attempt_count,
            next_eligible_at: self.next_eligible_at,
            backlog_tier: self.backlog_tier as u32,
        }
    }
}

/// Registers a new search need. Idempotent: if a row already exists for
/// this `(connector_id, content_type, content_id, search_type)` key it is
/// left untouched, since discovery re-runs on every sync sweep.
pub async fn create_if_absent(
    pool: &DbPool,
    connector_id: Uuid,
    content_type: ContentType,
    content_id: Uuid,
    search_type: SearchType,
) -> Result<(), EngineError> {
    run_blocking(pool, move |conn| {
        let now = Utc::now();
        let new_row = NewSearchRegistry {
            id: Uuid::new_v4(),
            connector_id,
            content_type: content_type.to_string(),
            content_id,
            search_type: search_type.to_string(),
            state: RegistryState::Pending.to_string(),
            attempt_count: 0,
            next_eligible_at: None,
            backlog_tier: 0,
            created_at: now,
            updated_at: now,
        };
        diesel::insert_into(search_registry::table)
            .values(&new_row)
            .on_conflict((search_registry::connector_id, search_registry::content_type, search_registry::content_id, search_registry::search_type))
            .do_nothing()
            .execute(conn)?;
        Ok(())
    })
    .await
}

/// Drops the registry row once sync/discovery determines the content no
/// longer needs this search (file arrived, cutoff met, or unmonitored).
pub async fn resolve(
    pool: &DbPool,
    connector_id: Uuid,
    content_id: Uuid,
    search_type: SearchType,
) -> Result<usize, EngineError> {
    run_blocking(pool, move |conn| {
        Ok(diesel::delete(
            search_registry::table
                .filter(search_registry::connector_id.eq(connector_id))
                .filter(search_registry::content_id.eq(content_id))
                .filter(search_registry::search_type.eq(search_type.to_string())),
        )
        .execute(conn)?)
    })
    .await
}

/// Moves every `pending` row to `queued`, making it eligible for the next
/// dispatch cycle.
pub async fn enqueue_pending(pool: &DbPool) -> Result<usize, EngineError> {
    run_blocking(pool, |conn| {
        Ok(diesel::update(search_registry::table.filter(search_registry::state.eq(RegistryState::Pending.to_string())))
            .set((search_registry::state.eq(RegistryState::Queued.to_string()), search_registry::updated_at.eq(Utc::now())))
            .execute(conn)?)
    })
    .await
}

/// Moves `cooldown` rows whose backoff has elapsed back to `queued`.
pub async fn reenqueue_eligible_cooldowns(pool: &DbPool, now: DateTime<Utc>) -> Result<usize, EngineError> {
    run_blocking(pool, move |conn| {
        Ok(diesel::update(
            search_registry::table
                .filter(search_registry::state.eq(RegistryState::Cooldown.to_string()))
                .filter(search_registry::next_eligible_at.le(now)),
        )
        .set((
            search_registry::state.eq(RegistryState::Queued.to_string()),
            search_registry::next_eligible_at.eq(None::<DateTime<Utc>>),
            search_registry::updated_at.eq(now),
        ))
        .execute(conn)?)
    })
    .await
}

/// Reverts `searching` rows abandoned by a crashed dispatch back to
/// `queued` so they are retried rather than stuck forever.
pub async fn revert_orphans(pool: &DbPool, threshold_minutes: i64, now: DateTime<Utc>) -> Result<usize, EngineError> {
    run_blocking(pool, move |conn| {
        let cutoff = now - chrono::Duration::minutes(threshold_minutes);
        Ok(diesel::update(
            search_registry::table
                .filter(search_registry::state.eq(RegistryState::Searching.to_string()))
                .filter(search_registry::updated_at.lt(cutoff)),
        )
        .set((search_registry::state.eq(RegistryState::Queued.to_string()), search_registry::updated_at.eq(now)))
        .execute(conn)?)
    })
    .await
}

/// Claims up to `limit` `queued` rows for `connector_id` by flipping them to
/// `searching`, returning the claimed rows as [`RegistryEntry`] values for
/// the dispatch loop. Claiming (rather than a plain `SELECT`) is what makes
/// two overlapping dispatch cycles safe to run concurrently.
pub async fn claim_batch(pool: &DbPool, connector_id: Uuid, limit: i64) -> Result<Vec<RegistryEntry>, EngineError> {
    run_blocking(pool, move |conn| {
        conn.transaction(|conn| {
            let ids: Vec<Uuid> = search_registry::table
                .filter(search_registry::connector_id.eq(connector_id))
                .filter(search_registry::state.eq(RegistryState::Queued.to_string()))
                .select(search_registry::id)
                .order(search_registry::backlog_tier.asc())
                .order(search_registry::created_at.asc())
                .limit(limit)
                .for_update()
                .skip_locked()
                .load::<Uuid>(conn)?;

            if ids.is_empty() {
                return Ok(Vec::new());
            }

            diesel::update(search_registry::table.filter(search_registry::id.eq_any(&ids)))
                .set((search_registry::state.eq(RegistryState::Searching.to_string()), search_registry::updated_at.eq(Utc::now())))
                .execute(conn)?;

            let rows = search_registry::table.filter(search_registry::id.eq_any(&ids)).load::<SearchRegistryRow>(conn)?;
            Ok(rows.iter().map(SearchRegistryRow::to_entry).collect())
        })
    })
    .await
}

/// Persists the post-dispatch state `apply_outcome` computed for one entry.
pub async fn save_entry(pool: &DbPool, entry: &RegistryEntry) -> Result<(), EngineError> {
    let connector_id = entry.connector_id;
    let content_id = entry.content_id;
    let search_type = entry.search_type.to_string();
    let state = entry.state.to_string();
    let attempt_count = entry.attempt_count;
    let next_eligible_at = entry.next_eligible_at;
    let backlog_tier = entry.backlog_tier as i32;
    run_blocking(pool, move |conn| {
        diesel::update(
            search_registry::table
                .filter(search_registry::connector_id.eq(connector_id))
                .filter(search_registry::content_id.eq(content_id))
                .filter(search_registry::search_type.eq(search_type)),
        )
        .set((
            search_registry::state.eq(state),
            search_registry::attempt_count.eq(attempt_count),
            search_registry::next_eligible_at.eq(next_eligible_at),
            search_registry::backlog_tier.eq(backlog_tier),
            search_registry::updated_at.eq(Utc::now()),
        ))
        .execute(conn)?;
        Ok(())
    })
    .await
}

pub async fn count_by_state(pool: &DbPool, connector_id: Uuid) -> Result<HashMap<RegistryState, i64>, EngineError> {
    run_blocking(pool, move |conn| {
        let rows: Vec<(String, i64)> = search_registry::table
            .filter(search_registry::connector_id.eq(connector_id))
            .group_by(search_registry::state)
            .select((search_registry::state, diesel::dsl::count(search_registry::id)))
            .load(conn)?;
        let mut counts = HashMap::new();
        for (state, count) in rows {
            if let Ok(state) = state.parse::<RegistryState>() {
                counts.insert(state, count);
            }
        }
        Ok(counts)
    })
    .await
}

pub async fn list_exhausted(pool: &DbPool) -> Result<Vec<SearchRegistryRow>, EngineError> {
    run_blocking(pool, |conn| {
        Ok(search_registry::table.filter(search_registry::state.eq(RegistryState::Exhausted.to_string())).load(conn)?)
    })
    .await
}

pub async fn recover_row(
    pool: &DbPool,
    id: Uuid,
    state: RegistryState,
    backlog_tier: u32,
    next_eligible_at: DateTime<Utc>,
) -> Result<(), EngineError> {
    run_blocking(pool, move |conn| {
        diesel::update(search_registry::table.filter(search_registry::id.eq(id)))
            .set((
                search_registry::state.eq(state.to_string()),
                search_registry::backlog_tier.eq(backlog_tier as i32),
                search_registry::next_eligible_at.eq(next_eligible_at),
                search_registry::attempt_count.eq(0),
                search_registry::updated_at.eq(Utc::now()),
            ))
            .execute(conn)?;
        Ok(())
    })
    .await
}
