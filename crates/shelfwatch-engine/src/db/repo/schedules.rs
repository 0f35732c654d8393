//! `schedules`: configured cron entries backing sweep jobs, distinct from
//! the compiled-in defaults in `scheduler::jobs::built_in_jobs`.

use chrono::{DateTime, Utc};
use diesel::prelude::*;
use shelfwatch_core::error::EngineError;
use uuid::Uuid;

use crate::db::models::ScheduleRow;
use crate::db::schema::schedules;
use crate::db::{run_blocking, DbPool};

pub async fn list_enabled(pool: &DbPool) -> Result<Vec<ScheduleRow>, EngineError> {
    run_blocking(pool, |conn| Ok(schedules::table.filter(schedules::enabled.eq(true)).load::<ScheduleRow>(conn)?)).await
}

pub async fn due(pool: &DbPool, now: DateTime<Utc>) -> Result<Vec<ScheduleRow>, EngineError> {
    run_blocking(pool, move |conn| {
        Ok(schedules::table
            .filter(schedules::enabled.eq(true))
            .filter(schedules::next_run_at.le(now))
            .load::<ScheduleRow>(conn)?)
    })
    .await
}

pub async fn reschedule(pool: &DbPool, id: Uuid, next_run_at: DateTime<Utc>) -> Result<(), EngineError> {
    run_blocking(pool, move |conn| {
        diesel::update(schedules::table.filter(schedules::id.eq(id)))
            .set(schedules::next_run_at.eq(next_run_at))
            .execute(conn)?;
        Ok(())
    })
    .await
}
