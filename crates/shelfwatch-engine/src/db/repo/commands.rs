//! `pending_commands`: dispatched search commands, polled to completion.

use chrono::{DateTime, Utc};
use diesel::prelude::*;
use shelfwatch_core::error::EngineError;
use shelfwatch_core::models::{CommandStatus, ContentType};
use uuid::Uuid;

use crate::db::models::{NewPendingCommand, PendingCommandRow};
use crate::db::schema::pending_commands;
use crate::db::{run_blocking, DbPool};

pub async fn insert(
    pool: &DbPool,
    connector_id: Uuid,
    command_id: i64,
    content_type: ContentType,
    content_id: Uuid,
) -> Result<(), EngineError> {
    run_blocking(pool, move |conn| {
        let new_row = NewPendingCommand {
            id: Uuid::new_v4(),
            connector_id,
            command_id,
            content_type: content_type.to_string(),
            content_id,
            command_status: CommandStatus::Queued.to_string(),
            dispatched_at: Utc::now(),
        };
        diesel::insert_into(pending_commands::table).values(&new_row).execute(conn)?;
        Ok(())
    })
    .await
}

pub async fn list_open(pool: &DbPool) -> Result<Vec<PendingCommandRow>, EngineError> {
    run_blocking(pool, |conn| {
        Ok(pending_commands::table
            .filter(
                pending_commands::command_status
                    .ne(CommandStatus::Completed.to_string())
                    .and(pending_commands::command_status.ne(CommandStatus::Failed.to_string())),
            )
            .load::<PendingCommandRow>(conn)?)
    })
    .await
}

pub async fn update_status(pool: &DbPool, id: Uuid, status: CommandStatus) -> Result<(), EngineError> {
    run_blocking(pool, move |conn| {
        diesel::update(pending_commands::table.filter(pending_commands::id.eq(id)))
            .set(pending_commands::command_status.eq(status.to_string()))
            .execute(conn)?;
        Ok(())
    })
    .await
}

pub async fn delete_terminal_before(pool: &DbPool, cutoff: DateTime<Utc>) -> Result<usize, EngineError> {
    run_blocking(pool, move |conn| {
        Ok(diesel::delete(
            pending_commands::table
                .filter(
                    pending_commands::command_status
                        .eq(CommandStatus::Completed.to_string())
                        .or(pending_commands::command_status.eq(CommandStatus::Failed.to_string())),
                )
                .filter(pending_commands::dispatched_at.lt(cutoff)),
        )
        .execute(conn)?)
    })
    .await
}
