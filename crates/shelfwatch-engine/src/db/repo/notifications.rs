//! `notification_channels`, `notification_history`.

use chrono::{DateTime, Utc};
use diesel::prelude::*;
use shelfwatch_core::error::EngineError;
use shelfwatch_core::models::{EventType, NotificationStatus};
use uuid::Uuid;

use crate::db::models::{NewNotificationHistory, NotificationChannelRow, NotificationHistoryRow};
use crate::db::schema::{notification_channels, notification_history};
use crate::db::{run_blocking, DbPool};

pub async fn list_channels(pool: &DbPool) -> Result<Vec<NotificationChannelRow>, EngineError> {
    run_blocking(pool, |conn| Ok(notification_channels::table.load::<NotificationChannelRow>(conn)?)).await
}

pub async fn insert_history(
    pool: &DbPool,
    channel_id: Uuid,
    event_type: EventType,
    payload: serde_json::Value,
    batch_id: Option<Uuid>,
) -> Result<Uuid, EngineError> {
    run_blocking(pool, move |conn| {
        let id = Uuid::new_v4();
        let new_row = NewNotificationHistory {
            id,
            channel_id,
            event_type: event_type.to_string(),
            payload,
            status: NotificationStatus::Pending.to_string(),
            batch_id,
            created_at: Utc::now(),
            sent_at: None,
        };
        diesel::insert_into(notification_history::table).values(&new_row).execute(conn)?;
        Ok(id)
    })
    .await
}

/// Still-`pending` history rows for one channel/event-type pair, the
/// members of whatever batch is currently accumulating.
pub async fn pending_history_for(
    pool: &DbPool,
    channel_id: Uuid,
    event_type: EventType,
) -> Result<Vec<NotificationHistoryRow>, EngineError> {
    run_blocking(pool, move |conn| {
        Ok(notification_history::table
            .filter(notification_history::channel_id.eq(channel_id))
            .filter(notification_history::event_type.eq(event_type.to_string()))
            .filter(notification_history::status.eq(NotificationStatus::Pending.to_string()))
            .order(notification_history::created_at.asc())
            .load::<NotificationHistoryRow>(conn)?)
    })
    .await
}

pub async fn oldest_pending_created_at(
    pool: &DbPool,
    channel_id: Uuid,
    event_type: EventType,
) -> Result<Option<DateTime<Utc>>, EngineError> {
    run_blocking(pool, move |conn| {
        Ok(notification_history::table
            .filter(notification_history::channel_id.eq(channel_id))
            .filter(notification_history::event_type.eq(event_type.to_string()))
            .filter(notification_history::status.eq(NotificationStatus::Pending.to_string()))
            .select(notification_history::created_at)
            .order(notification_history::created_at.asc())
            .first::<DateTime<Utc>>(conn)
            .optional()?)
    })
    .await
}

pub async fn mark_sent(pool: &DbPool, ids: Vec<Uuid>, sent_at: DateTime<Utc>, batch_id: Option<Uuid>) -> Result<usize, EngineError> {
    if ids.is_empty() {
        return Ok(0);
    }
    run_blocking(pool, move |conn| {
        Ok(diesel::update(notification_history::table.filter(notification_history::id.eq_any(&ids)))
            .set((
                notification_history::status.eq(NotificationStatus::Sent.to_string()),
                notification_history::sent_at.eq(sent_at),
                notification_history::batch_id.eq(batch_id),
            ))
            .execute(conn)?)
    })
    .await
}

pub async fn mark_failed(pool: &DbPool, ids: Vec<Uuid>) -> Result<usize, EngineError> {
    if ids.is_empty() {
        return Ok(0);
    }
    run_blocking(pool, move |conn| {
        Ok(diesel::update(notification_history::table.filter(notification_history::id.eq_any(&ids)))
            .set(notification_history::status.eq(NotificationStatus::Failed.to_string()))
            .execute(conn)?)
    })
    .await
}

pub async fn delete_sent_before(pool: &DbPool, cutoff: DateTime<Utc>) -> Result<usize, EngineError> {
    run_blocking(pool, move |conn| {
        Ok(diesel::delete(
            notification_history::table
                .filter(notification_history::status.eq(NotificationStatus::Sent.to_string()))
                .filter(notification_history::created_at.lt(cutoff)),
        )
        .execute(conn)?)
    })
    .await
}
