//! Turns raw analytics events into queued notifications
//! ([`record_for_channels`], called by the analytics consumer) and the
//! `notification-batch-processor` job that flushes what accumulated.

use chrono::Utc;
use serde_json::Value;
use shelfwatch_core::error::EngineError;
use shelfwatch_core::models::{EventType, NotificationChannelType};
use uuid::Uuid;

use crate::db::models::NotificationChannelRow;
use crate::db::repo::notifications;
use crate::jobs::JobContext;
use crate::notifications::{in_quiet_hours, should_flush_batch, QuietHours};

const ALL_EVENT_TYPES: [EventType; 9] = [
    EventType::GapDiscovered,
    EventType::UpgradeDiscovered,
    EventType::SearchDispatched,
    EventType::SearchCompleted,
    EventType::SearchFailed,
    EventType::SearchNoResults,
    EventType::QueueDepthSampled,
    EventType::SyncCompleted,
    EventType::SyncFailed,
];

/// Whether `channel` wants `event_type`. Channels without a `config.events`
/// array subscribe to everything; one with the array subscribes only to the
/// event types it names.
fn channel_wants(channel: &NotificationChannelRow, event_type: EventType) -> bool {
    match channel.config.get("events").and_then(|v| v.as_array()) {
        Some(events) => events.iter().filter_map(|v| v.as_str()).any(|name| name == event_type.to_string()),
        None => true,
    }
}

/// Queues `event_type` into `notification_history` for every channel
/// subscribed to it. Called from the analytics consumer as events arrive,
/// so a gap/upgrade/failure is queued the moment it's observed rather than
/// waiting for the next scheduler tick.
pub async fn record_for_channels(
    ctx: &JobContext,
    event_type: EventType,
    connector_id: Option<Uuid>,
    data: Value,
) -> Result<(), EngineError> {
    let channels = notifications::list_channels(&ctx.pool).await?;
    let payload = serde_json::json!({ "connectorId": connector_id, "eventType": event_type.to_string(), "data": data });
    for channel in channels {
        if channel_wants(&channel, event_type) {
            notifications::insert_history(&ctx.pool, channel.id, event_type, payload.clone(), None).await?;
        }
    }
    Ok(())
}

fn channel_quiet_hours(channel: &NotificationChannelRow) -> Option<QuietHours> {
    if !channel.quiet_hours_enabled {
        return None;
    }
    let start = channel.quiet_hours_start.as_deref()?.parse().ok()?;
    let end = channel.quiet_hours_end.as_deref()?.parse().ok()?;
    let timezone = channel.quiet_hours_timezone.as_deref().unwrap_or("UTC").parse().ok()?;
    Some(QuietHours { start, end, timezone })
}

fn decrypt_sensitive_config(ctx: &JobContext, channel: &NotificationChannelRow) -> Value {
    let Some(encrypted) = &channel.sensitive_config_encrypted else { return Value::Null };
    match ctx.secrets.decrypt(encrypted) {
        Ok(plaintext) => serde_json::from_str(&plaintext).unwrap_or(Value::Null),
        Err(e) => {
            tracing::warn!(channel_id = %channel.id, error = %e, "failed to decrypt notification channel config");
            Value::Null
        }
    }
}

#[derive(Debug, Default)]
pub struct NotificationBatchReport {
    pub channels_flushed: usize,
    pub notifications_sent: usize,
    pub notifications_failed: usize,
}

/// One flush pass: every channel/event-type pair with pending history rows
/// is checked against its batching window and quiet hours, then sent as one
/// payload per pair.
pub async fn run(ctx: &JobContext) -> Result<NotificationBatchReport, EngineError> {
    let now = Utc::now();
    let mut report = NotificationBatchReport::default();
    let channels = notifications::list_channels(&ctx.pool).await?;

    for channel in channels {
        if channel.channel_type() != Some(NotificationChannelType::Webhook)
            && channel.channel_type() != Some(NotificationChannelType::Discord)
            && channel.channel_type() != Some(NotificationChannelType::Slack)
        {
            // Telegram/email have no sender implementation yet; leave their
            // history pending rather than silently dropping it.
            continue;
        }

        if let Some(quiet) = channel_quiet_hours(&channel) {
            if in_quiet_hours(&quiet, now) {
                continue;
            }
        }

        for event_type in ALL_EVENT_TYPES {
            let oldest = notifications::oldest_pending_created_at(&ctx.pool, channel.id, event_type).await?;
            let Some(oldest) = oldest else { continue };

            let window_seconds = if channel.batching_enabled { channel.batching_window_seconds } else { 0 };
            if !should_flush_batch(oldest, window_seconds, now) {
                continue;
            }

            let pending = notifications::pending_history_for(&ctx.pool, channel.id, event_type).await?;
            if pending.is_empty() {
                continue;
            }

            let batch_id = Uuid::new_v4();
            let payload = serde_json::json!({
                "channelId": channel.id,
                "eventType": event_type.to_string(),
                "batchId": batch_id,
                "events": pending.iter().map(|h| &h.payload).collect::<Vec<_>>(),
            });

            let sensitive_config = decrypt_sensitive_config(ctx, &channel);
            let ids: Vec<Uuid> = pending.iter().map(|h| h.id).collect();
            let sent_count = ids.len();
            match ctx.notification_sender.send(&channel.config, &sensitive_config, &payload).await {
                Ok(outcome) if outcome.success => {
                    notifications::mark_sent(&ctx.pool, ids, now, Some(batch_id)).await?;
                    report.notifications_sent += sent_count;
                }
                Ok(outcome) => {
                    tracing::warn!(channel_id = %channel.id, error = ?outcome.error, "notification send rejected");
                    notifications::mark_failed(&ctx.pool, ids).await?;
                    report.notifications_failed += 1;
                }
                Err(e) => {
                    tracing::error!(channel_id = %channel.id, error = %e, "notification send errored");
                    notifications::mark_failed(&ctx.pool, ids).await?;
                    report.notifications_failed += 1;
                }
            }
            report.channels_flushed += 1;
        }
    }

    Ok(report)
}
