//! Batching: notifications for the same channel and event type within a
//! window are folded into one outbound payload.

use chrono::{DateTime, Utc};
use shelfwatch_core::models::EventType;
use uuid::Uuid;

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct BatchKey {
    pub channel_id: Uuid,
    pub event_type: EventType,
}

pub fn batch_key(channel_id: Uuid, event_type: EventType) -> BatchKey {
    BatchKey { channel_id, event_type }
}

/// A batch flushes once its window has elapsed since the first
/// still-pending notification was queued into it.
pub fn should_flush_batch(window_started_at: DateTime<Utc>, window_seconds: i32, now: DateTime<Utc>) -> bool {
    now - window_started_at >= chrono::Duration::seconds(window_seconds as i64)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn flushes_once_the_window_elapses() {
        let start = Utc::now();
        assert!(!should_flush_batch(start, 60, start + chrono::Duration::seconds(30)));
        assert!(should_flush_batch(start, 60, start + chrono::Duration::seconds(61)));
    }
}
