//! Typed, fire-and-forget event emission. Collection never blocks or fails
//! a caller: a send error is logged and dropped.

use chrono::{DateTime, Utc};
use serde_json::Value;
use shelfwatch_core::models::EventType;
use tokio::sync::mpsc::UnboundedSender;
use uuid::Uuid;

#[derive(Debug, Clone)]
pub struct AnalyticsEvent {
    pub connector_id: Option<Uuid>,
    pub event_type: EventType,
    pub data: Value,
    pub occurred_at: DateTime<Utc>,
}

/// Cheap to clone; every call site that wants to emit an event holds one of
/// these rather than a reference to the aggregator itself.
#[derive(Clone)]
pub struct AnalyticsCollector {
    sender: UnboundedSender<AnalyticsEvent>,
}

impl AnalyticsCollector {
    pub fn new(sender: UnboundedSender<AnalyticsEvent>) -> Self {
        Self { sender }
    }

    fn emit(&self, connector_id: Option<Uuid>, event_type: EventType, data: Value) {
        let event = AnalyticsEvent { connector_id, event_type, data, occurred_at: Utc::now() };
        if self.sender.send(event).is_err() {
            tracing::warn!("analytics collector channel closed, dropping event");
        }
    }

    pub fn gap_discovered(&self, connector_id: Uuid, content_id: Uuid) {
        self.emit(Some(connector_id), EventType::GapDiscovered, serde_json::json!({ "contentId": content_id }));
    }

    pub fn upgrade_discovered(&self, connector_id: Uuid, content_id: Uuid) {
        self.emit(Some(connector_id), EventType::UpgradeDiscovered, serde_json::json!({ "contentId": content_id }));
    }

    pub fn search_dispatched(&self, connector_id: Uuid, content_id: Uuid) {
        self.emit(Some(connector_id), EventType::SearchDispatched, serde_json::json!({ "contentId": content_id }));
    }

    pub fn search_completed(&self, connector_id: Uuid, content_id: Uuid) {
        self.emit(Some(connector_id), EventType::SearchCompleted, serde_json::json!({ "contentId": content_id }));
    }

    pub fn search_failed(&self, connector_id: Uuid, content_id: Uuid, reason: &str) {
        self.emit(Some(connector_id), EventType::SearchFailed, serde_json::json!({ "contentId": content_id, "reason": reason }));
    }

    pub fn search_no_results(&self, connector_id: Uuid, content_id: Uuid) {
        self.emit(Some(connector_id), EventType::SearchNoResults, serde_json::json!({ "contentId": content_id }));
    }

    pub fn queue_depth_sampled(&self, connector_id: Uuid, depth_by_state: Value) {
        self.emit(Some(connector_id), EventType::QueueDepthSampled, depth_by_state);
    }

    pub fn sync_completed(&self, connector_id: Uuid, summary: Value) {
        self.emit(Some(connector_id), EventType::SyncCompleted, summary);
    }

    pub fn sync_failed(&self, connector_id: Uuid, reason: &str) {
        self.emit(Some(connector_id), EventType::SyncFailed, serde_json::json!({ "reason": reason }));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn emitted_events_arrive_with_the_right_type() {
        let (tx, mut rx) = tokio::sync::mpsc::unbounded_channel();
        let collector = AnalyticsCollector::new(tx);
        collector.gap_discovered(Uuid::nil(), Uuid::nil());
        let event = rx.recv().await.unwrap();
        assert_eq!(event.event_type, EventType::GapDiscovered);
    }
}
