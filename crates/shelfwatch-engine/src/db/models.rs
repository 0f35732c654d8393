//! Queryable/Insertable row types mirroring `schema.rs`.
//!
//! Enum-typed columns are stored as `Text` on the wire and converted through
//! `shelfwatch_core::models` string enums at the boundary.

use chrono::{DateTime, NaiveDate, Utc};
use diesel::prelude::*;
use serde_json::Value;
use uuid::Uuid;

use shelfwatch_core::models::{
    CommandStatus, ConnectorType, ContentType, EventType, HealthStatus, NotificationChannelType,
    NotificationStatus, PauseReason, RegistryState, SearchType, SweepType,
};

use super::schema::*;

#[derive(Queryable, Identifiable, Debug, Clone)]
#[diesel(table_name = connectors)]
pub struct ConnectorRow {
    pub id: Uuid,
    pub connector_type: String,
    pub name: String,
    pub url: String,
    pub api_key_encrypted: String,
    pub enabled: bool,
    pub health_status: String,
    pub last_sync_at: Option<DateTime<Utc>>,
    pub throttle_profile_id: Option<Uuid>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl ConnectorRow {
    pub fn connector_type(&self) -> Option<ConnectorType> {
        self.connector_type.parse().ok()
    }

    pub fn health_status(&self) -> Option<HealthStatus> {
        self.health_status.parse().ok()
    }
}

#[derive(Insertable, Debug, Clone)]
#[diesel(table_name = connectors)]
pub struct NewConnector {
    pub id: Uuid,
    pub connector_type: String,
    pub name: String,
    pub url: String,
    pub api_key_encrypted: String,
    pub enabled: bool,
    pub health_status: String,
    pub throttle_profile_id: Option<Uuid>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Queryable, Identifiable, Debug, Clone)]
#[diesel(table_name = series)]
pub struct SeriesRow {
    pub id: Uuid,
    pub connector_id: Uuid,
    pub upstream_id: i64,
    pub title: String,
    pub monitored: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Insertable, AsChangeset, Debug, Clone)]
#[diesel(table_name = series)]
pub struct NewSeries {
    pub id: Uuid,
    pub connector_id: Uuid,
    pub upstream_id: i64,
    pub title: String,
    pub monitored: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Queryable, Identifiable, Debug, Clone)]
#[diesel(table_name = episodes)]
pub struct EpisodeRow {
    pub id: Uuid,
    pub connector_id: Uuid,
    pub upstream_id: i64,
    pub series_id: Uuid,
    pub season_number: i32,
    pub episode_number: i32,
    pub has_file: bool,
    pub monitored: bool,
    pub quality_cutoff_not_met: bool,
    pub quality: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Insertable, AsChangeset, Debug, Clone)]
#[diesel(table_name = episodes)]
pub struct NewEpisode {
    pub id: Uuid,
    pub connector_id: Uuid,
    pub upstream_id: i64,
    pub series_id: Uuid,
    pub season_number: i32,
    pub episode_number: i32,
    pub has_file: bool,
    pub monitored: bool,
    pub quality_cutoff_not_met: bool,
    pub quality: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Queryable, Identifiable, Debug, Clone)]
#[diesel(table_name = movies)]
pub struct MovieRow {
    pub id: Uuid,
    pub connector_id: Uuid,
    pub upstream_id: i64,
    pub title: String,
    pub has_file: bool,
    pub monitored: bool,
    pub quality_cutoff_not_met: bool,
    pub quality: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Insertable, AsChangeset, Debug, Clone)]
#[diesel(table_name = movies)]
pub struct NewMovie {
    pub id: Uuid,
    pub connector_id: Uuid,
    pub upstream_id: i64,
    pub title: String,
    pub has_file: bool,
    pub monitored: bool,
    pub quality_cutoff_not_met: bool,
    pub quality: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Queryable, Identifiable, Debug, Clone)]
#[diesel(table_name = search_registry)]
pub struct SearchRegistryRow {
    pub id: Uuid,
    pub connector_id: Uuid,
    pub content_type: String,
    pub content_id: Uuid,
    pub search_type: String,
    pub state: String,
    pub attempt_count: i32,
    pub next_eligible_at: Option<DateTime<Utc>>,
    pub backlog_tier: i32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl SearchRegistryRow {
    pub fn content_type(&self) -> Option<ContentType> {
        self.content_type.parse().ok()
    }

    pub fn search_type(&self) -> Option<SearchType> {
        self.search_type.parse().ok()
    }

    pub fn state(&self) -> Option<RegistryState> {
        self.state.parse().ok()
    }
}

#[derive(Insertable, AsChangeset, Debug, Clone)]
#[diesel(table_name = search_registry)]
pub struct NewSearchRegistry {
    pub id: Uuid,
    pub connector_id: Uuid,
    pub content_type: String,
    pub content_id: Uuid,
    pub search_type: String,
    pub state: String,
    pub attempt_count: i32,
    pub next_eligible_at: Option<DateTime<Utc>>,
    pub backlog_tier: i32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Queryable, Identifiable, Debug, Clone)]
#[diesel(table_name = pending_commands)]
pub struct PendingCommandRow {
    pub id: Uuid,
    pub connector_id: Uuid,
    pub command_id: i64,
    pub content_type: String,
    pub content_id: Uuid,
    pub command_status: String,
    pub dispatched_at: DateTime<Utc>,
}

impl PendingCommandRow {
    pub fn command_status(&self) -> Option<CommandStatus> {
        self.command_status.parse().ok()
    }
}

#[derive(Insertable, Debug, Clone)]
#[diesel(table_name = pending_commands)]
pub struct NewPendingCommand {
    pub id: Uuid,
    pub connector_id: Uuid,
    pub command_id: i64,
    pub content_type: String,
    pub content_id: Uuid,
    pub command_status: String,
    pub dispatched_at: DateTime<Utc>,
}

#[derive(Queryable, Identifiable, Debug, Clone)]
#[diesel(table_name = throttle_profiles)]
pub struct ThrottleProfileRow {
    pub id: Uuid,
    pub name: String,
    pub requests_per_minute: i32,
    pub daily_budget: Option<i32>,
    pub batch_size: i32,
    pub batch_cooldown_seconds: i32,
    pub rate_limit_pause_seconds: i32,
    pub is_default: bool,
}

#[derive(Queryable, Identifiable, Insertable, AsChangeset, Debug, Clone)]
#[diesel(table_name = throttle_state, primary_key(connector_id))]
pub struct ThrottleStateRow {
    pub connector_id: Uuid,
    pub requests_this_minute: i32,
    pub requests_today: i32,
    pub minute_window_start: DateTime<Utc>,
    pub day_window_start: DateTime<Utc>,
    pub paused_until: Option<DateTime<Utc>>,
    pub pause_reason: Option<String>,
    pub last_request_at: Option<DateTime<Utc>>,
}

impl ThrottleStateRow {
    pub fn pause_reason(&self) -> Option<PauseReason> {
        self.pause_reason.as_deref().and_then(|s| s.parse().ok())
    }
}

#[derive(Queryable, Identifiable, Insertable, AsChangeset, Debug, Clone)]
#[diesel(table_name = sync_state, primary_key(connector_id))]
pub struct SyncStateRow {
    pub connector_id: Uuid,
    pub reconnect_attempts: i32,
    pub next_reconnect_at: Option<DateTime<Utc>>,
    pub reconnect_started_at: Option<DateTime<Utc>>,
    pub last_reconnect_error: Option<String>,
    pub reconnect_paused: bool,
}

#[derive(Queryable, Identifiable, Debug, Clone)]
#[diesel(table_name = analytics_events)]
pub struct AnalyticsEventRow {
    pub id: Uuid,
    pub connector_id: Option<Uuid>,
    pub event_type: String,
    pub event_data: Value,
    pub created_at: DateTime<Utc>,
}

impl AnalyticsEventRow {
    pub fn event_type(&self) -> Option<EventType> {
        self.event_type.parse().ok()
    }
}

#[derive(Insertable, Debug, Clone)]
#[diesel(table_name = analytics_events)]
pub struct NewAnalyticsEvent {
    pub id: Uuid,
    pub connector_id: Option<Uuid>,
    pub event_type: String,
    pub event_data: Value,
    pub created_at: DateTime<Utc>,
}

#[derive(Queryable, Identifiable, Insertable, AsChangeset, Debug, Clone)]
#[diesel(table_name = analytics_hourly_stats)]
pub struct AnalyticsHourlyStatsRow {
    pub id: Uuid,
    pub connector_id: Uuid,
    pub hour_bucket: DateTime<Utc>,
    pub searches_dispatched: i32,
    pub searches_succeeded: i32,
    pub searches_failed: i32,
    pub gaps_discovered: i32,
    pub upgrades_discovered: i32,
    pub avg_queue_depth: f64,
}

#[derive(Queryable, Identifiable, Insertable, AsChangeset, Debug, Clone)]
#[diesel(table_name = analytics_daily_stats)]
pub struct AnalyticsDailyStatsRow {
    pub id: Uuid,
    pub connector_id: Uuid,
    pub day_bucket: NaiveDate,
    pub searches_dispatched: i32,
    pub searches_succeeded: i32,
    pub searches_failed: i32,
    pub gaps_discovered: i32,
    pub upgrades_discovered: i32,
    pub peak_queue_depth: i32,
}

#[derive(Queryable, Identifiable, Debug, Clone)]
#[diesel(table_name = notification_channels)]
pub struct NotificationChannelRow {
    pub id: Uuid,
    pub channel_type: String,
    pub config: Value,
    pub sensitive_config_encrypted: Option<String>,
    pub batching_enabled: bool,
    pub batching_window_seconds: i32,
    pub quiet_hours_enabled: bool,
    pub quiet_hours_start: Option<String>,
    pub quiet_hours_end: Option<String>,
    pub quiet_hours_timezone: Option<String>,
}

impl NotificationChannelRow {
    pub fn channel_type(&self) -> Option<NotificationChannelType> {
        self.channel_type.parse().ok()
    }
}

#[derive(Queryable, Identifiable, Debug, Clone)]
#[diesel(table_name = notification_history)]
pub struct NotificationHistoryRow {
    pub id: Uuid,
    pub channel_id: Uuid,
    pub event_type: String,
    pub payload: Value,
    pub status: String,
    pub batch_id: Option<Uuid>,
    pub created_at: DateTime<Utc>,
    pub sent_at: Option<DateTime<Utc>>,
}

impl NotificationHistoryRow {
    pub fn status(&self) -> Option<NotificationStatus> {
        self.status.parse().ok()
    }
}

#[derive(Insertable, AsChangeset, Debug, Clone)]
#[diesel(table_name = notification_history)]
pub struct NewNotificationHistory {
    pub id: Uuid,
    pub channel_id: Uuid,
    pub event_type: String,
    pub payload: Value,
    pub status: String,
    pub batch_id: Option<Uuid>,
    pub created_at: DateTime<Utc>,
    pub sent_at: Option<DateTime<Utc>>,
}

impl NewNotificationHistory {
    pub fn status(&self) -> Option<NotificationStatus> {
        self.status.parse().ok()
    }
}

#[derive(Queryable, Identifiable, AsChangeset, Debug, Clone)]
#[diesel(table_name = schedules)]
pub struct ScheduleRow {
    pub id: Uuid,
    pub name: String,
    pub cron_expression: String,
    pub timezone: String,
    pub sweep_type: String,
    pub connector_id: Option<Uuid>,
    pub enabled: bool,
    pub next_run_at: DateTime<Utc>,
}

impl ScheduleRow {
    pub fn sweep_type(&self) -> Option<SweepType> {
        self.sweep_type.parse().ok()
    }
}
