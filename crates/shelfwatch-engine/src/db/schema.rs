//! Diesel table definitions for every entity in the data model (§3).

diesel::table! {
    connectors (id) {
        id -> Uuid,
        connector_type -> Text,
        name -> Text,
        url -> Text,
        api_key_encrypted -> Text,
        enabled -> Bool,
        health_status -> Text,
        last_sync_at -> Nullable<Timestamptz>,
        throttle_profile_id -> Nullable<Uuid>,
        created_at -> Timestamptz,
        updated_at -> Timestamptz,
    }
}

diesel::table! {
    series (id) {
        id -> Uuid,
        connector_id -> Uuid,
        upstream_id -> BigInt,
        title -> Text,
        monitored -> Bool,
        created_at -> Timestamptz,
        updated_at -> Timestamptz,
    }
}

diesel::table! {
    episodes (id) {
        id -> Uuid,
        connector_id -> Uuid,
        upstream_id -> BigInt,
        series_id -> Uuid,
        season_number -> Int4,
        episode_number -> Int4,
        has_file -> Bool,
        monitored -> Bool,
        quality_cutoff_not_met -> Bool,
        quality -> Nullable<Text>,
        created_at -> Timestamptz,
        updated_at -> Timestamptz,
    }
}

diesel::table! {
    movies (id) {
        id -> Uuid,
        connector_id -> Uuid,
        upstream_id -> BigInt,
        title -> Text,
        has_file -> Bool,
        monitored -> Bool,
        quality_cutoff_not_met -> Bool,
        quality -> Nullable<Text>,
        created_at -> Timestamptz,
        updated_at -> Timestamptz,
    }
}

diesel::table! {
    search_registry (id) {
        id -> Uuid,
        connector_id -> Uuid,
        content_type -> Text,
        content_id -> Uuid,
        search_type -> Text,
        state -> Text,
        attempt_count -> Int4,
        next_eligible_at -> Nullable<Timestamptz>,
        backlog_tier -> Int4,
        created_at -> Timestamptz,
        updated_at -> Timestamptz,
    }
}

diesel::table! {
    pending_commands (id) {
        id -> Uuid,
        connector_id -> Uuid,
        command_id -> BigInt,
        content_type -> Text,
        content_id -> Uuid,
        command_status -> Text,
        dispatched_at -> Timestamptz,
    }
}

diesel::table! {
    throttle_profiles (id) {
        id -> Uuid,
        name -> Text,
        requests_per_minute -> Int4,
        daily_budget -> Nullable<Int4>,
        batch_size -> Int4,
        batch_cooldown_seconds -> Int4,
        rate_limit_pause_seconds -> Int4,
        is_default -> Bool,
    }
}

diesel::table! {
    throttle_state (connector_id) {
        connector_id -> Uuid,
        requests_this_minute -> Int4,
        requests_today -> Int4,
        minute_window_start -> Timestamptz,
        day_window_start -> Timestamptz,
        paused_until -> Nullable<Timestamptz>,
        pause_reason -> Nullable<Text>,
        last_request_at -> Nullable<Timestamptz>,
    }
}

diesel::table! {
    sync_state (connector_id) {
        connector_id -> Uuid,
        reconnect_attempts -> Int4,
        next_reconnect_at -> Nullable<Timestamptz>,
        reconnect_started_at -> Nullable<Timestamptz>,
        last_reconnect_error -> Nullable<Text>,
        reconnect_paused -> Bool,
    }
}

diesel::table! {
    analytics_events (id) {
        id -> Uuid,
        connector_id -> Nullable<Uuid>,
        event_type -> Text,
        event_data -> Jsonb,
        created_at -> Timestamptz,
    }
}

diesel::table! {
    analytics_hourly_stats (id) {
        id -> Uuid,
        connector_id -> Uuid,
        hour_bucket -> Timestamptz,
        searches_dispatched -> Int4,
        searches_succeeded -> Int4,
        searches_failed -> Int4,
        gaps_discovered -> Int4,
        upgrades_discovered -> Int4,
        avg_queue_depth -> Float8,
    }
}

diesel::table! {
    analytics_daily_stats (id) {
        id -> Uuid,
        connector_id -> Uuid,
        day_bucket -> Date,
        searches_dispatched -> Int4,
        searches_succeeded -> Int4,
        searches_failed -> Int4,
        gaps_discovered -> Int4,
        upgrades_discovered -> Int4,
        peak_queue_depth -> Int4,
    }
}

diesel::table! {
    notification_channels (id) {
        id -> Uuid,
        channel_type -> Text,
        config -> Jsonb,
        sensitive_config_encrypted -> Nullable<Text>,
        batching_enabled -> Bool,
        batching_window_seconds -> Int4,
        quiet_hours_enabled -> Bool,
        quiet_hours_start -> Nullable<Text>,
        quiet_hours_end -> Nullable<Text>,
        quiet_hours_timezone -> Nullable<Text>,
    }
}

diesel::table! {
    notification_history (id) {
        id -> Uuid,
        channel_id -> Uuid,
        event_type -> Text,
        payload -> Jsonb,
        status -> Text,
        batch_id -> Nullable<Uuid>,
        created_at -> Timestamptz,
        sent_at -> Nullable<Timestamptz>,
    }
}

diesel::table! {
    schedules (id) {
        id -> Uuid,
        name -> Text,
        cron_expression -> Text,
        timezone -> Text,
        sweep_type -> Text,
        connector_id -> Nullable<Uuid>,
        enabled -> Bool,
        next_run_at -> Timestamptz,
    }
}

diesel::joinable!(series -> connectors (connector_id));
diesel::joinable!(episodes -> connectors (connector_id));
diesel::joinable!(episodes -> series (series_id));
diesel::joinable!(movies -> connectors (connector_id));
diesel::joinable!(search_registry -> connectors (connector_id));
diesel::joinable!(pending_commands -> connectors (connector_id));
diesel::joinable!(throttle_state -> connectors (connector_id));
diesel::joinable!(sync_state -> connectors (connector_id));

diesel::allow_tables_to_appear_in_same_query!(
    connectors,
    series,
    episodes,
    movies,
    search_registry,
    pending_commands,
    throttle_profiles,
    throttle_state,
    sync_state,
    analytics_events,
    analytics_hourly_stats,
    analytics_daily_stats,
    notification_channels,
    notification_history,
    schedules,
);
