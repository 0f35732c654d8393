//! Shared domain enums used across the engine (§3). Stored as text columns
//! by the persistence layer; this crate only owns their Rust representation
//! and string conversions.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::EngineError;

macro_rules! string_enum {
    ($name:ident { $($variant:ident => $text:literal),+ $(,)? }) => {
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
        #[serde(rename_all = "camelCase")]
        pub enum $name {
            $($variant),+
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                let s = match self {
                    $(Self::$variant => $text),+
                };
                write!(f, "{}", s)
            }
        }

        impl FromStr for $name {
            type Err = EngineError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                match s {
                    $($text => Ok(Self::$variant),)+
                    other => Err(EngineError::Validation {
                        message: format!(concat!("unknown ", stringify!($name), " value: {}"), other),
                    }),
                }
            }
        }
    };
}

string_enum!(ConnectorType {
    SeriesServer => "seriesServer",
    MovieServer => "movieServer",
    AdultMovieServer => "adultMovieServer",
});

string_enum!(HealthStatus {
    Healthy => "healthy",
    Degraded => "degraded",
    Unhealthy => "unhealthy",
    Offline => "offline",
    Unknown => "unknown",
});

string_enum!(ContentType {
    Episode => "episode",
    Movie => "movie",
});

string_enum!(SearchType {
    Gap => "gap",
    Upgrade => "upgrade",
});

string_enum!(RegistryState {
    Pending => "pending",
    Queued => "queued",
    Searching => "searching",
    Cooldown => "cooldown",
    Exhausted => "exhausted",
});

string_enum!(CommandStatus {
    Queued => "queued",
    Started => "started",
    Completed => "completed",
    Failed => "failed",
});

string_enum!(PauseReason {
    RateLimit => "rateLimit",
    DailyBudgetExhausted => "dailyBudgetExhausted",
    Manual => "manual",
});

string_enum!(EventType {
    GapDiscovered => "gapDiscovered",
    UpgradeDiscovered => "upgradeDiscovered",
    SearchDispatched => "searchDispatched",
    SearchCompleted => "searchCompleted",
    SearchFailed => "searchFailed",
    SearchNoResults => "searchNoResults",
    QueueDepthSampled => "queueDepthSampled",
    SyncCompleted => "syncCompleted",
    SyncFailed => "syncFailed",
});

string_enum!(NotificationChannelType {
    Discord => "discord",
    Telegram => "telegram",
    Slack => "slack",
    Email => "email",
    Webhook => "webhook",
});

string_enum!(NotificationStatus {
    Pending => "pending",
    Sent => "sent",
    Failed => "failed",
    Batched => "batched",
});

string_enum!(SweepType {
    Incremental => "incremental",
    FullReconciliation => "fullReconciliation",
});

/// Tiered backlog recovery delay index. `0` is the initial tier; each
/// exhaustion without resolution advances the tier up to a configured cap.
pub type BacklogTier = u32;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn round_trips_through_display_and_from_str() {
        for variant in [HealthStatus::Healthy, HealthStatus::Degraded, HealthStatus::Unhealthy, HealthStatus::Offline, HealthStatus::Unknown] {
            let text = variant.to_string();
            assert_eq!(HealthStatus::from_str(&text).unwrap(), variant);
        }
    }

    #[test]
    fn rejects_unknown_value() {
        assert!(ConnectorType::from_str("not-a-type").is_err());
    }

    #[test]
    fn serializes_as_camel_case() {
        let json = serde_json::to_string(&SearchType::Gap).unwrap();
        assert_eq!(json, "\"gap\"");
    }
}
