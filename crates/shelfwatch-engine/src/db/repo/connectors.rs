//! Connector rows and their assigned throttle profile.

use chrono::{DateTime, Utc};
use diesel::prelude::*;
use shelfwatch_core::error::EngineError;
use shelfwatch_core::models::HealthStatus;
use uuid::Uuid;

use crate::db::models::{ConnectorRow, ThrottleProfileRow};
use crate::db::schema::{connectors, throttle_profiles};
use crate::db::{run_blocking, DbPool};
use crate::throttle::ThrottleProfile;

impl ThrottleProfileRow {
    pub fn to_logic(&self) -> ThrottleProfile {
        ThrottleProfile {
            name: self.name.clone(),
            requests_per_minute: self.requests_per_minute,
            daily_budget: self.daily_budget,
            batch_size: self.batch_size,
            batch_cooldown_seconds: self.batch_cooldown_seconds,
            rate_limit_pause_seconds: self.rate_limit_pause_seconds,
        }
    }
}

pub async fn list_enabled(pool: &DbPool) -> Result<Vec<ConnectorRow>, EngineError> {
    run_blocking(pool, |conn| {
        Ok(connectors::table.filter(connectors::enabled.eq(true)).load::<ConnectorRow>(conn)?)
    })
    .await
}

pub async fn list_all(pool: &DbPool) -> Result<Vec<ConnectorRow>, EngineError> {
    run_blocking(pool, |conn| Ok(connectors::table.load::<ConnectorRow>(conn)?)).await
}

pub async fn get(pool: &DbPool, id: Uuid) -> Result<Option<ConnectorRow>, EngineError> {
    run_blocking(pool, move |conn| {
        Ok(connectors::table.filter(connectors::id.eq(id)).first::<ConnectorRow>(conn).optional()?)
    })
    .await
}

pub async fn update_health(
    pool: &DbPool,
    id: Uuid,
    status: HealthStatus,
    last_sync_at: Option<DateTime<Utc>>,
) -> Result<(), EngineError> {
    run_blocking(pool, move |conn| {
        let now = Utc::now();
        match last_sync_at {
            Some(last_sync_at) => {
                diesel::update(connectors::table.filter(connectors::id.eq(id)))
                    .set((
                        connectors::health_status.eq(status.to_string()),
                        connectors::updated_at.eq(now),
                        connectors::last_sync_at.eq(last_sync_at),
                    ))
                    .execute(conn)?;
            }
            None => {
                diesel::update(connectors::table.filter(connectors::id.eq(id)))
                    .set((connectors::health_status.eq(status.to_string()), connectors::updated_at.eq(now)))
                    .execute(conn)?;
            }
        }
        Ok(())
    })
    .await
}

pub async fn get_throttle_profile(pool: &DbPool, id: Uuid) -> Result<Option<ThrottleProfileRow>, EngineError> {
    run_blocking(pool, move |conn| {
        Ok(throttle_profiles::table.filter(throttle_profiles::id.eq(id)).first::<ThrottleProfileRow>(conn).optional()?)
    })
    .await
}

pub async fn get_default_throttle_profile(pool: &DbPool) -> Result<Option<ThrottleProfileRow>, EngineError> {
    run_blocking(pool, |conn| {
        Ok(throttle_profiles::table
            .filter(throttle_profiles::is_default.eq(true))
            .first::<ThrottleProfileRow>(conn)
            .optional()?)
    })
    .await
}
