//! Job bodies: the async edge wiring one [`scheduler::jobs::built_in_jobs`]
//! entry to the repository layer, upstream clients, and the pure decision
//! logic in the domain modules. Every function here is the closure body a
//! `tokio-cron-scheduler` job runs, already past the overlap guard.

pub mod analytics_rollup;
pub mod backup;
pub mod connector_health;
pub mod maintenance;
pub mod notifications;
pub mod queue_processor;
pub mod reconnect;
pub mod sync;
pub mod throttle_reset;

use shelfwatch_core::crypto::secret::SecretStore;
use std::sync::Arc;

use crate::analytics::AnalyticsCollector;
use crate::db::DbPool;
use crate::notifications::ChannelSender;

/// Everything a job body needs: the pool, a way to build upstream clients,
/// the analytics sink, and the notification senders keyed by channel type.
#[derive(Clone)]
pub struct JobContext {
    pub pool: Arc<DbPool>,
    pub secrets: Arc<SecretStore>,
    pub analytics: AnalyticsCollector,
    pub notification_sender: Arc<dyn ChannelSender>,
}
