//! Throttle, queue, sync, reconnect, command-monitoring, analytics,
//! maintenance, notification, and scheduling engine driving the
//! library-completion orchestrator.
//!
//! This crate holds the stateful pipeline; [`shelfwatch_core`] holds
//! domain types and crypto/config primitives, and [`shelfwatch_connectors`]
//! holds the upstream HTTP clients. The only externally reachable surface
//! this crate exposes is `GET /healthz` and `GET /metrics` — the
//! read/write UI surface over connectors, catalogs, and registries is
//! deliberately out of scope.

#![cfg_attr(docsrs, feature(doc_cfg))]

pub mod analytics;
pub mod api;
pub mod commands;
pub mod db;
pub mod jobs;
pub mod logging;
pub mod maintenance;
pub mod monitoring;
pub mod notifications;
pub mod queue;
pub mod reconnect;
pub mod scheduler;
pub mod sync;
pub mod throttle;
pub mod upstream;

#[cfg(test)]
pub mod testing;

pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Common imports for call sites wiring pipeline stages together.
pub mod prelude {
    pub use crate::db::{DbConnection, DbPool};
    pub use shelfwatch_core::prelude::*;
    pub use shelfwatch_connectors::prelude::*;
}
