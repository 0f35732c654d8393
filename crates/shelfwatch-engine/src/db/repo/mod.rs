//! Repository layer: one module per entity family, each a thin
//! `spawn_blocking`-wrapped diesel facade over `db::schema`/`db::models`.
//! Pure decision logic elsewhere in this crate never imports diesel
//! directly; it goes through these functions instead.

pub mod analytics;
pub mod catalog;
pub mod commands;
pub mod connectors;
pub mod notifications;
pub mod registry;
pub mod schedules;
pub mod sync_state;
pub mod throttle;
