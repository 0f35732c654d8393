//! Ambient HTTP surface: `/healthz` and `/metrics` only. The read/write UI
//! surface over connectors, catalogs, and registries is out of scope.

use actix_web::web;

pub mod health;
pub mod metrics;

pub fn init_routes(cfg: &mut web::ServiceConfig) {
    health::configure_health_routes(cfg);
    metrics::configure_routes(cfg);
}
