//! `GET /metrics` — Prometheus text exposition.

use actix_web::{web, HttpResponse, Result as ActixResult};

use crate::monitoring::metrics::export_metrics;

pub async fn metrics() -> ActixResult<HttpResponse> {
    match export_metrics() {
        Ok(body) => Ok(HttpResponse::Ok().content_type("text/plain; version=0.0.4").body(body)),
        Err(e) => Ok(HttpResponse::InternalServerError().body(format!("failed to render metrics: {e}"))),
    }
}

pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(web::resource("/metrics").route(web::get().to(metrics)));
}
