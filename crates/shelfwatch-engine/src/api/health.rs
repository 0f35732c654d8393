//! `GET /healthz` — process liveness plus a database round trip. This is
//! the entire externally-reachable surface this crate exposes; everything
//! else named in spec.md §1's reading surface is out of scope.

use actix_web::{web, HttpResponse, Result};
use chrono::Utc;
use serde::Serialize;

use crate::db::pool::DbPool;

#[derive(Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub timestamp: String,
    pub version: String,
    pub database: DatabaseHealth,
}

#[derive(Serialize)]
pub struct DatabaseHealth {
    pub status: String,
    pub pool_size: u32,
    pub idle_connections: u32,
}

pub async fn health_check(pool: web::Data<DbPool>) -> Result<HttpResponse> {
    let database = check_database(&pool);
    let status = if database.status == "healthy" { "healthy" } else { "degraded" };

    Ok(HttpResponse::Ok().json(HealthResponse {
        status: status.to_string(),
        timestamp: Utc::now().to_rfc3339(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        database,
    }))
}

fn check_database(pool: &DbPool) -> DatabaseHealth {
    use diesel::prelude::*;

    match pool.get() {
        Ok(mut conn) => match diesel::sql_query("SELECT 1").execute(&mut conn) {
            Ok(_) => DatabaseHealth {
                status: "healthy".to_string(),
                pool_size: pool.state().connections,
                idle_connections: pool.state().idle_connections,
            },
            Err(_) => DatabaseHealth { status: "unhealthy".to_string(), pool_size: pool.state().connections, idle_connections: 0 },
        },
        Err(_) => DatabaseHealth { status: "unhealthy".to_string(), pool_size: 0, idle_connections: 0 },
    }
}

pub fn configure_health_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(web::resource("/healthz").route(web::get().to(health_check)));
}
