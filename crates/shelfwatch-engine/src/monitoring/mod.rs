//! Prometheus metrics surfaced at `GET /metrics`.

pub mod metrics;
