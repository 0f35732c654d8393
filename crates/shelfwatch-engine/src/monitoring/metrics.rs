//! Prometheus metrics for the completion engine: connector health, throttle
//! consumption, queue depth, search dispatch outcomes, and scheduler job
//! duration. Exposed at `/metrics` via [`export_metrics`].

use lazy_static::lazy_static;
use prometheus::{Encoder, HistogramOpts, HistogramVec, IntCounterVec, IntGaugeVec, Opts, Registry, TextEncoder};

lazy_static! {
    pub static ref REGISTRY: Registry = Registry::new();

    pub static ref CONNECTOR_HEALTH: IntGaugeVec = IntGaugeVec::new(
        Opts::new("connector_health", "Connector health status (0=offline,1=unhealthy,2=degraded,3=healthy,4=unknown)")
            .namespace("shelfwatch"),
        &["connector_id", "connector_type"]
    ).unwrap();

    pub static ref THROTTLE_REQUESTS_TOTAL: IntCounterVec = IntCounterVec::new(
        Opts::new("throttle_requests_total", "Throttle enforcer decisions")
            .namespace("shelfwatch")
            .subsystem("throttle"),
        &["connector_id", "allowed"]
    ).unwrap();

    pub static ref QUEUE_DEPTH: IntGaugeVec = IntGaugeVec::new(
        Opts::new("queue_depth", "Search registry rows by state")
            .namespace("shelfwatch")
            .subsystem("queue"),
        &["connector_id", "state"]
    ).unwrap();

    pub static ref SEARCH_DISPATCH_TOTAL: IntCounterVec = IntCounterVec::new(
        Opts::new("search_dispatch_total", "Search dispatches by outcome")
            .namespace("shelfwatch")
            .subsystem("queue"),
        &["connector_id", "search_type", "outcome"]
    ).unwrap();

    pub static ref SCHEDULER_JOB_DURATION: HistogramVec = HistogramVec::new(
        HistogramOpts::new("scheduler_job_duration_seconds", "Scheduled job execution duration")
            .namespace("shelfwatch")
            .subsystem("scheduler")
            .buckets(vec![0.1, 0.5, 1.0, 5.0, 10.0, 30.0, 60.0, 300.0]),
        &["job_name", "status"]
    ).unwrap();

    pub static ref NOTIFICATIONS_SENT_TOTAL: IntCounterVec = IntCounterVec::new(
        Opts::new("notifications_sent_total", "Notification dispatch outcomes")
            .namespace("shelfwatch")
            .subsystem("notifications"),
        &["channel_type", "status"]
    ).unwrap();
}

/// Registers every metric with the global registry. Call once at startup.
pub fn register_all() -> Result<(), prometheus::Error> {
    REGISTRY.register(Box::new(CONNECTOR_HEALTH.clone()))?;
    REGISTRY.register(Box::new(THROTTLE_REQUESTS_TOTAL.clone()))?;
    REGISTRY.register(Box::new(QUEUE_DEPTH.clone()))?;
    REGISTRY.register(Box::new(SEARCH_DISPATCH_TOTAL.clone()))?;
    REGISTRY.register(Box::new(SCHEDULER_JOB_DURATION.clone()))?;
    REGISTRY.register(Box::new(NOTIFICATIONS_SENT_TOTAL.clone()))?;
    Ok(())
}

/// Renders the registry in Prometheus text exposition format.
pub fn export_metrics() -> Result<String, prometheus::Error> {
    let encoder = TextEncoder::new();
    let metric_families = REGISTRY.gather();
    encoder.encode_to_string(&metric_families)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn registers_without_duplicate_panics() {
        // REGISTRY is process-wide; guard against re-registration across tests.
        let _ = register_all();
        let rendered = export_metrics().unwrap();
        assert!(rendered.is_empty() || rendered.contains("shelfwatch"));
    }
}
