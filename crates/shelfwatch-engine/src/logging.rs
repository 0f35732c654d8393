//! Structured logging setup: JSON output in production, pretty output for
//! `RUST_LOG`-driven local runs. Every scheduled job execution is wrapped in
//! a span carrying its correlation id (see `scheduler::registry::run_guarded`)
//! so a single `grep correlation_id=...` recovers one run's full log trail.

use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Selects the log output shape. `Json` is meant for production (one object
/// per line, ingestible by a log aggregator); `Pretty` is for local dev.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    Json,
    Pretty,
}

impl LogFormat {
    /// `LOG_FORMAT=json` selects JSON; anything else (including unset)
    /// falls back to pretty, matching local-dev-by-default conventions.
    pub fn from_env() -> Self {
        match std::env::var("LOG_FORMAT").ok().as_deref() {
            Some("json") => LogFormat::Json,
            _ => LogFormat::Pretty,
        }
    }
}

/// Initializes the global `tracing` subscriber. Call once at process
/// startup, before any other logging happens. `RUST_LOG` controls the
/// filter (defaults to `info`).
pub fn init() {
    init_with_format(LogFormat::from_env());
}

pub fn init_with_format(format: LogFormat) {
    // Routes `log`-facade output (actix-web's `middleware::Logger` access logs)
    // through the same subscriber instead of being silently dropped.
    let _ = tracing_log::LogTracer::init();

    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let registry = tracing_subscriber::registry().with(env_filter);

    match format {
        LogFormat::Json => {
            let layer = fmt::layer()
                .json()
                .with_target(true)
                .with_current_span(true)
                .with_span_list(true);
            registry.with(layer).init();
        }
        LogFormat::Pretty => {
            let layer = fmt::layer().pretty().with_target(true);
            registry.with(layer).init();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unset_log_format_defaults_to_pretty() {
        std::env::remove_var("LOG_FORMAT");
        assert_eq!(LogFormat::from_env(), LogFormat::Pretty);
    }

    #[test]
    fn log_format_json_is_recognized() {
        std::env::set_var("LOG_FORMAT", "json");
        assert_eq!(LogFormat::from_env(), LogFormat::Json);
        std::env::remove_var("LOG_FORMAT");
    }
}
