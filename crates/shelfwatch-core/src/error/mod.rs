//! Error handling framework shared by every crate in the workspace.
//!
//! Built around:
//! 1. **Error categorization** — transient vs. permanent vs. user/system/business
//! 2. **Retry policies** — exponential backoff with jitter for transient failures
//! 3. **Circuit breakers** — trip a connector's health state after repeated failures
//! 4. **Error context** — correlation-id-carrying context for structured logs
//! 5. **Recovery strategies** — fallback values for graceful degradation

pub mod types;
pub mod retry;
pub mod circuit_breaker;
pub mod context;
pub mod recovery;

pub use types::EngineError;
pub use retry::{RetryPolicy, RetryableError, retry_with_policy};
pub use circuit_breaker::{CircuitBreaker, CircuitBreakerConfig, CircuitState};
pub use context::{ErrorContext, ErrorContextExt};
pub use recovery::{RecoveryStrategy, FallbackValue, with_fallback, with_fallback_fn};

use serde::{Deserialize, Serialize};

/// Error severity levels for monitoring and alerting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ErrorSeverity {
    Info,
    Warning,
    Error,
    Critical,
}

/// Error categories for classification and handling.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ErrorCategory {
    /// Transient errors that may succeed on retry.
    Transient,
    /// Permanent errors that won't succeed on retry.
    Permanent,
    /// Bad input, validation failures.
    User,
    /// Infrastructure and dependency failures.
    System,
    /// Domain logic errors.
    Business,
}

/// Extended error trait with categorization and correlation metadata.
pub trait ErrorExt: std::error::Error {
    fn category(&self) -> ErrorCategory;
    fn severity(&self) -> ErrorSeverity;

    fn is_retryable(&self) -> bool {
        matches!(self.category(), ErrorCategory::Transient)
    }

    fn error_code(&self) -> &'static str;

    fn correlation_id(&self) -> Option<&str> {
        None
    }
}

/// Metadata attached to an error occurrence for structured logging.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorMetadata {
    pub category: ErrorCategory,
    pub severity: ErrorSeverity,
    pub error_code: String,
    pub correlation_id: Option<String>,
    pub context: std::collections::HashMap<String, serde_json::Value>,
    pub timestamp: chrono::DateTime<chrono::Utc>,
    pub retry_count: u32,
}

impl ErrorMetadata {
    pub fn new(category: ErrorCategory, severity: ErrorSeverity, error_code: String) -> Self {
        Self {
            category,
            severity,
            error_code,
            correlation_id: None,
            context: std::collections::HashMap::new(),
            timestamp: chrono::Utc::now(),
            retry_count: 0,
        }
    }

    pub fn with_context(mut self, key: impl Into<String>, value: impl Serialize) -> Self {
        if let Ok(json_value) = serde_json::to_value(value) {
            self.context.insert(key.into(), json_value);
        }
        self
    }

    pub fn with_correlation_id(mut self, id: impl Into<String>) -> Self {
        self.correlation_id = Some(id.into());
        self
    }
}

/// Result alias used throughout the workspace.
pub type Result<T> = std::result::Result<T, EngineError>;

/// Pluggable strategy for how errors are observed and retried.
pub trait ErrorHandler: Send + Sync {
    fn handle_error(&self, error: &EngineError, metadata: &ErrorMetadata);
    fn should_retry(&self, error: &EngineError, metadata: &ErrorMetadata) -> bool;
    fn retry_delay(&self, error: &EngineError, metadata: &ErrorMetadata) -> Option<std::time::Duration>;
}

/// Default handler: logs via `tracing`, retries transient errors up to 3
/// times with jittered exponential backoff.
pub struct DefaultErrorHandler;

impl ErrorHandler for DefaultErrorHandler {
    fn handle_error(&self, error: &EngineError, metadata: &ErrorMetadata) {
        tracing::error!(
            error = %error,
            category = ?metadata.category,
            severity = ?metadata.severity,
            error_code = %metadata.error_code,
            correlation_id = ?metadata.correlation_id,
            retry_count = metadata.retry_count,
            "error occurred"
        );
    }

    fn should_retry(&self, _error: &EngineError, metadata: &ErrorMetadata) -> bool {
        metadata.category == ErrorCategory::Transient && metadata.retry_count < 3
    }

    fn retry_delay(&self, error: &EngineError, metadata: &ErrorMetadata) -> Option<std::time::Duration> {
        if self.should_retry(error, metadata) {
            let base_delay = 100u64 * (1 << metadata.retry_count);
            let jitter = {
                use rand::Rng;
                rand::thread_rng().gen_range(0..50)
            };
            Some(std::time::Duration::from_millis(base_delay + jitter))
        } else {
            None
        }
    }
}

static ERROR_HANDLER: std::sync::OnceLock<Box<dyn ErrorHandler>> = std::sync::OnceLock::new();

pub fn set_error_handler(handler: Box<dyn ErrorHandler>) {
    ERROR_HANDLER.set(handler).ok();
}

pub fn error_handler() -> &'static dyn ErrorHandler {
    ERROR_HANDLER.get_or_init(|| Box::new(DefaultErrorHandler)).as_ref()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_metadata_builder() {
        let metadata = ErrorMetadata::new(
            ErrorCategory::Transient,
            ErrorSeverity::Warning,
            "TEST_001".to_string(),
        )
        .with_context("connector_id", "12345")
        .with_correlation_id("req-123");

        assert_eq!(metadata.category, ErrorCategory::Transient);
        assert_eq!(metadata.severity, ErrorSeverity::Warning);
        assert_eq!(metadata.error_code, "TEST_001");
        assert_eq!(metadata.correlation_id.as_deref(), Some("req-123"));
        assert!(metadata.context.contains_key("connector_id"));
    }

    #[test]
    fn default_handler_retries_transient() {
        let handler = DefaultErrorHandler;
        let error = EngineError::Network { connector: "sonarr".into(), cause: "reset".into() };
        let metadata = ErrorMetadata::new(ErrorCategory::Transient, ErrorSeverity::Error, "TEST_002".to_string());

        assert!(handler.should_retry(&error, &metadata));
        assert!(handler.retry_delay(&error, &metadata).is_some());
    }
}
