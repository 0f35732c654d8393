//! Error context utilities: correlation ids, structured metadata, and error
//! chaining for log lines.

use super::{ErrorCategory, ErrorMetadata, ErrorSeverity};
use crate::error::types::EngineError;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use std::collections::HashMap;

/// An error together with its classification and any chained causes.
#[derive(Debug)]
pub struct ErrorContext {
    pub error: EngineError,
    pub metadata: ErrorMetadata,
    pub chain: Vec<String>,
}

impl ErrorContext {
    pub fn new(error: EngineError) -> Self {
        let (category, severity, code) = categorize_error(&error);
        Self {
            error,
            metadata: ErrorMetadata::new(category, severity, code),
            chain: Vec::new(),
        }
    }

    pub fn with_context(mut self, key: impl Into<String>, value: impl Serialize) -> Self {
        if let Ok(json_value) = serde_json::to_value(value) {
            self.metadata.context.insert(key.into(), json_value);
        }
        self
    }

    pub fn with_correlation_id(mut self, id: impl Into<String>) -> Self {
        self.metadata.correlation_id = Some(id.into());
        self
    }

    pub fn with_cause(mut self, cause: impl Into<String>) -> Self {
        self.chain.push(cause.into());
        self
    }

    pub fn to_json(&self) -> Value {
        json!({
            "error": self.error.to_string(),
            "category": self.metadata.category,
            "severity": self.metadata.severity,
            "code": self.metadata.error_code,
            "correlation_id": self.metadata.correlation_id,
            "context": self.metadata.context,
            "chain": self.chain,
            "timestamp": self.metadata.timestamp,
            "retry_count": self.metadata.retry_count,
        })
    }
}

pub trait ErrorContextExt: Sized {
    fn context(self, key: impl Into<String>, value: impl Serialize) -> ErrorContext;
    fn with_correlation_id(self, id: impl Into<String>) -> ErrorContext;
    fn with_contexts(self, contexts: HashMap<String, Value>) -> ErrorContext;
}

impl ErrorContextExt for EngineError {
    fn context(self, key: impl Into<String>, value: impl Serialize) -> ErrorContext {
        ErrorContext::new(self).with_context(key, value)
    }

    fn with_correlation_id(self, id: impl Into<String>) -> ErrorContext {
        ErrorContext::new(self).with_correlation_id(id)
    }

    fn with_contexts(self, contexts: HashMap<String, Value>) -> ErrorContext {
        let mut error_context = ErrorContext::new(self);
        for (key, value) in contexts {
            error_context.metadata.context.insert(key, value);
        }
        error_context
    }
}

/// Maps an error to its category, severity, and a stable log code.
pub fn categorize_error(error: &EngineError) -> (ErrorCategory, ErrorSeverity, String) {
    match error {
        EngineError::Network { .. } => (ErrorCategory::Transient, ErrorSeverity::Error, "NET_001".to_string()),
        EngineError::Timeout { .. } => (ErrorCategory::Transient, ErrorSeverity::Warning, "TIMEOUT_001".to_string()),
        EngineError::RateLimit { .. } => (ErrorCategory::Transient, ErrorSeverity::Warning, "RATE_001".to_string()),
        EngineError::Server { .. } => (ErrorCategory::Transient, ErrorSeverity::Error, "SERVER_001".to_string()),
        EngineError::Database { .. } => (ErrorCategory::Transient, ErrorSeverity::Error, "DB_001".to_string()),

        EngineError::Auth { .. } => (ErrorCategory::Permanent, ErrorSeverity::Critical, "AUTH_001".to_string()),
        EngineError::Ssl { .. } => (ErrorCategory::Permanent, ErrorSeverity::Error, "SSL_001".to_string()),
        EngineError::Decryption { .. } => (ErrorCategory::Permanent, ErrorSeverity::Critical, "DECRYPT_001".to_string()),
        EngineError::Configuration { .. } => {
            (ErrorCategory::Permanent, ErrorSeverity::Critical, "CONFIG_001".to_string())
        }
        EngineError::NotFound { .. } => (ErrorCategory::Permanent, ErrorSeverity::Warning, "NOTFOUND_001".to_string()),

        EngineError::Validation { .. } => (ErrorCategory::User, ErrorSeverity::Warning, "VAL_001".to_string()),

        EngineError::NoResults { .. } => (ErrorCategory::Business, ErrorSeverity::Info, "NORESULTS_001".to_string()),

        EngineError::Serialization { .. } => (ErrorCategory::System, ErrorSeverity::Error, "SER_001".to_string()),
        EngineError::Deserialization { .. } => (ErrorCategory::System, ErrorSeverity::Error, "DESER_001".to_string()),
        EngineError::Unknown { .. } => (ErrorCategory::System, ErrorSeverity::Error, "UNKNOWN_001".to_string()),
    }
}

/// Fluent builder for [`ErrorContext`].
pub struct ErrorContextBuilder {
    error: EngineError,
    context: HashMap<String, Value>,
    correlation_id: Option<String>,
    causes: Vec<String>,
}

impl ErrorContextBuilder {
    pub fn new(error: EngineError) -> Self {
        Self { error, context: HashMap::new(), correlation_id: None, causes: Vec::new() }
    }

    pub fn context(mut self, key: impl Into<String>, value: impl Serialize) -> Self {
        if let Ok(json_value) = serde_json::to_value(value) {
            self.context.insert(key.into(), json_value);
        }
        self
    }

    pub fn correlation_id(mut self, id: impl Into<String>) -> Self {
        self.correlation_id = Some(id.into());
        self
    }

    pub fn cause(mut self, cause: impl Into<String>) -> Self {
        self.causes.push(cause.into());
        self
    }

    pub fn build(self) -> ErrorContext {
        let mut error_context = ErrorContext::new(self.error);
        error_context.metadata.context = self.context;
        error_context.metadata.correlation_id = self.correlation_id;
        error_context.chain = self.causes;
        error_context
    }
}

/// Generates the per-job correlation id carried through a scheduled run's
/// call tree (spec §5).
pub struct CorrelationIdGenerator;

impl CorrelationIdGenerator {
    pub fn generate() -> String {
        use uuid::Uuid;
        format!("job-{}", Uuid::new_v4())
    }

    pub fn generate_with_prefix(prefix: &str) -> String {
        use uuid::Uuid;
        format!("{}-{}", prefix, Uuid::new_v4())
    }
}

pub trait ContextProvider {
    fn extract_context(&self) -> HashMap<String, Value>;
}

/// Context carried through a single scheduled job execution.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JobContext {
    pub correlation_id: String,
    pub job_name: String,
    pub connector_id: Option<String>,
}

impl ContextProvider for JobContext {
    fn extract_context(&self) -> HashMap<String, Value> {
        let mut context = HashMap::new();
        context.insert("correlation_id".to_string(), json!(self.correlation_id));
        context.insert("job_name".to_string(), json!(self.job_name));
        if let Some(ref connector_id) = self.connector_id {
            context.insert("connector_id".to_string(), json!(connector_id));
        }
        context
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_context_builder_collects_fields() {
        let error = EngineError::Database { message: "connection reset".to_string() };

        let context = ErrorContextBuilder::new(error)
            .context("connector_id", "sonarr-1")
            .context("operation", "dispatch_search")
            .correlation_id("job-123")
            .cause("network timeout")
            .build();

        assert_eq!(context.metadata.correlation_id.as_deref(), Some("job-123"));
        assert_eq!(context.chain.len(), 1);
        assert_eq!(context.metadata.context.get("connector_id"), Some(&json!("sonarr-1")));
    }

    #[test]
    fn error_categorization_matches_taxonomy() {
        let transient = EngineError::Server { connector: "radarr".into(), status_code: 503 };
        let (category, _, _) = categorize_error(&transient);
        assert_eq!(category, ErrorCategory::Transient);

        let permanent = EngineError::Decryption { message: "bad key".into() };
        let (category, severity, _) = categorize_error(&permanent);
        assert_eq!(category, ErrorCategory::Permanent);
        assert_eq!(severity, ErrorSeverity::Critical);
    }

    #[test]
    fn job_context_extracts_fields() {
        let ctx = JobContext {
            correlation_id: "job-123".to_string(),
            job_name: "sync.sonarr".to_string(),
            connector_id: Some("sonarr-1".to_string()),
        };

        let extracted = ctx.extract_context();
        assert_eq!(extracted.get("correlation_id"), Some(&json!("job-123")));
        assert_eq!(extracted.get("job_name"), Some(&json!("sync.sonarr")));
        assert_eq!(extracted.get("connector_id"), Some(&json!("sonarr-1")));
    }
}
