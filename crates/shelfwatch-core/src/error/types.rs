//! Error taxonomy for the completion engine.
//!
//! All errors raised across the workspace are variants of [`EngineError`].
//! The taxonomy mirrors the wire-error categorization used to classify
//! upstream connector failures: `auth`, `rate_limit`, `not_found`, `server`,
//! `network`, `timeout`, `ssl`, `validation`, `decryption`, `configuration`,
//! `no_results`, `database`, plus serialization and a catch-all `unknown`.

use chrono::{DateTime, Utc};

/// Primary error type for completion-engine operations.
#[derive(Debug, thiserror::Error)]
pub enum EngineError {
    /// Upstream connector rejected the API key (HTTP 401).
    #[error("authentication failed for connector {connector}: {message}")]
    Auth { connector: String, message: String },

    /// Upstream connector returned HTTP 429. `retry_after` carries the
    /// `Retry-After` header value in seconds, when the upstream sent one.
    #[error("rate limited by connector {connector}")]
    RateLimit {
        connector: String,
        retry_after: Option<u64>,
    },

    /// Upstream returned HTTP 404 for a resource expected to exist.
    #[error("not found: {resource}")]
    NotFound { resource: String },

    /// Upstream returned a 5xx status.
    #[error("server error from connector {connector}: status {status_code}")]
    Server { connector: String, status_code: u16 },

    /// Transport-level network failure (DNS, connection refused, reset…).
    #[error("network error contacting connector {connector}: {cause}")]
    Network { connector: String, cause: String },

    /// Request aborted after exceeding its timeout.
    #[error("request to connector {connector} timed out after {elapsed_ms}ms")]
    Timeout { connector: String, elapsed_ms: u64 },

    /// TLS handshake or certificate failure.
    #[error("TLS error contacting connector {connector}: {message}")]
    Ssl { connector: String, message: String },

    /// Input or invariant validation failure.
    #[error("validation error: {message}")]
    Validation { message: String },

    /// AES-GCM decryption of a stored secret failed.
    #[error("failed to decrypt stored secret: {message}")]
    Decryption { message: String },

    /// Process configuration is missing or malformed.
    #[error("configuration error: {message}")]
    Configuration { message: String },

    /// Upstream reported no results for a search. Carried through the same
    /// taxonomy so queue dispatch can classify it alongside failures without
    /// a separate success/failure channel.
    #[error("no results for connector {connector}: {message}")]
    NoResults { connector: String, message: String },

    /// Relational-store operation failure.
    #[error("database error: {message}")]
    Database { message: String },

    /// Failed to serialize a value to JSON.
    #[error("serialization error: {message}")]
    Serialization { message: String },

    /// Failed to deserialize a JSON value into the expected type.
    #[error("deserialization error: {message}")]
    Deserialization { message: String },

    /// Catch-all for conditions outside the taxonomy above.
    #[error("unknown error: {message}")]
    Unknown { message: String },
}

impl EngineError {
    /// Stable category label used for logging fields and metric labels.
    pub fn category(&self) -> &'static str {
        match self {
            EngineError::Auth { .. } => "auth",
            EngineError::RateLimit { .. } => "rate_limit",
            EngineError::NotFound { .. } => "not_found",
            EngineError::Server { .. } => "server",
            EngineError::Network { .. } => "network",
            EngineError::Timeout { .. } => "timeout",
            EngineError::Ssl { .. } => "ssl",
            EngineError::Validation { .. } => "validation",
            EngineError::Decryption { .. } => "decryption",
            EngineError::Configuration { .. } => "configuration",
            EngineError::NoResults { .. } => "no_results",
            EngineError::Database { .. } => "database",
            EngineError::Serialization { .. } => "serialization",
            EngineError::Deserialization { .. } => "deserialization",
            EngineError::Unknown { .. } => "unknown",
        }
    }

    /// Whether this condition is worth retrying per the wire error
    /// categorization.
    pub fn retryable(&self) -> bool {
        matches!(
            self,
            EngineError::RateLimit { .. }
                | EngineError::Server { .. }
                | EngineError::Network { .. }
                | EngineError::Timeout { .. }
                | EngineError::Database { .. }
        )
    }

    /// Timestamp to attach when logging this error. Errors do not carry a
    /// stored timestamp field; this returns the moment of the call so
    /// call sites can stamp structured logs consistently.
    pub fn timestamp(&self) -> DateTime<Utc> {
        Utc::now()
    }

    pub fn validation(message: impl Into<String>) -> Self {
        EngineError::Validation { message: message.into() }
    }

    pub fn configuration(message: impl Into<String>) -> Self {
        EngineError::Configuration { message: message.into() }
    }

    pub fn database(message: impl Into<String>) -> Self {
        EngineError::Database { message: message.into() }
    }

    pub fn unknown(message: impl Into<String>) -> Self {
        EngineError::Unknown { message: message.into() }
    }
}

impl From<diesel::result::Error> for EngineError {
    fn from(error: diesel::result::Error) -> Self {
        EngineError::Database { message: error.to_string() }
    }
}

impl From<serde_json::Error> for EngineError {
    fn from(error: serde_json::Error) -> Self {
        EngineError::Serialization { message: error.to_string() }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn retryable_matches_wire_categorization() {
        assert!(EngineError::RateLimit { connector: "x".into(), retry_after: None }.retryable());
        assert!(EngineError::Network { connector: "x".into(), cause: "reset".into() }.retryable());
        assert!(EngineError::Timeout { connector: "x".into(), elapsed_ms: 1 }.retryable());
        assert!(!EngineError::Auth { connector: "x".into(), message: "bad key".into() }.retryable());
        assert!(!EngineError::Ssl { connector: "x".into(), message: "cert".into() }.retryable());
        assert!(!EngineError::NotFound { resource: "x".into() }.retryable());
    }

    #[test]
    fn category_labels_are_stable() {
        assert_eq!(EngineError::Auth { connector: "x".into(), message: "m".into() }.category(), "auth");
        assert_eq!(EngineError::Unknown { message: "m".into() }.category(), "unknown");
    }
}
