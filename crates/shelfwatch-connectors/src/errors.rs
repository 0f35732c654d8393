//! Maps upstream HTTP responses and transport failures onto the shared
//! error taxonomy (§6 "Wire error categorization").

use shelfwatch_core::error::EngineError;

/// Translates a response status code into the matching error kind. Call
/// sites own extracting `Retry-After` and status-code specific messages.
pub fn categorize_status(connector: &str, status: u16, retry_after: Option<u64>, body: String) -> EngineError {
    match status {
        401 | 403 => EngineError::Auth { connector: connector.to_string(), message: body },
        404 => EngineError::NotFound { resource: format!("{connector}: {body}") },
        429 => EngineError::RateLimit { connector: connector.to_string(), retry_after },
        500..=599 => EngineError::Server { connector: connector.to_string(), status_code: status },
        _ => EngineError::Unknown { message: format!("{connector} returned unexpected status {status}: {body}") },
    }
}

/// Translates a `reqwest::Error` (connect/timeout/TLS/decode failure) into
/// the matching error kind.
pub fn categorize_transport(connector: &str, error: &reqwest::Error) -> EngineError {
    if error.is_timeout() {
        return EngineError::Timeout { connector: connector.to_string(), elapsed_ms: 0 };
    }
    if error.is_connect() {
        let cause = if error.to_string().contains("dns") { "dns_failure" } else { "connection_refused" };
        return EngineError::Network { connector: connector.to_string(), cause: cause.to_string() };
    }
    if let Some(source) = error.source_chain_contains_tls() {
        return EngineError::Ssl { connector: connector.to_string(), message: source };
    }
    EngineError::Network { connector: connector.to_string(), cause: error.to_string() }
}

trait TlsSource {
    fn source_chain_contains_tls(&self) -> Option<String>;
}

impl TlsSource for reqwest::Error {
    fn source_chain_contains_tls(&self) -> Option<String> {
        let mut source = std::error::Error::source(self);
        while let Some(err) = source {
            let text = err.to_string();
            if text.to_lowercase().contains("tls") || text.to_lowercase().contains("certificate") {
                return Some(text);
            }
            source = err.source();
        }
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn maps_status_codes_to_expected_kinds() {
        assert!(matches!(categorize_status("sonarr", 401, None, "".into()), EngineError::Auth { .. }));
        assert!(matches!(categorize_status("sonarr", 404, None, "".into()), EngineError::NotFound { .. }));
        assert!(matches!(categorize_status("sonarr", 429, Some(30), "".into()), EngineError::RateLimit { retry_after: Some(30), .. }));
        assert!(matches!(categorize_status("sonarr", 503, None, "".into()), EngineError::Server { status_code: 503, .. }));
    }

    #[test]
    fn non_retryable_kinds_stay_non_retryable() {
        let err = categorize_status("sonarr", 401, None, "bad key".into());
        assert!(!err.retryable());
        let err = categorize_status("sonarr", 429, Some(5), "".into());
        assert!(err.retryable());
    }
}
