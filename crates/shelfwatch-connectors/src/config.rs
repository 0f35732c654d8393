//! Per-connector HTTP client configuration.

use std::time::Duration;

/// Settings for one `HttpUpstreamClient` instance. The API key is handed in
/// already decrypted by the caller; this crate never touches the stored
/// ciphertext format.
#[derive(Debug, Clone)]
pub struct ConnectorConfig {
    pub connector_id: String,
    pub base_url: String,
    pub api_key: String,
    pub timeout: Duration,
    pub user_agent: String,
}

impl ConnectorConfig {
    pub fn new(connector_id: impl Into<String>, base_url: impl Into<String>, api_key: impl Into<String>) -> Self {
        Self {
            connector_id: connector_id.into(),
            base_url: normalize_base_url(&base_url.into()),
            api_key: api_key.into(),
            timeout: Duration::from_secs(30),
            user_agent: "shelfwatch/1.0".to_string(),
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}

/// Strips trailing slashes so path joins never produce `//v3/...`.
fn normalize_base_url(url: &str) -> String {
    url.trim_end_matches('/').to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strips_trailing_slashes() {
        let cfg = ConnectorConfig::new("sonarr-1", "http://sonarr.local:8989///", "key");
        assert_eq!(cfg.base_url, "http://sonarr.local:8989");
    }

    #[test]
    fn defaults_to_thirty_second_timeout() {
        let cfg = ConnectorConfig::new("sonarr-1", "http://sonarr.local:8989", "key");
        assert_eq!(cfg.timeout, Duration::from_secs(30));
    }
}
