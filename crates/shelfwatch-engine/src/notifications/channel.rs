//! Channel send interface. Discord, Slack, and generic webhook channels all
//! reduce to an HTTP POST against a configured URL, optionally HMAC-signed;
//! [`WebhookChannelSender`] covers all three. Telegram and email are out of
//! scope for now (see [`ChannelSendOutcome`] callers in `jobs::notifications`).

use async_trait::async_trait;
use reqwest::Client;
use serde_json::Value;
use shelfwatch_core::error::EngineError;
use std::time::{Duration, Instant};

use super::sign_payload;

#[derive(Debug, Clone)]
pub struct ChannelSendOutcome {
    pub success: bool,
    pub error: Option<String>,
    pub duration_ms: u64,
}

#[async_trait]
pub trait ChannelSender: Send + Sync {
    /// `sensitive_config` has already been decrypted just-in-time by the
    /// caller; senders must not persist it beyond this call.
    async fn send(&self, config: &Value, sensitive_config: &Value, payload: &Value) -> Result<ChannelSendOutcome, EngineError>;
}

/// Posts `payload` as JSON to `config["url"]`. If `sensitive_config["hmac_secret"]`
/// is present the body is signed and sent as an `X-Signature` header, the
/// shape every *arr-adjacent webhook consumer (Discord, Slack, a generic
/// receiver) expects.
pub struct WebhookChannelSender {
    http: Client,
}

impl WebhookChannelSender {
    pub fn new() -> Self {
        Self { http: Client::builder().timeout(Duration::from_secs(10)).build().expect("default client config is valid") }
    }
}

impl Default for WebhookChannelSender {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ChannelSender for WebhookChannelSender {
    async fn send(&self, config: &Value, sensitive_config: &Value, payload: &Value) -> Result<ChannelSendOutcome, EngineError> {
        let url = config
            .get("url")
            .and_then(|v| v.as_str())
            .ok_or_else(|| EngineError::Configuration { message: "notification channel config missing url".into() })?;

        let body = serde_json::to_vec(payload)
            .map_err(|e| EngineError::Serialization { message: format!("failed to serialize notification payload: {e}") })?;

        let mut request = self.http.post(url).header("Content-Type", "application/json");
        if let Some(secret) = sensitive_config.get("hmac_secret").and_then(|v| v.as_str()) {
            request = request.header("X-Signature", sign_payload(secret.as_bytes(), &body));
        }

        let start = Instant::now();
        let result = request.body(body).send().await;
        let duration_ms = start.elapsed().as_millis() as u64;

        match result {
            Ok(response) if response.status().is_success() => Ok(ChannelSendOutcome { success: true, error: None, duration_ms }),
            Ok(response) => {
                Ok(ChannelSendOutcome { success: false, error: Some(format!("upstream returned {}", response.status())), duration_ms })
            }
            Err(e) => Ok(ChannelSendOutcome { success: false, error: Some(e.to_string()), duration_ms }),
        }
    }
}
