//! Reqwest-backed implementation of [`UpstreamClient`], generalized from a
//! stateless request/response HTTP facade into one aimed at the *arr v3
//! REST surface (§6).

use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde_json::json;
use shelfwatch_core::error::retry::{retry_with_policy, RetryPolicy};
use shelfwatch_core::error::EngineError;

use crate::client::{
    CommandDispatchResult, CommandName, CommandStatusResult, HealthCheck, RemoteEpisode, RemoteMovie, RemoteSeries,
    SystemStatus, UpstreamClient,
};
use crate::config::ConnectorConfig;
use crate::errors::{categorize_status, categorize_transport};
use crate::pagination::Page;

/// HTTP client for one configured upstream *arr server.
///
/// Each call is a single stateless request/response round trip, retried
/// per the connector retry policy; the client itself holds no session
/// state beyond the underlying connection pool `reqwest::Client` keeps.
pub struct HttpUpstreamClient {
    http: Client,
    config: ConnectorConfig,
    retry_policy: RetryPolicy,
}

impl HttpUpstreamClient {
    pub fn new(config: ConnectorConfig) -> Result<Self, EngineError> {
        let http = Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| EngineError::Configuration { message: format!("failed to build http client: {e}") })?;

        Ok(Self { http, config, retry_policy: RetryPolicy::default() })
    }

    fn url(&self, path: &str) -> String {
        format!("{}/api/v3{}", self.config.base_url, path)
    }

    /// `/ping` sits outside the `v3` prefix.
    fn ping_url(&self) -> String {
        format!("{}/ping", self.config.base_url)
    }

    async fn get_json<T: serde::de::DeserializeOwned>(&self, path: &str, query: &[(&str, String)]) -> Result<T, EngineError> {
        retry_with_policy(&self.retry_policy, || async {
            let response = self
                .http
                .get(self.url(path))
                .header("X-Api-Key", &self.config.api_key)
                .header("User-Agent", &self.config.user_agent)
                .header("Accept", "application/json")
                .query(query)
                .send()
                .await
                .map_err(|e| categorize_transport(&self.config.connector_id, &e))?;

            self.handle_response(response).await
        })
        .await
    }

    async fn handle_response<T: serde::de::DeserializeOwned>(&self, response: reqwest::Response) -> Result<T, EngineError> {
        let status = response.status();
        if status.is_success() {
            let body = response.text().await.map_err(|e| categorize_transport(&self.config.connector_id, &e))?;
            return serde_json::from_str(&body)
                .map_err(|e| EngineError::Deserialization { message: format!("{}: {e}", self.config.connector_id) });
        }

        let retry_after = response
            .headers()
            .get("retry-after")
            .and_then(|v| v.to_str().ok())
            .and_then(|v| v.parse::<u64>().ok());
        let body = response.text().await.unwrap_or_default();
        Err(categorize_status(&self.config.connector_id, status.as_u16(), retry_after, body))
    }

    async fn raw_page(&self, path: &str, page: u32, page_size: u32) -> Result<Page, EngineError> {
        let response = retry_with_policy(&self.retry_policy, || async {
            self.http
                .get(self.url(path))
                .header("X-Api-Key", &self.config.api_key)
                .header("User-Agent", &self.config.user_agent)
                .header("Accept", "application/json")
                .query(&[("page", page.to_string()), ("pageSize", page_size.to_string())])
                .send()
                .await
                .map_err(|e| categorize_transport(&self.config.connector_id, &e))
        })
        .await?;

        let status = response.status();
        if status != StatusCode::OK {
            let body = response.text().await.unwrap_or_default();
            return Err(categorize_status(&self.config.connector_id, status.as_u16(), None, body));
        }

        let body: serde_json::Value = response
            .json()
            .await
            .map_err(|e| categorize_transport(&self.config.connector_id, &e))?;

        let records = body
            .get("records")
            .and_then(|r| r.as_array())
            .cloned()
            .unwrap_or_default();
        let total = body.get("totalRecords").and_then(|t| t.as_i64()).unwrap_or(records.len() as i64);
        let has_next = (page as i64) * (page_size as i64) < total;

        Ok(Page { records, has_next })
    }
}

#[async_trait]
impl UpstreamClient for HttpUpstreamClient {
    async fn ping(&self) -> Result<(), EngineError> {
        retry_with_policy(&self.retry_policy, || async {
            let response = self
                .http
                .get(self.ping_url())
                .header("X-Api-Key", &self.config.api_key)
                .header("User-Agent", &self.config.user_agent)
                .header("Accept", "application/json")
                .send()
                .await
                .map_err(|e| categorize_transport(&self.config.connector_id, &e))?;

            self.handle_response::<serde_json::Value>(response).await.map(|_| ())
        })
        .await
    }

    async fn system_status(&self) -> Result<SystemStatus, EngineError> {
        self.get_json("/system/status", &[]).await
    }

    async fn health(&self) -> Result<Vec<HealthCheck>, EngineError> {
        self.get_json("/health", &[]).await
    }

    async fn list_series(&self) -> Result<Vec<RemoteSeries>, EngineError> {
        self.get_json("/series", &[]).await
    }

    async fn list_movies(&self) -> Result<Vec<RemoteMovie>, EngineError> {
        self.get_json("/movie", &[]).await
    }

    async fn list_episodes(&self, series_id: i64) -> Result<Vec<RemoteEpisode>, EngineError> {
        self.get_json("/episode", &[("seriesId", series_id.to_string())]).await
    }

    async fn wanted_missing_page(&self, page: u32, page_size: u32) -> Result<Page, EngineError> {
        self.raw_page("/wanted/missing", page, page_size).await
    }

    async fn wanted_cutoff_page(&self, page: u32, page_size: u32) -> Result<Page, EngineError> {
        self.raw_page("/wanted/cutoff", page, page_size).await
    }

    async fn dispatch_search(&self, name: CommandName, ids: &[i64]) -> Result<CommandDispatchResult, EngineError> {
        let payload = json!({ "name": name, "ids": ids });
        retry_with_policy(&self.retry_policy, || async {
            let response = self
                .http
                .post(self.url("/command"))
                .header("X-Api-Key", &self.config.api_key)
                .header("User-Agent", &self.config.user_agent)
                .header("Accept", "application/json")
                .json(&payload)
                .send()
                .await
                .map_err(|e| categorize_transport(&self.config.connector_id, &e))?;

            self.handle_response(response).await
        })
        .await
    }

    async fn command_status(&self, command_id: i64) -> Result<CommandStatusResult, EngineError> {
        self.get_json(&format!("/command/{command_id}"), &[]).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_config() -> ConnectorConfig {
        ConnectorConfig::new("sonarr-1", "http://localhost:8989", "test-key")
    }

    #[test]
    fn builds_versioned_urls() {
        let client = HttpUpstreamClient::new(test_config()).unwrap();
        assert_eq!(client.url("/series"), "http://localhost:8989/api/v3/series");
    }
}
