//! Per-connector HTTP facade (§6 "Upstream client operations").

pub mod http;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use shelfwatch_core::error::EngineError;

/// Upstream command kinds accepted by `POST /command`.
#[derive(Debug, Clone, Copy, Serialize)]
#[serde(rename_all = "PascalCase")]
pub enum CommandName {
    EpisodeSearch,
    SeasonSearch,
    MoviesSearch,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SystemStatus {
    pub version: String,
    #[serde(default)]
    pub app_name: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct HealthCheck {
    pub source: String,
    #[serde(rename = "type")]
    pub severity: String,
    pub message: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RemoteSeries {
    pub id: i64,
    pub title: String,
    #[serde(default)]
    pub monitored: bool,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RemoteMovie {
    pub id: i64,
    pub title: String,
    #[serde(default)]
    pub has_file: bool,
    #[serde(default)]
    pub monitored: bool,
    #[serde(default)]
    pub quality_cutoff_not_met: bool,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RemoteEpisode {
    pub id: i64,
    pub series_id: i64,
    pub season_number: i32,
    pub episode_number: i32,
    #[serde(default)]
    pub has_file: bool,
    #[serde(default)]
    pub monitored: bool,
    #[serde(default)]
    pub quality_cutoff_not_met: bool,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CommandDispatchResult {
    pub id: i64,
    pub status: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CommandStatusResult {
    pub id: i64,
    pub status: String,
}

use crate::pagination::Page;

/// Every operation this crate exposes against a configured upstream
/// connector. Implemented once per transport; `http::HttpUpstreamClient` is
/// the only implementation this workspace ships.
#[async_trait]
pub trait UpstreamClient: Send + Sync {
    async fn ping(&self) -> Result<(), EngineError>;
    async fn system_status(&self) -> Result<SystemStatus, EngineError>;
    async fn health(&self) -> Result<Vec<HealthCheck>, EngineError>;
    async fn list_series(&self) -> Result<Vec<RemoteSeries>, EngineError>;
    async fn list_movies(&self) -> Result<Vec<RemoteMovie>, EngineError>;
    async fn list_episodes(&self, series_id: i64) -> Result<Vec<RemoteEpisode>, EngineError>;
    async fn wanted_missing_page(&self, page: u32, page_size: u32) -> Result<Page, EngineError>;
    async fn wanted_cutoff_page(&self, page: u32, page_size: u32) -> Result<Page, EngineError>;
    async fn dispatch_search(&self, name: CommandName, ids: &[i64]) -> Result<CommandDispatchResult, EngineError>;
    async fn command_status(&self, command_id: i64) -> Result<CommandStatusResult, EngineError>;
}
