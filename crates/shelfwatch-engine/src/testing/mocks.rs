use mockall::mock;
use shelfwatch_connectors::client::{
    CommandDispatchResult, CommandName, CommandStatusResult, HealthCheck, RemoteEpisode,
    RemoteMovie, RemoteSeries, SystemStatus, UpstreamClient,
};
use shelfwatch_connectors::pagination::Page;
use shelfwatch_core::error::EngineError;

// Generate the mock using mockall
mock! {
    pub UpstreamClient {}

    #[async_trait::async_trait]
    impl UpstreamClient for UpstreamClient {
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
}
