//! Builds a configured [`UpstreamClient`] for a connector row, resolving its
//! encrypted API key through a [`SecretStore`] first.

use std::sync::Arc;

use shelfwatch_connectors::client::http::HttpUpstreamClient;
use shelfwatch_connectors::client::UpstreamClient;
use shelfwatch_connectors::config::ConnectorConfig;
use shelfwatch_core::crypto::secret::SecretStore;
use shelfwatch_core::error::EngineError;

use crate::db::models::ConnectorRow;

pub fn client_for(row: &ConnectorRow, secret: &SecretStore) -> Result<Arc<dyn UpstreamClient>, EngineError> {
    let api_key = secret.decrypt(&row.api_key_encrypted)?;
    let config = ConnectorConfig::new(row.id.to_string(), row.url.clone(), api_key);
    let client = HttpUpstreamClient::new(config)?;
    Ok(Arc::new(client))
}
