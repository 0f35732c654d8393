//! # shelfwatch-connectors
//!
//! Per-connector HTTP facade for upstream *arr-family media-management
//! servers: `ping`, `systemStatus`, `health`, catalog listing, paginated
//! wanted-missing/wanted-cutoff, search dispatch, and command polling
//! (§6). Wire errors are classified onto the shared taxonomy and retried
//! per the connector retry policy.
//!
//! ## Examples
//!
//! ```rust
//! use shelfwatch_connectors::client::http::HttpUpstreamClient;
//! use shelfwatch_connectors::config::ConnectorConfig;
//!
//! # fn build() -> Result<(), Box<dyn std::error::Error>> {
//! let config = ConnectorConfig::new("sonarr-1", "http://sonarr.local:8989", "api-key");
//! let client = HttpUpstreamClient::new(config)?;
//! # let _ = client;
//! # Ok(())
//! # }
//! ```

pub mod client;
pub mod config;
pub mod errors;
pub mod pagination;

pub use client::http::HttpUpstreamClient;
pub use client::UpstreamClient;
pub use config::ConnectorConfig;

/// Current version of shelfwatch-connectors.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

pub mod prelude {
    pub use crate::client::{CommandName, UpstreamClient};
    pub use crate::config::ConnectorConfig;
    pub use crate::pagination::{Page, PaginationCursor};
    pub use shelfwatch_core::prelude::*;
}
