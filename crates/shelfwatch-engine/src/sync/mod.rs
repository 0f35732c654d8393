//! Catalog mirroring and gap/upgrade discovery.

mod discovery;
mod reconcile;

pub use discovery::{discover_gaps_and_upgrades, search_type_for, ContentRef, DiscoveryOutcome};
pub use reconcile::{diff_movies, diff_series, MovieDiff, SeriesDiff};

use chrono::{DateTime, Utc};
use serde::Serialize;

/// Result of a single sync pass, whether incremental or full.
#[derive(Debug, Clone, Serialize, Default)]
pub struct SyncSummary {
    pub items_synced: u64,
    pub gaps_found: u64,
    pub upgrades_found: u64,
    pub registries_created: u64,
    pub registries_resolved: u64,
    pub duration_ms: u64,
}

impl SyncSummary {
    pub fn timed(start: DateTime<Utc>) -> Self {
        let elapsed = (Utc::now() - start).num_milliseconds().max(0) as u64;
        Self { duration_ms: elapsed, ..Default::default() }
    }
}
