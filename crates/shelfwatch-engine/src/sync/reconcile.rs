//! Incremental sync upserts mirror rows and never deletes; full
//! reconciliation also removes rows the upstream no longer reports.

use shelfwatch_connectors::client::{RemoteMovie, RemoteSeries};
use std::collections::HashSet;

#[derive(Debug, Clone, Default)]
pub struct SeriesDiff {
    pub upsert: Vec<RemoteSeries>,
    /// Upstream ids present locally but absent upstream. Populated only
    /// during full reconciliation; incremental sync leaves this empty.
    pub stale_upstream_ids: Vec<i64>,
}

#[derive(Debug, Clone, Default)]
pub struct MovieDiff {
    pub upsert: Vec<RemoteMovie>,
    pub stale_upstream_ids: Vec<i64>,
}

pub fn diff_series(remote: Vec<RemoteSeries>, known_upstream_ids: &[i64], full_reconciliation: bool) -> SeriesDiff {
    let remote_ids: HashSet<i64> = remote.iter().map(|s| s.id).collect();
    let stale_upstream_ids = if full_reconciliation {
        known_upstream_ids.iter().copied().filter(|id| !remote_ids.contains(id)).collect()
    } else {
        Vec::new()
    };
    SeriesDiff { upsert: remote, stale_upstream_ids }
}

pub fn diff_movies(remote: Vec<RemoteMovie>, known_upstream_ids: &[i64], full_reconciliation: bool) -> MovieDiff {
    let remote_ids: HashSet<i64> = remote.iter().map(|m| m.id).collect();
    let stale_upstream_ids = if full_reconciliation {
        known_upstream_ids.iter().copied().filter(|id| !remote_ids.contains(id)).collect()
    } else {
        Vec::new()
    };
    MovieDiff { upsert: remote, stale_upstream_ids }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn movie(id: i64) -> RemoteMovie {
        RemoteMovie { id, title: format!("movie-{id}"), has_file: false, monitored: true, quality_cutoff_not_met: false }
    }

    #[test]
    fn incremental_sync_never_reports_stale_ids() {
        let diff = diff_movies(vec![movie(1)], &[1, 2, 3], false);
        assert!(diff.stale_upstream_ids.is_empty());
    }

    #[test]
    fn full_reconciliation_finds_ids_the_upstream_dropped() {
        let diff = diff_movies(vec![movie(1)], &[1, 2, 3], true);
        let mut stale = diff.stale_upstream_ids;
        stale.sort();
        assert_eq!(stale, vec![2, 3]);
    }
}
