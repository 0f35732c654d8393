//! The dispatch contract: throttle check, upstream search command, and the
//! registry/pending-command bookkeeping that follows.

use chrono::Utc;
use shelfwatch_connectors::client::{CommandName, UpstreamClient};
use shelfwatch_core::error::EngineError;

use crate::queue::{apply_outcome, BackoffConfig, DispatchOutcome, RegistryEntry};
use crate::throttle::{try_consume, ConsumeDecision, ThrottleProfile, ThrottleState};

pub struct DispatchResult {
    pub outcome: DispatchOutcome,
    pub command_id: Option<i64>,
}

/// Runs one dispatch attempt for `entry` against `client`, honoring the
/// throttle first. Returns `Ok(None)` (no dispatch made, entry untouched)
/// when the throttle denies the attempt.
pub async fn dispatch_one(
    client: &dyn UpstreamClient,
    throttle: &mut ThrottleState,
    profile: &ThrottleProfile,
    entry: &mut RegistryEntry,
    upstream_ids: &[i64],
    backoff: &BackoffConfig,
    max_attempts: i32,
) -> Result<Option<DispatchResult>, EngineError> {
    let now = Utc::now();
    match try_consume(throttle, profile, now) {
        ConsumeDecision::Allowed => {}
        ConsumeDecision::Paused
        | ConsumeDecision::MinuteBudgetExhausted
        | ConsumeDecision::DailyBudgetExhausted => return Ok(None),
    }

    let command_name = command_name_for(entry);
    let outcome = match client.dispatch_search(command_name, upstream_ids).await {
        Ok(result) => DispatchResult { outcome: DispatchOutcome::Success, command_id: Some(result.id) },
        Err(EngineError::RateLimit { .. }) => DispatchResult { outcome: DispatchOutcome::RateLimited, command_id: None },
        Err(EngineError::NoResults { .. }) => DispatchResult { outcome: DispatchOutcome::NoResults, command_id: None },
        Err(_) => DispatchResult { outcome: DispatchOutcome::Failed, command_id: None },
    };

    apply_outcome(entry, outcome.outcome, backoff, max_attempts, now);
    Ok(Some(outcome))
}

fn command_name_for(entry: &RegistryEntry) -> CommandName {
    match entry.content_type {
        shelfwatch_core::models::ContentType::Episode => CommandName::EpisodeSearch,
        shelfwatch_core::models::ContentType::Movie => CommandName::MoviesSearch,
    }
}

/// A registry row is stale once its backing content no longer needs a
/// search: the file has arrived, or the item was unmonitored. Called
/// periodically to drop rows the sync pass has made irrelevant.
pub fn should_resolve(has_file: bool, monitored: bool, quality_cutoff_met: bool, search_type: shelfwatch_core::models::SearchType) -> bool {
    if !monitored {
        return true;
    }
    match search_type {
        shelfwatch_core::models::SearchType::Gap => has_file,
        shelfwatch_core::models::SearchType::Upgrade => quality_cutoff_met,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use shelfwatch_core::models::SearchType;

    #[test]
    fn gap_resolves_once_the_file_exists() {
        assert!(should_resolve(true, true, false, SearchType::Gap));
        assert!(!should_resolve(false, true, false, SearchType::Gap));
    }

    #[test]
    fn upgrade_resolves_once_cutoff_is_met() {
        assert!(should_resolve(false, true, true, SearchType::Upgrade));
        assert!(!should_resolve(false, true, false, SearchType::Upgrade));
    }

    #[test]
    fn unmonitored_content_always_resolves() {
        assert!(should_resolve(false, false, false, SearchType::Gap));
    }
}
