//! Gap and upgrade discovery from mirrored catalog state.

use shelfwatch_core::models::SearchType;
use uuid::Uuid;

/// Minimal view of a mirrored episode/movie row needed to decide whether it
/// needs a gap or upgrade search registered.
#[derive(Debug, Clone, Copy)]
pub struct ContentRef {
    pub id: Uuid,
    pub monitored: bool,
    pub has_file: bool,
    pub quality_cutoff_not_met: bool,
}

#[derive(Debug, Clone, Default)]
pub struct DiscoveryOutcome {
    pub gaps: Vec<Uuid>,
    pub upgrades: Vec<Uuid>,
}

/// A gap is a monitored item with no file at all; an upgrade is a monitored
/// item that has a file but hasn't met its quality cutoff. The two are
/// mutually exclusive for a given item.
pub fn discover_gaps_and_upgrades(items: &[ContentRef]) -> DiscoveryOutcome {
    let mut outcome = DiscoveryOutcome::default();
    for item in items {
        if !item.monitored {
            continue;
        }
        if !item.has_file {
            outcome.gaps.push(item.id);
        } else if item.quality_cutoff_not_met {
            outcome.upgrades.push(item.id);
        }
    }
    outcome
}

pub fn search_type_for(item: &ContentRef) -> Option<SearchType> {
    if !item.monitored {
        return None;
    }
    if !item.has_file {
        Some(SearchType::Gap)
    } else if item.quality_cutoff_not_met {
        Some(SearchType::Upgrade)
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn item(has_file: bool, cutoff_not_met: bool, monitored: bool) -> ContentRef {
        ContentRef { id: Uuid::new_v4(), monitored, has_file, quality_cutoff_not_met: cutoff_not_met }
    }

    #[test]
    fn missing_files_are_gaps() {
        let outcome = discover_gaps_and_upgrades(&[item(false, false, true)]);
        assert_eq!(outcome.gaps.len(), 1);
        assert!(outcome.upgrades.is_empty());
    }

    #[test]
    fn cutoff_not_met_with_a_file_is_an_upgrade() {
        let outcome = discover_gaps_and_upgrades(&[item(true, true, true)]);
        assert!(outcome.gaps.is_empty());
        assert_eq!(outcome.upgrades.len(), 1);
    }

    #[test]
    fn unmonitored_content_is_neither() {
        let outcome = discover_gaps_and_upgrades(&[item(false, true, false)]);
        assert!(outcome.gaps.is_empty());
        assert!(outcome.upgrades.is_empty());
    }
}
