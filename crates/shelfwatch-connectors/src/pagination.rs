//! Lazy paginated sequences over upstream wanted-missing/wanted-cutoff
//! endpoints (§4.2 "Pagination contract", §8 property 4).
//!
//! Each page is validated with a lenient, per-record parser: a single
//! malformed record is logged and skipped rather than aborting the page.
//! One bad record cannot stop a sync.

use serde::de::DeserializeOwned;
use serde_json::Value;

/// Page of raw JSON records as returned by a wanted-missing/wanted-cutoff
/// request, plus whether another page follows.
pub struct Page {
    pub records: Vec<Value>,
    pub has_next: bool,
}

/// Parses every record in `page` with `parse`, skipping (and logging)
/// records that fail to deserialize instead of discarding the whole page.
pub fn parse_lenient<T: DeserializeOwned>(page: &Page, connector: &str) -> Vec<T> {
    page.records
        .iter()
        .filter_map(|record| match serde_json::from_value::<T>(record.clone()) {
            Ok(parsed) => Some(parsed),
            Err(e) => {
                tracing::warn!(connector, error = %e, "skipping malformed record in paginated response");
                None
            }
        })
        .collect()
}

/// Owns `{page, page_size}` cursor state over a paginated upstream
/// endpoint. Restartable from page 1 by constructing a fresh cursor.
pub struct PaginationCursor {
    page: u32,
    page_size: u32,
}

impl PaginationCursor {
    pub fn new(page_size: u32) -> Self {
        Self { page: 1, page_size }
    }

    pub fn current_page(&self) -> u32 {
        self.page
    }

    pub fn page_size(&self) -> u32 {
        self.page_size
    }

    pub fn advance(&mut self) {
        self.page += 1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;
    use serde_json::json;

    #[derive(Debug, Deserialize, PartialEq)]
    struct Record {
        id: u32,
    }

    #[test]
    fn skips_malformed_records_without_dropping_the_page() {
        let page = Page {
            records: vec![json!({"id": 1}), json!({"id": "not-a-number"}), json!({"id": 3})],
            has_next: false,
        };
        let parsed: Vec<Record> = parse_lenient(&page, "sonarr");
        assert_eq!(parsed, vec![Record { id: 1 }, Record { id: 3 }]);
    }

    #[test]
    fn cursor_advances_and_restarts_from_one() {
        let mut cursor = PaginationCursor::new(1000);
        assert_eq!(cursor.current_page(), 1);
        cursor.advance();
        cursor.advance();
        assert_eq!(cursor.current_page(), 3);

        let restarted = PaginationCursor::new(1000);
        assert_eq!(restarted.current_page(), 1);
    }
}
