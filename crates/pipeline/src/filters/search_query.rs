//! Free-text search over titles and genre names.

use crate::traits::Filter;
use data_loader::WatchRecord;

/// Keeps records whose title or any genre name contains the query.
///
/// ## Algorithm
/// 1. Lowercase the query once, up front
/// 2. For each record, lowercase title and genres and test for a substring
/// 3. A record without a title can still match on a genre, and vice versa
pub struct SearchQueryFilter {
    query: String,
}

impl SearchQueryFilter {
    pub fn new(query: impl AsRef<str>) -> Self {
        Self {
            query: query.as_ref().to_lowercase(),
        }
    }
}

impl Filter for SearchQueryFilter {
    fn name(&self) -> &str {
        "SearchQueryFilter"
    }

    fn matches(&self, record: &WatchRecord) -> bool {
        let matches_title = record
            .title
            .as_deref()
            .is_some_and(|title| title.to_lowercase().contains(&self.query));

        matches_title
            || record
                .genres
                .iter()
                .any(|genre| genre.to_lowercase().contains(&self.query))
    }
}
