//! Filter to keep only movies tagged with one genre.

use crate::traits::Filter;
use data_loader::WatchRecord;

/// Keeps records whose genre list contains the genre exactly.
///
/// Matching is case-sensitive: the value comes from the genre dropdown,
/// which is built from the same genre names (see `genres_present`).
pub struct GenreFilter {
    genre: String,
}

impl GenreFilter {
    pub fn new(genre: impl Into<String>) -> Self {
        Self {
            genre: genre.into(),
        }
    }
}

impl Filter for GenreFilter {
    fn name(&self) -> &str {
        "GenreFilter"
    }

    fn matches(&self, record: &WatchRecord) -> bool {
        record.genres.iter().any(|g| *g == self.genre)
    }
}
