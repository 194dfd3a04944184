//! Filter on the year a movie was released.

use crate::traits::Filter;
use data_loader::WatchRecord;

/// Keeps records released in exactly the given year.
///
/// Records without a parseable release date are excluded.
pub struct ReleaseYearFilter {
    year: i32,
}

impl ReleaseYearFilter {
    pub fn new(year: i32) -> Self {
        Self { year }
    }
}

impl Filter for ReleaseYearFilter {
    fn name(&self) -> &str {
        "ReleaseYearFilter"
    }

    fn matches(&self, record: &WatchRecord) -> bool {
        record.release_year() == Some(self.year)
    }
}
