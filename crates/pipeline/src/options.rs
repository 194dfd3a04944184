//! Dropdown options derived from a watch history.

use data_loader::WatchRecord;
use std::collections::BTreeSet;

/// Distinct release years, newest first.
///
/// Records without a parseable release date are skipped.
pub fn years_present(records: &[WatchRecord]) -> Vec<i32> {
    let years: BTreeSet<i32> = records.iter().filter_map(WatchRecord::release_year).collect();
    years.into_iter().rev().collect()
}

/// Distinct genre names, alphabetical.
pub fn genres_present(records: &[WatchRecord]) -> Vec<String> {
    let genres: BTreeSet<&str> = records
        .iter()
        .flat_map(|r| r.genres.iter().map(String::as_str))
        .collect();
    genres.into_iter().map(str::to_string).collect()
}
