//! Ordering for the watch-history view.

use chrono::{DateTime, Utc};
use data_loader::WatchRecord;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;

/// Sort key
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortBy {
    /// When the movie was watched; unknown dates sort as the earliest instant
    #[default]
    Date,
    /// Title, case-insensitive; unknown titles sort as ""
    Title,
    /// Effective rating; unrated sorts as 0
    Rating,
}

impl SortBy {
    /// Parse a sort key, falling back to `Date` for anything unrecognized.
    pub fn parse(value: &str) -> Self {
        match value.trim().to_ascii_lowercase().as_str() {
            "title" => SortBy::Title,
            "rating" => SortBy::Rating,
            _ => SortBy::Date,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortOrder {
    Asc,
    #[default]
    Desc,
}

impl SortOrder {
    /// Parse a sort order, falling back to `Desc` for anything unrecognized.
    pub fn parse(value: &str) -> Self {
        if value.trim().eq_ignore_ascii_case("asc") {
            SortOrder::Asc
        } else {
            SortOrder::Desc
        }
    }

    pub fn toggled(self) -> Self {
        match self {
            SortOrder::Asc => SortOrder::Desc,
            SortOrder::Desc => SortOrder::Asc,
        }
    }
}

/// Return a sorted copy of `records`.
///
/// The sort is stable in both directions: records with equal keys keep
/// their relative input order, also under `Desc` (the comparison is
/// inverted, not the output).
pub fn sort_history(records: &[WatchRecord], sort_by: SortBy, order: SortOrder) -> Vec<WatchRecord> {
    let mut sorted = records.to_vec();
    sorted.sort_by(|a, b| {
        let ordering = compare(a, b, sort_by);
        match order {
            SortOrder::Asc => ordering,
            SortOrder::Desc => ordering.reverse(),
        }
    });
    sorted
}

fn compare(a: &WatchRecord, b: &WatchRecord, sort_by: SortBy) -> Ordering {
    match sort_by {
        SortBy::Date => watched_instant(a).cmp(&watched_instant(b)),
        SortBy::Title => a
            .title_or_empty()
            .to_lowercase()
            .cmp(&b.title_or_empty().to_lowercase()),
        SortBy::Rating => rating_key(a).total_cmp(&rating_key(b)),
    }
}

fn watched_instant(record: &WatchRecord) -> DateTime<Utc> {
    record.watched_at.unwrap_or(DateTime::<Utc>::MIN_UTC)
}

fn rating_key(record: &WatchRecord) -> f32 {
    record.effective_rating().unwrap_or(0.0)
}
