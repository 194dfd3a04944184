//! Filter criteria for the watch-history view.
//!
//! `HistoryFilter` is what the history screen's search box and dropdowns
//! produce. Each active criterion becomes one `Filter` in a
//! `FilterPipeline`; inactive criteria add nothing.

use crate::filter_pipeline::FilterPipeline;
use crate::filters::{GenreFilter, MinimumRatingFilter, ReleaseYearFilter, SearchQueryFilter};
use data_loader::{WatchRecord, parse_year};
use serde::{Deserialize, Serialize};

/// Dropdown value meaning "don't filter on this"
pub const ALL: &str = "all";

/// Criteria for narrowing a watch history.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct HistoryFilter {
    /// Case-insensitive substring of the title or any genre name
    pub search_query: Option<String>,
    /// Exact genre name; `None` or "all" disables
    pub genre: Option<String>,
    /// Release year; `None` disables
    pub year: Option<i32>,
    /// Floor on the effective 5-star rating; 0 disables
    pub min_rating: f32,
}

impl HistoryFilter {
    /// Build criteria from raw UI selections.
    ///
    /// `""` and `"all"` disable the genre and year filters, `"0"` or `""`
    /// disables the rating floor. Year and rating values that don't parse
    /// as numbers are ignored.
    pub fn from_selections(search_query: &str, genre: &str, year: &str, min_rating: &str) -> Self {
        Self {
            search_query: Some(search_query.to_string()).filter(|q| !q.is_empty()),
            genre: selection(Some(genre)).map(str::to_string),
            year: selection(Some(year)).and_then(parse_year),
            min_rating: min_rating.trim().parse().unwrap_or(0.0),
        }
    }

    /// Whether any criterion would exclude records
    pub fn is_active(&self) -> bool {
        !self.to_pipeline().is_empty()
    }

    /// One filter per active criterion: search, genre, year, rating.
    pub fn to_pipeline(&self) -> FilterPipeline {
        let mut pipeline = FilterPipeline::new();

        if let Some(query) = self.search_query.as_deref().filter(|q| !q.is_empty()) {
            pipeline = pipeline.add_filter(SearchQueryFilter::new(query));
        }
        if let Some(genre) = selection(self.genre.as_deref()) {
            pipeline = pipeline.add_filter(GenreFilter::new(genre));
        }
        if let Some(year) = self.year {
            pipeline = pipeline.add_filter(ReleaseYearFilter::new(year));
        }
        if self.min_rating > 0.0 {
            pipeline = pipeline.add_filter(MinimumRatingFilter::new(self.min_rating));
        }

        pipeline
    }
}

/// `None` for an empty or "all" selection.
fn selection(value: Option<&str>) -> Option<&str> {
    value
        .map(str::trim)
        .filter(|v| !v.is_empty() && !v.eq_ignore_ascii_case(ALL))
}

/// Records passing every active criterion, in input order.
///
/// The input is left untouched; matching records are cloned.
pub fn filter_history(records: &[WatchRecord], criteria: &HistoryFilter) -> Vec<WatchRecord> {
    let pipeline = criteria.to_pipeline();
    if pipeline.is_empty() {
        return records.to_vec();
    }
    pipeline.apply(records.to_vec())
}
