//! Filter to ensure a minimum rating.
//!
//! Removes movies rated below a floor on the 5-star scale.

use crate::traits::Filter;
use data_loader::WatchRecord;

/// Removes records below a rating floor.
///
/// ## Algorithm
/// For each record:
/// 1. Take the effective rating (user rating, else catalog average / 2)
/// 2. Keep it only if a rating is known and it is >= min_rating
pub struct MinimumRatingFilter {
    min_rating: f32,
}

impl MinimumRatingFilter {
    /// Create a new MinimumRatingFilter.
    ///
    /// # Arguments
    /// * `min_rating` - Floor on the 0-5 scale (UI offers 1 through 4)
    pub fn new(min_rating: f32) -> Self {
        Self { min_rating }
    }
}

impl Filter for MinimumRatingFilter {
    fn name(&self) -> &str {
        "MinimumRatingFilter"
    }

    fn matches(&self, record: &WatchRecord) -> bool {
        record
            .effective_rating()
            .is_some_and(|rating| rating >= self.min_rating)
    }
}
