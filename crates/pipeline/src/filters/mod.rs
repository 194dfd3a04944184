//! Filter implementations for the watch-history pipeline.
//!
//! This module contains all the concrete filter implementations
//! that can be composed into a FilterPipeline.

pub mod genre;
pub mod in_progress;
pub mod minimum_rating;
pub mod release_year;
pub mod search_query;

// Re-export for convenience
pub use genre::GenreFilter;
pub use in_progress::InProgressFilter;
pub use minimum_rating::MinimumRatingFilter;
pub use release_year::ReleaseYearFilter;
pub use search_query::SearchQueryFilter;
