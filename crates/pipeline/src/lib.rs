//! Pipeline for filtering and ordering a user's watch history.
//!
//! This crate provides:
//! - Filter trait and implementations for history filtering
//! - FilterPipeline for composing filters
//! - HistoryFilter criteria and `filter_history`
//! - `sort_history` with stable date / title / rating ordering
//! - Dropdown options (`years_present`, `genres_present`)
//! - The continue-watching selection
//!
//! ## Architecture
//! The history screen processes records in stages:
//! 1. Filters remove records that don't match the search box and dropdowns
//! 2. The remaining records are sorted by the chosen key and order
//!
//! Nothing here mutates its input or fails: every function returns a
//! fresh Vec, and records missing a field simply don't match filters on it.
//!
//! ## Example Usage
//! ```ignore
//! use pipeline::{HistoryFilter, SortBy, SortOrder, filter_history, sort_history};
//!
//! let criteria = HistoryFilter::from_selections("", "Drama", "all", "4");
//! let filtered = filter_history(&history, &criteria);
//! let view = sort_history(&filtered, SortBy::Rating, SortOrder::Desc);
//! ```

pub mod traits;
pub mod filters;
pub mod filter_pipeline;
pub mod criteria;
pub mod sort;
pub mod options;
pub mod continue_watching;

// Re-export main types
pub use traits::Filter;
pub use filter_pipeline::FilterPipeline;
pub use criteria::{HistoryFilter, filter_history};
pub use sort::{SortBy, SortOrder, sort_history};
pub use options::{genres_present, years_present};
pub use continue_watching::continue_watching;
