//! # Stats Crate
//!
//! Derived views over a watch history. Nothing here is stored; every
//! number is recomputed from the records it is given.
//!
//! - **aggregate**: `compute_stats` and the `AggregateStats` it returns
//! - **format**: duration and progress helpers used by the stats screen
//!
//! ## Example Usage
//!
//! ```ignore
//! use stats::{compute_stats, format_duration};
//!
//! let stats = compute_stats(&history);
//! println!("Watched {} movies ({})", stats.total_movies_watched,
//!     format_duration(stats.total_watch_time));
//! ```

pub mod aggregate;
pub mod format;

pub use aggregate::{
    AggregateStats, DAY_NAMES, FavoriteTime, GenreCount, TimeOfDay, compute_stats,
    compute_stats_in,
};
pub use format::{format_duration, progress_percentage, time_remaining};
