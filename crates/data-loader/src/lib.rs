//! # Data Loader Crate
//!
//! This crate owns the user-data side of the movie library: the stored
//! record types and the store they are read from and written to.
//!
//! ## Main Components
//!
//! - **types**: Core domain types (WatchRecord, Movie, RatingEntry, MovieRatingStats)
//! - **timestamp**: Lenient decoding of the instants found in stored documents
//! - **parser**: Parse watchlist / ratings / history documents into Rust structs
//! - **store**: The `MovieStore` trait callers program against
//! - **index**: `DataIndex`, the in-memory store, with directory load/save
//! - **error**: Error types for loading and saving
//!
//! ## Example Usage
//!
//! ```ignore
//! use data_loader::{DataIndex, MovieStore};
//! use std::path::Path;
//!
//! let mut index = DataIndex::load_from_dir(Path::new("data"))?;
//!
//! let history = index.history("alice");
//! let stats = index.set_rating("alice", 603, 4.5, String::new());
//!
//! println!("{} records, movie now averages {:.1}", history.len(), stats.average_rating);
//! index.save_to_dir(Path::new("data"))?;
//! ```

// Public modules
pub mod error;
pub mod types;
pub mod timestamp;
pub mod parser;
pub mod store;
pub mod index;

// Re-export commonly used types for convenience
pub use error::{DataLoadError, Result};
pub use index::DataIndex;
pub use store::MovieStore;
pub use types::{
    // Type aliases
    UserId,
    MovieId,
    // Core types
    WatchRecord,
    Movie,
    RatingEntry,
    MovieRatingStats,
    parse_year,
    check_rating,
};
