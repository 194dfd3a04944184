//! The data-access seam between callers and wherever user data lives.
//!
//! Watchlists, ratings and watch history are read and written through an
//! explicit `MovieStore` handed to callers, never through ambient global
//! state. `DataIndex` is the in-memory implementation.

use crate::types::*;

/// Per-user read/write operations over watchlists, ratings and history.
///
/// Reads return owned snapshots so callers can run pure views (filters,
/// sorts, statistics) without holding a borrow on the store.
pub trait MovieStore: Send + Sync {
    /// The user's watchlist, in insertion order
    fn watchlist(&self, user_id: &str) -> Vec<Movie>;

    /// Add a movie to the watchlist.
    ///
    /// Returns `false` when a movie with the same id is already present.
    fn add_to_watchlist(&mut self, user_id: &str, movie: Movie) -> bool;

    /// Returns `false` when the movie wasn't on the watchlist.
    fn remove_from_watchlist(&mut self, user_id: &str, movie_id: MovieId) -> bool;

    /// The user's watch history, in insertion order
    fn history(&self, user_id: &str) -> Vec<WatchRecord>;

    fn add_to_history(&mut self, user_id: &str, record: WatchRecord);

    /// Remove every history entry for the movie.
    ///
    /// Returns `false` when nothing was removed.
    fn remove_from_history(&mut self, user_id: &str, movie_id: MovieId) -> bool;

    /// Record (or replace) the user's rating and return the movie's new
    /// aggregate across all users.
    fn set_rating(
        &mut self,
        user_id: &str,
        movie_id: MovieId,
        rating: f32,
        review: String,
    ) -> MovieRatingStats;

    fn user_rating(&self, user_id: &str, movie_id: MovieId) -> Option<RatingEntry>;

    fn user_ratings(&self, user_id: &str) -> Vec<RatingEntry>;

    fn movie_rating_stats(&self, movie_id: MovieId) -> Option<MovieRatingStats>;
}
