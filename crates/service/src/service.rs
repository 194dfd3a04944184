//! # Movie Service
//!
//! Coordinates everything a signed-in user can do with their library:
//! 1. Check the session against the route guard
//! 2. Read or update the store under its lock
//! 3. Derive views (filtered history, stats, summary) from the records
//!
//! CPU-bound work such as stats aggregation and directory I/O runs on the
//! blocking pool via `spawn_blocking`, so the async callers never stall.

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Instant;

use chrono::Utc;
use serde::{Deserialize, Serialize};
use tokio::sync::RwLock;
use tracing::{debug, info};

use data_loader::{
    DataIndex, Movie, MovieId, MovieRatingStats, MovieStore, RatingEntry, WatchRecord,
    check_rating,
};
use pipeline::{HistoryFilter, SortBy, SortOrder, filter_history, sort_history};
use stats::{AggregateStats, compute_stats};

use crate::error::{Result, ServiceError};
use crate::guard::{Access, RouteGuard, Session};

/// Default length of the recent-history list
pub const DEFAULT_RECENT_LIMIT: usize = 10;

/// Entries shown under "recent activity" in the summary
pub const RECENT_ACTIVITY_LIMIT: usize = 5;

/// What `toggle_watchlist` did
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum WatchlistChange {
    Added,
    Removed,
}

/// A filtered, sorted and optionally truncated view of the history
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct HistoryQuery {
    #[serde(flatten)]
    pub filter: HistoryFilter,
    pub sort_by: SortBy,
    pub order: SortOrder,
    pub limit: Option<usize>,
}

/// Per-user counters shown on the profile page
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserSummary {
    pub watchlist_count: usize,
    /// Distinct movies the user has rated
    pub rated_count: usize,
    pub watched_count: usize,
    /// Minutes, summed over tracked watch durations (runtime when untracked)
    pub total_watch_time: u64,
    /// Newest history entries first
    pub recent_activity: Vec<WatchRecord>,
}

/// Everything the profile page needs in one read
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserData {
    pub watchlist: Vec<Movie>,
    pub history: Vec<WatchRecord>,
    pub ratings: Vec<RatingEntry>,
    pub summary: UserSummary,
}

/// Main service over a shared store
pub struct MovieService<S> {
    store: Arc<RwLock<S>>,
    guard: RouteGuard,
}

impl<S> Clone for MovieService<S> {
    fn clone(&self) -> Self {
        Self {
            store: self.store.clone(),
            guard: self.guard.clone(),
        }
    }
}

impl<S: MovieStore + 'static> MovieService<S> {
    pub fn new(store: S) -> Self {
        Self {
            store: Arc::new(RwLock::new(store)),
            guard: RouteGuard::default(),
        }
    }

    /// Replace the default guard (builder pattern)
    pub fn with_guard(mut self, guard: RouteGuard) -> Self {
        self.guard = guard;
        self
    }

    pub fn guard(&self) -> &RouteGuard {
        &self.guard
    }

    /// Shared handle to the underlying store
    pub fn store(&self) -> Arc<RwLock<S>> {
        self.store.clone()
    }

    /// The session's user id, or `NotAuthenticated` with the redirect path
    fn authorize<'a>(&self, session: &'a Session) -> Result<&'a str> {
        match (self.guard.check(session), session.user_id()) {
            (Access::Allow, Some(user_id)) => Ok(user_id),
            (Access::Redirect(redirect), _) => Err(ServiceError::NotAuthenticated { redirect }),
            (Access::Allow, None) => Err(ServiceError::NotAuthenticated {
                redirect: self.guard.redirect_to().to_string(),
            }),
        }
    }

    // =========================================================================
    // Watchlist
    // =========================================================================

    pub async fn watchlist(&self, session: &Session) -> Result<Vec<Movie>> {
        let user_id = self.authorize(session)?;
        Ok(self.store.read().await.watchlist(user_id))
    }

    /// Returns false when the movie was already on the list
    pub async fn add_to_watchlist(&self, session: &Session, movie: Movie) -> Result<bool> {
        let user_id = self.authorize(session)?;
        movie.validate()?;
        let movie_id = movie.id;
        let added = self.store.write().await.add_to_watchlist(user_id, movie);
        debug!("add_to_watchlist user={} movie={} added={}", user_id, movie_id, added);
        Ok(added)
    }

    /// Returns false when the movie wasn't on the list
    pub async fn remove_from_watchlist(&self, session: &Session, movie_id: MovieId) -> Result<bool> {
        let user_id = self.authorize(session)?;
        let removed = self.store.write().await.remove_from_watchlist(user_id, movie_id);
        debug!("remove_from_watchlist user={} movie={} removed={}", user_id, movie_id, removed);
        Ok(removed)
    }

    /// Add the movie if absent, remove it if present.
    ///
    /// Both steps happen under one write lock.
    pub async fn toggle_watchlist(&self, session: &Session, movie: Movie) -> Result<WatchlistChange> {
        let user_id = self.authorize(session)?;
        movie.validate()?;
        let mut store = self.store.write().await;
        if store.remove_from_watchlist(user_id, movie.id) {
            Ok(WatchlistChange::Removed)
        } else {
            store.add_to_watchlist(user_id, movie);
            Ok(WatchlistChange::Added)
        }
    }

    pub async fn is_in_watchlist(&self, session: &Session, movie_id: MovieId) -> Result<bool> {
        let user_id = self.authorize(session)?;
        let store = self.store.read().await;
        Ok(store.watchlist(user_id).iter().any(|m| m.id == movie_id))
    }

    // =========================================================================
    // Ratings
    // =========================================================================

    /// Store the user's rating (0-5) and return the movie's new aggregate.
    pub async fn rate_movie(
        &self,
        session: &Session,
        movie_id: MovieId,
        rating: f32,
        review: impl Into<String>,
    ) -> Result<MovieRatingStats> {
        let user_id = self.authorize(session)?;
        check_rating("rating", rating)?;

        let stats = self
            .store
            .write()
            .await
            .set_rating(user_id, movie_id, rating, review.into());
        info!(
            "User {} rated movie {}: {:.1} (now {:.2} over {} ratings)",
            user_id, movie_id, rating, stats.average_rating, stats.rating_count
        );
        Ok(stats)
    }

    pub async fn user_rating(&self, session: &Session, movie_id: MovieId) -> Result<Option<f32>> {
        let user_id = self.authorize(session)?;
        let store = self.store.read().await;
        Ok(store.user_rating(user_id, movie_id).map(|entry| entry.rating))
    }

    // =========================================================================
    // History
    // =========================================================================

    /// Append to the history, stamping `watched_at` with now when unset.
    ///
    /// Out-of-range ratings or progress are rejected before anything is stored.
    pub async fn add_to_history(&self, session: &Session, mut record: WatchRecord) -> Result<WatchRecord> {
        let user_id = self.authorize(session)?;
        record.validate()?;
        if record.watched_at.is_none() {
            record.watched_at = Some(Utc::now());
        }
        self.store
            .write()
            .await
            .add_to_history(user_id, record.clone());
        debug!("add_to_history user={} movie={}", user_id, record.movie_id);
        Ok(record)
    }

    pub async fn remove_from_history(&self, session: &Session, movie_id: MovieId) -> Result<bool> {
        let user_id = self.authorize(session)?;
        Ok(self.store.write().await.remove_from_history(user_id, movie_id))
    }

    pub async fn history(&self, session: &Session) -> Result<Vec<WatchRecord>> {
        let user_id = self.authorize(session)?;
        Ok(self.store.read().await.history(user_id))
    }

    /// The `limit` most recently watched records
    pub async fn recent_history(&self, session: &Session, limit: usize) -> Result<Vec<WatchRecord>> {
        let history = self.history(session).await?;
        Ok(newest_first(&history, limit))
    }

    /// Filter, then sort, then truncate the history
    pub async fn history_view(&self, session: &Session, query: &HistoryQuery) -> Result<Vec<WatchRecord>> {
        let history = self.history(session).await?;
        let filtered = filter_history(&history, &query.filter);
        let mut sorted = sort_history(&filtered, query.sort_by, query.order);
        if let Some(limit) = query.limit {
            sorted.truncate(limit);
        }
        debug!(
            "history_view: {} of {} records after filtering",
            sorted.len(),
            history.len()
        );
        Ok(sorted)
    }

    /// In-progress movies, most recent first
    pub async fn continue_watching(&self, session: &Session, limit: usize) -> Result<Vec<WatchRecord>> {
        let history = self.history(session).await?;
        Ok(pipeline::continue_watching(&history, limit))
    }

    // =========================================================================
    // Derived views
    // =========================================================================

    /// Aggregate statistics over the whole history
    pub async fn watch_stats(&self, session: &Session) -> Result<AggregateStats> {
        let start_time = Instant::now();
        let history = self.history(session).await?;
        let count = history.len();

        let stats = tokio::task::spawn_blocking(move || compute_stats(&history)).await?;

        info!("Computed stats over {} records in {:.2?}", count, start_time.elapsed());
        Ok(stats)
    }

    pub async fn summary(&self, session: &Session) -> Result<UserSummary> {
        let user_id = self.authorize(session)?;
        let store = self.store.read().await;
        Ok(build_summary(
            &store.watchlist(user_id),
            &store.history(user_id),
            &store.user_ratings(user_id),
        ))
    }

    /// Watchlist, history, ratings and summary in one read.
    ///
    /// A signed-out session gets empty data rather than an error.
    pub async fn load_user_data(&self, session: &Session) -> Result<UserData> {
        let Access::Allow = self.guard.check(session) else {
            return Ok(UserData::default());
        };
        let user_id = self.authorize(session)?;

        let start_time = Instant::now();
        let store = self.store.read().await;
        let watchlist = store.watchlist(user_id);
        let history = store.history(user_id);
        let ratings = store.user_ratings(user_id);
        drop(store);

        let summary = build_summary(&watchlist, &history, &ratings);
        info!(
            "Loaded data for user {}: {} watchlist, {} history, {} ratings in {:.2?}",
            user_id,
            watchlist.len(),
            history.len(),
            ratings.len(),
            start_time.elapsed()
        );
        Ok(UserData {
            watchlist,
            history,
            ratings,
            summary,
        })
    }
}

impl MovieService<DataIndex> {
    /// Load a `DataIndex` from `data_dir` on the blocking pool
    pub async fn open(data_dir: impl Into<PathBuf>) -> Result<Self> {
        let data_dir = data_dir.into();
        let start_time = Instant::now();
        let index = tokio::task::spawn_blocking(move || DataIndex::load_from_dir(&data_dir)).await??;
        info!("Data index ready in {:.2?}", start_time.elapsed());
        Ok(Self::new(index))
    }

    /// Write the store back to `data_dir`
    pub async fn save(&self, data_dir: impl Into<PathBuf>) -> Result<()> {
        let data_dir = data_dir.into();
        let store = self.store.clone();
        tokio::task::spawn_blocking(move || store.blocking_read().save_to_dir(&data_dir)).await??;
        Ok(())
    }
}

fn newest_first(history: &[WatchRecord], limit: usize) -> Vec<WatchRecord> {
    let mut sorted = sort_history(history, SortBy::Date, SortOrder::Desc);
    sorted.truncate(limit);
    sorted
}

fn build_summary(watchlist: &[Movie], history: &[WatchRecord], ratings: &[RatingEntry]) -> UserSummary {
    let mut rated: Vec<MovieId> = ratings.iter().map(|r| r.movie_id).collect();
    rated.sort_unstable();
    rated.dedup();

    UserSummary {
        watchlist_count: watchlist.len(),
        rated_count: rated.len(),
        watched_count: history.len(),
        total_watch_time: history.iter().map(WatchRecord::watched_minutes).sum(),
        recent_activity: newest_first(history, RECENT_ACTIVITY_LIMIT),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use data_loader::timestamp::parse_timestamp;

    fn record(movie_id: MovieId, runtime: u32, at: &str) -> WatchRecord {
        WatchRecord {
            runtime: Some(runtime),
            watched_at: parse_timestamp(at),
            ..WatchRecord::new(movie_id)
        }
    }

    fn rating(movie_id: MovieId) -> RatingEntry {
        RatingEntry {
            user_id: "alice".to_string(),
            movie_id,
            rating: 4.0,
            review: String::new(),
            timestamp: None,
        }
    }

    #[test]
    fn test_build_summary() {
        let history: Vec<WatchRecord> = (1..=7)
            .map(|i| record(i, 100, &format!("2024-01-0{}", i)))
            .collect();
        let summary = build_summary(&[], &history, &[rating(1), rating(2), rating(1)]);

        assert_eq!(summary.watchlist_count, 0);
        assert_eq!(summary.rated_count, 2);
        assert_eq!(summary.watched_count, 7);
        assert_eq!(summary.total_watch_time, 700);
        let recent: Vec<MovieId> = summary.recent_activity.iter().map(|r| r.movie_id).collect();
        assert_eq!(recent, vec![7, 6, 5, 4, 3]);
    }

    #[test]
    fn test_summary_prefers_tracked_duration() {
        let mut partial = record(1, 120, "2024-01-01");
        partial.duration_watched = Some(30);
        let summary = build_summary(&[], &[partial, record(2, 100, "2024-01-02")], &[]);
        assert_eq!(summary.total_watch_time, 130);
    }

    #[test]
    fn test_history_query_from_json() {
        let query: HistoryQuery =
            serde_json::from_str(r#"{"genre": "Drama", "sortBy": "title", "order": "asc", "limit": 3}"#)
                .unwrap();
        assert_eq!(query.filter.genre.as_deref(), Some("Drama"));
        assert_eq!(query.sort_by, SortBy::Title);
        assert_eq!(query.order, SortOrder::Asc);
        assert_eq!(query.limit, Some(3));
    }
}
