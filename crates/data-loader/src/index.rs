//! DataIndex: the in-memory implementation of `MovieStore`.
//!
//! This module builds the index from a data directory:
//! - Parse the watchlist, ratings and history documents in parallel
//! - Build the per-movie rating index and aggregate statistics
//! - Validate value ranges
//!
//! and writes it back in the same layout.

use crate::error::{DataLoadError, Result};
use crate::parser;
use crate::store::MovieStore;
use crate::types::*;
use chrono::Utc;
use rayon::prelude::*;
use serde::Serialize;
use std::collections::{BTreeMap, HashMap};
use std::fs;
use std::path::Path;
use tracing::{debug, info};

pub const WATCHLIST_FILE: &str = "watchlist.json";
pub const RATINGS_FILE: &str = "ratings.json";
pub const HISTORY_FILE: &str = "history.json";
pub const HISTORY_LINES_FILE: &str = "history.jsonl";

/// All users' watchlists, ratings and watch history.
///
/// Ratings are kept twice: by user (the primary copy, as entries) and by
/// movie (just the values) so the per-movie aggregate can be recomputed
/// without scanning every user.
#[derive(Debug, Default)]
pub struct DataIndex {
    pub(crate) watchlists: HashMap<UserId, Vec<Movie>>,
    pub(crate) histories: HashMap<UserId, Vec<WatchRecord>>,

    /// Each user's ratings, at most one per movie
    pub(crate) user_ratings: HashMap<UserId, Vec<RatingEntry>>,
    /// Every user's rating value for each movie
    pub(crate) movie_ratings: HashMap<MovieId, BTreeMap<UserId, f32>>,

    // Precomputed statistics
    pub(crate) movie_stats: HashMap<MovieId, MovieRatingStats>,
}

impl DataIndex {
    /// Creates a new, empty DataIndex
    pub fn new() -> Self {
        Self::default()
    }

    /// Load every document found in `data_dir`.
    ///
    /// Missing files are treated as empty collections, so a fresh
    /// directory loads as an empty index. `history.jsonl` is used when
    /// `history.json` is absent.
    pub fn load_from_dir(data_dir: &Path) -> Result<Self> {
        debug!("Loading user data from {:?}", data_dir);

        let watchlist_path = data_dir.join(WATCHLIST_FILE);
        let ratings_path = data_dir.join(RATINGS_FILE);
        let history_path = if data_dir.join(HISTORY_FILE).exists() {
            data_dir.join(HISTORY_FILE)
        } else {
            data_dir.join(HISTORY_LINES_FILE)
        };

        // Parse the three documents in parallel
        let ((watchlists, ratings), histories) = rayon::join(
            || {
                rayon::join(
                    || load_or_default(&watchlist_path, parser::parse_watchlists),
                    || load_or_default(&ratings_path, parser::parse_ratings),
                )
            },
            || load_or_default(&history_path, parser::parse_history),
        );

        let mut index = DataIndex::new();
        index.watchlists = watchlists?;
        index.histories = histories?;
        for rating in ratings? {
            index.insert_rating(rating);
        }

        index.compute_movie_stats();
        index.validate()?;

        let (users, records, ratings) = index.counts();
        info!(
            "Loaded {} users, {} history records, {} ratings",
            users, records, ratings
        );
        Ok(index)
    }

    /// Write the index back as watchlist.json, ratings.json and history.json.
    ///
    /// Keys are written in sorted order so repeated saves produce
    /// identical files.
    pub fn save_to_dir(&self, data_dir: &Path) -> Result<()> {
        fs::create_dir_all(data_dir)?;

        let watchlists: BTreeMap<&UserId, &Vec<Movie>> = self.watchlists.iter().collect();
        let histories: BTreeMap<&UserId, &Vec<WatchRecord>> = self.histories.iter().collect();
        let mut ratings: Vec<&RatingEntry> = self.user_ratings.values().flatten().collect();
        ratings.sort_by(|a, b| {
            a.user_id
                .cmp(&b.user_id)
                .then_with(|| a.movie_id.cmp(&b.movie_id))
        });

        write_document(&data_dir.join(WATCHLIST_FILE), &watchlists)?;
        write_document(&data_dir.join(RATINGS_FILE), &ratings)?;
        write_document(&data_dir.join(HISTORY_FILE), &histories)?;

        debug!("Saved user data to {:?}", data_dir);
        Ok(())
    }

    /// Insert a rating and update indices, replacing any earlier rating
    /// by the same user for the same movie.
    ///
    /// Does not refresh `movie_stats`; callers do that once per batch.
    pub fn insert_rating(&mut self, rating: RatingEntry) {
        self.movie_ratings
            .entry(rating.movie_id)
            .or_default()
            .insert(rating.user_id.clone(), rating.rating);

        let entries = self.user_ratings.entry(rating.user_id.clone()).or_default();
        match entries.iter_mut().find(|e| e.movie_id == rating.movie_id) {
            Some(existing) => *existing = rating,
            None => entries.push(rating),
        }
    }

    /// Recompute the aggregate for every rated movie
    pub fn compute_movie_stats(&mut self) {
        self.movie_stats = self
            .movie_ratings
            .par_iter()
            .map(|(&movie_id, ratings)| {
                (movie_id, MovieRatingStats::from_ratings(ratings.values().copied()))
            })
            .collect();
    }

    fn refresh_movie_stats(&mut self, movie_id: MovieId) -> MovieRatingStats {
        let stats = MovieRatingStats::from_ratings(
            self.movie_ratings
                .get(&movie_id)
                .into_iter()
                .flat_map(|ratings| ratings.values().copied()),
        );
        self.movie_stats.insert(movie_id, stats);
        stats
    }

    /// Validate value ranges
    ///
    /// Check that:
    /// - Every rating names a user and lies in 0.0 - 5.0
    /// - Catalog averages lie in 0.0 - 10.0
    /// - Progress lies in 0 - 100
    pub fn validate(&self) -> Result<()> {
        for entries in self.user_ratings.values() {
            for entry in entries {
                if entry.user_id.is_empty() {
                    return Err(DataLoadError::ValidationError(format!(
                        "rating for movie {} has no userId",
                        entry.movie_id
                    )));
                }
                check_rating("rating", entry.rating)?;
            }
        }

        for movie in self.watchlists.values().flatten() {
            movie.validate()?;
        }

        for record in self.histories.values().flatten() {
            record.validate()?;
        }
        Ok(())
    }

    /// (users, history records, ratings) counts for logging and tests
    pub fn counts(&self) -> (usize, usize, usize) {
        let mut users: Vec<&UserId> = self
            .watchlists
            .keys()
            .chain(self.histories.keys())
            .chain(self.user_ratings.keys())
            .collect();
        users.sort();
        users.dedup();

        let records = self.histories.values().map(|v| v.len()).sum();
        let ratings = self.user_ratings.values().map(|v| v.len()).sum();
        (users.len(), records, ratings)
    }
}

impl MovieStore for DataIndex {
    fn watchlist(&self, user_id: &str) -> Vec<Movie> {
        self.watchlists.get(user_id).cloned().unwrap_or_default()
    }

    fn add_to_watchlist(&mut self, user_id: &str, movie: Movie) -> bool {
        let list = self.watchlists.entry(user_id.to_string()).or_default();
        if list.iter().any(|m| m.id == movie.id) {
            return false;
        }
        list.push(movie);
        true
    }

    fn remove_from_watchlist(&mut self, user_id: &str, movie_id: MovieId) -> bool {
        let Some(list) = self.watchlists.get_mut(user_id) else {
            return false;
        };
        let before = list.len();
        list.retain(|m| m.id != movie_id);
        list.len() != before
    }

    fn history(&self, user_id: &str) -> Vec<WatchRecord> {
        self.histories.get(user_id).cloned().unwrap_or_default()
    }

    fn add_to_history(&mut self, user_id: &str, record: WatchRecord) {
        self.histories
            .entry(user_id.to_string())
            .or_default()
            .push(record);
    }

    fn remove_from_history(&mut self, user_id: &str, movie_id: MovieId) -> bool {
        let Some(records) = self.histories.get_mut(user_id) else {
            return false;
        };
        let before = records.len();
        records.retain(|r| r.movie_id != movie_id);
        records.len() != before
    }

    fn set_rating(
        &mut self,
        user_id: &str,
        movie_id: MovieId,
        rating: f32,
        review: String,
    ) -> MovieRatingStats {
        self.insert_rating(RatingEntry {
            user_id: user_id.to_string(),
            movie_id,
            rating,
            review,
            timestamp: Some(Utc::now()),
        });
        self.refresh_movie_stats(movie_id)
    }

    fn user_rating(&self, user_id: &str, movie_id: MovieId) -> Option<RatingEntry> {
        self.user_ratings
            .get(user_id)?
            .iter()
            .find(|e| e.movie_id == movie_id)
            .cloned()
    }

    fn user_ratings(&self, user_id: &str) -> Vec<RatingEntry> {
        self.user_ratings.get(user_id).cloned().unwrap_or_default()
    }

    fn movie_rating_stats(&self, movie_id: MovieId) -> Option<MovieRatingStats> {
        self.movie_stats.get(&movie_id).copied()
    }
}

fn load_or_default<T: Default>(path: &Path, parse: fn(&Path) -> Result<T>) -> Result<T> {
    if path.exists() {
        parse(path)
    } else {
        debug!("{:?} not found, starting empty", path);
        Ok(T::default())
    }
}

fn write_document<T: Serialize>(path: &Path, value: &T) -> Result<()> {
    let json = serde_json::to_string_pretty(value).map_err(|source| DataLoadError::JsonError {
        file: path.display().to_string(),
        source,
    })?;
    fs::write(path, json)?;
    Ok(())
}
