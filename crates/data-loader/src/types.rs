//! Core domain types for a user's movie library.
//!
//! This module defines the records the hosted store keeps per user:
//! - Watch history entries (`WatchRecord`)
//! - Watchlist entries (`Movie`)
//! - Ratings and reviews (`RatingEntry`) plus per-movie aggregates
//!
//! Field names follow the hosted documents (camelCase) and accept the
//! catalog's snake_case spellings as aliases, so records copied straight
//! out of a catalog response deserialize without a mapping step.

use crate::error::{DataLoadError, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};

// =============================================================================
// Type Aliases
// =============================================================================

/// Identity of a signed-in user (the auth provider's uid)
pub type UserId = String;

/// Catalog identifier of a movie (stable, unique per movie)
pub type MovieId = u64;

// =============================================================================
// Watch History
// =============================================================================

/// One entry in a user's watch history.
///
/// Every field other than the movie id may be missing in stored documents.
/// Consumers never fail on a missing field; they treat it as absent and
/// degrade (zero runtime, no rating, no date bucket).
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WatchRecord {
    #[serde(alias = "id")]
    pub movie_id: MovieId,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,

    /// Genre names; `null` and a missing key both decode to an empty list
    #[serde(default, deserialize_with = "null_as_default")]
    pub genres: Vec<String>,

    /// Duration in minutes
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub runtime: Option<u32>,

    /// Minutes actually watched, when the client tracked it
    #[serde(default, alias = "duration_watched", skip_serializing_if = "Option::is_none")]
    pub duration_watched: Option<u32>,

    /// ISO date of theatrical release, e.g. "2020-05-01"
    #[serde(default, alias = "release_date", skip_serializing_if = "Option::is_none")]
    pub release_date: Option<String>,

    /// When the user watched or logged the movie.
    ///
    /// Unparseable values decode to `None` instead of rejecting the record.
    /// Store documents name this field `timestamp`.
    #[serde(
        default,
        alias = "timestamp",
        with = "crate::timestamp",
        skip_serializing_if = "Option::is_none"
    )]
    pub watched_at: Option<DateTime<Utc>>,

    /// The user's own rating on a 0-5 scale
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_rating: Option<f32>,

    /// Catalog-wide average on a 0-10 scale
    #[serde(default, alias = "vote_average", skip_serializing_if = "Option::is_none")]
    pub vote_average: Option<f32>,

    /// Percentage watched, 0-100
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub progress: Option<f32>,

    #[serde(default, alias = "poster_path", skip_serializing_if = "Option::is_none")]
    pub poster_path: Option<String>,
}

impl WatchRecord {
    /// Create a record for a movie with every optional field unset.
    pub fn new(movie_id: MovieId) -> Self {
        Self {
            movie_id,
            ..Self::default()
        }
    }

    /// Build a history record from a catalog/watchlist movie.
    pub fn from_movie(movie: &Movie, watched_at: Option<DateTime<Utc>>) -> Self {
        Self {
            movie_id: movie.id,
            title: Some(movie.title.clone()),
            genres: movie.genres.clone(),
            runtime: movie.runtime,
            duration_watched: None,
            release_date: movie.release_date.clone(),
            watched_at,
            user_rating: None,
            vote_average: movie.vote_average,
            progress: None,
            poster_path: movie.poster_path.clone(),
        }
    }

    /// Runtime in minutes, zero when unknown.
    pub fn runtime_minutes(&self) -> u64 {
        self.runtime.map(u64::from).unwrap_or(0)
    }

    /// Rating on the 5-star scale.
    ///
    /// The user's own rating wins; otherwise the catalog average is halved
    /// so both live on the same scale. `None` when neither is known.
    pub fn effective_rating(&self) -> Option<f32> {
        self.user_rating
            .or_else(|| self.vote_average.map(|avg| avg / 2.0))
    }

    /// Four-digit year parsed from `release_date`.
    ///
    /// Example: "2020-05-01" -> Some(2020)
    ///          "unknown" -> None
    pub fn release_year(&self) -> Option<i32> {
        parse_year(self.release_date.as_deref()?)
    }

    /// Title for display and comparison, empty when unknown.
    pub fn title_or_empty(&self) -> &str {
        self.title.as_deref().unwrap_or("")
    }

    /// Minutes watched: the tracked duration, else the runtime, else zero.
    pub fn watched_minutes(&self) -> u64 {
        self.duration_watched
            .or(self.runtime)
            .map(u64::from)
            .unwrap_or(0)
    }

    /// Check value ranges: userRating 0-5, voteAverage 0-10, progress 0-100.
    pub fn validate(&self) -> Result<()> {
        if let Some(rating) = self.user_rating {
            check_rating("userRating", rating)?;
        }
        if let Some(avg) = self.vote_average {
            check_range("voteAverage", avg, 0.0, 10.0)?;
        }
        if let Some(progress) = self.progress {
            check_range("progress", progress, 0.0, 100.0)?;
        }
        Ok(())
    }
}

/// Parse the leading `YYYY` of an ISO date.
pub fn parse_year(date: &str) -> Option<i32> {
    let digits = date.trim().get(..4)?;
    if !digits.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    digits.parse().ok()
}

// =============================================================================
// Watchlist
// =============================================================================

/// A catalog movie as saved on a user's watchlist
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Movie {
    pub id: MovieId,

    #[serde(default)]
    pub title: String,

    #[serde(default, alias = "poster_path", skip_serializing_if = "Option::is_none")]
    pub poster_path: Option<String>,

    #[serde(default, alias = "release_date", skip_serializing_if = "Option::is_none")]
    pub release_date: Option<String>,

    #[serde(default, alias = "vote_average", skip_serializing_if = "Option::is_none")]
    pub vote_average: Option<f32>,

    #[serde(default, deserialize_with = "null_as_default")]
    pub genres: Vec<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub runtime: Option<u32>,
}

impl Movie {
    /// Check value ranges: voteAverage 0-10.
    pub fn validate(&self) -> Result<()> {
        if let Some(avg) = self.vote_average {
            check_range("voteAverage", avg, 0.0, 10.0)?;
        }
        Ok(())
    }
}

// =============================================================================
// Ratings
// =============================================================================

/// A user's rating (and optional review) of one movie.
///
/// There is at most one entry per (user, movie); rating again replaces it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RatingEntry {
    pub user_id: UserId,
    pub movie_id: MovieId,
    /// Rating value from 0.0 to 5.0
    pub rating: f32,
    #[serde(default)]
    pub review: String,
    #[serde(default, with = "crate::timestamp", skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<DateTime<Utc>>,
}

/// Aggregate of every user's rating for a movie
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MovieRatingStats {
    pub average_rating: f32,
    pub rating_count: u32,
}

impl MovieRatingStats {
    /// Aggregate a set of rating values; an empty set averages to zero.
    pub fn from_ratings(ratings: impl IntoIterator<Item = f32>) -> Self {
        let (sum, count) = ratings
            .into_iter()
            .fold((0.0f32, 0u32), |(sum, count), r| (sum + r, count + 1));
        let average_rating = if count > 0 { sum / count as f32 } else { 0.0 };
        Self {
            average_rating,
            rating_count: count,
        }
    }
}

/// Reject a rating outside 0.0 - 5.0
pub fn check_rating(field: &str, rating: f32) -> Result<()> {
    check_range(field, rating, 0.0, 5.0)
}

/// Reject NaN and values outside `min..=max`
pub(crate) fn check_range(field: &str, value: f32, min: f32, max: f32) -> Result<()> {
    if value.is_nan() || value < min || value > max {
        return Err(DataLoadError::InvalidValue {
            field: field.to_string(),
            value: value.to_string(),
        });
    }
    Ok(())
}

/// Treat an explicit JSON `null` like a missing key.
fn null_as_default<'de, D, T>(deserializer: D) -> std::result::Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}
