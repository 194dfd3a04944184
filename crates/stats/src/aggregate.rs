//! Watch-history aggregation.
//!
//! Turns a list of watch records into the numbers behind the stats
//! screen: totals, monthly counts, time-of-day and day-of-week
//! distributions, genre counts and the user's favorite viewing time.

use chrono::{DateTime, Datelike, Local, TimeZone, Timelike, Utc};
use data_loader::WatchRecord;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashSet};
use std::fmt;
use tracing::debug;

/// Weekday names indexed the way `watch_time_by_day` is (0 = Sunday)
pub const DAY_NAMES: [&str; 7] = [
    "Sunday",
    "Monday",
    "Tuesday",
    "Wednesday",
    "Thursday",
    "Friday",
    "Saturday",
];

/// Number of times a genre appears across the history
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GenreCount {
    pub genre: String,
    pub count: u32,
}

/// Coarse part of the day
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TimeOfDay {
    /// Before 12:00
    Morning,
    /// 12:00 through 16:59
    Afternoon,
    /// 17:00 and later
    Evening,
}

impl TimeOfDay {
    pub fn from_hour(hour: u32) -> Self {
        match hour {
            0..=11 => TimeOfDay::Morning,
            12..=16 => TimeOfDay::Afternoon,
            _ => TimeOfDay::Evening,
        }
    }
}

impl fmt::Display for TimeOfDay {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            TimeOfDay::Morning => "morning",
            TimeOfDay::Afternoon => "afternoon",
            TimeOfDay::Evening => "evening",
        };
        f.write_str(label)
    }
}

/// When the user watches the most, by accumulated minutes
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FavoriteTime {
    /// Hour of day, 0-23
    pub hour: u32,
    /// Weekday name, e.g. "Friday"
    pub day: String,
    pub time_of_day: TimeOfDay,
}

/// Aggregate statistics over a watch history.
///
/// Derived on demand; never stored.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AggregateStats {
    /// Sum of runtimes, in minutes
    pub total_watch_time: u64,
    pub total_movies_watched: usize,
    /// Minutes per movie; 0 for an empty history
    pub avg_watch_time: f64,
    /// "YYYY-MM" -> number of movies watched that month
    pub movies_per_month: BTreeMap<String, u32>,
    /// Minutes watched per hour of day
    pub watch_time_by_hour: [u64; 24],
    /// Minutes watched per weekday, 0 = Sunday
    pub watch_time_by_day: [u64; 7],
    /// Most frequent genres first
    pub genre_distribution: Vec<GenreCount>,
    /// `None` for an empty history
    pub favorite_time: Option<FavoriteTime>,
    pub last_watched: Option<DateTime<Utc>>,
}

impl AggregateStats {
    /// Statistics of an empty history
    pub fn empty() -> Self {
        Self {
            total_watch_time: 0,
            total_movies_watched: 0,
            avg_watch_time: 0.0,
            movies_per_month: BTreeMap::new(),
            watch_time_by_hour: [0; 24],
            watch_time_by_day: [0; 7],
            genre_distribution: Vec::new(),
            favorite_time: None,
            last_watched: None,
        }
    }

    /// The `n` most frequent genres
    pub fn top_genres(&self, n: usize) -> &[GenreCount] {
        &self.genre_distribution[..n.min(self.genre_distribution.len())]
    }
}

impl Default for AggregateStats {
    fn default() -> Self {
        Self::empty()
    }
}

/// Compute statistics, bucketing by the machine's local time zone.
pub fn compute_stats(records: &[WatchRecord]) -> AggregateStats {
    compute_stats_in(records, &Local)
}

/// Compute statistics, bucketing months, hours and weekdays in `tz`.
///
/// Records without a usable `watched_at` count toward the totals and the
/// genre distribution but fall into no date bucket.
pub fn compute_stats_in<Tz: TimeZone>(records: &[WatchRecord], tz: &Tz) -> AggregateStats {
    if records.is_empty() {
        return AggregateStats::empty();
    }

    let total_watch_time: u64 = records.iter().map(WatchRecord::runtime_minutes).sum();
    let total_movies_watched = records.len();
    let avg_watch_time = total_watch_time as f64 / total_movies_watched as f64;

    let mut movies_per_month: BTreeMap<String, u32> = BTreeMap::new();
    let mut watch_time_by_hour = [0u64; 24];
    let mut watch_time_by_day = [0u64; 7];
    // Insertion-ordered so equal counts keep first-seen order after sorting
    let mut genre_counts: IndexMap<&str, u32> = IndexMap::new();
    let mut undated = 0usize;

    for record in records {
        let runtime = record.runtime_minutes();

        match record.watched_at {
            Some(instant) => {
                let local = instant.with_timezone(tz);
                let month = format!("{:04}-{:02}", local.year(), local.month());
                *movies_per_month.entry(month).or_insert(0) += 1;
                watch_time_by_hour[local.hour() as usize] += runtime;
                watch_time_by_day[local.weekday().num_days_from_sunday() as usize] += runtime;
            }
            None => undated += 1,
        }

        // A genre listed twice on one record still counts once
        let mut seen: HashSet<&str> = HashSet::new();
        for genre in &record.genres {
            if seen.insert(genre.as_str()) {
                *genre_counts.entry(genre.as_str()).or_insert(0) += 1;
            }
        }
    }

    if undated > 0 {
        debug!("{} of {} records have no watch date", undated, total_movies_watched);
    }

    let mut genre_distribution: Vec<GenreCount> = genre_counts
        .into_iter()
        .map(|(genre, count)| GenreCount {
            genre: genre.to_string(),
            count,
        })
        .collect();
    // Stable: ties stay in encounter order
    genre_distribution.sort_by(|a, b| b.count.cmp(&a.count));

    let favorite_hour = index_of_max(&watch_time_by_hour) as u32;
    let favorite_day = index_of_max(&watch_time_by_day);

    AggregateStats {
        total_watch_time,
        total_movies_watched,
        avg_watch_time,
        movies_per_month,
        watch_time_by_hour,
        watch_time_by_day,
        genre_distribution,
        favorite_time: Some(FavoriteTime {
            hour: favorite_hour,
            day: DAY_NAMES[favorite_day].to_string(),
            time_of_day: TimeOfDay::from_hour(favorite_hour),
        }),
        last_watched: records.iter().filter_map(|r| r.watched_at).max(),
    }
}

/// Index of the largest bucket; the lowest index wins ties.
fn index_of_max(buckets: &[u64]) -> usize {
    let mut best = 0;
    for (idx, &value) in buckets.iter().enumerate() {
        if value > buckets[best] {
            best = idx;
        }
    }
    best
}
