//! Parsers for the stored user documents.
//!
//! A data directory mirrors the hosted store's collections:
//! - watchlist.json: { "<userId>": [Movie, ...], ... }
//! - ratings.json:   [RatingEntry, ...] (one entry per user/movie pair)
//! - history.json:   { "<userId>": [WatchRecord, ...], ... }
//! - history.jsonl:  one {"userId": "...", ...WatchRecord} object per line
//!
//! A single user's history export (a bare array, or the store document
//! shape `{"history": [...]}`) is read by `parse_history_records`.

use crate::error::{DataLoadError, Result};
use crate::types::*;
use serde::Deserialize;
use serde::de::DeserializeOwned;
use std::collections::HashMap;
use std::fs;
use std::io::ErrorKind;
use std::path::Path;

/// Read a whole file, mapping a missing file to `FileNotFound`.
fn read_file(path: &Path) -> Result<String> {
    fs::read_to_string(path).map_err(|e| match e.kind() {
        ErrorKind::NotFound => DataLoadError::FileNotFound {
            path: path.display().to_string(),
        },
        _ => DataLoadError::IoError(e),
    })
}

fn file_name(path: &Path) -> String {
    path.file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}

/// Decode a whole JSON document, attaching the file name to any error.
fn parse_document<T: DeserializeOwned>(path: &Path) -> Result<T> {
    let content = read_file(path)?;
    serde_json::from_str(&content).map_err(|source| DataLoadError::JsonError {
        file: file_name(path),
        source,
    })
}

/// Parse watchlist.json
pub fn parse_watchlists(path: &Path) -> Result<HashMap<UserId, Vec<Movie>>> {
    parse_document(path)
}

/// Parse ratings.json
pub fn parse_ratings(path: &Path) -> Result<Vec<RatingEntry>> {
    parse_document(path)
}

/// Parse the history collection for every user.
///
/// Files ending in `.jsonl` are read line by line; anything else is
/// treated as a single JSON document keyed by user id.
pub fn parse_history(path: &Path) -> Result<HashMap<UserId, Vec<WatchRecord>>> {
    let is_lines = path
        .extension()
        .is_some_and(|ext| ext.eq_ignore_ascii_case("jsonl"));

    if is_lines {
        parse_history_lines(path)
    } else {
        parse_document(path)
    }
}

/// A history line: the record plus the user it belongs to
#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct HistoryLine {
    user_id: UserId,
    #[serde(flatten)]
    record: WatchRecord,
}

fn parse_history_lines(path: &Path) -> Result<HashMap<UserId, Vec<WatchRecord>>> {
    let content = read_file(path)?;
    let file = file_name(path);
    let mut histories: HashMap<UserId, Vec<WatchRecord>> = HashMap::new();

    for (idx, line) in content.lines().enumerate() {
        let line_trimmed = line.trim();
        if line_trimmed.is_empty() {
            continue;
        }

        let parsed: HistoryLine =
            serde_json::from_str(line_trimmed).map_err(|e| DataLoadError::ParseError {
                file: file.clone(),
                line: idx + 1,
                reason: e.to_string(),
            })?;

        histories
            .entry(parsed.user_id)
            .or_default()
            .push(parsed.record);
    }

    Ok(histories)
}

/// Either shape a single user's history export can take
#[derive(Deserialize)]
#[serde(untagged)]
enum HistoryExport {
    Records(Vec<WatchRecord>),
    Document {
        #[serde(default)]
        history: Vec<WatchRecord>,
    },
}

/// Parse one user's history export.
pub fn parse_history_records(path: &Path) -> Result<Vec<WatchRecord>> {
    let export: HistoryExport = parse_document(path)?;
    Ok(match export {
        HistoryExport::Records(records) => records,
        HistoryExport::Document { history } => history,
    })
}
