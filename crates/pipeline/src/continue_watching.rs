//! The "continue watching" row: movies started but not finished.

use crate::filters::InProgressFilter;
use crate::sort::{SortBy, SortOrder, sort_history};
use crate::traits::Filter;
use data_loader::WatchRecord;

/// How many in-progress movies the row shows by default
pub const DEFAULT_LIMIT: usize = 5;

/// In-progress records, most recently watched first, at most `limit`.
pub fn continue_watching(records: &[WatchRecord], limit: usize) -> Vec<WatchRecord> {
    let in_progress = InProgressFilter.apply(records.to_vec());
    let mut recent = sort_history(&in_progress, SortBy::Date, SortOrder::Desc);
    recent.truncate(limit);
    recent
}
