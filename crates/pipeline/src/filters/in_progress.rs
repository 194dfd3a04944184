//! Filter for movies the user started but hasn't finished.

use crate::traits::Filter;
use data_loader::WatchRecord;

/// Progress at or above this percentage counts as finished
pub const FINISHED_THRESHOLD: f32 = 90.0;

/// Keeps records that can be resumed.
///
/// A record is in progress when progress is known and strictly between
/// 0 and `FINISHED_THRESHOLD`, and the runtime is known and non-zero
/// (otherwise there is nothing to compute time remaining from).
pub struct InProgressFilter;

impl Filter for InProgressFilter {
    fn name(&self) -> &str {
        "InProgressFilter"
    }

    fn matches(&self, record: &WatchRecord) -> bool {
        let started = record
            .progress
            .is_some_and(|p| p > 0.0 && p < FINISHED_THRESHOLD);
        started && record.runtime.is_some_and(|r| r > 0)
    }
}
