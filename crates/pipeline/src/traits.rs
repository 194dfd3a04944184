//! Core traits for the filtering pipeline.
//!
//! This module defines the Filter trait that allows composable,
//! extensible filters to be applied to a watch history.

use data_loader::WatchRecord;

/// Core trait for filtering watch records.
///
/// All filters must implement this trait to be used in the FilterPipeline.
///
/// ## Design Note
/// - `Send + Sync` allows filters to be used in concurrent contexts
/// - A filter only decides per record; `apply` takes ownership of the
///   Vec and keeps the matching records in their original order
/// - Filters never fail: a record missing the field a filter looks at
///   simply doesn't match
pub trait Filter: Send + Sync {
    /// Returns the name of this filter (for logging/debugging)
    fn name(&self) -> &str;

    /// Whether a single record passes this filter.
    fn matches(&self, record: &WatchRecord) -> bool;

    /// Apply this filter to a set of records.
    ///
    /// # Arguments
    /// * `records` - The records to filter (takes ownership)
    ///
    /// # Returns
    /// The records that match, in input order
    fn apply(&self, records: Vec<WatchRecord>) -> Vec<WatchRecord> {
        records.into_iter().filter(|r| self.matches(r)).collect()
    }
}
