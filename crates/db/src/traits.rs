//! Interface the pool persists records through.

use crate::{errors::DbResult, types::StrayInputRecord};

/// Append-only store of stray input records.
///
/// Records are keyed by a store-assigned id. Implementations must allocate
/// the id atomically with the write, so concurrent appends never observe the
/// same key, and enumeration must return records in insertion order.
pub trait StrayInputDatabase: Send + Sync + 'static {
    /// Persists a record and returns its assigned id.
    fn put_stray_input(&self, record: &StrayInputRecord) -> DbResult<u64>;

    /// Returns every stored record with its id, in insertion order.
    ///
    /// Fails with [`crate::errors::DbError::NoStrayInputs`] if the store has
    /// never held a record; a store that was emptied by deletion returns an
    /// empty vec instead.
    fn get_all_stray_inputs(&self) -> DbResult<Vec<(u64, StrayInputRecord)>>;

    /// Removes the given record ids in one atomic batch.
    ///
    /// Ids with no stored record are skipped.
    fn del_stray_inputs(&self, ids: &[u64]) -> DbResult<()>;
}
