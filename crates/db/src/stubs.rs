//! In-memory stand-in for the stray input store.

use std::collections::BTreeMap;

use parking_lot::Mutex;

use crate::{
    errors::{DbError, DbResult},
    traits::StrayInputDatabase,
    types::StrayInputRecord,
};

/// Stray input store holding everything in memory.
///
/// The backing map is created lazily on the first append, so a fresh stub
/// reports [`crate::errors::DbError::NoStrayInputs`] exactly like a durable
/// store that was never written to.
#[derive(Debug, Default)]
pub struct StubStrayInputDb {
    records: Mutex<Option<BTreeMap<u64, StrayInputRecord>>>,
}

impl StubStrayInputDb {
    /// Creates an uninitialized stub.
    pub fn new() -> Self {
        Self::default()
    }
}

impl StrayInputDatabase for StubStrayInputDb {
    fn put_stray_input(&self, record: &StrayInputRecord) -> DbResult<u64> {
        let mut guard = self.records.lock();
        let records = guard.get_or_insert_with(BTreeMap::new);
        let id = records.last_key_value().map(|(k, _)| k + 1).unwrap_or(0);
        records.insert(id, record.clone());
        Ok(id)
    }

    fn get_all_stray_inputs(&self) -> DbResult<Vec<(u64, StrayInputRecord)>> {
        let guard = self.records.lock();
        let records = guard.as_ref().ok_or(DbError::NoStrayInputs)?;
        Ok(records
            .iter()
            .map(|(id, record)| (*id, record.clone()))
            .collect())
    }

    fn del_stray_inputs(&self, ids: &[u64]) -> DbResult<()> {
        let mut guard = self.records.lock();
        if let Some(records) = guard.as_mut() {
            for id in ids {
                records.remove(id);
            }
        }
        Ok(())
    }
}
