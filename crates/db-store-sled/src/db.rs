//! Sled-backed stray input store.

use sled::{transaction::TransactionError, Batch};
use straypool_db::{
    errors::{DbError, DbResult},
    traits::StrayInputDatabase,
    types::StrayInputRecord,
};

/// Tree holding serialized stray input records.
const STRAY_INPUT_TREE: &str = "stray-input";

/// Stray input store on a sled database.
///
/// Records are keyed by 8-byte big-endian ids. The tree is only created on
/// the first append, so enumeration can tell a never-written store apart
/// from one that was emptied.
#[derive(Debug)]
pub struct StrayInputDBSled {
    db: sled::Db,
}

impl StrayInputDBSled {
    /// Wraps an open sled database.
    pub fn new(db: sled::Db) -> Self {
        Self { db }
    }

    fn tree_exists(&self) -> bool {
        self.db
            .tree_names()
            .iter()
            .any(|name| name.as_ref() == STRAY_INPUT_TREE.as_bytes())
    }

    fn open_tree(&self) -> DbResult<sled::Tree> {
        self.db.open_tree(STRAY_INPUT_TREE).map_err(io_err)
    }
}

fn io_err(err: sled::Error) -> DbError {
    DbError::IoError(err.to_string())
}

fn tx_err(err: TransactionError<()>) -> DbError {
    match err {
        TransactionError::Abort(()) => DbError::TransactionError("aborted".to_string()),
        TransactionError::Storage(err) => DbError::TransactionError(err.to_string()),
    }
}

fn key_for(id: u64) -> [u8; 8] {
    id.to_be_bytes()
}

fn id_from_key(key: &[u8]) -> DbResult<u64> {
    let bytes: [u8; 8] = key
        .try_into()
        .map_err(|_| DbError::Other(format!("stray input key of length {}", key.len())))?;
    Ok(u64::from_be_bytes(bytes))
}

impl StrayInputDatabase for StrayInputDBSled {
    fn put_stray_input(&self, record: &StrayInputRecord) -> DbResult<u64> {
        let tree = self.open_tree()?;
        let raw = record.to_vec();

        // One past the current last key is only a hint; the transaction
        // probes forward in case a concurrent append claims the slot first.
        let next_id = match tree.last().map_err(io_err)? {
            Some((key, _)) => id_from_key(&key)? + 1,
            None => 0,
        };

        let res: sled::transaction::TransactionResult<u64, ()> = tree.transaction(|t| {
            let mut id = next_id;
            while t.get(key_for(id))?.is_some() {
                id += 1;
            }
            t.insert(&key_for(id)[..], raw.as_slice())?;
            Ok(id)
        });
        let id = res.map_err(tx_err)?;

        tree.flush().map_err(io_err)?;
        Ok(id)
    }

    fn get_all_stray_inputs(&self) -> DbResult<Vec<(u64, StrayInputRecord)>> {
        // Probe the tree name list instead of opening, so a read never
        // creates the tree.
        if !self.tree_exists() {
            return Err(DbError::NoStrayInputs);
        }
        let tree = self.open_tree()?;

        let mut records = Vec::new();
        for entry in tree.iter() {
            let (key, value) = entry.map_err(io_err)?;
            let record = StrayInputRecord::from_slice(&value)?;
            records.push((id_from_key(&key)?, record));
        }
        Ok(records)
    }

    fn del_stray_inputs(&self, ids: &[u64]) -> DbResult<()> {
        if ids.is_empty() || !self.tree_exists() {
            return Ok(());
        }
        let tree = self.open_tree()?;

        let mut batch = Batch::default();
        for id in ids {
            batch.remove(&key_for(*id)[..]);
        }
        tree.apply_batch(batch).map_err(io_err)?;
        tree.flush().map_err(io_err)?;
        Ok(())
    }
}
