//! Disk-backed pool facade.

use bitcoin::Transaction;
use parking_lot::Mutex;
use straypool_db::StrayInputRecord;
use straypool_primitives::SpendableOutput;
use tracing::*;

use crate::{
    config::PoolConfig,
    errors::{PoolError, PoolResult},
    sweep,
    traits::StrayOutputsPool,
};

/// Stray output pool persisting records through the configured store.
#[derive(Debug)]
pub struct DiskStrayOutputsPool {
    cfg: PoolConfig,
    // Overlapping sweeps would double-spend the same pooled inputs; the
    // whole broadcast-then-delete sequence runs under this guard.
    sweep_lock: Mutex<()>,
}

impl DiskStrayOutputsPool {
    /// Creates a pool over the given collaborators.
    pub fn new(cfg: PoolConfig) -> Self {
        Self {
            cfg,
            sweep_lock: Mutex::new(()),
        }
    }

    /// Builds the sweep and reports which record ids it consumes.
    fn gen_sweep_with_ids(&self) -> PoolResult<(Transaction, Vec<u64>)> {
        let sweep_script = self
            .cfg
            .sweep_script_gen
            .gen_sweep_script()
            .map_err(PoolError::ScriptGen)?;

        let entries = self.cfg.db.get_all_stray_inputs()?;
        let (ids, records): (Vec<u64>, Vec<StrayInputRecord>) = entries.into_iter().unzip();

        let txn = sweep::gen_sweep_tx(&self.cfg, sweep_script, &records)?;
        debug!(
            records = records.len(),
            inputs = txn.input.len(),
            "generated stray sweep transaction"
        );
        Ok((txn, ids))
    }
}

impl StrayOutputsPool for DiskStrayOutputsPool {
    fn add_inputs(&self, tx_vsize: i64, outputs: Vec<SpendableOutput>) -> PoolResult<()> {
        let record = StrayInputRecord::new(tx_vsize, outputs);
        let id = self.cfg.db.put_stray_input(&record)?;

        debug!(
            id,
            tx_vsize,
            inputs = record.inputs().len(),
            total_amount = record.total_amount().to_sat(),
            "pooled stray inputs"
        );
        Ok(())
    }

    fn add_spendable_output(&self, output: SpendableOutput) -> PoolResult<()> {
        let tx_vsize = output.witness_type().standalone_vsize();
        self.add_inputs(tx_vsize, vec![output])
    }

    fn gen_sweep_tx(&self) -> PoolResult<Transaction> {
        self.gen_sweep_with_ids().map(|(txn, _)| txn)
    }

    fn sweep(&self) -> PoolResult<()> {
        let _guard = self.sweep_lock.lock();

        let (txn, ids) = self.gen_sweep_with_ids()?;
        let txid = txn.compute_txid();

        self.cfg
            .broadcaster
            .publish_transaction(&txn)
            .map_err(PoolError::Broadcast)?;
        info!(%txid, records = ids.len(), "broadcast stray sweep transaction");

        // The inputs are spent now; retire their records before anything
        // else can pick them up again.
        self.cfg.db.del_stray_inputs(&ids)?;
        debug!(records = ids.len(), "cleared swept stray input records");

        self.cfg
            .notifier
            .register_confirmation(txid, 1)
            .map_err(PoolError::Notifier)?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use bitcoin::{
        hashes::Hash, Amount, EcdsaSighashType, OutPoint, ScriptBuf, TxOut, WPubkeyHash,
    };
    use secp256k1::{PublicKey, SecretKey, SECP256K1};
    use straypool_db::{stubs::StubStrayInputDb, DbError, StrayInputDatabase};
    use straypool_primitives::{
        test_utils::{test_seckey, test_spendable_output, test_txid},
        SignDescriptor, SpendableOutput, WitnessType,
    };

    use super::*;
    use crate::{
        errors::SanityError,
        test_utils::{
            MockBroadcaster, MockNotifier, MockSigner, StaticFeeEstimator, StaticSweepScriptGen,
        },
    };

    struct Harness {
        pool: DiskStrayOutputsPool,
        db: Arc<StubStrayInputDb>,
        broadcaster: Arc<MockBroadcaster>,
        notifier: Arc<MockNotifier>,
    }

    fn harness_with(
        sat_per_vbyte: i64,
        broadcaster: MockBroadcaster,
        keys: Vec<SecretKey>,
    ) -> Harness {
        let db = Arc::new(StubStrayInputDb::new());
        let broadcaster = Arc::new(broadcaster);
        let notifier = Arc::new(MockNotifier::new());
        let script = ScriptBuf::new_p2wpkh(&WPubkeyHash::hash(&[0x55; 33]));

        let pool = DiskStrayOutputsPool::new(PoolConfig {
            db: db.clone(),
            estimator: Arc::new(StaticFeeEstimator::new(sat_per_vbyte)),
            sweep_script_gen: Arc::new(StaticSweepScriptGen::new(script)),
            notifier: notifier.clone(),
            broadcaster: broadcaster.clone(),
            signer: Arc::new(MockSigner::new(keys)),
        });

        Harness {
            pool,
            db,
            broadcaster,
            notifier,
        }
    }

    fn harness(sat_per_vbyte: i64) -> Harness {
        harness_with(sat_per_vbyte, MockBroadcaster::new(), vec![test_seckey()])
    }

    fn fill_pool(pool: &DiskStrayOutputsPool) {
        pool.add_inputs(
            10,
            vec![
                test_spendable_output(100, WitnessType::CommitmentTimeLock, 0),
                test_spendable_output(101, WitnessType::CommitmentNoDelay, 1),
            ],
        )
        .unwrap();
        pool.add_inputs(
            5,
            vec![test_spendable_output(50, WitnessType::CommitmentRevoke, 2)],
        )
        .unwrap();
    }

    #[test]
    fn test_gen_sweep_tx_over_persisted_records() {
        let h = harness(2);
        fill_pool(&h.pool);

        let txn = h.pool.gen_sweep_tx().unwrap();

        assert_eq!(txn.input.len(), 3);
        assert_eq!(txn.output[0].value, Amount::from_sat(221));
        // Generation alone must not consume the records.
        assert_eq!(h.db.get_all_stray_inputs().unwrap().len(), 2);
        assert!(h.broadcaster.published().is_empty());
    }

    #[test]
    fn test_gen_sweep_tx_on_fresh_pool_reports_store_error() {
        let h = harness(2);

        let err = h.pool.gen_sweep_tx().unwrap_err();
        assert!(matches!(err, PoolError::Db(DbError::NoStrayInputs)), "got {err:?}");
    }

    #[test]
    fn test_add_spendable_output_derives_standalone_vsize() {
        let h = harness(0);
        h.pool
            .add_spendable_output(test_spendable_output(100, WitnessType::CommitmentNoDelay, 0))
            .unwrap();

        let records = h.db.get_all_stray_inputs().unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].1.tx_virtual_size(), 160);
        assert_eq!(
            h.db.get_all_stray_inputs().unwrap()[0].1.total_amount().to_sat(),
            100
        );
    }

    #[test]
    fn test_sweep_broadcasts_retires_and_watches() {
        let h = harness(2);
        fill_pool(&h.pool);

        h.pool.sweep().unwrap();

        let published = h.broadcaster.published();
        assert_eq!(published.len(), 1);
        assert_eq!(published[0].output[0].value, Amount::from_sat(221));

        // Swept records are gone, but the store stays initialized.
        assert_eq!(h.db.get_all_stray_inputs().unwrap(), Vec::new());

        let watched = h.notifier.watched();
        assert_eq!(watched, vec![(published[0].compute_txid(), 1)]);
    }

    #[test]
    fn test_second_sweep_finds_nothing_to_spend() {
        let h = harness(2);
        fill_pool(&h.pool);
        h.pool.sweep().unwrap();

        let err = h.pool.sweep().unwrap_err();
        assert!(matches!(err, PoolError::Sanity(SanityError::NoInputs)), "got {err:?}");
        assert_eq!(h.broadcaster.published().len(), 1);
    }

    #[test]
    fn test_failed_broadcast_keeps_records_pooled() {
        let h = harness_with(2, MockBroadcaster::failing(), vec![test_seckey()]);
        fill_pool(&h.pool);

        let err = h.pool.sweep().unwrap_err();
        assert!(matches!(err, PoolError::Broadcast(_)), "got {err:?}");

        assert_eq!(h.db.get_all_stray_inputs().unwrap().len(), 2);
        assert!(h.notifier.watched().is_empty());
    }

    /// No-delay output paying directly to `key`, no tweak.
    fn output_for_key(key: &SecretKey, amount: u64, vout: u32) -> SpendableOutput {
        let pubkey = PublicKey::from_secret_key(SECP256K1, key);
        let value = Amount::from_sat(amount);
        SpendableOutput::new(
            WitnessType::CommitmentNoDelay,
            value,
            OutPoint::new(test_txid(), vout),
            SignDescriptor {
                pubkey,
                single_tweak: None,
                double_tweak: None,
                witness_script: ScriptBuf::new(),
                output: TxOut {
                    value,
                    script_pubkey: ScriptBuf::new_p2wpkh(&WPubkeyHash::hash(&pubkey.serialize())),
                },
                hash_type: EcdsaSighashType::All,
            },
        )
    }

    #[test]
    fn test_sweep_signs_each_input_with_its_descriptor_key() {
        let funding_key = SecretKey::from_slice(
            &hex::decode("30ff4956bbdd3222d44cc5e8a1261dab1e07957bdac5ae88fe3261ef321f3749")
                .unwrap(),
        )
        .unwrap();
        let payment_key = SecretKey::from_slice(
            &hex::decode("bb13b121cdc357cd2e608b0aea294afca36e2b34cf958e2e6451a2f274694491")
                .unwrap(),
        )
        .unwrap();

        let h = harness_with(0, MockBroadcaster::new(), vec![funding_key, payment_key]);
        h.pool
            .add_inputs(
                320,
                vec![
                    output_for_key(&funding_key, 1_000, 0),
                    output_for_key(&payment_key, 2_000, 1),
                ],
            )
            .unwrap();

        let txn = h.pool.gen_sweep_tx().unwrap();

        for (txin, key) in txn.input.iter().zip([&funding_key, &payment_key]) {
            let elements = txin.witness.to_vec();
            assert_eq!(elements.len(), 2);
            let expected = PublicKey::from_secret_key(SECP256K1, key);
            assert_eq!(elements[1], expected.serialize());
        }
        assert_eq!(txn.output[0].value, Amount::from_sat(3_000));
    }
}
