//! Recording collaborators for pool tests.

use std::collections::HashMap;

use anyhow::anyhow;
use bitcoin::{ScriptBuf, Transaction, Txid};
use parking_lot::Mutex;
use secp256k1::{ecdsa::Signature, Message, PublicKey, SecretKey, SECP256K1};
use straypool_primitives::{
    tweak::{derive_revocation_privkey, tweak_privkey},
    OutputSigner, SatPerVByte, SignDescriptor, SignerError,
};

use crate::traits::{ChainNotifier, FeeEstimator, SweepScriptGen, TxBroadcaster};

/// Estimator returning one fixed rate for every confirmation target.
#[derive(Debug, Clone, Copy)]
pub struct StaticFeeEstimator {
    pub fee_rate: SatPerVByte,
}

impl StaticFeeEstimator {
    /// Estimator pinned at `sat_per_vbyte`.
    pub fn new(sat_per_vbyte: i64) -> Self {
        Self {
            fee_rate: SatPerVByte::from_sat_per_vbyte(sat_per_vbyte),
        }
    }
}

impl FeeEstimator for StaticFeeEstimator {
    fn estimate_fee_per_vsize(&self, _conf_target: u32) -> anyhow::Result<SatPerVByte> {
        Ok(self.fee_rate)
    }
}

/// Signer over a set of raw keys, applying descriptor tweaks before
/// signing.
#[derive(Debug)]
pub struct MockSigner {
    keys: HashMap<PublicKey, SecretKey>,
}

impl MockSigner {
    /// Signer knowing the given keys, looked up by their public halves.
    pub fn new(keys: impl IntoIterator<Item = SecretKey>) -> Self {
        let keys = keys
            .into_iter()
            .map(|key| (PublicKey::from_secret_key(SECP256K1, &key), key))
            .collect();
        Self { keys }
    }
}

impl OutputSigner for MockSigner {
    fn sign_output_raw(
        &self,
        sign_desc: &SignDescriptor,
        sighash: Message,
    ) -> Result<Signature, SignerError> {
        let base = *self
            .keys
            .get(&sign_desc.pubkey)
            .ok_or(SignerError::UnknownKey)?;

        let key = if let Some(tweak) = sign_desc.single_tweak.as_deref() {
            tweak_privkey(SECP256K1, &base, tweak)?
        } else if let Some(commit_secret) = &sign_desc.double_tweak {
            derive_revocation_privkey(SECP256K1, &base, commit_secret)?
        } else {
            base
        };

        Ok(SECP256K1.sign_ecdsa(&sighash, &key))
    }
}

/// Broadcaster recording published transactions, optionally rejecting them.
#[derive(Debug, Default)]
pub struct MockBroadcaster {
    published: Mutex<Vec<Transaction>>,
    fail: bool,
}

impl MockBroadcaster {
    pub fn new() -> Self {
        Self::default()
    }

    /// Broadcaster that rejects every publish.
    pub fn failing() -> Self {
        Self {
            published: Mutex::new(Vec::new()),
            fail: true,
        }
    }

    /// Transactions published so far.
    pub fn published(&self) -> Vec<Transaction> {
        self.published.lock().clone()
    }
}

impl TxBroadcaster for MockBroadcaster {
    fn publish_transaction(&self, tx: &Transaction) -> anyhow::Result<()> {
        if self.fail {
            return Err(anyhow!("broadcast rejected"));
        }
        self.published.lock().push(tx.clone());
        Ok(())
    }
}

/// Notifier recording confirmation subscriptions.
#[derive(Debug, Default)]
pub struct MockNotifier {
    watched: Mutex<Vec<(Txid, u32)>>,
}

impl MockNotifier {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registered `(txid, num_confs)` pairs, in registration order.
    pub fn watched(&self) -> Vec<(Txid, u32)> {
        self.watched.lock().clone()
    }
}

impl ChainNotifier for MockNotifier {
    fn register_confirmation(&self, txid: Txid, num_confs: u32) -> anyhow::Result<()> {
        self.watched.lock().push((txid, num_confs));
        Ok(())
    }
}

/// Script generator returning one fixed script.
#[derive(Debug, Clone)]
pub struct StaticSweepScriptGen {
    script: ScriptBuf,
}

impl StaticSweepScriptGen {
    /// Generator pinned to `script`.
    pub fn new(script: ScriptBuf) -> Self {
        Self { script }
    }
}

impl SweepScriptGen for StaticSweepScriptGen {
    fn gen_sweep_script(&self) -> anyhow::Result<ScriptBuf> {
        Ok(self.script.clone())
    }
}
