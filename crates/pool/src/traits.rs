//! Capability interfaces the pool is wired up from.

use bitcoin::{ScriptBuf, Transaction, Txid};
use straypool_primitives::{SatPerVByte, SpendableOutput};

use crate::errors::PoolResult;

/// Fee estimation capability.
pub trait FeeEstimator: Send + Sync {
    /// Fee rate expected to confirm a transaction within `conf_target`
    /// blocks.
    fn estimate_fee_per_vsize(&self, conf_target: u32) -> anyhow::Result<SatPerVByte>;
}

/// Produces the destination scripts sweeps pay to.
pub trait SweepScriptGen: Send + Sync {
    /// Returns a wallet script for the sweep output.
    fn gen_sweep_script(&self) -> anyhow::Result<ScriptBuf>;
}

/// Hands finished transactions to the network layer.
pub trait TxBroadcaster: Send + Sync {
    /// Publishes `tx` to the network.
    fn publish_transaction(&self, tx: &Transaction) -> anyhow::Result<()>;
}

/// Chain event subscription capability.
pub trait ChainNotifier: Send + Sync {
    /// Requests a notification once `txid` reaches `num_confs`
    /// confirmations.
    fn register_confirmation(&self, txid: Txid, num_confs: u32) -> anyhow::Result<()>;
}

/// The stray output pool surface.
pub trait StrayOutputsPool: Send + Sync {
    /// Persists `outputs` as one stray input record.
    ///
    /// `tx_vsize` is the caller's virtual-size estimate for sweeping the
    /// batch; the decision that these outputs belong in the pool has already
    /// been made.
    fn add_inputs(&self, tx_vsize: i64, outputs: Vec<SpendableOutput>) -> PoolResult<()>;

    /// Pools a single output, deriving the virtual-size estimate from its
    /// witness type.
    fn add_spendable_output(&self, output: SpendableOutput) -> PoolResult<()>;

    /// Builds the fully signed sweep transaction over every pooled record.
    fn gen_sweep_tx(&self) -> PoolResult<Transaction>;

    /// Builds and broadcasts a sweep of the whole pool, then retires the
    /// swept records.
    fn sweep(&self) -> PoolResult<()>;
}
