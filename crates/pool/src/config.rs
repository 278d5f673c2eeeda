//! Pool collaborator wiring.

use std::{fmt, sync::Arc};

use straypool_db::StrayInputDatabase;
use straypool_primitives::OutputSigner;

use crate::traits::{ChainNotifier, FeeEstimator, SweepScriptGen, TxBroadcaster};

/// Bundle of collaborator handles backing one pool instance.
#[derive(Clone)]
pub struct PoolConfig {
    /// Store holding the pooled records.
    pub db: Arc<dyn StrayInputDatabase>,

    /// Fee source for sweep construction.
    pub estimator: Arc<dyn FeeEstimator>,

    /// Produces the wallet scripts swept funds return to.
    pub sweep_script_gen: Arc<dyn SweepScriptGen>,

    /// Watches sweep transactions for confirmations.
    pub notifier: Arc<dyn ChainNotifier>,

    /// Publishes finished sweeps to the network.
    pub broadcaster: Arc<dyn TxBroadcaster>,

    /// Signs the pooled outputs being swept.
    pub signer: Arc<dyn OutputSigner>,
}

impl fmt::Debug for PoolConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PoolConfig").finish_non_exhaustive()
    }
}
