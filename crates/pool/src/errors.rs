//! Error types for pool operations.

use bitcoin::{Amount, OutPoint};
use straypool_db::DbError;
use straypool_primitives::SignerError;
use thiserror::Error;

/// Structural defect in a built sweep transaction.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum SanityError {
    /// The transaction spends nothing.
    #[error("transaction has no inputs")]
    NoInputs,

    /// The transaction pays nobody.
    #[error("transaction has no outputs")]
    NoOutputs,

    /// The same outpoint appears in two inputs.
    #[error("duplicate input outpoint {0}")]
    DuplicateInput(OutPoint),

    /// An output value, or the sum of them, exceeds the money supply.
    #[error("output value {value} over maximum {max}")]
    ValueOverMax { value: Amount, max: Amount },
}

/// Errors surfaced by pool operations.
#[derive(Debug, Error)]
pub enum PoolError {
    /// Stray input store failure.
    #[error("stray input store: {0}")]
    Db(#[from] DbError),

    /// The fee estimator collaborator failed.
    #[error("estimating fee rate: {0}")]
    Estimator(#[source] anyhow::Error),

    /// The sweep script generator collaborator failed.
    #[error("generating sweep script: {0}")]
    ScriptGen(#[source] anyhow::Error),

    /// Witness construction failed.
    #[error("building witness: {0}")]
    Signer(#[from] SignerError),

    /// The broadcaster collaborator rejected the sweep.
    #[error("publishing sweep transaction: {0}")]
    Broadcast(#[source] anyhow::Error),

    /// The chain notifier collaborator failed after broadcast.
    #[error("registering confirmation watch: {0}")]
    Notifier(#[source] anyhow::Error),

    /// Fees charged against the pooled records exceeded their value.
    #[error("sweep output would hold {0} sat after fees")]
    NegativeSweepValue(i64),

    /// The built transaction failed its structural check.
    #[error(transparent)]
    Sanity(#[from] SanityError),
}

pub type PoolResult<T> = Result<T, PoolError>;
