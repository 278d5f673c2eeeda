//! Sweep transaction assembly.

use std::collections::HashSet;

use bitcoin::{
    absolute::LockTime, sighash::SighashCache, transaction::Version, Amount, OutPoint, ScriptBuf,
    Sequence, Transaction, TxIn, TxOut, Witness,
};
use straypool_db::StrayInputRecord;
use straypool_primitives::SpendableOutput;

use crate::{
    config::PoolConfig,
    errors::{PoolError, PoolResult, SanityError},
};

/// Confirmation horizon targeted by sweep transactions.
pub const SWEEP_CONF_TARGET: u32 = 2;

/// Builds the fully witnessed sweep over `records`, paying `sweep_script`.
///
/// Each record is charged its own fee, the current rate times the virtual
/// size stored with it; the output holds the sum of record totals net of
/// those fees. Witnesses are built only after the complete input set has
/// been appended, through one sighash cache shared across all inputs, so
/// every digest commits to every outpoint.
pub(crate) fn gen_sweep_tx(
    cfg: &PoolConfig,
    sweep_script: ScriptBuf,
    records: &[StrayInputRecord],
) -> PoolResult<Transaction> {
    let fee_rate = cfg
        .estimator
        .estimate_fee_per_vsize(SWEEP_CONF_TARGET)
        .map_err(PoolError::Estimator)?;

    let mut txn = Transaction {
        version: Version(2),
        lock_time: LockTime::ZERO,
        input: Vec::new(),
        output: Vec::new(),
    };

    let mut total_amt: i64 = 0;
    let mut all_inputs: Vec<&SpendableOutput> = Vec::new();
    for record in records {
        let record_fee = fee_rate.fee_for_vsize(record.tx_virtual_size());
        total_amt += record.total_amount().to_sat() - record_fee.to_sat();

        for input in record.inputs() {
            txn.input.push(make_txin(input.outpoint()));
            all_inputs.push(input);
        }
    }

    if total_amt < 0 {
        return Err(PoolError::NegativeSweepValue(total_amt));
    }

    let mut witnesses = Vec::with_capacity(all_inputs.len());
    {
        let mut cache = SighashCache::new(&txn);
        for (input_index, input) in all_inputs.iter().enumerate() {
            witnesses.push(input.build_witness(cfg.signer.as_ref(), &mut cache, input_index)?);
        }
    }
    for (txin, witness) in txn.input.iter_mut().zip(witnesses) {
        txin.witness = witness;
    }

    txn.output.push(TxOut {
        value: Amount::from_sat(total_amt as u64),
        script_pubkey: sweep_script,
    });

    check_sweep_sanity(&txn)?;
    Ok(txn)
}

fn make_txin(outpoint: OutPoint) -> TxIn {
    TxIn {
        previous_output: outpoint,
        script_sig: ScriptBuf::new(),
        sequence: Sequence::MAX,
        witness: Witness::new(),
    }
}

/// Structural checks every sweep must pass before leaving the builder.
pub(crate) fn check_sweep_sanity(tx: &Transaction) -> Result<(), SanityError> {
    if tx.input.is_empty() {
        return Err(SanityError::NoInputs);
    }
    if tx.output.is_empty() {
        return Err(SanityError::NoOutputs);
    }

    let mut total = Amount::ZERO;
    for output in &tx.output {
        if output.value > Amount::MAX_MONEY {
            return Err(SanityError::ValueOverMax {
                value: output.value,
                max: Amount::MAX_MONEY,
            });
        }
        total = total
            .checked_add(output.value)
            .filter(|sum| *sum <= Amount::MAX_MONEY)
            .ok_or(SanityError::ValueOverMax {
                value: output.value,
                max: Amount::MAX_MONEY,
            })?;
    }

    let mut seen = HashSet::with_capacity(tx.input.len());
    for input in &tx.input {
        if !seen.insert(input.previous_output) {
            return Err(SanityError::DuplicateInput(input.previous_output));
        }
    }

    Ok(())
}
