//! Economic gating of candidate outputs.

use straypool_primitives::{SatPerVByte, SpendableOutput};
use tracing::*;

use crate::{errors::PoolResult, traits::StrayOutputsPool};

/// Confirmation horizon used when pricing a standalone spend of a candidate
/// output.
pub const STRAY_CONF_TARGET: u32 = 6;

/// Redirects `output` into the pool when it cannot pay for its own spend.
///
/// The standalone spend cost is `fee_rate` times the virtual size of a
/// one-input sweep for the output's witness type. An output worth no more
/// than that cost is handed to the pool; anything richer is left on the
/// caller's normal spend path.
pub fn cut_stray_input(
    pool: &dyn StrayOutputsPool,
    fee_rate: SatPerVByte,
    output: SpendableOutput,
) -> PoolResult<()> {
    let cost = fee_rate.fee_for_vsize(output.witness_type().standalone_vsize());
    if output.amount().to_sat() as i64 > cost.to_sat() {
        return Ok(());
    }

    debug!(
        amount = output.amount().to_sat(),
        standalone_cost = cost.to_sat(),
        witness_type = ?output.witness_type(),
        "pooling stray output"
    );
    pool.add_spendable_output(output)
}
