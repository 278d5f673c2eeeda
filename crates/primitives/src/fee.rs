//! Fee rate type shared by the economic gate and the sweep builder.

use bitcoin::SignedAmount;

/// Fee rate in satoshis per virtual byte.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct SatPerVByte(i64);

impl SatPerVByte {
    /// Creates a rate from a satoshis-per-vbyte figure.
    pub const fn from_sat_per_vbyte(rate: i64) -> Self {
        Self(rate)
    }

    /// Returns the rate in satoshis per vbyte.
    pub const fn to_sat_per_vbyte(self) -> i64 {
        self.0
    }

    /// Fee owed for a spend of `vsize` virtual bytes at this rate.
    pub fn fee_for_vsize(self, vsize: i64) -> SignedAmount {
        SignedAmount::from_sat(self.0.saturating_mul(vsize))
    }
}
