//! Stray input records and their durable encoding.

use bitcoin::{hashes::Hash, Amount, OutPoint, SignedAmount, Txid};
use straypool_primitives::{
    codec::{
        read_exact, read_u16, read_u32, read_u64, write_u16, write_u32, write_u64, CodecError,
        CodecResult,
    },
    sign_descriptor::{read_sign_descriptor, write_sign_descriptor},
    SpendableOutput, WitnessType,
};

/// A batch of pooled outputs persisted as one unit.
///
/// `tx_virtual_size` is the caller's virtual-size estimate for sweeping the
/// batch and is stored as given, never re-derived. `total_amount` always
/// equals the sum of the input amounts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StrayInputRecord {
    tx_virtual_size: i64,
    total_amount: SignedAmount,
    inputs: Vec<SpendableOutput>,
}

impl StrayInputRecord {
    /// Builds a record over `inputs`, summing their amounts.
    pub fn new(tx_virtual_size: i64, inputs: Vec<SpendableOutput>) -> Self {
        let total = inputs
            .iter()
            .map(|input| input.amount().to_sat() as i64)
            .sum();
        Self {
            tx_virtual_size,
            total_amount: SignedAmount::from_sat(total),
            inputs,
        }
    }

    /// Virtual-size estimate for sweeping this batch.
    pub fn tx_virtual_size(&self) -> i64 {
        self.tx_virtual_size
    }

    /// Sum of the input amounts.
    pub fn total_amount(&self) -> SignedAmount {
        self.total_amount
    }

    /// The pooled outputs themselves.
    pub fn inputs(&self) -> &[SpendableOutput] {
        &self.inputs
    }

    /// Serializes the record.
    ///
    /// Layout: 8-byte virtual size and 8-byte total amount, then one entry
    /// per input holding its 8-byte amount, 32-byte txid in internal byte
    /// order, 4-byte output index, 2-byte witness type tag, and sign
    /// descriptor. Integers are big-endian.
    pub fn to_vec(&self) -> Vec<u8> {
        let mut out = Vec::new();
        write_u64(&mut out, self.tx_virtual_size as u64);
        write_u64(&mut out, self.total_amount.to_sat() as u64);
        for input in &self.inputs {
            write_u64(&mut out, input.amount().to_sat());
            let outpoint = input.outpoint();
            out.extend_from_slice(&outpoint.txid.to_byte_array());
            write_u32(&mut out, outpoint.vout);
            write_u16(&mut out, input.witness_type().to_u16());
            write_sign_descriptor(&mut out, input.sign_desc());
        }
        out
    }

    /// Decodes a record, consuming input entries until `data` is exhausted.
    ///
    /// Running out exactly at an entry boundary ends the record; running out
    /// inside any field is an error.
    pub fn from_slice(mut data: &[u8]) -> CodecResult<Self> {
        let data = &mut data;
        let tx_virtual_size = read_u64(data)? as i64;
        let total_amount = SignedAmount::from_sat(read_u64(data)? as i64);

        let mut inputs = Vec::new();
        while !data.is_empty() {
            let amount = Amount::from_sat(read_u64(data)?);
            let txid = Txid::from_byte_array(read_exact::<32>(data)?);
            let vout = read_u32(data)?;
            let witness_type = WitnessType::from_u16(read_u16(data)?)
                .ok_or(CodecError::InvalidVariant("witness type"))?;
            let sign_desc = read_sign_descriptor(data)?;
            inputs.push(SpendableOutput::new(
                witness_type,
                amount,
                OutPoint::new(txid, vout),
                sign_desc,
            ));
        }

        Ok(Self {
            tx_virtual_size,
            total_amount,
            inputs,
        })
    }
}

#[cfg(test)]
mod tests {
    use proptest::prelude::*;
    use straypool_primitives::test_utils::{test_spendable_output, TEST_TXID_BYTES};

    use super::*;

    fn two_input_record() -> StrayInputRecord {
        StrayInputRecord::new(
            10,
            vec![
                test_spendable_output(100, WitnessType::CommitmentTimeLock, 0),
                test_spendable_output(101, WitnessType::CommitmentTimeLock, 1),
            ],
        )
    }

    #[test]
    fn test_new_sums_input_amounts() {
        let record = two_input_record();
        assert_eq!(record.total_amount(), SignedAmount::from_sat(201));
        assert_eq!(record.tx_virtual_size(), 10);
        assert_eq!(record.inputs().len(), 2);
    }

    #[test]
    fn test_roundtrip() {
        let record = two_input_record();
        let decoded = StrayInputRecord::from_slice(&record.to_vec()).unwrap();
        assert_eq!(decoded, record);
    }

    #[test]
    fn test_encoding_layout() {
        let encoded = two_input_record().to_vec();

        assert_eq!(encoded[..8], 10u64.to_be_bytes());
        assert_eq!(encoded[8..16], 201u64.to_be_bytes());
        // First entry: amount, txid, vout, witness tag.
        assert_eq!(encoded[16..24], 100u64.to_be_bytes());
        assert_eq!(encoded[24..56], TEST_TXID_BYTES);
        assert_eq!(encoded[56..60], 0u32.to_be_bytes());
        assert_eq!(encoded[60..62], 0u16.to_be_bytes());
    }

    #[test]
    fn test_record_without_inputs_roundtrips() {
        let record = StrayInputRecord::new(25, Vec::new());
        let encoded = record.to_vec();
        assert_eq!(encoded.len(), 16);

        let decoded = StrayInputRecord::from_slice(&encoded).unwrap();
        assert_eq!(decoded, record);
        assert!(decoded.inputs().is_empty());
    }

    #[test]
    fn test_short_read_inside_entry_is_an_error() {
        let encoded = two_input_record().to_vec();

        // Any cut past the header but short of the next entry boundary must
        // fail rather than silently truncate the record.
        for cut in [17, 60, encoded.len() - 5] {
            assert!(
                matches!(
                    StrayInputRecord::from_slice(&encoded[..cut]),
                    Err(CodecError::UnexpectedEof { .. })
                ),
                "cut at {cut}"
            );
        }
    }

    #[test]
    fn test_truncated_header_is_an_error() {
        let encoded = two_input_record().to_vec();
        assert!(matches!(
            StrayInputRecord::from_slice(&encoded[..12]),
            Err(CodecError::UnexpectedEof { .. })
        ));
    }

    #[test]
    fn test_unknown_witness_tag_is_an_error() {
        let mut encoded = two_input_record().to_vec();
        encoded[60..62].copy_from_slice(&u16::MAX.to_be_bytes());

        assert_eq!(
            StrayInputRecord::from_slice(&encoded).unwrap_err(),
            CodecError::InvalidVariant("witness type")
        );
    }

    fn arb_witness_type() -> impl Strategy<Value = WitnessType> {
        (0u16..3).prop_map(|tag| WitnessType::from_u16(tag).unwrap())
    }

    fn arb_record() -> impl Strategy<Value = StrayInputRecord> {
        (
            0i64..1_000_000,
            prop::collection::vec((0u64..50_000_000, arb_witness_type()), 0..5),
        )
            .prop_map(|(vsize, entries)| {
                let inputs = entries
                    .into_iter()
                    .enumerate()
                    .map(|(vout, (amount, witness_type))| {
                        test_spendable_output(amount, witness_type, vout as u32)
                    })
                    .collect();
                StrayInputRecord::new(vsize, inputs)
            })
    }

    proptest! {
        #[test]
        fn proptest_record_roundtrip(record in arb_record()) {
            let decoded = StrayInputRecord::from_slice(&record.to_vec()).unwrap();
            prop_assert_eq!(decoded, record);
        }
    }
}
