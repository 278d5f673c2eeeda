//! Deterministic fixtures shared by codec, store, and pool tests.

use bitcoin::{
    hashes::Hash, opcodes::all::OP_CHECKSIG, script::Builder, Amount, EcdsaSighashType, OutPoint,
    ScriptBuf, TxOut, Txid, WPubkeyHash, WScriptHash,
};
use secp256k1::{PublicKey, SecretKey, SECP256K1};

use crate::{
    output::{SpendableOutput, WitnessType},
    sign_descriptor::SignDescriptor,
    tweak::tweak_pubkey,
};

/// Txid every fixture outpoint points at, in internal byte order.
pub const TEST_TXID_BYTES: [u8; 32] = [
    0xb7, 0x94, 0x38, 0x5f, 0x2d, 0x1e, 0xf7, 0xab, 0x4d, 0x92, 0x73, 0xd1, 0x90, 0x63, 0x81,
    0xb4, 0x4f, 0x2f, 0x6f, 0x25, 0x88, 0xa3, 0xef, 0xb9, 0x6a, 0x49, 0x18, 0x83, 0x31, 0x98,
    0x47, 0x53,
];

pub fn test_txid() -> Txid {
    Txid::from_byte_array(TEST_TXID_BYTES)
}

/// Base signing key used by every fixture descriptor.
pub fn test_seckey() -> SecretKey {
    SecretKey::from_slice(&[0x2b; 32]).expect("static fixture key")
}

pub fn test_pubkey() -> PublicKey {
    PublicKey::from_secret_key(SECP256K1, &test_seckey())
}

/// Per-commitment tweak carried by single-tweak fixtures.
pub fn test_single_tweak() -> Vec<u8> {
    vec![0x02; 32]
}

/// Leaked per-commitment secret carried by revocation fixtures.
pub fn test_commit_secret() -> SecretKey {
    SecretKey::from_slice(&[0x03; 32]).expect("static fixture key")
}

/// Descriptor with every field populated: a tweaked key over a 50 BTC
/// legacy pay-to-pubkey output.
pub fn test_sign_descriptor() -> SignDescriptor {
    SignDescriptor {
        pubkey: test_pubkey(),
        single_tweak: Some(test_single_tweak()),
        double_tweak: None,
        witness_script: ScriptBuf::from_bytes(vec![
            0x00, 0x14, 0xee, 0x91, 0x41, 0x7e, 0x85, 0x6c, 0xde, 0x10, 0xa2, 0x91, 0x1e, 0xdc,
            0xbd, 0xbd, 0x69, 0xe2, 0xef, 0xb5, 0x71, 0x48,
        ]),
        output: TxOut {
            value: Amount::from_sat(5_000_000_000),
            script_pubkey: ScriptBuf::from_bytes(vec![
                0x41, // OP_DATA_65
                0x04, 0xd6, 0x4b, 0xdf, 0xd0, 0x9e, 0xb1, 0xc5, 0xfe, 0x29, 0x5a, 0xbd, 0xeb,
                0x1d, 0xca, 0x42, 0x81, 0xbe, 0x98, 0x8e, 0x2d, 0xa0, 0xb6, 0xc1, 0xc6, 0xa5,
                0x9d, 0xc2, 0x26, 0xc2, 0x86, 0x24, 0xe1, 0x81, 0x75, 0xe8, 0x51, 0xc9, 0x6b,
                0x97, 0x3d, 0x81, 0xb0, 0x1c, 0xc3, 0x1f, 0x04, 0x78, 0x34, 0xbc, 0x06, 0xd6,
                0xd6, 0xed, 0xf6, 0x20, 0xd1, 0x84, 0x24, 0x1a, 0x6a, 0xed, 0x8b, 0x63,
                0xa6, // 65-byte pubkey
                0xac, // OP_CHECKSIG
            ]),
        },
        hash_type: EcdsaSighashType::All,
    }
}

/// Fixture commitment script for script-path spends.
fn test_witness_script() -> ScriptBuf {
    Builder::new()
        .push_slice(test_pubkey().serialize())
        .push_opcode(OP_CHECKSIG)
        .into_script()
}

/// A pooled output ready for witness construction in tests.
///
/// The descriptor's spent-output script matches the witness type, so sighash
/// computation works end to end: p2wpkh over the tweaked fixture key for
/// no-delay outputs, p2wsh over the fixture commitment script otherwise.
pub fn test_spendable_output(
    amount: u64,
    witness_type: WitnessType,
    vout: u32,
) -> SpendableOutput {
    let value = Amount::from_sat(amount);
    let sign_desc = match witness_type {
        WitnessType::CommitmentNoDelay => {
            let tweak = test_single_tweak();
            let spend_key = tweak_pubkey(SECP256K1, &test_pubkey(), &tweak)
                .expect("static fixture tweak");
            SignDescriptor {
                pubkey: test_pubkey(),
                single_tweak: Some(tweak),
                double_tweak: None,
                witness_script: ScriptBuf::new(),
                output: TxOut {
                    value,
                    script_pubkey: ScriptBuf::new_p2wpkh(&WPubkeyHash::hash(
                        &spend_key.serialize(),
                    )),
                },
                hash_type: EcdsaSighashType::All,
            }
        }
        WitnessType::CommitmentTimeLock | WitnessType::CommitmentRevoke => {
            let witness_script = test_witness_script();
            let script_pubkey =
                ScriptBuf::new_p2wsh(&WScriptHash::hash(witness_script.as_bytes()));
            SignDescriptor {
                pubkey: test_pubkey(),
                single_tweak: None,
                double_tweak: (witness_type == WitnessType::CommitmentRevoke)
                    .then(test_commit_secret),
                witness_script,
                output: TxOut {
                    value,
                    script_pubkey,
                },
                hash_type: EcdsaSighashType::All,
            }
        }
    };

    SpendableOutput::new(
        witness_type,
        value,
        OutPoint::new(test_txid(), vout),
        sign_desc,
    )
}
