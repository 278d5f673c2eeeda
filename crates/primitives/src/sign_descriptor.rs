//! Signing metadata attached to each pooled output.

use bitcoin::{Amount, EcdsaSighashType, ScriptBuf, TxOut};
use secp256k1::{PublicKey, SecretKey};

use crate::codec::{
    read_exact, read_u32, read_u64, read_var_bytes, write_u32, write_u64, write_var_bytes,
    CodecError, CodecResult,
};

/// Everything a signer needs to produce a signature for one output.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SignDescriptor {
    /// Key the signature must verify against, before any tweak.
    pub pubkey: PublicKey,

    /// Per-commitment tweak mixed into the base key, if the output used one.
    pub single_tweak: Option<Vec<u8>>,

    /// Leaked per-commitment secret for claiming a revoked output.
    pub double_tweak: Option<SecretKey>,

    /// Witness script for script-path spends; empty for key spends.
    pub witness_script: ScriptBuf,

    /// The output being spent, as committed to by segwit digests.
    pub output: TxOut,

    /// Sighash flag the signature commits to.
    pub hash_type: EcdsaSighashType,
}

/// Appends a descriptor to `out`.
///
/// Layout: 33-byte compressed pubkey, var-bytes single tweak, var-bytes
/// double tweak secret, var-bytes witness script, var-bytes output script,
/// 8-byte output value, 4-byte sighash flag. Absent tweaks encode as
/// zero-length var-bytes.
pub fn write_sign_descriptor(out: &mut Vec<u8>, desc: &SignDescriptor) {
    out.extend_from_slice(&desc.pubkey.serialize());
    write_var_bytes(out, desc.single_tweak.as_deref().unwrap_or(&[]));
    let double = desc.double_tweak.map(|sk| sk.secret_bytes());
    write_var_bytes(out, double.as_ref().map(|b| b.as_slice()).unwrap_or(&[]));
    write_var_bytes(out, desc.witness_script.as_bytes());
    write_var_bytes(out, desc.output.script_pubkey.as_bytes());
    write_u64(out, desc.output.value.to_sat());
    write_u32(out, desc.hash_type.to_u32());
}

/// Decodes a descriptor from the front of `data`, advancing it.
pub fn read_sign_descriptor(data: &mut &[u8]) -> CodecResult<SignDescriptor> {
    let key_bytes = read_exact::<33>(data)?;
    let pubkey = PublicKey::from_slice(&key_bytes)
        .map_err(|_| CodecError::MalformedField("sign descriptor pubkey"))?;

    let single = read_var_bytes(data)?;
    let single_tweak = if single.is_empty() { None } else { Some(single) };

    let double = read_var_bytes(data)?;
    let double_tweak = if double.is_empty() {
        None
    } else {
        Some(
            SecretKey::from_slice(&double)
                .map_err(|_| CodecError::MalformedField("sign descriptor double tweak"))?,
        )
    };

    let witness_script = ScriptBuf::from_bytes(read_var_bytes(data)?);
    let script_pubkey = ScriptBuf::from_bytes(read_var_bytes(data)?);
    let value = Amount::from_sat(read_u64(data)?);
    let hash_type = EcdsaSighashType::from_standard(read_u32(data)?)
        .map_err(|_| CodecError::InvalidVariant("sign descriptor sighash flag"))?;

    Ok(SignDescriptor {
        pubkey,
        single_tweak,
        double_tweak,
        witness_script,
        output: TxOut {
            value,
            script_pubkey,
        },
        hash_type,
    })
}
