//! Pooled output variants and their witness construction.

use bitcoin::{
    ecdsa, hashes::Hash, sighash::SighashCache, Amount, OutPoint, Transaction, Witness,
};
use secp256k1::{Message, SECP256K1};

use crate::{
    sign_descriptor::SignDescriptor,
    signer::{OutputSigner, SignerError},
    tweak::tweak_pubkey,
};

/// Virtual size of a one-input sweep spending a p2wpkh output on its own.
pub const P2WPKH_SWEEP_VSIZE: i64 = 160;

/// Virtual size of a one-input sweep spending a p2wsh commitment output on
/// its own.
pub const SCRIPT_SWEEP_VSIZE: i64 = 190;

/// How a pooled output is spent, and therefore what its witness looks like.
///
/// The discriminants are the tags stored by the record codec.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u16)]
pub enum WitnessType {
    /// Broadcaster's own commitment output, spendable after its CSV delay
    /// through the timeout branch of the commitment script.
    CommitmentTimeLock = 0,

    /// Remote party's commitment output, a plain p2wpkh spend.
    CommitmentNoDelay = 1,

    /// Revoked commitment output, claimed through the revocation branch of
    /// the commitment script.
    CommitmentRevoke = 2,
}

impl WitnessType {
    /// Decodes a stored tag.
    pub fn from_u16(tag: u16) -> Option<Self> {
        match tag {
            0 => Some(Self::CommitmentTimeLock),
            1 => Some(Self::CommitmentNoDelay),
            2 => Some(Self::CommitmentRevoke),
            _ => None,
        }
    }

    /// Tag stored by the record codec.
    pub fn to_u16(self) -> u16 {
        self as u16
    }

    /// Virtual size of a one-input sweep spending this output on its own.
    ///
    /// This is what the economic gate prices a standalone spend at.
    pub fn standalone_vsize(self) -> i64 {
        match self {
            Self::CommitmentNoDelay => P2WPKH_SWEEP_VSIZE,
            Self::CommitmentTimeLock | Self::CommitmentRevoke => SCRIPT_SWEEP_VSIZE,
        }
    }
}

/// Common payload of every pooled output.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BaseOutput {
    amount: Amount,
    outpoint: OutPoint,
    sign_desc: SignDescriptor,
}

impl BaseOutput {
    /// Bundles the location, value, and signing metadata of one output.
    pub fn new(amount: Amount, outpoint: OutPoint, sign_desc: SignDescriptor) -> Self {
        Self {
            amount,
            outpoint,
            sign_desc,
        }
    }
}

/// One output waiting in the pool, tagged by how it must be spent.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SpendableOutput {
    /// See [`WitnessType::CommitmentTimeLock`].
    CommitmentTimeLock(BaseOutput),
    /// See [`WitnessType::CommitmentNoDelay`].
    CommitmentNoDelay(BaseOutput),
    /// See [`WitnessType::CommitmentRevoke`].
    CommitmentRevoke(BaseOutput),
}

impl SpendableOutput {
    /// Builds the variant matching `witness_type`.
    pub fn new(
        witness_type: WitnessType,
        amount: Amount,
        outpoint: OutPoint,
        sign_desc: SignDescriptor,
    ) -> Self {
        let base = BaseOutput::new(amount, outpoint, sign_desc);
        match witness_type {
            WitnessType::CommitmentTimeLock => Self::CommitmentTimeLock(base),
            WitnessType::CommitmentNoDelay => Self::CommitmentNoDelay(base),
            WitnessType::CommitmentRevoke => Self::CommitmentRevoke(base),
        }
    }

    fn base(&self) -> &BaseOutput {
        match self {
            Self::CommitmentTimeLock(base)
            | Self::CommitmentNoDelay(base)
            | Self::CommitmentRevoke(base) => base,
        }
    }

    /// Value of the output.
    pub fn amount(&self) -> Amount {
        self.base().amount
    }

    /// Location of the output on chain.
    pub fn outpoint(&self) -> OutPoint {
        self.base().outpoint
    }

    /// Signing metadata for the output.
    pub fn sign_desc(&self) -> &SignDescriptor {
        &self.base().sign_desc
    }

    /// Witness type tag of this variant.
    pub fn witness_type(&self) -> WitnessType {
        match self {
            Self::CommitmentTimeLock(_) => WitnessType::CommitmentTimeLock,
            Self::CommitmentNoDelay(_) => WitnessType::CommitmentNoDelay,
            Self::CommitmentRevoke(_) => WitnessType::CommitmentRevoke,
        }
    }

    /// Builds the witness unlocking this output as input `input_index` of
    /// the transaction behind `cache`.
    ///
    /// The cache must have been created over the transaction with its full
    /// input set already appended; segwit digests commit to every outpoint.
    pub fn build_witness(
        &self,
        signer: &dyn OutputSigner,
        cache: &mut SighashCache<&Transaction>,
        input_index: usize,
    ) -> Result<Witness, SignerError> {
        let desc = self.sign_desc();
        let sighash = match self {
            Self::CommitmentNoDelay(_) => cache
                .p2wpkh_signature_hash(
                    input_index,
                    &desc.output.script_pubkey,
                    desc.output.value,
                    desc.hash_type,
                )
                .map_err(|e| SignerError::Sighash(e.to_string()))?,
            Self::CommitmentTimeLock(_) | Self::CommitmentRevoke(_) => cache
                .p2wsh_signature_hash(
                    input_index,
                    &desc.witness_script,
                    desc.output.value,
                    desc.hash_type,
                )
                .map_err(|e| SignerError::Sighash(e.to_string()))?,
        };

        let msg = Message::from_digest(sighash.to_byte_array());
        let sig = ecdsa::Signature {
            signature: signer.sign_output_raw(desc, msg)?,
            sighash_type: desc.hash_type,
        };

        let mut witness = Witness::new();
        witness.push(sig.to_vec());
        match self {
            Self::CommitmentNoDelay(_) => {
                let pubkey = match desc.single_tweak.as_deref() {
                    Some(tweak) => tweak_pubkey(SECP256K1, &desc.pubkey, tweak)?,
                    None => desc.pubkey,
                };
                witness.push(pubkey.serialize());
            }
            Self::CommitmentTimeLock(_) => {
                // Empty element selects the timeout branch.
                witness.push(&[] as &[u8]);
                witness.push(desc.witness_script.as_bytes());
            }
            Self::CommitmentRevoke(_) => {
                witness.push([1u8]);
                witness.push(desc.witness_script.as_bytes());
            }
        }
        Ok(witness)
    }
}
