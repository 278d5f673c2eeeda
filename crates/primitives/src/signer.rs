//! Signing capability consumed by witness construction.

use secp256k1::{ecdsa::Signature, Message};
use thiserror::Error;

use crate::sign_descriptor::SignDescriptor;

/// Failures while producing a witness for a pooled output.
#[derive(Debug, Error)]
pub enum SignerError {
    /// The signer holds no key matching the descriptor.
    #[error("no key available for descriptor pubkey")]
    UnknownKey,

    /// Sighash computation rejected the input index or script.
    #[error("sighash computation failed, {0}")]
    Sighash(String),

    /// Key arithmetic or signing rejected its inputs.
    #[error("signing failed, {0}")]
    Signing(#[from] secp256k1::Error),
}

/// Produces raw signatures over pooled outputs.
///
/// Implementations look up the private key matching `sign_desc.pubkey`,
/// apply whichever tweak the descriptor carries, and sign the digest. The
/// returned signature carries no sighash flag byte; witness assembly appends
/// it.
pub trait OutputSigner: Send + Sync {
    /// Signs `sighash` according to the descriptor.
    fn sign_output_raw(
        &self,
        sign_desc: &SignDescriptor,
        sighash: Message,
    ) -> Result<Signature, SignerError>;
}
