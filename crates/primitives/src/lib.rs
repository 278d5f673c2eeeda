//! Core types for the stray output pool: spendable output variants, their
//! signing metadata, fee rates, and the byte-level codec helpers the
//! persistence layer builds on.

pub mod codec;
pub mod fee;
pub mod output;
pub mod sign_descriptor;
pub mod signer;
#[cfg(any(test, feature = "test_utils"))]
pub mod test_utils;
pub mod tweak;

pub use fee::SatPerVByte;
pub use output::{SpendableOutput, WitnessType};
pub use sign_descriptor::SignDescriptor;
pub use signer::{OutputSigner, SignerError};
