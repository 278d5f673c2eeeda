//! Error types for the stray input store.

use straypool_primitives::codec::CodecError;
use thiserror::Error;

/// Errors surfaced by stray input store operations.
#[derive(Debug, Clone, Error)]
pub enum DbError {
    /// The store has never held a stray input record.
    #[error("there are no existing stray inputs")]
    NoStrayInputs,

    /// A stored record failed to decode.
    #[error("codec error {0}")]
    CodecError(String),

    /// Underlying storage I/O failure.
    #[error("io error {0}")]
    IoError(String),

    /// A storage transaction failed to commit.
    #[error("transaction error {0}")]
    TransactionError(String),

    /// Anything the other variants do not cover.
    #[error("{0}")]
    Other(String),
}

pub type DbResult<T> = Result<T, DbError>;

impl From<CodecError> for DbError {
    fn from(value: CodecError) -> Self {
        Self::CodecError(value.to_string())
    }
}
