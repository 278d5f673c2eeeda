//! Persistence interface for the stray output pool.
//!
//! The pool appends [`types::StrayInputRecord`]s through the
//! [`traits::StrayInputDatabase`] trait and consumes them wholesale when a
//! sweep goes out. Backends live in their own crates; an in-memory stub is
//! available behind the `stubs` feature.

pub mod errors;
#[cfg(feature = "stubs")]
pub mod stubs;
pub mod traits;
pub mod types;

pub use errors::{DbError, DbResult};
pub use traits::StrayInputDatabase;
pub use types::StrayInputRecord;
