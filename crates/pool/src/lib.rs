//! Stray output pool.
//!
//! Channel teardowns leave behind outputs too small to pay for their own
//! spend. Instead of abandoning that value, the pool parks such outputs in a
//! persistent store and periodically sweeps the whole set back to the wallet
//! in one batched transaction, charging each stored batch the fee its own
//! virtual-size estimate calls for.
//!
//! [`validate::cut_stray_input`] is the entry point deciding whether an
//! output belongs in the pool; [`DiskStrayOutputsPool`] persists pooled
//! outputs and builds and broadcasts the sweeps.

pub mod config;
pub mod errors;
mod pool;
mod sweep;
#[cfg(any(test, feature = "test_utils"))]
pub mod test_utils;
pub mod traits;
pub mod validate;

pub use config::PoolConfig;
pub use errors::{PoolError, PoolResult, SanityError};
pub use pool::DiskStrayOutputsPool;
pub use sweep::SWEEP_CONF_TARGET;
pub use traits::{ChainNotifier, FeeEstimator, StrayOutputsPool, SweepScriptGen, TxBroadcaster};
pub use validate::{cut_stray_input, STRAY_CONF_TARGET};
