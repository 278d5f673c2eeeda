//! Sled store for the stray output pool.

mod db;
mod init;
#[cfg(any(test, feature = "test_utils"))]
pub mod test_utils;

pub use db::StrayInputDBSled;
pub use init::open_sled_database;
