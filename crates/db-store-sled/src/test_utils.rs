//! Helpers for tests running against a real sled database.

use crate::StrayInputDBSled;

/// Opens a throwaway in-memory sled database.
pub fn get_test_sled_db() -> sled::Db {
    sled::Config::new()
        .temporary(true)
        .open()
        .expect("test sled db")
}

/// Stray input store over a throwaway database.
pub fn get_test_stray_input_db() -> StrayInputDBSled {
    StrayInputDBSled::new(get_test_sled_db())
}
