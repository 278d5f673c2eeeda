//! Shared test suites for stray input store backends.
//!
//! Backend crates pull this in as a dev-dependency and instantiate the
//! [`stray_input_db_tests`] macro with an expression producing a fresh
//! store.


#[cfg(test)]
mod stub_tests {
    use straypool_db::stubs::StubStrayInputDb;

    use crate::stray_input_db_tests;

    stray_input_db_tests!(StubStrayInputDb::new());
}
