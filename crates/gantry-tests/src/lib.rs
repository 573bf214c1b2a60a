//! Test infrastructure for Gantry CI project validation.
//!
//! Fixtures build in-memory projects; [`documents`] holds the same kinds of
//! projects as YAML, the way users write them.
//!
//! # Usage
//!
//! ```ignore
//! use gantry_tests::{ProjectFixture, init_test_logging};
//!
//! #[test]
//! fn test_something() {
//!     init_test_logging();
//!     let project = ProjectFixture::compile_and_test();
//!     // validate, mutate, validate again
//! }
//! ```

pub mod documents;
pub mod fixtures;

pub use fixtures::*;

/// Initialize test logging (call once per test binary).
pub fn init_test_logging() {
    use tracing_subscriber::{EnvFilter, fmt};

    let _ = fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("warn,gantry_validator=debug")),
        )
        .with_test_writer()
        .try_init();
}
