//! Pickers gather the test suites to run.
pub mod toml;
