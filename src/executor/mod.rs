//! An executor is responsible for building and running the annotated tests
//! and generating results.

pub mod results;
pub mod suite;
mod context;

pub use test::Test;
pub use context::{Context, Executor};
