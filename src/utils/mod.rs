//! Utility functions and types.

pub(crate) mod parallel;

pub use parallel::{Schedule, MIN_PARALLEL_SIZE};
