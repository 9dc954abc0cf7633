//! Brute-force exact search.
//!
//! This module provides exact nearest neighbor and range search by
//! exhaustively computing distances from every query to every datapoint.

mod engine;
mod matrix;
mod self_join;
mod timing;

pub use engine::ExactSearchEngine;
pub use matrix::{CacheState, DistanceMatrix};
pub use self_join::{mean_nearest_distance, nearest_other_datum};
pub use timing::QueryTimings;
