//! # exact-search
//!
//! Exact brute-force nearest neighbor and range search, used as the ground
//! truth that approximate techniques are measured against.
//!
//! ## Overview
//!
//! The engine borrows a dataset and a query set, computes the distance from
//! every query to every datapoint once, and answers from that cached matrix:
//!
//! - **Nearest**: the single closest datapoint of every query
//! - **Top-N**: the N closest datapoints, extracted round by round
//! - **Range**: every datapoint strictly within a radius that can be doubled
//! - **Timing**: wall-clock time accumulated per query
//!
//! ## Quick Start
//!
//! ```rust
//! use exact_search::prelude::*;
//!
//! let data = DenseDataset::from_vecs(vec![
//!     vec![0.0f32, 0.0],
//!     vec![1.0, 0.0],
//!     vec![5.0, 5.0],
//! ])
//! .unwrap();
//! let queries = DenseDataset::from_vecs(vec![vec![0.0f32, 0.0]]).unwrap();
//!
//! let mut engine = ExactSearchEngine::new(&data, &queries, 2, 1.5).unwrap();
//! let l2 = DistanceMeasure::L2;
//!
//! let nearest = engine.nearest_one(&l2).unwrap();
//! assert_eq!(nearest[0].index, 0);
//!
//! let in_range = engine.range_query(&l2).unwrap();
//! assert_eq!(in_range[0].len(), 2);
//!
//! // Round-major: rounds[r][q] is query q's r-th neighbor.
//! let rounds = engine.top_n(&l2).unwrap();
//! assert_eq!(by_query(&rounds)[0][1].index, 1);
//! ```
//!
//! ## Custom Distances
//!
//! Any closure can be used through [`NamedDistance`](distance_measures::NamedDistance).
//! The id is what the cache remembers:
//!
//! ```rust
//! use exact_search::prelude::*;
//! use exact_search::distance_measures::{l1_distance, NamedDistance};
//!
//! let data = DenseDataset::from_vecs(vec![vec![0.0f32], vec![3.0]]).unwrap();
//! let queries = DenseDataset::from_vecs(vec![vec![2.0f32]]).unwrap();
//! let manhattan = NamedDistance::new("manhattan", |a: &DatapointPtr<'_, f32>, b: &DatapointPtr<'_, f32>| {
//!     l1_distance(a, b)
//! });
//!
//! let mut engine = ExactSearchEngine::new(&data, &queries, 1, 1.0).unwrap();
//! assert_eq!(engine.nearest_one(&manhattan).unwrap()[0].index, 1);
//!
//! // A different function needs a fresh matrix.
//! assert!(engine.nearest_one(&DistanceMeasure::L2).is_err());
//! engine.invalidate();
//! assert!(engine.nearest_one(&DistanceMeasure::L2).is_ok());
//! ```
//!
//! ## Module Overview
//!
//! - [`brute_force`]: The exact engine, its cache and timings
//! - [`distance_measures`]: Distance functions
//! - [`data_format`]: Dataset and datapoint types
//! - [`evaluation`]: Recall and approximation ratio against the exact answer

pub mod brute_force;
pub mod data_format;
pub mod distance_measures;
pub mod evaluation;
pub mod utils;

mod config;
mod error;
mod searcher;
mod types;

pub use config::{ExactConfig, DEFAULT_PARALLEL_THRESHOLD};
pub use error::{ErrorCode, ExactError, InputSet, Result};
pub use searcher::{DistancePair, NeighborSearch};
pub use types::*;

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::brute_force::{CacheState, DistanceMatrix, ExactSearchEngine, QueryTimings};
    pub use crate::config::ExactConfig;
    pub use crate::data_format::{Datapoint, DatapointPtr, DenseDataset};
    pub use crate::distance_measures::{DistanceFunction, DistanceMeasure, NamedDistance};
    pub use crate::error::{ExactError, Result};
    pub use crate::evaluation::by_query;
    pub use crate::searcher::{DistancePair, NeighborSearch};
    pub use crate::types::*;
}
