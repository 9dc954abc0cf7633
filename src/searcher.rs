//! Searcher trait and result types.
//!
//! [`NeighborSearch`] is the surface a benchmarking harness drives. The exact
//! engine implements it; approximate techniques implement the same trait so
//! their answers and timings can be compared against the exact baseline.

use serde::{Deserialize, Serialize};

use crate::brute_force::QueryTimings;
use crate::data_format::{DatapointPtr, DenseDataset};
use crate::distance_measures::DistanceFunction;
use crate::error::Result;
use crate::types::{DatapointIndex, DatapointValue};

/// A distance paired with the dataset entry it was measured against.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DistancePair {
    /// Distance from the query to the datapoint.
    pub distance: f32,

    /// Index of the datapoint in the dataset.
    pub index: DatapointIndex,
}

impl DistancePair {
    /// Create a new pair.
    #[inline]
    pub fn new(distance: f32, index: DatapointIndex) -> Self {
        Self { distance, index }
    }

    /// Resolve the datapoint this pair refers to.
    pub fn datapoint<'d, T: DatapointValue>(
        &self,
        dataset: &'d DenseDataset<T>,
    ) -> Option<DatapointPtr<'d, T>> {
        dataset.get(self.index)
    }
}

/// Query operations shared by exact and approximate techniques.
///
/// Results are indexed by query position. `top_n` is round-major: element
/// `r` holds every query's `r`-th nearest neighbor.
pub trait NeighborSearch<'a, T: DatapointValue> {
    /// Short name for reports.
    fn name(&self) -> &str;

    /// The single nearest neighbor of every query.
    fn nearest_one(&mut self, distance: &dyn DistanceFunction<T>) -> Result<Vec<DistancePair>>;

    /// The N nearest neighbors of every query, one round per rank.
    fn top_n(&mut self, distance: &dyn DistanceFunction<T>) -> Result<Vec<Vec<DistancePair>>>;

    /// Every datapoint strictly inside the current radius, per query.
    fn range_query(&mut self, distance: &dyn DistanceFunction<T>)
        -> Result<Vec<Vec<DistancePair>>>;

    /// Double the range query radius.
    fn double_radius(&mut self);

    /// Search with a different query set from now on.
    fn replace_queries(&mut self, queries: &'a DenseDataset<T>);

    /// Accumulated wall-clock time per query.
    fn timings(&self) -> &QueryTimings;
}
