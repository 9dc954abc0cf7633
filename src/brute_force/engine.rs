//! Exact search engine.
//!
//! Computes the full query x datum distance matrix once and answers nearest,
//! top-N and range queries from it. The matrix is built lazily by the first
//! query operation and reused until [`ExactSearchEngine::invalidate`] or
//! [`ExactSearchEngine::replace_queries`] drops it.

use std::sync::atomic::AtomicBool;
use std::sync::Arc;

use tracing::{debug, trace, warn};

use crate::brute_force::matrix::{nearest_in_row, CacheState, DistanceMatrix};
use crate::brute_force::timing::QueryTimings;
use crate::config::{validate_radius, ExactConfig, DEFAULT_PARALLEL_THRESHOLD};
use crate::data_format::{DatapointPtr, DenseDataset};
use crate::distance_measures::{DistanceFunction, DistanceMeasure};
use crate::error::{ExactError, InputSet, Result};
use crate::searcher::{DistancePair, NeighborSearch};
use crate::types::{DatapointIndex, DatapointValue};
use crate::utils::parallel::{self, Schedule};

/// Brute-force search over a borrowed dataset and query set.
///
/// Every query operation takes the distance function to use. The first call
/// computes all `|queries| x |data|` distances; later calls only scan the
/// cached rows. Calling with a different distance function than the one the
/// cache was built with fails with [`ExactError::StaleCache`].
pub struct ExactSearchEngine<'a, T: DatapointValue> {
    /// The dataset searched against.
    data: &'a DenseDataset<T>,

    /// The current query set.
    queries: &'a DenseDataset<T>,

    /// Neighbors extracted by `top_n`.
    num_neighbors: usize,

    /// Range query threshold.
    radius: f32,

    /// Measure named by the configuration, for callers that pass it on.
    measure: DistanceMeasure,

    matrix: DistanceMatrix,
    state: CacheState,
    timings: QueryTimings,
    schedule: Schedule,
    cancel: Option<Arc<AtomicBool>>,
}

impl<'a, T: DatapointValue> ExactSearchEngine<'a, T> {
    /// Create an engine. The radius must be finite and non-negative.
    pub fn new(
        data: &'a DenseDataset<T>,
        queries: &'a DenseDataset<T>,
        num_neighbors: usize,
        radius: f32,
    ) -> Result<Self> {
        validate_radius(radius)?;
        Ok(Self {
            data,
            queries,
            num_neighbors,
            radius,
            measure: DistanceMeasure::default(),
            matrix: DistanceMatrix::default(),
            state: CacheState::Empty,
            timings: QueryTimings::new(queries.size()),
            schedule: Schedule {
                parallel: true,
                threshold: DEFAULT_PARALLEL_THRESHOLD,
            },
            cancel: None,
        })
    }

    /// Create an engine from a configuration.
    pub fn from_config(
        data: &'a DenseDataset<T>,
        queries: &'a DenseDataset<T>,
        config: &ExactConfig,
    ) -> Result<Self> {
        config.validate()?;
        let mut engine = Self::new(data, queries, config.num_neighbors as usize, config.radius)?;
        engine.measure = config.distance_measure;
        engine.schedule = Schedule {
            parallel: config.parallel,
            threshold: config.parallel_threshold,
        };
        Ok(engine)
    }

    /// Set whether to spread per-query work over the rayon pool.
    pub fn set_parallel(&mut self, parallel: bool) {
        self.schedule.parallel = parallel;
    }

    /// Set the minimum query count for parallel execution.
    pub fn set_parallel_threshold(&mut self, threshold: usize) {
        self.schedule.threshold = threshold;
    }

    /// Install a flag that aborts the current operation once raised.
    pub fn set_cancel_flag(&mut self, flag: Arc<AtomicBool>) {
        self.cancel = Some(flag);
    }

    /// Remove the cancellation flag.
    pub fn clear_cancel_flag(&mut self) {
        self.cancel = None;
    }

    /// Get the dataset.
    pub fn dataset(&self) -> &'a DenseDataset<T> {
        self.data
    }

    /// Get the current query set.
    pub fn queries(&self) -> &'a DenseDataset<T> {
        self.queries
    }

    /// Get the neighbor count used by `top_n`.
    pub fn num_neighbors(&self) -> usize {
        self.num_neighbors
    }

    /// Set the neighbor count used by `top_n`.
    pub fn set_num_neighbors(&mut self, n: usize) {
        self.num_neighbors = n;
    }

    /// Get the current radius.
    pub fn radius(&self) -> f32 {
        self.radius
    }

    /// Get the configured distance measure.
    ///
    /// Engines built with [`new`](Self::new) report the default measure.
    /// Query operations still take their distance function explicitly.
    pub fn distance_measure(&self) -> DistanceMeasure {
        self.measure
    }

    /// Get the cache state.
    pub fn cache_state(&self) -> &CacheState {
        &self.state
    }

    /// Check if the distance matrix is cached.
    pub fn is_built(&self) -> bool {
        self.state.is_built()
    }

    /// Get the cached distance matrix, if built.
    pub fn matrix(&self) -> Option<&DistanceMatrix> {
        self.state.is_built().then_some(&self.matrix)
    }

    /// Get the per-query timing accumulators.
    pub fn timings(&self) -> &QueryTimings {
        &self.timings
    }

    /// Compute the distance from every query to every datapoint and cache it.
    ///
    /// Always recomputes, replacing any cached matrix. On error the previous
    /// cache is left untouched.
    pub fn compute_all_distances<D>(&mut self, distance: &D) -> Result<()>
    where
        D: DistanceFunction<T> + ?Sized,
    {
        self.check_inputs()?;
        if self.queries.dimensionality() != self.data.dimensionality() {
            return Err(ExactError::DimensionalityMismatch {
                query_dim: self.queries.dimensionality(),
                data_dim: self.data.dimensionality(),
            });
        }

        let data = self.data;
        let queries = self.queries;
        let cancel = self.cancel.as_deref();
        let rows = parallel::try_map_indices(queries.size(), self.schedule, |q| {
            parallel::check_cancelled(cancel, q)?;
            let (row, elapsed) = parallel::timed(|| compute_row(data, &queries.row(q), q, distance));
            Ok((row?, elapsed))
        })?;

        if self.timings.len() != queries.size() {
            self.timings.reset(queries.size());
        }
        let rows = rows
            .into_iter()
            .enumerate()
            .map(|(q, (row, elapsed))| {
                self.timings.add(q, elapsed);
                row
            })
            .collect();

        self.matrix = DistanceMatrix::from_rows(rows);
        self.state = CacheState::Built {
            distance_id: distance.id().to_owned(),
        };
        debug!(
            queries = queries.size(),
            data = data.size(),
            distance = distance.id(),
            "computed distance matrix"
        );
        Ok(())
    }

    /// The single nearest datapoint of every query.
    ///
    /// Ties resolve to the lowest datapoint index.
    pub fn nearest_one<D>(&mut self, distance: &D) -> Result<Vec<DistancePair>>
    where
        D: DistanceFunction<T> + ?Sized,
    {
        self.ensure_built(distance)?;
        self.scan_rows(|_, row| {
            nearest_in_row(row, None).ok_or(ExactError::EmptyInput(InputSet::Dataset))
        })
    }

    /// The `num_neighbors` nearest datapoints of every query.
    ///
    /// The result is round-major: `result[r][q]` is query `q`'s `r`-th
    /// nearest datapoint (0-based). Use [`crate::evaluation::by_query`] to
    /// regroup per query. Each round reuses the `nearest_one` scan with the
    /// datapoints picked in earlier rounds masked out; the mask is private to
    /// this call and the cached matrix is never written.
    pub fn top_n<D>(&mut self, distance: &D) -> Result<Vec<Vec<DistancePair>>>
    where
        D: DistanceFunction<T> + ?Sized,
    {
        self.check_inputs()?;
        let n = self.num_neighbors;
        let available = self.data.size();
        if n > available {
            return Err(ExactError::InvalidNeighborCount {
                requested: n,
                available,
            });
        }
        self.ensure_built(distance)?;

        let mut picked = vec![vec![false; available]; self.queries.size()];
        let mut rounds = Vec::with_capacity(n);
        for round in 0..n {
            let selected = self.scan_rows(|q, row| {
                nearest_in_row(row, Some(&picked[q])).ok_or(ExactError::InvalidNeighborCount {
                    requested: n,
                    available,
                })
            })?;
            for (mask, pair) in picked.iter_mut().zip(&selected) {
                mask[pair.index as usize] = true;
            }
            trace!(round, "top-n round complete");
            rounds.push(selected);
        }

        debug!(n, queries = self.queries.size(), "top-n extraction complete");
        Ok(rounds)
    }

    /// Every datapoint strictly closer than the radius, per query, in
    /// ascending datapoint index order.
    pub fn range_query<D>(&mut self, distance: &D) -> Result<Vec<Vec<DistancePair>>>
    where
        D: DistanceFunction<T> + ?Sized,
    {
        self.ensure_built(distance)?;
        let radius = self.radius;
        let results = self.scan_rows(|_, row| {
            Ok(row
                .iter()
                .filter(|pair| pair.distance < radius)
                .copied()
                .collect::<Vec<_>>())
        })?;
        debug!(
            radius,
            hits = results.iter().map(Vec::len).sum::<usize>(),
            "range query complete"
        );
        Ok(results)
    }

    /// Double the range query radius.
    pub fn double_radius(&mut self) {
        self.radius *= 2.0;
        debug!(radius = self.radius, "radius doubled");
    }

    /// Switch to a new query set.
    ///
    /// Drops the cached matrix and resets the timing accumulators to one
    /// zeroed slot per new query.
    pub fn replace_queries(&mut self, queries: &'a DenseDataset<T>) {
        self.queries = queries;
        self.invalidate();
        self.timings.reset(queries.size());
        debug!(queries = queries.size(), "query set replaced");
    }

    /// Drop the cached matrix. The next query operation recomputes it.
    pub fn invalidate(&mut self) {
        if self.state.is_built() {
            debug!("distance matrix invalidated");
        }
        self.matrix = DistanceMatrix::default();
        self.state = CacheState::Empty;
    }

    fn check_inputs(&self) -> Result<()> {
        if self.data.is_empty() {
            return Err(ExactError::EmptyInput(InputSet::Dataset));
        }
        if self.queries.is_empty() {
            return Err(ExactError::EmptyInput(InputSet::Queries));
        }
        Ok(())
    }

    fn check_shape(&self) -> Result<()> {
        if self.matrix.num_queries() != self.queries.size()
            || self.matrix.num_data() != self.data.size()
        {
            return Err(ExactError::DimensionMismatch {
                cached_queries: self.matrix.num_queries(),
                cached_data: self.matrix.num_data(),
                queries: self.queries.size(),
                data: self.data.size(),
            });
        }
        Ok(())
    }

    fn ensure_built<D>(&mut self, distance: &D) -> Result<()>
    where
        D: DistanceFunction<T> + ?Sized,
    {
        self.check_inputs()?;
        if let CacheState::Built { distance_id } = &self.state {
            if distance_id != distance.id() {
                warn!(
                    cached = %distance_id,
                    requested = distance.id(),
                    "query issued against a matrix built with another distance"
                );
                return Err(ExactError::StaleCache {
                    cached: distance_id.clone(),
                    requested: distance.id().to_owned(),
                });
            }
            return self.check_shape();
        }
        self.compute_all_distances(distance)
    }

    /// Run `scan` over every cached row, timing each query on the thread
    /// that handles it, then fold the times into the accumulators.
    fn scan_rows<U, F>(&mut self, scan: F) -> Result<Vec<U>>
    where
        U: Send,
        F: Fn(usize, &[DistancePair]) -> Result<U> + Sync + Send,
    {
        let matrix = &self.matrix;
        let cancel = self.cancel.as_deref();
        let scanned = parallel::try_map_indices(matrix.num_queries(), self.schedule, |q| {
            parallel::check_cancelled(cancel, q)?;
            let (out, elapsed) = parallel::timed(|| scan(q, matrix.row_at(q)));
            Ok((out?, elapsed))
        })
        .inspect_err(|e| {
            if matches!(e, ExactError::Cancelled { .. }) {
                warn!(error = %e, "scan cancelled");
            }
        })?;

        Ok(scanned
            .into_iter()
            .enumerate()
            .map(|(q, (out, elapsed))| {
                self.timings.add(q, elapsed);
                out
            })
            .collect())
    }
}

fn compute_row<T, D>(
    data: &DenseDataset<T>,
    query: &DatapointPtr<'_, T>,
    query_index: usize,
    distance: &D,
) -> Result<Vec<DistancePair>>
where
    T: DatapointValue,
    D: DistanceFunction<T> + ?Sized,
{
    data.iter()
        .enumerate()
        .map(|(d, datum)| {
            let dist = distance.distance(query, &datum);
            if dist.is_nan() {
                return Err(ExactError::InvalidDistance {
                    query: query_index as DatapointIndex,
                    datum: d as DatapointIndex,
                });
            }
            Ok(DistancePair::new(dist, d as DatapointIndex))
        })
        .collect()
}

impl<'a, T: DatapointValue> NeighborSearch<'a, T> for ExactSearchEngine<'a, T> {
    fn name(&self) -> &str {
        "exact"
    }

    fn nearest_one(&mut self, distance: &dyn DistanceFunction<T>) -> Result<Vec<DistancePair>> {
        ExactSearchEngine::nearest_one(self, distance)
    }

    fn top_n(&mut self, distance: &dyn DistanceFunction<T>) -> Result<Vec<Vec<DistancePair>>> {
        ExactSearchEngine::top_n(self, distance)
    }

    fn range_query(
        &mut self,
        distance: &dyn DistanceFunction<T>,
    ) -> Result<Vec<Vec<DistancePair>>> {
        ExactSearchEngine::range_query(self, distance)
    }

    fn double_radius(&mut self) {
        ExactSearchEngine::double_radius(self)
    }

    fn replace_queries(&mut self, queries: &'a DenseDataset<T>) {
        ExactSearchEngine::replace_queries(self, queries)
    }

    fn timings(&self) -> &QueryTimings {
        &self.timings
    }
}

impl<T: DatapointValue> std::fmt::Debug for ExactSearchEngine<'_, T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ExactSearchEngine")
            .field("data", &self.data.size())
            .field("queries", &self.queries.size())
            .field("num_neighbors", &self.num_neighbors)
            .field("radius", &self.radius)
            .field("state", &self.state)
            .finish()
    }
}
