//! Per-query timing accumulators.

use std::time::Duration;

/// Wall-clock time spent on each query, summed over every operation that
/// touched the query's row.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct QueryTimings {
    per_query: Vec<Duration>,
}

impl QueryTimings {
    /// Create zeroed accumulators for `num_queries` queries.
    pub fn new(num_queries: usize) -> Self {
        Self {
            per_query: vec![Duration::ZERO; num_queries],
        }
    }

    /// Number of accumulators.
    pub fn len(&self) -> usize {
        self.per_query.len()
    }

    /// Check if there are no accumulators.
    pub fn is_empty(&self) -> bool {
        self.per_query.is_empty()
    }

    /// Time accumulated for one query.
    pub fn get(&self, query: usize) -> Option<Duration> {
        self.per_query.get(query).copied()
    }

    /// All accumulators in query order.
    pub fn as_slice(&self) -> &[Duration] {
        &self.per_query
    }

    /// Sum over all queries.
    pub fn total(&self) -> Duration {
        self.per_query.iter().sum()
    }

    /// Mean time per query, `None` without queries.
    pub fn mean(&self) -> Option<Duration> {
        let n = u32::try_from(self.per_query.len()).ok().filter(|&n| n > 0)?;
        Some(self.total() / n)
    }

    pub(crate) fn add(&mut self, query: usize, elapsed: Duration) {
        if let Some(slot) = self.per_query.get_mut(query) {
            *slot += elapsed;
        }
    }

    /// Zero every accumulator and resize to `num_queries`.
    pub fn reset(&mut self, num_queries: usize) {
        self.per_query.clear();
        self.per_query.resize(num_queries, Duration::ZERO);
    }
}
