//! The cached query x datum distance matrix.

use crate::searcher::DistancePair;

/// Whether the engine holds a distance matrix, and for which function.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum CacheState {
    /// Nothing computed yet, or invalidated.
    #[default]
    Empty,
    /// Matrix computed with the distance function identified by `distance_id`.
    Built { distance_id: String },
}

impl CacheState {
    /// Check if a matrix is cached.
    pub fn is_built(&self) -> bool {
        matches!(self, CacheState::Built { .. })
    }
}

/// Distances from every query to every datapoint, indexed `[query][datum]`.
///
/// `rows[q][d].index == d` for every cell.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DistanceMatrix {
    rows: Vec<Vec<DistancePair>>,
}

impl DistanceMatrix {
    pub(crate) fn from_rows(rows: Vec<Vec<DistancePair>>) -> Self {
        debug_assert!(rows.windows(2).all(|w| w[0].len() == w[1].len()));
        Self { rows }
    }

    /// Number of query rows.
    pub fn num_queries(&self) -> usize {
        self.rows.len()
    }

    /// Number of datapoint columns.
    pub fn num_data(&self) -> usize {
        self.rows.first().map_or(0, Vec::len)
    }

    /// Check if the matrix has no rows.
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// One query's row.
    pub fn row(&self, query: usize) -> Option<&[DistancePair]> {
        self.rows.get(query).map(Vec::as_slice)
    }

    #[inline]
    pub(crate) fn row_at(&self, query: usize) -> &[DistancePair] {
        &self.rows[query]
    }

    /// One cell.
    pub fn get(&self, query: usize, datum: usize) -> Option<DistancePair> {
        self.rows.get(query)?.get(datum).copied()
    }

    /// Iterate over rows in query order.
    pub fn rows(&self) -> impl ExactSizeIterator<Item = &[DistancePair]> + '_ {
        self.rows.iter().map(Vec::as_slice)
    }
}

/// Closest entry of `row`, skipping entries whose `excluded` flag is set.
///
/// The first candidate seeds the scan and only a strictly smaller distance
/// replaces it, so ties go to the lowest datum index.
pub(crate) fn nearest_in_row(row: &[DistancePair], excluded: Option<&[bool]>) -> Option<DistancePair> {
    let mut candidates = row
        .iter()
        .filter(|pair| excluded.map_or(true, |mask| !mask[pair.index as usize]));

    let mut nearest = *candidates.next()?;
    for pair in candidates {
        if pair.distance < nearest.distance {
            nearest = *pair;
        }
    }
    Some(nearest)
}
