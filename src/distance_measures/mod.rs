//! Distance functions.
//!
//! The engine accepts any [`DistanceFunction`]. Each function carries an id;
//! the engine remembers the id its distance matrix was built with and refuses
//! to answer queries for a different one until the cache is invalidated.

mod one_to_one;

pub use one_to_one::*;

use std::fmt;
use std::marker::PhantomData;

use serde::{Deserialize, Serialize};

use crate::data_format::DatapointPtr;
use crate::types::DatapointValue;

/// A distance function evaluated in the query -> datum direction.
pub trait DistanceFunction<T: DatapointValue>: Sync {
    /// Distance from `query` to `datum`. Must not be NaN.
    fn distance(&self, query: &DatapointPtr<'_, T>, datum: &DatapointPtr<'_, T>) -> f32;

    /// Stable identifier. Two functions with the same id are assumed to
    /// produce the same distances.
    fn id(&self) -> &str;
}

impl<T: DatapointValue, D: DistanceFunction<T> + ?Sized> DistanceFunction<T> for &D {
    #[inline]
    fn distance(&self, query: &DatapointPtr<'_, T>, datum: &DatapointPtr<'_, T>) -> f32 {
        (**self).distance(query, datum)
    }

    fn id(&self) -> &str {
        (**self).id()
    }
}

/// Built-in distance measures.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum DistanceMeasure {
    /// L1 (Manhattan) distance: sum of absolute differences.
    L1,

    /// L2 (Euclidean) distance.
    #[default]
    L2,

    /// Squared L2 distance. Same ordering as L2, but radii are squared.
    SquaredL2,

    /// Cosine distance: 1 - cosine_similarity.
    Cosine,

    /// Chebyshev (L-infinity) distance: largest absolute difference.
    Chebyshev,
}

impl DistanceMeasure {
    /// Get the name of this distance measure.
    pub fn name(&self) -> &'static str {
        match self {
            DistanceMeasure::L1 => "L1",
            DistanceMeasure::L2 => "L2",
            DistanceMeasure::SquaredL2 => "SquaredL2",
            DistanceMeasure::Cosine => "Cosine",
            DistanceMeasure::Chebyshev => "Chebyshev",
        }
    }
}

impl<T: DatapointValue> DistanceFunction<T> for DistanceMeasure {
    #[inline]
    fn distance(&self, query: &DatapointPtr<'_, T>, datum: &DatapointPtr<'_, T>) -> f32 {
        match self {
            DistanceMeasure::L1 => l1_distance(query, datum),
            DistanceMeasure::L2 => l2_distance(query, datum),
            DistanceMeasure::SquaredL2 => squared_l2_distance(query, datum),
            DistanceMeasure::Cosine => cosine_distance(query, datum),
            DistanceMeasure::Chebyshev => chebyshev_distance(query, datum),
        }
    }

    fn id(&self) -> &str {
        self.name()
    }
}

impl fmt::Display for DistanceMeasure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// A caller-supplied closure with an explicit id.
pub struct NamedDistance<T, F> {
    id: String,
    func: F,
    _marker: PhantomData<fn(T)>,
}

impl<T, F> NamedDistance<T, F>
where
    T: DatapointValue,
    F: Fn(&DatapointPtr<'_, T>, &DatapointPtr<'_, T>) -> f32 + Sync,
{
    /// Wrap `func` under `id`.
    pub fn new(id: impl Into<String>, func: F) -> Self {
        Self {
            id: id.into(),
            func,
            _marker: PhantomData,
        }
    }
}

impl<T, F> DistanceFunction<T> for NamedDistance<T, F>
where
    T: DatapointValue,
    F: Fn(&DatapointPtr<'_, T>, &DatapointPtr<'_, T>) -> f32 + Sync,
{
    #[inline]
    fn distance(&self, query: &DatapointPtr<'_, T>, datum: &DatapointPtr<'_, T>) -> f32 {
        (self.func)(query, datum)
    }

    fn id(&self) -> &str {
        &self.id
    }
}

impl<T, F> fmt::Debug for NamedDistance<T, F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NamedDistance").field("id", &self.id).finish()
    }
}
