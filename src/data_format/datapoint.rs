//! Datapoint representation.
//!
//! A datapoint is a dense, fixed-dimension vector. Its identity is its
//! position in the [`DenseDataset`](super::DenseDataset) that owns it.

use crate::types::{DatapointValue, DimensionIndex};

/// A borrowed view of a dense datapoint.
#[derive(Debug, Clone, Copy)]
pub struct DatapointPtr<'a, T: DatapointValue> {
    values: &'a [T],
}

impl<'a, T: DatapointValue> DatapointPtr<'a, T> {
    /// Create a view over the given coordinates.
    #[inline]
    pub fn dense(values: &'a [T]) -> Self {
        Self { values }
    }

    /// Get the coordinates.
    #[inline]
    pub fn values(&self) -> &'a [T] {
        self.values
    }

    /// Get the dimensionality.
    #[inline]
    pub fn dimensionality(&self) -> DimensionIndex {
        self.values.len() as DimensionIndex
    }

    /// Get a coordinate, or `None` past the last dimension.
    #[inline]
    pub fn get(&self, dim: DimensionIndex) -> Option<T> {
        self.values.get(dim as usize).copied()
    }

    /// Convert to an owned Datapoint.
    pub fn to_owned(&self) -> Datapoint<T> {
        Datapoint::dense(self.values.to_vec())
    }
}

/// An owned dense datapoint.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Datapoint<T: DatapointValue> {
    values: Vec<T>,
}

impl<T: DatapointValue> Datapoint<T> {
    /// Create a datapoint from its coordinates.
    pub fn dense(values: Vec<T>) -> Self {
        Self { values }
    }

    /// Get a borrowed view of this datapoint.
    #[inline]
    pub fn as_ptr(&self) -> DatapointPtr<'_, T> {
        DatapointPtr::dense(&self.values)
    }

    /// Get the coordinates.
    #[inline]
    pub fn values(&self) -> &[T] {
        &self.values
    }

    /// Get the dimensionality.
    #[inline]
    pub fn dimensionality(&self) -> DimensionIndex {
        self.values.len() as DimensionIndex
    }

    /// Get a coordinate, or `None` past the last dimension.
    pub fn get(&self, dim: DimensionIndex) -> Option<T> {
        self.as_ptr().get(dim)
    }
}

impl<T: DatapointValue> From<Vec<T>> for Datapoint<T> {
    fn from(values: Vec<T>) -> Self {
        Self::dense(values)
    }
}

impl<T: DatapointValue> From<&[T]> for Datapoint<T> {
    fn from(values: &[T]) -> Self {
        Self::dense(values.to_vec())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dense_datapoint() {
        let dp = Datapoint::dense(vec![1.0f32, 2.0, 3.0]);
        assert_eq!(dp.dimensionality(), 3);
        assert_eq!(dp.get(0), Some(1.0));
        assert_eq!(dp.get(2), Some(3.0));
        assert_eq!(dp.get(3), None);
    }

    #[test]
    fn test_datapoint_ptr() {
        let values = vec![1.0f32, 2.0, 3.0];
        let ptr = DatapointPtr::dense(&values);
        assert_eq!(ptr.dimensionality(), 3);
        assert_eq!(ptr.values(), &[1.0, 2.0, 3.0]);
        assert_eq!(ptr.to_owned(), Datapoint::from(values.as_slice()));
    }
}
