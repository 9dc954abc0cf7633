//! Dense dataset storage.
//!
//! Both the dataset being searched and the query set are `DenseDataset`s.
//! Rows live in one cache-line aligned buffer, padded to a stride, and every
//! row has the same dimensionality.

use aligned_vec::{AVec, ConstAlign};

use crate::data_format::datapoint::DatapointPtr;
use crate::error::{ExactError, Result};
use crate::types::{align_up, DatapointIndex, DatapointValue, DimensionIndex, CACHE_LINE_BYTES};

/// A collection of fixed-dimension datapoints in contiguous memory.
pub struct DenseDataset<T: DatapointValue> {
    /// Contiguous storage for all values, aligned to a cache line.
    data: AVec<T, ConstAlign<CACHE_LINE_BYTES>>,

    /// Number of datapoints.
    num_points: usize,

    /// Dimensionality of each datapoint.
    dimensionality: DimensionIndex,

    /// Stride between datapoints (>= dimensionality).
    stride: usize,
}

impl<T: DatapointValue> DenseDataset<T> {
    /// Create an empty dataset.
    pub fn new() -> Self {
        Self {
            data: AVec::new(CACHE_LINE_BYTES),
            num_points: 0,
            dimensionality: 0,
            stride: 0,
        }
    }

    fn compute_stride(dimensionality: DimensionIndex) -> usize {
        let elems_per_line = (CACHE_LINE_BYTES / std::mem::size_of::<T>()).max(1);
        align_up(dimensionality as usize, elems_per_line)
    }

    /// Create a dataset from a vector of rows. All rows must share one
    /// non-zero dimensionality.
    pub fn from_vecs(vecs: Vec<Vec<T>>) -> Result<Self> {
        let Some(first) = vecs.first() else {
            return Ok(Self::new());
        };

        let dim = first.len();
        if dim == 0 {
            return Err(ExactError::invalid_argument("Dimensionality cannot be 0"));
        }
        if let Some((i, row)) = vecs.iter().enumerate().find(|(_, v)| v.len() != dim) {
            return Err(ExactError::invalid_argument(format!(
                "row {i} has {} dimensions, expected {dim}",
                row.len()
            )));
        }

        let dimensionality = dim as DimensionIndex;
        let stride = Self::compute_stride(dimensionality);
        let mut data: AVec<T, ConstAlign<CACHE_LINE_BYTES>> = AVec::new(CACHE_LINE_BYTES);
        data.resize(vecs.len() * stride, T::default());

        for (i, row) in vecs.iter().enumerate() {
            let offset = i * stride;
            data[offset..offset + dim].copy_from_slice(row);
        }

        Ok(Self {
            data,
            num_points: vecs.len(),
            dimensionality,
            stride,
        })
    }

    /// Create a dataset from a flat row-major array.
    pub fn from_flat(flat: &[T], dimensionality: DimensionIndex) -> Result<Self> {
        let dim = dimensionality as usize;
        if dim == 0 {
            return Err(ExactError::invalid_argument("Dimensionality cannot be 0"));
        }
        if flat.len() % dim != 0 {
            return Err(ExactError::invalid_argument(
                "Data length must be a multiple of dimensionality",
            ));
        }

        let mut dataset = Self::new();
        dataset.reserve(flat.len() / dim);
        for row in flat.chunks_exact(dim) {
            dataset.append(&DatapointPtr::dense(row))?;
        }
        Ok(dataset)
    }

    /// Append a datapoint. The first datapoint fixes the dimensionality.
    pub fn append(&mut self, datapoint: &DatapointPtr<'_, T>) -> Result<()> {
        if self.num_points == 0 {
            if datapoint.dimensionality() == 0 {
                return Err(ExactError::invalid_argument("Dimensionality cannot be 0"));
            }
            self.dimensionality = datapoint.dimensionality();
            self.stride = Self::compute_stride(self.dimensionality);
        } else if datapoint.dimensionality() != self.dimensionality {
            return Err(ExactError::invalid_argument(format!(
                "Datapoint dimensionality {} does not match dataset dimensionality {}",
                datapoint.dimensionality(),
                self.dimensionality
            )));
        }

        let old_len = self.data.len();
        self.data.resize(old_len + self.stride, T::default());
        let values = datapoint.values();
        self.data[old_len..old_len + values.len()].copy_from_slice(values);

        self.num_points += 1;
        Ok(())
    }

    /// Get the number of datapoints.
    #[inline]
    pub fn size(&self) -> usize {
        self.num_points
    }

    /// Check if the dataset is empty.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.num_points == 0
    }

    /// Get the dimensionality (0 while empty).
    #[inline]
    pub fn dimensionality(&self) -> DimensionIndex {
        self.dimensionality
    }

    /// Get the stride between datapoints.
    pub fn stride(&self) -> usize {
        self.stride
    }

    /// Get a datapoint by index.
    pub fn get(&self, index: DatapointIndex) -> Option<DatapointPtr<'_, T>> {
        let idx = index as usize;
        (idx < self.num_points).then(|| self.row(idx))
    }

    /// Iterate over the datapoints in index order.
    pub fn iter(&self) -> impl ExactSizeIterator<Item = DatapointPtr<'_, T>> + '_ {
        (0..self.num_points).map(move |i| self.row(i))
    }

    #[inline]
    pub(crate) fn row(&self, idx: usize) -> DatapointPtr<'_, T> {
        let offset = idx * self.stride;
        DatapointPtr::dense(&self.data[offset..offset + self.dimensionality as usize])
    }

    /// Reserve capacity for additional datapoints.
    pub fn reserve(&mut self, additional: usize) {
        self.data.reserve(additional * self.stride.max(1));
    }
}

impl<T: DatapointValue> Default for DenseDataset<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: DatapointValue> Clone for DenseDataset<T> {
    fn clone(&self) -> Self {
        let mut data: AVec<T, ConstAlign<CACHE_LINE_BYTES>> = AVec::new(CACHE_LINE_BYTES);
        data.reserve(self.data.len());
        for &val in self.data.iter() {
            data.push(val);
        }
        Self {
            data,
            num_points: self.num_points,
            dimensionality: self.dimensionality,
            stride: self.stride,
        }
    }
}

impl<T: DatapointValue> std::fmt::Debug for DenseDataset<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DenseDataset")
            .field("num_points", &self.num_points)
            .field("dimensionality", &self.dimensionality)
            .field("stride", &self.stride)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data_format::datapoint::Datapoint;

    #[test]
    fn test_dense_dataset_from_vecs() {
        let dataset = DenseDataset::from_vecs(vec![
            vec![1.0f32, 2.0, 3.0],
            vec![4.0, 5.0, 6.0],
            vec![7.0, 8.0, 9.0],
        ])
        .unwrap();

        assert_eq!(dataset.size(), 3);
        assert_eq!(dataset.dimensionality(), 3);
        assert_eq!(dataset.stride() % 16, 0);
        assert_eq!(dataset.get(0).unwrap().values(), &[1.0, 2.0, 3.0]);
        assert_eq!(dataset.get(1).unwrap().values(), &[4.0, 5.0, 6.0]);
    }

    #[test]
    fn test_ragged_rows_rejected() {
        let result = DenseDataset::from_vecs(vec![vec![1.0f32, 2.0], vec![3.0]]);
        assert!(result.is_err());

        let result = DenseDataset::<f32>::from_vecs(vec![vec![]]);
        assert!(result.is_err());
    }

    #[test]
    fn test_dense_dataset_from_flat() {
        let data = [1.0f32, 2.0, 3.0, 4.0, 5.0, 6.0];
        let dataset = DenseDataset::from_flat(&data, 3).unwrap();

        assert_eq!(dataset.size(), 2);
        assert_eq!(dataset.get(1).unwrap().values(), &[4.0, 5.0, 6.0]);

        assert!(DenseDataset::from_flat(&data, 4).is_err());
        assert!(DenseDataset::from_flat(&data, 0).is_err());
    }

    #[test]
    fn test_dense_dataset_append() {
        let mut dataset = DenseDataset::<f32>::new();

        dataset.append(&Datapoint::dense(vec![1.0, 2.0, 3.0]).as_ptr()).unwrap();
        dataset.append(&Datapoint::dense(vec![4.0, 5.0, 6.0]).as_ptr()).unwrap();
        assert!(dataset.append(&Datapoint::dense(vec![7.0, 8.0]).as_ptr()).is_err());

        assert_eq!(dataset.size(), 2);
        assert_eq!(dataset.get(1).unwrap().values(), &[4.0, 5.0, 6.0]);
    }

    #[test]
    fn test_iter_and_out_of_bounds() {
        let dataset = DenseDataset::from_vecs(vec![vec![1u8, 2], vec![3, 4]]).unwrap();
        let rows: Vec<_> = dataset.iter().map(|p| p.values().to_vec()).collect();
        assert_eq!(rows, vec![vec![1, 2], vec![3, 4]]);
        assert!(dataset.get(2).is_none());

        let cloned = dataset.clone();
        assert_eq!(cloned.get(1).unwrap().values(), &[3, 4]);
    }
}
