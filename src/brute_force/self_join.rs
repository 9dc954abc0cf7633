//! Data-versus-data nearest neighbors.
//!
//! Hashing-based techniques size their bucket width from the typical gap
//! between a datapoint and its closest other datapoint. These helpers compute
//! that gap exactly, without going through the query-side cache.

use tracing::debug;

use crate::data_format::DenseDataset;
use crate::distance_measures::DistanceFunction;
use crate::error::{ExactError, InputSet, Result};
use crate::searcher::DistancePair;
use crate::types::{DatapointIndex, DatapointValue};
use crate::utils::parallel::{self, Schedule};

/// For every datapoint, its nearest *other* datapoint.
///
/// A datapoint never matches itself, even when duplicates exist elsewhere in
/// the dataset; a duplicate at another index is a valid match at distance 0.
/// Ties resolve to the lowest index.
pub fn nearest_other_datum<T, D>(data: &DenseDataset<T>, distance: &D) -> Result<Vec<DistancePair>>
where
    T: DatapointValue,
    D: DistanceFunction<T> + ?Sized,
{
    let n = data.size();
    if n == 0 {
        return Err(ExactError::EmptyInput(InputSet::Dataset));
    }
    if n < 2 {
        return Err(ExactError::InvalidNeighborCount {
            requested: 1,
            available: n - 1,
        });
    }

    let nearest = parallel::try_map_indices(n, Schedule::default(), |i| {
        let point = data.row(i);
        let mut best: Option<DistancePair> = None;
        for (j, other) in data.iter().enumerate() {
            if j == i {
                continue;
            }
            let dist = distance.distance(&point, &other);
            if dist.is_nan() {
                return Err(ExactError::InvalidDistance {
                    query: i as DatapointIndex,
                    datum: j as DatapointIndex,
                });
            }
            if best.map_or(true, |b| dist < b.distance) {
                best = Some(DistancePair::new(dist, j as DatapointIndex));
            }
        }
        // n >= 2, so every row has at least one candidate.
        best.ok_or(ExactError::EmptyInput(InputSet::Dataset))
    })?;

    debug!(datapoints = n, distance = distance.id(), "self join complete");
    Ok(nearest)
}

/// Mean distance from each datapoint to its nearest other datapoint.
pub fn mean_nearest_distance<T, D>(data: &DenseDataset<T>, distance: &D) -> Result<f32>
where
    T: DatapointValue,
    D: DistanceFunction<T> + ?Sized,
{
    let nearest = nearest_other_datum(data, distance)?;
    let sum: f64 = nearest.iter().map(|p| f64::from(p.distance)).sum();
    Ok((sum / nearest.len() as f64) as f32)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::distance_measures::DistanceMeasure;

    #[test]
    fn test_nearest_other_datum() {
        let data =
            DenseDataset::from_vecs(vec![vec![0.0f32, 0.0], vec![1.0, 0.0], vec![5.0, 5.0]]).unwrap();
        let nearest = nearest_other_datum(&data, &DistanceMeasure::L1).unwrap();

        assert_eq!(nearest[0], DistancePair::new(1.0, 1));
        assert_eq!(nearest[1], DistancePair::new(1.0, 0));
        assert_eq!(nearest[2], DistancePair::new(9.0, 1));
    }

    #[test]
    fn test_duplicates_match_each_other() {
        let data = DenseDataset::from_vecs(vec![vec![2.0f32], vec![2.0], vec![3.0]]).unwrap();
        let nearest = nearest_other_datum(&data, &DistanceMeasure::L2).unwrap();

        assert_eq!(nearest[0], DistancePair::new(0.0, 1));
        assert_eq!(nearest[1], DistancePair::new(0.0, 0));
        assert_eq!(nearest[2].index, 0);
    }

    #[test]
    fn test_mean_nearest_distance() {
        let data = DenseDataset::from_vecs(vec![vec![0.0f32], vec![1.0], vec![3.0]]).unwrap();
        // 1, 1, 2
        let mean = mean_nearest_distance(&data, &DistanceMeasure::L1).unwrap();
        assert!((mean - 4.0 / 3.0).abs() < 1e-6);
    }

    #[test]
    fn test_too_few_datapoints() {
        let single = DenseDataset::from_vecs(vec![vec![1.0f32]]).unwrap();
        assert_eq!(
            nearest_other_datum(&single, &DistanceMeasure::L2).unwrap_err(),
            ExactError::InvalidNeighborCount {
                requested: 1,
                available: 0
            }
        );

        let empty = DenseDataset::<f32>::new();
        assert_eq!(
            mean_nearest_distance(&empty, &DistanceMeasure::L2).unwrap_err(),
            ExactError::EmptyInput(InputSet::Dataset)
        );
    }
}
