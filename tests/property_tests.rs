//! Property-based tests for the exact search engine.
//!
//! These tests verify invariants that should hold regardless of input:
//! - nearest equals an independent brute-force minimum, lowest index on ties
//! - top-N picks are distinct and in non-decreasing distance order
//! - top-N leaves the cached matrix untouched
//! - range results are exactly the row entries below the radius

use exact_search::distance_measures::l1_distance;
use exact_search::prelude::*;
use proptest::prelude::*;

prop_compose! {
    // Small integer coordinates so ties are common.
    fn arb_points(max_points: usize, dim: usize)
        (rows in prop::collection::vec(prop::collection::vec(-4i32..4, dim), 1..max_points))
        -> Vec<Vec<f32>>
    {
        rows.into_iter()
            .map(|r| r.into_iter().map(|v| v as f32).collect())
            .collect()
    }
}

fn to_dataset(rows: Vec<Vec<f32>>) -> DenseDataset<f32> {
    DenseDataset::from_vecs(rows).unwrap()
}

proptest! {
    #[test]
    fn nearest_is_lowest_index_minimum(
        data in arb_points(30, 3),
        queries in arb_points(10, 3),
    ) {
        let data = to_dataset(data);
        let queries = to_dataset(queries);
        let mut engine = ExactSearchEngine::new(&data, &queries, 1, 1.0).unwrap();
        let nearest = engine.nearest_one(&DistanceMeasure::L1).unwrap();

        for (q, query) in queries.iter().enumerate() {
            let distances: Vec<f32> = data.iter().map(|d| l1_distance(&query, &d)).collect();
            let min = distances.iter().copied().fold(f32::INFINITY, f32::min);
            let first = distances.iter().position(|&d| d == min).unwrap();
            prop_assert_eq!(nearest[q], DistancePair::new(min, first as u32));
        }
    }

    #[test]
    fn top_n_picks_sorted_distinct_and_cache_intact(
        data in arb_points(25, 2),
        queries in arb_points(8, 2),
        n_frac in 0.0f64..=1.0,
    ) {
        let data = to_dataset(data);
        let queries = to_dataset(queries);
        let n = (n_frac * data.size() as f64).floor() as usize;
        let mut engine = ExactSearchEngine::new(&data, &queries, n, 1.0).unwrap();
        let l2 = DistanceMeasure::L2;

        let before = engine.nearest_one(&l2).unwrap();
        let snapshot = engine.matrix().unwrap().clone();
        let rounds = engine.top_n(&l2).unwrap();
        prop_assert_eq!(rounds.len(), n);

        for picks in by_query(&rounds) {
            for w in picks.windows(2) {
                prop_assert!(w[0].distance <= w[1].distance);
            }
            let mut ids: Vec<u32> = picks.iter().map(|p| p.index).collect();
            ids.sort_unstable();
            ids.dedup();
            prop_assert_eq!(ids.len(), n);
        }

        prop_assert_eq!(engine.matrix().unwrap(), &snapshot);
        prop_assert_eq!(engine.nearest_one(&l2).unwrap(), before);
    }

    #[test]
    fn range_is_exact_filter_and_grows(
        data in arb_points(30, 2),
        queries in arb_points(6, 2),
        radius in 0.0f32..6.0,
    ) {
        let data = to_dataset(data);
        let queries = to_dataset(queries);
        let mut engine = ExactSearchEngine::new(&data, &queries, 1, radius).unwrap();
        let chebyshev = DistanceMeasure::Chebyshev;

        let first = engine.range_query(&chebyshev).unwrap();
        for (q, hits) in first.iter().enumerate() {
            let expected: Vec<DistancePair> = engine
                .matrix()
                .unwrap()
                .row(q)
                .unwrap()
                .iter()
                .filter(|p| p.distance < radius)
                .copied()
                .collect();
            prop_assert_eq!(hits, &expected);
        }

        engine.double_radius();
        let second = engine.range_query(&chebyshev).unwrap();
        for (small, large) in first.iter().zip(&second) {
            prop_assert!(small.iter().all(|p| large.contains(p)));
        }
    }

    #[test]
    fn matrix_rows_are_indexed_by_datum(
        data in arb_points(20, 4),
        queries in arb_points(5, 4),
    ) {
        let data = to_dataset(data);
        let queries = to_dataset(queries);
        let mut engine = ExactSearchEngine::new(&data, &queries, 1, 1.0).unwrap();
        engine.compute_all_distances(&DistanceMeasure::SquaredL2).unwrap();

        let matrix = engine.matrix().unwrap();
        prop_assert_eq!(matrix.num_queries(), queries.size());
        prop_assert_eq!(matrix.num_data(), data.size());
        for row in matrix.rows() {
            for (d, pair) in row.iter().enumerate() {
                prop_assert_eq!(pair.index as usize, d);
            }
        }
    }
}
