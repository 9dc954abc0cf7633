//! Comparing approximate answers against the exact baseline.
//!
//! - `by_query`: regroup round-major top-N output per query
//! - `recall_at_n`: fraction of the exact neighbors that were retrieved
//! - `approximation_ratio`: how much farther the approximate nearest is

use std::collections::HashSet;

use crate::searcher::DistancePair;
use crate::types::DatapointIndex;

/// Transpose round-major `top_n` output into one list per query.
///
/// `by_query(rounds)[q][r] == rounds[r][q]`. Every round must cover the same
/// number of queries; extra entries in longer rounds are ignored.
pub fn by_query(rounds: &[Vec<DistancePair>]) -> Vec<Vec<DistancePair>> {
    let num_queries = rounds.iter().map(Vec::len).min().unwrap_or(0);
    (0..num_queries)
        .map(|q| rounds.iter().map(|round| round[q]).collect())
        .collect()
}

/// Fraction of the `exact` neighbors present in `approx`.
///
/// Membership is by datapoint index; both lists belong to one query. Returns
/// 0.0 when `exact` is empty.
pub fn recall_at_n(exact: &[DistancePair], approx: &[DistancePair]) -> f32 {
    if exact.is_empty() {
        return 0.0;
    }

    let truth: HashSet<DatapointIndex> = exact.iter().map(|p| p.index).collect();
    let retrieved: HashSet<DatapointIndex> = approx.iter().map(|p| p.index).collect();
    truth.intersection(&retrieved).count() as f32 / truth.len() as f32
}

/// Mean of [`recall_at_n`] over queries.
pub fn mean_recall(exact: &[Vec<DistancePair>], approx: &[Vec<DistancePair>]) -> f32 {
    if exact.is_empty() {
        return 0.0;
    }

    let total: f32 = exact
        .iter()
        .zip(approx)
        .map(|(e, a)| recall_at_n(e, a))
        .sum();
    total / exact.len() as f32
}

/// Mean of `approx.distance / exact.distance` over queries.
///
/// Queries whose exact nearest distance is zero are skipped. `None` if no
/// query remains.
pub fn approximation_ratio(exact: &[DistancePair], approx: &[DistancePair]) -> Option<f32> {
    let ratios: Vec<f32> = exact
        .iter()
        .zip(approx)
        .filter(|(e, _)| e.distance > 0.0)
        .map(|(e, a)| a.distance / e.distance)
        .collect();

    if ratios.is_empty() {
        return None;
    }
    Some(ratios.iter().sum::<f32>() / ratios.len() as f32)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pairs(items: &[(f32, u32)]) -> Vec<DistancePair> {
        items.iter().map(|&(d, i)| DistancePair::new(d, i)).collect()
    }

    #[test]
    fn test_by_query() {
        let rounds = vec![pairs(&[(0.0, 0), (0.5, 3)]), pairs(&[(1.0, 1), (0.7, 2)])];
        let grouped = by_query(&rounds);

        assert_eq!(grouped.len(), 2);
        assert_eq!(grouped[0], pairs(&[(0.0, 0), (1.0, 1)]));
        assert_eq!(grouped[1], pairs(&[(0.5, 3), (0.7, 2)]));
        assert!(by_query(&[]).is_empty());
    }

    #[test]
    fn test_recall_at_n() {
        let exact = pairs(&[(0.1, 1), (0.2, 2), (0.3, 3), (0.4, 4)]);
        let approx = pairs(&[(0.1, 1), (0.3, 3), (0.9, 9), (1.0, 7)]);

        assert_eq!(recall_at_n(&exact, &approx), 0.5);
        assert_eq!(recall_at_n(&exact, &exact), 1.0);
        assert_eq!(recall_at_n(&[], &approx), 0.0);
    }

    #[test]
    fn test_mean_recall() {
        let exact = vec![pairs(&[(0.0, 0), (1.0, 1)]), pairs(&[(0.0, 2), (1.0, 3)])];
        let approx = vec![pairs(&[(0.0, 0), (1.0, 1)]), pairs(&[(0.0, 2), (2.0, 5)])];

        assert_eq!(mean_recall(&exact, &approx), 0.75);
        assert_eq!(mean_recall(&[], &[]), 0.0);
    }

    #[test]
    fn test_approximation_ratio() {
        let exact = pairs(&[(1.0, 0), (2.0, 1), (0.0, 2)]);
        let approx = pairs(&[(1.0, 0), (3.0, 4), (5.0, 6)]);

        // (1.0 + 1.5) / 2, third query skipped
        assert_eq!(approximation_ratio(&exact, &approx), Some(1.25));
        assert_eq!(
            approximation_ratio(&pairs(&[(0.0, 0)]), &pairs(&[(1.0, 1)])),
            None
        );
    }
}
