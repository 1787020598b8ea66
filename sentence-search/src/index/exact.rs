//! Brute-force nearest-neighbor search

use super::{by_distance_then_row, Matrix, Neighbor, NeighborSearch};
use crate::index::DistanceMetric;

/// Linear scan with a partial sort. Exact, and the reference the
/// approximate strategy is measured against.
#[derive(Debug, Clone, Copy)]
pub struct ExactSearch {
    metric: DistanceMetric,
}

impl ExactSearch {
    pub fn new(metric: DistanceMetric) -> Self {
        Self { metric }
    }
}

impl NeighborSearch for ExactSearch {
    fn name(&self) -> &'static str {
        "exact"
    }

    fn nearest(&self, matrix: &Matrix, query: &[f32], k: usize) -> Vec<Neighbor> {
        let mut scored: Vec<Neighbor> = matrix
            .rows()
            .enumerate()
            .map(|(row, vector)| Neighbor {
                row,
                distance: self.metric.distance(query, vector),
            })
            .collect();

        if k == 0 {
            return Vec::new();
        }
        if k < scored.len() {
            scored.select_nth_unstable_by(k - 1, by_distance_then_row);
            scored.truncate(k);
        }
        // Total order on (distance, row), so unstable sorting is deterministic
        scored.sort_unstable_by(by_distance_then_row);
        scored
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn matrix() -> Matrix {
        Matrix::from_rows(
            2,
            [
                vec![0.0, 0.0],
                vec![3.0, 0.0],
                vec![1.0, 0.0],
                vec![0.0, 1.0],
                vec![2.0, 0.0],
            ]
            .iter()
            .map(Vec::as_slice),
        )
    }

    #[test]
    fn test_returns_k_sorted() {
        let search = ExactSearch::new(DistanceMetric::Euclidean);
        let hits = search.nearest(&matrix(), &[0.0, 0.0], 3);

        let rows: Vec<usize> = hits.iter().map(|h| h.row).collect();
        // rows 2 and 3 are both at distance 1; lower row wins
        assert_eq!(rows, vec![0, 2, 3]);
        assert_eq!(hits[0].distance, 0.0);
    }

    #[test]
    fn test_k_larger_than_rows() {
        let search = ExactSearch::new(DistanceMetric::Euclidean);
        let hits = search.nearest(&matrix(), &[3.0, 0.0], 10);
        assert_eq!(hits.len(), 5);
        let rows: Vec<usize> = hits.iter().map(|h| h.row).collect();
        assert_eq!(rows, vec![1, 4, 2, 0, 3]);
    }

    #[test]
    fn test_cosine_metric() {
        let search = ExactSearch::new(DistanceMetric::Cosine);
        let hits = search.nearest(&matrix(), &[0.0, 5.0], 1);
        assert_eq!(hits[0].row, 3);
        assert!(hits[0].distance.abs() < 1e-6);
    }

    #[test]
    fn test_k_zero() {
        let search = ExactSearch::new(DistanceMetric::Cosine);
        assert!(search.nearest(&matrix(), &[1.0, 0.0], 0).is_empty());
    }
}
