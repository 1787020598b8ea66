//! HNSW approximate search
//!
//! Uses instant-distance HNSW for sub-linear nearest-neighbor lookups.

use instant_distance::{Builder, HnswMap, Point, Search};

use super::exact::ExactSearch;
use super::{by_distance_then_row, DistanceMetric, Matrix, Neighbor, NeighborSearch};

/// HNSW tuning parameters
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HnswParams {
    /// Candidate list size while building (default: 100)
    pub ef_construction: usize,
    /// Candidate list size while searching (default: 100)
    pub ef_search: usize,
    /// RNG seed for layer assignment, fixed for reproducible graphs
    pub seed: u64,
    /// Lowest acceptable recall@k against exact search (default: 0.9)
    pub min_recall: f32,
}

impl Default for HnswParams {
    fn default() -> Self {
        Self {
            ef_construction: 100,
            ef_search: 100,
            seed: 0x5e47_e4ce,
            min_recall: 0.9,
        }
    }
}

/// HNSW point wrapper
#[derive(Clone)]
struct IndexPoint {
    vector: Vec<f32>,
    metric: DistanceMetric,
}

impl Point for IndexPoint {
    fn distance(&self, other: &Self) -> f32 {
        // HNSW finds the minimum, both metrics are already distances
        self.metric.distance(&self.vector, &other.vector)
    }
}

/// HNSW graph whose values are corpus rows
pub struct HnswSearch {
    hnsw: HnswMap<IndexPoint, usize>,
    metric: DistanceMetric,
    params: HnswParams,
    fallback: ExactSearch,
}

impl HnswSearch {
    /// Build the graph over every row of the matrix
    pub fn build(matrix: &Matrix, metric: DistanceMetric, params: HnswParams) -> Self {
        let points: Vec<IndexPoint> = matrix
            .rows()
            .map(|row| IndexPoint {
                vector: row.to_vec(),
                metric,
            })
            .collect();
        let rows: Vec<usize> = (0..points.len()).collect();

        let hnsw = Builder::default()
            .ef_construction(params.ef_construction)
            .ef_search(params.ef_search)
            .seed(params.seed)
            .build(points, rows);

        log::debug!(
            "Built HNSW over {} rows (ef_construction {}, ef_search {})",
            matrix.len(),
            params.ef_construction,
            params.ef_search
        );

        Self {
            hnsw,
            metric,
            params,
            fallback: ExactSearch::new(metric),
        }
    }

    pub fn params(&self) -> &HnswParams {
        &self.params
    }
}

impl NeighborSearch for HnswSearch {
    fn name(&self) -> &'static str {
        "hnsw"
    }

    fn nearest(&self, matrix: &Matrix, query: &[f32], k: usize) -> Vec<Neighbor> {
        // The graph never yields more than ef_search candidates
        if k > self.params.ef_search {
            log::debug!(
                "k = {} exceeds ef_search = {}, falling back to exact scan",
                k,
                self.params.ef_search
            );
            return self.fallback.nearest(matrix, query, k);
        }

        let query_point = IndexPoint {
            vector: query.to_vec(),
            metric: self.metric,
        };

        let mut search = Search::default();
        let mut hits: Vec<Neighbor> = self
            .hnsw
            .search(&query_point, &mut search)
            .map(|item| Neighbor {
                row: *item.value,
                distance: item.distance,
            })
            .collect();

        hits.sort_unstable_by(by_distance_then_row);
        hits.truncate(k);
        hits
    }
}
