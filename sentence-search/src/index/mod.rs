//! Nearest-neighbor index over a corpus
//!
//! An [`Index`] snapshots the corpus vectors into a row-major matrix and
//! answers k-nearest-neighbor queries through a [`NeighborSearch`] strategy:
//! [`ExactSearch`] (linear scan) or [`HnswSearch`] (instant-distance HNSW).
//!
//! Query semantics are the same for both strategies:
//!
//! - distances use the metric fixed in [`IndexConfig`] at build time
//! - `k` larger than the corpus is clamped to the corpus size
//! - equal distances are ordered by ascending corpus position

mod exact;
mod hnsw;
mod metric;

use std::cmp::Ordering;
use std::collections::HashSet;
use std::sync::Arc;

use serde::Serialize;

use crate::corpus::{is_finite, Corpus, TextUnit};
use crate::error::{IndexBuildError, QueryError};

pub use exact::ExactSearch;
pub use hnsw::{HnswParams, HnswSearch};
pub use metric::{cosine_similarity, euclidean_distance, DistanceMetric};

/// Row-major `[rows, dimension]` vector matrix
#[derive(Debug, Clone, PartialEq)]
pub struct Matrix {
    data: Vec<f32>,
    dimension: usize,
}

impl Matrix {
    /// Copy rows into a matrix. Callers guarantee every row has `dimension` values.
    pub fn from_rows<'a, I>(dimension: usize, rows: I) -> Self
    where
        I: IntoIterator<Item = &'a [f32]>,
    {
        let mut data = Vec::new();
        for row in rows {
            debug_assert_eq!(row.len(), dimension);
            data.extend_from_slice(row);
        }
        Self { data, dimension }
    }

    pub fn dimension(&self) -> usize {
        self.dimension
    }

    /// Number of rows
    pub fn len(&self) -> usize {
        if self.dimension == 0 {
            0
        } else {
            self.data.len() / self.dimension
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn row(&self, row: usize) -> Option<&[f32]> {
        let start = row.checked_mul(self.dimension)?;
        self.data.get(start..start + self.dimension)
    }

    pub fn rows(&self) -> std::slice::ChunksExact<'_, f32> {
        self.data.chunks_exact(self.dimension.max(1))
    }
}

/// A matrix row and its distance to the query
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Neighbor {
    pub row: usize,
    pub distance: f32,
}

/// Ascending distance, then ascending row
pub(crate) fn by_distance_then_row(a: &Neighbor, b: &Neighbor) -> Ordering {
    a.distance
        .total_cmp(&b.distance)
        .then_with(|| a.row.cmp(&b.row))
}

/// Strategy for finding the nearest rows of a matrix.
///
/// Implementations receive a validated query (correct dimension, `1 <= k <= rows`)
/// and return at most `k` neighbors sorted by [`by_distance_then_row`].
pub trait NeighborSearch: Send + Sync {
    /// Short name for logs
    fn name(&self) -> &'static str;

    fn nearest(&self, matrix: &Matrix, query: &[f32], k: usize) -> Vec<Neighbor>;
}

/// How the index answers queries
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum SearchStrategy {
    /// Brute-force linear scan
    #[default]
    Exact,
    /// HNSW graph search
    Approximate(HnswParams),
}

/// Index configuration
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct IndexConfig {
    /// Distance metric, fixed per index (default: cosine)
    pub metric: DistanceMetric,
    /// Search strategy (default: exact)
    pub strategy: SearchStrategy,
}

/// A corpus unit matched by a query
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Hit<'a> {
    pub unit: &'a TextUnit,
    pub distance: f32,
}

/// Builds indexes with a fixed configuration
#[derive(Debug, Clone, Default)]
pub struct Indexer {
    config: IndexConfig,
}

impl Indexer {
    pub fn new(config: IndexConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &IndexConfig {
        &self.config
    }

    /// Snapshot the corpus vectors and build the search structure
    pub fn build(&self, corpus: Arc<Corpus>) -> Result<Index, IndexBuildError> {
        if corpus.is_empty() {
            return Err(IndexBuildError::EmptyCorpus);
        }

        let dimension = corpus.dimension();
        if dimension == 0 {
            return Err(IndexBuildError::ZeroDimension);
        }
        if let Some(unit) = corpus.iter().find(|u| u.vector().len() != dimension) {
            return Err(IndexBuildError::InconsistentDimension {
                position: unit.position(),
                expected: dimension,
                actual: unit.vector().len(),
            });
        }
        if let Some(unit) = corpus.iter().find(|u| !is_finite(u.vector())) {
            return Err(IndexBuildError::NonFiniteVector {
                position: unit.position(),
            });
        }

        let matrix = Matrix::from_rows(dimension, corpus.iter().map(TextUnit::vector));

        let search: Box<dyn NeighborSearch> = match self.config.strategy {
            SearchStrategy::Exact => Box::new(ExactSearch::new(self.config.metric)),
            SearchStrategy::Approximate(params) => {
                Box::new(HnswSearch::build(&matrix, self.config.metric, params))
            }
        };

        log::info!(
            "Built {} index over {} units ({}d, {} distance)",
            search.name(),
            matrix.len(),
            dimension,
            self.config.metric
        );

        Ok(Index {
            corpus,
            matrix,
            config: self.config,
            search,
        })
    }
}

/// Read-only nearest-neighbor index. Row `i` of the matrix is `corpus[i]`.
pub struct Index {
    corpus: Arc<Corpus>,
    matrix: Matrix,
    config: IndexConfig,
    search: Box<dyn NeighborSearch>,
}

impl Index {
    pub fn corpus(&self) -> &Arc<Corpus> {
        &self.corpus
    }

    pub fn config(&self) -> &IndexConfig {
        &self.config
    }

    pub fn metric(&self) -> DistanceMetric {
        self.config.metric
    }

    pub fn dimension(&self) -> usize {
        self.matrix.dimension()
    }

    pub fn len(&self) -> usize {
        self.matrix.len()
    }

    pub fn is_empty(&self) -> bool {
        self.matrix.is_empty()
    }

    /// Indexed vector for a corpus position
    pub fn row(&self, row: usize) -> Option<&[f32]> {
        self.matrix.row(row)
    }

    /// Name of the active search strategy
    pub fn strategy_name(&self) -> &'static str {
        self.search.name()
    }

    /// Nearest rows to `vector`, at most `min(k, len)` of them
    pub fn nearest(&self, vector: &[f32], k: usize) -> Result<Vec<Neighbor>, QueryError> {
        let k = self.validate(vector, k)?;
        Ok(self.search.nearest(&self.matrix, vector, k))
    }

    /// Nearest corpus units to `vector`, most similar first
    pub fn query(&self, vector: &[f32], k: usize) -> Result<Vec<Hit<'_>>, QueryError> {
        let neighbors = self.nearest(vector, k)?;
        Ok(neighbors
            .into_iter()
            .filter_map(|n| {
                self.corpus.get(n.row).map(|unit| Hit {
                    unit,
                    distance: n.distance,
                })
            })
            .collect())
    }

    /// Mean recall@k of this index's strategy against an exact scan
    pub fn recall_against_exact(&self, queries: &[Vec<f32>], k: usize) -> Result<f32, QueryError> {
        if queries.is_empty() {
            return Ok(1.0);
        }

        let exact = ExactSearch::new(self.config.metric);
        let mut total = 0.0_f32;

        for query in queries {
            let k = self.validate(query, k)?;
            let truth: HashSet<usize> = exact
                .nearest(&self.matrix, query, k)
                .into_iter()
                .map(|n| n.row)
                .collect();
            let found = self
                .search
                .nearest(&self.matrix, query, k)
                .into_iter()
                .filter(|n| truth.contains(&n.row))
                .count();
            total += found as f32 / truth.len() as f32;
        }

        Ok(total / queries.len() as f32)
    }

    /// Check dimension and k, returning k clamped to the corpus size
    fn validate(&self, vector: &[f32], k: usize) -> Result<usize, QueryError> {
        if vector.len() != self.dimension() {
            return Err(QueryError::DimensionMismatch {
                expected: self.dimension(),
                actual: vector.len(),
            });
        }
        if !is_finite(vector) {
            return Err(QueryError::NonFiniteQuery);
        }
        if k == 0 {
            return Err(QueryError::InvalidK(k));
        }
        Ok(k.min(self.len()))
    }
}

impl std::fmt::Debug for Index {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Index")
            .field("len", &self.len())
            .field("dimension", &self.dimension())
            .field("metric", &self.config.metric)
            .field("strategy", &self.search.name())
            .finish()
    }
}
