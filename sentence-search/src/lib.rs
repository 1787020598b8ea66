//! Sentence Search
//!
//! Semantic search over the sentences of a fixed text: embed every sentence,
//! index the vectors, and retrieve the sentences closest in meaning to a
//! query.
//!
//! ## Features
//!
//! - **Pluggable embeddings** - fastembed ONNX models, or precomputed fixtures for reproducible runs
//! - **Exact and approximate k-NN** - brute-force scan or instant-distance HNSW behind one trait
//! - **Deterministic ranking** - fixed metric per index, ties broken by corpus position
//! - **Context windows** - expand each match to the sentences that follow it
//!
//! ## Example
//!
//! ```ignore
//! use std::sync::Arc;
//! use sentence_search::{segment, FastEmbedder, Indexer, QueryPipeline, VectorEngine};
//!
//! let embedder = Arc::new(VectorEngine::new(Arc::new(FastEmbedder::try_default()?)));
//! let pipeline = QueryPipeline::new(embedder);
//!
//! let sentences = segment::split_sentences(&text);
//! let index = pipeline.index_sentences(&sentences, &Indexer::default())?;
//!
//! for m in pipeline.search("a dog barking", &index, 3)?.iter() {
//!     println!("{:.3} {}", m.distance, m.unit.text());
//! }
//! ```

pub mod corpus;
pub mod embedding;
pub mod error;
pub mod index;
pub mod search;
pub mod segment;

// Re-exports for convenience
pub use corpus::{Corpus, TextUnit};
pub use embedding::{Embedder, FastEmbedder, FixtureEmbedder, FixtureTable, ModelConfig, VectorEngine};
pub use error::{EmbeddingError, IndexBuildError, QueryError, Result, SearchError};
pub use index::{
    DistanceMetric, Hit, HnswParams, Index, IndexConfig, Indexer, Neighbor, SearchStrategy,
};
pub use search::{Match, QueryPipeline, SearchConfig, SearchResult};
