//! Error types for sentence-search

use thiserror::Error;

/// Errors raised while turning text into vectors
#[derive(Debug, Error)]
pub enum EmbeddingError {
    /// Text was empty or whitespace only
    #[error("Cannot embed empty text")]
    EmptyInput,

    /// Fixture table has no vector for this text
    #[error("No embedding available for text: {0:?}")]
    UnknownText(String),

    /// Model could not be loaded or resolved
    #[error("Model unavailable: {0}")]
    ModelUnavailable(String),

    /// Embedding backend failed
    #[error("Embedding backend error: {0}")]
    Backend(String),

    /// Produced or supplied vector has the wrong length
    #[error("Embedding dimension mismatch: expected {expected}, got {actual}")]
    DimensionMismatch { expected: usize, actual: usize },

    /// Fixture file could not be read
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Fixture file could not be parsed
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl EmbeddingError {
    /// Create a model unavailable error
    pub fn model(msg: impl Into<String>) -> Self {
        Self::ModelUnavailable(msg.into())
    }

    /// Create a backend error
    pub fn backend(msg: impl Into<String>) -> Self {
        Self::Backend(msg.into())
    }
}

/// Errors raised while building an index from a corpus
#[derive(Debug, Error, PartialEq)]
pub enum IndexBuildError {
    #[error("Cannot build an index from an empty corpus")]
    EmptyCorpus,

    #[error("Corpus vectors have zero dimensions")]
    ZeroDimension,

    #[error("Vector at position {position} has {actual} dimensions, expected {expected}")]
    InconsistentDimension {
        position: usize,
        expected: usize,
        actual: usize,
    },

    #[error("Vector at position {position} has a non-finite component")]
    NonFiniteVector { position: usize },
}

/// Errors raised while querying an index
#[derive(Debug, Error, PartialEq)]
pub enum QueryError {
    #[error("Query text is empty")]
    EmptyQuery,

    #[error("k must be at least 1, got {0}")]
    InvalidK(usize),

    #[error("Query vector has {actual} dimensions, index expects {expected}")]
    DimensionMismatch { expected: usize, actual: usize },

    #[error("Query vector has a non-finite component")]
    NonFiniteQuery,

    #[error("Index was built with model {index_model:?} but query embedder is {query_model:?}")]
    ModelMismatch {
        index_model: String,
        query_model: String,
    },
}

/// Any error surfaced by the search pipeline
#[derive(Debug, Error)]
pub enum SearchError {
    #[error(transparent)]
    Embedding(#[from] EmbeddingError),

    #[error(transparent)]
    IndexBuild(#[from] IndexBuildError),

    #[error(transparent)]
    Query(#[from] QueryError),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for search operations
pub type Result<T> = std::result::Result<T, SearchError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_query_error_display() {
        let err = QueryError::DimensionMismatch {
            expected: 384,
            actual: 3,
        };
        assert_eq!(
            err.to_string(),
            "Query vector has 3 dimensions, index expects 384"
        );
    }

    #[test]
    fn test_search_error_is_transparent() {
        let err: SearchError = IndexBuildError::EmptyCorpus.into();
        assert_eq!(
            err.to_string(),
            "Cannot build an index from an empty corpus"
        );
        assert!(matches!(
            err,
            SearchError::IndexBuild(IndexBuildError::EmptyCorpus)
        ));
    }

    #[test]
    fn test_embedding_error_helpers() {
        assert!(matches!(
            EmbeddingError::model("missing"),
            EmbeddingError::ModelUnavailable(m) if m == "missing"
        ));
        assert!(matches!(
            EmbeddingError::backend("onnx"),
            EmbeddingError::Backend(m) if m == "onnx"
        ));
    }
}
