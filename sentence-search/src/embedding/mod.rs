//! Embedding module for semantic search
//!
//! The [`Embedder`] trait is the seam between text and vectors. Two
//! implementations ship with the crate: [`FastEmbedder`] runs a pretrained
//! ONNX model through fastembed, and [`FixtureEmbedder`] serves precomputed
//! vectors so results stay reproducible across model versions.
//! [`VectorEngine`] adds a cache in front of either.

mod discovery;
mod engine;
mod fixture;
mod pretrained;

use std::sync::Arc;

use crate::error::EmbeddingError;

pub use discovery::{models_cache_dir, resolve_cache_dir};
pub use engine::{VectorEngine, DEFAULT_CACHE_CAPACITY};
pub use fixture::{FixtureEmbedder, FixtureTable};
pub use pretrained::{canonical_model_id, resolve_model, FastEmbedder, ModelConfig};

/// Maps text to fixed-length vectors.
///
/// For a fixed model state embedding is a pure function of the input text.
/// Every vector returned by one embedder has exactly [`Embedder::dimension`]
/// components.
pub trait Embedder: Send + Sync {
    /// Identifier of the underlying model, recorded on every corpus it builds
    fn model_id(&self) -> &str;

    /// Output dimensionality
    fn dimension(&self) -> usize;

    /// Embed a single non-empty text
    fn embed(&self, text: &str) -> Result<Vec<f32>, EmbeddingError>;

    /// Embed several texts, preserving order
    fn embed_batch(&self, texts: &[&str]) -> Result<Vec<Vec<f32>>, EmbeddingError> {
        texts.iter().map(|text| self.embed(text)).collect()
    }
}

impl<E: Embedder + ?Sized> Embedder for Arc<E> {
    fn model_id(&self) -> &str {
        (**self).model_id()
    }

    fn dimension(&self) -> usize {
        (**self).dimension()
    }

    fn embed(&self, text: &str) -> Result<Vec<f32>, EmbeddingError> {
        (**self).embed(text)
    }

    fn embed_batch(&self, texts: &[&str]) -> Result<Vec<Vec<f32>>, EmbeddingError> {
        (**self).embed_batch(texts)
    }
}

/// Reject empty and whitespace-only input
pub(crate) fn ensure_non_empty(text: &str) -> Result<(), EmbeddingError> {
    if text.trim().is_empty() {
        Err(EmbeddingError::EmptyInput)
    } else {
        Ok(())
    }
}

/// Check that a backend honoured its declared dimensionality
pub(crate) fn ensure_dimension(vector: &[f32], expected: usize) -> Result<(), EmbeddingError> {
    if vector.len() == expected {
        Ok(())
    } else {
        Err(EmbeddingError::DimensionMismatch {
            expected,
            actual: vector.len(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ensure_non_empty() {
        assert!(ensure_non_empty("dog").is_ok());
        assert!(matches!(
            ensure_non_empty(""),
            Err(EmbeddingError::EmptyInput)
        ));
        assert!(matches!(
            ensure_non_empty(" \n\t"),
            Err(EmbeddingError::EmptyInput)
        ));
    }

    #[test]
    fn test_arc_embedder_delegates() {
        let fixture = FixtureEmbedder::new("fixture", 2)
            .with_vector("dog", vec![1.0, 0.0])
            .unwrap();
        let shared: Arc<dyn Embedder> = Arc::new(fixture);

        assert_eq!(shared.model_id(), "fixture");
        assert_eq!(shared.dimension(), 2);
        assert_eq!(shared.embed("dog").unwrap(), vec![1.0, 0.0]);
    }
}
