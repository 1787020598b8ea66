//! Caching decorator for any embedder

use dashmap::DashMap;
use std::sync::Arc;

use super::{ensure_non_empty, Embedder};
use crate::error::EmbeddingError;

/// Default number of cached embeddings
pub const DEFAULT_CACHE_CAPACITY: usize = 50_000;

/// Memoising [`Embedder`]
///
/// Wraps any [`Embedder`] with a DashMap cache keyed by trimmed input text.
/// The cache holds at most `capacity` entries. Once full, new texts are
/// still embedded but no longer stored, so the earliest texts (usually the
/// corpus) stay cached and later one-off queries do not grow memory.
pub struct VectorEngine {
    model: Arc<dyn Embedder>,
    cache: DashMap<String, Vec<f32>>,
    capacity: usize,
    dimension: usize,
}

impl VectorEngine {
    /// Create a VectorEngine over an embedder
    pub fn new(model: Arc<dyn Embedder>) -> Self {
        Self::with_capacity(model, DEFAULT_CACHE_CAPACITY)
    }

    /// Create a VectorEngine caching at most `capacity` embeddings (0 disables caching)
    pub fn with_capacity(model: Arc<dyn Embedder>, capacity: usize) -> Self {
        let dimension = model.dimension();
        log::debug!(
            "VectorEngine ready ({} {}d, cache capacity {})",
            model.model_id(),
            dimension,
            capacity
        );

        Self {
            model,
            cache: DashMap::new(),
            capacity,
            dimension,
        }
    }

    /// Number of cached embeddings
    pub fn cache_size(&self) -> usize {
        self.cache.len()
    }

    pub fn cache_capacity(&self) -> usize {
        self.capacity
    }

    fn remember(&self, key: &str, embedding: &[f32]) {
        if self.cache.len() < self.capacity {
            self.cache.insert(key.to_string(), embedding.to_vec());
        }
    }

    /// Drop every cached embedding
    pub fn clear_cache(&self) {
        self.cache.clear();
    }
}

impl Embedder for VectorEngine {
    fn model_id(&self) -> &str {
        self.model.model_id()
    }

    fn dimension(&self) -> usize {
        self.dimension
    }

    /// Cached lookup, falling back to the wrapped model
    fn embed(&self, text: &str) -> Result<Vec<f32>, EmbeddingError> {
        ensure_non_empty(text)?;
        let key = text.trim();

        if let Some(cached) = self.cache.get(key) {
            return Ok(cached.clone());
        }

        let embedding = self.model.embed(key)?;
        self.remember(key, &embedding);
        Ok(embedding)
    }

    /// Sends only cache misses to the wrapped model, in one batch
    fn embed_batch(&self, texts: &[&str]) -> Result<Vec<Vec<f32>>, EmbeddingError> {
        for text in texts {
            ensure_non_empty(text)?;
        }

        let mut results: Vec<Option<Vec<f32>>> = texts
            .iter()
            .map(|text| self.cache.get(text.trim()).map(|v| v.clone()))
            .collect();

        // Misses keep their slot so results stay in input order
        let uncached: Vec<(usize, &str)> = results
            .iter()
            .enumerate()
            .filter(|(_, cached)| cached.is_none())
            .map(|(i, _)| (i, texts[i].trim()))
            .collect();

        if uncached.is_empty() {
            return Ok(results.into_iter().flatten().collect());
        }

        let misses: Vec<&str> = uncached.iter().map(|(_, t)| *t).collect();
        let embedded = self.model.embed_batch(&misses)?;

        for ((slot, text), embedding) in uncached.iter().zip(embedded) {
            self.remember(text, &embedding);
            results[*slot] = Some(embedding);
        }

        Ok(results.into_iter().flatten().collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::embedding::FixtureEmbedder;

    fn engine() -> VectorEngine {
        let fixture = FixtureEmbedder::new("fixture", 2)
            .with_vector("dog", vec![1.0, 0.0])
            .unwrap()
            .with_vector("cat", vec![0.0, 1.0])
            .unwrap();
        VectorEngine::new(Arc::new(fixture))
    }

    #[test]
    fn test_embed_populates_cache() {
        let engine = engine();
        assert_eq!(engine.cache_size(), 0);

        assert_eq!(engine.embed("dog").unwrap(), vec![1.0, 0.0]);
        assert_eq!(engine.embed(" dog ").unwrap(), vec![1.0, 0.0]);
        assert_eq!(engine.cache_size(), 1);

        engine.clear_cache();
        assert_eq!(engine.cache_size(), 0);
    }

    #[test]
    fn test_batch_mixes_cached_and_new() {
        let engine = engine();
        engine.embed("cat").unwrap();

        let vectors = engine.embed_batch(&["dog", "cat", "dog"]).unwrap();
        assert_eq!(
            vectors,
            vec![vec![1.0, 0.0], vec![0.0, 1.0], vec![1.0, 0.0]]
        );
        assert_eq!(engine.cache_size(), 2);
    }

    #[test]
    fn test_errors_are_not_cached() {
        let engine = engine();
        assert!(matches!(
            engine.embed("hound"),
            Err(EmbeddingError::UnknownText(_))
        ));
        assert!(matches!(engine.embed(""), Err(EmbeddingError::EmptyInput)));
        assert_eq!(engine.cache_size(), 0);
    }

    #[test]
    fn test_cache_stops_growing_at_capacity() {
        let fixture = FixtureEmbedder::new("fixture", 2)
            .with_vector("dog", vec![1.0, 0.0])
            .unwrap()
            .with_vector("cat", vec![0.0, 1.0])
            .unwrap()
            .with_vector("hound", vec![0.9, 0.1])
            .unwrap();
        let engine = VectorEngine::with_capacity(Arc::new(fixture), 2);
        assert_eq!(engine.cache_capacity(), 2);

        engine.embed_batch(&["dog", "cat"]).unwrap();
        assert_eq!(engine.embed("hound").unwrap(), vec![0.9, 0.1]);
        assert_eq!(engine.embed_batch(&["hound", "dog"]).unwrap()[0], vec![0.9, 0.1]);
        assert_eq!(engine.cache_size(), 2);
    }

    #[test]
    fn test_zero_capacity_disables_cache() {
        let fixture = FixtureEmbedder::new("fixture", 2)
            .with_vector("dog", vec![1.0, 0.0])
            .unwrap();
        let engine = VectorEngine::with_capacity(Arc::new(fixture), 0);
        assert_eq!(engine.embed("dog").unwrap(), vec![1.0, 0.0]);
        assert_eq!(engine.cache_size(), 0);
    }

    #[test]
    fn test_delegates_identity() {
        let engine = engine();
        assert_eq!(engine.model_id(), "fixture");
        assert_eq!(engine.dimension(), 2);
    }
}
