//! Precomputed embedding fixtures
//!
//! A lookup table from text to vector. Live models drift between versions,
//! so tests and reproducible runs pin vectors here instead.

use std::collections::HashMap;
use std::path::Path;

use serde::{Deserialize, Serialize};

use super::{ensure_dimension, ensure_non_empty, Embedder};
use crate::error::EmbeddingError;

fn default_fixture_model() -> String {
    "fixture".to_string()
}

/// On-disk fixture format
///
/// ```json
/// { "model": "fixture", "dimension": 3, "vectors": { "The dog ran.": [0.9, 0.1, 0.0] } }
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FixtureTable {
    #[serde(default = "default_fixture_model")]
    pub model: String,
    pub dimension: usize,
    #[serde(default)]
    pub vectors: HashMap<String, Vec<f32>>,
}

/// Embedder backed by a fixed table of vectors
#[derive(Debug, Clone)]
pub struct FixtureEmbedder {
    model_id: String,
    dimension: usize,
    vectors: HashMap<String, Vec<f32>>,
}

impl FixtureEmbedder {
    /// Create an empty fixture
    pub fn new(model_id: impl Into<String>, dimension: usize) -> Self {
        Self {
            model_id: model_id.into(),
            dimension,
            vectors: HashMap::new(),
        }
    }

    /// Add a vector, builder style
    pub fn with_vector(
        mut self,
        text: impl AsRef<str>,
        vector: Vec<f32>,
    ) -> Result<Self, EmbeddingError> {
        self.insert(text, vector)?;
        Ok(self)
    }

    /// Add a vector. Keys are stored trimmed.
    pub fn insert(&mut self, text: impl AsRef<str>, vector: Vec<f32>) -> Result<(), EmbeddingError> {
        let text = text.as_ref();
        ensure_non_empty(text)?;
        ensure_dimension(&vector, self.dimension)?;
        self.vectors.insert(text.trim().to_string(), vector);
        Ok(())
    }

    /// Build from a parsed table
    pub fn from_table(table: FixtureTable) -> Result<Self, EmbeddingError> {
        if table.dimension == 0 {
            return Err(EmbeddingError::model("Fixture dimension must be positive"));
        }
        let mut fixture = Self::new(table.model, table.dimension);
        for (text, vector) in table.vectors {
            fixture.insert(text, vector)?;
        }
        Ok(fixture)
    }

    /// Parse a JSON fixture
    pub fn from_json_str(json: &str) -> Result<Self, EmbeddingError> {
        let table: FixtureTable = serde_json::from_str(json)?;
        Self::from_table(table)
    }

    /// Load a JSON fixture from disk
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, EmbeddingError> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path)?;
        let fixture = Self::from_json_str(&json)?;
        log::info!(
            "Loaded embedding fixture {} ({} vectors, {}d)",
            path.display(),
            fixture.len(),
            fixture.dimension
        );
        Ok(fixture)
    }

    /// Number of stored vectors
    pub fn len(&self) -> usize {
        self.vectors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.vectors.is_empty()
    }

    /// Convert back into the serializable table
    pub fn to_table(&self) -> FixtureTable {
        FixtureTable {
            model: self.model_id.clone(),
            dimension: self.dimension,
            vectors: self.vectors.clone(),
        }
    }
}

impl Embedder for FixtureEmbedder {
    fn model_id(&self) -> &str {
        &self.model_id
    }

    fn dimension(&self) -> usize {
        self.dimension
    }

    fn embed(&self, text: &str) -> Result<Vec<f32>, EmbeddingError> {
        ensure_non_empty(text)?;
        let key = text.trim();
        self.vectors
            .get(key)
            .cloned()
            .ok_or_else(|| EmbeddingError::UnknownText(key.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    const JSON: &str = r#"{
        "model": "animals-v1",
        "dimension": 2,
        "vectors": {
            "dog": [1.0, 0.0],
            "cat": [0.0, 1.0]
        }
    }"#;

    #[test]
    fn test_from_json() {
        let fixture = FixtureEmbedder::from_json_str(JSON).unwrap();
        assert_eq!(fixture.model_id(), "animals-v1");
        assert_eq!(fixture.dimension(), 2);
        assert_eq!(fixture.len(), 2);
        assert_eq!(fixture.embed("dog").unwrap(), vec![1.0, 0.0]);
    }

    #[test]
    fn test_lookup_trims_input() {
        let fixture = FixtureEmbedder::from_json_str(JSON).unwrap();
        assert_eq!(fixture.embed("  cat\n").unwrap(), vec![0.0, 1.0]);
    }

    #[test]
    fn test_unknown_and_empty_text() {
        let fixture = FixtureEmbedder::from_json_str(JSON).unwrap();
        assert!(matches!(
            fixture.embed("hound"),
            Err(EmbeddingError::UnknownText(t)) if t == "hound"
        ));
        assert!(matches!(fixture.embed("   "), Err(EmbeddingError::EmptyInput)));
    }

    #[test]
    fn test_batch_preserves_order() {
        let fixture = FixtureEmbedder::from_json_str(JSON).unwrap();
        let vectors = fixture.embed_batch(&["cat", "dog", "cat"]).unwrap();
        assert_eq!(vectors, vec![vec![0.0, 1.0], vec![1.0, 0.0], vec![0.0, 1.0]]);
    }

    #[test]
    fn test_batch_fails_on_any_empty() {
        let fixture = FixtureEmbedder::from_json_str(JSON).unwrap();
        assert!(matches!(
            fixture.embed_batch(&["dog", ""]),
            Err(EmbeddingError::EmptyInput)
        ));
    }

    #[test]
    fn test_rejects_wrong_dimension() {
        let json = r#"{ "dimension": 2, "vectors": { "dog": [1.0, 0.0, 0.0] } }"#;
        let err = FixtureEmbedder::from_json_str(json).unwrap_err();
        assert!(matches!(
            err,
            EmbeddingError::DimensionMismatch {
                expected: 2,
                actual: 3
            }
        ));
    }

    #[test]
    fn test_rejects_zero_dimension() {
        let json = r#"{ "dimension": 0 }"#;
        assert!(matches!(
            FixtureEmbedder::from_json_str(json),
            Err(EmbeddingError::ModelUnavailable(_))
        ));
    }

    #[test]
    fn test_default_model_name() {
        let fixture =
            FixtureEmbedder::from_json_str(r#"{ "dimension": 1, "vectors": { "a": [1.0] } }"#)
                .unwrap();
        assert_eq!(fixture.model_id(), "fixture");
    }

    #[test]
    fn test_from_path() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(JSON.as_bytes()).unwrap();

        let fixture = FixtureEmbedder::from_path(file.path()).unwrap();
        assert_eq!(fixture.len(), 2);

        let table = fixture.to_table();
        assert_eq!(table.model, "animals-v1");
        assert_eq!(table.vectors["cat"], vec![0.0, 1.0]);
    }

    #[test]
    fn test_from_missing_path() {
        let err = FixtureEmbedder::from_path("/nonexistent/fixture.json").unwrap_err();
        assert!(matches!(err, EmbeddingError::Io(_)));
    }
}
