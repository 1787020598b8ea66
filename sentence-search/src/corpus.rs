//! Text units and the ordered corpus they belong to

use serde::Serialize;

use crate::embedding::Embedder;
use crate::error::{IndexBuildError, Result};

/// One sentence of the source text with its embedding
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TextUnit {
    text: String,
    position: usize,
    #[serde(skip)]
    vector: Vec<f32>,
}

impl TextUnit {
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Offset of this unit in document order
    pub fn position(&self) -> usize {
        self.position
    }

    pub fn vector(&self) -> &[f32] {
        &self.vector
    }
}

/// Ordered sequence of text units, insertion order = document order.
///
/// Every unit's vector has the same dimensionality and positions run `0..len`.
#[derive(Debug, Clone, Default)]
pub struct Corpus {
    units: Vec<TextUnit>,
    dimension: usize,
    model_id: String,
}

/// True when every component is a finite number
pub(crate) fn is_finite(vector: &[f32]) -> bool {
    vector.iter().all(|x| x.is_finite())
}

impl Corpus {
    /// Assemble a corpus from texts and their precomputed vectors
    pub fn from_parts<I, S>(model_id: impl Into<String>, parts: I) -> std::result::Result<Self, IndexBuildError>
    where
        I: IntoIterator<Item = (S, Vec<f32>)>,
        S: Into<String>,
    {
        let mut units: Vec<TextUnit> = Vec::new();
        let mut dimension = 0;

        for (position, (text, vector)) in parts.into_iter().enumerate() {
            if position == 0 {
                dimension = vector.len();
            } else if vector.len() != dimension {
                return Err(IndexBuildError::InconsistentDimension {
                    position,
                    expected: dimension,
                    actual: vector.len(),
                });
            }
            if !is_finite(&vector) {
                return Err(IndexBuildError::NonFiniteVector { position });
            }
            units.push(TextUnit {
                text: text.into(),
                position,
                vector,
            });
        }

        Ok(Self {
            units,
            dimension,
            model_id: model_id.into(),
        })
    }

    /// Embed sentences in one batch and assemble them in order
    pub fn from_sentences<S: AsRef<str>>(sentences: &[S], embedder: &dyn Embedder) -> Result<Self> {
        let texts: Vec<&str> = sentences.iter().map(|s| s.as_ref().trim()).collect();
        let vectors = embedder.embed_batch(&texts)?;

        log::info!(
            "Embedded {} sentences with {} ({}d)",
            texts.len(),
            embedder.model_id(),
            embedder.dimension()
        );

        let corpus = Self::from_parts(embedder.model_id(), texts.into_iter().zip(vectors))?;
        Ok(corpus)
    }

    pub fn len(&self) -> usize {
        self.units.len()
    }

    pub fn is_empty(&self) -> bool {
        self.units.is_empty()
    }

    /// Vector dimensionality shared by every unit (0 when empty)
    pub fn dimension(&self) -> usize {
        self.dimension
    }

    /// Model that produced the vectors
    pub fn model_id(&self) -> &str {
        &self.model_id
    }

    pub fn get(&self, position: usize) -> Option<&TextUnit> {
        self.units.get(position)
    }

    pub fn units(&self) -> &[TextUnit] {
        &self.units
    }

    pub fn iter(&self) -> std::slice::Iter<'_, TextUnit> {
        self.units.iter()
    }

    /// Units in `[position, position + size)`, clamped at the corpus end
    pub fn window(&self, position: usize, size: usize) -> &[TextUnit] {
        let start = position.min(self.units.len());
        let end = position.saturating_add(size).min(self.units.len());
        &self.units[start..end]
    }
}

impl<'a> IntoIterator for &'a Corpus {
    type Item = &'a TextUnit;
    type IntoIter = std::slice::Iter<'a, TextUnit>;

    fn into_iter(self) -> Self::IntoIter {
        self.units.iter()
    }
}
