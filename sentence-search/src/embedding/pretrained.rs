//! Pretrained ONNX embeddings via fastembed

use std::path::PathBuf;

use fastembed::{EmbeddingModel, InitOptions, TextEmbedding};

use super::discovery::models_cache_dir;
use super::{ensure_dimension, ensure_non_empty, Embedder};
use crate::error::EmbeddingError;

/// Pretrained model configuration
#[derive(Debug, Clone)]
pub struct ModelConfig {
    /// Model name, either a short alias or a fastembed model code (default: bge-small-en-v1.5)
    pub model_name: String,
    /// Cache directory override; discovered from the environment when unset
    pub cache_dir: Option<PathBuf>,
    /// Batch size for encoding (default: 256)
    pub batch_size: usize,
    /// Print download progress on first use (default: false)
    pub show_download_progress: bool,
}

impl Default for ModelConfig {
    fn default() -> Self {
        Self {
            model_name: "bge-small-en-v1.5".to_string(),
            cache_dir: None,
            batch_size: 256,
            show_download_progress: false,
        }
    }
}

/// Resolve a model name to a fastembed model.
///
/// Accepts any exact fastembed model code, or a short alias optionally
/// prefixed with an organisation such as `BAAI/` or `sentence-transformers/`.
pub fn resolve_model(name: &str) -> Result<EmbeddingModel, EmbeddingError> {
    let name = name.trim();

    // Exact model codes first, quantized variants share the short names below
    if let Some(info) = TextEmbedding::list_supported_models()
        .into_iter()
        .find(|info| info.model_code.eq_ignore_ascii_case(name))
    {
        return Ok(info.model);
    }

    let lowered = name.to_ascii_lowercase();
    let short = lowered.rsplit('/').next().unwrap_or(lowered.as_str());

    match short {
        "bge-small-en-v1.5" => Ok(EmbeddingModel::BGESmallENV15),
        "bge-base-en-v1.5" => Ok(EmbeddingModel::BGEBaseENV15),
        "bge-large-en-v1.5" => Ok(EmbeddingModel::BGELargeENV15),
        "all-minilm-l6-v2" => Ok(EmbeddingModel::AllMiniLML6V2),
        "all-minilm-l12-v2" => Ok(EmbeddingModel::AllMiniLML12V2),
        "nomic-embed-text-v1.5" => Ok(EmbeddingModel::NomicEmbedTextV15),
        _ => Err(EmbeddingError::model(format!(
            "Unknown embedding model: {}",
            name
        ))),
    }
}

/// The fastembed model code for a resolved model, e.g. `BAAI/bge-small-en-v1.5`
fn model_code(model: &EmbeddingModel) -> Option<String> {
    TextEmbedding::list_supported_models()
        .into_iter()
        .find(|info| &info.model == model)
        .map(|info| info.model_code)
}

/// Identity recorded for a model name.
///
/// Every spelling that resolves to the same fastembed model shares one id,
/// so an alias and its full model code never count as different models.
pub fn canonical_model_id(name: &str) -> Result<String, EmbeddingError> {
    let model = resolve_model(name)?;
    Ok(model_code(&model).unwrap_or_else(|| name.trim().to_string()))
}

/// fastembed model wrapper
pub struct FastEmbedder {
    model: TextEmbedding,
    model_id: String,
    config: ModelConfig,
    dimension: usize,
}

impl FastEmbedder {
    /// Load the default model (bge-small-en-v1.5)
    pub fn try_default() -> Result<Self, EmbeddingError> {
        Self::new(ModelConfig::default())
    }

    /// Load a model, downloading it into the cache directory on first use
    pub fn new(config: ModelConfig) -> Result<Self, EmbeddingError> {
        let model_kind = resolve_model(&config.model_name)?;
        let model_id =
            model_code(&model_kind).unwrap_or_else(|| config.model_name.trim().to_string());
        let cache_dir = match &config.cache_dir {
            Some(dir) => dir.clone(),
            None => models_cache_dir()?,
        };

        log::info!(
            "Loading embedding model {} (cache: {})",
            model_id,
            cache_dir.display()
        );

        let options = InitOptions::new(model_kind)
            .with_cache_dir(cache_dir)
            .with_show_download_progress(config.show_download_progress);

        let model = TextEmbedding::try_new(options).map_err(|e| {
            EmbeddingError::model(format!("Failed to load {}: {}", model_id, e))
        })?;

        // Get dimension by encoding test string
        let probe = model
            .embed(vec!["test"], None)
            .map_err(|e| EmbeddingError::model(format!("Failed to encode test string: {}", e)))?;
        let dimension = probe
            .first()
            .map(Vec::len)
            .filter(|d| *d > 0)
            .ok_or_else(|| EmbeddingError::model("Model produced an empty probe embedding"))?;

        log::info!(
            "Loaded {} ({}d, batch size {})",
            model_id,
            dimension,
            config.batch_size
        );

        Ok(Self {
            model,
            model_id,
            config,
            dimension,
        })
    }

    /// Get configuration
    pub fn config(&self) -> &ModelConfig {
        &self.config
    }
}

impl Embedder for FastEmbedder {
    fn model_id(&self) -> &str {
        &self.model_id
    }

    fn dimension(&self) -> usize {
        self.dimension
    }

    fn embed(&self, text: &str) -> Result<Vec<f32>, EmbeddingError> {
        let mut vectors = self.embed_batch(&[text])?;
        vectors
            .pop()
            .ok_or_else(|| EmbeddingError::backend("Model returned no embedding"))
    }

    fn embed_batch(&self, texts: &[&str]) -> Result<Vec<Vec<f32>>, EmbeddingError> {
        if texts.is_empty() {
            return Ok(vec![]);
        }
        for text in texts {
            ensure_non_empty(text)?;
        }

        let vectors = self
            .model
            .embed(texts.to_vec(), Some(self.config.batch_size))
            .map_err(|e| EmbeddingError::backend(format!("Failed to encode texts: {}", e)))?;

        if vectors.len() != texts.len() {
            return Err(EmbeddingError::backend(format!(
                "Model returned {} embeddings for {} texts",
                vectors.len(),
                texts.len()
            )));
        }
        for vector in &vectors {
            ensure_dimension(vector, self.dimension)?;
        }

        Ok(vectors)
    }
}
