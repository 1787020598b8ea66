//! Model cache discovery
//!
//! Decides where fastembed downloads and caches ONNX model files.

use crate::error::EmbeddingError;
use std::ffi::OsString;
use std::path::PathBuf;

/// Find the model cache directory with priority:
/// 1. SENTENCE_SEARCH_MODELS_PATH environment variable
/// 2. FASTEMBED_CACHE_DIR environment variable
/// 3. User home directory (~/.sentence-search/models)
pub fn models_cache_dir() -> Result<PathBuf, EmbeddingError> {
    resolve_cache_dir(|key| std::env::var_os(key))
}

/// Same lookup as [`models_cache_dir`] over an arbitrary variable source
pub fn resolve_cache_dir<F>(lookup: F) -> Result<PathBuf, EmbeddingError>
where
    F: Fn(&str) -> Option<OsString>,
{
    // Priority 1: explicit override for this crate
    if let Some(path) = lookup("SENTENCE_SEARCH_MODELS_PATH").filter(|p| !p.is_empty()) {
        let path = PathBuf::from(path);
        log::info!("Using SENTENCE_SEARCH_MODELS_PATH: {}", path.display());
        return Ok(path);
    }

    // Priority 2: fastembed's own cache variable
    if let Some(path) = lookup("FASTEMBED_CACHE_DIR").filter(|p| !p.is_empty()) {
        let path = PathBuf::from(path);
        log::info!("Using FASTEMBED_CACHE_DIR: {}", path.display());
        return Ok(path);
    }

    // Priority 3: user home directory
    if let Some(home) = lookup("HOME").or_else(|| lookup("USERPROFILE")) {
        let user_path = PathBuf::from(home).join(".sentence-search").join("models");
        log::debug!("Using user model cache: {}", user_path.display());
        return Ok(user_path);
    }

    Err(EmbeddingError::model(
        "No model cache directory available. Checked:\n\
         - SENTENCE_SEARCH_MODELS_PATH environment variable\n\
         - FASTEMBED_CACHE_DIR environment variable\n\
         - HOME / USERPROFILE",
    ))
}
