//! Embedding service for call evaluation
//!
//! Features:
//! - Deterministic feature-hashing embedder (default, no model files)
//! - Sentence-transformer embedder via ONNX Runtime (`onnx` feature)
//! - Cosine similarity helpers
//! - Process-wide cache of canonical phrase-set embeddings

pub mod embedder;
pub mod phrase_bank;
pub mod similarity;

pub use embedder::{EmbeddingConfig, HashingEmbedder};
#[cfg(feature = "onnx")]
pub use embedder::OnnxEmbedder;
pub use phrase_bank::{CacheStats, PhraseBank, PhraseSet};
pub use similarity::{cosine_similarity, max_similarity, mean_similarity, normalize};

use std::sync::Arc;

use call_eval_config::{EmbeddingBackend, EmbeddingSettings};
use call_eval_core::Embedder;
use thiserror::Error;

/// Embedding errors
#[derive(Error, Debug)]
pub enum EmbeddingError {
    #[error("Embedding error: {0}")]
    Embedding(String),

    #[error("Model error: {0}")]
    Model(String),

    #[error("Dimension mismatch: expected {expected}, got {actual}")]
    DimensionMismatch { expected: usize, actual: usize },

    #[error("Backend not available: {0}")]
    Unavailable(String),
}

impl From<EmbeddingError> for call_eval_core::Error {
    fn from(err: EmbeddingError) -> Self {
        call_eval_core::Error::Embedding(err.to_string())
    }
}

/// Create the configured embedder
pub fn create_embedder(settings: &EmbeddingSettings) -> Result<Arc<dyn Embedder>, EmbeddingError> {
    let config = EmbeddingConfig {
        max_seq_len: settings.max_seq_len,
        embedding_dim: settings.dim,
        ..EmbeddingConfig::default()
    };

    match settings.backend {
        EmbeddingBackend::Hashing => {
            tracing::info!(dim = settings.dim, "Using hashing embedder");
            Ok(Arc::new(HashingEmbedder::new(config)))
        }
        #[cfg(feature = "onnx")]
        EmbeddingBackend::Onnx => {
            tracing::info!(model = %settings.model_path, "Loading ONNX embedder");
            let embedder = OnnxEmbedder::new(&settings.model_path, &settings.tokenizer_path, config)?;
            Ok(Arc::new(embedder))
        }
        #[cfg(not(feature = "onnx"))]
        EmbeddingBackend::Onnx => Err(EmbeddingError::Unavailable(
            "built without the `onnx` feature".to_string(),
        )),
    }
}
