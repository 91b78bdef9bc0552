//! Text embedders
//!
//! `HashingEmbedder` projects word unigrams and bigrams into a fixed number of
//! signed buckets. Identical texts embed identically and texts without shared
//! words are close to orthogonal, which is all the phrase-set detectors need
//! from a deterministic backend. `OnnxEmbedder` runs a sentence-transformer.

#[cfg(feature = "onnx")]
use std::path::Path;

#[cfg(feature = "onnx")]
use ndarray::Array2;
#[cfg(feature = "onnx")]
use ort::{GraphOptimizationLevel, Session};
#[cfg(feature = "onnx")]
use tokenizers::Tokenizer;

use once_cell::sync::Lazy;
use regex::Regex;

use call_eval_core::{Embedder, Result};

#[cfg(feature = "onnx")]
use crate::EmbeddingError;
use crate::similarity::normalize;

static WORD_PATTERN: Lazy<Regex> = Lazy::new(|| Regex::new(r"[a-z0-9]+(?:'[a-z]+)?").unwrap());

/// Weight of a bigram feature relative to a unigram
const BIGRAM_WEIGHT: f32 = 0.5;

/// Embedding configuration
#[derive(Debug, Clone)]
pub struct EmbeddingConfig {
    /// Maximum sequence length
    pub max_seq_len: usize,
    /// Embedding dimension
    pub embedding_dim: usize,
    /// Normalize embeddings
    pub normalize: bool,
    /// Batch size for bulk embedding
    pub batch_size: usize,
    /// ONNX output tensor holding token embeddings
    pub output_name: String,
}

impl Default for EmbeddingConfig {
    fn default() -> Self {
        Self {
            max_seq_len: 256,
            embedding_dim: 384,
            normalize: true,
            batch_size: 32,
            output_name: "last_hidden_state".to_string(),
        }
    }
}

/// Deterministic feature-hashing embedder
#[derive(Debug, Clone)]
pub struct HashingEmbedder {
    config: EmbeddingConfig,
}

impl HashingEmbedder {
    pub fn new(config: EmbeddingConfig) -> Self {
        Self { config }
    }

    fn words(text: &str) -> Vec<String> {
        let lowered = text.to_lowercase().replace(['\u{2019}', '\u{2018}'], "'");
        WORD_PATTERN
            .find_iter(&lowered)
            .map(|m| m.as_str().to_string())
            .collect()
    }

    /// FNV-1a, stable across runs and platforms
    fn hash(feature: &str) -> u64 {
        let mut hash: u64 = 0xcbf2_9ce4_8422_2325;
        for byte in feature.as_bytes() {
            hash ^= u64::from(*byte);
            hash = hash.wrapping_mul(0x0000_0100_0000_01b3);
        }
        hash
    }

    fn add_feature(&self, embedding: &mut [f32], feature: &str, weight: f32) {
        let hash = Self::hash(feature);
        let idx = (hash % self.config.embedding_dim as u64) as usize;
        let sign = if hash >> 63 == 0 { 1.0 } else { -1.0 };
        embedding[idx] += sign * weight;
    }

    /// Embed without the `Result` wrapper
    pub fn embed_text(&self, text: &str) -> Vec<f32> {
        let mut embedding = vec![0.0f32; self.config.embedding_dim];
        if self.config.embedding_dim == 0 {
            return embedding;
        }

        let words = Self::words(text);
        for word in &words {
            self.add_feature(&mut embedding, word, 1.0);
        }
        for pair in words.windows(2) {
            let bigram = format!("{} {}", pair[0], pair[1]);
            self.add_feature(&mut embedding, &bigram, BIGRAM_WEIGHT);
        }

        if self.config.normalize {
            normalize(&mut embedding);
        }

        embedding
    }
}

impl Default for HashingEmbedder {
    fn default() -> Self {
        Self::new(EmbeddingConfig::default())
    }
}

impl Embedder for HashingEmbedder {
    fn embed(&self, text: &str) -> Result<Vec<f32>> {
        Ok(self.embed_text(text))
    }

    fn dim(&self) -> usize {
        self.config.embedding_dim
    }
}

/// Sentence-transformer embedder using an ONNX model
#[cfg(feature = "onnx")]
pub struct OnnxEmbedder {
    session: Session,
    tokenizer: Tokenizer,
    config: EmbeddingConfig,
}

#[cfg(feature = "onnx")]
impl OnnxEmbedder {
    /// Load the model and tokenizer
    pub fn new(
        model_path: impl AsRef<Path>,
        tokenizer_path: impl AsRef<Path>,
        config: EmbeddingConfig,
    ) -> std::result::Result<Self, EmbeddingError> {
        let session = Session::builder()
            .map_err(|e| EmbeddingError::Model(e.to_string()))?
            .with_optimization_level(GraphOptimizationLevel::Level3)
            .map_err(|e| EmbeddingError::Model(e.to_string()))?
            .with_intra_threads(2)
            .map_err(|e| EmbeddingError::Model(e.to_string()))?
            .commit_from_file(model_path)
            .map_err(|e| EmbeddingError::Model(e.to_string()))?;

        let tokenizer = Tokenizer::from_file(tokenizer_path)
            .map_err(|e| EmbeddingError::Model(e.to_string()))?;

        Ok(Self {
            session,
            tokenizer,
            config,
        })
    }

    fn embed_chunk(&self, texts: &[&str]) -> std::result::Result<Vec<Vec<f32>>, EmbeddingError> {
        let batch_size = texts.len();
        let max_len = self.config.max_seq_len;

        let encodings = self
            .tokenizer
            .encode_batch(texts.to_vec(), true)
            .map_err(|e| EmbeddingError::Embedding(e.to_string()))?;

        let mut input_ids = vec![0i64; batch_size * max_len];
        let mut attention_mask = vec![0i64; batch_size * max_len];
        let mut token_type_ids = vec![0i64; batch_size * max_len];

        for (i, encoding) in encodings.iter().enumerate() {
            let ids = encoding.get_ids();
            let mask = encoding.get_attention_mask();
            let types = encoding.get_type_ids();

            let len = ids.len().min(max_len);
            let offset = i * max_len;

            for j in 0..len {
                input_ids[offset + j] = ids[j] as i64;
                attention_mask[offset + j] = mask[j] as i64;
                token_type_ids[offset + j] = types[j] as i64;
            }
        }

        let shape = (batch_size, max_len);
        let to_array = |v: Vec<i64>| {
            Array2::from_shape_vec(shape, v).map_err(|e| EmbeddingError::Embedding(e.to_string()))
        };
        let input_ids = to_array(input_ids)?;
        let mask_array = to_array(attention_mask.clone())?;
        let token_type_ids = to_array(token_type_ids)?;

        let outputs = self
            .session
            .run(
                ort::inputs![
                    "input_ids" => input_ids.view(),
                    "attention_mask" => mask_array.view(),
                    "token_type_ids" => token_type_ids.view(),
                ]
                .map_err(|e| EmbeddingError::Model(e.to_string()))?,
            )
            .map_err(|e| EmbeddingError::Model(e.to_string()))?;

        let hidden = outputs
            .get(self.config.output_name.as_str())
            .ok_or_else(|| {
                EmbeddingError::Model(format!("Missing output tensor: {}", self.config.output_name))
            })?
            .try_extract_tensor::<f32>()
            .map_err(|e| EmbeddingError::Model(e.to_string()))?;
        let hidden = hidden.view();

        let mut embeddings = Vec::with_capacity(batch_size);
        for i in 0..batch_size {
            // mean pooling over attended tokens
            let mut embedding = vec![0.0f32; self.config.embedding_dim];
            let mut count = 0.0f32;
            for j in 0..max_len {
                if attention_mask[i * max_len + j] == 0 {
                    continue;
                }
                count += 1.0;
                for (k, slot) in embedding.iter_mut().enumerate() {
                    *slot += hidden[[i, j, k]];
                }
            }
            if count > 0.0 {
                for v in &mut embedding {
                    *v /= count;
                }
            }
            if self.config.normalize {
                normalize(&mut embedding);
            }
            embeddings.push(embedding);
        }

        Ok(embeddings)
    }
}

#[cfg(feature = "onnx")]
impl Embedder for OnnxEmbedder {
    fn embed(&self, text: &str) -> Result<Vec<f32>> {
        let mut batch = self.embed_batch(&[text])?;
        batch
            .pop()
            .ok_or_else(|| EmbeddingError::Embedding("empty batch output".to_string()).into())
    }

    fn embed_batch(&self, texts: &[&str]) -> Result<Vec<Vec<f32>>> {
        let mut all = Vec::with_capacity(texts.len());
        for chunk in texts.chunks(self.config.batch_size.max(1)) {
            all.extend(self.embed_chunk(chunk)?);
        }
        Ok(all)
    }

    fn dim(&self) -> usize {
        self.config.embedding_dim
    }
}
