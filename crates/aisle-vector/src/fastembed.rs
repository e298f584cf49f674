//! FastEmbed embedding provider.
//!
//! Wraps the `fastembed` crate to run sentence-embedding models locally,
//! including all-MiniLM-L6-v2, the model product search is tuned against.
//!
//! # Thread Safety
//!
//! `fastembed::TextEmbedding` is not `Sync`, so it sits behind
//! `Arc<Mutex<>>` and every call runs on `tokio::task::spawn_blocking`.
//!
//! # Feature Gate
//!
//! This module requires the `fastembed` feature.

use std::sync::{Arc, Mutex};

use aisle_core::{Embedding, Error, Result};
use async_trait::async_trait;

use crate::embedding::EmbeddingProvider;

/// Map a model name to a fastembed `EmbeddingModel` variant.
fn resolve_model(name: &str) -> Result<fastembed::EmbeddingModel> {
    match name {
        "all-minilm-l6-v2" | "AllMiniLML6V2" => Ok(fastembed::EmbeddingModel::AllMiniLML6V2),
        "all-minilm-l12-v2" | "AllMiniLML12V2" => Ok(fastembed::EmbeddingModel::AllMiniLML12V2),
        "bge-small-en-v1.5" | "BGESmallENV15" => Ok(fastembed::EmbeddingModel::BGESmallENV15),
        "bge-base-en-v1.5" | "BGEBaseENV15" => Ok(fastembed::EmbeddingModel::BGEBaseENV15),
        other => Err(Error::config(format!(
            "Unknown embedding model: '{other}'. Supported: all-minilm-l6-v2, all-minilm-l12-v2, bge-small-en-v1.5, bge-base-en-v1.5"
        ))),
    }
}

/// Local transformer embeddings via fastembed.
///
/// | Name | Dimension |
/// |------|-----------|
/// | `all-minilm-l6-v2` | 384 |
/// | `all-minilm-l12-v2` | 384 |
/// | `bge-small-en-v1.5` | 384 |
/// | `bge-base-en-v1.5` | 768 |
pub struct FastEmbedProvider {
    model: Arc<Mutex<fastembed::TextEmbedding>>,
    dimension: usize,
    model_name: String,
}

impl FastEmbedProvider {
    /// Load `model_name`, downloading it into `cache_path` if needed.
    pub fn new(model_name: &str, cache_path: Option<&str>) -> Result<Self> {
        let model_enum = resolve_model(model_name)?;

        let mut init = fastembed::InitOptions::new(model_enum);
        if let Some(path) = cache_path {
            init = init.with_cache_dir(std::path::PathBuf::from(path));
        }

        let mut text_embedding = fastembed::TextEmbedding::try_new(init)
            .map_err(|e| Error::provider(format!("Failed to initialize fastembed model: {e}")))?;

        // Probe the dimension with a throwaway embedding
        let probe = text_embedding
            .embed(vec!["dimension probe"], None)
            .map_err(|e| Error::provider(format!("Failed to probe embedding dimension: {e}")))?;
        let dimension = probe
            .first()
            .map(Vec::len)
            .ok_or_else(|| Error::provider("Empty probe embedding"))?;

        log::info!("Loaded fastembed model {model_name} ({dimension} dimensions)");
        Ok(Self {
            model: Arc::new(Mutex::new(text_embedding)),
            dimension,
            model_name: model_name.to_string(),
        })
    }
}

#[async_trait]
impl EmbeddingProvider for FastEmbedProvider {
    async fn embed_batch(&self, texts: &[&str]) -> Result<Vec<Embedding>> {
        let model = Arc::clone(&self.model);
        let texts: Vec<String> = texts.iter().map(|t| t.to_string()).collect();

        tokio::task::spawn_blocking(move || {
            let mut model = model
                .lock()
                .map_err(|e| Error::provider(format!("Mutex poisoned: {e}")))?;
            model
                .embed(texts, None)
                .map_err(|e| Error::provider(format!("Batch embedding failed: {e}")))
        })
        .await
        .map_err(|e| Error::provider(format!("spawn_blocking failed: {e}")))?
    }

    fn dimension(&self) -> usize {
        self.dimension
    }

    fn name(&self) -> &str {
        &self.model_name
    }
}

impl std::fmt::Debug for FastEmbedProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FastEmbedProvider")
            .field("model", &self.model_name)
            .field("dimension", &self.dimension)
            .finish()
    }
}
