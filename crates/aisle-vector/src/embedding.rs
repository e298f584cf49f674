//! Embedding provider trait and the built-in providers.
//!
//! # Providers
//!
//! - [`HashingEmbeddingProvider`]: offline feature-hashing embedder, always available
//! - `FastEmbedProvider`: local transformer models (requires the `fastembed` feature)
//! - [`testing::ScriptedEmbeddingProvider`]: fixed vectors per text for tests

use std::sync::Arc;

use aisle_core::{Embedding, Error, Result};
use async_trait::async_trait;

use crate::types::EmbeddingConfig;

/// Trait for generating text embeddings.
///
/// `embed_batch` must return exactly one vector per input, in input order,
/// and the same vector for the same text under a fixed model. Callers check
/// the count; a provider that returns the wrong number fails the operation.
///
/// # Thread Safety
///
/// Implementations handle their own synchronization for thread-unsafe
/// underlying libraries.
#[async_trait]
pub trait EmbeddingProvider: Send + Sync {
    /// Generate embeddings for a batch of texts.
    async fn embed_batch(&self, texts: &[&str]) -> Result<Vec<Embedding>>;

    /// Generate an embedding for a single text.
    async fn embed(&self, text: &str) -> Result<Embedding> {
        let mut vectors = self.embed_batch(&[text]).await?;
        if vectors.len() != 1 {
            return Err(Error::provider(format!(
                "expected 1 vector, provider returned {}",
                vectors.len()
            )));
        }
        vectors
            .pop()
            .ok_or_else(|| Error::provider("provider returned no vector"))
    }

    /// The embedding dimension.
    fn dimension(&self) -> usize;

    /// The provider name for diagnostics.
    fn name(&self) -> &str;
}

/// Build the provider selected by `config`.
pub fn create_provider(config: &EmbeddingConfig) -> Result<Arc<dyn EmbeddingProvider>> {
    match config.provider.as_str() {
        "hashing" => Ok(Arc::new(HashingEmbeddingProvider::new(config.dimension))),
        #[cfg(feature = "fastembed")]
        "fastembed" => Ok(Arc::new(crate::fastembed::FastEmbedProvider::new(
            &config.model,
            config.cache_path.as_deref(),
        )?)),
        #[cfg(not(feature = "fastembed"))]
        "fastembed" => Err(Error::config(
            "the fastembed provider is not compiled in; rebuild with `--features fastembed`",
        )),
        other => Err(Error::config(format!(
            "Unknown embedding provider: '{other}'. Supported: hashing, fastembed"
        ))),
    }
}

// ============================================================================
// HashingEmbeddingProvider
// ============================================================================

/// Offline embedder based on signed feature hashing.
///
/// Each lower-cased alphanumeric token is hashed with BLAKE3 into one of
/// `dimension` buckets with a +1/-1 sign; the bucket counts are then
/// L2-normalized. Texts that share words point in similar directions, texts
/// that share none are close to orthogonal. Empty text maps to the zero
/// vector. No semantics beyond word overlap are captured.
#[derive(Debug, Clone)]
pub struct HashingEmbeddingProvider {
    dimension: usize,
}

impl HashingEmbeddingProvider {
    /// Create a provider with the given dimension (at least 1).
    pub fn new(dimension: usize) -> Self {
        Self {
            dimension: dimension.max(1),
        }
    }

    fn hashed_embedding(&self, text: &str) -> Embedding {
        let mut embedding = vec![0.0f32; self.dimension];

        let lowered = text.to_lowercase();
        for token in lowered
            .split(|c: char| !c.is_alphanumeric())
            .filter(|t| !t.is_empty())
        {
            let hash = blake3::hash(token.as_bytes());
            let bytes = hash.as_bytes();
            let mut bucket = [0u8; 8];
            bucket.copy_from_slice(&bytes[..8]);
            let idx = (u64::from_le_bytes(bucket) % self.dimension as u64) as usize;
            let sign = if bytes[8] & 1 == 0 { 1.0 } else { -1.0 };
            embedding[idx] += sign;
        }

        let norm: f32 = embedding.iter().map(|x| x * x).sum::<f32>().sqrt();
        if norm > 0.0 {
            for val in &mut embedding {
                *val /= norm;
            }
        }
        embedding
    }
}

#[async_trait]
impl EmbeddingProvider for HashingEmbeddingProvider {
    async fn embed_batch(&self, texts: &[&str]) -> Result<Vec<Embedding>> {
        Ok(texts.iter().map(|t| self.hashed_embedding(t)).collect())
    }

    fn dimension(&self) -> usize {
        self.dimension
    }

    fn name(&self) -> &str {
        "hashing"
    }
}

// ============================================================================
// Test double
// ============================================================================

pub mod testing {
    //! A scripted provider for deterministic ranking tests.

    use std::collections::HashMap;
    use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

    use super::*;

    /// Returns a fixed vector per known text and a fallback for everything else.
    ///
    /// Can be switched into failure modes to exercise error propagation.
    #[derive(Debug)]
    pub struct ScriptedEmbeddingProvider {
        dimension: usize,
        vectors: HashMap<String, Embedding>,
        fallback: Embedding,
        fail: AtomicBool,
        drop_last: AtomicBool,
        calls: AtomicUsize,
    }

    impl ScriptedEmbeddingProvider {
        /// Create a provider whose unknown texts map to the zero vector.
        pub fn new(dimension: usize) -> Self {
            Self {
                dimension,
                vectors: HashMap::new(),
                fallback: vec![0.0; dimension],
                fail: AtomicBool::new(false),
                drop_last: AtomicBool::new(false),
                calls: AtomicUsize::new(0),
            }
        }

        /// Map `text` to `vector`.
        pub fn with_vector(mut self, text: impl Into<String>, vector: Embedding) -> Self {
            self.vectors.insert(text.into(), vector);
            self
        }

        /// Vector returned for unknown texts.
        pub fn with_fallback(mut self, vector: Embedding) -> Self {
            self.fallback = vector;
            self
        }

        /// Make every call fail as if the provider were unreachable.
        pub fn set_failing(&self, fail: bool) {
            self.fail.store(fail, Ordering::SeqCst);
        }

        /// Make batch calls return one vector too few.
        pub fn set_drop_last(&self, drop_last: bool) {
            self.drop_last.store(drop_last, Ordering::SeqCst);
        }

        /// Number of `embed_batch` calls so far.
        pub fn calls(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl EmbeddingProvider for ScriptedEmbeddingProvider {
        async fn embed_batch(&self, texts: &[&str]) -> Result<Vec<Embedding>> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            if self.fail.load(Ordering::SeqCst) {
                return Err(Error::provider("scripted provider unreachable"));
            }
            let mut out: Vec<Embedding> = texts
                .iter()
                .map(|t| self.vectors.get(*t).unwrap_or(&self.fallback).clone())
                .collect();
            if self.drop_last.load(Ordering::SeqCst) {
                out.pop();
            }
            Ok(out)
        }

        fn dimension(&self) -> usize {
            self.dimension
        }

        fn name(&self) -> &str {
            "scripted"
        }
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::testing::ScriptedEmbeddingProvider;
    use super::*;
    use crate::similarity::cosine_similarity;

    #[test]
    fn test_hashing_provider_creation() {
        let provider = HashingEmbeddingProvider::new(384);
        assert_eq!(provider.dimension(), 384);
        assert_eq!(provider.name(), "hashing");
        assert_eq!(HashingEmbeddingProvider::new(0).dimension(), 1);
    }

    #[tokio::test]
    async fn test_hashing_embed_unit_norm() {
        let provider = HashingEmbeddingProvider::new(64);
        let embedding = provider.embed("wireless noise canceling headphones").await.unwrap();
        assert_eq!(embedding.len(), 64);
        let norm: f32 = embedding.iter().map(|x| x * x).sum::<f32>().sqrt();
        assert!((norm - 1.0).abs() < 1e-5);
    }

    #[tokio::test]
    async fn test_hashing_embed_deterministic() {
        let provider = HashingEmbeddingProvider::new(128);
        let e1 = provider.embed("same text").await.unwrap();
        let e2 = provider.embed("same text").await.unwrap();
        assert_eq!(e1, e2);
    }

    #[tokio::test]
    async fn test_hashing_embed_case_and_punctuation_insensitive() {
        let provider = HashingEmbeddingProvider::new(128);
        let e1 = provider.embed("Running, SHOES!").await.unwrap();
        let e2 = provider.embed("running shoes").await.unwrap();
        assert_eq!(e1, e2);
    }

    #[tokio::test]
    async fn test_hashing_shared_words_are_similar() {
        let provider = HashingEmbeddingProvider::new(384);
        let product = provider
            .embed("Nike Air Max 270 running comfortable")
            .await
            .unwrap();
        let query = provider.embed("comfortable running shoes").await.unwrap();
        assert!(cosine_similarity(&product, &query) > 0.1);
    }

    #[tokio::test]
    async fn test_hashing_embed_empty_text_is_zero() {
        let provider = HashingEmbeddingProvider::new(8);
        let embedding = provider.embed("").await.unwrap();
        assert_eq!(embedding, vec![0.0; 8]);
    }

    #[tokio::test]
    async fn test_hashing_embed_batch_preserves_order() {
        let provider = HashingEmbeddingProvider::new(32);
        let batch = provider.embed_batch(&["laptop", "blender"]).await.unwrap();
        assert_eq!(batch.len(), 2);
        assert_eq!(batch[0], provider.embed("laptop").await.unwrap());
        assert_eq!(batch[1], provider.embed("blender").await.unwrap());
    }

    #[tokio::test]
    async fn test_default_embed_rejects_wrong_count() {
        let provider = ScriptedEmbeddingProvider::new(2);
        provider.set_drop_last(true);
        let err = provider.embed("anything").await.unwrap_err();
        assert!(err.is_provider());
    }

    #[tokio::test]
    async fn test_scripted_provider() {
        let provider = ScriptedEmbeddingProvider::new(2)
            .with_vector("a", vec![1.0, 0.0])
            .with_fallback(vec![0.0, 1.0]);
        let out = provider.embed_batch(&["a", "zzz"]).await.unwrap();
        assert_eq!(out, vec![vec![1.0, 0.0], vec![0.0, 1.0]]);
        assert_eq!(provider.calls(), 1);

        provider.set_failing(true);
        assert!(provider.embed("a").await.is_err());
    }

    #[test]
    fn test_create_provider_hashing() {
        let config = EmbeddingConfig {
            provider: "hashing".into(),
            dimension: 16,
            ..Default::default()
        };
        let provider = create_provider(&config).unwrap();
        assert_eq!(provider.name(), "hashing");
        assert_eq!(provider.dimension(), 16);
    }

    #[test]
    fn test_create_provider_unknown() {
        let config = EmbeddingConfig {
            provider: "word2vec".into(),
            ..Default::default()
        };
        let err = create_provider(&config).err().unwrap();
        assert!(err.to_string().contains("Unknown embedding provider"));
    }

    #[test]
    fn test_trait_object_safety() {
        fn _assert_object_safe(_: &dyn EmbeddingProvider) {}
    }
}
