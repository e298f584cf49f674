//! Semantic retrieval for Aisle.
//!
//! Products and queries become fixed-size vectors through a pluggable
//! embedding provider; products are ranked by cosine similarity.
//!
//! # Features
//!
//! - `fastembed`: Enable local transformer embeddings via fastembed
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                      aisle-vector                           │
//! ├─────────────────────────────────────────────────────────────┤
//! │  EmbeddingProvider trait                                    │
//! │  ├── HashingEmbeddingProvider (always available)            │
//! │  ├── ScriptedEmbeddingProvider (testing)                    │
//! │  └── FastEmbedProvider (feature: fastembed)                 │
//! ├─────────────────────────────────────────────────────────────┤
//! │  similarity: cosine + stable top-k ranking                  │
//! ├─────────────────────────────────────────────────────────────┤
//! │  RetrievalEngine (CatalogStore + EmbeddingProvider)         │
//! │  rebuild / refresh / search / search_with                   │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! # Example
//!
//! ```rust,ignore
//! use aisle_core::{CatalogSource, CatalogStore, SampleCatalog};
//! use aisle_vector::{HashingEmbeddingProvider, RetrievalEngine};
//! use std::sync::Arc;
//!
//! let engine = RetrievalEngine::new(
//!     Arc::new(CatalogStore::new()),
//!     Arc::new(HashingEmbeddingProvider::new(384)),
//! );
//! engine.refresh(SampleCatalog.products()?).await?;
//!
//! for result in engine.search("wireless headphones", 5, 0.1).await? {
//!     println!("{}: {:?}", result.product.name, result.similarity_score);
//! }
//! ```

#![doc = include_str!("../README.md")]

pub mod embedding;
pub mod engine;
pub mod similarity;
pub mod types;

// Feature-gated provider modules
#[cfg(feature = "fastembed")]
pub mod fastembed;

// Re-exports: core types
pub use types::{EmbeddingConfig, IndexStats, RetrievalConfig, SearchParams, SearchResult};

// Re-exports: providers
pub use embedding::{EmbeddingProvider, HashingEmbeddingProvider, create_provider};

// Re-exports: engine
pub use engine::RetrievalEngine;
pub use similarity::cosine_similarity;

#[cfg(feature = "fastembed")]
pub use self::fastembed::FastEmbedProvider;
