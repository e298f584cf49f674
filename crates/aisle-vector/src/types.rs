//! Common types for retrieval: configuration, search parameters, results,
//! and index statistics.

use std::sync::Arc;

use aisle_core::{Product, ProductFilter};
use serde::{Deserialize, Serialize};

// ============================================================================
// Configuration
// ============================================================================

/// Retrieval defaults applied when a request leaves them unset.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RetrievalConfig {
    /// Default number of results.
    #[serde(default = "default_top_k")]
    pub default_top_k: usize,

    /// Default minimum similarity score.
    #[serde(default = "default_min_score")]
    pub min_score: f32,
}

fn default_top_k() -> usize {
    8
}

fn default_min_score() -> f32 {
    0.1
}

impl Default for RetrievalConfig {
    fn default() -> Self {
        Self {
            default_top_k: default_top_k(),
            min_score: default_min_score(),
        }
    }
}

/// Embedding provider selection.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EmbeddingConfig {
    /// Provider: "hashing" or "fastembed".
    #[serde(default = "default_provider")]
    pub provider: String,

    /// Model name for model-backed providers (e.g., "all-minilm-l6-v2").
    #[serde(default = "default_model")]
    pub model: String,

    /// Vector dimension for the hashing provider.
    #[serde(default = "default_dimension")]
    pub dimension: usize,

    /// Directory for downloaded model files.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cache_path: Option<String>,
}

fn default_provider() -> String {
    "hashing".to_string()
}

fn default_model() -> String {
    "all-minilm-l6-v2".to_string()
}

fn default_dimension() -> usize {
    384
}

impl Default for EmbeddingConfig {
    fn default() -> Self {
        Self {
            provider: default_provider(),
            model: default_model(),
            dimension: default_dimension(),
            cache_path: None,
        }
    }
}

// ============================================================================
// Search types
// ============================================================================

/// Parameters for a search request.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SearchParams {
    /// Query text. Empty or whitespace-only means browse.
    pub query: String,

    /// Maximum results.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub limit: Option<usize>,

    /// Minimum similarity score.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub min_score: Option<f32>,

    /// Post-ranking category and price filter.
    #[serde(default, skip_serializing_if = "ProductFilter::is_empty")]
    pub filter: ProductFilter,
}

impl SearchParams {
    /// Create search params with a query string.
    pub fn new(query: impl Into<String>) -> Self {
        Self {
            query: query.into(),
            ..Default::default()
        }
    }

    /// Set the result limit.
    pub fn with_limit(mut self, limit: usize) -> Self {
        self.limit = Some(limit);
        self
    }

    /// Set the minimum score.
    pub fn with_min_score(mut self, min_score: f32) -> Self {
        self.min_score = Some(min_score);
        self
    }

    /// Set the post-ranking filter.
    pub fn with_filter(mut self, filter: ProductFilter) -> Self {
        self.filter = filter;
        self
    }
}

/// A ranked product.
///
/// The product is shared with the catalog and never modified; the score sits
/// beside it. Browse results carry no score.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SearchResult {
    /// The matched product.
    #[serde(flatten)]
    pub product: Arc<Product>,

    /// Cosine similarity to the query, absent in browse mode.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub similarity_score: Option<f32>,
}

impl SearchResult {
    /// A scored result.
    pub fn scored(product: Arc<Product>, score: f32) -> Self {
        Self {
            product,
            similarity_score: Some(score),
        }
    }

    /// An unscored (browse) result.
    pub fn unscored(product: Arc<Product>) -> Self {
        Self {
            product,
            similarity_score: None,
        }
    }

    /// Score as a rounded percentage; 0 when unscored.
    pub fn match_percent(&self) -> i64 {
        self.similarity_score
            .map(|s| (f64::from(s) * 100.0).round() as i64)
            .unwrap_or(0)
    }
}

// ============================================================================
// Index statistics
// ============================================================================

/// Statistics from an index build.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IndexStats {
    /// Catalog generation the vectors belong to.
    pub generation: u64,

    /// Number of products embedded.
    pub documents_indexed: usize,

    /// Vector dimension (0 for an empty catalog).
    pub embedding_dimension: usize,

    /// Provider that produced the vectors.
    pub provider: String,

    /// Build duration in milliseconds.
    pub build_duration_ms: u64,
}

// ============================================================================
// Tests
// ============================================================================
