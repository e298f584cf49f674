//! The semantic retrieval engine.
//!
//! [`RetrievalEngine`] ties a [`CatalogStore`] to an [`EmbeddingProvider`].
//! Index builds embed every product's composite text in one batch call and
//! install the result next to the catalog in a single swap. Queries read one
//! snapshot, so rankings always pair products with their own vectors.

use std::borrow::Borrow;
use std::sync::Arc;
use std::time::Instant;

use aisle_core::{CatalogSnapshot, CatalogStore, Embedding, Error, Product, ProductFilter, Result};

use crate::embedding::EmbeddingProvider;
use crate::similarity::rank;
use crate::types::{IndexStats, RetrievalConfig, SearchParams, SearchResult};

/// Ranks catalog products by cosine similarity to a query.
pub struct RetrievalEngine {
    catalog: Arc<CatalogStore>,
    provider: Arc<dyn EmbeddingProvider>,
    config: RetrievalConfig,
}

impl RetrievalEngine {
    /// Create an engine with default retrieval settings.
    pub fn new(catalog: Arc<CatalogStore>, provider: Arc<dyn EmbeddingProvider>) -> Self {
        Self {
            catalog,
            provider,
            config: RetrievalConfig::default(),
        }
    }

    /// Override the retrieval defaults.
    pub fn with_config(mut self, config: RetrievalConfig) -> Self {
        self.config = config;
        self
    }

    /// The underlying catalog store.
    pub fn catalog(&self) -> &Arc<CatalogStore> {
        &self.catalog
    }

    /// The retrieval defaults in effect.
    pub fn config(&self) -> &RetrievalConfig {
        &self.config
    }

    /// The embedding provider's name.
    pub fn provider_name(&self) -> &str {
        self.provider.name()
    }

    /// The embedding provider's dimension.
    pub fn dimension(&self) -> usize {
        self.provider.dimension()
    }

    // ------------------------------------------------------------------------
    // Index building
    // ------------------------------------------------------------------------

    /// Recompute vectors for the current catalog.
    ///
    /// Fails if the provider fails, returns the wrong number of vectors, or
    /// the catalog is replaced while the batch call is in flight.
    pub async fn rebuild(&self) -> Result<IndexStats> {
        let started = Instant::now();
        let snapshot = self.catalog.snapshot();
        let vectors = self.embed_products(snapshot.products()).await?;
        let (documents, dimension) = shape(&vectors);
        self.catalog
            .attach_embeddings(snapshot.generation(), vectors)?;
        let stats = self.stats(snapshot.generation(), documents, dimension, started);
        log::info!(
            "Rebuilt index for catalog generation {} ({} products, {} ms)",
            stats.generation,
            stats.documents_indexed,
            stats.build_duration_ms
        );
        Ok(stats)
    }

    /// Embed `products` and then install them with their vectors in one swap.
    ///
    /// On failure the current catalog stays in place untouched.
    pub async fn refresh(&self, products: Vec<Product>) -> Result<IndexStats> {
        let started = Instant::now();
        let vectors = self.embed_products(products.as_slice()).await?;
        let (documents, dimension) = shape(&vectors);
        let generation = self.catalog.install(products, vectors)?;
        let stats = self.stats(generation, documents, dimension, started);
        log::info!(
            "Refreshed catalog to generation {} ({} products, {} ms)",
            stats.generation,
            stats.documents_indexed,
            stats.build_duration_ms
        );
        Ok(stats)
    }

    async fn embed_products<P>(&self, products: &[P]) -> Result<Vec<Embedding>>
    where
        P: Borrow<Product> + Sync,
    {
        if products.is_empty() {
            return Ok(Vec::new());
        }
        let texts: Vec<String> = products
            .iter()
            .map(|p| p.borrow().composite_text())
            .collect();
        let refs: Vec<&str> = texts.iter().map(String::as_str).collect();

        let vectors = self.provider.embed_batch(&refs).await?;
        if vectors.len() != products.len() {
            return Err(Error::inconsistent(format!(
                "provider '{}' returned {} vectors for {} products",
                self.provider.name(),
                vectors.len(),
                products.len()
            )));
        }
        Ok(vectors)
    }

    fn stats(
        &self,
        generation: u64,
        documents: usize,
        dimension: usize,
        started: Instant,
    ) -> IndexStats {
        IndexStats {
            generation,
            documents_indexed: documents,
            embedding_dimension: dimension,
            provider: self.provider.name().to_string(),
            build_duration_ms: started.elapsed().as_millis() as u64,
        }
    }

    // ------------------------------------------------------------------------
    // Search
    // ------------------------------------------------------------------------

    /// Rank products against `query`.
    ///
    /// - Empty or whitespace-only query: the first `top_k` products in
    ///   catalog order, unscored.
    /// - Empty catalog: no results, and the provider is not called.
    /// - Otherwise: products scoring at least `min_score`, best first, ties in
    ///   catalog order, at most `top_k`.
    pub async fn search(&self, query: &str, top_k: usize, min_score: f32) -> Result<Vec<SearchResult>> {
        let snapshot = self.catalog.snapshot();

        if query.trim().is_empty() {
            log::debug!("Empty query, browsing first {top_k} products");
            return Ok(browse(&snapshot, top_k));
        }
        if snapshot.is_empty() || top_k == 0 {
            return Ok(Vec::new());
        }

        let vectors = snapshot
            .embeddings()
            .ok_or(Error::NotIndexed(snapshot.generation()))?;
        let query_vector = self.provider.embed(query).await?;
        if let Some(dim) = snapshot.dimension()
            && dim != query_vector.len()
        {
            return Err(Error::inconsistent(format!(
                "query vector has dimension {}, index has {dim}",
                query_vector.len()
            )));
        }

        let results: Vec<SearchResult> = rank(&query_vector, vectors, top_k, min_score)
            .into_iter()
            .map(|(idx, score)| SearchResult::scored(Arc::clone(&snapshot.products()[idx]), score))
            .collect();

        log::debug!(
            "Query {:?}: {} results (top_k={top_k}, min_score={min_score})",
            query,
            results.len()
        );
        Ok(results)
    }

    /// Rank, then drop results that fail `filter`.
    ///
    /// The filter runs after ranking, so fewer than `top_k` results may
    /// remain even when more matching products exist further down.
    pub async fn search_filtered(
        &self,
        query: &str,
        top_k: usize,
        min_score: f32,
        filter: &ProductFilter,
    ) -> Result<Vec<SearchResult>> {
        let results = self.search(query, top_k, min_score).await?;
        if filter.is_empty() {
            return Ok(results);
        }
        Ok(results
            .into_iter()
            .filter(|r| filter.matches(&r.product))
            .collect())
    }

    /// Search using `params`, falling back to the configured defaults.
    pub async fn search_with(&self, params: &SearchParams) -> Result<Vec<SearchResult>> {
        let top_k = params.limit.unwrap_or(self.config.default_top_k);
        let min_score = params.min_score.unwrap_or(self.config.min_score);
        self.search_filtered(&params.query, top_k, min_score, &params.filter)
            .await
    }

    // ------------------------------------------------------------------------
    // Catalog passthrough
    // ------------------------------------------------------------------------

    /// All products in catalog order.
    pub fn all(&self) -> Vec<Arc<Product>> {
        self.catalog.all()
    }

    /// Look up a product by id.
    pub fn by_id(&self, id: u64) -> Option<Arc<Product>> {
        self.catalog.by_id(id)
    }
}

impl std::fmt::Debug for RetrievalEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RetrievalEngine")
            .field("provider", &self.provider.name())
            .field("dimension", &self.provider.dimension())
            .field("config", &self.config)
            .finish()
    }
}

/// Vector count and dimension (0 when there are no vectors).
fn shape(vectors: &[Embedding]) -> (usize, usize) {
    (vectors.len(), vectors.first().map(Vec::len).unwrap_or(0))
}

fn browse(snapshot: &CatalogSnapshot, top_k: usize) -> Vec<SearchResult> {
    snapshot
        .products()
        .iter()
        .take(top_k)
        .map(|p| SearchResult::unscored(Arc::clone(p)))
        .collect()
}

// ============================================================================
// Tests
// ============================================================================
