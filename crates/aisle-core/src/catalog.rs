//! The catalog store.
//!
//! A [`CatalogStore`] owns the current [`CatalogSnapshot`]: the ordered
//! product list together with the embedding vectors computed from it. The
//! snapshot is immutable; every change builds a new one and swaps the
//! `Arc` under a write lock held only for the pointer swap. Readers clone the
//! `Arc` and keep a consistent view for as long as they need it, so a reader
//! can never see a catalog whose length differs from its vector count.
//!
//! # Lifecycle
//!
//! ```text
//! load(products)            -> generation N, no vectors (search reports NotIndexed)
//! attach_embeddings(N, vs)  -> generation N, indexed (fails with Stale if N was replaced)
//! install(products, vs)     -> generation N+1, indexed in a single swap
//! ```

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, PoisonError, RwLock};

use crate::error::{Error, Result};
use crate::product::Product;

/// A fixed-length embedding vector.
pub type Embedding = Vec<f32>;

// ============================================================================
// CatalogSnapshot
// ============================================================================

/// An immutable catalog view: products in catalog order plus, once indexed,
/// one embedding per product at the same position.
#[derive(Debug)]
pub struct CatalogSnapshot {
    generation: u64,
    products: Arc<[Arc<Product>]>,
    by_id: Arc<HashMap<u64, usize>>,
    embeddings: Option<Arc<[Embedding]>>,
}

impl CatalogSnapshot {
    fn new(generation: u64, products: Vec<Product>, embeddings: Option<Vec<Embedding>>) -> Self {
        let mut by_id = HashMap::with_capacity(products.len());
        for (idx, product) in products.iter().enumerate() {
            // First occurrence wins, matching a linear scan.
            by_id.entry(product.id).or_insert(idx);
        }
        Self {
            generation,
            products: products.into_iter().map(Arc::new).collect(),
            by_id: Arc::new(by_id),
            embeddings: embeddings.map(Into::into),
        }
    }

    fn empty() -> Self {
        Self::new(0, Vec::new(), Some(Vec::new()))
    }

    /// Monotonic identifier of the product list this snapshot holds.
    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Products in catalog order.
    pub fn products(&self) -> &[Arc<Product>] {
        &self.products
    }

    /// Embeddings index-aligned with [`products`](Self::products), if indexed.
    pub fn embeddings(&self) -> Option<&[Embedding]> {
        self.embeddings.as_deref()
    }

    /// Whether vectors are present for this product list.
    pub fn is_indexed(&self) -> bool {
        self.embeddings.is_some()
    }

    /// Number of products.
    pub fn len(&self) -> usize {
        self.products.len()
    }

    /// Whether the catalog has no products.
    pub fn is_empty(&self) -> bool {
        self.products.is_empty()
    }

    /// Look up a product by id.
    pub fn by_id(&self, id: u64) -> Option<&Arc<Product>> {
        self.by_id.get(&id).map(|&idx| &self.products[idx])
    }

    /// Embedding dimension, if indexed and non-empty.
    pub fn dimension(&self) -> Option<usize> {
        self.embeddings
            .as_deref()
            .and_then(|vs| vs.first())
            .map(Vec::len)
    }
}

// ============================================================================
// CatalogStore
// ============================================================================

/// Shared, read-mostly holder of the current catalog snapshot.
///
/// `CatalogStore` is `Send + Sync`; share it with `Arc`.
#[derive(Debug)]
pub struct CatalogStore {
    current: RwLock<Arc<CatalogSnapshot>>,
    next_generation: AtomicU64,
}

impl Default for CatalogStore {
    fn default() -> Self {
        Self::new()
    }
}

impl CatalogStore {
    /// Create an empty store (generation 0, trivially indexed).
    pub fn new() -> Self {
        Self {
            current: RwLock::new(Arc::new(CatalogSnapshot::empty())),
            next_generation: AtomicU64::new(1),
        }
    }

    /// The current snapshot.
    pub fn snapshot(&self) -> Arc<CatalogSnapshot> {
        let guard = self.current.read().unwrap_or_else(PoisonError::into_inner);
        Arc::clone(&guard)
    }

    /// Replace the entire catalog. Previously computed vectors are dropped.
    ///
    /// Returns the new generation.
    pub fn load(&self, products: Vec<Product>) -> u64 {
        let generation = self.next_generation.fetch_add(1, Ordering::SeqCst);
        let count = products.len();
        self.swap(CatalogSnapshot::new(generation, products, None));
        log::info!("Loaded catalog generation {generation} ({count} products, not indexed)");
        generation
    }

    /// Replace the catalog and its vectors in one swap.
    ///
    /// Fails without touching the current snapshot if the counts differ.
    pub fn install(&self, products: Vec<Product>, embeddings: Vec<Embedding>) -> Result<u64> {
        check_alignment(products.len(), &embeddings)?;
        let generation = self.next_generation.fetch_add(1, Ordering::SeqCst);
        let count = products.len();
        self.swap(CatalogSnapshot::new(generation, products, Some(embeddings)));
        log::info!("Installed catalog generation {generation} ({count} products, indexed)");
        Ok(generation)
    }

    /// Attach vectors to the product list of `generation`.
    ///
    /// Fails with [`Error::Stale`] if the catalog was replaced after the
    /// vectors were computed, and with [`Error::Inconsistent`] if the vector
    /// count differs from the product count.
    pub fn attach_embeddings(&self, generation: u64, embeddings: Vec<Embedding>) -> Result<()> {
        let mut guard = self.current.write().unwrap_or_else(PoisonError::into_inner);
        if guard.generation != generation {
            return Err(Error::Stale {
                built: generation,
                current: guard.generation,
            });
        }
        check_alignment(guard.products.len(), &embeddings)?;

        *guard = Arc::new(CatalogSnapshot {
            generation,
            products: Arc::clone(&guard.products),
            by_id: Arc::clone(&guard.by_id),
            embeddings: Some(embeddings.into()),
        });
        log::debug!("Attached vectors to catalog generation {generation}");
        Ok(())
    }

    /// All products in catalog order.
    pub fn all(&self) -> Vec<Arc<Product>> {
        self.snapshot().products().to_vec()
    }

    /// Look up a product by id.
    pub fn by_id(&self, id: u64) -> Option<Arc<Product>> {
        self.snapshot().by_id(id).cloned()
    }

    /// Number of products in the current catalog.
    pub fn len(&self) -> usize {
        self.snapshot().len()
    }

    /// Whether the current catalog is empty.
    pub fn is_empty(&self) -> bool {
        self.snapshot().is_empty()
    }

    fn swap(&self, snapshot: CatalogSnapshot) {
        let mut guard = self.current.write().unwrap_or_else(PoisonError::into_inner);
        *guard = Arc::new(snapshot);
    }
}

fn check_alignment(products: usize, embeddings: &[Embedding]) -> Result<()> {
    if products != embeddings.len() {
        return Err(Error::inconsistent(format!(
            "{} vectors for {} products",
            embeddings.len(),
            products
        )));
    }
    if let Some(first) = embeddings.first() {
        let dim = first.len();
        if let Some(pos) = embeddings.iter().position(|v| v.len() != dim) {
            return Err(Error::inconsistent(format!(
                "vector {pos} has dimension {}, expected {dim}",
                embeddings[pos].len()
            )));
        }
    }
    Ok(())
}

// ============================================================================
// Tests
// ============================================================================
