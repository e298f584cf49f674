//! Catalog sources.
//!
//! A [`CatalogSource`] produces a complete, validated product list for
//! [`CatalogStore::load`](crate::CatalogStore::load) or a retrieval engine
//! refresh. Sources own id uniqueness and field validation; the store takes
//! what it is given.

use std::collections::HashSet;
use std::path::{Path, PathBuf};

use crate::error::{Error, Result};
use crate::product::Product;

const SAMPLE_CATALOG_JSON: &str = include_str!("../data/sample_catalog.json");

/// Something that can supply a full catalog.
pub trait CatalogSource: Send + Sync {
    /// Produce the full product list, validated.
    fn products(&self) -> Result<Vec<Product>>;

    /// Source name for diagnostics.
    fn name(&self) -> &str;
}

/// Reads a JSON array of products from a file.
#[derive(Debug, Clone)]
pub struct JsonCatalogSource {
    path: PathBuf,
}

impl JsonCatalogSource {
    /// Create a source for the given file.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// The file this source reads.
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl CatalogSource for JsonCatalogSource {
    fn products(&self) -> Result<Vec<Product>> {
        let json = std::fs::read_to_string(&self.path)?;
        let products = parse_products(&json)?;
        log::debug!(
            "Read {} products from {}",
            products.len(),
            self.path.display()
        );
        Ok(products)
    }

    fn name(&self) -> &str {
        "json"
    }
}

/// The bundled demo catalog.
#[derive(Debug, Clone, Copy, Default)]
pub struct SampleCatalog;

impl CatalogSource for SampleCatalog {
    fn products(&self) -> Result<Vec<Product>> {
        parse_products(SAMPLE_CATALOG_JSON)
    }

    fn name(&self) -> &str {
        "sample"
    }
}

/// Parse and validate a JSON product array.
pub fn parse_products(json: &str) -> Result<Vec<Product>> {
    let products: Vec<Product> = serde_json::from_str(json)?;
    validate_products(&products)?;
    Ok(products)
}

/// Check ids are unique, prices are finite and non-negative, and ratings lie in `[0, 5]`.
pub fn validate_products(products: &[Product]) -> Result<()> {
    let mut seen = HashSet::with_capacity(products.len());
    for product in products {
        if !seen.insert(product.id) {
            return Err(Error::invalid_data(format!(
                "duplicate product id {}",
                product.id
            )));
        }
        if !product.price.is_finite() || product.price < 0.0 {
            return Err(Error::invalid_data(format!(
                "product {} has invalid price {}",
                product.id, product.price
            )));
        }
        if !(0.0..=5.0).contains(&product.rating) {
            return Err(Error::invalid_data(format!(
                "product {} has rating {} outside 0-5",
                product.id, product.rating
            )));
        }
    }
    Ok(())
}
