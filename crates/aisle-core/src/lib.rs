//! Aisle Core: shared types, errors, and the catalog store.
//!
//! This crate has no internal Aisle dependencies (dependency level 0).
//!
//! # Modules
//!
//! - [`error`]: Error types and Result alias
//! - [`product`]: The immutable product record and price/category filters
//! - [`catalog`]: Atomically swapped catalog snapshots (products + vectors)
//! - [`query`]: Facets, statistics, and the daily deal over a snapshot
//! - [`source`]: Catalog sources (JSON file, bundled sample)

#![doc = include_str!("../README.md")]

pub mod catalog;
pub mod error;
pub mod product;
pub mod query;
pub mod source;

// Re-export key types at crate root for convenience
pub use catalog::{CatalogSnapshot, CatalogStore, Embedding};
pub use error::{Error, Result};
pub use product::{Product, ProductFilter};
pub use query::{BrandCount, CatalogStats, PriceRange};
pub use source::{CatalogSource, JsonCatalogSource, SampleCatalog, validate_products};
