//! Read-only catalog queries: filtering, facets, statistics, and the daily deal.

use std::collections::{BTreeMap, BTreeSet, HashMap};
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::catalog::CatalogSnapshot;
use crate::product::{Product, ProductFilter};

/// Minimum rating for a product to be considered for the daily deal.
pub const DEAL_MIN_RATING: f64 = 4.0;

/// Number of brands reported in [`CatalogStats::top_brands`].
pub const TOP_BRANDS: usize = 10;

/// Aggregate figures about a catalog.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CatalogStats {
    /// Number of products.
    pub total_products: usize,

    /// Mean price, rounded to cents. Zero for an empty catalog.
    pub average_price: f64,

    /// Lowest and highest price.
    pub price_range: PriceRange,

    /// Product count per category.
    pub categories: BTreeMap<String, usize>,

    /// Most common brands, by count then name.
    pub top_brands: Vec<BrandCount>,
}

/// Inclusive price range.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PriceRange {
    /// Lowest price.
    pub min: f64,
    /// Highest price.
    pub max: f64,
}

/// A brand and its product count.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BrandCount {
    /// Brand name.
    pub brand: String,
    /// Products carrying it.
    pub count: usize,
}

impl CatalogSnapshot {
    /// Products matching `filter`, in catalog order.
    pub fn filter(&self, filter: &ProductFilter) -> Vec<Arc<Product>> {
        self.products()
            .iter()
            .filter(|p| filter.matches(p))
            .cloned()
            .collect()
    }

    /// Distinct categories, sorted.
    pub fn categories(&self) -> Vec<String> {
        distinct(self.products().iter().map(|p| p.category.as_str()))
    }

    /// Distinct brands, sorted.
    pub fn brands(&self) -> Vec<String> {
        distinct(self.products().iter().map(|p| p.brand.as_str()))
    }

    /// Catalog statistics.
    pub fn stats(&self) -> CatalogStats {
        let products = self.products();
        let total = products.len();

        let (average_price, price_range) = if total == 0 {
            (0.0, PriceRange { min: 0.0, max: 0.0 })
        } else {
            let sum: f64 = products.iter().map(|p| p.price).sum();
            let min = products.iter().map(|p| p.price).fold(f64::INFINITY, f64::min);
            let max = products
                .iter()
                .map(|p| p.price)
                .fold(f64::NEG_INFINITY, f64::max);
            (round_cents(sum / total as f64), PriceRange { min, max })
        };

        let mut categories = BTreeMap::new();
        let mut brands: HashMap<&str, usize> = HashMap::new();
        for product in products {
            *categories.entry(product.category.clone()).or_insert(0) += 1;
            *brands.entry(product.brand.as_str()).or_insert(0) += 1;
        }

        let mut top_brands: Vec<BrandCount> = brands
            .into_iter()
            .map(|(brand, count)| BrandCount {
                brand: brand.to_string(),
                count,
            })
            .collect();
        top_brands.sort_by(|a, b| b.count.cmp(&a.count).then_with(|| a.brand.cmp(&b.brand)));
        top_brands.truncate(TOP_BRANDS);

        CatalogStats {
            total_products: total,
            average_price,
            price_range,
            categories,
            top_brands,
        }
    }

    /// The cheapest product rated at least [`DEAL_MIN_RATING`].
    ///
    /// Earlier catalog entries win price ties.
    pub fn deal_of_the_day(&self) -> Option<Arc<Product>> {
        let mut best: Option<&Arc<Product>> = None;
        for product in self.products() {
            if product.rating < DEAL_MIN_RATING {
                continue;
            }
            match best {
                Some(current) if product.price >= current.price => {}
                _ => best = Some(product),
            }
        }
        best.cloned()
    }
}

fn distinct<'a>(values: impl Iterator<Item = &'a str>) -> Vec<String> {
    values
        .collect::<BTreeSet<_>>()
        .into_iter()
        .map(String::from)
        .collect()
}

fn round_cents(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}
