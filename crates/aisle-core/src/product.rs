//! The product record and read-only filters over it.

use serde::{Deserialize, Serialize};

/// A catalog product.
///
/// Products are immutable once loaded into a [`CatalogStore`](crate::CatalogStore);
/// every other component sees them through shared `Arc<Product>` handles.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Product {
    /// Unique identifier, stable across refreshes of the same source.
    pub id: u64,

    /// Display name.
    pub name: String,

    /// Free-text description.
    #[serde(default)]
    pub description: String,

    /// Non-negative price.
    pub price: f64,

    /// ISO currency code.
    #[serde(default = "default_currency")]
    pub currency: String,

    /// Category label (e.g., "Electronics").
    #[serde(default)]
    pub category: String,

    /// Brand name.
    #[serde(default)]
    pub brand: String,

    /// Product image URL.
    #[serde(default)]
    pub image_url: String,

    /// Average rating, 0.0 to 5.0.
    #[serde(default)]
    pub rating: f64,

    /// Number of reviews behind `rating`.
    #[serde(default)]
    pub review_count: u64,

    /// Short descriptive tags (five or fewer recommended).
    #[serde(default)]
    pub tags: Vec<String>,
}

fn default_currency() -> String {
    "USD".to_string()
}

impl Product {
    /// Create a product with the required fields; the rest start empty.
    pub fn new(id: u64, name: impl Into<String>, price: f64) -> Self {
        Self {
            id,
            name: name.into(),
            description: String::new(),
            price,
            currency: default_currency(),
            category: String::new(),
            brand: String::new(),
            image_url: String::new(),
            rating: 0.0,
            review_count: 0,
            tags: Vec::new(),
        }
    }

    /// Set the description.
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    /// Set the category.
    pub fn with_category(mut self, category: impl Into<String>) -> Self {
        self.category = category.into();
        self
    }

    /// Set the brand.
    pub fn with_brand(mut self, brand: impl Into<String>) -> Self {
        self.brand = brand.into();
        self
    }

    /// Set rating and review count.
    pub fn with_rating(mut self, rating: f64, review_count: u64) -> Self {
        self.rating = rating;
        self.review_count = review_count;
        self
    }

    /// Set the tags.
    pub fn with_tags<I, S>(mut self, tags: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.tags = tags.into_iter().map(Into::into).collect();
        self
    }

    /// The text that gets embedded for this product.
    ///
    /// Always `name + " " + description + " " + tags joined by " "`, so the
    /// separators are present even when a part is empty.
    pub fn composite_text(&self) -> String {
        format!("{} {} {}", self.name, self.description, self.tags.join(" "))
    }
}

/// Category and price-range constraints applied to products.
///
/// Empty filters match everything.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ProductFilter {
    /// Category, compared case-insensitively.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,

    /// Inclusive lower price bound.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub min_price: Option<f64>,

    /// Inclusive upper price bound.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_price: Option<f64>,
}

impl ProductFilter {
    /// A filter that matches every product.
    pub fn new() -> Self {
        Self::default()
    }

    /// Restrict to a category.
    pub fn with_category(mut self, category: impl Into<String>) -> Self {
        self.category = Some(category.into());
        self
    }

    /// Require `price >= min`.
    pub fn with_min_price(mut self, min: f64) -> Self {
        self.min_price = Some(min);
        self
    }

    /// Require `price <= max`.
    pub fn with_max_price(mut self, max: f64) -> Self {
        self.max_price = Some(max);
        self
    }

    /// True when no constraint is set.
    pub fn is_empty(&self) -> bool {
        self.category.is_none() && self.min_price.is_none() && self.max_price.is_none()
    }

    /// Whether `product` satisfies every constraint.
    pub fn matches(&self, product: &Product) -> bool {
        if let Some(category) = &self.category
            && !product.category.eq_ignore_ascii_case(category)
        {
            return false;
        }
        if let Some(min) = self.min_price
            && product.price < min
        {
            return false;
        }
        if let Some(max) = self.max_price
            && product.price > max
        {
            return false;
        }
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn shoes() -> Product {
        Product::new(1, "Nike Air Max 270", 89.99)
            .with_description("Comfortable running shoes")
            .with_category("Footwear")
            .with_brand("Nike")
            .with_rating(4.5, 1250)
            .with_tags(["running", "comfortable"])
    }

    // ------------------------------------------------------------------------
    // Product tests
    // ------------------------------------------------------------------------

    #[test]
    fn test_composite_text() {
        assert_eq!(
            shoes().composite_text(),
            "Nike Air Max 270 Comfortable running shoes running comfortable"
        );
    }

    #[test]
    fn test_composite_text_keeps_separators() {
        let bare = Product::new(2, "Mug", 9.0);
        assert_eq!(bare.composite_text(), "Mug  ");
    }

    #[test]
    fn test_deserialize_defaults() {
        let json = r#"{"id": 5, "name": "Tumbler", "price": 35.0}"#;
        let product: Product = serde_json::from_str(json).unwrap();
        assert_eq!(product.currency, "USD");
        assert!(product.tags.is_empty());
        assert_eq!(product.review_count, 0);
    }

    // ------------------------------------------------------------------------
    // ProductFilter tests
    // ------------------------------------------------------------------------

    #[test]
    fn test_empty_filter_matches_all() {
        let filter = ProductFilter::new();
        assert!(filter.is_empty());
        assert!(filter.matches(&shoes()));
    }

    #[test]
    fn test_category_case_insensitive() {
        assert!(ProductFilter::new().with_category("footwear").matches(&shoes()));
        assert!(!ProductFilter::new().with_category("Electronics").matches(&shoes()));
    }

    #[test]
    fn test_price_bounds_inclusive() {
        assert!(ProductFilter::new().with_max_price(89.99).matches(&shoes()));
        assert!(ProductFilter::new().with_min_price(89.99).matches(&shoes()));
        assert!(!ProductFilter::new().with_max_price(50.0).matches(&shoes()));
        assert!(!ProductFilter::new().with_min_price(90.0).matches(&shoes()));
    }

    #[test]
    fn test_filter_serialization_skips_unset() {
        let json = serde_json::to_string(&ProductFilter::new().with_max_price(100.0)).unwrap();
        assert_eq!(json, r#"{"max_price":100.0}"#);
    }
}
