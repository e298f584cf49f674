//! Dialogue configuration and the reply type.

use aisle_vector::SearchResult;
use serde::{Deserialize, Serialize};

use crate::intent::Intent;

// ============================================================================
// Configuration
// ============================================================================

/// Retrieval depth and attachment caps per intent.
///
/// `*_top_k` is how many products retrieval is asked for; `*_products` is how
/// many of those end up attached to the reply.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DialogueConfig {
    /// Retrieval depth for product searches.
    pub search_top_k: usize,
    /// Retrieval depth for comparisons.
    pub comparison_top_k: usize,
    /// Retrieval depth for recommendations.
    pub recommendation_top_k: usize,
    /// Retrieval depth for product questions.
    pub question_top_k: usize,

    /// Products attached to a search reply.
    pub search_products: usize,
    /// Products attached to a comparison reply.
    pub comparison_products: usize,
    /// Products attached to a recommendation reply.
    pub recommendation_products: usize,
    /// Products attached to a question reply.
    pub question_products: usize,

    /// Minimum similarity score for retrieval.
    pub min_score: f32,
}

impl Default for DialogueConfig {
    fn default() -> Self {
        Self {
            search_top_k: 6,
            comparison_top_k: 4,
            recommendation_top_k: 5,
            question_top_k: 3,
            search_products: 4,
            comparison_products: 3,
            recommendation_products: 4,
            question_products: 2,
            min_score: 0.1,
        }
    }
}

impl DialogueConfig {
    /// Retrieval depth for `intent`; `None` means no retrieval.
    pub fn top_k(&self, intent: Intent) -> Option<usize> {
        match intent {
            Intent::ProductSearch => Some(self.search_top_k),
            Intent::Comparison => Some(self.comparison_top_k),
            Intent::Recommendation => Some(self.recommendation_top_k),
            Intent::Question => Some(self.question_top_k),
            Intent::General => None,
        }
    }

    /// Number of products attached to a reply for `intent`.
    pub fn product_cap(&self, intent: Intent) -> usize {
        match intent {
            Intent::ProductSearch => self.search_products,
            Intent::Comparison => self.comparison_products,
            Intent::Recommendation => self.recommendation_products,
            Intent::Question => self.question_products,
            Intent::General => 0,
        }
    }
}

// ============================================================================
// Reply
// ============================================================================

/// A reply to one message.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DialogueResponse {
    /// User-facing text.
    pub message: String,

    /// Products referenced by the reply, best first.
    pub products: Vec<SearchResult>,

    /// The classified intent.
    pub intent: Intent,

    /// Search terms used for retrieval (product searches only).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub search_query: Option<String>,

    /// Budget extracted from the message (searches and recommendations).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub budget: Option<f64>,

    /// Category named in the message (product searches only).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
}

impl DialogueResponse {
    pub(crate) fn new(intent: Intent, message: String, products: Vec<SearchResult>) -> Self {
        Self {
            message,
            products,
            intent,
            search_query: None,
            budget: None,
            category: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = DialogueConfig::default();
        assert_eq!(config.top_k(Intent::ProductSearch), Some(6));
        assert_eq!(config.top_k(Intent::Comparison), Some(4));
        assert_eq!(config.top_k(Intent::Recommendation), Some(5));
        assert_eq!(config.top_k(Intent::Question), Some(3));
        assert_eq!(config.top_k(Intent::General), None);
        assert_eq!(config.product_cap(Intent::ProductSearch), 4);
        assert_eq!(config.product_cap(Intent::Comparison), 3);
        assert_eq!(config.product_cap(Intent::Question), 2);
        assert_eq!(config.product_cap(Intent::General), 0);
    }

    #[test]
    fn test_partial_config_fills_defaults() {
        let config: DialogueConfig = serde_json::from_str(r#"{"search_top_k": 10}"#).unwrap();
        assert_eq!(config.search_top_k, 10);
        assert_eq!(config.question_top_k, 3);
        assert!((config.min_score - 0.1).abs() < f32::EPSILON);
    }

    #[test]
    fn test_response_serialization_skips_absent_fields() {
        let response = DialogueResponse::new(Intent::General, "hi".into(), Vec::new());
        let json = serde_json::to_value(&response).unwrap();
        assert_eq!(json["intent"], "general");
        assert_eq!(json["products"], serde_json::json!([]));
        assert!(json.get("budget").is_none());
        assert!(json.get("search_query").is_none());
    }
}
