//! JSON output for each catalog, search, and chat command.
//!
//! Every function here builds a `serde_json::Value`; printing is left to
//! [`crate::app`].

use aisle_core::{CatalogSnapshot, Error, ProductFilter, Result};
use aisle_dialogue::DialogueEngine;
use aisle_vector::{RetrievalEngine, SearchParams};
use serde_json::{Value, json};

/// Reply to a blank chat message.
pub const EMPTY_MESSAGE_REPLY: &str = "Please enter a message to chat with me!";

/// Reply when the assistant could not search.
pub const CHAT_FAILURE_REPLY: &str =
    "Sorry, I'm having trouble processing your request. Please try again! 🤖";

// ============================================================================
// Search and chat
// ============================================================================

/// Ranked search with optional filters applied after ranking.
pub async fn search(
    retrieval: &RetrievalEngine,
    query: &str,
    limit: Option<usize>,
    min_score: Option<f32>,
    filter: ProductFilter,
) -> Result<Value> {
    let mut params = SearchParams::new(query).with_filter(filter.clone());
    params.limit = limit;
    params.min_score = min_score;
    let results = retrieval.search_with(&params).await?;
    Ok(json!({
        "query": query,
        "total_results": results.len(),
        "products": results,
        "filters_applied": {
            "category": filter.category,
            "min_price": filter.min_price,
            "max_price": filter.max_price,
        },
    }))
}

/// Reply to a blank chat message, or `None` when there is something to answer.
pub fn empty_message(message: &str) -> Option<Value> {
    message.trim().is_empty().then(|| {
        json!({
            "message": EMPTY_MESSAGE_REPLY,
            "products": [],
            "intent": "error",
            "error": "Message cannot be empty",
        })
    })
}

/// One chat turn.
///
/// Blank messages get the [`empty_message`] reply without reaching the
/// dialogue engine. Retrieval failures become a friendly reply; `details`
/// adds the error text.
pub async fn chat(
    dialogue: &DialogueEngine,
    message: &str,
    user_id: Option<&str>,
    details: bool,
) -> Result<Value> {
    if let Some(reply) = empty_message(message) {
        return Ok(reply);
    }
    match dialogue.process(message, user_id).await {
        Ok(response) => Ok(serde_json::to_value(response)?),
        Err(e) => {
            tracing::error!("Chat failed: {e}");
            let mut reply = json!({
                "message": CHAT_FAILURE_REPLY,
                "products": [],
                "intent": "error",
            });
            if details {
                reply["error_details"] = Value::String(e.to_string());
            }
            Ok(reply)
        }
    }
}

// ============================================================================
// Catalog queries
// ============================================================================

/// Products matching `filter`, in catalog order.
pub fn products(snapshot: &CatalogSnapshot, filter: &ProductFilter) -> Result<Value> {
    Ok(serde_json::to_value(snapshot.filter(filter))?)
}

/// One product by id.
pub fn product(snapshot: &CatalogSnapshot, id: u64) -> Result<Value> {
    let product = snapshot
        .by_id(id)
        .ok_or_else(|| Error::not_found(format!("product {id}")))?;
    Ok(serde_json::to_value(product)?)
}

/// Distinct categories.
pub fn categories(snapshot: &CatalogSnapshot) -> Value {
    let categories = snapshot.categories();
    json!({
        "total_categories": categories.len(),
        "categories": categories,
    })
}

/// Distinct brands.
pub fn brands(snapshot: &CatalogSnapshot) -> Value {
    let brands = snapshot.brands();
    json!({
        "total_brands": brands.len(),
        "brands": brands,
    })
}

/// Catalog statistics.
pub fn stats(snapshot: &CatalogSnapshot) -> Result<Value> {
    Ok(serde_json::to_value(snapshot.stats())?)
}

/// Deal of the day, or a message when nothing qualifies.
pub fn deal(snapshot: &CatalogSnapshot) -> Value {
    match snapshot.deal_of_the_day() {
        Some(product) => json!({
            "message": "💎 Today's Best Deal - Great Quality, Great Price!",
            "deal_score": format!("{:.1}/5 stars at just ${:.2}", product.rating, product.price),
            "savings_tip": "High-rated product at an amazing price! 🔥",
            "product": product,
        }),
        None => json!({ "message": "No deals available today" }),
    }
}

// ============================================================================
// Service info
// ============================================================================

/// Catalog size, index state, and embedding provider.
pub fn health(retrieval: &RetrievalEngine) -> Value {
    let snapshot = retrieval.catalog().snapshot();
    json!({
        "status": if snapshot.is_indexed() { "healthy" } else { "degraded" },
        "total_products": snapshot.len(),
        "generation": snapshot.generation(),
        "indexed": snapshot.is_indexed(),
        "provider": retrieval.provider_name(),
        "dimension": retrieval.dimension(),
    })
}

/// Binary name and version.
pub fn version() -> Value {
    json!({
        "name": "aisle",
        "version": env!("CARGO_PKG_VERSION"),
    })
}

// ============================================================================
// Tests
// ============================================================================
