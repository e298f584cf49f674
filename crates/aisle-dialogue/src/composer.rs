//! Reply composition.
//!
//! [`compose`] is a pure function of intent, slots, and ranked results. It
//! applies the budget filter for searches and recommendations, picks the
//! per-intent template, and trims the attached product list.

use aisle_vector::SearchResult;

use crate::intent::Intent;
use crate::slots::Slots;
use crate::types::{DialogueConfig, DialogueResponse};

/// Characters of description quoted in a recommendation.
pub const SNIPPET_CHARS: usize = 100;

const GREETING_REPLY: &str = "Hello! 👋 I'm your AI shopping assistant. I can help you:\n\n\
    🔍 Find products: 'Find wireless headphones under $200'\n\
    💡 Get recommendations: 'Recommend a good laptop for students'\n\
    ⚖️ Compare products: 'Compare iPhone vs Samsung phones'\n\
    ❓ Answer questions: 'How good is the Sony WH-1000XM5?'\n\n\
    What can I help you find today?";

const HELP_REPLY: &str = "I'm here to help! You can ask me to:\n\n\
    • Find specific products\n\
    • Recommend items within your budget\n\
    • Compare different options\n\
    • Answer questions about products\n\n\
    Just tell me what you're looking for!";

const DEFAULT_REPLY: &str = "I'm your AI shopping assistant! I specialize in helping you find \
    and compare products. What are you shopping for today? 🛍️";

const GREETINGS: &[&str] = &["hello", "hi", "hey", "good morning", "good afternoon"];
const HELP_WORDS: &[&str] = &["help", "assist", "support"];

/// Build the reply for one message.
///
/// `message` is only consulted for `General`, to tell greetings and help
/// requests apart. `results` is the ranked retrieval output (ignored for
/// `General`).
pub fn compose(
    intent: Intent,
    message: &str,
    slots: &Slots,
    results: Vec<SearchResult>,
    config: &DialogueConfig,
) -> DialogueResponse {
    let cap = config.product_cap(intent);
    match intent {
        Intent::ProductSearch => {
            let results = within_budget(results, slots.budget);
            let text = search_reply(&slots.search_terms, &results, slots.budget);
            let mut response = DialogueResponse::new(intent, text, truncate(results, cap));
            response.search_query = Some(slots.search_terms.clone());
            response.budget = slots.budget;
            response.category = slots.category.clone();
            response
        }
        Intent::Comparison => {
            let text = comparison_reply(&results, cap);
            DialogueResponse::new(intent, text, truncate(results, cap))
        }
        Intent::Recommendation => {
            let results = within_budget(results, slots.budget);
            let text = recommendation_reply(&results);
            let mut response = DialogueResponse::new(intent, text, truncate(results, cap));
            response.budget = slots.budget;
            response
        }
        Intent::Question => {
            let text = question_reply(&results);
            DialogueResponse::new(intent, text, truncate(results, cap))
        }
        Intent::General => {
            DialogueResponse::new(intent, general_reply(message).to_string(), Vec::new())
        }
    }
}

fn within_budget(results: Vec<SearchResult>, budget: Option<f64>) -> Vec<SearchResult> {
    match budget {
        Some(budget) => results
            .into_iter()
            .filter(|r| r.product.price <= budget)
            .collect(),
        None => results,
    }
}

fn truncate(mut results: Vec<SearchResult>, cap: usize) -> Vec<SearchResult> {
    results.truncate(cap);
    results
}

// ----------------------------------------------------------------------------
// Templates
// ----------------------------------------------------------------------------

fn search_reply(query: &str, results: &[SearchResult], budget: Option<f64>) -> String {
    let Some(top) = results.first() else {
        return format!(
            "I couldn't find any products matching '{query}'. Try a different search term or check out our popular items!"
        );
    };
    let p = &top.product;
    let mut text = format!("Great! I found some excellent options for '{query}':\n\n");
    text.push_str(&format!(
        "🥇 **Top match**: {}\n💰 ${:.2} | ⭐ {:.1}/5\n",
        p.name, p.price, p.rating
    ));
    if top.similarity_score.is_some() {
        text.push_str(&format!("🎯 {}% match to your search\n", top.match_percent()));
    }
    text.push('\n');
    if let Some(budget) = budget {
        text.push_str(&format!(
            "💡 Within your ${budget:.0} budget: {} options found!\n\n",
            results.len()
        ));
    }
    if results.len() > 1 {
        text.push_str(
            "Here are more great options below. Want me to compare any of these or help you narrow down your choice? 🤔",
        );
    }
    text
}

fn comparison_reply(results: &[SearchResult], cap: usize) -> String {
    if results.len() < 2 {
        return "I need more specific product names to make a good comparison. What products are you thinking about?".to_string();
    }
    let mut text = String::from("Here are some great options to compare:\n\n");
    for (i, result) in results.iter().take(cap).enumerate() {
        let p = &result.product;
        text.push_str(&format!(
            "{}. **{}** - ${:.2}\n   Rating: {:.1}/5 ⭐ | {}\n\n",
            i + 1,
            p.name,
            p.price,
            p.rating,
            p.brand
        ));
    }
    text.push_str("Would you like me to highlight the key differences between any of these?");
    text
}

fn recommendation_reply(results: &[SearchResult]) -> String {
    let Some(best) = results.first() else {
        return "I'd love to help with recommendations! Could you tell me more about what you're looking for and your budget?".to_string();
    };
    let p = &best.product;
    format!(
        "Based on your needs, I'd recommend the **{}** by {}.\n\n\
         💰 Price: ${:.2}\n\
         ⭐ Rating: {:.1}/5 ({} reviews)\n\n\
         Why it's great: {}...\n\n\
         Here are a few other excellent options:",
        p.name,
        p.brand,
        p.price,
        p.rating,
        p.review_count,
        snippet(&p.description)
    )
}

fn question_reply(results: &[SearchResult]) -> String {
    let Some(top) = results.first() else {
        return "I'd be happy to answer questions about our products! What specifically would you like to know?".to_string();
    };
    let p = &top.product;
    format!(
        "About the **{}**:\n\n\
         💰 Price: ${:.2}\n\
         ⭐ Customer rating: {:.1}/5\n\
         📦 Category: {}\n\
         🏷️ Brand: {}\n\n\
         {}",
        p.name, p.price, p.rating, p.category, p.brand, p.description
    )
}

fn general_reply(message: &str) -> &'static str {
    let lower = message.to_lowercase();
    if GREETINGS.iter().any(|g| contains_phrase(&lower, g)) {
        GREETING_REPLY
    } else if HELP_WORDS.iter().any(|h| contains_word_prefix(&lower, h)) {
        HELP_REPLY
    } else {
        DEFAULT_REPLY
    }
}

/// First `SNIPPET_CHARS` characters, never splitting a character.
fn snippet(text: &str) -> &str {
    match text.char_indices().nth(SNIPPET_CHARS) {
        Some((idx, _)) => &text[..idx],
        None => text,
    }
}

/// `phrase` occurs in `text` with non-word characters (or the ends) on both sides.
fn contains_phrase(text: &str, phrase: &str) -> bool {
    text.match_indices(phrase).any(|(start, m)| {
        boundary_before(text, start) && boundary_at(text, start + m.len())
    })
}

/// Some word in `text` starts with `prefix` ("help", "helping", "assistance").
fn contains_word_prefix(text: &str, prefix: &str) -> bool {
    text.match_indices(prefix)
        .any(|(start, _)| boundary_before(text, start))
}

fn boundary_before(text: &str, idx: usize) -> bool {
    text[..idx].chars().next_back().is_none_or(|c| !c.is_alphanumeric())
}

fn boundary_at(text: &str, idx: usize) -> bool {
    text[idx..].chars().next().is_none_or(|c| !c.is_alphanumeric())
}

// ============================================================================
// Tests
// ============================================================================
