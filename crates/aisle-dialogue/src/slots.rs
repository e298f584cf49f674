//! Slot extraction: search terms, budget, and category.
//!
//! Absence is never an error. A message with no budget or no known category
//! simply yields `None`, and a message made only of stop words yields empty
//! search terms, which retrieval treats as a browse request.

use aisle_core::{Error, Result};
use regex::Regex;
use serde::Serialize;

/// Words dropped from search terms.
pub const STOP_WORDS: &[&str] = &[
    "find", "show", "get", "me", "a", "an", "the", "for", "with", "under", "below", "above",
    "over",
];

/// Maximum number of words kept in search terms.
pub const MAX_SEARCH_TERMS: usize = 6;

/// An amount with optional thousands separators and optional cents.
const AMOUNT: &str = r"((?:\d{1,3}(?:,\d{3})+|\d+)(?:\.\d{2})?)";

/// Budget patterns, tried in order; the first that matches decides.
const BUDGET_PATTERNS: &[&str] = &[r"\$", "under ", "below ", "less than ", "budget "];

/// Ordered (category, keywords) table. A keyword matches a whole word or its
/// plural with a trailing "s".
pub const CATEGORY_KEYWORDS: &[(&str, &[&str])] = &[
    (
        "Electronics",
        &["phone", "laptop", "computer", "tablet", "camera", "headphones", "speaker"],
    ),
    ("Clothing", &["shirt", "pants", "dress", "jacket", "clothes", "jeans"]),
    ("Footwear", &["shoes", "sneakers", "boots", "sandals"]),
    ("Home & Kitchen", &["kitchen", "cooking", "blender", "pot", "appliance"]),
    ("Furniture", &["chair", "desk", "table", "furniture"]),
    ("Sports & Outdoors", &["fitness", "exercise", "outdoor", "sports"]),
];

/// Structured values pulled from one message.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Slots {
    /// Lower-cased content words, space separated, at most six.
    pub search_terms: String,
    /// Spending ceiling, if one was stated.
    pub budget: Option<f64>,
    /// Category display name, if a keyword was found.
    pub category: Option<String>,
}

/// Compiled slot patterns.
#[derive(Debug, Clone)]
pub struct SlotExtractor {
    word: Regex,
    budget: Vec<Regex>,
}

impl SlotExtractor {
    /// Compile the extractor's patterns.
    pub fn new() -> Result<Self> {
        let word = compile(r"\w+")?;
        let budget = BUDGET_PATTERNS
            .iter()
            .map(|prefix| compile(&format!("{prefix}{AMOUNT}")))
            .collect::<Result<Vec<_>>>()?;
        Ok(Self { word, budget })
    }

    /// Extract every slot from `message`.
    pub fn extract(&self, message: &str) -> Slots {
        Slots {
            search_terms: self.search_terms(message),
            budget: self.budget(message),
            category: self.category(message).map(str::to_string),
        }
    }

    /// Lower-case, keep word characters, drop stop words, keep the first six.
    pub fn search_terms(&self, message: &str) -> String {
        let lower = message.to_lowercase();
        self.words(&lower)
            .filter(|w| !STOP_WORDS.contains(w))
            .take(MAX_SEARCH_TERMS)
            .collect::<Vec<_>>()
            .join(" ")
    }

    /// The first budget pattern that matches and parses.
    ///
    /// `"$1,200"` is 1200.0; a capture that fails to parse moves on to the
    /// next pattern.
    pub fn budget(&self, message: &str) -> Option<f64> {
        let lower = message.to_lowercase();
        self.budget.iter().find_map(|pattern| {
            let captured = pattern.captures(&lower)?.get(1)?.as_str().replace(',', "");
            captured.parse::<f64>().ok()
        })
    }

    /// The first category in table order with a keyword among the message's words.
    pub fn category(&self, message: &str) -> Option<&'static str> {
        let lower = message.to_lowercase();
        let words: Vec<&str> = self.words(&lower).collect();
        CATEGORY_KEYWORDS
            .iter()
            .find(|(_, keywords)| {
                words
                    .iter()
                    .any(|word| keywords.iter().any(|k| keyword_matches(k, word)))
            })
            .map(|(category, _)| *category)
    }

    fn words<'a>(&'a self, text: &'a str) -> impl Iterator<Item = &'a str> + 'a {
        self.word.find_iter(text).map(|m| m.as_str())
    }
}

fn keyword_matches(keyword: &str, word: &str) -> bool {
    word == keyword || word.strip_suffix('s') == Some(keyword)
}

fn compile(pattern: &str) -> Result<Regex> {
    Regex::new(pattern).map_err(|e| Error::config(format!("invalid slot pattern {pattern:?}: {e}")))
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn extractor() -> SlotExtractor {
        SlotExtractor::new().unwrap()
    }

    // ------------------------------------------------------------------------
    // search terms
    // ------------------------------------------------------------------------

    #[test]
    fn test_search_terms_drop_stop_words() {
        assert_eq!(
            extractor().search_terms("Find me the best wireless headphones"),
            "best wireless headphones"
        );
    }

    #[test]
    fn test_search_terms_strip_punctuation_and_case() {
        assert_eq!(
            extractor().search_terms("Show: LAPTOP, under $700!"),
            "laptop 700"
        );
    }

    #[test]
    fn test_search_terms_cap_at_six() {
        assert_eq!(
            extractor().search_terms("one two three four five six seven eight"),
            "one two three four five six"
        );
    }

    #[test]
    fn test_search_terms_keep_duplicates_in_order() {
        assert_eq!(extractor().search_terms("red shoes red"), "red shoes red");
    }

    #[test]
    fn test_search_terms_all_stop_words() {
        assert_eq!(extractor().search_terms("find me a"), "");
        assert_eq!(extractor().search_terms(""), "");
    }

    // ------------------------------------------------------------------------
    // budget
    // ------------------------------------------------------------------------

    #[test]
    fn test_budget_currency_symbol() {
        assert_eq!(extractor().budget("find headphones under $150"), Some(150.0));
        assert_eq!(extractor().budget("around $49.99 please"), Some(49.99));
    }

    #[test]
    fn test_budget_thousands_separator() {
        assert_eq!(extractor().budget("a laptop for $1,200"), Some(1200.0));
    }

    #[test]
    fn test_budget_word_patterns() {
        let e = extractor();
        assert_eq!(e.budget("shoes under 80"), Some(80.0));
        assert_eq!(e.budget("Below 300 bucks"), Some(300.0));
        assert_eq!(e.budget("less than 50"), Some(50.0));
        assert_eq!(e.budget("my budget 400"), Some(400.0));
    }

    #[test]
    fn test_budget_currency_symbol_wins() {
        // "$" is tried before "under".
        assert_eq!(extractor().budget("under 100, ideally $90"), Some(90.0));
    }

    #[test]
    fn test_budget_absent() {
        let e = extractor();
        assert_eq!(e.budget("budget is tight"), None);
        assert_eq!(e.budget("cheap laptop"), None);
        assert_eq!(e.budget("$ signs everywhere"), None);
    }

    #[test]
    fn test_budget_zero_is_present() {
        assert_eq!(extractor().budget("under $0"), Some(0.0));
    }

    // ------------------------------------------------------------------------
    // category
    // ------------------------------------------------------------------------

    #[test]
    fn test_category_keywords() {
        let e = extractor();
        assert_eq!(e.category("a new laptop"), Some("Electronics"));
        assert_eq!(e.category("running shoes"), Some("Footwear"));
        assert_eq!(e.category("Kitchen gadgets"), Some("Home & Kitchen"));
        assert_eq!(e.category("standing desk"), Some("Furniture"));
        assert_eq!(e.category("fitness tracker"), Some("Sports & Outdoors"));
        assert_eq!(e.category("denim jackets"), Some("Clothing"));
    }

    #[test]
    fn test_category_plural() {
        assert_eq!(extractor().category("cheap phones"), Some("Electronics"));
        assert_eq!(extractor().category("two chairs"), Some("Furniture"));
    }

    #[test]
    fn test_category_whole_words_only() {
        // "pot" must not match inside "spot" or "potato".
        assert_eq!(extractor().category("a good spot for potato salad"), None);
    }

    #[test]
    fn test_category_table_order() {
        // Both Electronics and Furniture keywords; Electronics comes first.
        assert_eq!(extractor().category("a desk for my laptop"), Some("Electronics"));
    }

    #[test]
    fn test_category_none() {
        assert_eq!(extractor().category("something nice"), None);
    }

    // ------------------------------------------------------------------------
    // extract
    // ------------------------------------------------------------------------

    #[test]
    fn test_extract_all_slots() {
        let slots = extractor().extract("Recommend a laptop under $700");
        assert_eq!(slots.search_terms, "recommend laptop 700");
        assert_eq!(slots.budget, Some(700.0));
        assert_eq!(slots.category.as_deref(), Some("Electronics"));
    }
}
