//! Intent classification.
//!
//! Intents are checked in the fixed order of [`INTENT_RULES`]; the first
//! intent with any matching pattern wins, and text that matches nothing is
//! [`Intent::General`]. Overlapping messages ("compare and recommend ...")
//! are decided by that order alone.

use std::fmt;

use aisle_core::{Error, Result};
use regex::{RegexSet, RegexSetBuilder};
use serde::{Deserialize, Serialize};

/// The purpose of a message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Intent {
    /// Find products matching a description.
    ProductSearch,
    /// Weigh several products against each other.
    Comparison,
    /// Pick one product for the user.
    Recommendation,
    /// Ask about a product's price, quality, or features.
    Question,
    /// Anything else: greetings, help, small talk.
    General,
}

impl Intent {
    /// The wire name (`product_search`, `comparison`, ...).
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::ProductSearch => "product_search",
            Self::Comparison => "comparison",
            Self::Recommendation => "recommendation",
            Self::Question => "question",
            Self::General => "general",
        }
    }
}

impl fmt::Display for Intent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Ordered (intent, patterns) table. Patterns are unanchored and matched
/// case-insensitively anywhere in the message.
pub const INTENT_RULES: &[(Intent, &[&str])] = &[
    (
        Intent::ProductSearch,
        &[
            r"find.*(?:headphones?|earbuds?|speakers?)",
            r"(?:show|find|search).*(?:laptop|computer|phone)",
            r"(?:looking for|need|want).*(?:shoes?|sneakers?|boots?)",
            r"(?:find|show).*(?:under|below|less than).*\$?\d+",
            r"(?:budget|cheap|affordable).*(?:laptop|phone|headphones?)",
        ],
    ),
    (
        Intent::Comparison,
        &[
            r"(?:compare|vs|versus|better|difference)",
            r"(?:which is better|what.*difference)",
            r"(?:should i get|choose between)",
        ],
    ),
    (
        Intent::Recommendation,
        &[
            r"(?:recommend|suggest|advice)",
            r"(?:what should i|help me choose)",
            r"(?:best.*for|good.*for)",
        ],
    ),
    (
        Intent::Question,
        &[
            r"(?:how much|what.*price|cost)",
            r"(?:is.*good|worth it|reliable)",
            r"(?:what.*features|specs|specifications)",
        ],
    ),
];

/// Compiled intent rules.
#[derive(Debug, Clone)]
pub struct IntentClassifier {
    rules: Vec<(Intent, RegexSet)>,
}

impl IntentClassifier {
    /// Compile the built-in [`INTENT_RULES`].
    pub fn new() -> Result<Self> {
        Self::from_rules(INTENT_RULES)
    }

    /// Compile a custom ordered rule table.
    pub fn from_rules<S: AsRef<str>>(rules: &[(Intent, &[S])]) -> Result<Self> {
        let rules = rules
            .iter()
            .map(|(intent, patterns)| {
                let set = RegexSetBuilder::new(patterns.iter().map(AsRef::as_ref))
                    .case_insensitive(true)
                    .build()
                    .map_err(|e| Error::config(format!("invalid {intent} pattern: {e}")))?;
                Ok((*intent, set))
            })
            .collect::<Result<Vec<_>>>()?;
        Ok(Self { rules })
    }

    /// First intent whose rule set matches `message`, else `General`.
    pub fn classify(&self, message: &str) -> Intent {
        self.rules
            .iter()
            .find(|(_, set)| set.is_match(message))
            .map(|(intent, _)| *intent)
            .unwrap_or(Intent::General)
    }

    /// Every intent whose rules match, in priority order.
    pub fn matches(&self, message: &str) -> Vec<Intent> {
        self.rules
            .iter()
            .filter(|(_, set)| set.is_match(message))
            .map(|(intent, _)| *intent)
            .collect()
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn classifier() -> IntentClassifier {
        IntentClassifier::new().unwrap()
    }

    #[test]
    fn test_rule_table_order() {
        let order: Vec<Intent> = INTENT_RULES.iter().map(|(i, _)| *i).collect();
        assert_eq!(
            order,
            vec![
                Intent::ProductSearch,
                Intent::Comparison,
                Intent::Recommendation,
                Intent::Question,
            ]
        );
    }

    #[test]
    fn test_each_intent() {
        let c = classifier();
        assert_eq!(c.classify("Find wireless headphones under $200"), Intent::ProductSearch);
        assert_eq!(c.classify("I'm looking for running shoes"), Intent::ProductSearch);
        assert_eq!(c.classify("Compare iPhone vs Samsung phones"), Intent::Comparison);
        assert_eq!(c.classify("Recommend a good laptop for students"), Intent::Recommendation);
        assert_eq!(c.classify("How much is the Sony WH-1000XM5?"), Intent::Question);
        assert_eq!(c.classify("hello there"), Intent::General);
    }

    #[test]
    fn test_priority_comparison_over_recommendation() {
        let c = classifier();
        let message = "compare and recommend the best laptop";
        assert_eq!(
            c.matches(message),
            vec![Intent::Comparison, Intent::Recommendation]
        );
        assert_eq!(c.classify(message), Intent::Comparison);
    }

    #[test]
    fn test_priority_search_over_question() {
        // Matches the search rule and the "cost" question rule.
        let c = classifier();
        assert_eq!(c.classify("show me a laptop that doesn't cost much"), Intent::ProductSearch);
    }

    #[test]
    fn test_recommendation_with_budget() {
        assert_eq!(
            classifier().classify("Recommend a laptop under $700"),
            Intent::Recommendation
        );
    }

    #[test]
    fn test_case_insensitive() {
        assert_eq!(classifier().classify("WHICH IS BETTER"), Intent::Comparison);
    }

    #[test]
    fn test_empty_message_is_general() {
        assert_eq!(classifier().classify(""), Intent::General);
        assert!(classifier().matches("").is_empty());
    }

    #[test]
    fn test_custom_rules() {
        let rules: &[(Intent, &[&str])] = &[(Intent::Question, &["warranty"])];
        let c = IntentClassifier::from_rules(rules).unwrap();
        assert_eq!(c.classify("what about the warranty?"), Intent::Question);
        assert_eq!(c.classify("compare these"), Intent::General);
    }

    #[test]
    fn test_invalid_rule_is_config_error() {
        let rules: &[(Intent, &[&str])] = &[(Intent::Question, &["(unclosed"])];
        let err = IntentClassifier::from_rules(rules).unwrap_err();
        assert!(matches!(err, Error::Config(_)));
    }

    #[test]
    fn test_intent_wire_names() {
        assert_eq!(Intent::ProductSearch.to_string(), "product_search");
        assert_eq!(
            serde_json::to_string(&Intent::Recommendation).unwrap(),
            "\"recommendation\""
        );
    }
}
