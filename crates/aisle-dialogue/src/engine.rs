//! The dialogue engine: classify, extract, retrieve, compose.

use std::sync::Arc;

use aisle_core::Result;
use aisle_vector::RetrievalEngine;

use crate::composer::compose;
use crate::intent::{Intent, IntentClassifier};
use crate::slots::{SlotExtractor, Slots};
use crate::types::{DialogueConfig, DialogueResponse};

/// Answers one shopping message at a time on top of a [`RetrievalEngine`].
///
/// Holds no per-conversation state; every call to [`process`](Self::process)
/// is independent.
#[derive(Debug)]
pub struct DialogueEngine {
    retrieval: Arc<RetrievalEngine>,
    classifier: IntentClassifier,
    slots: SlotExtractor,
    config: DialogueConfig,
}

impl DialogueEngine {
    /// Create an engine with the built-in rule tables and default config.
    pub fn new(retrieval: Arc<RetrievalEngine>) -> Result<Self> {
        Ok(Self {
            retrieval,
            classifier: IntentClassifier::new()?,
            slots: SlotExtractor::new()?,
            config: DialogueConfig::default(),
        })
    }

    /// Override the per-intent retrieval settings.
    pub fn with_config(mut self, config: DialogueConfig) -> Self {
        self.config = config;
        self
    }

    /// Replace the intent rules.
    pub fn with_classifier(mut self, classifier: IntentClassifier) -> Self {
        self.classifier = classifier;
        self
    }

    /// The retrieval engine this dialogue searches with.
    pub fn retrieval(&self) -> &Arc<RetrievalEngine> {
        &self.retrieval
    }

    /// The settings in effect.
    pub fn config(&self) -> &DialogueConfig {
        &self.config
    }

    /// Classify `message` and extract its slots without retrieving anything.
    pub fn analyze(&self, message: &str) -> (Intent, Slots) {
        (self.classifier.classify(message), self.slots.extract(message))
    }

    /// Reply to `message`.
    ///
    /// Callers are expected to reject empty messages first; an empty message
    /// here is simply small talk. Embedding provider failures during retrieval
    /// propagate so the caller can decide how to degrade.
    pub async fn process(&self, message: &str, user_id: Option<&str>) -> Result<DialogueResponse> {
        let (intent, slots) = self.analyze(message);
        log::debug!(
            "Message from {}: intent={intent}, terms={:?}, budget={:?}, category={:?}",
            user_id.unwrap_or("anonymous"),
            slots.search_terms,
            slots.budget,
            slots.category
        );

        let results = match self.config.top_k(intent) {
            Some(top_k) => {
                self.retrieval
                    .search(&slots.search_terms, top_k, self.config.min_score)
                    .await?
            }
            None => Vec::new(),
        };
        if results.is_empty() && intent != Intent::General {
            log::debug!("No products for {intent} query {:?}", slots.search_terms);
        }

        Ok(compose(intent, message, &slots, results, &self.config))
    }
}

// ============================================================================
// Tests
// ============================================================================
