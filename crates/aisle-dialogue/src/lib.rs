//! Aisle Dialogue: a stateless, rule-based shopping assistant.
//!
//! # Modules
//!
//! - [`intent`]: Ordered intent rule table and classifier
//! - [`slots`]: Search terms, budget, and category extraction
//! - [`composer`]: Per-intent reply templates
//! - [`engine`]: [`DialogueEngine`], which ties the above to retrieval
//! - [`types`]: Configuration and the reply type
//!
//! # Example
//!
//! ```rust,ignore
//! use aisle_dialogue::DialogueEngine;
//!
//! let dialogue = DialogueEngine::new(retrieval)?;
//! let reply = dialogue.process("Recommend a laptop under $700", None).await?;
//! println!("{} ({})", reply.message, reply.intent);
//! ```

#![doc = include_str!("../README.md")]

pub mod composer;
pub mod engine;
pub mod intent;
pub mod slots;
pub mod types;

pub use composer::compose;
pub use engine::DialogueEngine;
pub use intent::{INTENT_RULES, Intent, IntentClassifier};
pub use slots::{SlotExtractor, Slots};
pub use types::{DialogueConfig, DialogueResponse};
