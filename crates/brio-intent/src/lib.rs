//! Intent classification for the Brio assistant.
//!
//! This crate provides:
//!
//! - **Tokenization**: lower-cased, stop-word-filtered tokens with the raw
//!   message retained via [`tokenize::normalize`].
//! - **Pattern registry**: the ordered, append-only intent catalog via
//!   [`pattern::PatternRegistry`].
//! - **Scoring**: weighted keyword/regex scoring with a stable
//!   registration-order tie-break via [`score::best_match`].
//! - **Entity extraction**: per-kind heuristics over the raw message via
//!   [`entity::EntityExtractor`].
//! - **Classification**: the assembled pipeline via
//!   [`classifier::Classifier`].

pub mod classifier;
pub mod entity;
pub mod error;
pub mod pattern;
pub mod score;
pub mod tokenize;

pub use classifier::{ClassificationResult, Classifier, UNKNOWN_INTENT};
pub use entity::{EntityExtractor, EntityKind, EntityMap, EntityValue};
pub use error::{IntentError, Result};
pub use pattern::{IntentPattern, PatternRegistry};
pub use score::{PatternScore, best_match, score_pattern};
pub use tokenize::{Normalized, normalize};
