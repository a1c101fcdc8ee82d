//! The classifier — tokenize, score, extract.
//!
//! A single [`Classifier`] is constructed at application start and passed by
//! reference to every consumer.  It is `Send + Sync`; pattern additions are
//! synchronized internally so runtime registration is safe alongside
//! concurrent classification.

use std::sync::RwLock;

use tracing::debug;

use crate::entity::{EntityExtractor, EntityKind, EntityMap};
use crate::pattern::{IntentPattern, PatternRegistry};
use crate::score::best_match;
use crate::tokenize::normalize;

/// Reserved intent name returned when the registry is empty.
pub const UNKNOWN_INTENT: &str = "unknown";

/// The outcome of classifying one message.  Ephemeral, produced per call.
#[derive(Debug, Clone)]
pub struct ClassificationResult {
    /// Name of the winning intent.
    pub intent: String,

    /// Confidence in `[0, 1]`.  Ambiguity is signalled by a low value, never
    /// by an error.
    pub confidence: f64,

    /// Entities extracted for the winning intent's declared kinds.
    pub entities: EntityMap,

    /// Human-readable scoring trace for the UI's "why this" panel.
    pub reasoning: String,
}

/// Intent classifier over an append-only pattern registry.
pub struct Classifier {
    registry: RwLock<PatternRegistry>,
    extractor: EntityExtractor,
}

impl Classifier {
    /// Create a classifier seeded with the built-in catalog.
    #[must_use]
    pub fn new() -> Self {
        Self::with_registry(PatternRegistry::with_builtin_catalog())
    }

    /// Create a classifier over a specific registry.
    #[must_use]
    pub fn with_registry(registry: PatternRegistry) -> Self {
        Self {
            registry: RwLock::new(registry),
            extractor: EntityExtractor::new(),
        }
    }

    /// Append a pattern to the registry.
    pub fn add_pattern(&self, pattern: IntentPattern) {
        self.registry
            .write()
            .expect("pattern registry lock poisoned")
            .add(pattern);
    }

    /// A defensive copy of the registered patterns in registration order.
    #[must_use]
    pub fn patterns(&self) -> Vec<IntentPattern> {
        self.registry
            .read()
            .expect("pattern registry lock poisoned")
            .patterns()
    }

    /// Classify a message.
    ///
    /// Always returns a result: against an empty registry this is the
    /// reserved [`UNKNOWN_INTENT`] at confidence 0; for text no pattern
    /// recognizes, the first-registered pattern (the conversational
    /// catch-all in the built-in catalog) wins at confidence 0.
    pub fn classify(&self, text: &str) -> ClassificationResult {
        let message = normalize(text);
        let registry = self.registry.read().expect("pattern registry lock poisoned");

        let Some((index, score)) = best_match(registry.as_slice(), &message.raw, &message.tokens)
        else {
            debug!("classification against empty registry");
            return ClassificationResult {
                intent: UNKNOWN_INTENT.to_owned(),
                confidence: 0.0,
                entities: EntityMap::new(),
                reasoning: "no patterns registered".to_owned(),
            };
        };

        let pattern = &registry.as_slice()[index];
        let confidence = score.final_score.clamp(0.0, 1.0);
        let entities = self.extractor.extract(&pattern.entities, &message.raw);

        let reasoning = format!(
            "matched `{}`: {} regex hit(s), {} keyword hit(s) ({} exact), score {:.2}",
            pattern.name, score.regex_hits, score.substring_hits, score.exact_hits, confidence,
        );

        debug!(
            intent = %pattern.name,
            confidence,
            entities = entities.len(),
            "message classified"
        );

        ClassificationResult {
            intent: pattern.name.clone(),
            confidence,
            entities,
            reasoning,
        }
    }

    /// Extract entities of the given kinds from raw text, independent of any
    /// pattern match.  Callers that already know which capability will handle
    /// the message use this to target its declared kinds directly.
    #[must_use]
    pub fn extract(&self, kinds: &[EntityKind], text: &str) -> EntityMap {
        self.extractor.extract(kinds, text)
    }
}

impl Default for Classifier {
    fn default() -> Self {
        Self::new()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entity::{EntityKind, EntityValue};

    #[test]
    fn business_plan_italian_message() {
        let classifier = Classifier::new();
        let result = classifier.classify("Fai un business plan per questo progetto");
        assert_eq!(result.intent, "compute-plan");
        assert!(result.confidence > 0.5, "confidence {}", result.confidence);
    }

    #[test]
    fn confidence_always_in_unit_interval() {
        let classifier = Classifier::new();
        for text in [
            "",
            "ciao",
            "business plan roi business plan roi business plan",
            "analizza l'immobile di 120 mq a Milano",
            "elenca i progetti residenziali",
            "invia una mail a test@example.com",
            "automatizza il workflow del progetto Alfa",
        ] {
            let result = classifier.classify(text);
            assert!(
                (0.0..=1.0).contains(&result.confidence),
                "confidence {} out of range for {text:?}",
                result.confidence
            );
        }
    }

    #[test]
    fn winning_intent_exists_in_registry() {
        let classifier = Classifier::new();
        let names: Vec<_> = classifier.patterns().into_iter().map(|p| p.name).collect();
        let result = classifier.classify("valuta l'immobile a Torino");
        assert!(names.contains(&result.intent));
    }

    #[test]
    fn entities_limited_to_declared_kinds() {
        let classifier = Classifier::new();
        // compute-plan declares project-name, area, units — not location.
        let result = classifier.classify("business plan per il progetto Corte Bella a Milano");
        assert_eq!(result.intent, "compute-plan");
        assert!(!result.entities.contains_key(&EntityKind::Location));
        assert_eq!(
            result.entities.get(&EntityKind::ProjectName),
            Some(&EntityValue::Text("Corte Bella a Milano".into()))
        );
    }

    #[test]
    fn ambiguous_text_falls_back_to_conversation() {
        let classifier = Classifier::new();
        let result = classifier.classify("qwerty asdf zxcv");
        assert_eq!(result.intent, "general-conversation");
        assert_eq!(result.confidence, 0.0);
    }

    #[test]
    fn empty_registry_returns_reserved_unknown() {
        let classifier = Classifier::with_registry(PatternRegistry::empty());
        let result = classifier.classify("business plan");
        assert_eq!(result.intent, UNKNOWN_INTENT);
        assert_eq!(result.confidence, 0.0);
        assert!(result.entities.is_empty());
    }

    #[test]
    fn runtime_added_pattern_is_scored() {
        let classifier = Classifier::new();
        classifier.add_pattern(
            IntentPattern::new("export-data")
                .with_keywords(&["esporta", "csv", "excel"])
                .with_regex(r"(?i)esporta")
                .expect("valid regex"),
        );
        let result = classifier.classify("esporta i dati in csv");
        assert_eq!(result.intent, "export-data");
    }

    #[test]
    fn mutating_pattern_copy_does_not_affect_classification() {
        let classifier = Classifier::new();
        let mut copy = classifier.patterns();
        copy.clear();
        let result = classifier.classify("Fai un business plan per questo progetto");
        assert_eq!(result.intent, "compute-plan");
    }

    #[test]
    fn extract_targets_requested_kinds_only() {
        let classifier = Classifier::new();
        let entities =
            classifier.extract(&[EntityKind::ProjectName], "report per il progetto Alfa");
        assert_eq!(
            entities.get(&EntityKind::ProjectName),
            Some(&EntityValue::Text("Alfa".into()))
        );
        assert!(!entities.contains_key(&EntityKind::Location));
    }

    #[test]
    fn analyze_message_extracts_declared_entities() {
        let classifier = Classifier::new();
        let result = classifier.classify("Analizza l'immobile residenziale di 120 mq a Milano");
        assert_eq!(result.intent, "analyze-entity");
        assert_eq!(
            result.entities.get(&EntityKind::Location),
            Some(&EntityValue::Text("Milano".into()))
        );
        assert_eq!(
            result.entities.get(&EntityKind::Area),
            Some(&EntityValue::Integer(120))
        );
        assert_eq!(
            result.entities.get(&EntityKind::Category),
            Some(&EntityValue::Text("residenziale".into()))
        );
    }
}
