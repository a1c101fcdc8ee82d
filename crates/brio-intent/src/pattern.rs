//! Intent patterns and the pattern registry.
//!
//! A pattern describes one named capability the classifier can route text
//! to: the keywords and regexes that signal it, a weight, and the entity
//! kinds worth extracting once it wins.  The registry is an ordered,
//! append-only list seeded with the built-in catalog at startup.

use regex::Regex;
use tracing::debug;

use crate::entity::EntityKind;
use crate::error::{IntentError, Result};

// ---------------------------------------------------------------------------
// IntentPattern
// ---------------------------------------------------------------------------

/// A single intent definition.
///
/// Keywords are stored lower-cased so scoring can compare them directly
/// against normalized tokens.  Regexes run against the raw message and are
/// stored compiled alongside their source for diagnostics.
#[derive(Debug, Clone)]
pub struct IntentPattern {
    /// Intent name.  Uniqueness is not enforced; duplicates are scored
    /// independently and ties resolve by registration order.
    pub name: String,

    /// Lower-cased keywords matched against normalized tokens.
    pub keywords: Vec<String>,

    /// Compiled regexes matched against the raw message.
    regexes: Vec<Regex>,

    /// Score multiplier, applied before the final clamp.
    pub weight: f64,

    /// Entity kinds to extract when this pattern wins.
    pub entities: Vec<EntityKind>,
}

impl IntentPattern {
    /// Create a pattern with no keywords, regexes, or entities and the
    /// default weight of 1.0.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            keywords: Vec::new(),
            regexes: Vec::new(),
            weight: 1.0,
            entities: Vec::new(),
        }
    }

    /// Add keywords (lower-cased on the way in).
    #[must_use]
    pub fn with_keywords(mut self, keywords: &[&str]) -> Self {
        self.keywords
            .extend(keywords.iter().map(|k| k.to_lowercase()));
        self
    }

    /// Add a regex matched against the raw message.
    ///
    /// Returns an error if the regex fails to compile.
    pub fn with_regex(mut self, pattern: &str) -> Result<Self> {
        let compiled = Regex::new(pattern).map_err(|e| IntentError::InvalidPattern {
            pattern: pattern.to_owned(),
            reason: e.to_string(),
        })?;
        self.regexes.push(compiled);
        Ok(self)
    }

    /// Set the score multiplier.
    #[must_use]
    pub fn with_weight(mut self, weight: f64) -> Self {
        self.weight = weight;
        self
    }

    /// Declare the entity kinds to extract for this intent.
    #[must_use]
    pub fn with_entities(mut self, entities: &[EntityKind]) -> Self {
        self.entities.extend_from_slice(entities);
        self
    }

    /// Declare expected entities by wire name, skipping unknown names.
    ///
    /// This is the boundary for patterns arriving from outside the process;
    /// names the extractor does not understand are dropped with a log line
    /// rather than rejected.
    #[must_use]
    pub fn with_entity_names(mut self, names: &[&str]) -> Self {
        for name in names {
            match EntityKind::parse(name) {
                Some(kind) => self.entities.push(kind),
                None => debug!(entity = %name, "unknown entity kind skipped"),
            }
        }
        self
    }

    /// The compiled regexes for this pattern.
    pub fn regexes(&self) -> &[Regex] {
        &self.regexes
    }
}

// ---------------------------------------------------------------------------
// PatternRegistry
// ---------------------------------------------------------------------------

/// Ordered, append-only collection of intent patterns.
///
/// Registration order is semantic: the scorer breaks ties in favour of the
/// first-registered pattern, so the catalog puts the conversational
/// catch-all first and zero-score input deterministically falls back to it.
#[derive(Debug, Clone, Default)]
pub struct PatternRegistry {
    patterns: Vec<IntentPattern>,
}

impl PatternRegistry {
    /// Create an empty registry.
    #[must_use]
    pub fn empty() -> Self {
        Self::default()
    }

    /// Create a registry seeded with the built-in catalog.
    #[must_use]
    pub fn with_builtin_catalog() -> Self {
        let mut registry = Self::empty();
        for pattern in builtin_catalog() {
            registry.add(pattern);
        }
        registry
    }

    /// Append a pattern.  Duplicate names are allowed.
    pub fn add(&mut self, pattern: IntentPattern) {
        debug!(intent = %pattern.name, weight = pattern.weight, "pattern registered");
        self.patterns.push(pattern);
    }

    /// A defensive copy of the registered patterns in registration order.
    ///
    /// Mutating the returned list does not affect the registry.
    #[must_use]
    pub fn patterns(&self) -> Vec<IntentPattern> {
        self.patterns.clone()
    }

    /// Borrow the registered patterns (for scoring).
    pub(crate) fn as_slice(&self) -> &[IntentPattern] {
        &self.patterns
    }

    /// Number of registered patterns.
    pub fn len(&self) -> usize {
        self.patterns.len()
    }

    /// Whether the registry is empty.
    pub fn is_empty(&self) -> bool {
        self.patterns.is_empty()
    }
}

/// The built-in intent catalog registered at application start.
///
/// `general-conversation` is first on purpose (see the tie-break rule).
fn builtin_catalog() -> Vec<IntentPattern> {
    let built = (|| -> Result<Vec<IntentPattern>> {
        Ok(vec![
            IntentPattern::new("general-conversation")
                .with_keywords(&["ciao", "salve", "aiuto", "grazie", "come", "hello", "help"])
                .with_weight(0.5),
            IntentPattern::new("analyze-entity")
                .with_keywords(&[
                    "analizza", "analisi", "valuta", "valutazione", "immobile", "terreno",
                    "asset", "proprietà",
                ])
                .with_regex(r"(?i)analizza")?
                .with_regex(r"(?i)valut\w+\s+(?:l')?(?:immobile|asset|terreno)")?
                .with_entities(&[EntityKind::Location, EntityKind::Area, EntityKind::Category]),
            IntentPattern::new("compute-plan")
                .with_keywords(&["business", "plan", "roi", "piano", "investimento", "rendimento"])
                .with_regex(r"(?i)business\s*plan")?
                .with_regex(r"(?i)\broi\b")?
                .with_entities(&[EntityKind::ProjectName, EntityKind::Area, EntityKind::Units]),
            IntentPattern::new("list-entities")
                .with_keywords(&["lista", "elenca", "elenco", "mostra", "progetti", "immobili"])
                .with_regex(r"(?i)\b(?:elenca|mostra|lista)\b")?
                .with_entities(&[EntityKind::Category, EntityKind::Location]),
            IntentPattern::new("send-communication")
                .with_keywords(&["invia", "email", "mail", "messaggio", "comunicazione", "manda"])
                .with_regex(r"(?i)\b(?:invia|manda)\w*\s+(?:una\s+)?(?:mail|email|e-mail|messaggio|report)")?
                .with_entities(&[EntityKind::Emails, EntityKind::ProjectName]),
            IntentPattern::new("multi-step-workflow")
                .with_keywords(&["workflow", "flusso", "automatizza", "sequenza", "procedura"])
                .with_regex(r"(?i)\b(?:workflow|automatizza|flusso)\b")?
                .with_entities(&[EntityKind::WorkflowType, EntityKind::ProjectName]),
        ])
    })();

    built.expect("built-in catalog regexes are valid")
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builtin_catalog_registers_in_order() {
        let registry = PatternRegistry::with_builtin_catalog();
        let names: Vec<_> = registry.patterns().into_iter().map(|p| p.name).collect();
        assert_eq!(
            names,
            vec![
                "general-conversation",
                "analyze-entity",
                "compute-plan",
                "list-entities",
                "send-communication",
                "multi-step-workflow",
            ]
        );
    }

    #[test]
    fn patterns_returns_defensive_copy() {
        let mut registry = PatternRegistry::empty();
        registry.add(IntentPattern::new("one"));

        let mut copy = registry.patterns();
        copy.clear();
        copy.push(IntentPattern::new("intruder"));

        assert_eq!(registry.len(), 1);
        assert_eq!(registry.patterns()[0].name, "one");
    }

    #[test]
    fn duplicate_names_are_allowed() {
        let mut registry = PatternRegistry::empty();
        registry.add(IntentPattern::new("dup").with_weight(1.0));
        registry.add(IntentPattern::new("dup").with_weight(2.0));
        assert_eq!(registry.len(), 2);
    }

    #[test]
    fn invalid_regex_is_rejected() {
        let result = IntentPattern::new("broken").with_regex("[invalid(");
        assert!(matches!(result, Err(IntentError::InvalidPattern { .. })));
    }

    #[test]
    fn unknown_entity_names_are_skipped() {
        let pattern =
            IntentPattern::new("p").with_entity_names(&["location", "telephone", "area"]);
        assert_eq!(pattern.entities, vec![EntityKind::Location, EntityKind::Area]);
    }

    #[test]
    fn keywords_are_lowercased() {
        let pattern = IntentPattern::new("p").with_keywords(&["Business", "PLAN"]);
        assert_eq!(pattern.keywords, vec!["business", "plan"]);
    }
}
