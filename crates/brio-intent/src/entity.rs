//! Entity extraction — structured parameters pulled from raw message text.
//!
//! Each [`EntityKind`] has an independent heuristic operating on the raw
//! (un-normalized) message.  Extraction never fails: a value that is not
//! present is simply omitted from the result map, and downstream code treats
//! absence as "not provided" rather than as an error.

use std::collections::HashMap;

use aho_corasick::{AhoCorasick, MatchKind};
use regex::Regex;
use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Kinds and values
// ---------------------------------------------------------------------------

/// The closed set of entity kinds the extractor understands.
///
/// Patterns declare which kinds they expect; names arriving from outside the
/// process (e.g. runtime-added patterns) are parsed through
/// [`EntityKind::parse`] and unknown names are skipped at that boundary.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum EntityKind {
    /// A place name from the gazetteer (e.g. "Milano").
    Location,
    /// Surface area in square meters.
    Area,
    /// Number of units (apartments, rooms, lots).
    Units,
    /// Free-text project name following a trigger word.
    ProjectName,
    /// Canonical asset category label.
    Category,
    /// List of email addresses (possibly empty, never absent).
    Emails,
    /// Multi-step workflow label chosen by trigger-word co-occurrence.
    WorkflowType,
}

impl EntityKind {
    /// The wire name of this kind (matches the serde representation).
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Location => "location",
            Self::Area => "area",
            Self::Units => "units",
            Self::ProjectName => "project-name",
            Self::Category => "category",
            Self::Emails => "emails",
            Self::WorkflowType => "workflow-type",
        }
    }

    /// Parse a kind from its wire name.  Returns `None` for unknown names.
    pub fn parse(name: &str) -> Option<Self> {
        match name {
            "location" => Some(Self::Location),
            "area" => Some(Self::Area),
            "units" => Some(Self::Units),
            "project-name" => Some(Self::ProjectName),
            "category" => Some(Self::Category),
            "emails" => Some(Self::Emails),
            "workflow-type" => Some(Self::WorkflowType),
            _ => None,
        }
    }
}

/// A typed extracted value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EntityValue {
    /// A textual value (location, project name, category, workflow label).
    Text(String),
    /// A numeric value (area, unit count).
    Integer(i64),
    /// A list of email addresses.
    Emails(Vec<String>),
}

impl EntityValue {
    /// The text payload, if this is a [`EntityValue::Text`].
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Text(s) => Some(s),
            _ => None,
        }
    }

    /// The integer payload, if this is a [`EntityValue::Integer`].
    pub fn as_integer(&self) -> Option<i64> {
        match self {
            Self::Integer(n) => Some(*n),
            _ => None,
        }
    }
}

/// Entity map produced by extraction: kind → value, absent kinds omitted.
pub type EntityMap = HashMap<EntityKind, EntityValue>;

// ---------------------------------------------------------------------------
// Vocabularies
// ---------------------------------------------------------------------------

/// Known place names, matched case-insensitively anywhere in the message.
const GAZETTEER: &[&str] = &[
    "milano", "roma", "torino", "napoli", "bologna", "firenze", "genova",
    "venezia", "verona", "padova", "bergamo", "brescia", "bari", "palermo",
    "catania", "trieste",
];

/// Category vocabulary: surface term → canonical label.
const CATEGORY_VOCAB: &[(&str, &str)] = &[
    ("residenziale", "residenziale"),
    ("abitativo", "residenziale"),
    ("appartamenti", "residenziale"),
    ("commerciale", "commerciale"),
    ("negozio", "retail"),
    ("retail", "retail"),
    ("direzionale", "direzionale"),
    ("uffici", "direzionale"),
    ("ufficio", "direzionale"),
    ("industriale", "industriale"),
    ("logistica", "industriale"),
    ("capannone", "industriale"),
    ("ricettivo", "ricettivo"),
    ("hotel", "ricettivo"),
    ("turistico", "ricettivo"),
];

// ---------------------------------------------------------------------------
// Extractor
// ---------------------------------------------------------------------------

/// Per-kind entity extractor with all automata and regexes compiled once.
///
/// Construct a single instance at startup and share it; extraction itself is
/// pure and synchronous.
pub struct EntityExtractor {
    gazetteer: AhoCorasick,
    categories: AhoCorasick,
    area: Regex,
    units: Regex,
    project_name: Regex,
    email: Regex,
}

impl EntityExtractor {
    /// Compile the extraction vocabularies and regexes.
    #[must_use]
    pub fn new() -> Self {
        let gazetteer = AhoCorasick::builder()
            .ascii_case_insensitive(true)
            .match_kind(MatchKind::LeftmostFirst)
            .build(GAZETTEER)
            .expect("static gazetteer automaton");

        let categories = AhoCorasick::builder()
            .ascii_case_insensitive(true)
            .match_kind(MatchKind::LeftmostLongest)
            .build(CATEGORY_VOCAB.iter().map(|(term, _)| *term))
            .expect("static category automaton");

        Self {
            gazetteer,
            categories,
            area: Regex::new(r"(?i)(\d+)\s*(?:mq\b|m2\b|m²|metri\s+quadr\w*)")
                .expect("static area regex"),
            units: Regex::new(r"(?i)(\d+)\s*(?:unità|unita\b|appartament\w*|alloggi\w*|locali\b)")
                .expect("static units regex"),
            project_name: Regex::new(r"(?i)(?:progetto|chiamat[oa]|denominat[oa])\s+(.+)")
                .expect("static project name regex"),
            email: Regex::new(r"[A-Za-z0-9._%+-]+@[A-Za-z0-9.-]+\.[A-Za-z]{2,}")
                .expect("static email regex"),
        }
    }

    /// Extract the requested kinds from the raw message.
    ///
    /// Kinds whose heuristic finds nothing are omitted from the map.  The
    /// only exception is [`EntityKind::Emails`], which always yields a
    /// (possibly empty) list.
    pub fn extract(&self, kinds: &[EntityKind], raw: &str) -> EntityMap {
        let mut map = EntityMap::new();
        for &kind in kinds {
            if let Some(value) = self.extract_kind(kind, raw) {
                map.insert(kind, value);
            }
        }
        map
    }

    fn extract_kind(&self, kind: EntityKind, raw: &str) -> Option<EntityValue> {
        match kind {
            EntityKind::Location => self.extract_location(raw),
            EntityKind::Area => capture_integer(&self.area, raw),
            EntityKind::Units => capture_integer(&self.units, raw),
            EntityKind::ProjectName => self.extract_project_name(raw),
            EntityKind::Category => self.extract_category(raw),
            EntityKind::Emails => Some(EntityValue::Emails(self.extract_emails(raw))),
            EntityKind::WorkflowType => extract_workflow_type(raw),
        }
    }

    /// First gazetteer hit in the message, title-cased.
    fn extract_location(&self, raw: &str) -> Option<EntityValue> {
        let mat = self.gazetteer.find(raw)?;
        Some(EntityValue::Text(title_case(
            GAZETTEER[mat.pattern().as_usize()],
        )))
    }

    /// Canonical label for the first category term in the message.
    fn extract_category(&self, raw: &str) -> Option<EntityValue> {
        let mat = self.categories.find(raw)?;
        let (_, label) = CATEGORY_VOCAB[mat.pattern().as_usize()];
        Some(EntityValue::Text(label.to_owned()))
    }

    /// Free text following a project trigger word, trimmed of trailing
    /// punctuation.
    fn extract_project_name(&self, raw: &str) -> Option<EntityValue> {
        let caps = self.project_name.captures(raw)?;
        let name = caps[1].trim().trim_end_matches(['.', '!', '?', ',']).trim();
        if name.is_empty() {
            return None;
        }
        Some(EntityValue::Text(name.to_owned()))
    }

    /// All email addresses in the message, in order of appearance.
    fn extract_emails(&self, raw: &str) -> Vec<String> {
        self.email
            .find_iter(raw)
            .map(|m| m.as_str().to_owned())
            .collect()
    }
}

impl Default for EntityExtractor {
    fn default() -> Self {
        Self::new()
    }
}

/// Capture group 1 of `re` parsed as an integer.
fn capture_integer(re: &Regex, raw: &str) -> Option<EntityValue> {
    let caps = re.captures(raw)?;
    caps[1].parse().ok().map(EntityValue::Integer)
}

/// Workflow label chosen by trigger-word co-occurrence.
///
/// Two specific trigger pairs select dedicated labels; a single generic
/// trigger selects the catch-all; anything else is absent.
fn extract_workflow_type(raw: &str) -> Option<EntityValue> {
    let lower = raw.to_lowercase();
    let has = |w: &str| lower.contains(w);

    let label = if (has("valuta") || has("analisi") || has("analizza")) && has("report") {
        "analisi-report"
    } else if has("report") && (has("invia") || has("mail")) {
        "report-invio"
    } else if has("workflow") || has("automatizza") || has("flusso") {
        "personalizzato"
    } else {
        return None;
    };

    Some(EntityValue::Text(label.to_owned()))
}

/// Upper-case the first letter of an ASCII-lowercase vocabulary entry.
fn title_case(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
