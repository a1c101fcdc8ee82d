//! Text normalization for intent scoring.
//!
//! Keyword scoring operates on normalized tokens; entity extraction and
//! pattern regexes operate on the raw message, where case and punctuation
//! still matter (emails, unit suffixes).  [`Normalized`] therefore carries
//! both representations side by side.

/// Stop words dropped from the token stream.  Italian-first with the English
/// fillers the host product's users mix in.
const STOP_WORDS: &[&str] = &[
    "il", "lo", "la", "i", "gli", "le", "un", "uno", "una", "di", "a", "da",
    "in", "su", "per", "con", "tra", "fra", "e", "o", "che", "questo",
    "questa", "questi", "mi", "ti", "si", "ci", "the", "an", "of", "to",
    "for", "and", "this", "me", "please",
];

/// A message normalized for scoring, with the original text retained.
#[derive(Debug, Clone)]
pub struct Normalized {
    /// The raw, untouched message.
    pub raw: String,

    /// Lower-cased, punctuation-stripped, stop-word-filtered tokens in
    /// original order.
    pub tokens: Vec<String>,
}

/// Normalize a message for scoring.
///
/// Lower-cases the text, replaces every character that is not a letter
/// (accented letters included) or digit with whitespace, splits, and drops
/// stop words.
pub fn normalize(text: &str) -> Normalized {
    let lowered = text.to_lowercase();

    let cleaned: String = lowered
        .chars()
        .map(|c| if c.is_alphanumeric() { c } else { ' ' })
        .collect();

    let tokens = cleaned
        .split_whitespace()
        .filter(|t| !STOP_WORDS.contains(t))
        .map(str::to_owned)
        .collect();

    Normalized {
        raw: text.to_owned(),
        tokens,
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lowercases_and_strips_punctuation() {
        let n = normalize("Analizza l'immobile, SUBITO!");
        assert_eq!(n.tokens, vec!["analizza", "l", "immobile", "subito"]);
    }

    #[test]
    fn drops_stop_words() {
        let n = normalize("fai un business plan per questo progetto");
        assert_eq!(n.tokens, vec!["fai", "business", "plan", "progetto"]);
    }

    #[test]
    fn keeps_accented_letters_and_digits() {
        let n = normalize("120 mq di proprietà");
        assert_eq!(n.tokens, vec!["120", "mq", "proprietà"]);
    }

    #[test]
    fn raw_text_is_preserved_verbatim() {
        let n = normalize("Invia a Mario.Rossi@example.com");
        assert_eq!(n.raw, "Invia a Mario.Rossi@example.com");
    }

    #[test]
    fn empty_input_yields_no_tokens() {
        assert!(normalize("").tokens.is_empty());
        assert!(normalize("   ,,, !!!").tokens.is_empty());
    }
}
