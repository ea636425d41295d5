//! Word glossary for Arabic dua text.
//!
//! Lookups normalize the word (no diacritics, unified alef/ya/ha forms) and
//! retry with common attached prefixes removed: conjunctions, the definite
//! article and single-letter prepositions.

use serde::Deserialize;
use std::collections::HashMap;
use std::sync::OnceLock;
use tracing::warn;

const LEXICON_JSON: &str = include_str!("../../data/lexicon.json");

/// Attached prefixes tried in order, with the gloss prepended to the meaning.
const PREFIXES: [(&str, &str); 7] = [
    ("بال", ""),
    ("وال", ""),
    ("لل", ""),
    ("ال", ""),
    ("ب", "by/with "),
    ("ل", "for/to "),
    ("ك", "like "),
];

const PUNCTUATION: [char; 7] = ['۞', 'ۚ', 'ۖ', 'ۗ', '،', ',', '.'];

#[derive(Debug, Deserialize)]
struct LexiconEntry {
    word: String,
    root: String,
    meaning: String,
}

/// Result of looking a word up. `root` and `meaning` are `None` for words
/// missing from the glossary.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Gloss {
    pub word: String,
    pub root: Option<String>,
    pub meaning: Option<String>,
}

fn lexicon() -> &'static HashMap<String, (String, String)> {
    static LEXICON: OnceLock<HashMap<String, (String, String)>> = OnceLock::new();
    LEXICON.get_or_init(|| {
        let entries: Vec<LexiconEntry> = serde_json::from_str(LEXICON_JSON).unwrap_or_else(|e| {
            warn!("Bundled lexicon is invalid: {}", e);
            Vec::new()
        });
        // Later entries override earlier duplicates
        entries
            .into_iter()
            .map(|e| (e.word, (e.root, e.meaning)))
            .collect()
    })
}

fn is_diacritic(c: char) -> bool {
    matches!(c,
        '\u{0610}'..='\u{061A}'
        | '\u{064B}'..='\u{065F}'
        | '\u{0670}'
        | '\u{06D6}'..='\u{06ED}'
        | '\u{FE70}'..='\u{FE7F}')
}

/// Removes vowel marks and Quranic annotation signs and folds letter variants
/// (hamza carriers, alef wasla, alef maqsura, ta marbuta) to their base forms.
pub fn strip_diacritics(text: &str) -> String {
    text.chars()
        .filter(|&c| !is_diacritic(c))
        .map(|c| match c {
            'ٱ' | 'أ' | 'إ' | 'آ' => 'ا',
            'ى' | 'ئ' => 'ي',
            'ة' => 'ه',
            'ؤ' => 'و',
            other => other,
        })
        .collect::<String>()
        .trim()
        .to_string()
}

/// Looks up a word as it appears in dua text. Returns `None` only when
/// nothing is left after removing punctuation.
pub fn lookup(raw_word: &str) -> Option<Gloss> {
    let cleaned: String = raw_word
        .chars()
        .filter(|c| !PUNCTUATION.contains(c))
        .collect::<String>()
        .trim()
        .to_string();
    if cleaned.is_empty() {
        return None;
    }

    let stripped = strip_diacritics(&cleaned);
    let found = |key: &str, prefix_meaning: &str| {
        lexicon().get(key).map(|(root, meaning)| Gloss {
            word: cleaned.clone(),
            root: Some(root.clone()),
            meaning: Some(format!("{}{}", prefix_meaning, meaning)),
        })
    };

    if let Some(gloss) = found(&stripped, "") {
        return Some(gloss);
    }

    let letters = stripped.chars().count();
    for (conjunction, meaning) in [("و", "and "), ("ف", "so ")] {
        if letters > 2 {
            if let Some(rest) = stripped.strip_prefix(conjunction) {
                if let Some(gloss) = found(rest, meaning) {
                    return Some(gloss);
                }
            }
        }
    }

    for (prefix, meaning) in PREFIXES {
        if letters > prefix.chars().count() + 1 {
            if let Some(rest) = stripped.strip_prefix(prefix) {
                if let Some(gloss) = found(rest, meaning) {
                    return Some(gloss);
                }
            }
        }
    }

    Some(Gloss {
        word: cleaned,
        root: None,
        meaning: None,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lexicon_loads() {
        assert!(lexicon().len() > 400);
    }

    #[test]
    fn test_strip_diacritics() {
        assert_eq!(strip_diacritics("ٱللَّهُ"), "الله");
        assert_eq!(strip_diacritics("رَحْمَةً"), "رحمه");
        assert_eq!(strip_diacritics(" إِلَىٰ "), "الي");
        assert_eq!(strip_diacritics("مُؤْمِن"), "مومن");
    }

    #[test]
    fn test_exact_lookup() {
        let gloss = lookup("ٱللَّهُمَّ").unwrap();
        assert_eq!(gloss.word, "ٱللَّهُمَّ");
        assert_eq!(gloss.root.as_deref(), Some("أ ل ه"));
        assert_eq!(gloss.meaning.as_deref(), Some("O Allah (invocation)"));
    }

    #[test]
    fn test_punctuation_is_removed() {
        let gloss = lookup("ٱللَّهُمَّ،").unwrap();
        assert_eq!(gloss.word, "ٱللَّهُمَّ");
        assert!(gloss.meaning.is_some());
    }

    #[test]
    fn test_empty_word() {
        assert_eq!(lookup(""), None);
        assert_eq!(lookup(" ۞ "), None);
    }

    #[test]
    fn test_waw_prefix() {
        let gloss = lookup("وَٱلرَّحِيمِ").unwrap();
        assert_eq!(gloss.meaning.as_deref(), Some("and The Most Merciful"));
    }

    #[test]
    fn test_fa_prefix() {
        let gloss = lookup("فَرَبَّنَا").unwrap();
        assert_eq!(gloss.meaning.as_deref(), Some("so our Lord"));
    }

    #[test]
    fn test_preposition_prefixes() {
        let gloss = lookup("بِعَذَابٍ").unwrap();
        assert_eq!(gloss.meaning.as_deref(), Some("by/with punishment / torment"));

        let gloss = lookup("كَعَذَابِ").unwrap();
        assert_eq!(gloss.meaning.as_deref(), Some("like punishment / torment"));
        assert_eq!(gloss.word, "كَعَذَابِ");
    }

    #[test]
    fn test_unknown_word() {
        let gloss = lookup("زززز").unwrap();
        assert_eq!(gloss.word, "زززز");
        assert_eq!(gloss.root, None);
        assert_eq!(gloss.meaning, None);
    }
}
