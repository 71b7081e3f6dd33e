//! Gender synonym normalization
//!
//! Maps colloquial English, Hinglish, and Devanagari terms to the three
//! canonical values. Unrecognized input yields `None` rather than a guess.

use once_cell::sync::Lazy;
use scheme_agent_core::Gender;

/// Synonym table: lowercase term -> canonical gender.
///
/// Longest-match-first ordering matters for the substring pass ("female"
/// must win over the "male" it contains).
static SYNONYMS: Lazy<Vec<(&'static str, Gender)>> = Lazy::new(|| {
    let mut table = vec![
        // Male
        ("male", Gender::Male),
        ("m", Gender::Male),
        ("man", Gender::Male),
        ("boy", Gender::Male),
        ("guy", Gender::Male),
        ("ladka", Gender::Male),
        ("purush", Gender::Male),
        ("aadmi", Gender::Male),
        ("लड़का", Gender::Male),
        ("लडका", Gender::Male),
        ("पुरुष", Gender::Male),
        ("पुरूष", Gender::Male),
        ("आदमी", Gender::Male),
        // Female
        ("female", Gender::Female),
        ("f", Gender::Female),
        ("woman", Gender::Female),
        ("girl", Gender::Female),
        ("lady", Gender::Female),
        ("ladki", Gender::Female),
        ("mahila", Gender::Female),
        ("aurat", Gender::Female),
        ("stree", Gender::Female),
        ("महिला", Gender::Female),
        ("लड़की", Gender::Female),
        ("लडकी", Gender::Female),
        ("औरत", Gender::Female),
        ("स्त्री", Gender::Female),
        // Other
        ("other", Gender::Other),
        ("o", Gender::Other),
        ("non-binary", Gender::Other),
        ("nonbinary", Gender::Other),
        ("trans", Gender::Other),
        ("transgender", Gender::Other),
        ("third gender", Gender::Other),
        ("prefer not to say", Gender::Other),
        ("anya", Gender::Other),
        ("अन्य", Gender::Other),
        ("थर्ड जेंडर", Gender::Other),
    ];
    // Longer synonyms first so substring matching prefers them
    table.sort_by(|a, b| b.0.chars().count().cmp(&a.0.chars().count()));
    table
});

/// Normalize a gender term to one of {Male, Female, Other}
///
/// Matching order: whole input, then individual word tokens, then a
/// substring pass restricted to synonyms of three or more characters (so a
/// stray "f" inside a word never matches).
pub fn normalize_gender(input: &str) -> Option<Gender> {
    let trimmed = input.trim().to_lowercase();
    if trimmed.is_empty() {
        return None;
    }

    // Whole-input match
    for (term, gender) in SYNONYMS.iter() {
        if trimmed == *term {
            return Some(*gender);
        }
    }

    // Token match ("i am a girl" -> "girl"). Devanagari combining marks
    // are not alphanumeric but must stay inside their word.
    for token in trimmed.split(|c: char| !is_word_char(c)) {
        if token.is_empty() {
            continue;
        }
        for (term, gender) in SYNONYMS.iter() {
            if token == *term {
                return Some(*gender);
            }
        }
    }

    // Substring fallback for multi-word synonyms and attached script
    for (term, gender) in SYNONYMS.iter() {
        if term.chars().count() >= 3 && trimmed.contains(term) {
            return Some(*gender);
        }
    }

    None
}

fn is_word_char(c: char) -> bool {
    c.is_alphanumeric() || c == '-' || ('\u{0900}'..='\u{097F}').contains(&c)
}
