//! Name cleaning
//!
//! The name field takes the utterance itself, lightly cleaned: greeting and
//! filler prefixes are stripped, the character set is sanity-checked (Latin
//! or Devanagari), and words are title-cased.

use once_cell::sync::Lazy;
use regex::Regex;
use unicode_segmentation::UnicodeSegmentation;

/// Leading filler before the actual name, English, Hinglish, and Hindi
static LEADING_FILLER: Lazy<Regex> = Lazy::new(|| {
    Regex::new(concat!(
        r"(?i)^(?:hi|hello|hey|namaste|namaskar)?[,!. ]*",
        r"(?:my name is|my name's|i am called|i'm|i am|this is|myself|mera naam|naam|",
        "मेरा नाम",
        r")\s+",
    ))
    .expect("static regex")
});

/// Trailing filler after the name ("... hai", "... here")
static TRAILING_FILLER: Lazy<Regex> = Lazy::new(|| {
    Regex::new(concat!(r"(?i)\s+(?:hai|hoon|here|", "है", r")[.!]?$")).expect("static regex")
});

/// Clean and validate a name from an utterance
///
/// Returns `None` when what remains is too short or contains characters
/// that cannot appear in a name (digits, most punctuation).
pub fn clean_name(utterance: &str) -> Option<String> {
    let mut text = utterance.trim();

    if let Some(m) = LEADING_FILLER.find(text) {
        text = &text[m.end()..];
    }
    let stripped = TRAILING_FILLER.replace(text, "");
    let cleaned = stripped.trim().trim_matches(|c: char| ".,!?".contains(c));

    if cleaned.graphemes(true).count() < 2 {
        return None;
    }
    if !cleaned.chars().all(is_name_char) {
        return None;
    }

    Some(title_case(cleaned))
}

/// Characters allowed in a name: Latin letters, Devanagari, separators
fn is_name_char(c: char) -> bool {
    c.is_ascii_alphabetic()
        || ('\u{0900}'..='\u{097F}').contains(&c)
        || c == ' '
        || c == '\''
        || c == '-'
        || c == '.'
}

/// Capitalize the first letter of each word; Devanagari has no case and
/// passes through unchanged
fn title_case(name: &str) -> String {
    name.split_whitespace()
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars.flat_map(char::to_lowercase)).collect(),
                None => String::new(),
            }
        })
        .collect::<Vec<String>>()
        .join(" ")
}
