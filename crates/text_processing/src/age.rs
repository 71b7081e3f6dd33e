//! Age parsing
//!
//! Accepts digits ("25", "25 years", "main 25 saal ka hoon") or spelled-out
//! English numbers ("twenty five"). Rejects negative and implausible values
//! instead of clamping them.

use once_cell::sync::Lazy;
use regex::Regex;
use scheme_agent_config::constants::age::MAX_PLAUSIBLE_AGE;

/// Why an age could not be parsed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AgeParseError {
    /// No number found in the input
    NotFound,
    /// Explicitly negative value
    Negative,
    /// Larger than the plausible maximum
    Implausible,
}

impl std::fmt::Display for AgeParseError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AgeParseError::NotFound => write!(f, "no age found"),
            AgeParseError::Negative => write!(f, "age cannot be negative"),
            AgeParseError::Implausible => write!(f, "age is implausibly large"),
        }
    }
}

static NUMBER: Lazy<Regex> = Lazy::new(|| Regex::new(r"(-?\d+)").expect("static regex"));

const UNITS: [(&str, u32); 20] = [
    ("zero", 0),
    ("one", 1),
    ("two", 2),
    ("three", 3),
    ("four", 4),
    ("five", 5),
    ("six", 6),
    ("seven", 7),
    ("eight", 8),
    ("nine", 9),
    ("ten", 10),
    ("eleven", 11),
    ("twelve", 12),
    ("thirteen", 13),
    ("fourteen", 14),
    ("fifteen", 15),
    ("sixteen", 16),
    ("seventeen", 17),
    ("eighteen", 18),
    ("nineteen", 19),
];

const TENS: [(&str, u32); 8] = [
    ("twenty", 20),
    ("thirty", 30),
    ("forty", 40),
    ("fifty", 50),
    ("sixty", 60),
    ("seventy", 70),
    ("eighty", 80),
    ("ninety", 90),
];

/// Parse an age from free text
pub fn parse_age(input: &str) -> Result<u8, AgeParseError> {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        return Err(AgeParseError::NotFound);
    }

    // Digits first: the common case, and the only one that can be negative
    if let Some(caps) = NUMBER.captures(trimmed) {
        let raw = &caps[1];
        if raw.starts_with('-') {
            return Err(AgeParseError::Negative);
        }
        let value: u32 = raw.parse().map_err(|_| AgeParseError::Implausible)?;
        return check_plausible(value);
    }

    // Spelled-out English numbers ("twenty five", "twenty-five", "sixty")
    if let Some(value) = parse_number_words(trimmed) {
        return check_plausible(value);
    }

    Err(AgeParseError::NotFound)
}

fn check_plausible(value: u32) -> Result<u8, AgeParseError> {
    if value > MAX_PLAUSIBLE_AGE as u32 {
        return Err(AgeParseError::Implausible);
    }
    Ok(value as u8)
}

/// Accumulate number words left to right. Stray tokens are skipped, so
/// "I am twenty five years old" parses as 25.
fn parse_number_words(text: &str) -> Option<u32> {
    let lower = text.to_lowercase();
    let mut total: Option<u32> = None;

    for token in lower.split(|c: char| c.is_whitespace() || c == '-') {
        if token.is_empty() {
            continue;
        }
        if token == "hundred" {
            if let Some(t) = total {
                total = Some(t.max(1) * 100);
            }
            continue;
        }
        if let Some((_, value)) = TENS.iter().find(|(word, _)| *word == token) {
            total = Some(total.unwrap_or(0) + value);
            continue;
        }
        if let Some((_, value)) = UNITS.iter().find(|(word, _)| *word == token) {
            total = Some(total.unwrap_or(0) + value);
        }
    }

    total
}
