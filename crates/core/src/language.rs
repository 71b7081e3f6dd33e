//! Session language
//!
//! The agent speaks English or Hindi. Utterance understanding is language
//! agnostic (normalization tables carry Hindi and Hinglish synonyms); this
//! type only selects which prompt text and display fields are used.

use serde::{Deserialize, Serialize};

/// Supported session languages
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Language {
    #[default]
    English,
    Hindi,
}

impl Language {
    /// ISO 639-1 code
    pub fn code(&self) -> &'static str {
        match self {
            Language::English => "en",
            Language::Hindi => "hi",
        }
    }

    /// Parse from an ISO 639-1 code; unknown codes fall back to English
    pub fn from_code(code: &str) -> Self {
        match code.trim().to_lowercase().as_str() {
            "hi" => Language::Hindi,
            _ => Language::English,
        }
    }

    /// Detect from an utterance: Devanagari script means Hindi
    pub fn detect(text: &str) -> Self {
        if text.chars().any(|c| ('\u{0900}'..='\u{097F}').contains(&c)) {
            Language::Hindi
        } else {
            Language::English
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_codes() {
        assert_eq!(Language::English.code(), "en");
        assert_eq!(Language::from_code("hi"), Language::Hindi);
        assert_eq!(Language::from_code("fr"), Language::English);
    }

    #[test]
    fn test_detect() {
        assert_eq!(Language::detect("मेरा नाम राहुल है"), Language::Hindi);
        assert_eq!(Language::detect("my name is Rahul"), Language::English);
    }
}
