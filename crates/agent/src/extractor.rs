//! Field extraction
//!
//! Pattern recognition runs first and handles the common case without any
//! model call. Only when the local pass is inconclusive does the extractor
//! spend its single oracle call for the turn, with a constrained prompt
//! requesting exactly one structured field. A failed or unparseable oracle
//! reply is a zero-confidence extraction, never an error.

use std::sync::Arc;

use scheme_agent_core::{ConversationHistory, Field, Language};
use scheme_agent_llm::{
    build_extraction_messages, parse_extraction_reply, Constraints, Message, Oracle, Role,
};
use scheme_agent_text_processing::{clean_name, match_state, normalize_gender, parse_age};
use scheme_agent_text_processing::age::AgeParseError;
use scheme_agent_text_processing::state::StateMatch;

use crate::validator::{validate, Validation};

/// Confidence assigned to candidates recognized by local patterns
const PATTERN_CONFIDENCE: f32 = 0.9;

/// An extraction candidate with a confidence signal
#[derive(Debug, Clone)]
pub struct Extraction {
    /// Candidate value, pre-validation
    pub value: Option<String>,
    /// Confidence in [0, 1]; zero means "no candidate"
    pub confidence: f32,
}

impl Extraction {
    fn none() -> Self {
        Self {
            value: None,
            confidence: 0.0,
        }
    }

    fn candidate(value: impl Into<String>, confidence: f32) -> Self {
        Self {
            value: Some(value.into()),
            confidence,
        }
    }
}

/// Extracts one field per turn, patterns first, oracle as fallback
pub struct FieldExtractor {
    oracle: Arc<dyn Oracle>,
}

impl FieldExtractor {
    pub fn new(oracle: Arc<dyn Oracle>) -> Self {
        Self { oracle }
    }

    /// Extract a candidate for `field` from the utterance
    pub async fn extract(
        &self,
        field: Field,
        utterance: &str,
        history: &ConversationHistory,
        language: Language,
    ) -> Extraction {
        if let Some(candidate) = local_candidate(field, utterance) {
            return candidate;
        }

        // The only potentially slow step in a turn
        let mut messages = build_extraction_messages(field, history, language);
        let has_utterance = messages
            .iter()
            .any(|m| m.role == Role::User && m.content == utterance);
        if !has_utterance {
            messages.push(Message::user(utterance));
        }
        match self.oracle.complete(&messages, &Constraints::json()).await {
            Ok(reply) => match parse_extraction_reply(&reply) {
                Some((value, confidence)) => {
                    tracing::debug!(%field, %value, confidence, "Oracle extraction");
                    Extraction::candidate(value, confidence)
                }
                None => {
                    tracing::debug!(%field, "Oracle reply not parseable, no candidate");
                    Extraction::none()
                }
            },
            Err(e) => {
                tracing::warn!(%field, error = %e, "Oracle unavailable, no candidate");
                Extraction::none()
            }
        }
    }

    /// Spot values for fields later in the collection order
    ///
    /// Purely local, and only candidates that would validate cleanly are
    /// kept. The session holds these until their field becomes the current
    /// target; confirmation still happens in order.
    pub fn scan_later_fields(&self, current: Field, utterance: &str) -> Vec<(Field, String)> {
        let mut found = Vec::new();
        for &field in current.later_fields() {
            if let Some(extraction) = local_candidate(field, utterance) {
                if let Some(value) = extraction.value {
                    match validate(field, &value) {
                        Validation::Accepted(_) | Validation::Corrected { .. } => {
                            found.push((field, value));
                        }
                        _ => {}
                    }
                }
            }
        }
        found
    }
}

/// Local pattern pass for one field
///
/// Returns the candidate in its surface form: validation decides whether it
/// was canonical (`Accepted`) or needs a confirmed correction.
fn local_candidate(field: Field, utterance: &str) -> Option<Extraction> {
    match field {
        Field::Name => clean_name(utterance).map(|name| Extraction::candidate(name, PATTERN_CONFIDENCE)),
        Field::Gender => gender_token(utterance)
            .map(|token| Extraction::candidate(token, PATTERN_CONFIDENCE)),
        Field::Age => match parse_age(utterance) {
            Ok(_) => Some(Extraction::candidate(utterance.trim(), PATTERN_CONFIDENCE)),
            // A definite bad value is still a candidate: the validator
            // rejects it with the right reason instead of asking the oracle
            Err(AgeParseError::Negative) | Err(AgeParseError::Implausible) => {
                Some(Extraction::candidate(utterance.trim(), PATTERN_CONFIDENCE))
            }
            Err(AgeParseError::NotFound) => None,
        },
        Field::State => {
            let cleaned = strip_location_filler(utterance);
            match match_state(cleaned) {
                StateMatch::Unknown => None,
                _ => Some(Extraction::candidate(cleaned, PATTERN_CONFIDENCE)),
            }
        }
    }
}

/// The token (or phrase) that names a gender, if any
fn gender_token(utterance: &str) -> Option<String> {
    let trimmed = utterance.trim();
    let is_word_char =
        |c: char| c.is_alphanumeric() || c == '-' || ('\u{0900}'..='\u{097F}').contains(&c);
    for token in trimmed.split(|c: char| !is_word_char(c)) {
        if !token.is_empty() && normalize_gender(token).is_some() {
            return Some(token.to_string());
        }
    }
    // Multi-word synonyms ("third gender") only match against the whole text
    normalize_gender(trimmed).map(|_| trimmed.to_string())
}

/// Strip "I live in" style filler so fuzzy state matching sees the name
fn strip_location_filler(utterance: &str) -> &str {
    let trimmed = utterance.trim();
    let lower = trimmed.to_lowercase();
    for prefix in [
        "i live in ",
        "i stay in ",
        "i am from ",
        "i'm from ",
        "i am in ",
        "from ",
        "in ",
    ] {
        if lower.starts_with(prefix) {
            return trimmed[prefix.len()..].trim();
        }
    }
    trimmed
}
