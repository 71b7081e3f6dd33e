//! Prompt construction and reply parsing for field extraction
//!
//! The extraction prompt asks for exactly one structured field as a JSON
//! object. The parser is deliberately tolerant: models wrap JSON in prose
//! and code fences, and a reply that still cannot be parsed is simply "no
//! candidate" for the caller.

use serde::{Deserialize, Serialize};

use scheme_agent_config::{constants::dialogue::HISTORY_WINDOW, prompts};
use scheme_agent_core::{ConversationHistory, Field, Language, TurnRole};

/// Role of a prompt message
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    System,
    User,
    Assistant,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::System => "system",
            Role::User => "user",
            Role::Assistant => "assistant",
        }
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A single prompt message
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Message {
    pub role: Role,
    pub content: String,
}

impl Message {
    pub fn new(role: Role, content: impl Into<String>) -> Self {
        Self {
            role,
            content: content.into(),
        }
    }

    pub fn system(content: impl Into<String>) -> Self {
        Self::new(Role::System, content)
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self::new(Role::User, content)
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self::new(Role::Assistant, content)
    }
}

/// Build the messages for extracting one field from the conversation
///
/// System prompt with the field contract, then the recent history window,
/// ending with the utterance under extraction.
pub fn build_extraction_messages(
    field: Field,
    history: &ConversationHistory,
    language: Language,
) -> Vec<Message> {
    let mut messages = vec![Message::system(prompts::extraction_system(field, language))];

    for turn in history.recent(HISTORY_WINDOW) {
        let role = match turn.role {
            TurnRole::User => Role::User,
            TurnRole::Assistant => Role::Assistant,
        };
        messages.push(Message::new(role, turn.content.clone()));
    }

    messages
}

#[derive(Deserialize)]
struct ExtractionReply {
    #[serde(default)]
    value: serde_json::Value,
    #[serde(default)]
    confidence: f32,
}

/// Parse the oracle's extraction reply into a candidate and confidence
///
/// Returns `None` when no JSON object can be found, the value is empty, or
/// the model itself reported no candidate. Confidence is clamped to [0, 1].
pub fn parse_extraction_reply(text: &str) -> Option<(String, f32)> {
    let start = text.find('{')?;
    let end = text.rfind('}')?;
    if end < start {
        return None;
    }

    let reply: ExtractionReply = serde_json::from_str(&text[start..=end]).ok()?;

    let value = match reply.value {
        serde_json::Value::String(s) => s,
        serde_json::Value::Number(n) => n.to_string(),
        _ => return None,
    };
    let value = value.trim().to_string();
    if value.is_empty() || value.eq_ignore_ascii_case("null") || value.eq_ignore_ascii_case("unknown")
    {
        return None;
    }

    Some((value, reply.confidence.clamp(0.0, 1.0)))
}
