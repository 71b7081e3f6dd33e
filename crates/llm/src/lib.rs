//! Language-model oracle for the scheme agent
//!
//! The conversational core treats the model as an untrusted, fallible
//! function: text in, text out. This crate provides:
//! - the narrow [`Oracle`] trait the agent depends on
//! - an OpenAI-compatible HTTP backend with bounded timeout and retry
//! - a deterministic canned backend for tests
//! - prompt construction and tolerant reply parsing for field extraction

pub mod backend;
pub mod prompt;

pub use backend::{CannedOracle, Constraints, HttpOracle, Oracle, OracleConfig};
pub use prompt::{build_extraction_messages, parse_extraction_reply, Message, Role};

use thiserror::Error;

/// Oracle errors
///
/// Callers recover from every variant locally: an oracle failure is a
/// zero-confidence extraction, never a session failure.
#[derive(Error, Debug)]
pub enum LlmError {
    #[error("API error: {0}")]
    Api(String),

    #[error("Network error: {0}")]
    Network(String),

    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    #[error("Timeout")]
    Timeout,

    #[error("Configuration error: {0}")]
    Configuration(String),
}

impl From<reqwest::Error> for LlmError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            LlmError::Timeout
        } else {
            LlmError::Network(err.to_string())
        }
    }
}
