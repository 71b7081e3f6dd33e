//! Oracle backends
//!
//! [`HttpOracle`] talks to any OpenAI-compatible chat completion endpoint
//! with a bounded timeout and retry with doubling backoff. [`CannedOracle`]
//! supplies deterministic replies for tests, isolating the non-deterministic
//! model from the deterministic core.

use std::collections::VecDeque;
use std::time::Duration;

use async_trait::async_trait;
use parking_lot::Mutex;
use reqwest::Client;
use serde::{Deserialize, Serialize};

use crate::prompt::Message;
use crate::LlmError;

/// Oracle configuration
#[derive(Debug, Clone)]
pub struct OracleConfig {
    /// Model name/ID
    pub model: String,
    /// API endpoint base (".../v1")
    pub endpoint: String,
    /// API key, sent as a bearer token when present
    pub api_key: Option<String>,
    /// Maximum tokens to generate
    pub max_tokens: usize,
    /// Sampling temperature
    pub temperature: f32,
    /// Per-request timeout
    pub timeout: Duration,
    /// Maximum retry attempts for transient failures
    pub max_retries: u32,
    /// Initial backoff duration (doubles each retry)
    pub initial_backoff: Duration,
}

impl Default for OracleConfig {
    fn default() -> Self {
        Self {
            model: "gpt-3.5-turbo".to_string(),
            endpoint: "https://api.openai.com/v1".to_string(),
            api_key: None,
            max_tokens: 256,
            temperature: 0.1,
            timeout: Duration::from_secs(10),
            max_retries: 2,
            initial_backoff: Duration::from_millis(200),
        }
    }
}

/// Per-call constraints on the completion
#[derive(Debug, Clone, Default)]
pub struct Constraints {
    /// Override the configured max tokens
    pub max_tokens: Option<usize>,
    /// Override the configured temperature
    pub temperature: Option<f32>,
    /// Ask the model for a single JSON object
    pub json_object: bool,
}

impl Constraints {
    /// Constraints for structured field extraction
    pub fn json() -> Self {
        Self {
            json_object: true,
            temperature: Some(0.1),
            ..Self::default()
        }
    }
}

/// The narrow interface the agent depends on
///
/// One call per conversational turn at most; the caller tolerates and
/// recovers from every failure locally.
#[async_trait]
pub trait Oracle: Send + Sync {
    /// Complete a prompt, returning the raw model text
    async fn complete(&self, messages: &[Message], constraints: &Constraints)
        -> Result<String, LlmError>;

    /// Model name, for logging
    fn model_name(&self) -> &str {
        "unknown"
    }
}

/// OpenAI-compatible HTTP oracle
pub struct HttpOracle {
    client: Client,
    config: OracleConfig,
}

impl HttpOracle {
    /// Create a new HTTP oracle
    pub fn new(config: OracleConfig) -> Result<Self, LlmError> {
        let client = Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| LlmError::Configuration(format!("failed to create HTTP client: {}", e)))?;
        Ok(Self { client, config })
    }

    fn api_url(&self, path: &str) -> String {
        format!("{}{}", self.config.endpoint.trim_end_matches('/'), path)
    }

    async fn request_once(
        &self,
        messages: &[Message],
        constraints: &Constraints,
    ) -> Result<String, LlmError> {
        let request = ChatRequest {
            model: self.config.model.clone(),
            messages: messages.iter().map(WireMessage::from).collect(),
            max_tokens: constraints.max_tokens.unwrap_or(self.config.max_tokens),
            temperature: constraints.temperature.unwrap_or(self.config.temperature),
            response_format: constraints
                .json_object
                .then(|| ResponseFormat { format_type: "json_object".to_string() }),
        };

        let mut builder = self.client.post(self.api_url("/chat/completions")).json(&request);
        if let Some(ref key) = self.config.api_key {
            builder = builder.bearer_auth(key);
        }

        let response = builder.send().await?;
        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(LlmError::Api(format!("HTTP {}: {}", status, body)));
        }

        let parsed: ChatResponse = response
            .json()
            .await
            .map_err(|e| LlmError::InvalidResponse(e.to_string()))?;
        parsed
            .choices
            .into_iter()
            .next()
            .map(|c| c.message.content)
            .ok_or_else(|| LlmError::InvalidResponse("empty choices".to_string()))
    }

    /// Whether an error is worth retrying
    fn is_transient(error: &LlmError) -> bool {
        match error {
            LlmError::Network(_) | LlmError::Timeout => true,
            LlmError::Api(msg) => msg.contains("429") || msg.contains("HTTP 5"),
            _ => false,
        }
    }
}

#[async_trait]
impl Oracle for HttpOracle {
    async fn complete(
        &self,
        messages: &[Message],
        constraints: &Constraints,
    ) -> Result<String, LlmError> {
        let mut backoff = self.config.initial_backoff;
        let mut last_error = None;

        for attempt in 0..=self.config.max_retries {
            match self.request_once(messages, constraints).await {
                Ok(text) => return Ok(text),
                Err(e) if Self::is_transient(&e) && attempt < self.config.max_retries => {
                    tracing::warn!(attempt, error = %e, "Oracle request failed, retrying");
                    tokio::time::sleep(backoff).await;
                    backoff *= 2;
                    last_error = Some(e);
                }
                Err(e) => return Err(e),
            }
        }

        Err(last_error.unwrap_or_else(|| LlmError::Api("retries exhausted".to_string())))
    }

    fn model_name(&self) -> &str {
        &self.config.model
    }
}

/// Deterministic oracle for tests
///
/// Replies are served from a queue in order; an exhausted queue (or a
/// double built with [`CannedOracle::failing`]) returns an error, which the
/// agent must absorb as a zero-confidence extraction.
#[derive(Default)]
pub struct CannedOracle {
    replies: Mutex<VecDeque<String>>,
    prompts: Mutex<Vec<String>>,
    fail: bool,
}

impl CannedOracle {
    /// An oracle with no queued replies: every call errors
    pub fn new() -> Self {
        Self::default()
    }

    /// An oracle that serves the given replies in order
    pub fn with_replies<I, S>(replies: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            replies: Mutex::new(replies.into_iter().map(Into::into).collect()),
            prompts: Mutex::new(Vec::new()),
            fail: false,
        }
    }

    /// An oracle that always fails with a timeout
    pub fn failing() -> Self {
        Self {
            fail: true,
            ..Self::default()
        }
    }

    /// Queue another reply
    pub fn push_reply(&self, reply: impl Into<String>) {
        self.replies.lock().push_back(reply.into());
    }

    /// Every prompt this oracle has seen, rendered as plain text
    pub fn recorded_prompts(&self) -> Vec<String> {
        self.prompts.lock().clone()
    }

    /// Number of calls made so far
    pub fn call_count(&self) -> usize {
        self.prompts.lock().len()
    }
}

#[async_trait]
impl Oracle for CannedOracle {
    async fn complete(
        &self,
        messages: &[Message],
        _constraints: &Constraints,
    ) -> Result<String, LlmError> {
        let rendered = messages
            .iter()
            .map(|m| format!("{}: {}", m.role, m.content))
            .collect::<Vec<_>>()
            .join("\n");
        self.prompts.lock().push(rendered);

        if self.fail {
            return Err(LlmError::Timeout);
        }
        self.replies
            .lock()
            .pop_front()
            .ok_or_else(|| LlmError::Api("canned oracle exhausted".to_string()))
    }

    fn model_name(&self) -> &str {
        "canned"
    }
}

// Wire types for the OpenAI-compatible API

#[derive(Serialize)]
struct ChatRequest {
    model: String,
    messages: Vec<WireMessage>,
    max_tokens: usize,
    temperature: f32,
    #[serde(skip_serializing_if = "Option::is_none")]
    response_format: Option<ResponseFormat>,
}

#[derive(Serialize)]
struct ResponseFormat {
    #[serde(rename = "type")]
    format_type: String,
}

#[derive(Serialize)]
struct WireMessage {
    role: String,
    content: String,
}

impl From<&Message> for WireMessage {
    fn from(m: &Message) -> Self {
        Self {
            role: m.role.as_str().to_string(),
            content: m.content.clone(),
        }
    }
}

#[derive(Deserialize)]
struct ChatResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Deserialize)]
struct ChatChoice {
    message: ChatChoiceMessage,
}

#[derive(Deserialize)]
struct ChatChoiceMessage {
    content: String,
}
