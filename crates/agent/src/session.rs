//! Session orchestration
//!
//! [`SchemeSession`] is the conversation state machine: it routes each
//! utterance through extraction and validation, tracks the pending
//! correction sub-state, enforces the bounded retry policy, and hands the
//! completed profile to the matching engine exactly once. One session is a
//! single sequential unit of work; concurrent sessions share only the
//! read-only catalog and the predicate cache.

use std::collections::HashMap;
use std::sync::Arc;

use uuid::Uuid;

use scheme_agent_config::constants::dialogue;
use scheme_agent_config::prompts;
use scheme_agent_core::{
    Catalog, ChangeSource, ConversationHistory, Field, FieldValue, Language, Turn, UserProfile,
};
use scheme_agent_llm::Oracle;
use scheme_agent_matcher::{MatchProfile, MatchResult, PredicateCache, ScoringEngine};

use crate::extractor::FieldExtractor;
use crate::stage::Stage;
use crate::validator::{validate, Validation};

/// Session configuration
#[derive(Debug, Clone)]
pub struct SessionConfig {
    /// Language for prompts and scheme display fields
    pub language: Language,
    /// Consecutive failures before the enumerated-choice prompt
    pub max_field_retries: u32,
    /// Minimum extraction confidence to attempt validation
    pub min_confidence: f32,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            language: Language::default(),
            max_field_retries: dialogue::MAX_FIELD_RETRIES,
            min_confidence: dialogue::MIN_EXTRACTION_CONFIDENCE,
        }
    }
}

/// What the session says back after a turn
#[derive(Debug, Clone)]
pub enum SessionReply {
    /// A question or re-ask for the current field
    Prompt(String),
    /// A did-you-mean confirmation that must be answered yes/no
    Confirmation(String),
    /// A disambiguation question (fuzzy tie)
    Disambiguation(String),
    /// Terminal: the ranked recommendations
    Recommendations {
        summary: String,
        results: Vec<MatchResult>,
    },
    /// Reply to input after the session already matched
    Closing(String),
}

impl SessionReply {
    /// The rendered text of this reply
    pub fn text(&self) -> &str {
        match self {
            SessionReply::Prompt(t)
            | SessionReply::Confirmation(t)
            | SessionReply::Disambiguation(t)
            | SessionReply::Closing(t) => t,
            SessionReply::Recommendations { summary, .. } => summary,
        }
    }
}

/// A held value awaiting the user's yes/no
#[derive(Debug, Clone)]
struct PendingConfirmation {
    value: FieldValue,
    /// The misheard surface form, when this came from a correction
    original: Option<String>,
}

/// One conversational session
pub struct SchemeSession {
    id: Uuid,
    config: SessionConfig,
    stage: Stage,
    profile: UserProfile,
    history: ConversationHistory,
    retries: HashMap<Field, u32>,
    pending: Option<PendingConfirmation>,
    /// Opportunistic candidates for later fields, keyed by field
    prefill: HashMap<Field, String>,
    extractor: FieldExtractor,
    engine: ScoringEngine,
    catalog: Arc<Catalog>,
    results: Option<Vec<MatchResult>>,
    turn_index: usize,
}

impl SchemeSession {
    /// Create a session over a shared catalog and predicate cache
    pub fn new(
        oracle: Arc<dyn Oracle>,
        catalog: Arc<Catalog>,
        cache: Arc<PredicateCache>,
        config: SessionConfig,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            config,
            stage: Stage::default(),
            profile: UserProfile::new(),
            history: ConversationHistory::new(),
            retries: HashMap::new(),
            pending: None,
            prefill: HashMap::new(),
            extractor: FieldExtractor::new(oracle),
            engine: ScoringEngine::new(cache),
            catalog,
            results: None,
            turn_index: 0,
        }
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn stage(&self) -> Stage {
        self.stage
    }

    pub fn profile(&self) -> &UserProfile {
        &self.profile
    }

    pub fn history(&self) -> &ConversationHistory {
        &self.history
    }

    /// Ranked results, once the session has matched
    pub fn results(&self) -> Option<&[MatchResult]> {
        self.results.as_deref()
    }

    /// Opening message: greeting plus the first question
    pub fn greeting(&mut self) -> SessionReply {
        let text = format!(
            "{}\n\n{}",
            prompts::greeting(self.config.language),
            prompts::question(Field::Name, self.config.language)
        );
        self.finish(SessionReply::Prompt(text))
    }

    /// Process one user utterance and produce the next reply
    ///
    /// Never fails: extraction and validation problems become re-asks, and
    /// input after `Matched` gets a closing reply without regressing state.
    pub async fn handle_turn(&mut self, utterance: &str) -> SessionReply {
        self.turn_index += 1;
        self.history.push(Turn::user(utterance));

        if self.stage.is_terminal() {
            let text = prompts::session_complete(self.config.language).to_string();
            return self.finish(SessionReply::Closing(text));
        }

        if let Some(pending) = self.pending.take() {
            return self.resolve_confirmation(pending, utterance);
        }

        let field = match self.stage.field() {
            Some(field) => field,
            // Ready never persists between turns; defensive only
            None => return self.run_matching(),
        };

        let extraction = self
            .extractor
            .extract(field, utterance, &self.history, self.config.language)
            .await;

        // Remember anything usable the utterance said about later fields
        for (later, candidate) in self.extractor.scan_later_fields(field, utterance) {
            self.prefill.entry(later).or_insert(candidate);
        }

        let candidate = match extraction.value {
            Some(value) if extraction.confidence >= self.config.min_confidence => value,
            _ => {
                tracing::debug!(session = %self.id, %field, "No usable candidate, re-asking");
                return self.reject_and_reprompt(field);
            }
        };

        match validate(field, &candidate) {
            Validation::Accepted(value) => {
                self.store_confirmed(value, ChangeSource::Utterance);
                self.advance()
            }
            Validation::Corrected { value, original } => {
                let text = prompts::confirm_correction(
                    field,
                    &value.to_string(),
                    &original,
                    self.config.language,
                );
                self.profile
                    .set_pending(value.clone(), ChangeSource::Correction, self.turn_index);
                self.pending = Some(PendingConfirmation {
                    value,
                    original: Some(original),
                });
                self.finish(SessionReply::Confirmation(text))
            }
            Validation::Ambiguous { candidates } => {
                self.bump_retry(field);
                let text = prompts::disambiguation(&candidates, self.config.language);
                self.finish(SessionReply::Disambiguation(text))
            }
            Validation::Rejected(reason) => {
                tracing::debug!(session = %self.id, %field, %reason, "Candidate rejected");
                self.reject_and_reprompt(field)
            }
        }
    }

    /// Handle the yes/no answer to a held confirmation
    fn resolve_confirmation(
        &mut self,
        pending: PendingConfirmation,
        utterance: &str,
    ) -> SessionReply {
        let field = pending.value.field();

        if is_affirmative(utterance) {
            self.profile.confirm(field, self.turn_index);
            self.retries.remove(&field);
            return self.advance();
        }

        if is_negative(utterance) {
            self.profile.clear(field);
            let retries = self.bump_retry(field);
            let text = if retries >= self.config.max_field_retries {
                prompts::enumerated_question(field, self.config.language)
            } else {
                prompts::question(field, self.config.language).to_string()
            };
            return self.finish(SessionReply::Prompt(text));
        }

        // Neither yes nor no: repeat the confirmation
        let text = match &pending.original {
            Some(original) => prompts::confirm_correction(
                field,
                &pending.value.to_string(),
                original,
                self.config.language,
            ),
            None => prompts::confirm_prefill(
                field,
                &pending.value.to_string(),
                self.config.language,
            ),
        };
        self.pending = Some(pending);
        self.finish(SessionReply::Confirmation(text))
    }

    /// Store a validated value and immediately confirm it
    fn store_confirmed(&mut self, value: FieldValue, source: ChangeSource) {
        let field = value.field();
        self.profile.set_pending(value, source, self.turn_index);
        self.profile.confirm(field, self.turn_index);
        self.retries.remove(&field);
    }

    /// Move to the next stage and produce its prompt
    fn advance(&mut self) -> SessionReply {
        let next = match self.stage.next() {
            Some(stage) => stage,
            None => return self.run_matching(),
        };
        self.stage = next;

        if self.stage == Stage::Ready {
            return self.run_matching();
        }

        let field = match self.stage.field() {
            Some(field) => field,
            None => return self.run_matching(),
        };

        // A value spotted in an earlier utterance pre-fills the question,
        // but is still confirmed here, in order
        if let Some(candidate) = self.prefill.remove(&field) {
            match validate(field, &candidate) {
                Validation::Accepted(value) | Validation::Corrected { value, .. } => {
                    let text = prompts::confirm_prefill(
                        field,
                        &value.to_string(),
                        self.config.language,
                    );
                    self.profile
                        .set_pending(value.clone(), ChangeSource::Utterance, self.turn_index);
                    self.pending = Some(PendingConfirmation {
                        value,
                        original: None,
                    });
                    return self.finish(SessionReply::Confirmation(text));
                }
                _ => {}
            }
        }

        let text = prompts::question(field, self.config.language).to_string();
        self.finish(SessionReply::Prompt(text))
    }

    /// Compile (cached), score, and become terminal
    fn run_matching(&mut self) -> SessionReply {
        self.stage = Stage::Matched;

        let results = match MatchProfile::try_from(&self.profile) {
            Ok(profile) => self.engine.score(&profile, &self.catalog),
            Err(e) => {
                // Unreachable by construction: Ready requires a complete
                // profile. Fail soft rather than poison the session.
                tracing::error!(session = %self.id, error = %e, "Matching with incomplete profile");
                Vec::new()
            }
        };

        tracing::info!(
            session = %self.id,
            matched = results.len(),
            profile = %self.profile.summary(),
            "Session matched"
        );

        let summary = if results.is_empty() {
            prompts::no_results(self.config.language).to_string()
        } else {
            format!(
                "{}\n\n{}",
                prompts::thank_you(self.config.language),
                prompts::results_summary(results.len(), self.config.language)
            )
        };

        self.results = Some(results.clone());
        self.finish(SessionReply::Recommendations { summary, results })
    }

    /// Count a failure and re-ask, switching to the enumerated prompt after
    /// the retry bound
    fn reject_and_reprompt(&mut self, field: Field) -> SessionReply {
        let retries = self.bump_retry(field);
        let text = if retries >= self.config.max_field_retries {
            prompts::enumerated_question(field, self.config.language)
        } else {
            prompts::retry_question(field, self.config.language).to_string()
        };
        self.finish(SessionReply::Prompt(text))
    }

    fn bump_retry(&mut self, field: Field) -> u32 {
        let counter = self.retries.entry(field).or_insert(0);
        *counter += 1;
        *counter
    }

    /// Record the reply as an assistant turn and hand it back
    fn finish(&mut self, reply: SessionReply) -> SessionReply {
        self.history.push(Turn::assistant(reply.text()));
        reply
    }
}

fn tokens(utterance: &str) -> impl Iterator<Item = String> + '_ {
    utterance
        .split(|c: char| !c.is_alphanumeric() && !('\u{0900}'..='\u{097F}').contains(&c))
        .filter(|t| !t.is_empty())
        .map(|t| t.to_lowercase())
}

fn is_affirmative(utterance: &str) -> bool {
    tokens(utterance).any(|t| dialogue::AFFIRMATIVE_WORDS.contains(&t.as_str()))
}

fn is_negative(utterance: &str) -> bool {
    tokens(utterance).any(|t| dialogue::NEGATIVE_WORDS.contains(&t.as_str()))
}
