//! Conversation state machine for the scheme agent
//!
//! Drives the guided dialogue: one stage per demographic field, visited in
//! a fixed order, with extraction (pattern-first, oracle fallback),
//! validation against the normalization rules, correction confirmation, and
//! bounded retries. When every field is confirmed the session hands the
//! profile to the matching engine and becomes terminal.
//!
//! Extraction and oracle failures never escape a session: they become
//! zero-confidence candidates and re-asks.

pub mod extractor;
pub mod session;
pub mod stage;
pub mod validator;

pub use extractor::{Extraction, FieldExtractor};
pub use session::{SchemeSession, SessionConfig, SessionReply};
pub use stage::Stage;
pub use validator::{validate, RejectReason, Validation};
