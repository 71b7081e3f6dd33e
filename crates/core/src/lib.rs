//! Core types for the scheme agent
//!
//! This crate provides foundational types used across all other crates:
//! - Citizen profile with per-field confirmation tracking
//! - Scheme catalog records and load-time integrity validation
//! - Conversation turns and history
//! - Language definitions (English, Hindi)

pub mod catalog;
pub mod conversation;
pub mod language;
pub mod profile;

pub use catalog::{Catalog, CatalogError, SchemeRecord, TargetDemographics};
pub use conversation::{ConversationHistory, Turn, TurnRole};
pub use language::Language;
pub use profile::{
    ChangeSource, Field, FieldChange, FieldSlot, FieldStatus, FieldValue, Gender, UserProfile,
};
