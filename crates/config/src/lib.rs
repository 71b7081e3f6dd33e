//! Centralized configuration for the scheme agent
//!
//! Single source of truth for business constants (canonical state list,
//! thresholds, scoring weights) and all user-facing prompt text in both
//! supported languages. Keeping these here rather than scattered across
//! crates is what makes the normalization rules and the scoring policy
//! testable in one place.

pub mod constants;
pub mod prompts;

pub use constants::INDIAN_STATES_AND_UTS;
