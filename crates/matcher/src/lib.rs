//! Eligibility matching engine
//!
//! Compiles each scheme's demographic targeting into a structured predicate
//! (once, cached) and scores the catalog against a completed citizen
//! profile. Filtering is strict; scoring rewards targeted schemes over
//! broad ones and explains every surviving match with plain reason strings.

pub mod predicate;
pub mod score;

pub use predicate::{compile, CompiledPredicate, GenderRule, LocationRule, PredicateCache};
pub use score::{MatchProfile, MatchResult, ScoreBreakdown, ScoreWeights, ScoringEngine};

use thiserror::Error;

/// Matcher errors
#[derive(Error, Debug)]
pub enum MatcherError {
    #[error("Profile incomplete: {missing} not confirmed")]
    ProfileIncomplete { missing: &'static str },
}
