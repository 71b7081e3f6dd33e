//! Normalization rules for the scheme agent
//!
//! Pure functions and tables that canonicalize what the citizen says:
//! - gender synonyms (English, Hinglish, Devanagari) to the three canonical
//!   values
//! - state/UT names via exact, alias, and edit-distance fuzzy matching
//! - ages from digits or spelled-out English numbers
//! - names cleaned of greetings and filler
//!
//! Everything here is deterministic and oracle-free; the conversational
//! layer decides what to do with an accepted, corrected, or rejected value.

pub mod age;
pub mod fuzzy;
pub mod gender;
pub mod name;
pub mod state;

pub use age::{parse_age, AgeParseError};
pub use fuzzy::{levenshtein, normalized_distance};
pub use gender::normalize_gender;
pub use name::clean_name;
pub use state::{match_state, StateMatch};
