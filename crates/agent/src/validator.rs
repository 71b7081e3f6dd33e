//! Candidate validation
//!
//! Applies the normalization rules to an extracted candidate. `Accepted`
//! means the input already named the canonical value; `Corrected` means a
//! synonym, alias, or misspelling was normalized and the user must confirm
//! the correction before the field counts as confirmed. `Ambiguous` is a
//! fuzzy tie, surfaced as a question rather than a guess.

use scheme_agent_core::{Field, FieldValue};
use scheme_agent_text_processing::{
    age::AgeParseError, clean_name, match_state, normalize_gender, parse_age, StateMatch,
};

/// Why a candidate was rejected
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RejectReason {
    InvalidName,
    UnknownGender,
    NegativeAge,
    ImplausibleAge,
    NoAgeFound,
    UnknownState,
}

impl std::fmt::Display for RejectReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let text = match self {
            RejectReason::InvalidName => "not a usable name",
            RejectReason::UnknownGender => "unrecognized gender",
            RejectReason::NegativeAge => "age cannot be negative",
            RejectReason::ImplausibleAge => "age is implausibly large",
            RejectReason::NoAgeFound => "no age found",
            RejectReason::UnknownState => "unknown state",
        };
        write!(f, "{}", text)
    }
}

/// Outcome of validating one candidate
#[derive(Debug, Clone, PartialEq)]
pub enum Validation {
    /// Input was already canonical
    Accepted(FieldValue),
    /// Normalized from a different surface form; confirm before use
    Corrected {
        value: FieldValue,
        original: String,
    },
    /// Fuzzy matching found no clear winner
    Ambiguous { candidates: Vec<String> },
    /// Unusable; re-ask
    Rejected(RejectReason),
}

/// Validate a candidate for a field
pub fn validate(field: Field, candidate: &str) -> Validation {
    match field {
        Field::Name => match clean_name(candidate) {
            Some(name) => Validation::Accepted(FieldValue::Name(name)),
            None => Validation::Rejected(RejectReason::InvalidName),
        },
        Field::Gender => match normalize_gender(candidate) {
            Some(gender) => {
                if candidate.trim().eq_ignore_ascii_case(gender.as_str()) {
                    Validation::Accepted(FieldValue::Gender(gender))
                } else {
                    Validation::Corrected {
                        value: FieldValue::Gender(gender),
                        original: candidate.trim().to_string(),
                    }
                }
            }
            None => Validation::Rejected(RejectReason::UnknownGender),
        },
        Field::Age => match parse_age(candidate) {
            Ok(age) => Validation::Accepted(FieldValue::Age(age)),
            Err(AgeParseError::Negative) => Validation::Rejected(RejectReason::NegativeAge),
            Err(AgeParseError::Implausible) => Validation::Rejected(RejectReason::ImplausibleAge),
            Err(AgeParseError::NotFound) => Validation::Rejected(RejectReason::NoAgeFound),
        },
        Field::State => match match_state(candidate) {
            StateMatch::Exact(canonical) => Validation::Accepted(FieldValue::State(canonical)),
            StateMatch::Alias { canonical, .. } | StateMatch::Fuzzy { canonical, .. } => {
                Validation::Corrected {
                    value: FieldValue::State(canonical),
                    original: candidate.trim().to_string(),
                }
            }
            StateMatch::Ambiguous { candidates } => Validation::Ambiguous { candidates },
            StateMatch::Unknown => Validation::Rejected(RejectReason::UnknownState),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use scheme_agent_core::Gender;

    #[test]
    fn test_name_accepted_after_cleaning() {
        assert_eq!(
            validate(Field::Name, "my name is rahul"),
            Validation::Accepted(FieldValue::Name("Rahul".to_string()))
        );
        assert_eq!(
            validate(Field::Name, "1234"),
            Validation::Rejected(RejectReason::InvalidName)
        );
    }

    #[test]
    fn test_canonical_gender_accepted_without_confirmation() {
        assert_eq!(
            validate(Field::Gender, "male"),
            Validation::Accepted(FieldValue::Gender(Gender::Male))
        );
        assert_eq!(
            validate(Field::Gender, "Female"),
            Validation::Accepted(FieldValue::Gender(Gender::Female))
        );
    }

    #[test]
    fn test_colloquial_gender_goes_through_correction() {
        match validate(Field::Gender, "ladka") {
            Validation::Corrected { value, original } => {
                assert_eq!(value, FieldValue::Gender(Gender::Male));
                assert_eq!(original, "ladka");
            }
            other => panic!("expected correction, got {:?}", other),
        }
    }

    #[test]
    fn test_gender_garbage_rejected() {
        assert_eq!(
            validate(Field::Gender, "xyz123"),
            Validation::Rejected(RejectReason::UnknownGender)
        );
    }

    #[test]
    fn test_age_outcomes() {
        assert_eq!(
            validate(Field::Age, "25"),
            Validation::Accepted(FieldValue::Age(25))
        );
        assert_eq!(
            validate(Field::Age, "twenty five"),
            Validation::Accepted(FieldValue::Age(25))
        );
        assert_eq!(
            validate(Field::Age, "-5"),
            Validation::Rejected(RejectReason::NegativeAge)
        );
        assert_eq!(
            validate(Field::Age, "150"),
            Validation::Rejected(RejectReason::ImplausibleAge)
        );
    }

    #[test]
    fn test_exact_state_accepted() {
        assert_eq!(
            validate(Field::State, "Karnataka"),
            Validation::Accepted(FieldValue::State("Karnataka".to_string()))
        );
    }

    #[test]
    fn test_misspelled_state_corrected() {
        match validate(Field::State, "Karnatka") {
            Validation::Corrected { value, original } => {
                assert_eq!(value, FieldValue::State("Karnataka".to_string()));
                assert_eq!(original, "Karnatka");
            }
            other => panic!("expected correction, got {:?}", other),
        }
    }

    #[test]
    fn test_ambiguous_state_surfaced() {
        match validate(Field::State, "Armachal Pradesh") {
            Validation::Ambiguous { candidates } => {
                assert_eq!(candidates.len(), 2);
            }
            other => panic!("expected ambiguity, got {:?}", other),
        }
    }
}
