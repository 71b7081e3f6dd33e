//! State and union territory name normalization
//!
//! Resolves free-text input to one of the 36 canonical state/UT names in
//! three passes: exact match, known-alias lookup (abbreviations, old names,
//! major cities), then edit-distance fuzzy matching. Fuzzy matching only
//! accepts a candidate that is both within the distance threshold and
//! strictly closer than the runner-up; a tie is surfaced as ambiguity, never
//! guessed.

use once_cell::sync::Lazy;
use scheme_agent_config::constants::{fuzzy, INDIAN_STATES_AND_UTS};
use std::collections::HashMap;

use crate::fuzzy::levenshtein;

/// Outcome of state normalization
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StateMatch {
    /// Input names the state exactly (case-insensitive)
    Exact(String),
    /// Input is a known abbreviation, old name, or city
    Alias { canonical: String, alias: String },
    /// Input corrected by edit distance
    Fuzzy { canonical: String, distance: usize },
    /// Two or more states are equally close; ask, don't guess
    Ambiguous { candidates: Vec<String> },
    /// Nothing recognizable
    Unknown,
}

/// Known aliases: abbreviations, alternate spellings, former names, and
/// major cities people answer with instead of their state.
static ALIASES: Lazy<HashMap<&'static str, &'static str>> = Lazy::new(|| {
    HashMap::from([
        ("dilli", "Delhi"),
        ("new delhi", "Delhi"),
        ("ncr", "Delhi"),
        ("mumbai", "Maharashtra"),
        ("bombay", "Maharashtra"),
        ("bangalore", "Karnataka"),
        ("bengaluru", "Karnataka"),
        ("calcutta", "West Bengal"),
        ("kolkata", "West Bengal"),
        ("madras", "Tamil Nadu"),
        ("chennai", "Tamil Nadu"),
        ("hyderabad", "Telangana"),
        ("orissa", "Odisha"),
        ("pondicherry", "Puducherry"),
        ("uttaranchal", "Uttarakhand"),
        ("ap", "Andhra Pradesh"),
        ("up", "Uttar Pradesh"),
        ("mp", "Madhya Pradesh"),
        ("hp", "Himachal Pradesh"),
        ("uk", "Uttarakhand"),
        ("tn", "Tamil Nadu"),
        ("wb", "West Bengal"),
        ("jk", "Jammu and Kashmir"),
        ("j&k", "Jammu and Kashmir"),
        ("andra", "Andhra Pradesh"),
        ("andhrapradesh", "Andhra Pradesh"),
        ("arunachalpradesh", "Arunachal Pradesh"),
        ("tamilnadu", "Tamil Nadu"),
        ("westbengal", "West Bengal"),
        ("uttarpradesh", "Uttar Pradesh"),
        ("madhyapradesh", "Madhya Pradesh"),
        ("himachalpradesh", "Himachal Pradesh"),
    ])
});

/// Normalize a state/UT name
pub fn match_state(input: &str) -> StateMatch {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        return StateMatch::Unknown;
    }
    let lower = trimmed.to_lowercase();

    // Pass 1: exact case-insensitive match
    for canonical in INDIAN_STATES_AND_UTS {
        if lower == canonical.to_lowercase() {
            return StateMatch::Exact(canonical.to_string());
        }
    }

    // Pass 2: alias lookup on the whole input
    if let Some(canonical) = ALIASES.get(lower.as_str()) {
        return StateMatch::Alias {
            canonical: canonical.to_string(),
            alias: trimmed.to_string(),
        };
    }

    // Pass 2b: canonical name or long alias embedded in a longer utterance
    // ("I live in Karnataka"). Word-boundary check avoids matches inside
    // unrelated words.
    for canonical in INDIAN_STATES_AND_UTS {
        if contains_phrase(&lower, &canonical.to_lowercase()) {
            return StateMatch::Exact(canonical.to_string());
        }
    }
    for (alias, canonical) in ALIASES.iter() {
        if alias.chars().count() >= 4 && contains_phrase(&lower, alias) {
            return StateMatch::Alias {
                canonical: canonical.to_string(),
                alias: alias.to_string(),
            };
        }
    }

    // Pass 3: fuzzy match against the canonical list
    if lower.chars().count() < fuzzy::MIN_INPUT_LENGTH {
        return StateMatch::Unknown;
    }

    let mut best_distance = usize::MAX;
    let mut candidates: Vec<&str> = Vec::new();
    for canonical in INDIAN_STATES_AND_UTS {
        let distance = levenshtein(&lower, canonical);
        match distance.cmp(&best_distance) {
            std::cmp::Ordering::Less => {
                best_distance = distance;
                candidates.clear();
                candidates.push(canonical);
            }
            std::cmp::Ordering::Equal => candidates.push(canonical),
            std::cmp::Ordering::Greater => {}
        }
    }

    // Accept only when the best candidate is inside the threshold relative
    // to its own length
    let within = candidates.iter().any(|c| {
        best_distance as f32 / c.chars().count().max(1) as f32 <= fuzzy::MAX_NORMALIZED_DISTANCE
    });
    if !within {
        return StateMatch::Unknown;
    }

    if candidates.len() > 1 {
        return StateMatch::Ambiguous {
            candidates: candidates.into_iter().map(str::to_string).collect(),
        };
    }

    StateMatch::Fuzzy {
        canonical: candidates[0].to_string(),
        distance: best_distance,
    }
}

/// Whether `needle` occurs in `haystack` bounded by non-alphanumeric
/// characters (or the string ends)
fn contains_phrase(haystack: &str, needle: &str) -> bool {
    let mut search_from = 0;
    while let Some(pos) = haystack[search_from..].find(needle) {
        let start = search_from + pos;
        let end = start + needle.len();
        let before_ok = start == 0
            || haystack[..start]
                .chars()
                .next_back()
                .map_or(true, |c| !c.is_alphanumeric());
        let after_ok = end == haystack.len()
            || haystack[end..]
                .chars()
                .next()
                .map_or(true, |c| !c.is_alphanumeric());
        if before_ok && after_ok {
            return true;
        }
        search_from = end;
    }
    false
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_exact_match_any_case() {
        assert_eq!(
            match_state("karnataka"),
            StateMatch::Exact("Karnataka".to_string())
        );
        assert_eq!(
            match_state("TAMIL NADU"),
            StateMatch::Exact("Tamil Nadu".to_string())
        );
    }

    #[test]
    fn test_embedded_state_name() {
        assert_eq!(
            match_state("I live in Karnataka"),
            StateMatch::Exact("Karnataka".to_string())
        );
        // "goa" inside an unrelated word must not match
        assert_eq!(match_state("ongoing"), StateMatch::Unknown);
    }

    #[test]
    fn test_aliases() {
        assert!(matches!(
            match_state("UP"),
            StateMatch::Alias { canonical, .. } if canonical == "Uttar Pradesh"
        ));
        assert!(matches!(
            match_state("bombay"),
            StateMatch::Alias { canonical, .. } if canonical == "Maharashtra"
        ));
        assert!(matches!(
            match_state("tamilnadu"),
            StateMatch::Alias { canonical, .. } if canonical == "Tamil Nadu"
        ));
        assert!(matches!(
            match_state("I am from Bengaluru"),
            StateMatch::Alias { canonical, .. } if canonical == "Karnataka"
        ));
    }

    #[test]
    fn test_fuzzy_corrects_common_misspellings() {
        assert!(matches!(
            match_state("Karnatka"),
            StateMatch::Fuzzy { canonical, distance: 1 } if canonical == "Karnataka"
        ));
        assert!(matches!(
            match_state("Maharastra"),
            StateMatch::Fuzzy { canonical, .. } if canonical == "Maharashtra"
        ));
        assert!(matches!(
            match_state("Keralla"),
            StateMatch::Fuzzy { canonical, .. } if canonical == "Kerala"
        ));
    }

    #[test]
    fn test_single_char_typo_corrects_for_every_state() {
        for canonical in INDIAN_STATES_AND_UTS {
            // Substitute one mid-word letter with a character that appears
            // in no state name
            let mut chars: Vec<char> = canonical.chars().collect();
            let idx = chars
                .iter()
                .position(|c| c.is_alphabetic())
                .expect("state names contain letters");
            chars[idx] = if chars[idx] == 'q' { 'x' } else { 'q' };
            let typo: String = chars.iter().collect();

            match match_state(&typo) {
                StateMatch::Fuzzy { canonical: found, distance } => {
                    assert_eq!(&found, canonical, "typo {:?}", typo);
                    assert_eq!(distance, 1);
                }
                other => panic!("typo {:?} gave {:?}", typo, other),
            }
        }
    }

    #[test]
    fn test_equidistant_input_is_ambiguous() {
        // Two edits from "Himachal Pradesh" and two from "Arunachal Pradesh"
        let result = match_state("Armachal Pradesh");
        match result {
            StateMatch::Ambiguous { candidates } => {
                assert!(candidates.contains(&"Himachal Pradesh".to_string()));
                assert!(candidates.contains(&"Arunachal Pradesh".to_string()));
            }
            other => panic!("expected ambiguity, got {:?}", other),
        }
    }

    #[test]
    fn test_garbage_rejected() {
        assert_eq!(match_state("xyz123"), StateMatch::Unknown);
        assert_eq!(match_state(""), StateMatch::Unknown);
        assert_eq!(match_state("London"), StateMatch::Unknown);
        // Too short for fuzzy, not an alias
        assert_eq!(match_state("zz"), StateMatch::Unknown);
    }
}
