//! Eligibility predicate compilation
//!
//! `compile` is a pure function from an immutable [`SchemeRecord`] to a
//! [`CompiledPredicate`], so results are memoized by scheme id in a
//! [`PredicateCache`] shared across sessions. Anything the compiler cannot
//! understand defaults to the most permissive rule — a scheme must never be
//! silently dropped because its constraints failed to parse.

use std::sync::Arc;

use dashmap::DashMap;
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

use scheme_agent_config::constants::{age::MAX_PLAUSIBLE_AGE, INDIAN_STATES_AND_UTS};
use scheme_agent_core::{catalog::ALL_SENTINEL, Gender, SchemeRecord};

/// Gender restriction of a scheme
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum GenderRule {
    /// Open to all genders
    Any,
    /// Restricted to the listed genders
    Only(Vec<Gender>),
}

/// Location restriction of a scheme
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum LocationRule {
    /// Available across all states and union territories
    Any,
    /// Restricted to the listed states (canonical names)
    States(Vec<String>),
}

/// Structured form of a scheme's demographic targeting
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CompiledPredicate {
    /// Inclusive eligible age range
    pub min_age: u8,
    pub max_age: u8,
    pub gender: GenderRule,
    pub location: LocationRule,
    /// Income tags carried through verbatim ("All" when unrestricted)
    pub income_tags: Vec<String>,
}

impl CompiledPredicate {
    pub fn admits_age(&self, age: u8) -> bool {
        age >= self.min_age && age <= self.max_age
    }

    pub fn admits_gender(&self, gender: Gender) -> bool {
        match &self.gender {
            GenderRule::Any => true,
            GenderRule::Only(set) => set.contains(&gender),
        }
    }

    pub fn admits_state(&self, state: &str) -> bool {
        match &self.location {
            LocationRule::Any => true,
            LocationRule::States(states) => states.iter().any(|s| s.eq_ignore_ascii_case(state)),
        }
    }

    /// Width of the eligible age band in years
    pub fn age_span(&self) -> u8 {
        self.max_age - self.min_age
    }

    /// Whether the scheme targets exactly one gender
    pub fn is_single_gender(&self) -> bool {
        matches!(&self.gender, GenderRule::Only(set) if set.len() == 1)
    }

    /// Whether the age range covers everyone
    pub fn age_unrestricted(&self) -> bool {
        self.min_age == 0 && self.max_age == MAX_PLAUSIBLE_AGE
    }
}

/// Compile a scheme record into a structured predicate
///
/// Deterministic and idempotent: compiling the same record twice yields an
/// identical predicate.
pub fn compile(record: &SchemeRecord) -> CompiledPredicate {
    let demo = &record.target_demographics;

    // Age: structured fields first, then deterministic text rules over the
    // eligibility prose, then the permissive default.
    let (mut min_age, mut max_age) = match (demo.min_age, demo.max_age) {
        (Some(min), Some(max)) => (min, max),
        (Some(min), None) => (min, MAX_PLAUSIBLE_AGE),
        (None, Some(max)) => (0, max),
        (None, None) => parse_age_phrase(&record.eligibility).unwrap_or((0, MAX_PLAUSIBLE_AGE)),
    };
    if min_age > max_age {
        // Catalog load already excludes these; guard against direct misuse
        (min_age, max_age) = (0, MAX_PLAUSIBLE_AGE);
    }

    let gender = compile_gender(&demo.gender);
    let location = compile_location(&demo.location);

    let income_tags = if demo.income.is_empty() {
        vec![ALL_SENTINEL.to_string()]
    } else {
        demo.income.clone()
    };

    CompiledPredicate {
        min_age,
        max_age: max_age.min(MAX_PLAUSIBLE_AGE),
        gender,
        location,
        income_tags,
    }
}

fn compile_gender(listed: &[String]) -> GenderRule {
    if listed.is_empty() || listed.iter().any(|g| g.eq_ignore_ascii_case(ALL_SENTINEL)) {
        return GenderRule::Any;
    }

    let mut set = Vec::new();
    for entry in listed {
        let gender = match entry.trim().to_lowercase().as_str() {
            "male" => Some(Gender::Male),
            "female" => Some(Gender::Female),
            "other" | "transgender" | "third gender" => Some(Gender::Other),
            _ => None,
        };
        match gender {
            Some(g) if !set.contains(&g) => set.push(g),
            Some(_) => {}
            None => tracing::warn!(value = %entry, "Unrecognized gender value in catalog"),
        }
    }

    // Nothing usable parsed: stay permissive rather than exclude everyone
    if set.is_empty() || set.len() == Gender::all().len() {
        GenderRule::Any
    } else {
        GenderRule::Only(set)
    }
}

fn compile_location(listed: &[String]) -> LocationRule {
    if listed.is_empty() || listed.iter().any(|l| l.eq_ignore_ascii_case(ALL_SENTINEL)) {
        return LocationRule::Any;
    }

    let mut states = Vec::new();
    for entry in listed {
        match INDIAN_STATES_AND_UTS
            .iter()
            .find(|s| s.eq_ignore_ascii_case(entry.trim()))
        {
            Some(canonical) => {
                if !states.contains(&canonical.to_string()) {
                    states.push(canonical.to_string());
                }
            }
            None => tracing::warn!(value = %entry, "Unrecognized state value in catalog"),
        }
    }

    if states.is_empty() {
        LocationRule::Any
    } else {
        LocationRule::States(states)
    }
}

static AGE_RANGE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(\d+)\s*(?:-|–|—|to)\s*(\d+)").expect("static regex"));
static AGE_ABOVE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)(?:above|over|at least|minimum(?:\s+age)?(?:\s+of)?)\s+(\d+)|(\d+)\s*(?:\+|years?\s+(?:and|or)\s+above)")
        .expect("static regex")
});
static AGE_BELOW: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)(?:below|under|up to|maximum(?:\s+age)?(?:\s+of)?)\s+(\d+)").expect("static regex")
});
static AGE_EXACT: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)(\d+)\s+years?\b").expect("static regex"));

/// Deterministic age rules over free text ("18-40 years", "Above 18",
/// "Below 10 years", "Adult")
fn parse_age_phrase(text: &str) -> Option<(u8, u8)> {
    if text.trim().is_empty() {
        return None;
    }

    if let Some(caps) = AGE_RANGE.captures(text) {
        let min: u8 = caps[1].parse().ok()?;
        let max: u8 = caps[2].parse().ok()?;
        return Some((min, max.min(MAX_PLAUSIBLE_AGE)));
    }

    if let Some(caps) = AGE_ABOVE.captures(text) {
        let min: u8 = caps
            .get(1)
            .or_else(|| caps.get(2))?
            .as_str()
            .parse()
            .ok()?;
        return Some((min, MAX_PLAUSIBLE_AGE));
    }

    if let Some(caps) = AGE_BELOW.captures(text) {
        let max: u8 = caps[1].parse().ok()?;
        return Some((0, max.min(MAX_PLAUSIBLE_AGE)));
    }

    if let Some(caps) = AGE_EXACT.captures(text) {
        let age: u8 = caps[1].parse().ok()?;
        return Some((age, age));
    }

    if text.to_lowercase().contains("adult") {
        return Some((18, MAX_PLAUSIBLE_AGE));
    }

    None
}

/// Memoized predicate cache, keyed by scheme id
///
/// Safe for concurrent reads across sessions. Two sessions compiling the
/// same scheme at once both run the pure `compile`; whichever insert lands
/// is identical, so the race is harmless.
#[derive(Default)]
pub struct PredicateCache {
    inner: DashMap<String, Arc<CompiledPredicate>>,
}

impl PredicateCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Get the compiled predicate for a record, compiling on first use
    pub fn get_or_compile(&self, record: &SchemeRecord) -> Arc<CompiledPredicate> {
        if let Some(cached) = self.inner.get(&record.id) {
            return cached.clone();
        }
        let compiled = Arc::new(compile(record));
        self.inner
            .entry(record.id.clone())
            .or_insert(compiled)
            .clone()
    }

    pub fn len(&self) -> usize {
        self.inner.len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use scheme_agent_core::TargetDemographics;

    fn record(id: &str, demo: TargetDemographics) -> SchemeRecord {
        SchemeRecord {
            id: id.to_string(),
            name: id.to_uppercase(),
            name_hi: None,
            description: String::new(),
            description_hi: None,
            eligibility: String::new(),
            benefits: String::new(),
            how_to_apply: String::new(),
            link: String::new(),
            category: String::new(),
            implementing_agency: String::new(),
            target_demographics: demo,
        }
    }

    #[test]
    fn test_structured_mapping() {
        let rec = record(
            "ssy",
            TargetDemographics {
                min_age: Some(0),
                max_age: Some(10),
                gender: vec!["Female".to_string()],
                income: vec!["All".to_string()],
                location: vec!["All".to_string()],
            },
        );
        let pred = compile(&rec);
        assert_eq!((pred.min_age, pred.max_age), (0, 10));
        assert_eq!(pred.gender, GenderRule::Only(vec![Gender::Female]));
        assert_eq!(pred.location, LocationRule::Any);
        assert!(pred.is_single_gender());
        assert!(!pred.admits_gender(Gender::Male));
        assert!(pred.admits_gender(Gender::Female));
    }

    #[test]
    fn test_missing_constraints_default_permissive() {
        let pred = compile(&record("open", TargetDemographics::default()));
        assert!(pred.age_unrestricted());
        assert_eq!(pred.gender, GenderRule::Any);
        assert_eq!(pred.location, LocationRule::Any);
        assert_eq!(pred.income_tags, vec!["All".to_string()]);
    }

    #[test]
    fn test_unparseable_values_default_permissive_not_restrictive() {
        let rec = record(
            "odd",
            TargetDemographics {
                min_age: None,
                max_age: None,
                gender: vec!["households".to_string()],
                income: vec![],
                location: vec!["Rural".to_string()],
            },
        );
        let pred = compile(&rec);
        // Unknown gender/location vocabulary must widen, never narrow
        assert_eq!(pred.gender, GenderRule::Any);
        assert_eq!(pred.location, LocationRule::Any);
    }

    #[test]
    fn test_location_validated_to_canonical() {
        let rec = record(
            "state",
            TargetDemographics {
                location: vec!["karnataka".to_string(), "Atlantis".to_string()],
                ..TargetDemographics::default()
            },
        );
        let pred = compile(&rec);
        assert_eq!(
            pred.location,
            LocationRule::States(vec!["Karnataka".to_string()])
        );
        assert!(pred.admits_state("Karnataka"));
        assert!(!pred.admits_state("Kerala"));
    }

    #[test]
    fn test_age_phrase_fallback() {
        assert_eq!(parse_age_phrase("18-40 years"), Some((18, 40)));
        assert_eq!(parse_age_phrase("Age 18 to 40"), Some((18, 40)));
        assert_eq!(parse_age_phrase("Above 18 years"), Some((18, 120)));
        assert_eq!(parse_age_phrase("60+"), Some((60, 120)));
        assert_eq!(parse_age_phrase("Below 10 years"), Some((0, 10)));
        assert_eq!(parse_age_phrase("Adult women"), Some((18, 120)));
        assert_eq!(parse_age_phrase("open to everyone"), None);
    }

    #[test]
    fn test_age_phrase_used_when_structured_absent() {
        let mut rec = record("prose", TargetDemographics::default());
        rec.eligibility = "Citizens aged 18-40 years with a bank account".to_string();
        let pred = compile(&rec);
        assert_eq!((pred.min_age, pred.max_age), (18, 40));
    }

    #[test]
    fn test_compile_is_idempotent() {
        let rec = record(
            "pmjdy",
            TargetDemographics {
                min_age: Some(10),
                max_age: Some(120),
                gender: vec!["All".to_string()],
                income: vec!["All".to_string()],
                location: vec!["All".to_string()],
            },
        );
        assert_eq!(compile(&rec), compile(&rec));
    }

    #[test]
    fn test_cache_memoizes_by_id() {
        let cache = PredicateCache::new();
        let rec = record(
            "pmjdy",
            TargetDemographics {
                min_age: Some(10),
                max_age: Some(120),
                ..TargetDemographics::default()
            },
        );
        let first = cache.get_or_compile(&rec);
        let second = cache.get_or_compile(&rec);
        assert!(Arc::ptr_eq(&first, &second));
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn test_all_three_genders_collapse_to_any() {
        let rec = record(
            "everyone",
            TargetDemographics {
                gender: vec!["Male".into(), "Female".into(), "Other".into()],
                ..TargetDemographics::default()
            },
        );
        assert_eq!(compile(&rec).gender, GenderRule::Any);
    }
}
