//! Scheme scoring
//!
//! Filters out ineligible schemes entirely, scores the survivors with the
//! fixed 0.40 / 0.30 / 0.30 weighting over age, gender, and state fit, and
//! attaches ordered, human-readable reasons for every surviving scheme.

use std::sync::Arc;

use serde::{Deserialize, Serialize};

use scheme_agent_config::constants::{age::MAX_PLAUSIBLE_AGE, scoring};
use scheme_agent_core::{Catalog, Field, Gender, UserProfile};

use crate::predicate::{CompiledPredicate, GenderRule, LocationRule, PredicateCache};
use crate::MatcherError;

/// A fully confirmed profile, the only shape the scorer accepts
///
/// Constructed from a [`UserProfile`] via `TryFrom`, which fails unless all
/// four fields are confirmed — the type enforces the matching invariant.
#[derive(Debug, Clone)]
pub struct MatchProfile {
    pub age: u8,
    pub gender: Gender,
    pub state: String,
}

impl TryFrom<&UserProfile> for MatchProfile {
    type Error = MatcherError;

    fn try_from(profile: &UserProfile) -> Result<Self, Self::Error> {
        if let Some(field) = profile.next_required_field() {
            return Err(MatcherError::ProfileIncomplete {
                missing: match field {
                    Field::Name => "name",
                    Field::Gender => "gender",
                    Field::Age => "age",
                    Field::State => "state",
                },
            });
        }
        // All four confirmed, so the unwraps below cannot fire; expressed
        // without unwrap to keep the invariant in the types.
        match (profile.age(), profile.gender(), profile.state()) {
            (Some(age), Some(gender), Some(state)) => Ok(Self {
                age,
                gender,
                state: state.to_string(),
            }),
            _ => Err(MatcherError::ProfileIncomplete { missing: "profile" }),
        }
    }
}

/// Component weights, fixed by policy
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct ScoreWeights {
    pub age: f32,
    pub gender: f32,
    pub state: f32,
}

impl Default for ScoreWeights {
    fn default() -> Self {
        Self {
            age: scoring::AGE_WEIGHT,
            gender: scoring::GENDER_WEIGHT,
            state: scoring::STATE_WEIGHT,
        }
    }
}

/// Per-component fits for one surviving scheme
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct ScoreBreakdown {
    pub age_fit: f32,
    pub gender_fit: f32,
    pub state_fit: f32,
    pub specificity_bonus: f32,
}

/// One ranked recommendation
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MatchResult {
    pub scheme_id: String,
    /// Final score in [0, 1]
    pub score: f32,
    /// Reason strings in fixed order: age, gender, state, bonus
    pub reasons: Vec<String>,
    pub breakdown: ScoreBreakdown,
}

/// Scores a catalog against a completed profile
pub struct ScoringEngine {
    weights: ScoreWeights,
    cache: Arc<PredicateCache>,
}

impl ScoringEngine {
    pub fn new(cache: Arc<PredicateCache>) -> Self {
        Self {
            weights: ScoreWeights::default(),
            cache,
        }
    }

    pub fn with_weights(cache: Arc<PredicateCache>, weights: ScoreWeights) -> Self {
        Self { weights, cache }
    }

    /// Rank the catalog for a profile
    ///
    /// Ineligible schemes are excluded, not scored. Results are sorted by
    /// descending score; the stable sort keeps catalog insertion order for
    /// ties. Scoring the same profile against the same catalog twice yields
    /// an identical sequence.
    pub fn score(&self, profile: &MatchProfile, catalog: &Catalog) -> Vec<MatchResult> {
        let mut results: Vec<MatchResult> = Vec::new();

        for record in catalog.iter() {
            let predicate = self.cache.get_or_compile(record);
            if let Some(result) = self.score_one(profile, &record.id, &predicate) {
                results.push(result);
            }
        }

        results.sort_by(|a, b| b.score.partial_cmp(&a.score).unwrap_or(std::cmp::Ordering::Equal));
        tracing::debug!(matched = results.len(), "Scored catalog");
        results
    }

    fn score_one(
        &self,
        profile: &MatchProfile,
        scheme_id: &str,
        predicate: &CompiledPredicate,
    ) -> Option<MatchResult> {
        // Hard filters: out-of-range schemes are excluded entirely
        if !predicate.admits_age(profile.age)
            || !predicate.admits_gender(profile.gender)
            || !predicate.admits_state(&profile.state)
        {
            return None;
        }

        let age_fit = age_fit(profile.age, predicate);
        let gender_fit = match &predicate.gender {
            GenderRule::Any => scoring::BROAD_FIT,
            GenderRule::Only(_) => 1.0,
        };
        let state_fit = match &predicate.location {
            LocationRule::Any => scoring::BROAD_FIT,
            LocationRule::States(_) => 1.0,
        };

        // Reward schemes narrowly targeted at exactly this profile
        let specificity_bonus = if predicate.is_single_gender()
            && predicate.age_span() < scoring::NARROW_AGE_SPAN
        {
            scoring::SPECIFICITY_BONUS
        } else {
            0.0
        };

        let weighted = self.weights.age * age_fit
            + self.weights.gender * gender_fit
            + self.weights.state * state_fit;
        let score = (weighted + specificity_bonus).min(1.0);

        let mut reasons = Vec::with_capacity(4);
        reasons.push(age_reason(profile.age, predicate));
        reasons.push(gender_reason(profile.gender, predicate));
        reasons.push(state_reason(&profile.state, predicate));
        if specificity_bonus > 0.0 {
            reasons.push("scheme is narrowly targeted at your profile".to_string());
        }

        Some(MatchResult {
            scheme_id: scheme_id.to_string(),
            score,
            reasons,
            breakdown: ScoreBreakdown {
                age_fit,
                gender_fit,
                state_fit,
                specificity_bonus,
            },
        })
    }
}

/// Age fit inside an already-passing range
///
/// Full credit inside the core band (the inner portion of the range);
/// linear decay toward the floor as the age approaches either boundary.
fn age_fit(age: u8, predicate: &CompiledPredicate) -> f32 {
    let span = predicate.age_span() as f32;
    if span <= 0.0 {
        return 1.0;
    }

    let margin = span * (1.0 - scoring::AGE_CORE_FRACTION) / 2.0;
    let core_lo = predicate.min_age as f32 + margin;
    let core_hi = predicate.max_age as f32 - margin;
    let age = age as f32;

    if age >= core_lo && age <= core_hi {
        return 1.0;
    }

    let (boundary, core_edge) = if age < core_lo {
        (predicate.min_age as f32, core_lo)
    } else {
        (predicate.max_age as f32, core_hi)
    };
    let depth = (age - boundary).abs() / (core_edge - boundary).abs().max(f32::EPSILON);
    scoring::AGE_FIT_FLOOR + (1.0 - scoring::AGE_FIT_FLOOR) * depth.min(1.0)
}

fn age_reason(age: u8, predicate: &CompiledPredicate) -> String {
    if predicate.age_unrestricted() {
        return format!("age {} qualifies; the scheme is open to all ages", age);
    }
    if predicate.min_age > 0 && predicate.max_age < MAX_PLAUSIBLE_AGE {
        format!(
            "age {} is within the {}-{} eligible range",
            age, predicate.min_age, predicate.max_age
        )
    } else if predicate.min_age > 0 {
        format!(
            "age {} meets the minimum age requirement of {}",
            age, predicate.min_age
        )
    } else {
        format!(
            "age {} is below the maximum age limit of {}",
            age, predicate.max_age
        )
    }
}

fn gender_reason(gender: Gender, predicate: &CompiledPredicate) -> String {
    match &predicate.gender {
        GenderRule::Any => "scheme open to all genders".to_string(),
        GenderRule::Only(_) => format!(
            "scheme is designed for {} beneficiaries",
            gender.as_str().to_lowercase()
        ),
    }
}

fn state_reason(state: &str, predicate: &CompiledPredicate) -> String {
    match &predicate.location {
        LocationRule::Any => "available across all states and union territories".to_string(),
        LocationRule::States(_) => format!("available in {}", state),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use scheme_agent_core::{ChangeSource, FieldValue, SchemeRecord, TargetDemographics};

    fn record(id: &str, min: u8, max: u8, gender: &[&str], location: &[&str]) -> SchemeRecord {
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
            target_demographics: TargetDemographics {
                min_age: Some(min),
                max_age: Some(max),
                gender: gender.iter().map(|s| s.to_string()).collect(),
                income: vec!["All".to_string()],
                location: location.iter().map(|s| s.to_string()).collect(),
            },
        }
    }

    fn profile(age: u8, gender: Gender, state: &str) -> MatchProfile {
        MatchProfile {
            age,
            gender,
            state: state.to_string(),
        }
    }

    fn engine() -> ScoringEngine {
        ScoringEngine::new(Arc::new(PredicateCache::new()))
    }

    fn sample_catalog() -> Catalog {
        Catalog::new(vec![
            record("pmjdy", 10, 120, &["All"], &["All"]),
            record("ssy", 0, 10, &["Female"], &["All"]),
            record("apy", 18, 40, &["All"], &["All"]),
            record("yuva-nidhi", 18, 35, &["All"], &["Karnataka"]),
        ])
        .unwrap()
    }

    #[test]
    fn test_pmjdy_fits_broadly() {
        let results = engine().score(&profile(25, Gender::Male, "Karnataka"), &sample_catalog());
        let pmjdy = results.iter().find(|r| r.scheme_id == "pmjdy").unwrap();

        assert!((pmjdy.breakdown.gender_fit - 0.7).abs() < 1e-6);
        assert!((pmjdy.breakdown.state_fit - 0.7).abs() < 1e-6);
        assert!(pmjdy.breakdown.age_fit >= scoring::AGE_FIT_FLOOR);
        assert!(pmjdy.score > 0.0 && pmjdy.score <= 1.0);
    }

    #[test]
    fn test_ssy_filtered_out_entirely() {
        // Age 25 fails the 0-10 range and Male fails the Female restriction
        let results = engine().score(&profile(25, Gender::Male, "Karnataka"), &sample_catalog());
        assert!(results.iter().all(|r| r.scheme_id != "ssy"));
    }

    #[test]
    fn test_state_specific_outranks_all_india() {
        let results = engine().score(&profile(25, Gender::Male, "Karnataka"), &sample_catalog());
        let yuva = results.iter().position(|r| r.scheme_id == "yuva-nidhi").unwrap();
        let pmjdy = results.iter().position(|r| r.scheme_id == "pmjdy").unwrap();
        assert!(yuva < pmjdy, "exact state match should rank above All-India");
    }

    #[test]
    fn test_out_of_state_scheme_filtered() {
        let results = engine().score(&profile(25, Gender::Male, "Kerala"), &sample_catalog());
        assert!(results.iter().all(|r| r.scheme_id != "yuva-nidhi"));
    }

    #[test]
    fn test_specificity_bonus_for_narrow_single_gender() {
        let catalog = Catalog::new(vec![record("girls", 18, 25, &["Female"], &["All"])]).unwrap();
        let results = engine().score(&profile(21, Gender::Female, "Kerala"), &catalog);
        let r = &results[0];
        assert!((r.breakdown.specificity_bonus - scoring::SPECIFICITY_BONUS).abs() < 1e-6);
        assert_eq!(r.reasons.len(), 4);
        // Age 21 sits in the core of 18-25: full age fit
        assert!((r.breakdown.age_fit - 1.0).abs() < 1e-6);
    }

    #[test]
    fn test_no_bonus_for_broad_schemes() {
        let results = engine().score(&profile(25, Gender::Male, "Karnataka"), &sample_catalog());
        let pmjdy = results.iter().find(|r| r.scheme_id == "pmjdy").unwrap();
        assert_eq!(pmjdy.breakdown.specificity_bonus, 0.0);
        assert_eq!(pmjdy.reasons.len(), 3);
    }

    #[test]
    fn test_score_capped_at_one() {
        let catalog = Catalog::new(vec![record("girls", 18, 25, &["Female"], &["Kerala"])]).unwrap();
        let results = engine().score(&profile(21, Gender::Female, "Kerala"), &catalog);
        assert!(results[0].score <= 1.0);
    }

    #[test]
    fn test_age_fit_decays_toward_boundary() {
        let cache = Arc::new(PredicateCache::new());
        let rec = record("apy", 18, 40, &["All"], &["All"]);
        let predicate = cache.get_or_compile(&rec);

        // Midpoint: full credit
        assert!((age_fit(29, &predicate) - 1.0).abs() < 1e-6);
        // At the boundary: the floor
        let edge = age_fit(18, &predicate);
        assert!((edge - scoring::AGE_FIT_FLOOR).abs() < 0.01);
        // Between boundary and core: partial credit, monotonically rising
        let near_edge = age_fit(20, &predicate);
        assert!(near_edge > edge && near_edge < 1.0);
    }

    #[test]
    fn test_ties_keep_catalog_order() {
        let catalog = Catalog::new(vec![
            record("first", 18, 40, &["All"], &["All"]),
            record("second", 18, 40, &["All"], &["All"]),
        ])
        .unwrap();
        let results = engine().score(&profile(29, Gender::Male, "Kerala"), &catalog);
        assert_eq!(results[0].scheme_id, "first");
        assert_eq!(results[1].scheme_id, "second");
    }

    #[test]
    fn test_scoring_is_deterministic() {
        let catalog = sample_catalog();
        let p = profile(25, Gender::Male, "Karnataka");
        let engine = engine();
        let first: Vec<(String, f32)> = engine
            .score(&p, &catalog)
            .into_iter()
            .map(|r| (r.scheme_id, r.score))
            .collect();
        let second: Vec<(String, f32)> = engine
            .score(&p, &catalog)
            .into_iter()
            .map(|r| (r.scheme_id, r.score))
            .collect();
        assert_eq!(first, second);
    }

    #[test]
    fn test_reasons_in_fixed_order() {
        let results = engine().score(&profile(25, Gender::Male, "Karnataka"), &sample_catalog());
        let yuva = results.iter().find(|r| r.scheme_id == "yuva-nidhi").unwrap();
        assert!(yuva.reasons[0].starts_with("age 25"));
        assert!(yuva.reasons[1].contains("gender"));
        assert!(yuva.reasons[2].contains("Karnataka"));
    }

    #[test]
    fn test_match_profile_requires_confirmed_fields() {
        let mut user = UserProfile::new();
        user.set_pending(FieldValue::Name("Rahul".into()), ChangeSource::Utterance, 0);
        user.confirm(Field::Name, 0);
        assert!(MatchProfile::try_from(&user).is_err());

        user.set_pending(FieldValue::Gender(Gender::Male), ChangeSource::Utterance, 1);
        user.confirm(Field::Gender, 1);
        user.set_pending(FieldValue::Age(25), ChangeSource::Utterance, 2);
        user.confirm(Field::Age, 2);
        user.set_pending(FieldValue::State("Karnataka".into()), ChangeSource::Utterance, 3);
        // Pending, not yet confirmed
        assert!(MatchProfile::try_from(&user).is_err());

        user.confirm(Field::State, 3);
        let match_profile = MatchProfile::try_from(&user).unwrap();
        assert_eq!(match_profile.age, 25);
        assert_eq!(match_profile.state, "Karnataka");
    }
}
