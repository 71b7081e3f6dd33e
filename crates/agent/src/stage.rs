//! Conversation stages
//!
//! One stage per unfilled field, in fixed order, then `Ready` (all fields
//! confirmed) and the terminal `Matched`. The transition table is static:
//! there is exactly one way forward from each stage and no way back.

use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use scheme_agent_core::Field;

/// Conversation stage
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum Stage {
    /// Collecting the citizen's name
    #[default]
    AskName,
    /// Collecting gender
    AskGender,
    /// Collecting age
    AskAge,
    /// Collecting state of residence
    AskState,
    /// All fields confirmed; matching runs immediately
    Ready,
    /// Recommendations produced; terminal
    Matched,
}

/// Static transition map: strictly forward, no reordering, no skipping
static TRANSITIONS: Lazy<HashMap<Stage, &'static [Stage]>> = Lazy::new(|| {
    use Stage::*;
    let mut map = HashMap::new();
    map.insert(AskName, &[AskGender] as &[_]);
    map.insert(AskGender, &[AskAge] as &[_]);
    map.insert(AskAge, &[AskState] as &[_]);
    map.insert(AskState, &[Ready] as &[_]);
    map.insert(Ready, &[Matched] as &[_]);
    map.insert(Matched, &[] as &[_]);
    map
});

impl Stage {
    /// Allowed transitions from this stage
    pub fn allowed_transitions(&self) -> &'static [Stage] {
        TRANSITIONS.get(self).copied().unwrap_or(&[])
    }

    /// Whether a transition to `target` is allowed
    pub fn can_transition_to(&self, target: Stage) -> bool {
        self.allowed_transitions().contains(&target)
    }

    /// The single next stage, if any
    pub fn next(&self) -> Option<Stage> {
        self.allowed_transitions().first().copied()
    }

    /// The field this stage collects
    pub fn field(&self) -> Option<Field> {
        match self {
            Stage::AskName => Some(Field::Name),
            Stage::AskGender => Some(Field::Gender),
            Stage::AskAge => Some(Field::Age),
            Stage::AskState => Some(Field::State),
            Stage::Ready | Stage::Matched => None,
        }
    }

    /// The stage that collects a given field
    pub fn for_field(field: Field) -> Stage {
        match field {
            Field::Name => Stage::AskName,
            Field::Gender => Stage::AskGender,
            Field::Age => Stage::AskAge,
            Field::State => Stage::AskState,
        }
    }

    /// Whether the session has finished
    pub fn is_terminal(&self) -> bool {
        matches!(self, Stage::Matched)
    }
}

impl std::fmt::Display for Stage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Stage::AskName => "AskName",
            Stage::AskGender => "AskGender",
            Stage::AskAge => "AskAge",
            Stage::AskState => "AskState",
            Stage::Ready => "Ready",
            Stage::Matched => "Matched",
        };
        write!(f, "{}", name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fixed_forward_order() {
        assert_eq!(Stage::AskName.next(), Some(Stage::AskGender));
        assert_eq!(Stage::AskGender.next(), Some(Stage::AskAge));
        assert_eq!(Stage::AskAge.next(), Some(Stage::AskState));
        assert_eq!(Stage::AskState.next(), Some(Stage::Ready));
        assert_eq!(Stage::Ready.next(), Some(Stage::Matched));
        assert_eq!(Stage::Matched.next(), None);
    }

    #[test]
    fn test_no_skipping_or_regression() {
        assert!(!Stage::AskName.can_transition_to(Stage::AskAge));
        assert!(!Stage::AskState.can_transition_to(Stage::AskName));
        assert!(!Stage::Matched.can_transition_to(Stage::AskName));
        assert!(Stage::Matched.allowed_transitions().is_empty());
    }

    #[test]
    fn test_stage_field_round_trip() {
        for field in Field::ORDER {
            assert_eq!(Stage::for_field(field).field(), Some(field));
        }
        assert_eq!(Stage::Ready.field(), None);
        assert_eq!(Stage::Matched.field(), None);
    }

    #[test]
    fn test_walking_stages_visits_fields_in_collection_order() {
        let mut stage = Stage::default();
        let mut visited = Vec::new();
        while let Some(field) = stage.field() {
            visited.push(field);
            stage = stage.next().expect("ask stages always advance");
        }
        assert_eq!(visited, Field::ORDER.to_vec());
        assert!(stage == Stage::Ready);
    }
}
