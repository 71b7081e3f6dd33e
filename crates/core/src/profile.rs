//! Citizen profile collected over a conversation
//!
//! Tracks the four demographic fields (name, gender, age, state) with a
//! per-field confirmation status. Matching may only run once every field is
//! `Confirmed`; the pending state exists so that corrected values ("did you
//! mean Karnataka?") can be held until the user confirms them.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Gender of the citizen
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Gender {
    Male,
    Female,
    Other,
}

impl Gender {
    /// Canonical display form
    pub fn as_str(&self) -> &'static str {
        match self {
            Gender::Male => "Male",
            Gender::Female => "Female",
            Gender::Other => "Other",
        }
    }

    /// All recognized values, in display order
    pub fn all() -> [Gender; 3] {
        [Gender::Male, Gender::Female, Gender::Other]
    }
}

impl std::fmt::Display for Gender {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// The four demographic fields, in the order they are collected
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Field {
    Name,
    Gender,
    Age,
    State,
}

impl Field {
    /// Collection order. The conversation never asks out of this order.
    pub const ORDER: [Field; 4] = [Field::Name, Field::Gender, Field::Age, Field::State];

    pub fn as_str(&self) -> &'static str {
        match self {
            Field::Name => "name",
            Field::Gender => "gender",
            Field::Age => "age",
            Field::State => "state",
        }
    }

    /// Fields that come after this one in collection order
    pub fn later_fields(&self) -> &'static [Field] {
        match self {
            Field::Name => &[Field::Gender, Field::Age, Field::State],
            Field::Gender => &[Field::Age, Field::State],
            Field::Age => &[Field::State],
            Field::State => &[],
        }
    }
}

impl std::fmt::Display for Field {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Confirmation status of a profile field
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FieldStatus {
    /// No value collected yet
    Unset,
    /// Value held, awaiting user confirmation
    Pending,
    /// Value validated (and confirmed where a correction was involved)
    Confirmed,
}

/// A typed, validated value for one of the four fields
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum FieldValue {
    Name(String),
    Gender(Gender),
    Age(u8),
    State(String),
}

impl FieldValue {
    /// Which field this value belongs to
    pub fn field(&self) -> Field {
        match self {
            FieldValue::Name(_) => Field::Name,
            FieldValue::Gender(_) => Field::Gender,
            FieldValue::Age(_) => Field::Age,
            FieldValue::State(_) => Field::State,
        }
    }
}

impl std::fmt::Display for FieldValue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            FieldValue::Name(v) | FieldValue::State(v) => write!(f, "{}", v),
            FieldValue::Gender(g) => write!(f, "{}", g),
            FieldValue::Age(a) => write!(f, "{}", a),
        }
    }
}

/// A collected value together with its confirmation state
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FieldSlot<T> {
    /// The value
    pub value: T,
    /// Whether the user has confirmed this value
    pub confirmed: bool,
    /// Turn index when this was set
    pub turn_set: usize,
}

impl<T> FieldSlot<T> {
    pub fn pending(value: T, turn: usize) -> Self {
        Self {
            value,
            confirmed: false,
            turn_set: turn,
        }
    }

    /// Mark as confirmed
    pub fn confirm(&mut self) {
        self.confirmed = true;
    }
}

/// Source of a profile change
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ChangeSource {
    /// Extracted from a user utterance
    Utterance,
    /// Fuzzy/alias correction accepted by the user
    Correction,
    /// Confirmation of a held value
    Confirmation,
}

/// Record of a profile change, kept for the life of the session
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FieldChange {
    pub timestamp: DateTime<Utc>,
    pub field: Field,
    pub old_value: Option<String>,
    pub new_value: Option<String>,
    pub source: ChangeSource,
    pub turn_index: usize,
}

/// The citizen profile for one session
///
/// Created empty at session start, mutated field by field by the
/// conversation state machine, discarded at session end.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UserProfile {
    name: Option<FieldSlot<String>>,
    gender: Option<FieldSlot<Gender>>,
    age: Option<FieldSlot<u8>>,
    state: Option<FieldSlot<String>>,
    /// Change history, oldest first
    history: Vec<FieldChange>,
}

impl UserProfile {
    /// Create a new empty profile
    pub fn new() -> Self {
        Self::default()
    }

    pub fn name(&self) -> Option<&str> {
        self.name.as_ref().map(|s| s.value.as_str())
    }

    pub fn gender(&self) -> Option<Gender> {
        self.gender.as_ref().map(|s| s.value)
    }

    pub fn age(&self) -> Option<u8> {
        self.age.as_ref().map(|s| s.value)
    }

    pub fn state(&self) -> Option<&str> {
        self.state.as_ref().map(|s| s.value.as_str())
    }

    /// Confirmation status of a field
    pub fn status(&self, field: Field) -> FieldStatus {
        let confirmed = match field {
            Field::Name => self.name.as_ref().map(|s| s.confirmed),
            Field::Gender => self.gender.as_ref().map(|s| s.confirmed),
            Field::Age => self.age.as_ref().map(|s| s.confirmed),
            Field::State => self.state.as_ref().map(|s| s.confirmed),
        };
        match confirmed {
            None => FieldStatus::Unset,
            Some(false) => FieldStatus::Pending,
            Some(true) => FieldStatus::Confirmed,
        }
    }

    /// Current value of a field as a display string, if set
    pub fn value_string(&self, field: Field) -> Option<String> {
        match field {
            Field::Name => self.name().map(str::to_string),
            Field::Gender => self.gender().map(|g| g.as_str().to_string()),
            Field::Age => self.age().map(|a| a.to_string()),
            Field::State => self.state().map(str::to_string),
        }
    }

    /// Hold a value for a field, pending confirmation
    pub fn set_pending(&mut self, value: FieldValue, source: ChangeSource, turn: usize) {
        let field = value.field();
        let old_value = self.value_string(field);
        let new_value = Some(value.to_string());

        match value {
            FieldValue::Name(v) => self.name = Some(FieldSlot::pending(v, turn)),
            FieldValue::Gender(v) => self.gender = Some(FieldSlot::pending(v, turn)),
            FieldValue::Age(v) => self.age = Some(FieldSlot::pending(v, turn)),
            FieldValue::State(v) => self.state = Some(FieldSlot::pending(v, turn)),
        }

        self.history.push(FieldChange {
            timestamp: Utc::now(),
            field,
            old_value,
            new_value,
            source,
            turn_index: turn,
        });
    }

    /// Confirm the held value for a field. No-op when the field is unset.
    pub fn confirm(&mut self, field: Field, turn: usize) {
        let confirmed = match field {
            Field::Name => self.name.as_mut().map(FieldSlot::confirm).is_some(),
            Field::Gender => self.gender.as_mut().map(FieldSlot::confirm).is_some(),
            Field::Age => self.age.as_mut().map(FieldSlot::confirm).is_some(),
            Field::State => self.state.as_mut().map(FieldSlot::confirm).is_some(),
        };
        if confirmed {
            let value = self.value_string(field);
            self.history.push(FieldChange {
                timestamp: Utc::now(),
                field,
                old_value: value.clone(),
                new_value: value,
                source: ChangeSource::Confirmation,
                turn_index: turn,
            });
        }
    }

    /// Discard the held value for a field
    pub fn clear(&mut self, field: Field) {
        match field {
            Field::Name => self.name = None,
            Field::Gender => self.gender = None,
            Field::Age => self.age = None,
            Field::State => self.state = None,
        }
    }

    /// The next field that still needs to be confirmed, in collection order
    pub fn next_required_field(&self) -> Option<Field> {
        Field::ORDER
            .into_iter()
            .find(|f| self.status(*f) != FieldStatus::Confirmed)
    }

    /// Whether all four fields are confirmed
    pub fn is_complete(&self) -> bool {
        self.next_required_field().is_none()
    }

    /// Change history, oldest first
    pub fn history(&self) -> &[FieldChange] {
        &self.history
    }

    /// Short context string for prompts and logs
    pub fn summary(&self) -> String {
        let mut parts = Vec::new();
        if let Some(name) = self.name() {
            parts.push(format!("Name: {}", name));
        }
        if let Some(gender) = self.gender() {
            parts.push(format!("Gender: {}", gender));
        }
        if let Some(age) = self.age() {
            parts.push(format!("Age: {}", age));
        }
        if let Some(state) = self.state() {
            parts.push(format!("State: {}", state));
        }
        if parts.is_empty() {
            "No information collected yet.".to_string()
        } else {
            parts.join(", ")
        }
    }
}
