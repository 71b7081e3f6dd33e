//! Centralized constants for the scheme agent
//!
//! Single source of truth for domain constants and default values used
//! across the codebase.

/// The 28 states and 8 union territories of India, canonical spellings.
///
/// State normalization resolves every accepted input to one of these names;
/// scheme location lists are validated against them at compile time of the
/// eligibility predicates.
pub const INDIAN_STATES_AND_UTS: [&str; 36] = [
    "Andhra Pradesh",
    "Arunachal Pradesh",
    "Assam",
    "Bihar",
    "Chhattisgarh",
    "Goa",
    "Gujarat",
    "Haryana",
    "Himachal Pradesh",
    "Jharkhand",
    "Karnataka",
    "Kerala",
    "Madhya Pradesh",
    "Maharashtra",
    "Manipur",
    "Meghalaya",
    "Mizoram",
    "Nagaland",
    "Odisha",
    "Punjab",
    "Rajasthan",
    "Sikkim",
    "Tamil Nadu",
    "Telangana",
    "Tripura",
    "Uttar Pradesh",
    "Uttarakhand",
    "West Bengal",
    "Andaman and Nicobar Islands",
    "Chandigarh",
    "Dadra and Nagar Haveli and Daman and Diu",
    "Delhi",
    "Jammu and Kashmir",
    "Ladakh",
    "Lakshadweep",
    "Puducherry",
];

/// Dialogue flow settings
pub mod dialogue {
    /// Consecutive validation failures on one field before the question
    /// switches to an enumerated-choice prompt
    pub const MAX_FIELD_RETRIES: u32 = 3;

    /// Minimum confidence to hand an extracted candidate to the validator
    pub const MIN_EXTRACTION_CONFIDENCE: f32 = 0.7;

    /// Recent turns included as context in oracle extraction prompts
    pub const HISTORY_WINDOW: usize = 5;

    /// Tokens treated as "yes" in confirmation replies (English + Hindi)
    pub const AFFIRMATIVE_WORDS: [&str; 14] = [
        "yes", "y", "yeah", "yep", "yup", "sure", "correct", "right", "ok", "okay", "haan",
        "ji", "हाँ", "हां",
    ];

    /// Tokens treated as "no" in confirmation replies (English + Hindi)
    pub const NEGATIVE_WORDS: [&str; 8] =
        ["no", "n", "nope", "nah", "nahi", "nahin", "galat", "नहीं"];
}

/// Age plausibility bounds
pub mod age {
    /// Oldest age accepted as plausible
    pub const MAX_PLAUSIBLE_AGE: u8 = 120;
}

/// Fuzzy state-name matching
pub mod fuzzy {
    /// Maximum edit distance relative to the canonical name's length.
    /// 0.34 admits one edit on a three-letter name ("Goa") and scales up
    /// for longer names.
    pub const MAX_NORMALIZED_DISTANCE: f32 = 0.34;

    /// Inputs shorter than this are never fuzzy-matched
    pub const MIN_INPUT_LENGTH: usize = 3;
}

/// Scoring policy for the eligibility matcher
///
/// The weights are the contract (0.40 / 0.30 / 0.30); the curve constants
/// are tunable policy.
pub mod scoring {
    /// Weight of the age fit component
    pub const AGE_WEIGHT: f32 = 0.40;

    /// Weight of the gender fit component
    pub const GENDER_WEIGHT: f32 = 0.30;

    /// Weight of the state fit component
    pub const STATE_WEIGHT: f32 = 0.30;

    /// Fit credited when a scheme is open to all genders / all states:
    /// eligible, but less targeted than an exact match
    pub const BROAD_FIT: f32 = 0.7;

    /// Fraction of the eligible age range treated as the full-credit core
    pub const AGE_CORE_FRACTION: f32 = 2.0 / 3.0;

    /// Age fit at the very edge of the eligible range (filtering already
    /// removed out-of-range ages, so this is the minimum passing fit)
    pub const AGE_FIT_FLOOR: f32 = 0.5;

    /// Additive bonus for schemes narrowly targeted at the exact profile
    pub const SPECIFICITY_BONUS: f32 = 0.05;

    /// An age band narrower than this many years counts as narrow targeting
    pub const NARROW_AGE_SPAN: u8 = 30;
}
