//! Scheme catalog records and load-time validation
//!
//! The catalog is loaded once before any session begins and is read-only for
//! the life of the process. Records that fail integrity checks are excluded
//! with a warning rather than failing the load; the load only errors when no
//! usable record remains.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::language::Language;

/// Sentinel used in demographic lists to mean "no restriction"
pub const ALL_SENTINEL: &str = "All";

/// Catalog errors
#[derive(Error, Debug)]
pub enum CatalogError {
    #[error("Failed to parse catalog: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("Catalog unusable: no valid records ({rejected} rejected)")]
    Unusable { rejected: usize },
}

/// Demographic targeting block of a scheme record
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TargetDemographics {
    /// Minimum eligible age, inclusive
    pub min_age: Option<u8>,
    /// Maximum eligible age, inclusive
    pub max_age: Option<u8>,
    /// Eligible genders, or the "All" sentinel
    #[serde(default)]
    pub gender: Vec<String>,
    /// Income categories (free-text tags), or "All"
    #[serde(default)]
    pub income: Vec<String>,
    /// Eligible states/UTs, or the "All" sentinel
    #[serde(default)]
    pub location: Vec<String>,
}

/// One immutable catalog entry
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SchemeRecord {
    pub id: String,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name_hi: Option<String>,
    #[serde(default)]
    pub description: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description_hi: Option<String>,
    #[serde(default)]
    pub eligibility: String,
    #[serde(default)]
    pub benefits: String,
    #[serde(default)]
    pub how_to_apply: String,
    #[serde(default)]
    pub link: String,
    #[serde(default)]
    pub category: String,
    #[serde(default)]
    pub implementing_agency: String,
    #[serde(default)]
    pub target_demographics: TargetDemographics,
}

impl SchemeRecord {
    /// Display name honoring the session language
    pub fn display_name(&self, language: Language) -> &str {
        match language {
            Language::Hindi => self.name_hi.as_deref().unwrap_or(&self.name),
            Language::English => &self.name,
        }
    }

    /// Display description honoring the session language
    pub fn display_description(&self, language: Language) -> &str {
        match language {
            Language::Hindi => self.description_hi.as_deref().unwrap_or(&self.description),
            Language::English => &self.description,
        }
    }

    /// Whether the record passes integrity checks
    fn is_valid(&self) -> bool {
        if self.id.trim().is_empty() {
            return false;
        }
        if let (Some(min), Some(max)) = (self.target_demographics.min_age, self.target_demographics.max_age) {
            if min > max {
                return false;
            }
        }
        true
    }
}

/// Read-only scheme catalog, shared across sessions
#[derive(Debug, Clone)]
pub struct Catalog {
    schemes: Vec<SchemeRecord>,
}

impl Catalog {
    /// Build a catalog from already-deserialized records, excluding any that
    /// fail integrity checks. Duplicate ids keep the first occurrence.
    pub fn new(records: Vec<SchemeRecord>) -> Result<Self, CatalogError> {
        let total = records.len();
        let mut schemes: Vec<SchemeRecord> = Vec::with_capacity(total);

        for record in records {
            if !record.is_valid() {
                tracing::warn!(
                    scheme_id = %record.id,
                    scheme_name = %record.name,
                    "Excluding malformed scheme record"
                );
                continue;
            }
            if schemes.iter().any(|s| s.id == record.id) {
                tracing::warn!(scheme_id = %record.id, "Excluding duplicate scheme id");
                continue;
            }
            schemes.push(record);
        }

        if schemes.is_empty() {
            return Err(CatalogError::Unusable { rejected: total });
        }

        tracing::info!(
            loaded = schemes.len(),
            rejected = total - schemes.len(),
            "Catalog loaded"
        );
        Ok(Self { schemes })
    }

    /// Load from a JSON array of scheme records
    pub fn from_json_str(json: &str) -> Result<Self, CatalogError> {
        let records: Vec<SchemeRecord> = serde_json::from_str(json)?;
        Self::new(records)
    }

    /// Number of usable records
    pub fn len(&self) -> usize {
        self.schemes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.schemes.is_empty()
    }

    /// Records in catalog insertion order
    pub fn iter(&self) -> impl Iterator<Item = &SchemeRecord> {
        self.schemes.iter()
    }

    /// Look up a record by id
    pub fn get(&self, id: &str) -> Option<&SchemeRecord> {
        self.schemes.iter().find(|s| s.id == id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(id: &str, min_age: u8, max_age: u8) -> SchemeRecord {
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
                min_age: Some(min_age),
                max_age: Some(max_age),
                gender: vec![ALL_SENTINEL.to_string()],
                income: vec![ALL_SENTINEL.to_string()],
                location: vec![ALL_SENTINEL.to_string()],
            },
        }
    }

    #[test]
    fn test_load_from_json() {
        let json = r#"[
            {
                "id": "pmjdy",
                "name": "Pradhan Mantri Jan Dhan Yojana",
                "target_demographics": {
                    "min_age": 10,
                    "max_age": 120,
                    "gender": ["All"],
                    "income": ["All"],
                    "location": ["All"]
                }
            }
        ]"#;
        let catalog = Catalog::from_json_str(json).unwrap();
        assert_eq!(catalog.len(), 1);
        assert!(catalog.get("pmjdy").is_some());
    }

    #[test]
    fn test_malformed_record_excluded() {
        // min_age > max_age violates integrity; the other record survives
        let records = vec![record("good", 18, 40), record("bad", 60, 10)];
        let catalog = Catalog::new(records).unwrap();
        assert_eq!(catalog.len(), 1);
        assert!(catalog.get("bad").is_none());
    }

    #[test]
    fn test_duplicate_id_keeps_first() {
        let mut second = record("pmjdy", 0, 120);
        second.name = "Duplicate".to_string();
        let catalog = Catalog::new(vec![record("pmjdy", 10, 120), second]).unwrap();
        assert_eq!(catalog.len(), 1);
        assert_eq!(catalog.get("pmjdy").unwrap().name, "PMJDY");
    }

    #[test]
    fn test_unusable_catalog_errors() {
        let result = Catalog::new(vec![record("bad", 60, 10)]);
        assert!(matches!(result, Err(CatalogError::Unusable { rejected: 1 })));
    }

    #[test]
    fn test_display_fields_fall_back_to_english() {
        let mut rec = record("ssy", 0, 10);
        rec.name = "Sukanya Samriddhi Yojana".to_string();
        rec.name_hi = Some("सुकन्या समृद्धि योजना".to_string());
        assert_eq!(rec.display_name(Language::Hindi), "सुकन्या समृद्धि योजना");
        assert_eq!(rec.display_name(Language::English), "Sukanya Samriddhi Yojana");
        // No Hindi description provided: fall back
        assert_eq!(rec.display_description(Language::Hindi), "");
    }
}
