//! Core type definitions with validation.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Validation errors for core types.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// The provided value was empty.
    #[error("{field} cannot be empty")]
    Empty { field: &'static str },

    /// Unknown production status string.
    #[error("invalid production status: {value}")]
    InvalidProductionStatus { value: String },
}

/// Generates a validated string ID newtype with common trait implementations.
macro_rules! define_string_id {
    (
        $(#[$meta:meta])*
        $name:ident, $field_name:literal
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        #[serde(try_from = "String", into = "String")]
        pub struct $name(String);

        impl $name {
            /// Creates a new ID after validation.
            pub fn new(id: impl Into<String>) -> Result<Self, ValidationError> {
                let id = id.into();
                if id.is_empty() {
                    return Err(ValidationError::Empty { field: $field_name });
                }
                Ok(Self(id))
            }

            /// Returns the ID as a string slice.
            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl TryFrom<String> for $name {
            type Error = ValidationError;

            fn try_from(value: String) -> Result<Self, Self::Error> {
                Self::new(value)
            }
        }

        impl From<$name> for String {
            fn from(id: $name) -> Self {
                id.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl AsRef<str> for $name {
            fn as_ref(&self) -> &str {
                &self.0
            }
        }
    };
}

define_string_id!(
    /// A validated animal identifier.
    ///
    /// Animal IDs must be non-empty strings. Typically an ear-tag number,
    /// though uniqueness is enforced at the database level.
    AnimalId, "animal ID"
);

define_string_id!(
    /// A validated event identifier.
    ///
    /// Event IDs must be non-empty strings (UUIDs at the storage layer).
    EventId, "event ID"
);

/// Production status of an animal, as maintained by the farm records.
///
/// Statuses other than [`ProductionStatus::Other`] are considered
/// breedable; `Other` covers culled, sold, or unclassified animals.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProductionStatus {
    Heifer,
    Dry,
    Lactating,
    Served,
    Pregnant,
    Other,
}

impl ProductionStatus {
    /// String representation for database storage.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Heifer => "heifer",
            Self::Dry => "dry",
            Self::Lactating => "lactating",
            Self::Served => "served",
            Self::Pregnant => "pregnant",
            Self::Other => "other",
        }
    }

    /// Whether this status permits breeding at all.
    #[must_use]
    pub const fn is_breedable(&self) -> bool {
        !matches!(self, Self::Other)
    }
}

impl fmt::Display for ProductionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for ProductionStatus {
    type Err = ValidationError;

    /// Case-insensitive parse; farm records are hand-entered.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "heifer" => Ok(Self::Heifer),
            "dry" => Ok(Self::Dry),
            "lactating" => Ok(Self::Lactating),
            "served" => Ok(Self::Served),
            "pregnant" => Ok(Self::Pregnant),
            "other" => Ok(Self::Other),
            _ => Err(ValidationError::InvalidProductionStatus {
                value: s.to_string(),
            }),
        }
    }
}

/// Read-only animal facts supplied by the caller.
///
/// The engine never mutates these; production status and birth date are
/// maintained by the record-keeping side of the application.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Animal {
    /// Unique identifier (ear tag).
    pub id: AnimalId,
    /// Optional display name.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// Date of birth.
    pub birth_date: DateTime<Utc>,
    /// Current production status.
    pub production_status: ProductionStatus,
}

/// Whole calendar months elapsed from `start` to `end`.
///
/// Partial months do not count: an animal born on the 20th is one month
/// old on the 20th of the following month, not before. Negative when
/// `end` precedes `start`.
#[must_use]
pub fn whole_months_between(start: DateTime<Utc>, end: DateTime<Utc>) -> i32 {
    use chrono::Datelike;

    let mut months = (end.year() - start.year()) * 12 + (end.month() as i32 - start.month() as i32);
    if end.day() < start.day() {
        months -= 1;
    }
    months
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn dt(y: i32, m: u32, d: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(y, m, d, 12, 0, 0).unwrap()
    }

    #[test]
    fn animal_id_rejects_empty() {
        assert!(AnimalId::new("").is_err());
        assert!(AnimalId::new("DE-1234").is_ok());
    }

    #[test]
    fn animal_id_serde_roundtrip() {
        let id = AnimalId::new("cow-42").unwrap();
        let json = serde_json::to_string(&id).unwrap();
        assert_eq!(json, "\"cow-42\"");
        let parsed: AnimalId = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, id);
    }

    #[test]
    fn animal_id_serde_rejects_empty() {
        let result: Result<AnimalId, _> = serde_json::from_str("\"\"");
        assert!(result.is_err());
    }

    #[test]
    fn production_status_parses_case_insensitively() {
        assert_eq!(
            "Lactating".parse::<ProductionStatus>().unwrap(),
            ProductionStatus::Lactating
        );
        assert_eq!(
            "HEIFER".parse::<ProductionStatus>().unwrap(),
            ProductionStatus::Heifer
        );
        assert!("unicorn".parse::<ProductionStatus>().is_err());
    }

    #[test]
    fn production_status_breedable_set() {
        for status in [
            ProductionStatus::Heifer,
            ProductionStatus::Dry,
            ProductionStatus::Lactating,
            ProductionStatus::Served,
            ProductionStatus::Pregnant,
        ] {
            assert!(status.is_breedable(), "{status} should be breedable");
        }
        assert!(!ProductionStatus::Other.is_breedable());
    }

    #[test]
    fn whole_months_counts_completed_months_only() {
        assert_eq!(whole_months_between(dt(2024, 1, 20), dt(2024, 2, 19)), 0);
        assert_eq!(whole_months_between(dt(2024, 1, 20), dt(2024, 2, 20)), 1);
        assert_eq!(whole_months_between(dt(2022, 6, 1), dt(2025, 6, 1)), 36);
        assert_eq!(whole_months_between(dt(2024, 12, 15), dt(2025, 1, 14)), 0);
    }

    #[test]
    fn whole_months_negative_for_future_birth_date() {
        assert!(whole_months_between(dt(2025, 6, 1), dt(2025, 1, 1)) < 0);
    }
}
