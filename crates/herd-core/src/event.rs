//! Reproductive event records.
//!
//! Five event shapes feed the engine: the four per-type streams recorded by
//! the current forms (heat, insemination, pregnancy check, calving) and the
//! legacy combined breeding record that older data still arrives in.
//!
//! All records are immutable facts created by the data layer; the engine
//! only reads them.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::types::AnimalId;

/// How a service was performed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InseminationMethod {
    Natural,
    #[serde(rename = "ai")]
    Artificial,
}

impl InseminationMethod {
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Natural => "natural",
            Self::Artificial => "ai",
        }
    }
}

impl std::fmt::Display for InseminationMethod {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for InseminationMethod {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "natural" => Ok(Self::Natural),
            "ai" | "artificial" => Ok(Self::Artificial),
            _ => Err(format!("invalid insemination method: {s}")),
        }
    }
}

/// Outcome of a pregnancy examination.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CheckResult {
    Positive,
    Negative,
    Inconclusive,
}

impl CheckResult {
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Positive => "positive",
            Self::Negative => "negative",
            Self::Inconclusive => "inconclusive",
        }
    }
}

impl std::fmt::Display for CheckResult {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for CheckResult {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "positive" => Ok(Self::Positive),
            "negative" => Ok(Self::Negative),
            "inconclusive" => Ok(Self::Inconclusive),
            _ => Err(format!("invalid check result: {s}")),
        }
    }
}

/// Pregnancy status on a legacy combined breeding record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PregnancyStatus {
    Pending,
    Confirmed,
    Negative,
    Aborted,
    Completed,
}

impl PregnancyStatus {
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Confirmed => "confirmed",
            Self::Negative => "negative",
            Self::Aborted => "aborted",
            Self::Completed => "completed",
        }
    }
}

impl std::fmt::Display for PregnancyStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for PregnancyStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending" => Ok(Self::Pending),
            "confirmed" => Ok(Self::Confirmed),
            "negative" => Ok(Self::Negative),
            "aborted" => Ok(Self::Aborted),
            "completed" => Ok(Self::Completed),
            _ => Err(format!("invalid pregnancy status: {s}")),
        }
    }
}

/// A heat (estrus) detection.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HeatEvent {
    pub animal_id: AnimalId,
    /// When the heat was observed.
    pub event_date: DateTime<Utc>,
    /// When the record was entered, if known.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub recorded_at: Option<DateTime<Utc>>,
    /// Observed heat signs (mounting, restlessness, ...). Non-empty when
    /// the action taken is "breed".
    #[serde(default)]
    pub signs: Vec<String>,
    /// Action taken at observation time, if any.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub action: Option<String>,
}

/// A natural or artificial service.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InseminationEvent {
    pub animal_id: AnimalId,
    /// When the service happened.
    pub event_date: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub recorded_at: Option<DateTime<Utc>>,
    pub method: InseminationMethod,
    /// Sire or semen straw code.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sire_code: Option<String>,
    /// Due date estimated at entry time, if the form provided one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub estimated_due_date: Option<DateTime<Utc>>,
}

/// A pregnancy examination result.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PregnancyCheck {
    pub animal_id: AnimalId,
    /// When the examination was performed.
    pub check_date: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub recorded_at: Option<DateTime<Utc>>,
    pub result: CheckResult,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub estimated_due_date: Option<DateTime<Utc>>,
}

/// A birth event, terminating the pregnancy cycle that preceded it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CalvingEvent {
    pub animal_id: AnimalId,
    /// Instant of birth.
    pub event_date: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub recorded_at: Option<DateTime<Utc>>,
    /// Due date carried over from the pregnancy that preceded this calving.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub estimated_due_date: Option<DateTime<Utc>>,
    /// Free-text outcome (normal, assisted, stillborn, ...).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub outcome: Option<String>,
}

/// A legacy combined breeding record.
///
/// Older data tracked the whole cycle on a single row that was updated in
/// place: bred, then status flipped on check, then the calving date filled
/// in. New data arrives as separate per-type events instead; both shapes
/// are merged by the timeline normalizer.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BreedingRecord {
    pub animal_id: AnimalId,
    pub breeding_date: DateTime<Utc>,
    pub method: InseminationMethod,
    pub pregnancy_status: PregnancyStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expected_calving_date: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub actual_calving_date: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub recorded_at: Option<DateTime<Utc>>,
}

/// Any reproductive event, for merged chronological views.
///
/// The shared accessors let the classifier walk all five streams with one
/// exhaustive match instead of per-type special cases.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ReproEvent {
    Heat(HeatEvent),
    Insemination(InseminationEvent),
    PregnancyCheck(PregnancyCheck),
    Calving(CalvingEvent),
    LegacyRecord(BreedingRecord),
}

impl ReproEvent {
    /// Whether this event moves the breeding cycle forward.
    ///
    /// Calvings close a cycle rather than advance it, so they are excluded.
    #[must_use]
    pub const fn advances_cycle(&self) -> bool {
        !matches!(self, Self::Calving(_))
    }
}

/// Ordering key shared by every event shape.
///
/// "Most recent" compares by entry time when the record carries one and
/// falls back to the event date otherwise, resolved per item so that lists
/// mixing legacy rows (no entry time) with new rows still sort.
pub trait EventOrd {
    /// When the event happened.
    fn event_date(&self) -> DateTime<Utc>;

    /// When the record was entered, if known.
    fn recorded_at(&self) -> Option<DateTime<Utc>>;

    /// The timestamp used for recency comparisons.
    fn effective_timestamp(&self) -> DateTime<Utc> {
        self.recorded_at().unwrap_or_else(|| self.event_date())
    }
}

macro_rules! impl_event_ord {
    ($ty:ty, $date_field:ident) => {
        impl EventOrd for $ty {
            fn event_date(&self) -> DateTime<Utc> {
                self.$date_field
            }

            fn recorded_at(&self) -> Option<DateTime<Utc>> {
                self.recorded_at
            }
        }
    };
}

impl_event_ord!(HeatEvent, event_date);
impl_event_ord!(InseminationEvent, event_date);
impl_event_ord!(PregnancyCheck, check_date);
impl_event_ord!(CalvingEvent, event_date);
impl_event_ord!(BreedingRecord, breeding_date);

impl EventOrd for ReproEvent {
    /// When the event happened in the animal's life (not when it was entered).
    fn event_date(&self) -> DateTime<Utc> {
        match self {
            Self::Heat(e) => e.event_date,
            Self::Insemination(e) => e.event_date,
            Self::PregnancyCheck(e) => e.check_date,
            Self::Calving(e) => e.event_date,
            Self::LegacyRecord(e) => e.breeding_date,
        }
    }

    fn recorded_at(&self) -> Option<DateTime<Utc>> {
        match self {
            Self::Heat(e) => e.recorded_at,
            Self::Insemination(e) => e.recorded_at,
            Self::PregnancyCheck(e) => e.recorded_at,
            Self::Calving(e) => e.recorded_at,
            Self::LegacyRecord(e) => e.recorded_at,
        }
    }
}
