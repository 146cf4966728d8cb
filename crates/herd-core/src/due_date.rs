//! Expected-calving-date resolution.
//!
//! Several sources can carry a due date and older data rarely has all of
//! them. Resolution is an explicit ordered list of strategies, first
//! available wins, so the precedence stays auditable and each source is
//! testable in isolation.

use chrono::{DateTime, Duration, Utc};

use crate::settings::BreedingSettings;
use crate::timeline::{ActivePregnancy, Timeline};

type Strategy = fn(&Timeline, &BreedingSettings) -> Option<DateTime<Utc>>;

/// Precedence order: explicit legacy date, then a carried-over calving
/// estimate, then a projection from the latest service.
const STRATEGIES: &[(&str, Strategy)] = &[
    ("active_record_expected_date", from_active_record),
    ("calving_event_estimate", from_calving_estimate),
    ("projected_from_insemination", projected_from_insemination),
];

/// Resolves the authoritative expected calving date, if any source has one.
///
/// Returns `None` when the timeline carries no usable date; the classifier
/// treats that as "pregnant but undated".
#[must_use]
pub fn resolve_due_date(timeline: &Timeline, settings: &BreedingSettings) -> Option<DateTime<Utc>> {
    STRATEGIES.iter().find_map(|(name, strategy)| {
        let resolved = strategy(timeline, settings);
        if let Some(due) = resolved {
            tracing::debug!(strategy = name, due = %due, "resolved due date");
        }
        resolved
    })
}

/// The expected calving date on the active legacy breeding record.
fn from_active_record(timeline: &Timeline, _settings: &BreedingSettings) -> Option<DateTime<Utc>> {
    match timeline.active_pregnancy() {
        Some(ActivePregnancy::LegacyRecord(record)) => record.expected_calving_date,
        _ => None,
    }
}

/// An estimated due date carried on a calving event, newest first.
fn from_calving_estimate(
    timeline: &Timeline,
    _settings: &BreedingSettings,
) -> Option<DateTime<Utc>> {
    timeline
        .calvings()
        .iter()
        .find_map(|c| c.estimated_due_date)
}

/// Latest service date plus the configured gestation period.
fn projected_from_insemination(
    timeline: &Timeline,
    settings: &BreedingSettings,
) -> Option<DateTime<Utc>> {
    timeline
        .latest_insemination()
        .map(|i| i.event_date + Duration::days(settings.default_gestation_period_days))
}
