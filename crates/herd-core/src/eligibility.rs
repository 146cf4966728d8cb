//! Breeding eligibility evaluation.
//!
//! Pure function of the animal's facts, the farm thresholds, and the
//! normalized timeline. Every failing check contributes its own reason
//! rather than short-circuiting, so the caller can show the user the full
//! picture at once.

use chrono::{DateTime, Utc};

use crate::event::PregnancyStatus;
use crate::settings::BreedingSettings;
use crate::timeline::Timeline;
use crate::types::{Animal, ProductionStatus, whole_months_between};

/// The outcome of an eligibility evaluation.
///
/// `reasons` are blocking (any entry forces `eligible = false`);
/// `warnings` never block.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize)]
pub struct Eligibility {
    pub eligible: bool,
    pub reasons: Vec<String>,
    pub warnings: Vec<String>,
    /// Whole months from birth to `now`.
    pub age_in_months: i32,
    /// Whole days since the most recent resolved calving, if any.
    pub days_since_calving: Option<i64>,
    /// Heifer with no service history: ready for her first breeding.
    pub is_ready_for_first_service: bool,
    /// Lactating or dry cow clear to be bred again.
    pub is_ready_for_re_service: bool,
}

/// Evaluates whether an animal may be bred right now.
///
/// All checks run unconditionally and collect into `reasons`:
///
/// 1. Age below the configured minimum.
/// 2. Production status outside the breedable set.
/// 3. An active pregnancy on the timeline.
/// 4. Still inside the postpartum recovery period.
///
/// The readiness flags are derived only when no check failed.
#[must_use]
pub fn evaluate_eligibility(
    animal: &Animal,
    settings: &BreedingSettings,
    timeline: &Timeline,
    now: DateTime<Utc>,
) -> Eligibility {
    let mut reasons = Vec::new();
    let mut warnings = Vec::new();

    let age_in_months = whole_months_between(animal.birth_date, now);
    if age_in_months < settings.minimum_breeding_age_months {
        reasons.push(format!(
            "below minimum breeding age ({age_in_months} of {} months)",
            settings.minimum_breeding_age_months
        ));
    }

    if !animal.production_status.is_breedable() {
        reasons.push(format!(
            "production status '{}' does not permit breeding",
            animal.production_status
        ));
    }

    let active_pregnancy = timeline.active_pregnancy().is_some();
    if active_pregnancy {
        reasons.push("an active pregnancy is on record".to_string());
    } else if animal.production_status == ProductionStatus::Pregnant {
        warnings.push(
            "production status is 'pregnant' but no active pregnancy is on record".to_string(),
        );
    }

    let days_since_calving = timeline
        .last_calving_date()
        .map(|calved| (now - calved).num_days());
    if let Some(days) = days_since_calving {
        if days < settings.postpartum_breeding_delay_days {
            reasons.push(format!(
                "in postpartum recovery ({days} of {} days)",
                settings.postpartum_breeding_delay_days
            ));
        }
    }

    let latest_record_pending = timeline
        .latest_breeding_record()
        .is_some_and(|r| r.pregnancy_status == PregnancyStatus::Pending);
    if latest_record_pending {
        warnings.push("latest breeding record is still awaiting a pregnancy check".to_string());
    }

    let eligible = reasons.is_empty();

    let is_ready_for_first_service = eligible
        && animal.production_status == ProductionStatus::Heifer
        && timeline.breeding_records().is_empty()
        && timeline.inseminations().is_empty();

    let postpartum_cleared = days_since_calving
        .is_none_or(|days| days >= settings.postpartum_breeding_delay_days);
    let is_ready_for_re_service = eligible
        && matches!(
            animal.production_status,
            ProductionStatus::Lactating | ProductionStatus::Dry
        )
        && !active_pregnancy
        && !latest_record_pending
        && postpartum_cleared;

    Eligibility {
        eligible,
        reasons,
        warnings,
        age_in_months,
        days_since_calving,
        is_ready_for_first_service,
        is_ready_for_re_service,
    }
}
