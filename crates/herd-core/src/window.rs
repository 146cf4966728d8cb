//! Breeding-cycle window classification.
//!
//! Derives the single status banner for an animal right now: which stage
//! of the reproductive cycle she is in, what action (if any) the user
//! should take, and how urgent it is.
//!
//! # Priority chain
//!
//! Exactly one state is returned, evaluated in this order (first match
//! wins):
//!
//! 1. Post-calving recovery (overrides everything, a calving terminates
//!    the preceding cycle)
//! 2. Ready to rebreed
//! 3. Pregnant / calving window
//! 4. Post-insemination, pre-pregnancy-check
//! 5. Heat window
//! 6. No active cycle (`None`)

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

use crate::due_date::resolve_due_date;
use crate::settings::BreedingSettings;
use crate::timeline::Timeline;

/// Heat detections older than this return no window at all.
const HEAT_HARD_CUTOFF_HOURS: i64 = 36;

/// Half-width of the calving window around the due date, in days.
const CALVING_WINDOW_DAYS: i64 = 7;

/// The action a status window asks of the user.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BreedingAction {
    None,
    Breed,
    Check,
    Calving,
}

impl BreedingAction {
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::None => "none",
            Self::Breed => "breed",
            Self::Check => "check",
            Self::Calving => "calving",
        }
    }
}

impl std::fmt::Display for BreedingAction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Banner color for a heat phase.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BannerColor {
    Blue,
    Yellow,
    Green,
    Orange,
    Red,
}

impl BannerColor {
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Blue => "blue",
            Self::Yellow => "yellow",
            Self::Green => "green",
            Self::Orange => "orange",
            Self::Red => "red",
        }
    }
}

impl std::fmt::Display for BannerColor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Phase of an unanswered heat, bucketed by hours elapsed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HeatPhase {
    /// Under 8 hours: too early for best conception odds.
    Early,
    /// 8 to 12 hours: window approaching.
    Approaching,
    /// 12 to 18 hours: the optimal service window.
    Optimal,
    /// Past 18 up to 24 hours: still possible, fading fast.
    Late,
    /// Past 24 hours: window missed, though the detection is still shown
    /// until the 36-hour hard cutoff.
    Expired,
}

impl HeatPhase {
    /// Buckets an elapsed duration since heat detection.
    ///
    /// Callers must apply the 36-hour hard cutoff first; this function
    /// only distinguishes phases below it.
    #[must_use]
    pub fn from_elapsed(elapsed: Duration) -> Self {
        if elapsed < Duration::hours(8) {
            Self::Early
        } else if elapsed < Duration::hours(12) {
            Self::Approaching
        } else if elapsed <= Duration::hours(18) {
            Self::Optimal
        } else if elapsed <= Duration::hours(24) {
            Self::Late
        } else {
            Self::Expired
        }
    }

    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Early => "early",
            Self::Approaching => "approaching",
            Self::Optimal => "optimal",
            Self::Late => "late",
            Self::Expired => "expired",
        }
    }

    #[must_use]
    pub const fn color(&self) -> BannerColor {
        match self {
            Self::Early => BannerColor::Blue,
            Self::Approaching => BannerColor::Yellow,
            Self::Optimal => BannerColor::Green,
            Self::Late => BannerColor::Orange,
            Self::Expired => BannerColor::Red,
        }
    }

    /// Hint for callers deciding whether to offer the breed button.
    ///
    /// The classifier itself still reports `action = breed` for every
    /// phase; suppressing it for `Expired` is the caller's call.
    #[must_use]
    pub const fn is_actionable(&self) -> bool {
        !matches!(self, Self::Expired)
    }
}

impl std::fmt::Display for HeatPhase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The prioritized status window for an animal.
///
/// Each variant carries the numeric fields the caller needs to render the
/// banner without recomputation.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum WindowStatus {
    /// Recovering after a calving; no action until the delay has passed.
    PostCalving {
        days_since_calving: i64,
        days_remaining: i64,
    },
    /// Recovered from calving with nothing started on the next cycle.
    ReadyToRebreed { days_since_calving: i64 },
    /// Within the calving window around the due date.
    Calving {
        due_date: DateTime<Utc>,
        days_until_due: i64,
        message: String,
    },
    /// Pregnant with a due date outside the calving window.
    Pregnant {
        due_date: DateTime<Utc>,
        days_until_due: i64,
        message: String,
    },
    /// Served long enough ago that a pregnancy check is worthwhile.
    ReadyForCheck { days_since_insemination: i64 },
    /// Served recently; waiting out the pregnancy-check delay.
    #[serde(rename = "waiting")]
    WaitingForCheck {
        days_since_insemination: i64,
        days_until_check: i64,
    },
    /// An unanswered heat inside the 36-hour reporting window.
    Heat {
        phase: HeatPhase,
        hours_elapsed: f64,
    },
}

impl WindowStatus {
    /// The action this window asks of the user.
    #[must_use]
    pub const fn action(&self) -> BreedingAction {
        match self {
            Self::PostCalving { .. }
            | Self::ReadyToRebreed { .. }
            | Self::Pregnant { .. }
            | Self::WaitingForCheck { .. } => BreedingAction::None,
            Self::Calving { .. } => BreedingAction::Calving,
            Self::ReadyForCheck { .. } => BreedingAction::Check,
            Self::Heat { .. } => BreedingAction::Breed,
        }
    }

    /// The status tag; heat windows report their phase name.
    #[must_use]
    pub const fn status_str(&self) -> &'static str {
        match self {
            Self::PostCalving { .. } => "post_calving",
            Self::ReadyToRebreed { .. } => "ready_to_rebreed",
            Self::Calving { .. } => "calving",
            Self::Pregnant { .. } => "pregnant",
            Self::ReadyForCheck { .. } => "ready_for_check",
            Self::WaitingForCheck { .. } => "waiting",
            Self::Heat { phase, .. } => phase.as_str(),
        }
    }

    /// Human-readable banner text.
    #[must_use]
    pub fn message(&self) -> String {
        match self {
            Self::PostCalving { days_remaining, .. } => {
                format!("Post-calving recovery, {days_remaining} days remaining")
            }
            Self::ReadyToRebreed { days_since_calving } => {
                format!("Recovered ({days_since_calving} days since calving), ready to rebreed")
            }
            Self::Calving { message, .. } | Self::Pregnant { message, .. } => message.clone(),
            Self::ReadyForCheck {
                days_since_insemination,
            } => format!("Pregnancy check due ({days_since_insemination} days since service)"),
            Self::WaitingForCheck {
                days_until_check, ..
            } => format!("Pregnancy check in {days_until_check} days"),
            Self::Heat {
                phase,
                hours_elapsed,
            } => format!("Heat {:.0}h ago ({} window)", hours_elapsed, phase.as_str()),
        }
    }
}

/// Classifies the animal's current breeding-cycle window.
///
/// Pure function of the normalized timeline, the farm thresholds, and the
/// caller-supplied `now`. Returns `None` when there is no active cycle or
/// the data is too ambiguous to say anything useful.
#[must_use]
pub fn classify_window(
    timeline: &Timeline,
    settings: &BreedingSettings,
    now: DateTime<Utc>,
) -> Option<WindowStatus> {
    // Rules 1 and 2: a calving event always terminates the cycle that
    // preceded it, so it outranks even a confirmed pregnancy record.
    if let Some(calving) = timeline.latest_calving() {
        let days_since_calving = (now - calving.event_date).num_days();
        if days_since_calving < settings.postpartum_breeding_delay_days {
            return Some(WindowStatus::PostCalving {
                days_since_calving,
                days_remaining: settings.postpartum_breeding_delay_days - days_since_calving,
            });
        }
        if !timeline.has_cycle_advancing_event_after(calving.event_date) {
            return Some(WindowStatus::ReadyToRebreed { days_since_calving });
        }
    }

    // Rule 3: once a pregnancy is active the outcome is final here, even
    // when no due date can be resolved (ambiguous, left to the caller).
    if timeline.active_pregnancy().is_some() {
        return classify_pregnancy(timeline, settings, now);
    }

    // Rule 4: served, no check recorded since.
    if let Some(service) = timeline.latest_insemination() {
        let checked_since = timeline
            .pregnancy_checks()
            .iter()
            .any(|c| c.check_date > service.event_date);
        if !checked_since {
            let days_since_insemination = (now - service.event_date).num_days();
            if days_since_insemination > settings.default_gestation_period_days {
                // Window silently expired; pregnancy would be evident by
                // now or the cycle was abandoned.
                return None;
            }
            if days_since_insemination >= settings.pregnancy_check_wait_days {
                return Some(WindowStatus::ReadyForCheck {
                    days_since_insemination,
                });
            }
            return Some(WindowStatus::WaitingForCheck {
                days_since_insemination,
                days_until_check: settings.pregnancy_check_wait_days - days_since_insemination,
            });
        }
    }

    // Rule 5: an unanswered heat.
    if let Some(heat) = timeline.latest_heat() {
        let heat_day = heat.event_date.date_naive();
        let responded = timeline
            .inseminations()
            .iter()
            .any(|i| i.event_date.date_naive() >= heat_day)
            || timeline
                .breeding_records()
                .iter()
                .any(|r| r.breeding_date.date_naive() >= heat_day);
        if responded {
            return None;
        }

        let elapsed = now - heat.event_date;
        if elapsed >= Duration::hours(HEAT_HARD_CUTOFF_HOURS) {
            return None;
        }
        #[expect(
            clippy::cast_precision_loss,
            reason = "elapsed minutes fit comfortably in f64"
        )]
        let hours_elapsed = elapsed.num_minutes() as f64 / 60.0;
        return Some(WindowStatus::Heat {
            phase: HeatPhase::from_elapsed(elapsed),
            hours_elapsed,
        });
    }

    // Rule 6: no active cycle.
    None
}

fn classify_pregnancy(
    timeline: &Timeline,
    settings: &BreedingSettings,
    now: DateTime<Utc>,
) -> Option<WindowStatus> {
    let due_date = resolve_due_date(timeline, settings)?;
    let days_until_due = (due_date.date_naive() - now.date_naive()).num_days();
    let message = due_message(due_date, days_until_due, now);

    if days_until_due.abs() <= CALVING_WINDOW_DAYS {
        Some(WindowStatus::Calving {
            due_date,
            days_until_due,
            message,
        })
    } else {
        Some(WindowStatus::Pregnant {
            due_date,
            days_until_due,
            message,
        })
    }
}

/// Banner text for a resolved due date.
///
/// Day-of comparisons are calendar-day based so "Due Today" holds for the
/// whole due day; once the due day has passed, overdue is measured from
/// the due instant (hours under a full day, days after).
fn due_message(due_date: DateTime<Utc>, days_until_due: i64, now: DateTime<Utc>) -> String {
    if days_until_due > 1 {
        return format!("Due in {days_until_due} days");
    }
    if days_until_due == 1 {
        return "Due Tomorrow".to_string();
    }
    if days_until_due == 0 {
        return "Due Today".to_string();
    }

    let overdue = now - due_date;
    if overdue < Duration::hours(24) {
        format!("Overdue by {} hours", overdue.num_hours().max(0))
    } else {
        format!("Overdue by {} days", overdue.num_days())
    }
}
