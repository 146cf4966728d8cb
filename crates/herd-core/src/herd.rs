//! Herd-wide batch evaluation.
//!
//! Runs both evaluators over every animal in parallel. The per-animal work
//! is pure and independent, so this is a plain data-parallel map.

use chrono::{DateTime, Utc};
use rayon::prelude::*;

use crate::eligibility::{Eligibility, evaluate_eligibility};
use crate::settings::BreedingSettings;
use crate::timeline::Timeline;
use crate::types::Animal;
use crate::window::{WindowStatus, classify_window};

/// One animal's combined evaluation.
#[derive(Debug, Clone)]
pub struct HerdEntry {
    pub animal: Animal,
    pub eligibility: Eligibility,
    pub window: Option<WindowStatus>,
}

/// Evaluates eligibility and window status for every animal.
///
/// Output is sorted by animal ID so repeated runs over the same input are
/// identical regardless of scheduling.
#[must_use]
pub fn evaluate_herd(
    animals: Vec<(Animal, Timeline)>,
    settings: &BreedingSettings,
    now: DateTime<Utc>,
) -> Vec<HerdEntry> {
    let mut entries: Vec<HerdEntry> = animals
        .into_par_iter()
        .map(|(animal, timeline)| {
            let eligibility = evaluate_eligibility(&animal, settings, &timeline, now);
            let window = classify_window(&timeline, settings, now);
            HerdEntry {
                animal,
                eligibility,
                window,
            }
        })
        .collect();

    entries.sort_by(|a, b| a.animal.id.cmp(&b.animal.id));
    entries
}
