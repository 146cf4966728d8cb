//! Breeding cycle state engine.
//!
//! Pure, deterministic evaluation of an animal's reproductive event
//! history against farm-level thresholds:
//! - Timeline normalization: merging legacy combined records with the
//!   per-type event streams
//! - Eligibility: whether the animal may be bred right now
//! - Window classification: the one prioritized status banner to show
//!
//! No I/O, no clocks: `now` is always an explicit parameter, and identical
//! inputs yield identical outputs.

pub mod due_date;
pub mod eligibility;
pub mod event;
pub mod herd;
pub mod settings;
pub mod timeline;
pub mod types;
pub mod window;

pub use due_date::resolve_due_date;
pub use eligibility::{Eligibility, evaluate_eligibility};
pub use event::{
    BreedingRecord, CalvingEvent, CheckResult, EventOrd, HeatEvent, InseminationEvent,
    InseminationMethod, PregnancyCheck, PregnancyStatus, ReproEvent,
};
pub use herd::{HerdEntry, evaluate_herd};
pub use settings::BreedingSettings;
pub use timeline::{ActivePregnancy, Timeline};
pub use types::{Animal, AnimalId, EventId, ProductionStatus, ValidationError};
pub use window::{BannerColor, BreedingAction, HeatPhase, WindowStatus, classify_window};
