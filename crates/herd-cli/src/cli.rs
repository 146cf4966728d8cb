//! Command-line argument definitions.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// Herd breeding tracker.
///
/// Keeps reproductive event records per animal and derives the current
/// breeding-cycle status: who is in heat, who needs a pregnancy check,
/// who is due to calve.
#[derive(Debug, Parser)]
#[command(name = "herd", version, about, long_about = None)]
pub struct Cli {
    /// Enable verbose output.
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Path to config file.
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

/// Available subcommands.
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Show one animal's status banner and breeding eligibility.
    Status {
        /// The animal's ID (ear tag).
        animal: String,
    },

    /// Show one animal's full reproductive history, newest first.
    History {
        /// The animal's ID (ear tag).
        animal: String,
    },

    /// Herd-wide status overview.
    Overview,

    /// Manage animals.
    Animal {
        #[command(subcommand)]
        action: AnimalAction,
    },

    /// Record a reproductive event.
    Record {
        #[command(subcommand)]
        event: RecordEvent,
    },

    /// Show or change farm breeding settings.
    Settings {
        #[command(subcommand)]
        action: SettingsAction,
    },
}

/// Animal management actions.
#[derive(Debug, Subcommand)]
pub enum AnimalAction {
    /// Register an animal.
    Add {
        /// The animal's ID (ear tag).
        id: String,

        /// Date of birth (YYYY-MM-DD or RFC 3339).
        #[arg(long)]
        born: String,

        /// Production status (heifer, dry, lactating, served, pregnant, other).
        #[arg(long, default_value = "heifer")]
        status: String,

        /// Optional display name.
        #[arg(long)]
        name: Option<String>,
    },

    /// List all animals.
    List,

    /// Change an animal's production status.
    SetStatus {
        /// The animal's ID (ear tag).
        id: String,

        /// New production status.
        status: String,
    },
}

/// Event types that can be recorded.
#[derive(Debug, Subcommand)]
pub enum RecordEvent {
    /// Record a heat detection.
    Heat {
        /// The animal's ID.
        animal: String,

        /// When the heat was observed (default: now).
        #[arg(long)]
        date: Option<String>,

        /// Observed signs (repeatable).
        #[arg(long = "sign")]
        signs: Vec<String>,

        /// Action taken at observation time.
        #[arg(long)]
        action: Option<String>,
    },

    /// Record an insemination.
    Insemination {
        /// The animal's ID.
        animal: String,

        /// Service date (default: now).
        #[arg(long)]
        date: Option<String>,

        /// Method: natural or ai.
        #[arg(long, default_value = "ai")]
        method: String,

        /// Sire or semen straw code.
        #[arg(long)]
        sire: Option<String>,

        /// Estimated due date, if known at entry time.
        #[arg(long)]
        due: Option<String>,
    },

    /// Record a pregnancy check.
    Check {
        /// The animal's ID.
        animal: String,

        /// Result: positive, negative, or inconclusive.
        result: String,

        /// Examination date (default: now).
        #[arg(long)]
        date: Option<String>,

        /// Estimated due date from the examination.
        #[arg(long)]
        due: Option<String>,
    },

    /// Record a calving.
    Calving {
        /// The animal's ID.
        animal: String,

        /// Instant of birth (default: now).
        #[arg(long)]
        date: Option<String>,

        /// The due date the pregnancy carried, for the records.
        #[arg(long)]
        due: Option<String>,

        /// Outcome (normal, assisted, stillborn, ...).
        #[arg(long)]
        outcome: Option<String>,
    },

    /// Import a legacy combined breeding record.
    Breeding {
        /// The animal's ID.
        animal: String,

        /// Breeding date.
        #[arg(long)]
        date: String,

        /// Method: natural or ai.
        #[arg(long, default_value = "natural")]
        method: String,

        /// Pregnancy status: pending, confirmed, negative, aborted, completed.
        #[arg(long, default_value = "pending")]
        status: String,

        /// Expected calving date.
        #[arg(long)]
        expected: Option<String>,

        /// Actual calving date.
        #[arg(long)]
        actual: Option<String>,
    },
}

/// Settings actions.
#[derive(Debug, Subcommand)]
pub enum SettingsAction {
    /// Print current settings.
    Show,

    /// Change one or more settings.
    Set {
        /// Minimum breeding age in months.
        #[arg(long)]
        min_age_months: Option<i32>,

        /// Default gestation period in days.
        #[arg(long)]
        gestation_days: Option<i64>,

        /// Days to wait after service before a pregnancy check.
        #[arg(long)]
        check_wait_days: Option<i64>,

        /// Postpartum breeding delay in days.
        #[arg(long)]
        postpartum_delay_days: Option<i64>,

        /// Offer to schedule a pregnancy check after each insemination.
        #[arg(long)]
        auto_schedule_check: Option<bool>,
    },
}
