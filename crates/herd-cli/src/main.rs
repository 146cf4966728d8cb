use std::io;
use std::path::Path;

use anyhow::{Context, Result};
use chrono::Utc;
use clap::Parser;
use tracing_subscriber::EnvFilter;

use herd_cli::commands::{animals, history, overview, record, settings, status};
use herd_cli::{AnimalAction, Cli, Commands, Config, RecordEvent, SettingsAction};

/// Load config and open database, ensuring the parent directory exists.
fn open_database(config_path: Option<&Path>) -> Result<herd_db::Database> {
    let config = Config::load_from(config_path).context("failed to load configuration")?;
    tracing::debug!(?config, "loaded configuration");

    if let Some(parent) = config.database_path.parent() {
        std::fs::create_dir_all(parent).context("failed to create database directory")?;
    }

    let db = herd_db::Database::open(&config.database_path).context("failed to open database")?;
    Ok(db)
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize tracing with verbose flag support
    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::from_default_env()
    };
    // Use try_init to avoid panic if tracing is already initialized (e.g., in tests)
    let _ = tracing_subscriber::fmt().with_env_filter(filter).try_init();

    let db = open_database(cli.config.as_deref())?;
    let mut stdout = io::stdout().lock();
    let now = Utc::now();

    match &cli.command {
        Commands::Status { animal } => {
            status::run(&mut stdout, &db, animal, now)?;
        }
        Commands::History { animal } => {
            history::run(&mut stdout, &db, animal)?;
        }
        Commands::Overview => {
            overview::run(&mut stdout, &db, now)?;
        }
        Commands::Animal { action } => match action {
            AnimalAction::Add {
                id,
                born,
                status,
                name,
            } => animals::add(&mut stdout, &db, id, born, status, name.clone())?,
            AnimalAction::List => animals::list(&mut stdout, &db)?,
            AnimalAction::SetStatus { id, status } => {
                animals::set_status(&mut stdout, &db, id, status)?;
            }
        },
        Commands::Record { event } => match event {
            RecordEvent::Heat {
                animal,
                date,
                signs,
                action,
            } => record::heat(
                &mut stdout,
                &db,
                animal,
                date.as_deref(),
                signs.clone(),
                action.clone(),
                now,
            )?,
            RecordEvent::Insemination {
                animal,
                date,
                method,
                sire,
                due,
            } => record::insemination(
                &mut stdout,
                &db,
                animal,
                date.as_deref(),
                method,
                sire.clone(),
                due.as_deref(),
                now,
            )?,
            RecordEvent::Check {
                animal,
                result,
                date,
                due,
            } => record::check(
                &mut stdout,
                &db,
                animal,
                result,
                date.as_deref(),
                due.as_deref(),
                now,
            )?,
            RecordEvent::Calving {
                animal,
                date,
                due,
                outcome,
            } => record::calving(
                &mut stdout,
                &db,
                animal,
                date.as_deref(),
                due.as_deref(),
                outcome.clone(),
                now,
            )?,
            RecordEvent::Breeding {
                animal,
                date,
                method,
                status,
                expected,
                actual,
            } => record::breeding(
                &mut stdout,
                &db,
                animal,
                date,
                method,
                status,
                expected.as_deref(),
                actual.as_deref(),
                now,
            )?,
        },
        Commands::Settings { action } => match action {
            SettingsAction::Show => settings::show(&mut stdout, &db)?,
            SettingsAction::Set {
                min_age_months,
                gestation_days,
                check_wait_days,
                postpartum_delay_days,
                auto_schedule_check,
            } => settings::set(
                &mut stdout,
                &db,
                *min_age_months,
                *gestation_days,
                *check_wait_days,
                *postpartum_delay_days,
                *auto_schedule_check,
            )?,
        },
    }

    Ok(())
}
