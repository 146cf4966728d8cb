//! Storage layer for the herd tracker.
//!
//! Provides persistence for animals, reproductive events, legacy breeding
//! records, and the farm settings row using `rusqlite`.
//!
//! # Thread Safety
//!
//! The [`Database`] type wraps a `rusqlite::Connection`, which is `Send`
//! but not `Sync`. For multi-threaded access wrap it in a `Mutex` or use
//! one instance per thread.
//!
//! # Schema
//!
//! Timestamps are stored as TEXT in RFC 3339 format (always UTC), so
//! lexicographic ordering matches chronological ordering and rows stay
//! human-readable. Heat signs are stored as a JSON array in a TEXT column.
//! Rows come back as herd-core domain types; the engine itself never sees
//! this layer.

use std::path::Path;

use chrono::{DateTime, SecondsFormat, Utc};
use rusqlite::{Connection, OptionalExtension, params};
use thiserror::Error;
use uuid::Uuid;

use herd_core::{
    Animal, AnimalId, BreedingRecord, BreedingSettings, CalvingEvent, HeatEvent,
    InseminationEvent, PregnancyCheck,
};

/// Database errors.
#[derive(Debug, Error)]
pub enum DbError {
    /// An error from the underlying database.
    #[error("sqlite error: {0}")]
    Sqlite(#[from] rusqlite::Error),
    /// Failed to parse a stored timestamp.
    #[error("invalid timestamp on row {row_id}: {timestamp}")]
    TimestampParse {
        row_id: String,
        timestamp: String,
        #[source]
        source: chrono::ParseError,
    },
    /// A stored enum or ID value is not valid.
    #[error("invalid value on row {row_id}: {message}")]
    InvalidValue { row_id: String, message: String },
    /// The requested animal does not exist.
    #[error("no animal with ID {0}")]
    AnimalNotFound(String),
}

/// The unsorted event arrays for one animal, as herd-core's timeline
/// normalizer expects them.
#[derive(Debug, Clone, Default)]
pub struct RawTimeline {
    pub heats: Vec<HeatEvent>,
    pub inseminations: Vec<InseminationEvent>,
    pub pregnancy_checks: Vec<PregnancyCheck>,
    pub calvings: Vec<CalvingEvent>,
    pub breeding_records: Vec<BreedingRecord>,
}

/// Database connection wrapper.
///
/// See the [module documentation](self) for thread safety considerations.
pub struct Database {
    conn: Connection,
}

impl Database {
    /// Opens a database at the given path, creating it if necessary.
    ///
    /// The schema is initialized automatically on first open.
    pub fn open(path: &Path) -> Result<Self, DbError> {
        let conn = Connection::open(path)?;
        let db = Self { conn };
        db.init()?;
        Ok(db)
    }

    /// Opens an in-memory database.
    ///
    /// Useful for testing. The database is destroyed when the connection
    /// closes.
    pub fn open_in_memory() -> Result<Self, DbError> {
        let conn = Connection::open_in_memory()?;
        let db = Self { conn };
        db.init()?;
        Ok(db)
    }

    /// Initializes the database schema.
    ///
    /// Idempotent, safe to call on an already-initialized database.
    fn init(&self) -> Result<(), DbError> {
        self.conn.execute_batch("PRAGMA foreign_keys = ON;")?;
        self.conn.execute_batch(
            "
            CREATE TABLE IF NOT EXISTS animals (
                id TEXT PRIMARY KEY,
                name TEXT,
                birth_date TEXT NOT NULL,
                production_status TEXT NOT NULL
            );

            CREATE TABLE IF NOT EXISTS heat_events (
                id TEXT PRIMARY KEY,
                animal_id TEXT NOT NULL,
                event_date TEXT NOT NULL,
                recorded_at TEXT,
                signs TEXT NOT NULL,
                action TEXT,
                FOREIGN KEY (animal_id) REFERENCES animals(id) ON DELETE CASCADE
            );

            CREATE TABLE IF NOT EXISTS inseminations (
                id TEXT PRIMARY KEY,
                animal_id TEXT NOT NULL,
                event_date TEXT NOT NULL,
                recorded_at TEXT,
                method TEXT NOT NULL,
                sire_code TEXT,
                estimated_due_date TEXT,
                FOREIGN KEY (animal_id) REFERENCES animals(id) ON DELETE CASCADE
            );

            CREATE TABLE IF NOT EXISTS pregnancy_checks (
                id TEXT PRIMARY KEY,
                animal_id TEXT NOT NULL,
                check_date TEXT NOT NULL,
                recorded_at TEXT,
                result TEXT NOT NULL,
                estimated_due_date TEXT,
                FOREIGN KEY (animal_id) REFERENCES animals(id) ON DELETE CASCADE
            );

            CREATE TABLE IF NOT EXISTS calving_events (
                id TEXT PRIMARY KEY,
                animal_id TEXT NOT NULL,
                event_date TEXT NOT NULL,
                recorded_at TEXT,
                estimated_due_date TEXT,
                outcome TEXT,
                FOREIGN KEY (animal_id) REFERENCES animals(id) ON DELETE CASCADE
            );

            CREATE TABLE IF NOT EXISTS breeding_records (
                id TEXT PRIMARY KEY,
                animal_id TEXT NOT NULL,
                breeding_date TEXT NOT NULL,
                method TEXT NOT NULL,
                pregnancy_status TEXT NOT NULL,
                expected_calving_date TEXT,
                actual_calving_date TEXT,
                recorded_at TEXT,
                FOREIGN KEY (animal_id) REFERENCES animals(id) ON DELETE CASCADE
            );

            CREATE TABLE IF NOT EXISTS settings (
                id INTEGER PRIMARY KEY CHECK (id = 1),
                minimum_breeding_age_months INTEGER NOT NULL,
                default_gestation_period_days INTEGER NOT NULL,
                pregnancy_check_wait_days INTEGER NOT NULL,
                postpartum_breeding_delay_days INTEGER NOT NULL,
                auto_schedule_pregnancy_check INTEGER NOT NULL
            );

            CREATE INDEX IF NOT EXISTS idx_heat_animal ON heat_events(animal_id);
            CREATE INDEX IF NOT EXISTS idx_insemination_animal ON inseminations(animal_id);
            CREATE INDEX IF NOT EXISTS idx_check_animal ON pregnancy_checks(animal_id);
            CREATE INDEX IF NOT EXISTS idx_calving_animal ON calving_events(animal_id);
            CREATE INDEX IF NOT EXISTS idx_record_animal ON breeding_records(animal_id);
            ",
        )?;
        Ok(())
    }

    /// Registers an animal, replacing any existing row with the same ID.
    pub fn insert_animal(&self, animal: &Animal) -> Result<(), DbError> {
        self.conn.execute(
            "INSERT OR REPLACE INTO animals (id, name, birth_date, production_status)
             VALUES (?, ?, ?, ?)",
            params![
                animal.id.as_str(),
                animal.name,
                format_timestamp(animal.birth_date),
                animal.production_status.as_str(),
            ],
        )?;
        tracing::debug!(animal = %animal.id, "registered animal");
        Ok(())
    }

    /// Fetches one animal.
    pub fn get_animal(&self, id: &AnimalId) -> Result<Animal, DbError> {
        self.conn
            .query_row(
                "SELECT id, name, birth_date, production_status FROM animals WHERE id = ?",
                params![id.as_str()],
                animal_from_row,
            )
            .optional()?
            .ok_or_else(|| DbError::AnimalNotFound(id.to_string()))?
    }

    /// Lists all animals ordered by ID.
    pub fn list_animals(&self) -> Result<Vec<Animal>, DbError> {
        let mut stmt = self.conn.prepare(
            "SELECT id, name, birth_date, production_status FROM animals ORDER BY id ASC",
        )?;
        let rows = stmt.query_map([], animal_from_row)?;
        let mut animals = Vec::new();
        for row in rows {
            animals.push(row??);
        }
        Ok(animals)
    }

    /// Updates an animal's production status.
    pub fn update_production_status(
        &self,
        id: &AnimalId,
        status: herd_core::ProductionStatus,
    ) -> Result<(), DbError> {
        let changed = self.conn.execute(
            "UPDATE animals SET production_status = ? WHERE id = ?",
            params![status.as_str(), id.as_str()],
        )?;
        if changed == 0 {
            return Err(DbError::AnimalNotFound(id.to_string()));
        }
        Ok(())
    }

    /// Records a heat detection.
    pub fn insert_heat(&self, event: &HeatEvent) -> Result<(), DbError> {
        let signs = serde_json::to_string(&event.signs)
            .unwrap_or_else(|_| "[]".to_string());
        self.conn.execute(
            "INSERT INTO heat_events (id, animal_id, event_date, recorded_at, signs, action)
             VALUES (?, ?, ?, ?, ?, ?)",
            params![
                new_row_id(),
                event.animal_id.as_str(),
                format_timestamp(event.event_date),
                event.recorded_at.map(format_timestamp),
                signs,
                event.action,
            ],
        )?;
        tracing::debug!(animal = %event.animal_id, "recorded heat");
        Ok(())
    }

    /// Records an insemination.
    pub fn insert_insemination(&self, event: &InseminationEvent) -> Result<(), DbError> {
        self.conn.execute(
            "INSERT INTO inseminations
             (id, animal_id, event_date, recorded_at, method, sire_code, estimated_due_date)
             VALUES (?, ?, ?, ?, ?, ?, ?)",
            params![
                new_row_id(),
                event.animal_id.as_str(),
                format_timestamp(event.event_date),
                event.recorded_at.map(format_timestamp),
                event.method.as_str(),
                event.sire_code,
                event.estimated_due_date.map(format_timestamp),
            ],
        )?;
        tracing::debug!(animal = %event.animal_id, "recorded insemination");
        Ok(())
    }

    /// Records a pregnancy check.
    pub fn insert_pregnancy_check(&self, event: &PregnancyCheck) -> Result<(), DbError> {
        self.conn.execute(
            "INSERT INTO pregnancy_checks
             (id, animal_id, check_date, recorded_at, result, estimated_due_date)
             VALUES (?, ?, ?, ?, ?, ?)",
            params![
                new_row_id(),
                event.animal_id.as_str(),
                format_timestamp(event.check_date),
                event.recorded_at.map(format_timestamp),
                event.result.as_str(),
                event.estimated_due_date.map(format_timestamp),
            ],
        )?;
        tracing::debug!(animal = %event.animal_id, result = %event.result, "recorded pregnancy check");
        Ok(())
    }

    /// Records a calving.
    pub fn insert_calving(&self, event: &CalvingEvent) -> Result<(), DbError> {
        self.conn.execute(
            "INSERT INTO calving_events
             (id, animal_id, event_date, recorded_at, estimated_due_date, outcome)
             VALUES (?, ?, ?, ?, ?, ?)",
            params![
                new_row_id(),
                event.animal_id.as_str(),
                format_timestamp(event.event_date),
                event.recorded_at.map(format_timestamp),
                event.estimated_due_date.map(format_timestamp),
                event.outcome,
            ],
        )?;
        tracing::debug!(animal = %event.animal_id, "recorded calving");
        Ok(())
    }

    /// Imports a legacy combined breeding record.
    pub fn insert_breeding_record(&self, record: &BreedingRecord) -> Result<(), DbError> {
        self.conn.execute(
            "INSERT INTO breeding_records
             (id, animal_id, breeding_date, method, pregnancy_status,
              expected_calving_date, actual_calving_date, recorded_at)
             VALUES (?, ?, ?, ?, ?, ?, ?, ?)",
            params![
                new_row_id(),
                record.animal_id.as_str(),
                format_timestamp(record.breeding_date),
                record.method.as_str(),
                record.pregnancy_status.as_str(),
                record.expected_calving_date.map(format_timestamp),
                record.actual_calving_date.map(format_timestamp),
                record.recorded_at.map(format_timestamp),
            ],
        )?;
        tracing::debug!(animal = %record.animal_id, "imported legacy breeding record");
        Ok(())
    }

    /// Loads the unsorted event arrays for one animal.
    ///
    /// Rows come back in insertion order; sorting is the timeline
    /// normalizer's job.
    pub fn raw_timeline(&self, animal_id: &AnimalId) -> Result<RawTimeline, DbError> {
        let mut timeline = RawTimeline::default();

        let mut stmt = self.conn.prepare(
            "SELECT id, animal_id, event_date, recorded_at, signs, action
             FROM heat_events WHERE animal_id = ? ORDER BY rowid ASC",
        )?;
        let rows = stmt.query_map(params![animal_id.as_str()], |row| {
            Ok((
                row.get::<_, String>(0)?,
                row.get::<_, String>(1)?,
                row.get::<_, String>(2)?,
                row.get::<_, Option<String>>(3)?,
                row.get::<_, String>(4)?,
                row.get::<_, Option<String>>(5)?,
            ))
        })?;
        for row in rows {
            let (id, animal, event_date, recorded_at, signs, action) = row?;
            timeline.heats.push(HeatEvent {
                animal_id: parse_animal_id(&animal, &id)?,
                event_date: parse_timestamp(&event_date, &id)?,
                recorded_at: parse_optional_timestamp(recorded_at.as_deref(), &id)?,
                signs: serde_json::from_str(&signs).map_err(|e| DbError::InvalidValue {
                    row_id: id.clone(),
                    message: format!("bad signs payload: {e}"),
                })?,
                action,
            });
        }

        let mut stmt = self.conn.prepare(
            "SELECT id, animal_id, event_date, recorded_at, method, sire_code, estimated_due_date
             FROM inseminations WHERE animal_id = ? ORDER BY rowid ASC",
        )?;
        let rows = stmt.query_map(params![animal_id.as_str()], |row| {
            Ok((
                row.get::<_, String>(0)?,
                row.get::<_, String>(1)?,
                row.get::<_, String>(2)?,
                row.get::<_, Option<String>>(3)?,
                row.get::<_, String>(4)?,
                row.get::<_, Option<String>>(5)?,
                row.get::<_, Option<String>>(6)?,
            ))
        })?;
        for row in rows {
            let (id, animal, event_date, recorded_at, method, sire_code, due) = row?;
            timeline.inseminations.push(InseminationEvent {
                animal_id: parse_animal_id(&animal, &id)?,
                event_date: parse_timestamp(&event_date, &id)?,
                recorded_at: parse_optional_timestamp(recorded_at.as_deref(), &id)?,
                method: parse_value(&method, &id)?,
                sire_code,
                estimated_due_date: parse_optional_timestamp(due.as_deref(), &id)?,
            });
        }

        let mut stmt = self.conn.prepare(
            "SELECT id, animal_id, check_date, recorded_at, result, estimated_due_date
             FROM pregnancy_checks WHERE animal_id = ? ORDER BY rowid ASC",
        )?;
        let rows = stmt.query_map(params![animal_id.as_str()], |row| {
            Ok((
                row.get::<_, String>(0)?,
                row.get::<_, String>(1)?,
                row.get::<_, String>(2)?,
                row.get::<_, Option<String>>(3)?,
                row.get::<_, String>(4)?,
                row.get::<_, Option<String>>(5)?,
            ))
        })?;
        for row in rows {
            let (id, animal, check_date, recorded_at, result, due) = row?;
            timeline.pregnancy_checks.push(PregnancyCheck {
                animal_id: parse_animal_id(&animal, &id)?,
                check_date: parse_timestamp(&check_date, &id)?,
                recorded_at: parse_optional_timestamp(recorded_at.as_deref(), &id)?,
                result: parse_value(&result, &id)?,
                estimated_due_date: parse_optional_timestamp(due.as_deref(), &id)?,
            });
        }

        let mut stmt = self.conn.prepare(
            "SELECT id, animal_id, event_date, recorded_at, estimated_due_date, outcome
             FROM calving_events WHERE animal_id = ? ORDER BY rowid ASC",
        )?;
        let rows = stmt.query_map(params![animal_id.as_str()], |row| {
            Ok((
                row.get::<_, String>(0)?,
                row.get::<_, String>(1)?,
                row.get::<_, String>(2)?,
                row.get::<_, Option<String>>(3)?,
                row.get::<_, Option<String>>(4)?,
                row.get::<_, Option<String>>(5)?,
            ))
        })?;
        for row in rows {
            let (id, animal, event_date, recorded_at, due, outcome) = row?;
            timeline.calvings.push(CalvingEvent {
                animal_id: parse_animal_id(&animal, &id)?,
                event_date: parse_timestamp(&event_date, &id)?,
                recorded_at: parse_optional_timestamp(recorded_at.as_deref(), &id)?,
                estimated_due_date: parse_optional_timestamp(due.as_deref(), &id)?,
                outcome,
            });
        }

        let mut stmt = self.conn.prepare(
            "SELECT id, animal_id, breeding_date, method, pregnancy_status,
                    expected_calving_date, actual_calving_date, recorded_at
             FROM breeding_records WHERE animal_id = ? ORDER BY rowid ASC",
        )?;
        let rows = stmt.query_map(params![animal_id.as_str()], |row| {
            Ok((
                row.get::<_, String>(0)?,
                row.get::<_, String>(1)?,
                row.get::<_, String>(2)?,
                row.get::<_, String>(3)?,
                row.get::<_, String>(4)?,
                row.get::<_, Option<String>>(5)?,
                row.get::<_, Option<String>>(6)?,
                row.get::<_, Option<String>>(7)?,
            ))
        })?;
        for row in rows {
            let (id, animal, breeding_date, method, status, expected, actual, recorded_at) = row?;
            timeline.breeding_records.push(BreedingRecord {
                animal_id: parse_animal_id(&animal, &id)?,
                breeding_date: parse_timestamp(&breeding_date, &id)?,
                method: parse_value(&method, &id)?,
                pregnancy_status: parse_value(&status, &id)?,
                expected_calving_date: parse_optional_timestamp(expected.as_deref(), &id)?,
                actual_calving_date: parse_optional_timestamp(actual.as_deref(), &id)?,
                recorded_at: parse_optional_timestamp(recorded_at.as_deref(), &id)?,
            });
        }

        Ok(timeline)
    }

    /// Loads the farm settings, falling back to defaults when the row is
    /// missing.
    pub fn load_settings(&self) -> Result<BreedingSettings, DbError> {
        let row = self
            .conn
            .query_row(
                "SELECT minimum_breeding_age_months, default_gestation_period_days,
                        pregnancy_check_wait_days, postpartum_breeding_delay_days,
                        auto_schedule_pregnancy_check
                 FROM settings WHERE id = 1",
                [],
                |row| {
                    Ok(BreedingSettings {
                        minimum_breeding_age_months: row.get(0)?,
                        default_gestation_period_days: row.get(1)?,
                        pregnancy_check_wait_days: row.get(2)?,
                        postpartum_breeding_delay_days: row.get(3)?,
                        auto_schedule_pregnancy_check: row.get::<_, i64>(4)? != 0,
                    })
                },
            )
            .optional()?;
        Ok(row.unwrap_or_default())
    }

    /// Saves the farm settings (single row, id = 1).
    pub fn save_settings(&self, settings: &BreedingSettings) -> Result<(), DbError> {
        self.conn.execute(
            "INSERT OR REPLACE INTO settings
             (id, minimum_breeding_age_months, default_gestation_period_days,
              pregnancy_check_wait_days, postpartum_breeding_delay_days,
              auto_schedule_pregnancy_check)
             VALUES (1, ?, ?, ?, ?, ?)",
            params![
                settings.minimum_breeding_age_months,
                settings.default_gestation_period_days,
                settings.pregnancy_check_wait_days,
                settings.postpartum_breeding_delay_days,
                i64::from(settings.auto_schedule_pregnancy_check),
            ],
        )?;
        tracing::debug!("saved breeding settings");
        Ok(())
    }
}

fn new_row_id() -> String {
    Uuid::new_v4().to_string()
}

fn animal_from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Result<Animal, DbError>> {
    let id: String = row.get(0)?;
    let name: Option<String> = row.get(1)?;
    let birth_date: String = row.get(2)?;
    let status: String = row.get(3)?;
    Ok(build_animal(id, name, &birth_date, &status))
}

fn build_animal(
    id: String,
    name: Option<String>,
    birth_date: &str,
    status: &str,
) -> Result<Animal, DbError> {
    let birth_date = parse_timestamp(birth_date, &id)?;
    let production_status = parse_value(status, &id)?;
    let animal_id = parse_animal_id(&id, &id)?;
    Ok(Animal {
        id: animal_id,
        name,
        birth_date,
        production_status,
    })
}

fn parse_animal_id(value: &str, row_id: &str) -> Result<AnimalId, DbError> {
    AnimalId::new(value).map_err(|e| DbError::InvalidValue {
        row_id: row_id.to_string(),
        message: e.to_string(),
    })
}

fn parse_value<T>(value: &str, row_id: &str) -> Result<T, DbError>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    value.parse().map_err(|e: T::Err| DbError::InvalidValue {
        row_id: row_id.to_string(),
        message: e.to_string(),
    })
}

fn parse_timestamp(timestamp: &str, row_id: &str) -> Result<DateTime<Utc>, DbError> {
    DateTime::parse_from_rfc3339(timestamp)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|source| DbError::TimestampParse {
            row_id: row_id.to_string(),
            timestamp: timestamp.to_string(),
            source,
        })
}

fn parse_optional_timestamp(
    timestamp: Option<&str>,
    row_id: &str,
) -> Result<Option<DateTime<Utc>>, DbError> {
    timestamp.map(|t| parse_timestamp(t, row_id)).transpose()
}

fn format_timestamp(timestamp: DateTime<Utc>) -> String {
    timestamp.to_rfc3339_opts(SecondsFormat::Millis, true)
}
