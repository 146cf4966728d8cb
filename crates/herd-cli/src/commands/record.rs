//! Record commands: write reproductive events for an animal.

use std::io::Write;

use anyhow::{Context, Result};
use chrono::{DateTime, Duration, Utc};

use herd_core::{
    AnimalId, BreedingRecord, CalvingEvent, CheckResult, HeatEvent, InseminationEvent,
    InseminationMethod, PregnancyCheck, PregnancyStatus,
};
use herd_db::Database;

use super::util::{parse_animal_id, parse_datetime, parse_datetime_or};

/// Looks up the animal so typos fail before anything is written.
fn require_animal(db: &Database, animal: &str) -> Result<AnimalId> {
    let animal_id = parse_animal_id(animal)?;
    db.get_animal(&animal_id)
        .with_context(|| format!("unknown animal {animal_id}"))?;
    Ok(animal_id)
}

pub fn heat<W: Write>(
    writer: &mut W,
    db: &Database,
    animal: &str,
    date: Option<&str>,
    signs: Vec<String>,
    action: Option<String>,
    now: DateTime<Utc>,
) -> Result<()> {
    let animal_id = require_animal(db, animal)?;
    let event_date = parse_datetime_or(date, now)?;
    db.insert_heat(&HeatEvent {
        animal_id: animal_id.clone(),
        event_date,
        recorded_at: Some(now),
        signs,
        action,
    })?;
    writeln!(writer, "Recorded heat for {animal_id}.")?;
    Ok(())
}

#[expect(
    clippy::too_many_arguments,
    reason = "one parameter per CLI flag"
)]
pub fn insemination<W: Write>(
    writer: &mut W,
    db: &Database,
    animal: &str,
    date: Option<&str>,
    method: &str,
    sire: Option<String>,
    due: Option<&str>,
    now: DateTime<Utc>,
) -> Result<()> {
    let animal_id = require_animal(db, animal)?;
    let event_date = parse_datetime_or(date, now)?;
    let method: InseminationMethod = method.parse().map_err(anyhow::Error::msg)?;
    let estimated_due_date = due.map(parse_datetime).transpose()?;
    db.insert_insemination(&InseminationEvent {
        animal_id: animal_id.clone(),
        event_date,
        recorded_at: Some(now),
        method,
        sire_code: sire,
        estimated_due_date,
    })?;
    writeln!(writer, "Recorded {method} insemination for {animal_id}.")?;

    let settings = db.load_settings()?;
    if settings.auto_schedule_pregnancy_check {
        let check_due = event_date + Duration::days(settings.pregnancy_check_wait_days);
        writeln!(
            writer,
            "Pregnancy check due around {}.",
            check_due.format("%Y-%m-%d")
        )?;
    }
    Ok(())
}

pub fn check<W: Write>(
    writer: &mut W,
    db: &Database,
    animal: &str,
    result: &str,
    date: Option<&str>,
    due: Option<&str>,
    now: DateTime<Utc>,
) -> Result<()> {
    let animal_id = require_animal(db, animal)?;
    let check_date = parse_datetime_or(date, now)?;
    let result: CheckResult = result.parse().map_err(anyhow::Error::msg)?;
    let estimated_due_date = due.map(parse_datetime).transpose()?;
    db.insert_pregnancy_check(&PregnancyCheck {
        animal_id: animal_id.clone(),
        check_date,
        recorded_at: Some(now),
        result,
        estimated_due_date,
    })?;
    writeln!(writer, "Recorded {result} pregnancy check for {animal_id}.")?;
    Ok(())
}

pub fn calving<W: Write>(
    writer: &mut W,
    db: &Database,
    animal: &str,
    date: Option<&str>,
    due: Option<&str>,
    outcome: Option<String>,
    now: DateTime<Utc>,
) -> Result<()> {
    let animal_id = require_animal(db, animal)?;
    let event_date = parse_datetime_or(date, now)?;
    let estimated_due_date = due.map(parse_datetime).transpose()?;
    db.insert_calving(&CalvingEvent {
        animal_id: animal_id.clone(),
        event_date,
        recorded_at: Some(now),
        estimated_due_date,
        outcome,
    })?;
    writeln!(writer, "Recorded calving for {animal_id}.")?;
    Ok(())
}

#[expect(
    clippy::too_many_arguments,
    reason = "legacy rows carry every field of the old combined form"
)]
pub fn breeding<W: Write>(
    writer: &mut W,
    db: &Database,
    animal: &str,
    date: &str,
    method: &str,
    status: &str,
    expected: Option<&str>,
    actual: Option<&str>,
    now: DateTime<Utc>,
) -> Result<()> {
    let animal_id = require_animal(db, animal)?;
    let breeding_date = parse_datetime(date)?;
    let method: InseminationMethod = method.parse().map_err(anyhow::Error::msg)?;
    let pregnancy_status: PregnancyStatus = status.parse().map_err(anyhow::Error::msg)?;
    let expected_calving_date = expected.map(parse_datetime).transpose()?;
    let actual_calving_date = actual.map(parse_datetime).transpose()?;
    db.insert_breeding_record(&BreedingRecord {
        animal_id: animal_id.clone(),
        breeding_date,
        method,
        pregnancy_status,
        expected_calving_date,
        actual_calving_date,
        recorded_at: Some(now),
    })?;
    writeln!(writer, "Imported legacy breeding record for {animal_id}.")?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    use chrono::TimeZone;

    use herd_core::{Animal, BreedingSettings, ProductionStatus};

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 6, 15, 12, 0, 0).unwrap()
    }

    fn cow() -> AnimalId {
        AnimalId::new("cow-1").unwrap()
    }

    fn setup_db() -> Database {
        let db = Database::open_in_memory().unwrap();
        db.insert_animal(&Animal {
            id: cow(),
            name: None,
            birth_date: now() - Duration::days(1400),
            production_status: ProductionStatus::Lactating,
        })
        .unwrap();
        db
    }

    #[test]
    fn recording_against_unknown_animal_fails_before_writing() {
        let db = setup_db();
        let mut output = Vec::new();
        let result = heat(&mut output, &db, "ghost", None, vec![], None, now());
        assert!(result.is_err());
    }

    #[test]
    fn recorded_heat_lands_in_the_timeline() {
        let db = setup_db();
        let mut output = Vec::new();
        heat(
            &mut output,
            &db,
            "cow-1",
            Some("2025-06-14"),
            vec!["standing".to_string()],
            None,
            now(),
        )
        .unwrap();

        let raw = db.raw_timeline(&cow()).unwrap();
        assert_eq!(raw.heats.len(), 1);
        assert_eq!(raw.heats[0].recorded_at, Some(now()));
        assert_eq!(
            String::from_utf8(output).unwrap(),
            "Recorded heat for cow-1.\n"
        );
    }

    #[test]
    fn insemination_hints_check_date_when_auto_schedule_is_on() {
        let db = setup_db();
        db.save_settings(&BreedingSettings {
            auto_schedule_pregnancy_check: true,
            ..BreedingSettings::default()
        })
        .unwrap();

        let mut output = Vec::new();
        insemination(
            &mut output,
            &db,
            "cow-1",
            Some("2025-06-15"),
            "ai",
            None,
            None,
            now(),
        )
        .unwrap();

        let output = String::from_utf8(output).unwrap();
        assert!(output.contains("Recorded ai insemination for cow-1."));
        assert!(output.contains("Pregnancy check due around 2025-07-15."));
    }

    #[test]
    fn invalid_method_is_rejected() {
        let db = setup_db();
        let mut output = Vec::new();
        let result = insemination(
            &mut output, &db, "cow-1", None, "osmosis", None, None, now(),
        );
        assert!(result.is_err());
        assert!(db.raw_timeline(&cow()).unwrap().inseminations.is_empty());
    }

    #[test]
    fn legacy_record_roundtrips_every_field() {
        let db = setup_db();
        let mut output = Vec::new();
        breeding(
            &mut output,
            &db,
            "cow-1",
            "2024-01-10",
            "natural",
            "completed",
            Some("2024-10-16"),
            Some("2024-10-20"),
            now(),
        )
        .unwrap();

        let raw = db.raw_timeline(&cow()).unwrap();
        assert_eq!(raw.breeding_records.len(), 1);
        let record = &raw.breeding_records[0];
        assert_eq!(record.pregnancy_status, PregnancyStatus::Completed);
        assert!(record.expected_calving_date.is_some());
        assert!(record.actual_calving_date.is_some());
    }
}
