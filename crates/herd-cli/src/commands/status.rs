//! Status command: one animal's eligibility and status banner.

use std::io::Write;

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};

use herd_core::{Eligibility, WindowStatus, classify_window, evaluate_eligibility};
use herd_db::Database;

use super::util::{load_timeline, parse_animal_id};

pub fn run<W: Write>(
    writer: &mut W,
    db: &Database,
    animal: &str,
    now: DateTime<Utc>,
) -> Result<()> {
    let animal_id = parse_animal_id(animal)?;
    let animal = db
        .get_animal(&animal_id)
        .with_context(|| format!("unknown animal {animal_id}"))?;
    let settings = db.load_settings()?;
    let timeline = load_timeline(db, &animal_id)?;

    let eligibility = evaluate_eligibility(&animal, &settings, &timeline, now);
    let window = classify_window(&timeline, &settings, now);

    match &animal.name {
        Some(name) => writeln!(
            writer,
            "{} ({}): {}, {} months",
            animal.id, name, animal.production_status, eligibility.age_in_months
        )?,
        None => writeln!(
            writer,
            "{}: {}, {} months",
            animal.id, animal.production_status, eligibility.age_in_months
        )?,
    }

    write_eligibility(writer, &eligibility)?;
    write_window(writer, window.as_ref())?;
    Ok(())
}

fn write_eligibility<W: Write>(writer: &mut W, eligibility: &Eligibility) -> Result<()> {
    if eligibility.eligible {
        writeln!(writer, "Eligible: yes")?;
        if eligibility.is_ready_for_first_service {
            writeln!(writer, "  Ready for first service")?;
        }
        if eligibility.is_ready_for_re_service {
            writeln!(writer, "  Ready for re-service")?;
        }
    } else {
        writeln!(writer, "Eligible: no")?;
        for reason in &eligibility.reasons {
            writeln!(writer, "  - {reason}")?;
        }
    }
    for warning in &eligibility.warnings {
        writeln!(writer, "  warning: {warning}")?;
    }
    if let Some(days) = eligibility.days_since_calving {
        writeln!(writer, "Days since calving: {days}")?;
    }
    Ok(())
}

fn write_window<W: Write>(writer: &mut W, window: Option<&WindowStatus>) -> Result<()> {
    match window {
        Some(window) => {
            writeln!(
                writer,
                "Window: {} (action: {})",
                window.status_str(),
                window.action()
            )?;
            writeln!(writer, "  {}", window.message())?;
            if let WindowStatus::Heat { phase, .. } = window {
                writeln!(writer, "  color: {}", phase.color())?;
            }
        }
        None => writeln!(writer, "Window: none")?,
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    use chrono::{Duration, TimeZone};
    use insta::assert_snapshot;

    use herd_core::{Animal, AnimalId, CalvingEvent, HeatEvent, ProductionStatus};

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 6, 15, 12, 0, 0).unwrap()
    }

    fn setup_db() -> Database {
        let db = Database::open_in_memory().unwrap();
        db.insert_animal(&Animal {
            id: AnimalId::new("cow-1").unwrap(),
            name: Some("Bella".to_string()),
            birth_date: Utc.with_ymd_and_hms(2021, 6, 1, 0, 0, 0).unwrap(),
            production_status: ProductionStatus::Lactating,
        })
        .unwrap();
        db
    }

    #[test]
    fn renders_heat_window_with_color() {
        let db = setup_db();
        db.insert_heat(&HeatEvent {
            animal_id: AnimalId::new("cow-1").unwrap(),
            event_date: now() - Duration::hours(14),
            recorded_at: None,
            signs: vec!["standing".to_string()],
            action: None,
        })
        .unwrap();

        let mut output = Vec::new();
        run(&mut output, &db, "cow-1", now()).unwrap();
        let output = String::from_utf8(output).unwrap();

        assert_snapshot!(output, @r"
        cow-1 (Bella): lactating, 48 months
        Eligible: yes
          Ready for re-service
        Window: optimal (action: breed)
          Heat 14h ago (optimal window)
          color: green
        ");
    }

    #[test]
    fn renders_post_calving_recovery() {
        let db = setup_db();
        db.insert_calving(&CalvingEvent {
            animal_id: AnimalId::new("cow-1").unwrap(),
            event_date: now() - Duration::days(10),
            recorded_at: None,
            estimated_due_date: None,
            outcome: None,
        })
        .unwrap();

        let mut output = Vec::new();
        run(&mut output, &db, "cow-1", now()).unwrap();
        let output = String::from_utf8(output).unwrap();

        assert_snapshot!(output, @r"
        cow-1 (Bella): lactating, 48 months
        Eligible: no
          - in postpartum recovery (10 of 60 days)
        Days since calving: 10
        Window: post_calving (action: none)
          Post-calving recovery, 50 days remaining
        ");
    }

    #[test]
    fn renders_no_window_for_quiet_animal() {
        let db = setup_db();

        let mut output = Vec::new();
        run(&mut output, &db, "cow-1", now()).unwrap();
        let output = String::from_utf8(output).unwrap();

        assert_snapshot!(output, @r"
        cow-1 (Bella): lactating, 48 months
        Eligible: yes
          Ready for re-service
        Window: none
        ");
    }

    #[test]
    fn unknown_animal_is_an_error() {
        let db = setup_db();
        let mut output = Vec::new();
        assert!(run(&mut output, &db, "ghost", now()).is_err());
    }
}
