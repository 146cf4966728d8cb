//! History command: merged event log for one animal.

use std::io::Write;

use anyhow::{Context, Result};

use herd_core::{EventOrd, ReproEvent};
use herd_db::Database;

use super::util::{load_timeline, parse_animal_id};

pub fn run<W: Write>(writer: &mut W, db: &Database, animal: &str) -> Result<()> {
    let animal_id = parse_animal_id(animal)?;
    db.get_animal(&animal_id)
        .with_context(|| format!("unknown animal {animal_id}"))?;
    let timeline = load_timeline(db, &animal_id)?;

    let merged = timeline.merged();
    if merged.is_empty() {
        writeln!(writer, "No events recorded for {animal_id}.")?;
        return Ok(());
    }

    for event in merged {
        let date = event.event_date().format("%Y-%m-%d %H:%M");
        writeln!(writer, "{date}  {}", describe(&event))?;
    }
    Ok(())
}

fn describe(event: &ReproEvent) -> String {
    match event {
        ReproEvent::Heat(e) => {
            if e.signs.is_empty() {
                "heat".to_string()
            } else {
                format!("heat ({})", e.signs.join(", "))
            }
        }
        ReproEvent::Insemination(e) => match &e.sire_code {
            Some(sire) => format!("insemination ({}, sire {sire})", e.method),
            None => format!("insemination ({})", e.method),
        },
        ReproEvent::PregnancyCheck(e) => format!("pregnancy check: {}", e.result),
        ReproEvent::Calving(e) => match &e.outcome {
            Some(outcome) => format!("calving ({outcome})"),
            None => "calving".to_string(),
        },
        ReproEvent::LegacyRecord(e) => {
            format!("legacy breeding ({}, {})", e.method, e.pregnancy_status)
        }
    }
}
