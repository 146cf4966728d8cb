//! Overview command: herd-wide status table.

use std::io::Write;

use anyhow::Result;
use chrono::{DateTime, Utc};

use herd_core::evaluate_herd;
use herd_db::Database;

use super::util::load_timeline;

pub fn run<W: Write>(writer: &mut W, db: &Database, now: DateTime<Utc>) -> Result<()> {
    let settings = db.load_settings()?;
    let animals = db.list_animals()?;

    if animals.is_empty() {
        writeln!(writer, "No animals registered.")?;
        return Ok(());
    }

    let mut herd = Vec::with_capacity(animals.len());
    for animal in animals {
        let timeline = load_timeline(db, &animal.id)?;
        herd.push((animal, timeline));
    }

    let entries = evaluate_herd(herd, &settings, now);
    writeln!(writer, "Herd overview ({} animals)", entries.len())?;
    for entry in entries {
        let eligible = if entry.eligibility.eligible { "yes" } else { "no" };
        let window = entry
            .window
            .as_ref()
            .map_or("none", herd_core::WindowStatus::status_str);
        writeln!(
            writer,
            "{}: eligible={eligible}, window={window}",
            entry.animal.id
        )?;
    }
    Ok(())
}
