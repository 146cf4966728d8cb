//! Animal management commands.

use std::io::Write;

use anyhow::{Context, Result};

use herd_core::{Animal, ProductionStatus};
use herd_db::Database;

use super::util::{parse_animal_id, parse_datetime};

pub fn add<W: Write>(
    writer: &mut W,
    db: &Database,
    id: &str,
    born: &str,
    status: &str,
    name: Option<String>,
) -> Result<()> {
    let animal = Animal {
        id: parse_animal_id(id)?,
        name,
        birth_date: parse_datetime(born)?,
        production_status: status.parse().map_err(anyhow::Error::msg)?,
    };
    db.insert_animal(&animal)?;
    writeln!(writer, "Registered {}.", animal.id)?;
    Ok(())
}

pub fn list<W: Write>(writer: &mut W, db: &Database) -> Result<()> {
    let animals = db.list_animals()?;
    if animals.is_empty() {
        writeln!(writer, "No animals registered.")?;
        return Ok(());
    }
    for animal in animals {
        let born = animal.birth_date.format("%Y-%m-%d");
        match &animal.name {
            Some(name) => writeln!(
                writer,
                "{} ({name}): {}, born {born}",
                animal.id, animal.production_status
            )?,
            None => writeln!(
                writer,
                "{}: {}, born {born}",
                animal.id, animal.production_status
            )?,
        }
    }
    Ok(())
}

pub fn set_status<W: Write>(writer: &mut W, db: &Database, id: &str, status: &str) -> Result<()> {
    let animal_id = parse_animal_id(id)?;
    db.get_animal(&animal_id)
        .with_context(|| format!("unknown animal {animal_id}"))?;
    let status: ProductionStatus = status.parse().map_err(anyhow::Error::msg)?;
    db.update_production_status(&animal_id, status)?;
    writeln!(writer, "{animal_id} is now {status}.")?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    use insta::assert_snapshot;

    #[test]
    fn add_then_list() {
        let db = Database::open_in_memory().unwrap();
        let mut output = Vec::new();
        add(
            &mut output,
            &db,
            "cow-7",
            "2022-04-01",
            "heifer",
            Some("Daisy".to_string()),
        )
        .unwrap();
        add(&mut output, &db, "cow-3", "2020-11-20", "lactating", None).unwrap();

        let mut listing = Vec::new();
        list(&mut listing, &db).unwrap();
        assert_snapshot!(String::from_utf8(listing).unwrap(), @r"
        cow-3: lactating, born 2020-11-20
        cow-7 (Daisy): heifer, born 2022-04-01
        ");
    }

    #[test]
    fn set_status_updates_the_row() {
        let db = Database::open_in_memory().unwrap();
        let mut output = Vec::new();
        add(&mut output, &db, "cow-1", "2022-04-01", "heifer", None).unwrap();
        set_status(&mut output, &db, "cow-1", "served").unwrap();

        let animal = db
            .get_animal(&parse_animal_id("cow-1").unwrap())
            .unwrap();
        assert_eq!(animal.production_status, ProductionStatus::Served);
    }

    #[test]
    fn rejects_unknown_status() {
        let db = Database::open_in_memory().unwrap();
        let mut output = Vec::new();
        let result = add(&mut output, &db, "cow-1", "2022-04-01", "retired", None);
        assert!(result.is_err());
    }
}
