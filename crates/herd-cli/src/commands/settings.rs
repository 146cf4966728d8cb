//! Settings commands.

use std::io::Write;

use anyhow::Result;

use herd_db::Database;

pub fn show<W: Write>(writer: &mut W, db: &Database) -> Result<()> {
    let settings = db.load_settings()?;
    writeln!(
        writer,
        "minimum breeding age: {} months",
        settings.minimum_breeding_age_months
    )?;
    writeln!(
        writer,
        "gestation period: {} days",
        settings.default_gestation_period_days
    )?;
    writeln!(
        writer,
        "pregnancy check wait: {} days",
        settings.pregnancy_check_wait_days
    )?;
    writeln!(
        writer,
        "postpartum breeding delay: {} days",
        settings.postpartum_breeding_delay_days
    )?;
    writeln!(
        writer,
        "auto-schedule pregnancy check: {}",
        if settings.auto_schedule_pregnancy_check {
            "on"
        } else {
            "off"
        }
    )?;
    Ok(())
}

#[expect(
    clippy::too_many_arguments,
    reason = "one parameter per CLI flag"
)]
pub fn set<W: Write>(
    writer: &mut W,
    db: &Database,
    min_age_months: Option<i32>,
    gestation_days: Option<i64>,
    check_wait_days: Option<i64>,
    postpartum_delay_days: Option<i64>,
    auto_schedule_check: Option<bool>,
) -> Result<()> {
    let mut settings = db.load_settings()?;
    if let Some(months) = min_age_months {
        settings.minimum_breeding_age_months = months;
    }
    if let Some(days) = gestation_days {
        settings.default_gestation_period_days = days;
    }
    if let Some(days) = check_wait_days {
        settings.pregnancy_check_wait_days = days;
    }
    if let Some(days) = postpartum_delay_days {
        settings.postpartum_breeding_delay_days = days;
    }
    if let Some(enabled) = auto_schedule_check {
        settings.auto_schedule_pregnancy_check = enabled;
    }
    db.save_settings(&settings)?;
    writeln!(writer, "Settings saved.")?;
    show(writer, db)
}
