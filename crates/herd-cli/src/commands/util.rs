//! Shared helpers for subcommands.

use anyhow::{Context, Result};
use chrono::{DateTime, NaiveDate, TimeZone, Utc};

use herd_core::{AnimalId, Timeline};
use herd_db::Database;

/// Parses a user-supplied date as RFC 3339 or `YYYY-MM-DD` (midnight UTC).
pub fn parse_datetime(value: &str) -> Result<DateTime<Utc>> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(value) {
        return Ok(dt.with_timezone(&Utc));
    }
    let date = NaiveDate::parse_from_str(value, "%Y-%m-%d")
        .with_context(|| format!("invalid date '{value}' (expected YYYY-MM-DD or RFC 3339)"))?;
    let midnight = date
        .and_hms_opt(0, 0, 0)
        .context("invalid time of day")?;
    Ok(Utc.from_utc_datetime(&midnight))
}

/// Parses an optional date argument, defaulting to `now`.
pub fn parse_datetime_or(value: Option<&str>, now: DateTime<Utc>) -> Result<DateTime<Utc>> {
    value.map_or(Ok(now), parse_datetime)
}

/// Parses and validates an animal ID argument.
pub fn parse_animal_id(value: &str) -> Result<AnimalId> {
    AnimalId::new(value).map_err(Into::into)
}

/// Loads and normalizes one animal's timeline.
pub fn load_timeline(db: &Database, animal_id: &AnimalId) -> Result<Timeline> {
    let raw = db
        .raw_timeline(animal_id)
        .with_context(|| format!("failed to load events for {animal_id}"))?;
    Ok(Timeline::normalize(
        raw.heats,
        raw.inseminations,
        raw.pregnancy_checks,
        raw.calvings,
        raw.breeding_records,
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_plain_dates_as_utc_midnight() {
        let parsed = parse_datetime("2025-03-15").unwrap();
        assert_eq!(parsed, Utc.with_ymd_and_hms(2025, 3, 15, 0, 0, 0).unwrap());
    }

    #[test]
    fn parses_rfc3339() {
        let parsed = parse_datetime("2025-03-15T08:30:00Z").unwrap();
        assert_eq!(parsed, Utc.with_ymd_and_hms(2025, 3, 15, 8, 30, 0).unwrap());
    }

    #[test]
    fn rejects_garbage_dates() {
        assert!(parse_datetime("yesterday").is_err());
        assert!(parse_datetime("2025-13-40").is_err());
    }

    #[test]
    fn missing_date_defaults_to_now() {
        let now = Utc.with_ymd_and_hms(2025, 3, 15, 8, 0, 0).unwrap();
        assert_eq!(parse_datetime_or(None, now).unwrap(), now);
        assert_ne!(
            parse_datetime_or(Some("2024-01-01"), now).unwrap(),
            now
        );
    }
}
