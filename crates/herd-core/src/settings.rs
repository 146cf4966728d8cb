//! Farm-level breeding thresholds.

use serde::{Deserialize, Serialize};

/// Configurable thresholds driving eligibility and window classification.
///
/// Every field has a serde default so a partial settings source (old
/// database row, hand-edited export) degrades to the documented defaults
/// instead of failing to load.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BreedingSettings {
    /// Minimum age before an animal may be bred.
    /// Default: 15 months.
    #[serde(default = "default_minimum_breeding_age_months")]
    pub minimum_breeding_age_months: i32,

    /// Expected pregnancy duration, used to project a due date when no
    /// explicit one was recorded. Default: 280 days.
    #[serde(default = "default_gestation_period_days")]
    pub default_gestation_period_days: i64,

    /// Days after insemination before a pregnancy check is worthwhile.
    /// Default: 30 days.
    #[serde(default = "default_pregnancy_check_wait_days")]
    pub pregnancy_check_wait_days: i64,

    /// Minimum recovery period after calving before rebreeding.
    /// Default: 60 days.
    #[serde(default = "default_postpartum_breeding_delay_days")]
    pub postpartum_breeding_delay_days: i64,

    /// Whether the UI should offer to schedule a pregnancy check after an
    /// insemination is recorded. Not consulted by the engine.
    #[serde(default)]
    pub auto_schedule_pregnancy_check: bool,
}

const fn default_minimum_breeding_age_months() -> i32 {
    15
}

const fn default_gestation_period_days() -> i64 {
    280
}

const fn default_pregnancy_check_wait_days() -> i64 {
    30
}

const fn default_postpartum_breeding_delay_days() -> i64 {
    60
}

impl Default for BreedingSettings {
    fn default() -> Self {
        Self {
            minimum_breeding_age_months: default_minimum_breeding_age_months(),
            default_gestation_period_days: default_gestation_period_days(),
            pregnancy_check_wait_days: default_pregnancy_check_wait_days(),
            postpartum_breeding_delay_days: default_postpartum_breeding_delay_days(),
            auto_schedule_pregnancy_check: false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn documented_defaults() {
        let settings = BreedingSettings::default();
        assert_eq!(settings.minimum_breeding_age_months, 15);
        assert_eq!(settings.default_gestation_period_days, 280);
        assert_eq!(settings.pregnancy_check_wait_days, 30);
        assert_eq!(settings.postpartum_breeding_delay_days, 60);
        assert!(!settings.auto_schedule_pregnancy_check);
    }

    #[test]
    fn partial_source_falls_back_to_defaults() {
        let settings: BreedingSettings =
            serde_json::from_str(r#"{"postpartum_breeding_delay_days": 45}"#).unwrap();
        assert_eq!(settings.postpartum_breeding_delay_days, 45);
        assert_eq!(settings.default_gestation_period_days, 280);
        assert_eq!(settings.pregnancy_check_wait_days, 30);
    }
}
