//! Timeline normalization for one animal's event history.
//!
//! The data layer hands back raw, arbitrarily-ordered arrays per event type
//! (plus legacy combined rows). This module sorts them defensively into
//! comparable, newest-first sequences and derives the per-type "latest"
//! pointers and cross-stream facts (active pregnancy, last calving) that
//! the evaluators consume.

use chrono::{DateTime, Utc};

use crate::event::{
    BreedingRecord, CalvingEvent, CheckResult, EventOrd, HeatEvent, InseminationEvent,
    PregnancyCheck, PregnancyStatus, ReproEvent,
};

/// An animal's normalized reproductive history.
///
/// Each stream is sorted newest-first by effective timestamp (entry time
/// when present, event date otherwise, resolved per item). Ties keep input
/// order, so of two records with identical timestamps the one supplied
/// first counts as most recent.
#[derive(Debug, Clone, Default)]
pub struct Timeline {
    heats: Vec<HeatEvent>,
    inseminations: Vec<InseminationEvent>,
    pregnancy_checks: Vec<PregnancyCheck>,
    calvings: Vec<CalvingEvent>,
    breeding_records: Vec<BreedingRecord>,
}

/// The source backing an active pregnancy, in precedence order.
#[derive(Debug, Clone, Copy)]
pub enum ActivePregnancy<'a> {
    /// A legacy record confirmed and not yet calved out.
    LegacyRecord(&'a BreedingRecord),
    /// A positive check dated after the most recent insemination.
    PositiveCheck(&'a PregnancyCheck),
}

fn sort_newest_first<E: EventOrd>(events: &mut [E]) {
    // Stable sort: equal timestamps keep input order.
    events.sort_by(|a, b| b.effective_timestamp().cmp(&a.effective_timestamp()));
}

impl Timeline {
    /// Builds a normalized timeline from raw event arrays.
    ///
    /// Input order is arbitrary; empty arrays are valid and simply mean
    /// "no event of this type".
    #[must_use]
    pub fn normalize(
        mut heats: Vec<HeatEvent>,
        mut inseminations: Vec<InseminationEvent>,
        mut pregnancy_checks: Vec<PregnancyCheck>,
        mut calvings: Vec<CalvingEvent>,
        mut breeding_records: Vec<BreedingRecord>,
    ) -> Self {
        sort_newest_first(&mut heats);
        sort_newest_first(&mut inseminations);
        sort_newest_first(&mut pregnancy_checks);
        sort_newest_first(&mut calvings);
        sort_newest_first(&mut breeding_records);

        Self {
            heats,
            inseminations,
            pregnancy_checks,
            calvings,
            breeding_records,
        }
    }

    /// All heat detections, newest first.
    #[must_use]
    pub fn heats(&self) -> &[HeatEvent] {
        &self.heats
    }

    /// All inseminations, newest first.
    #[must_use]
    pub fn inseminations(&self) -> &[InseminationEvent] {
        &self.inseminations
    }

    /// All pregnancy checks, newest first.
    #[must_use]
    pub fn pregnancy_checks(&self) -> &[PregnancyCheck] {
        &self.pregnancy_checks
    }

    /// All calvings, newest first.
    #[must_use]
    pub fn calvings(&self) -> &[CalvingEvent] {
        &self.calvings
    }

    /// All legacy combined records, newest first.
    #[must_use]
    pub fn breeding_records(&self) -> &[BreedingRecord] {
        &self.breeding_records
    }

    #[must_use]
    pub fn latest_heat(&self) -> Option<&HeatEvent> {
        self.heats.first()
    }

    #[must_use]
    pub fn latest_insemination(&self) -> Option<&InseminationEvent> {
        self.inseminations.first()
    }

    #[must_use]
    pub fn latest_pregnancy_check(&self) -> Option<&PregnancyCheck> {
        self.pregnancy_checks.first()
    }

    #[must_use]
    pub fn latest_calving(&self) -> Option<&CalvingEvent> {
        self.calvings.first()
    }

    #[must_use]
    pub fn latest_breeding_record(&self) -> Option<&BreedingRecord> {
        self.breeding_records.first()
    }

    /// True when the animal has no recorded history at all.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.heats.is_empty()
            && self.inseminations.is_empty()
            && self.pregnancy_checks.is_empty()
            && self.calvings.is_empty()
            && self.breeding_records.is_empty()
    }

    /// The currently active pregnancy, if any.
    ///
    /// Two sources can establish one, checked in precedence order:
    ///
    /// 1. A legacy record with `pregnancy_status = confirmed` and no actual
    ///    calving date, provided no calving event postdates its breeding
    ///    date (a calving always closes the cycle that preceded it).
    /// 2. A positive pregnancy check dated after the most recent
    ///    insemination, with no calving event dated after the check.
    #[must_use]
    pub fn active_pregnancy(&self) -> Option<ActivePregnancy<'_>> {
        let confirmed_record = self
            .breeding_records
            .iter()
            .find(|r| {
                r.pregnancy_status == PregnancyStatus::Confirmed && r.actual_calving_date.is_none()
            })
            .filter(|r| !self.has_calving_after(r.breeding_date));
        if let Some(record) = confirmed_record {
            return Some(ActivePregnancy::LegacyRecord(record));
        }

        let last_service = self.latest_insemination()?;
        self.pregnancy_checks
            .iter()
            .filter(|c| c.result == CheckResult::Positive)
            .find(|c| c.check_date > last_service.event_date)
            .filter(|c| !self.has_calving_after(c.check_date))
            .map(ActivePregnancy::PositiveCheck)
    }

    /// The most recent calving date from either source.
    ///
    /// Compares the newest legacy record carrying an actual calving date
    /// against the head of the calving-event stream; the strictly later of
    /// the two wins, with the legacy date kept on a tie.
    #[must_use]
    pub fn last_calving_date(&self) -> Option<DateTime<Utc>> {
        let from_records = self
            .breeding_records
            .iter()
            .find_map(|r| r.actual_calving_date);
        let from_events = self.latest_calving().map(|c| c.event_date);

        match (from_records, from_events) {
            (Some(legacy), Some(event)) if event > legacy => Some(event),
            (Some(legacy), _) => Some(legacy),
            (None, event) => event,
        }
    }

    /// Whether a calving event is dated strictly after `instant`.
    #[must_use]
    pub fn has_calving_after(&self, instant: DateTime<Utc>) -> bool {
        self.calvings.iter().any(|c| c.event_date > instant)
    }

    /// Whether any cycle-advancing event (heat, service, check, legacy
    /// breeding) is dated strictly after `instant`.
    ///
    /// Used to tell a cow resting after calving apart from one already
    /// started on her next cycle.
    #[must_use]
    pub fn has_cycle_advancing_event_after(&self, instant: DateTime<Utc>) -> bool {
        self.heats.iter().any(|e| e.event_date > instant)
            || self.inseminations.iter().any(|e| e.event_date > instant)
            || self.pregnancy_checks.iter().any(|e| e.check_date > instant)
            || self.breeding_records.iter().any(|e| e.breeding_date > instant)
    }

    /// A merged view of every event, newest first.
    ///
    /// Clones the underlying records; intended for history rendering, not
    /// for the hot evaluation path.
    #[must_use]
    pub fn merged(&self) -> Vec<ReproEvent> {
        let mut merged: Vec<ReproEvent> = Vec::with_capacity(
            self.heats.len()
                + self.inseminations.len()
                + self.pregnancy_checks.len()
                + self.calvings.len()
                + self.breeding_records.len(),
        );
        merged.extend(self.heats.iter().cloned().map(ReproEvent::Heat));
        merged.extend(
            self.inseminations
                .iter()
                .cloned()
                .map(ReproEvent::Insemination),
        );
        merged.extend(
            self.pregnancy_checks
                .iter()
                .cloned()
                .map(ReproEvent::PregnancyCheck),
        );
        merged.extend(self.calvings.iter().cloned().map(ReproEvent::Calving));
        merged.extend(
            self.breeding_records
                .iter()
                .cloned()
                .map(ReproEvent::LegacyRecord),
        );
        sort_newest_first(&mut merged);
        merged
    }
}
