//! Schedule tables.
//!
//! A [`ZoneSchedule`] is one zone's ordered period-to-status table; a
//! [`Schedule`] maps every known zone to its table. Schedules are replaced
//! wholesale by the updater, never merged.

use std::collections::BTreeMap;

use crate::domain::{Period, ZoneHandle, ZoneStatus};

/// One row of a zone's schedule table.
#[derive(Debug, Clone)]
pub struct ScheduleEntry {
    pub period: Period,
    pub status: ZoneStatus,
}

/// An ordered period-to-status table for a single zone.
///
/// Entries keep [`Period`]'s total order (ascending start, longer window
/// first on ties); insertion order is preserved between entries that compare
/// equal, which makes resolution deterministic even for pathological tables
/// holding identical periods. Overlapping periods are allowed, that is how
/// override windows work.
#[derive(Debug, Clone, Default)]
pub struct ZoneSchedule {
    entries: Vec<ScheduleEntry>,
}

impl ZoneSchedule {
    /// Create an empty table.
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a period and the status to apply while it is active.
    pub fn insert(&mut self, period: Period, status: ZoneStatus) {
        self.entries.push(ScheduleEntry { period, status });
        // Vec::sort_by is stable, so equal periods keep insertion order.
        self.entries.sort_by(|a, b| a.period.cmp(&b.period));
    }

    /// Entries in table order.
    pub fn entries(&self) -> &[ScheduleEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl FromIterator<(Period, ZoneStatus)> for ZoneSchedule {
    fn from_iter<I: IntoIterator<Item = (Period, ZoneStatus)>>(iter: I) -> Self {
        let mut table = Self::new();
        for (period, status) in iter {
            table.insert(period, status);
        }
        table
    }
}

/// A zone handle together with its schedule table.
#[derive(Clone)]
pub struct ZoneEntry {
    zone: ZoneHandle,
    periods: ZoneSchedule,
}

impl ZoneEntry {
    pub fn zone(&self) -> &ZoneHandle {
        &self.zone
    }

    pub fn periods(&self) -> &ZoneSchedule {
        &self.periods
    }
}

/// The full schedule: every zone the scheduler currently controls.
///
/// Keyed by zone name, so iteration order is deterministic.
#[derive(Clone, Default)]
pub struct Schedule {
    zones: BTreeMap<String, ZoneEntry>,
}

impl Schedule {
    /// Create an empty schedule.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a zone and its table, replacing any previous table for the same
    /// zone name.
    pub fn insert(&mut self, zone: ZoneHandle, periods: ZoneSchedule) {
        let name = zone.name().to_string();
        self.zones.insert(name, ZoneEntry { zone, periods });
    }

    /// Look up a zone's entry by name.
    pub fn get(&self, zone_name: &str) -> Option<&ZoneEntry> {
        self.zones.get(zone_name)
    }

    pub fn contains(&self, zone_name: &str) -> bool {
        self.zones.contains_key(zone_name)
    }

    /// Zones in name order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &ZoneEntry)> {
        self.zones.iter().map(|(name, entry)| (name.as_str(), entry))
    }

    /// Zone names in order.
    pub fn zone_names(&self) -> impl Iterator<Item = &str> {
        self.zones.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.zones.len()
    }

    pub fn is_empty(&self) -> bool {
        self.zones.is_empty()
    }
}
