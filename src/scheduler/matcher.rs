//! Period resolution.
//!
//! Given "now" and one zone's schedule table, pick the single active period.
//! "Nothing active" is an ordinary answer, not an error; zones are allowed
//! to have gaps in coverage.

use chrono::NaiveDateTime;

use crate::domain::{ScheduleEntry, ZoneSchedule};

/// Resolve the active schedule entry for a zone at the given time.
///
/// Entries are filtered to those whose day mask and time window both include
/// `at`; among those, the entry ordered latest in the table wins. Since the
/// table sorts ascending by start with longer windows first on ties, the
/// winner is the narrowest or latest-starting eligible window, so override
/// periods punched into a broad one take precedence over it. Identical
/// periods resolve to the last one inserted.
pub fn match_period(table: &ZoneSchedule, at: NaiveDateTime) -> Option<&ScheduleEntry> {
    let mut selected = None;

    for entry in table.entries() {
        if entry.period.includes_day(at) && entry.period.includes(at) {
            selected = Some(entry);
        }
    }

    selected
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{Period, ZoneStatus};
    use chrono::NaiveDate;

    fn monday_at(hour: u32, minute: u32) -> NaiveDateTime {
        // 2025-06-02 is a Monday
        NaiveDate::from_ymd_opt(2025, 6, 2)
            .unwrap()
            .and_hms_opt(hour, minute, 0)
            .unwrap()
    }

    fn saturday_at(hour: u32, minute: u32) -> NaiveDateTime {
        // 2025-06-07 is a Saturday
        NaiveDate::from_ymd_opt(2025, 6, 7)
            .unwrap()
            .and_hms_opt(hour, minute, 0)
            .unwrap()
    }

    fn make_status(setpoint: f64) -> ZoneStatus {
        ZoneStatus::new(setpoint, 0, true, true)
    }

    fn day_and_lunch_table() -> ZoneSchedule {
        let mut table = ZoneSchedule::new();
        table.insert(
            Period::parse("Day", "09:00", "17:00", "MTWTFSS").unwrap(),
            make_status(19.0),
        );
        table.insert(
            Period::parse("Lunch override", "12:00", "13:00", "MTWTFSS").unwrap(),
            make_status(22.0),
        );
        table
    }

    #[test]
    fn test_empty_table_no_match() {
        let table = ZoneSchedule::new();
        assert!(match_period(&table, monday_at(12, 0)).is_none());
    }

    #[test]
    fn test_single_period_match() {
        let mut table = ZoneSchedule::new();
        table.insert(
            Period::parse("Day", "09:00", "17:00", "MTWTFSS").unwrap(),
            make_status(19.0),
        );

        let found = match_period(&table, monday_at(10, 0)).unwrap();
        assert_eq!(found.period.name, "Day");
    }

    #[test]
    fn test_override_wins_inside_window() {
        let table = day_and_lunch_table();
        let found = match_period(&table, monday_at(12, 30)).unwrap();
        assert_eq!(found.period.name, "Lunch override");
        assert_eq!(found.status, make_status(22.0));
    }

    #[test]
    fn test_broad_period_outside_override() {
        let table = day_and_lunch_table();
        let found = match_period(&table, monday_at(10, 0)).unwrap();
        assert_eq!(found.period.name, "Day");
    }

    #[test]
    fn test_no_match_outside_coverage() {
        let table = day_and_lunch_table();
        assert!(match_period(&table, monday_at(18, 0)).is_none());
    }

    #[test]
    fn test_day_mask_filters() {
        let mut table = ZoneSchedule::new();
        table.insert(
            Period::parse("Weekdays", "09:00", "17:00", "MTWTF..").unwrap(),
            make_status(19.0),
        );

        assert!(match_period(&table, monday_at(10, 0)).is_some());
        assert!(match_period(&table, saturday_at(10, 0)).is_none());
    }

    #[test]
    fn test_equal_start_narrower_wins() {
        let mut table = ZoneSchedule::new();
        table.insert(
            Period::parse("Day", "09:00", "17:00", "MTWTFSS").unwrap(),
            make_status(19.0),
        );
        table.insert(
            Period::parse("Morning briefing", "09:00", "10:00", "MTWTFSS").unwrap(),
            make_status(21.0),
        );

        let found = match_period(&table, monday_at(9, 30)).unwrap();
        assert_eq!(found.period.name, "Morning briefing");
    }

    #[test]
    fn test_identical_periods_last_inserted_wins() {
        let mut table = ZoneSchedule::new();
        table.insert(
            Period::parse("First", "09:00", "17:00", "MTWTFSS").unwrap(),
            make_status(19.0),
        );
        table.insert(
            Period::parse("Second", "09:00", "17:00", "MTWTFSS").unwrap(),
            make_status(21.0),
        );

        let found = match_period(&table, monday_at(10, 0)).unwrap();
        assert_eq!(found.period.name, "Second");
    }
}
