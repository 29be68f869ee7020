//! Recurring weekly time windows.
//!
//! A [`Period`] is a named daily window (offsets from local midnight) plus a
//! day-of-week mask. Periods are built once, validated eagerly, and never
//! mutated; the schedule tables that reference them drop them wholesale when
//! a replacement schedule arrives.

use std::cmp::Ordering;
use std::fmt;

use chrono::{Datelike, NaiveDateTime, NaiveTime, Timelike};
use serde::{Deserialize, Serialize};

use crate::error::{Result, ZoneschedError};

const MS_PER_MINUTE: i64 = 60 * 1000;
const MS_PER_HOUR: i64 = 60 * MS_PER_MINUTE;
const MS_PER_DAY: i64 = 24 * MS_PER_HOUR;

/// Shortest window a period may describe.
const MIN_DURATION_MS: i64 = MS_PER_MINUTE;

/// Day letters for rendering the mask, Monday first.
const DAY_LETTERS: &str = "MTWTFSS";

// Looser formats happily consume stricter input ("2:15 PM" would be eaten by
// "%H:%M" up to the trailing meridiem), so the specific ones must come first.
const DATE_TIME_FORMATS: &[&str] = &["%y-%m-%dT%H:%M"];
const TIME_FORMATS: &[&str] = &["%I:%M %p", "%I:%M%p", "%H:%M", "%H%M"];

/// A named, recurring weekly time window.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Period {
    /// Display name. Has no significance for ordering or equality.
    pub name: String,

    /// Start offset against local midnight, in milliseconds.
    pub start: i64,

    /// End offset against local midnight, in milliseconds.
    pub end: i64,

    /// Days this period is eligible on, as a bitmask.
    /// Bit 0 is Monday, bit 1 is Tuesday, and so on.
    pub days: u8,
}

impl Period {
    /// Create a period from raw millisecond offsets and a day bitmask.
    ///
    /// Fails if the name is empty, either offset is outside of a day, or the
    /// window is shorter than a minute.
    pub fn new(name: impl Into<String>, start: i64, end: i64, days: u8) -> Result<Self> {
        let name = name.into();

        if name.is_empty() {
            return Err(ZoneschedError::InvalidPeriod(
                "name can't be empty".to_string(),
            ));
        }

        if !(0..=MS_PER_DAY).contains(&start) {
            return Err(ZoneschedError::InvalidPeriod(format!(
                "start time {start} is beyond 24 hours"
            )));
        }

        if !(0..=MS_PER_DAY).contains(&end) {
            return Err(ZoneschedError::InvalidPeriod(format!(
                "end time {end} is beyond 24 hours"
            )));
        }

        if end - start < MIN_DURATION_MS {
            return Err(ZoneschedError::InvalidPeriod(format!(
                "duration {} is less than a minute",
                end - start
            )));
        }

        Ok(Self {
            name,
            start,
            end,
            days,
        })
    }

    /// Create a period from human-readable arguments.
    ///
    /// `start_time` and `end_time` accept any of the supported time formats
    /// (absolute date+time, 12-hour with AM/PM, 24-hour, compact `HHMM`).
    /// The `days` pattern is exactly seven characters, Monday at offset 0;
    /// space and `.` leave a day cleared, any other character sets it.
    pub fn parse(
        name: impl Into<String>,
        start_time: &str,
        end_time: &str,
        days: &str,
    ) -> Result<Self> {
        let start = parse_time(start_time)?;
        let end = parse_time(end_time)?;

        Self::new(name, start, end, parse_days(days)?)
    }

    /// Check if the given offset against midnight falls within this period.
    ///
    /// The range test is inclusive on both ends.
    pub fn includes_offset(&self, offset: i64) -> bool {
        self.start <= offset && offset <= self.end
    }

    /// Check if the given timestamp's time of day falls within this period.
    pub fn includes(&self, at: NaiveDateTime) -> bool {
        let offset = at.hour() as i64 * MS_PER_HOUR + at.minute() as i64 * MS_PER_MINUTE;
        self.includes_offset(offset)
    }

    /// Check if this period is eligible on the timestamp's day of week.
    pub fn includes_day(&self, at: NaiveDateTime) -> bool {
        let day = at.weekday().num_days_from_monday();
        self.days & (1 << day) != 0
    }
}

// Ordering and equality consider the window alone: ascending start, ties
// broken so the window that ends later sorts first. The matcher relies on
// this order to let narrower windows override broader ones.

impl Ord for Period {
    fn cmp(&self, other: &Self) -> Ordering {
        self.start
            .cmp(&other.start)
            .then_with(|| other.end.cmp(&self.end))
    }
}

impl PartialOrd for Period {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl PartialEq for Period {
    fn eq(&self, other: &Self) -> bool {
        self.start == other.start && self.end == other.end
    }
}

impl Eq for Period {}

impl fmt::Display for Period {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} ({} to {} on ",
            self.name,
            render_offset(self.start),
            render_offset(self.end)
        )?;

        for (offset, letter) in DAY_LETTERS.chars().enumerate() {
            let set = self.days & (1 << offset) != 0;
            write!(f, "{}", if set { letter } else { '.' })?;
        }

        write!(f, ")")
    }
}

/// Parse a time string into a millisecond offset against midnight.
///
/// Formats are tried in order, first match wins; seconds and below are
/// dropped, scheduling is minute-grained.
fn parse_time(input: &str) -> Result<i64> {
    for format in DATE_TIME_FORMATS {
        match NaiveDateTime::parse_from_str(input, format) {
            Ok(parsed) => return Ok(time_to_offset(parsed.time())),
            Err(_) => tracing::debug!(input = %input, format = %format, "format did not match"),
        }
    }

    for format in TIME_FORMATS {
        match NaiveTime::parse_from_str(input, format) {
            Ok(parsed) => return Ok(time_to_offset(parsed)),
            Err(_) => tracing::debug!(input = %input, format = %format, "format did not match"),
        }
    }

    let attempted: Vec<String> = DATE_TIME_FORMATS
        .iter()
        .chain(TIME_FORMATS.iter())
        .map(|format| format!("'{format}'"))
        .collect();

    Err(ZoneschedError::InvalidPeriod(format!(
        "tried all formats ({}) to parse '{}' and failed, giving up",
        attempted.join(", "),
        input
    )))
}

fn time_to_offset(time: NaiveTime) -> i64 {
    time.hour() as i64 * MS_PER_HOUR + time.minute() as i64 * MS_PER_MINUTE
}

/// Convert a seven-character day pattern into a bitmask, Monday at offset 0.
fn parse_days(pattern: &str) -> Result<u8> {
    if pattern.chars().count() != 7 {
        return Err(ZoneschedError::InvalidPeriod(format!(
            "day pattern '{pattern}' must be exactly 7 characters, Monday first"
        )));
    }

    let mut mask = 0u8;
    for (offset, c) in pattern.chars().enumerate() {
        if c != ' ' && c != '.' {
            mask |= 1 << offset;
        }
    }

    Ok(mask)
}

fn render_offset(offset: i64) -> String {
    format!(
        "{:02}:{:02}",
        offset / MS_PER_HOUR,
        (offset % MS_PER_HOUR) / MS_PER_MINUTE
    )
}
