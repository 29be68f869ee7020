//! Zone settings and deviation reporting.
//!
//! [`ZoneStatus`] is the value a schedule pushes to a zone: setpoint,
//! enabled/voting flags, dump priority. Change detection compares statuses
//! by value, so a tick that resolves to the same status is a no-op.
//! [`Deviation`] is the transient answer to "how far has this zone drifted
//! from what the schedule says".

use std::fmt;

use serde::{Deserialize, Serialize};

/// Settings to apply to a zone while a period is active.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ZoneStatus {
    /// Target setpoint temperature.
    pub setpoint: f64,

    /// Dump priority for excess capacity.
    pub dump_priority: u32,

    /// Whether the zone participates in temperature control at all.
    pub enabled: bool,

    /// Whether the zone's demand counts toward the unit's call signal.
    pub voting: bool,
}

impl ZoneStatus {
    /// Create a status value.
    pub fn new(setpoint: f64, dump_priority: u32, enabled: bool, voting: bool) -> Self {
        Self {
            setpoint,
            dump_priority,
            enabled,
            voting,
        }
    }
}

impl fmt::Display for ZoneStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "(setpoint={}, {}, {}, dump priority={})",
            self.setpoint,
            if self.enabled { "enabled" } else { "disabled" },
            if self.voting { "voting" } else { "not voting" },
            self.dump_priority
        )
    }
}

/// Difference between a zone's scheduled settings and its actual ones.
///
/// Setpoint deviation is signed, scheduled minus actual; the flags report a
/// mismatch rather than a direction. Dump priority is not compared.
#[derive(Debug, Clone, PartialEq)]
pub struct Deviation {
    /// Scheduled setpoint minus actual setpoint.
    pub setpoint: f64,

    /// The enabled flag differs from the schedule.
    pub enabled: bool,

    /// The voting flag differs from the schedule.
    pub voting: bool,
}

impl Deviation {
    /// Create a deviation result.
    pub fn new(setpoint: f64, enabled: bool, voting: bool) -> Self {
        Self {
            setpoint,
            enabled,
            voting,
        }
    }

    /// The "on schedule" result: no deviation at all.
    pub fn none() -> Self {
        Self::new(0.0, false, false)
    }

    /// Check whether any deviation was found.
    pub fn is_none(&self) -> bool {
        self.setpoint == 0.0 && !self.enabled && !self.voting
    }
}

impl fmt::Display for Deviation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "(setpoint deviation={:.1}", self.setpoint)?;
        if self.enabled {
            write!(f, ", enabled differs")?;
        }
        if self.voting {
            write!(f, ", voting differs")?;
        }
        write!(f, ")")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_zone_status_equality() {
        let a = ZoneStatus::new(21.5, 0, true, true);
        let b = ZoneStatus::new(21.5, 0, true, true);
        let c = ZoneStatus::new(21.0, 0, true, true);
        assert_eq!(a, b);
        assert_ne!(a, c);
    }

    #[test]
    fn test_zone_status_equality_covers_flags() {
        let base = ZoneStatus::new(21.5, 0, true, true);
        assert_ne!(base, ZoneStatus::new(21.5, 1, true, true));
        assert_ne!(base, ZoneStatus::new(21.5, 0, false, true));
        assert_ne!(base, ZoneStatus::new(21.5, 0, true, false));
    }

    #[test]
    fn test_zone_status_display() {
        let on = ZoneStatus::new(21.5, 2, true, true);
        assert_eq!(on.to_string(), "(setpoint=21.5, enabled, voting, dump priority=2)");

        let off = ZoneStatus::new(12.0, 0, false, false);
        assert_eq!(
            off.to_string(),
            "(setpoint=12, disabled, not voting, dump priority=0)"
        );
    }

    #[test]
    fn test_zone_status_serde_roundtrip() {
        let status = ZoneStatus::new(19.3, 1, true, false);
        let json = serde_json::to_string(&status).unwrap();
        let restored: ZoneStatus = serde_json::from_str(&json).unwrap();
        assert_eq!(restored, status);
    }

    #[test]
    fn test_deviation_none() {
        let d = Deviation::none();
        assert!(d.is_none());
        assert_eq!(d, Deviation::new(0.0, false, false));
    }

    #[test]
    fn test_deviation_not_none() {
        assert!(!Deviation::new(-2.0, false, false).is_none());
        assert!(!Deviation::new(0.0, true, false).is_none());
        assert!(!Deviation::new(0.0, false, true).is_none());
    }

    #[test]
    fn test_deviation_display_clean() {
        assert_eq!(Deviation::none().to_string(), "(setpoint deviation=0.0)");
    }

    #[test]
    fn test_deviation_display_with_flags() {
        let d = Deviation::new(-2.0, true, true);
        assert_eq!(
            d.to_string(),
            "(setpoint deviation=-2.0, enabled differs, voting differs)"
        );
    }
}
