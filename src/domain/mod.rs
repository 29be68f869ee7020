//! Domain types for zonesched
//!
//! This module contains all core domain types:
//! - Period: A named, recurring weekly time window with a day-of-week mask
//! - ZoneStatus: The settings a schedule pushes to a zone
//! - Deviation: Drift between scheduled and actual settings
//! - Zone: The actuation boundary the scheduler drives
//! - ZoneSchedule / Schedule: Ordered period tables, per zone and overall

pub mod period;
pub mod schedule;
pub mod status;
pub mod zone;

pub use period::Period;
pub use schedule::{Schedule, ScheduleEntry, ZoneEntry, ZoneSchedule};
pub use status::{Deviation, ZoneStatus};
pub use zone::{Zone, ZoneHandle};
