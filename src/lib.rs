//! zonesched - a zoned climate-control scheduler
//!
//! Once per tick, zonesched decides which named recurring weekly period is
//! active for each controllable zone and pushes that period's status to the
//! zone, but only when it differs from what was last applied. It also
//! reports how far a zone's actual settings have drifted from the schedule.

pub mod config;
pub mod domain;
pub mod error;
pub mod scheduler;

pub use error::{Result, ZoneschedError};
