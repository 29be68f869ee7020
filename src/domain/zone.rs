//! The zone boundary.
//!
//! The scheduler treats a zone purely as something with a stable name and a
//! `set` operation; dampers, servos and the thermostat's own control logic
//! live behind implementations of this trait.

use std::sync::Arc;

use crate::domain::ZoneStatus;
use crate::error::Result;

/// An independently controllable unit that can be told to adopt a status.
pub trait Zone: Send + Sync {
    /// Display name; doubles as the zone's stable identity, so schedules
    /// and caches key on it.
    fn name(&self) -> &str;

    /// Push new settings to the zone.
    ///
    /// Treated as a synchronous collaborator call; retry semantics are the
    /// implementation's business. An error here is caught per zone by the
    /// scheduler and retried on the next tick.
    fn set(&self, status: &ZoneStatus) -> Result<()>;
}

/// Shared handle to a zone.
pub type ZoneHandle = Arc<dyn Zone>;
