//! Schedule refresh boundary.
//!
//! The scheduler does not own its schedule source; an updater pulls a
//! complete replacement table on demand (from a calendar, a file, a web
//! service) and the previous schedule is discarded wholesale.

use async_trait::async_trait;

use crate::domain::Schedule;
use crate::error::Result;

/// Pulls a complete replacement schedule.
///
/// The contract is all-or-nothing: on success the returned schedule replaces
/// the previous one entirely; on error the caller logs the failure, keeps
/// the previous schedule, and retries on the next tick. Implementations that
/// read from a source that can stall are bounded by the scheduler's updater
/// timeout, so a hung source delays a single tick rather than the scheduler
/// forever.
#[async_trait]
pub trait ScheduleUpdater: Send + Sync {
    /// Fetch the complete schedule now.
    async fn update(&self) -> Result<Schedule>;
}
