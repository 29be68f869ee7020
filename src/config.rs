//! Scheduler configuration.
//!
//! Cadence constants with sensible defaults, loadable from a YAML file.
//! These are the only externally meaningful knobs the core has.

use std::fs;
use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::Result;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SchedulerConfig {
    /// Schedule check and execution granularity, in milliseconds.
    pub tick_interval_ms: u64,

    /// Delay before the first tick, in milliseconds. Lets upstream sensors
    /// and actuators settle before the scheduler starts pushing settings.
    pub startup_delay_ms: u64,

    /// Upper bound on a single schedule refresh, in milliseconds.
    pub updater_timeout_ms: u64,
}

impl Default for SchedulerConfig {
    fn default() -> Self {
        Self {
            tick_interval_ms: 60_000,
            startup_delay_ms: 10_000,
            updater_timeout_ms: 30_000,
        }
    }
}

impl SchedulerConfig {
    /// Load configuration from a YAML file. Missing keys fall back to the
    /// defaults.
    pub fn load(path: &Path) -> Result<Self> {
        let text = fs::read_to_string(path)?;
        Ok(serde_yaml::from_str(&text)?)
    }

    pub fn tick_interval(&self) -> Duration {
        Duration::from_millis(self.tick_interval_ms)
    }

    pub fn startup_delay(&self) -> Duration {
        Duration::from_millis(self.startup_delay_ms)
    }

    pub fn updater_timeout(&self) -> Duration {
        Duration::from_millis(self.updater_timeout_ms)
    }
}
