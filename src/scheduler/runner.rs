//! The scheduler: owns the live schedule and drives periodic re-evaluation.
//!
//! Once started, a single periodic task:
//! 1. Refreshes the schedule from the updater, if one is configured
//! 2. Resolves the active period for every zone, in name order
//! 3. Pushes statuses to zones only when they changed
//!
//! Status and deviation queries are safe to call while a tick runs; all
//! shared state sits behind one coarse lock, and the lock is never held
//! across the updater's I/O.

use std::collections::BTreeMap;
use std::sync::{Arc, Mutex};

use chrono::{Local, NaiveDateTime};
use tokio::task::JoinHandle;

use crate::config::SchedulerConfig;
use crate::domain::{Deviation, Period, Schedule, ZoneEntry, ZoneStatus};
use crate::error::{Result, ZoneschedError};
use crate::scheduler::matcher;
use crate::scheduler::updater::ScheduleUpdater;

/// The live schedule plus the per-zone apply caches.
#[derive(Default)]
struct SchedulerState {
    schedule: Schedule,
    /// Last status pushed to each zone. A missing entry means the zone has
    /// no active period, so the next match is applied unconditionally.
    current_status: BTreeMap<String, ZoneStatus>,
    /// Period that produced the last applied status, per zone.
    current_period: BTreeMap<String, Period>,
}

/// Drives zones through their schedules on a fixed cadence.
pub struct Scheduler {
    config: SchedulerConfig,
    updater: Option<Arc<dyn ScheduleUpdater>>,
    state: Arc<Mutex<SchedulerState>>,
    handle: Option<JoinHandle<()>>,
}

impl Default for Scheduler {
    fn default() -> Self {
        Self::new()
    }
}

impl Scheduler {
    /// Create a scheduler with no updater and an empty schedule. It does
    /// nothing until a schedule is supplied.
    pub fn new() -> Self {
        Self::build(None, Schedule::new())
    }

    /// Create a scheduler with no updater, initialized with a schedule.
    pub fn with_schedule(schedule: Schedule) -> Self {
        Self::build(None, schedule)
    }

    /// Create a scheduler that fetches its schedule from the given updater.
    pub fn with_updater(updater: Arc<dyn ScheduleUpdater>) -> Self {
        Self::build(Some(updater), Schedule::new())
    }

    /// Create a scheduler with both an updater and an initial schedule.
    pub fn with_updater_and_schedule(
        updater: Arc<dyn ScheduleUpdater>,
        schedule: Schedule,
    ) -> Self {
        Self::build(Some(updater), schedule)
    }

    fn build(updater: Option<Arc<dyn ScheduleUpdater>>, schedule: Schedule) -> Self {
        Self {
            config: SchedulerConfig::default(),
            updater,
            state: Arc::new(Mutex::new(SchedulerState {
                schedule,
                ..SchedulerState::default()
            })),
            handle: None,
        }
    }

    /// Override the cadence configuration.
    pub fn with_config(mut self, config: SchedulerConfig) -> Self {
        self.config = config;
        self
    }

    pub fn config(&self) -> &SchedulerConfig {
        &self.config
    }

    /// Start periodic execution.
    ///
    /// The first tick runs after the configured startup delay; subsequent
    /// ticks follow at the tick interval. Ticks never overlap, the whole
    /// cadence runs on one task.
    pub fn start(&mut self) {
        if self.is_running() {
            tracing::warn!("scheduler already started");
            return;
        }

        let config = self.config.clone();
        let updater = self.updater.clone();
        let state = self.state.clone();

        let handle = tokio::spawn(async move {
            // Let upstream sensors and actuators settle before the first pass.
            tokio::time::sleep(config.startup_delay()).await;

            loop {
                run_tick(&state, updater.as_ref(), &config, Local::now().naive_local()).await;
                tokio::time::sleep(config.tick_interval()).await;
            }
        });

        self.handle = Some(handle);
        tracing::info!(
            tick_interval_ms = self.config.tick_interval_ms,
            startup_delay_ms = self.config.startup_delay_ms,
            "scheduler started"
        );
    }

    /// Stop scheduling future ticks. No in-flight work is waited for.
    pub fn stop(&mut self) {
        if let Some(handle) = self.handle.take() {
            handle.abort();
            tracing::info!("scheduler stopped");
        }
    }

    pub fn is_running(&self) -> bool {
        self.handle.as_ref().is_some_and(|handle| !handle.is_finished())
    }

    /// Run one full scheduling pass against the current wall clock.
    pub async fn tick(&self) {
        self.tick_at(Local::now().naive_local()).await;
    }

    /// Run one full scheduling pass against the given wall-clock time.
    pub async fn tick_at(&self, now: NaiveDateTime) {
        run_tick(&self.state, self.updater.as_ref(), &self.config, now).await;
    }

    /// Last status applied to the zone, or `None` if the zone is unknown or
    /// has no active period.
    pub fn current_status(&self, zone_name: &str) -> Option<ZoneStatus> {
        self.state
            .lock()
            .unwrap()
            .current_status
            .get(zone_name)
            .cloned()
    }

    /// Period behind the last applied status, or `None` if the zone is
    /// unknown or has no active period.
    pub fn current_period(&self, zone_name: &str) -> Option<Period> {
        self.state
            .lock()
            .unwrap()
            .current_period
            .get(zone_name)
            .cloned()
    }

    /// Compare a zone's actual settings against what the schedule prescribes
    /// at `at`.
    ///
    /// Independent of the tick caches. A zone with no schedule table, or no
    /// period active at `at`, is simply on its own right now and reports no
    /// deviation.
    pub fn deviation(
        &self,
        zone_name: &str,
        actual_setpoint: f64,
        actual_enabled: bool,
        actual_voting: bool,
        at: NaiveDateTime,
    ) -> Deviation {
        let state = self.state.lock().unwrap();

        let Some(entry) = state.schedule.get(zone_name) else {
            tracing::debug!(zone = %zone_name, "no schedule for zone (yet?)");
            return Deviation::none();
        };

        let Some(matched) = matcher::match_period(entry.periods(), at) else {
            tracing::debug!(zone = %zone_name, "no active period");
            return Deviation::none();
        };

        let scheduled = &matched.status;
        let result = Deviation::new(
            scheduled.setpoint - actual_setpoint,
            scheduled.enabled != actual_enabled,
            scheduled.voting != actual_voting,
        );

        if result.is_none() {
            tracing::debug!(zone = %zone_name, "on schedule");
        } else {
            tracing::debug!(zone = %zone_name, scheduled = %scheduled, deviation = %result, "deviation found");
        }

        result
    }
}

impl Drop for Scheduler {
    fn drop(&mut self) {
        self.stop();
    }
}

/// One full pass: refresh the schedule, then apply every zone.
///
/// Every failure path is consumed here; nothing can escape and kill the
/// periodic task.
async fn run_tick(
    state: &Mutex<SchedulerState>,
    updater: Option<&Arc<dyn ScheduleUpdater>>,
    config: &SchedulerConfig,
    now: NaiveDateTime,
) {
    tracing::debug!("checking schedule");

    refresh_schedule(state, updater, config).await;
    apply_zones(state, now);

    tracing::debug!("done");
}

/// Pull a complete replacement schedule from the updater, if one is
/// configured. On any failure the previous schedule stays in force.
async fn refresh_schedule(
    state: &Mutex<SchedulerState>,
    updater: Option<&Arc<dyn ScheduleUpdater>>,
    config: &SchedulerConfig,
) {
    let Some(updater) = updater else {
        tracing::debug!("no updater configured, keeping current schedule");
        return;
    };

    // The updater may block on I/O; run it outside the state lock and bound
    // it so a stalled source delays one tick instead of hanging the
    // scheduler forever.
    let fetched = match tokio::time::timeout(config.updater_timeout(), updater.update()).await {
        Ok(result) => result,
        Err(_) => Err(ZoneschedError::UpdateTimeout(config.updater_timeout_ms)),
    };

    match fetched {
        Ok(new_schedule) => {
            let mut guard = state.lock().unwrap();
            let state = &mut *guard;
            // The previous schedule is discarded wholesale, no merging.
            state.schedule = new_schedule;
            // Zones that disappeared take their apply caches with them.
            let schedule = &state.schedule;
            state.current_status.retain(|name, _| schedule.contains(name));
            state.current_period.retain(|name, _| schedule.contains(name));
            tracing::debug!(zones = schedule.len(), "schedule replaced");
        }
        Err(err @ ZoneschedError::Configuration(_)) => {
            // A broken updater is a wiring defect, not a transient failure;
            // report it loudly but keep running on the previous schedule.
            tracing::error!(error = %err, "defective schedule updater, keeping previous schedule");
        }
        Err(err) => {
            tracing::error!(error = %err, "schedule update failed, keeping previous schedule");
        }
    }
}

/// Apply every zone in the schedule, independently.
fn apply_zones(state: &Mutex<SchedulerState>, now: NaiveDateTime) {
    let mut guard = state.lock().unwrap();
    let SchedulerState {
        schedule,
        current_status,
        current_period,
    } = &mut *guard;

    for (name, entry) in schedule.iter() {
        // Errors with individual zones must not affect the others; that
        // includes a zone implementation that panics.
        let outcome = std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| {
            apply_zone(name, entry, &mut *current_status, &mut *current_period, now)
        }));

        match outcome {
            Ok(Ok(())) => {}
            Ok(Err(err)) => {
                tracing::error!(zone = %name, error = %err, "failed to set schedule, will retry on next run");
            }
            Err(_) => {
                tracing::error!(zone = %name, "zone processing panicked, will retry on next run");
            }
        }
    }
}

/// Resolve and, when the status changed, actuate a single zone.
fn apply_zone(
    name: &str,
    entry: &ZoneEntry,
    current_status: &mut BTreeMap<String, ZoneStatus>,
    current_period: &mut BTreeMap<String, Period>,
    now: NaiveDateTime,
) -> Result<()> {
    let Some(matched) = matcher::match_period(entry.periods(), now) else {
        // An uncovered stretch is a normal steady state. Dropping the caches
        // makes the next transition into coverage a fresh apply.
        current_status.remove(name);
        current_period.remove(name);
        tracing::info!(zone = %name, "no active period");
        return Ok(());
    };

    if current_status.get(name) == Some(&matched.status) {
        // Same status, nothing to actuate. A different period carrying an
        // identical status still refreshes the period cache.
        if current_period.get(name) != Some(&matched.period) {
            current_period.insert(name.to_string(), matched.period.clone());
        }
        return Ok(());
    }

    entry.zone().set(&matched.status)?;
    current_status.insert(name.to_string(), matched.status.clone());
    current_period.insert(name.to_string(), matched.period.clone());
    tracing::info!(zone = %name, period = %matched.period, status = %matched.status, "zone set");

    Ok(())
}
