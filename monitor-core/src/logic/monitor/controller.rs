//! Monitoring Loop Controller
//!
//! Synchronous state machine over `{Stopped, Running}`. It never sleeps or
//! performs I/O: it tells the service how to arm the timer, hands out tick
//! tickets, and accepts tick results tagged with the generation they were
//! started under. Results from an older generation are dropped.
//!
//! At most one tick is in flight: a timer fire that lands while the previous
//! tick is still acquiring or classifying is skipped, so verdicts are always
//! applied in the order their ticks started.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::error::{ClassificationError, MonitorError};
use crate::logic::alert_log::{AlertLog, AlertView};
use crate::logic::chart::{ChartData, ChartRenderer, RenderStyle};
use crate::logic::classifier::Verdict;
use crate::logic::fault_state::{DisplayUpdate, FaultStateMachine, Statistics};
use crate::logic::types::AcquisitionMode;
use crate::logic::waveform::{Acquisition, SimulationType, WaveformOrigin};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Lifecycle {
    Stopped,
    Running,
}

/// What the service must do with its repeating timer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimerCommand {
    /// (Re)create the timer with this period; the first tick fires one
    /// period from now.
    Arm { cadence: Duration },
    /// Drop the timer.
    Disarm,
    Unchanged,
}

/// Parameters captured when a tick starts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TickTicket {
    pub generation: u64,
    pub mode: AcquisitionMode,
    pub simulation: SimulationType,
}

/// User-adjustable loop settings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MonitorSettings {
    pub cadence_ms: u64,
    pub mode: AcquisitionMode,
    pub simulation: SimulationType,
}

impl Default for MonitorSettings {
    fn default() -> Self {
        Self {
            cadence_ms: crate::constants::DEFAULT_CADENCE_MS,
            mode: AcquisitionMode::Demo,
            simulation: SimulationType::Normal,
        }
    }
}

/// Hardware was unavailable and synthetic data is standing in.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DegradedNotice {
    pub reason: String,
    pub since: DateTime<Utc>,
    pub message: &'static str,
}

/// Mode banner shown at the top of the dashboard.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ModeBanner {
    pub title: &'static str,
    pub detail: &'static str,
}

impl From<AcquisitionMode> for ModeBanner {
    fn from(mode: AcquisitionMode) -> Self {
        match mode {
            AcquisitionMode::Demo => Self {
                title: "Demo Mode Active",
                detail: "Using simulated waveform data for testing and presentation",
            },
            AcquisitionMode::Hardware => Self {
                title: "Hardware Mode Active",
                detail: "Receiving real-time data from ESP32 sensors",
            },
        }
    }
}

/// Everything the dashboard page renders.
#[derive(Debug, Clone, Serialize)]
pub struct DashboardSnapshot {
    pub lifecycle: Lifecycle,
    pub is_running: bool,
    pub status_text: &'static str,
    pub settings: MonitorSettings,
    pub cadence_text: String,
    pub mode_banner: ModeBanner,
    pub generation: u64,
    pub ticks_started: u64,
    pub ticks_skipped: u64,
    pub server_time: DateTime<Utc>,
    pub started_at: Option<DateTime<Utc>>,
    pub uptime: String,
    pub display: DisplayUpdate,
    pub chart: ChartData,
    pub alerts: Vec<AlertView>,
    pub last_error: Option<String>,
    pub degraded: Option<DegradedNotice>,
    pub degraded_ticks: u64,
    pub last_origin: Option<WaveformOrigin>,
}

pub struct MonitorController {
    lifecycle: Lifecycle,
    settings: MonitorSettings,
    generation: u64,
    ticks_started: u64,
    ticks_skipped: u64,
    /// A tick of the current generation has not been classified yet.
    tick_in_flight: bool,
    started_at: Option<DateTime<Utc>>,
    frozen_uptime: Option<chrono::Duration>,
    faults: FaultStateMachine,
    alerts: AlertLog,
    chart: ChartRenderer,
    last_error: Option<String>,
    degraded: Option<DegradedNotice>,
    degraded_ticks: u64,
    last_origin: Option<WaveformOrigin>,
}

impl MonitorController {
    pub fn new(settings: MonitorSettings) -> Self {
        Self {
            lifecycle: Lifecycle::Stopped,
            settings,
            generation: 0,
            ticks_started: 0,
            ticks_skipped: 0,
            tick_in_flight: false,
            started_at: None,
            frozen_uptime: None,
            faults: FaultStateMachine::new(),
            alerts: AlertLog::new(),
            chart: ChartRenderer::new(),
            last_error: None,
            degraded: None,
            degraded_ticks: 0,
            last_origin: None,
        }
    }

    // ========================================================================
    // LIFECYCLE
    // ========================================================================

    /// Start ticking every `cadence_ms` in `mode`. No-op while running.
    pub fn start(
        &mut self,
        cadence_ms: u64,
        mode: AcquisitionMode,
        now: DateTime<Utc>,
    ) -> Result<TimerCommand, MonitorError> {
        if cadence_ms == 0 {
            return Err(MonitorError::InvalidCadence(cadence_ms));
        }
        if self.is_running() {
            return Ok(TimerCommand::Unchanged);
        }

        self.settings.cadence_ms = cadence_ms;
        self.settings.mode = mode;
        self.generation += 1;
        self.tick_in_flight = false;
        self.lifecycle = Lifecycle::Running;
        self.started_at = Some(now);
        self.frozen_uptime = None;

        log::info!(
            "Starting monitoring in {} mode every {}ms (generation {})",
            mode.label(),
            cadence_ms,
            self.generation
        );

        Ok(TimerCommand::Arm {
            cadence: Duration::from_millis(cadence_ms),
        })
    }

    /// Start with the current settings.
    pub fn resume(&mut self, now: DateTime<Utc>) -> Result<TimerCommand, MonitorError> {
        self.start(self.settings.cadence_ms, self.settings.mode, now)
    }

    /// Stop ticking and invalidate in-flight ticks. No-op while stopped.
    pub fn stop(&mut self, now: DateTime<Utc>) -> TimerCommand {
        if !self.is_running() {
            return TimerCommand::Unchanged;
        }

        self.frozen_uptime = self.started_at.map(|t| now - t);
        self.generation += 1;
        self.tick_in_flight = false;
        self.lifecycle = Lifecycle::Stopped;

        log::info!("Monitoring paused (generation {})", self.generation);
        TimerCommand::Disarm
    }

    pub fn toggle(&mut self, now: DateTime<Utc>) -> Result<TimerCommand, MonitorError> {
        if self.is_running() {
            Ok(self.stop(now))
        } else {
            self.resume(now)
        }
    }

    /// New cadence; restarts the loop if it is running.
    pub fn change_cadence(
        &mut self,
        cadence_ms: u64,
        now: DateTime<Utc>,
    ) -> Result<TimerCommand, MonitorError> {
        if cadence_ms == 0 {
            return Err(MonitorError::InvalidCadence(cadence_ms));
        }
        if !self.is_running() {
            self.settings.cadence_ms = cadence_ms;
            return Ok(TimerCommand::Unchanged);
        }

        log::info!("Cadence changed to {}ms, restarting loop", cadence_ms);
        self.stop(now);
        self.start(cadence_ms, self.settings.mode, now)
    }

    /// New acquisition mode; restarts the loop if it is running.
    pub fn change_mode(&mut self, mode: AcquisitionMode, now: DateTime<Utc>) -> TimerCommand {
        log::info!("Switched to {} mode", mode.label());
        if !self.is_running() {
            self.settings.mode = mode;
            return TimerCommand::Unchanged;
        }

        self.stop(now);
        // Cadence in settings was validated when it was stored.
        match self.start(self.settings.cadence_ms, mode, now) {
            Ok(command) => command,
            Err(e) => {
                log::error!("Restart after mode change failed: {}", e);
                TimerCommand::Disarm
            }
        }
    }

    /// Demo-mode shape; applies from the next tick without a restart.
    pub fn set_simulation(&mut self, simulation: SimulationType) {
        self.settings.simulation = simulation;
    }

    /// Stop, then forget everything the session accumulated.
    pub fn reset(&mut self, now: DateTime<Utc>) -> TimerCommand {
        let command = self.stop(now);

        self.faults.reset();
        self.alerts.clear();
        self.chart.clear();
        self.started_at = None;
        self.frozen_uptime = None;
        self.last_error = None;
        self.degraded = None;
        self.degraded_ticks = 0;
        self.last_origin = None;

        log::info!("Monitoring session reset");
        command
    }

    // ========================================================================
    // TICKS
    // ========================================================================

    /// Called when the timer fires. Returns `None` while stopped or while
    /// the previous tick has not been classified yet.
    pub fn begin_tick(&mut self) -> Option<TickTicket> {
        if !self.is_running() {
            return None;
        }
        if self.tick_in_flight {
            self.ticks_skipped += 1;
            log::debug!(
                "Previous tick still in flight, skipping (generation {})",
                self.generation
            );
            return None;
        }
        self.tick_in_flight = true;
        self.ticks_started += 1;
        Some(TickTicket {
            generation: self.generation,
            mode: self.settings.mode,
            simulation: self.settings.simulation,
        })
    }

    /// Render the tick's waveform. Returns false for a stale tick.
    pub fn on_acquired(
        &mut self,
        generation: u64,
        acquisition: &Acquisition,
        now: DateTime<Utc>,
    ) -> bool {
        if !self.is_current(generation) {
            log::debug!("Discarding stale acquisition from generation {}", generation);
            return false;
        }

        match &acquisition.origin {
            WaveformOrigin::Fallback { reason } => {
                self.degraded_ticks += 1;
                if self.degraded.is_none() {
                    log::warn!("Hardware unavailable, monitoring continues on demo data");
                    self.degraded = Some(DegradedNotice {
                        reason: reason.clone(),
                        since: now,
                        message: "Hardware data unavailable, temporarily using demo data",
                    });
                }
            }
            WaveformOrigin::Hardware => {
                if self.degraded.take().is_some() {
                    log::info!("Hardware data restored");
                }
            }
            WaveformOrigin::Synthetic { .. } => self.degraded = None,
        }

        self.chart.render(&acquisition.samples, RenderStyle::Live);
        self.last_origin = Some(acquisition.origin.clone());
        true
    }

    /// Apply the tick's classification. Stale or failed results change no
    /// statistics and produce no alert.
    pub fn on_classified(
        &mut self,
        generation: u64,
        result: Result<Verdict, ClassificationError>,
        now: DateTime<Utc>,
    ) -> Option<DisplayUpdate> {
        if !self.is_current(generation) {
            log::debug!("Discarding stale classification from generation {}", generation);
            return None;
        }
        self.tick_in_flight = false;

        match result {
            Ok(verdict) => {
                self.last_error = None;
                let applied = self.faults.apply(verdict, self.settings.mode, now);
                if let Some(alert) = applied.alert {
                    self.alerts.append(alert);
                }
                Some(applied.display)
            }
            Err(e) => {
                log::warn!("Classification failed, skipping tick: {}", e);
                self.last_error = Some(e.to_string());
                None
            }
        }
    }

    // ========================================================================
    // QUERIES
    // ========================================================================

    pub fn is_running(&self) -> bool {
        self.lifecycle == Lifecycle::Running
    }

    pub fn is_current(&self, generation: u64) -> bool {
        self.is_running() && generation == self.generation
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn tick_in_flight(&self) -> bool {
        self.tick_in_flight
    }

    pub fn settings(&self) -> &MonitorSettings {
        &self.settings
    }

    pub fn statistics(&self) -> &Statistics {
        self.faults.statistics()
    }

    pub fn alerts(&self) -> &AlertLog {
        &self.alerts
    }

    pub fn chart(&self) -> &ChartData {
        self.chart.data()
    }

    pub fn last_error(&self) -> Option<&str> {
        self.last_error.as_deref()
    }

    pub fn degraded(&self) -> Option<&DegradedNotice> {
        self.degraded.as_ref()
    }

    /// Time since the last start; frozen while stopped, zero after reset.
    pub fn uptime(&self, now: DateTime<Utc>) -> chrono::Duration {
        match (self.lifecycle, self.started_at, self.frozen_uptime) {
            (Lifecycle::Running, Some(started), _) => now - started,
            (_, _, Some(frozen)) => frozen,
            _ => chrono::Duration::zero(),
        }
    }

    pub fn snapshot(&self, now: DateTime<Utc>) -> DashboardSnapshot {
        DashboardSnapshot {
            lifecycle: self.lifecycle,
            is_running: self.is_running(),
            status_text: if self.is_running() {
                "Monitoring Active"
            } else {
                "Monitoring Paused"
            },
            settings: self.settings,
            cadence_text: format!("{:.1}s", self.settings.cadence_ms as f64 / 1000.0),
            mode_banner: self.settings.mode.into(),
            generation: self.generation,
            ticks_started: self.ticks_started,
            ticks_skipped: self.ticks_skipped,
            server_time: now,
            started_at: self.started_at,
            uptime: format_uptime(self.uptime(now)),
            display: self.faults.display(),
            chart: self.chart.data().clone(),
            alerts: self.alerts.views(),
            last_error: self.last_error.clone(),
            degraded: self.degraded.clone(),
            degraded_ticks: self.degraded_ticks,
            last_origin: self.last_origin.clone(),
        }
    }
}

/// `HH:MM:SS`; hours keep counting past 24.
pub fn format_uptime(uptime: chrono::Duration) -> String {
    let secs = uptime.num_seconds().max(0);
    format!("{:02}:{:02}:{:02}", secs / 3600, (secs % 3600) / 60, secs % 60)
}
