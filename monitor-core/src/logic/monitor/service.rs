//! Monitoring Service - the task that owns the controller.
//!
//! All state changes happen on this one task, driven by three inputs:
//! control requests from `MonitorHandle`, the repeating timer (present only
//! while running), and progress events from spawned tick tasks. Tick tasks
//! do the slow work (acquisition, classification) and report back tagged
//! with their generation. A new tick task is only spawned once the previous
//! one has reported its classification.

use chrono::Utc;
use std::sync::Arc;
use tokio::sync::{mpsc, oneshot};
use tokio::time::{interval_at, Instant, Interval, MissedTickBehavior};

use super::controller::{DashboardSnapshot, MonitorController, MonitorSettings, TimerCommand};
use crate::error::{ClassificationError, MonitorError};
use crate::logic::classifier::{Classifier, Verdict};
use crate::logic::types::AcquisitionMode;
use crate::logic::waveform::{Acquisition, HardwareFeed, SimulationType, WaveformSource};

/// Pending control requests before senders wait
const COMMAND_QUEUE_DEPTH: usize = 32;

// ============================================================================
// MESSAGES
// ============================================================================

/// Control actions accepted by the service.
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    Snapshot,
    Start {
        cadence_ms: Option<u64>,
        mode: Option<AcquisitionMode>,
    },
    Stop,
    Toggle,
    Reset,
    SetCadence(u64),
    SetMode(AcquisitionMode),
    SetSimulation(SimulationType),
}

struct Request {
    command: Command,
    reply: oneshot::Sender<Result<DashboardSnapshot, MonitorError>>,
}

enum TickEvent {
    Acquired {
        generation: u64,
        acquisition: Acquisition,
    },
    Classified {
        generation: u64,
        result: Result<Verdict, ClassificationError>,
    },
}

// ============================================================================
// HANDLE
// ============================================================================

/// Cloneable front door to a running `MonitorService`.
#[derive(Clone)]
pub struct MonitorHandle {
    commands: mpsc::Sender<Request>,
}

impl MonitorHandle {
    /// Send a command and wait for the resulting snapshot.
    pub async fn send(&self, command: Command) -> Result<DashboardSnapshot, MonitorError> {
        let (reply, response) = oneshot::channel();
        self.commands
            .send(Request { command, reply })
            .await
            .map_err(|_| MonitorError::Unavailable)?;
        response.await.map_err(|_| MonitorError::Unavailable)?
    }

    pub async fn snapshot(&self) -> Result<DashboardSnapshot, MonitorError> {
        self.send(Command::Snapshot).await
    }

    pub async fn start(
        &self,
        cadence_ms: Option<u64>,
        mode: Option<AcquisitionMode>,
    ) -> Result<DashboardSnapshot, MonitorError> {
        self.send(Command::Start { cadence_ms, mode }).await
    }

    pub async fn stop(&self) -> Result<DashboardSnapshot, MonitorError> {
        self.send(Command::Stop).await
    }

    pub async fn toggle(&self) -> Result<DashboardSnapshot, MonitorError> {
        self.send(Command::Toggle).await
    }

    pub async fn reset(&self) -> Result<DashboardSnapshot, MonitorError> {
        self.send(Command::Reset).await
    }

    pub async fn set_cadence(&self, cadence_ms: u64) -> Result<DashboardSnapshot, MonitorError> {
        self.send(Command::SetCadence(cadence_ms)).await
    }

    pub async fn set_mode(&self, mode: AcquisitionMode) -> Result<DashboardSnapshot, MonitorError> {
        self.send(Command::SetMode(mode)).await
    }

    pub async fn set_simulation(
        &self,
        simulation: SimulationType,
    ) -> Result<DashboardSnapshot, MonitorError> {
        self.send(Command::SetSimulation(simulation)).await
    }
}

// ============================================================================
// SERVICE
// ============================================================================

pub struct MonitorService<H, C> {
    controller: MonitorController,
    source: Arc<WaveformSource<H>>,
    classifier: Arc<C>,
    commands: mpsc::Receiver<Request>,
    events_tx: mpsc::UnboundedSender<TickEvent>,
    events_rx: mpsc::UnboundedReceiver<TickEvent>,
    ticker: Option<Interval>,
}

impl<H: HardwareFeed, C: Classifier> MonitorService<H, C> {
    /// Build the service and its handle without starting it.
    pub fn new(
        settings: MonitorSettings,
        source: WaveformSource<H>,
        classifier: Arc<C>,
    ) -> (Self, MonitorHandle) {
        let (commands_tx, commands) = mpsc::channel(COMMAND_QUEUE_DEPTH);
        let (events_tx, events_rx) = mpsc::unbounded_channel();

        let service = Self {
            controller: MonitorController::new(settings),
            source: Arc::new(source),
            classifier,
            commands,
            events_tx,
            events_rx,
            ticker: None,
        };

        (service, MonitorHandle { commands: commands_tx })
    }

    /// Build and run on the current tokio runtime. The service stops when
    /// every handle has been dropped.
    pub fn spawn(
        settings: MonitorSettings,
        source: WaveformSource<H>,
        classifier: Arc<C>,
    ) -> MonitorHandle {
        let (service, handle) = Self::new(settings, source, classifier);
        tokio::spawn(service.run());
        handle
    }

    pub async fn run(mut self) {
        log::info!("Monitoring service ready");

        loop {
            tokio::select! {
                request = self.commands.recv() => match request {
                    Some(request) => self.handle_request(request),
                    None => break,
                },
                Some(event) = self.events_rx.recv() => self.handle_event(event),
                _ = next_tick(&mut self.ticker) => self.spawn_tick(),
            }
        }

        log::info!("Monitoring service shut down");
    }

    fn handle_request(&mut self, request: Request) {
        let now = Utc::now();
        let settings = *self.controller.settings();

        let outcome = match request.command {
            Command::Snapshot => Ok(TimerCommand::Unchanged),
            Command::Start { cadence_ms, mode } => self.controller.start(
                cadence_ms.unwrap_or(settings.cadence_ms),
                mode.unwrap_or(settings.mode),
                now,
            ),
            Command::Stop => Ok(self.controller.stop(now)),
            Command::Toggle => self.controller.toggle(now),
            Command::Reset => Ok(self.controller.reset(now)),
            Command::SetCadence(cadence_ms) => self.controller.change_cadence(cadence_ms, now),
            Command::SetMode(mode) => Ok(self.controller.change_mode(mode, now)),
            Command::SetSimulation(simulation) => {
                self.controller.set_simulation(simulation);
                Ok(TimerCommand::Unchanged)
            }
        };

        let reply = outcome.map(|timer| {
            self.apply_timer(timer);
            self.controller.snapshot(now)
        });

        // Caller may have given up waiting; nothing to do then.
        let _ = request.reply.send(reply);
    }

    fn handle_event(&mut self, event: TickEvent) {
        let now = Utc::now();
        match event {
            TickEvent::Acquired {
                generation,
                acquisition,
            } => {
                self.controller.on_acquired(generation, &acquisition, now);
            }
            TickEvent::Classified { generation, result } => {
                self.controller.on_classified(generation, result, now);
            }
        }
    }

    fn apply_timer(&mut self, command: TimerCommand) {
        match command {
            TimerCommand::Arm { cadence } => {
                let mut interval = interval_at(Instant::now() + cadence, cadence);
                interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
                self.ticker = Some(interval);
            }
            TimerCommand::Disarm => self.ticker = None,
            TimerCommand::Unchanged => {}
        }
    }

    fn spawn_tick(&mut self) {
        let Some(ticket) = self.controller.begin_tick() else {
            return;
        };

        let source = Arc::clone(&self.source);
        let classifier = Arc::clone(&self.classifier);
        let events = self.events_tx.clone();

        tokio::spawn(async move {
            let acquisition = source.acquire(ticket.mode, ticket.simulation).await;
            let samples = acquisition.samples.clone();

            let acquired = TickEvent::Acquired {
                generation: ticket.generation,
                acquisition,
            };
            if events.send(acquired).is_err() {
                return;
            }

            let result = classifier.classify(&samples).await;
            let _ = events.send(TickEvent::Classified {
                generation: ticket.generation,
                result,
            });
        });
    }
}

/// Resolves on the next timer tick; never resolves without a timer.
async fn next_tick(ticker: &mut Option<Interval>) {
    match ticker {
        Some(interval) => {
            interval.tick().await;
        }
        None => std::future::pending::<()>().await,
    }
}
