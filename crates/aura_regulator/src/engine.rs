//! Regulation engine: the orchestrator.
//!
//! All state lives in a single driver task. Callers talk to it through a
//! command channel and read it through a `watch` snapshot, so every
//! mutation (spike, settled reaction, controller tick, mode reset) runs on
//! one task, one at a time. Pending reactions and the controller timer are
//! futures owned by the driver; resetting drops them, which cancels them.

use crate::controller::{ControllerState, RegulationController, TickOutcome};
use crate::policy::{policy_for, RegulationPolicy};
use crate::stimulus::{self, RandomStimulus, StimulusSource};
use aura_core::{
    AffectPoint, AffectZone, AuraConfig, ConfigError, EventLog, LogEntry, Narration,
    RegulationConfig, RegulationMode, StressLevel,
};
use futures::future::BoxFuture;
use futures::stream::FuturesUnordered;
use futures::{FutureExt, StreamExt};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tokio::sync::{mpsc, oneshot, watch};
use tokio::task::JoinHandle;

const STABILIZED_TEXT: &str = "System stabilized. Rerouting connection via backup server.";

/// Read-only view of the engine for presentation layers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EngineSnapshot {
    pub mode: RegulationMode,
    pub stress_level: StressLevel,
    pub controller_state: ControllerState,
    /// Newest first, at most the configured capacity.
    pub log: Vec<LogEntry>,
    pub affect: AffectPoint,
    pub zone: AffectZone,
    /// Spikes whose reaction has not fired yet.
    pub pending_reactions: usize,
}

impl EngineSnapshot {
    fn initial(mode: RegulationMode) -> Self {
        let affect = AffectPoint::origin();
        Self {
            mode,
            stress_level: StressLevel::ZERO,
            controller_state: ControllerState::Idle,
            log: Vec::new(),
            affect,
            zone: affect.zone(),
            pending_reactions: 0,
        }
    }
}

enum Command {
    InjectFailure { ack: oneshot::Sender<()> },
    SetMode {
        mode: RegulationMode,
        ack: oneshot::Sender<()>,
    },
    Shutdown { ack: oneshot::Sender<()> },
}

/// A delayed reaction, tagged with the epoch it was scheduled in.
#[derive(Debug, Clone, Copy)]
struct SettleTicket {
    epoch: u64,
}

/// Handle to a running regulation engine.
///
/// Dropping the handle closes the command channel; the driver then cancels
/// its pending reactions and controller timer and exits.
pub struct RegulationEngine {
    command_tx: mpsc::Sender<Command>,
    snapshot_rx: watch::Receiver<EngineSnapshot>,
    driver: JoinHandle<()>,
}

impl RegulationEngine {
    /// Engine with default configuration and a thread-RNG stimulus source.
    ///
    /// Must be called from within a tokio runtime.
    #[allow(clippy::new_without_default)]
    pub fn new() -> Self {
        Self::spawn(RegulationConfig::default(), Box::new(RandomStimulus::default()))
    }

    /// Engine configured from a full `AuraConfig`, seeded if it carries a seed.
    pub fn with_config(config: &AuraConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self::spawn(
            config.regulation.clone(),
            stimulus::from_config(&config.stimulus),
        ))
    }

    /// Engine with an explicit stimulus source (seeded or scripted in tests).
    pub fn with_stimulus(
        config: RegulationConfig,
        stimulus: Box<dyn StimulusSource>,
    ) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self::spawn(config, stimulus))
    }

    fn spawn(config: RegulationConfig, stimulus: Box<dyn StimulusSource>) -> Self {
        let (command_tx, command_rx) = mpsc::channel(64);
        let (snapshot_tx, snapshot_rx) =
            watch::channel(EngineSnapshot::initial(config.initial_mode));
        let driver = Driver::new(config, stimulus, snapshot_tx);
        let driver = tokio::spawn(driver.run(command_rx));
        Self {
            command_tx,
            snapshot_rx,
            driver,
        }
    }

    /// Spike stress from the stimulus source; the active policy reacts once
    /// the settle delay has passed.
    pub async fn inject_failure(&self) {
        self.dispatch("inject_failure", |ack| Command::InjectFailure { ack })
            .await;
    }

    /// Reset stress and log, cancel pending work, and switch policy.
    pub async fn set_mode(&self, mode: RegulationMode) {
        self.dispatch("set_mode", |ack| Command::SetMode { mode, ack })
            .await;
    }

    /// Current state. Never mutates.
    pub fn snapshot(&self) -> EngineSnapshot {
        self.snapshot_rx.borrow().clone()
    }

    /// Subscribe to state updates, published after every change.
    pub fn subscribe(&self) -> watch::Receiver<EngineSnapshot> {
        self.snapshot_rx.clone()
    }

    /// Cancel everything outstanding and wait for the driver to stop.
    pub async fn shutdown(self) {
        self.dispatch("shutdown", |ack| Command::Shutdown { ack }).await;
        if let Err(e) = self.driver.await {
            tracing::warn!("Regulation driver ended abnormally: {}", e);
        }
    }

    async fn dispatch(&self, op: &str, make: impl FnOnce(oneshot::Sender<()>) -> Command) {
        let (ack_tx, ack_rx) = oneshot::channel();
        if self.command_tx.send(make(ack_tx)).await.is_err() {
            tracing::warn!("{} ignored: regulation engine has stopped", op);
            return;
        }
        if ack_rx.await.is_err() {
            tracing::warn!("{} not acknowledged: regulation engine has stopped", op);
        }
    }
}

/// Owner of all mutable engine state.
struct Driver {
    config: RegulationConfig,
    stimulus: Box<dyn StimulusSource>,
    mode: RegulationMode,
    policy: Arc<dyn RegulationPolicy>,
    stress: StressLevel,
    affect: AffectPoint,
    log: EventLog,
    controller: RegulationController,
    /// Bumped on every reset; reactions from older epochs are stale.
    epoch: u64,
    pending: FuturesUnordered<BoxFuture<'static, SettleTicket>>,
    snapshot_tx: watch::Sender<EngineSnapshot>,
}

impl Driver {
    fn new(
        config: RegulationConfig,
        stimulus: Box<dyn StimulusSource>,
        snapshot_tx: watch::Sender<EngineSnapshot>,
    ) -> Self {
        let mode = config.initial_mode;
        Self {
            policy: policy_for(mode, &config),
            controller: RegulationController::new(&config),
            log: EventLog::with_capacity(config.log_capacity),
            mode,
            stress: StressLevel::ZERO,
            affect: AffectPoint::origin(),
            epoch: 0,
            pending: FuturesUnordered::new(),
            stimulus,
            snapshot_tx,
            config,
        }
    }

    async fn run(mut self, mut commands: mpsc::Receiver<Command>) {
        tracing::debug!("Regulation driver started in {} mode", self.mode);

        loop {
            tokio::select! {
                // Commands first: a reset always wins over a timer that
                // became ready at the same instant.
                biased;

                cmd = commands.recv() => match cmd {
                    Some(Command::InjectFailure { ack }) => {
                        self.inject_failure();
                        let _ = ack.send(());
                    }
                    Some(Command::SetMode { mode, ack }) => {
                        self.set_mode(mode);
                        let _ = ack.send(());
                    }
                    Some(Command::Shutdown { ack }) => {
                        self.teardown();
                        let _ = ack.send(());
                        break;
                    }
                    None => {
                        self.teardown();
                        break;
                    }
                },

                Some(ticket) = self.pending.next(), if !self.pending.is_empty() => {
                    self.settle(ticket);
                }

                run = self.controller.tick(), if self.controller.is_running() => {
                    self.decay(run);
                }
            }
        }

        tracing::debug!("Regulation driver stopped");
    }

    fn inject_failure(&mut self) {
        let magnitude = self.stimulus.next_magnitude();
        self.set_stress(self.stress.spiked(magnitude as u32));
        self.log.push(Narration::system(format!(
            "API timeout error detected. Stress spike +{}%",
            magnitude
        )));
        tracing::debug!("Failure injected: +{} -> {}", magnitude, self.stress);

        let ticket = SettleTicket { epoch: self.epoch };
        let delay = self.config.settle_delay();
        self.pending.push(
            async move {
                tokio::time::sleep(delay).await;
                ticket
            }
            .boxed(),
        );
        self.publish();
    }

    /// The policy reacts to stress as it is now, not as it was at the spike.
    fn settle(&mut self, ticket: SettleTicket) {
        if ticket.epoch != self.epoch {
            tracing::warn!(
                "Dropping stale reaction from epoch {} (now {})",
                ticket.epoch,
                self.epoch
            );
            return;
        }

        let stress = self.stress;
        self.log.push(self.policy.react(stress));

        if self.policy.should_engage_controller(stress) {
            if self.controller.engage() {
                tracing::info!("Stress at {}: decay controller engaged", stress);
            } else {
                tracing::debug!("Stress at {}: decay controller already running", stress);
            }
        }
        self.publish();
    }

    fn decay(&mut self, run: u64) {
        match self.controller.apply_tick(run, self.stress) {
            None => {
                tracing::warn!("Dropping stale tick from controller run {}", run);
                return;
            }
            Some(TickOutcome::Decayed(next)) => self.set_stress(next),
            Some(TickOutcome::Converged(next)) => {
                self.set_stress(next);
                self.log.push(Narration::ai(STABILIZED_TEXT));
                tracing::info!("Stress stabilized at {}", next);
            }
        }
        self.publish();
    }

    fn set_mode(&mut self, mode: RegulationMode) {
        let dropped = self.cancel_outstanding();
        self.set_stress(StressLevel::ZERO);
        self.log.clear();
        self.mode = mode;
        self.policy = policy_for(mode, &self.config);
        self.log.push(Narration::system(format!(
            "Switched to {} architecture.",
            mode.label()
        )));
        tracing::info!(
            "Switched to {} mode ({} pending reactions cancelled)",
            mode,
            dropped
        );
        self.publish();
    }

    fn teardown(&mut self) {
        let dropped = self.cancel_outstanding();
        tracing::debug!("Tearing down ({} pending reactions cancelled)", dropped);
        self.publish();
    }

    /// Start a new epoch, drop every pending reaction and stop the
    /// controller. Returns how many reactions were dropped.
    fn cancel_outstanding(&mut self) -> usize {
        self.epoch += 1;
        let dropped = self.pending.len();
        self.pending = FuturesUnordered::new();
        self.controller.cancel();
        dropped
    }

    fn set_stress(&mut self, stress: StressLevel) {
        self.stress = stress;
        self.affect = AffectPoint::under_stress(stress);
    }

    fn publish(&self) {
        let _ = self.snapshot_tx.send(EngineSnapshot {
            mode: self.mode,
            stress_level: self.stress,
            controller_state: self.controller.state(),
            log: self.log.to_vec(),
            affect: self.affect,
            zone: self.affect.zone(),
            pending_reactions: self.pending.len(),
        });
    }
}
