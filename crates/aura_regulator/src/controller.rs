//! The decay controller (the "prefrontal" loop).
//!
//! While running it owns a tokio interval; every tick removes a fixed step
//! of stress until the level drops below the stabilization threshold. It
//! never touches engine state itself: the engine polls [`tick`] and feeds
//! the result back through [`apply_tick`], so the controller stays a plain
//! state machine that can be driven from one task.
//!
//! [`tick`]: RegulationController::tick
//! [`apply_tick`]: RegulationController::apply_tick

use aura_core::{RegulationConfig, StressLevel};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tokio::time::{Instant, Interval, MissedTickBehavior};

/// Floor for the tick period; tokio intervals reject a zero period.
const MIN_TICK_INTERVAL: Duration = Duration::from_millis(1);

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ControllerState {
    #[default]
    Idle,
    Running,
}

/// What one tick did to stress.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickOutcome {
    /// Still at or above the stabilization threshold; keep running.
    Decayed(StressLevel),
    /// Fell below the threshold; the timer has been released.
    Converged(StressLevel),
}

impl TickOutcome {
    pub fn stress(self) -> StressLevel {
        match self {
            Self::Decayed(s) | Self::Converged(s) => s,
        }
    }
}

/// Ownership token for a live decay loop.
#[derive(Debug)]
struct ControllerHandle {
    run: u64,
    interval: Interval,
    ticks: u32,
}

#[derive(Debug)]
pub struct RegulationController {
    tick_interval: Duration,
    decay_step: u8,
    stabilize_threshold: u8,
    handle: Option<ControllerHandle>,
    runs: u64,
}

impl RegulationController {
    /// Controller for `cfg`. The config is not validated here; a zero tick
    /// interval is raised to 1ms.
    pub fn new(cfg: &RegulationConfig) -> Self {
        Self {
            tick_interval: cfg.tick_interval().max(MIN_TICK_INTERVAL),
            decay_step: cfg.decay_step,
            stabilize_threshold: cfg.stabilize_threshold,
            handle: None,
            runs: 0,
        }
    }

    pub fn state(&self) -> ControllerState {
        if self.handle.is_some() {
            ControllerState::Running
        } else {
            ControllerState::Idle
        }
    }

    pub fn is_running(&self) -> bool {
        self.handle.is_some()
    }

    /// Number of runs started so far.
    pub fn runs(&self) -> u64 {
        self.runs
    }

    /// Idle → Running. Returns `false` and changes nothing if a run is
    /// already live.
    ///
    /// Must be called from within a tokio runtime.
    pub fn engage(&mut self) -> bool {
        if self.handle.is_some() {
            return false;
        }
        self.runs += 1;
        let mut interval =
            tokio::time::interval_at(Instant::now() + self.tick_interval, self.tick_interval);
        interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
        self.handle = Some(ControllerHandle {
            run: self.runs,
            interval,
            ticks: 0,
        });
        tracing::debug!("Controller run {} engaged", self.runs);
        true
    }

    /// Running → Idle without converging. Drops the timer; returns whether
    /// a run was live.
    pub fn cancel(&mut self) -> bool {
        match self.handle.take() {
            Some(h) => {
                tracing::debug!("Controller run {} cancelled after {} ticks", h.run, h.ticks);
                true
            }
            None => false,
        }
    }

    /// Wait for the next tick of the live run and return its run id.
    ///
    /// Never resolves while idle. Cancel-safe, so it can sit in a
    /// `select!` next to other work.
    pub async fn tick(&mut self) -> u64 {
        match self.handle.as_mut() {
            Some(h) => {
                h.interval.tick().await;
                h.run
            }
            None => std::future::pending::<u64>().await,
        }
    }

    /// Apply one decay step for `run`.
    ///
    /// Returns `None` when `run` is not the live run (it was cancelled or
    /// already converged); the caller must then leave stress untouched.
    pub fn apply_tick(&mut self, run: u64, stress: StressLevel) -> Option<TickOutcome> {
        let handle = self.handle.as_mut().filter(|h| h.run == run)?;
        handle.ticks += 1;

        let next = stress.decayed(self.decay_step as u32);
        tracing::trace!("Controller run {} tick {}: {} -> {}", run, handle.ticks, stress, next);

        if next.below(self.stabilize_threshold) {
            let ticks = handle.ticks;
            self.handle = None;
            tracing::debug!("Controller run {} converged after {} ticks", run, ticks);
            Some(TickOutcome::Converged(next))
        } else {
            Some(TickOutcome::Decayed(next))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn controller() -> RegulationController {
        RegulationController::new(&RegulationConfig::default())
    }

    #[tokio::test(start_paused = true)]
    async fn test_engage_is_idempotent() {
        let mut c = controller();
        assert_eq!(c.state(), ControllerState::Idle);
        assert!(c.engage());
        assert!(!c.engage());
        assert_eq!(c.runs(), 1);
        assert_eq!(c.state(), ControllerState::Running);
    }

    #[tokio::test(start_paused = true)]
    async fn test_first_tick_waits_one_interval() {
        let mut c = controller();
        c.engage();
        let start = Instant::now();
        let run = c.tick().await;
        assert_eq!(run, 1);
        assert_eq!(start.elapsed(), Duration::from_millis(200));
    }

    #[tokio::test(start_paused = true)]
    async fn test_decays_until_below_threshold() {
        let mut c = controller();
        c.engage();
        let mut stress = StressLevel::new(80);
        let mut ticks = 0;
        loop {
            let run = c.tick().await;
            ticks += 1;
            match c.apply_tick(run, stress).unwrap() {
                TickOutcome::Decayed(s) => {
                    assert!(s.value() >= 20);
                    stress = s;
                }
                TickOutcome::Converged(s) => {
                    assert_eq!(s.value(), 15);
                    break;
                }
            }
        }
        // 80 -> 75 -> ... -> 20 -> 15
        assert_eq!(ticks, 13);
        assert_eq!(c.state(), ControllerState::Idle);
    }

    #[tokio::test(start_paused = true)]
    async fn test_stale_run_is_rejected() {
        let mut c = controller();
        c.engage();
        assert!(c.cancel());
        assert!(!c.cancel());
        assert!(c.apply_tick(1, StressLevel::new(60)).is_none());

        c.engage();
        assert_eq!(c.runs(), 2);
        assert!(c.apply_tick(1, StressLevel::new(60)).is_none());
        assert_eq!(
            c.apply_tick(2, StressLevel::new(60)),
            Some(TickOutcome::Decayed(StressLevel::new(55)))
        );
    }

    #[tokio::test(start_paused = true)]
    async fn test_decay_clamps_at_zero() {
        let cfg = RegulationConfig {
            decay_step: 30,
            ..RegulationConfig::default()
        };
        let mut c = RegulationController::new(&cfg);
        c.engage();
        let outcome = c.apply_tick(1, StressLevel::new(10)).unwrap();
        assert_eq!(outcome, TickOutcome::Converged(StressLevel::ZERO));
        assert_eq!(outcome.stress(), StressLevel::ZERO);
    }

    #[tokio::test(start_paused = true)]
    async fn test_zero_interval_is_raised_to_floor() {
        let cfg = RegulationConfig {
            tick_interval_ms: 0,
            ..RegulationConfig::default()
        };
        let mut c = RegulationController::new(&cfg);
        assert!(c.engage());
        let start = Instant::now();
        assert_eq!(c.tick().await, 1);
        assert_eq!(start.elapsed(), MIN_TICK_INTERVAL);
    }
}
