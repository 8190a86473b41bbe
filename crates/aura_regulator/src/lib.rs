//! # Aura Regulator
//!
//! Stress regulation for a simulated agent. A failure event spikes stress;
//! after a short settle delay the active policy reacts:
//!
//! - **Reactive**: narrates its distress and does nothing about it
//! - **Regulated**: once stress passes the threshold, hands control to a
//!   timed decay loop that walks stress back below the stabilization level
//!
//! ## Architecture
//!
//! [`RegulationEngine`] runs as a background task, continuously:
//! 1. Receiving commands (inject failure, switch mode)
//! 2. Firing delayed policy reactions and controller ticks
//! 3. Publishing an [`EngineSnapshot`] after every change
//!
//! Switching mode is a hard reset: stress and log are cleared and every
//! pending reaction and controller tick is cancelled.

mod controller;
mod engine;
mod policy;
pub mod stimulus;

pub use controller::{ControllerState, RegulationController, TickOutcome};
pub use engine::{EngineSnapshot, RegulationEngine};
pub use policy::{policy_for, ReactivePolicy, RegulatedPolicy, RegulationPolicy};
pub use stimulus::{RandomStimulus, ScriptedStimulus, SeededStimulus, StimulusSource};
