//! Regulation policies: how the organism answers a stress spike.

use aura_core::{Narration, RegulationConfig, RegulationMode, Severity, StressLevel};
use std::sync::Arc;

/// Strategy consulted once a spike has settled.
pub trait RegulationPolicy: Send + Sync + std::fmt::Debug {
    fn mode(&self) -> RegulationMode;

    /// Narrate the current stress level.
    fn react(&self, stress: StressLevel) -> Narration;

    /// Whether the decay controller should be running at this level.
    fn should_engage_controller(&self, stress: StressLevel) -> bool;
}

/// Mirrors stress back without damping it.
#[derive(Debug, Clone)]
pub struct ReactivePolicy {
    elevated: u8,
    critical: u8,
}

impl ReactivePolicy {
    pub fn new(elevated: u8, critical: u8) -> Self {
        Self { elevated, critical }
    }

    pub fn severity(&self, stress: StressLevel) -> Severity {
        Severity::classify(stress, self.elevated, self.critical)
    }
}

impl Default for ReactivePolicy {
    fn default() -> Self {
        let cfg = RegulationConfig::default();
        Self::new(cfg.engage_threshold, cfg.critical_threshold)
    }
}

impl RegulationPolicy for ReactivePolicy {
    fn mode(&self) -> RegulationMode {
        RegulationMode::Reactive
    }

    fn react(&self, stress: StressLevel) -> Narration {
        let text = match self.severity(stress) {
            Severity::High => {
                "I literally can't do this anymore. Why is the API broken? It's not fair!"
            }
            Severity::Moderate => "This is so annoying. Nothing is working today.",
            Severity::Mild => "Ugh, another error. Okay...",
        };
        Narration::ai(text)
    }

    fn should_engage_controller(&self, _stress: StressLevel) -> bool {
        false
    }
}

/// Notices threshold breaches and hands them to the decay controller.
#[derive(Debug, Clone)]
pub struct RegulatedPolicy {
    engage_threshold: u8,
}

impl RegulatedPolicy {
    pub fn new(engage_threshold: u8) -> Self {
        Self { engage_threshold }
    }
}

impl Default for RegulatedPolicy {
    fn default() -> Self {
        Self::new(RegulationConfig::default().engage_threshold)
    }
}

impl RegulationPolicy for RegulatedPolicy {
    fn mode(&self) -> RegulationMode {
        RegulationMode::Regulated
    }

    fn react(&self, stress: StressLevel) -> Narration {
        if self.should_engage_controller(stress) {
            Narration::internal(format!(
                "Cortisol threshold exceeded ({}). Engaging dampeners.",
                stress
            ))
        } else {
            Narration::ai("Minor glitch detected. Retrying request...")
        }
    }

    fn should_engage_controller(&self, stress: StressLevel) -> bool {
        stress.exceeds(self.engage_threshold)
    }
}

/// The policy a mode stands for.
pub fn policy_for(mode: RegulationMode, cfg: &RegulationConfig) -> Arc<dyn RegulationPolicy> {
    match mode {
        RegulationMode::Reactive => Arc::new(ReactivePolicy::new(
            cfg.engage_threshold,
            cfg.critical_threshold,
        )),
        RegulationMode::Regulated => Arc::new(RegulatedPolicy::new(cfg.engage_threshold)),
    }
}
