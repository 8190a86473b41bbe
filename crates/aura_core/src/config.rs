use crate::error::ConfigError;
use crate::mode::RegulationMode;
use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::Path;
use std::time::Duration;

// ============================================================================
// Top-level config
// ============================================================================

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct AuraConfig {
    pub regulation: RegulationConfig,
    pub stimulus: StimulusConfig,
}

impl AuraConfig {
    /// Load config from a TOML file, falling back to defaults for missing fields.
    /// After loading, env var overrides are applied and the result is validated.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path.as_ref())
            .with_context(|| format!("Failed to read config file: {}", path.as_ref().display()))?;
        let mut config: AuraConfig =
            toml::from_str(&content).with_context(|| "Failed to parse TOML config")?;
        config.apply_env_overrides();
        config.validate()?;
        Ok(config)
    }

    /// Try to load from path; if the file is missing or invalid, return
    /// defaults with env overrides.
    pub fn load_or_default<P: AsRef<Path>>(path: P) -> Self {
        match Self::load(path) {
            Ok(cfg) => cfg,
            Err(e) => {
                tracing::info!("Config file not found or invalid ({:#}), using defaults", e);
                let mut cfg = Self::default();
                cfg.apply_env_overrides();
                if let Err(e) = cfg.validate() {
                    tracing::warn!("Env overrides rejected ({}), using plain defaults", e);
                    return Self::default();
                }
                cfg
            }
        }
    }

    /// Apply environment variable overrides on top of file-based config.
    fn apply_env_overrides(&mut self) {
        if let Ok(v) = std::env::var("AURA_MODE") {
            match v.parse() {
                Ok(mode) => self.regulation.initial_mode = mode,
                Err(e) => tracing::warn!("Ignoring AURA_MODE: {}", e),
            }
        }
        if let Ok(v) = std::env::var("AURA_TICK_INTERVAL_MS") {
            if let Ok(n) = v.parse() {
                self.regulation.tick_interval_ms = n;
            }
        }
        if let Ok(v) = std::env::var("AURA_SETTLE_DELAY_MS") {
            if let Ok(n) = v.parse() {
                self.regulation.settle_delay_ms = n;
            }
        }
        if let Ok(v) = std::env::var("AURA_STIMULUS_SEED") {
            if let Ok(n) = v.parse() {
                self.stimulus.seed = Some(n);
            }
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        self.regulation.validate()?;
        self.stimulus.validate()
    }
}

// ============================================================================
// Sub-configs
// ============================================================================

/// Timing and threshold constants of the regulation loop.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct RegulationConfig {
    pub initial_mode: RegulationMode,
    /// Controller tick period.
    pub tick_interval_ms: u64,
    /// Latency between a spike and the policy's reaction to it.
    pub settle_delay_ms: u64,
    /// Stress removed per controller tick.
    pub decay_step: u8,
    /// Regulated policy engages the controller above this.
    pub engage_threshold: u8,
    /// Controller stops once post-decay stress is strictly below this.
    pub stabilize_threshold: u8,
    /// Reactive narration turns high-distress above this.
    pub critical_threshold: u8,
    pub log_capacity: usize,
}

impl Default for RegulationConfig {
    fn default() -> Self {
        Self {
            initial_mode: RegulationMode::Reactive,
            tick_interval_ms: 200,
            settle_delay_ms: 500,
            decay_step: 5,
            engage_threshold: 50,
            stabilize_threshold: 20,
            critical_threshold: 80,
            log_capacity: crate::log::DEFAULT_LOG_CAPACITY,
        }
    }
}

impl RegulationConfig {
    pub fn tick_interval(&self) -> Duration {
        Duration::from_millis(self.tick_interval_ms)
    }

    pub fn settle_delay(&self) -> Duration {
        Duration::from_millis(self.settle_delay_ms)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let ordered = 0 < self.stabilize_threshold
            && self.stabilize_threshold < self.engage_threshold
            && self.engage_threshold < self.critical_threshold
            && self.critical_threshold <= 100;
        if !ordered {
            return Err(ConfigError::ThresholdOrder {
                stabilize: self.stabilize_threshold,
                engage: self.engage_threshold,
                critical: self.critical_threshold,
            });
        }
        if self.decay_step == 0 {
            return Err(ConfigError::ZeroDecayStep);
        }
        if self.tick_interval_ms == 0 {
            return Err(ConfigError::ZeroInterval("tick_interval_ms"));
        }
        if self.settle_delay_ms == 0 {
            return Err(ConfigError::ZeroInterval("settle_delay_ms"));
        }
        if self.log_capacity == 0 {
            return Err(ConfigError::ZeroLogCapacity);
        }
        Ok(())
    }
}

/// Stimulus magnitudes are drawn uniformly from `[min_magnitude, max_magnitude)`.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct StimulusConfig {
    pub min_magnitude: u8,
    pub max_magnitude: u8,
    /// When set, draws are reproducible.
    pub seed: Option<u64>,
}

impl Default for StimulusConfig {
    fn default() -> Self {
        Self {
            min_magnitude: 20,
            max_magnitude: 50,
            seed: None,
        }
    }
}

impl StimulusConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.min_magnitude >= self.max_magnitude || self.max_magnitude > 100 {
            return Err(ConfigError::StimulusRange {
                min: self.min_magnitude,
                max: self.max_magnitude,
            });
        }
        Ok(())
    }
}

// ============================================================================
// Tests
// ============================================================================
