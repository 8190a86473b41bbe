use thiserror::Error;

/// A configuration that would break the regulator's invariants.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    #[error(
        "thresholds must satisfy 0 < stabilize ({stabilize}) < engage ({engage}) < critical ({critical}) <= 100"
    )]
    ThresholdOrder {
        stabilize: u8,
        engage: u8,
        critical: u8,
    },

    #[error("stimulus range [{min}, {max}) must be non-empty and end at or below 100")]
    StimulusRange { min: u8, max: u8 },

    #[error("decay step must be positive")]
    ZeroDecayStep,

    #[error("{0} must be a positive duration")]
    ZeroInterval(&'static str),

    #[error("log capacity must be positive")]
    ZeroLogCapacity,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown regulation mode '{0}' (expected 'reactive' or 'regulated')")]
pub struct ParseModeError(pub String);
