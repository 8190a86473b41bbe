//! # Aura Core
//!
//! Plain data for the affective regulator: where the organism sits in
//! valence/arousal space, how stressed it is, which regulation architecture
//! is active, and the short narrated log a presentation layer shows.
//!
//! Nothing here is async or time-driven; the moving parts live in
//! `aura_regulator`.

pub mod affect;
pub mod config;
pub mod error;
pub mod log;
pub mod mode;
pub mod stress;

pub use affect::{classify, AffectPoint, AffectZone, Classification, NEUTRAL_INTENSITY};
pub use config::{AuraConfig, RegulationConfig, StimulusConfig};
pub use error::{ConfigError, ParseModeError};
pub use log::{EventLog, LogEntry, LogKind, Narration, DEFAULT_LOG_CAPACITY};
pub use mode::RegulationMode;
pub use stress::{Severity, StressLevel};
