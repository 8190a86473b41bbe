//! Stress as an integer percentage.

use serde::{Deserialize, Serialize};

/// Accumulated negative pressure, always within [0, 100].
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(from = "u32", into = "u8")]
pub struct StressLevel(u8);

impl StressLevel {
    pub const ZERO: StressLevel = StressLevel(0);
    pub const MAX: StressLevel = StressLevel(100);

    /// Values above 100 saturate.
    pub fn new(percent: u32) -> Self {
        Self(percent.min(Self::MAX.0 as u32) as u8)
    }

    pub fn value(self) -> u8 {
        self.0
    }

    /// Stress as a fraction in [0, 1].
    pub fn fraction(self) -> f32 {
        self.0 as f32 / 100.0
    }

    /// Add a spike, saturating at 100.
    pub fn spiked(self, magnitude: u32) -> Self {
        Self::new(self.0 as u32 + magnitude)
    }

    /// Subtract a decay step, saturating at 0.
    pub fn decayed(self, step: u32) -> Self {
        Self::new((self.0 as u32).saturating_sub(step))
    }

    /// Strictly above `threshold`.
    pub fn exceeds(self, threshold: u8) -> bool {
        self.0 > threshold
    }

    /// Strictly below `threshold`.
    pub fn below(self, threshold: u8) -> bool {
        self.0 < threshold
    }
}

impl From<u32> for StressLevel {
    fn from(v: u32) -> Self {
        Self::new(v)
    }
}

impl From<StressLevel> for u8 {
    fn from(s: StressLevel) -> u8 {
        s.0
    }
}

impl std::fmt::Display for StressLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}%", self.0)
    }
}

/// How distressed a given stress level reads.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Severity {
    Mild,
    Moderate,
    High,
}

impl Severity {
    /// `> critical` is high, `> elevated` is moderate, anything else mild.
    pub fn classify(stress: StressLevel, elevated: u8, critical: u8) -> Self {
        if stress.exceeds(critical) {
            Severity::High
        } else if stress.exceeds(elevated) {
            Severity::Moderate
        } else {
            Severity::Mild
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_saturates() {
        assert_eq!(StressLevel::new(250).value(), 100);
        assert_eq!(StressLevel::new(42).value(), 42);
    }

    #[test]
    fn test_spike_and_decay_clamp() {
        let s = StressLevel::new(90).spiked(45);
        assert_eq!(s, StressLevel::MAX);
        let s = StressLevel::new(3).decayed(5);
        assert_eq!(s, StressLevel::ZERO);
        assert_eq!(StressLevel::new(40).spiked(40).value(), 80);
    }

    #[test]
    fn test_thresholds_are_strict() {
        let s = StressLevel::new(50);
        assert!(!s.exceeds(50));
        assert!(s.exceeds(49));
        assert!(!StressLevel::new(20).below(20));
        assert!(StressLevel::new(19).below(20));
    }

    #[test]
    fn test_severity_bands() {
        assert_eq!(Severity::classify(StressLevel::new(50), 50, 80), Severity::Mild);
        assert_eq!(Severity::classify(StressLevel::new(51), 50, 80), Severity::Moderate);
        assert_eq!(Severity::classify(StressLevel::new(80), 50, 80), Severity::Moderate);
        assert_eq!(Severity::classify(StressLevel::new(81), 50, 80), Severity::High);
        assert!(Severity::Mild < Severity::High);
    }

    #[test]
    fn test_serde_saturates() {
        let s: StressLevel = serde_json::from_str("180").unwrap();
        assert_eq!(s, StressLevel::MAX);
        assert_eq!(serde_json::to_string(&StressLevel::new(35)).unwrap(), "35");
    }
}
