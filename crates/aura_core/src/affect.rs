//! Affect Model based on Russell's Circumplex Model of Emotion
//!
//! An affect is a point in the 2D plane Valence × Arousal, both axes spanning
//! [-1, 1]. The origin is homeostasis; distance from it is intensity. Zones
//! are the four quadrants plus a neutral disc around the origin.

use crate::stress::StressLevel;
use serde::{Deserialize, Serialize};

/// Below this intensity every point is neutral, whatever its quadrant.
pub const NEUTRAL_INTENSITY: f32 = 0.2;

/// Dead band used by the per-axis readings.
const AXIS_DEAD_BAND: f32 = 0.1;

/// A point in valence/arousal space.
///
/// Both coordinates are clamped to [-1, 1] on construction and on
/// deserialization, so an `AffectPoint` is always in range.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(from = "RawAffectPoint")]
pub struct AffectPoint {
    /// Valence: unpleasant (-1.0) to pleasant (1.0)
    pub valence: f32,
    /// Arousal: deactivated (-1.0) to activated (1.0)
    pub arousal: f32,
}

#[derive(Deserialize)]
struct RawAffectPoint {
    valence: f32,
    arousal: f32,
}

impl From<RawAffectPoint> for AffectPoint {
    fn from(raw: RawAffectPoint) -> Self {
        AffectPoint::new(raw.valence, raw.arousal)
    }
}

impl Default for AffectPoint {
    fn default() -> Self {
        Self::origin()
    }
}

/// Clamp to [-1, 1]; NaN collapses to 0 (homeostasis).
#[inline]
fn clamp_axis(v: f32) -> f32 {
    if v.is_nan() {
        0.0
    } else {
        v.clamp(-1.0, 1.0)
    }
}

impl AffectPoint {
    pub fn new(valence: f32, arousal: f32) -> Self {
        Self {
            valence: clamp_axis(valence),
            arousal: clamp_axis(arousal),
        }
    }

    pub fn origin() -> Self {
        Self {
            valence: 0.0,
            arousal: 0.0,
        }
    }

    /// Where accumulated stress puts the organism: unpleasant and activated
    /// in equal measure, so zero stress is the origin.
    pub fn under_stress(stress: StressLevel) -> Self {
        let s = stress.fraction();
        Self::new(-s, s)
    }

    /// Distance from the neutral origin.
    pub fn intensity(&self) -> f32 {
        (self.valence.powi(2) + self.arousal.powi(2)).sqrt()
    }

    /// Return a copy moved by the given deltas (clamped).
    pub fn shifted(&self, d_valence: f32, d_arousal: f32) -> Self {
        Self::new(self.valence + d_valence, self.arousal + d_arousal)
    }

    /// Interpolate between two points
    pub fn lerp(&self, other: &AffectPoint, t: f32) -> AffectPoint {
        let t = t.clamp(0.0, 1.0);
        AffectPoint::new(
            self.valence + (other.valence - self.valence) * t,
            self.arousal + (other.arousal - self.arousal) * t,
        )
    }

    pub fn zone(&self) -> AffectZone {
        classify(self.valence, self.arousal).zone
    }

    pub fn valence_reading(&self) -> &'static str {
        if self.valence > AXIS_DEAD_BAND {
            "Pleasant"
        } else if self.valence < -AXIS_DEAD_BAND {
            "Unpleasant"
        } else {
            "Neutral"
        }
    }

    pub fn arousal_reading(&self) -> &'static str {
        if self.arousal > AXIS_DEAD_BAND {
            "High / Active"
        } else if self.arousal < -AXIS_DEAD_BAND {
            "Low / Passive"
        } else {
            "Neutral"
        }
    }
}

/// The five regions of the affect plane.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AffectZone {
    Neutral,
    HighPositive,
    HighNegative,
    LowNegative,
    LowPositive,
}

impl AffectZone {
    pub fn label(self) -> &'static str {
        match self {
            Self::Neutral => "Neutral / Homeostasis",
            Self::HighPositive => "High Positive Affect",
            Self::HighNegative => "High Negative Affect",
            Self::LowNegative => "Low Negative Affect",
            Self::LowPositive => "Low Positive Affect",
        }
    }

    /// What the body is doing in this zone.
    pub fn description(self) -> &'static str {
        match self {
            Self::Neutral => {
                "Equilibrium. Little demand is placed on metabolic resources."
            }
            Self::HighPositive => {
                "Mobilized for approach and engagement. Dopamine and adrenaline are likely active."
            }
            Self::HighNegative => {
                "Fight or flight. High mobilization under perceived threat or discomfort."
            }
            Self::LowNegative => {
                "Conserving energy. A withdrawal state, often tied to healing, loss or exhaustion."
            }
            Self::LowPositive => {
                "Rest and digest. The parasympathetic system dominates and safety is felt."
            }
        }
    }

    /// Emotion words commonly attached to this zone.
    pub fn emotion_labels(self) -> &'static [&'static str] {
        match self {
            Self::Neutral => &["Neutral", "Indifferent", "Blank"],
            Self::HighPositive => &["Excitement", "Joy", "Euphoria", "Anticipation"],
            Self::HighNegative => &["Anxiety", "Fear", "Anger", "Frustration"],
            Self::LowNegative => &["Sadness", "Depression", "Boredom", "Lethargy"],
            Self::LowPositive => &["Calm", "Contentment", "Serenity", "Relief"],
        }
    }

    pub fn is_neutral(self) -> bool {
        matches!(self, Self::Neutral)
    }
}

impl std::fmt::Display for AffectZone {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// Result of classifying a point.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Classification {
    pub zone: AffectZone,
    pub intensity: f32,
}

/// Classify raw coordinates into a zone.
///
/// Total over all inputs: coordinates are clamped first. The neutral disc
/// wins over quadrant sign whenever intensity < 0.2. A coordinate that is
/// exactly zero counts as non-negative.
pub fn classify(valence: f32, arousal: f32) -> Classification {
    let point = AffectPoint::new(valence, arousal);
    let intensity = point.intensity();

    if intensity < NEUTRAL_INTENSITY {
        return Classification {
            zone: AffectZone::Neutral,
            intensity,
        };
    }

    let zone = match (point.valence >= 0.0, point.arousal >= 0.0) {
        (true, true) => AffectZone::HighPositive,
        (false, true) => AffectZone::HighNegative,
        (false, false) => AffectZone::LowNegative,
        (true, false) => AffectZone::LowPositive,
    };

    Classification { zone, intensity }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_origin_is_neutral() {
        let c = classify(0.0, 0.0);
        assert_eq!(c.zone, AffectZone::Neutral);
        assert_eq!(c.intensity, 0.0);
    }

    #[test]
    fn test_small_intensity_is_neutral_in_any_quadrant() {
        assert_eq!(classify(0.05, 0.05).zone, AffectZone::Neutral);
        assert_eq!(classify(-0.1, 0.1).zone, AffectZone::Neutral);
        assert_eq!(classify(-0.1, -0.15).zone, AffectZone::Neutral);
        assert_eq!(classify(0.19, 0.0).zone, AffectZone::Neutral);
    }

    #[test]
    fn test_quadrants() {
        assert_eq!(classify(0.5, 0.5).zone, AffectZone::HighPositive);
        assert_eq!(classify(-0.5, 0.5).zone, AffectZone::HighNegative);
        assert_eq!(classify(-0.5, -0.5).zone, AffectZone::LowNegative);
        assert_eq!(classify(0.5, -0.5).zone, AffectZone::LowPositive);
    }

    #[test]
    fn test_zero_coordinate_counts_as_non_negative() {
        assert_eq!(classify(0.5, 0.0).zone, AffectZone::HighPositive);
        assert_eq!(classify(-0.5, 0.0).zone, AffectZone::HighNegative);
        assert_eq!(classify(0.0, -0.5).zone, AffectZone::LowPositive);
        assert_eq!(classify(0.0, 0.5).zone, AffectZone::HighPositive);
    }

    #[test]
    fn test_out_of_range_is_clamped_not_rejected() {
        let c = classify(5.0, -7.0);
        assert_eq!(c.zone, AffectZone::LowPositive);
        assert!((c.intensity - 2.0f32.sqrt()).abs() < 1e-6);

        let p = AffectPoint::new(-3.0, 3.0);
        assert_eq!(p.valence, -1.0);
        assert_eq!(p.arousal, 1.0);
    }

    #[test]
    fn test_nan_collapses_to_origin() {
        let p = AffectPoint::new(f32::NAN, f32::NAN);
        assert_eq!(p, AffectPoint::origin());
        assert_eq!(classify(f32::NAN, 0.9).zone, AffectZone::HighPositive);
    }

    #[test]
    fn test_under_stress_projection() {
        assert_eq!(AffectPoint::under_stress(StressLevel::ZERO), AffectPoint::origin());

        let p = AffectPoint::under_stress(StressLevel::new(80));
        assert!((p.valence + 0.8).abs() < 1e-6);
        assert!((p.arousal - 0.8).abs() < 1e-6);
        assert_eq!(p.zone(), AffectZone::HighNegative);

        // 10% stress is still inside the neutral disc
        assert!(AffectPoint::under_stress(StressLevel::new(10)).zone().is_neutral());
    }

    #[test]
    fn test_shifted_and_lerp_stay_in_range() {
        let p = AffectPoint::new(0.9, -0.9).shifted(0.5, -0.5);
        assert_eq!(p, AffectPoint::new(1.0, -1.0));

        let a = AffectPoint::origin();
        let b = AffectPoint::new(1.0, 1.0);
        let mid = a.lerp(&b, 0.5);
        assert!((mid.valence - 0.5).abs() < 1e-6);
        assert_eq!(a.lerp(&b, 4.0), b);
    }

    #[test]
    fn test_axis_readings() {
        let p = AffectPoint::new(0.3, -0.3);
        assert_eq!(p.valence_reading(), "Pleasant");
        assert_eq!(p.arousal_reading(), "Low / Passive");
        let q = AffectPoint::new(0.05, 0.1);
        assert_eq!(q.valence_reading(), "Neutral");
        assert_eq!(q.arousal_reading(), "Neutral");
    }

    #[test]
    fn test_zone_metadata() {
        assert_eq!(AffectZone::Neutral.label(), "Neutral / Homeostasis");
        assert!(AffectZone::HighNegative.emotion_labels().contains(&"Fear"));
        assert!(AffectZone::LowPositive.description().contains("Rest and digest"));
        assert_eq!(AffectZone::HighPositive.to_string(), "High Positive Affect");
    }

    #[test]
    fn test_deserialize_clamps() {
        let p: AffectPoint = serde_json::from_str(r#"{"valence": 3.0, "arousal": -0.4}"#).unwrap();
        assert_eq!(p.valence, 1.0);
        assert!((p.arousal + 0.4).abs() < 1e-6);
    }
}
