//! Property-based tests for aura_core primitives.
//!
//! Verifies that affect coordinates, stress and the event log keep their
//! documented bounds for arbitrary inputs, and that zone classification is
//! total and consistent with the neutral-disc rule.

use aura_core::{classify, AffectPoint, AffectZone, EventLog, Narration, StressLevel};
use proptest::prelude::*;

// ============================================================================
// Strategies
// ============================================================================

fn arb_coordinate() -> impl Strategy<Value = f32> {
    prop_oneof![
        -1.0f32..=1.0,
        -100.0f32..=100.0,
        Just(0.0f32),
        Just(f32::INFINITY),
        Just(f32::NEG_INFINITY),
    ]
}

// ============================================================================
// AffectPoint / classifier
// ============================================================================

proptest! {
    #[test]
    fn affect_point_always_in_range(v in arb_coordinate(), a in arb_coordinate()) {
        let p = AffectPoint::new(v, a);
        prop_assert!((-1.0..=1.0).contains(&p.valence));
        prop_assert!((-1.0..=1.0).contains(&p.arousal));
        prop_assert!(p.intensity().is_finite());
    }

    #[test]
    fn shifted_stays_in_range(v in -1.0f32..=1.0, a in -1.0f32..=1.0,
                              dv in arb_coordinate(), da in arb_coordinate()) {
        let p = AffectPoint::new(v, a).shifted(dv, da);
        prop_assert!((-1.0..=1.0).contains(&p.valence));
        prop_assert!((-1.0..=1.0).contains(&p.arousal));
    }

    /// Neutral exactly when intensity is under the floor.
    #[test]
    fn neutral_iff_low_intensity(v in arb_coordinate(), a in arb_coordinate()) {
        let c = classify(v, a);
        prop_assert_eq!(c.zone == AffectZone::Neutral, c.intensity < 0.2,
            "zone={:?} intensity={}", c.zone, c.intensity);
    }

    #[test]
    fn quadrant_matches_signs(v in -1.0f32..=1.0, a in -1.0f32..=1.0) {
        let c = classify(v, a);
        if c.zone != AffectZone::Neutral {
            let expected = match (v >= 0.0, a >= 0.0) {
                (true, true) => AffectZone::HighPositive,
                (false, true) => AffectZone::HighNegative,
                (false, false) => AffectZone::LowNegative,
                (true, false) => AffectZone::LowPositive,
            };
            prop_assert_eq!(c.zone, expected);
        }
    }

    #[test]
    fn stress_projection_never_positive_valence(s in 0u32..=300) {
        let p = AffectPoint::under_stress(StressLevel::new(s));
        prop_assert!(p.valence <= 0.0);
        prop_assert!(p.arousal >= 0.0);
        prop_assert!(matches!(p.zone(), AffectZone::Neutral | AffectZone::HighNegative));
    }
}

// ============================================================================
// StressLevel
// ============================================================================

proptest! {
    #[test]
    fn stress_stays_in_bounds(ops in prop::collection::vec((any::<bool>(), 0u32..200), 0..64)) {
        let mut s = StressLevel::ZERO;
        for (spike, amount) in ops {
            s = if spike { s.spiked(amount) } else { s.decayed(amount) };
            prop_assert!(s.value() <= 100);
        }
    }
}

// ============================================================================
// EventLog
// ============================================================================

proptest! {
    /// After any number of pushes the log holds the most recent
    /// `min(n, cap)` entries, newest first, with strictly decreasing ids.
    #[test]
    fn log_keeps_most_recent(n in 0usize..40, cap in 1usize..10) {
        let mut log = EventLog::with_capacity(cap);
        for i in 0..n {
            log.push(Narration::system(format!("event {}", i)));
        }
        prop_assert_eq!(log.len(), n.min(cap));

        let texts: Vec<String> = log.iter().map(|e| e.text.clone()).collect();
        let expected: Vec<String> = (0..n).rev().take(cap).map(|i| format!("event {}", i)).collect();
        prop_assert_eq!(texts, expected);

        let ids: Vec<u64> = log.iter().map(|e| e.id).collect();
        prop_assert!(ids.windows(2).all(|w| w[0] > w[1]));
    }
}
