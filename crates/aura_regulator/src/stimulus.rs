//! Sources of stress-spike magnitudes.
//!
//! This is the only nondeterminism in the regulator, so it sits behind a
//! trait that tests replace with a seeded or scripted source.

use aura_core::StimulusConfig;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::collections::VecDeque;
use std::sync::Mutex;

pub trait StimulusSource: Send + Sync {
    /// Magnitude of the next spike, in percent.
    fn next_magnitude(&self) -> u8;
}

/// Uniform draws from the thread RNG.
#[derive(Debug, Clone)]
pub struct RandomStimulus {
    min: u8,
    max: u8,
}

impl RandomStimulus {
    /// Draws from `[min, max)`. An empty range always yields `min`.
    pub fn new(min: u8, max: u8) -> Self {
        Self { min, max }
    }
}

impl Default for RandomStimulus {
    fn default() -> Self {
        let cfg = StimulusConfig::default();
        Self::new(cfg.min_magnitude, cfg.max_magnitude)
    }
}

impl StimulusSource for RandomStimulus {
    fn next_magnitude(&self) -> u8 {
        if self.min >= self.max {
            return self.min;
        }
        rand::thread_rng().gen_range(self.min..self.max)
    }
}

/// Reproducible draws from a seeded `StdRng`.
#[derive(Debug)]
pub struct SeededStimulus {
    min: u8,
    max: u8,
    rng: Mutex<StdRng>,
}

impl SeededStimulus {
    pub fn new(seed: u64, min: u8, max: u8) -> Self {
        Self {
            min,
            max,
            rng: Mutex::new(StdRng::seed_from_u64(seed)),
        }
    }
}

impl StimulusSource for SeededStimulus {
    fn next_magnitude(&self) -> u8 {
        if self.min >= self.max {
            return self.min;
        }
        let mut rng = self.rng.lock().unwrap_or_else(|e| e.into_inner());
        rng.gen_range(self.min..self.max)
    }
}

/// Replays a fixed list of magnitudes, then repeats a fallback.
#[derive(Debug)]
pub struct ScriptedStimulus {
    queue: Mutex<VecDeque<u8>>,
    fallback: u8,
}

impl ScriptedStimulus {
    pub fn new(magnitudes: impl IntoIterator<Item = u8>, fallback: u8) -> Self {
        Self {
            queue: Mutex::new(magnitudes.into_iter().collect()),
            fallback,
        }
    }

    /// Always the same magnitude.
    pub fn constant(magnitude: u8) -> Self {
        Self::new(std::iter::empty(), magnitude)
    }
}

impl StimulusSource for ScriptedStimulus {
    fn next_magnitude(&self) -> u8 {
        let mut queue = self.queue.lock().unwrap_or_else(|e| e.into_inner());
        queue.pop_front().unwrap_or(self.fallback)
    }
}

/// Build the source a config asks for: seeded when a seed is given.
pub fn from_config(cfg: &StimulusConfig) -> Box<dyn StimulusSource> {
    match cfg.seed {
        Some(seed) => Box::new(SeededStimulus::new(
            seed,
            cfg.min_magnitude,
            cfg.max_magnitude,
        )),
        None => Box::new(RandomStimulus::new(cfg.min_magnitude, cfg.max_magnitude)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_random_stays_in_range() {
        let src = RandomStimulus::default();
        for _ in 0..1000 {
            let m = src.next_magnitude();
            assert!((20..50).contains(&m), "magnitude out of range: {}", m);
        }
    }

    #[test]
    fn test_seeded_is_reproducible() {
        let a = SeededStimulus::new(7, 20, 50);
        let b = SeededStimulus::new(7, 20, 50);
        let xs: Vec<u8> = (0..20).map(|_| a.next_magnitude()).collect();
        let ys: Vec<u8> = (0..20).map(|_| b.next_magnitude()).collect();
        assert_eq!(xs, ys);
        assert!(xs.iter().all(|m| (20..50).contains(m)));
    }

    #[test]
    fn test_scripted_then_fallback() {
        let src = ScriptedStimulus::new([40, 45], 30);
        assert_eq!(src.next_magnitude(), 40);
        assert_eq!(src.next_magnitude(), 45);
        assert_eq!(src.next_magnitude(), 30);
        assert_eq!(src.next_magnitude(), 30);
    }

    #[test]
    fn test_empty_range_yields_min() {
        assert_eq!(RandomStimulus::new(30, 30).next_magnitude(), 30);
        assert_eq!(SeededStimulus::new(1, 40, 10).next_magnitude(), 40);
    }

    #[test]
    fn test_from_config_respects_seed() {
        let cfg = StimulusConfig {
            seed: Some(99),
            ..StimulusConfig::default()
        };
        let a = from_config(&cfg);
        let b = from_config(&cfg);
        assert_eq!(a.next_magnitude(), b.next_magnitude());
    }
}
