//! Deterministic synthetic walking recordings.
//!
//! Each step is a raised-sine² bump on top of gravity along the z axis, with
//! quiet padding before the first and after the last step. Noise comes from a
//! seeded `StdRng`, so a given description always produces the same samples.

use rand::{rngs::StdRng, Rng, SeedableRng};
use serde::{Deserialize, Serialize};
use std::f64::consts::PI;

use crate::analysis::Sample;

/// Standard gravity in m/s²
pub const GRAVITY: f64 = 9.81;

/// Declarative description of a synthetic walk
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SyntheticWalk {
    pub steps: usize,
    #[serde(default = "default_sample_interval_ms")]
    pub sample_interval_ms: f64,
    #[serde(default = "default_samples_per_step")]
    pub samples_per_step: usize,
    #[serde(default = "default_padding_samples")]
    pub padding_samples: usize,
    #[serde(default = "default_step_amplitude")]
    pub step_amplitude: f64,
    #[serde(default)]
    pub noise_amplitude: f64,
    #[serde(default)]
    pub seed: u64,
}

impl SyntheticWalk {
    /// A noise-free walk at 100 Hz and two steps per second
    pub fn new(steps: usize) -> Self {
        Self {
            steps,
            sample_interval_ms: default_sample_interval_ms(),
            samples_per_step: default_samples_per_step(),
            padding_samples: default_padding_samples(),
            step_amplitude: default_step_amplitude(),
            noise_amplitude: 0.0,
            seed: 0,
        }
    }

    pub fn with_noise(mut self, amplitude: f64, seed: u64) -> Self {
        self.noise_amplitude = amplitude;
        self.seed = seed;
        self
    }

    pub fn len(&self) -> usize {
        self.steps * self.samples_per_step.max(1) + 2 * self.padding_samples
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Sample index of each step's crest
    pub fn crest_indices(&self) -> Vec<usize> {
        let period = self.samples_per_step.max(1);
        (0..self.steps)
            .map(|step| self.padding_samples + step * period + period / 2)
            .collect()
    }

    /// Generate the recording
    pub fn samples(&self) -> Vec<Sample> {
        let mut rng = StdRng::seed_from_u64(self.seed);
        let period = self.samples_per_step.max(1);
        let walking = self.padding_samples..self.padding_samples + self.steps * period;

        (0..self.len())
            .map(|index| {
                let bump = if walking.contains(&index) {
                    let phase = ((index - self.padding_samples) % period) as f64 / period as f64;
                    self.step_amplitude * (PI * phase).sin().powi(2)
                } else {
                    0.0
                };

                Sample::new(
                    index as f64 * self.sample_interval_ms,
                    self.noise(&mut rng) * 0.2,
                    self.noise(&mut rng) * 0.2,
                    GRAVITY + bump + self.noise(&mut rng),
                )
            })
            .collect()
    }

    fn noise(&self, rng: &mut StdRng) -> f64 {
        if self.noise_amplitude > 0.0 {
            rng.gen_range(-self.noise_amplitude..self.noise_amplitude)
        } else {
            0.0
        }
    }
}

fn default_sample_interval_ms() -> f64 {
    10.0
}

fn default_samples_per_step() -> usize {
    50
}

fn default_padding_samples() -> usize {
    30
}

fn default_step_amplitude() -> f64 {
    3.0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_length_and_timing() {
        let walk = SyntheticWalk::new(4);
        let samples = walk.samples();

        assert_eq!(samples.len(), 4 * 50 + 60);
        assert_eq!(samples[0].time_ms, 0.0);
        assert_eq!(samples[1].time_ms, 10.0);
    }

    #[test]
    fn test_crests_are_step_maxima() {
        let walk = SyntheticWalk::new(3);
        let samples = walk.samples();

        for crest in walk.crest_indices() {
            assert!((samples[crest].z - (GRAVITY + 3.0)).abs() < 1e-9);
            assert!(samples[crest].z > samples[crest - 1].z);
            assert!(samples[crest].z > samples[crest + 1].z);
        }
    }

    #[test]
    fn test_same_seed_same_samples() {
        let a = SyntheticWalk::new(5).with_noise(0.05, 7).samples();
        let b = SyntheticWalk::new(5).with_noise(0.05, 7).samples();
        let c = SyntheticWalk::new(5).with_noise(0.05, 8).samples();

        assert_eq!(a, b);
        assert_ne!(a, c);
    }

    #[test]
    fn test_defaults_from_json() {
        let walk: SyntheticWalk = serde_json::from_str(r#"{ "steps": 6 }"#).unwrap();
        assert_eq!(walk, SyntheticWalk::new(6));
    }
}
