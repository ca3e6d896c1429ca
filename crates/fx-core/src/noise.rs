//! Market Noise
//!
//! Every random draw the engine makes goes through [`NoiseSource`], so runs
//! can be seeded for reproducibility or replaced with fixed values in tests.

use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};
use std::collections::VecDeque;

/// Source of uniform random draws.
pub trait NoiseSource {
    /// Draws a value uniformly from `[low, high]`.
    fn uniform(&mut self, low: f64, high: f64) -> f64;
}

impl<N: NoiseSource + ?Sized> NoiseSource for &mut N {
    fn uniform(&mut self, low: f64, high: f64) -> f64 {
        (**self).uniform(low, high)
    }
}

impl<N: NoiseSource + ?Sized> NoiseSource for Box<N> {
    fn uniform(&mut self, low: f64, high: f64) -> f64 {
        (**self).uniform(low, high)
    }
}

/// Seeded random number generator
#[derive(Debug, Clone)]
pub struct SimRng(pub SmallRng);

impl SimRng {
    pub fn seeded(seed: u64) -> Self {
        Self(SmallRng::seed_from_u64(seed))
    }

    /// Unseeded generator; draws are not reproducible.
    pub fn from_entropy() -> Self {
        Self(SmallRng::from_entropy())
    }
}

impl NoiseSource for SimRng {
    fn uniform(&mut self, low: f64, high: f64) -> f64 {
        // gen_range panics on an inverted range
        if low < high {
            self.0.gen_range(low..=high)
        } else {
            low
        }
    }
}

/// Always returns the middle of the requested range.
///
/// With the default noise band `[0.98, 1.02]` this is a noise factor of 1.0.
#[derive(Debug, Clone, Copy, Default)]
pub struct MidpointNoise;

impl NoiseSource for MidpointNoise {
    fn uniform(&mut self, low: f64, high: f64) -> f64 {
        (low + high) / 2.0
    }
}

/// Replays a fixed sequence of draws, then falls back to the midpoint.
///
/// Scripted values are returned as-is, even when they lie outside the
/// requested range.
#[derive(Debug, Clone, Default)]
pub struct ScriptedNoise {
    draws: VecDeque<f64>,
}

impl ScriptedNoise {
    pub fn new(draws: impl IntoIterator<Item = f64>) -> Self {
        Self {
            draws: draws.into_iter().collect(),
        }
    }
}

impl NoiseSource for ScriptedNoise {
    fn uniform(&mut self, low: f64, high: f64) -> f64 {
        self.draws
            .pop_front()
            .unwrap_or_else(|| MidpointNoise.uniform(low, high))
    }
}
