//! Seedable pseudo-random number generator (xorshift64).
//! Deterministic, fast, no-std compatible.

use glam::Vec3;
use std::f32::consts::{PI, TAU};

/// Seedable pseudo-random number generator (xorshift64).
/// Every stochastic choice in the simulation draws from one of these, so a
/// fixed seed replays the same flares, debris offsets and belt layout.
#[derive(Debug, Clone)]
pub struct Rng {
    state: u64,
}

impl Rng {
    pub fn new(seed: u64) -> Self {
        Rng {
            state: if seed == 0 { 1 } else { seed },
        }
    }

    fn next_u64(&mut self) -> u64 {
        let mut x = self.state;
        x ^= x << 13;
        x ^= x >> 7;
        x ^= x << 17;
        self.state = x;
        x
    }

    /// Uniform float in [0, 1). Uses the top 24 bits so every value is exact in f32.
    pub fn next_f32(&mut self) -> f32 {
        (self.next_u64() >> 40) as f32 / (1u64 << 24) as f32
    }

    /// Uniform float in [min, max).
    pub fn range(&mut self, min: f32, max: f32) -> f32 {
        min + self.next_f32() * (max - min)
    }

    /// Bernoulli trial. Probabilities outside [0, 1] saturate.
    pub fn chance(&mut self, probability: f32) -> bool {
        self.next_f32() < probability
    }

    /// Uniform point on a sphere of `radius` via inverse-CDF longitude/latitude
    /// sampling: theta = 2*pi*u, phi = acos(2v - 1).
    pub fn on_sphere(&mut self, radius: f32) -> Vec3 {
        let theta = TAU * self.next_f32();
        let phi = (2.0 * self.next_f32() - 1.0).clamp(-1.0, 1.0).acos();
        Vec3::new(
            radius * phi.sin() * theta.cos(),
            radius * phi.sin() * theta.sin(),
            radius * phi.cos(),
        )
    }

    /// Independent Euler angles, each in [0, pi).
    pub fn euler(&mut self) -> Vec3 {
        Vec3::new(self.range(0.0, PI), self.range(0.0, PI), self.range(0.0, PI))
    }

    /// Derive an independent generator (e.g. one per debris trail).
    pub fn fork(&mut self) -> Rng {
        Rng::new(self.next_u64() ^ 0x9E37_79B9_7F4A_7C15)
    }
}
