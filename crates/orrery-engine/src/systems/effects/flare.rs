//! Solar flare emission policy and lifecycle curve.
//!
//! Spawning is a single Bernoulli trial per tick with success probability
//! `rate * dt`. The expected spawn rate is frame-rate independent, but at most
//! one flare can start per tick, so the model undercounts once `rate * dt`
//! approaches 1. Callers keep the rate low enough that this never matters.

use glam::Vec3;
use std::f32::consts::PI;

use super::gradient::{flare, LifeGradient};
use super::particle::{Particle, ParticlePool};
use super::rng::Rng;
use crate::renderer::instance::{InstanceBatch, InstanceTransform};

/// Fallback direction for a particle sitting exactly on the emitter center.
const DEFAULT_AXIS: Vec3 = Vec3::Y;

/// Stochastic spawn rule plus the parametric curves that turn a flare's
/// remaining life into a transform.
#[derive(Debug, Clone)]
pub struct FlareEmitter {
    /// Emitter (sun) radius.
    pub radius: f32,
    /// Target flares per second.
    pub rate: f32,
    /// Spawn points sit at `radius * spawn_depth`, just under the surface.
    pub spawn_depth: f32,
    /// Outward travel over one lifetime.
    pub expansion: f32,
    pub peak_scale_range: (f32, f32),
    pub fade_speed_range: (f32, f32),
    pub gradient: LifeGradient,
}

impl Default for FlareEmitter {
    fn default() -> Self {
        Self {
            radius: 12.0,
            rate: 3.0,
            spawn_depth: 0.9,
            expansion: 6.0,
            peak_scale_range: (3.0, 7.0),
            fade_speed_range: (0.3, 0.7),
            gradient: flare::gradient(),
        }
    }
}

impl FlareEmitter {
    pub fn new(radius: f32, rate: f32) -> Self {
        Self {
            radius,
            rate,
            ..Self::default()
        }
    }

    // -- Builder pattern --

    pub fn with_spawn_depth(mut self, depth: f32) -> Self {
        self.spawn_depth = depth;
        self
    }

    pub fn with_expansion(mut self, expansion: f32) -> Self {
        self.expansion = expansion;
        self
    }

    /// Spawn probability for a frame of `dt` seconds.
    pub fn spawn_probability(&self, dt: f32) -> f32 {
        (self.rate * dt).clamp(0.0, 1.0)
    }

    /// Run one tick of emission. Returns true if a flare was placed in the pool.
    pub fn emit(&self, pool: &mut ParticlePool, rng: &mut Rng, dt: f32) -> bool {
        if !rng.chance(self.spawn_probability(dt)) {
            return false;
        }
        let origin = rng.on_sphere(self.radius * self.spawn_depth);
        let peak_scale = rng.range(self.peak_scale_range.0, self.peak_scale_range.1);
        let fade_speed = rng.range(self.fade_speed_range.0, self.fade_speed_range.1);
        pool.spawn(origin, peak_scale, fade_speed)
    }

    /// Transform for a live flare, in the sun's local space.
    pub fn transform(&self, p: &Particle) -> InstanceTransform {
        let age = p.age();
        let dir = p.origin.try_normalize().unwrap_or(DEFAULT_AXIS);
        let position = dir * (self.radius + age * self.expansion);
        let scale = (p.peak_scale * scale_curve(age)).max(0.0);
        let rotation = Vec3::new(age * 2.0, age * 2.0, 0.0);
        InstanceTransform::new(position, scale, rotation, self.gradient.sample(p.life))
    }

    /// Rewrite every slot of `batch` from `pool`: live flares get their curve
    /// transform, free slots are hidden.
    pub fn rebuild(&self, pool: &ParticlePool, batch: &mut InstanceBatch) {
        for (idx, p) in pool.slots().iter().enumerate() {
            if p.is_live() {
                batch.set(idx, self.transform(p));
            } else {
                batch.hide(idx);
            }
        }
    }
}

/// Grow-then-shrink envelope: 0 at birth and death, 1 at half life.
#[inline]
pub fn scale_curve(age: f32) -> f32 {
    (age * PI).sin()
}
