//! Visual effects: sun flares and per-body debris trails.
//!
//! This module provides the `EffectsState` facade that owns the flare pool,
//! every debris trail and the two instance batches they are written into,
//! plus the individual pieces that can be used directly if needed.

mod rng;
pub mod gradient;
mod particle;
mod flare;
mod debris;

// Re-export public types
pub use rng::Rng;
pub use gradient::{rgb_from_hex, LifeBand, LifeGradient, Rgb};
pub use particle::{Particle, ParticlePool};
pub use flare::{scale_curve, FlareEmitter};
pub use debris::{DebrisMote, DebrisTrail};

use crate::api::config::SimConfig;
use crate::renderer::instance::{InstanceBatch, InstanceTransform};
use crate::systems::orbit::OrbitingBody;

/// Which debris trails animate this tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActiveTrails {
    None,
    One(usize),
    All,
}

impl ActiveTrails {
    pub fn contains(&self, idx: usize) -> bool {
        match *self {
            ActiveTrails::None => false,
            ActiveTrails::One(i) => i == idx,
            ActiveTrails::All => true,
        }
    }
}

/// Container for all particle effects.
/// Storage is sized once in `new`; ticks and rebuilds never allocate.
pub struct EffectsState {
    pub flares: ParticlePool,
    pub emitter: FlareEmitter,
    pub flare_batch: InstanceBatch,
    pub trails: Vec<DebrisTrail>,
    /// `trails.len() * per_body` slots, trail `i` at `i * per_body`.
    pub debris_batch: InstanceBatch,
    per_body: usize,
    pub rng: Rng,
}

impl EffectsState {
    /// Build the flare pool and one debris trail per body.
    pub fn new(config: &SimConfig, bodies: &[OrbitingBody]) -> Self {
        let mut rng = Rng::new(config.seed.wrapping_add(7919));
        let emitter = FlareEmitter::new(config.sun_radius, config.flare_rate)
            .with_spawn_depth(config.flare_spawn_depth)
            .with_expansion(config.flare_expansion);
        let per_body = config.debris_per_body;
        let mut debris_rng = rng.fork();
        let trails = bodies
            .iter()
            .map(|b| DebrisTrail::new(per_body, b.radius_scale, b.color, &mut debris_rng))
            .collect::<Vec<_>>();

        EffectsState {
            flares: ParticlePool::new(config.flare_capacity),
            emitter,
            flare_batch: InstanceBatch::new(config.flare_capacity),
            debris_batch: InstanceBatch::new(trails.len() * per_body),
            trails,
            per_body,
            rng,
        }
    }

    pub fn debris_per_body(&self) -> usize {
        self.per_body
    }

    /// Spawn, then age. A flare that dies this tick is already free when
    /// `rebuild` runs.
    pub fn tick(&mut self, dt: f32, active: ActiveTrails) {
        self.emitter.emit(&mut self.flares, &mut self.rng, dt);
        self.flares.tick(dt);
        for (idx, trail) in self.trails.iter_mut().enumerate() {
            if active.contains(idx) {
                trail.tick();
            }
        }
    }

    /// Rewrite both batches. Debris of inactive bodies is hidden.
    pub fn rebuild(&mut self, bodies: &[OrbitingBody], active: ActiveTrails) {
        self.emitter.rebuild(&self.flares, &mut self.flare_batch);

        for (idx, trail) in self.trails.iter().enumerate() {
            let out = self.debris_batch.range_mut(idx * self.per_body, self.per_body);
            match bodies.get(idx) {
                Some(body) if active.contains(idx) => {
                    trail.write(out, |local| body.local_to_world(local));
                }
                _ => out.fill(InstanceTransform::HIDDEN),
            }
        }
    }

    /// Kill every flare; debris trails keep their phases.
    pub fn clear_flares(&mut self) {
        self.flares.clear();
        self.flare_batch.hide_all();
    }
}
