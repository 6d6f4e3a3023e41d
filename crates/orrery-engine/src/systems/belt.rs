//! Static asteroid belt.
//!
//! Element transforms are generated once from a seeded RNG and never touched
//! again. The only per-tick state is the rotation of the whole field about
//! the pivot's Y axis.

use glam::{Quat, Vec3};
use std::f32::consts::TAU;

use crate::api::config::SimConfig;
use crate::extensions::wrap_angle;
use crate::renderer::instance::{InstanceBatch, InstanceTransform};
use crate::systems::effects::{Rgb, Rng};

/// Rock color, `#555555`.
pub const BELT_COLOR: Rgb = [0x55 as f32 / 255.0; 3];

/// Shape of the annulus the belt is scattered over.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BeltShape {
    pub count: usize,
    pub inner_radius: f32,
    pub outer_radius: f32,
    pub half_height: f32,
    pub scale_range: (f32, f32),
}

impl BeltShape {
    pub fn from_config(config: &SimConfig) -> Self {
        Self {
            count: config.belt_count,
            inner_radius: config.belt_inner_radius,
            outer_radius: config.belt_outer_radius,
            half_height: config.belt_half_height,
            scale_range: (0.05, 0.35),
        }
    }
}

/// Immutable field of rocks plus its aggregate rotation.
#[derive(Debug, Clone)]
pub struct AsteroidBelt {
    shape: BeltShape,
    /// Transforms in the field's local frame.
    batch: InstanceBatch,
    rotation: f32,
    /// Radians per second.
    pub spin_rate: f32,
}

impl AsteroidBelt {
    pub fn generate(shape: BeltShape, spin_rate: f32, rng: &mut Rng) -> Self {
        let mut batch = InstanceBatch::new(shape.count);
        for idx in 0..shape.count {
            let angle = rng.range(0.0, TAU);
            let radius = rng.range(shape.inner_radius, shape.outer_radius);
            let height = rng.range(-shape.half_height, shape.half_height);
            let rotation = rng.euler();
            let scale = rng.range(shape.scale_range.0, shape.scale_range.1);
            let position = Vec3::new(angle.cos() * radius, height, angle.sin() * radius);
            batch.set(idx, InstanceTransform::new(position, scale, rotation, BELT_COLOR));
        }
        log::debug!(
            "asteroid belt: {} rocks in [{}, {}]",
            shape.count,
            shape.inner_radius,
            shape.outer_radius
        );
        Self {
            shape,
            batch,
            rotation: 0.0,
            spin_rate,
        }
    }

    pub fn from_config(config: &SimConfig) -> Self {
        let mut rng = Rng::new(config.seed.wrapping_add(104_729));
        Self::generate(BeltShape::from_config(config), config.belt_spin_rate, &mut rng)
    }

    pub fn shape(&self) -> &BeltShape {
        &self.shape
    }

    pub fn len(&self) -> usize {
        self.batch.len()
    }

    pub fn is_empty(&self) -> bool {
        self.batch.is_empty()
    }

    /// Local-frame transforms. Constant for the life of the belt.
    pub fn batch(&self) -> &InstanceBatch {
        &self.batch
    }

    /// Current whole-field rotation about Y, in [0, 2π).
    pub fn rotation(&self) -> f32 {
        self.rotation
    }

    pub fn field_rotation(&self) -> Quat {
        Quat::from_rotation_y(self.rotation)
    }

    /// World position of element `idx` under the current field rotation.
    pub fn world_position(&self, idx: usize) -> Option<Vec3> {
        self.batch
            .get(idx)
            .map(|inst| self.field_rotation() * Vec3::from(inst.position))
    }

    pub fn tick(&mut self, dt: f32) {
        self.rotation = wrap_angle(self.rotation + self.spin_rate * dt);
    }
}
