use bytemuck::{Pod, Zeroable};
use glam::Vec3;

use crate::systems::effects::gradient::Rgb;

/// Per-instance transform written to the shared frame buffer.
/// Must match the TypeScript protocol: 12 floats = 48 bytes stride.
///
/// `rotation` holds XYZ Euler angles in radians. Hidden instances carry a
/// zero scale so the renderer draws nothing at their (stale) position.
#[repr(C)]
#[derive(Debug, Clone, Copy, Default, PartialEq, Pod, Zeroable)]
pub struct InstanceTransform {
    pub position: [f32; 3],
    pub scale: [f32; 3],
    pub rotation: [f32; 3],
    pub color: Rgb,
}

impl InstanceTransform {
    pub const FLOATS: usize = 12;
    pub const STRIDE_BYTES: usize = Self::FLOATS * 4;

    /// Zero-scale placeholder for free slots.
    pub const HIDDEN: InstanceTransform = InstanceTransform {
        position: [0.0; 3],
        scale: [0.0; 3],
        rotation: [0.0; 3],
        color: [0.0; 3],
    };

    pub fn new(position: Vec3, scale: f32, rotation: Vec3, color: Rgb) -> Self {
        Self {
            position: position.to_array(),
            scale: [scale; 3],
            rotation: rotation.to_array(),
            color,
        }
    }

    pub fn is_hidden(&self) -> bool {
        self.scale == [0.0; 3]
    }
}

/// Per-body render record: 12 floats = 48 bytes stride.
#[repr(C)]
#[derive(Debug, Clone, Copy, Default, PartialEq, Pod, Zeroable)]
pub struct BodyInstance {
    pub position: [f32; 3],
    pub orbital_angle: f32,
    pub spin_angle: f32,
    /// Hover scale multiplier (1.0 at rest).
    pub scale: f32,
    /// Visual sphere radius before `scale`.
    pub radius: f32,
    /// Sum of `FLAG_*` values.
    pub flags: f32,
    pub color: Rgb,
    pub _pad: f32,
}

impl BodyInstance {
    pub const FLOATS: usize = 12;
    pub const FLAG_SELECTED: f32 = 1.0;
    pub const FLAG_HOVERED: f32 = 2.0;
}

/// Fixed-length, dense instance array. The length never changes after
/// construction; every slot is rewritten on each rebuild.
#[derive(Debug, Clone)]
pub struct InstanceBatch {
    instances: Vec<InstanceTransform>,
}

impl InstanceBatch {
    pub fn new(len: usize) -> Self {
        Self {
            instances: vec![InstanceTransform::HIDDEN; len],
        }
    }

    pub fn len(&self) -> usize {
        self.instances.len()
    }

    pub fn is_empty(&self) -> bool {
        self.instances.is_empty()
    }

    /// Overwrite slot `idx`. Out-of-range writes are ignored.
    #[inline]
    pub fn set(&mut self, idx: usize, instance: InstanceTransform) {
        if let Some(slot) = self.instances.get_mut(idx) {
            *slot = instance;
        }
    }

    #[inline]
    pub fn hide(&mut self, idx: usize) {
        self.set(idx, InstanceTransform::HIDDEN);
    }

    pub fn hide_all(&mut self) {
        self.instances.fill(InstanceTransform::HIDDEN);
    }

    pub fn get(&self, idx: usize) -> Option<&InstanceTransform> {
        self.instances.get(idx)
    }

    pub fn as_slice(&self) -> &[InstanceTransform] {
        &self.instances
    }

    /// Mutable view of a contiguous range, for sub-batches such as one debris trail.
    pub fn range_mut(&mut self, start: usize, len: usize) -> &mut [InstanceTransform] {
        let end = (start + len).min(self.instances.len());
        let start = start.min(end);
        &mut self.instances[start..end]
    }

    /// Number of slots with non-zero scale.
    pub fn visible_count(&self) -> usize {
        self.instances.iter().filter(|i| !i.is_hidden()).count()
    }

    /// Flat float view for bulk upload.
    pub fn as_floats(&self) -> &[f32] {
        bytemuck::cast_slice(&self.instances)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn instance_transform_is_12_floats() {
        assert_eq!(std::mem::size_of::<InstanceTransform>(), 48);
        assert_eq!(InstanceTransform::FLOATS, 12);
    }

    #[test]
    fn body_instance_is_12_floats() {
        assert_eq!(std::mem::size_of::<BodyInstance>(), BodyInstance::FLOATS * 4);
    }

    #[test]
    fn batch_keeps_fixed_length() {
        let mut batch = InstanceBatch::new(4);
        batch.set(1, InstanceTransform::new(Vec3::ONE, 2.0, Vec3::ZERO, [1.0; 3]));
        batch.set(9, InstanceTransform::new(Vec3::ONE, 2.0, Vec3::ZERO, [1.0; 3]));
        assert_eq!(batch.len(), 4);
        assert_eq!(batch.visible_count(), 1);
        assert_eq!(batch.as_floats().len(), 4 * InstanceTransform::FLOATS);
    }

    #[test]
    fn hide_zeroes_scale() {
        let mut batch = InstanceBatch::new(2);
        batch.set(0, InstanceTransform::new(Vec3::X, 3.0, Vec3::ZERO, [1.0; 3]));
        batch.hide(0);
        assert!(batch.get(0).map_or(false, |i| i.is_hidden()));
        assert_eq!(batch.visible_count(), 0);
    }

    #[test]
    fn range_mut_is_clamped() {
        let mut batch = InstanceBatch::new(5);
        assert_eq!(batch.range_mut(3, 10).len(), 2);
        assert_eq!(batch.range_mut(8, 2).len(), 0);
    }
}
