/// Frame buffer layout.
/// Must stay in sync with TypeScript `protocol.ts`.
///
/// Layout (all values in f32 / 4 bytes):
/// ```text
/// [Header: 16 floats]
/// [Bodies: body_count × 12 floats]
/// [Flares: flare_capacity × 12 floats]
/// [Debris: body_count × debris_per_body × 12 floats]
/// [Belt:   belt_count × 12 floats]
/// ```
///
/// Capacities are written into the header on every frame.
/// TypeScript reads them from the header to compute offsets dynamically.

use crate::core::simulation::Simulation;
use crate::renderer::instance::{BodyInstance, InstanceTransform};

/// Number of floats in the header section.
pub const HEADER_FLOATS: usize = 16;

/// Header field indices.
pub const HEADER_PROTOCOL_VERSION: usize = 0;
pub const HEADER_FRAME_COUNTER: usize = 1;
pub const HEADER_BODY_COUNT: usize = 2;
pub const HEADER_FLARE_CAPACITY: usize = 3;
pub const HEADER_DEBRIS_PER_BODY: usize = 4;
pub const HEADER_BELT_COUNT: usize = 5;
pub const HEADER_CAMERA_X: usize = 6;
pub const HEADER_CAMERA_Y: usize = 7;
pub const HEADER_CAMERA_Z: usize = 8;
pub const HEADER_BELT_ROTATION: usize = 9;
pub const HEADER_SUN_ROTATION: usize = 10;
pub const HEADER_SELECTED: usize = 11;
pub const HEADER_LIVE_FLARES: usize = 12;
pub const HEADER_HOVERED: usize = 13;
pub const HEADER_SCANNING: usize = 14;
pub const HEADER_SUN_RADIUS: usize = 15;

/// Protocol version written into the header.
pub const PROTOCOL_VERSION: f32 = 1.0;

/// Header value for "no body".
pub const NO_INDEX: f32 = -1.0;

/// Floats per body record (wire format, never changes).
pub const BODY_FLOATS: usize = BodyInstance::FLOATS;

/// Floats per instance transform (wire format, never changes).
pub const INSTANCE_FLOATS: usize = InstanceTransform::FLOATS;

/// Buffer layout computed from simulation capacities.
#[derive(Debug, Clone, PartialEq)]
pub struct ProtocolLayout {
    pub body_count: usize,
    pub flare_capacity: usize,
    pub debris_per_body: usize,
    pub belt_count: usize,

    /// Size of body section in floats.
    pub body_data_floats: usize,
    /// Size of flare section in floats.
    pub flare_data_floats: usize,
    /// Size of debris section in floats.
    pub debris_data_floats: usize,
    /// Size of belt section in floats.
    pub belt_data_floats: usize,

    /// Offset (in floats) where body data begins.
    pub body_data_offset: usize,
    /// Offset (in floats) where flare data begins.
    pub flare_data_offset: usize,
    /// Offset (in floats) where debris data begins.
    pub debris_data_offset: usize,
    /// Offset (in floats) where belt data begins.
    pub belt_data_offset: usize,

    /// Total buffer size in floats.
    pub buffer_total_floats: usize,
    /// Total buffer size in bytes.
    pub buffer_total_bytes: usize,
}

impl ProtocolLayout {
    /// Compute layout from raw capacity values.
    pub fn new(body_count: usize, flare_capacity: usize, debris_per_body: usize, belt_count: usize) -> Self {
        let body_data_floats = body_count * BODY_FLOATS;
        let flare_data_floats = flare_capacity * INSTANCE_FLOATS;
        let debris_data_floats = body_count * debris_per_body * INSTANCE_FLOATS;
        let belt_data_floats = belt_count * INSTANCE_FLOATS;

        let body_data_offset = HEADER_FLOATS;
        let flare_data_offset = body_data_offset + body_data_floats;
        let debris_data_offset = flare_data_offset + flare_data_floats;
        let belt_data_offset = debris_data_offset + debris_data_floats;

        let buffer_total_floats = belt_data_offset + belt_data_floats;
        let buffer_total_bytes = buffer_total_floats * 4;

        Self {
            body_count,
            flare_capacity,
            debris_per_body,
            belt_count,
            body_data_floats,
            flare_data_floats,
            debris_data_floats,
            belt_data_floats,
            body_data_offset,
            flare_data_offset,
            debris_data_offset,
            belt_data_offset,
            buffer_total_floats,
            buffer_total_bytes,
        }
    }

    /// Compute layout from a live simulation.
    pub fn for_simulation(sim: &Simulation) -> Self {
        Self::new(
            sim.bodies().len(),
            sim.effects().flare_batch.len(),
            sim.effects().debris_per_body(),
            sim.belt().len(),
        )
    }

    /// Write the belt section. The belt never changes, so this runs once.
    pub fn pack_static(&self, sim: &Simulation, buf: &mut [f32]) -> bool {
        if !self.fits(buf) {
            return false;
        }
        copy_section(buf, self.belt_data_offset, self.belt_data_floats, sim.belt().batch().as_floats());
        true
    }

    /// Write header, bodies, flares and debris for the current frame.
    pub fn pack_frame(&self, sim: &Simulation, buf: &mut [f32]) -> bool {
        if !self.fits(buf) {
            return false;
        }

        let camera = sim.camera_target();
        let index = |i: Option<usize>| i.map_or(NO_INDEX, |i| i as f32);
        let header = &mut buf[..HEADER_FLOATS];
        header[HEADER_PROTOCOL_VERSION] = PROTOCOL_VERSION;
        header[HEADER_FRAME_COUNTER] = sim.frame() as f32;
        header[HEADER_BODY_COUNT] = self.body_count as f32;
        header[HEADER_FLARE_CAPACITY] = self.flare_capacity as f32;
        header[HEADER_DEBRIS_PER_BODY] = self.debris_per_body as f32;
        header[HEADER_BELT_COUNT] = self.belt_count as f32;
        header[HEADER_CAMERA_X] = camera.x;
        header[HEADER_CAMERA_Y] = camera.y;
        header[HEADER_CAMERA_Z] = camera.z;
        header[HEADER_BELT_ROTATION] = sim.belt().rotation();
        header[HEADER_SUN_ROTATION] = sim.sun_rotation();
        header[HEADER_SELECTED] = index(sim.selected());
        header[HEADER_LIVE_FLARES] = sim.effects().flares.live_count() as f32;
        header[HEADER_HOVERED] = index(sim.hovered());
        header[HEADER_SCANNING] = if sim.scanning() { 1.0 } else { 0.0 };
        header[HEADER_SUN_RADIUS] = sim.config().sun_radius;

        let bodies = &mut buf[self.body_data_offset..self.body_data_offset + self.body_data_floats];
        for (chunk, body) in bodies.chunks_exact_mut(BODY_FLOATS).zip(sim.bodies()) {
            chunk.copy_from_slice(bytemuck::cast_slice(std::slice::from_ref(&body.instance())));
        }

        let fx = sim.effects();
        copy_section(buf, self.flare_data_offset, self.flare_data_floats, fx.flare_batch.as_floats());
        copy_section(buf, self.debris_data_offset, self.debris_data_floats, fx.debris_batch.as_floats());
        true
    }

    fn fits(&self, buf: &[f32]) -> bool {
        if buf.len() < self.buffer_total_floats {
            log::warn!(
                "frame buffer holds {} floats, layout needs {}",
                buf.len(),
                self.buffer_total_floats
            );
            return false;
        }
        true
    }
}

fn copy_section(buf: &mut [f32], offset: usize, len: usize, src: &[f32]) {
    let n = len.min(src.len());
    buf[offset..offset + n].copy_from_slice(&src[..n]);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::config::SimConfig;

    #[test]
    fn default_layout_sizes() {
        let layout = ProtocolLayout::new(8, 30, 40, 2000);
        assert_eq!(layout.body_data_offset, 16);
        assert_eq!(layout.flare_data_offset, 16 + 8 * 12);
        assert_eq!(layout.debris_data_offset, 16 + 8 * 12 + 30 * 12);
        assert_eq!(layout.belt_data_offset, 16 + 8 * 12 + 30 * 12 + 320 * 12);
        assert_eq!(layout.buffer_total_floats, 16 + (8 + 30 + 320 + 2000) * 12);
        assert_eq!(layout.buffer_total_bytes, layout.buffer_total_floats * 4);
    }

    #[test]
    fn layout_matches_simulation() {
        let sim = Simulation::with_default_catalog(SimConfig::default());
        assert_eq!(ProtocolLayout::for_simulation(&sim), ProtocolLayout::new(8, 30, 40, 2000));
    }

    #[test]
    fn pack_writes_header_and_sections() {
        let mut sim = Simulation::with_default_catalog(SimConfig::default());
        sim.tick(1.0 / 60.0);
        let layout = ProtocolLayout::for_simulation(&sim);
        let mut buf = vec![0.0; layout.buffer_total_floats];
        assert!(layout.pack_static(&sim, &mut buf));
        assert!(layout.pack_frame(&sim, &mut buf));

        assert_eq!(buf[HEADER_PROTOCOL_VERSION], PROTOCOL_VERSION);
        assert_eq!(buf[HEADER_FRAME_COUNTER], 1.0);
        assert_eq!(buf[HEADER_SELECTED], 2.0);
        assert_eq!(buf[HEADER_HOVERED], NO_INDEX);
        assert_eq!(buf[HEADER_CAMERA_X], sim.camera_target().x);

        let earth = layout.body_data_offset + 2 * BODY_FLOATS;
        let pos = sim.bodies()[2].world_position();
        assert_eq!(&buf[earth..earth + 3], &pos.to_array());
        assert_eq!(buf[earth + 7], BodyInstance::FLAG_SELECTED);

        let belt = sim.belt().batch().as_floats();
        assert_eq!(&buf[layout.belt_data_offset..layout.belt_data_offset + 12], &belt[..12]);
    }

    #[test]
    fn short_buffer_is_rejected() {
        let sim = Simulation::with_default_catalog(SimConfig::default());
        let layout = ProtocolLayout::for_simulation(&sim);
        let mut buf = vec![0.0; layout.buffer_total_floats - 1];
        assert!(!layout.pack_frame(&sim, &mut buf));
        assert!(buf.iter().all(|v| *v == 0.0));
    }
}
