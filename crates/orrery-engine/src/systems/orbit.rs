//! Orbital kinematics for bodies circling a shared pivot.
//!
//! Each body carries two accumulators, an orbital angle around the pivot and a
//! self-rotation angle. Both advance by fixed per-tick steps; the world
//! position is re-derived from the orbital angle after every step.

use glam::{Quat, Vec3};
use serde::{Deserialize, Serialize};
use std::f32::consts::TAU;

use crate::api::config::SimConfig;
use crate::extensions::{approach, wrap_angle};
use crate::renderer::instance::BodyInstance;
use crate::systems::effects::gradient::{rgb_from_hex, Rgb};

/// Fallback body color for unparseable hex strings.
const DEFAULT_BODY_COLOR: Rgb = [0.6, 0.6, 0.6];

/// Visual radius of a body with `radius_scale == 1`.
pub const BASE_BODY_RADIUS: f32 = 2.5;

/// Static description of one planet, as stored in the catalog or a JSON file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BodyDesc {
    pub name: String,
    /// `#RRGGBB`
    pub color: String,
    pub radius_scale: f32,
    /// Distance from the pivot in world units.
    pub distance: f32,
    /// Orbital rotation per tick, before the global slow-down.
    pub speed: f32,
}

impl BodyDesc {
    /// Parse a JSON array of body descriptions.
    pub fn list_from_json(json: &str) -> Result<Vec<Self>, serde_json::Error> {
        serde_json::from_str(json)
    }
}

/// Per-tick stepping constants shared by all bodies.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OrbitParams {
    pub slowdown: f32,
    pub spin_step: f32,
    pub scan_spin_step: f32,
    pub hover_scale: f32,
    pub hover_smoothing: f32,
}

impl OrbitParams {
    pub fn from_config(config: &SimConfig) -> Self {
        Self {
            slowdown: config.orbit_slowdown,
            spin_step: config.spin_step,
            scan_spin_step: config.scan_spin_step,
            hover_scale: config.hover_scale,
            hover_smoothing: config.hover_smoothing,
        }
    }
}

impl Default for OrbitParams {
    fn default() -> Self {
        Self::from_config(&SimConfig::default())
    }
}

/// One planet's kinematic state.
#[derive(Debug, Clone, PartialEq)]
pub struct OrbitingBody {
    pub name: String,
    pub distance: f32,
    pub angular_speed: f32,
    pub radius_scale: f32,
    pub color: Rgb,
    pub selected: bool,
    pub hovered: bool,
    orbital_angle: f32,
    spin_angle: f32,
    hover_scale: f32,
    world_position: Vec3,
}

impl OrbitingBody {
    pub fn new(name: impl Into<String>, distance: f32, angular_speed: f32, radius_scale: f32) -> Self {
        Self {
            name: name.into(),
            distance,
            angular_speed,
            radius_scale,
            color: DEFAULT_BODY_COLOR,
            selected: false,
            hovered: false,
            orbital_angle: 0.0,
            spin_angle: 0.0,
            hover_scale: 1.0,
            world_position: Vec3::new(distance, 0.0, 0.0),
        }
    }

    pub fn from_desc(desc: &BodyDesc) -> Self {
        let color = rgb_from_hex(&desc.color).unwrap_or_else(|| {
            log::warn!("body {}: bad color {:?}, using grey", desc.name, desc.color);
            DEFAULT_BODY_COLOR
        });
        Self::new(desc.name.clone(), desc.distance, desc.speed, desc.radius_scale).with_color(color)
    }

    pub fn with_color(mut self, color: Rgb) -> Self {
        self.color = color;
        self
    }

    /// Start the body at a given orbital angle instead of 0.
    pub fn with_orbital_angle(mut self, angle: f32) -> Self {
        self.orbital_angle = wrap_angle(angle);
        self.world_position = self.pivot_rotation() * Vec3::new(self.distance, 0.0, 0.0);
        self
    }

    pub fn orbital_angle(&self) -> f32 {
        self.orbital_angle
    }

    pub fn spin_angle(&self) -> f32 {
        self.spin_angle
    }

    pub fn hover_scale(&self) -> f32 {
        self.hover_scale
    }

    pub fn world_position(&self) -> Vec3 {
        self.world_position
    }

    /// Rendered sphere radius before hover scaling.
    pub fn visual_radius(&self) -> f32 {
        BASE_BODY_RADIUS * self.radius_scale
    }

    /// Inner/outer radii of the selection reticle ring.
    pub fn reticle_radii(&self) -> (f32, f32) {
        let r = self.visual_radius();
        (r + 1.0, r + 1.2)
    }

    /// Radius of the atmosphere glow shell shown while selected.
    pub fn glow_radius(&self) -> f32 {
        self.visual_radius() * 1.25
    }

    /// Closed ring traced by this body, for drawing its orbit.
    pub fn orbit_path(&self, segments: usize) -> Vec<Vec3> {
        orbit_path(self.distance, segments)
    }

    /// Rotation of the body's orbital frame about the pivot's Y axis.
    pub fn pivot_rotation(&self) -> Quat {
        Quat::from_rotation_y(self.orbital_angle)
    }

    /// Map a point from the body's local frame (origin at the body, axes
    /// turning with the orbit) into world space.
    pub fn local_to_world(&self, local: Vec3) -> Vec3 {
        self.pivot_rotation() * (Vec3::new(self.distance, 0.0, 0.0) + local)
    }

    /// Advance one tick. `scanning` only has an effect on the selected body.
    pub fn advance(&mut self, params: &OrbitParams, scanning: bool) {
        self.orbital_angle = wrap_angle(self.orbital_angle + self.angular_speed * params.slowdown);

        let mut spin = params.spin_step;
        if self.selected && scanning {
            spin += params.scan_spin_step;
        }
        self.spin_angle = wrap_angle(self.spin_angle + spin);

        let target = if self.hovered { params.hover_scale } else { 1.0 };
        self.hover_scale = approach(self.hover_scale, target, params.hover_smoothing);

        self.world_position = self.pivot_rotation() * Vec3::new(self.distance, 0.0, 0.0);
    }

    /// Render record for the frame buffer.
    pub fn instance(&self) -> BodyInstance {
        let mut flags = 0.0;
        if self.selected {
            flags += BodyInstance::FLAG_SELECTED;
        }
        if self.hovered {
            flags += BodyInstance::FLAG_HOVERED;
        }
        BodyInstance {
            position: self.world_position.to_array(),
            orbital_angle: self.orbital_angle,
            spin_angle: self.spin_angle,
            scale: self.hover_scale,
            radius: self.visual_radius(),
            flags,
            color: self.color,
            _pad: 0.0,
        }
    }
}

/// Closed ring of `segments + 1` points at `distance` from the pivot,
/// in the orbital plane. The last point repeats the first.
pub fn orbit_path(distance: f32, segments: usize) -> Vec<Vec3> {
    let segments = segments.max(3);
    (0..=segments)
        .map(|i| {
            let angle = i as f32 / segments as f32 * TAU;
            Vec3::new(angle.cos() * distance, 0.0, angle.sin() * distance)
        })
        .collect()
}

/// Advance every body in table order.
pub fn advance_all(bodies: &mut [OrbitingBody], params: &OrbitParams, scanning: bool) {
    for body in bodies {
        body.advance(params, scanning);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn earth() -> OrbitingBody {
        OrbitingBody::new("Earth", 70.0, 0.01, 1.2)
    }

    #[test]
    fn orbital_angle_advances_by_scaled_speed() {
        let mut b = earth();
        let params = OrbitParams::default();
        b.advance(&params, false);
        assert!((b.orbital_angle() - 0.005).abs() < 1e-7);
        assert!((b.spin_angle() - 0.005).abs() < 1e-7);
    }

    #[test]
    fn orbital_angle_is_monotonic_mod_tau() {
        let mut b = OrbitingBody::new("Mercury", 35.0, 0.015, 0.8);
        let params = OrbitParams::default();
        for _ in 0..5000 {
            let before = b.orbital_angle();
            b.advance(&params, false);
            let step = (b.orbital_angle() - before).rem_euclid(TAU);
            assert!((step - 0.0075).abs() < 1e-4, "step {step}");
            assert!((0.0..TAU).contains(&b.orbital_angle()));
        }
    }

    #[test]
    fn world_position_traces_closed_circle() {
        let mut b = earth();
        let params = OrbitParams { slowdown: 1.0, ..OrbitParams::default() };
        b.angular_speed = TAU / 400.0;
        let start = b.world_position();
        for _ in 0..400 {
            b.advance(&params, false);
            let p = b.world_position();
            assert!((p.length() - 70.0).abs() < 1e-3);
            assert!(p.y.abs() < 1e-6);
        }
        assert!((b.world_position() - start).length() < 1e-2);
    }

    #[test]
    fn quarter_turn_rotates_about_y() {
        let b = earth().with_orbital_angle(std::f32::consts::FRAC_PI_2);
        let p = b.world_position();
        assert!(p.x.abs() < 1e-4);
        assert!((p.z + 70.0).abs() < 1e-4);
    }

    #[test]
    fn scanning_spins_only_the_selected_body() {
        let params = OrbitParams::default();
        let mut selected = earth();
        selected.selected = true;
        let mut other = earth();
        selected.advance(&params, true);
        other.advance(&params, true);
        assert!((selected.spin_angle() - 0.025).abs() < 1e-7);
        assert!((other.spin_angle() - 0.005).abs() < 1e-7);
    }

    #[test]
    fn hover_scale_eases_toward_target() {
        let params = OrbitParams::default();
        let mut b = earth();
        b.hovered = true;
        b.advance(&params, false);
        assert!((b.hover_scale() - 1.02).abs() < 1e-6);
        for _ in 0..200 {
            b.advance(&params, false);
        }
        assert!((b.hover_scale() - 1.2).abs() < 1e-4);
        b.hovered = false;
        b.advance(&params, false);
        assert!(b.hover_scale() < 1.2 && b.hover_scale() > 1.0);
    }

    #[test]
    fn local_frame_turns_with_orbit() {
        let b = earth().with_orbital_angle(std::f32::consts::PI);
        let behind = b.local_to_world(Vec3::new(0.0, 0.0, -1.0));
        assert!((behind - Vec3::new(-70.0, 0.0, 1.0)).length() < 1e-4);
    }

    #[test]
    fn orbit_path_is_closed() {
        let path = orbit_path(50.0, 128);
        assert_eq!(path.len(), 129);
        assert!((path[0] - path[128]).length() < 1e-3);
        assert!(path.iter().all(|p| (p.length() - 50.0).abs() < 1e-3));
    }

    #[test]
    fn desc_parsing_and_bad_color() {
        let json = r##"[
            { "name": "Mars", "color": "#C0392B", "radiusScale": 0.9, "distance": 90, "speed": 0.008 },
            { "name": "Odd", "color": "blue", "radiusScale": 1.0, "distance": 10, "speed": 0.1 }
        ]"##;
        let descs = BodyDesc::list_from_json(json).unwrap();
        let mars = OrbitingBody::from_desc(&descs[0]);
        assert!((mars.color[0] - 192.0 / 255.0).abs() < 1e-6);
        assert!((mars.visual_radius() - 2.25).abs() < 1e-5);
        let odd = OrbitingBody::from_desc(&descs[1]);
        assert_eq!(odd.color, DEFAULT_BODY_COLOR);
    }

    #[test]
    fn instance_flags() {
        let mut b = earth();
        b.selected = true;
        b.hovered = true;
        let inst = b.instance();
        assert_eq!(inst.flags, BodyInstance::FLAG_SELECTED + BodyInstance::FLAG_HOVERED);
        assert!((inst.radius - 3.0).abs() < 1e-5);
    }
}
