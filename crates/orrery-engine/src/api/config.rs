use serde::{Deserialize, Serialize};

/// Which bodies animate their debris trail.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DebrisMode {
    /// Only the selected body shows debris.
    #[default]
    Selected,
    /// Every body shows debris.
    All,
}

/// Simulation configuration. Every field has a default, so a JSON config
/// only needs the values it overrides.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimConfig {
    /// Seed for every random draw (flares, debris, belt).
    pub seed: u64,
    /// Sun (flare emitter) radius in world units.
    pub sun_radius: f32,
    /// Sun self-rotation in radians per second.
    pub sun_spin_rate: f32,

    /// Flare pool capacity.
    pub flare_capacity: usize,
    /// Target flares per second.
    pub flare_rate: f32,
    /// Flare origins sit at this fraction of the sun radius.
    pub flare_spawn_depth: f32,
    /// Outward travel of a flare over its lifetime.
    pub flare_expansion: f32,

    /// Motes per debris trail.
    pub debris_per_body: usize,
    pub debris_mode: DebrisMode,

    /// Asteroid belt size.
    pub belt_count: usize,
    pub belt_inner_radius: f32,
    pub belt_outer_radius: f32,
    /// Belt elements lie within ±half_height of the orbital plane.
    pub belt_half_height: f32,
    /// Whole-belt rotation in radians per second.
    pub belt_spin_rate: f32,

    /// Global factor on every body's angular speed (per tick).
    pub orbit_slowdown: f32,
    /// Self rotation added every tick.
    pub spin_step: f32,
    /// Extra self rotation while the selected body is being scanned.
    pub scan_spin_step: f32,
    /// Visual scale target while hovered.
    pub hover_scale: f32,
    /// Per-tick smoothing factor toward the hover target.
    pub hover_smoothing: f32,

    /// Per-tick camera follow factor.
    pub camera_smoothing: f32,
    /// Rescale the camera factor by frame time (off by default).
    pub camera_frame_rate_correction: bool,

    /// Largest frame delta fed to a tick, in seconds.
    pub max_frame_dt: f32,
    /// Body selected when the simulation starts.
    pub initial_selection: Option<usize>,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            seed: 42,
            sun_radius: 12.0,
            sun_spin_rate: 0.02,
            flare_capacity: 30,
            flare_rate: 3.0,
            flare_spawn_depth: 0.9,
            flare_expansion: 6.0,
            debris_per_body: 40,
            debris_mode: DebrisMode::Selected,
            belt_count: 2000,
            belt_inner_radius: 100.0,
            belt_outer_radius: 120.0,
            belt_half_height: 3.0,
            belt_spin_rate: 0.01,
            orbit_slowdown: 0.5,
            spin_step: 0.005,
            scan_spin_step: 0.02,
            hover_scale: 1.2,
            hover_smoothing: 0.1,
            camera_smoothing: 0.1,
            camera_frame_rate_correction: false,
            max_frame_dt: 0.1,
            initial_selection: Some(2),
        }
    }
}

/// Upper bound on any single pool or field, to keep a bad config from
/// allocating gigabytes.
pub const MAX_INSTANCES_PER_BATCH: usize = 1 << 16;

impl SimConfig {
    /// Parse a config from a JSON string. Missing fields take defaults.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str::<Self>(json).map(Self::sanitized)
    }

    /// Replace out-of-range values with defaults.
    pub fn sanitized(mut self) -> Self {
        let d = Self::default();

        fn positive(value: f32, fallback: f32) -> f32 {
            if value.is_finite() && value > 0.0 { value } else { fallback }
        }
        fn non_negative(value: f32, fallback: f32) -> f32 {
            if value.is_finite() && value >= 0.0 { value } else { fallback }
        }
        fn unit(value: f32, fallback: f32) -> f32 {
            if value.is_finite() && (0.0..=1.0).contains(&value) { value } else { fallback }
        }

        self.sun_radius = positive(self.sun_radius, d.sun_radius);
        self.sun_spin_rate = non_negative(self.sun_spin_rate, d.sun_spin_rate);
        self.flare_rate = non_negative(self.flare_rate, d.flare_rate);
        self.flare_spawn_depth = positive(self.flare_spawn_depth, d.flare_spawn_depth);
        self.flare_expansion = non_negative(self.flare_expansion, d.flare_expansion);
        self.belt_half_height = non_negative(self.belt_half_height, d.belt_half_height);
        self.belt_spin_rate = non_negative(self.belt_spin_rate, d.belt_spin_rate);
        self.orbit_slowdown = non_negative(self.orbit_slowdown, d.orbit_slowdown);
        self.spin_step = non_negative(self.spin_step, d.spin_step);
        self.scan_spin_step = non_negative(self.scan_spin_step, d.scan_spin_step);
        self.hover_scale = positive(self.hover_scale, d.hover_scale);
        self.hover_smoothing = unit(self.hover_smoothing, d.hover_smoothing);
        self.camera_smoothing = unit(self.camera_smoothing, d.camera_smoothing);
        self.max_frame_dt = positive(self.max_frame_dt, d.max_frame_dt);

        let inner = non_negative(self.belt_inner_radius, d.belt_inner_radius);
        let outer = non_negative(self.belt_outer_radius, d.belt_outer_radius);
        if inner <= outer {
            self.belt_inner_radius = inner;
            self.belt_outer_radius = outer;
        } else {
            log::warn!("belt radii inverted ({inner} > {outer}), using defaults");
            self.belt_inner_radius = d.belt_inner_radius;
            self.belt_outer_radius = d.belt_outer_radius;
        }

        for (name, value) in [
            ("flare_capacity", &mut self.flare_capacity),
            ("debris_per_body", &mut self.debris_per_body),
            ("belt_count", &mut self.belt_count),
        ] {
            if *value > MAX_INSTANCES_PER_BATCH {
                log::warn!("{name} = {value} exceeds {MAX_INSTANCES_PER_BATCH}, clamping");
                *value = MAX_INSTANCES_PER_BATCH;
            }
        }
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config() {
        let c = SimConfig::default();
        assert_eq!(c.flare_capacity, 30);
        assert_eq!(c.debris_per_body, 40);
        assert_eq!(c.belt_count, 2000);
        assert_eq!(c.camera_smoothing, 0.1);
        assert!(!c.camera_frame_rate_correction);
        assert_eq!(c.initial_selection, Some(2));
    }

    #[test]
    fn parse_partial_config() {
        let json = r#"{ "flare_rate": 5.0, "debris_mode": "all", "initial_selection": null }"#;
        let c = SimConfig::from_json(json).unwrap();
        assert_eq!(c.flare_rate, 5.0);
        assert_eq!(c.debris_mode, DebrisMode::All);
        assert_eq!(c.initial_selection, None);
        assert_eq!(c.belt_count, 2000);
    }

    #[test]
    fn malformed_json_is_an_error() {
        assert!(SimConfig::from_json("{ not json").is_err());
        assert!(SimConfig::from_json(r#"{ "flare_capacity": -3 }"#).is_err());
    }

    #[test]
    fn sanitize_replaces_bad_values() {
        let c = SimConfig {
            sun_radius: -1.0,
            camera_smoothing: 1.5,
            hover_smoothing: f32::NAN,
            belt_inner_radius: 150.0,
            belt_outer_radius: 120.0,
            belt_count: usize::MAX,
            ..SimConfig::default()
        }
        .sanitized();
        assert_eq!(c.sun_radius, 12.0);
        assert_eq!(c.camera_smoothing, 0.1);
        assert_eq!(c.hover_smoothing, 0.1);
        assert_eq!((c.belt_inner_radius, c.belt_outer_radius), (100.0, 120.0));
        assert_eq!(c.belt_count, MAX_INSTANCES_PER_BATCH);
    }
}
