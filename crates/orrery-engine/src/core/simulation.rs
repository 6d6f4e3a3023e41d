//! Tick driver that owns every piece of simulation state.
//!
//! Order within a tick is fixed: orbital kinematics, emission (spawn then
//! age), batch rebuild, camera. The camera therefore always chases the
//! position the selected body has *this* tick.

use glam::Vec3;

use crate::api::config::{DebrisMode, SimConfig};
use crate::catalog;
use crate::extensions::wrap_angle;
use crate::input::queue::InputEvent;
use crate::renderer::camera::FollowCamera;
use crate::systems::belt::AsteroidBelt;
use crate::systems::effects::{ActiveTrails, EffectsState};
use crate::systems::orbit::{advance_all, BodyDesc, OrbitParams, OrbitingBody};

pub struct Simulation {
    config: SimConfig,
    params: OrbitParams,
    bodies: Vec<OrbitingBody>,
    effects: EffectsState,
    belt: AsteroidBelt,
    camera: FollowCamera,
    sun_rotation: f32,
    selected: Option<usize>,
    hovered: Option<usize>,
    scanning: bool,
    frame: u64,
}

impl Simulation {
    pub fn new(config: SimConfig, bodies: Vec<OrbitingBody>) -> Self {
        let config = config.sanitized();
        let effects = EffectsState::new(&config, &bodies);
        let belt = AsteroidBelt::from_config(&config);
        let camera = FollowCamera::new(config.camera_smoothing)
            .with_frame_rate_correction(config.camera_frame_rate_correction);

        log::info!(
            "simulation: {} bodies, {} flare slots, {} debris/body, {} belt rocks",
            bodies.len(),
            config.flare_capacity,
            config.debris_per_body,
            belt.len()
        );

        let mut sim = Self {
            params: OrbitParams::from_config(&config),
            bodies,
            effects,
            belt,
            camera,
            sun_rotation: 0.0,
            selected: None,
            hovered: None,
            scanning: false,
            frame: 0,
            config,
        };
        if let Some(idx) = sim.config.initial_selection {
            sim.select(Some(idx));
        }
        sim
    }

    pub fn from_descs(config: SimConfig, descs: &[BodyDesc]) -> Self {
        Self::new(config, descs.iter().map(OrbitingBody::from_desc).collect())
    }

    /// The eight built-in planets.
    pub fn with_default_catalog(config: SimConfig) -> Self {
        Self::from_descs(config, &catalog::default_bodies())
    }

    // -- Control input --

    pub fn apply_input(&mut self, event: InputEvent) {
        match event {
            InputEvent::Select { index } => {
                self.select(index);
            }
            InputEvent::Hover { index } => {
                self.set_hover(index);
            }
            InputEvent::Scanning { active } => self.set_scanning(active),
        }
    }

    /// Change the selected body. An out-of-range index is ignored and the
    /// previous selection kept. Returns whether the request was accepted.
    pub fn select(&mut self, index: Option<usize>) -> bool {
        if let Some(idx) = index {
            if idx >= self.bodies.len() {
                log::warn!("select: no body at index {idx} ({} bodies)", self.bodies.len());
                return false;
            }
        }
        if index == self.selected {
            return true;
        }
        for (i, body) in self.bodies.iter_mut().enumerate() {
            body.selected = Some(i) == index;
        }
        self.selected = index;
        match index.and_then(|i| self.bodies.get(i)) {
            Some(body) => log::info!("selected {}", body.name),
            None => log::info!("selection cleared"),
        }
        true
    }

    /// Same contract as [`Simulation::select`], for the hover highlight.
    pub fn set_hover(&mut self, index: Option<usize>) -> bool {
        if let Some(idx) = index {
            if idx >= self.bodies.len() {
                log::warn!("hover: no body at index {idx}");
                return false;
            }
        }
        for (i, body) in self.bodies.iter_mut().enumerate() {
            body.hovered = Some(i) == index;
        }
        self.hovered = index;
        true
    }

    pub fn set_scanning(&mut self, active: bool) {
        self.scanning = active;
    }

    fn active_trails(&self) -> ActiveTrails {
        match (self.config.debris_mode, self.selected) {
            (DebrisMode::All, _) => ActiveTrails::All,
            (DebrisMode::Selected, Some(idx)) => ActiveTrails::One(idx),
            (DebrisMode::Selected, None) => ActiveTrails::None,
        }
    }

    /// Advance one frame. A non-finite or non-positive `dt` skips the tick
    /// entirely and returns false.
    pub fn tick(&mut self, dt: f32) -> bool {
        if !dt.is_finite() || dt <= 0.0 {
            log::warn!("tick: ignoring delta {dt}");
            return false;
        }

        // 1. Kinematics
        advance_all(&mut self.bodies, &self.params, self.scanning);
        self.sun_rotation = wrap_angle(self.sun_rotation + self.config.sun_spin_rate * dt);
        self.belt.tick(dt);

        // 2. Emission
        let active = self.active_trails();
        self.effects.tick(dt, active);

        // 3. Batches
        self.effects.rebuild(&self.bodies, active);

        // 4. Camera
        if let Some(pos) = self.selected_position() {
            self.camera.follow(pos, dt);
        }

        self.frame += 1;
        true
    }

    // -- Accessors --

    pub fn config(&self) -> &SimConfig {
        &self.config
    }

    pub fn bodies(&self) -> &[OrbitingBody] {
        &self.bodies
    }

    pub fn body(&self, idx: usize) -> Option<&OrbitingBody> {
        self.bodies.get(idx)
    }

    pub fn body_index(&self, name: &str) -> Option<usize> {
        self.bodies.iter().position(|b| b.name == name)
    }

    pub fn selected(&self) -> Option<usize> {
        self.selected
    }

    pub fn selected_body(&self) -> Option<&OrbitingBody> {
        self.selected.and_then(|i| self.bodies.get(i))
    }

    pub fn selected_position(&self) -> Option<Vec3> {
        self.selected_body().map(OrbitingBody::world_position)
    }

    pub fn hovered(&self) -> Option<usize> {
        self.hovered
    }

    pub fn scanning(&self) -> bool {
        self.scanning
    }

    pub fn camera(&self) -> &FollowCamera {
        &self.camera
    }

    pub fn camera_target(&self) -> Vec3 {
        self.camera.target
    }

    pub fn effects(&self) -> &EffectsState {
        &self.effects
    }

    pub fn belt(&self) -> &AsteroidBelt {
        &self.belt
    }

    pub fn sun_rotation(&self) -> f32 {
        self.sun_rotation
    }

    /// Ticks completed so far.
    pub fn frame(&self) -> u64 {
        self.frame
    }
}
