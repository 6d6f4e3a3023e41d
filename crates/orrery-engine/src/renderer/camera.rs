use glam::Vec3;

use crate::extensions::{approach_vec3, frame_rate_corrected};

/// Look-at point that chases the selected body.
/// The eye is left to the presentation layer; only the target is simulated.
#[derive(Debug, Clone, PartialEq)]
pub struct FollowCamera {
    /// Where the camera currently looks.
    pub target: Vec3,
    /// Fraction of the remaining distance covered per tick (0 = frozen, 1 = snap).
    pub smoothing: f32,
    /// Rescale `smoothing` by frame time instead of applying it per tick.
    pub frame_rate_correction: bool,
}

impl Default for FollowCamera {
    fn default() -> Self {
        Self::new(0.1)
    }
}

impl FollowCamera {
    pub fn new(smoothing: f32) -> Self {
        Self {
            target: Vec3::ZERO,
            smoothing: smoothing.clamp(0.0, 1.0),
            frame_rate_correction: false,
        }
    }

    pub fn with_frame_rate_correction(mut self, enabled: bool) -> Self {
        self.frame_rate_correction = enabled;
        self
    }

    pub fn with_target(mut self, target: Vec3) -> Self {
        self.target = target;
        self
    }

    /// Factor applied this tick.
    pub fn step_factor(&self, dt: f32) -> f32 {
        if self.frame_rate_correction {
            frame_rate_corrected(self.smoothing, dt)
        } else {
            self.smoothing
        }
    }

    /// Move the target toward `selected` by one smoothing step.
    /// A new `selected` mid-transition simply becomes the new goal.
    pub fn follow(&mut self, selected: Vec3, dt: f32) {
        self.target = approach_vec3(self.target, selected, self.step_factor(dt));
    }

    pub fn distance_to(&self, point: Vec3) -> f32 {
        (point - self.target).length()
    }
}
