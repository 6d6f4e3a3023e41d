// extensions/smoothing.rs
//
// Interpolation and exponential-smoothing helpers.
// No dependencies on the simulation, just math.

use glam::Vec3;
use std::f32::consts::TAU;

/// One exponential-smoothing step: `x += (target - x) * k`.
/// For `k` in (0, 1) this never overshoots and never exactly arrives.
#[inline]
pub fn approach(current: f32, target: f32, k: f32) -> f32 {
    current + (target - current) * k
}

/// Vector form of [`approach`].
#[inline]
pub fn approach_vec3(current: Vec3, target: Vec3, k: f32) -> Vec3 {
    current + (target - current) * k
}

/// Convert a per-frame factor tuned at 60 fps into the factor that gives the
/// same convergence over `dt` seconds: `1 - (1 - k)^(dt * 60)`.
#[inline]
pub fn frame_rate_corrected(k: f32, dt: f32) -> f32 {
    1.0 - (1.0 - k.clamp(0.0, 1.0)).powf(dt * 60.0)
}

/// Wrap an accumulated angle into [0, 2π).
#[inline]
pub fn wrap_angle(angle: f32) -> f32 {
    let wrapped = angle.rem_euclid(TAU);
    // rem_euclid can round up to exactly TAU for tiny negative inputs
    if wrapped >= TAU { 0.0 } else { wrapped }
}
