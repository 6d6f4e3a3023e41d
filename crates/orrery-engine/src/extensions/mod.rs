// extensions/mod.rs
//
// Small math helpers shared by the simulation systems.

pub mod smoothing;

pub use smoothing::{approach, approach_vec3, frame_rate_corrected, wrap_angle};
