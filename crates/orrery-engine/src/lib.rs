pub mod api;
pub mod core;
pub mod systems;
pub mod renderer;
pub mod bridge;
pub mod input;
pub mod extensions;
pub mod catalog;

// Re-export key types at crate root for convenience
pub use api::config::{DebrisMode, SimConfig};
pub use core::simulation::Simulation;
pub use core::time::FrameClock;
pub use renderer::instance::{BodyInstance, InstanceBatch, InstanceTransform};
pub use renderer::camera::FollowCamera;
pub use input::queue::{InputEvent, InputQueue};
pub use bridge::protocol::ProtocolLayout;
pub use systems::effects::{
    ActiveTrails, DebrisTrail, EffectsState, FlareEmitter, LifeGradient, Particle, ParticlePool, Rng,
};
pub use systems::orbit::{orbit_path, BodyDesc, OrbitParams, OrbitingBody};
pub use systems::belt::{AsteroidBelt, BeltShape};

// Small math helpers
pub use extensions::{approach, approach_vec3, frame_rate_corrected, wrap_angle};
