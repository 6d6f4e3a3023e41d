pub mod instance;
pub mod camera;

// Re-export key types for convenient access
pub use instance::{BodyInstance, InstanceBatch, InstanceTransform};
pub use camera::FollowCamera;
