//! Core types: transforms, volumes, bodies, constraints, and the camera.

pub mod camera;
pub mod constraints;
pub mod rigidbody;
pub mod types;
pub mod volume;

pub use camera::Camera;
pub use constraints::{Constraint, OrientationConstraint, PositionConstraint};
pub use rigidbody::{Collidable, PhysicsBody, RigidBody};
pub use types::{InertiaTensorExt, Plane, Ray, Transform, Velocity};
pub use volume::{Volume, VolumeKind};
