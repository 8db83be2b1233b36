//! Rigid Contact – narrow-phase collision, ray casting and joint constraints.
//!
//! Bodies carry a single collision [`Volume`] (sphere, AABB, OBB or capsule).
//! Any pair of volumes can be tested for overlap through [`NarrowPhase`],
//! which yields at most one contact with a normal pointing from the first
//! body to the second. Rays are tested against the same volumes, and
//! distance/orientation constraints are resolved with bias-stabilised
//! impulses. [`CollisionWorld`] owns the bodies and constraints and hands out
//! generational [`EntityId`] handles.

pub mod collision;
pub mod config;
pub mod core;
pub mod dynamics;
pub mod error;
pub mod utils;
pub mod world;

pub use glam::{Mat3, Mat4, Quat, Vec2, Vec3};

pub use collision::{
    contact::{CollisionInfo, ContactPoint},
    narrowphase::NarrowPhase,
    projection::build_ray_from_screen_point,
    queries::{RayCollision, RayHit, Raycast, RaycastQuery},
};
pub use config::{ConstraintOrder, WorldConfig};
pub use crate::core::{
    camera::Camera,
    constraints::{Constraint, OrientationConstraint, PositionConstraint},
    rigidbody::{Collidable, PhysicsBody, RigidBody},
    types::{Plane, Ray, Transform, Velocity},
    volume::{Volume, VolumeKind},
};
pub use dynamics::{integrator::Integrator, solver::ConstraintSolver};
pub use error::{CollisionError, Result};
pub use utils::allocator::{Arena, EntityId};
pub use world::CollisionWorld;
