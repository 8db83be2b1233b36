//! Collision detection: pairwise narrow phase, ray queries, and screen picking.

pub mod contact;
pub mod narrowphase;
pub mod primitives;
pub mod projection;
pub mod queries;
pub mod sat;

pub use contact::{CollisionInfo, ContactPoint};
pub use narrowphase::NarrowPhase;
pub use projection::{build_ray_from_screen_point, unproject};
pub use queries::{RayCollision, RayHit, Raycast, RaycastQuery};
pub use sat::SATAlgorithm;
