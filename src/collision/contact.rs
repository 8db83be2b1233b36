use glam::Vec3;
use serde::{Deserialize, Serialize};

use crate::utils::allocator::EntityId;

/// The single contact produced for an overlapping pair.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ContactPoint {
    /// Contact offset from body A's origin, in world orientation.
    pub local_a: Vec3,
    /// Contact offset from body B's origin, in world orientation.
    pub local_b: Vec3,
    /// Unit normal pointing from A towards B.
    pub normal: Vec3,
    /// Overlap depth along `normal`, never negative.
    pub penetration: f32,
}

impl ContactPoint {
    pub fn new(local_a: Vec3, local_b: Vec3, normal: Vec3, penetration: f32) -> Self {
        Self {
            local_a,
            local_b,
            normal,
            penetration: penetration.max(0.0),
        }
    }

    /// The same contact seen from B's side.
    pub fn swapped(self) -> Self {
        Self {
            local_a: self.local_b,
            local_b: self.local_a,
            normal: -self.normal,
            penetration: self.penetration,
        }
    }
}

/// Narrow-phase result for a body pair.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CollisionInfo {
    pub a: EntityId,
    pub b: EntityId,
    pub point: ContactPoint,
}

impl CollisionInfo {
    pub fn swapped(self) -> Self {
        Self {
            a: self.b,
            b: self.a,
            point: self.point.swapped(),
        }
    }
}
