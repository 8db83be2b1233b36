use glam::{Mat3, Quat, Vec3};
use serde::{Deserialize, Serialize};

use crate::error::{CollisionError, Result};

/// Position, orientation, and non-uniform scale of a body.
///
/// Collision volumes carry their own dimensions; `scale` is kept for
/// collaborators that render or author the body and is not applied to them.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Transform {
    pub position: Vec3,
    pub orientation: Quat,
    pub scale: Vec3,
}

impl Default for Transform {
    fn default() -> Self {
        Self {
            position: Vec3::ZERO,
            orientation: Quat::IDENTITY,
            scale: Vec3::ONE,
        }
    }
}

impl Transform {
    pub fn from_position(position: Vec3) -> Self {
        Self {
            position,
            ..Self::default()
        }
    }

    pub fn from_position_orientation(position: Vec3, orientation: Quat) -> Self {
        Self {
            position,
            orientation,
            ..Self::default()
        }
    }

    /// Local +Y axis in world space.
    pub fn up(&self) -> Vec3 {
        self.orientation * Vec3::Y
    }

    /// Expresses a world-space point in this transform's unscaled local frame.
    pub fn inverse_transform_point(&self, point: Vec3) -> Vec3 {
        self.orientation.conjugate() * (point - self.position)
    }

    /// Maps an unscaled local-frame point to world space.
    pub fn transform_point(&self, point: Vec3) -> Vec3 {
        self.orientation * point + self.position
    }
}

/// Linear and angular velocity of a rigid body.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Velocity {
    pub linear: Vec3,
    pub angular: Vec3,
}

/// Half-line used for picking and visibility queries.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Ray {
    origin: Vec3,
    direction: Vec3,
}

impl Ray {
    /// Creates a ray, normalising `direction`. A degenerate direction yields
    /// a ray pointing down -Z; use [`Ray::try_new`] to reject it instead.
    pub fn new(origin: Vec3, direction: Vec3) -> Self {
        Self::try_new(origin, direction).unwrap_or(Self {
            origin,
            direction: Vec3::NEG_Z,
        })
    }

    pub fn try_new(origin: Vec3, direction: Vec3) -> Result<Self> {
        let direction = direction.try_normalize().ok_or_else(|| {
            CollisionError::InvalidRay(format!("direction {direction} cannot be normalised"))
        })?;
        Ok(Self { origin, direction })
    }

    pub fn origin(&self) -> Vec3 {
        self.origin
    }

    pub fn direction(&self) -> Vec3 {
        self.direction
    }

    pub fn point_at(&self, distance: f32) -> Vec3 {
        self.origin + self.direction * distance
    }
}

/// Infinite plane `dot(normal, p) = distance`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Plane {
    pub normal: Vec3,
    pub distance: f32,
}

impl Plane {
    pub fn from_point_normal(point: Vec3, normal: Vec3) -> Self {
        let normal = normal.normalize_or_zero();
        Self {
            normal,
            distance: normal.dot(point),
        }
    }

    pub fn point_on_plane(&self) -> Vec3 {
        self.normal * self.distance
    }
}

/// Helper methods for inertia calculations.
pub trait InertiaTensorExt {
    fn for_solid_box(half_extents: Vec3, mass: f32) -> Mat3;
    fn for_solid_sphere(radius: f32, mass: f32) -> Mat3;
}

impl InertiaTensorExt for Mat3 {
    fn for_solid_box(half_extents: Vec3, mass: f32) -> Mat3 {
        let size = half_extents * 2.0;
        let squared = size * size;
        let factor = mass / 12.0;
        Mat3::from_diagonal(Vec3::new(
            factor * (squared.y + squared.z),
            factor * (squared.x + squared.z),
            factor * (squared.x + squared.y),
        ))
    }

    fn for_solid_sphere(radius: f32, mass: f32) -> Mat3 {
        Mat3::from_diagonal(Vec3::splat(0.4 * mass * radius * radius))
    }
}
