use glam::{Mat3, Vec3};
use serde::{Deserialize, Serialize};

use super::types::InertiaTensorExt;
use crate::{
    error::{CollisionError, Result},
    utils::math::inertia_capsule,
};

/// Enumeration of supported collision volumes.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum Volume {
    /// Axis-aligned box; the body's orientation is ignored.
    Aabb { half_extents: Vec3 },
    /// Box that follows the body's orientation.
    Obb { half_extents: Vec3 },
    Sphere { radius: f32 },
    /// Central segment along local +Y from `-half_height` to `+half_height`,
    /// swept by `radius`. The caps extend beyond `half_height`.
    Capsule { half_height: f32, radius: f32 },
}

/// Discriminant of [`Volume`], used to index the pair dispatch table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum VolumeKind {
    Aabb = 0,
    Obb = 1,
    Sphere = 2,
    Capsule = 3,
}

impl VolumeKind {
    pub const COUNT: usize = 4;
    pub const ALL: [VolumeKind; Self::COUNT] = [
        VolumeKind::Aabb,
        VolumeKind::Obb,
        VolumeKind::Sphere,
        VolumeKind::Capsule,
    ];

    pub fn index(self) -> usize {
        self as usize
    }
}

impl Volume {
    pub fn aabb(half_extents: Vec3) -> Self {
        Volume::Aabb { half_extents }
    }

    pub fn obb(half_extents: Vec3) -> Self {
        Volume::Obb { half_extents }
    }

    pub fn sphere(radius: f32) -> Self {
        Volume::Sphere { radius }
    }

    pub fn capsule(half_height: f32, radius: f32) -> Self {
        Volume::Capsule {
            half_height,
            radius,
        }
    }

    pub fn kind(&self) -> VolumeKind {
        match self {
            Volume::Aabb { .. } => VolumeKind::Aabb,
            Volume::Obb { .. } => VolumeKind::Obb,
            Volume::Sphere { .. } => VolumeKind::Sphere,
            Volume::Capsule { .. } => VolumeKind::Capsule,
        }
    }

    /// Checks that every dimension is finite and positive. A capsule may have
    /// a zero half-height, which makes it a sphere.
    pub fn validate(&self) -> Result<()> {
        fn positive(name: &str, value: f32) -> Result<()> {
            if value.is_finite() && value > 0.0 {
                Ok(())
            } else {
                Err(CollisionError::InvalidVolume(format!(
                    "{name} must be finite and positive, got {value}"
                )))
            }
        }

        match self {
            Volume::Aabb { half_extents } | Volume::Obb { half_extents } => {
                positive("half_extents.x", half_extents.x)?;
                positive("half_extents.y", half_extents.y)?;
                positive("half_extents.z", half_extents.z)
            }
            Volume::Sphere { radius } => positive("radius", *radius),
            Volume::Capsule {
                half_height,
                radius,
            } => {
                positive("radius", *radius)?;
                if half_height.is_finite() && *half_height >= 0.0 {
                    Ok(())
                } else {
                    Err(CollisionError::InvalidVolume(format!(
                        "half_height must be finite and non-negative, got {half_height}"
                    )))
                }
            }
        }
    }

    /// Body-space inertia tensor of a solid volume with the given mass.
    pub fn inertia(&self, mass: f32) -> Mat3 {
        match self {
            Volume::Aabb { half_extents } | Volume::Obb { half_extents } => {
                Mat3::for_solid_box(*half_extents, mass)
            }
            Volume::Sphere { radius } => Mat3::for_solid_sphere(*radius, mass),
            Volume::Capsule {
                half_height,
                radius,
            } => inertia_capsule(*radius, *half_height, mass),
        }
    }
}
