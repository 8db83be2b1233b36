use glam::{Quat, Vec3};

use super::{contact::ContactPoint, primitives::box_support};
use crate::{config::SAT_AXIS_EPSILON, core::types::Transform};

/// Oriented box as seen by the separating axis test.
#[derive(Debug, Clone, Copy)]
pub struct SatBox {
    pub center: Vec3,
    pub orientation: Quat,
    pub half_extents: Vec3,
}

impl SatBox {
    pub fn oriented(transform: &Transform, half_extents: Vec3) -> Self {
        Self {
            center: transform.position,
            orientation: transform.orientation,
            half_extents,
        }
    }

    /// Box that ignores the transform's orientation.
    pub fn axis_aligned(transform: &Transform, half_extents: Vec3) -> Self {
        Self {
            center: transform.position,
            orientation: Quat::IDENTITY,
            half_extents,
        }
    }

    fn axes(&self) -> [Vec3; 3] {
        [
            self.orientation * Vec3::X,
            self.orientation * Vec3::Y,
            self.orientation * Vec3::Z,
        ]
    }

    /// Half-length of the box's shadow on `axis`.
    fn projected_extent(axes: &[Vec3; 3], half_extents: Vec3, axis: Vec3) -> f32 {
        (axes[0] * half_extents.x).dot(axis).abs()
            + (axes[1] * half_extents.y).dot(axis).abs()
            + (axes[2] * half_extents.z).dot(axis).abs()
    }
}

/// Separating axis theorem for oriented box pairs.
pub struct SATAlgorithm;

impl SATAlgorithm {
    /// Up to 15 candidate axes: A's faces, B's faces, then every edge pair.
    /// Near-parallel edge pairs give no axis.
    pub fn candidate_axes(box_a: &SatBox, box_b: &SatBox) -> Vec<Vec3> {
        let axes_a = box_a.axes();
        let axes_b = box_b.axes();

        let mut axes = Vec::with_capacity(15);
        axes.extend_from_slice(&axes_a);
        axes.extend_from_slice(&axes_b);

        for axis_a in &axes_a {
            for axis_b in &axes_b {
                let axis = axis_a.cross(*axis_b);
                if axis.length_squared() > SAT_AXIS_EPSILON {
                    axes.push(axis.normalize());
                }
            }
        }
        axes
    }

    /// Returns the minimum-penetration contact, or `None` as soon as one axis
    /// separates the boxes. Ties keep the earlier axis.
    pub fn intersect_boxes(box_a: &SatBox, box_b: &SatBox) -> Option<ContactPoint> {
        let delta = box_b.center - box_a.center;
        let axes_a = box_a.axes();
        let axes_b = box_b.axes();

        let mut min_penetration = f32::MAX;
        let mut min_axis = Vec3::ZERO;

        for axis in Self::candidate_axes(box_a, box_b) {
            let combined = SatBox::projected_extent(&axes_a, box_a.half_extents, axis)
                + SatBox::projected_extent(&axes_b, box_b.half_extents, axis);
            let projection = delta.dot(axis);
            let distance = projection.abs();

            if distance > combined {
                return None;
            }

            let penetration = combined - distance;
            if penetration < min_penetration {
                min_penetration = penetration;
                min_axis = if projection < 0.0 { -axis } else { axis };
            }
        }

        let local_a = box_support(box_a.orientation, box_a.half_extents, min_axis);
        let local_b = box_support(box_b.orientation, box_b.half_extents, -min_axis);

        Some(ContactPoint::new(local_a, local_b, min_axis, min_penetration))
    }
}
