//! Geometric building blocks shared by the pair routines and ray queries.

use glam::{Quat, Vec3};

use super::contact::ContactPoint;
use crate::{config::DEGENERATE_EPSILON, core::types::Transform, utils::math::unit_or};

/// Closest point to `point` on the segment `a`..`b`.
pub fn closest_point_on_segment(a: Vec3, b: Vec3, point: Vec3) -> Vec3 {
    let ab = b - a;
    let length_sq = ab.dot(ab);
    if length_sq <= DEGENERATE_EPSILON {
        return a;
    }
    let t = ((point - a).dot(ab) / length_sq).clamp(0.0, 1.0);
    a + ab * t
}

/// Approximate closest points between segments `a0..a1` and `b0..b1`.
///
/// Picks the endpoint of A nearer to B, projects it onto B, then projects
/// that point back onto A. One pass, no Voronoi region analysis.
pub fn closest_points_between_segments(a0: Vec3, a1: Vec3, b0: Vec3, b1: Vec3) -> (Vec3, Vec3) {
    let d0 = (b0 - a0).length_squared();
    let d1 = (b1 - a0).length_squared();
    let d2 = (b0 - a1).length_squared();
    let d3 = (b1 - a1).length_squared();

    let start = if d2 < d0 || d2 < d1 || d3 < d0 || d3 < d1 {
        a1
    } else {
        a0
    };

    let on_b = closest_point_on_segment(b0, b1, start);
    let on_a = closest_point_on_segment(a0, a1, on_b);
    (on_a, on_b)
}

/// Sphere `a` against sphere `b`. Local points are measured from each centre.
/// Coincident centres push along `fallback`.
pub fn sphere_vs_sphere(
    center_a: Vec3,
    radius_a: f32,
    center_b: Vec3,
    radius_b: f32,
    fallback: Vec3,
) -> Option<ContactPoint> {
    let radii = radius_a + radius_b;
    let delta = center_b - center_a;
    let distance = delta.length();
    if distance >= radii {
        return None;
    }

    let normal = unit_or(delta, fallback);
    Some(ContactPoint::new(
        normal * radius_a,
        -normal * radius_b,
        normal,
        radii - distance,
    ))
}

/// Result of testing a sphere centre against a box in the box's frame.
#[derive(Debug, Clone, Copy)]
pub struct BoxSphereContact {
    /// Closest point on the box surface, box frame.
    pub closest: Vec3,
    /// Unit normal from box towards sphere, box frame.
    pub normal: Vec3,
    pub penetration: f32,
}

/// Sphere of `radius` centred at `local_center` (box frame) against a box.
///
/// When the centre lies inside the box the sphere is pushed out through the
/// nearest face.
pub fn box_vs_sphere(
    half_extents: Vec3,
    local_center: Vec3,
    radius: f32,
) -> Option<BoxSphereContact> {
    let closest = local_center.clamp(-half_extents, half_extents);
    let offset = local_center - closest;
    let distance_sq = offset.length_squared();

    if distance_sq > DEGENERATE_EPSILON {
        let distance = distance_sq.sqrt();
        if distance >= radius {
            return None;
        }
        return Some(BoxSphereContact {
            closest,
            normal: offset / distance,
            penetration: radius - distance,
        });
    }

    let face_gaps = half_extents - local_center.abs();
    let axis = if face_gaps.x <= face_gaps.y && face_gaps.x <= face_gaps.z {
        0
    } else if face_gaps.y <= face_gaps.z {
        1
    } else {
        2
    };

    let mut normal = Vec3::ZERO;
    normal[axis] = if local_center[axis] < 0.0 { -1.0 } else { 1.0 };
    let mut surface = local_center;
    surface[axis] = half_extents[axis] * normal[axis];

    Some(BoxSphereContact {
        closest: surface,
        normal,
        penetration: radius + face_gaps[axis],
    })
}

/// Box vertex farthest along `world_dir`, as an offset from the box centre.
/// Zero components of the direction select the positive side.
pub fn box_support(orientation: Quat, half_extents: Vec3, world_dir: Vec3) -> Vec3 {
    let local_dir = orientation.conjugate() * world_dir;
    let vertex = Vec3::new(
        if local_dir.x < 0.0 { -half_extents.x } else { half_extents.x },
        if local_dir.y < 0.0 { -half_extents.y } else { half_extents.y },
        if local_dir.z < 0.0 { -half_extents.z } else { half_extents.z },
    );
    orientation * vertex
}

/// Endpoints of a capsule's central segment in world space (bottom, top).
pub fn capsule_segment(transform: &Transform, half_height: f32) -> (Vec3, Vec3) {
    let offset = transform.up() * half_height;
    (transform.position - offset, transform.position + offset)
}

/// A capsule split into its two end spheres and the box around its barrel.
#[derive(Debug, Clone, Copy)]
pub struct CapsuleParts {
    pub top: Transform,
    pub bottom: Transform,
    pub barrel: Transform,
    pub radius: f32,
    pub barrel_half_extents: Vec3,
}

impl CapsuleParts {
    pub fn new(transform: &Transform, half_height: f32, radius: f32) -> Self {
        let (bottom, top) = capsule_segment(transform, half_height);
        Self {
            top: Transform::from_position_orientation(top, transform.orientation),
            bottom: Transform::from_position_orientation(bottom, transform.orientation),
            barrel: Transform::from_position_orientation(transform.position, transform.orientation),
            radius,
            barrel_half_extents: Vec3::new(radius, half_height, radius),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn segment_projection_clamps_to_endpoints() {
        let a = Vec3::ZERO;
        let b = Vec3::new(2.0, 0.0, 0.0);
        assert_eq!(closest_point_on_segment(a, b, Vec3::new(-5.0, 1.0, 0.0)), a);
        assert_eq!(closest_point_on_segment(a, b, Vec3::new(9.0, 1.0, 0.0)), b);
        assert_eq!(
            closest_point_on_segment(a, b, Vec3::new(1.5, 3.0, 0.0)),
            Vec3::new(1.5, 0.0, 0.0)
        );
        assert_eq!(closest_point_on_segment(a, a, Vec3::ONE), a);
    }

    #[test]
    fn crossing_segments_meet_near_the_crossing() {
        let (on_a, on_b) = closest_points_between_segments(
            Vec3::new(-1.0, 0.0, 0.0),
            Vec3::new(1.0, 0.0, 0.0),
            Vec3::new(0.0, -1.0, 0.5),
            Vec3::new(0.0, 1.0, 0.5),
        );
        assert!(on_a.abs_diff_eq(Vec3::ZERO, 1e-5));
        assert!(on_b.abs_diff_eq(Vec3::new(0.0, 0.0, 0.5), 1e-5));
    }

    #[test]
    fn sphere_centre_inside_box_exits_through_nearest_face() {
        let contact = box_vs_sphere(Vec3::ONE, Vec3::new(0.0, 0.8, 0.1), 0.5).unwrap();
        assert_eq!(contact.normal, Vec3::Y);
        assert!((contact.penetration - 0.7).abs() < 1e-5);
        assert_eq!(contact.closest, Vec3::new(0.0, 1.0, 0.1));
    }

    #[test]
    fn box_support_follows_orientation() {
        let rotation = Quat::from_rotation_z(std::f32::consts::FRAC_PI_2);
        let support = box_support(rotation, Vec3::new(2.0, 1.0, 1.0), Vec3::Y);
        // The long local X axis now points along world Y.
        assert!((support.y - 2.0).abs() < 1e-5);
    }
}
