//! Additional math helpers layered on top of `glam`.

use glam::{EulerRot, Mat3, Quat, Vec3};

use crate::config::DEGENERATE_EPSILON;

/// Converts angular velocity vector (radians/sec) into a quaternion delta.
pub fn angular_velocity_to_quat(angular: Vec3, dt: f32) -> Quat {
    let angle = angular.length() * dt;
    if angle.abs() < 1e-6 {
        return Quat::IDENTITY;
    }
    Quat::from_axis_angle(angular.normalize(), angle)
}

/// Normalises `v`, or returns `fallback` when `v` has no usable direction.
pub fn unit_or(v: Vec3, fallback: Vec3) -> Vec3 {
    let length_sq = v.length_squared();
    if length_sq > DEGENERATE_EPSILON && length_sq.is_finite() {
        v / length_sq.sqrt()
    } else {
        fallback
    }
}

/// XYZ Euler angles (radians) of an orientation, packed into a vector.
pub fn euler_angles(orientation: Quat) -> Vec3 {
    let (x, y, z) = orientation.to_euler(EulerRot::XYZ);
    Vec3::new(x, y, z)
}

/// Rotates a body-space inverse inertia tensor into world space.
pub fn world_inverse_inertia(local_inverse: Mat3, orientation: Quat) -> Mat3 {
    let rotation = Mat3::from_quat(orientation);
    rotation * local_inverse * rotation.transpose()
}

/// Builds an inertia tensor for a solid capsule aligned along Y.
/// `half_height` is the cap-exclusive half length of the cylinder part.
pub fn inertia_capsule(radius: f32, half_height: f32, mass: f32) -> Mat3 {
    let height = half_height * 2.0;
    let cylinder_volume = radius * radius * height;
    let caps_volume = (4.0 / 3.0) * radius * radius * radius;
    let total = (cylinder_volume + caps_volume).max(f32::EPSILON);
    let cylinder_mass = mass * cylinder_volume / total;
    let hemisphere_mass = (mass - cylinder_mass) * 0.5;

    let cylinder_axial = 0.5 * cylinder_mass * radius * radius;
    let cylinder_lateral = (1.0 / 12.0) * cylinder_mass * (3.0 * radius * radius + height * height);

    // Hemisphere about its own centroid, shifted to the capsule centre.
    let hemi_axial = 0.4 * hemisphere_mass * radius * radius;
    let centroid = half_height + 0.375 * radius;
    let hemi_lateral = hemisphere_mass * (0.259_375 * radius * radius + centroid * centroid);

    Mat3::from_diagonal(Vec3::new(
        cylinder_lateral + 2.0 * hemi_lateral,
        cylinder_axial + 2.0 * hemi_axial,
        cylinder_lateral + 2.0 * hemi_lateral,
    ))
}
