//! Screen-space to world-space helpers for picking.

use glam::{Mat4, Vec2, Vec3, Vec4};

use crate::{
    config::{UNPROJECT_FAR_DEPTH, UNPROJECT_NEAR_DEPTH},
    core::{camera::Camera, types::Ray},
};

/// View-to-world matrix, built from the camera's parts rather than by
/// inverting [`Camera::build_view_matrix`].
pub fn generate_inverse_view(camera: &Camera) -> Mat4 {
    Mat4::from_translation(camera.position)
        * Mat4::from_rotation_y(camera.yaw.to_radians())
        * Mat4::from_rotation_x(camera.pitch.to_radians())
}

/// Clip-to-view matrix for the OpenGL-style perspective used by
/// [`Camera::build_projection_matrix`].
pub fn generate_inverse_projection(aspect: f32, fov: f32, near_plane: f32, far_plane: f32) -> Mat4 {
    let h = 1.0 / (fov.to_radians() * 0.5).tan();
    let x_scale = h / aspect;
    let depth_scale = (far_plane + near_plane) / (near_plane - far_plane);
    let depth_offset = (2.0 * far_plane * near_plane) / (near_plane - far_plane);

    Mat4::from_cols(
        Vec4::new(1.0 / x_scale, 0.0, 0.0, 0.0),
        Vec4::new(0.0, 1.0 / h, 0.0, 0.0),
        Vec4::new(0.0, 0.0, 0.0, 1.0 / depth_offset),
        Vec4::new(0.0, 0.0, -1.0, depth_scale / depth_offset),
    )
}

/// Maps `screen` (pixels from the bottom-left, z as normalised depth) back
/// into world space.
pub fn unproject(screen: Vec3, camera: &Camera, viewport: Vec2) -> Vec3 {
    let aspect = viewport.x / viewport.y;
    let inverse_view_projection = generate_inverse_view(camera)
        * generate_inverse_projection(aspect, camera.fov, camera.near_plane, camera.far_plane);

    let clip = Vec4::new(
        (screen.x / viewport.x) * 2.0 - 1.0,
        (screen.y / viewport.y) * 2.0 - 1.0,
        screen.z,
        1.0,
    );

    let world = inverse_view_projection * clip;
    world.truncate() / world.w
}

/// Builds a picking ray through a screen point given with y measured from
/// the top of the viewport. The ray starts at the camera.
pub fn build_ray_from_screen_point(screen: Vec2, camera: &Camera, viewport: Vec2) -> Ray {
    let flipped_y = viewport.y - screen.y;

    let near = unproject(Vec3::new(screen.x, flipped_y, UNPROJECT_NEAR_DEPTH), camera, viewport);
    let far = unproject(Vec3::new(screen.x, flipped_y, UNPROJECT_FAR_DEPTH), camera, viewport);

    Ray::new(camera.position, far - near)
}
