use glam::{Mat4, Vec3};
use serde::{Deserialize, Serialize};

/// Camera parameters needed to turn screen points into picking rays.
/// Angles are in degrees; yaw turns about +Y, pitch about +X.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Camera {
    pub position: Vec3,
    pub pitch: f32,
    pub yaw: f32,
    pub near_plane: f32,
    pub far_plane: f32,
    /// Vertical field of view.
    pub fov: f32,
}

impl Default for Camera {
    fn default() -> Self {
        Self {
            position: Vec3::ZERO,
            pitch: 0.0,
            yaw: 0.0,
            near_plane: 0.1,
            far_plane: 500.0,
            fov: 45.0,
        }
    }
}

impl Camera {
    pub fn new(position: Vec3, pitch: f32, yaw: f32) -> Self {
        Self {
            position,
            pitch,
            yaw,
            ..Self::default()
        }
    }

    pub fn with_planes(mut self, near_plane: f32, far_plane: f32) -> Self {
        self.near_plane = near_plane;
        self.far_plane = far_plane;
        self
    }

    /// World-to-view matrix.
    pub fn build_view_matrix(&self) -> Mat4 {
        Mat4::from_rotation_x(-self.pitch.to_radians())
            * Mat4::from_rotation_y(-self.yaw.to_radians())
            * Mat4::from_translation(-self.position)
    }

    /// OpenGL-style perspective projection (clip depth in [-1, 1]).
    pub fn build_projection_matrix(&self, aspect: f32) -> Mat4 {
        Mat4::perspective_rh_gl(self.fov.to_radians(), aspect, self.near_plane, self.far_plane)
    }
}
