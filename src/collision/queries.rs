use glam::Vec3;
use serde::{Deserialize, Serialize};

use super::primitives::CapsuleParts;
use crate::{
    config::RAY_BOX_EPSILON,
    core::{
        rigidbody::Collidable,
        types::{Plane, Ray, Transform},
        volume::Volume,
    },
    utils::allocator::EntityId,
};

/// Where a ray met a volume.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RayHit {
    pub point: Vec3,
    /// Distance along the ray's unit direction.
    pub distance: f32,
}

/// Result of a ray cast against a body.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RayCollision {
    pub body: EntityId,
    pub point: Vec3,
    pub distance: f32,
}

/// World-level ray cast settings.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RaycastQuery {
    pub ray: Ray,
    /// Hits further than this are dropped.
    pub max_distance: f32,
    /// Keep only the nearest hit.
    pub closest_only: bool,
    /// Body never reported, typically the caster itself.
    pub ignore: Option<EntityId>,
}

impl RaycastQuery {
    pub fn new(ray: Ray) -> Self {
        Self {
            ray,
            max_distance: f32::INFINITY,
            closest_only: false,
            ignore: None,
        }
    }

    pub fn with_max_distance(mut self, max_distance: f32) -> Self {
        self.max_distance = max_distance;
        self
    }

    pub fn closest(mut self) -> Self {
        self.closest_only = true;
        self
    }

    pub fn ignoring(mut self, body: EntityId) -> Self {
        self.ignore = Some(body);
        self
    }
}

/// Per-volume ray tests plus the dispatcher over [`Volume`].
pub struct Raycast;

impl Raycast {
    /// Tests a ray against a body's volume. Bodies without a volume are
    /// never hit.
    pub fn test_ray<B>(ray: &Ray, body: &B) -> Option<RayCollision>
    where
        B: Collidable + ?Sized,
    {
        let volume = body.volume()?;
        Self::ray_intersect(ray, volume, body.transform()).map(|hit| RayCollision {
            body: body.id(),
            point: hit.point,
            distance: hit.distance,
        })
    }

    pub fn ray_intersect(ray: &Ray, volume: &Volume, transform: &Transform) -> Option<RayHit> {
        match volume {
            Volume::Aabb { half_extents } => Self::ray_aabb(ray, transform, *half_extents),
            Volume::Obb { half_extents } => Self::ray_obb(ray, transform, *half_extents),
            Volume::Sphere { radius } => Self::ray_sphere(ray, transform.position, *radius),
            Volume::Capsule {
                half_height,
                radius,
            } => Self::ray_capsule(ray, transform, *half_height, *radius),
        }
    }

    /// Slab test against an axis-aligned box. Rays starting inside the box
    /// report no hit.
    pub fn ray_box(ray: &Ray, center: Vec3, half_extents: Vec3) -> Option<RayHit> {
        let box_min = center - half_extents;
        let box_max = center + half_extents;
        let origin = ray.origin();
        let dir = ray.direction();

        let mut t_values = Vec3::splat(-1.0);
        for i in 0..3 {
            if dir[i] > 0.0 {
                t_values[i] = (box_min[i] - origin[i]) / dir[i];
            } else if dir[i] < 0.0 {
                t_values[i] = (box_max[i] - origin[i]) / dir[i];
            }
        }

        let best_t = t_values.max_element();
        if best_t < 0.0 {
            return None;
        }

        let point = ray.point_at(best_t);
        for i in 0..3 {
            if point[i] + RAY_BOX_EPSILON < box_min[i] || point[i] - RAY_BOX_EPSILON > box_max[i] {
                return None;
            }
        }

        Some(RayHit {
            point,
            distance: best_t,
        })
    }

    pub fn ray_aabb(ray: &Ray, transform: &Transform, half_extents: Vec3) -> Option<RayHit> {
        Self::ray_box(ray, transform.position, half_extents)
    }

    /// Runs the slab test in the box's local frame and maps the hit back.
    pub fn ray_obb(ray: &Ray, transform: &Transform, half_extents: Vec3) -> Option<RayHit> {
        let local_ray = Ray::new(
            transform.inverse_transform_point(ray.origin()),
            transform.orientation.conjugate() * ray.direction(),
        );
        let hit = Self::ray_box(&local_ray, Vec3::ZERO, half_extents)?;
        Some(RayHit {
            point: transform.transform_point(hit.point),
            distance: hit.distance,
        })
    }

    /// Nearest intersection in front of the origin. A ray starting inside
    /// the sphere hits where it leaves.
    pub fn ray_sphere(ray: &Ray, center: Vec3, radius: f32) -> Option<RayHit> {
        let to_center = center - ray.origin();
        let projection = to_center.dot(ray.direction());
        let inside = to_center.length_squared() < radius * radius;
        if projection < 0.0 && !inside {
            return None;
        }

        let closest = ray.point_at(projection);
        let center_distance = (closest - center).length();
        if center_distance > radius {
            return None;
        }

        let half_chord = (radius * radius - center_distance * center_distance).max(0.0).sqrt();
        let distance = if inside {
            projection + half_chord
        } else {
            projection - half_chord
        };
        Some(RayHit {
            point: ray.point_at(distance),
            distance,
        })
    }

    /// Tests the top cap, then the bottom cap, then the barrel, and returns
    /// the first part that is hit. A ray entering through the bottom cap can
    /// still report the top cap if it also crosses it.
    pub fn ray_capsule(
        ray: &Ray,
        transform: &Transform,
        half_height: f32,
        radius: f32,
    ) -> Option<RayHit> {
        let parts = CapsuleParts::new(transform, half_height, radius);

        Self::ray_sphere(ray, parts.top.position, parts.radius)
            .or_else(|| Self::ray_sphere(ray, parts.bottom.position, parts.radius))
            .or_else(|| Self::ray_obb(ray, &parts.barrel, parts.barrel_half_extents))
    }

    /// Ray against an infinite plane. Parallel rays and planes behind the
    /// origin give no hit.
    pub fn ray_plane(ray: &Ray, plane: &Plane) -> Option<RayHit> {
        let denominator = plane.normal.dot(ray.direction());
        if denominator == 0.0 {
            return None;
        }

        let distance = (plane.point_on_plane() - ray.origin()).dot(plane.normal) / denominator;
        if distance < 0.0 || !distance.is_finite() {
            return None;
        }

        Some(RayHit {
            point: ray.point_at(distance),
            distance,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::Quat;

    #[test]
    fn ray_box_rejects_misses_outside_tolerance() {
        let ray = Ray::new(Vec3::new(0.0, 1.5, -5.0), Vec3::Z);
        assert!(Raycast::ray_box(&ray, Vec3::ZERO, Vec3::ONE).is_none());
    }

    #[test]
    fn ray_box_accepts_grazing_edge() {
        let ray = Ray::new(Vec3::new(1.00005, 0.0, -5.0), Vec3::Z);
        let hit = Raycast::ray_box(&ray, Vec3::ZERO, Vec3::ONE).expect("edge within tolerance");
        assert!((hit.distance - 4.0).abs() < 1e-4);
    }

    #[test]
    fn ray_box_from_inside_reports_nothing() {
        let ray = Ray::new(Vec3::ZERO, Vec3::X);
        assert!(Raycast::ray_box(&ray, Vec3::ZERO, Vec3::ONE).is_none());
    }

    #[test]
    fn ray_obb_hits_rotated_face() {
        let transform = Transform::from_position_orientation(
            Vec3::new(0.0, 0.0, 5.0),
            Quat::from_rotation_y(45.0f32.to_radians()),
        );
        let ray = Ray::new(Vec3::ZERO, Vec3::Z);
        let hit = Raycast::ray_obb(&ray, &transform, Vec3::ONE).unwrap();
        // The rotated cube presents an edge at distance sqrt(2) from its centre.
        assert!((hit.distance - (5.0 - 2f32.sqrt())).abs() < 1e-4);
        assert!(hit.point.abs_diff_eq(Vec3::new(0.0, 0.0, hit.distance), 1e-4));
    }

    #[test]
    fn ray_sphere_behind_origin_misses() {
        let ray = Ray::new(Vec3::new(0.0, 0.0, 5.0), Vec3::Z);
        assert!(Raycast::ray_sphere(&ray, Vec3::ZERO, 1.0).is_none());
    }

    #[test]
    fn ray_sphere_from_inside_reports_exit() {
        let ray = Ray::new(Vec3::new(0.0, 0.0, -0.5), Vec3::Z);
        let hit = Raycast::ray_sphere(&ray, Vec3::ZERO, 1.0).unwrap();
        assert!((hit.distance - 1.5).abs() < 1e-5);
        assert!(hit.point.abs_diff_eq(Vec3::new(0.0, 0.0, 1.0), 1e-5));

        let leaving = Ray::new(Vec3::new(0.0, 0.0, 0.5), Vec3::Z);
        let hit = Raycast::ray_sphere(&leaving, Vec3::ZERO, 1.0).unwrap();
        assert!((hit.distance - 0.5).abs() < 1e-5);
    }

    #[test]
    fn ray_capsule_reports_top_cap_before_bottom() {
        let ray = Ray::new(Vec3::new(0.0, -5.0, 0.0), Vec3::Y);
        let hit = Raycast::ray_capsule(&ray, &Transform::default(), 1.0, 0.5).unwrap();
        assert!((hit.distance - 5.5).abs() < 1e-4);
        assert!(hit.point.abs_diff_eq(Vec3::new(0.0, 0.5, 0.0), 1e-4));
    }

    #[test]
    fn ray_capsule_falls_back_to_barrel() {
        let ray = Ray::new(Vec3::new(-5.0, 0.0, 0.0), Vec3::X);
        let hit = Raycast::ray_capsule(&ray, &Transform::default(), 1.0, 0.5).unwrap();
        assert!((hit.distance - 4.5).abs() < 1e-4);
        assert!(hit.point.abs_diff_eq(Vec3::new(-0.5, 0.0, 0.0), 1e-4));
    }

    #[test]
    fn ray_plane_hits_ground() {
        let ray = Ray::new(Vec3::new(0.0, 10.0, 0.0), Vec3::new(0.0, -1.0, 1.0));
        let plane = Plane::from_point_normal(Vec3::ZERO, Vec3::Y);
        let hit = Raycast::ray_plane(&ray, &plane).unwrap();
        assert!(hit.point.abs_diff_eq(Vec3::new(0.0, 0.0, 10.0), 1e-4));

        let away = Ray::new(Vec3::new(0.0, 10.0, 0.0), Vec3::Y);
        assert!(Raycast::ray_plane(&away, &plane).is_none());
    }
}
