use crate::utils::{allocator::EntityId, math::world_inverse_inertia};

use super::{
    types::{Transform, Velocity},
    volume::Volume,
};
use glam::{Mat3, Vec3};

/// Read access needed by the narrow phase and ray queries.
pub trait Collidable {
    fn id(&self) -> EntityId;
    fn transform(&self) -> &Transform;
    /// `None` means the body takes no part in collision queries.
    fn volume(&self) -> Option<&Volume>;
}

/// Dynamics capability consumed by constraints.
///
/// An inverse mass of zero marks an immovable body; impulses applied to it
/// must have no effect.
pub trait PhysicsBody {
    fn transform(&self) -> &Transform;
    fn inverse_mass(&self) -> f32;
    /// World-space inverse inertia tensor.
    fn inverse_inertia(&self) -> Mat3;
    fn linear_velocity(&self) -> Vec3;
    fn angular_velocity(&self) -> Vec3;
    fn apply_linear_impulse(&mut self, impulse: Vec3);
    fn apply_angular_impulse(&mut self, impulse: Vec3);
    fn add_force(&mut self, force: Vec3);
    fn add_force_at_position(&mut self, force: Vec3, position: Vec3);
}

/// Core rigid body description storing kinematic state and its volume.
#[derive(Debug, Clone)]
pub struct RigidBody {
    pub id: EntityId,
    pub transform: Transform,
    pub volume: Option<Volume>,
    pub velocity: Velocity,
    pub force: Vec3,
    pub torque: Vec3,
    inverse_mass: f32,
    /// Body-space inverse inertia.
    inverse_inertia_local: Mat3,
}

impl Default for RigidBody {
    fn default() -> Self {
        Self {
            id: EntityId::default(),
            transform: Transform::default(),
            volume: None,
            velocity: Velocity::default(),
            force: Vec3::ZERO,
            torque: Vec3::ZERO,
            inverse_mass: 1.0,
            inverse_inertia_local: Mat3::IDENTITY,
        }
    }
}

impl RigidBody {
    pub fn new(id: EntityId) -> Self {
        Self {
            id,
            ..Self::default()
        }
    }

    pub fn with_transform(mut self, transform: Transform) -> Self {
        self.transform = transform;
        self
    }

    pub fn with_position(mut self, position: Vec3) -> Self {
        self.transform.position = position;
        self
    }

    pub fn with_volume(mut self, volume: Volume) -> Self {
        self.volume = Some(volume);
        self
    }

    /// Sets the mass and, when a volume is attached, its solid inertia.
    /// A mass of zero (or below) makes the body immovable.
    pub fn with_mass(mut self, mass: f32) -> Self {
        self.set_mass(mass);
        self
    }

    pub fn immovable(mut self) -> Self {
        self.set_mass(0.0);
        self
    }

    pub fn set_mass(&mut self, mass: f32) {
        if !(mass.is_finite() && mass > f32::EPSILON) {
            self.inverse_mass = 0.0;
            self.inverse_inertia_local = Mat3::ZERO;
            return;
        }

        self.inverse_mass = 1.0 / mass;
        self.inverse_inertia_local = match self.volume {
            Some(volume) => {
                let inertia = volume.inertia(mass);
                if inertia.determinant().abs() < f32::EPSILON {
                    Mat3::IDENTITY
                } else {
                    inertia.inverse()
                }
            }
            None => Mat3::IDENTITY * self.inverse_mass,
        };
    }

    pub fn is_immovable(&self) -> bool {
        self.inverse_mass == 0.0
    }

    pub fn set_velocity(&mut self, linear: Vec3, angular: Vec3) {
        self.velocity.linear = linear;
        self.velocity.angular = angular;
    }

    /// Kinetic energy of the body's linear motion.
    pub fn linear_kinetic_energy(&self) -> f32 {
        if self.is_immovable() {
            return 0.0;
        }
        0.5 * self.velocity.linear.length_squared() / self.inverse_mass
    }

    pub fn clear_accumulators(&mut self) {
        self.force = Vec3::ZERO;
        self.torque = Vec3::ZERO;
    }
}

impl Collidable for RigidBody {
    fn id(&self) -> EntityId {
        self.id
    }

    fn transform(&self) -> &Transform {
        &self.transform
    }

    fn volume(&self) -> Option<&Volume> {
        self.volume.as_ref()
    }
}

impl PhysicsBody for RigidBody {
    fn transform(&self) -> &Transform {
        &self.transform
    }

    fn inverse_mass(&self) -> f32 {
        self.inverse_mass
    }

    fn inverse_inertia(&self) -> Mat3 {
        world_inverse_inertia(self.inverse_inertia_local, self.transform.orientation)
    }

    fn linear_velocity(&self) -> Vec3 {
        self.velocity.linear
    }

    fn angular_velocity(&self) -> Vec3 {
        self.velocity.angular
    }

    fn apply_linear_impulse(&mut self, impulse: Vec3) {
        self.velocity.linear += impulse * self.inverse_mass;
    }

    fn apply_angular_impulse(&mut self, impulse: Vec3) {
        self.velocity.angular += PhysicsBody::inverse_inertia(self) * impulse;
    }

    fn add_force(&mut self, force: Vec3) {
        self.force += force;
    }

    fn add_force_at_position(&mut self, force: Vec3, position: Vec3) {
        let arm = position - self.transform.position;
        self.force += force;
        self.torque += arm.cross(force);
    }
}
