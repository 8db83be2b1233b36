use glam::Vec3;

use crate::{
    config::WorldConfig,
    core::rigidbody::{PhysicsBody, RigidBody},
    utils::{allocator::Arena, math::angular_velocity_to_quat},
};

/// Semi-implicit Euler integrator: velocities first, then positions.
#[derive(Debug, Clone, Copy)]
pub struct Integrator {
    pub linear_damping: f32,
    pub angular_damping: f32,
}

impl Default for Integrator {
    fn default() -> Self {
        Self::from_config(&WorldConfig::default())
    }
}

impl Integrator {
    pub fn new(linear_damping: f32, angular_damping: f32) -> Self {
        Self {
            linear_damping: linear_damping.max(0.0),
            angular_damping: angular_damping.max(0.0),
        }
    }

    pub fn from_config(config: &WorldConfig) -> Self {
        Self::new(config.linear_damping, config.angular_damping)
    }

    /// Applies accumulated force and torque, then damping, and clears the
    /// accumulators.
    pub fn integrate_velocity(&self, body: &mut RigidBody, dt: f32) {
        if body.is_immovable() {
            body.clear_accumulators();
            return;
        }

        let inverse_mass = PhysicsBody::inverse_mass(&*body);
        let inverse_inertia = PhysicsBody::inverse_inertia(&*body);

        body.velocity.linear += body.force * inverse_mass * dt;
        body.velocity.angular += inverse_inertia * body.torque * dt;

        body.velocity.linear *= (1.0 - self.linear_damping * dt).max(0.0);
        body.velocity.angular *= (1.0 - self.angular_damping * dt).max(0.0);

        body.clear_accumulators();
    }

    pub fn integrate_position(&self, body: &mut RigidBody, dt: f32) {
        if body.is_immovable() {
            return;
        }

        body.transform.position += body.velocity.linear * dt;

        if body.velocity.angular != Vec3::ZERO {
            let delta = angular_velocity_to_quat(body.velocity.angular, dt);
            body.transform.orientation = (delta * body.transform.orientation).normalize();
        }
    }

    pub fn step(&self, bodies: &mut Arena<RigidBody>, dt: f32) {
        for (_, body) in bodies.iter_mut() {
            self.integrate_velocity(body, dt);
            self.integrate_position(body, dt);
        }
    }
}
