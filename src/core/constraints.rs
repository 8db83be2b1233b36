//! Joint constraints between pairs of bodies.
//!
//! Constraints only hold parameters and body handles. Every update is a pure
//! function of the two bodies' current transforms and velocities, so the same
//! constraint can be re-run every step without carrying state between them.

use glam::Vec3;
use log::warn;
use serde::{Deserialize, Serialize};

use super::rigidbody::PhysicsBody;
use crate::{
    config::{DEFAULT_CONSTRAINT_BIAS, DEGENERATE_EPSILON},
    utils::{allocator::EntityId, math::euler_angles},
};

/// Keeps two body origins no further than `max_distance` apart, like a rope.
/// Nothing happens while the bodies are closer than that.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PositionConstraint {
    pub body_a: EntityId,
    pub body_b: EntityId,
    pub max_distance: f32,
    pub bias_factor: f32,
}

impl PositionConstraint {
    pub fn new(body_a: EntityId, body_b: EntityId, max_distance: f32) -> Self {
        Self {
            body_a,
            body_b,
            max_distance,
            bias_factor: DEFAULT_CONSTRAINT_BIAS,
        }
    }

    pub fn with_bias_factor(mut self, bias_factor: f32) -> Self {
        self.bias_factor = bias_factor;
        self
    }

    /// Applies one bias-stabilised impulse pair. Returns the impulse scalar
    /// when one was applied.
    pub fn update_constraint<A, B>(&self, body_a: &mut A, body_b: &mut B, dt: f32) -> Option<f32>
    where
        A: PhysicsBody + ?Sized,
        B: PhysicsBody + ?Sized,
    {
        if dt <= 0.0 {
            return None;
        }

        let relative_pos = body_a.transform().position - body_b.transform().position;
        let current_distance = relative_pos.length();
        if current_distance <= self.max_distance {
            return None;
        }

        let offset = self.max_distance - current_distance;
        let offset_dir = relative_pos / current_distance;

        let constraint_mass = body_a.inverse_mass() + body_b.inverse_mass();
        if constraint_mass <= 0.0 {
            return None;
        }

        let relative_vel = body_a.linear_velocity() - body_b.linear_velocity();
        let velocity_dot = relative_vel.dot(offset_dir);
        let bias = -(self.bias_factor / dt) * offset;
        let lambda = -(velocity_dot + bias) / constraint_mass;
        if !lambda.is_finite() {
            warn!(
                "position constraint {:?}-{:?} produced a non-finite impulse",
                self.body_a, self.body_b
            );
            return None;
        }

        body_a.apply_linear_impulse(offset_dir * lambda);
        body_b.apply_linear_impulse(-offset_dir * lambda);
        Some(lambda)
    }
}

/// Drives the relative Euler orientation of two bodies towards `axis`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct OrientationConstraint {
    pub body_a: EntityId,
    pub body_b: EntityId,
    /// Target direction of the relative orientation (normalised on creation).
    pub axis: Vec3,
    pub bias_factor: f32,
}

impl OrientationConstraint {
    pub fn new(body_a: EntityId, body_b: EntityId, axis: Vec3) -> Self {
        Self {
            body_a,
            body_b,
            axis: axis.normalize_or_zero(),
            bias_factor: DEFAULT_CONSTRAINT_BIAS,
        }
    }

    pub fn with_bias_factor(mut self, bias_factor: f32) -> Self {
        self.bias_factor = bias_factor;
        self
    }

    /// Applies one angular impulse pair. Returns the impulse scalar when one
    /// was applied; negative scalars are clamped to zero.
    pub fn update_constraint<A, B>(&self, body_a: &mut A, body_b: &mut B, dt: f32) -> Option<f32>
    where
        A: PhysicsBody + ?Sized,
        B: PhysicsBody + ?Sized,
    {
        if dt <= 0.0 {
            return None;
        }

        let relative = euler_angles(body_a.transform().orientation)
            - euler_angles(body_b.transform().orientation);
        let offset = 1.0 - relative.normalize_or_zero().dot(self.axis);
        if offset == 0.0 {
            return None;
        }

        let offset_dir = self.axis.cross(relative);
        if offset_dir.length_squared() <= DEGENERATE_EPSILON {
            return None;
        }
        let offset_dir = offset_dir.normalize();

        let constraint_mass = offset_dir.dot(body_a.inverse_inertia() * offset_dir)
            + offset_dir.dot(body_b.inverse_inertia() * offset_dir);
        if !(constraint_mass > 0.0) {
            return None;
        }

        let relative_ang_vel =
            (body_a.angular_velocity() - body_b.angular_velocity()).cross(self.axis);
        let ang_vel_dot = relative_ang_vel.dot(offset_dir);
        let bias = -(self.bias_factor / dt) * offset;
        let lambda = -(ang_vel_dot + bias) / constraint_mass;

        if lambda.is_nan() {
            warn!(
                "orientation constraint {:?}-{:?} produced a NaN impulse, skipping",
                self.body_a, self.body_b
            );
            return None;
        }
        let lambda = lambda.max(0.0);
        if lambda == 0.0 || !lambda.is_finite() {
            return None;
        }

        body_a.apply_angular_impulse(offset_dir * lambda);
        body_b.apply_angular_impulse(-offset_dir * lambda);
        Some(lambda)
    }
}

/// Constraint variants stored by the world.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum Constraint {
    Position(PositionConstraint),
    Orientation(OrientationConstraint),
}

impl Constraint {
    pub fn bodies(&self) -> (EntityId, EntityId) {
        match self {
            Constraint::Position(c) => (c.body_a, c.body_b),
            Constraint::Orientation(c) => (c.body_a, c.body_b),
        }
    }

    pub fn involves(&self, body: EntityId) -> bool {
        let (a, b) = self.bodies();
        a == body || b == body
    }

    pub fn update_constraint<A, B>(&self, body_a: &mut A, body_b: &mut B, dt: f32) -> Option<f32>
    where
        A: PhysicsBody + ?Sized,
        B: PhysicsBody + ?Sized,
    {
        match self {
            Constraint::Position(c) => c.update_constraint(body_a, body_b, dt),
            Constraint::Orientation(c) => c.update_constraint(body_a, body_b, dt),
        }
    }
}

impl From<PositionConstraint> for Constraint {
    fn from(value: PositionConstraint) -> Self {
        Constraint::Position(value)
    }
}

impl From<OrientationConstraint> for Constraint {
    fn from(value: OrientationConstraint) -> Self {
        Constraint::Orientation(value)
    }
}
