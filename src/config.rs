//! Global configuration constants and world settings for the Rigid Contact engine.

use serde::{Deserialize, Serialize};

/// Default integration timestep (in seconds).
pub const DEFAULT_TIME_STEP: f32 = 1.0 / 60.0;

/// Baumgarte bias factor used by position and orientation constraints.
pub const DEFAULT_CONSTRAINT_BIAS: f32 = 0.01;

/// Tolerance applied when checking that a slab-test hit lies on the box.
pub const RAY_BOX_EPSILON: f32 = 1e-4;

/// Squared length below which a SAT cross-product axis is discarded.
pub const SAT_AXIS_EPSILON: f32 = 1e-6;

/// Squared length below which a direction is treated as degenerate.
pub const DEGENERATE_EPSILON: f32 = 1e-12;

/// Normalised device depth used for the near end of a picking ray.
pub const UNPROJECT_NEAR_DEPTH: f32 = -0.99999;

/// Normalised device depth used for the far end of a picking ray.
/// Exactly 1.0 sends the unprojected point towards infinity.
pub const UNPROJECT_FAR_DEPTH: f32 = 0.99999;

/// Default damping applied to linear velocity.
pub const DEFAULT_LINEAR_DAMPING: f32 = 0.0;

/// Default damping applied to angular velocity.
pub const DEFAULT_ANGULAR_DAMPING: f32 = 0.0;

/// Frame budget above which a world step logs a warning.
pub const DEFAULT_STEP_BUDGET_MS: f32 = 4.0;

/// Order in which the world visits constraints each step.
///
/// Sequential impulses are order dependent; shuffling stops the same
/// constraints from always "winning".
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum ConstraintOrder {
    #[default]
    Insertion,
    Shuffled,
}

/// Settings consumed by [`crate::world::CollisionWorld`].
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct WorldConfig {
    /// Fixed timestep used by the step accumulator.
    pub time_step: f32,
    /// Constraint visiting order.
    pub constraint_order: ConstraintOrder,
    /// Seed for the shuffle generator, so runs are reproducible.
    pub shuffle_seed: u64,
    pub linear_damping: f32,
    pub angular_damping: f32,
    /// Steps slower than this are reported through `log::warn!`.
    pub step_budget_ms: f32,
}

impl Default for WorldConfig {
    fn default() -> Self {
        Self {
            time_step: DEFAULT_TIME_STEP,
            constraint_order: ConstraintOrder::Insertion,
            shuffle_seed: 0,
            linear_damping: DEFAULT_LINEAR_DAMPING,
            angular_damping: DEFAULT_ANGULAR_DAMPING,
            step_budget_ms: DEFAULT_STEP_BUDGET_MS,
        }
    }
}

impl WorldConfig {
    /// Configuration that shuffles constraints with the given seed.
    pub fn shuffled(seed: u64) -> Self {
        Self {
            constraint_order: ConstraintOrder::Shuffled,
            shuffle_seed: seed,
            ..Default::default()
        }
    }

    pub fn with_time_step(mut self, time_step: f32) -> Self {
        self.time_step = time_step;
        self
    }

    pub fn with_damping(mut self, linear: f32, angular: f32) -> Self {
        self.linear_damping = linear;
        self.angular_damping = angular;
        self
    }

    pub fn with_constraint_order(mut self, order: ConstraintOrder) -> Self {
        self.constraint_order = order;
        self
    }

    /// Time step actually used: non-positive or non-finite values fall back
    /// to [`DEFAULT_TIME_STEP`].
    pub fn effective_time_step(&self) -> f32 {
        if self.time_step.is_finite() && self.time_step > 0.0 {
            self.time_step
        } else {
            DEFAULT_TIME_STEP
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn invalid_time_step_falls_back_to_default() {
        let config = WorldConfig::default().with_time_step(-1.0);
        assert_eq!(config.effective_time_step(), DEFAULT_TIME_STEP);

        let config = WorldConfig::default().with_time_step(f32::NAN);
        assert_eq!(config.effective_time_step(), DEFAULT_TIME_STEP);
    }

    #[test]
    fn shuffled_preset_keeps_other_defaults() {
        let config = WorldConfig::shuffled(7);
        assert_eq!(config.constraint_order, ConstraintOrder::Shuffled);
        assert_eq!(config.shuffle_seed, 7);
        assert_eq!(config.time_step, DEFAULT_TIME_STEP);
    }
}
