use log::trace;
use rand::{rngs::StdRng, seq::SliceRandom, SeedableRng};

use crate::{
    config::{ConstraintOrder, WorldConfig},
    core::{constraints::Constraint, rigidbody::RigidBody},
    utils::allocator::{Arena, EntityId},
};

/// Per-pass counters, mostly useful in tests and logs.
#[derive(Debug, Default, Clone, Copy, PartialEq)]
pub struct SolverStepMetrics {
    pub constraints_visited: usize,
    pub impulses_applied: usize,
    pub constraints_skipped: usize,
    pub impulse_sum: f32,
}

/// Sequential-impulse pass over the world's constraints.
///
/// Each constraint is visited once per call; its bodies are borrowed from
/// the arena together.
#[derive(Debug, Clone)]
pub struct ConstraintSolver {
    order: ConstraintOrder,
    rng: StdRng,
}

impl ConstraintSolver {
    pub fn new(order: ConstraintOrder, seed: u64) -> Self {
        Self {
            order,
            rng: StdRng::seed_from_u64(seed),
        }
    }

    pub fn from_config(config: &WorldConfig) -> Self {
        Self::new(config.constraint_order, config.shuffle_seed)
    }

    /// Constraint ids in the order the next pass will visit them.
    fn visit_order(&mut self, constraints: &Arena<Constraint>) -> Vec<EntityId> {
        let mut ids = constraints.ids();
        if self.order == ConstraintOrder::Shuffled {
            ids.shuffle(&mut self.rng);
        }
        ids
    }

    pub fn solve(
        &mut self,
        bodies: &mut Arena<RigidBody>,
        constraints: &Arena<Constraint>,
        dt: f32,
    ) -> SolverStepMetrics {
        let mut metrics = SolverStepMetrics::default();

        for id in self.visit_order(constraints) {
            let Some(constraint) = constraints.get(id) else {
                continue;
            };
            metrics.constraints_visited += 1;

            let (body_a, body_b) = constraint.bodies();
            let Some((a, b)) = bodies.get2_mut(body_a, body_b) else {
                trace!("constraint {id:?} skipped: body missing");
                metrics.constraints_skipped += 1;
                continue;
            };

            if let Some(lambda) = constraint.update_constraint(a, b, dt) {
                metrics.impulses_applied += 1;
                metrics.impulse_sum += lambda.abs();
            }
        }

        metrics
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::constraints::PositionConstraint;
    use glam::Vec3;

    fn stretched_pair(bodies: &mut Arena<RigidBody>) -> (EntityId, EntityId) {
        let a = bodies.insert(RigidBody::default());
        let b = bodies.insert(RigidBody::default().with_position(Vec3::new(15.0, 0.0, 0.0)));
        (a, b)
    }

    #[test]
    fn solves_each_constraint_once() {
        let mut bodies = Arena::new();
        let (a, b) = stretched_pair(&mut bodies);
        let mut constraints = Arena::new();
        constraints.insert(Constraint::from(PositionConstraint::new(a, b, 10.0)));

        let metrics = ConstraintSolver::new(ConstraintOrder::Insertion, 0).solve(
            &mut bodies,
            &constraints,
            1.0 / 60.0,
        );
        assert_eq!(metrics.constraints_visited, 1);
        assert_eq!(metrics.impulses_applied, 1);

        let va = bodies.get(a).unwrap().velocity.linear;
        let vb = bodies.get(b).unwrap().velocity.linear;
        assert!(va.x > 0.0 && vb.x < 0.0);
    }

    #[test]
    fn missing_bodies_are_skipped() {
        let mut bodies = Arena::new();
        let (a, b) = stretched_pair(&mut bodies);
        let mut constraints = Arena::new();
        constraints.insert(Constraint::from(PositionConstraint::new(a, b, 10.0)));
        bodies.remove(b);

        let metrics = ConstraintSolver::new(ConstraintOrder::Insertion, 0).solve(
            &mut bodies,
            &constraints,
            1.0 / 60.0,
        );
        assert_eq!(metrics.constraints_skipped, 1);
        assert_eq!(metrics.impulses_applied, 0);
    }

    #[test]
    fn shuffled_order_is_reproducible_for_a_seed() {
        let mut constraints = Arena::new();
        for i in 0..16 {
            let a = EntityId::from_index(i);
            let b = EntityId::from_index(i + 100);
            constraints.insert(Constraint::from(PositionConstraint::new(a, b, 1.0)));
        }

        let first = ConstraintSolver::new(ConstraintOrder::Shuffled, 7).visit_order(&constraints);
        let second = ConstraintSolver::new(ConstraintOrder::Shuffled, 7).visit_order(&constraints);
        assert_eq!(first, second);

        let insertion =
            ConstraintSolver::new(ConstraintOrder::Insertion, 7).visit_order(&constraints);
        assert_eq!(insertion, constraints.ids());
    }
}
