use log::debug;
#[cfg(feature = "parallel")]
use rayon::prelude::*;

use crate::{
    collision::{
        contact::CollisionInfo,
        narrowphase::NarrowPhase,
        queries::{RayCollision, Raycast, RaycastQuery},
    },
    config::WorldConfig,
    core::{constraints::Constraint, rigidbody::RigidBody, types::Ray},
    dynamics::{
        integrator::Integrator,
        solver::{ConstraintSolver, SolverStepMetrics},
    },
    error::{CollisionError, Result},
    utils::{
        allocator::{Arena, EntityId},
        logging::{warn_if_step_budget_exceeded, ScopedTimer},
    },
};

/// Owns every body and constraint; everything else refers to them by
/// [`EntityId`].
pub struct CollisionWorld {
    bodies: Arena<RigidBody>,
    constraints: Arena<Constraint>,
    config: WorldConfig,
    solver: ConstraintSolver,
    integrator: Integrator,
    time_accumulated: f32,
}

impl Default for CollisionWorld {
    fn default() -> Self {
        Self::new(WorldConfig::default())
    }
}

impl CollisionWorld {
    pub fn new(config: WorldConfig) -> Self {
        Self {
            bodies: Arena::new(),
            constraints: Arena::new(),
            solver: ConstraintSolver::from_config(&config),
            integrator: Integrator::from_config(&config),
            config,
            time_accumulated: 0.0,
        }
    }

    pub fn config(&self) -> &WorldConfig {
        &self.config
    }

    /// Stores a body and stamps it with its new handle. The volume, if any,
    /// is validated first.
    pub fn add_body(&mut self, body: RigidBody) -> Result<EntityId> {
        if let Some(volume) = &body.volume {
            volume.validate()?;
        }

        let id = self.bodies.insert(body);
        if let Some(stored) = self.bodies.get_mut(id) {
            stored.id = id;
        }
        debug!("Added body {id:?}");
        Ok(id)
    }

    /// Removes a body together with every constraint that references it.
    pub fn remove_body(&mut self, id: EntityId) -> Result<RigidBody> {
        let body = self.bodies.remove(id).ok_or(CollisionError::BodyNotFound(id))?;

        let dangling: Vec<EntityId> = self
            .constraints
            .iter()
            .filter(|(_, constraint)| constraint.involves(id))
            .map(|(constraint_id, _)| constraint_id)
            .collect();
        for constraint_id in &dangling {
            self.constraints.remove(*constraint_id);
        }

        debug!("Removed body {id:?} and {} constraint(s)", dangling.len());
        Ok(body)
    }

    pub fn body(&self, id: EntityId) -> Option<&RigidBody> {
        self.bodies.get(id)
    }

    pub fn body_mut(&mut self, id: EntityId) -> Option<&mut RigidBody> {
        self.bodies.get_mut(id)
    }

    pub fn bodies(&self) -> impl Iterator<Item = (EntityId, &RigidBody)> + '_ {
        self.bodies.iter()
    }

    pub fn body_count(&self) -> usize {
        self.bodies.len()
    }

    pub fn add_constraint(&mut self, constraint: impl Into<Constraint>) -> Result<EntityId> {
        let constraint = constraint.into();
        let (body_a, body_b) = constraint.bodies();

        if body_a == body_b {
            return Err(CollisionError::SelfConstraint(body_a));
        }
        for body in [body_a, body_b] {
            if !self.bodies.contains(body) {
                return Err(CollisionError::BodyNotFound(body));
            }
        }

        let id = self.constraints.insert(constraint);
        debug!("Added constraint {id:?} between {body_a:?} and {body_b:?}");
        Ok(id)
    }

    pub fn remove_constraint(&mut self, id: EntityId) -> Result<Constraint> {
        let constraint = self
            .constraints
            .remove(id)
            .ok_or(CollisionError::ConstraintNotFound(id))?;
        debug!("Removed constraint {id:?}");
        Ok(constraint)
    }

    pub fn constraint(&self, id: EntityId) -> Option<&Constraint> {
        self.constraints.get(id)
    }

    pub fn constraint_count(&self) -> usize {
        self.constraints.len()
    }

    /// Narrow-phase test for two stored bodies, in argument order.
    pub fn test_pair(&self, a: EntityId, b: EntityId) -> Result<Option<CollisionInfo>> {
        let body_a = self.bodies.get(a).ok_or(CollisionError::BodyNotFound(a))?;
        let body_b = self.bodies.get(b).ok_or(CollisionError::BodyNotFound(b))?;
        Ok(NarrowPhase::test_collision(body_a, body_b))
    }

    /// Every overlapping pair, each reported once with the lower slot as A.
    pub fn find_contacts(&self) -> Vec<CollisionInfo> {
        let _timer = ScopedTimer::new("world::find_contacts");
        let bodies: Vec<&RigidBody> = self.bodies.iter().map(|(_, body)| body).collect();

        let mut pairs = Vec::with_capacity(bodies.len() * bodies.len().saturating_sub(1) / 2);
        for i in 0..bodies.len() {
            for j in (i + 1)..bodies.len() {
                pairs.push((i, j));
            }
        }

        #[cfg(feature = "parallel")]
        let contacts = pairs
            .par_iter()
            .filter_map(|&(i, j)| NarrowPhase::test_collision(bodies[i], bodies[j]))
            .collect();

        #[cfg(not(feature = "parallel"))]
        let contacts = pairs
            .iter()
            .filter_map(|&(i, j)| NarrowPhase::test_collision(bodies[i], bodies[j]))
            .collect();

        contacts
    }

    /// Hits sorted nearest first.
    pub fn raycast(&self, query: &RaycastQuery) -> Vec<RayCollision> {
        let mut hits: Vec<RayCollision> = self
            .bodies
            .iter()
            .filter(|(id, _)| query.ignore != Some(*id))
            .filter_map(|(_, body)| Raycast::test_ray(&query.ray, body))
            .filter(|hit| hit.distance <= query.max_distance)
            .collect();

        hits.sort_by(|a, b| a.distance.total_cmp(&b.distance));
        if query.closest_only {
            hits.truncate(1);
        }
        hits
    }

    pub fn raycast_closest(&self, ray: &Ray) -> Option<RayCollision> {
        self.raycast(&RaycastQuery::new(*ray).closest()).into_iter().next()
    }

    /// One solver pass over all constraints, without integrating.
    pub fn update_constraints(&mut self, dt: f32) -> SolverStepMetrics {
        let _timer = ScopedTimer::new("world::constraints");
        self.solver.solve(&mut self.bodies, &self.constraints, dt)
    }

    /// Advances the world by `dt` in fixed sub-steps: constraints first,
    /// then integration. Returns how many sub-steps ran.
    pub fn step(&mut self, dt: f32) -> u32 {
        let time_step = self.config.effective_time_step();
        let timer = ScopedTimer::new("world::step");

        if dt.is_finite() && dt > 0.0 {
            self.time_accumulated += dt;
        }

        let mut steps = 0;
        while self.time_accumulated >= time_step {
            self.time_accumulated -= time_step;
            self.update_constraints(time_step);
            self.integrator.step(&mut self.bodies, time_step);
            steps += 1;
        }

        warn_if_step_budget_exceeded(timer.elapsed(), self.config.step_budget_ms);
        steps
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{constraints::PositionConstraint, volume::Volume};
    use glam::Vec3;

    fn sphere_at(x: f32) -> RigidBody {
        RigidBody::default()
            .with_volume(Volume::sphere(1.0))
            .with_position(Vec3::new(x, 0.0, 0.0))
    }

    #[test]
    fn add_body_stamps_the_handle() {
        let mut world = CollisionWorld::default();
        let id = world.add_body(sphere_at(0.0)).unwrap();
        assert_eq!(world.body(id).unwrap().id, id);
    }

    #[test]
    fn invalid_volume_is_rejected() {
        let mut world = CollisionWorld::default();
        let err = world
            .add_body(RigidBody::default().with_volume(Volume::sphere(-1.0)))
            .unwrap_err();
        assert!(matches!(err, CollisionError::InvalidVolume(_)));
        assert_eq!(world.body_count(), 0);
    }

    #[test]
    fn removing_a_body_drops_its_constraints() {
        let mut world = CollisionWorld::default();
        let a = world.add_body(sphere_at(0.0)).unwrap();
        let b = world.add_body(sphere_at(5.0)).unwrap();
        world.add_constraint(PositionConstraint::new(a, b, 3.0)).unwrap();

        world.remove_body(b).unwrap();
        assert_eq!(world.constraint_count(), 0);
        assert_eq!(world.remove_body(b).unwrap_err(), CollisionError::BodyNotFound(b));
    }

    #[test]
    fn constraint_validation() {
        let mut world = CollisionWorld::default();
        let a = world.add_body(sphere_at(0.0)).unwrap();
        assert_eq!(
            world.add_constraint(PositionConstraint::new(a, a, 1.0)).unwrap_err(),
            CollisionError::SelfConstraint(a)
        );

        let ghost = EntityId::from_index(42);
        assert_eq!(
            world.add_constraint(PositionConstraint::new(a, ghost, 1.0)).unwrap_err(),
            CollisionError::BodyNotFound(ghost)
        );
    }

    #[test]
    fn step_runs_whole_sub_steps_only() {
        let mut world = CollisionWorld::new(WorldConfig::default().with_time_step(0.1));
        assert_eq!(world.step(0.25), 2);
        assert_eq!(world.step(0.06), 1);
        assert_eq!(world.step(-1.0), 0);
    }
}
