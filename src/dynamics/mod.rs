//! Simulation dynamics: constraint solving and integration.

pub mod integrator;
pub mod solver;

pub use integrator::Integrator;
pub use solver::{ConstraintSolver, SolverStepMetrics};
