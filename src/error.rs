//! Error types for world-level operations.
//!
//! Geometric queries never fail: a miss or a disjoint pair is `None`. These
//! errors cover misuse of the owning container.

use thiserror::Error;

use crate::utils::allocator::EntityId;

#[derive(Debug, Error, Clone, PartialEq)]
pub enum CollisionError {
    /// A handle did not resolve to a live body.
    #[error("Rigid body not found: {0:?}")]
    BodyNotFound(EntityId),

    /// A handle did not resolve to a live constraint.
    #[error("Constraint not found: {0:?}")]
    ConstraintNotFound(EntityId),

    /// Both ends of a constraint name the same body.
    #[error("Constraint links body {0:?} to itself")]
    SelfConstraint(EntityId),

    /// Volume dimensions are non-finite or out of range.
    #[error("Invalid collision volume: {0}")]
    InvalidVolume(String),

    /// Ray direction cannot be normalised.
    #[error("Invalid ray: {0}")]
    InvalidRay(String),
}

/// Result type for collision world operations.
pub type Result<T> = std::result::Result<T, CollisionError>;
