//! Simulation error taxonomy
//!
//! All variants are programming or configuration mistakes rather than
//! transient failures. The game loop logs them and skips the offending
//! operation for that frame.

use std::fmt;

use glam::Vec2;

use super::body::{BodyHandle, CollisionTag, EntityId};

#[derive(Debug, Clone, PartialEq)]
pub enum SimError {
    /// Operation on a body that was removed or never existed
    InvalidHandle(BodyHandle),
    /// A second body was requested for an entity that already has one
    DuplicateBody(EntityId),
    /// A handler for this (unordered) tag pair is already registered
    DuplicateRegistration {
        first: CollisionTag,
        second: CollisionTag,
    },
    /// Spawn position lies outside the configured world bounds
    OutOfBoundsSpawn { position: Vec2 },
}

impl fmt::Display for SimError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SimError::InvalidHandle(handle) => write!(f, "no live body for {handle}"),
            SimError::DuplicateBody(entity) => {
                write!(f, "entity {entity} already has a registered body")
            }
            SimError::DuplicateRegistration { first, second } => {
                write!(f, "collision handler for {first:?}/{second:?} already registered")
            }
            SimError::OutOfBoundsSpawn { position } => {
                write!(f, "spawn at ({}, {}) is outside world bounds", position.x, position.y)
            }
        }
    }
}

impl std::error::Error for SimError {}

pub type SimResult<T> = Result<T, SimError>;
