//! Body registry
//!
//! Physical state for every simulated entity, kept apart from anything the
//! renderer sees. Bodies are addressed through opaque [`BodyHandle`]s that
//! are never reused, so iteration in handle order is creation order.

use std::collections::BTreeMap;
use std::fmt;

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::collision::Aabb;
use super::error::{SimError, SimResult};

/// Game-level entity identifier
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct EntityId(pub u32);

impl fmt::Display for EntityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Opaque reference to a registered body
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct BodyHandle(u32);

impl fmt::Display for BodyHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "body {}", self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BodyType {
    /// Integrated every step
    Dynamic,
    /// Never moves on its own and ignores gravity
    Static,
}

/// Collision category, fixed at body creation
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum CollisionTag {
    /// Shots fired by the player (the bouncing "acrobats")
    Shot,
    Balloon,
    Wall,
}

/// Collision geometry, centered on the body position
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum Shape {
    /// Axis-aligned rectangle
    Rect { half_extents: Vec2 },
    /// Zero-size probe, tested point-vs-rect
    Point,
}

impl Shape {
    pub fn rect(width: f32, height: f32) -> Self {
        Shape::Rect {
            half_extents: Vec2::new(width, height) / 2.0,
        }
    }
}

/// Physical state of one entity
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Body {
    pub entity: EntityId,
    pub position: Vec2,
    pub velocity: Vec2,
    pub body_type: BodyType,
    pub tag: CollisionTag,
    pub shape: Shape,
    /// Bounce energy retention (1 = perfectly elastic)
    pub elasticity: f32,
    /// Acceleration applied each step
    pub gravity: Vec2,
}

impl Body {
    pub fn is_dynamic(&self) -> bool {
        self.body_type == BodyType::Dynamic
    }

    /// World-space bounds of the body's shape
    pub fn bounds(&self) -> Aabb {
        match self.shape {
            Shape::Rect { half_extents } => Aabb::from_center(self.position, half_extents),
            Shape::Point => Aabb::from_center(self.position, Vec2::ZERO),
        }
    }
}

/// Everything needed to register a body
#[derive(Debug, Clone)]
pub struct BodyDef {
    pub entity: EntityId,
    pub body_type: BodyType,
    pub tag: CollisionTag,
    pub shape: Shape,
    pub position: Vec2,
    pub velocity: Vec2,
    pub elasticity: f32,
    pub gravity: Vec2,
}

impl BodyDef {
    /// Dynamic body with no gravity, no velocity and elasticity 1
    pub fn dynamic(entity: EntityId, tag: CollisionTag, shape: Shape, position: Vec2) -> Self {
        Self {
            entity,
            body_type: BodyType::Dynamic,
            tag,
            shape,
            position,
            velocity: Vec2::ZERO,
            elasticity: 1.0,
            gravity: Vec2::ZERO,
        }
    }

    /// Static body (never integrated)
    pub fn fixed(entity: EntityId, tag: CollisionTag, shape: Shape, position: Vec2) -> Self {
        Self {
            body_type: BodyType::Static,
            ..Self::dynamic(entity, tag, shape, position)
        }
    }

    pub fn with_velocity(mut self, velocity: Vec2) -> Self {
        self.velocity = velocity;
        self
    }

    pub fn with_elasticity(mut self, elasticity: f32) -> Self {
        self.elasticity = elasticity;
        self
    }

    pub fn with_gravity(mut self, gravity: Vec2) -> Self {
        self.gravity = gravity;
        self
    }
}

/// Owner of all live bodies
#[derive(Debug, Clone, Default)]
pub struct BodyRegistry {
    bodies: BTreeMap<BodyHandle, Body>,
    owners: BTreeMap<EntityId, BodyHandle>,
    next_handle: u32,
}

impl BodyRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a body for an entity. An entity may own at most one body.
    pub fn add_body(&mut self, def: BodyDef) -> SimResult<BodyHandle> {
        if self.owners.contains_key(&def.entity) {
            return Err(SimError::DuplicateBody(def.entity));
        }

        let handle = BodyHandle(self.next_handle);
        self.next_handle += 1;

        let velocity = match def.body_type {
            BodyType::Dynamic => def.velocity,
            BodyType::Static => Vec2::ZERO,
        };
        let gravity = match def.body_type {
            BodyType::Dynamic => def.gravity,
            BodyType::Static => Vec2::ZERO,
        };

        self.bodies.insert(
            handle,
            Body {
                entity: def.entity,
                position: def.position,
                velocity,
                body_type: def.body_type,
                tag: def.tag,
                shape: def.shape,
                elasticity: def.elasticity,
                gravity,
            },
        );
        self.owners.insert(def.entity, handle);
        Ok(handle)
    }

    /// Set a body's velocity. Static bodies keep zero velocity.
    pub fn set_velocity(&mut self, handle: BodyHandle, velocity: Vec2) -> SimResult<()> {
        let body = self.get_mut(handle)?;
        if body.is_dynamic() {
            body.velocity = velocity;
        }
        Ok(())
    }

    /// Teleport a body. Velocity is left untouched.
    pub fn set_position(&mut self, handle: BodyHandle, position: Vec2) -> SimResult<()> {
        self.get_mut(handle)?.position = position;
        Ok(())
    }

    pub fn get(&self, handle: BodyHandle) -> SimResult<&Body> {
        self.bodies.get(&handle).ok_or(SimError::InvalidHandle(handle))
    }

    pub(crate) fn get_mut(&mut self, handle: BodyHandle) -> SimResult<&mut Body> {
        self.bodies
            .get_mut(&handle)
            .ok_or(SimError::InvalidHandle(handle))
    }

    /// Remove a body, returning its final state
    pub fn remove_body(&mut self, handle: BodyHandle) -> SimResult<Body> {
        let body = self
            .bodies
            .remove(&handle)
            .ok_or(SimError::InvalidHandle(handle))?;
        self.owners.remove(&body.entity);
        Ok(body)
    }

    /// Handle of the body owned by an entity, if any
    pub fn handle_of(&self, entity: EntityId) -> Option<BodyHandle> {
        self.owners.get(&entity).copied()
    }

    pub fn contains(&self, handle: BodyHandle) -> bool {
        self.bodies.contains_key(&handle)
    }

    pub fn len(&self) -> usize {
        self.bodies.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bodies.is_empty()
    }

    /// Bodies in creation order
    pub fn iter(&self) -> impl Iterator<Item = (BodyHandle, &Body)> {
        self.bodies.iter().map(|(h, b)| (*h, b))
    }

    pub(crate) fn iter_mut(&mut self) -> impl Iterator<Item = (BodyHandle, &mut Body)> {
        self.bodies.iter_mut().map(|(h, b)| (*h, b))
    }

    /// Handles in creation order
    pub fn handles(&self) -> Vec<BodyHandle> {
        self.bodies.keys().copied().collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn balloon_def(id: u32) -> BodyDef {
        BodyDef::dynamic(
            EntityId(id),
            CollisionTag::Balloon,
            Shape::rect(45.0, 45.0),
            Vec2::new(100.0, 500.0),
        )
        .with_velocity(Vec2::new(100.0, 0.0))
    }

    #[test]
    fn test_add_and_get() {
        let mut reg = BodyRegistry::new();
        let h = reg.add_body(balloon_def(1)).unwrap();
        let body = reg.get(h).unwrap();
        assert_eq!(body.entity, EntityId(1));
        assert_eq!(body.tag, CollisionTag::Balloon);
        assert_eq!(body.velocity, Vec2::new(100.0, 0.0));
        assert_eq!(reg.handle_of(EntityId(1)), Some(h));
    }

    #[test]
    fn test_removed_handle_is_invalid() {
        let mut reg = BodyRegistry::new();
        let h = reg.add_body(balloon_def(1)).unwrap();
        reg.remove_body(h).unwrap();

        assert_eq!(reg.get(h), Err(SimError::InvalidHandle(h)));
        assert_eq!(
            reg.set_velocity(h, Vec2::ONE),
            Err(SimError::InvalidHandle(h))
        );
        assert_eq!(
            reg.set_position(h, Vec2::ONE),
            Err(SimError::InvalidHandle(h))
        );
        assert!(reg.remove_body(h).is_err());
        assert!(reg.handle_of(EntityId(1)).is_none());
    }

    #[test]
    fn test_entity_cannot_own_two_bodies() {
        let mut reg = BodyRegistry::new();
        reg.add_body(balloon_def(7)).unwrap();
        assert_eq!(
            reg.add_body(balloon_def(7)),
            Err(SimError::DuplicateBody(EntityId(7)))
        );
        assert_eq!(reg.len(), 1);
    }

    #[test]
    fn test_handles_are_not_reused() {
        let mut reg = BodyRegistry::new();
        let a = reg.add_body(balloon_def(1)).unwrap();
        reg.remove_body(a).unwrap();
        let b = reg.add_body(balloon_def(1)).unwrap();
        assert_ne!(a, b);
        assert!(!reg.contains(a));
    }

    #[test]
    fn test_static_body_ignores_velocity_and_gravity() {
        let mut reg = BodyRegistry::new();
        let def = BodyDef::fixed(
            EntityId(3),
            CollisionTag::Wall,
            Shape::rect(800.0, 20.0),
            Vec2::new(400.0, 0.0),
        )
        .with_velocity(Vec2::new(5.0, 5.0))
        .with_gravity(Vec2::new(0.0, -100.0));
        let h = reg.add_body(def).unwrap();

        reg.set_velocity(h, Vec2::new(1.0, 1.0)).unwrap();
        let body = reg.get(h).unwrap();
        assert_eq!(body.velocity, Vec2::ZERO);
        assert_eq!(body.gravity, Vec2::ZERO);
    }

    #[test]
    fn test_iteration_follows_creation_order() {
        let mut reg = BodyRegistry::new();
        let ids: Vec<_> = (10..15).map(|i| reg.add_body(balloon_def(i)).unwrap()).collect();
        assert_eq!(reg.handles(), ids);
    }
}
