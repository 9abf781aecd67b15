//! Physics world: the per-frame simulation step
//!
//! Integrates dynamic bodies with semi-implicit Euler, finds overlapping
//! pairs, resolves their velocities and reports contacts. Contacts come out
//! in a stable order (by body creation order of the first, then second
//! body) so handler dispatch is reproducible.

use std::collections::BTreeSet;

use glam::Vec2;

use super::body::{Body, BodyDef, BodyHandle, BodyRegistry, CollisionTag, EntityId};
use super::collision::{
    Aabb, body_collision, combined_elasticity, resolve_velocities, separation,
};
use super::error::{SimError, SimResult};

/// One side of a contact, captured after resolution
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ContactBody {
    pub handle: BodyHandle,
    pub entity: EntityId,
    pub tag: CollisionTag,
    pub position: Vec2,
    pub velocity: Vec2,
}

impl ContactBody {
    fn capture(handle: BodyHandle, body: &Body) -> Self {
        Self {
            handle,
            entity: body.entity,
            tag: body.tag,
            position: body.position,
            velocity: body.velocity,
        }
    }
}

/// An overlapping pair found during a step
#[derive(Debug, Clone, PartialEq)]
pub struct Contact {
    pub first: ContactBody,
    pub second: ContactBody,
    /// Points from `first` toward `second`
    pub normal: Vec2,
    pub penetration: f32,
    /// True when the pair was not touching on the previous step
    pub began: bool,
}

impl Contact {
    /// Same contact seen from the other body
    pub fn swapped(&self) -> Self {
        Self {
            first: self.second,
            second: self.first,
            normal: -self.normal,
            penetration: self.penetration,
            began: self.began,
        }
    }

    pub fn involves(&self, a: CollisionTag, b: CollisionTag) -> bool {
        (self.first.tag == a && self.second.tag == b)
            || (self.first.tag == b && self.second.tag == a)
    }
}

fn pair_key(a: CollisionTag, b: CollisionTag) -> (CollisionTag, CollisionTag) {
    if a <= b { (a, b) } else { (b, a) }
}

/// Body registry plus the stepping logic that moves it
#[derive(Debug, Clone, Default)]
pub struct PhysicsWorld {
    bodies: BodyRegistry,
    /// Spawns outside these bounds are rejected
    bounds: Option<Aabb>,
    /// Tag pairs never tested against each other
    ignored: BTreeSet<(CollisionTag, CollisionTag)>,
    /// Pairs overlapping at the end of the previous step
    touching: BTreeSet<(BodyHandle, BodyHandle)>,
}

impl PhysicsWorld {
    pub fn new() -> Self {
        Self::default()
    }

    /// World that rejects spawns outside `bounds` (edges included)
    pub fn with_bounds(bounds: Aabb) -> Self {
        Self {
            bounds: Some(bounds),
            ..Self::default()
        }
    }

    /// Skip collision tests between two tags (order-independent)
    pub fn ignore_pair(&mut self, a: CollisionTag, b: CollisionTag) {
        self.ignored.insert(pair_key(a, b));
    }

    pub fn bodies(&self) -> &BodyRegistry {
        &self.bodies
    }

    pub fn add_body(&mut self, def: BodyDef) -> SimResult<BodyHandle> {
        if let Some(bounds) = self.bounds {
            if !bounds.encloses(def.position) {
                return Err(SimError::OutOfBoundsSpawn {
                    position: def.position,
                });
            }
        }
        self.bodies.add_body(def)
    }

    pub fn get(&self, handle: BodyHandle) -> SimResult<&Body> {
        self.bodies.get(handle)
    }

    pub fn set_velocity(&mut self, handle: BodyHandle, velocity: Vec2) -> SimResult<()> {
        self.bodies.set_velocity(handle, velocity)
    }

    pub fn set_position(&mut self, handle: BodyHandle, position: Vec2) -> SimResult<()> {
        self.bodies.set_position(handle, position)
    }

    pub fn remove_body(&mut self, handle: BodyHandle) -> SimResult<Body> {
        let body = self.bodies.remove_body(handle)?;
        self.touching.retain(|&(a, b)| a != handle && b != handle);
        Ok(body)
    }

    /// Advance all dynamic bodies by `dt` and resolve collisions
    ///
    /// Returns every overlapping pair, in stable order. Pairs that were
    /// already touching on the previous step are reported with
    /// `began == false`.
    pub fn step(&mut self, dt: f32) -> Vec<Contact> {
        if !dt.is_finite() || dt < 0.0 {
            log::warn!("Ignoring physics step with invalid dt {dt}");
            return Vec::new();
        }

        self.integrate(dt);

        let handles = self.bodies.handles();
        let mut contacts = Vec::new();
        let mut touching = BTreeSet::new();

        for (i, &ha) in handles.iter().enumerate() {
            for &hb in &handles[i + 1..] {
                if let Some(contact) = self.test_pair(ha, hb) {
                    touching.insert((ha, hb));
                    contacts.push(contact);
                }
            }
        }

        self.touching = touching;
        contacts
    }

    fn integrate(&mut self, dt: f32) {
        for (_, body) in self.bodies.iter_mut() {
            if !body.is_dynamic() {
                continue;
            }
            // Semi-implicit Euler: velocity first, then position
            body.velocity += body.gravity * dt;
            body.position += body.velocity * dt;
        }
    }

    /// Test, resolve and report one pair
    fn test_pair(&mut self, ha: BodyHandle, hb: BodyHandle) -> Option<Contact> {
        let a = self.bodies.get(ha).ok()?.clone();
        let b = self.bodies.get(hb).ok()?.clone();

        if !a.is_dynamic() && !b.is_dynamic() {
            return None;
        }
        if self.ignored.contains(&pair_key(a.tag, b.tag)) {
            return None;
        }

        let result = body_collision(&a, &b);
        if !result.hit {
            return None;
        }

        let (va, vb) = resolve_velocities(
            a.velocity,
            b.velocity,
            result.normal,
            combined_elasticity(&a, &b),
            a.is_dynamic(),
            b.is_dynamic(),
        );
        let (da, db) = separation(
            result.normal,
            result.penetration,
            a.is_dynamic(),
            b.is_dynamic(),
        );

        let began = !self.touching.contains(&(ha, hb));
        let first = self.apply(ha, va, da)?;
        let second = self.apply(hb, vb, db)?;

        Some(Contact {
            first,
            second,
            normal: result.normal,
            penetration: result.penetration,
            began,
        })
    }

    fn apply(&mut self, handle: BodyHandle, velocity: Vec2, shift: Vec2) -> Option<ContactBody> {
        let body = self.bodies.get_mut(handle).ok()?;
        if body.is_dynamic() {
            body.velocity = velocity;
            body.position += shift;
        }
        Some(ContactBody::capture(handle, body))
    }
}
