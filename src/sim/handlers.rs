//! Collision handlers
//!
//! Handlers are registered once per session against an unordered pair of
//! collision tags and consulted after every physics step. A handler runs
//! only for contacts that began this step, so one physical contact means
//! one invocation. Dispatch order is registration order, then contact
//! order.

use std::fmt;

use super::body::CollisionTag;
use super::error::{SimError, SimResult};
use super::state::{GameEvent, GameState};
use super::world::Contact;

/// Policy callback; `contact.first` carries the first registered tag
pub type HandlerFn<C> = fn(&mut C, &Contact);

struct Registration<C> {
    first: CollisionTag,
    second: CollisionTag,
    name: &'static str,
    callback: HandlerFn<C>,
}

impl<C> Registration<C> {
    fn matches(&self, a: CollisionTag, b: CollisionTag) -> bool {
        (self.first == a && self.second == b) || (self.first == b && self.second == a)
    }
}

/// Handler table keyed by unordered tag pair
pub struct CollisionHandlers<C> {
    entries: Vec<Registration<C>>,
}

impl<C> Default for CollisionHandlers<C> {
    fn default() -> Self {
        Self {
            entries: Vec::new(),
        }
    }
}

impl<C> fmt::Debug for CollisionHandlers<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list()
            .entries(
                self.entries
                    .iter()
                    .map(|r| (r.first, r.second, r.name)),
            )
            .finish()
    }
}

impl<C> CollisionHandlers<C> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a handler. A pair may only be registered once, in either
    /// order.
    pub fn add(
        &mut self,
        first: CollisionTag,
        second: CollisionTag,
        name: &'static str,
        callback: HandlerFn<C>,
    ) -> SimResult<()> {
        if self.entries.iter().any(|r| r.matches(first, second)) {
            return Err(SimError::DuplicateRegistration { first, second });
        }
        self.entries.push(Registration {
            first,
            second,
            name,
            callback,
        });
        Ok(())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Run matching handlers for every contact that began this step
    ///
    /// Returns the number of handler invocations.
    pub fn dispatch(&self, ctx: &mut C, contacts: &[Contact]) -> usize {
        let mut invoked = 0;
        for reg in &self.entries {
            for contact in contacts.iter().filter(|c| c.began) {
                if !reg.matches(contact.first.tag, contact.second.tag) {
                    continue;
                }
                if contact.first.tag == reg.first {
                    (reg.callback)(ctx, contact);
                } else {
                    (reg.callback)(ctx, &contact.swapped());
                }
                invoked += 1;
            }
        }
        invoked
    }
}

/// Register the game's shot/balloon and shot/wall policies
pub fn register_game_handlers(handlers: &mut CollisionHandlers<GameState>) -> SimResult<()> {
    handlers.add(CollisionTag::Shot, CollisionTag::Balloon, "shot_balloon", shot_balloon)?;
    handlers.add(CollisionTag::Shot, CollisionTag::Wall, "shot_wall", shot_wall)?;
    Ok(())
}

/// Pop the balloon and leave a particle burst where it was
///
/// Score is granted when firing, not here.
pub fn shot_balloon(state: &mut GameState, contact: &Contact) {
    let shot = contact.first.entity;
    let balloon_id = contact.second.entity;
    let position = contact.second.position;

    let Some(balloon) = state.balloon_mut(balloon_id) else {
        log::warn!("Shot {shot} hit unknown balloon {balloon_id}");
        return;
    };
    if balloon.marked {
        return;
    }
    balloon.marked = true;

    let (count, speed, lifetime) = {
        let s = &state.settings;
        (
            s.burst_particles,
            s.burst_speed.0..s.burst_speed.1,
            s.burst_lifetime.0..s.burst_lifetime.1,
        )
    };
    let effect = state.effects.spawn_burst(position, count, speed, lifetime);

    log::debug!("Balloon {balloon_id} popped by shot {shot} at {position}");
    state.push_event(GameEvent::BalloonPopped {
        balloon: balloon_id,
        shot,
        position,
        effect,
    });
}

/// Use up one of the shot's lives; it despawns when none are left
pub fn shot_wall(state: &mut GameState, contact: &Contact) {
    let shot_id = contact.first.entity;

    let Some(shot) = state.shot_mut(shot_id) else {
        log::warn!("Wall hit by unknown shot {shot_id}");
        return;
    };
    if shot.marked {
        return;
    }

    let expired = shot.hit_wall();
    let life_left = shot.life;
    if expired {
        shot.marked = true;
    }

    log::debug!("Shot {shot_id} hit a wall, {life_left} lives left");
    state.push_event(GameEvent::ShotHitWall {
        shot: shot_id,
        life_left,
    });
    if expired {
        state.push_event(GameEvent::ShotExpired { shot: shot_id });
    }
}
