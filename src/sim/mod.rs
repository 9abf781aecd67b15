//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Caller-supplied timestep only
//! - Seeded RNG only
//! - Stable iteration order (by body creation order)
//! - No rendering or platform dependencies

pub mod body;
pub mod collision;
pub mod effects;
pub mod entities;
pub mod error;
pub mod handlers;
pub mod state;
pub mod tick;
pub mod world;

pub use body::{Body, BodyDef, BodyHandle, BodyRegistry, BodyType, CollisionTag, EntityId, Shape};
pub use collision::{Aabb, CollisionResult, body_collision};
pub use effects::{EffectHandle, Effects, Particle};
pub use entities::{Balloon, BalloonRow, Player, Shot, Sprite, Visual, Wall};
pub use error::{SimError, SimResult};
pub use handlers::{CollisionHandlers, HandlerFn, register_game_handlers};
pub use state::{GameEvent, GamePhase, GameState};
pub use tick::{Session, TickInput, tick};
pub use world::{Contact, ContactBody, PhysicsWorld};
