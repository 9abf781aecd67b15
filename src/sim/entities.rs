//! Game entities and their per-frame behaviors
//!
//! Entities hold gameplay fields plus optional components: a [`Visual`] the
//! renderer reads and a [`BodyHandle`] into the physics world. Behaviors
//! only touch gameplay and body state, never the visual.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::body::{BodyDef, BodyHandle, CollisionTag, EntityId, Shape};
use crate::Settings;
use crate::launch_velocity;

/// Which artwork the renderer should draw
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Sprite {
    PlayerShip,
    Laser,
    Ufo,
    WallFill,
}

/// Render-side component; opaque to the simulation
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Visual {
    pub sprite: Sprite,
    pub scale: f32,
}

impl Visual {
    pub fn new(sprite: Sprite) -> Self {
        Self { sprite, scale: 1.0 }
    }

    pub fn scaled(sprite: Sprite, scale: f32) -> Self {
        Self { sprite, scale }
    }
}

/// The player's ship
///
/// Moves kinematically along x and owns its position directly instead of
/// registering a body.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Player {
    pub position: Vec2,
    pub velocity: Vec2,
    pub width: f32,
    pub height: f32,
    /// Limits on the ship's edges
    pub min_x: f32,
    pub max_x: f32,
    pub visual: Option<Visual>,
}

impl Player {
    pub fn new(settings: &Settings) -> Self {
        Self {
            position: settings.player_start,
            velocity: Vec2::ZERO,
            width: settings.player_width,
            height: settings.player_height,
            min_x: 0.0,
            max_x: settings.screen_width,
            visual: Some(Visual::scaled(Sprite::PlayerShip, 0.5)),
        }
    }

    #[inline]
    pub fn left(&self) -> f32 {
        self.position.x - self.width / 2.0
    }

    #[inline]
    pub fn right(&self) -> f32 {
        self.position.x + self.width / 2.0
    }

    /// Set horizontal velocity from held keys or a joystick axis
    ///
    /// Opposing keys cancel. A connected joystick overrides the keys; its
    /// axis is rounded to -1, 0 or 1. A non-finite axis reading is ignored.
    pub fn steer(&mut self, left: bool, right: bool, joystick_x: Option<f32>, speed: f32) {
        self.velocity.x = match (left, right) {
            (true, false) => -speed,
            (false, true) => speed,
            _ => 0.0,
        };

        if let Some(axis) = joystick_x.filter(|a| a.is_finite()) {
            self.velocity.x = axis.clamp(-1.0, 1.0).round_ties_even() * speed;
        }
    }

    /// Move along x and clamp the ship's edges into [min_x, max_x]
    pub fn on_update(&mut self, dt: f32) {
        self.position.x += dt * self.velocity.x;

        if self.left() < self.min_x {
            self.position.x = self.min_x + self.width / 2.0;
        } else if self.right() > self.max_x {
            self.position.x = self.max_x - self.width / 2.0;
        }
    }
}

/// A shot fired by the player
///
/// Shots bounce around under gravity and survive a fixed number of wall
/// hits.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Shot {
    pub id: EntityId,
    pub body: BodyHandle,
    /// Wall hits left before the shot despawns
    pub life: u32,
    pub height: f32,
    /// The shot is removed once its lower edge is above this y
    pub max_y: f32,
    /// Flagged for removal at the end of the frame
    pub marked: bool,
    pub visual: Option<Visual>,
}

impl Shot {
    /// Body for a shot leaving `origin` along the configured launch angle
    pub fn body_def(id: EntityId, origin: Vec2, settings: &Settings) -> BodyDef {
        BodyDef::dynamic(id, CollisionTag::Shot, Shape::Point, origin)
            .with_velocity(launch_velocity(settings.shot_speed, settings.shot_angle_deg))
            .with_gravity(settings.shot_gravity)
            .with_elasticity(settings.shot_elasticity)
    }

    pub fn new(id: EntityId, body: BodyHandle, settings: &Settings) -> Self {
        Self {
            id,
            body,
            life: settings.shot_life,
            height: settings.shot_height,
            max_y: settings.screen_height,
            marked: false,
            visual: Some(Visual::scaled(Sprite::Laser, 0.5)),
        }
    }

    /// Record a wall hit. Returns true once the shot has no life left.
    pub fn hit_wall(&mut self) -> bool {
        self.life = self.life.saturating_sub(1);
        self.life < 1
    }

    /// Whether a shot centered at `center_y` has left the top of the screen
    pub fn is_above_screen(&self, center_y: f32) -> bool {
        center_y - self.height / 2.0 > self.max_y
    }

    /// Velocity that sends a shot back toward the screen if it has drifted
    /// past a side edge while still heading outward
    pub fn side_flip(position: Vec2, velocity: Vec2, screen_width: f32) -> Option<Vec2> {
        let outward = (position.x > screen_width && velocity.x > 0.0)
            || (position.x < 0.0 && velocity.x < 0.0);
        outward.then(|| Vec2::new(-velocity.x, velocity.y))
    }
}

/// A drifting balloon target
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Balloon {
    pub id: EntityId,
    pub body: BodyHandle,
    pub width: f32,
    pub height: f32,
    /// Wrap bounds for the balloon's center
    pub min_x: f32,
    pub max_x: f32,
    /// Flagged for removal at the end of the frame
    pub marked: bool,
    pub visual: Option<Visual>,
}

impl Balloon {
    pub fn body_def(id: EntityId, center: Vec2, velocity: Vec2, settings: &Settings) -> BodyDef {
        BodyDef::dynamic(
            id,
            CollisionTag::Balloon,
            Shape::rect(settings.balloon_width, settings.balloon_height),
            center,
        )
        .with_velocity(velocity)
        .with_elasticity(settings.balloon_elasticity)
    }

    pub fn new(id: EntityId, body: BodyHandle, settings: &Settings) -> Self {
        let (min_x, max_x) = settings.balloon_wrap_bounds();
        Self {
            id,
            body,
            width: settings.balloon_width,
            height: settings.balloon_height,
            min_x,
            max_x,
            marked: false,
            visual: Some(Visual::new(Sprite::Ufo)),
        }
    }

    /// New center if the balloon has drifted past a wrap bound
    ///
    /// Only the position changes; the caller keeps the velocity.
    pub fn wrap(&self, center: Vec2) -> Option<Vec2> {
        if center.x > self.max_x {
            Some(Vec2::new(self.min_x, center.y))
        } else if center.x < self.min_x {
            Some(Vec2::new(self.max_x, center.y))
        } else {
            None
        }
    }
}

/// One horizontal row of balloons moving the same way
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BalloonRow {
    pub index: u32,
    /// +1 moves right, -1 moves left
    pub direction: f32,
    pub balloons: Vec<Balloon>,
}

impl BalloonRow {
    /// Even rows drift right, odd rows drift left
    pub fn direction_for(index: u32) -> f32 {
        if index % 2 == 0 { 1.0 } else { -1.0 }
    }
}

/// Static bouncing surface
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Wall {
    pub id: EntityId,
    pub body: BodyHandle,
    pub width: f32,
    pub height: f32,
    pub visual: Option<Visual>,
}

impl Wall {
    pub fn body_def(id: EntityId, center: Vec2, width: f32, height: f32, elasticity: f32) -> BodyDef {
        BodyDef::fixed(id, CollisionTag::Wall, Shape::rect(width, height), center)
            .with_elasticity(elasticity)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn player_at(x: f32) -> Player {
        let mut p = Player::new(&Settings::default());
        p.position.x = x;
        p
    }

    #[test]
    fn test_player_moves_without_clamp() {
        let mut p = player_at(400.0);
        p.velocity.x = 200.0;
        p.on_update(0.1);
        assert!((p.position.x - 420.0).abs() < 1e-4);
    }

    #[test]
    fn test_player_clamped_at_edges() {
        let mut p = player_at(10.0);
        p.velocity.x = -200.0;
        p.on_update(1.0);
        assert!((p.left() - 0.0).abs() < 1e-4);

        let mut p = player_at(790.0);
        p.velocity.x = 200.0;
        p.on_update(1.0);
        assert!((p.right() - 800.0).abs() < 1e-4);
    }

    #[test]
    fn test_steer_keys_and_joystick() {
        let mut p = player_at(400.0);
        p.steer(true, true, None, 200.0);
        assert_eq!(p.velocity.x, 0.0);
        p.steer(true, false, None, 200.0);
        assert_eq!(p.velocity.x, -200.0);
        p.steer(false, true, None, 200.0);
        assert_eq!(p.velocity.x, 200.0);

        // Joystick overrides keys
        p.steer(false, true, Some(-0.9), 200.0);
        assert_eq!(p.velocity.x, -200.0);
        p.steer(true, false, Some(0.2), 200.0);
        assert_eq!(p.velocity.x, 0.0);
        // Half deflection rounds to even
        p.steer(false, false, Some(0.5), 200.0);
        assert_eq!(p.velocity.x, 0.0);
        // Garbage readings leave the keys in charge
        p.steer(true, false, Some(f32::NAN), 200.0);
        assert_eq!(p.velocity.x, -200.0);
        p.steer(false, true, Some(f32::NEG_INFINITY), 200.0);
        assert_eq!(p.velocity.x, 200.0);
    }

    #[test]
    fn test_balloon_wrap() {
        let s = Settings::default();
        let b = Balloon::new(EntityId(1), any_handle(), &s);

        assert_eq!(b.wrap(Vec2::new(805.0, 555.0)), None);
        assert_eq!(b.wrap(Vec2::new(825.0, 555.0)), Some(Vec2::new(-22.5, 555.0)));
        assert_eq!(b.wrap(Vec2::new(-30.0, 480.0)), Some(Vec2::new(822.5, 480.0)));

        // Wrapping lands exactly on a bound, which does not wrap again
        let wrapped = b.wrap(Vec2::new(825.0, 555.0)).unwrap();
        assert_eq!(b.wrap(wrapped), None);
    }

    #[test]
    fn test_shot_life_counts_down() {
        let s = Settings::default();
        let mut shot = Shot::new(EntityId(1), any_handle(), &s);
        assert_eq!(shot.life, 3);
        assert!(!shot.hit_wall());
        assert!(!shot.hit_wall());
        assert!(shot.hit_wall());
        assert_eq!(shot.life, 0);
        // Never goes below zero
        assert!(shot.hit_wall());
        assert_eq!(shot.life, 0);
    }

    #[test]
    fn test_shot_above_screen() {
        let shot = Shot::new(EntityId(1), any_handle(), &Settings::default());
        // Lower edge is 13.5 below center
        assert!(!shot.is_above_screen(610.0));
        assert!(shot.is_above_screen(614.0));
    }

    #[test]
    fn test_side_flip_only_when_heading_out() {
        let v = Vec2::new(50.0, 10.0);
        assert_eq!(
            Shot::side_flip(Vec2::new(801.0, 300.0), v, 800.0),
            Some(Vec2::new(-50.0, 10.0))
        );
        // Already heading back in
        assert_eq!(Shot::side_flip(Vec2::new(801.0, 300.0), -v, 800.0), None);
        assert_eq!(Shot::side_flip(Vec2::new(400.0, 300.0), v, 800.0), None);
    }

    #[test]
    fn test_row_directions_alternate() {
        assert_eq!(BalloonRow::direction_for(0), 1.0);
        assert_eq!(BalloonRow::direction_for(1), -1.0);
        assert_eq!(BalloonRow::direction_for(2), 1.0);
    }

    /// Real handle from a throwaway registry
    fn any_handle() -> BodyHandle {
        let mut reg = crate::sim::body::BodyRegistry::new();
        reg.add_body(BodyDef::dynamic(
            EntityId(0),
            CollisionTag::Shot,
            Shape::Point,
            Vec2::ZERO,
        ))
        .unwrap()
    }
}
