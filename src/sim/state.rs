//! Game state and core simulation types
//!
//! Everything owned by one game session lives here: score and lives, the
//! physics world, the entity lists and pending effects. Entities removed
//! during a frame are only marked; [`GameState::compact`] drops them from
//! every list and from the physics world after handlers have run.

use std::collections::VecDeque;

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::body::{CollisionTag, EntityId};
use super::collision::Aabb;
use super::effects::{EffectHandle, Effects};
use super::entities::{Balloon, BalloonRow, Player, Shot, Sprite, Visual, Wall};
use super::error::SimResult;
use super::world::PhysicsWorld;
use crate::Settings;

/// Pending events kept when the application does not drain them
pub const MAX_PENDING_EVENTS: usize = 256;

/// Current phase of gameplay
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GamePhase {
    /// Active gameplay
    Playing,
    /// Run ended
    GameOver,
}

/// Things the surrounding application may want to react to
#[derive(Debug, Clone, PartialEq)]
pub enum GameEvent {
    ShotFired {
        shot: EntityId,
    },
    BalloonPopped {
        balloon: EntityId,
        shot: EntityId,
        position: Vec2,
        effect: EffectHandle,
    },
    ShotHitWall {
        shot: EntityId,
        life_left: u32,
    },
    /// Shot used up its wall hits
    ShotExpired {
        shot: EntityId,
    },
    /// Shot flew off the top of the screen
    ShotLeftScreen {
        shot: EntityId,
    },
    BalloonWrapped {
        balloon: EntityId,
        to: Vec2,
    },
    PlayerEliminated {
        lives_left: u8,
    },
    GameOver {
        score: u64,
    },
}

/// Complete state of one game session
#[derive(Debug, Clone)]
pub struct GameState {
    pub settings: Settings,
    /// Session seed (particle RNG)
    pub seed: u64,
    pub phase: GamePhase,
    pub score: u64,
    pub lives: u8,
    /// Simulation tick counter
    pub time_ticks: u64,
    pub player: Player,
    pub world: PhysicsWorld,
    /// Active shots, in firing order
    pub shots: Vec<Shot>,
    /// Balloon rows, top row first
    pub rows: Vec<BalloonRow>,
    pub walls: Vec<Wall>,
    pub effects: Effects,
    /// Events not yet drained by the application. The host drains them
    /// once per frame; past [`MAX_PENDING_EVENTS`] the oldest are dropped.
    events: VecDeque<GameEvent>,
    /// Next entity ID
    next_id: u32,
}

impl GameState {
    /// Fresh session: full lives, zero score, balloons and walls in place
    pub fn new(settings: Settings, seed: u64) -> Self {
        let (min, max) = settings.spawn_bounds();
        let mut world = PhysicsWorld::with_bounds(Aabb::new(min, max));
        // Balloons in a row share a speed; letting them collide would
        // break the drift
        world.ignore_pair(CollisionTag::Balloon, CollisionTag::Balloon);

        let mut state = Self {
            player: Player::new(&settings),
            lives: settings.player_lives,
            effects: Effects::new(seed),
            settings,
            seed,
            phase: GamePhase::Playing,
            score: 0,
            time_ticks: 0,
            world,
            shots: Vec::new(),
            rows: Vec::new(),
            walls: Vec::new(),
            events: VecDeque::with_capacity(MAX_PENDING_EVENTS),
            next_id: 1,
        };

        state.set_up_walls();
        state.set_up_balloons();

        log::info!(
            "New game: {} balloons in {} rows, {} lives",
            state.balloon_count(),
            state.rows.len(),
            state.lives
        );
        state
    }

    /// Allocate a new entity ID
    pub fn next_entity_id(&mut self) -> EntityId {
        let id = self.next_id;
        self.next_id += 1;
        EntityId(id)
    }

    fn set_up_walls(&mut self) {
        let width = self.settings.screen_width;
        let height = self.settings.screen_height;
        let thickness = self.settings.wall_thickness;

        for center_y in [height, 0.0] {
            let center = Vec2::new(width / 2.0, center_y);
            if let Err(e) = self.spawn_wall(center, width, thickness) {
                log::warn!("Skipping wall at {center}: {e}");
            }
        }
    }

    /// Register a static wall
    pub fn spawn_wall(&mut self, center: Vec2, width: f32, height: f32) -> SimResult<EntityId> {
        let id = self.next_entity_id();
        let def = Wall::body_def(id, center, width, height, self.settings.wall_elasticity);
        let body = self.world.add_body(def)?;
        self.walls.push(Wall {
            id,
            body,
            width,
            height,
            visual: Some(Visual::new(Sprite::WallFill)),
        });
        Ok(id)
    }

    /// Lay out the balloon rows across the top quarter of the screen
    fn set_up_balloons(&mut self) {
        let s = &self.settings;
        let rows = s.balloon_rows;
        let per_row = s.balloons_per_row;
        if rows == 0 || per_row == 0 {
            return;
        }

        let spacing_height = (s.screen_height / 4.0) / rows as f32;
        let spacing_width = (s.screen_width + 2.0 * s.balloon_width) / per_row as f32;
        let top = s.screen_height - s.balloon_height;
        let speed = s.balloon_speed;

        for row in 0..rows {
            let direction = BalloonRow::direction_for(row);
            let velocity = Vec2::new(speed * direction, 0.0);
            let center_y = top - spacing_height * row as f32;

            let mut balloons = Vec::with_capacity(per_row as usize);
            for b in 0..per_row {
                let center = Vec2::new(spacing_width * b as f32, center_y);
                let id = self.next_entity_id();
                let def = Balloon::body_def(id, center, velocity, &self.settings);
                match self.world.add_body(def) {
                    Ok(body) => balloons.push(Balloon::new(id, body, &self.settings)),
                    Err(e) => log::warn!("Skipping balloon {id}: {e}"),
                }
            }

            self.rows.push(BalloonRow {
                index: row,
                direction,
                balloons,
            });
        }
    }

    /// Fire a shot from the player's position
    ///
    /// The score is granted first; if the shot cannot be spawned the points
    /// stay and the error is returned.
    pub fn fire(&mut self) -> SimResult<EntityId> {
        self.score += self.settings.fire_score;

        let id = self.next_entity_id();
        let def = Shot::body_def(id, self.player.position, &self.settings);
        let body = self.world.add_body(def)?;
        self.shots.push(Shot::new(id, body, &self.settings));

        log::debug!("Shot {id} fired, score {}", self.score);
        self.push_event(GameEvent::ShotFired { shot: id });
        Ok(id)
    }

    pub fn shot_mut(&mut self, id: EntityId) -> Option<&mut Shot> {
        self.shots.iter_mut().find(|s| s.id == id)
    }

    pub fn balloon_mut(&mut self, id: EntityId) -> Option<&mut Balloon> {
        self.rows
            .iter_mut()
            .flat_map(|r| r.balloons.iter_mut())
            .find(|b| b.id == id)
    }

    pub fn balloons(&self) -> impl Iterator<Item = &Balloon> {
        self.rows.iter().flat_map(|r| r.balloons.iter())
    }

    pub fn balloon_count(&self) -> usize {
        self.rows.iter().map(|r| r.balloons.len()).sum()
    }

    /// Lose one life; the game ends when none are left
    pub fn lose_life(&mut self) {
        if self.phase == GamePhase::GameOver {
            return;
        }
        self.lives = self.lives.saturating_sub(1);
        log::info!("Player eliminated, {} lives left", self.lives);
        self.push_event(GameEvent::PlayerEliminated {
            lives_left: self.lives,
        });
        if self.lives == 0 {
            self.end_game();
        }
    }

    /// End the run and report the final score
    pub fn end_game(&mut self) {
        if self.phase == GamePhase::GameOver {
            return;
        }
        self.phase = GamePhase::GameOver;
        log::info!("Game over, final score {}", self.score);
        self.push_event(GameEvent::GameOver { score: self.score });
    }

    /// Remove every marked shot and balloon from its list and from the
    /// physics world. Returns how many entities were removed.
    pub fn compact(&mut self) -> usize {
        let mut removed = 0;

        for shot in self.shots.iter().filter(|s| s.marked) {
            if let Err(e) = self.world.remove_body(shot.body) {
                log::warn!("Removing shot {}: {e}", shot.id);
            }
            removed += 1;
        }
        self.shots.retain(|s| !s.marked);

        for row in &mut self.rows {
            for balloon in row.balloons.iter().filter(|b| b.marked) {
                if let Err(e) = self.world.remove_body(balloon.body) {
                    log::warn!("Removing balloon {}: {e}", balloon.id);
                }
                removed += 1;
            }
            row.balloons.retain(|b| !b.marked);
        }

        removed
    }

    /// Queue an event for the application
    pub fn push_event(&mut self, event: GameEvent) {
        if self.events.len() >= MAX_PENDING_EVENTS {
            self.events.pop_front();
        }
        self.events.push_back(event);
    }

    pub fn pending_events(&self) -> usize {
        self.events.len()
    }

    /// Hand pending events to the caller, oldest first
    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        self.events.drain(..).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_game_layout() {
        let state = GameState::new(Settings::default(), 1);
        assert_eq!(state.phase, GamePhase::Playing);
        assert_eq!(state.score, 0);
        assert_eq!(state.lives, 3);
        assert_eq!(state.rows.len(), 2);
        assert_eq!(state.balloon_count(), 16);
        assert_eq!(state.walls.len(), 2);
        assert_eq!(state.world.bodies().len(), 18);
    }

    #[test]
    fn test_balloon_rows_alternate_direction() {
        let state = GameState::new(Settings::default(), 1);
        for row in &state.rows {
            for b in &row.balloons {
                let body = state.world.get(b.body).unwrap();
                assert_eq!(body.velocity, Vec2::new(100.0 * row.direction, 0.0));
            }
        }
        // Top row sits one balloon height below the top of the screen
        let first = state.world.get(state.rows[0].balloons[0].body).unwrap();
        assert_eq!(first.position, Vec2::new(0.0, 555.0));
        let second_row = state.world.get(state.rows[1].balloons[0].body).unwrap();
        assert_eq!(second_row.position.y, 480.0);
    }

    #[test]
    fn test_fire_scores_and_registers_one_shot() {
        let mut state = GameState::new(Settings::default(), 1);
        let bodies = state.world.bodies().len();

        let id = state.fire().unwrap();
        assert_eq!(state.score, 10);
        assert_eq!(state.shots.len(), 1);
        assert_eq!(state.world.bodies().len(), bodies + 1);

        let handle = state.world.bodies().handle_of(id).unwrap();
        let body = state.world.get(handle).unwrap();
        assert_eq!(body.tag, CollisionTag::Shot);
        assert_eq!(body.position, state.player.position);
        assert!((body.velocity.y - 300.0).abs() < 1e-3);
        assert_eq!(state.drain_events(), vec![GameEvent::ShotFired { shot: id }]);
    }

    #[test]
    fn test_fire_out_of_bounds_keeps_score() {
        let mut state = GameState::new(Settings::default(), 1);
        state.player.position = Vec2::new(-500.0, 50.0);
        assert!(state.fire().is_err());
        assert_eq!(state.score, 10);
        assert!(state.shots.is_empty());
    }

    #[test]
    fn test_compact_removes_marked_once() {
        let mut state = GameState::new(Settings::default(), 1);
        state.rows[1].balloons[2].marked = true;
        let body = state.rows[1].balloons[2].body;

        assert_eq!(state.compact(), 1);
        assert_eq!(state.rows[1].balloons.len(), 7);
        assert!(state.world.get(body).is_err());
        assert_eq!(state.compact(), 0);
    }

    #[test]
    fn test_losing_all_lives_ends_game() {
        let mut state = GameState::new(Settings::default(), 1);
        state.score = 40;
        state.lose_life();
        state.lose_life();
        assert_eq!(state.phase, GamePhase::Playing);
        state.lose_life();
        assert_eq!(state.phase, GamePhase::GameOver);
        state.lose_life();

        let events = state.drain_events();
        assert_eq!(
            events,
            vec![
                GameEvent::PlayerEliminated { lives_left: 2 },
                GameEvent::PlayerEliminated { lives_left: 1 },
                GameEvent::PlayerEliminated { lives_left: 0 },
                GameEvent::GameOver { score: 40 },
            ]
        );
    }

    #[test]
    fn test_undrained_events_are_capped() {
        let mut state = GameState::new(Settings::default(), 1);
        for i in 0..(MAX_PENDING_EVENTS as u32 + 10) {
            state.push_event(GameEvent::ShotFired { shot: EntityId(i) });
        }
        assert_eq!(state.pending_events(), MAX_PENDING_EVENTS);

        // Oldest events are the ones dropped
        let events = state.drain_events();
        assert_eq!(events.first(), Some(&GameEvent::ShotFired { shot: EntityId(10) }));
        assert_eq!(state.pending_events(), 0);
    }
}
