//! Per-frame game loop
//!
//! One call to [`tick`] runs a full frame in a fixed order: fire, steer the
//! player, move the player, step physics and dispatch handlers, run shot
//! and balloon behaviors, drop removed entities, age particles.

use super::entities::Shot;
use super::handlers::{CollisionHandlers, register_game_handlers};
use super::state::{GameEvent, GamePhase, GameState};
use crate::Settings;

/// Input snapshot for a single frame
///
/// Built by the application from whatever devices it polls; the
/// simulation never reads hardware itself.
#[derive(Debug, Clone, Default)]
pub struct TickInput {
    pub left: bool,
    pub right: bool,
    pub up: bool,
    pub down: bool,
    /// Fire was pressed since the last frame
    pub fire: bool,
    /// Horizontal axis of a connected joystick (-1..1); overrides the keys
    pub joystick_x: Option<f32>,
    /// End the run
    pub quit: bool,
}

/// Advance the game state by one frame
pub fn tick(
    state: &mut GameState,
    handlers: &CollisionHandlers<GameState>,
    input: &TickInput,
    dt: f32,
) {
    if state.phase == GamePhase::GameOver {
        return;
    }

    if input.quit {
        state.end_game();
        return;
    }

    if !dt.is_finite() || dt < 0.0 {
        log::warn!("Skipping frame with invalid dt {dt}");
        return;
    }

    state.time_ticks += 1;

    if input.fire {
        if let Err(e) = state.fire() {
            log::warn!("Shot not spawned: {e}");
        }
    }

    // Player
    let speed = state.settings.player_speed;
    state
        .player
        .steer(input.left, input.right, input.joystick_x, speed);
    state.player.on_update(dt);

    // Physics and collision policies
    let contacts = state.world.step(dt);
    handlers.dispatch(state, &contacts);

    update_shots(state);
    wrap_balloons(state);

    state.compact();

    state.effects.update(dt);
}

/// Despawn shots above the screen and turn back shots past a side edge
fn update_shots(state: &mut GameState) {
    let screen_width = state.settings.screen_width;
    let mut left_screen = Vec::new();

    for shot in state.shots.iter_mut().filter(|s| !s.marked) {
        let (position, velocity) = match state.world.get(shot.body) {
            Ok(body) => (body.position, body.velocity),
            Err(e) => {
                log::warn!("Shot {}: {e}", shot.id);
                continue;
            }
        };

        if shot.is_above_screen(position.y) {
            shot.marked = true;
            log::debug!("Shot {} left the screen", shot.id);
            left_screen.push(shot.id);
            continue;
        }

        if let Some(flipped) = Shot::side_flip(position, velocity, screen_width) {
            if let Err(e) = state.world.set_velocity(shot.body, flipped) {
                log::warn!("Shot {}: {e}", shot.id);
            }
        }
    }

    for shot in left_screen {
        state.push_event(GameEvent::ShotLeftScreen { shot });
    }
}

/// Move balloons that drifted past a wrap bound to the opposite side
fn wrap_balloons(state: &mut GameState) {
    let mut wrapped = Vec::new();

    for balloon in state.rows.iter().flat_map(|r| r.balloons.iter()) {
        if balloon.marked {
            continue;
        }
        let center = match state.world.get(balloon.body) {
            Ok(body) => body.position,
            Err(e) => {
                log::warn!("Balloon {}: {e}", balloon.id);
                continue;
            }
        };

        if let Some(to) = balloon.wrap(center) {
            match state.world.set_position(balloon.body, to) {
                Ok(()) => wrapped.push(GameEvent::BalloonWrapped {
                    balloon: balloon.id,
                    to,
                }),
                Err(e) => log::warn!("Balloon {}: {e}", balloon.id),
            }
        }
    }

    for event in wrapped {
        state.push_event(event);
    }
}

/// A game session: state plus the handler table registered for it
#[derive(Debug)]
pub struct Session {
    pub state: GameState,
    handlers: CollisionHandlers<GameState>,
}

impl Session {
    pub fn new(settings: Settings, seed: u64) -> Self {
        let mut handlers = CollisionHandlers::new();
        if let Err(e) = register_game_handlers(&mut handlers) {
            log::warn!("Collision handler setup: {e}");
        }
        Self {
            state: GameState::new(settings, seed),
            handlers,
        }
    }

    pub fn tick(&mut self, input: &TickInput, dt: f32) {
        tick(&mut self.state, &self.handlers, input, dt);
    }

    /// Start over with the same settings and seed; handlers stay registered
    pub fn reset(&mut self) {
        let settings = self.state.settings.clone();
        self.state = GameState::new(settings, self.state.seed);
    }

    pub fn handlers(&self) -> &CollisionHandlers<GameState> {
        &self.handlers
    }
}
