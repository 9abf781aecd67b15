//! Game tuning
//!
//! Every number the simulation reads comes from here. Defaults mirror
//! [`crate::consts`]; a JSON file can override any subset of fields.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::consts::*;

/// Tunable game parameters
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    // === World ===
    pub screen_width: f32,
    pub screen_height: f32,
    /// How far outside the screen a body may be spawned
    pub spawn_margin: f32,

    // === Player ===
    pub player_lives: u8,
    pub player_speed: f32,
    pub player_start: Vec2,
    pub player_width: f32,
    pub player_height: f32,

    // === Shots ===
    pub shot_speed: f32,
    pub shot_angle_deg: f32,
    pub shot_life: u32,
    pub shot_gravity: Vec2,
    pub shot_elasticity: f32,
    pub shot_width: f32,
    pub shot_height: f32,
    pub fire_score: u64,

    // === Balloons ===
    pub balloon_speed: f32,
    pub balloon_rows: u32,
    pub balloons_per_row: u32,
    pub balloon_width: f32,
    pub balloon_height: f32,
    pub balloon_elasticity: f32,

    // === Walls ===
    pub wall_thickness: f32,
    pub wall_elasticity: f32,

    // === Effects ===
    pub burst_particles: u32,
    pub burst_speed: (f32, f32),
    pub burst_lifetime: (f32, f32),
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            screen_width: SCREEN_WIDTH,
            screen_height: SCREEN_HEIGHT,
            spawn_margin: BALLOON_WIDTH,

            player_lives: PLAYER_LIVES,
            player_speed: PLAYER_SPEED_X,
            player_start: Vec2::new(PLAYER_START_X, PLAYER_START_Y),
            player_width: PLAYER_WIDTH,
            player_height: PLAYER_HEIGHT,

            shot_speed: SHOT_SPEED,
            shot_angle_deg: SHOT_ANGLE_DEG,
            shot_life: SHOT_LIFE,
            shot_gravity: Vec2::new(0.0, SHOT_GRAVITY),
            shot_elasticity: SHOT_ELASTICITY,
            shot_width: SHOT_WIDTH,
            shot_height: SHOT_HEIGHT,
            fire_score: FIRE_SCORE,

            balloon_speed: BALLOON_SPEED,
            balloon_rows: BALLOON_ROWS,
            balloons_per_row: BALLOON_IN_ROW,
            balloon_width: BALLOON_WIDTH,
            balloon_height: BALLOON_HEIGHT,
            balloon_elasticity: BALLOON_ELASTICITY,

            wall_thickness: WALL_THICKNESS,
            wall_elasticity: WALL_ELASTICITY,

            burst_particles: BURST_PARTICLES,
            burst_speed: (BURST_SPEED_MIN, BURST_SPEED_MAX),
            burst_lifetime: (BURST_LIFETIME_MIN, BURST_LIFETIME_MAX),
        }
    }
}

impl Settings {
    /// Parse settings from JSON; missing fields keep their defaults
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        let settings: Settings = serde_json::from_str(json)?;
        log::info!(
            "Loaded settings ({}x{} screen, {} balloon rows)",
            settings.screen_width,
            settings.screen_height,
            settings.balloon_rows
        );
        Ok(settings)
    }

    /// Serialize settings to pretty JSON
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    /// Balloon wrap bounds: (min_x, max_x) for a balloon's center
    pub fn balloon_wrap_bounds(&self) -> (f32, f32) {
        let half = self.balloon_width / 2.0;
        (-half, self.screen_width + half)
    }

    /// Lower-left and upper-right corners of the area bodies may spawn in
    pub fn spawn_bounds(&self) -> (Vec2, Vec2) {
        let margin = Vec2::splat(self.spawn_margin);
        (
            Vec2::ZERO - margin,
            Vec2::new(self.screen_width, self.screen_height) + margin,
        )
    }
}
