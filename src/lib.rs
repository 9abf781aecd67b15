//! Balloon Burst - a small arcade shooter
//!
//! Core modules:
//! - `sim`: Deterministic simulation (bodies, collisions, behaviors, game loop)
//! - `settings`: Data-driven game tuning
//!
//! Rendering, windowing and input devices live outside this crate. The
//! surrounding application feeds a [`sim::TickInput`] snapshot each frame,
//! reads entity positions back out, and drains [`sim::GameEvent`]s.

pub mod settings;
pub mod sim;

pub use settings::Settings;

use glam::Vec2;

/// Game configuration constants
pub mod consts {
    /// Fixed simulation timestep (60 Hz, matching the display rate)
    pub const SIM_DT: f32 = 1.0 / 60.0;

    /// Screen dimensions
    pub const SCREEN_WIDTH: f32 = 800.0;
    pub const SCREEN_HEIGHT: f32 = 600.0;

    /// Player defaults
    pub const PLAYER_LIVES: u8 = 3;
    pub const PLAYER_SPEED_X: f32 = 200.0;
    pub const PLAYER_START_X: f32 = SCREEN_WIDTH / 2.0;
    pub const PLAYER_START_Y: f32 = 50.0;
    /// Ship sprite is 99x75, drawn at half scale
    pub const PLAYER_WIDTH: f32 = 49.5;
    pub const PLAYER_HEIGHT: f32 = 37.5;

    /// Shot defaults
    pub const SHOT_SPEED: f32 = 300.0;
    /// Launch angle in degrees (0 = +x, 90 = straight up)
    pub const SHOT_ANGLE_DEG: f32 = 90.0;
    /// Wall hits a shot survives before it despawns
    pub const SHOT_LIFE: u32 = 3;
    pub const SHOT_GRAVITY: f32 = -100.0;
    pub const SHOT_ELASTICITY: f32 = 0.9;
    /// Laser sprite is 9x54, drawn at half scale
    pub const SHOT_WIDTH: f32 = 4.5;
    pub const SHOT_HEIGHT: f32 = 27.0;
    /// Points granted per shot fired
    pub const FIRE_SCORE: u64 = 10;

    /// Balloon defaults
    pub const BALLOON_SPEED: f32 = 100.0;
    pub const BALLOON_ROWS: u32 = 2;
    pub const BALLOON_IN_ROW: u32 = 8;
    pub const BALLOON_WIDTH: f32 = 45.0;
    pub const BALLOON_HEIGHT: f32 = 45.0;
    pub const BALLOON_ELASTICITY: f32 = 1.0;

    /// Wall defaults (one at the top and one at the bottom of the screen)
    pub const WALL_THICKNESS: f32 = 20.0;
    pub const WALL_ELASTICITY: f32 = 1.0;

    /// Balloon pop burst
    pub const BURST_PARTICLES: u32 = 15;
    pub const BURST_SPEED_MIN: f32 = 90.0;
    pub const BURST_SPEED_MAX: f32 = 150.0;
    pub const BURST_LIFETIME_MIN: f32 = 0.4;
    pub const BURST_LIFETIME_MAX: f32 = 2.0;
}

/// Components smaller than this are rounding noise from the trig functions
const DIRECTION_EPSILON: f32 = 1e-6;

/// Unit vector for an angle given in degrees (0 = +x axis, counter-clockwise)
///
/// Axis-aligned angles come out exact: 90 degrees is `(0, 1)`.
pub fn direction_from_degrees(degrees: f32) -> Vec2 {
    let dir = Vec2::from_angle(degrees.to_radians());
    let snap = |c: f32| if c.abs() < DIRECTION_EPSILON { 0.0 } else { c };
    Vec2::new(snap(dir.x), snap(dir.y))
}

/// Decompose a speed along a launch angle into a velocity
#[inline]
pub fn launch_velocity(speed: f32, degrees: f32) -> Vec2 {
    direction_from_degrees(degrees) * speed
}
