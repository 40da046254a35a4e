//! Lane Dodger - A lane-based falling-object arcade game core
//!
//! Core modules:
//! - `sim`: Timer-driven simulation (spawning, falling, collisions, game state)
//! - `highscores`: Per-variant top-10 leaderboard
//! - `settings`: Launch options and data-driven game configuration
//! - `error`: Configuration errors

pub mod error;
pub mod highscores;
pub mod settings;
pub mod sim;

pub use error::ConfigError;
pub use highscores::{Leaderboard, Score};
pub use settings::{ControlMode, GameConfig, LaunchOptions, SpeedSetting};
pub use sim::{GameEvent, Input, Session};

/// Game configuration constants
pub mod consts {
    /// Number of lanes the ship and falling objects occupy
    pub const LANE_COUNT: usize = 5;
    /// Lives at the start of every game
    pub const START_LIVES: u8 = 3;

    /// Time for an object to fall from top to bottom (ms)
    pub const FALL_DURATION_MS: u64 = 4000;
    /// Fall animation step (ms)
    pub const ANIMATION_STEP_MS: u64 = 30;
    /// Distance counter period (ms)
    pub const DISTANCE_STEP_MS: u64 = 1000;
    /// Distance added every distance step
    pub const DISTANCE_PER_STEP: u32 = 100;

    /// Spawn intervals (ms)
    pub const OBSTACLE_INTERVAL_SLOW_MS: u64 = 1500;
    pub const OBSTACLE_INTERVAL_FAST_MS: u64 = 800;
    pub const COIN_INTERVAL_SLOW_MS: u64 = 2000;
    pub const COIN_INTERVAL_FAST_MS: u64 = 1200;

    /// Playfield defaults (pixels, portrait phone)
    pub const FIELD_WIDTH: f32 = 1080.0;
    pub const FIELD_HEIGHT: f32 = 1920.0;
    pub const OBJECT_SIZE: f32 = 300.0;
    pub const SHIP_WIDTH: f32 = 200.0;
    pub const SHIP_HEIGHT: f32 = 200.0;
    /// Gap between the ship's bottom edge and the bottom of the field
    pub const SHIP_BOTTOM_MARGIN: f32 = 100.0;
    /// Fraction of the ship size two centers must be within to collide
    pub const COLLISION_FACTOR: f32 = 0.6;

    /// Tilt magnitude (x axis) that triggers a lane change
    pub const TILT_THRESHOLD_X: f32 = 5.0;
    /// Tilt magnitude (x axis) below which tilt moves are re-armed
    pub const TILT_RESET_THRESHOLD_X: f32 = 2.0;
    /// Tilt magnitude (y axis) that switches spawn speed
    pub const TILT_SPEED_THRESHOLD_Y: f32 = 3.0;
}

/// Horizontal center of a lane in a field of the given width
#[inline]
pub fn lane_center_x(lane: usize, lane_count: usize, field_width: f32) -> f32 {
    let lane_width = field_width / lane_count.max(1) as f32;
    lane as f32 * lane_width + lane_width / 2.0
}
