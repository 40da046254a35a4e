//! Launch options and game configuration
//!
//! Launch options pick the control mode and spawn speed; `GameConfig` holds
//! the data-driven timings and playfield geometry.

use serde::{Deserialize, Serialize};

use crate::consts::*;
use crate::error::ConfigError;

/// How the player steers the ship
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum ControlMode {
    /// On-screen left/right buttons
    #[default]
    Buttons,
    /// Device tilt
    Sensors,
}

impl ControlMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            ControlMode::Buttons => "buttons",
            ControlMode::Sensors => "sensors",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "buttons" | "button" => Some(ControlMode::Buttons),
            "sensors" | "sensor" | "tilt" => Some(ControlMode::Sensors),
            _ => None,
        }
    }
}

/// Spawn speed preset
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum SpeedSetting {
    #[default]
    Slow,
    Fast,
}

impl SpeedSetting {
    pub fn as_str(&self) -> &'static str {
        match self {
            SpeedSetting::Slow => "slow",
            SpeedSetting::Fast => "fast",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "slow" => Some(SpeedSetting::Slow),
            "fast" => Some(SpeedSetting::Fast),
            _ => None,
        }
    }

    /// Spawn intervals for this preset
    pub fn intervals(&self) -> SpawnIntervals {
        match self {
            SpeedSetting::Slow => SpawnIntervals {
                obstacle_ms: OBSTACLE_INTERVAL_SLOW_MS,
                coin_ms: COIN_INTERVAL_SLOW_MS,
            },
            SpeedSetting::Fast => SpawnIntervals {
                obstacle_ms: OBSTACLE_INTERVAL_FAST_MS,
                coin_ms: COIN_INTERVAL_FAST_MS,
            },
        }
    }
}

/// Time between spawns for each object kind
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SpawnIntervals {
    pub obstacle_ms: u64,
    pub coin_ms: u64,
}

/// Options chosen on the launch screen
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct LaunchOptions {
    pub mode: ControlMode,
    pub speed: SpeedSetting,
}

impl LaunchOptions {
    pub fn new(mode: ControlMode, speed: SpeedSetting) -> Self {
        Self { mode, speed }
    }

    /// Build from raw launch strings, falling back to buttons/slow
    pub fn from_strs(mode: Option<&str>, speed: Option<&str>) -> Self {
        let mode = mode.and_then(ControlMode::from_str).unwrap_or_default();
        let speed = speed.and_then(SpeedSetting::from_str).unwrap_or_default();
        Self { mode, speed }
    }

    /// Leaderboard key for this variant.
    ///
    /// Sensor mode is a single variant regardless of speed.
    pub fn variant_key(&self) -> String {
        match self.mode {
            ControlMode::Buttons => format!("buttons_{}", self.speed.as_str()),
            ControlMode::Sensors => ControlMode::Sensors.as_str().to_string(),
        }
    }
}

/// Playfield and sprite dimensions (pixels)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Playfield {
    pub width: f32,
    pub height: f32,
    /// Falling objects are square
    pub object_size: f32,
    pub ship_width: f32,
    pub ship_height: f32,
    pub ship_bottom_margin: f32,
}

impl Default for Playfield {
    fn default() -> Self {
        Self {
            width: FIELD_WIDTH,
            height: FIELD_HEIGHT,
            object_size: OBJECT_SIZE,
            ship_width: SHIP_WIDTH,
            ship_height: SHIP_HEIGHT,
            ship_bottom_margin: SHIP_BOTTOM_MARGIN,
        }
    }
}

/// Tilt thresholds
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TiltConfig {
    pub threshold_x: f32,
    pub reset_threshold_x: f32,
    pub speed_threshold_y: f32,
}

impl Default for TiltConfig {
    fn default() -> Self {
        Self {
            threshold_x: TILT_THRESHOLD_X,
            reset_threshold_x: TILT_RESET_THRESHOLD_X,
            speed_threshold_y: TILT_SPEED_THRESHOLD_Y,
        }
    }
}

/// Game configuration (data-driven timings and geometry)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    pub lane_count: usize,
    pub starting_lives: u8,
    pub fall_duration_ms: u64,
    pub animation_step_ms: u64,
    pub distance_step_ms: u64,
    pub distance_per_step: u32,
    pub playfield: Playfield,
    pub tilt: TiltConfig,
    /// Seed for lane selection
    pub seed: u64,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            lane_count: LANE_COUNT,
            starting_lives: START_LIVES,
            fall_duration_ms: FALL_DURATION_MS,
            animation_step_ms: ANIMATION_STEP_MS,
            distance_step_ms: DISTANCE_STEP_MS,
            distance_per_step: DISTANCE_PER_STEP,
            playfield: Playfield::default(),
            tilt: TiltConfig::default(),
            seed: 0,
        }
    }
}

impl GameConfig {
    /// Parse and validate a JSON config. Missing fields take their defaults.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: GameConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn to_json(&self) -> Result<String, ConfigError> {
        serde_json::to_string_pretty(self).map_err(|source| ConfigError::Serialize { source })
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.lane_count == 0 {
            return Err(ConfigError::invalid("lane_count", "must be at least 1"));
        }
        if self.starting_lives == 0 {
            return Err(ConfigError::invalid("starting_lives", "must be at least 1"));
        }
        for (field, value) in [
            ("fall_duration_ms", self.fall_duration_ms),
            ("animation_step_ms", self.animation_step_ms),
            ("distance_step_ms", self.distance_step_ms),
        ] {
            if value == 0 {
                return Err(ConfigError::invalid(field, "must be greater than zero"));
            }
        }
        if self.distance_per_step == 0 {
            return Err(ConfigError::invalid("distance_per_step", "must be greater than zero"));
        }

        let field = &self.playfield;
        for (name, value) in [
            ("playfield.width", field.width),
            ("playfield.height", field.height),
            ("playfield.object_size", field.object_size),
            ("playfield.ship_width", field.ship_width),
            ("playfield.ship_height", field.ship_height),
        ] {
            if !(value.is_finite() && value > 0.0) {
                return Err(ConfigError::invalid(name, format!("must be positive, got {}", value)));
            }
        }
        if !(field.ship_bottom_margin.is_finite() && field.ship_bottom_margin >= 0.0) {
            return Err(ConfigError::invalid(
                "playfield.ship_bottom_margin",
                format!("must be zero or more, got {}", field.ship_bottom_margin),
            ));
        }

        for (name, value) in [
            ("tilt.threshold_x", self.tilt.threshold_x),
            ("tilt.reset_threshold_x", self.tilt.reset_threshold_x),
            ("tilt.speed_threshold_y", self.tilt.speed_threshold_y),
        ] {
            if !(value.is_finite() && value > 0.0) {
                return Err(ConfigError::invalid(name, format!("must be positive, got {}", value)));
            }
        }
        if self.tilt.reset_threshold_x >= self.tilt.threshold_x {
            return Err(ConfigError::invalid(
                "tilt.reset_threshold_x",
                "must be below tilt.threshold_x",
            ));
        }
        Ok(())
    }

    /// Seconds survived for a distance counter value
    pub fn seconds_for_distance(&self, distance: u32) -> u32 {
        let steps = distance / self.distance_per_step.max(1);
        (steps as u64 * self.distance_step_ms / 1000) as u32
    }
}
