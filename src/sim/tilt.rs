//! Tilt steering with hysteresis
//!
//! A tilt past the x threshold moves the ship one lane, then further tilt moves
//! are ignored until the device comes back near level (below the reset
//! threshold). The y axis switches spawn speed.

use serde::{Deserialize, Serialize};

use super::lane::{LaneDirection, LaneModel};
use crate::settings::{SpeedSetting, TiltConfig};

/// What a single tilt sample did
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct TiltOutcome {
    /// Lane step taken, if any
    pub moved: Option<LaneDirection>,
    /// Speed requested by the y axis, if past its threshold
    pub speed: Option<SpeedSetting>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TiltControl {
    config: TiltConfig,
    /// False after a tilt move until the device returns near level
    armed: bool,
}

impl TiltControl {
    pub fn new(config: TiltConfig) -> Self {
        Self {
            config,
            armed: true,
        }
    }

    pub fn is_armed(&self) -> bool {
        self.armed
    }

    /// Feed one accelerometer sample. Positive x steers right.
    pub fn sample(&mut self, x: f32, y: f32, lanes: &mut LaneModel) -> TiltOutcome {
        let mut outcome = TiltOutcome::default();

        if x.abs() < self.config.reset_threshold_x {
            self.armed = true;
        }

        if self.armed {
            let direction = if x > self.config.threshold_x {
                Some(LaneDirection::Right)
            } else if x < -self.config.threshold_x {
                Some(LaneDirection::Left)
            } else {
                None
            };

            // Tilting into a wall neither moves nor disarms
            if let Some(direction) = direction.filter(|d| lanes.can_step(*d)) {
                lanes.step(direction);
                self.armed = false;
                outcome.moved = Some(direction);
            }
        }

        // Forward tilt speeds up, backward tilt slows down
        if y < -self.config.speed_threshold_y {
            outcome.speed = Some(SpeedSetting::Fast);
        } else if y > self.config.speed_threshold_y {
            outcome.speed = Some(SpeedSetting::Slow);
        }

        outcome
    }
}
