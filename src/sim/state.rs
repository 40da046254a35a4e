//! Game state and the events the simulation reports
//!
//! `GameState` is the per-session scoreboard: lane, lives, coins, distance and
//! the pause flag. It knows nothing about timers or falling objects.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::falling::{ObjectKind, RemovalReason};
use super::lane::LaneModel;
use crate::highscores::Score;
use crate::settings::SpeedSetting;

/// Something the UI should react to
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum GameEvent {
    /// Ship moved to a new lane
    LaneChanged { lane: usize },
    /// A new object appeared (position is the box center)
    ObjectSpawned {
        id: u32,
        kind: ObjectKind,
        lane: usize,
        position: Vec2,
    },
    /// An object left the field
    ObjectRemoved {
        id: u32,
        kind: ObjectKind,
        position: Vec2,
        reason: RemovalReason,
    },
    /// An obstacle hit the ship
    LifeLost { remaining: u8 },
    /// A coin hit the ship
    CoinCollected { total: u32 },
    /// Distance counter ticked
    DistanceUpdated { distance: u32 },
    /// Spawn speed switched (tilt)
    SpeedChanged { speed: SpeedSetting },
    Paused,
    Resumed,
    /// Last life lost. State has been reset to a fresh game.
    GameOver {
        score: Score,
        variant: String,
        /// Leaderboard rank achieved (1-indexed), None if it didn't place
        rank: Option<usize>,
    },
}

/// Result of an obstacle hit
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HitOutcome {
    /// Lives left after the hit
    Survived { remaining: u8 },
    /// No lives left; carries the coins and distance of the finished game
    GameOver { coins: u32, distance: u32 },
}

/// Mutable per-session game state
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GameState {
    pub lanes: LaneModel,
    pub lives: u8,
    pub coins: u32,
    pub distance: u32,
    pub paused: bool,
    starting_lives: u8,
}

impl GameState {
    pub fn new(lane_count: usize, starting_lives: u8) -> Self {
        let starting_lives = starting_lives.max(1);
        Self {
            lanes: LaneModel::new(lane_count),
            lives: starting_lives,
            coins: 0,
            distance: 0,
            paused: false,
            starting_lives,
        }
    }

    pub fn lane(&self) -> usize {
        self.lanes.lane()
    }

    pub fn starting_lives(&self) -> u8 {
        self.starting_lives
    }

    /// Take one life. At zero the finished game's totals are returned and
    /// the state is reset.
    pub fn apply_obstacle_hit(&mut self) -> HitOutcome {
        self.lives = self.lives.saturating_sub(1);
        if self.lives > 0 {
            return HitOutcome::Survived {
                remaining: self.lives,
            };
        }

        let outcome = HitOutcome::GameOver {
            coins: self.coins,
            distance: self.distance,
        };
        self.reset();
        outcome
    }

    /// Returns the new coin total
    pub fn collect_coin(&mut self) -> u32 {
        self.coins += 1;
        self.coins
    }

    /// Returns the new distance
    pub fn add_distance(&mut self, amount: u32) -> u32 {
        self.distance = self.distance.saturating_add(amount);
        self.distance
    }

    /// Back to a fresh game: full lives, no coins or distance, middle lane.
    /// The pause flag is left alone.
    pub fn reset(&mut self) {
        self.lives = self.starting_lives;
        self.coins = 0;
        self.distance = 0;
        self.lanes.reset();
    }
}
