//! Demo autopilot
//!
//! Plays a session on its own: sidesteps obstacles that are about to reach the
//! ship and drifts toward coins when nothing is threatening. Each threatening
//! obstacle gets one roll against `skill`, so a skill below 1.0 eventually
//! loses games.

use std::collections::HashMap;

use rand::Rng;
use rand::SeedableRng;
use rand_pcg::Pcg32;

use super::falling::{FallingObject, ObjectKind};
use super::lane::LaneDirection;
use super::tick::{Input, Session};
use crate::settings::ControlMode;

/// Progress window in which an obstacle counts as a threat
const THREAT_WINDOW: (f32, f32) = (0.45, 0.92);
/// Progress window in which an obstacle can actually hit the ship
const IMPACT_WINDOW: (f32, f32) = (0.65, 0.92);
/// Coins further down than this are out of reach
const COIN_REACH: f32 = 0.7;

pub struct Autopilot {
    rng: Pcg32,
    skill: f32,
    /// Obstacle id -> whether we decided to dodge it
    judged: HashMap<u32, bool>,
}

impl Autopilot {
    pub fn new(seed: u64, skill: f32) -> Self {
        Self {
            rng: Pcg32::seed_from_u64(seed),
            skill: skill.clamp(0.0, 1.0),
            judged: HashMap::new(),
        }
    }

    /// Pick a lane step for the current frame, if any
    pub fn decide(&mut self, session: &Session) -> Option<LaneDirection> {
        let objects = session.objects();
        self.judged.retain(|id, _| objects.iter().any(|o| o.id == *id));

        let lane = session.state().lane();
        let lane_count = session.config().lane_count;
        let safe = |l: usize| !objects.iter().any(|o| is_threat(o) && o.lane == l);

        let threats: Vec<u32> = objects
            .iter()
            .filter(|o| is_threat(o) && o.lane == lane)
            .map(|o| o.id)
            .collect();

        if !threats.is_empty() {
            let mut dodge = false;
            for id in threats {
                let skill = self.skill;
                let rng = &mut self.rng;
                dodge |= *self.judged.entry(id).or_insert_with(|| rng.random::<f32>() < skill);
            }
            if !dodge {
                return None;
            }

            let coin_in = |l: usize| {
                objects
                    .iter()
                    .any(|o| o.kind == ObjectKind::Coin && o.lane == l && o.progress < COIN_REACH)
            };
            // Nearest safe lane we can slide to without crossing an impact
            let target = (0..lane_count)
                .filter(|&l| l != lane && safe(l))
                .filter(|&l| {
                    let (lo, hi) = if l < lane { (l, lane) } else { (lane + 1, l + 1) };
                    (lo..hi).all(|p| passable(objects, p))
                })
                .min_by_key(|&l| (l.abs_diff(lane), !coin_in(l)))?;

            return Some(if target < lane {
                LaneDirection::Left
            } else {
                LaneDirection::Right
            });
        }

        // Nothing incoming: chase the lowest reachable coin
        let target = objects
            .iter()
            .filter(|o| o.kind == ObjectKind::Coin && o.progress < COIN_REACH)
            .max_by(|a, b| {
                a.progress
                    .partial_cmp(&b.progress)
                    .unwrap_or(std::cmp::Ordering::Equal)
            })?;

        let direction = if target.lane < lane {
            LaneDirection::Left
        } else if target.lane > lane {
            LaneDirection::Right
        } else {
            return None;
        };
        let next = (lane as i32 + direction.delta()) as usize;
        safe(next).then_some(direction)
    }

    /// Inputs that carry out a lane step in the given control mode
    pub fn inputs_for(mode: ControlMode, direction: LaneDirection) -> Vec<Input> {
        match mode {
            ControlMode::Buttons => vec![match direction {
                LaneDirection::Left => Input::MoveLeft,
                LaneDirection::Right => Input::MoveRight,
            }],
            // Tilt past the threshold, then level out to re-arm
            ControlMode::Sensors => vec![
                Input::Tilt {
                    x: direction.delta() as f32 * 6.0,
                    y: 0.0,
                },
                Input::Tilt { x: 0.0, y: 0.0 },
            ],
        }
    }
}

/// No obstacle in `lane` is about to hit
fn passable(objects: &[FallingObject], lane: usize) -> bool {
    !objects.iter().any(|o| {
        o.kind == ObjectKind::Obstacle
            && o.lane == lane
            && o.progress >= IMPACT_WINDOW.0
            && o.progress <= IMPACT_WINDOW.1
    })
}

fn is_threat(object: &FallingObject) -> bool {
    object.kind == ObjectKind::Obstacle
        && object.progress >= THREAT_WINDOW.0
        && object.progress <= THREAT_WINDOW.1
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::highscores::Leaderboard;
    use crate::settings::{GameConfig, LaunchOptions, SpeedSetting};
    use crate::sim::GameEvent;

    fn play(mode: ControlMode, skill: f32, ms: u64) -> Session {
        let mut session = Session::new(
            GameConfig::default().with_seed(2024),
            LaunchOptions::new(mode, SpeedSetting::Fast),
            Leaderboard::new(),
        );
        let mut pilot = Autopilot::new(7, skill);
        let mut t = 0;
        while t < ms {
            if let Some(direction) = pilot.decide(&session) {
                for input in Autopilot::inputs_for(session.mode(), direction) {
                    session.handle(input);
                }
            }
            session.advance(30);
            t += 30;
        }
        session
    }

    fn lives_lost(session: &Session) -> usize {
        session
            .events()
            .iter()
            .filter(|e| matches!(e, GameEvent::LifeLost { .. }))
            .count()
    }

    #[test]
    fn test_skilled_pilot_outlasts_blind_pilot() {
        let skilled = play(ControlMode::Buttons, 1.0, 60_000);
        let blind = play(ControlMode::Buttons, 0.0, 60_000);
        assert!(lives_lost(&skilled) < lives_lost(&blind));
    }

    #[test]
    fn test_blind_pilot_loses() {
        let session = play(ControlMode::Sensors, 0.0, 120_000);
        assert!(
            session
                .events()
                .iter()
                .any(|e| matches!(e, GameEvent::GameOver { .. }))
        );
        assert!(session.leaderboard().variant_len("sensors") > 0);
    }

    #[test]
    fn test_sensor_inputs_rearm_tilt() {
        let inputs = Autopilot::inputs_for(ControlMode::Sensors, LaneDirection::Left);
        assert_eq!(
            inputs,
            vec![Input::Tilt { x: -6.0, y: 0.0 }, Input::Tilt { x: 0.0, y: 0.0 }]
        );
    }
}
