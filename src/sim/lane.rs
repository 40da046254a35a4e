//! Lane model for the player's ship

use serde::{Deserialize, Serialize};

use crate::lane_center_x;

/// Direction of a single lane step
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum LaneDirection {
    Left,
    Right,
}

impl LaneDirection {
    pub fn delta(&self) -> i32 {
        match self {
            LaneDirection::Left => -1,
            LaneDirection::Right => 1,
        }
    }
}

/// Current lane of the ship, always within `[0, lane_count)`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LaneModel {
    lane: usize,
    lane_count: usize,
}

impl LaneModel {
    /// Start in the middle lane
    pub fn new(lane_count: usize) -> Self {
        let lane_count = lane_count.max(1);
        Self {
            lane: lane_count / 2,
            lane_count,
        }
    }

    pub fn lane(&self) -> usize {
        self.lane
    }

    pub fn lane_count(&self) -> usize {
        self.lane_count
    }

    /// Move by `delta` lanes, clamped to the field. No wraparound.
    /// Returns true if the lane changed.
    pub fn move_lane(&mut self, delta: i32) -> bool {
        let max = (self.lane_count - 1) as i64;
        let target = (self.lane as i64 + delta as i64).clamp(0, max) as usize;
        let changed = target != self.lane;
        self.lane = target;
        changed
    }

    pub fn step(&mut self, direction: LaneDirection) -> bool {
        self.move_lane(direction.delta())
    }

    /// Whether a step in `direction` would stay on the field
    pub fn can_step(&self, direction: LaneDirection) -> bool {
        match direction {
            LaneDirection::Left => self.lane > 0,
            LaneDirection::Right => self.lane + 1 < self.lane_count,
        }
    }

    /// Back to the middle lane. Returns true if the lane changed.
    pub fn reset(&mut self) -> bool {
        let center = self.lane_count / 2;
        let changed = center != self.lane;
        self.lane = center;
        changed
    }

    /// Horizontal center of the current lane
    pub fn center_x(&self, field_width: f32) -> f32 {
        lane_center_x(self.lane, self.lane_count, field_width)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_starts_centered() {
        assert_eq!(LaneModel::new(5).lane(), 2);
        assert_eq!(LaneModel::new(4).lane(), 2);
        assert_eq!(LaneModel::new(1).lane(), 0);
    }

    #[test]
    fn test_no_wraparound() {
        let mut lanes = LaneModel::new(5);
        assert!(lanes.move_lane(-1));
        assert!(lanes.move_lane(-1));
        assert_eq!(lanes.lane(), 0);
        assert!(!lanes.step(LaneDirection::Left));
        assert_eq!(lanes.lane(), 0);

        assert!(lanes.move_lane(10));
        assert_eq!(lanes.lane(), 4);
        assert!(!lanes.step(LaneDirection::Right));
        assert!(!lanes.can_step(LaneDirection::Right));
        assert!(lanes.can_step(LaneDirection::Left));
    }

    #[test]
    fn test_center_x() {
        let mut lanes = LaneModel::new(5);
        assert!((lanes.center_x(1000.0) - 500.0).abs() < 0.001);
        lanes.move_lane(-2);
        assert!((lanes.center_x(1000.0) - 100.0).abs() < 0.001);
    }

    proptest! {
        #[test]
        fn prop_move_lane_stays_in_bounds(
            lane_count in 1usize..12,
            deltas in proptest::collection::vec(-20i32..20, 0..50)
        ) {
            let mut lanes = LaneModel::new(lane_count);
            for delta in deltas {
                let before = lanes.lane() as i64;
                lanes.move_lane(delta);
                prop_assert!(lanes.lane() < lane_count);
                let expected = (before + delta as i64).clamp(0, lane_count as i64 - 1);
                prop_assert_eq!(lanes.lane() as i64, expected);
            }
        }
    }
}
