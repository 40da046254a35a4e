//! Object spawner
//!
//! Picks a uniformly random lane from a seeded RNG so a session replays
//! identically for the same seed.

use rand::Rng;
use rand::SeedableRng;
use rand_pcg::Pcg32;

use super::falling::{FallAnimator, FallingObject, ObjectKind};
use crate::settings::{SpawnIntervals, SpeedSetting};

#[derive(Debug, Clone)]
pub struct Spawner {
    rng: Pcg32,
    lane_count: usize,
    intervals: SpawnIntervals,
}

impl Spawner {
    pub fn new(seed: u64, lane_count: usize, speed: SpeedSetting) -> Self {
        Self {
            rng: Pcg32::seed_from_u64(seed),
            lane_count: lane_count.max(1),
            intervals: speed.intervals(),
        }
    }

    pub fn intervals(&self) -> SpawnIntervals {
        self.intervals
    }

    /// Spawn period for `kind` (ms)
    pub fn interval(&self, kind: ObjectKind) -> u64 {
        match kind {
            ObjectKind::Obstacle => self.intervals.obstacle_ms,
            ObjectKind::Coin => self.intervals.coin_ms,
        }
    }

    /// Switch intervals. Returns true if they changed.
    pub fn set_speed(&mut self, speed: SpeedSetting) -> bool {
        let intervals = speed.intervals();
        let changed = intervals != self.intervals;
        self.intervals = intervals;
        changed
    }

    /// Create one object of `kind` at a random lane
    pub fn tick<'a>(
        &mut self,
        kind: ObjectKind,
        now_ms: u64,
        animator: &'a mut FallAnimator,
    ) -> &'a FallingObject {
        let lane = self.rng.random_range(0..self.lane_count);
        animator.spawn(kind, lane, now_ms)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lanes_in_range_and_all_used() {
        let mut spawner = Spawner::new(7, 5, SpeedSetting::Slow);
        let mut animator = FallAnimator::new(4000);
        let mut seen = [0u32; 5];

        for i in 0..500 {
            let lane = spawner.tick(ObjectKind::Obstacle, i, &mut animator).lane;
            assert!(lane < 5);
            seen[lane] += 1;
        }
        assert!(seen.iter().all(|&n| n > 50), "lane spread: {:?}", seen);
        assert_eq!(animator.len(), 500);
    }

    #[test]
    fn test_same_seed_same_lanes() {
        let lanes = |seed| {
            let mut spawner = Spawner::new(seed, 5, SpeedSetting::Slow);
            let mut animator = FallAnimator::new(4000);
            (0..20)
                .map(|i| spawner.tick(ObjectKind::Coin, i, &mut animator).lane)
                .collect::<Vec<_>>()
        };
        assert_eq!(lanes(123), lanes(123));
    }

    #[test]
    fn test_speed_switch() {
        let mut spawner = Spawner::new(0, 5, SpeedSetting::Slow);
        assert_eq!(spawner.interval(ObjectKind::Obstacle), 1500);
        assert!(spawner.set_speed(SpeedSetting::Fast));
        assert!(!spawner.set_speed(SpeedSetting::Fast));
        assert_eq!(spawner.interval(ObjectKind::Obstacle), 800);
        assert_eq!(spawner.interval(ObjectKind::Coin), 1200);
    }
}
