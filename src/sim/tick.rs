//! Session loop
//!
//! A `Session` owns one running game: the scheduler, spawner, fall animator,
//! tilt latch and game state, plus the leaderboard finished games are
//! recorded into. All mutation goes through two entry points: `handle` for
//! player/lifecycle input and `advance` for the passage of time.

use serde::{Deserialize, Serialize};

use super::collision::{BoundingBox, collides, object_box, ship_box};
use super::falling::{FallAnimator, FallingObject, ObjectKind, RemovalReason};
use super::lane::LaneDirection;
use super::schedule::{Scheduler, TimerHandle};
use super::spawner::Spawner;
use super::state::{GameEvent, GameState, HitOutcome};
use super::tilt::TiltControl;
use crate::highscores::{Leaderboard, Score};
use crate::settings::{ControlMode, GameConfig, LaunchOptions, SpeedSetting};

/// Input delivered by the host
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum Input {
    /// Left button (buttons mode)
    MoveLeft,
    /// Right button (buttons mode)
    MoveRight,
    /// Accelerometer sample (sensors mode)
    Tilt { x: f32, y: f32 },
    Pause,
    Resume,
    /// Last known device location, stamped onto finished scores
    LocationFix { lat: f64, lon: f64 },
}

/// Recurring work driven by the scheduler
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Task {
    Spawn(ObjectKind),
    Animate,
    Distance,
}

#[derive(Debug, Clone, Copy)]
struct Timers {
    obstacle: TimerHandle,
    coin: TimerHandle,
    animation: TimerHandle,
    distance: TimerHandle,
}

pub struct Session {
    config: GameConfig,
    launch: LaunchOptions,
    variant: String,
    speed: SpeedSetting,
    state: GameState,
    tilt: TiltControl,
    spawner: Spawner,
    animator: FallAnimator,
    clock: Scheduler<Task>,
    /// None while paused
    timers: Option<Timers>,
    leaderboard: Leaderboard,
    location: (f64, f64),
    events: Vec<GameEvent>,
}

impl Session {
    /// Start a game. Spawners fire immediately; animation and distance after
    /// their first period.
    pub fn new(config: GameConfig, launch: LaunchOptions, leaderboard: Leaderboard) -> Self {
        let variant = launch.variant_key();
        log::info!(
            "Session starting: variant={} lanes={} seed={}",
            variant,
            config.lane_count,
            config.seed
        );

        let mut session = Self {
            state: GameState::new(config.lane_count, config.starting_lives),
            tilt: TiltControl::new(config.tilt),
            spawner: Spawner::new(config.seed, config.lane_count, launch.speed),
            animator: FallAnimator::new(config.fall_duration_ms),
            clock: Scheduler::new(),
            timers: None,
            leaderboard,
            location: (0.0, 0.0),
            events: Vec::new(),
            speed: launch.speed,
            variant,
            launch,
            config,
        };
        session.arm_timers(true);
        session
    }

    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    pub fn mode(&self) -> ControlMode {
        self.launch.mode
    }

    /// Current spawn speed (may differ from the launch speed after tilting)
    pub fn speed(&self) -> SpeedSetting {
        self.speed
    }

    /// Leaderboard key finished games are recorded under
    pub fn variant(&self) -> &str {
        &self.variant
    }

    pub fn state(&self) -> &GameState {
        &self.state
    }

    pub fn objects(&self) -> &[FallingObject] {
        self.animator.objects()
    }

    pub fn now_ms(&self) -> u64 {
        self.clock.now_ms()
    }

    pub fn is_paused(&self) -> bool {
        self.state.paused
    }

    pub fn location(&self) -> (f64, f64) {
        self.location
    }

    pub fn leaderboard(&self) -> &Leaderboard {
        &self.leaderboard
    }

    /// End the session, handing the leaderboard back
    pub fn into_leaderboard(self) -> Leaderboard {
        self.leaderboard
    }

    /// Ship box in the current lane
    pub fn ship_box(&self) -> BoundingBox {
        ship_box(&self.config.playfield, self.config.lane_count, self.state.lane())
    }

    /// Box of a live object at its current progress
    pub fn object_box(&self, object: &FallingObject) -> BoundingBox {
        object_box(
            &self.config.playfield,
            self.config.lane_count,
            object.lane,
            object.progress,
        )
    }

    /// Events produced since the last drain, oldest first
    pub fn events(&self) -> &[GameEvent] {
        &self.events
    }

    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }

    /// Apply one input
    pub fn handle(&mut self, input: Input) {
        match input {
            Input::MoveLeft => self.button_move(LaneDirection::Left),
            Input::MoveRight => self.button_move(LaneDirection::Right),
            Input::Tilt { x, y } => self.tilt_sample(x, y),
            Input::Pause => self.pause(),
            Input::Resume => self.resume(),
            Input::LocationFix { lat, lon } => {
                log::debug!("Location fix: {:.5}, {:.5}", lat, lon);
                self.location = (lat, lon);
            }
        }
    }

    /// Advance session time by `dt_ms`, running every timer that comes due
    pub fn advance(&mut self, dt_ms: u64) {
        let until = self.clock.now_ms() + dt_ms;
        while let Some(task) = self.clock.pop_due(until) {
            self.run(task);
        }
        self.clock.settle(until);
    }

    /// Stop all periodic work. Objects freeze in place.
    pub fn pause(&mut self) {
        if self.state.paused {
            return;
        }
        if let Some(timers) = self.timers.take() {
            for handle in [timers.obstacle, timers.coin, timers.animation, timers.distance] {
                self.clock.cancel(handle);
            }
        }
        self.state.paused = true;
        log::info!("Paused at {}ms", self.clock.now_ms());
        self.events.push(GameEvent::Paused);
    }

    /// Re-arm periodic work with full periods. Nothing missed is replayed.
    pub fn resume(&mut self) {
        if !self.state.paused {
            return;
        }
        self.state.paused = false;
        self.arm_timers(false);
        log::info!("Resumed at {}ms", self.clock.now_ms());
        self.events.push(GameEvent::Resumed);
    }

    /// Schedule all timers. Spawners either fire right away or wait their
    /// own full interval.
    fn arm_timers(&mut self, spawn_now: bool) {
        let obstacle_ms = self.spawner.interval(ObjectKind::Obstacle);
        let coin_ms = self.spawner.interval(ObjectKind::Coin);
        let first = |interval: u64| if spawn_now { 0 } else { interval };

        let obstacle = self.clock.schedule_recurring(
            Task::Spawn(ObjectKind::Obstacle),
            obstacle_ms,
            first(obstacle_ms),
        );
        let coin = self
            .clock
            .schedule_recurring(Task::Spawn(ObjectKind::Coin), coin_ms, first(coin_ms));
        let animation = self.clock.schedule_recurring(
            Task::Animate,
            self.config.animation_step_ms,
            self.config.animation_step_ms,
        );
        let distance = self.clock.schedule_recurring(
            Task::Distance,
            self.config.distance_step_ms,
            self.config.distance_step_ms,
        );
        self.timers = Some(Timers {
            obstacle,
            coin,
            animation,
            distance,
        });
    }

    fn run(&mut self, task: Task) {
        match task {
            Task::Spawn(kind) => self.spawn(kind),
            Task::Animate => self.animate(),
            Task::Distance => {
                let distance = self.state.add_distance(self.config.distance_per_step);
                self.events.push(GameEvent::DistanceUpdated { distance });
            }
        }
    }

    fn spawn(&mut self, kind: ObjectKind) {
        let now = self.clock.now_ms();
        let object = self.spawner.tick(kind, now, &mut self.animator);
        let (id, lane) = (object.id, object.lane);
        let position = object_box(&self.config.playfield, self.config.lane_count, lane, 0.0).center;
        log::debug!("Spawned {:?} #{} in lane {} at {}ms", kind, id, lane, now);
        self.events.push(GameEvent::ObjectSpawned {
            id,
            kind,
            lane,
            position,
        });
    }

    /// Move everything down one step, then settle each object in id order.
    /// Hits are judged against the ship's lane at that moment, so a game over
    /// partway through the sweep moves the ship before later objects are
    /// checked.
    fn animate(&mut self) {
        self.animator.advance(self.config.animation_step_ms);

        let ids: Vec<u32> = self.animator.objects().iter().map(|o| o.id).collect();
        for id in ids {
            let Some(object) = self.animator.get(id) else {
                continue;
            };
            let reason = if collides(&self.object_box(object), &self.ship_box()) {
                RemovalReason::Collided
            } else if object.progress >= 1.0 {
                RemovalReason::ReachedBottom
            } else {
                continue;
            };
            let Some(object) = self.animator.remove(id) else {
                continue;
            };

            self.events.push(GameEvent::ObjectRemoved {
                id: object.id,
                kind: object.kind,
                position: self.object_box(&object).center,
                reason,
            });
            if reason == RemovalReason::Collided {
                self.on_collision(object.kind);
            }
        }
    }

    fn on_collision(&mut self, kind: ObjectKind) {
        match kind {
            ObjectKind::Coin => {
                let total = self.state.collect_coin();
                self.events.push(GameEvent::CoinCollected { total });
            }
            ObjectKind::Obstacle => {
                let lane_before = self.state.lane();
                match self.state.apply_obstacle_hit() {
                    HitOutcome::Survived { remaining } => {
                        log::debug!("Hit! Lives left: {}", remaining);
                        self.events.push(GameEvent::LifeLost { remaining });
                    }
                    HitOutcome::GameOver { coins, distance } => {
                        self.events.push(GameEvent::LifeLost { remaining: 0 });
                        self.game_over(coins, distance);
                        if self.state.lane() != lane_before {
                            self.lane_changed();
                        }
                    }
                }
            }
        }
    }

    fn game_over(&mut self, coins: u32, distance: u32) {
        let (lat, lon) = self.location;
        let seconds = self.config.seconds_for_distance(distance);
        let score = Score::new(coins, seconds, lat, lon);
        let rank = self.leaderboard.add_score(&self.variant, score);
        log::info!(
            "Game over: coins={} distance={} value={} rank={:?}",
            coins,
            distance,
            score.value(),
            rank
        );
        self.events.push(GameEvent::GameOver {
            score,
            variant: self.variant.clone(),
            rank,
        });
    }

    fn button_move(&mut self, direction: LaneDirection) {
        if self.launch.mode != ControlMode::Buttons || self.state.paused {
            return;
        }
        if self.state.lanes.step(direction) {
            self.lane_changed();
        }
    }

    fn tilt_sample(&mut self, x: f32, y: f32) {
        if self.launch.mode != ControlMode::Sensors || self.state.paused {
            return;
        }
        let outcome = self.tilt.sample(x, y, &mut self.state.lanes);
        if outcome.moved.is_some() {
            self.lane_changed();
        }
        if let Some(speed) = outcome.speed {
            self.set_speed(speed);
        }
    }

    /// Switch spawn intervals; pending spawns keep their due time
    pub fn set_speed(&mut self, speed: SpeedSetting) {
        if !self.spawner.set_speed(speed) {
            return;
        }
        self.speed = speed;
        if let Some(timers) = self.timers {
            self.clock
                .set_interval(timers.obstacle, self.spawner.interval(ObjectKind::Obstacle));
            self.clock
                .set_interval(timers.coin, self.spawner.interval(ObjectKind::Coin));
        }
        log::info!("Speed changed to {}", speed.as_str());
        self.events.push(GameEvent::SpeedChanged { speed });
    }

    fn lane_changed(&mut self) {
        let lane = self.state.lane();
        log::debug!("Lane -> {}", lane);
        self.events.push(GameEvent::LaneChanged { lane });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn session(mode: ControlMode) -> Session {
        Session::new(
            GameConfig::default().with_seed(12345),
            LaunchOptions::new(mode, SpeedSetting::Slow),
            Leaderboard::new(),
        )
    }

    fn count<F: Fn(&GameEvent) -> bool>(events: &[GameEvent], f: F) -> usize {
        events.iter().filter(|e| f(e)).count()
    }

    #[test]
    fn test_spawns_on_start_and_interval() {
        let mut s = session(ControlMode::Buttons);
        s.advance(0);
        let events = s.drain_events();
        assert_eq!(count(&events, |e| matches!(e, GameEvent::ObjectSpawned { .. })), 2);

        // Obstacles at 1500, 3000; coin at 2000
        s.advance(3000);
        let events = s.drain_events();
        let obstacles = count(&events, |e| {
            matches!(e, GameEvent::ObjectSpawned { kind: ObjectKind::Obstacle, .. })
        });
        let coins = count(&events, |e| {
            matches!(e, GameEvent::ObjectSpawned { kind: ObjectKind::Coin, .. })
        });
        assert_eq!(obstacles, 2);
        assert_eq!(coins, 1);
    }

    #[test]
    fn test_distance_ticks_every_second() {
        let mut s = session(ControlMode::Buttons);
        s.advance(999);
        assert_eq!(s.state().distance, 0);
        s.advance(1);
        assert_eq!(s.state().distance, 100);
        s.advance(2000);
        assert_eq!(s.state().distance, 300);
        assert!(s.events().contains(&GameEvent::DistanceUpdated { distance: 300 }));
    }

    #[test]
    fn test_buttons_ignored_in_sensor_mode() {
        let mut s = session(ControlMode::Sensors);
        s.handle(Input::MoveLeft);
        assert_eq!(s.state().lane(), 2);

        let mut s = session(ControlMode::Buttons);
        s.handle(Input::Tilt { x: 8.0, y: 0.0 });
        assert_eq!(s.state().lane(), 2);
        s.handle(Input::MoveLeft);
        assert_eq!(s.state().lane(), 1);
        assert_eq!(s.drain_events(), vec![GameEvent::LaneChanged { lane: 1 }]);
    }

    #[test]
    fn test_pause_freezes_everything() {
        let mut s = session(ControlMode::Buttons);
        s.advance(600);
        let progress: Vec<f32> = s.objects().iter().map(|o| o.progress).collect();
        let distance = s.state().distance;

        s.handle(Input::Pause);
        assert!(s.is_paused());
        s.advance(60_000);
        let frozen: Vec<f32> = s.objects().iter().map(|o| o.progress).collect();
        assert_eq!(progress, frozen);
        assert_eq!(s.state().distance, distance);
        assert_eq!(s.now_ms(), 60_600);

        // Buttons do nothing while paused
        s.handle(Input::MoveLeft);
        assert_eq!(s.state().lane(), 2);

        s.handle(Input::Resume);
        s.advance(30);
        let moved: Vec<f32> = s.objects().iter().map(|o| o.progress).collect();
        assert!(moved.iter().zip(&frozen).all(|(a, b)| a > b));
    }

    #[test]
    fn test_resume_does_not_replay_backlog() {
        let mut s = session(ControlMode::Buttons);
        s.advance(0);
        s.handle(Input::Pause);
        s.advance(10_000);
        s.drain_events();

        s.handle(Input::Resume);
        s.advance(1499);
        let events = s.drain_events();
        assert_eq!(count(&events, |e| matches!(e, GameEvent::ObjectSpawned { .. })), 0);
        assert_eq!(count(&events, |e| matches!(e, GameEvent::DistanceUpdated { .. })), 1);
    }

    #[test]
    fn test_pause_and_resume_are_idempotent() {
        let mut s = session(ControlMode::Buttons);
        s.handle(Input::Pause);
        s.handle(Input::Pause);
        s.handle(Input::Resume);
        s.handle(Input::Resume);
        assert_eq!(s.drain_events(), vec![GameEvent::Paused, GameEvent::Resumed]);
    }

    #[test]
    fn test_tilt_switches_speed() {
        let mut s = session(ControlMode::Sensors);
        s.handle(Input::Tilt { x: 0.0, y: -4.0 });
        assert_eq!(s.speed(), SpeedSetting::Fast);
        assert_eq!(
            s.drain_events(),
            vec![GameEvent::SpeedChanged { speed: SpeedSetting::Fast }]
        );

        // Repeated samples don't re-announce
        s.handle(Input::Tilt { x: 0.0, y: -4.0 });
        assert!(s.drain_events().is_empty());

        // The variant stays what the game was launched as
        assert_eq!(s.variant(), "sensors");
    }

    #[test]
    fn test_objects_fall_out_the_bottom() {
        let mut s = session(ControlMode::Buttons);
        s.advance(0);
        let first_ids: Vec<u32> = s.objects().iter().map(|o| o.id).collect();

        // Hit or not, every first-wave object is gone after the fall duration
        s.advance(4020);
        let events = s.drain_events();
        for id in first_ids {
            assert!(events.iter().any(|e| matches!(e, GameEvent::ObjectRemoved { id: rid, .. } if *rid == id)));
        }
    }

    #[test]
    fn test_hits_after_game_over_use_the_reset_lane() {
        let mut s = session(ControlMode::Buttons);
        assert!(s.state.lanes.move_lane(-2));
        s.state.lives = 1;
        let first = s.animator.spawn(ObjectKind::Obstacle, 0, 0).id;
        let left_behind = s.animator.spawn(ObjectKind::Obstacle, 0, 0).id;
        let middle = s.animator.spawn(ObjectKind::Obstacle, 2, 0).id;
        // Next animation step lands all three level with the ship
        s.animator.advance(3270);
        s.drain_events();

        s.animate();
        let events = s.drain_events();

        let removed: Vec<u32> = events
            .iter()
            .filter_map(|e| match e {
                GameEvent::ObjectRemoved { id, .. } => Some(*id),
                _ => None,
            })
            .collect();
        assert_eq!(removed, vec![first, middle]);

        let game_over = events
            .iter()
            .position(|e| matches!(e, GameEvent::GameOver { .. }))
            .unwrap();
        assert_eq!(events[game_over + 1], GameEvent::LaneChanged { lane: 2 });
        assert_eq!(events.last(), Some(&GameEvent::LifeLost { remaining: 2 }));

        assert_eq!(s.state().lane(), 2);
        assert_eq!(s.state().lives, 2);
        assert_eq!(s.objects().len(), 1);
        assert_eq!(s.objects()[0].id, left_behind);
    }
}
