//! Timer-driven simulation module
//!
//! All gameplay logic lives here:
//! - Virtual millisecond clock, advanced by the host
//! - Seeded RNG only
//! - Stable iteration order (by object ID)
//! - No rendering, sensor or platform dependencies

pub mod autopilot;
pub mod collision;
pub mod falling;
pub mod lane;
pub mod schedule;
pub mod spawner;
pub mod state;
pub mod tick;
pub mod tilt;

pub use autopilot::Autopilot;
pub use collision::{BoundingBox, collides, object_box, ship_box};
pub use falling::{FallAnimator, FallingObject, ObjectKind, RemovalReason, Removed};
pub use lane::{LaneDirection, LaneModel};
pub use schedule::{Scheduler, TimerHandle};
pub use spawner::Spawner;
pub use state::{GameEvent, GameState, HitOutcome};
pub use tick::{Input, Session};
pub use tilt::{TiltControl, TiltOutcome};
