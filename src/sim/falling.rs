//! Falling objects and the fall animator
//!
//! Objects fall linearly from the top of the field to the bottom over a fixed
//! duration. Progress only advances when the animator is stepped, so a paused
//! game freezes objects in place.

use serde::{Deserialize, Serialize};

/// What a falling object does to the player on contact
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ObjectKind {
    /// Costs a life
    Obstacle,
    /// Adds a coin
    Coin,
}

/// An object falling down one lane
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FallingObject {
    pub id: u32,
    pub kind: ObjectKind,
    pub lane: usize,
    /// 0.0 at the top of the field, 1.0 at the bottom
    pub progress: f32,
    /// Session time of spawn (ms)
    pub spawn_time_ms: u64,
    /// Unpaused time spent falling (ms)
    pub elapsed_ms: u64,
}

/// Why an object left the field
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RemovalReason {
    /// Hit the ship
    Collided,
    /// Fell past the bottom
    ReachedBottom,
}

#[derive(Debug, Clone)]
pub struct Removed {
    pub object: FallingObject,
    pub reason: RemovalReason,
}

/// Owns every live falling object
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FallAnimator {
    fall_duration_ms: u64,
    /// Live objects, sorted by id
    objects: Vec<FallingObject>,
    next_id: u32,
}

impl FallAnimator {
    pub fn new(fall_duration_ms: u64) -> Self {
        Self {
            fall_duration_ms: fall_duration_ms.max(1),
            objects: Vec::new(),
            next_id: 1,
        }
    }

    pub fn objects(&self) -> &[FallingObject] {
        &self.objects
    }

    pub fn len(&self) -> usize {
        self.objects.len()
    }

    pub fn is_empty(&self) -> bool {
        self.objects.is_empty()
    }

    /// Add a new object at the top of `lane`
    pub fn spawn(&mut self, kind: ObjectKind, lane: usize, now_ms: u64) -> &FallingObject {
        let id = self.next_id;
        self.next_id += 1;
        self.objects.push(FallingObject {
            id,
            kind,
            lane,
            progress: 0.0,
            spawn_time_ms: now_ms,
            elapsed_ms: 0,
        });
        &self.objects[self.objects.len() - 1]
    }

    /// Move every object down by `step_ms` without removing anything
    pub fn advance(&mut self, step_ms: u64) {
        let duration = self.fall_duration_ms;
        for object in &mut self.objects {
            object.elapsed_ms += step_ms;
            object.progress = (object.elapsed_ms as f32 / duration as f32).min(1.0);
        }
    }

    pub fn get(&self, id: u32) -> Option<&FallingObject> {
        self.objects.iter().find(|o| o.id == id)
    }

    /// Take a live object out of the field
    pub fn remove(&mut self, id: u32) -> Option<FallingObject> {
        let index = self.objects.iter().position(|o| o.id == id)?;
        Some(self.objects.remove(index))
    }

    /// Advance every object by `step_ms`.
    ///
    /// `hits_ship` is asked about each object at its new position. Objects
    /// that hit are removed as `Collided`; the rest are removed as
    /// `ReachedBottom` once progress reaches 1. Removals come back in id order.
    pub fn step<F>(&mut self, step_ms: u64, mut hits_ship: F) -> Vec<Removed>
    where
        F: FnMut(&FallingObject) -> bool,
    {
        self.advance(step_ms);
        let mut removed = Vec::new();

        self.objects.retain(|object| {
            let reason = if hits_ship(object) {
                RemovalReason::Collided
            } else if object.progress >= 1.0 {
                RemovalReason::ReachedBottom
            } else {
                return true;
            };

            removed.push(Removed {
                object: object.clone(),
                reason,
            });
            false
        });

        removed
    }

    /// Drop every live object
    pub fn clear(&mut self) {
        self.objects.clear();
    }
}
