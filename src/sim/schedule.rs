//! Recurring timers over a virtual millisecond clock
//!
//! Each timer carries a task tag `T`. The owner advances the clock and runs
//! whatever task comes due, one at a time, in due-time order (ties go to the
//! timer scheduled first). Cancelling a handle stops it for good; pausing is
//! cancel + reschedule.

use serde::{Deserialize, Serialize};

/// Cancel handle for a scheduled timer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TimerHandle(u32);

#[derive(Debug, Clone, Serialize, Deserialize)]
struct Timer<T> {
    handle: TimerHandle,
    task: T,
    interval_ms: u64,
    next_due_ms: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Scheduler<T> {
    now_ms: u64,
    timers: Vec<Timer<T>>,
    next_handle: u32,
}

impl<T: Copy> Default for Scheduler<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Copy> Scheduler<T> {
    pub fn new() -> Self {
        Self {
            now_ms: 0,
            timers: Vec::new(),
            next_handle: 1,
        }
    }

    /// Current virtual time
    pub fn now_ms(&self) -> u64 {
        self.now_ms
    }

    /// Run `task` every `interval_ms`, first after `first_delay_ms`
    pub fn schedule_recurring(&mut self, task: T, interval_ms: u64, first_delay_ms: u64) -> TimerHandle {
        let handle = TimerHandle(self.next_handle);
        self.next_handle += 1;
        self.timers.push(Timer {
            handle,
            task,
            interval_ms: interval_ms.max(1),
            next_due_ms: self.now_ms + first_delay_ms,
        });
        handle
    }

    /// Stop a timer. Returns false if it was not active.
    pub fn cancel(&mut self, handle: TimerHandle) -> bool {
        let before = self.timers.len();
        self.timers.retain(|t| t.handle != handle);
        self.timers.len() != before
    }

    pub fn cancel_all(&mut self) {
        self.timers.clear();
    }

    pub fn is_active(&self, handle: TimerHandle) -> bool {
        self.timers.iter().any(|t| t.handle == handle)
    }

    pub fn interval(&self, handle: TimerHandle) -> Option<u64> {
        self.timers
            .iter()
            .find(|t| t.handle == handle)
            .map(|t| t.interval_ms)
    }

    /// Change a timer's period. The pending fire keeps its due time; the new
    /// period applies from the next re-arm.
    pub fn set_interval(&mut self, handle: TimerHandle, interval_ms: u64) -> bool {
        match self.timers.iter_mut().find(|t| t.handle == handle) {
            Some(timer) => {
                timer.interval_ms = interval_ms.max(1);
                true
            }
            None => false,
        }
    }

    /// Pop the next task due at or before `until_ms`, moving the clock to its
    /// due time and re-arming the timer.
    pub fn pop_due(&mut self, until_ms: u64) -> Option<T> {
        let timer = self
            .timers
            .iter_mut()
            .filter(|t| t.next_due_ms <= until_ms)
            .min_by_key(|t| (t.next_due_ms, t.handle.0))?;

        self.now_ms = self.now_ms.max(timer.next_due_ms);
        timer.next_due_ms += timer.interval_ms;
        Some(timer.task)
    }

    /// Move the clock forward once nothing else is due
    pub fn settle(&mut self, until_ms: u64) {
        self.now_ms = self.now_ms.max(until_ms);
    }
}
