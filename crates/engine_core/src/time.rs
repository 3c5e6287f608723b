//! Time management for the game loop.

use std::time::Duration;

/// Game clock. The host advances it by each frame's duration; timestamps are
/// the elapsed game time, so runs are repeatable.
#[derive(Debug, Default)]
pub struct Time {
    elapsed: Duration,
    frame_count: u64,
}

impl Time {
    /// Create a new clock at t = 0.
    pub fn new() -> Self {
        Self::default()
    }

    /// Advance the clock by one frame.
    pub fn advance(&mut self, delta: Duration) {
        self.elapsed += delta;
        self.frame_count += 1;
    }

    /// Current game timestamp (elapsed since start).
    pub fn now(&self) -> Duration {
        self.elapsed
    }

    /// Get total elapsed time in seconds.
    pub fn elapsed_seconds(&self) -> f32 {
        self.elapsed.as_secs_f32()
    }

    /// Get the current frame count.
    pub fn frame_count(&self) -> u64 {
        self.frame_count
    }
}

/// A small queue of timed events owned by a single entity.
///
/// Replaces fire-and-forget timers: the owner polls it with the current time
/// and applies whatever is due. Dropping or clearing the owner cancels every
/// pending event, so nothing can fire against a torn-down entity.
#[derive(Debug, Clone)]
pub struct ScheduledEvents<E> {
    pending: Vec<(Duration, E)>,
}

impl<E> Default for ScheduledEvents<E> {
    fn default() -> Self {
        Self { pending: Vec::new() }
    }
}

impl<E> ScheduledEvents<E> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Schedule `event` to fire at or after `at`.
    pub fn schedule(&mut self, at: Duration, event: E) {
        self.pending.push((at, event));
    }

    /// Remove and return every event due at `now`, earliest first.
    pub fn drain_due(&mut self, now: Duration) -> Vec<E> {
        if self.pending.is_empty() {
            return Vec::new();
        }
        self.pending.sort_by_key(|(at, _)| *at);
        let split = self.pending.partition_point(|(at, _)| *at <= now);
        self.pending.drain(..split).map(|(_, e)| e).collect()
    }

    /// Drop all pending events.
    pub fn cancel_all(&mut self) {
        self.pending.clear();
    }

    pub fn len(&self) -> usize {
        self.pending.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }
}
