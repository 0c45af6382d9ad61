//! Debounced flush scheduling.
//!
//! At most one flush timer is armed per cool-down window: arming is
//! allowed only if no timer was ever armed, or the previous arming is
//! older than the window. Bursts of submissions inside one window
//! therefore schedule a single timer, not one per event. Armed timers are
//! never cancelled; a timer that fires into an empty or busy dispatcher
//! is a no-op.

use std::time::{Duration, Instant};

use parking_lot::Mutex;

/// Debounce state for timer-scheduled flushes
#[derive(Debug, Default)]
pub struct FlushScheduler {
    last_armed: Mutex<Option<Instant>>,
}

impl FlushScheduler {
    /// Create a scheduler that has never armed a timer
    pub fn new() -> Self {
        Self::default()
    }

    /// Decide whether a new one-shot timer should be armed for `window`.
    ///
    /// Returns true and records the arming instant if no timer was ever
    /// armed or the last arming is stale (older than `window`); returns
    /// false while a window is still open.
    pub fn should_arm(&self, window: Duration) -> bool {
        let mut last_armed = self.last_armed.lock();
        match *last_armed {
            Some(armed_at) if armed_at.elapsed() <= window => false,
            _ => {
                *last_armed = Some(Instant::now());
                true
            }
        }
    }
}
