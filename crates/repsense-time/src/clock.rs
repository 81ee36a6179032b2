//! Clock implementations for frame timestamps

use std::sync::Arc;
use std::time::{Duration, Instant};

use parking_lot::Mutex;
use repsense_core::FrameTime;

/// Time source injected into the exercise tracker
pub trait FrameClock {
    /// Current frame time. MUST never decrease between calls.
    fn now(&self) -> FrameTime;
}

/// Monotonic clock backed by the OS monotonic timer
/// Reads as microseconds since the clock was created
pub struct MonotonicClock {
    /// Reference to monotonic OS clock
    reference: Instant,
}

impl MonotonicClock {
    /// Create a new clock starting at zero
    pub fn new() -> Self {
        MonotonicClock {
            reference: Instant::now(),
        }
    }

    /// Time elapsed since creation
    pub fn elapsed(&self) -> Duration {
        self.reference.elapsed()
    }
}

impl Default for MonotonicClock {
    fn default() -> Self {
        Self::new()
    }
}

impl FrameClock for MonotonicClock {
    fn now(&self) -> FrameTime {
        FrameTime::from_micros(self.elapsed().as_micros() as u64)
    }
}

/// Manually driven clock for replay and tests
///
/// Clones share the same underlying time, so a test can keep one handle
/// and advance it while the tracker reads through another.
#[derive(Clone, Default)]
pub struct ManualClock {
    value: Arc<Mutex<FrameTime>>,
}

impl ManualClock {
    /// Create a clock starting at zero
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a clock starting at `start`
    pub fn starting_at(start: FrameTime) -> Self {
        ManualClock {
            value: Arc::new(Mutex::new(start)),
        }
    }

    /// Advance by `dt`, returning the new time
    pub fn advance(&self, dt: Duration) -> FrameTime {
        let mut value = self.value.lock();
        *value = value.saturating_add(dt);
        *value
    }

    /// Jump to `target`
    /// Only allowed to move forward
    pub fn set(&self, target: FrameTime) -> FrameTime {
        let mut value = self.value.lock();
        if target > *value {
            *value = target;
        }
        *value
    }
}

impl FrameClock for ManualClock {
    fn now(&self) -> FrameTime {
        *self.value.lock()
    }
}

impl<C: FrameClock + ?Sized> FrameClock for Box<C> {
    fn now(&self) -> FrameTime {
        (**self).now()
    }
}
