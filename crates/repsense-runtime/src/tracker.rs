//! Exercise tracker - per-frame orchestration
//!
//! Per frame:
//! 1. Read the clock
//! 2. Adapt landmarks to pose angles
//! 3. Evaluate the push-up detector
//! 4. Evaluate the plank detector
//! 5. Stamp and return events (push-up before plank)

use std::sync::Arc;

use parking_lot::Mutex;
use repsense_core::{ExerciseEvent, FrameTime, RepsenseResult};
use repsense_detect::{PlankDetector, PoseAngles, PushUpDetector};
use repsense_time::{FrameClock, MonotonicClock};
use tracing::debug;

use crate::{AdaptedFrame, EventSink, FrameAdapter, Landmark, RuntimeConfig};

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct TrackerStats {
    pub frames_processed: u64,
    /// Short or non-finite landmark sets
    pub frames_rejected: u64,
    pub frames_low_visibility: u64,
    pub frames_lost_pose: u64,
    pub repetitions: u32,
    pub plank_sessions_started: u64,
    /// Longest plank duration seen since the tracker was built
    pub best_plank_seconds: u32,
}

/// Drives both detectors from one landmark stream
pub struct ExerciseTracker<C: FrameClock = MonotonicClock> {
    adapter: FrameAdapter,
    push_up: PushUpDetector,
    plank: PlankDetector,
    clock: C,
    config: RuntimeConfig,
    stats: TrackerStats,
}

impl ExerciseTracker<MonotonicClock> {
    /// Tracker with default configuration on the OS monotonic clock
    pub fn new() -> Self {
        Self::with_clock(RuntimeConfig::default(), MonotonicClock::new())
    }
}

impl Default for ExerciseTracker<MonotonicClock> {
    fn default() -> Self {
        Self::new()
    }
}

impl<C: FrameClock> ExerciseTracker<C> {
    /// Create a tracker trusting the configuration
    pub fn with_clock(config: RuntimeConfig, clock: C) -> Self {
        ExerciseTracker {
            adapter: FrameAdapter::new(config.body_side, config.min_visibility),
            push_up: PushUpDetector::with_config(config.push_up.clone()),
            plank: PlankDetector::with_config(config.plank.clone()),
            clock,
            config,
            stats: TrackerStats::default(),
        }
    }

    /// Create a tracker after validating the configuration
    pub fn try_with_clock(config: RuntimeConfig, clock: C) -> RepsenseResult<Self> {
        config.validate()?;
        Ok(Self::with_clock(config, clock))
    }

    /// Process one raw landmark frame at the clock's current time.
    ///
    /// Rejected frames leave detector state untouched.
    pub fn process_landmarks(&mut self, landmarks: &[Landmark]) -> RepsenseResult<Vec<ExerciseEvent>> {
        let now = self.clock.now();

        let adapted = match self.adapter.adapt(landmarks) {
            Ok(adapted) => adapted,
            Err(err) => {
                self.stats.frames_rejected += 1;
                return Err(err);
            }
        };

        match adapted {
            AdaptedFrame::Angles(angles) => Ok(self.process_angles(&angles, now)),
            AdaptedFrame::LowVisibility { min_visibility } => {
                debug!(min_visibility, "low visibility frame");
                self.stats.frames_low_visibility += 1;
                Ok(self.process_invalid(now))
            }
        }
    }

    /// Process one frame and hand its events to `sink`
    pub fn process_landmarks_into<S: EventSink>(
        &mut self,
        landmarks: &[Landmark],
        sink: &mut S,
    ) -> RepsenseResult<usize> {
        let events = self.process_landmarks(landmarks)?;
        let delivered = events.len();
        for event in events {
            sink.deliver(event);
        }
        Ok(delivered)
    }

    /// Process precomputed angles at an explicit time
    pub fn process_angles(&mut self, angles: &PoseAngles, now: FrameTime) -> Vec<ExerciseEvent> {
        self.stats.frames_processed += 1;
        let mut events = Vec::new();

        if let Some(rep) = self.push_up.evaluate_frame(angles) {
            self.stats.repetitions = rep.count;
            events.push(ExerciseEvent::repetition(now, rep));
        }

        let was_active = self.plank.is_session_active();
        let plank_events = self.plank.evaluate_frame(angles, now);
        self.record_plank(was_active);
        events.extend(plank_events.into_iter().map(|e| ExerciseEvent::plank(now, e)));

        events
    }

    /// No pose detected this frame. Counts toward the plank reset debounce only.
    pub fn process_lost_pose(&mut self) -> Vec<ExerciseEvent> {
        let now = self.clock.now();
        self.stats.frames_lost_pose += 1;
        self.process_invalid(now)
    }

    fn process_invalid(&mut self, now: FrameTime) -> Vec<ExerciseEvent> {
        self.stats.frames_processed += 1;
        let was_active = self.plank.is_session_active();
        let events = self.plank.evaluate_validity(false, now);
        self.record_plank(was_active);
        events
            .into_iter()
            .map(|e| ExerciseEvent::plank(now, e))
            .collect()
    }

    fn record_plank(&mut self, was_active: bool) {
        if !was_active && self.plank.is_session_active() {
            self.stats.plank_sessions_started += 1;
        }
        self.stats.best_plank_seconds = self
            .stats
            .best_plank_seconds
            .max(self.plank.current_duration_seconds());
    }

    /// Drop all progress: fresh detectors, zeroed counts. Stats are kept.
    pub fn reset(&mut self) {
        self.push_up = PushUpDetector::with_config(self.config.push_up.clone());
        self.plank = PlankDetector::with_config(self.config.plank.clone());
        self.stats.repetitions = 0;
    }

    pub fn repetition_count(&self) -> u32 {
        self.push_up.repetition_count()
    }

    pub fn plank_duration_seconds(&self) -> u32 {
        self.plank.current_duration_seconds()
    }

    pub fn push_up(&self) -> &PushUpDetector {
        &self.push_up
    }

    pub fn plank(&self) -> &PlankDetector {
        &self.plank
    }

    pub fn stats(&self) -> &TrackerStats {
        &self.stats
    }

    pub fn config(&self) -> &RuntimeConfig {
        &self.config
    }

    pub fn clock(&self) -> &C {
        &self.clock
    }
}

/// Tracker shared across threads. Calls are serialized by a mutex, so frames
/// from different threads are evaluated one at a time in lock order.
pub struct SharedTracker<C: FrameClock = MonotonicClock> {
    inner: Arc<Mutex<ExerciseTracker<C>>>,
}

impl<C: FrameClock> Clone for SharedTracker<C> {
    fn clone(&self) -> Self {
        SharedTracker {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<C: FrameClock> SharedTracker<C> {
    pub fn new(tracker: ExerciseTracker<C>) -> Self {
        SharedTracker {
            inner: Arc::new(Mutex::new(tracker)),
        }
    }

    pub fn process_landmarks(&self, landmarks: &[Landmark]) -> RepsenseResult<Vec<ExerciseEvent>> {
        self.inner.lock().process_landmarks(landmarks)
    }

    pub fn process_angles(&self, angles: &PoseAngles, now: FrameTime) -> Vec<ExerciseEvent> {
        self.inner.lock().process_angles(angles, now)
    }

    pub fn process_lost_pose(&self) -> Vec<ExerciseEvent> {
        self.inner.lock().process_lost_pose()
    }

    pub fn repetition_count(&self) -> u32 {
        self.inner.lock().repetition_count()
    }

    pub fn plank_duration_seconds(&self) -> u32 {
        self.inner.lock().plank_duration_seconds()
    }

    pub fn stats(&self) -> TrackerStats {
        self.inner.lock().stats().clone()
    }

    pub fn reset(&self) {
        self.inner.lock().reset()
    }

    /// Run `f` with exclusive access
    pub fn with<R>(&self, f: impl FnOnce(&mut ExerciseTracker<C>) -> R) -> R {
        f(&mut *self.inner.lock())
    }
}
