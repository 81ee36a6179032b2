//! End-to-end Scenario Suite
//!
//! Replays simulated landmark streams through the full pipeline:
//! - Frame adaptation and side selection
//! - Push-up counting
//! - Plank duration tracking with dropout debounce
//! - Event ordering and timestamps

use repsense_core::{ExerciseEvent, RepsenseResult};
use repsense_runtime::{ExerciseTracker, RuntimeConfig, TrackerStats};
use repsense_time::ManualClock;

use crate::simulator::SimFrame;

// ============================================================================
// SCENARIO OUTCOME
// ============================================================================

/// Everything a replay produced
#[derive(Clone, Debug, Default)]
pub struct ScenarioOutcome {
    pub events: Vec<ExerciseEvent>,
    /// Frames the tracker refused
    pub rejected_frames: usize,
}

impl ScenarioOutcome {
    /// Running counts from repetition events, in order
    pub fn repetition_counts(&self) -> Vec<u32> {
        self.events
            .iter()
            .filter_map(|e| e.as_repetition())
            .map(|r| r.count)
            .collect()
    }

    /// Plank durations in order, including 0 boundaries
    pub fn plank_durations(&self) -> Vec<u32> {
        self.events
            .iter()
            .filter_map(|e| e.as_plank())
            .map(|d| d.seconds)
            .collect()
    }

    /// Number of plank session boundaries reported
    pub fn plank_boundaries(&self) -> usize {
        self.events
            .iter()
            .filter_map(|e| e.as_plank())
            .filter(|d| d.is_boundary())
            .count()
    }
}

// ============================================================================
// SCENARIO RUNNER
// ============================================================================

/// Feeds simulated frames to a tracker on a manual clock.
///
/// The tracker clock is set to each frame's timestamp before the frame is
/// processed, so frames can be generated ahead of the replay.
pub struct ScenarioRunner {
    tracker: ExerciseTracker<ManualClock>,
    clock: ManualClock,
}

impl ScenarioRunner {
    pub fn new(config: RuntimeConfig) -> RepsenseResult<Self> {
        let clock = ManualClock::new();
        let tracker = ExerciseTracker::try_with_clock(config, clock.clone())?;
        Ok(Self { tracker, clock })
    }

    /// Replay frames in order
    pub fn replay(&mut self, frames: &[SimFrame]) -> ScenarioOutcome {
        let mut outcome = ScenarioOutcome::default();

        for frame in frames {
            self.clock.set(frame.time);
            match &frame.landmarks {
                Some(landmarks) => match self.tracker.process_landmarks(landmarks) {
                    Ok(events) => outcome.events.extend(events),
                    Err(_) => outcome.rejected_frames += 1,
                },
                None => outcome.events.extend(self.tracker.process_lost_pose()),
            }
        }

        outcome
    }

    pub fn tracker(&self) -> &ExerciseTracker<ManualClock> {
        &self.tracker
    }

    pub fn tracker_mut(&mut self) -> &mut ExerciseTracker<ManualClock> {
        &mut self.tracker
    }

    pub fn stats(&self) -> &TrackerStats {
        self.tracker.stats()
    }
}

impl Default for ScenarioRunner {
    fn default() -> Self {
        let clock = ManualClock::new();
        Self {
            tracker: ExerciseTracker::with_clock(RuntimeConfig::default(), clock.clone()),
            clock,
        }
    }
}
