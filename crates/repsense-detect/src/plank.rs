//! Plank duration tracking
//!
//! Tracks one contiguous run of valid plank frames and reports its length in
//! whole seconds. A short run of invalid frames is tolerated; once
//! `invalid_frame_threshold` consecutive invalid frames arrive the session
//! is cleared.

use repsense_core::{check_tolerance, DurationEvent, FrameTime, RepsenseError, RepsenseResult};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, trace};

use crate::{is_aligned_to_axis, is_near, PoseAngles};

/// Plank detector configuration
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlankConfig {
    /// Shoulder-hip-ankle must be within this of 0°/180°
    pub body_line_tolerance: f32,
    /// Shoulder-ankle bearing must be within this of 0°/180°
    pub body_horizontal_tolerance: f32,
    /// Elbow-wrist bearing must be within this of 0°/180° (forearm on the floor)
    pub forearm_horizontal_tolerance: f32,
    /// Elbow angle target
    pub elbow_target: f32,
    pub elbow_tolerance: f32,
    /// Consecutive invalid frames before the session is cleared
    pub invalid_frame_threshold: u32,
}

impl Default for PlankConfig {
    fn default() -> Self {
        PlankConfig {
            body_line_tolerance: 30.0,
            body_horizontal_tolerance: 20.0,
            forearm_horizontal_tolerance: 10.0,
            elbow_target: 90.0,
            elbow_tolerance: 20.0,
            invalid_frame_threshold: 3,
        }
    }
}

impl PlankConfig {
    pub fn validate(&self) -> RepsenseResult<()> {
        check_tolerance("body_line_tolerance", self.body_line_tolerance)?;
        check_tolerance("body_horizontal_tolerance", self.body_horizontal_tolerance)?;
        check_tolerance("forearm_horizontal_tolerance", self.forearm_horizontal_tolerance)?;
        check_tolerance("elbow_tolerance", self.elbow_tolerance)?;
        if self.invalid_frame_threshold == 0 {
            return Err(RepsenseError::InvalidThreshold(self.invalid_frame_threshold));
        }
        Ok(())
    }

    /// Whether a frame counts as a valid plank
    pub fn is_valid_plank(&self, angles: &PoseAngles) -> bool {
        let body_straight = is_aligned_to_axis(angles.body_line, self.body_line_tolerance);
        let body_horizontal =
            is_aligned_to_axis(angles.body_horizontal, self.body_horizontal_tolerance);
        let forearm_horizontal =
            is_aligned_to_axis(angles.forearm_horizontal, self.forearm_horizontal_tolerance);
        let elbow_square = is_near(angles.elbow, self.elbow_target, self.elbow_tolerance);

        trace!(
            body_line = angles.body_line,
            body_horizontal = angles.body_horizontal,
            forearm_horizontal = angles.forearm_horizontal,
            elbow = angles.elbow,
            body_straight,
            body_is_horizontal = body_horizontal,
            forearm_is_horizontal = forearm_horizontal,
            elbow_square,
            "plank frame"
        );

        body_straight && body_horizontal && forearm_horizontal && elbow_square
    }
}

/// Plank session state. The transition is a pure function of this value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct PlankSession {
    /// Start of the current session, if any
    pub started_at: Option<FrameTime>,
    /// Last reported whole-second duration
    pub elapsed_seconds: u32,
    pub consecutive_invalid_frames: u32,
}

impl PlankSession {
    pub fn is_active(&self) -> bool {
        self.started_at.is_some()
    }

    /// Apply one frame.
    ///
    /// Valid frames start a session if none is active (emitting 0), then emit
    /// the elapsed whole seconds whenever that value strictly increases.
    /// Invalid frames count toward the threshold; reaching it clears the
    /// session and emits 0.
    pub fn step(
        self,
        valid: bool,
        now: FrameTime,
        invalid_frame_threshold: u32,
    ) -> (PlankSession, Vec<DurationEvent>) {
        let mut next = self;
        let mut events = Vec::new();

        if valid {
            let start = match next.started_at {
                Some(start) if next.consecutive_invalid_frames < invalid_frame_threshold => start,
                _ => {
                    next.started_at = Some(now);
                    next.elapsed_seconds = 0;
                    events.push(DurationEvent::new(0));
                    now
                }
            };
            next.consecutive_invalid_frames = 0;

            let elapsed = now.whole_seconds_since(start);
            if elapsed > next.elapsed_seconds {
                next.elapsed_seconds = elapsed;
                events.push(DurationEvent::new(elapsed));
            }
        } else {
            next.consecutive_invalid_frames = next.consecutive_invalid_frames.saturating_add(1);
            if next.consecutive_invalid_frames >= invalid_frame_threshold {
                next = PlankSession::default();
                events.push(DurationEvent::new(0));
            }
        }

        (next, events)
    }
}

/// Plank duration tracker
pub struct PlankDetector {
    session: PlankSession,
    config: PlankConfig,
}

impl PlankDetector {
    /// Create a detector with default tolerances
    pub fn new() -> Self {
        Self::with_config(PlankConfig::default())
    }

    /// Create a detector with custom configuration
    pub fn with_config(config: PlankConfig) -> Self {
        PlankDetector {
            session: PlankSession::default(),
            config,
        }
    }

    /// Create a detector after validating the configuration
    pub fn try_with_config(config: PlankConfig) -> RepsenseResult<Self> {
        config.validate()?;
        Ok(Self::with_config(config))
    }

    /// Evaluate one frame at caller-supplied time `now`
    pub fn evaluate_frame(&mut self, angles: &PoseAngles, now: FrameTime) -> Vec<DurationEvent> {
        let valid = self.config.is_valid_plank(angles);
        self.evaluate_validity(valid, now)
    }

    /// Feed a frame already judged valid or invalid.
    /// Frames the caller drops (lost pose, low visibility) come in as invalid.
    pub fn evaluate_validity(&mut self, valid: bool, now: FrameTime) -> Vec<DurationEvent> {
        let was_active = self.session.is_active();
        let (next, events) = self
            .session
            .step(valid, now, self.config.invalid_frame_threshold);

        match (was_active, next.is_active()) {
            (_, true) if next.started_at != self.session.started_at => {
                info!(at = ?now, "plank session started")
            }
            (true, false) => info!(
                at = ?now,
                duration_secs = self.session.elapsed_seconds,
                "plank session reset"
            ),
            _ => {}
        }
        for event in &events {
            debug!(seconds = event.seconds, "plank duration");
        }

        self.session = next;
        events
    }

    /// Last reported duration in whole seconds
    pub fn current_duration_seconds(&self) -> u32 {
        self.session.elapsed_seconds
    }

    pub fn is_session_active(&self) -> bool {
        self.session.is_active()
    }

    pub fn consecutive_invalid_frames(&self) -> u32 {
        self.session.consecutive_invalid_frames
    }

    pub fn session(&self) -> PlankSession {
        self.session
    }

    pub fn config(&self) -> &PlankConfig {
        &self.config
    }
}

impl Default for PlankDetector {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const FRAME_MS: u64 = 33;

    fn plank() -> PoseAngles {
        PoseAngles::new(176.0, 4.0, 3.0, 88.0)
    }

    fn sagging() -> PoseAngles {
        PoseAngles::new(140.0, 4.0, 3.0, 88.0)
    }

    fn seconds(events: &[DurationEvent]) -> Vec<u32> {
        events.iter().map(|e| e.seconds).collect()
    }

    #[test]
    fn test_first_valid_frame_starts_session() {
        let mut detector = PlankDetector::new();
        assert!(!detector.is_session_active());

        let events = detector.evaluate_frame(&plank(), FrameTime::from_millis(1000));
        assert_eq!(seconds(&events), vec![0]);
        assert!(detector.is_session_active());
        assert_eq!(detector.current_duration_seconds(), 0);
    }

    #[test]
    fn test_whole_second_updates() {
        let mut detector = PlankDetector::new();
        let mut all = Vec::new();

        // 0ms ..= 3300ms at ~30fps
        let mut t = 0;
        while t <= 3300 {
            all.extend(detector.evaluate_frame(&plank(), FrameTime::from_millis(t)));
            t += FRAME_MS;
        }

        assert_eq!(seconds(&all), vec![0, 1, 2, 3]);
        assert_eq!(detector.current_duration_seconds(), 3);
    }

    #[test]
    fn test_threshold_invalid_frames_reset() {
        let mut detector = PlankDetector::new();
        detector.evaluate_frame(&plank(), FrameTime::from_millis(0));
        detector.evaluate_frame(&plank(), FrameTime::from_millis(2100));
        assert_eq!(detector.current_duration_seconds(), 2);

        assert!(detector.evaluate_frame(&sagging(), FrameTime::from_millis(2133)).is_empty());
        assert!(detector.evaluate_frame(&sagging(), FrameTime::from_millis(2166)).is_empty());
        let events = detector.evaluate_frame(&sagging(), FrameTime::from_millis(2200));

        assert_eq!(seconds(&events), vec![0]);
        assert!(!detector.is_session_active());
        assert_eq!(detector.current_duration_seconds(), 0);
        assert_eq!(detector.consecutive_invalid_frames(), 0);
    }

    #[test]
    fn test_short_dropout_keeps_session() {
        let mut detector = PlankDetector::new();
        detector.evaluate_frame(&plank(), FrameTime::from_millis(0));
        detector.evaluate_frame(&plank(), FrameTime::from_millis(1500));

        assert!(detector.evaluate_frame(&sagging(), FrameTime::from_millis(1533)).is_empty());
        assert_eq!(detector.consecutive_invalid_frames(), 1);

        let events = detector.evaluate_frame(&plank(), FrameTime::from_millis(2010));
        assert_eq!(seconds(&events), vec![2]);
        assert_eq!(detector.consecutive_invalid_frames(), 0);
    }

    #[test]
    fn test_new_session_after_reset() {
        let mut detector = PlankDetector::new();
        detector.evaluate_frame(&plank(), FrameTime::from_millis(0));
        detector.evaluate_frame(&plank(), FrameTime::from_millis(5000));
        for i in 0..3 {
            detector.evaluate_frame(&sagging(), FrameTime::from_millis(5100 + i * FRAME_MS));
        }

        let events = detector.evaluate_frame(&plank(), FrameTime::from_millis(6000));
        assert_eq!(seconds(&events), vec![0]);

        let events = detector.evaluate_frame(&plank(), FrameTime::from_millis(7000));
        assert_eq!(seconds(&events), vec![1]);
    }

    #[test]
    fn test_invalid_frames_without_session() {
        let mut detector = PlankDetector::new();
        let mut all = Vec::new();
        for i in 0..7 {
            all.extend(detector.evaluate_frame(&sagging(), FrameTime::from_millis(i * FRAME_MS)));
        }
        // threshold reached twice; each clear reports 0
        assert_eq!(seconds(&all), vec![0, 0]);
        assert_eq!(detector.consecutive_invalid_frames(), 1);
    }

    #[test]
    fn test_duration_read_is_idempotent() {
        let mut detector = PlankDetector::new();
        detector.evaluate_frame(&plank(), FrameTime::from_millis(0));
        detector.evaluate_frame(&plank(), FrameTime::from_millis(4200));

        let first = detector.current_duration_seconds();
        assert_eq!(first, 4);
        assert_eq!(detector.current_duration_seconds(), first);
        assert_eq!(detector.current_duration_seconds(), first);
    }

    #[test]
    fn test_no_duplicate_second() {
        let mut detector = PlankDetector::new();
        detector.evaluate_frame(&plank(), FrameTime::from_millis(0));
        assert_eq!(
            seconds(&detector.evaluate_frame(&plank(), FrameTime::from_millis(1000))),
            vec![1]
        );
        assert!(detector
            .evaluate_frame(&plank(), FrameTime::from_millis(1999))
            .is_empty());
    }

    #[test]
    fn test_gates() {
        let config = PlankConfig::default();
        assert!(config.is_valid_plank(&plank()));
        assert!(config.is_valid_plank(&PoseAngles::new(150.0, 160.0, 170.0, 110.0)));
        assert!(!config.is_valid_plank(&PoseAngles::new(176.0, 25.0, 3.0, 88.0)));
        assert!(!config.is_valid_plank(&PoseAngles::new(176.0, 4.0, 15.0, 88.0)));
        assert!(!config.is_valid_plank(&PoseAngles::new(176.0, 4.0, 3.0, 170.0)));
    }

    #[test]
    fn test_pure_step() {
        let (session, events) = PlankSession::default().step(true, FrameTime::from_millis(250), 3);
        assert_eq!(seconds(&events), vec![0]);
        assert_eq!(session.started_at, Some(FrameTime::from_millis(250)));

        let (session, events) = session.step(false, FrameTime::from_millis(300), 3);
        assert!(events.is_empty());
        assert_eq!(session.consecutive_invalid_frames, 1);
        assert!(session.is_active());
    }

    #[test]
    fn test_zero_threshold_rejected() {
        let config = PlankConfig {
            invalid_frame_threshold: 0,
            ..PlankConfig::default()
        };
        assert_eq!(
            PlankDetector::try_with_config(config).err(),
            Some(RepsenseError::InvalidThreshold(0))
        );
    }

    mod properties {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            #[test]
            fn prop_duration_bounded_by_session_age(validity in prop::collection::vec(any::<bool>(), 0..300)) {
                let mut detector = PlankDetector::new();

                for (i, valid) in validity.iter().enumerate() {
                    let now = FrameTime::from_millis(i as u64 * FRAME_MS);
                    detector.evaluate_validity(*valid, now);

                    let session = detector.session();
                    match session.started_at {
                        Some(start) => prop_assert!(session.elapsed_seconds <= now.whole_seconds_since(start)),
                        None => prop_assert_eq!(session.elapsed_seconds, 0),
                    }
                    prop_assert!(detector.consecutive_invalid_frames() < detector.config().invalid_frame_threshold);
                }
            }

            #[test]
            fn prop_durations_step_by_one_within_a_session(validity in prop::collection::vec(any::<bool>(), 0..300)) {
                let mut detector = PlankDetector::new();
                let mut last = 0;

                for (i, valid) in validity.iter().enumerate() {
                    let now = FrameTime::from_millis(i as u64 * FRAME_MS);
                    for event in detector.evaluate_validity(*valid, now) {
                        if event.is_boundary() {
                            last = 0;
                        } else {
                            prop_assert_eq!(event.seconds, last + 1);
                            last = event.seconds;
                        }
                    }
                }
            }
        }
    }
}
