//! Pose Simulator - synthetic landmark streams for detector testing
//!
//! Simulates:
//! - Side-on push-up repetitions (top and bottom positions)
//! - Forearm plank holds
//! - Standing frames and lost-pose dropouts
//! - Estimator jitter on every landmark coordinate
//!
//! Frames are generated in normalized image coordinates with y pointing
//! down, the subject facing left.

use std::time::Duration;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use repsense_core::FrameTime;
use repsense_runtime::{BodySide, Landmark, POSE_LANDMARK_COUNT};
use repsense_time::{FrameClock, ManualClock};

/// Simulated body positions
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PoseKind {
    /// Arms locked out, body straight
    PushUpTop,
    /// Elbows at ~90°, forearms vertical
    PushUpBottom,
    /// Forearm plank
    Plank,
    /// Upright, fails every gate
    Standing,
    /// Estimator found no body
    Lost,
}

impl PoseKind {
    /// Shoulder, hip, ankle, elbow, wrist, ear
    fn keypoints(self) -> Option<[(f32, f32); 6]> {
        match self {
            PoseKind::PushUpTop => Some([
                (0.30, 0.40),
                (0.55, 0.42),
                (0.80, 0.44),
                (0.30, 0.52),
                (0.30, 0.64),
                (0.25, 0.38),
            ]),
            PoseKind::PushUpBottom => Some([
                (0.30, 0.58),
                (0.55, 0.54),
                (0.80, 0.50),
                (0.42, 0.58),
                (0.42, 0.70),
                (0.25, 0.58),
            ]),
            PoseKind::Plank => Some([
                (0.30, 0.50),
                (0.55, 0.51),
                (0.80, 0.52),
                (0.30, 0.62),
                (0.18, 0.62),
                (0.25, 0.48),
            ]),
            PoseKind::Standing => Some([
                (0.50, 0.30),
                (0.50, 0.55),
                (0.50, 0.90),
                (0.50, 0.45),
                (0.50, 0.60),
                (0.50, 0.22),
            ]),
            PoseKind::Lost => None,
        }
    }
}

/// Simulator configuration
#[derive(Clone, Debug)]
pub struct SimulatorConfig {
    /// Time between frames
    pub frame_interval: Duration,
    /// Uniform noise amplitude per coordinate
    pub jitter: f32,
    /// Side the pose is written to
    pub side: BodySide,
    /// Visibility score attached to the pose landmarks
    pub visibility: Option<f32>,
    pub seed: u64,
}

impl Default for SimulatorConfig {
    fn default() -> Self {
        Self::clean()
    }
}

impl SimulatorConfig {
    /// Exact keypoints at 30 fps
    pub fn clean() -> Self {
        SimulatorConfig {
            frame_interval: Duration::from_millis(33),
            jitter: 0.0,
            side: BodySide::Left,
            visibility: None,
            seed: 0,
        }
    }

    /// Typical estimator jitter
    pub fn noisy() -> Self {
        SimulatorConfig {
            jitter: 0.003,
            seed: 42,
            ..Self::clean()
        }
    }
}

/// One generated frame. `landmarks` is `None` for lost-pose frames.
#[derive(Clone, Debug)]
pub struct SimFrame {
    pub time: FrameTime,
    pub kind: PoseKind,
    pub landmarks: Option<Vec<Landmark>>,
}

/// Landmark stream generator with its own clock
pub struct PoseSimulator {
    config: SimulatorConfig,
    rng: StdRng,
    clock: ManualClock,
    frames_generated: u64,
}

impl PoseSimulator {
    pub fn new(config: SimulatorConfig) -> Self {
        PoseSimulator {
            rng: StdRng::seed_from_u64(config.seed),
            config,
            clock: ManualClock::new(),
            frames_generated: 0,
        }
    }

    pub fn clean() -> Self {
        Self::new(SimulatorConfig::clean())
    }

    pub fn noisy() -> Self {
        Self::new(SimulatorConfig::noisy())
    }

    /// Handle to the simulation clock; give a clone to the tracker
    pub fn clock(&self) -> ManualClock {
        self.clock.clone()
    }

    pub fn frames_generated(&self) -> u64 {
        self.frames_generated
    }

    /// Landmark set for a pose without advancing time or adding noise
    pub fn landmarks_for(kind: PoseKind, side: BodySide) -> Option<Vec<Landmark>> {
        let keypoints = kind.keypoints()?;
        // Auto writes the pose to the left side
        let indices = side.indices().or_else(|| BodySide::Left.indices())?;

        let mut landmarks = vec![Landmark::new(0.5, 0.5); POSE_LANDMARK_COUNT];
        for (&index, &(x, y)) in indices.iter().zip(keypoints.iter()) {
            landmarks[index] = Landmark::new(x, y);
        }
        Some(landmarks)
    }

    /// Generate the next frame. The first frame is stamped at time zero.
    pub fn next_frame(&mut self, kind: PoseKind) -> SimFrame {
        if self.frames_generated > 0 {
            self.clock.advance(self.config.frame_interval);
        }
        self.frames_generated += 1;

        let landmarks = Self::landmarks_for(kind, self.config.side).map(|mut landmarks| {
            for landmark in &mut landmarks {
                if self.config.jitter > 0.0 {
                    let j = self.config.jitter;
                    landmark.position.x += self.rng.gen_range(-j..=j);
                    landmark.position.y += self.rng.gen_range(-j..=j);
                }
                landmark.visibility = self.config.visibility;
            }
            landmarks
        });

        SimFrame {
            time: self.clock.now(),
            kind,
            landmarks,
        }
    }

    /// `count` consecutive frames of one pose
    pub fn hold(&mut self, kind: PoseKind, count: usize) -> Vec<SimFrame> {
        (0..count).map(|_| self.next_frame(kind)).collect()
    }

    /// Frames covering at least `duration` of one pose
    pub fn hold_for(&mut self, kind: PoseKind, duration: Duration) -> Vec<SimFrame> {
        let interval = self.config.frame_interval.as_micros().max(1);
        let count = ((duration.as_micros() + interval - 1) / interval) as usize + 1;
        self.hold(kind, count)
    }

    /// `reps` push-up cycles, `frames_per_phase` frames at top then bottom
    pub fn push_up_set(&mut self, reps: usize, frames_per_phase: usize) -> Vec<SimFrame> {
        let mut frames = Vec::with_capacity(reps * frames_per_phase * 2);
        for _ in 0..reps {
            frames.extend(self.hold(PoseKind::PushUpTop, frames_per_phase));
            frames.extend(self.hold(PoseKind::PushUpBottom, frames_per_phase));
        }
        frames
    }
}

/// Preset simulators
pub mod scenarios {
    use super::*;

    /// Exact keypoints, left side, 30 fps
    pub fn clean_left() -> PoseSimulator {
        PoseSimulator::clean()
    }

    /// Exact keypoints written to the right-side landmarks
    pub fn clean_right() -> PoseSimulator {
        PoseSimulator::new(SimulatorConfig {
            side: BodySide::Right,
            ..SimulatorConfig::clean()
        })
    }

    /// Estimator jitter with a fixed seed
    pub fn noisy(seed: u64) -> PoseSimulator {
        PoseSimulator::new(SimulatorConfig {
            seed,
            ..SimulatorConfig::noisy()
        })
    }

    /// Every landmark reported with the given visibility
    pub fn dim(visibility: f32) -> PoseSimulator {
        PoseSimulator::new(SimulatorConfig {
            visibility: Some(visibility),
            ..SimulatorConfig::clean()
        })
    }
}
