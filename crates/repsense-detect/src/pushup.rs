//! Push-up repetition counting
//!
//! Two-state machine over per-frame angle magnitudes. A repetition is an
//! extended-arm frame followed by a bent-arm frame, both while the body is
//! straight, roughly horizontal, and the forearm roughly vertical.

use repsense_core::{check_tolerance, RepetitionEvent, RepsenseResult};
use serde::{Deserialize, Serialize};
use tracing::{debug, trace};

use crate::{is_aligned_to_axis, is_near, PoseAngles};

/// Push-up detector configuration (degrees)
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PushUpConfig {
    /// Shoulder-hip-ankle must be within this of 0°/180°
    pub body_line_tolerance: f32,
    /// Shoulder-ankle bearing must be within this of 0°/180°.
    /// Depends on camera angle, sensible range [0, 45]
    pub body_horizontal_tolerance: f32,
    /// Elbow-wrist bearing target (vertical forearm)
    pub forearm_vertical_target: f32,
    pub forearm_vertical_tolerance: f32,
    /// Elbow angle window around 0°/180° for the extended-arm gate
    pub extended_arm_tolerance: f32,
    /// Elbow angle target for the bent-arm gate
    pub bent_arm_target: f32,
    /// Depends on exercise difficulty, sensible range [0, 21]
    pub bent_arm_tolerance: f32,
}

impl Default for PushUpConfig {
    fn default() -> Self {
        PushUpConfig {
            body_line_tolerance: 30.0,
            body_horizontal_tolerance: 45.0,
            forearm_vertical_target: 90.0,
            forearm_vertical_tolerance: 20.0,
            extended_arm_tolerance: 20.0,
            bent_arm_target: 90.0,
            bent_arm_tolerance: 21.0,
        }
    }
}

impl PushUpConfig {
    /// Camera roughly level with the body, deep repetitions only
    pub fn strict() -> Self {
        PushUpConfig {
            body_horizontal_tolerance: 20.0,
            bent_arm_tolerance: 15.0,
            ..Self::default()
        }
    }

    /// Wider forearm and lockout windows for oblique camera angles
    pub fn lenient() -> Self {
        PushUpConfig {
            forearm_vertical_tolerance: 25.0,
            extended_arm_tolerance: 25.0,
            ..Self::default()
        }
    }

    pub fn validate(&self) -> RepsenseResult<()> {
        check_tolerance("body_line_tolerance", self.body_line_tolerance)?;
        check_tolerance("body_horizontal_tolerance", self.body_horizontal_tolerance)?;
        check_tolerance("forearm_vertical_tolerance", self.forearm_vertical_tolerance)?;
        check_tolerance("extended_arm_tolerance", self.extended_arm_tolerance)?;
        check_tolerance("bent_arm_tolerance", self.bent_arm_tolerance)?;
        Ok(())
    }

    /// Evaluate every tolerance check for one frame
    pub fn gates(&self, angles: &PoseAngles) -> PushUpGates {
        PushUpGates {
            body_straight: is_aligned_to_axis(angles.body_line, self.body_line_tolerance),
            body_horizontal: is_aligned_to_axis(
                angles.body_horizontal,
                self.body_horizontal_tolerance,
            ),
            forearm_vertical: is_near(
                angles.forearm_horizontal,
                self.forearm_vertical_target,
                self.forearm_vertical_tolerance,
            ),
            arm_extended: is_aligned_to_axis(angles.elbow, self.extended_arm_tolerance),
            arm_bent: is_near(angles.elbow, self.bent_arm_target, self.bent_arm_tolerance),
        }
    }
}

/// Per-frame gate results
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PushUpGates {
    pub body_straight: bool,
    pub body_horizontal: bool,
    pub forearm_vertical: bool,
    pub arm_extended: bool,
    pub arm_bent: bool,
}

impl PushUpGates {
    /// Posture gate shared by both transitions, independent of state
    pub fn posture_holds(&self) -> bool {
        self.body_straight && self.body_horizontal && self.forearm_vertical
    }
}

/// Detector state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum PushUpState {
    /// Waiting for the extended-arm frame
    #[default]
    AwaitingDescent,
    /// Waiting for the bent-arm frame that completes the repetition
    AwaitingAscent,
}

/// State plus running count. The transition is a pure function of this value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct PushUpProgress {
    pub state: PushUpState,
    pub count: u32,
}

impl PushUpProgress {
    /// Apply one frame's gates
    pub fn step(self, gates: &PushUpGates) -> (PushUpProgress, Option<RepetitionEvent>) {
        if !gates.posture_holds() {
            return (self, None);
        }

        match self.state {
            PushUpState::AwaitingDescent if gates.arm_extended => (
                PushUpProgress {
                    state: PushUpState::AwaitingAscent,
                    count: self.count,
                },
                None,
            ),
            PushUpState::AwaitingAscent if gates.arm_bent => {
                let count = self.count.saturating_add(1);
                (
                    PushUpProgress {
                        state: PushUpState::AwaitingDescent,
                        count,
                    },
                    Some(RepetitionEvent { count }),
                )
            }
            _ => (self, None),
        }
    }
}

/// Push-up repetition counter
pub struct PushUpDetector {
    progress: PushUpProgress,
    config: PushUpConfig,
}

impl PushUpDetector {
    /// Create a detector with default tolerances
    pub fn new() -> Self {
        Self::with_config(PushUpConfig::default())
    }

    /// Create a detector with custom tolerances
    pub fn with_config(config: PushUpConfig) -> Self {
        PushUpDetector {
            progress: PushUpProgress::default(),
            config,
        }
    }

    /// Create a detector after validating the configuration
    pub fn try_with_config(config: PushUpConfig) -> RepsenseResult<Self> {
        config.validate()?;
        Ok(Self::with_config(config))
    }

    /// Evaluate one frame. Returns an event when a repetition completes.
    pub fn evaluate_frame(&mut self, angles: &PoseAngles) -> Option<RepetitionEvent> {
        let gates = self.config.gates(angles);

        trace!(
            state = ?self.progress.state,
            body_line = angles.body_line,
            body_horizontal = angles.body_horizontal,
            forearm_horizontal = angles.forearm_horizontal,
            elbow = angles.elbow,
            body_straight = gates.body_straight,
            body_is_horizontal = gates.body_horizontal,
            forearm_vertical = gates.forearm_vertical,
            arm_extended = gates.arm_extended,
            arm_bent = gates.arm_bent,
            "push-up frame"
        );

        let (next, event) = self.progress.step(&gates);
        if next.state != self.progress.state {
            debug!(from = ?self.progress.state, to = ?next.state, count = next.count, "push-up transition");
        }
        self.progress = next;
        event
    }

    pub fn repetition_count(&self) -> u32 {
        self.progress.count
    }

    pub fn state(&self) -> PushUpState {
        self.progress.state
    }

    pub fn config(&self) -> &PushUpConfig {
        &self.config
    }
}

impl Default for PushUpDetector {
    fn default() -> Self {
        Self::new()
    }
}
