//! The four per-frame angle magnitudes both detectors consume

use serde::{Deserialize, Serialize};

/// Derived angles for one frame, all magnitudes in degrees
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct PoseAngles {
    /// |included angle| along shoulder-hip-ankle
    pub body_line: f32,
    /// |bearing| of shoulder-to-ankle against horizontal
    pub body_horizontal: f32,
    /// |bearing| of elbow-to-wrist against horizontal
    pub forearm_horizontal: f32,
    /// |included angle| at the elbow (shoulder-elbow-wrist)
    pub elbow: f32,
}

impl PoseAngles {
    /// Build from raw angles, taking magnitudes
    pub fn new(body_line: f32, body_horizontal: f32, forearm_horizontal: f32, elbow: f32) -> Self {
        Self {
            body_line: body_line.abs(),
            body_horizontal: body_horizontal.abs(),
            forearm_horizontal: forearm_horizontal.abs(),
            elbow: elbow.abs(),
        }
    }

    pub fn is_finite(&self) -> bool {
        self.body_line.is_finite()
            && self.body_horizontal.is_finite()
            && self.forearm_horizontal.is_finite()
            && self.elbow.is_finite()
    }
}
