//! Frame adapter - raw pose landmarks to detector input
//!
//! Picks shoulder, hip, ankle, elbow, wrist and ear for one body side out of
//! a MediaPipe Pose landmark set and derives the four angle magnitudes.

use repsense_core::{bearing, included_angle, Point2D, RepsenseError, RepsenseResult};
use repsense_detect::PoseAngles;
use serde::{Deserialize, Serialize};
use tracing::warn;

// ============================================================================
// LANDMARK INDICES (MediaPipe Pose - 33 total)
// ============================================================================

pub const POSE_LANDMARK_COUNT: usize = 33;

pub const LEFT_EAR: usize = 7;
pub const RIGHT_EAR: usize = 8;
pub const LEFT_SHOULDER: usize = 11;
pub const RIGHT_SHOULDER: usize = 12;
pub const LEFT_ELBOW: usize = 13;
pub const RIGHT_ELBOW: usize = 14;
pub const LEFT_WRIST: usize = 15;
pub const RIGHT_WRIST: usize = 16;
pub const LEFT_HIP: usize = 23;
pub const RIGHT_HIP: usize = 24;
pub const LEFT_ANKLE: usize = 27;
pub const RIGHT_ANKLE: usize = 28;

/// One landmark as delivered by the pose estimator
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Landmark {
    pub position: Point2D,
    /// Estimator visibility score in [0, 1], if provided
    pub visibility: Option<f32>,
}

impl Landmark {
    pub fn new(x: f32, y: f32) -> Self {
        Self {
            position: Point2D::new(x, y),
            visibility: None,
        }
    }

    pub fn with_visibility(x: f32, y: f32, visibility: f32) -> Self {
        Self {
            position: Point2D::new(x, y),
            visibility: Some(visibility),
        }
    }

    /// Missing scores count as fully visible
    pub fn visibility_or_full(&self) -> f32 {
        self.visibility.unwrap_or(1.0)
    }
}

/// Which side of the body to read
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BodySide {
    /// Left side, usually the one facing a side-on camera
    #[default]
    Left,
    Right,
    /// Whichever side has the higher summed visibility (ties go left)
    Auto,
}

impl BodySide {
    /// Landmark indices in the order shoulder, hip, ankle, elbow, wrist, ear.
    /// `Auto` has no fixed indices.
    pub fn indices(self) -> Option<[usize; 6]> {
        match self {
            BodySide::Left => Some([
                LEFT_SHOULDER,
                LEFT_HIP,
                LEFT_ANKLE,
                LEFT_ELBOW,
                LEFT_WRIST,
                LEFT_EAR,
            ]),
            BodySide::Right => Some([
                RIGHT_SHOULDER,
                RIGHT_HIP,
                RIGHT_ANKLE,
                RIGHT_ELBOW,
                RIGHT_WRIST,
                RIGHT_EAR,
            ]),
            BodySide::Auto => None,
        }
    }
}

/// The six landmarks of one body side
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SideLandmarks {
    pub side: BodySide,
    pub shoulder: Point2D,
    pub hip: Point2D,
    pub ankle: Point2D,
    pub elbow: Point2D,
    pub wrist: Point2D,
    pub ear: Point2D,
    /// Lowest visibility among the six
    pub min_visibility: f32,
}

impl SideLandmarks {
    /// Select one side's landmarks. `Auto` is resolved by visibility.
    pub fn select(landmarks: &[Landmark], side: BodySide) -> RepsenseResult<Self> {
        let side = match side {
            BodySide::Auto => Self::most_visible_side(landmarks)?,
            fixed => fixed,
        };
        let indices = side.indices().unwrap_or([0; 6]);
        let mut picked = [Landmark::default(); 6];

        for (slot, &index) in picked.iter_mut().zip(indices.iter()) {
            let landmark = landmarks
                .get(index)
                .ok_or(RepsenseError::LandmarkCountMismatch {
                    expected: index + 1,
                    actual: landmarks.len(),
                })?;
            if !landmark.position.is_finite() {
                return Err(RepsenseError::NonFiniteLandmark { index });
            }
            *slot = *landmark;
        }

        let min_visibility = picked
            .iter()
            .map(Landmark::visibility_or_full)
            .fold(f32::INFINITY, f32::min);

        Ok(SideLandmarks {
            side,
            shoulder: picked[0].position,
            hip: picked[1].position,
            ankle: picked[2].position,
            elbow: picked[3].position,
            wrist: picked[4].position,
            ear: picked[5].position,
            min_visibility,
        })
    }

    fn most_visible_side(landmarks: &[Landmark]) -> RepsenseResult<BodySide> {
        if landmarks.len() <= RIGHT_ANKLE {
            return Err(RepsenseError::LandmarkCountMismatch {
                expected: RIGHT_ANKLE + 1,
                actual: landmarks.len(),
            });
        }
        let score = |side: BodySide| -> f32 {
            side.indices()
                .map(|idx| idx.iter().map(|&i| landmarks[i].visibility_or_full()).sum::<f32>())
                .unwrap_or(0.0)
        };

        if score(BodySide::Right) > score(BodySide::Left) {
            Ok(BodySide::Right)
        } else {
            Ok(BodySide::Left)
        }
    }

    /// The four angle magnitudes both detectors consume
    pub fn pose_angles(&self) -> PoseAngles {
        PoseAngles::new(
            included_angle(self.shoulder, self.hip, self.ankle),
            bearing(self.shoulder, self.ankle),
            bearing(self.elbow, self.wrist),
            included_angle(self.shoulder, self.elbow, self.wrist),
        )
    }

    /// Signed ear-to-ankle bearing, near 0° at the bottom of a push-up
    pub fn head_line(&self) -> f32 {
        bearing(self.ear, self.ankle)
    }
}

/// Outcome of adapting one frame
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum AdaptedFrame {
    /// Usable frame
    Angles(PoseAngles),
    /// Landmarks present but below the visibility floor; counts as an invalid frame
    LowVisibility { min_visibility: f32 },
}

/// Turns raw landmark sets into detector input
#[derive(Debug, Clone)]
pub struct FrameAdapter {
    side: BodySide,
    min_visibility: f32,
}

impl FrameAdapter {
    pub fn new(side: BodySide, min_visibility: f32) -> Self {
        Self {
            side,
            min_visibility,
        }
    }

    pub fn side(&self) -> BodySide {
        self.side
    }

    /// Adapt one frame.
    ///
    /// Short or non-finite landmark sets are errors; low visibility is not.
    pub fn adapt(&self, landmarks: &[Landmark]) -> RepsenseResult<AdaptedFrame> {
        let selected = SideLandmarks::select(landmarks, self.side).map_err(|err| {
            warn!(error = %err, "rejected landmark frame");
            err
        })?;

        if selected.min_visibility < self.min_visibility {
            return Ok(AdaptedFrame::LowVisibility {
                min_visibility: selected.min_visibility,
            });
        }

        Ok(AdaptedFrame::Angles(selected.pose_angles()))
    }
}

impl Default for FrameAdapter {
    fn default() -> Self {
        Self::new(BodySide::Left, 0.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Side-on push-up top position, image y pointing down
    fn push_up_top(side: BodySide) -> Vec<Landmark> {
        let mut landmarks = vec![Landmark::new(0.5, 0.5); POSE_LANDMARK_COUNT];
        let indices = side.indices().unwrap();
        let points = [
            (0.30, 0.40), // shoulder
            (0.55, 0.42), // hip
            (0.80, 0.44), // ankle
            (0.30, 0.52), // elbow
            (0.30, 0.64), // wrist
            (0.25, 0.38), // ear
        ];
        for (&i, &(x, y)) in indices.iter().zip(points.iter()) {
            landmarks[i] = Landmark::new(x, y);
        }
        landmarks
    }

    #[test]
    fn test_select_left() {
        let landmarks = push_up_top(BodySide::Left);
        let selected = SideLandmarks::select(&landmarks, BodySide::Left).unwrap();
        assert_eq!(selected.side, BodySide::Left);
        assert_eq!(selected.shoulder, Point2D::new(0.30, 0.40));
        assert_eq!(selected.ear, Point2D::new(0.25, 0.38));
        assert_eq!(selected.min_visibility, 1.0);
    }

    #[test]
    fn test_pose_angles_push_up_top() {
        let landmarks = push_up_top(BodySide::Left);
        let angles = SideLandmarks::select(&landmarks, BodySide::Left)
            .unwrap()
            .pose_angles();

        assert!(angles.body_line < 5.0);
        assert!(angles.body_horizontal < 10.0);
        assert!((angles.forearm_horizontal - 90.0).abs() < 1.0);
        assert!(angles.elbow < 20.0 || angles.elbow > 160.0);
    }

    #[test]
    fn test_short_landmark_set() {
        let landmarks = vec![Landmark::new(0.1, 0.1); 20];
        let err = SideLandmarks::select(&landmarks, BodySide::Left).unwrap_err();
        assert_eq!(
            err,
            RepsenseError::LandmarkCountMismatch {
                expected: LEFT_HIP + 1,
                actual: 20
            }
        );
    }

    #[test]
    fn test_non_finite_rejected() {
        let mut landmarks = push_up_top(BodySide::Right);
        landmarks[RIGHT_WRIST] = Landmark::new(f32::NAN, 0.3);
        let adapter = FrameAdapter::new(BodySide::Right, 0.0);
        assert_eq!(
            adapter.adapt(&landmarks),
            Err(RepsenseError::NonFiniteLandmark { index: RIGHT_WRIST })
        );
    }

    #[test]
    fn test_auto_side_picks_visible() {
        let mut landmarks = push_up_top(BodySide::Right);
        for &i in BodySide::Left.indices().unwrap().iter() {
            landmarks[i].visibility = Some(0.2);
        }
        let selected = SideLandmarks::select(&landmarks, BodySide::Auto).unwrap();
        assert_eq!(selected.side, BodySide::Right);

        let plain = push_up_top(BodySide::Left);
        let selected = SideLandmarks::select(&plain, BodySide::Auto).unwrap();
        assert_eq!(selected.side, BodySide::Left);
    }

    #[test]
    fn test_low_visibility_frame() {
        let mut landmarks = push_up_top(BodySide::Left);
        landmarks[LEFT_ANKLE].visibility = Some(0.3);
        let adapter = FrameAdapter::new(BodySide::Left, 0.5);

        match adapter.adapt(&landmarks).unwrap() {
            AdaptedFrame::LowVisibility { min_visibility } => {
                assert!((min_visibility - 0.3).abs() < 1e-6)
            }
            other => panic!("expected low visibility, got {:?}", other),
        }
    }

    #[test]
    fn test_head_line() {
        let landmarks = push_up_top(BodySide::Left);
        let selected = SideLandmarks::select(&landmarks, BodySide::Left).unwrap();
        assert!(selected.head_line().abs() < 10.0);
    }

    mod properties {
        use super::*;
        use proptest::prelude::*;

        fn landmark() -> impl Strategy<Value = Landmark> {
            (0.0f32..=1.0, 0.0f32..=1.0, 0.0f32..=1.0)
                .prop_map(|(x, y, v)| Landmark::with_visibility(x, y, v))
        }

        proptest! {
            #[test]
            fn prop_finite_frames_adapt_to_magnitudes(
                landmarks in prop::collection::vec(landmark(), POSE_LANDMARK_COUNT),
                side in prop_oneof![Just(BodySide::Left), Just(BodySide::Right), Just(BodySide::Auto)],
            ) {
                match FrameAdapter::new(side, 0.0).adapt(&landmarks) {
                    Ok(AdaptedFrame::Angles(angles)) => {
                        prop_assert!(angles.is_finite());
                        for value in [angles.body_line, angles.body_horizontal, angles.forearm_horizontal, angles.elbow] {
                            prop_assert!((0.0..=180.0).contains(&value));
                        }
                    }
                    other => prop_assert!(false, "unexpected {:?}", other),
                }
            }
        }
    }
}
