//! Planar geometry over body landmarks
//!
//! Pure, stateless measurements. Degenerate input (coincident points,
//! zero-length segments) never fails: angles come back as 0°.

use serde::{Deserialize, Serialize};

/// 2D landmark position (normalized image coordinates, usually 0-1)
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Point2D {
    pub x: f32,
    pub y: f32,
}

impl Point2D {
    pub fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    pub fn zero() -> Self {
        Self::default()
    }

    /// Both coordinates are finite
    pub fn is_finite(&self) -> bool {
        self.x.is_finite() && self.y.is_finite()
    }

    /// Distance to another point
    pub fn distance(&self, other: &Point2D) -> f32 {
        distance(*self, *other)
    }
}

impl From<(f32, f32)> for Point2D {
    fn from((x, y): (f32, f32)) -> Self {
        Self { x, y }
    }
}

/// Half-plane of a directed line
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Side {
    Left,
    Right,
}

/// Unsigned angle at vertex `b`, in [0°, 180°].
///
/// Measured between the edge vectors `a→b` and `b→c`, so three collinear
/// points in order give 0° and a right-angle turn gives 90°. The absolute
/// cross product makes the result independent of winding direction.
pub fn included_angle(a: Point2D, b: Point2D, c: Point2D) -> f32 {
    let ax = b.x - a.x;
    let ay = b.y - a.y;
    let bx = c.x - b.x;
    let by = c.y - b.y;

    let dot = ax * bx + ay * by;
    let cross = ax * by - ay * bx;

    // atan2(0, 0) == 0, which covers zero-length edges
    cross.abs().atan2(dot).to_degrees()
}

/// Signed angle of segment `a→b` against the positive horizontal axis,
/// in (−180°, 180°]. Sign follows whatever y convention the caller uses.
pub fn bearing(a: Point2D, b: Point2D) -> f32 {
    let degrees = (b.y - a.y).atan2(b.x - a.x).to_degrees();
    // atan2(-0.0, negative) lands on -180; fold it onto the open end
    if degrees <= -180.0 {
        180.0
    } else {
        degrees
    }
}

/// Euclidean distance
pub fn distance(a: Point2D, b: Point2D) -> f32 {
    let dx = a.x - b.x;
    let dy = a.y - b.y;
    (dx * dx + dy * dy).sqrt()
}

/// Which side of the directed line `line_start→line_end` a point lies on.
///
/// A zero cross product (point on the line, or a zero-length line) is `Left`.
pub fn side_of_line(point: Point2D, line_start: Point2D, line_end: Point2D) -> Side {
    let value = (line_end.x - line_start.x) * (point.y - line_start.y)
        - (line_end.y - line_start.y) * (point.x - line_start.x);

    if value >= 0.0 {
        Side::Left
    } else {
        Side::Right
    }
}
