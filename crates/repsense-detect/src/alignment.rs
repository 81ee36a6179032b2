//! Tolerance-window tests on angles
//!
//! Callers pass magnitudes where axis-agnostic alignment is intended;
//! nothing here normalizes sign.

/// True iff `value` lies in the closed interval `[target - tolerance, target + tolerance]`
#[inline]
pub fn is_near(value: f32, target: f32, tolerance: f32) -> bool {
    value >= target - tolerance && value <= target + tolerance
}

/// True iff `value` is near 0° or near 180° with the same tolerance
#[inline]
pub fn is_aligned_to_axis(value: f32, tolerance: f32) -> bool {
    is_near(value, 0.0, tolerance) || is_near(value, 180.0, tolerance)
}
