//! Error types for repsense
//!
//! Geometry and detectors are infallible. These errors come from the outer
//! surfaces: landmark selection, configuration and I/O.

use thiserror::Error;

/// Core repsense errors
#[derive(Error, Debug, Clone, PartialEq)]
pub enum RepsenseError {
    // Landmark errors
    #[error("Landmark set too short: expected at least {expected}, got {actual}")]
    LandmarkCountMismatch { expected: usize, actual: usize },

    #[error("Non-finite landmark coordinate at index {index}")]
    NonFiniteLandmark { index: usize },

    // Configuration errors
    #[error("Invalid tolerance {name}: {value}")]
    InvalidTolerance { name: &'static str, value: f32 },

    #[error("Invalid frame threshold: {0}")]
    InvalidThreshold(u32),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("I/O error: {0}")]
    Io(String),
}

/// Result type for repsense operations
pub type RepsenseResult<T> = Result<T, RepsenseError>;

impl From<std::io::Error> for RepsenseError {
    fn from(err: std::io::Error) -> Self {
        RepsenseError::Io(err.to_string())
    }
}

/// Reject negative or non-finite tolerance windows
pub fn check_tolerance(name: &'static str, value: f32) -> RepsenseResult<()> {
    if value.is_finite() && value >= 0.0 {
        Ok(())
    } else {
        Err(RepsenseError::InvalidTolerance { name, value })
    }
}
