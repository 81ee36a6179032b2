//! repsense Runtime - landmark stream orchestration
//!
//! This crate connects a pose estimator's output to the detectors:
//! - `FrameAdapter`: landmark selection and angle derivation
//! - `ExerciseTracker`: runs both detectors once per frame
//! - `SharedTracker`: mutex-serialized tracker for multi-threaded pipelines
//! - `RuntimeConfig`: JSON configuration
//! - `init_logging`: tracing subscriber setup

pub mod adapter;
pub mod config;
pub mod logging;
pub mod sink;
pub mod tracker;

pub use adapter::*;
pub use config::*;
pub use logging::*;
pub use sink::*;
pub use tracker::*;
