//! repsense Test Harness - synthetic pose streams and scenario replay
//!
//! This crate provides:
//! - Seeded pose simulation with estimator jitter
//! - Preset simulator scenarios
//! - End-to-end replay through the tracker on a manual clock

pub mod integration;
pub mod simulator;

pub use integration::*;
pub use simulator::*;
