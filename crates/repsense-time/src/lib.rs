//! repsense Time - injectable frame clocks
//!
//! Duration tracking reads time only through a `FrameClock`:
//! - `MonotonicClock` for live capture
//! - `ManualClock` for recorded replay and deterministic tests

pub mod clock;

pub use clock::*;
