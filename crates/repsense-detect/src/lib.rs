//! repsense Detect - exercise classification from pose angles
//!
//! Both detectors consume the same four angle magnitudes per frame
//! (`PoseAngles`) and never see raw landmarks:
//! - `PushUpDetector`: two-state repetition counter
//! - `PlankDetector`: debounced whole-second duration tracker
//!
//! Neither detector locks internally. Frames for one instance must arrive
//! sequentially; multi-threaded callers serialize access themselves.

pub mod alignment;
pub mod angles;
pub mod plank;
pub mod pushup;

pub use alignment::*;
pub use angles::*;
pub use plank::*;
pub use pushup::*;
