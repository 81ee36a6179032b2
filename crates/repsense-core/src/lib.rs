//! repsense Core - Fundamental types and primitives
//!
//! This crate defines the core types used throughout repsense:
//! - Planar geometry over body landmarks (angles, bearings, distances, sides)
//! - Frame time primitives
//! - Classification events
//! - Error types for the fallible outer surfaces

pub mod error;
pub mod event;
pub mod geometry;
pub mod time;

pub use error::*;
pub use event::*;
pub use geometry::*;
pub use time::*;
