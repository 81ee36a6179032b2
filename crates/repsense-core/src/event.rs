//! Classification events
//!
//! Detectors return events as values. Delivery (callback, channel, list)
//! is up to the caller.

use serde::{Deserialize, Serialize};

use crate::FrameTime;

/// A completed push-up repetition. `count` is the new running total.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RepetitionEvent {
    pub count: u32,
}

/// Plank duration update in whole seconds. 0 marks a session boundary.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DurationEvent {
    pub seconds: u32,
}

impl DurationEvent {
    pub fn new(seconds: u32) -> Self {
        Self { seconds }
    }

    /// Session start or reset marker
    pub fn is_boundary(&self) -> bool {
        self.seconds == 0
    }
}

/// Kind of exercise event
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ExerciseEventKind {
    Repetition(RepetitionEvent),
    PlankDuration(DurationEvent),
}

/// Event stamped with the time of the frame that produced it
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExerciseEvent {
    pub time: FrameTime,
    pub kind: ExerciseEventKind,
}

impl ExerciseEvent {
    pub fn repetition(time: FrameTime, event: RepetitionEvent) -> Self {
        Self {
            time,
            kind: ExerciseEventKind::Repetition(event),
        }
    }

    pub fn plank(time: FrameTime, event: DurationEvent) -> Self {
        Self {
            time,
            kind: ExerciseEventKind::PlankDuration(event),
        }
    }

    pub fn as_repetition(&self) -> Option<RepetitionEvent> {
        match self.kind {
            ExerciseEventKind::Repetition(e) => Some(e),
            _ => None,
        }
    }

    pub fn as_plank(&self) -> Option<DurationEvent> {
        match self.kind {
            ExerciseEventKind::PlankDuration(e) => Some(e),
            _ => None,
        }
    }
}
