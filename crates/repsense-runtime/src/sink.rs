//! Event delivery
//!
//! Delivery is synchronous and in order. Sinks must return quickly; the
//! tracker does not buffer or retry.

use std::sync::mpsc::Sender;

use repsense_core::ExerciseEvent;
use tracing::debug;

/// Receives events as the tracker produces them
pub trait EventSink {
    fn deliver(&mut self, event: ExerciseEvent);
}

impl EventSink for Vec<ExerciseEvent> {
    fn deliver(&mut self, event: ExerciseEvent) {
        self.push(event);
    }
}

impl EventSink for Sender<ExerciseEvent> {
    fn deliver(&mut self, event: ExerciseEvent) {
        if self.send(event).is_err() {
            debug!("event receiver dropped");
        }
    }
}

/// Adapts a closure into a sink
pub struct CallbackSink<F>(pub F);

impl<F: FnMut(ExerciseEvent)> EventSink for CallbackSink<F> {
    fn deliver(&mut self, event: ExerciseEvent) {
        (self.0)(event)
    }
}
