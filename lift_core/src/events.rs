//! Status events emitted by the controller.

use crate::types::{Direction, FloorIndex};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LiftEvent {
    CallRegistered {
        floor: FloorIndex,
    },
    Arrival {
        floor: FloorIndex,
        direction: Direction,
    },
    DoorsOpening {
        floor: FloorIndex,
        /// Floors with a pending call when the doors started to open.
        pending: Vec<FloorIndex>,
    },
    DoorsClosing {
        floor: FloorIndex,
    },
}

/// Write-only telemetry sink. Nothing flows back into the controller.
pub trait EventSink {
    fn record(&mut self, event: &LiftEvent);
}

/// Default sink: one structured `tracing` event per status change.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingSink;

impl EventSink for TracingSink {
    fn record(&mut self, event: &LiftEvent) {
        match event {
            LiftEvent::CallRegistered { floor } => {
                tracing::info!(floor, "call registered");
            }
            LiftEvent::Arrival { floor, direction } => {
                tracing::info!(floor, direction = %direction, "arrived");
            }
            LiftEvent::DoorsOpening { floor, pending } => {
                tracing::info!(floor, pending = ?pending, "doors opening");
            }
            LiftEvent::DoorsClosing { floor } => {
                tracing::info!(floor, "doors closing");
            }
        }
    }
}

impl<S: EventSink + ?Sized> EventSink for Box<S> {
    fn record(&mut self, event: &LiftEvent) {
        (**self).record(event);
    }
}
