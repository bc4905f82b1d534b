//! Outcome reported from each control loop tick.

use crate::types::FloorIndex;

/// What a single `tick()` did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickOutcome {
    /// Nothing to do; the car is idle.
    Idle,
    /// Doors cycled at the floor the car was already standing at.
    Serviced { floor: FloorIndex },
    /// The car travelled to `to`, servicing called floors on the way.
    Moved { from: FloorIndex, to: FloorIndex },
}
