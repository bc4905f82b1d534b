//! SCAN (elevator algorithm) next-stop resolution.
//!
//! The scheduler is pure: it reads the car state and the registry and returns
//! a `Plan`. The caller applies the plan's direction.
//!
//! Rules:
//! - Idle: serve the current floor in place if it is called, otherwise head
//!   for the nearest call above, otherwise the nearest call below.
//! - Up / Down: keep going toward the nearest call in the travel direction.
//!   When nothing is left ahead, reverse at most once per resolution.
//! - No calls anywhere: no plan; the car goes idle.

use crate::registry::CallRegistry;
use crate::types::{Direction, ElevatorState, FloorIndex};

/// Where to go next and which way the car is heading while it gets there.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Plan {
    pub target: FloorIndex,
    pub direction: Direction,
}

#[derive(Debug, Default, Clone, Copy)]
pub struct Scheduler;

impl Scheduler {
    pub fn next_target(state: &ElevatorState, registry: &CallRegistry) -> Option<Plan> {
        let here = state.current_floor;
        let mut heading = match state.direction {
            Direction::Idle => return Self::from_idle(here, registry),
            d => d,
        };

        // Current direction first, then one reversal.
        for _ in 0..2 {
            let found = match heading {
                Direction::Up => registry.first_above(here),
                Direction::Down => registry.first_below(here),
                Direction::Idle => None,
            };
            if let Some(target) = found {
                return Some(Plan {
                    target,
                    direction: heading,
                });
            }
            heading = heading.reversed();
        }
        None
    }

    fn from_idle(here: FloorIndex, registry: &CallRegistry) -> Option<Plan> {
        if registry.is_pending(here) {
            return Some(Plan {
                target: here,
                direction: Direction::Idle,
            });
        }
        if let Some(target) = registry.first_above(here) {
            return Some(Plan {
                target,
                direction: Direction::Up,
            });
        }
        registry.first_below(here).map(|target| Plan {
            target,
            direction: Direction::Down,
        })
    }
}
