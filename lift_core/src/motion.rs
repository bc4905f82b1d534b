//! Floor-to-floor travel.

use crate::engine::LiftCore;
use crate::error::Result;
use crate::events::LiftEvent;
use crate::types::{Direction, FloorIndex};

impl<I: lift_traits::ButtonInput, D: lift_traits::Indicator> LiftCore<I, D> {
    /// Travel to `target` one floor at a time.
    ///
    /// At each floor the lamp moves and an arrival is reported. A floor with a
    /// pending call gets a full door cycle and its call cleared; any other
    /// floor costs one travel hold, during which buttons keep being sampled.
    pub(crate) fn move_to(&mut self, target: FloorIndex) -> Result<()> {
        let direction = Direction::toward(self.state.current_floor, target);
        if direction == Direction::Idle {
            return Ok(());
        }
        if !(1..=self.cfg.floors).contains(&target) {
            return Err(crate::error::LiftError::State(format!(
                "move target {target} outside 1..={}",
                self.cfg.floors
            ))
            .into());
        }
        self.state.direction = direction;
        tracing::debug!(
            from = self.state.current_floor,
            to = target,
            direction = %direction,
            "moving"
        );

        while self.state.current_floor != target {
            let next = match direction {
                Direction::Up => self.state.current_floor + 1,
                _ => self.state.current_floor - 1,
            };
            self.state.current_floor = next;
            self.floors_travelled += 1;

            self.light_floor(next)?;
            self.emit(LiftEvent::Arrival {
                floor: next,
                direction,
            });

            if self.registry.is_pending(next) {
                self.service_stop()?;
                self.registry.clear(next);
            } else {
                tracing::trace!(floor = next, "passing floor");
                self.hold(self.cfg.timing.travel())?;
            }
        }
        Ok(())
    }
}
