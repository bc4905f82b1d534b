//! Timed door cycle at a service stop.

use crate::engine::LiftCore;
use crate::error::Result;
use crate::events::LiftEvent;

impl<I: lift_traits::ButtonInput, D: lift_traits::Indicator> LiftCore<I, D> {
    /// Open the doors, keep them open for `door_open_ms` while sampling the
    /// buttons, then close them. Floor and direction stay frozen throughout.
    ///
    /// Clearing the serviced call is left to the caller.
    pub(crate) fn service_stop(&mut self) -> Result<()> {
        let floor = self.state.current_floor;

        self.state.door_open = true;
        self.set_door_lamp(true)?;
        let pending = self.registry.snapshot();
        self.emit(LiftEvent::DoorsOpening { floor, pending });

        let held = self.hold(self.cfg.timing.door_open());
        debug_assert_eq!(self.state.current_floor, floor);

        // Close even if sampling failed part-way.
        self.state.door_open = false;
        let closed = self.set_door_lamp(false);
        held?;
        closed?;
        self.emit(LiftEvent::DoorsClosing { floor });
        self.stops_serviced += 1;
        Ok(())
    }
}
