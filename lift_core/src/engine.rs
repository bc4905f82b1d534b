//! The single-threaded control engine.
//!
//! `LiftCore` owns the car state, the call registry and the per-floor debounce
//! states. Nothing else mutates them. Timed holds (door open, inter-floor
//! travel) keep sampling the buttons every `poll_ms`, so presses made while the
//! car is busy are not lost.

use std::sync::Arc;
use std::time::{Duration, Instant};

use lift_traits::clock::Clock;

use crate::config::LiftCfg;
use crate::debounce::Debouncer;
use crate::error::Result;
use crate::events::{EventSink, LiftEvent};
use crate::hw_error::map_hw_error;
use crate::registry::CallRegistry;
use crate::scheduler::Scheduler;
use crate::status::TickOutcome;
use crate::types::{Direction, ElevatorState, FloorIndex};

/// Unified core for both dynamic (boxed) and generic (static dispatch) variants.
pub struct LiftCore<I: lift_traits::ButtonInput, D: lift_traits::Indicator> {
    pub(crate) input: I,
    pub(crate) indicator: D,
    pub(crate) sink: Box<dyn EventSink>,
    pub(crate) cfg: LiftCfg,
    // Unified clock for deterministic time in tests
    pub(crate) clock: Arc<dyn Clock + Send + Sync>,
    // Epoch Instant for computing monotonic milliseconds
    pub(crate) epoch: Instant,

    pub(crate) state: ElevatorState,
    pub(crate) registry: CallRegistry,
    pub(crate) debouncer: Debouncer,

    // Counters for run summaries
    pub(crate) stops_serviced: u64,
    pub(crate) floors_travelled: u64,
}

impl<I: lift_traits::ButtonInput, D: lift_traits::Indicator> core::fmt::Debug for LiftCore<I, D> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("LiftCore")
            .field("state", &self.state)
            .field("pending", &self.registry.snapshot())
            .field("floors", &self.cfg.floors)
            .finish_non_exhaustive()
    }
}

impl<I: lift_traits::ButtonInput, D: lift_traits::Indicator> LiftCore<I, D> {
    pub(crate) fn new(
        input: I,
        indicator: D,
        sink: Box<dyn EventSink>,
        cfg: LiftCfg,
        clock: Arc<dyn Clock + Send + Sync>,
    ) -> Self {
        let epoch = clock.now();
        Self {
            state: ElevatorState::at(cfg.start_floor),
            registry: CallRegistry::new(cfg.floors),
            debouncer: Debouncer::new(cfg.floors, cfg.timing.debounce_ms),
            input,
            indicator,
            sink,
            cfg,
            clock,
            epoch,
            stops_serviced: 0,
            floors_travelled: 0,
        }
    }

    pub fn state(&self) -> &ElevatorState {
        &self.state
    }

    pub fn registry(&self) -> &CallRegistry {
        &self.registry
    }

    pub fn cfg(&self) -> &LiftCfg {
        &self.cfg
    }

    pub fn indicator(&self) -> &D {
        &self.indicator
    }

    pub fn stops_serviced(&self) -> u64 {
        self.stops_serviced
    }

    pub fn floors_travelled(&self) -> u64 {
        self.floors_travelled
    }

    /// Milliseconds on the lift clock since construction.
    pub fn now_ms(&self) -> u64 {
        self.clock.ms_since(self.epoch)
    }

    /// Reset to the startup condition and drive the lamps to match.
    pub fn begin(&mut self) -> Result<()> {
        self.state = ElevatorState::at(self.cfg.start_floor);
        self.registry.clear_all();
        self.debouncer.reset();
        self.stops_serviced = 0;
        self.floors_travelled = 0;
        self.light_floor(self.state.current_floor)?;
        self.set_door_lamp(false)?;
        tracing::debug!(
            floor = self.state.current_floor,
            floors = self.cfg.floors,
            "lift ready"
        );
        Ok(())
    }

    /// One scheduling step: sample buttons, then at most one move or service.
    pub fn tick(&mut self) -> Result<TickOutcome> {
        self.poll_buttons()?;

        if !self.registry.has_any() {
            return Ok(self.idle());
        }

        let Some(plan) = Scheduler::next_target(&self.state, &self.registry) else {
            return Ok(self.idle());
        };
        if plan.direction != self.state.direction {
            tracing::debug!(
                from = %self.state.direction,
                to = %plan.direction,
                floor = self.state.current_floor,
                "direction change"
            );
        }
        self.state.direction = plan.direction;

        let here = self.state.current_floor;
        if plan.target == here {
            // Stationary with a call for this floor: service in place.
            debug_assert!(self.registry.is_pending(here));
            self.service_stop()?;
            self.registry.clear(here);
            return Ok(TickOutcome::Serviced { floor: here });
        }

        self.move_to(plan.target)?;
        Ok(TickOutcome::Moved {
            from: here,
            to: plan.target,
        })
    }

    /// Step the floor lamp through every floor, flash the door lamp, then
    /// light the current floor again.
    pub fn lamp_test(&mut self) -> Result<()> {
        for floor in 1..=self.cfg.floors {
            self.light_floor(floor)?;
        }
        self.set_door_lamp(true)?;
        self.set_door_lamp(false)?;
        self.light_floor(self.state.current_floor)?;
        tracing::debug!(floors = self.cfg.floors, "lamp test done");
        Ok(())
    }

    /// Turn every lamp off; used on shutdown.
    pub fn lamps_off(&mut self) -> Result<()> {
        for floor in 1..=self.cfg.floors {
            self.indicator
                .set_floor_indicator(floor, false)
                .map_err(|e| eyre::Report::new(map_hw_error(&*e)))?;
        }
        self.set_door_lamp(false)
    }

    fn idle(&mut self) -> TickOutcome {
        if self.state.direction != Direction::Idle {
            tracing::debug!(floor = self.state.current_floor, "no calls left, going idle");
        }
        self.state.direction = Direction::Idle;
        self.clock.sleep(self.cfg.timing.idle_tick());
        TickOutcome::Idle
    }

    /// Sample every button once and register confirmed presses.
    pub(crate) fn poll_buttons(&mut self) -> Result<()> {
        let now = self.now_ms();
        for floor in 1..=self.cfg.floors {
            if let Some(press) = self.debouncer.sample(&mut self.input, floor, now)?
                && self.registry.register(press.floor)
            {
                self.sink
                    .record(&LiftEvent::CallRegistered { floor: press.floor });
            }
        }
        Ok(())
    }

    /// Wait for `d` on the lift clock while keeping the buttons sampled.
    pub(crate) fn hold(&mut self, d: Duration) -> Result<()> {
        let deadline = self.clock.now() + d;
        let poll = self.cfg.timing.poll();
        loop {
            self.poll_buttons()?;
            let now = self.clock.now();
            if now >= deadline {
                return Ok(());
            }
            self.clock.sleep(poll.min(deadline - now));
        }
    }

    /// Light exactly one floor lamp.
    pub(crate) fn light_floor(&mut self, lit: FloorIndex) -> Result<()> {
        for floor in 1..=self.cfg.floors {
            self.indicator
                .set_floor_indicator(floor, floor == lit)
                .map_err(|e| eyre::Report::new(map_hw_error(&*e)))?;
        }
        Ok(())
    }

    pub(crate) fn set_door_lamp(&mut self, on: bool) -> Result<()> {
        self.indicator
            .set_door_indicator(on)
            .map_err(|e| eyre::Report::new(map_hw_error(&*e)))
    }

    pub(crate) fn emit(&mut self, event: LiftEvent) {
        self.sink.record(&event);
    }
}
