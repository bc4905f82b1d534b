//! Type-state builder for `Lift` and generic `build_lift` constructor.
//!
//! The builder enforces at compile time that the button input and the
//! indicator are provided before `build()` is available. `try_build()` is
//! always available for dynamic checks.

use std::marker::PhantomData;
use std::sync::Arc;

use lift_traits::clock::{Clock, MonotonicClock};

use crate::config::{LiftCfg, TimingCfg};
use crate::engine::LiftCore;
use crate::error::{BuildError, Result};
use crate::events::{EventSink, TracingSink};
use crate::registry::CallRegistry;
use crate::status::TickOutcome;
use crate::types::ElevatorState;

// ── Public dynamic-dispatch wrapper ──────────────────────────────────────────

/// Public dynamic (boxed) lift controller.
pub struct Lift {
    pub(crate) inner: LiftCore<Box<dyn lift_traits::ButtonInput>, Box<dyn lift_traits::Indicator>>,
}

impl core::fmt::Debug for Lift {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Lift")
            .field("state", &self.inner.state)
            .field("pending", &self.inner.registry.snapshot())
            .finish()
    }
}

impl Lift {
    /// Start building a Lift.
    pub fn builder() -> LiftBuilder<Missing, Missing> {
        LiftBuilder::default()
    }

    /// Reset to the startup condition. Call before running.
    pub fn begin(&mut self) -> Result<()> {
        self.inner.begin()
    }

    /// One iteration of the control loop.
    pub fn tick(&mut self) -> Result<TickOutcome> {
        self.inner.tick()
    }

    pub fn state(&self) -> &ElevatorState {
        self.inner.state()
    }

    pub fn registry(&self) -> &CallRegistry {
        self.inner.registry()
    }

    pub fn cfg(&self) -> &LiftCfg {
        self.inner.cfg()
    }

    /// Milliseconds on the lift clock since construction.
    pub fn now_ms(&self) -> u64 {
        self.inner.now_ms()
    }

    pub fn stops_serviced(&self) -> u64 {
        self.inner.stops_serviced()
    }

    pub fn floors_travelled(&self) -> u64 {
        self.inner.floors_travelled()
    }

    /// Turn every lamp off (best effort on shutdown).
    pub fn lamp_test(&mut self) -> Result<()> {
        self.inner.lamp_test()
    }

    pub fn lamps_off(&mut self) -> Result<()> {
        self.inner.lamps_off()
    }
}

// ── Type-state markers ───────────────────────────────────────────────────────

pub struct Missing;
pub struct Set;

/// Builder for `Lift`. All fields are validated on `build()`.
pub struct LiftBuilder<I, D> {
    input: Option<Box<dyn lift_traits::ButtonInput>>,
    indicator: Option<Box<dyn lift_traits::Indicator>>,
    sink: Option<Box<dyn EventSink>>,
    clock: Option<Box<dyn Clock + Send + Sync>>,
    floors: Option<u8>,
    start_floor: Option<u8>,
    timing: Option<TimingCfg>,
    _i: PhantomData<I>,
    _d: PhantomData<D>,
}

impl Default for LiftBuilder<Missing, Missing> {
    fn default() -> Self {
        Self {
            input: None,
            indicator: None,
            sink: None,
            clock: None,
            floors: None,
            start_floor: None,
            timing: None,
            _i: PhantomData,
            _d: PhantomData,
        }
    }
}

impl<I, D> LiftBuilder<I, D> {
    /// Validate and build. Available in every builder state.
    pub fn try_build(self) -> Result<Lift> {
        let input = self.input.ok_or(BuildError::MissingInput)?;
        let indicator = self.indicator.ok_or(BuildError::MissingIndicator)?;
        let defaults = LiftCfg::default();
        let cfg = LiftCfg {
            floors: self.floors.unwrap_or(defaults.floors),
            start_floor: self.start_floor.unwrap_or(defaults.start_floor),
            timing: self.timing.unwrap_or(defaults.timing),
        };
        validate_cfg(&cfg)?;

        let sink = self.sink.unwrap_or_else(|| Box::new(TracingSink));
        let clock: Arc<dyn Clock + Send + Sync> = match self.clock {
            Some(c) => Arc::from(c),
            None => Arc::new(MonotonicClock::new()),
        };
        Ok(Lift {
            inner: LiftCore::new(input, indicator, sink, cfg, clock),
        })
    }

    pub fn with_floors(mut self, floors: u8) -> Self {
        self.floors = Some(floors);
        self
    }

    pub fn with_start_floor(mut self, floor: u8) -> Self {
        self.start_floor = Some(floor);
        self
    }

    pub fn with_timing(mut self, timing: TimingCfg) -> Self {
        self.timing = Some(timing);
        self
    }

    /// Apply building layout and timing from a runtime config.
    pub fn with_cfg(mut self, cfg: LiftCfg) -> Self {
        self.floors = Some(cfg.floors);
        self.start_floor = Some(cfg.start_floor);
        self.timing = Some(cfg.timing);
        self
    }

    pub fn with_sink(mut self, sink: impl EventSink + 'static) -> Self {
        self.sink = Some(Box::new(sink));
        self
    }

    pub fn with_clock(mut self, clock: Box<dyn Clock + Send + Sync>) -> Self {
        self.clock = Some(clock);
        self
    }

    fn retype<I2, D2>(self) -> LiftBuilder<I2, D2> {
        LiftBuilder {
            input: self.input,
            indicator: self.indicator,
            sink: self.sink,
            clock: self.clock,
            floors: self.floors,
            start_floor: self.start_floor,
            timing: self.timing,
            _i: PhantomData,
            _d: PhantomData,
        }
    }
}

impl<D> LiftBuilder<Missing, D> {
    pub fn with_input(mut self, input: impl lift_traits::ButtonInput + 'static) -> LiftBuilder<Set, D> {
        self.input = Some(Box::new(input));
        self.retype()
    }
}

impl<I> LiftBuilder<I, Missing> {
    pub fn with_indicator(
        mut self,
        indicator: impl lift_traits::Indicator + 'static,
    ) -> LiftBuilder<I, Set> {
        self.indicator = Some(Box::new(indicator));
        self.retype()
    }
}

impl LiftBuilder<Set, Set> {
    /// Build; input and indicator are guaranteed present by the type state.
    pub fn build(self) -> Result<Lift> {
        self.try_build()
    }
}

/// Static-dispatch alias for callers that want to keep their concrete types.
pub type LiftG<I, D> = LiftCore<I, D>;

/// Build a statically dispatched core without boxing the collaborators.
pub fn build_lift<I, D>(
    input: I,
    indicator: D,
    cfg: LiftCfg,
    sink: Option<Box<dyn EventSink>>,
    clock: Option<Arc<dyn Clock + Send + Sync>>,
) -> Result<LiftCore<I, D>>
where
    I: lift_traits::ButtonInput,
    D: lift_traits::Indicator,
{
    validate_cfg(&cfg)?;
    Ok(LiftCore::new(
        input,
        indicator,
        sink.unwrap_or_else(|| Box::new(TracingSink)),
        cfg,
        clock.unwrap_or_else(|| Arc::new(MonotonicClock::new())),
    ))
}

fn validate_cfg(cfg: &LiftCfg) -> Result<()> {
    if cfg.floors < 2 {
        return Err(BuildError::InvalidConfig("floors must be >= 2").into());
    }
    if cfg.floors > lift_config::MAX_FLOORS {
        return Err(BuildError::InvalidConfig("floors must be <= 32").into());
    }
    if !(1..=cfg.floors).contains(&cfg.start_floor) {
        return Err(BuildError::InvalidConfig("start_floor must be within 1..=floors").into());
    }
    let t = &cfg.timing;
    if t.poll_ms == 0 {
        return Err(BuildError::InvalidConfig("poll_ms must be >= 1").into());
    }
    if t.poll_ms >= t.debounce_ms {
        return Err(BuildError::InvalidConfig("poll_ms must be < debounce_ms").into());
    }
    if t.door_open_ms == 0 {
        return Err(BuildError::InvalidConfig("door_open_ms must be >= 1").into());
    }
    if t.idle_tick_ms == 0 {
        return Err(BuildError::InvalidConfig("idle_tick_ms must be >= 1").into());
    }
    Ok(())
}
