//! Configuration types for the lift engine.
//!
//! These are the runtime configuration structs used by `Lift`.
//! They are separate from the TOML-deserialized config in `lift_config`.

use std::time::Duration;

/// Timing of the debounce window and the two timed holds.
///
/// The door-open and inter-floor holds are independent even though they share
/// a default.
#[derive(Debug, Clone)]
pub struct TimingCfg {
    /// A raw reading must be stable this long before it is trusted.
    pub debounce_ms: u64,
    /// Doors stay open this long at every service stop.
    pub door_open_ms: u64,
    /// Hold after passing a floor that has no pending call.
    pub travel_ms: u64,
    /// Button polling interval inside holds. Must be below `debounce_ms`.
    pub poll_ms: u64,
    /// Sleep between ticks when idle.
    pub idle_tick_ms: u64,
}

impl Default for TimingCfg {
    fn default() -> Self {
        Self {
            debounce_ms: 50,
            door_open_ms: 3000,
            travel_ms: 3000,
            poll_ms: 10,
            idle_tick_ms: 10,
        }
    }
}

impl TimingCfg {
    #[inline]
    pub fn door_open(&self) -> Duration {
        Duration::from_millis(self.door_open_ms)
    }
    #[inline]
    pub fn travel(&self) -> Duration {
        Duration::from_millis(self.travel_ms)
    }
    #[inline]
    pub fn poll(&self) -> Duration {
        Duration::from_millis(self.poll_ms)
    }
    #[inline]
    pub fn idle_tick(&self) -> Duration {
        Duration::from_millis(self.idle_tick_ms)
    }
}

/// Building layout and timing.
#[derive(Debug, Clone)]
pub struct LiftCfg {
    /// Number of floors N (>= 2). Floors are numbered 1..=N.
    pub floors: u8,
    /// Floor the car reports on startup.
    pub start_floor: u8,
    pub timing: TimingCfg,
}

impl Default for LiftCfg {
    fn default() -> Self {
        Self {
            floors: 4,
            start_floor: 1,
            timing: TimingCfg::default(),
        }
    }
}
