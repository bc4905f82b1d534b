//! Test and helper mocks for lift_core
//!
//! All handles are cheap clones over shared state, so a test can hand one copy
//! to the builder and keep another to inspect afterwards.

use std::sync::{Arc, Mutex};
use std::time::Instant;

use lift_traits::clock::{Clock, ManualClock};
use lift_traits::{ButtonInput, FloorIndex, Indicator};

use crate::events::{EventSink, LiftEvent};

type HwResult<T> = Result<T, Box<dyn std::error::Error + Send + Sync>>;

/// A panel on which nothing is ever pressed.
#[derive(Debug, Default, Clone, Copy)]
pub struct ReleasedPanel;

impl ButtonInput for ReleasedPanel {
    fn read_button(&mut self, _floor: FloorIndex) -> HwResult<bool> {
        Ok(true)
    }
}

/// Buttons driven by a time schedule on a shared `ManualClock`.
///
/// Each entry holds `floor` down from `at_ms` for `hold_ms` (relative to the
/// clock's time when the schedule was created).
#[derive(Debug, Clone)]
pub struct PressSchedule {
    clock: ManualClock,
    epoch: Instant,
    presses: Arc<Mutex<Vec<(FloorIndex, u64, u64)>>>,
}

impl PressSchedule {
    pub fn new(clock: ManualClock) -> Self {
        let epoch = clock.now();
        Self {
            clock,
            epoch,
            presses: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Hold `floor` from `at_ms` for `hold_ms`.
    pub fn press(&self, floor: FloorIndex, at_ms: u64, hold_ms: u64) -> &Self {
        if let Ok(mut p) = self.presses.lock() {
            p.push((floor, at_ms, hold_ms));
        }
        self
    }
}

impl ButtonInput for PressSchedule {
    fn read_button(&mut self, floor: FloorIndex) -> HwResult<bool> {
        let now = self.clock.ms_since(self.epoch);
        let presses = self
            .presses
            .lock()
            .map_err(|_| std::io::Error::other("press schedule poisoned"))?;
        let down = presses
            .iter()
            .any(|&(f, at, hold)| f == floor && now >= at && now < at.saturating_add(hold));
        Ok(!down)
    }
}

/// Snapshot of everything a `SpyIndicator` has been told.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct IndicatorLog {
    /// Lamp state per floor, index 0 is floor 1.
    pub floors: Vec<bool>,
    pub door: bool,
    /// Every door lamp write, in order.
    pub door_writes: Vec<bool>,
}

impl IndicatorLog {
    pub fn lit_floors(&self) -> Vec<FloorIndex> {
        self.floors
            .iter()
            .enumerate()
            .filter(|(_, on)| **on)
            .map(|(i, _)| (i + 1) as FloorIndex)
            .collect()
    }
}

/// Records lamp writes for later inspection.
#[derive(Debug, Clone)]
pub struct SpyIndicator {
    log: Arc<Mutex<IndicatorLog>>,
}

impl SpyIndicator {
    pub fn new(floors: u8) -> Self {
        Self {
            log: Arc::new(Mutex::new(IndicatorLog {
                floors: vec![false; usize::from(floors)],
                ..IndicatorLog::default()
            })),
        }
    }

    pub fn snapshot(&self) -> IndicatorLog {
        self.log.lock().map(|l| l.clone()).unwrap_or_default()
    }
}

impl Indicator for SpyIndicator {
    fn set_floor_indicator(&mut self, floor: FloorIndex, on: bool) -> HwResult<()> {
        let mut log = self
            .log
            .lock()
            .map_err(|_| std::io::Error::other("indicator log poisoned"))?;
        let slot = usize::from(floor)
            .checked_sub(1)
            .and_then(|i| log.floors.get_mut(i))
            .ok_or_else(|| std::io::Error::other(format!("no lamp for floor {floor}")))?;
        *slot = on;
        Ok(())
    }

    fn set_door_indicator(&mut self, on: bool) -> HwResult<()> {
        let mut log = self
            .log
            .lock()
            .map_err(|_| std::io::Error::other("indicator log poisoned"))?;
        log.door = on;
        log.door_writes.push(on);
        Ok(())
    }
}

/// Collects every emitted event.
#[derive(Debug, Clone, Default)]
pub struct RecordingSink {
    events: Arc<Mutex<Vec<LiftEvent>>>,
}

impl RecordingSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn events(&self) -> Vec<LiftEvent> {
        self.events.lock().map(|e| e.clone()).unwrap_or_default()
    }

    /// Floors of every arrival, in order.
    pub fn arrivals(&self) -> Vec<FloorIndex> {
        self.events()
            .iter()
            .filter_map(|e| match e {
                LiftEvent::Arrival { floor, .. } => Some(*floor),
                _ => None,
            })
            .collect()
    }

    /// Floors at which the doors opened, in order.
    pub fn door_openings(&self) -> Vec<FloorIndex> {
        self.events()
            .iter()
            .filter_map(|e| match e {
                LiftEvent::DoorsOpening { floor, .. } => Some(*floor),
                _ => None,
            })
            .collect()
    }
}

impl EventSink for RecordingSink {
    fn record(&mut self, event: &LiftEvent) {
        if let Ok(mut e) = self.events.lock() {
            e.push(event.clone());
        }
    }
}
