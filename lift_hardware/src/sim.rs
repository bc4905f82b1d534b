use std::cell::RefCell;
use std::rc::Rc;
use std::time::Instant;

use crossbeam_channel::{Receiver, Sender, TryRecvError};
use lift_traits::{ButtonInput, Clock, FloorIndex, Indicator, MonotonicClock};

use crate::error::HwError;

type TraitResult<T> = Result<T, Box<dyn std::error::Error + Send + Sync>>;

/// One scheduled button press, relative to the panel's creation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Press {
    pub floor: FloorIndex,
    pub at_ms: u64,
    pub hold_ms: u64,
}

impl Press {
    fn covers(&self, now_ms: u64) -> bool {
        now_ms >= self.at_ms && now_ms < self.at_ms.saturating_add(self.hold_ms)
    }
}

/// Channel for feeding presses into a running `SimulatedPanel`.
pub fn live_press_channel() -> (Sender<FloorIndex>, Receiver<FloorIndex>) {
    crossbeam_channel::unbounded()
}

/// Simulated call-button panel (active-low: `true` means released).
///
/// Presses come from a script, from a live channel, or both. Live presses are
/// held for `press_ms` from the moment the panel sees them. With a non-zero
/// `bounce_ms`, the contact chatters for that long after every edge.
pub struct SimulatedPanel<C: Clock = MonotonicClock> {
    clock: C,
    epoch: Instant,
    floors: u8,
    presses: Vec<Press>,
    live: Option<Receiver<FloorIndex>>,
    press_ms: u64,
    bounce_ms: u64,
}

impl<C: Clock> SimulatedPanel<C> {
    pub fn new(floors: u8, clock: C) -> Self {
        let epoch = clock.now();
        Self {
            clock,
            epoch,
            floors,
            presses: Vec::new(),
            live: None,
            press_ms: 200,
            bounce_ms: 0,
        }
    }

    pub fn with_script(mut self, presses: impl IntoIterator<Item = Press>) -> Self {
        self.presses.extend(presses);
        self
    }

    pub fn with_live_presses(mut self, rx: Receiver<FloorIndex>, press_ms: u64) -> Self {
        self.live = Some(rx);
        self.press_ms = press_ms;
        self
    }

    pub fn with_bounce_ms(mut self, bounce_ms: u64) -> Self {
        self.bounce_ms = bounce_ms;
        self
    }

    /// Number of presses known so far (scripted plus live ones already seen).
    pub fn press_count(&self) -> usize {
        self.presses.len()
    }

    fn drain_live(&mut self, now_ms: u64) {
        let Some(rx) = &self.live else { return };
        loop {
            match rx.try_recv() {
                Ok(floor) if (1..=self.floors).contains(&floor) => {
                    tracing::info!(floor, "simulated press");
                    self.presses.push(Press {
                        floor,
                        at_ms: now_ms,
                        hold_ms: self.press_ms,
                    });
                }
                Ok(floor) => tracing::warn!(floor, "ignoring press for unknown floor"),
                Err(TryRecvError::Empty | TryRecvError::Disconnected) => break,
            }
        }
    }

    /// Raw level of `floor` at `now_ms`, bounce included.
    fn level(&self, floor: FloorIndex, now_ms: u64) -> bool {
        let mine = || self.presses.iter().filter(move |p| p.floor == floor);
        let down = mine().any(|p| p.covers(now_ms));
        if self.bounce_ms == 0 {
            return !down;
        }
        let chattering = mine()
            .flat_map(|p| [p.at_ms, p.at_ms.saturating_add(p.hold_ms)])
            .filter(|&edge| now_ms >= edge && now_ms - edge < self.bounce_ms)
            .any(|edge| ((now_ms - edge) / 3) % 2 == 1);
        // During chatter the contact reads the opposite of where it settles.
        if chattering { down } else { !down }
    }
}

impl<C: Clock> ButtonInput for SimulatedPanel<C> {
    fn read_button(&mut self, floor: FloorIndex) -> TraitResult<bool> {
        if !(1..=self.floors).contains(&floor) {
            return Err(HwError::UnknownFloor(floor).into());
        }
        let now = self.clock.ms_since(self.epoch);
        self.drain_live(now);
        Ok(self.level(floor, now))
    }
}

/// Lamp state as last written.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LampState {
    /// Index 0 is floor 1.
    pub floors: Vec<bool>,
    pub door: bool,
}

impl LampState {
    /// The single lit floor, if exactly one is lit.
    pub fn lit_floor(&self) -> Option<FloorIndex> {
        let mut lit = self
            .floors
            .iter()
            .enumerate()
            .filter(|(_, on)| **on)
            .map(|(i, _)| (i + 1) as FloorIndex);
        match (lit.next(), lit.next()) {
            (Some(f), None) => Some(f),
            _ => None,
        }
    }
}

/// Simulated lamps. Changes are logged; clones share the same state.
#[derive(Debug, Clone)]
pub struct SimulatedIndicators {
    state: Rc<RefCell<LampState>>,
}

impl SimulatedIndicators {
    pub fn new(floors: u8) -> Self {
        Self {
            state: Rc::new(RefCell::new(LampState {
                floors: vec![false; usize::from(floors)],
                door: false,
            })),
        }
    }

    pub fn state(&self) -> LampState {
        self.state.borrow().clone()
    }
}

impl Indicator for SimulatedIndicators {
    fn set_floor_indicator(&mut self, floor: FloorIndex, on: bool) -> TraitResult<()> {
        let mut state = self.state.borrow_mut();
        let slot = usize::from(floor)
            .checked_sub(1)
            .and_then(|i| state.floors.get_mut(i))
            .ok_or(HwError::UnknownFloor(floor))?;
        if *slot != on {
            *slot = on;
            if on {
                tracing::info!(floor, "floor lamp on");
            }
        }
        Ok(())
    }

    fn set_door_indicator(&mut self, on: bool) -> TraitResult<()> {
        let mut state = self.state.borrow_mut();
        if state.door != on {
            state.door = on;
            tracing::info!(open = on, "door lamp");
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use lift_traits::ManualClock;
    use std::time::Duration;

    #[test]
    fn scripted_press_is_low_while_held() {
        let clock = ManualClock::new();
        let mut panel = SimulatedPanel::new(4, clock.clone()).with_script([Press {
            floor: 2,
            at_ms: 100,
            hold_ms: 50,
        }]);
        assert!(panel.read_button(2).unwrap());
        clock.advance(Duration::from_millis(100));
        assert!(!panel.read_button(2).unwrap());
        assert!(panel.read_button(3).unwrap());
        clock.advance(Duration::from_millis(50));
        assert!(panel.read_button(2).unwrap());
    }

    #[test]
    fn unknown_floor_is_an_error() {
        let mut panel = SimulatedPanel::new(4, ManualClock::new());
        let err = panel.read_button(5).unwrap_err();
        assert!(matches!(
            err.downcast_ref::<HwError>(),
            Some(HwError::UnknownFloor(5))
        ));
        assert!(panel.read_button(0).is_err());
    }

    #[test]
    fn lamps_track_writes() {
        let mut lamps = SimulatedIndicators::new(3);
        let view = lamps.clone();
        lamps.set_floor_indicator(2, true).unwrap();
        lamps.set_door_indicator(true).unwrap();
        let s = view.state();
        assert_eq!(s.lit_floor(), Some(2));
        assert!(s.door);
        assert!(lamps.set_floor_indicator(4, true).is_err());
    }
}
