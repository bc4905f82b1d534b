//! Time-window debouncing of active-low call buttons.
//!
//! A raw reading is trusted only after it has stayed unchanged for the whole
//! debounce window. Only the transition into "pressed" produces an event, so a
//! press-and-release cycle yields at most one `PressEvent`.

use crate::error::Result;
use crate::hw_error::map_hw_error;
use crate::types::FloorIndex;
use lift_traits::ButtonInput;

/// A confirmed press of a floor's call button.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PressEvent {
    pub floor: FloorIndex,
}

/// Debounce state of one button. Readings are raw, active-low.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ButtonDebounceState {
    last_raw_reading: bool,
    confirmed_state: bool,
    last_change_ms: u64,
}

impl Default for ButtonDebounceState {
    fn default() -> Self {
        // Released: raw high.
        Self {
            last_raw_reading: true,
            confirmed_state: true,
            last_change_ms: 0,
        }
    }
}

impl ButtonDebounceState {
    /// Feed one raw reading taken at `now_ms`. Returns true on a confirmed
    /// transition into the pressed state.
    pub fn update(&mut self, raw: bool, now_ms: u64, window_ms: u64) -> bool {
        if raw != self.last_raw_reading {
            self.last_raw_reading = raw;
            self.last_change_ms = now_ms;
        }
        let stable_for = now_ms.saturating_sub(self.last_change_ms);
        if stable_for >= window_ms && raw != self.confirmed_state {
            self.confirmed_state = raw;
            return !raw;
        }
        false
    }

    /// Debounced view: true while the button is held down.
    pub fn is_pressed(&self) -> bool {
        !self.confirmed_state
    }
}

/// Per-floor debounce states for the whole panel.
#[derive(Debug, Clone)]
pub struct Debouncer {
    states: Vec<ButtonDebounceState>,
    window_ms: u64,
}

impl Debouncer {
    pub fn new(floors: u8, window_ms: u64) -> Self {
        Self {
            states: vec![ButtonDebounceState::default(); usize::from(floors)],
            window_ms,
        }
    }

    pub fn window_ms(&self) -> u64 {
        self.window_ms
    }

    /// Forget all history; every button starts released.
    pub fn reset(&mut self) {
        self.states.fill(ButtonDebounceState::default());
    }

    /// Read `floor`'s button from `input` and debounce it.
    pub fn sample<I: ButtonInput + ?Sized>(
        &mut self,
        input: &mut I,
        floor: FloorIndex,
        now_ms: u64,
    ) -> Result<Option<PressEvent>> {
        let raw = input
            .read_button(floor)
            .map_err(|e| eyre::Report::new(map_hw_error(&*e)))?;
        Ok(self.feed(floor, raw, now_ms))
    }

    /// Debounce an already-read raw value. Out-of-range floors are ignored.
    pub fn feed(&mut self, floor: FloorIndex, raw: bool, now_ms: u64) -> Option<PressEvent> {
        let idx = usize::from(floor).checked_sub(1)?;
        let window = self.window_ms;
        let state = self.states.get_mut(idx)?;
        state
            .update(raw, now_ms, window)
            .then_some(PressEvent { floor })
    }

    pub fn is_pressed(&self, floor: FloorIndex) -> bool {
        usize::from(floor)
            .checked_sub(1)
            .and_then(|i| self.states.get(i))
            .is_some_and(ButtonDebounceState::is_pressed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const PRESSED: bool = false;
    const RELEASED: bool = true;

    #[test]
    fn clean_press_emits_once_after_window() {
        let mut d = Debouncer::new(4, 50);
        let mut events = Vec::new();
        for t in (0..=200).step_by(10) {
            if let Some(e) = d.feed(2, PRESSED, t) {
                events.push((t, e));
            }
        }
        assert_eq!(events, vec![(50, PressEvent { floor: 2 })]);
        assert!(d.is_pressed(2));
    }

    #[test]
    fn release_does_not_emit() {
        let mut d = Debouncer::new(2, 50);
        for t in (0..=100).step_by(10) {
            d.feed(1, PRESSED, t);
        }
        for t in (110..=300).step_by(10) {
            assert_eq!(d.feed(1, RELEASED, t), None);
        }
        assert!(!d.is_pressed(1));
    }

    #[test]
    fn bounce_shorter_than_window_is_ignored() {
        let mut d = Debouncer::new(2, 50);
        let mut raw = PRESSED;
        for t in (0..500).step_by(10) {
            assert_eq!(d.feed(1, raw, t), None);
            if t % 30 == 0 {
                raw = !raw;
            }
        }
        assert!(!d.is_pressed(1));
    }

    #[test]
    fn second_press_needs_a_release_in_between() {
        let mut d = Debouncer::new(2, 20);
        let mut count = 0;
        let mut t = 0;
        let mut run = |raw: bool, ms: u64, d: &mut Debouncer, t: &mut u64| {
            for _ in 0..ms / 5 {
                if d.feed(1, raw, *t).is_some() {
                    count += 1;
                }
                *t += 5;
            }
        };
        run(PRESSED, 100, &mut d, &mut t);
        run(PRESSED, 100, &mut d, &mut t);
        run(RELEASED, 100, &mut d, &mut t);
        run(PRESSED, 100, &mut d, &mut t);
        assert_eq!(count, 2);
    }

    #[test]
    fn out_of_range_floor_is_ignored() {
        let mut d = Debouncer::new(4, 0);
        assert_eq!(d.feed(0, PRESSED, 0), None);
        assert_eq!(d.feed(5, PRESSED, 0), None);
        assert!(!d.is_pressed(0));
    }

    #[test]
    fn reset_releases_everything() {
        let mut d = Debouncer::new(3, 10);
        for t in (0..=50).step_by(5) {
            d.feed(3, PRESSED, t);
        }
        assert!(d.is_pressed(3));
        d.reset();
        assert!(!d.is_pressed(3));
    }
}
