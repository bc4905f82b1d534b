pub mod clock;

pub use clock::{Clock, ManualClock, MonotonicClock};

/// Floors are numbered from 1 to N, matching the labels on the buttons.
pub type FloorIndex = u8;

/// Raw per-floor call buttons.
///
/// Readings are active-low: `true` means the contact is open (not pressed).
pub trait ButtonInput {
    fn read_button(
        &mut self,
        floor: FloorIndex,
    ) -> Result<bool, Box<dyn std::error::Error + Send + Sync>>;
}

/// Floor and door lamps. Write-only; nothing flows back into the controller.
pub trait Indicator {
    fn set_floor_indicator(
        &mut self,
        floor: FloorIndex,
        on: bool,
    ) -> Result<(), Box<dyn std::error::Error + Send + Sync>>;
    fn set_door_indicator(
        &mut self,
        on: bool,
    ) -> Result<(), Box<dyn std::error::Error + Send + Sync>>;
}

impl<T: ButtonInput + ?Sized> ButtonInput for Box<T> {
    fn read_button(
        &mut self,
        floor: FloorIndex,
    ) -> Result<bool, Box<dyn std::error::Error + Send + Sync>> {
        (**self).read_button(floor)
    }
}

impl<T: Indicator + ?Sized> Indicator for Box<T> {
    fn set_floor_indicator(
        &mut self,
        floor: FloorIndex,
        on: bool,
    ) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
        (**self).set_floor_indicator(floor, on)
    }
    fn set_door_indicator(
        &mut self,
        on: bool,
    ) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
        (**self).set_door_indicator(on)
    }
}
