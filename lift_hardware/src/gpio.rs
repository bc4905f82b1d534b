//! Raspberry Pi GPIO backends (rppal).
//!
//! Buttons are wired between the pin and ground with the internal pull-up
//! enabled, so a pressed button reads low. Lamps are driven active-high.

use rppal::gpio::{Gpio, InputPin, OutputPin};

use lift_traits::{ButtonInput, FloorIndex, Indicator};

use crate::error::{HwError, Result};

type TraitResult<T> = std::result::Result<T, Box<dyn std::error::Error + Send + Sync>>;

fn open_gpio() -> Result<Gpio> {
    Gpio::new().map_err(|e| HwError::Gpio(e.to_string()))
}

fn slot(floor: FloorIndex, len: usize) -> Result<usize> {
    usize::from(floor)
        .checked_sub(1)
        .filter(|i| *i < len)
        .ok_or(HwError::UnknownFloor(floor))
}

/// Call buttons, one input pin per floor (index 0 is floor 1).
pub struct HardwarePanel {
    pins: Vec<InputPin>,
}

impl HardwarePanel {
    pub fn new(button_pins: &[u8]) -> Result<Self> {
        let gpio = open_gpio()?;
        let pins = button_pins
            .iter()
            .map(|&p| {
                gpio.get(p)
                    .map(|pin| pin.into_input_pullup())
                    .map_err(|e| HwError::Gpio(format!("button pin {p}: {e}")))
            })
            .collect::<Result<Vec<_>>>()?;
        tracing::info!(pins = ?button_pins, "button panel ready");
        Ok(Self { pins })
    }
}

impl ButtonInput for HardwarePanel {
    fn read_button(&mut self, floor: FloorIndex) -> TraitResult<bool> {
        let i = slot(floor, self.pins.len())?;
        Ok(self.pins[i].is_high())
    }
}

/// Floor lamps plus the door lamp.
pub struct HardwareIndicators {
    floors: Vec<OutputPin>,
    door: OutputPin,
}

impl HardwareIndicators {
    pub fn new(floor_pins: &[u8], door_pin: u8) -> Result<Self> {
        let gpio = open_gpio()?;
        let output = |p: u8| {
            gpio.get(p)
                .map(|pin| pin.into_output_low())
                .map_err(|e| HwError::Gpio(format!("lamp pin {p}: {e}")))
        };
        let floors = floor_pins
            .iter()
            .map(|&p| output(p))
            .collect::<Result<Vec<_>>>()?;
        let door = output(door_pin)?;
        tracing::info!(floor_pins = ?floor_pins, door_pin, "lamps ready");
        Ok(Self { floors, door })
    }
}

impl Indicator for HardwareIndicators {
    fn set_floor_indicator(&mut self, floor: FloorIndex, on: bool) -> TraitResult<()> {
        let i = slot(floor, self.floors.len())?;
        if on {
            self.floors[i].set_high();
        } else {
            self.floors[i].set_low();
        }
        Ok(())
    }

    fn set_door_indicator(&mut self, on: bool) -> TraitResult<()> {
        if on {
            self.door.set_high();
        } else {
            self.door.set_low();
        }
        Ok(())
    }
}
