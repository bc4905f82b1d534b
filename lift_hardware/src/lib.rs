//! Button panel and lamp backends for the lift controller.
//!
//! The simulated backends run anywhere. The GPIO backends (`gpio` module) need
//! the `hardware` feature and a Raspberry Pi.

pub mod error;
#[cfg(feature = "hardware")]
pub mod gpio;
pub mod sim;

pub use error::HwError;
pub use sim::{LampState, Press, SimulatedIndicators, SimulatedPanel, live_press_channel};

#[cfg(feature = "hardware")]
pub use gpio::{HardwareIndicators, HardwarePanel};
