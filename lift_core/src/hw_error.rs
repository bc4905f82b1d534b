//! Maps `Box<dyn Error>` from trait boundaries to typed `LiftError`.
//!
//! The traits in `lift_traits` use `Box<dyn Error + Send + Sync>` so any
//! backend can plug in; this module converts those to our typed error enum,
//! with an optional feature-gated path for `lift_hardware::HwError`.

use crate::error::LiftError;

/// Map a trait-boundary error to a typed `LiftError`.
///
/// Known hardware error types are downcast first; anything else is carried as
/// its message.
pub fn map_hw_error(e: &(dyn std::error::Error + 'static)) -> LiftError {
    #[cfg(feature = "hardware-errors")]
    {
        if let Some(hw) = e.downcast_ref::<lift_hardware::error::HwError>() {
            return match hw {
                lift_hardware::error::HwError::UnknownFloor(f) => {
                    LiftError::State(format!("no button or lamp wired for floor {f}"))
                }
                other => LiftError::HardwareFault(other.to_string()),
            };
        }
    }

    LiftError::Hardware(e.to_string())
}
