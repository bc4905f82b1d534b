#![cfg_attr(all(not(debug_assertions), not(test)), deny(warnings))]
#![cfg_attr(
    all(not(debug_assertions), not(test)),
    deny(clippy::all, clippy::pedantic, clippy::nursery)
)]
#![allow(clippy::module_name_repetitions, clippy::missing_errors_doc)]
#![cfg_attr(not(test), deny(clippy::unwrap_used, clippy::expect_used))]
//! Core elevator control logic (hardware-agnostic).
//!
//! This crate provides the hardware-independent controller for a single car.
//! All I/O goes through the `lift_traits::ButtonInput` and
//! `lift_traits::Indicator` traits; status events go to an `EventSink`.
//!
//! ## Architecture
//!
//! - **Debouncing**: time-window filter per call button (`debounce` module)
//! - **Calls**: pending-call flags per floor (`registry` module)
//! - **Scheduling**: SCAN next-stop resolution (`scheduler` module)
//! - **Motion / Doors**: one-floor-at-a-time travel and timed door cycle
//! - **Engine**: `LiftCore` tick loop, `Lift` builder, `runner`
//!
//! ## Timing
//!
//! The loop is single-threaded and cooperative. Every timed hold keeps sampling
//! the buttons every `poll_ms`, which must stay below the debounce window.

// Module declarations
pub mod builder;
pub mod config;
pub mod conversions;
pub mod engine;
pub mod debounce;
mod door;
pub mod error;
pub mod events;
pub mod hw_error;
pub mod mocks;
mod motion;
pub mod registry;
pub mod runner;
pub mod scheduler;
pub mod status;
pub mod types;

// Re-exports for convenience
pub use builder::{Lift, LiftBuilder, LiftG, Missing, Set, build_lift};
pub use config::{LiftCfg, TimingCfg};
pub use engine::LiftCore;
pub use debounce::{ButtonDebounceState, Debouncer, PressEvent};
pub use error::{BuildError, LiftError};
pub use events::{EventSink, LiftEvent, TracingSink};
pub use registry::CallRegistry;
pub use scheduler::{Plan, Scheduler};
pub use status::TickOutcome;
pub use types::{Direction, ElevatorState, FloorIndex};
