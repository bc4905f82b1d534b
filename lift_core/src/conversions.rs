//! `From` implementations bridging `lift_config` types to `lift_core` types.

use crate::config::{LiftCfg, TimingCfg};

impl From<&lift_config::Timing> for TimingCfg {
    fn from(c: &lift_config::Timing) -> Self {
        Self {
            debounce_ms: c.debounce_ms,
            door_open_ms: c.door_open_ms,
            travel_ms: c.travel_ms,
            poll_ms: c.poll_ms,
            idle_tick_ms: c.idle_tick_ms,
        }
    }
}

impl From<&lift_config::Config> for LiftCfg {
    fn from(c: &lift_config::Config) -> Self {
        Self {
            floors: c.building.floors,
            start_floor: c.building.start_floor,
            timing: (&c.timing).into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn maps_toml_config() {
        let cfg = lift_config::load_toml(
            r#"
[building]
floors = 6
start_floor = 3

[pins]
buttons = [1, 2, 3, 4, 5, 6]
floor_leds = [7, 8, 9, 10, 11, 12]
door_led = 13

[timing]
door_open_ms = 2000
travel_ms = 1500
"#,
        )
        .expect("parse");
        let core: LiftCfg = (&cfg).into();
        assert_eq!(core.floors, 6);
        assert_eq!(core.start_floor, 3);
        assert_eq!(core.timing.door_open_ms, 2000);
        assert_eq!(core.timing.travel_ms, 1500);
        assert_eq!(core.timing.debounce_ms, 50);
    }
}
