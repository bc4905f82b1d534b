#![no_main]
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &str| {
    // Arbitrary TOML must either fail to parse or fail validation; never panic.
    if let Ok(cfg) = lift_config::load_toml(data) {
        if cfg.validate().is_ok() {
            // A config that validates must describe a usable building.
            assert!(cfg.building.floors >= 2);
            assert!(cfg.timing.poll_ms < cfg.timing.debounce_ms);
            assert_eq!(cfg.pins.buttons.len(), usize::from(cfg.building.floors));
        }
    }
});
