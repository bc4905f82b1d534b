use lift_config::load_toml;
use rstest::rstest;

fn config_with(building: &str, pins: &str, timing: &str) -> String {
    format!(
        r#"
[building]
{building}

[pins]
{pins}

[timing]
{timing}
"#
    )
}

const FOUR_FLOORS: &str = "floors = 4";
const FOUR_PINS: &str = r#"
buttons = [17, 27, 22, 23]
floor_leds = [5, 6, 13, 19]
door_led = 26
"#;

#[test]
fn accepts_reference_config() {
    let toml = config_with(
        FOUR_FLOORS,
        FOUR_PINS,
        r#"
debounce_ms = 50
door_open_ms = 3000
travel_ms = 3000
poll_ms = 10
idle_tick_ms = 10
"#,
    );
    let cfg = load_toml(&toml).expect("parse TOML");
    cfg.validate().expect("valid config should pass");
}

#[test]
fn travel_and_door_durations_are_independent() {
    let toml = config_with(
        FOUR_FLOORS,
        FOUR_PINS,
        r#"
door_open_ms = 5000
travel_ms = 1500
"#,
    );
    let cfg = load_toml(&toml).expect("parse TOML");
    cfg.validate().expect("valid config should pass");
    assert_eq!(cfg.timing.door_open_ms, 5000);
    assert_eq!(cfg.timing.travel_ms, 1500);
}

#[rstest]
#[case("floors = 1", FOUR_PINS, "", "floors must be >= 2")]
#[case("floors = 40", FOUR_PINS, "", "floors must be <=")]
#[case("floors = 4\nstart_floor = 5", FOUR_PINS, "", "start_floor must be in 1..=4")]
#[case("floors = 4\nstart_floor = 0", FOUR_PINS, "", "start_floor must be in 1..=4")]
#[case(
    FOUR_FLOORS,
    "buttons = [17, 27, 22]\nfloor_leds = [5, 6, 13, 19]\ndoor_led = 26",
    "",
    "pins.buttons must list one pin per floor"
)]
#[case(
    FOUR_FLOORS,
    "buttons = [17, 27, 22, 23]\nfloor_leds = [5, 6, 13]\ndoor_led = 26",
    "",
    "pins.floor_leds must list one pin per floor"
)]
#[case(
    FOUR_FLOORS,
    "buttons = [17, 27, 22, 23]\nfloor_leds = [5, 6, 13, 17]\ndoor_led = 26",
    "",
    "pin 17 is assigned more than once"
)]
#[case(FOUR_FLOORS, FOUR_PINS, "poll_ms = 0", "poll_ms must be >= 1")]
#[case(FOUR_FLOORS, FOUR_PINS, "debounce_ms = 0", "debounce_ms must be >= 1")]
#[case(
    FOUR_FLOORS,
    FOUR_PINS,
    "debounce_ms = 20\npoll_ms = 20",
    "poll_ms must be < timing.debounce_ms"
)]
#[case(FOUR_FLOORS, FOUR_PINS, "door_open_ms = 0", "door_open_ms must be >= 1")]
#[case(FOUR_FLOORS, FOUR_PINS, "idle_tick_ms = 0", "idle_tick_ms must be >= 1")]
fn rejects_invalid_configs(
    #[case] building: &str,
    #[case] pins: &str,
    #[case] timing: &str,
    #[case] needle: &str,
) {
    let toml = config_with(building, pins, timing);
    let cfg = load_toml(&toml).expect("parse TOML");
    let err = cfg.validate().expect_err("config should be rejected");
    assert!(
        format!("{err}").contains(needle),
        "expected '{needle}' in '{err}'"
    );
}

#[test]
fn rejects_unknown_rotation() {
    let toml = format!(
        "{}\n[logging]\nrotation = \"weekly\"\n",
        config_with(FOUR_FLOORS, FOUR_PINS, "")
    );
    let cfg = load_toml(&toml).expect("parse TOML");
    let err = cfg.validate().expect_err("weekly rotation is not supported");
    assert!(format!("{err}").contains("logging.rotation"));
}

#[test]
fn missing_pins_section_is_a_parse_error() {
    let toml = "[building]\nfloors = 4\n";
    assert!(load_toml(toml).is_err());
}
