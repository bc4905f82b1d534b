#![cfg_attr(all(not(debug_assertions), not(test)), deny(warnings))]
#![cfg_attr(
    all(not(debug_assertions), not(test)),
    deny(clippy::all, clippy::pedantic, clippy::nursery)
)]
#![allow(clippy::module_name_repetitions, clippy::missing_errors_doc)]
//! Config schemas and press-script parsing for the lift controller.
//!
//! - `Config` and sub-structs are deserialized from TOML and validated.
//! - The press-script CSV loader enforces headers and ordering so simulated
//!   runs replay deterministically.
use serde::Deserialize;

/// Upper bound on the floor count; buttons and lamps are addressed with `u8`.
pub const MAX_FLOORS: u8 = 32;

/// One scripted button press for the simulated panel.
///
/// Expected headers:
/// at_ms,floor,hold_ms
///
/// Example:
/// at_ms,floor,hold_ms
/// 0,3,200
/// 4500,1,200
#[derive(Debug, Deserialize, Clone, Copy, PartialEq, Eq)]
pub struct ScriptedPress {
    /// Milliseconds after start at which the button goes down.
    pub at_ms: u64,
    pub floor: u8,
    /// How long the button is held.
    pub hold_ms: u64,
}

#[derive(Debug, Deserialize)]
pub struct Building {
    pub floors: u8,
    #[serde(default = "default_start_floor")]
    pub start_floor: u8,
}

fn default_start_floor() -> u8 {
    1
}

/// Per-floor physical identifiers (BCM GPIO numbers on the reference board).
#[derive(Debug, Deserialize)]
pub struct Pins {
    /// Call button input per floor, index 0 is floor 1.
    pub buttons: Vec<u8>,
    /// Floor lamp output per floor, index 0 is floor 1.
    pub floor_leds: Vec<u8>,
    pub door_led: u8,
}

#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct Timing {
    /// A raw reading must be stable this long before it is trusted.
    pub debounce_ms: u64,
    /// Doors stay open this long at every service stop.
    pub door_open_ms: u64,
    /// Hold after passing a floor that has no pending call.
    pub travel_ms: u64,
    /// Button polling interval inside holds. Must be below `debounce_ms`.
    pub poll_ms: u64,
    /// Sleep between ticks when there is nothing to do.
    pub idle_tick_ms: u64,
}

impl Default for Timing {
    fn default() -> Self {
        Self {
            debounce_ms: 50,
            door_open_ms: 3000,
            travel_ms: 3000,
            poll_ms: 10,
            idle_tick_ms: 10,
        }
    }
}

#[derive(Debug, Deserialize, Default)]
#[serde(default)]
pub struct Logging {
    pub file: Option<String>,  // path to .log (JSON lines)
    pub level: Option<String>, // "info","debug"
    /// Log rotation policy: "never" | "daily" | "hourly" (default: never)
    pub rotation: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct Simulation {
    /// Contact bounce injected at the start of every simulated press (ms).
    pub bounce_ms: u64,
    /// Hold length used for live (interactive) presses.
    pub press_ms: u64,
}

impl Default for Simulation {
    fn default() -> Self {
        Self {
            bounce_ms: 0,
            press_ms: 200,
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct Config {
    pub building: Building,
    pub pins: Pins,
    #[serde(default)]
    pub timing: Timing,
    #[serde(default)]
    pub logging: Logging,
    #[serde(default)]
    pub simulation: Simulation,
}

pub fn load_toml(s: &str) -> Result<Config, toml::de::Error> {
    toml::from_str::<Config>(s)
}

impl Config {
    pub fn validate(&self) -> eyre::Result<()> {
        // Building
        let n = self.building.floors;
        if n < 2 {
            eyre::bail!("building.floors must be >= 2");
        }
        if n > MAX_FLOORS {
            eyre::bail!("building.floors must be <= {MAX_FLOORS}");
        }
        if !(1..=n).contains(&self.building.start_floor) {
            eyre::bail!("building.start_floor must be in 1..={n}");
        }

        // Pins
        if self.pins.buttons.len() != usize::from(n) {
            eyre::bail!(
                "pins.buttons must list one pin per floor (expected {n}, got {})",
                self.pins.buttons.len()
            );
        }
        if self.pins.floor_leds.len() != usize::from(n) {
            eyre::bail!(
                "pins.floor_leds must list one pin per floor (expected {n}, got {})",
                self.pins.floor_leds.len()
            );
        }
        let mut seen = std::collections::HashSet::new();
        let all = self
            .pins
            .buttons
            .iter()
            .chain(self.pins.floor_leds.iter())
            .chain(std::iter::once(&self.pins.door_led));
        for pin in all {
            if !seen.insert(*pin) {
                eyre::bail!("pin {pin} is assigned more than once");
            }
        }

        // Timing
        let t = &self.timing;
        if t.debounce_ms == 0 {
            eyre::bail!("timing.debounce_ms must be >= 1");
        }
        if t.poll_ms == 0 {
            eyre::bail!("timing.poll_ms must be >= 1");
        }
        if t.poll_ms >= t.debounce_ms {
            eyre::bail!("timing.poll_ms must be < timing.debounce_ms or presses can be lost");
        }
        if t.door_open_ms == 0 {
            eyre::bail!("timing.door_open_ms must be >= 1");
        }
        if t.door_open_ms > 10 * 60 * 1000 {
            eyre::bail!("timing.door_open_ms is unreasonably large (>10min)");
        }
        if t.travel_ms > 10 * 60 * 1000 {
            eyre::bail!("timing.travel_ms is unreasonably large (>10min)");
        }
        if t.idle_tick_ms == 0 {
            eyre::bail!("timing.idle_tick_ms must be >= 1");
        }

        // Logging
        if let Some(rot) = self.logging.rotation.as_deref()
            && !matches!(rot, "never" | "daily" | "hourly")
        {
            eyre::bail!("logging.rotation must be one of never, daily, hourly");
        }

        // Simulation
        if self.simulation.press_ms == 0 {
            eyre::bail!("simulation.press_ms must be >= 1");
        }

        Ok(())
    }
}

/// Check that every scripted press targets an existing floor and that the
/// script is ordered by start time.
pub fn validate_script(presses: &[ScriptedPress], floors: u8) -> eyre::Result<()> {
    for (i, p) in presses.iter().enumerate() {
        if !(1..=floors).contains(&p.floor) {
            eyre::bail!(
                "press script row {} targets floor {}, building has floors 1..={}",
                i + 2,
                p.floor,
                floors
            );
        }
        if p.hold_ms == 0 {
            eyre::bail!("press script row {} has hold_ms = 0", i + 2);
        }
    }
    if let Some(i) = presses.windows(2).position(|w| w[1].at_ms < w[0].at_ms) {
        eyre::bail!(
            "press script must be ordered by at_ms (row {} starts before row {})",
            i + 3,
            i + 2
        );
    }
    Ok(())
}

pub fn load_press_script_csv(path: &std::path::Path) -> eyre::Result<Vec<ScriptedPress>> {
    let mut rdr = csv::ReaderBuilder::new()
        .has_headers(true)
        .trim(csv::Trim::All)
        .from_path(path)
        .map_err(|e| eyre::eyre!("open press script CSV {:?}: {}", path, e))?;

    // Enforce exact headers
    let headers = rdr
        .headers()
        .map_err(|e| eyre::eyre!("read CSV headers {:?}: {}", path, e))?
        .clone();
    let expected = ["at_ms", "floor", "hold_ms"];
    let actual: Vec<String> = headers.iter().map(|s| s.to_string()).collect();
    if actual != expected {
        eyre::bail!(
            "press script CSV must have headers 'at_ms,floor,hold_ms', got: {}",
            actual.join(",")
        );
    }

    let mut rows = Vec::new();
    for (idx, rec) in rdr.deserialize::<ScriptedPress>().enumerate() {
        match rec {
            Ok(row) => rows.push(row),
            Err(e) => {
                eyre::bail!("invalid CSV row {}: {}", idx + 2, e);
            }
        }
    }
    Ok(rows)
}

#[cfg(test)]
mod tests {
    use super::*;

    const MINIMAL: &str = r#"
[building]
floors = 4

[pins]
buttons = [17, 27, 22, 23]
floor_leds = [5, 6, 13, 19]
door_led = 26
"#;

    #[test]
    fn defaults_fill_optional_sections() {
        let cfg = load_toml(MINIMAL).expect("parse");
        assert_eq!(cfg.building.start_floor, 1);
        assert_eq!(cfg.timing.debounce_ms, 50);
        assert_eq!(cfg.timing.door_open_ms, 3000);
        assert_eq!(cfg.timing.travel_ms, 3000);
        assert_eq!(cfg.timing.poll_ms, 10);
        assert_eq!(cfg.simulation.bounce_ms, 0);
        cfg.validate().expect("minimal config is valid");
    }

    #[test]
    fn script_order_is_enforced() {
        let presses = [
            ScriptedPress {
                at_ms: 100,
                floor: 2,
                hold_ms: 100,
            },
            ScriptedPress {
                at_ms: 50,
                floor: 3,
                hold_ms: 100,
            },
        ];
        let err = validate_script(&presses, 4).expect_err("out of order");
        assert!(err.to_string().contains("ordered by at_ms"));
    }
}
