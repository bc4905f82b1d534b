//! Config loading, backend assembly, and run execution.

use std::io::BufRead;
use std::path::Path;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use crossbeam_channel::{Receiver, Sender};
use eyre::WrapErr;
use lift_config::{Config, ScriptedPress, Simulation};
use lift_core::error::LiftError;
use lift_core::runner::{RunLimit, RunSummary};
use lift_core::{Lift, LiftCfg};
use lift_hardware::{Press, SimulatedIndicators, SimulatedPanel, live_press_channel};
use lift_traits::{Clock, FloorIndex, ManualClock, MonotonicClock};

use crate::cli::Backend;

/// Extra run time granted after the last scripted press when `--sim-time`
/// has no explicit limit.
const SIM_TAIL_MS: u64 = 60_000;

fn config_error(e: &eyre::Report) -> LiftError {
    let msg = e
        .chain()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(": ");
    LiftError::Config(msg)
}

/// Read, parse and validate the TOML config.
pub fn load_config(path: &Path) -> eyre::Result<Config> {
    let text = std::fs::read_to_string(path)
        .wrap_err_with(|| format!("read config file {}", path.display()))?;
    let cfg = lift_config::load_toml(&text)
        .wrap_err_with(|| format!("parse config file {}", path.display()))?;
    cfg.validate().map_err(|e| config_error(&e))?;
    Ok(cfg)
}

/// Load and validate a press script against the configured building.
pub fn load_script(path: &Path, floors: u8) -> eyre::Result<Vec<ScriptedPress>> {
    let presses = lift_config::load_press_script_csv(path).map_err(|e| config_error(&e))?;
    lift_config::validate_script(&presses, floors).map_err(|e| config_error(&e))?;
    tracing::info!(presses = presses.len(), path = %path.display(), "press script loaded");
    Ok(presses)
}

/// Options that only apply to the simulated backend.
#[derive(Default)]
pub struct SimOptions {
    pub script: Vec<ScriptedPress>,
    pub sim_time: bool,
    pub live: Option<Receiver<FloorIndex>>,
}

impl SimOptions {
    fn is_default(&self) -> bool {
        self.script.is_empty() && !self.sim_time && self.live.is_none()
    }
}

/// Build a `Lift` wired to the chosen backend.
pub fn assemble(cfg: &Config, backend: Backend, sim: SimOptions) -> eyre::Result<Lift> {
    let core_cfg = LiftCfg::from(cfg);
    match backend {
        Backend::Sim => {
            let floors = cfg.building.floors;
            let lamps = SimulatedIndicators::new(floors);
            let builder = Lift::builder().with_cfg(core_cfg);
            if sim.sim_time {
                let clock = ManualClock::new();
                let panel = sim_panel(
                    SimulatedPanel::new(floors, clock.clone()),
                    &sim.script,
                    &cfg.simulation,
                    sim.live,
                );
                builder
                    .with_clock(Box::new(clock))
                    .with_input(panel)
                    .with_indicator(lamps)
                    .build()
            } else {
                let panel = sim_panel(
                    SimulatedPanel::new(floors, MonotonicClock::new()),
                    &sim.script,
                    &cfg.simulation,
                    sim.live,
                );
                builder.with_input(panel).with_indicator(lamps).build()
            }
        }
        Backend::Gpio => {
            if !sim.is_default() {
                eyre::bail!("--script, --sim-time and --interactive need the sim backend");
            }
            gpio_lift(cfg, core_cfg)
        }
    }
}

fn sim_panel<C: Clock>(
    panel: SimulatedPanel<C>,
    script: &[ScriptedPress],
    sim: &Simulation,
    live: Option<Receiver<FloorIndex>>,
) -> SimulatedPanel<C> {
    let panel = panel
        .with_script(script.iter().map(|p| Press {
            floor: p.floor,
            at_ms: p.at_ms,
            hold_ms: p.hold_ms,
        }))
        .with_bounce_ms(sim.bounce_ms);
    match live {
        Some(rx) => panel.with_live_presses(rx, sim.press_ms),
        None => panel,
    }
}

#[cfg(feature = "hardware")]
fn gpio_lift(cfg: &Config, core_cfg: LiftCfg) -> eyre::Result<Lift> {
    let panel = lift_hardware::HardwarePanel::new(&cfg.pins.buttons).wrap_err("open button pins")?;
    let lamps = lift_hardware::HardwareIndicators::new(&cfg.pins.floor_leds, cfg.pins.door_led)
        .wrap_err("open lamp pins")?;
    Lift::builder()
        .with_cfg(core_cfg)
        .with_input(panel)
        .with_indicator(lamps)
        .build()
}

#[cfg(not(feature = "hardware"))]
fn gpio_lift(_cfg: &Config, _core_cfg: LiftCfg) -> eyre::Result<Lift> {
    eyre::bail!("this build has no GPIO support; rebuild with --features hardware")
}

/// Knobs for the `run` subcommand.
#[derive(Debug, Clone, Copy, Default)]
pub struct RunArgs {
    pub max_ticks: Option<u64>,
    pub max_runtime_ms: Option<u64>,
    pub sim_time: bool,
    pub interactive: bool,
}

/// Assemble the lift, run the control loop, and switch the lamps off after.
pub fn run_lift(
    cfg: &Config,
    backend: Backend,
    script: Vec<ScriptedPress>,
    args: RunArgs,
    shutdown: &Arc<AtomicBool>,
) -> eyre::Result<RunSummary> {
    if args.sim_time && args.interactive {
        eyre::bail!("--interactive cannot be combined with --sim-time");
    }

    let mut limit = RunLimit {
        max_ticks: args.max_ticks,
        max_runtime_ms: args.max_runtime_ms,
    };
    if args.sim_time && limit.max_ticks.is_none() && limit.max_runtime_ms.is_none() {
        let Some(last) = script.iter().map(|p| p.at_ms.saturating_add(p.hold_ms)).max() else {
            eyre::bail!("--sim-time needs --max-ticks or --max-runtime-ms when no script is given");
        };
        limit.max_runtime_ms = Some(last.saturating_add(SIM_TAIL_MS));
    }

    let live = if args.interactive {
        let (tx, rx) = live_press_channel();
        spawn_prompt(tx, cfg.building.floors, Arc::clone(shutdown));
        Some(rx)
    } else {
        None
    };

    let mut lift = assemble(
        cfg,
        backend,
        SimOptions {
            script,
            sim_time: args.sim_time,
            live,
        },
    )?;
    tracing::info!(
        backend = backend.as_str(),
        sim_time = args.sim_time,
        floors = cfg.building.floors,
        "lift assembled"
    );

    let result = lift_core::runner::run(&mut lift, shutdown, limit);
    if let Err(e) = lift.lamps_off() {
        tracing::warn!(error = %e, "failed to switch lamps off");
    }
    result
}

/// Validate wiring: light the start floor, step every lamp, then switch all off.
pub fn self_check(cfg: &Config, backend: Backend) -> eyre::Result<()> {
    let mut lift = assemble(cfg, backend, SimOptions::default())?;
    lift.begin()?;
    lift.lamp_test()?;
    lift.lamps_off()?;
    tracing::info!(backend = backend.as_str(), "self-check passed");
    Ok(())
}

/// Read floor numbers from stdin on a helper thread. `q` requests shutdown.
fn spawn_prompt(tx: Sender<FloorIndex>, floors: u8, shutdown: Arc<AtomicBool>) {
    std::thread::spawn(move || {
        eprintln!("Enter a floor number (1-{floors}) to press its call button, q to quit.");
        for line in std::io::stdin().lock().lines() {
            let Ok(line) = line else { break };
            let line = line.trim();
            if line.eq_ignore_ascii_case("q") || line.eq_ignore_ascii_case("quit") {
                shutdown.store(true, Ordering::Relaxed);
                break;
            }
            match line.parse::<FloorIndex>() {
                Ok(floor) if (1..=floors).contains(&floor) => {
                    if tx.send(floor).is_err() {
                        break;
                    }
                }
                _ => eprintln!("not a floor: {line:?}"),
            }
        }
    });
}
