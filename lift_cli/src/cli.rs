//! CLI argument definitions and shared statics.

use clap::{ArgAction, Parser, Subcommand, ValueEnum};
use std::path::PathBuf;
use std::sync::OnceLock;

pub static FILE_GUARD: OnceLock<tracing_appender::non_blocking::WorkerGuard> = OnceLock::new();
/// Whether the user asked for JSON output (controls structured error output).
pub static JSON_MODE: OnceLock<bool> = OnceLock::new();

#[derive(Parser, Debug)]
#[command(name = "lift", version, about = "Single-car elevator controller")]
pub struct Cli {
    /// Path to config TOML (typed)
    #[arg(long, value_name = "FILE", default_value = "etc/lift_config.toml")]
    pub config: PathBuf,

    /// Optional press script CSV for the simulated panel (strict header)
    #[arg(long, value_name = "FILE")]
    pub script: Option<PathBuf>,

    /// Log as JSON lines and print results as JSON
    #[arg(long, action = ArgAction::SetTrue)]
    pub json: bool,

    /// Console log level (error|warn|info|debug|trace); overrides [logging].level
    #[arg(long = "log-level", value_name = "LEVEL")]
    pub log_level: Option<String>,

    /// Button and lamp backend
    #[arg(long, value_enum, default_value_t = Backend::Sim)]
    pub backend: Backend,

    /// Command to execute
    #[command(subcommand)]
    pub cmd: Commands,
}

#[derive(Copy, Clone, Debug, Eq, PartialEq, ValueEnum)]
pub enum Backend {
    /// Simulated panel and lamps (scripted or interactive presses)
    Sim,
    /// Raspberry Pi GPIO (requires the `hardware` feature)
    Gpio,
}

impl Backend {
    pub fn as_str(self) -> &'static str {
        match self {
            Backend::Sim => "sim",
            Backend::Gpio => "gpio",
        }
    }
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Run the control loop until Ctrl-C or a limit is reached
    Run {
        /// Stop after this many scheduling ticks
        #[arg(long, value_name = "N")]
        max_ticks: Option<u64>,
        /// Stop after this many milliseconds on the controller clock
        #[arg(long, value_name = "MS")]
        max_runtime_ms: Option<u64>,
        /// Drive the controller on simulated time (sim backend only)
        #[arg(
            long,
            action = ArgAction::SetTrue,
            long_help = "Drive the controller on simulated time instead of the wall clock.\n\nEvery hold advances a manual clock instead of sleeping, so a scripted scenario that would take minutes replays instantly. Needs a run limit; without --max-ticks or --max-runtime-ms the limit defaults to one minute past the last scripted press."
        )]
        sim_time: bool,
        /// Read floor numbers from stdin and press those buttons (sim backend only)
        #[arg(long, action = ArgAction::SetTrue)]
        interactive: bool,
    },
    /// Validate config and script, then cycle the lamps once
    SelfCheck,
}
