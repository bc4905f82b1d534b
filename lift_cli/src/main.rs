mod cli;
mod error_fmt;
mod run;

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use clap::Parser;
use eyre::WrapErr;
use lift_core::runner::RunSummary;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, fmt};

use crate::cli::{Cli, Commands, FILE_GUARD, JSON_MODE};
use crate::error_fmt::{exit_code_for_error, format_error_json, humanize};
use crate::run::RunArgs;

fn main() {
    let _ = color_eyre::install();
    let cli = Cli::parse();
    let _ = JSON_MODE.set(cli.json);

    if let Err(e) = real_main(cli) {
        tracing::error!(error = %e, "lift exited with error");
        if JSON_MODE.get().copied().unwrap_or(false) {
            eprintln!("{}", format_error_json(&e));
        } else {
            eprintln!("{}", humanize(&e));
        }
        std::process::exit(exit_code_for_error(&e));
    }
}

fn real_main(cli: Cli) -> eyre::Result<()> {
    let cfg = run::load_config(&cli.config)?;
    init_tracing(cli.json, cli.log_level.as_deref(), &cfg.logging)?;
    tracing::debug!(config = %cli.config.display(), floors = cfg.building.floors, "config loaded");

    let script = match &cli.script {
        Some(path) => run::load_script(path, cfg.building.floors)?,
        None => Vec::new(),
    };

    match cli.cmd {
        Commands::Run {
            max_ticks,
            max_runtime_ms,
            sim_time,
            interactive,
        } => {
            let shutdown = Arc::new(AtomicBool::new(false));
            {
                let flag = Arc::clone(&shutdown);
                if let Err(e) = ctrlc::set_handler(move || flag.store(true, Ordering::Relaxed)) {
                    tracing::warn!(error = %e, "failed to install Ctrl-C handler");
                }
            }
            let summary = run::run_lift(
                &cfg,
                cli.backend,
                script,
                RunArgs {
                    max_ticks,
                    max_runtime_ms,
                    sim_time,
                    interactive,
                },
                &shutdown,
            )?;
            print_summary(&summary, cli.json);
        }
        Commands::SelfCheck => {
            run::self_check(&cfg, cli.backend)?;
            if cli.json {
                println!(
                    "{}",
                    serde_json::json!({
                        "self_check": "ok",
                        "backend": cli.backend.as_str(),
                        "floors": cfg.building.floors,
                    })
                );
            } else {
                println!(
                    "self-check ok: {} floors, {} backend",
                    cfg.building.floors,
                    cli.backend.as_str()
                );
            }
        }
    }
    Ok(())
}

fn print_summary(s: &RunSummary, json: bool) {
    if json {
        println!(
            "{}",
            serde_json::json!({
                "ticks": s.ticks,
                "stops_serviced": s.stops_serviced,
                "floors_travelled": s.floors_travelled,
                "final_floor": s.final_floor,
                "elapsed_ms": s.elapsed_ms,
                "stopped_by": s.stopped_by.as_str(),
            })
        );
    } else {
        println!(
            "Run complete: {} stops serviced, {} floors travelled, final floor {} ({} ticks, {} ms, stopped by {})",
            s.stops_serviced,
            s.floors_travelled,
            s.final_floor,
            s.ticks,
            s.elapsed_ms,
            s.stopped_by.as_str()
        );
    }
}

/// Console logging to stderr (pretty or JSON lines), plus an optional JSON
/// log file from `[logging]`.
fn init_tracing(
    json: bool,
    cli_level: Option<&str>,
    logging: &lift_config::Logging,
) -> eyre::Result<()> {
    let level = cli_level.or(logging.level.as_deref()).unwrap_or("info");
    let filter = match std::env::var("RUST_LOG") {
        Ok(_) => EnvFilter::try_from_default_env().wrap_err("parse RUST_LOG")?,
        Err(_) => EnvFilter::try_new(level).wrap_err_with(|| format!("invalid log level {level:?}"))?,
    };

    let (pretty, json_console) = if json {
        (None, Some(fmt::layer().json().with_writer(std::io::stderr)))
    } else {
        (Some(fmt::layer().with_writer(std::io::stderr)), None)
    };

    let file_layer = match &logging.file {
        Some(path) => {
            let path = std::path::Path::new(path);
            let dir = path
                .parent()
                .filter(|p| !p.as_os_str().is_empty())
                .unwrap_or_else(|| std::path::Path::new("."));
            let name = path
                .file_name()
                .ok_or_else(|| eyre::eyre!("logging.file has no file name"))?;
            let appender = match logging.rotation.as_deref().unwrap_or("never") {
                "daily" => tracing_appender::rolling::daily(dir, name),
                "hourly" => tracing_appender::rolling::hourly(dir, name),
                _ => tracing_appender::rolling::never(dir, name),
            };
            let (writer, guard) = tracing_appender::non_blocking(appender);
            let _ = FILE_GUARD.set(guard);
            Some(fmt::layer().json().with_ansi(false).with_writer(writer))
        }
        None => None,
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(pretty)
        .with(json_console)
        .with(file_layer)
        .try_init()
        .wrap_err("install tracing subscriber")?;
    Ok(())
}
