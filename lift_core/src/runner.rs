use std::sync::atomic::{AtomicBool, Ordering};

use crate::builder::Lift;
use crate::error::Result as CoreResult;
use crate::status::TickOutcome;
use crate::types::FloorIndex;

/// Optional bounds on a run. With both unset the loop runs until shutdown.
#[derive(Debug, Clone, Copy, Default)]
pub struct RunLimit {
    /// Stop after this many ticks.
    pub max_ticks: Option<u64>,
    /// Stop once this many milliseconds have passed on the lift clock.
    /// Checked between ticks, so a move or door cycle in progress completes.
    pub max_runtime_ms: Option<u64>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StopReason {
    Shutdown,
    TickLimit,
    TimeLimit,
}

impl StopReason {
    pub fn as_str(self) -> &'static str {
        match self {
            StopReason::Shutdown => "shutdown",
            StopReason::TickLimit => "tick_limit",
            StopReason::TimeLimit => "time_limit",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RunSummary {
    pub ticks: u64,
    pub stops_serviced: u64,
    pub floors_travelled: u64,
    pub final_floor: FloorIndex,
    pub elapsed_ms: u64,
    pub stopped_by: StopReason,
}

/// Reset the lift and tick it until `shutdown` is raised or `limit` is hit.
///
/// The shutdown flag is checked between ticks only; a hold in progress always
/// runs to completion.
pub fn run(lift: &mut Lift, shutdown: &AtomicBool, limit: RunLimit) -> CoreResult<RunSummary> {
    lift.begin()?;
    let start_ms = lift.now_ms();
    tracing::info!(
        floor = lift.state().current_floor,
        floors = lift.cfg().floors,
        "control loop start"
    );

    let mut ticks: u64 = 0;
    let stopped_by = loop {
        if shutdown.load(Ordering::Relaxed) {
            break StopReason::Shutdown;
        }
        if limit.max_ticks.is_some_and(|max| ticks >= max) {
            break StopReason::TickLimit;
        }
        if limit
            .max_runtime_ms
            .is_some_and(|max| lift.now_ms().saturating_sub(start_ms) >= max)
        {
            break StopReason::TimeLimit;
        }

        match lift.tick() {
            Ok(TickOutcome::Idle) => {}
            Ok(outcome) => tracing::debug!(?outcome, "tick"),
            Err(e) => {
                tracing::error!(error = %e, "control loop aborted");
                return Err(e);
            }
        }
        ticks += 1;
    };

    let summary = RunSummary {
        ticks,
        stops_serviced: lift.stops_serviced(),
        floors_travelled: lift.floors_travelled(),
        final_floor: lift.state().current_floor,
        elapsed_ms: lift.now_ms().saturating_sub(start_ms),
        stopped_by,
    };
    tracing::info!(
        ticks = summary.ticks,
        stops = summary.stops_serviced,
        floor = summary.final_floor,
        reason = summary.stopped_by.as_str(),
        "control loop stop"
    );
    Ok(summary)
}
