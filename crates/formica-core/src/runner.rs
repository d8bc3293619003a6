//! Bounded headless run loop.
//!
//! [`run_bounded`] drives whole ticks back to back, without wall-clock
//! pacing, until either the tick bound is reached or the colony is extinct
//! (no ants and no eggs). A [`TickCallback`] sees every tick as it
//! completes.

use tracing::{info, warn};

use crate::tick::{Simulation, TickError, TickSummary};

/// Errors that can occur during the simulation run.
#[derive(Debug, thiserror::Error)]
pub enum RunnerError {
    /// A tick execution failed.
    #[error("tick error: {source}")]
    Tick {
        /// The underlying tick error.
        #[from]
        source: TickError,
    },
}

/// Why a bounded run stopped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EndReason {
    /// The requested number of ticks ran.
    MaxTicksReached,
    /// No ants and no eggs remain.
    Extinction,
}

/// Result of a bounded run.
#[derive(Debug)]
pub struct RunResult {
    /// The reason the run ended.
    pub end_reason: EndReason,
    /// Number of ticks executed by this run.
    pub total_ticks: u64,
    /// The last tick summary, if any tick completed.
    pub final_summary: Option<TickSummary>,
}

/// Callback invoked after each tick completes.
pub trait TickCallback {
    /// Called after a tick completes successfully.
    fn on_tick(&mut self, summary: &TickSummary, sim: &Simulation);
}

/// A callback that ignores every tick.
pub struct NoOpCallback;

impl TickCallback for NoOpCallback {
    fn on_tick(&mut self, _summary: &TickSummary, _sim: &Simulation) {}
}

/// Run up to `max_ticks` ticks.
///
/// A colony that is already extinct ends the run before any tick.
///
/// # Errors
///
/// Returns [`RunnerError`] if a tick fails.
pub fn run_bounded(
    sim: &mut Simulation,
    max_ticks: u64,
    callback: &mut dyn TickCallback,
) -> Result<RunResult, RunnerError> {
    let mut last_summary: Option<TickSummary> = None;
    let mut total_ticks: u64 = 0;

    info!(max_ticks, start_tick = sim.tick_number(), "Simulation starting");

    while total_ticks < max_ticks {
        if sim.is_extinct() {
            info!(tick = sim.tick_number(), "No ants or eggs left -- extinction");
            return Ok(RunResult {
                end_reason: EndReason::Extinction,
                total_ticks,
                final_summary: last_summary,
            });
        }

        let summary = sim.tick()?;
        total_ticks = total_ticks.saturating_add(1);
        callback.on_tick(&summary, sim);
        last_summary = Some(summary);
    }

    let end_reason = if sim.is_extinct() {
        EndReason::Extinction
    } else {
        EndReason::MaxTicksReached
    };
    Ok(RunResult {
        end_reason,
        total_ticks,
        final_summary: last_summary,
    })
}

/// Log the end of a run.
pub fn log_run_end(result: &RunResult) {
    info!(
        reason = ?result.end_reason,
        total_ticks = result.total_ticks,
        final_tick = result.final_summary.as_ref().map(|s| s.tick),
        final_agents_alive = result.final_summary.as_ref().map(|s| s.agents_alive),
        "Simulation ended"
    );

    if let Some(ref summary) = result.final_summary {
        info!(
            tick = summary.tick,
            agents_alive = summary.agents_alive,
            hostiles_alive = summary.hostiles_alive,
            markers = summary.markers,
            "Final tick summary"
        );
    } else {
        warn!("Simulation ended with no ticks executed");
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use formica_types::{HostileKind, Vec2};

    use super::*;
    use crate::config::SimulationConfig;

    struct Counter(u64);

    impl TickCallback for Counter {
        fn on_tick(&mut self, summary: &TickSummary, _sim: &Simulation) {
            self.0 = summary.tick;
        }
    }

    #[test]
    fn empty_colony_is_extinct_immediately() {
        let mut sim = Simulation::from_config(&SimulationConfig::default()).unwrap();
        let result = run_bounded(&mut sim, 10, &mut NoOpCallback).unwrap();
        assert_eq!(result.end_reason, EndReason::Extinction);
        assert_eq!(result.total_ticks, 0);
        assert!(result.final_summary.is_none());
    }

    #[test]
    fn stops_at_tick_bound() {
        let mut sim = Simulation::from_config(&SimulationConfig::default()).unwrap();
        sim.spawn_agent("soldier", Vec2::new(100.0, 100.0)).unwrap();
        let mut counter = Counter(0);
        let result = run_bounded(&mut sim, 5, &mut counter).unwrap();
        assert_eq!(result.end_reason, EndReason::MaxTicksReached);
        assert_eq!(result.total_ticks, 5);
        assert_eq!(counter.0, 5);
        assert_eq!(result.final_summary.unwrap().tick, 5);
    }

    #[test]
    fn extinction_mid_run_ends_early() {
        let mut config = SimulationConfig::default();
        config.hostiles.bite_damage = 10_000;
        config.hostiles.bite_range = 50.0;
        let mut sim = Simulation::from_config(&config).unwrap();
        sim.spawn_agent("scout", Vec2::new(200.0, 200.0)).unwrap();
        sim.spawn_hostile(HostileKind::Spider, Vec2::new(210.0, 200.0));
        let result = run_bounded(&mut sim, 50, &mut NoOpCallback).unwrap();
        assert_eq!(result.end_reason, EndReason::Extinction);
        assert_eq!(result.total_ticks, 1);
    }
}
