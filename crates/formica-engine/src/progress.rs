//! Tick callback that logs periodic progress lines.

use formica_core::{Simulation, TickCallback, TickSummary};
use tracing::{debug, info};

/// Logs a summary line every `interval` ticks, and every death or hatching
/// at debug level.
pub struct ProgressCallback {
    interval: u64,
    delivered: u64,
    deaths: u64,
}

impl ProgressCallback {
    /// Create a callback that reports every `interval` ticks (0 disables the
    /// periodic line).
    pub const fn new(interval: u64) -> Self {
        Self {
            interval,
            delivered: 0,
            deaths: 0,
        }
    }
}

impl TickCallback for ProgressCallback {
    fn on_tick(&mut self, summary: &TickSummary, sim: &Simulation) {
        self.delivered = self.delivered.saturating_add(u64::from(summary.delivered));
        self.deaths = self
            .deaths
            .saturating_add(u64::try_from(summary.deaths.len()).unwrap_or(u64::MAX));

        if !summary.hatched.is_empty() || !summary.deaths.is_empty() {
            debug!(
                tick = summary.tick,
                hatched = summary.hatched.len(),
                deaths = summary.deaths.len(),
                "Population changed"
            );
        }

        if summary.tick.checked_rem(self.interval) == Some(0) {
            info!(
                tick = summary.tick,
                agents_alive = summary.agents_alive,
                eggs = sim.brood().len(),
                hostiles_alive = summary.hostiles_alive,
                markers = summary.markers,
                delivered_total = self.delivered,
                deaths_total = self.deaths,
                edible_stock = sim.colony().edible_total(),
                "Progress"
            );
        }
    }
}
