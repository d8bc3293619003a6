//! Fixed-timestep simulation clock.
//!
//! The clock turns elapsed wall time into whole simulation ticks of
//! constant in-game duration. It never delivers a fraction of a tick, so
//! field edits and agent reads are strictly serialized tick by tick.
//!
//! # Design Principles
//!
//! - Wall time accumulates; each full `tick_duration` in the accumulator
//!   yields one tick.
//! - When more ticks are due than `max_ticks_per_frame`, the excess
//!   backlog is dropped instead of being replayed later.
//! - A paused clock (or a time scale of zero) delivers no ticks and does
//!   not accumulate time.
//! - The tick counter uses checked arithmetic.

use std::time::Duration;

use crate::config::TimeConfig;

/// Errors that can occur during clock operations.
#[derive(Debug, thiserror::Error)]
pub enum ClockError {
    /// Tick counter would overflow.
    #[error("tick counter overflow: cannot advance beyond u64::MAX")]
    TickOverflow,

    /// Invalid time configuration (e.g. zero tick duration).
    #[error("invalid time configuration: {reason}")]
    InvalidConfig {
        /// Explanation of what is wrong with the configuration.
        reason: String,
    },
}

/// Fixed-timestep tick driver.
#[derive(Debug, Clone, PartialEq)]
pub struct SimulationClock {
    /// Number of ticks executed so far.
    tick: u64,
    /// In-game duration of one tick.
    tick_duration: Duration,
    /// Most ticks delivered by one call to [`advance`](Self::advance).
    max_ticks_per_frame: u32,
    /// Scaled wall time not yet converted into ticks.
    accumulator: Duration,
    /// Multiplier applied to incoming wall time.
    time_scale: f64,
    /// Whether tick delivery is suspended.
    paused: bool,
}

impl SimulationClock {
    /// Create a clock at tick 0 from a time configuration.
    ///
    /// # Errors
    ///
    /// Returns [`ClockError::InvalidConfig`] if the tick duration or the
    /// per-frame cap is zero.
    pub fn new(config: &TimeConfig) -> Result<Self, ClockError> {
        if config.tick_duration_ms == 0 {
            return Err(ClockError::InvalidConfig {
                reason: "tick_duration_ms must be at least 1".to_owned(),
            });
        }
        if config.max_ticks_per_frame == 0 {
            return Err(ClockError::InvalidConfig {
                reason: "max_ticks_per_frame must be at least 1".to_owned(),
            });
        }
        Ok(Self {
            tick: 0,
            tick_duration: Duration::from_millis(config.tick_duration_ms),
            max_ticks_per_frame: config.max_ticks_per_frame,
            accumulator: Duration::ZERO,
            time_scale: 1.0,
            paused: false,
        })
    }

    /// Feed `elapsed` wall time and return how many ticks are now due.
    ///
    /// The result is capped at `max_ticks_per_frame`; when the cap is hit
    /// the remaining backlog is discarded.
    pub fn advance(&mut self, elapsed: Duration) -> u32 {
        if self.paused || self.time_scale <= 0.0 {
            return 0;
        }
        let scaled = elapsed.mul_f64(self.time_scale);
        self.accumulator = self.accumulator.saturating_add(scaled);

        let due = self
            .accumulator
            .as_nanos()
            .checked_div(self.tick_duration.as_nanos())
            .unwrap_or(0);
        let cap = u128::from(self.max_ticks_per_frame);
        if due > cap {
            self.accumulator = Duration::ZERO;
            return self.max_ticks_per_frame;
        }

        let due = u32::try_from(due).unwrap_or(self.max_ticks_per_frame);
        let consumed = self.tick_duration.checked_mul(due).unwrap_or(self.accumulator);
        self.accumulator = self.accumulator.saturating_sub(consumed);
        due
    }

    /// Record that one tick is being executed. Returns the new tick number.
    ///
    /// # Errors
    ///
    /// Returns [`ClockError::TickOverflow`] if the tick counter would exceed
    /// `u64::MAX`.
    pub fn next_tick(&mut self) -> Result<u64, ClockError> {
        self.tick = self.tick.checked_add(1).ok_or(ClockError::TickOverflow)?;
        Ok(self.tick)
    }

    /// Return the current tick number.
    pub const fn tick(&self) -> u64 {
        self.tick
    }

    /// In-game duration of one tick.
    pub const fn tick_duration(&self) -> Duration {
        self.tick_duration
    }

    /// In-game duration of one tick, in seconds.
    pub fn tick_seconds(&self) -> f32 {
        self.tick_duration.as_secs_f32()
    }

    /// Suspend tick delivery.
    pub const fn pause(&mut self) {
        self.paused = true;
    }

    /// Resume tick delivery. Time that passed while paused is not replayed.
    pub const fn resume(&mut self) {
        self.paused = false;
    }

    /// Whether tick delivery is suspended.
    pub const fn is_paused(&self) -> bool {
        self.paused
    }

    /// Current wall-time multiplier.
    pub const fn time_scale(&self) -> f64 {
        self.time_scale
    }

    /// Change the wall-time multiplier. Zero behaves like a pause.
    ///
    /// # Errors
    ///
    /// Returns [`ClockError::InvalidConfig`] for negative or non-finite
    /// scales.
    pub fn set_time_scale(&mut self, scale: f64) -> Result<(), ClockError> {
        if !scale.is_finite() || scale < 0.0 {
            return Err(ClockError::InvalidConfig {
                reason: format!("time scale must be finite and non-negative, got {scale}"),
            });
        }
        self.time_scale = scale;
        Ok(())
    }
}
