//! Simulation clock, tick cycle, and orchestration for the Formica colony
//! simulation.
//!
//! This crate owns the [`Simulation`], the single owner of the pheromone
//! field, the colony, and every creature, and the 5-phase tick cycle that
//! drives it: Wake, Perception, Behavior, Resolution, and Reap.
//!
//! # Modules
//!
//! - [`clock`] -- Fixed-timestep clock turning wall time into whole ticks.
//! - [`config`] -- Configuration loading from `formica-config.yaml` into
//!   strongly-typed structs.
//! - [`hostile`] -- Beetles, spiders, and rival ants.
//! - [`tick`] -- The tick cycle and the [`Simulation`] owner.
//! - [`snapshot`] -- Serializable read-only views for renderers.
//! - [`runner`] -- Bounded headless run loop with per-tick callbacks.
//!
//! [`Simulation`]: tick::Simulation

pub mod clock;
pub mod config;
pub mod hostile;
pub mod runner;
pub mod snapshot;
pub mod tick;

pub use clock::{ClockError, SimulationClock};
pub use config::{ConfigError, SimulationConfig};
pub use runner::{EndReason, NoOpCallback, RunResult, RunnerError, TickCallback, run_bounded};
pub use snapshot::{AgentSnapshot, WorldSnapshot};
pub use tick::{Simulation, TickError, TickSummary};
