//! Shared type definitions for the Formica colony simulation.
//!
//! This crate is the single source of truth for the small value types that
//! flow between the field engine, the agent logic, and the tick cycle.
//!
//! # Modules
//!
//! - [`ids`] -- Type-safe UUID wrappers for entity identifiers
//! - [`enums`] -- Enumeration types (pheromone kinds, resources, behavior states)
//! - [`geometry`] -- Grid cells and continuous world-space vectors

pub mod enums;
pub mod geometry;
pub mod ids;

// Re-export all public types at crate root for convenience.
pub use enums::{BehaviorKind, HostileKind, PheromoneKind, ResourceKind};
pub use geometry::{Cell, Vec2};
pub use ids::{AgentId, EggId, FoodSourceId, HostileId};
