//! Pheromone fields, grid geometry, colony, and food for the Formica simulation.
//!
//! This crate models everything ants sense and edit in their environment.
//! The centerpiece is the [`DistanceFieldEngine`], an incrementally
//! maintained multi-kind distance field over the pheromone sub-grid.
//!
//! # Modules
//!
//! - [`config`] -- [`FieldConfig`]: world extent and sub-grid resolution.
//! - [`grid`] -- [`GridMapper`]: world, tile, and sub-cell coordinate conversion.
//! - [`marker`] -- [`PheromoneMarker`]: one deposit with distance and occupancy,
//!   and the [`OccupancyClaim`] an agent holds on it.
//! - [`store`] -- [`DistanceFieldStore`]: sparse `(cell, kind)` storage.
//! - [`field`] -- [`DistanceFieldEngine`]: validated insertion, relaxation,
//!   cascade removal, and line drawing.
//! - [`colony`] -- [`Colony`]: nest position and stockpile.
//! - [`resource`] -- [`FoodSource`] piles and the [`FoodField`] holding them.
//! - [`error`] -- [`WorldError`].

pub mod colony;
pub mod config;
pub mod error;
pub mod field;
pub mod grid;
pub mod marker;
pub mod resource;
pub mod store;

// Re-export primary types at crate root.
pub use colony::Colony;
pub use config::FieldConfig;
pub use error::WorldError;
pub use field::DistanceFieldEngine;
pub use grid::GridMapper;
pub use marker::{OccupancyClaim, PheromoneMarker};
pub use resource::{FoodField, FoodSource};
pub use store::DistanceFieldStore;
