//! Error types for the `formica-world` crate.
//!
//! Runtime trail edits never fail with an error: rejected insertions
//! report `false` and removals of absent markers are no-ops. [`WorldError`]
//! covers construction-time misconfiguration and checked arithmetic only.

use formica_types::ResourceKind;

/// Errors that can occur while building or mutating world state.
#[derive(Debug, thiserror::Error)]
pub enum WorldError {
    /// The pheromone sub-grid resolution must be at least one sub-cell per tile.
    #[error("sub_cells_per_tile must be at least 1 (got {0})")]
    InvalidResolution(u32),

    /// Tile size must be a finite, strictly positive number of world units.
    #[error("tile_size must be finite and positive (got {0})")]
    InvalidTileSize(f32),

    /// The world must be at least one tile wide and tall.
    #[error("world dimensions must be non-zero (got {width}x{height} tiles)")]
    InvalidDimensions {
        /// Width in tiles.
        width: u32,
        /// Height in tiles.
        height: u32,
    },

    /// The world is too large for the sub-grid to address with `i32` cells.
    #[error("world of {tiles} tiles at {sub_cells_per_tile} sub-cells per tile exceeds the grid range")]
    GridTooLarge {
        /// Tile count along the offending axis.
        tiles: u32,
        /// Configured sub-grid resolution.
        sub_cells_per_tile: u32,
    },

    /// The colony center lies outside the world.
    #[error("colony center ({x}, {y}) lies outside the world")]
    ColonyOutOfBounds {
        /// World-space x coordinate.
        x: f32,
        /// World-space y coordinate.
        y: f32,
    },

    /// A stockpile withdrawal asked for more than the colony holds.
    #[error("insufficient stockpile: wanted {requested} of {resource:?} but only have {available}")]
    InsufficientStockpile {
        /// The resource being withdrawn.
        resource: ResourceKind,
        /// Units requested.
        requested: u32,
        /// Units held.
        available: u32,
    },

    /// Arithmetic overflow during a checked operation.
    #[error("arithmetic overflow in world calculation")]
    ArithmeticOverflow,
}
