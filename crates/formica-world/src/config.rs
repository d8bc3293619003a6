//! Configuration for the pheromone field and world extent.
//!
//! [`FieldConfig`] mirrors the `field` and `world` sections of
//! `formica-config.yaml` that the field engine needs. It is supplied once
//! at construction and never changes afterwards.

use serde::Deserialize;

/// Geometry of the world and resolution of the pheromone sub-grid.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct FieldConfig {
    /// Edge length of one coarse tile, in world units.
    #[serde(default = "default_tile_size")]
    pub tile_size: f32,

    /// Number of pheromone sub-cells along each edge of a tile.
    #[serde(default = "default_sub_cells_per_tile")]
    pub sub_cells_per_tile: u32,

    /// World width in tiles.
    #[serde(default = "default_width_tiles")]
    pub width_tiles: u32,

    /// World height in tiles.
    #[serde(default = "default_height_tiles")]
    pub height_tiles: u32,

    /// Radius of the colony interior around the colony center, in sub-cells.
    ///
    /// A sub-cell is interior when its Euclidean distance to the colony's
    /// center sub-cell is at most this radius.
    #[serde(default = "default_colony_interior_radius")]
    pub colony_interior_radius: u32,
}

impl Default for FieldConfig {
    fn default() -> Self {
        Self {
            tile_size: default_tile_size(),
            sub_cells_per_tile: default_sub_cells_per_tile(),
            width_tiles: default_width_tiles(),
            height_tiles: default_height_tiles(),
            colony_interior_radius: default_colony_interior_radius(),
        }
    }
}

const fn default_tile_size() -> f32 {
    32.0
}

const fn default_sub_cells_per_tile() -> u32 {
    4
}

const fn default_width_tiles() -> u32 {
    48
}

const fn default_height_tiles() -> u32 {
    48
}

const fn default_colony_interior_radius() -> u32 {
    3
}
