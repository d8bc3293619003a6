//! Conversion between continuous world coordinates and the two grids.
//!
//! The coarse tile grid is what collision and terrain collaborators use.
//! The pheromone sub-grid divides every tile into `sub_cells_per_tile`
//! cells per axis and is where markers live. All conversions are pure.

use formica_types::{Cell, Vec2};

use crate::config::FieldConfig;
use crate::error::WorldError;

/// Stateless mapper between world space, tiles, and pheromone sub-cells.
#[derive(Debug, Clone, PartialEq)]
pub struct GridMapper {
    /// Edge length of one tile in world units.
    tile_size: f32,
    /// Sub-cells per tile edge (at least 1).
    sub_cells_per_tile: u32,
    /// Edge length of one sub-cell in world units.
    sub_cell_size: f32,
    /// World width in sub-cells.
    width_sub_cells: i32,
    /// World height in sub-cells.
    height_sub_cells: i32,
}

impl GridMapper {
    /// Build a mapper from the field configuration.
    ///
    /// # Errors
    ///
    /// Returns [`WorldError::InvalidResolution`] for a zero resolution,
    /// [`WorldError::InvalidTileSize`] for a non-positive or non-finite tile
    /// size, [`WorldError::InvalidDimensions`] for an empty world, and
    /// [`WorldError::GridTooLarge`] when the sub-grid would not fit in `i32`.
    pub fn new(config: &FieldConfig) -> Result<Self, WorldError> {
        if config.sub_cells_per_tile == 0 {
            return Err(WorldError::InvalidResolution(config.sub_cells_per_tile));
        }
        if !config.tile_size.is_finite() || config.tile_size <= 0.0 {
            return Err(WorldError::InvalidTileSize(config.tile_size));
        }
        if config.width_tiles == 0 || config.height_tiles == 0 {
            return Err(WorldError::InvalidDimensions {
                width: config.width_tiles,
                height: config.height_tiles,
            });
        }

        let width_sub_cells = sub_cell_extent(config.width_tiles, config.sub_cells_per_tile)?;
        let height_sub_cells = sub_cell_extent(config.height_tiles, config.sub_cells_per_tile)?;

        #[allow(clippy::cast_precision_loss)]
        let sub_cell_size = config.tile_size / config.sub_cells_per_tile as f32;

        Ok(Self {
            tile_size: config.tile_size,
            sub_cells_per_tile: config.sub_cells_per_tile,
            sub_cell_size,
            width_sub_cells,
            height_sub_cells,
        })
    }

    /// Sub-cell containing `pos` (floor division by the sub-cell size).
    pub fn world_to_sub_cell(&self, pos: Vec2) -> Cell {
        Cell::new(
            floor_div(pos.x, self.sub_cell_size),
            floor_div(pos.y, self.sub_cell_size),
        )
    }

    /// World-space center of `cell`.
    ///
    /// Agents steer toward cell centers rather than corners; aiming at a
    /// corner leaves them oscillating across the cell boundary.
    pub fn sub_cell_to_world(&self, cell: Cell) -> Vec2 {
        cell_center(cell, self.sub_cell_size)
    }

    /// Tile containing `pos`.
    pub fn world_to_tile(&self, pos: Vec2) -> Cell {
        Cell::new(
            floor_div(pos.x, self.tile_size),
            floor_div(pos.y, self.tile_size),
        )
    }

    /// World-space center of `tile`.
    pub fn tile_to_world(&self, tile: Cell) -> Vec2 {
        cell_center(tile, self.tile_size)
    }

    /// Tile that contains the given sub-cell.
    pub fn sub_cell_to_tile(&self, cell: Cell) -> Cell {
        // sub_cells_per_tile >= 1 and fits i32 because the extent check passed.
        let per_tile = i32::try_from(self.sub_cells_per_tile).unwrap_or(i32::MAX);
        Cell::new(cell.x.div_euclid(per_tile), cell.y.div_euclid(per_tile))
    }

    /// Whether `cell` lies inside the world's sub-grid.
    pub const fn contains_sub_cell(&self, cell: Cell) -> bool {
        cell.x >= 0 && cell.y >= 0 && cell.x < self.width_sub_cells && cell.y < self.height_sub_cells
    }

    /// Clamp a world position into the world rectangle.
    pub fn clamp_to_world(&self, pos: Vec2) -> Vec2 {
        pos.clamped(Vec2::ZERO, self.world_size())
    }

    /// Whether a world position lies inside the world rectangle.
    pub fn contains_world(&self, pos: Vec2) -> bool {
        let size = self.world_size();
        pos.x >= 0.0 && pos.y >= 0.0 && pos.x <= size.x && pos.y <= size.y
    }

    /// Size of the world in world units.
    #[allow(clippy::cast_precision_loss)]
    pub fn world_size(&self) -> Vec2 {
        Vec2::new(
            self.width_sub_cells as f32 * self.sub_cell_size,
            self.height_sub_cells as f32 * self.sub_cell_size,
        )
    }

    /// Edge length of one sub-cell in world units.
    pub const fn sub_cell_size(&self) -> f32 {
        self.sub_cell_size
    }

    /// Edge length of one tile in world units.
    pub const fn tile_size(&self) -> f32 {
        self.tile_size
    }

    /// Configured sub-cells per tile edge.
    pub const fn sub_cells_per_tile(&self) -> u32 {
        self.sub_cells_per_tile
    }

    /// Total number of sub-cells in the world.
    pub fn sub_cell_count(&self) -> u64 {
        let w = u64::try_from(self.width_sub_cells).unwrap_or(0);
        let h = u64::try_from(self.height_sub_cells).unwrap_or(0);
        w.saturating_mul(h)
    }
}

/// Number of sub-cells spanned by `tiles` tiles, as an `i32` extent.
fn sub_cell_extent(tiles: u32, sub_cells_per_tile: u32) -> Result<i32, WorldError> {
    tiles
        .checked_mul(sub_cells_per_tile)
        .and_then(|n| i32::try_from(n).ok())
        .ok_or(WorldError::GridTooLarge {
            tiles,
            sub_cells_per_tile,
        })
}

/// Floor division of a coordinate by a cell size, saturating into `i32`.
#[allow(clippy::cast_possible_truncation)]
fn floor_div(value: f32, size: f32) -> i32 {
    // `as` saturates out-of-range floats and maps NaN to 0.
    (value / size).floor() as i32
}

/// Center of a grid cell of edge `size`.
#[allow(clippy::cast_precision_loss)]
fn cell_center(cell: Cell, size: f32) -> Vec2 {
    Vec2::new(
        (cell.x as f32 + 0.5) * size,
        (cell.y as f32 + 0.5) * size,
    )
}
