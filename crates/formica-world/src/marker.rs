//! A single pheromone deposit.

use formica_types::{Cell, PheromoneKind};
use serde::{Deserialize, Serialize};

/// One marker of one kind at one sub-cell, carrying its propagated distance.
///
/// The `(cell, kind)` pair is the marker's identity and never changes.
/// `distance` is the number of orthogonal steps to the colony interior
/// along same-kind markers; the interior itself counts as distance 0 but
/// never holds markers. `occupancy` counts agents currently anchored here.
/// `serial` is stamped by the engine on insertion, so a marker erased and
/// redrawn at the same cell is told apart from the one it replaced.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PheromoneMarker {
    cell: Cell,
    kind: PheromoneKind,
    distance: u32,
    occupancy: u32,
    serial: u64,
}

impl PheromoneMarker {
    /// Create a marker with zero occupancy.
    pub const fn new(cell: Cell, kind: PheromoneKind, distance: u32) -> Self {
        Self {
            cell,
            kind,
            distance,
            occupancy: 0,
            serial: 0,
        }
    }

    /// Sub-cell holding the marker.
    pub const fn cell(&self) -> Cell {
        self.cell
    }

    /// Pheromone kind of the marker.
    pub const fn kind(&self) -> PheromoneKind {
        self.kind
    }

    /// Steps to the colony interior along same-kind markers.
    pub const fn distance(&self) -> u32 {
        self.distance
    }

    /// Number of agents anchored to this marker.
    pub const fn occupancy(&self) -> u32 {
        self.occupancy
    }

    /// Insertion serial assigned by the engine.
    pub const fn serial(&self) -> u64 {
        self.serial
    }

    pub(crate) const fn with_serial(mut self, serial: u64) -> Self {
        self.serial = serial;
        self
    }

    pub(crate) const fn set_distance(&mut self, distance: u32) {
        self.distance = distance;
    }

    pub(crate) const fn increment_occupancy(&mut self) {
        self.occupancy = self.occupancy.saturating_add(1);
    }

    pub(crate) const fn decrement_occupancy(&mut self) {
        self.occupancy = self.occupancy.saturating_sub(1);
    }
}

/// One agent's hold on a marker's occupancy count.
///
/// Only valid while the marker it was taken on still exists; a claim on a
/// marker that was erased (even if the cell was later redrawn) is stale
/// and releasing it is a no-op.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct OccupancyClaim {
    /// Sub-cell of the claimed marker.
    pub cell: Cell,
    /// Kind of the claimed marker.
    pub kind: PheromoneKind,
    /// Serial of the claimed marker.
    pub serial: u64,
}
