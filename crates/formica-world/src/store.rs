//! Sparse storage of pheromone markers keyed by `(cell, kind)`.
//!
//! The store owns no behavior: it does not validate adjacency or
//! distances. [`DistanceFieldEngine`](crate::field::DistanceFieldEngine)
//! is its only writer.

use std::collections::BTreeMap;

use formica_types::{Cell, PheromoneKind};

use crate::marker::PheromoneMarker;

/// All markers of every kind, at most one per `(cell, kind)` pair.
///
/// Keys are ordered by cell first, so all kinds at one cell are a
/// contiguous range and [`get_all`](Self::get_all) is a range scan.
#[derive(Debug, Clone, Default)]
pub struct DistanceFieldStore {
    markers: BTreeMap<(Cell, PheromoneKind), PheromoneMarker>,
}

impl DistanceFieldStore {
    /// Create an empty store.
    pub const fn new() -> Self {
        Self {
            markers: BTreeMap::new(),
        }
    }

    /// Whether a marker of `kind` exists at `cell`.
    pub fn has(&self, cell: Cell, kind: PheromoneKind) -> bool {
        self.markers.contains_key(&(cell, kind))
    }

    /// The marker of `kind` at `cell`, if any.
    pub fn get(&self, cell: Cell, kind: PheromoneKind) -> Option<&PheromoneMarker> {
        self.markers.get(&(cell, kind))
    }

    pub(crate) fn get_mut(&mut self, cell: Cell, kind: PheromoneKind) -> Option<&mut PheromoneMarker> {
        self.markers.get_mut(&(cell, kind))
    }

    /// All markers at `cell`, one per kind present.
    pub fn get_all(&self, cell: Cell) -> impl Iterator<Item = &PheromoneMarker> {
        // Explore and Attack are the smallest and largest kinds in `Ord`.
        self.markers
            .range((cell, PheromoneKind::Explore)..=(cell, PheromoneKind::Attack))
            .map(|(_, m)| m)
    }

    /// Markers of any kind in the 3x3 block centered on `center`.
    pub fn neighborhood_3x3(&self, center: Cell) -> Vec<PheromoneMarker> {
        let mut sensed = Vec::with_capacity(9);
        for cell in center.neighborhood_3x3() {
            sensed.extend(self.get_all(cell).copied());
        }
        sensed
    }

    /// Markers of one kind in the 3x3 block centered on `center`.
    pub fn neighborhood_3x3_of(&self, center: Cell, kind: PheromoneKind) -> Vec<PheromoneMarker> {
        center
            .neighborhood_3x3()
            .into_iter()
            .filter_map(|cell| self.get(cell, kind).copied())
            .collect()
    }

    /// Insert or replace the marker at its `(cell, kind)` key.
    ///
    /// Returns the marker previously stored under that key.
    pub fn insert(&mut self, marker: PheromoneMarker) -> Option<PheromoneMarker> {
        self.markers.insert((marker.cell(), marker.kind()), marker)
    }

    /// Remove and return the marker of `kind` at `cell`.
    pub fn remove(&mut self, cell: Cell, kind: PheromoneKind) -> Option<PheromoneMarker> {
        self.markers.remove(&(cell, kind))
    }

    /// Iterate over every marker.
    pub fn iter(&self) -> impl Iterator<Item = &PheromoneMarker> {
        self.markers.values()
    }

    /// Number of markers of every kind.
    pub fn len(&self) -> usize {
        self.markers.len()
    }

    /// Whether the store holds no markers.
    pub fn is_empty(&self) -> bool {
        self.markers.is_empty()
    }

    /// Number of markers of one kind.
    pub fn count_of(&self, kind: PheromoneKind) -> usize {
        self.markers.keys().filter(|(_, k)| *k == kind).count()
    }
}
