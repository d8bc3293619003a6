//! The pheromone distance-field engine.
//!
//! Every pheromone kind forms its own field: a set of markers on the
//! sub-grid, each carrying the number of orthogonal steps back to the
//! colony interior along same-kind markers. The engine keeps every field
//! locally consistent under edits:
//!
//! - **Insertion** requires a parent (the colony interior or an orthogonal
//!   same-kind marker); the new marker takes `min(parent) + 1`, then a
//!   breadth-first relaxation lowers any neighbor that now has a shorter
//!   route home.
//! - **Removal** deletes the marker and cascades breadth-first through
//!   every same-kind marker reachable from it whose distance exceeds the
//!   removed distance. Those markers were routed through the deleted cell
//!   and would otherwise linger as stranded trail.
//!
//! After any sequence of edits, every marker's distance equals one plus
//! the minimum distance among its orthogonal same-kind neighbors (the
//! interior counting as 0).
//!
//! The engine is the sole owner of its [`DistanceFieldStore`]. Readers get
//! copies or shared references through engine methods; only the engine's
//! public edit methods mutate the field.

use std::collections::VecDeque;

use formica_types::{Cell, PheromoneKind, Vec2};
use tracing::{debug, trace};

use crate::config::FieldConfig;
use crate::error::WorldError;
use crate::grid::GridMapper;
use crate::marker::{OccupancyClaim, PheromoneMarker};
use crate::store::DistanceFieldStore;

/// Owner of all pheromone fields and the colony-interior geometry.
#[derive(Debug, Clone)]
pub struct DistanceFieldEngine {
    /// World/sub-grid coordinate conversion and bounds.
    mapper: GridMapper,
    /// Every marker of every kind.
    store: DistanceFieldStore,
    /// Sub-cell at the colony's center.
    colony_center: Cell,
    /// Interior radius around `colony_center`, in sub-cells.
    interior_radius: u32,
    /// Serial stamped on the next inserted marker.
    next_serial: u64,
}

impl DistanceFieldEngine {
    /// Build an engine for the configured world with the colony at
    /// `colony_center` (world units).
    ///
    /// # Errors
    ///
    /// Propagates [`GridMapper::new`] validation errors and returns
    /// [`WorldError::ColonyOutOfBounds`] when the colony center lies
    /// outside the world.
    pub fn new(config: &FieldConfig, colony_center: Vec2) -> Result<Self, WorldError> {
        let mapper = GridMapper::new(config)?;
        if !mapper.contains_world(colony_center) {
            return Err(WorldError::ColonyOutOfBounds {
                x: colony_center.x,
                y: colony_center.y,
            });
        }
        let center_cell = mapper.world_to_sub_cell(colony_center);
        Ok(Self::from_parts(mapper, center_cell, config.colony_interior_radius))
    }

    /// Assemble an engine from an existing mapper and a colony center cell.
    pub const fn from_parts(mapper: GridMapper, colony_center: Cell, interior_radius: u32) -> Self {
        Self {
            mapper,
            store: DistanceFieldStore::new(),
            colony_center,
            interior_radius,
            next_serial: 1,
        }
    }

    // -------------------------------------------------------------------
    // Geometry
    // -------------------------------------------------------------------

    /// The coordinate mapper shared with agents and renderers.
    pub const fn mapper(&self) -> &GridMapper {
        &self.mapper
    }

    /// Sub-cell at the colony's center.
    pub const fn colony_center(&self) -> Cell {
        self.colony_center
    }

    /// Colony interior radius, in sub-cells.
    pub const fn interior_radius(&self) -> u32 {
        self.interior_radius
    }

    /// Whether `cell` belongs to the colony interior.
    pub fn is_colony_interior(&self, cell: Cell) -> bool {
        let radius = u64::from(self.interior_radius);
        cell.distance_squared(self.colony_center) <= radius.saturating_mul(radius)
    }

    /// Whether `cell` lies outside the interior but shares an edge with it.
    pub fn touches_colony_interior(&self, cell: Cell) -> bool {
        !self.is_colony_interior(cell)
            && cell
                .orthogonal_neighbors()
                .into_iter()
                .any(|n| self.is_colony_interior(n))
    }

    /// Whether the world position lies inside the colony interior.
    pub fn is_inside_colony(&self, pos: Vec2) -> bool {
        self.is_colony_interior(self.mapper.world_to_sub_cell(pos))
    }

    // -------------------------------------------------------------------
    // Queries
    // -------------------------------------------------------------------

    /// Whether a marker of `kind` exists at `cell`.
    pub fn has(&self, cell: Cell, kind: PheromoneKind) -> bool {
        self.store.has(cell, kind)
    }

    /// Copy of the marker of `kind` at `cell`.
    pub fn get(&self, cell: Cell, kind: PheromoneKind) -> Option<PheromoneMarker> {
        self.store.get(cell, kind).copied()
    }

    /// Copies of every marker at `cell`, one per kind present.
    pub fn get_all_at(&self, cell: Cell) -> Vec<PheromoneMarker> {
        self.store.get_all(cell).copied().collect()
    }

    /// Markers of any kind in the 3x3 block around `center`.
    pub fn pheromones_in_3x3(&self, center: Cell) -> Vec<PheromoneMarker> {
        self.store.neighborhood_3x3(center)
    }

    /// Markers of one kind in the 3x3 block around `center`.
    pub fn pheromones_in_3x3_of(&self, center: Cell, kind: PheromoneKind) -> Vec<PheromoneMarker> {
        self.store.neighborhood_3x3_of(center, kind)
    }

    /// Every marker of every kind, for renderers.
    pub fn markers(&self) -> impl Iterator<Item = &PheromoneMarker> {
        self.store.iter()
    }

    /// Total number of markers.
    pub fn marker_count(&self) -> usize {
        self.store.len()
    }

    /// Number of markers of one kind.
    pub fn marker_count_of(&self, kind: PheromoneKind) -> usize {
        self.store.count_of(kind)
    }

    // -------------------------------------------------------------------
    // Insertion
    // -------------------------------------------------------------------

    /// Place a marker of `kind` at `cell`.
    ///
    /// Returns `false` without touching the field when the cell is out of
    /// bounds, inside the colony interior, already holds a marker of this
    /// kind, or has no parent (neither the interior nor an orthogonal
    /// same-kind marker is adjacent).
    pub fn add_pheromone(&mut self, cell: Cell, kind: PheromoneKind) -> bool {
        if !self.mapper.contains_sub_cell(cell) {
            debug!(%cell, %kind, "pheromone rejected: out of bounds");
            return false;
        }
        if self.is_colony_interior(cell) {
            debug!(%cell, %kind, "pheromone rejected: inside colony interior");
            return false;
        }
        if self.store.has(cell, kind) {
            return false;
        }

        let Some(parent) = self.parent_distance(cell, kind) else {
            debug!(%cell, %kind, "pheromone rejected: no adjacent parent");
            return false;
        };
        let Some(distance) = parent.checked_add(1) else {
            return false;
        };

        let serial = self.next_serial;
        self.next_serial = self.next_serial.saturating_add(1);
        self.store
            .insert(PheromoneMarker::new(cell, kind, distance).with_serial(serial));
        let relaxed = self.propagate(cell, kind);
        trace!(%cell, %kind, distance, relaxed, "pheromone added");
        true
    }

    /// Smallest distance among the cell's valid parents, the interior
    /// counting as 0.
    fn parent_distance(&self, cell: Cell, kind: PheromoneKind) -> Option<u32> {
        let from_interior = self.touches_colony_interior(cell).then_some(0);
        cell.orthogonal_neighbors()
            .into_iter()
            .filter_map(|n| self.store.get(n, kind).map(PheromoneMarker::distance))
            .chain(from_interior)
            .min()
    }

    /// Breadth-first relaxation outward from `origin`.
    ///
    /// Lowers every reachable same-kind marker whose distance exceeds its
    /// neighbor's distance plus one. Returns the number of relaxations.
    fn propagate(&mut self, origin: Cell, kind: PheromoneKind) -> usize {
        let mut queue = VecDeque::from([origin]);
        let mut relaxed: usize = 0;

        while let Some(current) = queue.pop_front() {
            let Some(distance) = self.store.get(current, kind).map(PheromoneMarker::distance) else {
                continue;
            };
            let Some(candidate) = distance.checked_add(1) else {
                continue;
            };
            for neighbor in current.orthogonal_neighbors() {
                if let Some(marker) = self.store.get_mut(neighbor, kind)
                    && marker.distance() > candidate
                {
                    marker.set_distance(candidate);
                    relaxed = relaxed.saturating_add(1);
                    queue.push_back(neighbor);
                }
            }
        }

        relaxed
    }

    // -------------------------------------------------------------------
    // Removal
    // -------------------------------------------------------------------

    /// Remove the marker of `kind` at `cell` and cascade downstream.
    ///
    /// Every same-kind marker reachable from `cell` through markers farther
    /// than the removed one is removed too. Markers at or below the removed
    /// distance stay. Returns the number of markers removed; an absent
    /// marker is a no-op returning 0.
    pub fn remove_pheromone(&mut self, cell: Cell, kind: PheromoneKind) -> usize {
        let Some(removed) = self.store.remove(cell, kind) else {
            return 0;
        };
        let threshold = removed.distance();
        let mut count: usize = 1;
        let mut queue = VecDeque::from([cell]);

        while let Some(current) = queue.pop_front() {
            for neighbor in current.orthogonal_neighbors() {
                let stranded = self
                    .store
                    .get(neighbor, kind)
                    .is_some_and(|m| m.distance() > threshold);
                if stranded {
                    self.store.remove(neighbor, kind);
                    count = count.saturating_add(1);
                    queue.push_back(neighbor);
                }
            }
        }

        debug!(%cell, %kind, distance = threshold, removed = count, "pheromone removed");
        count
    }

    /// Remove every kind at `cell`, cascading each kind independently.
    ///
    /// Returns the total number of markers removed.
    pub fn remove_all_pheromones(&mut self, cell: Cell) -> usize {
        let kinds: Vec<PheromoneKind> = self.store.get_all(cell).map(PheromoneMarker::kind).collect();
        kinds
            .into_iter()
            .map(|kind| self.remove_pheromone(cell, kind))
            .fold(0, usize::saturating_add)
    }

    // -------------------------------------------------------------------
    // Interactive drawing
    // -------------------------------------------------------------------

    /// Paint a stroke of `kind` from `start` toward `end`.
    ///
    /// Steps one orthogonal cell at a time along the axis with the larger
    /// remaining delta (x on ties), adding a marker at each step or
    /// accepting an existing one. Stops at the first step that cannot be
    /// placed and returns the last cell that carries a marker of `kind`,
    /// which the caller uses as the anchor for the next stroke segment.
    ///
    /// With no `start`, this is a single add at `end`. Returns `None` when
    /// not even the first cell could be placed.
    pub fn draw_line(&mut self, start: Option<Cell>, end: Cell, kind: PheromoneKind) -> Option<Cell> {
        let Some(start) = start else {
            return self.place_or_keep(end, kind).then_some(end);
        };
        if !self.place_or_keep(start, kind) {
            return None;
        }

        let mut current = start;
        while current != end {
            let dx = end.x.saturating_sub(current.x);
            let dy = end.y.saturating_sub(current.y);
            let next = if dx.unsigned_abs() >= dy.unsigned_abs() {
                current.offset(dx.signum(), 0)
            } else {
                current.offset(0, dy.signum())
            };
            if !self.place_or_keep(next, kind) {
                debug!(from = %start, to = %end, stopped_at = %current, %kind, "stroke interrupted");
                return Some(current);
            }
            current = next;
        }

        Some(current)
    }

    /// Add a marker, treating an existing marker of the same kind as success.
    fn place_or_keep(&mut self, cell: Cell, kind: PheromoneKind) -> bool {
        self.add_pheromone(cell, kind) || self.store.has(cell, kind)
    }

    // -------------------------------------------------------------------
    // Occupancy
    // -------------------------------------------------------------------

    /// Count one more agent anchored at the marker and hand back the claim.
    /// Returns `None` if the marker does not exist.
    pub fn claim_occupancy(&mut self, cell: Cell, kind: PheromoneKind) -> Option<OccupancyClaim> {
        let marker = self.store.get_mut(cell, kind)?;
        marker.increment_occupancy();
        Some(OccupancyClaim {
            cell,
            kind,
            serial: marker.serial(),
        })
    }

    /// Give back a claim. Returns `false` for a stale claim: the marker it
    /// was taken on is gone, and any marker now at that cell is untouched.
    pub fn release_occupancy(&mut self, claim: OccupancyClaim) -> bool {
        match self.store.get_mut(claim.cell, claim.kind) {
            Some(marker) if marker.serial() == claim.serial => {
                marker.decrement_occupancy();
                true
            }
            _ => false,
        }
    }

    /// Whether `claim` still counts toward the marker it was taken on.
    pub fn holds(&self, claim: OccupancyClaim) -> bool {
        self.store
            .get(claim.cell, claim.kind)
            .is_some_and(|m| m.serial() == claim.serial)
    }

    // -------------------------------------------------------------------
    // Diagnostics
    // -------------------------------------------------------------------

    /// The first marker whose distance is not one more than its best
    /// parent, or `None` when every field is locally consistent.
    pub fn first_inconsistent_marker(&self) -> Option<PheromoneMarker> {
        self.store.iter().copied().find(|marker| {
            let expected = self
                .parent_distance(marker.cell(), marker.kind())
                .and_then(|p| p.checked_add(1));
            self.is_colony_interior(marker.cell()) || expected != Some(marker.distance())
        })
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::indexing_slicing)]
mod tests {
    use rand::rngs::StdRng;
    use rand::{Rng, SeedableRng};

    use super::*;

    const GATHER: PheromoneKind = PheromoneKind::Gather;

    /// 40x40 sub-cell world, colony at (10, 10) with interior radius 1:
    /// interior cells are the center and its four orthogonal neighbors.
    fn engine() -> DistanceFieldEngine {
        let mapper = GridMapper::new(&FieldConfig {
            tile_size: 16.0,
            sub_cells_per_tile: 4,
            width_tiles: 10,
            height_tiles: 10,
            colony_interior_radius: 1,
        })
        .unwrap();
        DistanceFieldEngine::from_parts(mapper, Cell::new(10, 10), 1)
    }

    fn distance(engine: &DistanceFieldEngine, x: i32, y: i32) -> Option<u32> {
        engine.get(Cell::new(x, y), GATHER).map(|m| m.distance())
    }

    fn add(engine: &mut DistanceFieldEngine, x: i32, y: i32) -> bool {
        engine.add_pheromone(Cell::new(x, y), GATHER)
    }

    /// East from the colony to (16,10), north to (16,16), west to (10,16).
    fn long_loop(engine: &mut DistanceFieldEngine) {
        for x in 12..=16 {
            assert!(add(engine, x, 10));
        }
        for y in 11..=16 {
            assert!(add(engine, 16, y));
        }
        for x in (10..=15).rev() {
            assert!(add(engine, x, 16));
        }
    }

    #[test]
    fn interior_geometry() {
        let e = engine();
        assert!(e.is_colony_interior(Cell::new(10, 10)));
        assert!(e.is_colony_interior(Cell::new(11, 10)));
        assert!(!e.is_colony_interior(Cell::new(11, 11)));
        assert!(e.touches_colony_interior(Cell::new(12, 10)));
        assert!(e.touches_colony_interior(Cell::new(11, 11)));
        assert!(!e.touches_colony_interior(Cell::new(13, 10)));
        assert!(!e.touches_colony_interior(Cell::new(10, 10)));
    }

    #[test]
    fn linear_trail_distances_and_cascade() {
        let mut e = engine();
        assert!(add(&mut e, 12, 10));
        assert!(add(&mut e, 13, 10));
        assert!(add(&mut e, 14, 10));
        assert_eq!(distance(&e, 12, 10), Some(1));
        assert_eq!(distance(&e, 13, 10), Some(2));
        assert_eq!(distance(&e, 14, 10), Some(3));

        assert_eq!(e.remove_pheromone(Cell::new(12, 10), GATHER), 3);
        assert_eq!(e.marker_count(), 0);
    }

    #[test]
    fn duplicate_insertion_is_rejected_without_mutation() {
        let mut e = engine();
        assert!(add(&mut e, 12, 10));
        assert!(e.claim_occupancy(Cell::new(12, 10), GATHER).is_some());
        let before = e.get(Cell::new(12, 10), GATHER);

        assert!(!add(&mut e, 12, 10));
        assert_eq!(e.get(Cell::new(12, 10), GATHER), before);
        assert_eq!(e.marker_count(), 1);
    }

    #[test]
    fn insertion_requires_parent() {
        let mut e = engine();
        assert!(!add(&mut e, 20, 20));
        assert!(!add(&mut e, 13, 10));
        assert_eq!(e.marker_count(), 0);
    }

    #[test]
    fn insertion_rejected_inside_interior_and_out_of_bounds() {
        let mut e = engine();
        assert!(!add(&mut e, 10, 10));
        assert!(!add(&mut e, 11, 10));
        assert!(!add(&mut e, -1, 5));
        assert!(!add(&mut e, 40, 5));
    }

    #[test]
    fn kinds_have_independent_connectivity() {
        let mut e = engine();
        assert!(add(&mut e, 12, 10));
        assert!(!e.add_pheromone(Cell::new(13, 10), PheromoneKind::Explore));
        assert!(e.add_pheromone(Cell::new(12, 10), PheromoneKind::Explore));
        assert_eq!(e.get_all_at(Cell::new(12, 10)).len(), 2);
    }

    #[test]
    fn bridging_relaxes_far_chain() {
        let mut e = engine();
        long_loop(&mut e);
        assert_eq!(distance(&e, 10, 16), Some(17));

        // Short chain south of the colony, then the bridge cell.
        assert!(add(&mut e, 10, 12));
        assert!(add(&mut e, 10, 13));
        assert!(add(&mut e, 10, 14));
        assert!(add(&mut e, 10, 15));

        assert_eq!(distance(&e, 10, 15), Some(4));
        assert_eq!(distance(&e, 10, 16), Some(5));
        assert_eq!(distance(&e, 13, 16), Some(8));
        assert_eq!(distance(&e, 15, 16), Some(10));
        // Equal via both routes: untouched.
        assert_eq!(distance(&e, 16, 16), Some(11));
        assert_eq!(distance(&e, 16, 12), Some(7));
        assert!(e.first_inconsistent_marker().is_none());
    }

    #[test]
    fn insertion_takes_smallest_parent() {
        let mut e = engine();
        long_loop(&mut e);
        assert!(add(&mut e, 10, 12));
        assert!(add(&mut e, 10, 13));
        assert!(add(&mut e, 10, 14));
        // (10,15) sits between distance 3 and distance 17.
        assert!(add(&mut e, 10, 15));
        assert_eq!(distance(&e, 10, 15), Some(4));
    }

    #[test]
    fn cascade_spares_markers_with_shorter_routes() {
        let mut e = engine();
        long_loop(&mut e);
        for y in 12..=15 {
            assert!(add(&mut e, 10, y));
        }

        // (13,16) now sits at 8; everything farther along the loop goes.
        let removed = e.remove_pheromone(Cell::new(13, 16), GATHER);
        assert_eq!(removed, 6);

        for (x, y) in [(14, 16), (15, 16), (16, 16), (16, 15), (16, 14)] {
            assert_eq!(distance(&e, x, y), None, "({x},{y}) should be gone");
        }
        assert_eq!(distance(&e, 12, 16), Some(7));
        assert_eq!(distance(&e, 16, 13), Some(8));
        assert_eq!(distance(&e, 16, 12), Some(7));
        assert!(e.first_inconsistent_marker().is_none());
    }

    #[test]
    fn remove_missing_marker_is_noop() {
        let mut e = engine();
        assert!(add(&mut e, 12, 10));
        assert_eq!(e.remove_pheromone(Cell::new(30, 30), GATHER), 0);
        assert_eq!(e.remove_pheromone(Cell::new(12, 10), PheromoneKind::Attack), 0);
        assert_eq!(e.marker_count(), 1);
    }

    #[test]
    fn remove_all_cascades_each_kind() {
        let mut e = engine();
        for kind in [PheromoneKind::Gather, PheromoneKind::Attack] {
            assert!(e.add_pheromone(Cell::new(12, 10), kind));
            assert!(e.add_pheromone(Cell::new(13, 10), kind));
        }
        assert!(e.add_pheromone(Cell::new(12, 10), PheromoneKind::Explore));

        assert_eq!(e.remove_all_pheromones(Cell::new(12, 10)), 5);
        assert_eq!(e.marker_count(), 0);
    }

    #[test]
    fn draw_line_single_point_without_start() {
        let mut e = engine();
        assert_eq!(e.draw_line(None, Cell::new(12, 10), GATHER), Some(Cell::new(12, 10)));
        assert_eq!(e.draw_line(None, Cell::new(25, 25), GATHER), None);
    }

    #[test]
    fn draw_line_steps_along_larger_axis() {
        let mut e = engine();
        let end = Cell::new(15, 12);
        assert_eq!(e.draw_line(Some(Cell::new(12, 10)), end, GATHER), Some(end));

        assert_eq!(distance(&e, 12, 10), Some(1));
        assert_eq!(distance(&e, 13, 10), Some(2));
        assert_eq!(distance(&e, 14, 10), Some(3));
        assert_eq!(distance(&e, 14, 11), Some(4));
        assert_eq!(distance(&e, 15, 11), Some(5));
        assert_eq!(distance(&e, 15, 12), Some(6));
        assert_eq!(e.marker_count(), 6);
    }

    #[test]
    fn draw_line_stops_at_interior() {
        let mut e = engine();
        let last = e.draw_line(Some(Cell::new(12, 10)), Cell::new(8, 10), GATHER);
        assert_eq!(last, Some(Cell::new(12, 10)));
        assert_eq!(e.marker_count(), 1);
    }

    #[test]
    fn draw_line_from_unreachable_start_places_nothing() {
        let mut e = engine();
        assert_eq!(e.draw_line(Some(Cell::new(25, 25)), Cell::new(28, 25), GATHER), None);
        assert_eq!(e.marker_count(), 0);
    }

    #[test]
    fn draw_line_tolerates_existing_markers() {
        let mut e = engine();
        assert!(add(&mut e, 12, 10));
        assert!(add(&mut e, 13, 10));
        let end = Cell::new(15, 10);
        assert_eq!(e.draw_line(Some(Cell::new(12, 10)), end, GATHER), Some(end));
        assert_eq!(distance(&e, 15, 10), Some(4));
    }

    #[test]
    fn occupancy_claim_and_release() {
        let mut e = engine();
        let cell = Cell::new(12, 10);
        assert!(e.claim_occupancy(cell, GATHER).is_none());
        assert!(add(&mut e, 12, 10));
        let first = e.claim_occupancy(cell, GATHER).unwrap();
        let second = e.claim_occupancy(cell, GATHER).unwrap();
        assert_eq!(first, second);
        assert!(e.holds(first));
        assert_eq!(e.get(cell, GATHER).map(|m| m.occupancy()), Some(2));
        assert!(e.release_occupancy(first));
        assert!(e.release_occupancy(second));
        assert!(e.release_occupancy(second));
        assert_eq!(e.get(cell, GATHER).map(|m| m.occupancy()), Some(0));
    }

    #[test]
    fn claim_on_redrawn_marker_is_stale() {
        let mut e = engine();
        let cell = Cell::new(12, 10);
        assert!(add(&mut e, 12, 10));
        let old = e.claim_occupancy(cell, GATHER).unwrap();

        assert_eq!(e.remove_pheromone(cell, GATHER), 1);
        assert!(add(&mut e, 12, 10));
        assert!(!e.holds(old));

        let fresh = e.claim_occupancy(cell, GATHER).unwrap();
        assert_ne!(fresh.serial, old.serial);
        assert!(!e.release_occupancy(old));
        assert_eq!(e.get(cell, GATHER).map(|m| m.occupancy()), Some(1));
        assert!(e.release_occupancy(fresh));
        assert_eq!(e.get(cell, GATHER).map(|m| m.occupancy()), Some(0));
    }

    #[test]
    fn random_edits_keep_fields_consistent() {
        let mut e = engine();
        let mut rng = StdRng::seed_from_u64(7);
        for _ in 0..2_000 {
            let cell = Cell::new(rng.random_range(4..17), rng.random_range(4..17));
            let kind = PheromoneKind::ALL[rng.random_range(0..PheromoneKind::ALL.len())];
            if rng.random_bool(0.8) {
                let _ = e.add_pheromone(cell, kind);
            } else {
                let _ = e.remove_pheromone(cell, kind);
            }
            assert_eq!(e.first_inconsistent_marker(), None);
        }
        let max = e.mapper().sub_cell_count();
        assert!(e.markers().all(|m| u64::from(m.distance()) <= max));
    }

    #[test]
    fn engine_rejects_colony_outside_world() {
        let config = FieldConfig::default();
        let result = DistanceFieldEngine::new(&config, Vec2::new(-5.0, 10.0));
        assert!(matches!(result, Err(WorldError::ColonyOutOfBounds { .. })));
    }
}
