//! Trail-following strategies.
//!
//! A [`TrailStrategy`] turns the markers an ant senses in the 3x3 block
//! around it into one decision: the next marker to walk to, or
//! [`TrailDecision::Leave`]. Strategies are stateless; the per-ant state
//! they read and update lives in [`TrailState`].
//!
//! All three strategies share one walking rule: from the anchor marker,
//! move to the sensed marker with the extremal distance in the current
//! direction (largest when outward, smallest when inward), picking
//! uniformly at random among ties. Random tie-breaking is what spreads
//! ants across the branches of a fork.

use rand::Rng;
use rand::seq::IndexedRandom;
use serde::{Deserialize, Serialize};

use formica_types::{Cell, PheromoneKind, Vec2};
use formica_world::{GridMapper, OccupancyClaim, PheromoneMarker};

use crate::config::StrategyConfig;

/// Movement policy applied while an ant follows a trail.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TrailStrategy {
    /// Walk outward to the trail's end, then leave. Never backtracks.
    Explore,
    /// Walk outward while empty, inward while full.
    Gather,
    /// Walk back and forth, reversing more often when crowded.
    Patrol,
}

/// Outcome of one strategy decision.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TrailDecision {
    /// Walk to this cell next.
    Target(Cell),
    /// Abandon the trail and return to wandering.
    Leave,
}

/// Per-ant trail traversal state.
///
/// The anchor and target are cached cells, not references: if the marker
/// under either disappears the strategy re-anchors on the nearest sensed
/// marker. `claim` is the occupancy hold on the anchor, re-taken whenever
/// the anchor moves or its marker is replaced.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrailState {
    /// Whether the ant is moving away from the colony.
    pub outward: bool,
    /// The last marker the ant stood on.
    pub anchor: Option<Cell>,
    /// The marker the ant is walking toward.
    pub target: Option<Cell>,
    /// Occupancy held on the anchor marker.
    pub claim: Option<OccupancyClaim>,
}

impl TrailState {
    /// Fresh state entering a trail at `entry`.
    pub const fn entering(entry: Cell, outward: bool) -> Self {
        Self {
            outward,
            anchor: Some(entry),
            target: Some(entry),
            claim: None,
        }
    }
}

/// Everything a strategy needs to make one decision.
#[derive(Debug, Clone, Copy)]
pub struct StrategyInput<'a> {
    /// Same-kind markers in the 3x3 block around the ant's cell.
    pub sensed: &'a [PheromoneMarker],
    /// The ant's position, used to pick the nearest marker on re-anchor.
    pub position: Vec2,
    /// Mapper for marker cell centers.
    pub mapper: &'a GridMapper,
    /// Whether the ant's inventory is at capacity.
    pub inventory_full: bool,
    /// Tunables.
    pub config: &'a StrategyConfig,
}

impl TrailStrategy {
    /// The strategy used to follow markers of `kind`.
    pub const fn for_kind(kind: PheromoneKind) -> Self {
        match kind {
            PheromoneKind::Explore => Self::Explore,
            PheromoneKind::Gather => Self::Gather,
            PheromoneKind::Attack => Self::Patrol,
        }
    }

    /// Multiplier applied to the ant's base speed while on the trail.
    pub const fn speed_multiplier(self, config: &StrategyConfig) -> f32 {
        match self {
            Self::Explore => config.explore_speed,
            Self::Gather => config.gather_speed,
            Self::Patrol => config.patrol_speed,
        }
    }

    /// Whether a loaded ant following this strategy ends up at the colony.
    ///
    /// Only gatherers turn inward when full; explore and patrol trails
    /// would carry a load away from home.
    pub const fn carries_home(self) -> bool {
        matches!(self, Self::Gather)
    }

    /// Direction an ant takes when it first steps onto a trail.
    pub const fn initial_outward(self, inventory_full: bool) -> bool {
        match self {
            Self::Explore | Self::Patrol => true,
            Self::Gather => !inventory_full,
        }
    }

    /// Decide the next target from the sensed neighborhood.
    ///
    /// Updates `state.anchor` when re-anchoring and `state.outward` when
    /// reversing. The caller stores a returned target in `state.target`.
    pub fn select_next<R: Rng + ?Sized>(
        self,
        input: &StrategyInput<'_>,
        state: &mut TrailState,
        rng: &mut R,
    ) -> TrailDecision {
        let Some(anchor) = resolve_anchor(input, state) else {
            return TrailDecision::Leave;
        };
        let candidates = match self {
            Self::Explore => extremal(input.sensed, anchor, true),
            Self::Gather => gather_candidates(input, &anchor, state),
            Self::Patrol => forward_or_back(input, &anchor, state),
        };
        let pick = if self == Self::Patrol {
            least_occupied(&candidates).choose(rng).copied()
        } else {
            candidates.choose(rng).copied()
        };
        pick.map_or(TrailDecision::Leave, |m| TrailDecision::Target(m.cell()))
    }
}

/// Find the anchor marker among the sensed markers, re-anchoring on the
/// nearest one when the cached anchor is gone.
fn resolve_anchor(input: &StrategyInput<'_>, state: &mut TrailState) -> Option<PheromoneMarker> {
    if let Some(cell) = state.anchor
        && let Some(marker) = input.sensed.iter().find(|m| m.cell() == cell)
    {
        return Some(*marker);
    }
    let nearest = nearest_marker(input.sensed, input.position, input.mapper)?;
    state.anchor = Some(nearest.cell());
    Some(nearest)
}

/// The marker whose cell center is closest to `position`, lowest cell on
/// ties.
pub fn nearest_marker(sensed: &[PheromoneMarker], position: Vec2, mapper: &GridMapper) -> Option<PheromoneMarker> {
    sensed
        .iter()
        .map(|m| (position.distance(mapper.sub_cell_to_world(m.cell())), m))
        .min_by(|a, b| a.0.total_cmp(&b.0).then_with(|| a.1.cell().cmp(&b.1.cell())))
        .map(|(_, m)| *m)
}

/// Sensed markers strictly beyond the anchor in the given direction that
/// share the extremal distance.
fn extremal(sensed: &[PheromoneMarker], anchor: PheromoneMarker, outward: bool) -> Vec<PheromoneMarker> {
    let d = anchor.distance();
    let beyond = sensed.iter().filter(|m| {
        if outward {
            m.distance() > d
        } else {
            m.distance() < d
        }
    });
    let best = if outward {
        beyond.clone().map(PheromoneMarker::distance).max()
    } else {
        beyond.clone().map(PheromoneMarker::distance).min()
    };
    best.map_or_else(Vec::new, |best| {
        beyond.filter(|m| m.distance() == best).copied().collect()
    })
}

/// Every sensed marker other than the anchor.
fn any_other(sensed: &[PheromoneMarker], anchor: &PheromoneMarker) -> Vec<PheromoneMarker> {
    sensed
        .iter()
        .filter(|m| m.cell() != anchor.cell())
        .copied()
        .collect()
}

fn gather_candidates(
    input: &StrategyInput<'_>,
    anchor: &PheromoneMarker,
    state: &mut TrailState,
) -> Vec<PheromoneMarker> {
    if input.inventory_full {
        // Loaded ants only ever head home; the colony end of the trail is
        // where they leave it.
        state.outward = false;
        return extremal(input.sensed, *anchor, false);
    }
    forward_or_back(input, anchor, state)
}

/// Keep going in the current direction; at a dead end flip once, and if
/// that is blocked too take any other sensed marker.
fn forward_or_back(
    input: &StrategyInput<'_>,
    anchor: &PheromoneMarker,
    state: &mut TrailState,
) -> Vec<PheromoneMarker> {
    let forward = extremal(input.sensed, *anchor, state.outward);
    if !forward.is_empty() {
        return forward;
    }
    state.outward = !state.outward;
    let back = extremal(input.sensed, *anchor, state.outward);
    if !back.is_empty() {
        return back;
    }
    any_other(input.sensed, anchor)
}

/// Probability that a patroller reverses during one tick.
///
/// Grows linearly with the number of higher-priority patrollers nearby and
/// is capped at `patrol_max_turn_chance`.
pub fn turn_chance(higher_priority_nearby: u32, config: &StrategyConfig) -> f64 {
    let raw = f64::from(higher_priority_nearby) * config.patrol_turn_chance_per_agent;
    raw.clamp(0.0, config.patrol_max_turn_chance.clamp(0.0, 1.0))
}

/// Roll this tick's reversal for a patroller with `higher_priority_nearby`
/// outranking patrollers around it.
pub fn roll_patrol_turn<R: Rng + ?Sized>(higher_priority_nearby: u32, config: &StrategyConfig, rng: &mut R) -> bool {
    let chance = turn_chance(higher_priority_nearby, config);
    chance > 0.0 && rng.random_bool(chance)
}

/// The candidates sharing the lowest occupancy.
fn least_occupied(candidates: &[PheromoneMarker]) -> Vec<PheromoneMarker> {
    let Some(min) = candidates.iter().map(PheromoneMarker::occupancy).min() else {
        return Vec::new();
    };
    candidates
        .iter()
        .filter(|m| m.occupancy() == min)
        .copied()
        .collect()
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::float_cmp, clippy::panic, clippy::arithmetic_side_effects)]
mod tests {
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    use formica_world::{DistanceFieldEngine, FieldConfig};

    use super::*;

    fn engine() -> DistanceFieldEngine {
        let config = FieldConfig {
            tile_size: 8.0,
            sub_cells_per_tile: 1,
            width_tiles: 40,
            height_tiles: 40,
            colony_interior_radius: 1,
        };
        DistanceFieldEngine::new(&config, Vec2::new(84.0, 84.0)).unwrap()
    }

    fn marker(x: i32, y: i32, distance: u32) -> PheromoneMarker {
        PheromoneMarker::new(Cell::new(x, y), PheromoneKind::Gather, distance)
    }

    fn input<'a>(
        sensed: &'a [PheromoneMarker],
        at: Cell,
        mapper: &'a GridMapper,
        inventory_full: bool,
        config: &'a StrategyConfig,
    ) -> StrategyInput<'a> {
        StrategyInput {
            sensed,
            position: mapper.sub_cell_to_world(at),
            mapper,
            inventory_full,
            config,
        }
    }

    #[test]
    fn full_gatherer_at_fork_takes_lower_distance() {
        let engine = engine();
        let config = StrategyConfig::default();
        let sensed = [marker(5, 5, 2), marker(4, 5, 1), marker(6, 5, 3)];
        let at = Cell::new(5, 5);
        let mut rng = StdRng::seed_from_u64(1);
        for _ in 0..20 {
            let mut state = TrailState::entering(at, true);
            let decision = TrailStrategy::Gather.select_next(
                &input(&sensed, at, engine.mapper(), true, &config),
                &mut state,
                &mut rng,
            );
            assert_eq!(decision, TrailDecision::Target(Cell::new(4, 5)));
            assert!(!state.outward);
        }
    }

    #[test]
    fn full_gatherer_leaves_at_colony_end() {
        let engine = engine();
        let config = StrategyConfig::default();
        let sensed = [marker(5, 5, 1), marker(6, 5, 2)];
        let at = Cell::new(5, 5);
        let mut state = TrailState::entering(at, false);
        let decision = TrailStrategy::Gather.select_next(
            &input(&sensed, at, engine.mapper(), true, &config),
            &mut state,
            &mut StdRng::seed_from_u64(2),
        );
        assert_eq!(decision, TrailDecision::Leave);
    }

    #[test]
    fn empty_gatherer_flips_once_at_dead_end() {
        let engine = engine();
        let config = StrategyConfig::default();
        let sensed = [marker(5, 5, 3), marker(4, 5, 2)];
        let at = Cell::new(5, 5);
        let mut state = TrailState::entering(at, true);
        let decision = TrailStrategy::Gather.select_next(
            &input(&sensed, at, engine.mapper(), false, &config),
            &mut state,
            &mut StdRng::seed_from_u64(3),
        );
        assert_eq!(decision, TrailDecision::Target(Cell::new(4, 5)));
        assert!(!state.outward);
    }

    #[test]
    fn empty_gatherer_falls_back_to_any_differing_neighbor() {
        let engine = engine();
        let config = StrategyConfig::default();
        // Two markers of equal distance: neither strictly beyond the other.
        let sensed = [marker(5, 5, 4), marker(6, 6, 4)];
        let at = Cell::new(5, 5);
        let mut state = TrailState::entering(at, true);
        let decision = TrailStrategy::Gather.select_next(
            &input(&sensed, at, engine.mapper(), false, &config),
            &mut state,
            &mut StdRng::seed_from_u64(4),
        );
        assert_eq!(decision, TrailDecision::Target(Cell::new(6, 6)));
    }

    #[test]
    fn lone_marker_is_a_true_dead_end() {
        let engine = engine();
        let config = StrategyConfig::default();
        let sensed = [marker(5, 5, 4)];
        let at = Cell::new(5, 5);
        for strategy in [TrailStrategy::Explore, TrailStrategy::Gather, TrailStrategy::Patrol] {
            let mut state = TrailState::entering(at, true);
            let decision = strategy.select_next(
                &input(&sensed, at, engine.mapper(), false, &config),
                &mut state,
                &mut StdRng::seed_from_u64(5),
            );
            assert_eq!(decision, TrailDecision::Leave, "{strategy:?}");
        }
    }

    #[test]
    fn explore_never_backtracks() {
        let engine = engine();
        let config = StrategyConfig::default();
        let sensed = [marker(5, 5, 3), marker(4, 5, 2)];
        let at = Cell::new(5, 5);
        let mut state = TrailState::entering(at, true);
        let decision = TrailStrategy::Explore.select_next(
            &input(&sensed, at, engine.mapper(), false, &config),
            &mut state,
            &mut StdRng::seed_from_u64(6),
        );
        assert_eq!(decision, TrailDecision::Leave);
    }

    #[test]
    fn explore_leaves_within_trail_length() {
        let mut engine = engine();
        let config = StrategyConfig::default();
        let trail_len = 12;
        let end = engine
            .draw_line(Some(Cell::new(12, 10)), Cell::new(23, 10), PheromoneKind::Explore)
            .unwrap();
        assert_eq!(end, Cell::new(23, 10));
        assert_eq!(engine.marker_count(), trail_len);

        let mut at = Cell::new(12, 10);
        let mut state = TrailState::entering(at, true);
        let mut rng = StdRng::seed_from_u64(7);
        let mut steps = 0;
        loop {
            let sensed = engine.pheromones_in_3x3_of(at, PheromoneKind::Explore);
            let decision = TrailStrategy::Explore.select_next(
                &input(&sensed, at, engine.mapper(), false, &config),
                &mut state,
                &mut rng,
            );
            match decision {
                TrailDecision::Leave => break,
                TrailDecision::Target(next) => {
                    at = next;
                    state.anchor = Some(next);
                    steps += 1;
                    assert!(steps <= trail_len, "explore looped");
                }
            }
        }
        assert_eq!(at, end);
    }

    #[test]
    fn fork_ties_split_randomly() {
        let engine = engine();
        let config = StrategyConfig::default();
        let sensed = [marker(5, 5, 2), marker(5, 4, 3), marker(5, 6, 3)];
        let at = Cell::new(5, 5);
        let mut rng = StdRng::seed_from_u64(8);
        let mut north = 0;
        let mut south = 0;
        for _ in 0..200 {
            let mut state = TrailState::entering(at, true);
            match TrailStrategy::Gather.select_next(
                &input(&sensed, at, engine.mapper(), false, &config),
                &mut state,
                &mut rng,
            ) {
                TrailDecision::Target(c) if c == Cell::new(5, 4) => north += 1,
                TrailDecision::Target(c) if c == Cell::new(5, 6) => south += 1,
                other => panic!("unexpected decision {other:?}"),
            }
        }
        assert!(north > 50 && south > 50, "north={north} south={south}");
    }

    #[test]
    fn vanished_anchor_reanchors_on_nearest() {
        let engine = engine();
        let config = StrategyConfig::default();
        let sensed = [marker(6, 5, 4), marker(7, 5, 5)];
        let at = Cell::new(5, 5);
        let mut state = TrailState::entering(at, true);
        let decision = TrailStrategy::Explore.select_next(
            &input(&sensed, at, engine.mapper(), false, &config),
            &mut state,
            &mut StdRng::seed_from_u64(9),
        );
        assert_eq!(state.anchor, Some(Cell::new(6, 5)));
        assert_eq!(decision, TrailDecision::Target(Cell::new(7, 5)));
    }

    #[test]
    fn nothing_sensed_means_leave() {
        let engine = engine();
        let config = StrategyConfig::default();
        let at = Cell::new(5, 5);
        let mut state = TrailState::entering(at, true);
        let decision = TrailStrategy::Gather.select_next(
            &input(&[], at, engine.mapper(), false, &config),
            &mut state,
            &mut StdRng::seed_from_u64(10),
        );
        assert_eq!(decision, TrailDecision::Leave);
    }

    #[test]
    fn turn_chance_scales_and_caps() {
        let config = StrategyConfig::default();
        assert_eq!(turn_chance(0, &config), 0.0);
        assert!((turn_chance(2, &config) - 0.10).abs() < 1e-9);
        assert!((turn_chance(10, &config) - 0.20).abs() < 1e-9);
    }

    #[test]
    fn lone_patroller_never_turns_early() {
        let engine = engine();
        let config = StrategyConfig::default();
        let sensed = [marker(5, 5, 2), marker(4, 5, 1), marker(6, 5, 3)];
        let at = Cell::new(5, 5);
        let mut rng = StdRng::seed_from_u64(11);
        for _ in 0..100 {
            let mut state = TrailState::entering(at, true);
            let decision = TrailStrategy::Patrol.select_next(
                &input(&sensed, at, engine.mapper(), false, &config),
                &mut state,
                &mut rng,
            );
            assert_eq!(decision, TrailDecision::Target(Cell::new(6, 5)));
        }
    }

    #[test]
    fn turn_rolls_follow_crowding() {
        let config = StrategyConfig::default();
        let mut rng = StdRng::seed_from_u64(12);
        assert!((0..500).all(|_| !roll_patrol_turn(0, &config, &mut rng)));

        let turned = (0..500).filter(|_| roll_patrol_turn(4, &config, &mut rng)).count();
        // Expected 20% (four patrollers at 5% each, at the cap).
        assert!((50..=150).contains(&turned), "turned={turned}");
    }

    #[test]
    fn patrol_prefers_least_occupied_branch() {
        let mut engine = engine();
        let config = StrategyConfig::default();
        let kind = PheromoneKind::Attack;
        // Stem from the colony edge, then a fork at (14,10).
        engine.draw_line(Some(Cell::new(12, 10)), Cell::new(14, 10), kind);
        assert!(engine.add_pheromone(Cell::new(14, 9), kind));
        assert!(engine.add_pheromone(Cell::new(14, 11), kind));
        assert!(engine.claim_occupancy(Cell::new(14, 9), kind).is_some());

        let at = Cell::new(13, 10);
        let sensed = engine.pheromones_in_3x3_of(at, kind);
        let mut rng = StdRng::seed_from_u64(13);
        for _ in 0..50 {
            let mut state = TrailState::entering(at, true);
            let decision = TrailStrategy::Patrol.select_next(
                &input(&sensed, at, engine.mapper(), false, &config),
                &mut state,
                &mut rng,
            );
            assert_eq!(decision, TrailDecision::Target(Cell::new(14, 11)));
        }
    }

    #[test]
    fn only_gather_carries_a_load_home() {
        assert!(TrailStrategy::Gather.carries_home());
        assert!(!TrailStrategy::Explore.carries_home());
        assert!(!TrailStrategy::Patrol.carries_home());
    }

    #[test]
    fn speed_multiplier_per_role() {
        let config = StrategyConfig::default();
        assert_eq!(TrailStrategy::Explore.speed_multiplier(&config), config.explore_speed);
        assert_eq!(
            TrailStrategy::for_kind(PheromoneKind::Attack).speed_multiplier(&config),
            config.patrol_speed
        );
    }
}
