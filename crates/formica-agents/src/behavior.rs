//! The per-ant behavior state machine.
//!
//! ```text
//!            marker of a followed kind sensed (cooldown elapsed)
//!   Wander ---------------------------------------------------> FollowTrail
//!      ^  <-------------------- strategy says Leave ---------------'
//!      |
//!      |   hostile in vision (any state, fighting castes only)
//!      +------------------------- Combat <---------------------------
//!        no hostile left in vision
//! ```
//!
//! Each tick the ant reads the engine, decides a velocity, and moves. The
//! only field writes an ant makes are occupancy claims and releases,
//! always through the engine.

use core::f32::consts::{PI, TAU};

use rand::Rng;
use serde::{Deserialize, Serialize};
use tracing::debug;

use formica_types::{AgentId, BehaviorKind, HostileId, PheromoneKind, Vec2};
use formica_world::DistanceFieldEngine;

use crate::agent::Agent;
use crate::combat::{self, AttackIntent, VisibleHostile};
use crate::config::{AgentType, BehaviorConfig, StrategyConfig};
use crate::strategy::{self, StrategyInput, TrailDecision, TrailState, TrailStrategy};

/// Behavior state of one ant.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum BehaviorState {
    /// Random walk with a pull toward home.
    Wander {
        /// Ticks left before trails may be entered again.
        cooldown: u32,
    },
    /// Walking a trail of `kind`.
    FollowTrail {
        /// The kind of marker being followed.
        kind: PheromoneKind,
        /// Traversal state for the trail strategy.
        trail: TrailState,
    },
    /// Engaging a hostile.
    Combat {
        /// The hostile currently targeted.
        target: HostileId,
    },
}

impl Default for BehaviorState {
    fn default() -> Self {
        Self::Wander { cooldown: 0 }
    }
}

impl BehaviorState {
    /// Discriminant for snapshots and logs.
    pub const fn kind(&self) -> BehaviorKind {
        match self {
            Self::Wander { .. } => BehaviorKind::Wander,
            Self::FollowTrail { .. } => BehaviorKind::FollowTrail,
            Self::Combat { .. } => BehaviorKind::Combat,
        }
    }

    /// The pheromone kind being followed, if on a trail.
    pub const fn following(&self) -> Option<PheromoneKind> {
        match self {
            Self::FollowTrail { kind, .. } => Some(*kind),
            Self::Wander { .. } | Self::Combat { .. } => None,
        }
    }
}

/// Another ant as seen during the perception phase.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NearbyAgent {
    /// Its id, which doubles as its patrol priority (lower ranks higher).
    pub id: AgentId,
    /// Its position at the start of the tick.
    pub position: Vec2,
    /// The trail kind it is following, if any.
    pub following: Option<PheromoneKind>,
}

/// Everything one ant reads or writes during its update.
pub struct BehaviorContext<'a, R: ?Sized> {
    /// The pheromone field. Ants only touch occupancy through it.
    pub engine: &'a mut DistanceFieldEngine,
    /// The ant's caste.
    pub agent_type: &'a AgentType,
    /// Trail strategy tunables.
    pub strategies: &'a StrategyConfig,
    /// State machine tunables.
    pub behavior: &'a BehaviorConfig,
    /// Every ant as it was at the start of the tick.
    pub neighbors: &'a [NearbyAgent],
    /// Every hostile as it was at the start of the tick.
    pub hostiles: &'a [VisibleHostile],
    /// Tick duration in seconds.
    pub dt: f32,
    /// Random source for wandering and tie-breaks.
    pub rng: &'a mut R,
}

/// What an update produced besides movement.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BehaviorOutcome {
    /// An attack to resolve this tick.
    pub attack: Option<AttackIntent>,
    /// `(from, to)` when the state changed.
    pub transition: Option<(BehaviorKind, BehaviorKind)>,
}

/// Run one tick of behavior for `agent`.
pub fn step<R: Rng + ?Sized>(agent: &mut Agent, ctx: &mut BehaviorContext<'_, R>) -> BehaviorOutcome {
    let before = agent.state.kind();
    agent.attack_cooldown = agent.attack_cooldown.saturating_sub(1);
    let mut outcome = BehaviorOutcome::default();

    let threat = if ctx.agent_type.can_fight() {
        combat::select_target(agent.position, ctx.agent_type.vision_radius, ctx.hostiles)
    } else {
        None
    };

    if let Some(target) = threat {
        if !matches!(agent.state, BehaviorState::Combat { .. }) {
            agent.release_trail(ctx.engine);
        }
        agent.state = BehaviorState::Combat { target: target.id };
        outcome.attack = engage(agent, target, ctx.agent_type, ctx.dt);
    } else {
        if matches!(agent.state, BehaviorState::Combat { .. }) {
            agent.state = BehaviorState::default();
        }
        match agent.state {
            BehaviorState::FollowTrail { kind, trail } => follow_trail(agent, kind, trail, ctx),
            BehaviorState::Wander { cooldown } => wander(agent, cooldown, ctx),
            BehaviorState::Combat { .. } => {}
        }
    }

    integrate(agent, ctx.engine, ctx.dt);

    let after = agent.state.kind();
    if before != after {
        debug!(agent_id = %agent.id, from = ?before, to = ?after, "behavior transition");
        outcome.transition = Some((before, after));
    }
    outcome
}

/// Close in on `target` and attack it when in range and off cooldown.
fn engage(agent: &mut Agent, target: VisibleHostile, agent_type: &AgentType, dt: f32) -> Option<AttackIntent> {
    let offset = target.position - agent.position;
    if offset.length() > agent_type.attack_range {
        steer_toward(agent, target.position, agent_type.move_speed, dt);
        return None;
    }
    agent.velocity = Vec2::ZERO;
    if agent.attack_cooldown > 0 {
        return None;
    }
    agent.attack_cooldown = agent_type.attack_cooldown_ticks;
    Some(AttackIntent {
        attacker: agent.id,
        target: target.id,
        damage: agent_type.attack_damage,
    })
}

/// Random walk, or a straight line home when fully loaded.
fn wander<R: Rng + ?Sized>(agent: &mut Agent, cooldown: u32, ctx: &mut BehaviorContext<'_, R>) {
    let cooldown = cooldown.saturating_sub(1);
    agent.state = BehaviorState::Wander { cooldown };

    let home = (agent.home - agent.position).normalized();
    let direction = if agent.inventory.is_full() {
        home
    } else {
        let jitter = ctx.behavior.wander_jitter;
        if jitter > 0.0 {
            agent.heading += ctx.rng.random_range(-jitter..=jitter);
        }
        (Vec2::from_angle(agent.heading) + home.scaled(ctx.agent_type.home_bias)).normalized()
    };
    if direction != Vec2::ZERO {
        agent.heading = direction.y.atan2(direction.x);
    }
    agent.velocity = direction.scaled(ctx.agent_type.move_speed);

    if cooldown == 0 {
        try_enter_trail(agent, ctx);
    }
}

/// Step onto the nearest sensed marker of the first followed kind present.
///
/// A loaded ant only considers kinds whose strategy takes it home.
fn try_enter_trail<R: Rng + ?Sized>(agent: &mut Agent, ctx: &mut BehaviorContext<'_, R>) {
    let cell = ctx.engine.mapper().world_to_sub_cell(agent.position);
    let loaded = agent.inventory.is_full();
    for &kind in &ctx.agent_type.follows {
        let strategy = TrailStrategy::for_kind(kind);
        if loaded && !strategy.carries_home() {
            continue;
        }
        let sensed = ctx.engine.pheromones_in_3x3_of(cell, kind);
        let Some(entry) = strategy::nearest_marker(&sensed, agent.position, ctx.engine.mapper()) else {
            continue;
        };
        let mut trail = TrailState::entering(entry.cell(), strategy.initial_outward(loaded));
        trail.claim = ctx.engine.claim_occupancy(entry.cell(), kind);
        agent.state = BehaviorState::FollowTrail { kind, trail };
        let goal = ctx.engine.mapper().sub_cell_to_world(entry.cell());
        steer_toward(agent, goal, trail_speed(kind, ctx.agent_type, ctx.strategies), ctx.dt);
        return;
    }
}

/// Walk toward the current target, asking the strategy for a new one on
/// arrival or when the target marker has vanished.
fn follow_trail<R: Rng + ?Sized>(
    agent: &mut Agent,
    kind: PheromoneKind,
    mut trail: TrailState,
    ctx: &mut BehaviorContext<'_, R>,
) {
    let strategy = TrailStrategy::for_kind(kind);
    if agent.inventory.is_full() && !strategy.carries_home() {
        // Filled up on a trail that leads away from home.
        leave_trail(agent, trail, 0, ctx);
        return;
    }

    if strategy == TrailStrategy::Patrol {
        let outranked_by = higher_priority_patrollers(agent, kind, ctx);
        if strategy::roll_patrol_turn(outranked_by, ctx.strategies, &mut *ctx.rng) {
            trail.outward = !trail.outward;
            // Walk back to the marker just left; the next decision there
            // runs in the new direction.
            trail.target = trail.anchor;
        }
    }

    if let Some(target) = trail.target
        && !ctx.engine.has(target, kind)
    {
        trail.target = None;
    }

    let arrived = trail.target.is_none_or(|target| {
        agent.position.distance(ctx.engine.mapper().sub_cell_to_world(target)) <= ctx.behavior.arrival_radius
    });

    if arrived {
        if let Some(target) = trail.target {
            trail.anchor = Some(target);
        }
        let cell = ctx.engine.mapper().world_to_sub_cell(agent.position);
        let sensed = ctx.engine.pheromones_in_3x3_of(cell, kind);
        let input = StrategyInput {
            sensed: &sensed,
            position: agent.position,
            mapper: ctx.engine.mapper(),
            inventory_full: agent.inventory.is_full(),
            config: ctx.strategies,
        };
        match strategy.select_next(&input, &mut trail, &mut *ctx.rng) {
            TrailDecision::Target(next) => trail.target = Some(next),
            TrailDecision::Leave => {
                leave_trail(agent, trail, ctx.behavior.trail_cooldown_ticks, ctx);
                return;
            }
        }
    }

    sync_claim(&mut trail, kind, ctx.engine);
    agent.state = BehaviorState::FollowTrail { kind, trail };

    if let Some(target) = trail.target {
        let goal = ctx.engine.mapper().sub_cell_to_world(target);
        steer_toward(agent, goal, trail_speed(kind, ctx.agent_type, ctx.strategies), ctx.dt);
    }
}

/// Drop the trail's claim and go back to wandering. Loaded ants head home.
fn leave_trail<R: ?Sized>(agent: &mut Agent, trail: TrailState, cooldown: u32, ctx: &mut BehaviorContext<'_, R>) {
    if let Some(claim) = trail.claim {
        ctx.engine.release_occupancy(claim);
    }
    agent.state = BehaviorState::Wander { cooldown };
    let direction = if agent.inventory.is_full() {
        (agent.home - agent.position).normalized()
    } else {
        Vec2::from_angle(agent.heading)
    };
    agent.velocity = direction.scaled(ctx.agent_type.move_speed);
}

/// Keep exactly one live occupancy claim, on the anchor marker.
///
/// Re-claims when the anchor moved or when the marker under it was erased
/// and redrawn since the claim was taken.
fn sync_claim(trail: &mut TrailState, kind: PheromoneKind, engine: &mut DistanceFieldEngine) {
    let live = trail
        .claim
        .is_some_and(|claim| trail.anchor == Some(claim.cell) && engine.holds(claim));
    if live {
        return;
    }
    if let Some(stale) = trail.claim.take() {
        engine.release_occupancy(stale);
    }
    trail.claim = trail.anchor.and_then(|cell| engine.claim_occupancy(cell, kind));
}

/// Count patrollers on the same trail kind, within the proximity radius,
/// whose id ranks ahead of this ant's.
fn higher_priority_patrollers<R: ?Sized>(agent: &Agent, kind: PheromoneKind, ctx: &BehaviorContext<'_, R>) -> u32 {
    if TrailStrategy::for_kind(kind) != TrailStrategy::Patrol {
        return 0;
    }
    let radius = ctx.strategies.patrol_proximity_radius;
    let count = ctx
        .neighbors
        .iter()
        .filter(|other| {
            other.id < agent.id
                && other.following == Some(kind)
                && other.position.distance(agent.position) <= radius
        })
        .count();
    u32::try_from(count).unwrap_or(u32::MAX)
}

fn trail_speed(kind: PheromoneKind, agent_type: &AgentType, strategies: &StrategyConfig) -> f32 {
    agent_type.move_speed * TrailStrategy::for_kind(kind).speed_multiplier(strategies)
}

/// Head for `goal` at `speed`, slowing so one tick never overshoots it.
fn steer_toward(agent: &mut Agent, goal: Vec2, speed: f32, dt: f32) {
    let offset = goal - agent.position;
    let dist = offset.length();
    let speed = if dt > 0.0 { speed.min(dist / dt) } else { speed };
    agent.velocity = offset.normalized().scaled(speed);
    if dist > f32::EPSILON {
        agent.heading = offset.y.atan2(offset.x);
    }
}

/// Apply velocity for one tick, turning around at the world edge.
fn integrate(agent: &mut Agent, engine: &DistanceFieldEngine, dt: f32) {
    let moved = agent.position + agent.velocity.scaled(dt);
    let clamped = engine.mapper().clamp_to_world(moved);
    if clamped != moved {
        agent.heading += PI;
    }
    agent.heading = agent.heading.rem_euclid(TAU);
    agent.position = clamped;
}

#[cfg(test)]
#[allow(
    clippy::unwrap_used,
    clippy::float_cmp,
    clippy::panic,
    clippy::arithmetic_side_effects
)]
mod tests {
    use rand::SeedableRng;
    use rand::rngs::StdRng;
    use uuid::Uuid;

    use formica_types::{Cell, HostileKind, ResourceKind};
    use formica_world::FieldConfig;

    use super::*;

    const DT: f32 = 0.05;

    struct World {
        engine: DistanceFieldEngine,
        strategies: StrategyConfig,
        behavior: BehaviorConfig,
        rng: StdRng,
    }

    impl World {
        fn new() -> Self {
            let config = FieldConfig {
                tile_size: 8.0,
                sub_cells_per_tile: 1,
                width_tiles: 40,
                height_tiles: 40,
                colony_interior_radius: 1,
            };
            Self {
                // Colony center lands in sub-cell (10, 10).
                engine: DistanceFieldEngine::new(&config, Vec2::new(84.0, 84.0)).unwrap(),
                strategies: StrategyConfig::default(),
                behavior: BehaviorConfig {
                    wander_jitter: 0.0,
                    ..BehaviorConfig::default()
                },
                rng: StdRng::seed_from_u64(99),
            }
        }

        fn center(&self, x: i32, y: i32) -> Vec2 {
            self.engine.mapper().sub_cell_to_world(Cell::new(x, y))
        }

        fn tick(&mut self, agent: &mut Agent, agent_type: &AgentType, hostiles: &[VisibleHostile]) -> BehaviorOutcome {
            self.tick_among(agent, agent_type, hostiles, &[])
        }

        fn tick_among(
            &mut self,
            agent: &mut Agent,
            agent_type: &AgentType,
            hostiles: &[VisibleHostile],
            neighbors: &[NearbyAgent],
        ) -> BehaviorOutcome {
            let mut ctx = BehaviorContext {
                engine: &mut self.engine,
                agent_type,
                strategies: &self.strategies,
                behavior: &self.behavior,
                neighbors,
                hostiles,
                dt: DT,
                rng: &mut self.rng,
            };
            agent.update(&mut ctx)
        }
    }

    #[test]
    fn scout_walks_explore_trail_to_its_end_and_leaves() {
        let mut world = World::new();
        let end = world
            .engine
            .draw_line(Some(Cell::new(12, 10)), Cell::new(20, 10), PheromoneKind::Explore)
            .unwrap();
        let scout = AgentType::scout();
        let mut agent = Agent::new(&scout, world.center(12, 10), world.center(10, 10), 0);

        let first = world.tick(&mut agent, &scout, &[]);
        assert_eq!(
            first.transition,
            Some((BehaviorKind::Wander, BehaviorKind::FollowTrail))
        );

        let mut left_at = None;
        for _ in 0..400 {
            let outcome = world.tick(&mut agent, &scout, &[]);
            if outcome.transition == Some((BehaviorKind::FollowTrail, BehaviorKind::Wander)) {
                left_at = Some(agent.position());
                break;
            }
        }
        let left_at = left_at.unwrap();
        assert!(left_at.distance(world.center(end.x, end.y)) < 8.0);
        assert_eq!(
            agent.state(),
            &BehaviorState::Wander {
                cooldown: world.behavior.trail_cooldown_ticks
            }
        );
        assert!(world.engine.markers().all(|m| m.occupancy() == 0));
    }

    #[test]
    fn cooldown_prevents_immediate_reentry() {
        let mut world = World::new();
        world
            .engine
            .draw_line(Some(Cell::new(12, 10)), Cell::new(14, 10), PheromoneKind::Explore);
        let scout = AgentType::scout();
        let mut agent = Agent::new(&scout, world.center(14, 10), world.center(10, 10), 0);
        agent.state = BehaviorState::Wander { cooldown: 5 };
        agent.velocity = Vec2::ZERO;
        for _ in 0..3 {
            world.tick(&mut agent, &scout, &[]);
            assert_eq!(agent.behavior_kind(), BehaviorKind::Wander);
        }
    }

    #[test]
    fn loaded_worker_walks_gather_trail_home() {
        let mut world = World::new();
        world
            .engine
            .draw_line(Some(Cell::new(12, 10)), Cell::new(16, 10), PheromoneKind::Gather);
        let worker = AgentType::worker();
        let mut agent = Agent::new(&worker, world.center(16, 10), world.center(10, 10), 0);
        agent.inventory_mut().add(ResourceKind::Seed, worker.carry_capacity).unwrap();

        world.tick(&mut agent, &worker, &[]);
        assert!(matches!(
            agent.state(),
            BehaviorState::FollowTrail { kind: PheromoneKind::Gather, trail } if !trail.outward
        ));

        let mut previous_x = agent.position().x;
        for _ in 0..400 {
            let outcome = world.tick(&mut agent, &worker, &[]);
            assert!(agent.position().x <= previous_x + 1e-3, "moved away from home");
            previous_x = agent.position().x;
            if outcome.transition.is_some() {
                break;
            }
        }
        assert_eq!(agent.behavior_kind(), BehaviorKind::Wander);
        assert!(agent.position().distance(world.center(12, 10)) < 8.0);
    }

    #[test]
    fn loaded_worker_walks_past_explore_trail() {
        let mut world = World::new();
        world
            .engine
            .draw_line(Some(Cell::new(12, 10)), Cell::new(20, 10), PheromoneKind::Explore);
        let worker = AgentType::worker();
        let mut agent = Agent::new(&worker, world.center(16, 10), world.center(10, 10), 0);
        agent.inventory_mut().add(ResourceKind::Seed, worker.carry_capacity).unwrap();

        let mut previous_x = agent.position().x;
        for _ in 0..20 {
            world.tick(&mut agent, &worker, &[]);
            assert_eq!(agent.behavior_kind(), BehaviorKind::Wander);
            assert!(agent.position().x < previous_x, "walked away from home");
            previous_x = agent.position().x;
        }
        assert!(world.engine.markers().all(|m| m.occupancy() == 0));
    }

    #[test]
    fn worker_filling_up_on_explore_trail_turns_home() {
        let mut world = World::new();
        world
            .engine
            .draw_line(Some(Cell::new(12, 10)), Cell::new(20, 10), PheromoneKind::Explore);
        let worker = AgentType::worker();
        let mut agent = Agent::new(&worker, world.center(14, 10), world.center(10, 10), 0);
        world.tick(&mut agent, &worker, &[]);
        assert_eq!(agent.following(), Some(PheromoneKind::Explore));

        agent.inventory_mut().add(ResourceKind::Leaf, worker.carry_capacity).unwrap();
        let outcome = world.tick(&mut agent, &worker, &[]);
        assert_eq!(
            outcome.transition,
            Some((BehaviorKind::FollowTrail, BehaviorKind::Wander))
        );
        assert!(agent.velocity().x < 0.0);
        assert!(world.engine.markers().all(|m| m.occupancy() == 0));
    }

    #[test]
    fn redrawn_anchor_is_claimed_again() {
        let mut world = World::new();
        let kind = PheromoneKind::Explore;
        let entry = Cell::new(12, 10);
        world.engine.draw_line(Some(entry), Cell::new(20, 10), kind);
        let scout = AgentType::scout();
        let mut agent = Agent::new(&scout, world.center(12, 10), world.center(10, 10), 0);
        world.tick(&mut agent, &scout, &[]);
        assert_eq!(world.engine.get(entry, kind).unwrap().occupancy(), 1);

        // Erase and redraw the whole trail between ticks.
        assert_eq!(world.engine.remove_pheromone(entry, kind), 9);
        world.engine.draw_line(Some(entry), Cell::new(20, 10), kind);
        assert_eq!(world.engine.get(entry, kind).unwrap().occupancy(), 0);

        world.tick(&mut agent, &scout, &[]);
        assert_eq!(agent.anchor(), Some(entry));
        assert_eq!(world.engine.get(entry, kind).unwrap().occupancy(), 1);

        // Another ant anchors on the same marker; moving on must not take
        // its count.
        let other = world.engine.claim_occupancy(entry, kind).unwrap();
        for _ in 0..50 {
            world.tick(&mut agent, &scout, &[]);
            if agent.anchor() != Some(entry) {
                break;
            }
        }
        let anchor = agent.anchor().unwrap();
        assert_ne!(anchor, entry);
        assert_eq!(world.engine.get(entry, kind).unwrap().occupancy(), 1);
        assert_eq!(world.engine.get(anchor, kind).unwrap().occupancy(), 1);
        assert!(world.engine.release_occupancy(other));
    }

    /// Ticks in which a soldier on a long attack trail reversed direction.
    fn patrol_reversals(crowd: usize) -> usize {
        let mut world = World::new();
        let kind = PheromoneKind::Attack;
        world.engine.draw_line(Some(Cell::new(12, 10)), Cell::new(34, 10), kind);
        let soldier = AgentType::soldier();
        let mut agent = Agent::with_id(
            AgentId::from(Uuid::from_u128(100)),
            &soldier,
            world.center(12, 10),
            world.center(10, 10),
            0,
        );
        world.tick(&mut agent, &soldier, &[]);

        let mut reversals = 0;
        let mut outward = true;
        for _ in 0..60 {
            let neighbors: Vec<NearbyAgent> = (0..crowd)
                .map(|n| NearbyAgent {
                    id: AgentId::from(Uuid::from_u128(u128::try_from(n).unwrap() + 1)),
                    position: agent.position() + Vec2::new(0.0, 4.0),
                    following: Some(kind),
                })
                .collect();
            world.tick_among(&mut agent, &soldier, &[], &neighbors);
            let BehaviorState::FollowTrail { trail, .. } = *agent.state() else {
                panic!("soldier left the trail");
            };
            if trail.outward != outward {
                reversals += 1;
                outward = trail.outward;
            }
        }
        reversals
    }

    #[test]
    fn lone_patroller_keeps_direction() {
        assert_eq!(patrol_reversals(0), 0);
    }

    #[test]
    fn crowded_patroller_reverses_between_markers() {
        // Four outranking patrollers put the chance at its 20% cap per
        // tick, far more often than the ~6 marker arrivals in 60 ticks
        // could produce.
        assert!(patrol_reversals(4) >= 4);
    }

    #[test]
    fn worker_ignores_attack_markers() {
        let mut world = World::new();
        world
            .engine
            .draw_line(Some(Cell::new(12, 10)), Cell::new(16, 10), PheromoneKind::Attack);
        let worker = AgentType::worker();
        let mut agent = Agent::new(&worker, world.center(13, 10), world.center(10, 10), 0);
        for _ in 0..5 {
            world.tick(&mut agent, &worker, &[]);
            assert_eq!(agent.behavior_kind(), BehaviorKind::Wander);
        }
    }

    #[test]
    fn soldier_engages_and_respects_cooldown() {
        let mut world = World::new();
        let soldier = AgentType::soldier();
        let mut agent = Agent::new(&soldier, world.center(20, 20), world.center(10, 10), 0);
        let spider = VisibleHostile {
            id: HostileId::from(Uuid::from_u128(1)),
            kind: HostileKind::Spider,
            position: agent.position() + Vec2::new(3.0, 0.0),
        };

        let first = world.tick(&mut agent, &soldier, &[spider]);
        assert_eq!(first.transition, Some((BehaviorKind::Wander, BehaviorKind::Combat)));
        let attack = first.attack.unwrap();
        assert_eq!(attack.target, spider.id);
        assert_eq!(attack.damage, soldier.attack_damage);

        let second = world.tick(&mut agent, &soldier, &[spider]);
        assert!(second.attack.is_none());

        let mut attacks = 0;
        for _ in 0..soldier.attack_cooldown_ticks {
            if world.tick(&mut agent, &soldier, &[spider]).attack.is_some() {
                attacks += 1;
            }
        }
        assert_eq!(attacks, 1);

        let calm = world.tick(&mut agent, &soldier, &[]);
        assert_eq!(calm.transition, Some((BehaviorKind::Combat, BehaviorKind::Wander)));
    }

    #[test]
    fn soldier_closes_distance_before_attacking() {
        let mut world = World::new();
        let soldier = AgentType::soldier();
        let mut agent = Agent::new(&soldier, world.center(20, 20), world.center(10, 10), 0);
        let beetle = VisibleHostile {
            id: HostileId::from(Uuid::from_u128(2)),
            kind: HostileKind::Beetle,
            position: agent.position() + Vec2::new(40.0, 0.0),
        };
        let start = agent.position();
        let outcome = world.tick(&mut agent, &soldier, &[beetle]);
        assert!(outcome.attack.is_none());
        assert!(agent.position().x > start.x);
    }

    #[test]
    fn non_fighters_never_enter_combat() {
        let mut world = World::new();
        let worker = AgentType::worker();
        let mut agent = Agent::new(&worker, world.center(20, 20), world.center(10, 10), 0);
        let spider = VisibleHostile {
            id: HostileId::from(Uuid::from_u128(3)),
            kind: HostileKind::Spider,
            position: agent.position(),
        };
        let outcome = world.tick(&mut agent, &worker, &[spider]);
        assert!(outcome.attack.is_none());
        assert_eq!(agent.behavior_kind(), BehaviorKind::Wander);
    }

    #[test]
    fn combat_releases_trail_occupancy() {
        let mut world = World::new();
        world
            .engine
            .draw_line(Some(Cell::new(12, 10)), Cell::new(18, 10), PheromoneKind::Attack);
        let soldier = AgentType::soldier();
        let mut agent = Agent::new(&soldier, world.center(12, 10), world.center(10, 10), 0);
        world.tick(&mut agent, &soldier, &[]);
        assert_eq!(agent.following(), Some(PheromoneKind::Attack));
        assert_eq!(
            world.engine.get(Cell::new(12, 10), PheromoneKind::Attack).unwrap().occupancy(),
            1
        );

        let rival = VisibleHostile {
            id: HostileId::from(Uuid::from_u128(4)),
            kind: HostileKind::RivalAnt,
            position: agent.position() + Vec2::new(0.0, 10.0),
        };
        world.tick(&mut agent, &soldier, &[rival]);
        assert_eq!(agent.behavior_kind(), BehaviorKind::Combat);
        assert!(world.engine.markers().all(|m| m.occupancy() == 0));
    }

    #[test]
    fn vanished_target_leaves_when_nothing_remains_ahead() {
        let mut world = World::new();
        world
            .engine
            .draw_line(Some(Cell::new(12, 10)), Cell::new(20, 10), PheromoneKind::Explore);
        let scout = AgentType::scout();
        let mut agent = Agent::new(&scout, world.center(12, 10), world.center(10, 10), 0);
        world.tick(&mut agent, &scout, &[]);
        world.tick(&mut agent, &scout, &[]);
        assert!(matches!(
            agent.state(),
            BehaviorState::FollowTrail { trail, .. } if trail.target == Some(Cell::new(13, 10))
        ));

        // Erase everything beyond the anchor while the scout is mid-step.
        assert_eq!(
            world.engine.remove_pheromone(Cell::new(13, 10), PheromoneKind::Explore),
            8
        );
        world.tick(&mut agent, &scout, &[]);
        assert_eq!(
            agent.state(),
            &BehaviorState::Wander {
                cooldown: world.behavior.trail_cooldown_ticks
            }
        );
        assert_eq!(
            world.engine.get(Cell::new(12, 10), PheromoneKind::Explore).unwrap().occupancy(),
            0
        );
    }

    #[test]
    fn patrollers_count_only_higher_ranked_neighbors() {
        let mut world = World::new();
        let soldier = AgentType::soldier();
        let me = Agent::with_id(
            AgentId::from(Uuid::from_u128(10)),
            &soldier,
            world.center(14, 10),
            world.center(10, 10),
            0,
        );
        let near = |n: u128, following| NearbyAgent {
            id: AgentId::from(Uuid::from_u128(n)),
            position: me.position() + Vec2::new(4.0, 0.0),
            following,
        };
        let neighbors = [
            near(1, Some(PheromoneKind::Attack)),
            near(2, Some(PheromoneKind::Attack)),
            near(3, Some(PheromoneKind::Gather)),
            near(20, Some(PheromoneKind::Attack)),
            near(4, None),
        ];
        let ctx = BehaviorContext {
            engine: &mut world.engine,
            agent_type: &soldier,
            strategies: &world.strategies,
            behavior: &world.behavior,
            neighbors: &neighbors,
            hostiles: &[],
            dt: DT,
            rng: &mut world.rng,
        };
        assert_eq!(higher_priority_patrollers(&me, PheromoneKind::Attack, &ctx), 2);
        assert_eq!(higher_priority_patrollers(&me, PheromoneKind::Gather, &ctx), 0);
    }
}
