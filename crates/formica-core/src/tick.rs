//! Tick cycle: the 5-phase loop that drives the Formica simulation.
//!
//! Each tick runs through these phases:
//!
//! 1. **Wake** -- advance the clock, hatch eggs, apply hunger and
//!    starvation, remove ants that starved.
//!
//! 2. **Perception** -- snapshot every ant's and hostile's position so that
//!    all ants decide against the same start-of-tick view.
//!
//! 3. **Behavior** -- run each ant's state machine. Ants read the pheromone
//!    field and only write occupancy through the engine; attacks are
//!    collected as intents.
//!
//! 4. **Resolution** -- apply attacks, move hostiles and apply their bites,
//!    pick up food, deliver loads and eat inside the colony interior.
//!
//! 5. **Reap** -- finalize combat deaths, releasing their trail occupancy.
//!
//! Ants and hostiles are kept in ordered maps so that, given the same seed
//! and the same edits, two runs visit them in the same order.

use std::collections::BTreeMap;
use std::time::Duration;

use rand::SeedableRng;
use rand::rngs::StdRng;
use tracing::{debug, info, warn};

use formica_agents::death::{self, DeathCause, DeathConsequences};
use formica_agents::{
    Agent, AgentError, AgentTypeRegistry, AttackIntent, BehaviorConfig, BehaviorContext, Brood, NearbyAgent,
    StrategyConfig, VisibleHostile, VitalsConfig, vitals,
};
use formica_types::{AgentId, Cell, EggId, FoodSourceId, HostileId, HostileKind, PheromoneKind, ResourceKind, Vec2};
use formica_world::{Colony, DistanceFieldEngine, FoodField, FoodSource, WorldError};

use crate::clock::{ClockError, SimulationClock};
use crate::config::{ConfigError, ForagingConfig, HostileConfig, SimulationConfig};
use crate::hostile::{self, Bite, Hostile};
use crate::snapshot::WorldSnapshot;

/// Errors that can occur during tick execution.
#[derive(Debug, thiserror::Error)]
pub enum TickError {
    /// A clock operation failed.
    #[error("clock error: {source}")]
    Clock {
        /// The underlying clock error.
        #[from]
        source: ClockError,
    },

    /// An operation on one ant failed.
    #[error("agent error for {agent_id}: {source}")]
    Agent {
        /// The ant that caused the error.
        agent_id: AgentId,
        /// The underlying agent error.
        source: AgentError,
    },

    /// A colony-level agent operation (egg laying, type lookup) failed.
    #[error("brood error: {source}")]
    Brood {
        /// The underlying agent error.
        #[from]
        source: AgentError,
    },

    /// A world operation failed.
    #[error("world error: {source}")]
    World {
        /// The underlying world error.
        #[from]
        source: WorldError,
    },

    /// The configuration was rejected.
    #[error("config error: {source}")]
    Config {
        /// The underlying configuration error.
        #[from]
        source: ConfigError,
    },
}

/// Summary of a single tick's execution.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TickSummary {
    /// The tick number that was executed.
    pub tick: u64,
    /// Number of living ants at end of tick.
    pub agents_alive: u32,
    /// Number of living hostiles at end of tick.
    pub hostiles_alive: u32,
    /// Ants that hatched this tick.
    pub hatched: Vec<AgentId>,
    /// Ants that died this tick.
    pub deaths: Vec<DeathConsequences>,
    /// Attacks landed by ants.
    pub attacks: u32,
    /// Hostiles killed this tick.
    pub hostiles_killed: Vec<HostileId>,
    /// Bites landed by hostiles.
    pub bites: u32,
    /// Food units picked up from sources.
    pub harvested: u32,
    /// Food units delivered to the stockpile.
    pub delivered: u32,
    /// Units eaten from the stockpile.
    pub meals: u32,
    /// Behavior state changes.
    pub transitions: u32,
    /// Pheromone markers on the field at end of tick.
    pub markers: usize,
}

/// What the Wake phase produced.
struct WakeResult {
    hatched: Vec<AgentId>,
    deaths: Vec<DeathConsequences>,
}

/// What the Behavior phase produced.
struct BehaviorResult {
    attacks: Vec<AttackIntent>,
    transitions: u32,
}

/// What the Resolution phase produced.
#[derive(Default)]
struct ResolutionResult {
    attacks: u32,
    hostiles_killed: Vec<HostileId>,
    bites: u32,
    bitten_to_death: Vec<AgentId>,
    harvested: u32,
    delivered: u32,
    meals: u32,
}

/// The simulation: sole owner of the field, the colony, and every creature.
///
/// All edits go through methods on this type, so the pheromone field is
/// only ever mutated between ticks or by the tick itself.
#[derive(Debug)]
pub struct Simulation {
    clock: SimulationClock,
    engine: DistanceFieldEngine,
    colony: Colony,
    food: FoodField,
    brood: Brood,
    registry: AgentTypeRegistry,
    agents: BTreeMap<AgentId, Agent>,
    hostiles: BTreeMap<HostileId, Hostile>,
    strategies: StrategyConfig,
    behavior: BehaviorConfig,
    vitals: VitalsConfig,
    hostile_config: HostileConfig,
    foraging: ForagingConfig,
    rng: StdRng,
}

impl Simulation {
    /// Build a simulation from a validated configuration.
    ///
    /// # Errors
    ///
    /// Returns [`TickError::Config`] if the configuration is invalid, or a
    /// world/clock error if a subsystem rejects it.
    pub fn from_config(config: &SimulationConfig) -> Result<Self, TickError> {
        config.validate()?;
        let registry = config.registry()?;
        let center = Vec2::new(config.colony.center_x, config.colony.center_y);
        let engine = DistanceFieldEngine::new(&config.field_config(), center)?;
        let clock = SimulationClock::new(&config.time)?;

        info!(
            name = %config.world.name,
            seed = config.world.seed,
            width_tiles = config.world.width_tiles,
            height_tiles = config.world.height_tiles,
            sub_cells_per_tile = config.field.sub_cells_per_tile,
            agent_types = registry.len(),
            "Simulation created"
        );

        Ok(Self {
            clock,
            engine,
            colony: Colony::new(center, config.colony.stockpile.clone()),
            food: FoodField::new(),
            brood: Brood::new(),
            registry,
            agents: BTreeMap::new(),
            hostiles: BTreeMap::new(),
            strategies: config.strategies.clone(),
            behavior: config.behavior.clone(),
            vitals: config.vitals.clone(),
            hostile_config: config.hostiles.clone(),
            foraging: config.foraging.clone(),
            rng: StdRng::seed_from_u64(config.world.seed),
        })
    }

    // -----------------------------------------------------------------------
    // Accessors
    // -----------------------------------------------------------------------

    /// The simulation clock.
    pub const fn clock(&self) -> &SimulationClock {
        &self.clock
    }

    /// Mutable clock access for pause, resume, and time scale.
    pub const fn clock_mut(&mut self) -> &mut SimulationClock {
        &mut self.clock
    }

    /// The last executed tick.
    pub const fn tick_number(&self) -> u64 {
        self.clock.tick()
    }

    /// Read-only access to the pheromone field.
    pub const fn engine(&self) -> &DistanceFieldEngine {
        &self.engine
    }

    /// The colony and its stockpile.
    pub const fn colony(&self) -> &Colony {
        &self.colony
    }

    /// Food sources on the map.
    pub const fn food(&self) -> &FoodField {
        &self.food
    }

    /// Incubating eggs.
    pub const fn brood(&self) -> &Brood {
        &self.brood
    }

    /// The agent type registry.
    pub const fn registry(&self) -> &AgentTypeRegistry {
        &self.registry
    }

    /// Living ants, in id order.
    pub fn agents(&self) -> impl Iterator<Item = &Agent> {
        self.agents.values()
    }

    /// Look up one ant.
    pub fn agent(&self, id: AgentId) -> Option<&Agent> {
        self.agents.get(&id)
    }

    /// Number of living ants.
    pub fn agent_count(&self) -> usize {
        self.agents.len()
    }

    /// Living hostiles, in id order.
    pub fn hostiles(&self) -> impl Iterator<Item = &Hostile> {
        self.hostiles.values()
    }

    /// Look up one hostile.
    pub fn hostile(&self, id: HostileId) -> Option<&Hostile> {
        self.hostiles.get(&id)
    }

    /// Whether the colony has no ants and no eggs left.
    pub fn is_extinct(&self) -> bool {
        self.agents.is_empty() && self.brood.is_empty()
    }

    /// Capture a read-only view for renderers and logs.
    pub fn snapshot(&self) -> WorldSnapshot {
        WorldSnapshot::capture(self)
    }

    // -----------------------------------------------------------------------
    // Field edits
    // -----------------------------------------------------------------------

    /// Place one marker. See [`DistanceFieldEngine::add_pheromone`].
    pub fn add_pheromone(&mut self, cell: Cell, kind: PheromoneKind) -> bool {
        self.engine.add_pheromone(cell, kind)
    }

    /// Remove one marker and everything downstream of it. Returns the number
    /// of markers removed.
    pub fn remove_pheromone(&mut self, cell: Cell, kind: PheromoneKind) -> usize {
        self.engine.remove_pheromone(cell, kind)
    }

    /// Remove every kind of marker at `cell`, with cascades.
    pub fn remove_all_pheromones(&mut self, cell: Cell) -> usize {
        self.engine.remove_all_pheromones(cell)
    }

    /// Paint a trail from `start` to `end`. Returns the last cell placed.
    pub fn draw_line(&mut self, start: Option<Cell>, end: Cell, kind: PheromoneKind) -> Option<Cell> {
        self.engine.draw_line(start, end, kind)
    }

    // -----------------------------------------------------------------------
    // Population edits
    // -----------------------------------------------------------------------

    /// Pay for and queue an egg of `type_id`.
    ///
    /// # Errors
    ///
    /// Returns [`TickError::Brood`] for an unknown type or an unaffordable
    /// cost; the stockpile is untouched on failure.
    pub fn lay_egg(&mut self, type_id: &str) -> Result<EggId, TickError> {
        let agent_type = self.registry.require(type_id)?;
        Ok(self.brood.lay(agent_type, &mut self.colony, self.clock.tick())?)
    }

    /// Place a fully grown ant of `type_id` at `position`, free of charge.
    ///
    /// # Errors
    ///
    /// Returns [`TickError::Brood`] for an unknown type.
    pub fn spawn_agent(&mut self, type_id: &str, position: Vec2) -> Result<AgentId, TickError> {
        let agent_type = self.registry.require(type_id)?;
        let position = self.engine.mapper().clamp_to_world(position);
        let agent = Agent::new(agent_type, position, self.colony.center(), self.clock.tick());
        let id = agent.id();
        debug!(agent_id = %id, type_id, "ant spawned");
        self.agents.insert(id, agent);
        Ok(id)
    }

    /// Place a hostile of `kind` at `position`.
    pub fn spawn_hostile(&mut self, kind: HostileKind, position: Vec2) -> HostileId {
        let position = self.engine.mapper().clamp_to_world(position);
        let hostile = Hostile::new(kind, position, self.hostile_config.max_health);
        let id = hostile.id;
        debug!(hostile_id = %id, ?kind, "hostile spawned");
        self.hostiles.insert(id, hostile);
        id
    }

    /// Place a food source holding `amount` units of `kind`.
    pub fn add_food_source(&mut self, kind: ResourceKind, position: Vec2, amount: u32) -> FoodSourceId {
        let position = self.engine.mapper().clamp_to_world(position);
        self.food
            .add(FoodSource::new(kind, position, amount, self.foraging.pickup_radius))
    }

    // -----------------------------------------------------------------------
    // Running
    // -----------------------------------------------------------------------

    /// Feed elapsed wall time to the clock and run every tick that falls due.
    ///
    /// # Errors
    ///
    /// Returns the first [`TickError`]; ticks already run stay applied.
    pub fn advance(&mut self, elapsed: Duration) -> Result<Vec<TickSummary>, TickError> {
        let due = self.clock.advance(elapsed);
        (0..due).map(|_| self.tick()).collect()
    }

    /// Execute one complete tick.
    ///
    /// # Errors
    ///
    /// Returns [`TickError::Clock`] if the tick counter overflows, or
    /// [`TickError::Agent`] if an inventory transfer fails.
    pub fn tick(&mut self) -> Result<TickSummary, TickError> {
        // --- Phase 1: Wake ---
        let mut wake = self.phase_wake()?;
        let tick = self.clock.tick();

        // --- Phase 2: Perception ---
        let neighbors = self.perceive_agents();
        let visible: Vec<VisibleHostile> = self
            .hostiles
            .values()
            .map(|h| VisibleHostile {
                id: h.id,
                kind: h.kind,
                position: h.position,
            })
            .collect();

        // --- Phase 3: Behavior ---
        let behavior = self.phase_behavior(&neighbors, &visible);

        // --- Phase 4: Resolution ---
        let resolution = self.phase_resolution(&behavior.attacks)?;

        // --- Phase 5: Reap ---
        for agent_id in &resolution.bitten_to_death {
            if let Some(mut agent) = self.agents.remove(agent_id) {
                let consequences = death::process_death(&mut agent, DeathCause::Combat, tick, &mut self.engine);
                wake.deaths.push(consequences);
            }
        }

        let summary = TickSummary {
            tick,
            agents_alive: u32::try_from(self.agents.len()).unwrap_or(u32::MAX),
            hostiles_alive: u32::try_from(self.hostiles.len()).unwrap_or(u32::MAX),
            hatched: wake.hatched,
            deaths: wake.deaths,
            attacks: resolution.attacks,
            hostiles_killed: resolution.hostiles_killed,
            bites: resolution.bites,
            harvested: resolution.harvested,
            delivered: resolution.delivered,
            meals: resolution.meals,
            transitions: behavior.transitions,
            markers: self.engine.marker_count(),
        };
        debug!(
            tick,
            agents_alive = summary.agents_alive,
            hostiles_alive = summary.hostiles_alive,
            deaths = summary.deaths.len(),
            delivered = summary.delivered,
            markers = summary.markers,
            "Tick complete"
        );
        Ok(summary)
    }

    /// Phase 1: advance the clock, hatch eggs, apply vitals.
    fn phase_wake(&mut self) -> Result<WakeResult, TickError> {
        let tick = self.clock.next_tick()?;

        let mut hatched = Vec::new();
        for egg in self.brood.advance() {
            let Some(agent_type) = self.registry.get(&egg.type_id) else {
                warn!(egg_id = %egg.id, type_id = %egg.type_id, "egg of unknown type discarded");
                continue;
            };
            let center = self.colony.center();
            let agent = Agent::new(agent_type, center, center, tick);
            info!(tick, agent_id = %agent.id(), type_id = %egg.type_id, "egg hatched");
            hatched.push(agent.id());
            self.agents.insert(agent.id(), agent);
        }

        let mut starved = Vec::new();
        for agent in self.agents.values_mut() {
            let Some(agent_type) = self.registry.get(agent.type_id()) else {
                continue;
            };
            let result = vitals::apply_vital_tick(agent, agent_type, &self.vitals);
            if let Some(cause) = result.died {
                starved.push((agent.id(), cause));
            }
        }

        let mut deaths = Vec::new();
        for (agent_id, cause) in starved {
            if let Some(mut agent) = self.agents.remove(&agent_id) {
                deaths.push(death::process_death(&mut agent, cause, tick, &mut self.engine));
            }
        }

        Ok(WakeResult { hatched, deaths })
    }

    /// Positions and trail kinds of every living ant.
    fn perceive_agents(&self) -> Vec<NearbyAgent> {
        self.agents
            .values()
            .map(|a| NearbyAgent {
                id: a.id(),
                position: a.position(),
                following: a.following(),
            })
            .collect()
    }

    /// Phase 3: run every ant's state machine.
    fn phase_behavior(&mut self, neighbors: &[NearbyAgent], visible: &[VisibleHostile]) -> BehaviorResult {
        let dt = self.clock.tick_seconds();
        let mut attacks = Vec::new();
        let mut transitions: u32 = 0;

        for agent in self.agents.values_mut() {
            let Some(agent_type) = self.registry.get(agent.type_id()) else {
                warn!(agent_id = %agent.id(), type_id = agent.type_id(), "ant of unknown type skipped");
                continue;
            };
            let mut ctx = BehaviorContext {
                engine: &mut self.engine,
                agent_type,
                strategies: &self.strategies,
                behavior: &self.behavior,
                neighbors,
                hostiles: visible,
                dt,
                rng: &mut self.rng,
            };
            let outcome = agent.update(&mut ctx);
            if let Some(attack) = outcome.attack {
                attacks.push(attack);
            }
            if outcome.transition.is_some() {
                transitions = transitions.saturating_add(1);
            }
        }

        BehaviorResult { attacks, transitions }
    }

    /// Phase 4: resolve combat, then foraging and the colony economy.
    fn phase_resolution(&mut self, attacks: &[AttackIntent]) -> Result<ResolutionResult, TickError> {
        let tick = self.clock.tick();
        let dt = self.clock.tick_seconds();
        let mut result = ResolutionResult::default();

        // 4a. Ant attacks
        for intent in attacks {
            let Some(target) = self.hostiles.get_mut(&intent.target) else {
                continue;
            };
            if !target.is_alive() {
                continue;
            }
            result.attacks = result.attacks.saturating_add(1);
            if target.take_damage(intent.damage) {
                info!(tick, hostile_id = %target.id, kind = ?target.kind, attacker = %intent.attacker, "hostile killed");
                result.hostiles_killed.push(target.id);
            }
        }
        self.hostiles.retain(|_, h| h.is_alive());

        // 4b. Hostiles move and bite
        let ants = self.perceive_agents();
        let bites: Vec<Bite> = self
            .hostiles
            .values_mut()
            .filter_map(|h| hostile::step_hostile(h, &ants, &self.hostile_config, self.engine.mapper(), dt))
            .collect();
        for bite in bites {
            let Some(agent) = self.agents.get_mut(&bite.agent) else {
                continue;
            };
            result.bites = result.bites.saturating_add(1);
            if agent.take_damage(bite.damage) {
                result.bitten_to_death.push(bite.agent);
            }
        }

        // 4c. Foraging, delivery, and eating
        for agent in self.agents.values_mut() {
            if !agent.is_alive() {
                continue;
            }
            let agent_id = agent.id();

            let space = agent.inventory().space_left().min(self.foraging.pickup_per_tick);
            if space > 0
                && let Some(source) = self.food.reachable_from(agent.position())
                && let Some((kind, taken)) = self.food.harvest(source, space)
                && taken > 0
            {
                agent
                    .inventory_mut()
                    .add(kind, taken)
                    .map_err(|source| TickError::Agent { agent_id, source })?;
                result.harvested = result.harvested.saturating_add(taken);
            }

            if self.engine.is_inside_colony(agent.position()) {
                let delivered = agent
                    .deliver(&mut self.colony)
                    .map_err(|source| TickError::Agent { agent_id, source })?;
                result.delivered = result.delivered.saturating_add(delivered);

                if vitals::wants_to_eat(agent, &self.vitals) && self.colony.take_edible().is_some() {
                    vitals::apply_eat(agent, &self.vitals);
                    result.meals = result.meals.saturating_add(1);
                }
            }
        }

        // 4d. Exhausted food sources
        for source in self.food.remove_exhausted() {
            debug!(tick, food_source_id = %source, "food source exhausted");
        }

        Ok(result)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::indexing_slicing)]
mod tests {
    use super::*;

    fn small_config() -> SimulationConfig {
        let mut config = SimulationConfig::default();
        config.world.width_tiles = 20;
        config.world.height_tiles = 20;
        config.world.tile_size = 8.0;
        config.field.sub_cells_per_tile = 1;
        config.field.colony_interior_radius = 1;
        config.colony.center_x = 84.0;
        config.colony.center_y = 84.0;
        config
    }

    #[test]
    fn invalid_config_is_rejected() {
        let mut config = small_config();
        config.field.sub_cells_per_tile = 0;
        assert!(matches!(Simulation::from_config(&config), Err(TickError::Config { .. })));
    }

    #[test]
    fn tick_advances_clock() {
        let mut sim = Simulation::from_config(&small_config()).unwrap();
        let summary = sim.tick().unwrap();
        assert_eq!(summary.tick, 1);
        assert_eq!(sim.tick_number(), 1);
        assert_eq!(summary.agents_alive, 0);
    }

    #[test]
    fn advance_runs_due_ticks() {
        let mut sim = Simulation::from_config(&small_config()).unwrap();
        let summaries = sim.advance(Duration::from_millis(120)).unwrap();
        assert_eq!(summaries.len(), 2);
        assert_eq!(summaries[1].tick, 2);
    }

    #[test]
    fn eggs_debit_stockpile_and_hatch() {
        let mut config = small_config();
        config.agent_types.iter_mut().for_each(|t| t.incubation_ticks = 1);
        let mut sim = Simulation::from_config(&config).unwrap();
        let seeds = sim.colony().amount(ResourceKind::Seed);
        sim.lay_egg("worker").unwrap();
        assert!(sim.colony().amount(ResourceKind::Seed) < seeds);

        let summary = sim.tick().unwrap();
        assert_eq!(summary.hatched.len(), 1);
        assert_eq!(sim.agent_count(), 1);
        assert!(sim.brood().is_empty());
    }

    #[test]
    fn unknown_type_is_an_error() {
        let mut sim = Simulation::from_config(&small_config()).unwrap();
        assert!(matches!(
            sim.lay_egg("queen"),
            Err(TickError::Brood {
                source: AgentError::UnknownAgentType(_)
            })
        ));
        assert!(sim.spawn_agent("queen", Vec2::ZERO).is_err());
    }

    #[test]
    fn hostile_killed_by_soldiers() {
        let mut config = small_config();
        config.hostiles.max_health = 1;
        config.hostiles.bite_damage = 0;
        let mut sim = Simulation::from_config(&config).unwrap();
        sim.spawn_agent("soldier", Vec2::new(60.0, 60.0)).unwrap();
        let beetle = sim.spawn_hostile(HostileKind::Beetle, Vec2::new(62.0, 60.0));

        let killed = (0..20).any(|_| sim.tick().unwrap().hostiles_killed.contains(&beetle));
        assert!(killed);
        assert!(sim.hostile(beetle).is_none());
    }

    #[test]
    fn bitten_ant_dies_and_is_removed() {
        let mut config = small_config();
        config.hostiles.bite_damage = 1_000;
        let mut sim = Simulation::from_config(&config).unwrap();
        let scout = sim.spawn_agent("scout", Vec2::new(30.0, 30.0)).unwrap();
        sim.spawn_hostile(HostileKind::Spider, Vec2::new(31.0, 30.0));

        let summary = sim.tick().unwrap();
        assert_eq!(summary.bites, 1);
        assert_eq!(summary.deaths.len(), 1);
        assert_eq!(summary.deaths[0].agent_id, scout);
        assert_eq!(summary.deaths[0].cause, DeathCause::Combat);
        assert!(sim.agent(scout).is_none());
    }

    #[test]
    fn worker_picks_up_food_in_reach() {
        let mut sim = Simulation::from_config(&small_config()).unwrap();
        let worker = sim.spawn_agent("worker", Vec2::new(20.0, 20.0)).unwrap();
        sim.add_food_source(ResourceKind::Seed, Vec2::new(20.0, 20.0), 1);

        let summary = sim.tick().unwrap();
        assert_eq!(summary.harvested, 1);
        assert_eq!(sim.agent(worker).unwrap().inventory().amount(ResourceKind::Seed), 1);
        assert!(sim.food().is_empty());
    }

    #[test]
    fn field_edits_pass_through() {
        let mut sim = Simulation::from_config(&small_config()).unwrap();
        assert!(sim.add_pheromone(Cell::new(12, 10), PheromoneKind::Gather));
        assert!(sim.add_pheromone(Cell::new(13, 10), PheromoneKind::Gather));
        assert_eq!(sim.engine().marker_count(), 2);
        assert_eq!(sim.remove_pheromone(Cell::new(12, 10), PheromoneKind::Gather), 2);
        assert_eq!(sim.engine().marker_count(), 0);
    }
}
