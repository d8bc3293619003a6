//! Agent type definitions and behavior tunables.
//!
//! [`AgentType`] records are loaded once from configuration and collected
//! into an [`AgentTypeRegistry`] that the simulation owns and passes by
//! reference. The remaining structs bundle the numeric knobs for trail
//! strategies, the behavior state machine, and vital mechanics so callers
//! (tick cycle, tests) can override defaults.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use formica_types::{PheromoneKind, ResourceKind};

use crate::error::AgentError;

// ---------------------------------------------------------------------------
// Agent types
// ---------------------------------------------------------------------------

/// Immutable description of one caste of ant.
///
/// Behavior is derived entirely from [`follows`](Self::follows): an agent
/// whose type lists only `gather` never reacts to `attack` markers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AgentType {
    /// Stable identifier referenced by eggs and agents.
    pub id: String,
    /// Display name.
    pub name: String,
    /// Resources debited from the stockpile to lay one egg.
    #[serde(default)]
    pub cost: BTreeMap<ResourceKind, u32>,
    /// Ticks between laying and hatching.
    pub incubation_ticks: u32,
    /// Health at hatch time.
    pub max_health: u32,
    /// Base movement speed in world units per second.
    pub move_speed: f32,
    /// Maximum number of resource units carried at once.
    #[serde(default)]
    pub carry_capacity: u32,
    /// Radius in world units within which hostiles are noticed.
    pub vision_radius: f32,
    /// Hunger added per tick.
    pub hunger_rate: u32,
    /// Weight of the pull toward home while wandering (0 = none).
    #[serde(default)]
    pub home_bias: f32,
    /// Pheromone kinds this type follows, in preference order.
    #[serde(default)]
    pub follows: Vec<PheromoneKind>,
    /// Damage per attack; zero means the type never enters combat.
    #[serde(default)]
    pub attack_damage: u32,
    /// Reach of an attack in world units.
    #[serde(default = "default_attack_range")]
    pub attack_range: f32,
    /// Ticks between two attacks.
    #[serde(default = "default_attack_cooldown_ticks")]
    pub attack_cooldown_ticks: u32,
}

const fn default_attack_range() -> f32 {
    6.0
}

const fn default_attack_cooldown_ticks() -> u32 {
    10
}

impl AgentType {
    /// Whether agents of this type follow markers of `kind`.
    pub fn permits(&self, kind: PheromoneKind) -> bool {
        self.follows.contains(&kind)
    }

    /// Whether agents of this type ever enter combat.
    pub const fn can_fight(&self) -> bool {
        self.attack_damage > 0
    }

    /// Check the record for values the simulation cannot work with.
    pub fn validate(&self) -> Result<(), AgentError> {
        let invalid = |reason: &str| AgentError::InvalidAgentType {
            id: self.id.clone(),
            reason: reason.to_owned(),
        };
        if self.id.trim().is_empty() {
            return Err(invalid("id must not be empty"));
        }
        if self.max_health == 0 {
            return Err(invalid("max_health must be positive"));
        }
        if !self.move_speed.is_finite() || self.move_speed <= 0.0 {
            return Err(invalid("move_speed must be positive"));
        }
        if !self.vision_radius.is_finite() || self.vision_radius < 0.0 {
            return Err(invalid("vision_radius must be non-negative"));
        }
        if !self.home_bias.is_finite() || self.home_bias < 0.0 {
            return Err(invalid("home_bias must be non-negative"));
        }
        if self.can_fight() && (!self.attack_range.is_finite() || self.attack_range <= 0.0) {
            return Err(invalid("attack_range must be positive for fighting types"));
        }
        Ok(())
    }

    /// Remove repeated entries from `follows`, keeping the first occurrence.
    fn dedup_follows(&mut self) {
        let mut seen = Vec::with_capacity(self.follows.len());
        self.follows.retain(|kind| {
            if seen.contains(kind) {
                false
            } else {
                seen.push(*kind);
                true
            }
        });
    }

    /// Default forager: follows gather trails first, then explore trails.
    pub fn worker() -> Self {
        Self {
            id: String::from("worker"),
            name: String::from("Worker"),
            cost: BTreeMap::from([(ResourceKind::Seed, 5)]),
            incubation_ticks: 100,
            max_health: 50,
            move_speed: 40.0,
            carry_capacity: 3,
            vision_radius: 48.0,
            hunger_rate: 1,
            home_bias: 0.15,
            follows: vec![PheromoneKind::Gather, PheromoneKind::Explore],
            attack_damage: 0,
            attack_range: default_attack_range(),
            attack_cooldown_ticks: default_attack_cooldown_ticks(),
        }
    }

    /// Default scout: fast, carries nothing, follows explore trails only.
    pub fn scout() -> Self {
        Self {
            id: String::from("scout"),
            name: String::from("Scout"),
            cost: BTreeMap::from([(ResourceKind::Seed, 4)]),
            incubation_ticks: 80,
            max_health: 35,
            move_speed: 60.0,
            carry_capacity: 0,
            vision_radius: 80.0,
            hunger_rate: 1,
            home_bias: 0.05,
            follows: vec![PheromoneKind::Explore],
            attack_damage: 0,
            attack_range: default_attack_range(),
            attack_cooldown_ticks: default_attack_cooldown_ticks(),
        }
    }

    /// Default soldier: patrols attack trails and fights hostiles.
    pub fn soldier() -> Self {
        Self {
            id: String::from("soldier"),
            name: String::from("Soldier"),
            cost: BTreeMap::from([(ResourceKind::Seed, 8), (ResourceKind::Leaf, 2)]),
            incubation_ticks: 150,
            max_health: 120,
            move_speed: 32.0,
            carry_capacity: 0,
            vision_radius: 64.0,
            hunger_rate: 2,
            home_bias: 0.1,
            follows: vec![PheromoneKind::Attack],
            attack_damage: 12,
            attack_range: default_attack_range(),
            attack_cooldown_ticks: default_attack_cooldown_ticks(),
        }
    }
}

/// Lookup table of every agent type known to a simulation.
#[derive(Debug, Clone, PartialEq)]
pub struct AgentTypeRegistry {
    types: BTreeMap<String, AgentType>,
}

impl AgentTypeRegistry {
    /// Build a registry, validating each type and rejecting duplicate ids.
    ///
    /// Repeated kinds in a type's `follows` list are collapsed, keeping the
    /// first occurrence so preference order is preserved.
    pub fn from_types(types: Vec<AgentType>) -> Result<Self, AgentError> {
        let mut map = BTreeMap::new();
        for mut agent_type in types {
            agent_type.validate()?;
            agent_type.dedup_follows();
            if map.contains_key(&agent_type.id) {
                return Err(AgentError::DuplicateAgentType(agent_type.id));
            }
            map.insert(agent_type.id.clone(), agent_type);
        }
        Ok(Self { types: map })
    }

    /// Look up a type by id.
    pub fn get(&self, id: &str) -> Option<&AgentType> {
        self.types.get(id)
    }

    /// Look up a type by id, failing with [`AgentError::UnknownAgentType`].
    pub fn require(&self, id: &str) -> Result<&AgentType, AgentError> {
        self.get(id)
            .ok_or_else(|| AgentError::UnknownAgentType(id.to_owned()))
    }

    /// Iterate types in id order.
    pub fn iter(&self) -> impl Iterator<Item = &AgentType> {
        self.types.values()
    }

    /// Number of registered types.
    pub fn len(&self) -> usize {
        self.types.len()
    }

    /// Whether the registry holds no types.
    pub fn is_empty(&self) -> bool {
        self.types.is_empty()
    }
}

impl Default for AgentTypeRegistry {
    fn default() -> Self {
        let types = [AgentType::worker(), AgentType::scout(), AgentType::soldier()];
        Self {
            types: types.into_iter().map(|t| (t.id.clone(), t)).collect(),
        }
    }
}

// ---------------------------------------------------------------------------
// Strategy tunables
// ---------------------------------------------------------------------------

/// Speed multipliers and patrol-spreading constants for trail strategies.
///
/// The patrol turn constants are tuned gameplay values, not correctness
/// properties.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StrategyConfig {
    /// Speed multiplier while following an explore trail.
    #[serde(default = "default_explore_speed")]
    pub explore_speed: f32,
    /// Speed multiplier while following a gather trail.
    #[serde(default = "default_gather_speed")]
    pub gather_speed: f32,
    /// Speed multiplier while patrolling an attack trail.
    #[serde(default = "default_patrol_speed")]
    pub patrol_speed: f32,
    /// Radius in world units within which other patrollers are counted.
    #[serde(default = "default_patrol_proximity_radius")]
    pub patrol_proximity_radius: f32,
    /// Reversal probability added per higher-priority patroller nearby.
    #[serde(default = "default_patrol_turn_chance_per_agent")]
    pub patrol_turn_chance_per_agent: f64,
    /// Upper bound on the reversal probability.
    #[serde(default = "default_patrol_max_turn_chance")]
    pub patrol_max_turn_chance: f64,
}

const fn default_explore_speed() -> f32 {
    1.25
}

const fn default_gather_speed() -> f32 {
    1.0
}

const fn default_patrol_speed() -> f32 {
    0.8
}

const fn default_patrol_proximity_radius() -> f32 {
    24.0
}

const fn default_patrol_turn_chance_per_agent() -> f64 {
    0.05
}

const fn default_patrol_max_turn_chance() -> f64 {
    0.20
}

impl Default for StrategyConfig {
    fn default() -> Self {
        Self {
            explore_speed: default_explore_speed(),
            gather_speed: default_gather_speed(),
            patrol_speed: default_patrol_speed(),
            patrol_proximity_radius: default_patrol_proximity_radius(),
            patrol_turn_chance_per_agent: default_patrol_turn_chance_per_agent(),
            patrol_max_turn_chance: default_patrol_max_turn_chance(),
        }
    }
}

impl StrategyConfig {
    /// Reject non-positive speeds and probabilities outside `[0, 1]`.
    pub fn validate(&self) -> Result<(), AgentError> {
        for (name, speed) in [
            ("explore_speed", self.explore_speed),
            ("gather_speed", self.gather_speed),
            ("patrol_speed", self.patrol_speed),
        ] {
            if !speed.is_finite() || speed <= 0.0 {
                return Err(AgentError::InvalidConfig {
                    reason: format!("{name} must be positive, got {speed}"),
                });
            }
        }
        if !self.patrol_proximity_radius.is_finite() || self.patrol_proximity_radius < 0.0 {
            return Err(AgentError::InvalidConfig {
                reason: String::from("patrol_proximity_radius must be non-negative"),
            });
        }
        for (name, chance) in [
            ("patrol_turn_chance_per_agent", self.patrol_turn_chance_per_agent),
            ("patrol_max_turn_chance", self.patrol_max_turn_chance),
        ] {
            if !(0.0..=1.0).contains(&chance) {
                return Err(AgentError::InvalidConfig {
                    reason: format!("{name} must lie in [0, 1], got {chance}"),
                });
            }
        }
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Behavior tunables
// ---------------------------------------------------------------------------

/// Knobs for the wander/follow/combat state machine.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BehaviorConfig {
    /// Maximum heading change per tick while wandering, in radians.
    #[serde(default = "default_wander_jitter")]
    pub wander_jitter: f32,
    /// Ticks after leaving a trail during which no trail is re-entered.
    #[serde(default = "default_trail_cooldown_ticks")]
    pub trail_cooldown_ticks: u32,
    /// Distance in world units at which a target marker counts as reached.
    #[serde(default = "default_arrival_radius")]
    pub arrival_radius: f32,
}

const fn default_wander_jitter() -> f32 {
    0.6
}

const fn default_trail_cooldown_ticks() -> u32 {
    30
}

const fn default_arrival_radius() -> f32 {
    1.5
}

impl Default for BehaviorConfig {
    fn default() -> Self {
        Self {
            wander_jitter: default_wander_jitter(),
            trail_cooldown_ticks: default_trail_cooldown_ticks(),
            arrival_radius: default_arrival_radius(),
        }
    }
}

impl BehaviorConfig {
    /// Reject negative jitter and non-positive arrival radii.
    pub fn validate(&self) -> Result<(), AgentError> {
        if !self.wander_jitter.is_finite() || self.wander_jitter < 0.0 {
            return Err(AgentError::InvalidConfig {
                reason: String::from("wander_jitter must be non-negative"),
            });
        }
        if !self.arrival_radius.is_finite() || self.arrival_radius <= 0.0 {
            return Err(AgentError::InvalidConfig {
                reason: String::from("arrival_radius must be positive"),
            });
        }
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Vitals
// ---------------------------------------------------------------------------

/// Configuration for hunger, starvation, and eating.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VitalsConfig {
    /// Hunger at or above which starvation damage applies (default: 100).
    #[serde(default = "default_starvation_threshold")]
    pub starvation_threshold: u32,
    /// Health lost per tick while starving (default: 2).
    #[serde(default = "default_starvation_damage")]
    pub starvation_damage: u32,
    /// Hunger at or above which an ant at home eats (default: 40).
    #[serde(default = "default_eat_threshold")]
    pub eat_threshold: u32,
    /// Hunger removed by one edible unit (default: 60).
    #[serde(default = "default_meal_relief")]
    pub meal_relief: u32,
}

const fn default_starvation_threshold() -> u32 {
    100
}

const fn default_starvation_damage() -> u32 {
    2
}

const fn default_eat_threshold() -> u32 {
    40
}

const fn default_meal_relief() -> u32 {
    60
}

impl Default for VitalsConfig {
    fn default() -> Self {
        Self {
            starvation_threshold: default_starvation_threshold(),
            starvation_damage: default_starvation_damage(),
            eat_threshold: default_eat_threshold(),
            meal_relief: default_meal_relief(),
        }
    }
}
