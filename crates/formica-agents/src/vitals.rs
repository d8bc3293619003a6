//! Per-tick vital mechanics: hunger, starvation, and eating.
//!
//! Each tick hunger rises by the caste's `hunger_rate`, clamped to 100.
//! At or above the starvation threshold the ant loses health; an ant that
//! reaches zero health dies of starvation.

use tracing::trace;

use crate::agent::Agent;
use crate::config::{AgentType, VitalsConfig};
use crate::death::DeathCause;

/// Hunger never exceeds this value.
pub const MAX_HUNGER: u32 = 100;

/// Result of applying one tick of vital mechanics.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VitalTickResult {
    /// Hunger after the tick.
    pub hunger: u32,
    /// Health lost to starvation this tick.
    pub starvation_damage: u32,
    /// Set when the ant died this tick.
    pub died: Option<DeathCause>,
}

/// Apply one tick of hunger and starvation to `agent`.
pub fn apply_vital_tick(agent: &mut Agent, agent_type: &AgentType, config: &VitalsConfig) -> VitalTickResult {
    let hunger = agent.hunger.saturating_add(agent_type.hunger_rate).min(MAX_HUNGER);
    agent.hunger = hunger;

    let mut damage = 0;
    if hunger >= config.starvation_threshold {
        damage = config.starvation_damage.min(agent.health);
        agent.health = agent.health.saturating_sub(damage);
    }

    let died = (damage > 0 && agent.health == 0).then_some(DeathCause::Starvation);
    trace!(agent_id = %agent.id, hunger, damage, "vital tick");
    VitalTickResult {
        hunger,
        starvation_damage: damage,
        died,
    }
}

/// Whether the ant is hungry enough to eat when food is at hand.
pub const fn wants_to_eat(agent: &Agent, config: &VitalsConfig) -> bool {
    agent.hunger >= config.eat_threshold
}

/// Consume one edible unit: hunger drops by `meal_relief`, floored at 0.
pub const fn apply_eat(agent: &mut Agent, config: &VitalsConfig) {
    agent.hunger = agent.hunger.saturating_sub(config.meal_relief);
}
