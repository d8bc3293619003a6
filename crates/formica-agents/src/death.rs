//! Death detection and consequences.
//!
//! An ant dies when its health reaches zero. Processing a death releases
//! the trail marker it was anchored to and discards what it carried; the
//! consequences are reported in the tick summary.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use tracing::info;

use formica_types::{AgentId, ResourceKind, Vec2};
use formica_world::DistanceFieldEngine;

use crate::agent::Agent;

/// Why an ant died.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DeathCause {
    /// Health drained by hunger.
    Starvation,
    /// Killed by a hostile.
    Combat,
}

impl core::fmt::Display for DeathCause {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::Starvation => write!(f, "starvation"),
            Self::Combat => write!(f, "combat"),
        }
    }
}

/// Everything that happened as a result of one death.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DeathConsequences {
    /// The dead ant.
    pub agent_id: AgentId,
    /// Its caste.
    pub type_id: String,
    /// Cause of death.
    pub cause: DeathCause,
    /// Where it died.
    pub position: Vec2,
    /// Tick of death.
    pub tick: u64,
    /// Inventory lost with the ant.
    pub lost_inventory: BTreeMap<ResourceKind, u32>,
}

/// Finalize the death of `agent`.
///
/// Releases trail occupancy through the engine and drains the inventory.
/// The caller removes the agent from the population afterwards.
pub fn process_death(
    agent: &mut Agent,
    cause: DeathCause,
    tick: u64,
    engine: &mut DistanceFieldEngine,
) -> DeathConsequences {
    agent.release_trail(engine);
    let lost_inventory = agent.inventory.drain();
    info!(agent_id = %agent.id, type_id = %agent.type_id, %cause, tick, "ant died");
    DeathConsequences {
        agent_id: agent.id,
        type_id: agent.type_id.clone(),
        cause,
        position: agent.position,
        tick,
        lost_inventory,
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use formica_types::{Cell, PheromoneKind};
    use formica_world::FieldConfig;

    use super::*;
    use crate::behavior::BehaviorState;
    use crate::config::AgentType;
    use crate::strategy::TrailState;

    #[test]
    fn death_releases_occupancy_and_drops_load() {
        let config = FieldConfig {
            tile_size: 8.0,
            sub_cells_per_tile: 1,
            width_tiles: 20,
            height_tiles: 20,
            colony_interior_radius: 1,
        };
        let mut engine = DistanceFieldEngine::new(&config, Vec2::new(44.0, 44.0)).unwrap();
        let cell = Cell::new(7, 5);
        assert!(engine.add_pheromone(cell, PheromoneKind::Gather));
        let claim = engine.claim_occupancy(cell, PheromoneKind::Gather);
        assert!(claim.is_some());

        let t = AgentType::worker();
        let mut agent = Agent::new(&t, Vec2::ZERO, Vec2::ZERO, 0);
        agent.inventory.add(ResourceKind::Seed, 2).unwrap();
        agent.state = BehaviorState::FollowTrail {
            kind: PheromoneKind::Gather,
            trail: TrailState {
                claim,
                ..TrailState::entering(cell, true)
            },
        };

        let consequences = process_death(&mut agent, DeathCause::Combat, 42, &mut engine);
        assert_eq!(consequences.cause, DeathCause::Combat);
        assert_eq!(consequences.lost_inventory.get(&ResourceKind::Seed), Some(&2));
        assert!(agent.inventory.is_empty());
        assert_eq!(engine.get(cell, PheromoneKind::Gather).unwrap().occupancy(), 0);
    }

    #[test]
    fn cause_display() {
        assert_eq!(DeathCause::Starvation.to_string(), "starvation");
        assert_eq!(DeathCause::Combat.to_string(), "combat");
    }
}
