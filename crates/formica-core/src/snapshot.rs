//! Read-only world snapshots for renderers and logs.
//!
//! A [`WorldSnapshot`] is a plain serde value detached from the simulation;
//! holding one never blocks the next tick.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use formica_agents::{Agent, BehaviorState};
use formica_types::{AgentId, ResourceKind, Vec2};
use formica_world::{FoodSource, PheromoneMarker};

use crate::hostile::Hostile;
use crate::tick::Simulation;

/// One ant as a renderer sees it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AgentSnapshot {
    /// Ant id.
    pub id: AgentId,
    /// Caste id.
    pub type_id: String,
    /// Position in world units.
    pub position: Vec2,
    /// Velocity in world units per second.
    pub velocity: Vec2,
    /// Behavior state, including trail traversal state.
    pub state: BehaviorState,
    /// Remaining health.
    pub health: u32,
    /// Hunger, 0 to 100.
    pub hunger: u32,
    /// Carried resources.
    pub inventory: BTreeMap<ResourceKind, u32>,
}

impl From<&Agent> for AgentSnapshot {
    fn from(agent: &Agent) -> Self {
        Self {
            id: agent.id(),
            type_id: agent.type_id().to_owned(),
            position: agent.position(),
            velocity: agent.velocity(),
            state: *agent.state(),
            health: agent.health(),
            hunger: agent.hunger(),
            inventory: agent.inventory().items().clone(),
        }
    }
}

/// Everything a renderer needs to draw one frame.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WorldSnapshot {
    /// Last executed tick.
    pub tick: u64,
    /// Every pheromone marker, in cell order.
    pub markers: Vec<PheromoneMarker>,
    /// Every living ant, in id order.
    pub agents: Vec<AgentSnapshot>,
    /// Every living hostile, in id order.
    pub hostiles: Vec<Hostile>,
    /// Food sources still holding food.
    pub food: Vec<FoodSource>,
    /// The colony stockpile.
    pub stockpile: BTreeMap<ResourceKind, u32>,
    /// Eggs still incubating.
    pub eggs: usize,
}

impl WorldSnapshot {
    /// Copy the current state of `sim`.
    pub fn capture(sim: &Simulation) -> Self {
        Self {
            tick: sim.tick_number(),
            markers: sim.engine().markers().copied().collect(),
            agents: sim.agents().map(AgentSnapshot::from).collect(),
            hostiles: sim.hostiles().cloned().collect(),
            food: sim.food().iter().cloned().collect(),
            stockpile: sim.colony().stockpile().clone(),
            eggs: sim.brood().len(),
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use formica_types::{Cell, HostileKind, PheromoneKind};

    use super::*;
    use crate::config::SimulationConfig;

    #[test]
    fn snapshot_reflects_simulation_and_survives_json() {
        let mut config = SimulationConfig::default();
        config.field.colony_interior_radius = 1;
        let mut sim = Simulation::from_config(&config).unwrap();
        let center = sim.engine().colony_center();
        assert!(sim.add_pheromone(center.offset(2, 0), PheromoneKind::Explore));
        sim.spawn_agent("worker", sim.colony().center()).unwrap();
        sim.spawn_hostile(HostileKind::Beetle, Vec2::new(10.0, 10.0));
        sim.add_food_source(ResourceKind::Honeydew, Vec2::new(100.0, 100.0), 5);

        let snapshot = sim.snapshot();
        assert_eq!(snapshot.tick, 0);
        assert_eq!(snapshot.markers.len(), 1);
        assert_eq!(snapshot.markers.first().unwrap().cell(), Cell::new(center.x + 2, center.y));
        assert_eq!(snapshot.agents.len(), 1);
        assert_eq!(snapshot.hostiles.len(), 1);
        assert_eq!(snapshot.food.len(), 1);
        assert_eq!(snapshot.stockpile.get(&ResourceKind::Seed), Some(&60));

        let json = serde_json::to_string(&snapshot).unwrap();
        let back: WorldSnapshot = serde_json::from_str(&json).unwrap();
        assert_eq!(back, snapshot);
    }
}
