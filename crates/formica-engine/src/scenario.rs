//! Demo scenario seeding.
//!
//! A headless run starts from an empty field around the colony. The
//! scenario places food sources at random bearings and paints a gather
//! trail out to each one, adds a few explore trails and one attack trail
//! toward the hostiles, then hatches the starting population and queues
//! the starting eggs.

use std::collections::BTreeMap;
use std::path::Path;

use rand::rngs::StdRng;
use rand::seq::IndexedRandom;
use rand::{Rng, SeedableRng};
use serde::Deserialize;
use tracing::{info, warn};

use formica_agents::AgentError;
use formica_core::{Simulation, TickError};
use formica_types::{Cell, HostileKind, PheromoneKind, ResourceKind, Vec2};

use crate::error::EngineError;

// -----------------------------------------------------------------------
// Configuration
// -----------------------------------------------------------------------

/// Scenario parameters, read from the `scenario` section of
/// `formica-config.yaml`.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ScenarioConfig {
    /// Grown ants placed at the colony center, by type id.
    #[serde(default = "default_starting_agents")]
    pub starting_agents: BTreeMap<String, u32>,

    /// Eggs laid (and paid for) before the first tick, by type id.
    #[serde(default = "default_starting_eggs")]
    pub starting_eggs: BTreeMap<String, u32>,

    /// Number of food sources, each at the end of its own gather trail.
    #[serde(default = "default_food_sources")]
    pub food_sources: u32,

    /// Units held by each food source.
    #[serde(default = "default_food_amount")]
    pub food_amount: u32,

    /// Number of explore trails leading nowhere in particular.
    #[serde(default = "default_explore_trails")]
    pub explore_trails: u32,

    /// Length of each trail in world units, measured from the colony center.
    #[serde(default = "default_trail_length")]
    pub trail_length: f32,

    /// Number of hostiles placed just beyond the trail ends.
    #[serde(default = "default_hostiles")]
    pub hostiles: u32,
}

impl Default for ScenarioConfig {
    fn default() -> Self {
        Self {
            starting_agents: default_starting_agents(),
            starting_eggs: default_starting_eggs(),
            food_sources: default_food_sources(),
            food_amount: default_food_amount(),
            explore_trails: default_explore_trails(),
            trail_length: default_trail_length(),
            hostiles: default_hostiles(),
        }
    }
}

fn default_starting_agents() -> BTreeMap<String, u32> {
    BTreeMap::from([
        (String::from("worker"), 6),
        (String::from("scout"), 3),
        (String::from("soldier"), 2),
    ])
}

fn default_starting_eggs() -> BTreeMap<String, u32> {
    BTreeMap::from([(String::from("worker"), 2)])
}

const fn default_food_sources() -> u32 {
    3
}

const fn default_food_amount() -> u32 {
    40
}

const fn default_explore_trails() -> u32 {
    2
}

const fn default_trail_length() -> f32 {
    320.0
}

const fn default_hostiles() -> u32 {
    2
}

/// Load the `scenario` section from the config file at `path`.
///
/// A missing file or a missing section yields the defaults.
pub fn load_scenario_config(path: &Path) -> Result<ScenarioConfig, EngineError> {
    if !path.exists() {
        return Ok(ScenarioConfig::default());
    }
    let contents = std::fs::read_to_string(path).map_err(|e| EngineError::Scenario {
        message: format!("failed to read config file: {e}"),
    })?;
    parse_scenario_config(&contents)
}

/// Extract the `scenario` section from a full config document.
pub fn parse_scenario_config(yaml: &str) -> Result<ScenarioConfig, EngineError> {
    let raw: serde_yml::Value = serde_yml::from_str(yaml).map_err(|e| EngineError::Scenario {
        message: format!("failed to parse config YAML: {e}"),
    })?;

    let Some(section) = raw.get("scenario") else {
        return Ok(ScenarioConfig::default());
    };
    serde_yml::from_value(section.clone()).map_err(|e| EngineError::Scenario {
        message: format!("failed to parse scenario config: {e}"),
    })
}

// -----------------------------------------------------------------------
// Seeding
// -----------------------------------------------------------------------

/// What [`seed_scenario`] placed.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SeedResult {
    /// Ants placed.
    pub agents: u32,
    /// Eggs laid.
    pub eggs: u32,
    /// Food sources placed.
    pub food_sources: u32,
    /// Trails painted.
    pub trails: u32,
    /// Hostiles placed.
    pub hostiles: u32,
}

/// Populate `sim` according to `config`, using `seed` for every random
/// bearing.
pub fn seed_scenario(sim: &mut Simulation, config: &ScenarioConfig, seed: u64) -> Result<SeedResult, EngineError> {
    let mut rng = StdRng::seed_from_u64(seed);
    let mut result = SeedResult::default();
    let center = sim.engine().mapper().sub_cell_to_world(sim.engine().colony_center());

    for _ in 0..config.food_sources {
        let bearing = random_bearing(&mut rng);
        if let Some(end) = paint_trail(sim, bearing, config.trail_length, PheromoneKind::Gather) {
            let kind = *[ResourceKind::Seed, ResourceKind::Honeydew, ResourceKind::Leaf]
                .choose(&mut rng)
                .unwrap_or(&ResourceKind::Seed);
            let pos = sim.engine().mapper().sub_cell_to_world(end);
            let id = sim.add_food_source(kind, pos, config.food_amount);
            info!(food_source_id = %id, ?kind, cell = %end, "food source placed");
            result.food_sources = result.food_sources.saturating_add(1);
            result.trails = result.trails.saturating_add(1);
        }
    }

    for _ in 0..config.explore_trails {
        let bearing = random_bearing(&mut rng);
        if paint_trail(sim, bearing, config.trail_length, PheromoneKind::Explore).is_some() {
            result.trails = result.trails.saturating_add(1);
        }
    }

    let threat = random_bearing(&mut rng);
    if config.hostiles > 0 && paint_trail(sim, threat, config.trail_length, PheromoneKind::Attack).is_some() {
        result.trails = result.trails.saturating_add(1);
    }
    for _ in 0..config.hostiles {
        let spread = Vec2::from_angle(threat.y.atan2(threat.x) + rng.random_range(-0.5..=0.5));
        let kind = *[HostileKind::Beetle, HostileKind::Spider, HostileKind::RivalAnt]
            .choose(&mut rng)
            .unwrap_or(&HostileKind::Beetle);
        sim.spawn_hostile(kind, center + spread.scaled(config.trail_length * 1.3));
        result.hostiles = result.hostiles.saturating_add(1);
    }

    for (type_id, &count) in &config.starting_agents {
        for _ in 0..count {
            sim.spawn_agent(type_id, center)?;
            result.agents = result.agents.saturating_add(1);
        }
    }

    for (type_id, &count) in &config.starting_eggs {
        for _ in 0..count {
            match sim.lay_egg(type_id) {
                Ok(_) => result.eggs = result.eggs.saturating_add(1),
                Err(TickError::Brood {
                    source: AgentError::CannotAfford(_),
                }) => {
                    warn!(type_id, "stockpile too small for the remaining starting eggs");
                    break;
                }
                Err(e) => return Err(e.into()),
            }
        }
    }

    info!(
        agents = result.agents,
        eggs = result.eggs,
        food_sources = result.food_sources,
        trails = result.trails,
        hostiles = result.hostiles,
        markers = sim.engine().marker_count(),
        "Scenario seeded"
    );
    Ok(result)
}

fn random_bearing(rng: &mut StdRng) -> Vec2 {
    Vec2::from_angle(rng.random_range(0.0..core::f32::consts::TAU))
}

/// Paint a trail of `kind` from the interior edge out along `bearing`.
///
/// The trail starts on the axis-aligned cell just outside the interior
/// that faces the bearing, so its first marker always has a root.
fn paint_trail(sim: &mut Simulation, bearing: Vec2, length: f32, kind: PheromoneKind) -> Option<Cell> {
    let mapper = sim.engine().mapper();
    let center = mapper.sub_cell_to_world(sim.engine().colony_center());
    let reach = f32::from(u16::try_from(sim.engine().interior_radius().saturating_add(1)).unwrap_or(u16::MAX))
        * mapper.sub_cell_size();
    let axis = if bearing.x.abs() >= bearing.y.abs() {
        Vec2::new(bearing.x.signum(), 0.0)
    } else {
        Vec2::new(0.0, bearing.y.signum())
    };
    let start = mapper.world_to_sub_cell(center + axis.scaled(reach));
    let end = mapper.world_to_sub_cell(mapper.clamp_to_world(center + bearing.scaled(length)));

    let last = sim.draw_line(Some(start), end, kind);
    if last.is_none() {
        warn!(%start, %end, ?kind, "trail could not be painted");
    }
    last
}
