//! Configuration loading and typed config structures for the Formica simulation.
//!
//! The canonical configuration lives in `formica-config.yaml` at the project
//! root. This module defines strongly-typed structs that mirror the YAML
//! structure, and provides a loader that reads and validates the file.
//! Every section is optional; missing keys fall back to the defaults below.

use std::collections::BTreeMap;
use std::path::Path;

use serde::Deserialize;

use formica_agents::{AgentError, AgentType, AgentTypeRegistry, BehaviorConfig, StrategyConfig, VitalsConfig};
use formica_types::ResourceKind;
use formica_world::FieldConfig;

/// Errors that can occur when loading configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// Failed to read the configuration file from disk.
    #[error("failed to read config file: {source}")]
    Io {
        /// The underlying I/O error.
        #[from]
        source: std::io::Error,
    },

    /// Failed to parse YAML content.
    #[error("failed to parse config YAML: {source}")]
    Yaml {
        /// The underlying YAML parse error.
        source: serde_yml::Error,
    },

    /// A value is outside its valid range.
    #[error("invalid configuration: {reason}")]
    Invalid {
        /// Explanation of what is wrong with the configuration.
        reason: String,
    },

    /// An agent type or agent tunable failed validation.
    #[error("invalid agent configuration: {source}")]
    Agent {
        /// The underlying agent error.
        #[from]
        source: AgentError,
    },
}

impl From<serde_yml::Error> for ConfigError {
    fn from(source: serde_yml::Error) -> Self {
        Self::Yaml { source }
    }
}

/// Top-level simulation configuration.
///
/// Mirrors the structure of `formica-config.yaml`.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct SimulationConfig {
    /// World name, seed, and extent.
    #[serde(default)]
    pub world: WorldConfig,

    /// Pheromone field resolution and colony interior.
    #[serde(default)]
    pub field: FieldSection,

    /// Fixed-timestep settings.
    #[serde(default)]
    pub time: TimeConfig,

    /// Colony placement and starting stockpile.
    #[serde(default)]
    pub colony: ColonyConfig,

    /// Trail strategy tunables.
    #[serde(default)]
    pub strategies: StrategyConfig,

    /// Behavior state machine tunables.
    #[serde(default)]
    pub behavior: BehaviorConfig,

    /// Hunger and starvation.
    #[serde(default)]
    pub vitals: VitalsConfig,

    /// Caste definitions.
    #[serde(default = "default_agent_types")]
    pub agent_types: Vec<AgentType>,

    /// Hostile creature parameters.
    #[serde(default)]
    pub hostiles: HostileConfig,

    /// Food pickup parameters.
    #[serde(default)]
    pub foraging: ForagingConfig,

    /// Bounds for headless runs.
    #[serde(default)]
    pub simulation: SimulationBoundsConfig,

    /// Logging configuration.
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            world: WorldConfig::default(),
            field: FieldSection::default(),
            time: TimeConfig::default(),
            colony: ColonyConfig::default(),
            strategies: StrategyConfig::default(),
            behavior: BehaviorConfig::default(),
            vitals: VitalsConfig::default(),
            agent_types: default_agent_types(),
            hostiles: HostileConfig::default(),
            foraging: ForagingConfig::default(),
            simulation: SimulationBoundsConfig::default(),
            logging: LoggingConfig::default(),
        }
    }
}

impl SimulationConfig {
    /// Load configuration from a YAML file at the given path.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Io`] if the file cannot be read, or
    /// [`ConfigError::Yaml`] if the content is not valid YAML.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        Self::parse(&contents)
    }

    /// Parse configuration from a YAML string.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Yaml`] if the string is not valid YAML.
    pub fn parse(yaml: &str) -> Result<Self, ConfigError> {
        Ok(serde_yml::from_str(yaml)?)
    }

    /// Reject configurations the simulation cannot run with.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Invalid`] for out-of-range values and
    /// [`ConfigError::Agent`] for bad agent types or tunables.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.field.sub_cells_per_tile == 0 {
            return Err(invalid("field.sub_cells_per_tile must be at least 1"));
        }
        if self.world.width_tiles == 0 || self.world.height_tiles == 0 {
            return Err(invalid("world dimensions must be at least one tile"));
        }
        if !self.world.tile_size.is_finite() || self.world.tile_size <= 0.0 {
            return Err(invalid("world.tile_size must be positive"));
        }
        if self.time.tick_duration_ms == 0 {
            return Err(invalid("time.tick_duration_ms must be at least 1"));
        }
        if self.time.max_ticks_per_frame == 0 {
            return Err(invalid("time.max_ticks_per_frame must be at least 1"));
        }
        if self.agent_types.is_empty() {
            return Err(invalid("at least one agent type must be configured"));
        }
        if !self.foraging.pickup_radius.is_finite() || self.foraging.pickup_radius < 0.0 {
            return Err(invalid("foraging.pickup_radius must be non-negative"));
        }
        if !matches!(self.logging.format.as_str(), "text" | "json") {
            return Err(invalid("logging.format must be `text` or `json`"));
        }
        self.hostiles.validate()?;
        self.strategies.validate()?;
        self.behavior.validate()?;
        self.registry()?;
        Ok(())
    }

    /// Build the field engine configuration from the `world` and `field`
    /// sections.
    pub const fn field_config(&self) -> FieldConfig {
        FieldConfig {
            tile_size: self.world.tile_size,
            sub_cells_per_tile: self.field.sub_cells_per_tile,
            width_tiles: self.world.width_tiles,
            height_tiles: self.world.height_tiles,
            colony_interior_radius: self.field.colony_interior_radius,
        }
    }

    /// Build the agent type registry.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Agent`] for invalid or duplicate types.
    pub fn registry(&self) -> Result<AgentTypeRegistry, ConfigError> {
        Ok(AgentTypeRegistry::from_types(self.agent_types.clone())?)
    }
}

fn invalid(reason: &str) -> ConfigError {
    ConfigError::Invalid {
        reason: reason.to_owned(),
    }
}

fn default_agent_types() -> Vec<AgentType> {
    vec![AgentType::worker(), AgentType::scout(), AgentType::soldier()]
}

// ---------------------------------------------------------------------------
// World
// ---------------------------------------------------------------------------

/// World-level configuration.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct WorldConfig {
    /// Human-readable simulation name.
    #[serde(default = "default_world_name")]
    pub name: String,

    /// Random seed for reproducibility.
    #[serde(default = "default_seed")]
    pub seed: u64,

    /// World width in tiles.
    #[serde(default = "default_width_tiles")]
    pub width_tiles: u32,

    /// World height in tiles.
    #[serde(default = "default_height_tiles")]
    pub height_tiles: u32,

    /// Edge length of one tile in world units.
    #[serde(default = "default_tile_size")]
    pub tile_size: f32,
}

impl Default for WorldConfig {
    fn default() -> Self {
        Self {
            name: default_world_name(),
            seed: default_seed(),
            width_tiles: default_width_tiles(),
            height_tiles: default_height_tiles(),
            tile_size: default_tile_size(),
        }
    }
}

fn default_world_name() -> String {
    "Formica".to_owned()
}

const fn default_seed() -> u64 {
    7
}

const fn default_width_tiles() -> u32 {
    48
}

const fn default_height_tiles() -> u32 {
    48
}

const fn default_tile_size() -> f32 {
    32.0
}

// ---------------------------------------------------------------------------
// Field
// ---------------------------------------------------------------------------

/// Pheromone field configuration.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct FieldSection {
    /// Pheromone sub-cells per tile edge.
    #[serde(default = "default_sub_cells_per_tile")]
    pub sub_cells_per_tile: u32,

    /// Colony interior radius in sub-cells.
    #[serde(default = "default_colony_interior_radius")]
    pub colony_interior_radius: u32,
}

impl Default for FieldSection {
    fn default() -> Self {
        Self {
            sub_cells_per_tile: default_sub_cells_per_tile(),
            colony_interior_radius: default_colony_interior_radius(),
        }
    }
}

const fn default_sub_cells_per_tile() -> u32 {
    4
}

const fn default_colony_interior_radius() -> u32 {
    3
}

// ---------------------------------------------------------------------------
// Time
// ---------------------------------------------------------------------------

/// Fixed-timestep configuration.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct TimeConfig {
    /// In-game duration of one tick, in milliseconds.
    #[serde(default = "default_tick_duration_ms")]
    pub tick_duration_ms: u64,

    /// Most ticks delivered for one frame of wall time; the backlog beyond
    /// this is dropped.
    #[serde(default = "default_max_ticks_per_frame")]
    pub max_ticks_per_frame: u32,
}

impl Default for TimeConfig {
    fn default() -> Self {
        Self {
            tick_duration_ms: default_tick_duration_ms(),
            max_ticks_per_frame: default_max_ticks_per_frame(),
        }
    }
}

const fn default_tick_duration_ms() -> u64 {
    50
}

const fn default_max_ticks_per_frame() -> u32 {
    5
}

// ---------------------------------------------------------------------------
// Colony
// ---------------------------------------------------------------------------

/// Colony placement and starting stockpile.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ColonyConfig {
    /// Colony center, world x.
    #[serde(default = "default_colony_center")]
    pub center_x: f32,

    /// Colony center, world y.
    #[serde(default = "default_colony_center")]
    pub center_y: f32,

    /// Resources the colony starts with.
    #[serde(default = "default_stockpile")]
    pub stockpile: BTreeMap<ResourceKind, u32>,
}

impl Default for ColonyConfig {
    fn default() -> Self {
        Self {
            center_x: default_colony_center(),
            center_y: default_colony_center(),
            stockpile: default_stockpile(),
        }
    }
}

const fn default_colony_center() -> f32 {
    768.0
}

fn default_stockpile() -> BTreeMap<ResourceKind, u32> {
    BTreeMap::from([
        (ResourceKind::Seed, 60),
        (ResourceKind::Honeydew, 20),
        (ResourceKind::Leaf, 10),
    ])
}

// ---------------------------------------------------------------------------
// Hostiles
// ---------------------------------------------------------------------------

/// Parameters shared by all hostile creatures.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct HostileConfig {
    /// Damage per bite.
    #[serde(default = "default_bite_damage")]
    pub bite_damage: u32,

    /// Ticks between two bites.
    #[serde(default = "default_bite_cooldown_ticks")]
    pub bite_cooldown_ticks: u32,

    /// Reach of a bite in world units.
    #[serde(default = "default_bite_range")]
    pub bite_range: f32,

    /// Radius within which a hostile notices ants.
    #[serde(default = "default_sight_radius")]
    pub sight_radius: f32,

    /// Movement speed in world units per second.
    #[serde(default = "default_hostile_speed")]
    pub move_speed: f32,

    /// Health of a freshly spawned hostile.
    #[serde(default = "default_hostile_health")]
    pub max_health: u32,
}

impl Default for HostileConfig {
    fn default() -> Self {
        Self {
            bite_damage: default_bite_damage(),
            bite_cooldown_ticks: default_bite_cooldown_ticks(),
            bite_range: default_bite_range(),
            sight_radius: default_sight_radius(),
            move_speed: default_hostile_speed(),
            max_health: default_hostile_health(),
        }
    }
}

impl HostileConfig {
    fn validate(&self) -> Result<(), ConfigError> {
        if !self.bite_range.is_finite() || self.bite_range < 0.0 {
            return Err(invalid("hostiles.bite_range must be non-negative"));
        }
        if !self.sight_radius.is_finite() || self.sight_radius < 0.0 {
            return Err(invalid("hostiles.sight_radius must be non-negative"));
        }
        if !self.move_speed.is_finite() || self.move_speed < 0.0 {
            return Err(invalid("hostiles.move_speed must be non-negative"));
        }
        if self.max_health == 0 {
            return Err(invalid("hostiles.max_health must be at least 1"));
        }
        Ok(())
    }
}

const fn default_bite_damage() -> u32 {
    4
}

const fn default_bite_cooldown_ticks() -> u32 {
    15
}

const fn default_bite_range() -> f32 {
    5.0
}

const fn default_sight_radius() -> f32 {
    96.0
}

const fn default_hostile_speed() -> f32 {
    18.0
}

const fn default_hostile_health() -> u32 {
    60
}

// ---------------------------------------------------------------------------
// Foraging
// ---------------------------------------------------------------------------

/// Food pickup parameters.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ForagingConfig {
    /// Pickup radius given to food sources added without an explicit one.
    #[serde(default = "default_pickup_radius")]
    pub pickup_radius: f32,

    /// Units an ant picks up per tick while in reach.
    #[serde(default = "default_pickup_per_tick")]
    pub pickup_per_tick: u32,
}

impl Default for ForagingConfig {
    fn default() -> Self {
        Self {
            pickup_radius: default_pickup_radius(),
            pickup_per_tick: default_pickup_per_tick(),
        }
    }
}

const fn default_pickup_radius() -> f32 {
    14.0
}

const fn default_pickup_per_tick() -> u32 {
    1
}

// ---------------------------------------------------------------------------
// Bounds and logging
// ---------------------------------------------------------------------------

/// Bounds for a headless run.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct SimulationBoundsConfig {
    /// Stop after this many ticks.
    #[serde(default = "default_max_ticks")]
    pub max_ticks: u64,

    /// Log a progress line every this many ticks (0 disables).
    #[serde(default = "default_progress_interval")]
    pub progress_interval: u64,
}

impl Default for SimulationBoundsConfig {
    fn default() -> Self {
        Self {
            max_ticks: default_max_ticks(),
            progress_interval: default_progress_interval(),
        }
    }
}

const fn default_max_ticks() -> u64 {
    2_000
}

const fn default_progress_interval() -> u64 {
    200
}

/// Logging configuration.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct LoggingConfig {
    /// Default `tracing` filter when `RUST_LOG` is unset.
    #[serde(default = "default_log_level")]
    pub level: String,

    /// Output format: `text` for human-readable lines, `json` for one JSON
    /// object per event.
    #[serde(default = "default_log_format")]
    pub format: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_log_format(),
        }
    }
}

fn default_log_level() -> String {
    "info".to_owned()
}

fn default_log_format() -> String {
    "text".to_owned()
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::float_cmp)]
mod tests {
    use super::*;

    #[test]
    fn empty_yaml_gives_defaults() {
        let config = SimulationConfig::parse("{}").unwrap();
        assert_eq!(config.world.width_tiles, 48);
        assert_eq!(config.field.sub_cells_per_tile, 4);
        assert_eq!(config.time.tick_duration_ms, 50);
        assert_eq!(config.agent_types.len(), 3);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn partial_sections_keep_other_defaults() {
        let yaml = "
world:
  seed: 99
field:
  sub_cells_per_tile: 2
strategies:
  patrol_max_turn_chance: 0.3
";
        let config = SimulationConfig::parse(yaml).unwrap();
        assert_eq!(config.world.seed, 99);
        assert_eq!(config.world.name, "Formica");
        assert_eq!(config.field.sub_cells_per_tile, 2);
        assert_eq!(config.field.colony_interior_radius, 3);
        assert_eq!(config.strategies.patrol_max_turn_chance, 0.3);
        assert_eq!(config.strategies.patrol_turn_chance_per_agent, 0.05);
    }

    #[test]
    fn zero_resolution_rejected() {
        let config = SimulationConfig::parse("field:\n  sub_cells_per_tile: 0\n").unwrap();
        assert!(matches!(config.validate(), Err(ConfigError::Invalid { .. })));
    }

    #[test]
    fn out_of_range_turn_chance_rejected() {
        let config = SimulationConfig::parse("strategies:\n  patrol_turn_chance_per_agent: 2.0\n").unwrap();
        assert!(matches!(config.validate(), Err(ConfigError::Agent { .. })));
    }

    #[test]
    fn duplicate_agent_types_rejected() {
        let yaml = "
agent_types:
  - { id: a, name: A, incubation_ticks: 1, max_health: 1, move_speed: 1.0, vision_radius: 1.0, hunger_rate: 1 }
  - { id: a, name: B, incubation_ticks: 1, max_health: 1, move_speed: 1.0, vision_radius: 1.0, hunger_rate: 1 }
";
        let config = SimulationConfig::parse(yaml).unwrap();
        assert!(matches!(
            config.validate(),
            Err(ConfigError::Agent {
                source: AgentError::DuplicateAgentType(_)
            })
        ));
    }

    #[test]
    fn empty_agent_types_rejected() {
        let config = SimulationConfig::parse("agent_types: []\n").unwrap();
        assert!(matches!(config.validate(), Err(ConfigError::Invalid { .. })));
    }

    #[test]
    fn invalid_yaml_is_an_error() {
        assert!(matches!(
            SimulationConfig::parse("world: [unclosed"),
            Err(ConfigError::Yaml { .. })
        ));
    }

    #[test]
    fn shipped_config_file_is_valid() {
        let config = SimulationConfig::parse(include_str!("../../../formica-config.yaml")).unwrap();
        assert!(config.validate().is_ok());
        let defaults = SimulationConfig::default();
        assert_eq!(config.world, defaults.world);
        assert_eq!(config.field, defaults.field);
        assert_eq!(config.strategies, defaults.strategies);
        assert_eq!(config.registry().unwrap(), defaults.registry().unwrap());
    }

    #[test]
    fn unknown_log_format_rejected() {
        let config = SimulationConfig::parse("logging:\n  format: xml\n").unwrap();
        assert!(matches!(config.validate(), Err(ConfigError::Invalid { .. })));
    }

    #[test]
    fn field_config_combines_sections() {
        let config = SimulationConfig::default();
        let field = config.field_config();
        assert_eq!(field.tile_size, 32.0);
        assert_eq!(field.sub_cells_per_tile, 4);
        assert_eq!(field.colony_interior_radius, 3);
    }
}
