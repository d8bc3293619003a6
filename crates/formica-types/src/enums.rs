//! Enumeration types for the Formica simulation.

use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Pheromone kinds
// ---------------------------------------------------------------------------

/// A kind of scent marker deposited on the pheromone sub-grid.
///
/// Every kind forms its own independent distance field: markers of
/// different kinds may share a cell without affecting each other's
/// connectivity or distances.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PheromoneKind {
    /// Scouting trail: followed outward to its end, then abandoned.
    Explore,
    /// Foraging trail: walked outward empty-handed and inward when full.
    Gather,
    /// Defensive trail: patrolled back and forth by soldiers.
    Attack,
}

impl PheromoneKind {
    /// All pheromone kinds in declaration order.
    pub const ALL: [Self; 3] = [Self::Explore, Self::Gather, Self::Attack];

    /// Lower-case name used in logs and configuration.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Explore => "explore",
            Self::Gather => "gather",
            Self::Attack => "attack",
        }
    }
}

impl core::fmt::Display for PheromoneKind {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// Resources
// ---------------------------------------------------------------------------

/// A resource unit that ants carry and the colony stockpiles.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResourceKind {
    /// Grass seeds, the staple food.
    Seed,
    /// Sugary secretion farmed from aphids.
    Honeydew,
    /// Leaf fragments used to build brood chambers.
    Leaf,
}

impl ResourceKind {
    /// Whether ants can eat this resource to relieve hunger.
    pub const fn is_edible(self) -> bool {
        matches!(self, Self::Seed | Self::Honeydew)
    }
}

// ---------------------------------------------------------------------------
// Behavior
// ---------------------------------------------------------------------------

/// Discriminant of an ant's behavior state, used in snapshots and logs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BehaviorKind {
    /// Unguided random walk with a mild pull toward home.
    Wander,
    /// Moving along a pheromone trail under a trail strategy.
    FollowTrail,
    /// Pursuing and attacking a hostile.
    Combat,
}

// ---------------------------------------------------------------------------
// Hostiles
// ---------------------------------------------------------------------------

/// Species of a hostile creature that threatens the colony.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HostileKind {
    /// Slow, armored scavenger.
    Beetle,
    /// Fast predator that hunts lone ants.
    Spider,
    /// Forager from a rival colony.
    RivalAnt,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pheromone_kind_serializes_snake_case() {
        let json = serde_json::to_string(&PheromoneKind::Gather).ok();
        assert_eq!(json.as_deref(), Some("\"gather\""));
    }

    #[test]
    fn edible_resources() {
        assert!(ResourceKind::Seed.is_edible());
        assert!(ResourceKind::Honeydew.is_edible());
        assert!(!ResourceKind::Leaf.is_edible());
    }

    #[test]
    fn display_uses_config_name() {
        assert_eq!(PheromoneKind::Attack.to_string(), "attack");
    }
}
