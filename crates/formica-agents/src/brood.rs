//! Egg laying and incubation.
//!
//! Laying an egg debits the caste's cost from the colony stockpile, all or
//! nothing. Each tick every egg's timer counts down; eggs whose timer has
//! run out hatch and are handed back to the caller, which spawns the ants.

use serde::{Deserialize, Serialize};
use tracing::debug;

use formica_types::EggId;
use formica_world::Colony;

use crate::config::AgentType;
use crate::error::AgentError;

/// One incubating egg.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Egg {
    /// Egg id.
    pub id: EggId,
    /// Caste the egg hatches into.
    pub type_id: String,
    /// Ticks left until hatching.
    pub remaining_ticks: u32,
    /// Tick at which the egg was laid.
    pub laid_at: u64,
}

/// The colony's brood chamber.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Brood {
    eggs: Vec<Egg>,
}

impl Brood {
    /// An empty brood chamber.
    pub const fn new() -> Self {
        Self { eggs: Vec::new() }
    }

    /// Pay for and queue one egg of `agent_type`.
    ///
    /// # Errors
    ///
    /// Returns [`AgentError::CannotAfford`] when the stockpile does not
    /// cover the cost; the stockpile is left untouched.
    pub fn lay(&mut self, agent_type: &AgentType, colony: &mut Colony, tick: u64) -> Result<EggId, AgentError> {
        if !colony.try_spend(&agent_type.cost) {
            return Err(AgentError::CannotAfford(agent_type.id.clone()));
        }
        let id = EggId::new();
        self.eggs.push(Egg {
            id,
            type_id: agent_type.id.clone(),
            remaining_ticks: agent_type.incubation_ticks,
            laid_at: tick,
        });
        debug!(egg_id = %id, type_id = %agent_type.id, tick, "egg laid");
        Ok(id)
    }

    /// Advance incubation by one tick and return the eggs that hatch.
    ///
    /// An egg with a zero incubation time hatches on the first advance.
    pub fn advance(&mut self) -> Vec<Egg> {
        let (hatched, waiting): (Vec<Egg>, Vec<Egg>) = core::mem::take(&mut self.eggs)
            .into_iter()
            .map(|mut egg| {
                egg.remaining_ticks = egg.remaining_ticks.saturating_sub(1);
                egg
            })
            .partition(|egg| egg.remaining_ticks == 0);
        self.eggs = waiting;
        hatched
    }

    /// Eggs still incubating, in laying order.
    pub fn eggs(&self) -> &[Egg] {
        &self.eggs
    }

    /// Number of incubating eggs.
    pub fn len(&self) -> usize {
        self.eggs.len()
    }

    /// Whether no eggs are incubating.
    pub fn is_empty(&self) -> bool {
        self.eggs.is_empty()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::collections::BTreeMap;

    use formica_types::{ResourceKind, Vec2};

    use super::*;

    fn colony(seeds: u32) -> Colony {
        Colony::new(Vec2::ZERO, BTreeMap::from([(ResourceKind::Seed, seeds)]))
    }

    #[test]
    fn lay_debits_cost() {
        let mut brood = Brood::new();
        let mut colony = colony(12);
        let worker = AgentType::worker();
        brood.lay(&worker, &mut colony, 0).unwrap();
        assert_eq!(colony.amount(ResourceKind::Seed), 7);
        assert_eq!(brood.len(), 1);
    }

    #[test]
    fn unaffordable_egg_leaves_stockpile() {
        let mut brood = Brood::new();
        let mut colony = colony(20);
        // Soldiers also need leaves.
        let result = brood.lay(&AgentType::soldier(), &mut colony, 0);
        assert!(matches!(result, Err(AgentError::CannotAfford(id)) if id == "soldier"));
        assert_eq!(colony.amount(ResourceKind::Seed), 20);
        assert!(brood.is_empty());
    }

    #[test]
    fn eggs_hatch_after_incubation() {
        let mut brood = Brood::new();
        let mut colony = colony(100);
        let mut quick = AgentType::scout();
        quick.incubation_ticks = 2;
        brood.lay(&quick, &mut colony, 0).unwrap();
        assert!(brood.advance().is_empty());
        let hatched = brood.advance();
        assert_eq!(hatched.len(), 1);
        assert_eq!(hatched.first().unwrap().type_id, "scout");
        assert!(brood.is_empty());
    }

    #[test]
    fn zero_incubation_hatches_immediately() {
        let mut brood = Brood::new();
        let mut colony = colony(100);
        let mut instant = AgentType::worker();
        instant.incubation_ticks = 0;
        brood.lay(&instant, &mut colony, 5).unwrap();
        assert_eq!(brood.advance().len(), 1);
    }
}
