//! The mutable state of one ant.
//!
//! An [`Agent`] is created when an egg hatches and removed when its health
//! reaches zero. Its behavior each tick is driven by
//! [`behavior::step`](crate::behavior::step) through [`Agent::update`].

use rand::Rng;
use serde::{Deserialize, Serialize};

use formica_types::{AgentId, BehaviorKind, Cell, PheromoneKind, Vec2};
use formica_world::{Colony, DistanceFieldEngine};

use crate::behavior::{self, BehaviorContext, BehaviorOutcome, BehaviorState};
use crate::config::AgentType;
use crate::error::AgentError;
use crate::inventory::Inventory;

/// One ant.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Agent {
    pub(crate) id: AgentId,
    pub(crate) type_id: String,
    pub(crate) position: Vec2,
    pub(crate) velocity: Vec2,
    /// Facing in radians; carried across wander ticks.
    pub(crate) heading: f32,
    pub(crate) health: u32,
    pub(crate) hunger: u32,
    pub(crate) inventory: Inventory,
    pub(crate) state: BehaviorState,
    /// Ticks until the next attack is allowed.
    pub(crate) attack_cooldown: u32,
    pub(crate) home: Vec2,
    pub(crate) born_at: u64,
}

impl Agent {
    /// Hatch a new ant of `agent_type` at `position`.
    pub fn new(agent_type: &AgentType, position: Vec2, home: Vec2, tick: u64) -> Self {
        Self::with_id(AgentId::new(), agent_type, position, home, tick)
    }

    /// Hatch a new ant with a caller-chosen id.
    pub fn with_id(id: AgentId, agent_type: &AgentType, position: Vec2, home: Vec2, tick: u64) -> Self {
        Self {
            id,
            type_id: agent_type.id.clone(),
            position,
            velocity: Vec2::ZERO,
            heading: 0.0,
            health: agent_type.max_health,
            hunger: 0,
            inventory: Inventory::new(agent_type.carry_capacity),
            state: BehaviorState::default(),
            attack_cooldown: 0,
            home,
            born_at: tick,
        }
    }

    /// The ant's id.
    pub const fn id(&self) -> AgentId {
        self.id
    }

    /// Id of the ant's caste.
    pub fn type_id(&self) -> &str {
        &self.type_id
    }

    /// Current position in world units.
    pub const fn position(&self) -> Vec2 {
        self.position
    }

    /// Velocity chosen on the last update, in world units per second.
    pub const fn velocity(&self) -> Vec2 {
        self.velocity
    }

    /// Remaining health.
    pub const fn health(&self) -> u32 {
        self.health
    }

    /// Hunger, 0 to 100.
    pub const fn hunger(&self) -> u32 {
        self.hunger
    }

    /// What the ant is carrying.
    pub const fn inventory(&self) -> &Inventory {
        &self.inventory
    }

    /// Mutable access to the carried resources.
    pub const fn inventory_mut(&mut self) -> &mut Inventory {
        &mut self.inventory
    }

    /// Current behavior state.
    pub const fn state(&self) -> &BehaviorState {
        &self.state
    }

    /// Discriminant of the current behavior state.
    pub const fn behavior_kind(&self) -> BehaviorKind {
        self.state.kind()
    }

    /// The pheromone kind being followed, if on a trail.
    pub const fn following(&self) -> Option<PheromoneKind> {
        self.state.following()
    }

    /// The marker cell the ant is anchored to, if on a trail.
    pub const fn anchor(&self) -> Option<Cell> {
        match self.state {
            BehaviorState::FollowTrail { trail, .. } => trail.anchor,
            BehaviorState::Wander { .. } | BehaviorState::Combat { .. } => None,
        }
    }

    /// The colony position this ant returns to.
    pub const fn home(&self) -> Vec2 {
        self.home
    }

    /// Tick at which the ant hatched.
    pub const fn born_at(&self) -> u64 {
        self.born_at
    }

    /// Whether the ant still has health.
    pub const fn is_alive(&self) -> bool {
        self.health > 0
    }

    /// Subtract `amount` health. Returns `true` if this killed the ant.
    pub const fn take_damage(&mut self, amount: u32) -> bool {
        let was_alive = self.is_alive();
        self.health = self.health.saturating_sub(amount);
        was_alive && !self.is_alive()
    }

    /// Run one tick of behavior.
    pub fn update<R: Rng + ?Sized>(&mut self, ctx: &mut BehaviorContext<'_, R>) -> BehaviorOutcome {
        behavior::step(self, ctx)
    }

    /// Move the whole inventory into the colony stockpile.
    ///
    /// A gatherer that unloads turns back outward along its trail.
    /// Returns the number of units delivered.
    pub fn deliver(&mut self, colony: &mut Colony) -> Result<u32, AgentError> {
        if self.inventory.is_empty() {
            return Ok(0);
        }
        let delivered = colony.deposit(self.inventory.items())?;
        self.inventory.drain();
        if let BehaviorState::FollowTrail { kind: PheromoneKind::Gather, trail } = &mut self.state {
            trail.outward = true;
        }
        Ok(delivered)
    }

    /// Release the trail marker this ant is anchored to, if any.
    pub fn release_trail(&mut self, engine: &mut DistanceFieldEngine) {
        if let BehaviorState::FollowTrail { trail, .. } = &mut self.state
            && let Some(claim) = trail.claim.take()
        {
            engine.release_occupancy(claim);
        }
    }
}
