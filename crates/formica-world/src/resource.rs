//! Food sources scattered over the map.
//!
//! A [`FoodSource`] is a finite pile of one resource kind. Foragers inside
//! its pickup radius harvest units one at a time; exhausted piles are
//! swept at the end of each tick.

use std::collections::BTreeMap;

use formica_types::{FoodSourceId, ResourceKind, Vec2};
use serde::{Deserialize, Serialize};

/// A finite pile of one resource.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FoodSource {
    /// Identifier of the pile.
    pub id: FoodSourceId,
    /// Resource kind the pile yields.
    pub kind: ResourceKind,
    /// World-space center.
    pub position: Vec2,
    /// Units left.
    pub remaining: u32,
    /// Agents within this distance of `position` can harvest.
    pub pickup_radius: f32,
}

impl FoodSource {
    /// Create a new pile with a fresh identifier.
    pub fn new(kind: ResourceKind, position: Vec2, remaining: u32, pickup_radius: f32) -> Self {
        Self {
            id: FoodSourceId::new(),
            kind,
            position,
            remaining,
            pickup_radius,
        }
    }

    /// Whether `pos` is close enough to harvest.
    pub fn in_reach(&self, pos: Vec2) -> bool {
        self.position.distance(pos) <= self.pickup_radius
    }

    /// Deduct up to `requested` units, returning the amount actually taken.
    pub fn harvest(&mut self, requested: u32) -> u32 {
        let taken = requested.min(self.remaining);
        self.remaining = self.remaining.saturating_sub(taken);
        taken
    }

    /// Whether the pile is empty.
    pub const fn is_exhausted(&self) -> bool {
        self.remaining == 0
    }
}

/// All food sources on the map.
#[derive(Debug, Clone, Default)]
pub struct FoodField {
    sources: BTreeMap<FoodSourceId, FoodSource>,
}

impl FoodField {
    /// Create an empty field.
    pub const fn new() -> Self {
        Self {
            sources: BTreeMap::new(),
        }
    }

    /// Add a pile, returning its identifier.
    pub fn add(&mut self, source: FoodSource) -> FoodSourceId {
        let id = source.id;
        self.sources.insert(id, source);
        id
    }

    /// Look up a pile.
    pub fn get(&self, id: FoodSourceId) -> Option<&FoodSource> {
        self.sources.get(&id)
    }

    /// Iterate over every pile.
    pub fn iter(&self) -> impl Iterator<Item = &FoodSource> {
        self.sources.values()
    }

    /// Number of piles.
    pub fn len(&self) -> usize {
        self.sources.len()
    }

    /// Whether there are no piles.
    pub fn is_empty(&self) -> bool {
        self.sources.is_empty()
    }

    /// The nearest non-empty pile whose pickup radius covers `pos`.
    pub fn reachable_from(&self, pos: Vec2) -> Option<FoodSourceId> {
        self.sources
            .values()
            .filter(|s| !s.is_exhausted() && s.in_reach(pos))
            .min_by(|a, b| a.position.distance(pos).total_cmp(&b.position.distance(pos)))
            .map(|s| s.id)
    }

    /// Take up to `requested` units from a pile.
    ///
    /// Returns the resource kind and the units taken, or `None` if the pile
    /// does not exist or is empty.
    pub fn harvest(&mut self, id: FoodSourceId, requested: u32) -> Option<(ResourceKind, u32)> {
        let source = self.sources.get_mut(&id)?;
        let taken = source.harvest(requested);
        (taken > 0).then_some((source.kind, taken))
    }

    /// Remove exhausted piles, returning their identifiers.
    pub fn remove_exhausted(&mut self) -> Vec<FoodSourceId> {
        let exhausted: Vec<FoodSourceId> = self
            .sources
            .values()
            .filter(|s| s.is_exhausted())
            .map(|s| s.id)
            .collect();
        for id in &exhausted {
            self.sources.remove(id);
        }
        exhausted
    }
}
