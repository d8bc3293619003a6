//! The colony: home position and resource stockpile.
//!
//! The colony interior geometry lives in the field engine (it is the root
//! of every distance field). This module only tracks what the colony owns.
//! All stockpile arithmetic is checked.

use std::collections::BTreeMap;

use formica_types::{ResourceKind, Vec2};
use serde::{Deserialize, Serialize};

use crate::error::WorldError;

/// The player's colony.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Colony {
    /// World-space center of the nest (never moves).
    center: Vec2,
    /// Units of each resource held by the colony.
    stockpile: BTreeMap<ResourceKind, u32>,
}

impl Colony {
    /// Found a colony at `center` with a starting stockpile.
    pub fn new(center: Vec2, stockpile: BTreeMap<ResourceKind, u32>) -> Self {
        let stockpile = stockpile.into_iter().filter(|(_, qty)| *qty > 0).collect();
        Self { center, stockpile }
    }

    /// World-space center of the nest.
    pub const fn center(&self) -> Vec2 {
        self.center
    }

    /// Read-only view of the stockpile.
    pub const fn stockpile(&self) -> &BTreeMap<ResourceKind, u32> {
        &self.stockpile
    }

    /// Units of `resource` in the stockpile.
    pub fn amount(&self, resource: ResourceKind) -> u32 {
        self.stockpile.get(&resource).copied().unwrap_or(0)
    }

    /// Total units of edible resources in the stockpile.
    pub fn edible_total(&self) -> u32 {
        self.stockpile
            .iter()
            .filter(|(kind, _)| kind.is_edible())
            .map(|(_, qty)| *qty)
            .fold(0, u32::saturating_add)
    }

    /// Move every unit in `delivery` into the stockpile.
    ///
    /// Returns the number of units deposited.
    ///
    /// # Errors
    ///
    /// Returns [`WorldError::ArithmeticOverflow`] if a stockpile count
    /// would overflow; the stockpile is left unchanged in that case.
    pub fn deposit(&mut self, delivery: &BTreeMap<ResourceKind, u32>) -> Result<u32, WorldError> {
        let mut updated = self.stockpile.clone();
        let mut total: u32 = 0;
        for (&resource, &qty) in delivery {
            if qty == 0 {
                continue;
            }
            let entry = updated.entry(resource).or_insert(0);
            *entry = entry.checked_add(qty).ok_or(WorldError::ArithmeticOverflow)?;
            total = total.checked_add(qty).ok_or(WorldError::ArithmeticOverflow)?;
        }
        self.stockpile = updated;
        Ok(total)
    }

    /// Remove `amount` units of `resource`.
    ///
    /// # Errors
    ///
    /// Returns [`WorldError::InsufficientStockpile`] if the colony holds
    /// fewer than `amount` units.
    pub fn withdraw(&mut self, resource: ResourceKind, amount: u32) -> Result<(), WorldError> {
        let available = self.amount(resource);
        let remaining = available
            .checked_sub(amount)
            .ok_or(WorldError::InsufficientStockpile {
                resource,
                requested: amount,
                available,
            })?;
        if remaining == 0 {
            self.stockpile.remove(&resource);
        } else {
            self.stockpile.insert(resource, remaining);
        }
        Ok(())
    }

    /// Whether the stockpile covers every entry of `cost`.
    pub fn can_afford(&self, cost: &BTreeMap<ResourceKind, u32>) -> bool {
        cost.iter().all(|(&resource, &qty)| self.amount(resource) >= qty)
    }

    /// Pay `cost` in full or not at all. Returns whether it was paid.
    pub fn try_spend(&mut self, cost: &BTreeMap<ResourceKind, u32>) -> bool {
        if !self.can_afford(cost) {
            return false;
        }
        cost.iter()
            .all(|(&resource, &qty)| self.withdraw(resource, qty).is_ok())
    }

    /// Take one unit of the most plentiful edible resource, if any.
    pub fn take_edible(&mut self) -> Option<ResourceKind> {
        let resource = self
            .stockpile
            .iter()
            .filter(|(kind, qty)| kind.is_edible() && **qty > 0)
            .max_by_key(|(_, qty)| **qty)
            .map(|(kind, _)| *kind)?;
        self.withdraw(resource, 1).ok()?;
        Some(resource)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn colony_with(items: &[(ResourceKind, u32)]) -> Colony {
        Colony::new(Vec2::new(100.0, 100.0), items.iter().copied().collect())
    }

    #[test]
    fn deposit_adds_everything() {
        let mut colony = colony_with(&[(ResourceKind::Seed, 2)]);
        let delivery = BTreeMap::from([(ResourceKind::Seed, 3), (ResourceKind::Leaf, 1)]);
        assert_eq!(colony.deposit(&delivery).ok(), Some(4));
        assert_eq!(colony.amount(ResourceKind::Seed), 5);
        assert_eq!(colony.amount(ResourceKind::Leaf), 1);
    }

    #[test]
    fn deposit_overflow_leaves_stockpile_unchanged() {
        let mut colony = colony_with(&[(ResourceKind::Seed, u32::MAX), (ResourceKind::Leaf, 1)]);
        let delivery = BTreeMap::from([(ResourceKind::Leaf, 1), (ResourceKind::Seed, 1)]);
        assert!(colony.deposit(&delivery).is_err());
        assert_eq!(colony.amount(ResourceKind::Leaf), 1);
    }

    #[test]
    fn withdraw_insufficient_fails() {
        let mut colony = colony_with(&[(ResourceKind::Leaf, 1)]);
        assert!(matches!(
            colony.withdraw(ResourceKind::Leaf, 2),
            Err(WorldError::InsufficientStockpile { available: 1, .. })
        ));
        assert!(colony.withdraw(ResourceKind::Leaf, 1).is_ok());
        assert!(colony.stockpile().is_empty());
    }

    #[test]
    fn try_spend_is_all_or_nothing() {
        let mut colony = colony_with(&[(ResourceKind::Seed, 5), (ResourceKind::Leaf, 1)]);
        let cost = BTreeMap::from([(ResourceKind::Seed, 3), (ResourceKind::Leaf, 2)]);
        assert!(!colony.try_spend(&cost));
        assert_eq!(colony.amount(ResourceKind::Seed), 5);

        let cost = BTreeMap::from([(ResourceKind::Seed, 3), (ResourceKind::Leaf, 1)]);
        assert!(colony.try_spend(&cost));
        assert_eq!(colony.amount(ResourceKind::Seed), 2);
        assert_eq!(colony.amount(ResourceKind::Leaf), 0);
    }

    #[test]
    fn take_edible_prefers_most_plentiful() {
        let mut colony = colony_with(&[
            (ResourceKind::Seed, 1),
            (ResourceKind::Honeydew, 4),
            (ResourceKind::Leaf, 9),
        ]);
        assert_eq!(colony.take_edible(), Some(ResourceKind::Honeydew));
        assert_eq!(colony.edible_total(), 4);
    }

    #[test]
    fn take_edible_empty() {
        let mut colony = colony_with(&[(ResourceKind::Leaf, 9)]);
        assert_eq!(colony.take_edible(), None);
    }
}
