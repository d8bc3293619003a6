//! Bounded resource inventory carried by an ant.
//!
//! Every ant carries resource units up to its type's `carry_capacity`.
//! Additions and removals use checked arithmetic -- no silent overflows,
//! no panics.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use formica_types::ResourceKind;

use crate::error::AgentError;

/// Multiset of resource units with a fixed upper bound on the total.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Inventory {
    capacity: u32,
    items: BTreeMap<ResourceKind, u32>,
}

impl Inventory {
    /// Create an empty inventory holding at most `capacity` units.
    pub const fn new(capacity: u32) -> Self {
        Self {
            capacity,
            items: BTreeMap::new(),
        }
    }

    /// Maximum number of units held at once.
    pub const fn capacity(&self) -> u32 {
        self.capacity
    }

    /// Units held per resource kind. Kinds with zero units are absent.
    pub const fn items(&self) -> &BTreeMap<ResourceKind, u32> {
        &self.items
    }

    /// Total units held.
    ///
    /// The total never exceeds `capacity`, so the sum cannot overflow.
    pub fn total(&self) -> u32 {
        self.items
            .values()
            .fold(0u32, |acc, qty| acc.saturating_add(*qty))
    }

    /// Remaining room before the inventory is full.
    pub fn space_left(&self) -> u32 {
        self.capacity.saturating_sub(self.total())
    }

    /// Whether the inventory holds no units.
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Whether the inventory is at capacity.
    ///
    /// A zero-capacity inventory is never considered full: castes that
    /// cannot carry do not switch into the loaded-return behavior.
    pub fn is_full(&self) -> bool {
        self.capacity > 0 && self.total() >= self.capacity
    }

    /// Units of `resource` held.
    pub fn amount(&self, resource: ResourceKind) -> u32 {
        self.items.get(&resource).copied().unwrap_or(0)
    }

    /// Add `amount` units of `resource`.
    ///
    /// Fails without changes if the result would exceed capacity.
    pub fn add(&mut self, resource: ResourceKind, amount: u32) -> Result<(), AgentError> {
        if amount == 0 {
            return Ok(());
        }
        let current_load = self.total();
        let overflow = || AgentError::InventoryOverflow {
            resource,
            attempted: amount,
            current_load,
            capacity: self.capacity,
        };
        let new_load = current_load.checked_add(amount).ok_or_else(overflow)?;
        if new_load > self.capacity {
            return Err(overflow());
        }
        let entry = self.items.entry(resource).or_insert(0);
        *entry = entry
            .checked_add(amount)
            .ok_or_else(|| AgentError::ArithmeticOverflow {
                context: String::from("individual resource quantity overflow"),
            })?;
        Ok(())
    }

    /// Remove `amount` units of `resource`.
    ///
    /// Fails without changes if fewer units are held.
    pub fn remove(&mut self, resource: ResourceKind, amount: u32) -> Result<(), AgentError> {
        let available = self.amount(resource);
        let remaining = available
            .checked_sub(amount)
            .ok_or(AgentError::InsufficientResource {
                resource,
                requested: amount,
                available,
            })?;
        if remaining == 0 {
            self.items.remove(&resource);
        } else {
            self.items.insert(resource, remaining);
        }
        Ok(())
    }

    /// Empty the inventory, returning everything it held.
    pub fn drain(&mut self) -> BTreeMap<ResourceKind, u32> {
        core::mem::take(&mut self.items)
    }
}
