//! Type-safe identifier wrappers around [`Uuid`].
//!
//! Every entity in the simulation has a strongly-typed ID to prevent
//! accidental mixing of identifiers at compile time. All IDs use UUID v7
//! (time-ordered), so comparing two IDs of the same type gives a stable
//! creation order. Patrol spreading relies on that ordering as its
//! per-agent priority key.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Generates a newtype wrapper around [`Uuid`] with standard derives.
macro_rules! define_id {
    (
        $(#[$meta:meta])*
        $name:ident
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
        pub struct $name(pub Uuid);

        impl $name {
            /// Create a new identifier using UUID v7 (time-ordered).
            pub fn new() -> Self {
                Self(Uuid::now_v7())
            }

            /// Return the inner [`Uuid`] value.
            pub const fn into_inner(self) -> Uuid {
                self.0
            }
        }

        impl Default for $name {
            fn default() -> Self {
                Self::new()
            }
        }

        impl core::fmt::Display for $name {
            fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl From<Uuid> for $name {
            fn from(id: Uuid) -> Self {
                Self(id)
            }
        }

        impl From<$name> for Uuid {
            fn from(id: $name) -> Self {
                id.0
            }
        }
    };
}

define_id! {
    /// Unique identifier for an ant in the simulation.
    AgentId
}

define_id! {
    /// Unique identifier for a hostile creature.
    HostileId
}

define_id! {
    /// Unique identifier for a food source on the map.
    FoodSourceId
}

define_id! {
    /// Unique identifier for an egg incubating in the brood chamber.
    EggId
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ids_are_distinct_types() {
        let agent = AgentId::new();
        let hostile = HostileId::new();
        assert_ne!(agent.into_inner(), Uuid::nil());
        assert_ne!(hostile.into_inner(), Uuid::nil());
    }

    #[test]
    fn ids_order_by_creation() {
        let first = AgentId::from(Uuid::from_u128(1));
        let second = AgentId::from(Uuid::from_u128(2));
        assert!(first < second);
    }

    #[test]
    fn display_matches_uuid() {
        let raw = Uuid::from_u128(42);
        assert_eq!(AgentId::from(raw).to_string(), raw.to_string());
    }
}
