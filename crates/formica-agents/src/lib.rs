//! Ant state and decision-making for the Formica colony simulation.
//!
//! This crate holds everything that belongs to one ant: its caste
//! definition, what it carries, how it follows trails, how it fights, and
//! how it lives and dies. It reads the pheromone field from
//! `formica-world` and never mutates marker distances; the only field
//! writes an ant makes are occupancy claims, through the engine.
//!
//! # Modules
//!
//! - [`config`] -- Agent types, the injected type registry, and tunables
//! - [`inventory`] -- Bounded resource inventory
//! - [`strategy`] -- Explore, Gather, and Patrol trail strategies
//! - [`behavior`] -- Wander / `FollowTrail` / Combat state machine
//! - [`combat`] -- Hostile target selection and attack intents
//! - [`vitals`] -- Hunger, starvation, and eating
//! - [`death`] -- Death causes and consequences
//! - [`brood`] -- Egg laying and incubation
//! - [`agent`] -- The [`Agent`] struct
//! - [`error`] -- Error types

pub mod agent;
pub mod behavior;
pub mod brood;
pub mod combat;
pub mod config;
pub mod death;
pub mod error;
pub mod inventory;
pub mod strategy;
pub mod vitals;

pub use agent::Agent;
pub use behavior::{BehaviorContext, BehaviorOutcome, BehaviorState, NearbyAgent};
pub use brood::{Brood, Egg};
pub use combat::{AttackIntent, VisibleHostile};
pub use config::{AgentType, AgentTypeRegistry, BehaviorConfig, StrategyConfig, VitalsConfig};
pub use death::{DeathCause, DeathConsequences};
pub use error::AgentError;
pub use inventory::Inventory;
pub use strategy::{TrailDecision, TrailState, TrailStrategy};
