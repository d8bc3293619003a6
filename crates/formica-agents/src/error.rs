//! Error types for the formica-agents crate.
//!
//! All operations that can fail return typed errors rather than panicking.
//! This module defines the error hierarchy used across agent types,
//! inventory operations, brood management, and vital mechanics.

use formica_types::ResourceKind;
use formica_world::WorldError;

/// Errors that can occur during agent state operations.
#[derive(Debug, thiserror::Error)]
pub enum AgentError {
    /// Attempted to add resources that would exceed carry capacity.
    #[error("inventory overflow: adding {attempted} of {resource:?} would exceed capacity (current load: {current_load}, capacity: {capacity})")]
    InventoryOverflow {
        /// The resource type being added.
        resource: ResourceKind,
        /// The quantity the caller attempted to add.
        attempted: u32,
        /// The agent's current total load.
        current_load: u32,
        /// The agent's maximum carry capacity.
        capacity: u32,
    },

    /// Attempted to remove more of a resource than the agent holds.
    #[error("insufficient resource: wanted {requested} of {resource:?} but only have {available}")]
    InsufficientResource {
        /// The resource type being removed.
        resource: ResourceKind,
        /// The quantity the caller attempted to remove.
        requested: u32,
        /// The quantity the agent actually holds.
        available: u32,
    },

    /// An arithmetic overflow occurred during a vital computation.
    #[error("arithmetic overflow in agent computation: {context}")]
    ArithmeticOverflow {
        /// Description of what was being computed.
        context: String,
    },

    /// No agent type is registered under the given id.
    #[error("unknown agent type: {0}")]
    UnknownAgentType(String),

    /// Two agent types share an id.
    #[error("duplicate agent type id: {0}")]
    DuplicateAgentType(String),

    /// An agent type definition failed validation.
    #[error("invalid agent type {id}: {reason}")]
    InvalidAgentType {
        /// The offending type id.
        id: String,
        /// What is wrong with it.
        reason: String,
    },

    /// A tunable outside its valid range.
    #[error("invalid configuration: {reason}")]
    InvalidConfig {
        /// What is wrong with the configuration.
        reason: String,
    },

    /// The colony cannot pay for an egg of this type.
    #[error("colony cannot afford an egg of type {0}")]
    CannotAfford(String),

    /// A colony or field operation failed.
    #[error("world error: {source}")]
    World {
        /// The underlying world error.
        #[from]
        source: WorldError,
    },
}
