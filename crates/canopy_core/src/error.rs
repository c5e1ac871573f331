//! # ECS Error Types
//!
//! Every failure the core can report. Most of these are contract
//! violations: the panicking accessors format them as the diagnostic,
//! the `try_*` accessors hand them back to the caller.

use thiserror::Error;

/// Errors raised by the entity registry, pools and systems.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum EcsError {
    /// A new component kind would not fit in the signature.
    #[error("component capacity exceeded: cannot register {component}, limit is {max} kinds")]
    ComponentCapacity {
        /// Type name of the component that did not fit.
        component: &'static str,
        /// Signature width.
        max: usize,
    },

    /// The entity does not hold the requested component.
    #[error("entity {entity} has no {component} component")]
    MissingComponent {
        /// Entity id.
        entity: u32,
        /// Type name of the component.
        component: &'static str,
    },

    /// The requested system kind is not registered.
    #[error("system {system} is not registered")]
    MissingSystem {
        /// Type name of the system.
        system: &'static str,
    },

    /// A structural change targeted an entity that is not live.
    #[error("entity {entity} is not alive")]
    DeadEntity {
        /// Entity id.
        entity: u32,
    },

    /// No entity carries the tag.
    #[error("no entity is tagged {0:?}")]
    UnknownTag(String),

    /// The group has no members.
    #[error("group {0:?} does not exist")]
    UnknownGroup(String),

    /// A pool lookup addressed an entity that is not stored in it.
    #[error("entity {0} is not stored in this pool")]
    EntityNotFound(u32),
}

/// Result type for ECS operations.
pub type EcsResult<T> = Result<T, EcsError>;
