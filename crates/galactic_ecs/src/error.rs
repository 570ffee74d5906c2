//! # ECS Error Types
//!
//! Everything the registry reports instead of handing out garbage.

use thiserror::Error;

use crate::ecs::EntityId;

/// Errors raised by the ECS.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum EcsError {
    /// A new component kind would exceed the signature width.
    ///
    /// This is a configuration error; [`crate::ComponentKind::of`] turns it
    /// into a panic.
    #[error("too many component kinds: the signature holds at most {limit}")]
    TooManyComponentKinds {
        /// The compile-time bound that was hit.
        limit: usize,
    },

    /// The entity's signature does not carry the requested component.
    #[error("entity {entity} has no {component} component")]
    MissingComponent {
        /// The entity that was queried.
        entity: EntityId,
        /// Type name of the missing component.
        component: &'static str,
    },

    /// No system of this type is registered.
    #[error("system not registered: {0}")]
    SystemNotFound(&'static str),

    /// A system of this type is already registered.
    #[error("system already registered: {0}")]
    SystemAlreadyRegistered(&'static str),

    /// The system is currently lent out through [`crate::Registry::run_system`].
    #[error("system is already running: {0}")]
    SystemInUse(&'static str),
}

/// Result type for ECS operations.
pub type EcsResult<T> = Result<T, EcsError>;
