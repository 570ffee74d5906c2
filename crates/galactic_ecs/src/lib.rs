//! # Galactic ECS
//!
//! Signature-matched Entity Component System with deferred entity commits.
//!
//! ## Architecture Rules
//!
//! 1. **One pool per component kind** - slots are indexed by entity id
//! 2. **Presence lives in the signature** - pools never decide whether an entity has a component
//! 3. **One commit point per tick** - [`Registry::update`] is the only place system membership changes
//!    for created and killed entities
//!
//! ## Example
//!
//! ```rust
//! use galactic_ecs::{Component, Layer, Registry, System, SystemState};
//!
//! #[derive(Default)]
//! struct Position(f32, f32);
//! impl Component for Position {}
//!
//! struct Drift { state: SystemState }
//! impl Drift {
//!     fn new() -> Self {
//!         let mut state = SystemState::new();
//!         state.require_component::<Position>();
//!         Self { state }
//!     }
//! }
//! impl System for Drift {
//!     fn state(&self) -> &SystemState { &self.state }
//!     fn state_mut(&mut self) -> &mut SystemState { &mut self.state }
//! }
//!
//! let mut registry = Registry::new();
//! registry.add_system(Drift::new()).unwrap();
//!
//! let ship = registry.spawn(Layer::Player).with(Position(1.0, 2.0)).build();
//! assert!(registry.system_entities::<Drift>().unwrap().is_empty());
//!
//! registry.update();
//! assert_eq!(registry.system_entities::<Drift>().unwrap(), vec![ship]);
//! ```

#![deny(unsafe_code)]
#![warn(missing_docs)]

pub mod config;
pub mod ecs;
pub mod error;

pub use config::RegistryConfig;
pub use ecs::{
    AnyPool, Component, ComponentKind, ComponentKinds, Entity, EntityBuilder, EntityId, Layer,
    Pool, Registry, Signature, System, SystemState, MAX_COMPONENTS,
};
pub use error::{EcsError, EcsResult};
