//! # Entity Component System
//!
//! ## Design Philosophy
//!
//! - Component kinds get small integer ids on first use
//! - Each kind lives in its own dense pool, indexed by entity id
//! - Entity ids are plain indices, recycled FIFO after a committed kill
//! - Systems declare a required signature and keep their own matched list

mod component;
mod entity;
mod pool;
mod registry;
mod signature;
mod system;

pub use component::{Component, ComponentKind, ComponentKinds};
pub use entity::{Entity, EntityBuilder, EntityId, Layer};
pub use pool::{AnyPool, Pool};
pub use registry::Registry;
pub use signature::{Signature, MAX_COMPONENTS};
pub use system::{System, SystemState};
