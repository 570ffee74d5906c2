//! # Entity Management
//!
//! Entities are lightweight identifiers consisting of:
//! - An index into component pools and the signature table
//! - A layer tag used only for update/draw ordering
//!
//! An entity owns nothing. Every read or write goes through the
//! [`Registry`] that created it.

use std::cmp::Ordering;
use std::fmt;
use std::hash::{Hash, Hasher};

use super::component::Component;
use super::registry::Registry;

/// Index of an entity in the registry's tables.
///
/// Ids are recycled after a killed entity has been committed, so an id is
/// only unique among entities alive at the same time.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[repr(transparent)]
pub struct EntityId(u32);

impl EntityId {
    /// Wraps a raw index.
    #[inline]
    #[must_use]
    pub const fn new(index: u32) -> Self {
        Self(index)
    }

    /// The raw index.
    #[inline]
    #[must_use]
    pub const fn get(self) -> u32 {
        self.0
    }

    /// The raw index as a slot position.
    #[inline]
    #[must_use]
    pub const fn index(self) -> usize {
        self.0 as usize
    }
}

impl fmt::Display for EntityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Ordering group of an entity.
///
/// System entity lists are sorted by layer (ascending) at every commit that
/// adds entities, so lower layers are updated and drawn first.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Layer {
    /// Background tiles.
    #[default]
    TileMap,
    /// Explosion effects.
    Explosion,
    /// Enemy ships.
    Enemy,
    /// The player ship.
    Player,
    /// Bullets and lasers.
    Projectile,
    /// HUD and text.
    Gui,
}

/// Handle to an entity.
///
/// Equality, ordering and hashing use the id alone; the layer is carried
/// along so systems can sort without a registry lookup.
#[derive(Clone, Copy, Debug)]
pub struct Entity {
    id: EntityId,
    layer: Layer,
}

impl Entity {
    /// Creates a handle. Normally only the registry does this.
    #[inline]
    #[must_use]
    pub const fn new(id: EntityId, layer: Layer) -> Self {
        Self { id, layer }
    }

    /// The entity's id.
    #[inline]
    #[must_use]
    pub const fn id(self) -> EntityId {
        self.id
    }

    /// The entity's layer.
    #[inline]
    #[must_use]
    pub const fn layer(self) -> Layer {
        self.layer
    }
}

impl PartialEq for Entity {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for Entity {}

impl PartialOrd for Entity {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Entity {
    fn cmp(&self, other: &Self) -> Ordering {
        self.id.cmp(&other.id)
    }
}

impl Hash for Entity {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}

impl fmt::Display for Entity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "entity#{}", self.id)
    }
}

/// Attaches components to a freshly created entity.
///
/// Returned by [`Registry::spawn`]. The entity is already queued for the
/// next commit; the builder only borrows the registry so components can be
/// chained before it becomes visible to systems.
#[must_use = "call `build` to get the entity handle"]
pub struct EntityBuilder<'r> {
    registry: &'r mut Registry,
    entity: Entity,
}

impl<'r> EntityBuilder<'r> {
    pub(super) fn new(registry: &'r mut Registry, entity: Entity) -> Self {
        Self { registry, entity }
    }

    /// Adds `component` to the entity.
    pub fn with<T: Component>(self, component: T) -> Self {
        self.registry.add_component(self.entity, component);
        self
    }

    /// Finishes building and returns the handle.
    pub fn build(self) -> Entity {
        self.entity
    }
}
