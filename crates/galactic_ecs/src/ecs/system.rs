//! # Systems
//!
//! A system declares the components it needs and keeps the list of
//! entities that currently satisfy them. The registry fills that list at
//! each commit; gameplay code may also add or remove entities directly.

use std::any::{type_name, Any};

use super::component::{Component, ComponentKind};
use super::entity::Entity;
use super::signature::Signature;

/// Required signature plus matched entities, embedded in every system.
#[derive(Clone, Debug, Default)]
pub struct SystemState {
    signature: Signature,
    entities: Vec<Entity>,
}

impl SystemState {
    /// Creates a state with no requirements and no entities.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds `T` to the required signature.
    ///
    /// Call this while constructing the system. Entities already matched
    /// are not re-evaluated.
    pub fn require_component<T: Component>(&mut self) {
        self.signature.set(ComponentKind::of::<T>());
    }

    /// The required signature.
    #[inline]
    #[must_use]
    pub fn signature(&self) -> Signature {
        self.signature
    }

    /// Appends `entity` to the matched list, immediately.
    pub fn add_entity(&mut self, entity: Entity) {
        self.entities.push(entity);
    }

    /// Removes every handle equal to `entity` from the matched list, immediately.
    pub fn remove_entity(&mut self, entity: Entity) {
        self.entities.retain(|other| *other != entity);
    }

    /// The matched entities, in their current order.
    #[inline]
    #[must_use]
    pub fn entities(&self) -> &[Entity] {
        &self.entities
    }

    /// True if `entity` is in the matched list.
    #[must_use]
    pub fn contains(&self, entity: Entity) -> bool {
        self.entities.contains(&entity)
    }

    /// Stable sort by layer, ascending. Ties keep their relative order.
    pub fn sort_by_layer(&mut self) {
        self.entities.sort_by_key(|entity| entity.layer());
    }

    pub(crate) fn clear_entities(&mut self) {
        self.entities.clear();
    }
}

/// A processor over entities that match a required signature.
///
/// Implementors embed a [`SystemState`] and expose it; per-tick logic is
/// plain inherent methods on the implementing type, driven by the frame
/// loop.
///
/// # Example
///
/// ```rust
/// use galactic_ecs::{Component, System, SystemState};
///
/// #[derive(Default)]
/// struct Velocity(f32);
/// impl Component for Velocity {}
///
/// struct Movement {
///     state: SystemState,
/// }
///
/// impl Movement {
///     fn new() -> Self {
///         let mut state = SystemState::new();
///         state.require_component::<Velocity>();
///         Self { state }
///     }
/// }
///
/// impl System for Movement {
///     fn state(&self) -> &SystemState { &self.state }
///     fn state_mut(&mut self) -> &mut SystemState { &mut self.state }
/// }
/// ```
pub trait System: 'static {
    /// Shared system state.
    fn state(&self) -> &SystemState;

    /// Mutable shared system state.
    fn state_mut(&mut self) -> &mut SystemState;

    /// Name used in logs and errors.
    fn name(&self) -> &'static str {
        type_name::<Self>()
    }
}

/// Object-safe wrapper the registry stores.
pub(crate) trait AnySystem {
    fn erased_state(&self) -> &SystemState;
    fn erased_state_mut(&mut self) -> &mut SystemState;
    fn as_any(&self) -> &dyn Any;
    fn as_any_mut(&mut self) -> &mut dyn Any;
    fn into_any(self: Box<Self>) -> Box<dyn Any>;
}

impl<S: System> AnySystem for S {
    fn erased_state(&self) -> &SystemState {
        self.state()
    }

    fn erased_state_mut(&mut self) -> &mut SystemState {
        self.state_mut()
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }

    fn into_any(self: Box<Self>) -> Box<dyn Any> {
        self
    }
}
