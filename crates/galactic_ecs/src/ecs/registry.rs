//! # Registry
//!
//! The central container for entities, component pools and systems.
//!
//! Creating and killing entities never touches system membership directly.
//! Both are queued and applied by [`Registry::update`], the single commit
//! point of a tick, so a system never sees its list change under a deferred
//! add or kill while it is iterating.

use std::any::{type_name, TypeId};
use std::collections::{HashMap, VecDeque};

use super::component::{Component, ComponentKind};
use super::entity::{Entity, EntityBuilder, EntityId, Layer};
use super::pool::{AnyPool, Pool};
use super::signature::Signature;
use super::system::{AnySystem, System, SystemState};
use crate::config::RegistryConfig;
use crate::error::{EcsError, EcsResult};

/// One registered system. `system` is `None` while lent out by
/// [`Registry::run_system`].
struct SystemSlot {
    type_id: TypeId,
    name: &'static str,
    system: Option<Box<dyn AnySystem>>,
}

/// Owner of all entities, component pools and systems.
///
/// # Example
///
/// ```rust
/// use galactic_ecs::{Component, Layer, Registry};
///
/// #[derive(Default, Debug, PartialEq)]
/// struct Health(u32);
/// impl Component for Health {}
///
/// let mut registry = Registry::new();
/// let ship = registry.create_entity(Layer::Player);
/// registry.add_component(ship, Health(100));
///
/// registry.get_component_mut::<Health>(ship).unwrap().0 -= 30;
/// assert_eq!(registry.get_component::<Health>(ship), Ok(&Health(70)));
/// ```
pub struct Registry {
    config: RegistryConfig,
    /// Next id to hand out when the free list is empty.
    entity_count: u32,
    /// Ids of committed kills, reused oldest first.
    free_ids: VecDeque<EntityId>,
    /// Component signature per entity id.
    signatures: Vec<Signature>,
    /// Whether each id belongs to a live entity.
    alive: Vec<bool>,
    /// One pool per component kind, created on first use.
    pools: Vec<Option<Box<dyn AnyPool>>>,
    /// Kinds that have a pool here, so lookups skip the global table.
    kinds: HashMap<TypeId, ComponentKind>,
    /// Systems in registration order.
    systems: Vec<SystemSlot>,
    /// Created since the last commit, in creation order.
    pending_add: Vec<Entity>,
    /// Killed since the last commit, in kill order.
    pending_remove: Vec<Entity>,
    player: Option<Entity>,
}

impl Registry {
    /// Creates an empty registry with the default configuration.
    #[must_use]
    pub fn new() -> Self {
        Self::with_config(RegistryConfig::default())
    }

    /// Creates an empty registry.
    #[must_use]
    pub fn with_config(config: RegistryConfig) -> Self {
        tracing::info!(
            reserve_entities = config.reserve_entities,
            sort_on_commit = config.sort_on_commit,
            "registry created"
        );
        Self {
            signatures: Vec::with_capacity(config.reserve_entities),
            alive: Vec::with_capacity(config.reserve_entities),
            config,
            entity_count: 0,
            free_ids: VecDeque::new(),
            pools: Vec::new(),
            kinds: HashMap::new(),
            systems: Vec::new(),
            pending_add: Vec::new(),
            pending_remove: Vec::new(),
            player: None,
        }
    }

    /// The configuration this registry was built with.
    #[must_use]
    pub fn config(&self) -> &RegistryConfig {
        &self.config
    }

    // =========================================================================
    // Entity lifecycle
    // =========================================================================

    /// Creates an entity on `layer`.
    ///
    /// Reuses the oldest freed id if there is one. The entity can take
    /// components right away but is invisible to systems until the next
    /// [`Registry::update`].
    ///
    /// # Panics
    ///
    /// Panics if the `u32` id space is exhausted.
    pub fn create_entity(&mut self, layer: Layer) -> Entity {
        let id = if let Some(id) = self.free_ids.pop_front() {
            id
        } else {
            let id = EntityId::new(self.entity_count);
            self.entity_count = self
                .entity_count
                .checked_add(1)
                .unwrap_or_else(|| panic!("entity id space exhausted"));
            self.signatures.push(Signature::empty());
            self.alive.push(false);
            id
        };

        self.alive[id.index()] = true;
        let entity = Entity::new(id, layer);
        self.pending_add.push(entity);

        tracing::debug!(entity = %id, ?layer, "entity created");
        entity
    }

    /// Creates an entity and returns a builder for chaining components.
    pub fn spawn(&mut self, layer: Layer) -> EntityBuilder<'_> {
        let entity = self.create_entity(layer);
        EntityBuilder::new(self, entity)
    }

    /// Queues `entity` for removal at the next commit.
    ///
    /// Until then it stays fully usable: components can still be read and
    /// written and systems still list it. Killing an entity twice before a
    /// commit queues it once; killing an id that is already free is ignored.
    pub fn kill_entity(&mut self, entity: Entity) {
        if !self.is_alive(entity) {
            tracing::warn!(entity = %entity.id(), "kill ignored: entity is not alive");
            return;
        }
        if self.pending_remove.contains(&entity) {
            return;
        }
        self.pending_remove.push(entity);
        tracing::debug!(entity = %entity.id(), "entity queued for removal");
    }

    /// True if the entity's id is live (created and not yet reclaimed).
    ///
    /// A handle kept past its entity's reclamation reports the liveness of
    /// whichever entity now holds that id.
    #[must_use]
    pub fn is_alive(&self, entity: Entity) -> bool {
        self.alive.get(entity.id().index()).copied().unwrap_or(false)
    }

    /// Number of live entities, including ones not yet committed.
    #[must_use]
    pub fn live_entity_count(&self) -> usize {
        self.alive.iter().filter(|alive| **alive).count()
    }

    /// Entities created since the last commit.
    #[must_use]
    pub fn pending_adds(&self) -> &[Entity] {
        &self.pending_add
    }

    /// Entities killed since the last commit.
    #[must_use]
    pub fn pending_removals(&self) -> &[Entity] {
        &self.pending_remove
    }

    /// Marks `entity` as the player.
    pub fn set_player_entity(&mut self, entity: Entity) {
        self.player = Some(entity);
    }

    /// The player entity, if one is set and has not been reclaimed.
    #[must_use]
    pub fn player_entity(&self) -> Option<Entity> {
        self.player
    }

    /// Forgets the player entity.
    pub fn clear_player_entity(&mut self) {
        self.player = None;
    }

    // =========================================================================
    // Components
    // =========================================================================

    /// Stores `component` for `entity` and sets its signature bit.
    ///
    /// Overwrites any previous value. Does not re-match systems; membership
    /// only changes at [`Registry::update`] for newly created entities.
    ///
    /// # Panics
    ///
    /// Panics if `entity` is not alive, or if `T` is a new kind and the
    /// signature is already full.
    pub fn add_component<T: Component>(&mut self, entity: Entity, component: T) {
        assert!(self.is_alive(entity), "add_component on dead {entity}");

        let kind = self.component_kind::<T>().unwrap_or_else(ComponentKind::of::<T>);
        let index = entity.id().index();
        let len = self.entity_count as usize;

        let pool = self.pool_or_insert::<T>(kind);
        pool.resize(len);
        pool.set(index, component);
        self.signatures[index].set(kind);

        tracing::debug!(
            entity = %entity.id(),
            kind = kind.index(),
            component = type_name::<T>(),
            "component added"
        );
    }

    /// Clears `T`'s signature bit for `entity`. The pool slot is left as is.
    ///
    /// # Panics
    ///
    /// Panics if `entity` is not alive.
    pub fn remove_component<T: Component>(&mut self, entity: Entity) {
        assert!(self.is_alive(entity), "remove_component on dead {entity}");

        let Some(kind) = self.component_kind::<T>() else {
            return;
        };
        self.signatures[entity.id().index()].clear(kind);

        tracing::debug!(
            entity = %entity.id(),
            kind = kind.index(),
            component = type_name::<T>(),
            "component removed"
        );
    }

    /// True if `entity`'s signature has `T`'s bit set.
    #[must_use]
    pub fn has_component<T: Component>(&self, entity: Entity) -> bool {
        self.present_kind::<T>(entity).is_some()
    }

    /// Reads `T` for `entity`.
    ///
    /// # Errors
    ///
    /// Returns [`EcsError::MissingComponent`] if the entity does not have `T`.
    pub fn get_component<T: Component>(&self, entity: Entity) -> EcsResult<&T> {
        let kind = self
            .present_kind::<T>(entity)
            .ok_or_else(|| missing::<T>(entity))?;
        self.pools
            .get(kind.index())
            .and_then(Option::as_ref)
            .and_then(|pool| pool.as_any().downcast_ref::<Pool<T>>())
            .and_then(|pool| pool.get(entity.id().index()))
            .ok_or_else(|| missing::<T>(entity))
    }

    /// Mutable access to `T` for `entity`.
    ///
    /// The reference must not be held across a call that can grow `T`'s
    /// pool.
    ///
    /// # Errors
    ///
    /// Returns [`EcsError::MissingComponent`] if the entity does not have `T`.
    pub fn get_component_mut<T: Component>(&mut self, entity: Entity) -> EcsResult<&mut T> {
        let kind = self
            .present_kind::<T>(entity)
            .ok_or_else(|| missing::<T>(entity))?;
        self.pools
            .get_mut(kind.index())
            .and_then(Option::as_mut)
            .and_then(|pool| pool.as_any_mut().downcast_mut::<Pool<T>>())
            .and_then(|pool| pool.get_mut(entity.id().index()))
            .ok_or_else(|| missing::<T>(entity))
    }

    /// The current signature of `entity` (empty for unknown ids).
    #[must_use]
    pub fn signature_of(&self, entity: Entity) -> Signature {
        self.signatures
            .get(entity.id().index())
            .copied()
            .unwrap_or_default()
    }

    /// Number of component kinds that have a pool in this registry.
    #[must_use]
    pub fn component_kinds_in_use(&self) -> usize {
        self.pools.iter().filter(|pool| pool.is_some()).count()
    }

    /// Kind id of `T` if this registry has a pool for it.
    ///
    /// Answered from a per-registry cache; the process-wide kind table is
    /// only consulted when a pool is first created.
    #[must_use]
    pub fn component_kind<T: Component>(&self) -> Option<ComponentKind> {
        self.kinds.get(&TypeId::of::<T>()).copied()
    }

    fn present_kind<T: Component>(&self, entity: Entity) -> Option<ComponentKind> {
        let kind = self.component_kind::<T>()?;
        self.signature_of(entity).test(kind).then_some(kind)
    }

    fn pool_or_insert<T: Component>(&mut self, kind: ComponentKind) -> &mut Pool<T> {
        let index = kind.index();
        if index >= self.pools.len() {
            self.pools.resize_with(index + 1, || None);
        }

        self.kinds.entry(TypeId::of::<T>()).or_insert(kind);

        let reserve = self.config.reserve_entities;
        let slot = self.pools[index].get_or_insert_with(|| {
            tracing::debug!(kind = index, component = type_name::<T>(), "pool created");
            Box::new(Pool::<T>::with_capacity(reserve))
        });

        match slot.as_any_mut().downcast_mut::<Pool<T>>() {
            Some(pool) => pool,
            None => unreachable!("pool {index} does not hold {}", type_name::<T>()),
        }
    }

    // =========================================================================
    // Systems
    // =========================================================================

    /// Registers `system`. Only entities committed after this call are
    /// matched against it.
    ///
    /// # Errors
    ///
    /// Returns [`EcsError::SystemAlreadyRegistered`] if a system of type `S`
    /// is already present.
    pub fn add_system<S: System>(&mut self, system: S) -> EcsResult<()> {
        if self.has_system::<S>() {
            return Err(EcsError::SystemAlreadyRegistered(type_name::<S>()));
        }

        let name = system.name();
        tracing::debug!(system = name, signature = ?system.state().signature(), "system added");
        self.systems.push(SystemSlot {
            type_id: TypeId::of::<S>(),
            name,
            system: Some(Box::new(system)),
        });
        Ok(())
    }

    /// Unregisters the system of type `S` and hands it back.
    ///
    /// # Errors
    ///
    /// Returns [`EcsError::SystemNotFound`] if there is none, or
    /// [`EcsError::SystemInUse`] if it is currently lent out.
    pub fn remove_system<S: System>(&mut self) -> EcsResult<S> {
        let position = self.position_of::<S>()?;
        if self.systems[position].system.is_none() {
            return Err(EcsError::SystemInUse(type_name::<S>()));
        }

        let slot = self.systems.remove(position);
        tracing::debug!(system = slot.name, "system removed");
        match slot.system.map(|system| system.into_any().downcast::<S>()) {
            Some(Ok(system)) => Ok(*system),
            _ => unreachable!("system slot does not hold {}", type_name::<S>()),
        }
    }

    /// True if a system of type `S` is registered.
    #[must_use]
    pub fn has_system<S: System>(&self) -> bool {
        self.position_of::<S>().is_ok()
    }

    /// Shared access to the system of type `S`.
    ///
    /// # Errors
    ///
    /// Returns [`EcsError::SystemNotFound`] or [`EcsError::SystemInUse`].
    pub fn get_system<S: System>(&self) -> EcsResult<&S> {
        let position = self.position_of::<S>()?;
        self.systems[position]
            .system
            .as_ref()
            .and_then(|system| system.as_any().downcast_ref::<S>())
            .ok_or(EcsError::SystemInUse(type_name::<S>()))
    }

    /// Mutable access to the system of type `S`.
    ///
    /// # Errors
    ///
    /// Returns [`EcsError::SystemNotFound`] or [`EcsError::SystemInUse`].
    pub fn get_system_mut<S: System>(&mut self) -> EcsResult<&mut S> {
        let position = self.position_of::<S>()?;
        self.systems[position]
            .system
            .as_mut()
            .and_then(|system| system.as_any_mut().downcast_mut::<S>())
            .ok_or(EcsError::SystemInUse(type_name::<S>()))
    }

    /// Copy of the entity list of the system of type `S`.
    ///
    /// # Errors
    ///
    /// Returns [`EcsError::SystemNotFound`] or [`EcsError::SystemInUse`].
    pub fn system_entities<S: System>(&self) -> EcsResult<Vec<Entity>> {
        Ok(self.get_system::<S>()?.state().entities().to_vec())
    }

    /// Lends the system of type `S` to `f` together with the registry.
    ///
    /// While `f` runs the system is out of the registry: commit matching
    /// skips it and looking it up reports [`EcsError::SystemInUse`]. Other
    /// systems stay reachable, so `f` may add or remove entities on them.
    /// `f` must not call [`Registry::update`]; doing so panics.
    ///
    /// # Errors
    ///
    /// Returns [`EcsError::SystemNotFound`] or [`EcsError::SystemInUse`].
    pub fn run_system<S, R, F>(&mut self, f: F) -> EcsResult<R>
    where
        S: System,
        F: FnOnce(&mut S, &mut Registry) -> R,
    {
        let position = self.position_of::<S>()?;
        let mut lent = self.systems[position]
            .system
            .take()
            .ok_or(EcsError::SystemInUse(type_name::<S>()))?;

        let result = match lent.as_any_mut().downcast_mut::<S>() {
            Some(system) => f(system, self),
            None => unreachable!("system slot does not hold {}", type_name::<S>()),
        };

        // `f` may have added or removed other systems, so look the slot up again.
        let type_id = TypeId::of::<S>();
        if let Some(slot) = self.systems.iter_mut().find(|slot| slot.type_id == type_id) {
            slot.system = Some(lent);
        }
        Ok(result)
    }

    /// Number of registered systems.
    #[must_use]
    pub fn system_count(&self) -> usize {
        self.systems.len()
    }

    fn position_of<S: System>(&self) -> EcsResult<usize> {
        let type_id = TypeId::of::<S>();
        self.systems
            .iter()
            .position(|slot| slot.type_id == type_id)
            .ok_or(EcsError::SystemNotFound(type_name::<S>()))
    }

    fn states_mut(&mut self) -> impl Iterator<Item = &mut SystemState> {
        self.systems
            .iter_mut()
            .filter_map(|slot| slot.system.as_mut())
            .map(|system| system.erased_state_mut())
    }

    // =========================================================================
    // Commit point
    // =========================================================================

    /// Applies pending creations and kills to system membership.
    ///
    /// Call exactly once per tick, before any system runs:
    /// 1. every created entity joins each system whose signature it contains,
    ///    entities in creation order and systems in registration order
    /// 2. if anything joined, every system list is stably sorted by layer
    /// 3. every killed entity leaves every system, its signature is cleared
    ///    and its id goes to the back of the free list
    ///
    /// # Panics
    ///
    /// Panics if called while a system is lent out by
    /// [`Registry::run_system`].
    pub fn update(&mut self) {
        assert!(
            self.systems.iter().all(|slot| slot.system.is_some()),
            "Registry::update called while a system is lent out"
        );

        let added = std::mem::take(&mut self.pending_add);
        for &entity in &added {
            self.add_entity_to_systems(entity);
        }
        if !added.is_empty() && self.config.sort_on_commit {
            for state in self.states_mut() {
                state.sort_by_layer();
            }
            tracing::trace!(added = added.len(), "system entities sorted by layer");
        }

        let removed = std::mem::take(&mut self.pending_remove);
        for &entity in &removed {
            for state in self.states_mut() {
                state.remove_entity(entity);
            }

            let index = entity.id().index();
            self.signatures[index].reset();
            self.alive[index] = false;
            self.free_ids.push_back(entity.id());
            if self.player == Some(entity) {
                self.player = None;
            }

            tracing::debug!(entity = %entity.id(), "entity id freed");
        }
    }

    fn add_entity_to_systems(&mut self, entity: Entity) {
        let signature = self.signature_of(entity);
        for slot in &mut self.systems {
            let Some(system) = slot.system.as_mut() else {
                continue;
            };
            let state = system.erased_state_mut();
            if signature.contains(state.signature()) {
                state.add_entity(entity);
                tracing::trace!(entity = %entity.id(), system = slot.name, "entity matched");
            }
        }
    }

    // =========================================================================
    // Teardown
    // =========================================================================

    /// Drops every entity and component and empties every system list.
    ///
    /// Systems stay registered. Ids start again from zero.
    pub fn clear(&mut self) {
        for pool in self.pools.iter_mut().flatten() {
            pool.clear();
        }
        for state in self.states_mut() {
            state.clear_entities();
        }
        self.signatures.clear();
        self.alive.clear();
        self.free_ids.clear();
        self.pending_add.clear();
        self.pending_remove.clear();
        self.entity_count = 0;
        self.player = None;

        tracing::info!("registry cleared");
    }
}

impl Default for Registry {
    fn default() -> Self {
        Self::new()
    }
}

fn missing<T>(entity: Entity) -> EcsError {
    EcsError::MissingComponent {
        entity: entity.id(),
        component: type_name::<T>(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Default, Debug, PartialEq, Clone, Copy)]
    struct Transform {
        x: f32,
        y: f32,
    }
    impl Component for Transform {}

    #[derive(Default, Debug, PartialEq, Clone, Copy)]
    struct RigidBody {
        vx: f32,
        vy: f32,
    }
    impl Component for RigidBody {}

    #[derive(Default, Debug, PartialEq)]
    struct Sprite(&'static str);
    impl Component for Sprite {}

    struct Movement {
        state: SystemState,
    }

    impl Movement {
        fn new() -> Self {
            let mut state = SystemState::new();
            state.require_component::<Transform>();
            state.require_component::<RigidBody>();
            Self { state }
        }

        fn update(&self, registry: &mut Registry, dt: f32) {
            for entity in self.state.entities() {
                let body = *registry.get_component::<RigidBody>(*entity).unwrap();
                let transform = registry.get_component_mut::<Transform>(*entity).unwrap();
                transform.x += body.vx * dt;
                transform.y += body.vy * dt;
            }
        }
    }

    impl System for Movement {
        fn state(&self) -> &SystemState {
            &self.state
        }
        fn state_mut(&mut self) -> &mut SystemState {
            &mut self.state
        }
    }

    struct Render {
        state: SystemState,
    }

    impl Render {
        fn new() -> Self {
            let mut state = SystemState::new();
            state.require_component::<Sprite>();
            Self { state }
        }
    }

    impl System for Render {
        fn state(&self) -> &SystemState {
            &self.state
        }
        fn state_mut(&mut self) -> &mut SystemState {
            &mut self.state
        }
    }

    fn moving(registry: &mut Registry, layer: Layer) -> Entity {
        registry
            .spawn(layer)
            .with(Transform::default())
            .with(RigidBody { vx: 1.0, vy: 2.0 })
            .build()
    }

    #[test]
    fn test_ids_allocate_sequentially() {
        let mut registry = Registry::new();
        let a = registry.create_entity(Layer::Enemy);
        let b = registry.create_entity(Layer::Enemy);
        assert_eq!(a.id().get(), 0);
        assert_eq!(b.id().get(), 1);
        assert_eq!(registry.live_entity_count(), 2);
        assert_eq!(registry.pending_adds(), &[a, b]);
    }

    #[test]
    fn test_component_roundtrip_and_overwrite() {
        let mut registry = Registry::new();
        let entity = registry.create_entity(Layer::Player);

        registry.add_component(entity, Transform { x: 1.0, y: 2.0 });
        assert!(registry.has_component::<Transform>(entity));
        assert_eq!(
            registry.get_component::<Transform>(entity),
            Ok(&Transform { x: 1.0, y: 2.0 })
        );

        registry.add_component(entity, Transform { x: 5.0, y: 6.0 });
        assert_eq!(
            registry.get_component::<Transform>(entity),
            Ok(&Transform { x: 5.0, y: 6.0 })
        );
    }

    #[test]
    fn test_missing_component_is_an_error() {
        let mut registry = Registry::new();
        let entity = registry.create_entity(Layer::Player);

        let err = registry.get_component::<Sprite>(entity).unwrap_err();
        assert!(matches!(err, EcsError::MissingComponent { entity: id, .. } if id == entity.id()));

        registry.add_component(entity, Sprite("ship"));
        registry.remove_component::<Sprite>(entity);
        assert!(!registry.has_component::<Sprite>(entity));
        assert!(registry.get_component_mut::<Sprite>(entity).is_err());
    }

    #[test]
    fn test_remove_keeps_pool_slot() {
        let mut registry = Registry::new();
        let entity = registry.create_entity(Layer::Player);
        registry.add_component(entity, Sprite("ship"));
        registry.remove_component::<Sprite>(entity);

        // Re-adding overwrites whatever the slot held.
        registry.add_component(entity, Sprite("wreck"));
        assert_eq!(registry.get_component::<Sprite>(entity), Ok(&Sprite("wreck")));
    }

    #[test]
    fn test_deferred_visibility() {
        let mut registry = Registry::new();
        registry.add_system(Movement::new()).unwrap();

        let entity = moving(&mut registry, Layer::Enemy);
        assert!(registry.system_entities::<Movement>().unwrap().is_empty());

        registry.update();
        assert_eq!(registry.system_entities::<Movement>().unwrap(), vec![entity]);
    }

    #[test]
    fn test_matching_ignores_extra_components() {
        let mut registry = Registry::new();
        registry.add_system(Movement::new()).unwrap();
        registry.add_system(Render::new()).unwrap();

        let both = registry
            .spawn(Layer::Enemy)
            .with(Transform::default())
            .with(RigidBody::default())
            .with(Sprite("enemy"))
            .build();
        let only_transform = registry.spawn(Layer::Enemy).with(Transform::default()).build();
        registry.update();

        assert_eq!(registry.system_entities::<Movement>().unwrap(), vec![both]);
        assert_eq!(registry.system_entities::<Render>().unwrap(), vec![both]);
        assert!(!registry
            .get_system::<Movement>()
            .unwrap()
            .state()
            .contains(only_transform));
    }

    #[test]
    fn test_kill_frees_id_after_commit_only() {
        let mut registry = Registry::new();
        registry.add_system(Movement::new()).unwrap();
        let a = moving(&mut registry, Layer::Enemy);
        registry.update();

        registry.kill_entity(a);
        // Still valid until the commit.
        assert!(registry.has_component::<Transform>(a));
        assert_eq!(registry.system_entities::<Movement>().unwrap(), vec![a]);
        let b = registry.create_entity(Layer::Enemy);
        assert_ne!(b.id(), a.id());

        registry.update();
        assert!(registry.system_entities::<Movement>().unwrap().is_empty());
        assert!(!registry.has_component::<Transform>(a));
        assert!(registry.signature_of(a).is_empty());

        let c = registry.create_entity(Layer::Enemy);
        assert_eq!(c.id(), a.id());
    }

    #[test]
    fn test_free_ids_are_fifo() {
        let mut registry = Registry::new();
        let a = registry.create_entity(Layer::Enemy);
        let b = registry.create_entity(Layer::Enemy);
        registry.update();

        registry.kill_entity(b);
        registry.kill_entity(a);
        registry.update();

        assert_eq!(registry.create_entity(Layer::Enemy).id(), b.id());
        assert_eq!(registry.create_entity(Layer::Enemy).id(), a.id());
        assert_eq!(registry.create_entity(Layer::Enemy).id().get(), 2);
    }

    #[test]
    fn test_double_kill_queues_once() {
        let mut registry = Registry::new();
        let a = registry.create_entity(Layer::Enemy);
        registry.update();

        registry.kill_entity(a);
        registry.kill_entity(a);
        assert_eq!(registry.pending_removals(), &[a]);
        registry.update();

        // Already free: ignored, so the id cannot be handed out twice.
        registry.kill_entity(a);
        registry.update();
        let first = registry.create_entity(Layer::Enemy);
        let second = registry.create_entity(Layer::Enemy);
        assert_ne!(first.id(), second.id());
    }

    #[test]
    fn test_commit_sorts_by_layer() {
        let mut registry = Registry::new();
        registry.add_system(Movement::new()).unwrap();
        let projectile = moving(&mut registry, Layer::Projectile);
        let player = moving(&mut registry, Layer::Player);
        let tile = moving(&mut registry, Layer::TileMap);
        registry.update();

        assert_eq!(
            registry.system_entities::<Movement>().unwrap(),
            vec![tile, player, projectile]
        );
    }

    #[test]
    fn test_sort_can_be_disabled() {
        let mut registry = Registry::with_config(RegistryConfig {
            reserve_entities: 4,
            sort_on_commit: false,
        });
        registry.add_system(Movement::new()).unwrap();
        let projectile = moving(&mut registry, Layer::Projectile);
        let tile = moving(&mut registry, Layer::TileMap);
        registry.update();

        assert_eq!(
            registry.system_entities::<Movement>().unwrap(),
            vec![projectile, tile]
        );
    }

    #[test]
    fn test_system_lookup_errors() {
        let mut registry = Registry::new();
        assert!(!registry.has_system::<Movement>());
        assert!(matches!(
            registry.get_system::<Movement>(),
            Err(EcsError::SystemNotFound(_))
        ));

        registry.add_system(Movement::new()).unwrap();
        assert!(matches!(
            registry.add_system(Movement::new()),
            Err(EcsError::SystemAlreadyRegistered(_))
        ));

        let removed = registry.remove_system::<Movement>().unwrap();
        assert!(removed.state().entities().is_empty());
        assert!(!registry.has_system::<Movement>());
        assert_eq!(registry.system_count(), 0);
    }

    #[test]
    fn test_run_system_lends_registry() {
        let mut registry = Registry::new();
        registry.add_system(Movement::new()).unwrap();
        let entity = moving(&mut registry, Layer::Enemy);
        registry.update();

        registry
            .run_system::<Movement, _, _>(|movement, registry| {
                assert!(matches!(
                    registry.get_system::<Movement>(),
                    Err(EcsError::SystemInUse(_))
                ));
                movement.update(registry, 0.5);
            })
            .unwrap();

        assert_eq!(
            registry.get_component::<Transform>(entity),
            Ok(&Transform { x: 0.5, y: 1.0 })
        );
        assert!(registry.has_system::<Movement>());
        assert!(registry.get_system::<Movement>().is_ok());
    }

    #[test]
    fn test_direct_membership_edits_are_immediate() {
        let mut registry = Registry::new();
        registry.add_system(Movement::new()).unwrap();
        let entity = moving(&mut registry, Layer::Enemy);
        registry.update();

        registry
            .get_system_mut::<Movement>()
            .unwrap()
            .state_mut()
            .remove_entity(entity);
        assert!(registry.system_entities::<Movement>().unwrap().is_empty());
        assert!(registry.is_alive(entity));
    }

    #[test]
    fn test_player_slot_cleared_on_reclaim() {
        let mut registry = Registry::new();
        let player = registry.create_entity(Layer::Player);
        registry.set_player_entity(player);
        registry.update();
        assert_eq!(registry.player_entity(), Some(player));

        registry.kill_entity(player);
        registry.update();
        assert_eq!(registry.player_entity(), None);
    }

    #[test]
    fn test_clear_resets_everything() {
        let mut registry = Registry::new();
        registry.add_system(Movement::new()).unwrap();
        moving(&mut registry, Layer::Enemy);
        moving(&mut registry, Layer::Enemy);
        registry.update();
        assert!(registry.component_kinds_in_use() >= 2);

        registry.clear();
        assert_eq!(registry.live_entity_count(), 0);
        assert!(registry.system_entities::<Movement>().unwrap().is_empty());
        assert_eq!(registry.create_entity(Layer::Enemy).id().get(), 0);
    }

    #[test]
    #[should_panic(expected = "add_component on dead")]
    fn test_add_component_to_dead_entity_panics() {
        let mut registry = Registry::new();
        let entity = registry.create_entity(Layer::Enemy);
        registry.kill_entity(entity);
        registry.update();
        registry.add_component(entity, Sprite("ghost"));
    }

    #[test]
    #[should_panic(expected = "while a system is lent out")]
    fn test_commit_inside_run_system_panics() {
        let mut registry = Registry::new();
        registry.add_system(Movement::new()).unwrap();
        moving(&mut registry, Layer::Enemy);

        let _ = registry.run_system::<Movement, _, _>(|_, registry| registry.update());
    }

    #[test]
    fn test_component_kinds_are_cached_per_registry() {
        let mut first = Registry::new();
        let second = Registry::new();
        let entity = first.spawn(Layer::Enemy).with(Sprite("ship")).build();

        assert_eq!(first.component_kind::<Sprite>(), Some(ComponentKind::of::<Sprite>()));
        assert_eq!(second.component_kind::<Sprite>(), None);
        assert!(first.has_component::<Sprite>(entity));
        assert!(!second.has_component::<Sprite>(entity));
    }
}
