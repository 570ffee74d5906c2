//! # Entity Lifecycle Integration Test
//!
//! Drives the registry through create / kill / commit sequences and checks
//! id recycling, deferred visibility and matching from the outside.

use std::collections::HashSet;

use galactic_ecs::{Component, Entity, EntityId, Layer, Registry, System, SystemState};

#[derive(Default, Debug, Clone, Copy, PartialEq)]
struct Transform {
    x: f32,
    y: f32,
}
impl Component for Transform {}

#[derive(Default, Debug, Clone, Copy, PartialEq)]
struct RigidBody {
    vx: f32,
    vy: f32,
}
impl Component for RigidBody {}

#[derive(Default, Debug, Clone, Copy, PartialEq)]
struct Health(i32);
impl Component for Health {}

#[derive(Default, Debug, Clone, Copy, PartialEq)]
struct Tag(u8);
impl Component for Tag {}

macro_rules! system {
    ($name:ident: $($component:ty),+) => {
        struct $name {
            state: SystemState,
        }

        impl $name {
            fn new() -> Self {
                let mut state = SystemState::new();
                $(state.require_component::<$component>();)+
                Self { state }
            }
        }

        impl System for $name {
            fn state(&self) -> &SystemState {
                &self.state
            }
            fn state_mut(&mut self) -> &mut SystemState {
                &mut self.state
            }
        }
    };
}

system!(Movement: Transform, RigidBody);
system!(Vitals: Health);
system!(Tagged: Tag, Transform);

/// Test: the movement scenario end to end, including id reuse.
#[test]
fn test_movement_scenario() {
    let mut registry = Registry::new();
    let a = registry.create_entity(Layer::Player);
    registry.add_component(a, Transform::default());
    registry.add_component(a, RigidBody { vx: 1.0, vy: 0.0 });
    registry.add_system(Movement::new()).unwrap();

    registry.update();
    assert_eq!(registry.system_entities::<Movement>().unwrap(), vec![a]);

    registry.kill_entity(a);
    registry.update();
    assert!(registry.system_entities::<Movement>().unwrap().is_empty());

    let reused = registry.create_entity(Layer::Enemy);
    assert_eq!(reused.id(), a.id());
}

/// Test: an id is never handed out twice while its holder is alive or only
/// queued for removal.
#[test]
fn test_id_recycling_never_aliases() {
    let mut registry = Registry::new();
    let mut live: HashSet<EntityId> = HashSet::new();
    let mut queued: Vec<Entity> = Vec::new();
    let mut handles: Vec<Entity> = Vec::new();

    // Deterministic xorshift so the sequence is reproducible.
    let mut state = 0x2545_F491_u32;
    let mut next = || {
        state ^= state << 13;
        state ^= state >> 17;
        state ^= state << 5;
        state
    };

    for _ in 0..2_000 {
        match next() % 4 {
            0 | 1 => {
                let entity = registry.create_entity(Layer::Enemy);
                assert!(
                    live.insert(entity.id()),
                    "id {} handed out while still in use",
                    entity.id()
                );
                handles.push(entity);
            }
            2 if !handles.is_empty() => {
                let index = next() as usize % handles.len();
                let entity = handles.swap_remove(index);
                registry.kill_entity(entity);
                queued.push(entity);
            }
            _ => {
                registry.update();
                for entity in queued.drain(..) {
                    live.remove(&entity.id());
                }
            }
        }
    }

    assert_eq!(registry.live_entity_count(), live.len());
}

/// Test: has_component follows the net effect of add/remove calls.
#[test]
fn test_signature_tracks_add_remove() {
    let mut registry = Registry::new();
    let entity = registry.create_entity(Layer::Enemy);

    assert!(!registry.has_component::<Health>(entity));
    registry.add_component(entity, Health(3));
    assert!(registry.has_component::<Health>(entity));
    registry.remove_component::<Health>(entity);
    assert!(!registry.has_component::<Health>(entity));
    registry.add_component(entity, Health(9));
    registry.add_component(entity, Tag(1));
    registry.remove_component::<Tag>(entity);

    assert!(registry.has_component::<Health>(entity));
    assert!(!registry.has_component::<Tag>(entity));
    assert_eq!(registry.get_component::<Health>(entity), Ok(&Health(9)));
}

/// Test: membership after commit is exactly the subset relation.
#[test]
fn test_matching_is_subset_relation() {
    let mut registry = Registry::new();
    registry.add_system(Movement::new()).unwrap();
    registry.add_system(Vitals::new()).unwrap();
    registry.add_system(Tagged::new()).unwrap();

    let mut spawned = Vec::new();
    for mask in 0u8..16 {
        let entity = registry.create_entity(Layer::Enemy);
        if mask & 1 != 0 {
            registry.add_component(entity, Transform::default());
        }
        if mask & 2 != 0 {
            registry.add_component(entity, RigidBody::default());
        }
        if mask & 4 != 0 {
            registry.add_component(entity, Health(1));
        }
        if mask & 8 != 0 {
            registry.add_component(entity, Tag(mask));
        }
        spawned.push((entity, mask));
    }
    registry.update();

    let movement = registry.system_entities::<Movement>().unwrap();
    let vitals = registry.system_entities::<Vitals>().unwrap();
    let tagged = registry.system_entities::<Tagged>().unwrap();

    for (entity, mask) in spawned {
        assert_eq!(movement.contains(&entity), mask & 0b0011 == 0b0011);
        assert_eq!(vitals.contains(&entity), mask & 0b0100 == 0b0100);
        assert_eq!(tagged.contains(&entity), mask & 0b1001 == 0b1001);
    }
}

/// Test: a killed entity leaves every system and loses every component.
#[test]
fn test_kill_is_complete() {
    let mut registry = Registry::new();
    registry.add_system(Movement::new()).unwrap();
    registry.add_system(Vitals::new()).unwrap();

    let ship = registry
        .spawn(Layer::Enemy)
        .with(Transform::default())
        .with(RigidBody::default())
        .with(Health(10))
        .build();
    let bystander = registry.spawn(Layer::Enemy).with(Health(5)).build();
    registry.update();

    registry.kill_entity(ship);
    registry.update();

    assert!(registry.system_entities::<Movement>().unwrap().is_empty());
    assert_eq!(registry.system_entities::<Vitals>().unwrap(), vec![bystander]);
    assert!(!registry.has_component::<Transform>(ship));
    assert!(!registry.has_component::<RigidBody>(ship));
    assert!(!registry.has_component::<Health>(ship));
    assert!(!registry.is_alive(ship));
    assert_eq!(registry.create_entity(Layer::Gui).id(), ship.id());
}

/// Test: entities created in the same tick they are killed never reach a
/// system.
#[test]
fn test_create_and_kill_in_one_tick() {
    let mut registry = Registry::new();
    registry.add_system(Vitals::new()).unwrap();

    let flash = registry.spawn(Layer::Explosion).with(Health(1)).build();
    registry.kill_entity(flash);
    registry.update();

    assert!(registry.system_entities::<Vitals>().unwrap().is_empty());
    assert!(!registry.is_alive(flash));
}

/// Test: a system added after a commit only sees entities committed later.
#[test]
fn test_late_system_sees_only_new_entities() {
    let mut registry = Registry::new();
    let early = registry.spawn(Layer::Enemy).with(Health(1)).build();
    registry.update();

    registry.add_system(Vitals::new()).unwrap();
    let late = registry.spawn(Layer::Enemy).with(Health(1)).build();
    registry.update();

    let vitals = registry.system_entities::<Vitals>().unwrap();
    assert_eq!(vitals, vec![late]);
    assert!(!vitals.contains(&early));
}

/// Test: movement applied through a lent system updates components in
/// layer order.
#[test]
fn test_run_system_moves_entities() {
    let mut registry = Registry::new();
    registry.add_system(Movement::new()).unwrap();

    let bullet = registry
        .spawn(Layer::Projectile)
        .with(Transform::default())
        .with(RigidBody { vx: 0.0, vy: -10.0 })
        .build();
    let player = registry
        .spawn(Layer::Player)
        .with(Transform { x: 5.0, y: 5.0 })
        .with(RigidBody { vx: 2.0, vy: 0.0 })
        .build();
    registry.update();

    let order = registry
        .run_system::<Movement, _, _>(|movement, registry| {
            let mut order = Vec::new();
            for &entity in movement.state().entities() {
                let body = *registry.get_component::<RigidBody>(entity).unwrap();
                let transform = registry.get_component_mut::<Transform>(entity).unwrap();
                transform.x += body.vx * 0.5;
                transform.y += body.vy * 0.5;
                order.push(entity);
            }
            order
        })
        .unwrap();

    assert_eq!(order, vec![player, bullet]);
    assert_eq!(
        registry.get_component::<Transform>(player),
        Ok(&Transform { x: 6.0, y: 5.0 })
    );
    assert_eq!(
        registry.get_component::<Transform>(bullet),
        Ok(&Transform { x: 0.0, y: -5.0 })
    );
}
