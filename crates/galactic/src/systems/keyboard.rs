use galactic_ecs::{Registry, SystemState};
use galactic_events::{EventBus, SubscriptionId};

use super::impl_system;
use crate::components::{KeyboardControlled, RigidBody};
use crate::events::KeyPressedEvent;

/// Sets the velocity of keyboard-controlled entities on key presses.
pub struct KeyboardControlSystem {
    state: SystemState,
}

impl KeyboardControlSystem {
    /// Requires [`KeyboardControlled`] and [`RigidBody`].
    #[must_use]
    pub fn new() -> Self {
        let mut state = SystemState::new();
        state.require_component::<KeyboardControlled>();
        state.require_component::<RigidBody>();
        Self { state }
    }

    /// Subscribes the key handler.
    pub fn subscribe(bus: &EventBus<Registry>) -> SubscriptionId {
        bus.subscribe_fn(Self::on_key_pressed)
    }

    /// Points every controlled entity in the key's direction at its speed.
    pub fn on_key_pressed(event: &mut KeyPressedEvent, _bus: &EventBus<Registry>, registry: &mut Registry) {
        let Ok(entities) = registry.system_entities::<Self>() else {
            return;
        };
        let direction = event.key.direction();

        for entity in entities {
            let Ok(control) = registry.get_component::<KeyboardControlled>(entity).copied() else {
                continue;
            };
            if let Ok(body) = registry.get_component_mut::<RigidBody>(entity) {
                body.velocity = [direction[0] * control.speed, direction[1] * control.speed];
            }
        }
    }
}

impl Default for KeyboardControlSystem {
    fn default() -> Self {
        Self::new()
    }
}

impl_system!(KeyboardControlSystem);

#[cfg(test)]
mod tests {
    use super::*;
    use crate::events::Key;
    use galactic_ecs::Layer;

    #[test]
    fn test_key_sets_velocity_of_controlled_entities() {
        let mut registry = Registry::new();
        registry.add_system(KeyboardControlSystem::new()).unwrap();
        let bus = EventBus::new();
        KeyboardControlSystem::subscribe(&bus);

        let player = registry
            .spawn(Layer::Player)
            .with(RigidBody::default())
            .with(KeyboardControlled { speed: 200.0 })
            .build();
        let drone = registry.spawn(Layer::Enemy).with(RigidBody::default()).build();
        registry.update();

        bus.publish(&mut registry, KeyPressedEvent { key: Key::Left });

        assert_eq!(registry.get_component::<RigidBody>(player).unwrap().velocity, [-200.0, 0.0]);
        assert_eq!(registry.get_component::<RigidBody>(drone).unwrap().velocity, [0.0, 0.0]);
    }
}
