use galactic_ecs::{Registry, SystemState};
use galactic_events::{EventBus, SubscriptionId};

use super::impl_system;
use crate::components::{Health, Projectile};
use crate::events::{CollisionEvent, DamageEvent, EntityDestroyedEvent};

/// Turns collisions into damage and damage into destruction.
///
/// Event handlers only move hit points. Entities are killed in
/// [`DamageSystem::update`], once per tick, so an entity hit several times
/// in one frame is destroyed exactly once.
pub struct DamageSystem {
    state: SystemState,
}

impl DamageSystem {
    /// Requires [`Health`].
    #[must_use]
    pub fn new() -> Self {
        let mut state = SystemState::new();
        state.require_component::<Health>();
        Self { state }
    }

    /// Subscribes the collision and damage handlers.
    ///
    /// # Arguments
    ///
    /// * `bus` - The frame loop's bus
    /// * `collision_damage` - Damage dealt by a ship-to-ship collision
    pub fn subscribe(bus: &EventBus<Registry>, collision_damage: i32) -> [SubscriptionId; 2] {
        [
            bus.subscribe_fn(move |event: &mut CollisionEvent, bus: &EventBus<Registry>, registry: &mut Registry| {
                Self::on_collision(event, bus, registry, collision_damage);
            }),
            bus.subscribe_fn(Self::on_damage),
        ]
    }

    /// Bullets are consumed; anything with health takes damage from the
    /// other side (the bullet's damage, or `collision_damage` for ships).
    pub fn on_collision(
        event: &mut CollisionEvent,
        bus: &EventBus<Registry>,
        registry: &mut Registry,
        collision_damage: i32,
    ) {
        for (target, other) in [(event.a, event.b), (event.b, event.a)] {
            if registry.has_component::<Projectile>(target) {
                registry.kill_entity(target);
                continue;
            }
            if registry.has_component::<Health>(target) {
                let amount = registry
                    .get_component::<Projectile>(other)
                    .map_or(collision_damage, |projectile| projectile.damage);
                bus.publish(registry, DamageEvent { target, amount });
            }
        }
    }

    /// Removes hit points. Damage to an already depleted entity is ignored.
    /// Hit points saturate at the `i32` range and never exceed the maximum.
    pub fn on_damage(event: &mut DamageEvent, _bus: &EventBus<Registry>, registry: &mut Registry) {
        let Ok(health) = registry.get_component_mut::<Health>(event.target) else {
            return;
        };
        if health.is_depleted() {
            return;
        }
        health.hit_points = health
            .hit_points
            .saturating_sub(event.amount)
            .min(health.max_hit_points);
        tracing::debug!(
            entity = %event.target.id(),
            amount = event.amount,
            remaining = health.hit_points,
            "damage applied"
        );
    }

    /// Kills every matched entity whose health is depleted and publishes an
    /// [`EntityDestroyedEvent`] for each. Returns how many were destroyed.
    pub fn update(&self, registry: &mut Registry, bus: &EventBus<Registry>) -> usize {
        let mut destroyed = 0;
        for &entity in self.state.entities() {
            let depleted = registry
                .get_component::<Health>(entity)
                .is_ok_and(Health::is_depleted);
            if !depleted || registry.pending_removals().contains(&entity) {
                continue;
            }

            registry.kill_entity(entity);
            tracing::info!(entity = %entity.id(), layer = ?entity.layer(), "entity destroyed");
            bus.publish(
                registry,
                EntityDestroyedEvent {
                    entity,
                    layer: entity.layer(),
                },
            );
            destroyed += 1;
        }
        destroyed
    }
}

impl Default for DamageSystem {
    fn default() -> Self {
        Self::new()
    }
}

impl_system!(DamageSystem);
