use galactic_ecs::{Layer, Registry, SystemState};
use galactic_events::EventBus;

use super::impl_system;
use crate::components::{BoxCollider, Transform};
use crate::events::CollisionEvent;

/// Pairwise AABB test between hostile entities.
///
/// Only enemy/player and enemy/projectile pairs are tested. Entities
/// already queued for removal this tick (a bullet that hit something) are
/// skipped.
pub struct CollisionSystem {
    state: SystemState,
}

impl CollisionSystem {
    /// Requires [`Transform`] and [`BoxCollider`].
    #[must_use]
    pub fn new() -> Self {
        let mut state = SystemState::new();
        state.require_component::<Transform>();
        state.require_component::<BoxCollider>();
        Self { state }
    }

    /// True if entities on these layers can collide.
    #[must_use]
    pub fn is_hostile_pair(a: Layer, b: Layer) -> bool {
        matches!(
            (a, b),
            (Layer::Enemy, Layer::Player | Layer::Projectile)
                | (Layer::Player | Layer::Projectile, Layer::Enemy)
        )
    }

    /// Publishes a [`CollisionEvent`] for every overlapping hostile pair.
    /// Returns the number of events published.
    pub fn update(&self, registry: &mut Registry, bus: &EventBus<Registry>) -> usize {
        let entities = self.state.entities();
        let mut collisions = 0;

        for (i, &a) in entities.iter().enumerate() {
            for &b in &entities[i + 1..] {
                if !Self::is_hostile_pair(a.layer(), b.layer()) {
                    continue;
                }
                let consumed = registry.pending_removals();
                if consumed.contains(&a) || consumed.contains(&b) {
                    continue;
                }

                let (Ok(a_transform), Ok(a_box), Ok(b_transform), Ok(b_box)) = (
                    registry.get_component::<Transform>(a).copied(),
                    registry.get_component::<BoxCollider>(a).copied(),
                    registry.get_component::<Transform>(b).copied(),
                    registry.get_component::<BoxCollider>(b).copied(),
                ) else {
                    continue;
                };

                if a_box.overlaps(&a_transform, &b_box, &b_transform) {
                    tracing::debug!(a = %a.id(), b = %b.id(), "collision");
                    bus.publish(registry, CollisionEvent { a, b });
                    collisions += 1;
                }
            }
        }

        collisions
    }
}

impl Default for CollisionSystem {
    fn default() -> Self {
        Self::new()
    }
}

impl_system!(CollisionSystem);
