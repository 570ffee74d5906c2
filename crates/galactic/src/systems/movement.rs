use galactic_ecs::{Registry, SystemState};

use super::impl_system;
use crate::components::{RigidBody, Transform};

/// Integrates velocity into position.
pub struct MovementSystem {
    state: SystemState,
}

impl MovementSystem {
    /// Requires [`Transform`] and [`RigidBody`].
    #[must_use]
    pub fn new() -> Self {
        let mut state = SystemState::new();
        state.require_component::<Transform>();
        state.require_component::<RigidBody>();
        Self { state }
    }

    /// Advances every matched entity by `velocity * dt`.
    pub fn update(&self, registry: &mut Registry, dt: f32) {
        for &entity in self.state.entities() {
            let Ok(body) = registry.get_component::<RigidBody>(entity).copied() else {
                continue;
            };
            if let Ok(transform) = registry.get_component_mut::<Transform>(entity) {
                transform.position[0] += body.velocity[0] * dt;
                transform.position[1] += body.velocity[1] * dt;
            }
        }
    }
}

impl Default for MovementSystem {
    fn default() -> Self {
        Self::new()
    }
}

impl_system!(MovementSystem);
