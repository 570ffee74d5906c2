use galactic_ecs::{Registry, SystemState};

use super::impl_system;
use crate::components::{RigidBody, Transform};

/// Removes moving entities that have left the arena.
pub struct BoundsSystem {
    state: SystemState,
    min: [f32; 2],
    max: [f32; 2],
}

impl BoundsSystem {
    /// Arena of `width` x `height` with `margin` of slack on every side.
    #[must_use]
    pub fn new(width: f32, height: f32, margin: f32) -> Self {
        let mut state = SystemState::new();
        state.require_component::<Transform>();
        state.require_component::<RigidBody>();
        Self {
            state,
            min: [-margin, -margin],
            max: [width + margin, height + margin],
        }
    }

    /// True if `position` is inside the arena plus margin.
    #[must_use]
    pub fn contains(&self, position: [f32; 2]) -> bool {
        (self.min[0]..=self.max[0]).contains(&position[0])
            && (self.min[1]..=self.max[1]).contains(&position[1])
    }

    /// Kills every matched entity outside the arena. Returns how many.
    pub fn update(&self, registry: &mut Registry) -> usize {
        let mut removed = 0;
        for &entity in self.state.entities() {
            let Ok(transform) = registry.get_component::<Transform>(entity) else {
                continue;
            };
            if !self.contains(transform.position) {
                tracing::debug!(entity = %entity.id(), position = ?transform.position, "left the arena");
                registry.kill_entity(entity);
                removed += 1;
            }
        }
        removed
    }
}

impl_system!(BoundsSystem);
