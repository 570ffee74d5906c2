//! # Gameplay Components
//!
//! Plain data records stored in the registry's pools. Positions and sizes
//! are in arena pixels, velocities in pixels per second.

use galactic_ecs::Component;

/// Position, scale and rotation of an entity.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Transform {
    /// Top-left corner.
    pub position: [f32; 2],
    /// Draw scale.
    pub scale: [f32; 2],
    /// Rotation in degrees.
    pub rotation: f32,
}

impl Transform {
    /// Unscaled, unrotated transform at `position`.
    #[must_use]
    pub const fn at(position: [f32; 2]) -> Self {
        Self {
            position,
            scale: [1.0, 1.0],
            rotation: 0.0,
        }
    }
}

impl Default for Transform {
    fn default() -> Self {
        Self::at([0.0, 0.0])
    }
}

impl Component for Transform {}

/// Linear velocity.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct RigidBody {
    /// Pixels per second on each axis.
    pub velocity: [f32; 2],
}

impl Component for RigidBody {}

/// Axis-aligned collision box relative to the transform position.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct BoxCollider {
    /// Box width.
    pub width: f32,
    /// Box height.
    pub height: f32,
    /// Offset of the box from the transform position.
    pub offset: [f32; 2],
}

impl BoxCollider {
    /// A box of the given size with no offset.
    #[must_use]
    pub const fn new(width: f32, height: f32) -> Self {
        Self {
            width,
            height,
            offset: [0.0, 0.0],
        }
    }

    /// World-space bounds `(min, max)` for an entity at `transform`.
    #[must_use]
    pub fn bounds(&self, transform: &Transform) -> ([f32; 2], [f32; 2]) {
        let min = [
            transform.position[0] + self.offset[0],
            transform.position[1] + self.offset[1],
        ];
        (min, [min[0] + self.width, min[1] + self.height])
    }

    /// True if the two boxes overlap. Touching edges do not count.
    #[must_use]
    pub fn overlaps(&self, transform: &Transform, other: &Self, other_transform: &Transform) -> bool {
        let (a_min, a_max) = self.bounds(transform);
        let (b_min, b_max) = other.bounds(other_transform);
        a_min[0] < b_max[0] && a_max[0] > b_min[0] && a_min[1] < b_max[1] && a_max[1] > b_min[1]
    }
}

impl Component for BoxCollider {}

/// Hit points. The entity is destroyed once they reach zero.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Health {
    /// Remaining hit points.
    pub hit_points: i32,
    /// Hit points at spawn.
    pub max_hit_points: i32,
}

impl Health {
    /// Full health.
    #[must_use]
    pub const fn new(max_hit_points: i32) -> Self {
        Self {
            hit_points: max_hit_points,
            max_hit_points,
        }
    }

    /// True once hit points are at or below zero.
    #[must_use]
    pub const fn is_depleted(&self) -> bool {
        self.hit_points <= 0
    }

    /// Remaining health as a fraction of the maximum.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn ratio(&self) -> f32 {
        if self.max_hit_points <= 0 {
            return 0.0;
        }
        self.hit_points.max(0) as f32 / self.max_hit_points as f32
    }
}

impl Component for Health {}

/// Marks a bullet. Consumed on its first hit.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Projectile {
    /// Hit points removed from whatever it hits.
    pub damage: i32,
}

impl Component for Projectile {}

/// Points awarded when this entity is destroyed.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct KillPoints(pub u32);

impl Component for KillPoints {}

/// Steers the entity from keyboard input.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct KeyboardControlled {
    /// Speed applied in the pressed direction.
    pub speed: f32,
}

impl Component for KeyboardControlled {}
