//! # Gameplay Events
//!
//! ```text
//! ┌─────────────────┐ CollisionEvent ┌─────────────────┐ DamageEvent  ┌─────────────────┐
//! │ CollisionSystem │───────────────>│  DamageSystem   │─────────────>│  DamageSystem   │
//! └─────────────────┘                │ (on_collision)  │              │   (on_damage)   │
//!                                    └─────────────────┘              └─────────────────┘
//!                                                                              │
//! ┌─────────────────┐ KeyPressedEvent ┌─────────────────┐  EntityDestroyed     │
//! │  Input driver   │────────────────>│ KeyboardControl │  ┌──────────────┐    │
//! └─────────────────┘                 └─────────────────┘  │  Scoreboard  │<───┘
//!                                                          └──────────────┘
//! ```
//!
//! Events carry entity handles only. Handlers get the registry and the bus
//! as call arguments.

use galactic_ecs::{Entity, Layer};
use galactic_events::Event;

/// Two entities' collision boxes overlap this frame.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct CollisionEvent {
    /// First entity, in collision system order.
    pub a: Entity,
    /// Second entity.
    pub b: Entity,
}

impl Event for CollisionEvent {}

/// Hit points should be removed from `target`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct DamageEvent {
    /// Entity taking damage.
    pub target: Entity,
    /// Hit points to remove.
    pub amount: i32,
}

impl Event for DamageEvent {}

/// An entity ran out of hit points and has been queued for removal.
///
/// The entity is still readable until the next commit.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct EntityDestroyedEvent {
    /// The destroyed entity.
    pub entity: Entity,
    /// Its layer, for handlers that only care about enemies or the player.
    pub layer: Layer,
}

impl Event for EntityDestroyedEvent {}

/// Steering keys.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Key {
    /// Move up.
    Up,
    /// Move right.
    Right,
    /// Move down.
    Down,
    /// Move left.
    Left,
}

impl Key {
    /// Unit direction in arena coordinates (y grows downwards).
    #[must_use]
    pub const fn direction(self) -> [f32; 2] {
        match self {
            Self::Up => [0.0, -1.0],
            Self::Right => [1.0, 0.0],
            Self::Down => [0.0, 1.0],
            Self::Left => [-1.0, 0.0],
        }
    }
}

/// A steering key went down.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct KeyPressedEvent {
    /// The key.
    pub key: Key,
}

impl Event for KeyPressedEvent {}
