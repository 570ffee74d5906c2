//! # Gameplay Systems
//!
//! Each system declares its required components and exposes an `update`
//! the frame loop calls through [`galactic_ecs::Registry::run_system`].
//! Systems that react to events subscribe associated functions on the bus,
//! so they never need a handle to themselves.

/// Implements [`galactic_ecs::System`] for a struct with a `state` field.
macro_rules! impl_system {
    ($system:ty) => {
        impl galactic_ecs::System for $system {
            fn state(&self) -> &galactic_ecs::SystemState {
                &self.state
            }

            fn state_mut(&mut self) -> &mut galactic_ecs::SystemState {
                &mut self.state
            }

            fn name(&self) -> &'static str {
                stringify!($system)
            }
        }
    };
}

pub(crate) use impl_system;

mod bounds;
mod collision;
mod damage;
mod keyboard;
mod movement;

pub use bounds::BoundsSystem;
pub use collision::CollisionSystem;
pub use damage::DamageSystem;
pub use keyboard::KeyboardControlSystem;
pub use movement::MovementSystem;
