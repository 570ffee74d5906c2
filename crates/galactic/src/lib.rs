//! # Galactic Assault
//!
//! The gameplay crate: components, systems and the frame loop of a 2D
//! side-scrolling shooter, built on the signature-matched ECS and the
//! synchronous event bus.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────┐
//! │                             GameLoop                                │
//! ├─────────────────────────────────────────────────────────────────────┤
//! │                                                                     │
//! │  ┌─────────────────┐   &mut Registry   ┌─────────────────────────┐  │
//! │  │  galactic_ecs   │<──────────────────│     galactic_events     │  │
//! │  │                 │    (context)      │                         │  │
//! │  │  • Registry     │                   │  • EventBus<Registry>   │  │
//! │  │  • Pools        │                   │  • Collision / Damage   │  │
//! │  │  • Systems      │                   │  • Destroyed / Key      │  │
//! │  └─────────────────┘                   └─────────────────────────┘  │
//! │                                                                     │
//! └─────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - `components`: Gameplay data records
//! - `events`: Event kinds exchanged between systems
//! - `systems`: Movement, bounds, collision, damage, keyboard control
//! - `scoreboard`: Destroyed-entity tally
//! - `spawn`: Player, enemy and bullet bundles
//! - `game_loop`: Frame orchestration and timing
//! - `config`: TOML engine configuration
//! - `telemetry`: Logging bootstrap

#![deny(unsafe_code)]
#![warn(missing_docs)]

pub mod components;
pub mod config;
pub mod events;
pub mod game_loop;
pub mod scoreboard;
pub mod spawn;
pub mod systems;
pub mod telemetry;

// Re-export the building blocks
pub use galactic_ecs as ecs;
pub use galactic_events as event_bus;

// Re-export commonly used types
pub use config::{ConfigError, EngineConfig, GameplayConfig};
pub use events::{CollisionEvent, DamageEvent, EntityDestroyedEvent, Key, KeyPressedEvent};
pub use game_loop::{FrameStats, FrameStatsAccumulator, GameLoop, GameLoopConfig};
pub use scoreboard::{ScoreKeeper, Scoreboard};
pub use telemetry::TelemetryConfig;
