//! # Galactic Game Loop
//!
//! Frame orchestration:
//! ```text
//! Frame N:
//! ┌─────────────────────────────────────────────────────────────────────┐
//! │ 1. COMMIT                                                           │
//! │    └─ Registry::update: spawns and kills from frame N-1 take effect │
//! │                                                                     │
//! │ 2. MOVEMENT                                                         │
//! │    └─ position += velocity * dt                                     │
//! │                                                                     │
//! │ 3. BOUNDS                                                           │
//! │    └─ kill whatever left the arena                                  │
//! │                                                                     │
//! │ 4. COLLISION                                                        │
//! │    └─ AABB pairs -> CollisionEvent -> DamageEvent                   │
//! │                                                                     │
//! │ 5. DAMAGE                                                           │
//! │    └─ kill depleted ships -> EntityDestroyedEvent -> Scoreboard     │
//! └─────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Kills issued in steps 3 to 5 stay visible until step 1 of the next frame.

use std::fmt;
use std::rc::Rc;
use std::time::{Duration, Instant};

use galactic_ecs::{EcsResult, Entity, Registry};
use galactic_events::EventBus;
use serde::{Deserialize, Serialize};

use crate::config::EngineConfig;
use crate::events::{Key, KeyPressedEvent};
use crate::scoreboard::{ScoreKeeper, Scoreboard};
use crate::spawn;
use crate::systems::{
    BoundsSystem, CollisionSystem, DamageSystem, KeyboardControlSystem, MovementSystem,
};

/// Configuration for the game loop.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameLoopConfig {
    /// Target frames per second. Also sets the fixed step of [`GameLoop::run`].
    pub target_fps: u32,
    /// Upper bound on the delta time fed to movement, in seconds.
    pub max_delta: f32,
    /// Log a warning for frames slower than this many milliseconds.
    pub slow_frame_ms: f64,
    /// Enable slow frame warnings.
    pub enable_timing_logs: bool,
}

impl Default for GameLoopConfig {
    fn default() -> Self {
        Self {
            target_fps: 120,
            max_delta: 0.1,
            slow_frame_ms: 33.0,
            enable_timing_logs: false,
        }
    }
}

impl GameLoopConfig {
    /// Fixed time step in seconds.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn fixed_delta(&self) -> f32 {
        1.0 / self.target_fps.max(1) as f32
    }

    /// Time budget of one frame.
    #[must_use]
    pub fn frame_budget(&self) -> Duration {
        Duration::from_secs(1) / self.target_fps.max(1)
    }
}

/// Frame timing and gameplay counters.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct FrameStats {
    /// Frame number.
    pub frame: u64,
    /// Total frame time in microseconds.
    pub total_us: u64,
    /// Commit time in microseconds.
    pub commit_us: u64,
    /// Time spent in systems in microseconds.
    pub systems_us: u64,
    /// Live entities after the commit.
    pub live_entities: usize,
    /// Entities removed for leaving the arena.
    pub out_of_bounds: usize,
    /// Collision events published.
    pub collisions: usize,
    /// Entities destroyed by damage.
    pub destroyed: usize,
}

/// The main game loop.
///
/// Owns the registry, the event bus and the scoreboard, and runs the
/// systems in a fixed order every tick.
pub struct GameLoop {
    /// ECS registry. Also the context of every event handler.
    registry: Registry,
    /// Gameplay event bus.
    bus: EventBus<Registry>,
    /// Destroyed-entity tally, subscribed to the bus.
    score_keeper: Rc<ScoreKeeper>,
    /// Configuration.
    config: EngineConfig,
    /// Frame counter.
    frame_count: u64,
    /// Accumulated frame statistics.
    stats_accumulator: FrameStatsAccumulator,
}

impl GameLoop {
    /// Creates a game loop with every gameplay system registered and
    /// subscribed.
    ///
    /// # Errors
    ///
    /// Fails only if system registration fails, which cannot happen on a
    /// fresh registry.
    pub fn new(config: EngineConfig) -> EcsResult<Self> {
        let gameplay = &config.gameplay;
        let mut registry = Registry::with_config(config.registry.clone());
        registry.add_system(MovementSystem::new())?;
        registry.add_system(BoundsSystem::new(
            gameplay.arena_width,
            gameplay.arena_height,
            gameplay.bounds_margin,
        ))?;
        registry.add_system(CollisionSystem::new())?;
        registry.add_system(DamageSystem::new())?;
        registry.add_system(KeyboardControlSystem::new())?;

        let bus = EventBus::new();
        DamageSystem::subscribe(&bus, gameplay.collision_damage);
        KeyboardControlSystem::subscribe(&bus);

        let score_keeper = Rc::new(ScoreKeeper::default());
        bus.subscribe(&score_keeper, ScoreKeeper::on_entity_destroyed);

        tracing::info!(
            target_fps = config.game_loop.target_fps,
            systems = registry.system_count(),
            "game loop ready"
        );

        Ok(Self {
            stats_accumulator: FrameStatsAccumulator::new(config.game_loop.frame_budget()),
            registry,
            bus,
            score_keeper,
            config,
            frame_count: 0,
        })
    }

    /// Runs one frame with the given delta time in seconds.
    ///
    /// # Errors
    ///
    /// Returns [`galactic_ecs::EcsError::SystemNotFound`] if a gameplay
    /// system was removed through [`GameLoop::registry_mut`].
    pub fn tick(&mut self, dt: f32) -> EcsResult<FrameStats> {
        let frame_start = Instant::now();
        let dt = dt.clamp(0.0, self.config.game_loop.max_delta);

        self.registry.update();
        let commit_us = micros(frame_start.elapsed());
        let live_entities = self.registry.live_entity_count();

        let bus = &self.bus;
        let registry = &mut self.registry;
        registry.run_system::<MovementSystem, _, _>(|movement, registry| movement.update(registry, dt))?;
        let out_of_bounds =
            registry.run_system::<BoundsSystem, _, _>(|bounds, registry| bounds.update(registry))?;
        let collisions = registry
            .run_system::<CollisionSystem, _, _>(|collision, registry| collision.update(registry, bus))?;
        let destroyed =
            registry.run_system::<DamageSystem, _, _>(|damage, registry| damage.update(registry, bus))?;

        let total_us = micros(frame_start.elapsed());
        let stats = FrameStats {
            frame: self.frame_count,
            total_us,
            commit_us,
            systems_us: total_us.saturating_sub(commit_us),
            live_entities,
            out_of_bounds,
            collisions,
            destroyed,
        };

        self.end_frame(stats);
        Ok(stats)
    }

    /// Runs `frames` ticks at the fixed time step, without sleeping.
    ///
    /// # Errors
    ///
    /// Propagates the first [`GameLoop::tick`] error.
    pub fn run(&mut self, frames: u64) -> EcsResult<()> {
        let dt = self.config.game_loop.fixed_delta();
        for _ in 0..frames {
            self.tick(dt)?;
        }
        Ok(())
    }

    fn end_frame(&mut self, stats: FrameStats) {
        self.frame_count += 1;
        self.stats_accumulator.record(stats);

        #[allow(clippy::cast_precision_loss)]
        let frame_ms = stats.total_us as f64 / 1000.0;
        if self.config.game_loop.enable_timing_logs && frame_ms > self.config.game_loop.slow_frame_ms {
            tracing::warn!(
                frame = stats.frame,
                frame_ms,
                budget_ms = self.config.game_loop.slow_frame_ms,
                "frame exceeded budget"
            );
        }
    }

    /// Spawns the player ship.
    pub fn spawn_player(&mut self, position: [f32; 2]) -> Entity {
        spawn::player(&mut self.registry, &self.config.gameplay, position)
    }

    /// Spawns an enemy ship.
    pub fn spawn_enemy(&mut self, position: [f32; 2], velocity: [f32; 2]) -> Entity {
        spawn::enemy(&mut self.registry, &self.config.gameplay, position, velocity)
    }

    /// Fires a bullet from the player ship, if there is one.
    pub fn fire(&mut self) -> Option<Entity> {
        let player = self.registry.player_entity()?;
        spawn::projectile_from(&mut self.registry, &self.config.gameplay, player)
    }

    /// Delivers a steering key press.
    pub fn press_key(&mut self, key: Key) {
        self.bus.publish(&mut self.registry, KeyPressedEvent { key });
    }

    /// Returns the current frame count.
    #[inline]
    #[must_use]
    pub fn frame_count(&self) -> u64 {
        self.frame_count
    }

    /// The registry.
    #[must_use]
    pub fn registry(&self) -> &Registry {
        &self.registry
    }

    /// Mutable registry, for spawning custom entities.
    pub fn registry_mut(&mut self) -> &mut Registry {
        &mut self.registry
    }

    /// The event bus, for extra subscribers.
    #[must_use]
    pub fn bus(&self) -> &EventBus<Registry> {
        &self.bus
    }

    /// Current score.
    #[must_use]
    pub fn scoreboard(&self) -> Scoreboard {
        self.score_keeper.score()
    }

    /// Returns the accumulated statistics.
    #[must_use]
    pub fn stats(&self) -> &FrameStatsAccumulator {
        &self.stats_accumulator
    }

    /// The configuration the loop was built with.
    #[must_use]
    pub fn config(&self) -> &EngineConfig {
        &self.config
    }
}

fn micros(duration: Duration) -> u64 {
    u64::try_from(duration.as_micros()).unwrap_or(u64::MAX)
}

/// Accumulator for frame statistics.
#[derive(Clone, Debug)]
pub struct FrameStatsAccumulator {
    /// Frame budget in microseconds.
    pub budget_us: u64,
    /// Total frames recorded.
    pub frames_recorded: u64,
    /// Sum of total frame times.
    pub total_us_sum: u64,
    /// Sum of commit times.
    pub commit_us_sum: u64,
    /// Sum of system times.
    pub systems_us_sum: u64,
    /// Min frame time.
    pub min_frame_us: u64,
    /// Max frame time.
    pub max_frame_us: u64,
    /// Frames that exceeded budget.
    pub frames_over_budget: u64,
    /// Collision events over all frames.
    pub collisions: u64,
    /// Entities destroyed over all frames.
    pub destroyed: u64,
    /// Peak live entity count.
    pub peak_entities: usize,
}

impl FrameStatsAccumulator {
    /// Creates an accumulator measuring against `budget`.
    #[must_use]
    pub fn new(budget: Duration) -> Self {
        Self {
            budget_us: micros(budget),
            frames_recorded: 0,
            total_us_sum: 0,
            commit_us_sum: 0,
            systems_us_sum: 0,
            min_frame_us: u64::MAX,
            max_frame_us: 0,
            frames_over_budget: 0,
            collisions: 0,
            destroyed: 0,
            peak_entities: 0,
        }
    }

    /// Records a frame's statistics.
    pub fn record(&mut self, stats: FrameStats) {
        self.frames_recorded += 1;
        self.total_us_sum += stats.total_us;
        self.commit_us_sum += stats.commit_us;
        self.systems_us_sum += stats.systems_us;
        self.min_frame_us = self.min_frame_us.min(stats.total_us);
        self.max_frame_us = self.max_frame_us.max(stats.total_us);
        self.collisions += stats.collisions as u64;
        self.destroyed += stats.destroyed as u64;
        self.peak_entities = self.peak_entities.max(stats.live_entities);

        if stats.total_us > self.budget_us {
            self.frames_over_budget += 1;
        }
    }

    /// Returns average frame time in milliseconds.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn avg_frame_ms(&self) -> f64 {
        if self.frames_recorded == 0 {
            return 0.0;
        }
        (self.total_us_sum as f64 / self.frames_recorded as f64) / 1000.0
    }

    /// Returns average FPS.
    #[must_use]
    pub fn avg_fps(&self) -> f64 {
        let avg_ms = self.avg_frame_ms();
        if avg_ms <= 0.0 {
            return 0.0;
        }
        1000.0 / avg_ms
    }

    /// Returns the fraction of frames over budget.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn over_budget_ratio(&self) -> f64 {
        if self.frames_recorded == 0 {
            return 0.0;
        }
        self.frames_over_budget as f64 / self.frames_recorded as f64
    }
}

impl Default for FrameStatsAccumulator {
    fn default() -> Self {
        Self::new(GameLoopConfig::default().frame_budget())
    }
}

impl fmt::Display for FrameStatsAccumulator {
    #[allow(clippy::cast_precision_loss)]
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let min_ms = if self.frames_recorded == 0 {
            0.0
        } else {
            self.min_frame_us as f64 / 1000.0
        };
        writeln!(f, "┌─ TIMING ─────────────────────────────────────────┐")?;
        writeln!(f, "│ Frames Recorded:    {}", self.frames_recorded)?;
        writeln!(f, "│ Average Frame:      {:.3} ms ({:.1} FPS)", self.avg_frame_ms(), self.avg_fps())?;
        writeln!(f, "│ Min Frame:          {min_ms:.3} ms")?;
        writeln!(f, "│ Max Frame:          {:.3} ms", self.max_frame_us as f64 / 1000.0)?;
        writeln!(
            f,
            "│ Over Budget:        {} frames ({:.1}%)",
            self.frames_over_budget,
            self.over_budget_ratio() * 100.0
        )?;
        writeln!(f, "├─ GAMEPLAY ───────────────────────────────────────┤")?;
        writeln!(f, "│ Peak Entities:      {}", self.peak_entities)?;
        writeln!(f, "│ Collisions:         {}", self.collisions)?;
        writeln!(f, "│ Destroyed:          {}", self.destroyed)?;
        write!(f, "└──────────────────────────────────────────────────┘")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_game_loop_creation() {
        let game_loop = GameLoop::new(EngineConfig::default()).unwrap();
        assert_eq!(game_loop.frame_count(), 0);
        assert_eq!(game_loop.registry().system_count(), 5);
    }

    #[test]
    fn test_fixed_delta() {
        let config = GameLoopConfig {
            target_fps: 50,
            ..Default::default()
        };
        assert!((config.fixed_delta() - 0.02).abs() < f32::EPSILON);
        assert_eq!(config.frame_budget(), Duration::from_millis(20));
    }

    #[test]
    fn test_tick_counts_frames() {
        let mut game_loop = GameLoop::new(EngineConfig::default()).unwrap();
        game_loop.spawn_player([100.0, 100.0]);

        let first = game_loop.tick(0.01).unwrap();
        let second = game_loop.tick(0.01).unwrap();

        assert_eq!(first.frame, 0);
        assert_eq!(second.frame, 1);
        assert_eq!(first.live_entities, 1);
        assert_eq!(game_loop.frame_count(), 2);
        assert_eq!(game_loop.stats().frames_recorded, 2);
    }

    #[test]
    fn test_stats_accumulator() {
        let mut acc = FrameStatsAccumulator::new(Duration::from_micros(16_666));

        for i in 0..100 {
            acc.record(FrameStats {
                frame: i,
                total_us: 10_000 + (i * 100),
                commit_us: 1000,
                systems_us: 9000,
                live_entities: 10,
                collisions: 1,
                ..Default::default()
            });
        }

        assert_eq!(acc.frames_recorded, 100);
        assert_eq!(acc.collisions, 100);
        assert_eq!(acc.frames_over_budget, 33);
        assert!(acc.avg_fps() > 50.0);
        assert!(acc.avg_fps() < 100.0);
    }
}
