//! # Galactic Headless Simulation
//!
//! Runs the full gameplay loop without a window at a fixed time step:
//! a scripted player weaves up and down firing at incoming enemy waves.
//!
//! ```bash
//! # Defaults, 600 frames
//! headless_sim
//!
//! # Custom config and frame count
//! RUST_LOG=galactic=debug headless_sim galactic.toml 2400
//! ```

use std::process::ExitCode;

use galactic::{telemetry, EngineConfig, GameLoop, Key};

/// Frames simulated when no count is given.
const DEFAULT_FRAMES: u64 = 600;

/// Frames between enemy waves.
const WAVE_INTERVAL: u64 = 120;

/// Enemies per wave.
const WAVE_SIZE: u32 = 5;

/// Frames between shots.
const FIRE_INTERVAL: u64 = 15;

/// Frames between steering changes.
const STEER_INTERVAL: u64 = 60;

fn main() -> ExitCode {
    let mut args = std::env::args().skip(1);

    let config = match args.next() {
        Some(path) => match EngineConfig::from_path(&path) {
            Ok(config) => config,
            Err(err) => {
                eprintln!("✗ {err}");
                return ExitCode::FAILURE;
            }
        },
        None => EngineConfig::default(),
    };
    let frames = match args.next().map(|raw| raw.parse::<u64>()) {
        Some(Ok(frames)) => frames,
        Some(Err(err)) => {
            eprintln!("✗ invalid frame count: {err}");
            return ExitCode::FAILURE;
        }
        None => DEFAULT_FRAMES,
    };

    telemetry::init(&config.telemetry);

    println!("═══════════════════════════════════════════════════════════════════");
    println!("                 GALACTIC ASSAULT - HEADLESS MODE");
    println!("═══════════════════════════════════════════════════════════════════");
    println!();

    match simulate(config, frames) {
        Ok(game_loop) => {
            let score = game_loop.scoreboard();
            println!("{}", game_loop.stats());
            println!();
            println!("  Frames:             {}", game_loop.frame_count());
            println!("  Enemies destroyed:  {}", score.enemies_destroyed);
            println!("  Points:             {}", score.points);
            println!(
                "  Player:             {}",
                if score.player_destroyed { "DESTROYED" } else { "ALIVE" }
            );
            ExitCode::SUCCESS
        }
        Err(err) => {
            eprintln!("✗ simulation failed: {err}");
            ExitCode::FAILURE
        }
    }
}

fn simulate(config: EngineConfig, frames: u64) -> galactic::ecs::EcsResult<GameLoop> {
    let arena = [config.gameplay.arena_width, config.gameplay.arena_height];
    let mut game_loop = GameLoop::new(config)?;
    game_loop.spawn_player([64.0, arena[1] / 2.0]);

    for frame in 0..frames {
        if frame % WAVE_INTERVAL == 0 {
            spawn_wave(&mut game_loop, arena, frame / WAVE_INTERVAL);
        }
        if frame % STEER_INTERVAL == 0 {
            let key = if (frame / STEER_INTERVAL) % 2 == 0 { Key::Up } else { Key::Down };
            game_loop.press_key(key);
        }
        if frame % FIRE_INTERVAL == 0 && !game_loop.scoreboard().player_destroyed {
            game_loop.fire();
        }

        let dt = game_loop.config().game_loop.fixed_delta();
        game_loop.tick(dt)?;
    }

    Ok(game_loop)
}

#[allow(clippy::cast_precision_loss)]
fn spawn_wave(game_loop: &mut GameLoop, arena: [f32; 2], wave: u64) {
    let spacing = arena[1] / (WAVE_SIZE + 1) as f32;
    let speed = 80.0 + 20.0 * (wave % 5) as f32;
    for slot in 1..=WAVE_SIZE {
        game_loop.spawn_enemy([arena[0] - 40.0, spacing * slot as f32], [-speed, 0.0]);
    }
    tracing::info!(wave, size = WAVE_SIZE, "enemy wave spawned");
}
