//! # Engine Configuration
//!
//! One TOML file, one table per concern. Every table and every key is
//! optional:
//!
//! ```toml
//! [game_loop]
//! target_fps = 120
//!
//! [registry]
//! reserve_entities = 512
//!
//! [gameplay]
//! arena_width = 1280.0
//! collision_damage = 100
//!
//! [telemetry]
//! log_level = "galactic=debug,info"
//! ```

use std::fs;
use std::path::{Path, PathBuf};

use galactic_ecs::RegistryConfig;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::game_loop::GameLoopConfig;
use crate::telemetry::TelemetryConfig;

/// Errors raised while loading the engine configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The file could not be read.
    #[error("failed to read config file {path}: {source}")]
    Io {
        /// File that failed.
        path: PathBuf,
        /// Underlying IO error.
        #[source]
        source: std::io::Error,
    },

    /// The contents are not valid TOML for [`EngineConfig`].
    #[error("invalid config: {0}")]
    Parse(#[from] toml::de::Error),
}

/// Gameplay tuning.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameplayConfig {
    /// Arena width in pixels. Entities leaving the arena are removed.
    pub arena_width: f32,
    /// Arena height in pixels.
    pub arena_height: f32,
    /// Margin outside the arena before an entity counts as gone.
    pub bounds_margin: f32,
    /// Damage dealt to each ship when two ships collide.
    pub collision_damage: i32,
    /// Player hit points at spawn.
    pub player_hit_points: i32,
    /// Enemy hit points at spawn.
    pub enemy_hit_points: i32,
    /// Damage of one player bullet.
    pub projectile_damage: i32,
    /// Player speed while a steering key is held.
    pub player_speed: f32,
}

impl Default for GameplayConfig {
    fn default() -> Self {
        Self {
            arena_width: 1280.0,
            arena_height: 720.0,
            bounds_margin: 100.0,
            collision_damage: 100,
            player_hit_points: 100,
            enemy_hit_points: 100,
            projectile_damage: 50,
            player_speed: 300.0,
        }
    }
}

/// Complete engine configuration.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Frame loop timing.
    pub game_loop: GameLoopConfig,
    /// ECS registry tuning.
    pub registry: RegistryConfig,
    /// Gameplay tuning.
    pub gameplay: GameplayConfig,
    /// Logging.
    pub telemetry: TelemetryConfig,
}

impl EngineConfig {
    /// Parses a TOML document.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Parse`] on malformed TOML or mistyped keys.
    pub fn from_toml_str(source: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(source)?)
    }

    /// Reads and parses a TOML file.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Io`] if the file cannot be read, or
    /// [`ConfigError::Parse`] if it is not valid.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let source = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let config = Self::from_toml_str(&source)?;
        tracing::info!(path = %path.display(), "engine config loaded");
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_empty_document_is_default() {
        let config = EngineConfig::from_toml_str("").unwrap();
        assert_eq!(config, EngineConfig::default());
    }

    #[test]
    fn test_partial_tables() {
        let config = EngineConfig::from_toml_str(
            r#"
            [game_loop]
            target_fps = 30

            [registry]
            sort_on_commit = false

            [gameplay]
            collision_damage = 25
            "#,
        )
        .unwrap();

        assert_eq!(config.game_loop.target_fps, 30);
        assert!(!config.registry.sort_on_commit);
        assert_eq!(config.registry.reserve_entities, 256);
        assert_eq!(config.gameplay.collision_damage, 25);
        assert_eq!(config.gameplay.enemy_hit_points, 100);
    }

    #[test]
    fn test_wrong_type_is_parse_error() {
        let err = EngineConfig::from_toml_str("[game_loop]\ntarget_fps = \"fast\"").unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }

    #[test]
    fn test_from_path() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[gameplay]\narena_width = 640.0").unwrap();

        let config = EngineConfig::from_path(file.path()).unwrap();
        assert!((config.gameplay.arena_width - 640.0).abs() < f32::EPSILON);
    }

    #[test]
    fn test_missing_file_is_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = EngineConfig::from_path(dir.path().join("absent.toml")).unwrap_err();
        assert!(matches!(err, ConfigError::Io { .. }));
        assert!(err.to_string().contains("absent.toml"));
    }
}
