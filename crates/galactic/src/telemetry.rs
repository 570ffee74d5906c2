//! # Telemetry
//!
//! Installs the global `tracing` subscriber: a console formatter behind an
//! env filter. `RUST_LOG` wins over the configured level when set.

use serde::{Deserialize, Serialize};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Logging configuration.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TelemetryConfig {
    /// Filter directives, e.g. `"info"` or `"galactic_ecs=debug,info"`.
    pub log_level: String,
    /// Colour the output.
    pub ansi: bool,
}

impl Default for TelemetryConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_owned(),
            ansi: true,
        }
    }
}

/// Installs the subscriber. Returns `false` if one was already installed.
pub fn init(config: &TelemetryConfig) -> bool {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&config.log_level))
        .unwrap_or_else(|_| EnvFilter::new("info"));

    let installed = tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_ansi(config.ansi).with_target(true))
        .try_init()
        .is_ok();

    if installed {
        tracing::info!(log_level = %config.log_level, ansi = config.ansi, "telemetry initialized");
    }
    installed
}
