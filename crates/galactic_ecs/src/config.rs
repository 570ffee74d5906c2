//! # Registry Configuration
//!
//! Loaded once at startup, usually as the `[registry]` table of the engine
//! config file.

use serde::{Deserialize, Serialize};

/// Tuning knobs for a [`crate::Registry`].
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RegistryConfig {
    /// Entity slots to reserve up front in the signature table and in each
    /// newly created pool.
    pub reserve_entities: usize,
    /// Sort every system's entity list by layer after a commit that added
    /// entities. When off, lists keep commit order.
    pub sort_on_commit: bool,
}

impl Default for RegistryConfig {
    fn default() -> Self {
        Self {
            reserve_entities: 256,
            sort_on_commit: true,
        }
    }
}
