//! # Scoreboard
//!
//! Tallies destroyed entities. [`ScoreKeeper`] is an event subscriber, not
//! an ECS system: it owns no entity list and lives behind an `Rc` that the
//! bus references weakly.

use std::cell::Cell;

use galactic_ecs::{Layer, Registry};
use galactic_events::EventBus;

use crate::components::KillPoints;
use crate::events::EntityDestroyedEvent;

/// Running score of a session.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Scoreboard {
    /// Sum of [`KillPoints`] of destroyed enemies.
    pub points: u32,
    /// Enemies destroyed.
    pub enemies_destroyed: u32,
    /// Set once the player ship is destroyed.
    pub player_destroyed: bool,
}

/// Bus subscriber that keeps the [`Scoreboard`] up to date.
#[derive(Debug, Default)]
pub struct ScoreKeeper {
    score: Cell<Scoreboard>,
}

impl ScoreKeeper {
    /// Current score.
    #[must_use]
    pub fn score(&self) -> Scoreboard {
        self.score.get()
    }

    /// Handler for [`EntityDestroyedEvent`].
    pub fn on_entity_destroyed(
        &self,
        event: &mut EntityDestroyedEvent,
        _bus: &EventBus<Registry>,
        registry: &mut Registry,
    ) {
        let mut score = self.score.get();
        match event.layer {
            Layer::Enemy => {
                score.enemies_destroyed += 1;
                // Still readable: the kill is committed at the next update.
                score.points += registry
                    .get_component::<KillPoints>(event.entity)
                    .map_or(0, |points| points.0);
            }
            Layer::Player => {
                score.player_destroyed = true;
                tracing::info!(points = score.points, "player destroyed");
            }
            _ => {}
        }
        self.score.set(score);
    }
}
