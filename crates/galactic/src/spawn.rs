//! # Spawning
//!
//! Component bundles for the three kinds of actors. Spawned entities join
//! systems at the next commit.

use galactic_ecs::{Entity, Layer, Registry};

use crate::components::{
    BoxCollider, Health, KeyboardControlled, KillPoints, Projectile, RigidBody, Transform,
};
use crate::config::GameplayConfig;

/// Ship collision box size.
pub const SHIP_SIZE: f32 = 32.0;

/// Bullet collision box size.
pub const BULLET_SIZE: f32 = 4.0;

/// Bullet speed in pixels per second.
pub const BULLET_SPEED: f32 = 600.0;

/// Spawns the keyboard-controlled player ship and marks it as the player.
pub fn player(registry: &mut Registry, config: &GameplayConfig, position: [f32; 2]) -> Entity {
    let entity = registry
        .spawn(Layer::Player)
        .with(Transform::at(position))
        .with(RigidBody::default())
        .with(BoxCollider::new(SHIP_SIZE, SHIP_SIZE))
        .with(Health::new(config.player_hit_points))
        .with(KeyboardControlled {
            speed: config.player_speed,
        })
        .build();
    registry.set_player_entity(entity);
    tracing::debug!(entity = %entity.id(), ?position, "player spawned");
    entity
}

/// Spawns an enemy ship worth one point.
pub fn enemy(
    registry: &mut Registry,
    config: &GameplayConfig,
    position: [f32; 2],
    velocity: [f32; 2],
) -> Entity {
    registry
        .spawn(Layer::Enemy)
        .with(Transform::at(position))
        .with(RigidBody { velocity })
        .with(BoxCollider::new(SHIP_SIZE, SHIP_SIZE))
        .with(Health::new(config.enemy_hit_points))
        .with(KillPoints(1))
        .build()
}

/// Spawns a bullet.
pub fn projectile(
    registry: &mut Registry,
    config: &GameplayConfig,
    position: [f32; 2],
    velocity: [f32; 2],
) -> Entity {
    registry
        .spawn(Layer::Projectile)
        .with(Transform::at(position))
        .with(RigidBody { velocity })
        .with(BoxCollider::new(BULLET_SIZE, BULLET_SIZE))
        .with(Projectile {
            damage: config.projectile_damage,
        })
        .build()
}

/// Fires a bullet to the right from the front of `shooter`.
///
/// Returns `None` if the shooter has no transform.
pub fn projectile_from(
    registry: &mut Registry,
    config: &GameplayConfig,
    shooter: Entity,
) -> Option<Entity> {
    let transform = registry.get_component::<Transform>(shooter).ok()?;
    let muzzle = [
        transform.position[0] + SHIP_SIZE,
        transform.position[1] + (SHIP_SIZE - BULLET_SIZE) / 2.0,
    ];
    Some(projectile(registry, config, muzzle, [BULLET_SPEED, 0.0]))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_player_is_registered() {
        let mut registry = Registry::new();
        let ship = player(&mut registry, &GameplayConfig::default(), [0.0, 0.0]);
        assert_eq!(registry.player_entity(), Some(ship));
        assert!(registry.has_component::<KeyboardControlled>(ship));
    }

    #[test]
    fn test_projectile_leaves_from_muzzle() {
        let mut registry = Registry::new();
        let config = GameplayConfig::default();
        let ship = player(&mut registry, &config, [100.0, 100.0]);

        let bullet = projectile_from(&mut registry, &config, ship).unwrap();
        let transform = registry.get_component::<Transform>(bullet).unwrap();
        assert_eq!(transform.position, [132.0, 114.0]);
        assert_eq!(
            registry.get_component::<Projectile>(bullet).unwrap().damage,
            config.projectile_damage
        );
    }
}
