//! # Demo Scene
//!
//! A fixed jungle level: a tile floor covering the map, the player's
//! chopper, a HUD radar and two enemy vehicles.

use canopy_core::{Entity, Registry};

use crate::components::{
    Animation, BoxCollider, CameraFollow, Health, KeyboardControl, ProjectileEmitter, RigidBody,
    Sprite, Transform,
};
use crate::config::GameConfig;
use crate::math::Vec2;
use crate::systems::{ENEMIES_GROUP, PLAYER_TAG, TILES_GROUP};

/// Edge of one tile in the tileset, in texture pixels.
pub const TILE_SIZE: i32 = 32;
/// Scale applied to every tile.
pub const TILE_SCALE: i32 = 2;
const TILESET_COLUMNS: i32 = 10;

/// Damage layer of the player and its projectiles.
pub const PLAYER_LAYER: u8 = 1;
/// Damage layer of enemies and their projectiles.
pub const ENEMY_LAYER: u8 = 2;

/// Entities of interest in the loaded scene.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct DemoScene {
    /// Player-controlled chopper.
    pub chopper: Entity,
    /// Fixed HUD radar.
    pub radar: Entity,
    /// Enemy tank, fires on an interval.
    pub tank: Entity,
    /// Enemy truck.
    pub truck: Entity,
    /// Number of floor tiles.
    pub tiles: usize,
}

/// Spawns the demo level. The entities join their systems at the next
/// reconciliation.
pub fn load_demo_scene(registry: &mut Registry, config: &GameConfig, now_ms: u64) -> DemoScene {
    let tiles = spawn_tiles(registry, config.map_width, config.map_height);

    let chopper = registry
        .spawn()
        .with(Transform::at(Vec2::new(10.0, 100.0)))
        .with(RigidBody::default())
        .with(Sprite::new("chopper-image", 32, 32, 2))
        .with(Animation::new(2, 15, true, now_ms))
        .with(BoxCollider::new(32, 32).on_layer(PLAYER_LAYER))
        .with(KeyboardControl {
            speed: config.player_speed,
        })
        .with(CameraFollow)
        .with(Health::new(100))
        .with(ProjectileEmitter::new(Vec2::new(300.0, 300.0), 0, 10_000, 33, now_ms).friendly())
        .tagged(PLAYER_TAG)
        .id();

    let radar = registry
        .spawn()
        .with(Transform::at(Vec2::new(f64::from(config.window_width - 74), 10.0)))
        .with(Sprite::new("radar-image", 64, 64, 2).fixed())
        .with(Animation::new(8, 5, true, now_ms))
        .id();

    let tank = registry
        .spawn()
        .with(Transform::at(Vec2::new(500.0, 10.0)))
        .with(RigidBody::default())
        .with(Sprite::new("tank-right", 32, 32, 2))
        .with(BoxCollider::new(32, 32).on_layer(ENEMY_LAYER))
        .with(Health::new(100))
        .with(ProjectileEmitter::new(Vec2::new(0.0, 100.0), 2000, 10_000, 33, now_ms))
        .grouped(ENEMIES_GROUP)
        .id();

    let truck = registry
        .spawn()
        .with(Transform::at(Vec2::new(120.0, 500.0)))
        .with(RigidBody::new(Vec2::new(20.0, 0.0)))
        .with(Sprite::new("truck-right", 32, 32, 2))
        .with(BoxCollider::new(32, 32).on_layer(ENEMY_LAYER))
        .with(Health::new(100))
        .grouped(ENEMIES_GROUP)
        .id();

    tracing::info!("demo scene loaded: {tiles} tiles, chopper {chopper}, tank {tank}, truck {truck}");
    DemoScene {
        chopper,
        radar,
        tank,
        truck,
        tiles,
    }
}

/// Covers the map with scaled tiles, cycling through the first tileset row.
fn spawn_tiles(registry: &mut Registry, map_width: i32, map_height: i32) -> usize {
    let step = TILE_SIZE * TILE_SCALE;
    let columns = (map_width + step - 1) / step;
    let rows = (map_height + step - 1) / step;

    let mut count = 0;
    for row in 0..rows {
        for column in 0..columns {
            let index = (row * 3 + column) % TILESET_COLUMNS;
            let _tile = registry
                .spawn()
                .with(Transform::new(
                    Vec2::new(f64::from(column * step), f64::from(row * step)),
                    Vec2::splat(f64::from(TILE_SCALE)),
                    0.0,
                ))
                .with(Sprite::new("tileset", TILE_SIZE, TILE_SIZE, 0).with_source(index * TILE_SIZE, 0))
                .grouped(TILES_GROUP)
                .id();
            count += 1;
        }
    }
    count
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_demo_scene_indices() {
        let mut registry = Registry::new();
        let config = GameConfig::default();
        let scene = load_demo_scene(&mut registry, &config, 0);
        registry.update();

        // 1600x1280 map with 64px tiles.
        assert_eq!(scene.tiles, 25 * 20);
        assert_eq!(registry.entities_by_group(TILES_GROUP).len(), 500);
        assert_eq!(registry.entity_by_tag(PLAYER_TAG), Some(scene.chopper));
        assert_eq!(registry.entities_by_group(ENEMIES_GROUP), vec![scene.tank, scene.truck]);
        assert_eq!(registry.alive_count(), 504);
        assert!(registry.get_component::<Sprite>(scene.radar).is_fixed);
    }

    #[test]
    fn test_partial_tiles_cover_the_map() {
        let mut registry = Registry::new();
        assert_eq!(spawn_tiles(&mut registry, 100, 64), 2);
    }
}
