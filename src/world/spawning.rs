//! Building and tearing down scenes.

use bevy::prelude::*;
use bevy_rapier3d::prelude::*;

use super::layout::SceneLayout;
use crate::core::{LootKind, SceneId};
use crate::creatures::{spawn_creature, CreatureCatalog};
use crate::loot::{spawn_pickup, LootConfig, LootRegistry};
use crate::player::teleport_player;
use crate::session::SessionState;

/// Marker for everything that belongs to the current scene.
#[derive(Component, Debug, Clone, Copy)]
pub struct SceneEntity;

/// The scene whose entities are currently spawned.
#[derive(Resource, Debug, Default)]
pub struct ActiveScene(pub Option<SceneId>);

/// Despawn every scene entity and forget loot nobody picked up.
pub fn clear_scene(world: &mut World) {
    let mut query = world.query_filtered::<Entity, With<SceneEntity>>();
    let entities: Vec<Entity> = query.iter(world).collect();
    for entity in entities {
        if let Ok(entity) = world.get_entity_mut(entity) {
            entity.despawn_recursive();
        }
    }

    if let Some(mut registry) = world.get_resource_mut::<LootRegistry>() {
        let forgotten = registry.forget_uncollected();
        if forgotten > 0 {
            debug!("Forgot {} uncollected loot item(s)", forgotten);
        }
    }
}

/// Spawn ground, light, coins and creatures for `layout`.
pub fn build_scene(world: &mut World, layout: &SceneLayout) {
    spawn_ground(world, layout);
    world.spawn((
        DirectionalLight {
            illuminance: 8000.0,
            shadows_enabled: true,
            ..default()
        },
        Transform::from_xyz(10.0, 10.0, 5.0).looking_at(Vec3::ZERO, Vec3::Y),
        SceneEntity,
    ));

    let coin_value = world
        .get_resource::<LootConfig>()
        .map_or(LootConfig::default().coin_value, |config| config.coin_value);
    for (id, position) in &layout.coins {
        let fresh = match world.get_resource_mut::<LootRegistry>() {
            Some(mut registry) => {
                registry.register(id.clone(), LootKind::Coin, *position, coin_value, None);
                registry.get(id).is_some_and(|item| !item.is_collected)
            }
            None => false,
        };
        if fresh {
            spawn_pickup(world, id.clone(), LootKind::Coin, *position);
        }
    }

    for spawn in &layout.creatures {
        let definition = world
            .get_resource::<CreatureCatalog>()
            .map(|catalog| catalog.get_or_default(&spawn.creature_type))
            .unwrap_or_default();
        spawn_creature(world, spawn.id.clone(), definition, spawn.position);
    }

    info!(
        "Built {} ({} coins, {} creatures)",
        layout.scene.name(),
        layout.coins.len(),
        layout.creatures.len()
    );
}

fn spawn_ground(world: &mut World, layout: &SceneLayout) {
    let half = layout.ground_size / 2.0;
    let visuals = world.contains_resource::<Assets<Mesh>>()
        && world.contains_resource::<Assets<StandardMaterial>>();

    let ground_id = world
        .spawn((
            Transform::from_xyz(0.0, -0.1, 0.0),
            Visibility::default(),
            RigidBody::Fixed,
            Collider::cuboid(half, 0.1, half),
            SceneEntity,
        ))
        .id();

    if visuals {
        let mesh = world
            .resource_mut::<Assets<Mesh>>()
            .add(Cuboid::new(layout.ground_size, 0.2, layout.ground_size));
        let material = world
            .resource_mut::<Assets<StandardMaterial>>()
            .add(layout.ground_color);
        world
            .entity_mut(ground_id)
            .insert((Mesh3d(mesh), MeshMaterial3d(material)));
    }
}

/// Exclusive system: rebuild the world whenever the session's scene
/// differs from the one on screen, and move the player to its spawn point.
pub fn sync_scene(world: &mut World) {
    let Some(target) = world
        .get_resource::<SessionState>()
        .map(|session| session.current_scene())
    else {
        return;
    };
    let active = world.get_resource::<ActiveScene>().and_then(|active| active.0);
    if active == Some(target) {
        return;
    }

    clear_scene(world);
    let layout = SceneLayout::for_scene(target);
    build_scene(world, &layout);

    if let Err(e) = teleport_player(world, layout.spawn_point) {
        debug!("No player to move yet: {}", e);
    }
    world.insert_resource(ActiveScene(Some(target)));
}
