//! Loot systems - materializing drops, proximity pickup and expiry.

use bevy::prelude::*;

use super::components::*;
use super::registry::LootRegistry;
use crate::core::{
    elapsed, Cadence, HandlerResult, LootCollected, LootDrop, LootId, LootKind, PublishCommandsExt,
    SimError,
};
use crate::player::Player;
use crate::session::SessionState;
use crate::world::SceneEntity;

/// Bus handler: register a creature drop and put a pickup in the world.
pub fn materialize_drop(world: &mut World, drop: &LootDrop) -> HandlerResult {
    let now = elapsed(world);
    let config = world.get_resource::<LootConfig>().cloned().unwrap_or_default();
    let (value, expires_at) = config.drop_terms(drop.kind, now);

    let Some(mut registry) = world.get_resource_mut::<LootRegistry>() else {
        return Err(SimError::Handler("loot registry missing".to_string()));
    };
    let id = registry.spawn_drop(drop.kind, drop.position, value, expires_at);
    debug!("Dropped {:?} '{}' at {}", drop.kind, id, drop.position);

    spawn_pickup(world, id, drop.kind, drop.position);
    Ok(())
}

/// Spawn the visible pickup for a registered item.
pub fn spawn_pickup(world: &mut World, id: LootId, kind: LootKind, position: Vec3) -> Entity {
    let visuals = world.get_resource::<PickupVisuals>().cloned();
    let mut pickup = world.spawn((
        LootPickup(id),
        Transform::from_translation(position),
        Visibility::default(),
        SceneEntity,
    ));
    if let Some(visuals) = visuals {
        pickup.insert(visuals.for_kind(kind));
    }
    pickup.id()
}

/// Create shared pickup meshes when a renderer is present.
pub fn create_pickup_visuals(
    mut commands: Commands,
    meshes: Option<ResMut<Assets<Mesh>>>,
    materials: Option<ResMut<Assets<StandardMaterial>>>,
) {
    let (Some(mut meshes), Some(mut materials)) = (meshes, materials) else {
        return;
    };

    commands.insert_resource(PickupVisuals {
        coin_mesh: meshes.add(Cylinder::new(0.5, 0.1)),
        coin_material: materials.add(StandardMaterial {
            base_color: Color::srgb(1.0, 0.84, 0.0),
            metallic: 0.8,
            perceptual_roughness: 0.2,
            ..default()
        }),
        meat_mesh: meshes.add(Capsule3d::new(0.2, 0.3)),
        meat_material: materials.add(Color::srgb(0.7, 0.25, 0.2)),
    });
}

/// Collect every uncollected item within reach of the player.
pub fn collect_nearby_loot(
    mut commands: Commands,
    time: Res<Time>,
    config: Res<LootConfig>,
    mut scan: ResMut<PickupScan>,
    mut registry: ResMut<LootRegistry>,
    session: Res<SessionState>,
    player_query: Query<&Transform, With<Player>>,
    pickups: Query<(Entity, &LootPickup)>,
) {
    if config.is_changed() {
        scan.0 = Cadence::from_secs(config.scan_interval);
    }
    if scan.0.ticks(time.elapsed()) == 0 || session.is_dead() {
        return;
    }
    let Ok(player_transform) = player_query.get_single() else {
        return;
    };

    let in_reach = registry.within_reach(player_transform.translation, |kind| {
        config.pickup_radius(kind)
    });
    for id in in_reach {
        let Some(item) = registry.collect(&id) else {
            continue;
        };
        info!("Picked up {:?} '{}'", item.kind, item.id);

        despawn_pickups(&mut commands, &pickups, |pickup| pickup == &item.id);
        commands.publish(LootCollected {
            loot_id: item.id,
            kind: item.kind,
            value: item.value,
        });
    }
}

/// Remove dropped items whose lifespan ran out.
pub fn expire_loot(
    mut commands: Commands,
    time: Res<Time>,
    mut registry: ResMut<LootRegistry>,
    pickups: Query<(Entity, &LootPickup)>,
) {
    let expired = registry.expire(time.elapsed());
    if expired.is_empty() {
        return;
    }
    debug!("{} loot item(s) expired", expired.len());
    despawn_pickups(&mut commands, &pickups, |pickup| expired.contains(pickup));
}

fn despawn_pickups(
    commands: &mut Commands,
    pickups: &Query<(Entity, &LootPickup)>,
    matches: impl Fn(&LootId) -> bool,
) {
    for (entity, pickup) in pickups.iter() {
        if matches(&pickup.0) {
            commands.entity(entity).despawn_recursive();
        }
    }
}
