//! Creature spawning, damage reception and death.

use bevy::prelude::*;
use bevy_rapier3d::prelude::*;

use super::brain::{random_heading, random_interval};
use super::components::*;
use super::data::CreatureDefinition;
use crate::combat::{DamageOutcome, EntityKind, HealthRegistry, RegenRule};
use crate::core::{
    elapsed, BusSubscription, Cadence, CreatureDamage, EntityId, EventBus, HandlerResult, LootDrop,
    PublishExt, SimError,
};
use crate::world::SceneEntity;

/// Shared mesh and material for creatures. Absent in headless runs.
#[derive(Resource, Clone)]
pub struct CreatureVisuals {
    pub mesh: Handle<Mesh>,
    pub material: Handle<StandardMaterial>,
}

/// Create the creature mesh when a renderer is present.
pub fn create_creature_visuals(
    mut commands: Commands,
    meshes: Option<ResMut<Assets<Mesh>>>,
    materials: Option<ResMut<Assets<StandardMaterial>>>,
) {
    let (Some(mut meshes), Some(mut materials)) = (meshes, materials) else {
        return;
    };
    commands.insert_resource(CreatureVisuals {
        mesh: meshes.add(Capsule3d::new(0.4, 0.6)),
        material: materials.add(Color::srgb(0.55, 0.4, 0.25)),
    });
}

/// Spawn a creature, register its health and subscribe it to damage
/// addressed to `id`. The subscription is released when it despawns.
pub fn spawn_creature(
    world: &mut World,
    id: EntityId,
    definition: CreatureDefinition,
    position: Vec3,
) -> Entity {
    let mut rng = rand::thread_rng();
    let wander = Wander {
        heading: random_heading(&mut rng),
        timer: Timer::from_seconds(
            random_interval(definition.wander_interval, &mut rng),
            TimerMode::Once,
        ),
        home: position,
    };
    let regen_interval = RegenRule::default().interval;

    match world.get_resource_mut::<HealthRegistry>() {
        Some(mut registry) => {
            registry.register(
                id.clone(),
                EntityKind::Enemy,
                definition.max_health,
                definition.max_health,
                position,
            );
        }
        None => warn!("No health registry, '{}' cannot be damaged", id),
    }

    let entity = world
        .spawn((
            Creature { id: id.clone() },
            Brain::default(),
            wander,
            Detection(Cadence::from_secs(definition.detection_interval)),
            AttackCooldown::default(),
            CreatureVitals::new(regen_interval),
            CreatureStats(definition),
            Transform::from_translation(position),
            Visibility::default(),
            SceneEntity,
            // Rapier physics components
            RigidBody::KinematicPositionBased,
            Collider::capsule_y(0.3, 0.4),
        ))
        .id();

    if let Some(visuals) = world.get_resource::<CreatureVisuals>().cloned() {
        world
            .entity_mut(entity)
            .insert((Mesh3d(visuals.mesh), MeshMaterial3d(visuals.material)));
    }

    let target = id.clone();
    let subscription = world.get_resource_mut::<EventBus>().map(|mut bus| {
        bus.subscribe::<CreatureDamage, _>(move |world, damage| {
            if damage.target != target {
                return Ok(());
            }
            receive_damage(world, entity, damage)
        })
    });
    if let Some(subscription) = subscription {
        world
            .entity_mut(entity)
            .insert(BusSubscription(vec![subscription]));
    }

    debug!("Spawned creature '{}' at {}", id, position);
    entity
}

/// Apply one hit to a creature. The killing blow drops loot exactly once.
pub fn receive_damage(world: &mut World, entity: Entity, damage: &CreatureDamage) -> HandlerResult {
    let now = elapsed(world);
    let outcome = world
        .get_resource_mut::<HealthRegistry>()
        .map(|mut registry| registry.damage(&damage.target, damage.amount))
        .ok_or_else(|| SimError::Handler("health registry missing".to_string()))?;

    let Ok(mut creature) = world.get_entity_mut(entity) else {
        return Err(SimError::UnknownEntity(damage.target.clone()));
    };

    match outcome {
        DamageOutcome::Unknown => {
            trace!("Damage for unregistered creature '{}'", damage.target);
        }
        DamageOutcome::AlreadyDead => {}
        DamageOutcome::Damaged { remaining } => {
            if let Some(mut vitals) = creature.get_mut::<CreatureVitals>() {
                vitals.record_hit(now);
            }
            debug!(
                "'{}' hit '{}' for {}, {} left",
                damage.attacker, damage.target, damage.amount, remaining
            );
        }
        DamageOutcome::Killed => {
            if let Some(mut vitals) = creature.get_mut::<CreatureVitals>() {
                vitals.record_hit(now);
            }
            if let Some(mut brain) = creature.get_mut::<Brain>() {
                *brain = Brain::Dead;
            }
            creature.insert(DeathTimer::default());

            let position = creature
                .get::<Transform>()
                .map_or(Vec3::ZERO, |transform| transform.translation);
            let drops = creature
                .get::<CreatureStats>()
                .map(|stats| stats.0.loot.roll(position, &mut rand::thread_rng()))
                .unwrap_or_default();

            info!("'{}' killed '{}', {} drops", damage.attacker, damage.target, drops.len());
            for (kind, position) in drops {
                world.publish(LootDrop { kind, position });
            }
        }
    }
    Ok(())
}

/// Observer: a despawned creature leaves the health registry with it.
pub fn unregister_creature(
    trigger: Trigger<OnRemove, Creature>,
    query: Query<&Creature>,
    registry: Option<ResMut<HealthRegistry>>,
) {
    let (Ok(creature), Some(mut registry)) = (query.get(trigger.entity()), registry) else {
        return;
    };
    registry.unregister(&creature.id);
}
