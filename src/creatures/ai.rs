//! Creature AI behavior systems.

use bevy::prelude::*;

use super::brain::*;
use super::components::*;
use crate::combat::{HealthRegistry, RegenRule};
use crate::core::{PlayerDamage, PublishCommandsExt};
use crate::player::Player;
use crate::session::SessionState;

/// Roam on random headings, turning back toward home when too far out.
pub fn wander_creatures(
    time: Res<Time>,
    mut query: Query<(&mut Transform, &mut Wander, &CreatureStats, &Brain), With<Creature>>,
) {
    let mut rng = rand::thread_rng();

    for (mut transform, mut wander, stats, brain) in query.iter_mut() {
        if *brain != Brain::Wandering {
            continue;
        }

        wander.timer.tick(time.delta());
        if wander.timer.finished() {
            wander.heading = turn_heading(wander.heading, &mut rng);
            let next = random_interval(stats.0.wander_interval, &mut rng);
            wander.timer = Timer::from_seconds(next, TimerMode::Once);
        }
        wander.heading = bound_heading(
            transform.translation,
            wander.home,
            stats.0.wander_radius,
            wander.heading,
        );

        match step_offset(wander.heading, stats.0.wander_speed, time.delta_secs()) {
            Ok(offset) => {
                transform.translation += offset;
                face(&mut transform, heading_vector(wander.heading));
            }
            Err(e) => {
                warn!("{}, picking a new heading", e);
                wander.heading = random_heading(&mut rng);
            }
        }
    }
}

/// Periodic check for the player entering or leaving detection range.
pub fn detect_player(
    time: Res<Time>,
    session: Res<SessionState>,
    player_query: Query<&Transform, (With<Player>, Without<Creature>)>,
    mut query: Query<(&Creature, &Transform, &CreatureStats, &mut Brain, &mut Detection)>,
) {
    let player = player_query
        .get_single()
        .ok()
        .filter(|_| !session.is_dead())
        .map(|transform| transform.translation);

    for (creature, transform, stats, mut brain, mut detection) in query.iter_mut() {
        if detection.0.ticks(time.elapsed()) == 0 {
            continue;
        }

        let distance = player.map_or(f32::INFINITY, |player| {
            ground_distance(transform.translation, player)
        });
        let next = after_detection(*brain, distance, stats.0.detection_range);
        if next != *brain {
            debug!("'{}' {:?} -> {:?}", creature.id, *brain, next);
            *brain = next;
        }
    }
}

/// Chase the player every frame while engaged.
pub fn pursue_player(
    time: Res<Time>,
    player_query: Query<&Transform, (With<Player>, Without<Creature>)>,
    mut query: Query<(&mut Transform, &CreatureStats, &mut Brain), With<Creature>>,
) {
    let Ok(player_transform) = player_query.get_single() else {
        return;
    };
    let player_pos = player_transform.translation;

    for (mut transform, stats, mut brain) in query.iter_mut() {
        if !matches!(*brain, Brain::Aggressive | Brain::Attacking) {
            continue;
        }

        let distance = ground_distance(transform.translation, player_pos);
        *brain = after_pursuit(*brain, distance, stats.0.attack_range);

        let heading = heading_towards(transform.translation, player_pos);
        if *brain == Brain::Aggressive {
            match step_offset(heading, stats.0.pursuit_speed(), time.delta_secs()) {
                Ok(offset) => transform.translation += offset,
                Err(e) => warn!("{}", e),
            }
        }
        face(&mut transform, heading_vector(heading));
    }
}

/// Hit the player when in range and off cooldown. No facing test.
pub fn creature_attacks(
    mut commands: Commands,
    time: Res<Time>,
    session: Res<SessionState>,
    mut query: Query<(&Creature, &CreatureStats, &Brain, &mut AttackCooldown)>,
) {
    if session.is_dead() {
        return;
    }
    let now = time.elapsed();

    for (creature, stats, brain, mut cooldown) in query.iter_mut() {
        if *brain != Brain::Attacking || !attack_ready(cooldown.last, now, stats.0.attack_cooldown) {
            continue;
        }
        cooldown.last = Some(now);
        commands.publish(PlayerDamage {
            amount: stats.0.attack_damage,
            source: Some(creature.id.clone()),
        });
    }
}

/// Slow regeneration for creatures left alone.
pub fn regenerate_creatures(
    time: Res<Time>,
    mut registry: ResMut<HealthRegistry>,
    mut query: Query<(&Creature, &Brain, &mut CreatureVitals)>,
) {
    let now = time.elapsed();
    let rule = RegenRule::default();

    for (creature, brain, mut vitals) in query.iter_mut() {
        let ticks = vitals.regen.ticks(now);
        if *brain == Brain::Dead {
            continue;
        }
        for _ in 0..ticks {
            let Some(record) = registry.get(&creature.id) else {
                break;
            };
            if !rule.allows(now, vitals.last_damaged, record.current(), record.max_health, None) {
                break;
            }
            registry.heal(&creature.id, rule.amount);
        }
    }
}

/// Swell briefly when hit.
pub fn flash_hurt_creatures(time: Res<Time>, mut query: Query<(&CreatureVitals, &mut Transform)>) {
    let now = time.elapsed();
    for (vitals, mut transform) in query.iter_mut() {
        let scale = if vitals.is_hurt(now) {
            Vec3::splat(1.15)
        } else {
            Vec3::ONE
        };
        if transform.scale != scale {
            transform.scale = scale;
        }
    }
}

/// Keep the registry's advisory positions current.
pub fn sync_creature_positions(
    mut registry: ResMut<HealthRegistry>,
    query: Query<(&Creature, &Transform), Changed<Transform>>,
) {
    for (creature, transform) in query.iter() {
        registry.update_position(&creature.id, transform.translation);
    }
}

/// Despawn creatures once the corpse has lingered.
pub fn despawn_dead_creatures(
    mut commands: Commands,
    time: Res<Time>,
    mut query: Query<(Entity, &mut DeathTimer)>,
) {
    for (entity, mut death_timer) in query.iter_mut() {
        death_timer.0.tick(time.delta());

        if death_timer.0.finished() {
            commands.entity(entity).despawn_recursive();
        }
    }
}

fn face(transform: &mut Transform, direction: Vec3) {
    if direction.length_squared() > f32::EPSILON {
        let target = transform.translation + direction;
        transform.look_at(target, Vec3::Y);
    }
}
