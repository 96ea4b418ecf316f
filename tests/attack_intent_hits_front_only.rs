#![allow(clippy::unwrap_used)]

use bevy::prelude::*;
use coinwood::combat::{
    resolve_attack_intent, CombatConfig, CombatState, EntityKind, HealthRegistry,
};
use coinwood::core::{AttackIntent, AttackKind, CreatureDamage, EntityId, EventBus, PublishExt};

#[derive(Resource, Default)]
struct Hits(Vec<(String, f32)>);

fn world() -> World {
    let mut world = World::new();
    world.init_resource::<EventBus>();
    world.init_resource::<HealthRegistry>();
    world.init_resource::<CombatState>();
    world.init_resource::<CombatConfig>();
    world.init_resource::<Hits>();
    world.insert_resource(Time::<()>::default());

    let mut bus = world.resource_mut::<EventBus>();
    let _ = bus.subscribe::<AttackIntent, _>(resolve_attack_intent);
    let _ = bus.subscribe::<CreatureDamage, _>(|world, damage| {
        world
            .resource_mut::<Hits>()
            .0
            .push((damage.target.to_string(), damage.amount));
        Ok(())
    });

    let mut registry = world.resource_mut::<HealthRegistry>();
    for (id, position) in [
        ("front", Vec3::new(0.0, 0.5, -2.0)),
        ("behind", Vec3::new(0.0, 0.5, 2.0)),
    ] {
        registry.register(EntityId::new(id), EntityKind::Enemy, 100.0, 100.0, position);
    }
    world
}

fn swing(kind: AttackKind) -> AttackIntent {
    AttackIntent {
        kind,
        origin: Vec3::ZERO,
        facing: Vec3::NEG_Z,
    }
}

fn hits(world: &World) -> Vec<(String, f32)> {
    world.resource::<Hits>().0.clone()
}

#[test]
fn light_swing_hits_only_the_creature_in_front() {
    let mut w = world();
    w.publish(swing(AttackKind::Light));
    assert_eq!(hits(&w), vec![("front".to_string(), 10.0)]);
}

#[test]
fn repeated_intent_inside_cooldown_is_ignored() {
    let mut w = world();
    w.publish(swing(AttackKind::Light));
    w.publish(swing(AttackKind::Light));
    assert_eq!(hits(&w).len(), 1);

    w.resource_mut::<Time>().advance_by(std::time::Duration::from_millis(750));
    w.publish(swing(AttackKind::Heavy));
    assert_eq!(hits(&w).last(), Some(&("front".to_string(), 25.0)));
}

#[test]
fn dead_creatures_are_not_targets() {
    let mut w = world();
    w.resource_mut::<HealthRegistry>()
        .damage(&EntityId::new("front"), 1000.0);

    w.publish(swing(AttackKind::Light));
    assert!(hits(&w).is_empty());
}
