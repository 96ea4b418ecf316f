#![allow(clippy::unwrap_used)]

use bevy::prelude::*;
use coinwood::combat::HealthRegistry;
use coinwood::core::{
    release_subscriptions, CreatureDamage, EntityId, EventBus, LootDrop, LootKind, PublishExt,
};
use coinwood::creatures::{spawn_creature, unregister_creature, CreatureDefinition, LootRoll, LootTable};
use coinwood::loot::{materialize_drop, LootConfig, LootPickup, LootRegistry};

fn sure_coins(count: u32) -> CreatureDefinition {
    CreatureDefinition {
        max_health: 20.0,
        loot: LootTable {
            rows: vec![LootRoll {
                kind: LootKind::Coin,
                chance: 1.0,
                min: count,
                max: count,
            }],
            ..default()
        },
        ..default()
    }
}

fn world() -> World {
    let mut world = World::new();
    world.init_resource::<EventBus>();
    world.init_resource::<HealthRegistry>();
    world.init_resource::<LootRegistry>();
    world.init_resource::<LootConfig>();
    world.add_observer(release_subscriptions);
    world.add_observer(unregister_creature);
    let _ = world
        .resource_mut::<EventBus>()
        .subscribe::<LootDrop, _>(materialize_drop);
    world
}

fn lethal(target: &EntityId) -> CreatureDamage {
    CreatureDamage {
        target: target.clone(),
        amount: 50.0,
        attacker: EntityId::new("player"),
    }
}

#[test]
fn second_killing_blow_drops_nothing() {
    let mut w = world();
    let id = EntityId::new("forest-critter-0");
    spawn_creature(&mut w, id.clone(), sure_coins(3), Vec3::new(4.0, 0.5, 0.0));

    w.publish(lethal(&id));
    w.publish(lethal(&id));

    let registry = w.resource::<LootRegistry>();
    assert_eq!(registry.uncollected().count(), 3);
    assert!(registry.uncollected().all(|item| item.kind == LootKind::Coin));
    let pickups = w.query::<&LootPickup>().iter(&w).count();
    assert_eq!(pickups, 3, "one pickup per drop");
}

#[test]
fn damage_for_another_creature_is_ignored() {
    let mut w = world();
    let a = EntityId::new("forest-critter-0");
    let b = EntityId::new("forest-critter-1");
    spawn_creature(&mut w, a.clone(), sure_coins(1), Vec3::ZERO);
    spawn_creature(&mut w, b.clone(), sure_coins(1), Vec3::X * 5.0);

    w.publish(lethal(&a));

    let health = w.resource::<HealthRegistry>();
    assert!(!health.get(&a).unwrap().is_alive());
    assert!(health.get(&b).unwrap().is_alive());
    assert_eq!(w.resource::<LootRegistry>().uncollected().count(), 1);
}

#[test]
fn despawned_creature_leaves_bus_and_registry() {
    let mut w = world();
    let id = EntityId::new("forest-critter-0");
    let entity = spawn_creature(&mut w, id.clone(), sure_coins(1), Vec3::ZERO);
    assert_eq!(w.resource::<EventBus>().subscriber_count::<CreatureDamage>(), 1);

    w.despawn(entity);

    assert_eq!(w.resource::<EventBus>().subscriber_count::<CreatureDamage>(), 0);
    assert!(!w.resource::<HealthRegistry>().contains(&id));
    // Damage for a creature that is gone is a no-op.
    assert_eq!(w.publish(lethal(&id)), 0);
    assert_eq!(w.resource::<LootRegistry>().uncollected().count(), 0);
}
