#![allow(clippy::unwrap_used)]

use bevy::prelude::*;
use coinwood::combat::{EntityKind, HealthRegistry};
use coinwood::core::{release_subscriptions, EventBus, LootId, SceneId};
use coinwood::creatures::{unregister_creature, Creature, CreatureCatalog};
use coinwood::loot::{LootConfig, LootPickup, LootRegistry};
use coinwood::session::SessionState;
use coinwood::world::{sync_scene, ActiveScene};

fn world() -> World {
    let mut world = World::new();
    world.init_resource::<EventBus>();
    world.init_resource::<HealthRegistry>();
    world.init_resource::<LootRegistry>();
    world.init_resource::<LootConfig>();
    world.init_resource::<CreatureCatalog>();
    world.init_resource::<SessionState>();
    world.init_resource::<ActiveScene>();
    world.add_observer(release_subscriptions);
    world.add_observer(unregister_creature);
    world
}

fn count<C: Component>(world: &mut World) -> usize {
    world.query::<&C>().iter(world).count()
}

fn travel(world: &mut World, to: SceneId) {
    world.resource_mut::<SessionState>().change_scene(to);
    sync_scene(world);
}

#[test]
fn forest_has_coins_and_critters() {
    let mut w = world();
    sync_scene(&mut w);

    assert_eq!(w.resource::<ActiveScene>().0, Some(SceneId::Forest));
    assert_eq!(count::<LootPickup>(&mut w), 20);
    assert_eq!(count::<Creature>(&mut w), 8);
    assert_eq!(
        w.resource::<HealthRegistry>()
            .find_by_kind(EntityKind::Enemy)
            .count(),
        8
    );
}

#[test]
fn leaving_the_forest_tears_it_down() {
    let mut w = world();
    sync_scene(&mut w);
    travel(&mut w, SceneId::Home);

    assert_eq!(count::<Creature>(&mut w), 0);
    assert_eq!(count::<LootPickup>(&mut w), 5);
    assert_eq!(w.resource::<HealthRegistry>().len(), 0);
    assert_eq!(w.resource::<EventBus>().subscriber_count::<coinwood::core::CreatureDamage>(), 0);
}

#[test]
fn collected_coin_stays_collected_on_return() {
    let mut w = world();
    sync_scene(&mut w);
    let taken = LootId::new("forest-coin-3");
    assert!(w.resource_mut::<LootRegistry>().collect(&taken).is_some());

    travel(&mut w, SceneId::Store);
    travel(&mut w, SceneId::Forest);

    assert_eq!(count::<LootPickup>(&mut w), 19);
    let registry = w.resource::<LootRegistry>();
    assert!(registry.get(&taken).unwrap().is_collected);
    assert_eq!(registry.total_collected(), 1);
}
