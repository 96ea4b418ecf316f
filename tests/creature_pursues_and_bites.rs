#![allow(clippy::unwrap_used)]

use std::time::Duration;

use bevy::ecs::system::RunSystemOnce;
use bevy::prelude::*;
use coinwood::combat::HealthRegistry;
use coinwood::core::{
    elapsed, release_subscriptions, CreatureDamage, EntityId, EventBus, PlayerDamage, PublishExt,
};
use coinwood::creatures::{
    creature_attacks, detect_player, regenerate_creatures, spawn_creature, unregister_creature,
    Brain, CreatureDefinition,
};
use coinwood::player::Player;
use coinwood::session::SessionState;

const FRAME: Duration = Duration::from_millis(100);

#[derive(Resource, Default)]
struct Bites(Vec<Duration>);

struct Scene {
    world: World,
    creature: Entity,
    id: EntityId,
    player: Entity,
}

fn scene(player_at: Vec3) -> Scene {
    let mut world = World::new();
    world.init_resource::<EventBus>();
    world.init_resource::<HealthRegistry>();
    world.init_resource::<SessionState>();
    world.init_resource::<Bites>();
    world.insert_resource(Time::<()>::default());
    world.add_observer(release_subscriptions);
    world.add_observer(unregister_creature);
    let _ = world
        .resource_mut::<EventBus>()
        .subscribe::<PlayerDamage, _>(|world, _| {
            let now = elapsed(world);
            world.resource_mut::<Bites>().0.push(now);
            Ok(())
        });

    let id = EntityId::new("forest-critter-0");
    let creature = spawn_creature(&mut world, id.clone(), CreatureDefinition::default(), Vec3::ZERO);
    let player = world
        .spawn((Player, Transform::from_translation(player_at)))
        .id();
    Scene {
        world,
        creature,
        id,
        player,
    }
}

impl Scene {
    fn advance(&mut self) {
        self.world.resource_mut::<Time>().advance_by(FRAME);
    }

    fn now(&self) -> Duration {
        elapsed(&self.world)
    }

    fn brain(&self) -> Brain {
        *self.world.get::<Brain>(self.creature).unwrap()
    }

    fn set_brain(&mut self, brain: Brain) {
        *self.world.get_mut::<Brain>(self.creature).unwrap() = brain;
    }

    fn health(&self) -> f32 {
        self.world
            .resource::<HealthRegistry>()
            .get(&self.id)
            .unwrap()
            .current()
    }

    fn hit(&mut self, amount: f32) {
        let target = self.id.clone();
        self.world.publish(CreatureDamage {
            target,
            amount,
            attacker: EntityId::new("player"),
        });
    }

    fn bites(&self) -> Vec<Duration> {
        self.world.resource::<Bites>().0.clone()
    }

    /// Step frames up to and including `until`, running `step` each frame.
    fn run_until(&mut self, until: Duration, mut step: impl FnMut(&mut World)) {
        while self.now() + FRAME <= until {
            self.advance();
            step(&mut self.world);
        }
    }
}

fn ms(ms: u64) -> Duration {
    Duration::from_millis(ms)
}

#[test]
fn detection_is_checked_once_a_second() {
    let mut s = scene(Vec3::new(3.0, 1.0, 0.0));
    let detect = |world: &mut World| world.run_system_once(detect_player).unwrap();

    // First check arms the cadence at 0.1 s.
    s.run_until(ms(1000), detect);
    assert_eq!(s.brain(), Brain::Wandering);
    s.run_until(ms(1100), detect);
    assert_eq!(s.brain(), Brain::Aggressive);

    // Walking away is only noticed at the next check.
    s.world.get_mut::<Transform>(s.player).unwrap().translation = Vec3::new(30.0, 1.0, 0.0);
    s.run_until(ms(2000), detect);
    assert_eq!(s.brain(), Brain::Aggressive);
    s.run_until(ms(2100), detect);
    assert_eq!(s.brain(), Brain::Wandering);
}

#[test]
fn bites_respect_the_cooldown_and_need_attack_range() {
    let mut s = scene(Vec3::new(1.0, 1.0, 0.0));
    let attack = |world: &mut World| world.run_system_once(creature_attacks).unwrap();

    s.run_until(ms(1000), attack);
    assert!(s.bites().is_empty(), "wandering creatures do not bite");

    s.set_brain(Brain::Attacking);
    s.run_until(ms(6000), attack);
    assert_eq!(s.bites(), vec![ms(1100), ms(3100), ms(5100)]);

    s.set_brain(Brain::Aggressive);
    s.run_until(ms(10_000), attack);
    assert_eq!(s.bites().len(), 3);
}

#[test]
fn regeneration_waits_five_seconds_after_a_hit() {
    let mut s = scene(Vec3::new(50.0, 1.0, 0.0));
    let regen = |world: &mut World| world.run_system_once(regenerate_creatures).unwrap();

    s.advance();
    s.hit(30.0);
    regen(&mut s.world);
    assert_eq!(s.health(), 70.0);

    s.run_until(ms(5000), regen);
    assert_eq!(s.health(), 70.0);
    s.run_until(ms(7000), regen);
    assert_eq!(s.health(), 72.0);
}

#[test]
fn dead_creatures_neither_heal_nor_bite() {
    let mut s = scene(Vec3::new(1.0, 1.0, 0.0));
    s.set_brain(Brain::Attacking);

    s.advance();
    s.hit(1000.0);
    assert_eq!(s.brain(), Brain::Dead);

    s.run_until(ms(15_000), |world| {
        world.run_system_once(regenerate_creatures).unwrap();
        world.run_system_once(creature_attacks).unwrap();
    });
    assert_eq!(s.health(), 0.0);
    assert!(s.bites().is_empty());
}
