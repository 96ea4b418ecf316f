//! Combat systems - attack resolution and action windows.

use bevy::prelude::*;

use super::components::*;
use super::health::{EntityKind, HealthRegistry};
use super::resolver::resolve_swing;
use crate::core::{elapsed, player_id, AttackIntent, EventBus, HandlerResult, PublishExt, SimSet};

/// Configure combat systems and bus subscriptions.
pub fn setup_combat_systems(app: &mut App) {
    app.init_resource::<CombatConfig>()
        .init_resource::<CombatState>()
        .init_resource::<HealthRegistry>()
        .add_systems(Update, update_action_windows.in_set(SimSet::Input));

    let _ = app
        .world_mut()
        .resource_mut::<EventBus>()
        .subscribe::<AttackIntent, _>(resolve_attack_intent);
}

/// Revert attacks and dodges whose windows have expired.
fn update_action_windows(time: Res<Time>, mut combat: ResMut<CombatState>) {
    combat.tick(time.elapsed());
}

/// Bus handler: gate an attack intent through the cooldowns, then damage
/// every living enemy inside the swing's cone exactly once.
pub fn resolve_attack_intent(world: &mut World, intent: &AttackIntent) -> HandlerResult {
    let now = elapsed(world);
    let config = world
        .get_resource::<CombatConfig>()
        .cloned()
        .unwrap_or_default();

    let Some(mut combat) = world.get_resource_mut::<CombatState>() else {
        return Ok(());
    };
    let mut swing = match combat.perform_attack(intent.kind, now, &config) {
        Ok(swing) => swing,
        Err(rejected) => {
            // Held or repeated input lands here every frame; not a fault.
            trace!("{}", rejected);
            return Ok(());
        }
    };

    let hits = {
        let Some(registry) = world.get_resource::<HealthRegistry>() else {
            return Ok(());
        };
        let targets = registry
            .find_by_kind(EntityKind::Enemy)
            .filter(|enemy| enemy.is_alive())
            .map(|enemy| (&enemy.id, enemy.position));
        resolve_swing(&mut swing, intent.origin, intent.facing, &config, targets)
    };

    debug!(
        "Swing #{} ({:?}) hit {} target(s)",
        swing.id,
        swing.kind,
        hits.len()
    );
    for hit in hits {
        world.publish(CreatureDamage {
            target: hit.target,
            amount: hit.amount,
            attacker: player_id(),
        });
    }
    Ok(())
}
