//! Session systems and bus handlers.

use bevy::prelude::*;

use super::store::STORE_CATALOG;
use super::vitals::{SessionState, SessionTransition, VitalsConfig};
use crate::combat::{CombatState, HealthRegistry};
use crate::core::{
    elapsed, player_id, HandlerResult, LootCollected, LootKind, PlayerDamage, PlayerDied,
    PlayerRespawned, PublishCommandsExt, PublishExt, SceneChanged, SceneId, SimError,
};
use crate::loot::LootConfig;

/// Advance vitals and announce death and respawn.
pub fn tick_session(
    mut commands: Commands,
    time: Res<Time>,
    config: Res<VitalsConfig>,
    mut session: ResMut<SessionState>,
) {
    for transition in session.tick(time.elapsed(), &config) {
        match transition {
            SessionTransition::Died => commands.publish(PlayerDied),
            SessionTransition::Respawned { from } => {
                if from != SceneId::Home {
                    commands.publish(SceneChanged {
                        from,
                        to: SceneId::Home,
                    });
                }
                commands.publish(PlayerRespawned {
                    scene: SceneId::Home,
                });
            }
        }
    }
}

/// Copy the session's player health into the health registry.
pub fn mirror_player_health(session: Res<SessionState>, mut registry: ResMut<HealthRegistry>) {
    if session.is_changed() {
        registry.set_current(&player_id(), session.health());
    }
}

/// Bus handler: damage dealt to the player. Dodging grants invulnerability.
pub fn apply_player_damage(world: &mut World, damage: &PlayerDamage) -> HandlerResult {
    let now = elapsed(world);
    if world
        .get_resource::<CombatState>()
        .is_some_and(|combat| combat.is_dodging)
    {
        trace!("Dodged {} damage", damage.amount);
        return Ok(());
    }

    let Some(mut session) = world.get_resource_mut::<SessionState>() else {
        return Err(SimError::Handler("session state missing".to_string()));
    };
    let outcome = session.damage_player(damage.amount, now);
    let health = session.health();

    if let Some(mut registry) = world.get_resource_mut::<HealthRegistry>() {
        registry.set_current(&player_id(), health);
    }
    if outcome == Some(SessionTransition::Died) {
        world.publish(PlayerDied);
    }
    Ok(())
}

/// Bus handler: credit collected loot to the session.
pub fn apply_loot_collected(world: &mut World, collected: &LootCollected) -> HandlerResult {
    let meat_hunger = world
        .get_resource::<LootConfig>()
        .map_or(LootConfig::default().meat_hunger, |config| config.meat_hunger);
    let Some(mut session) = world.get_resource_mut::<SessionState>() else {
        return Err(SimError::Handler("session state missing".to_string()));
    };

    match collected.kind {
        LootKind::Coin => session.add_coins(collected.value),
        LootKind::Meat => {
            session.eat_meat(meat_hunger);
        }
    }
    Ok(())
}

/// F1-F4 buy the matching catalog item while in the store.
pub fn handle_store_input(
    keyboard: Option<Res<ButtonInput<KeyCode>>>,
    mut session: ResMut<SessionState>,
) {
    let Some(keyboard) = keyboard else {
        return;
    };
    let keys = [KeyCode::F1, KeyCode::F2, KeyCode::F3, KeyCode::F4];
    for (key, item) in keys.iter().zip(STORE_CATALOG.iter()) {
        if !keyboard.just_pressed(*key) {
            continue;
        }
        match session.purchase(item.name) {
            Ok(item) => info!("Bought {} for {} coins", item.name, item.price),
            Err(e) => info!("{}", e),
        }
    }
}
