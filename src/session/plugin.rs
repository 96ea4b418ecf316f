//! Session plugin - vitals, coins, store.

use bevy::prelude::*;

use super::systems;
use super::vitals::{SessionState, VitalsConfig};
use crate::core::{EventBus, LootCollected, PlayerDamage, SimSet};

/// Session plugin - owns the player's health, hunger and wallet.
pub struct SessionPlugin;

impl Plugin for SessionPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<VitalsConfig>()
            .init_resource::<SessionState>()
            .add_systems(
                Update,
                (
                    systems::tick_session,
                    systems::handle_store_input,
                    systems::mirror_player_health,
                )
                    .chain()
                    .in_set(SimSet::Simulation),
            );

        let mut bus = app.world_mut().resource_mut::<EventBus>();
        let _ = bus.subscribe::<PlayerDamage, _>(systems::apply_player_damage);
        let _ = bus.subscribe::<LootCollected, _>(systems::apply_loot_collected);
    }
}
