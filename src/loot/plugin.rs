//! Loot plugin - registry, drops and pickups.

use bevy::prelude::*;

use super::components::{LootConfig, PickupScan};
use super::registry::LootRegistry;
use super::systems;
use crate::core::{EventBus, LootDrop, SimSet};

/// Loot plugin - turns creature drops into pickups and collects them.
pub struct LootPlugin;

impl Plugin for LootPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<LootConfig>()
            .init_resource::<LootRegistry>()
            .init_resource::<PickupScan>()
            .add_systems(Startup, systems::create_pickup_visuals)
            .add_systems(
                Update,
                (systems::collect_nearby_loot, systems::expire_loot)
                    .chain()
                    .in_set(SimSet::Simulation),
            );

        let _ = app
            .world_mut()
            .resource_mut::<EventBus>()
            .subscribe::<LootDrop, _>(systems::materialize_drop);
    }
}
