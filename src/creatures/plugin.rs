//! Creature plugin - data loading, AI, death.

use bevy::prelude::*;

use super::data::{load_creature_definitions, CreatureCatalog};
use super::{ai, spawning};
use crate::core::{GameState, SimSet};

/// Creature plugin - wandering, aggressive, attacking and dying creatures.
pub struct CreaturePlugin;

impl Plugin for CreaturePlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<CreatureCatalog>()
            .add_observer(spawning::unregister_creature)
            .add_systems(Startup, spawning::create_creature_visuals)
            .add_systems(OnEnter(GameState::Loading), load_creature_definitions)
            .add_systems(
                Update,
                (
                    ai::wander_creatures,
                    ai::detect_player,
                    ai::pursue_player,
                    ai::creature_attacks,
                    ai::regenerate_creatures,
                    ai::flash_hurt_creatures,
                    ai::sync_creature_positions,
                    ai::despawn_dead_creatures,
                )
                    .chain()
                    .in_set(SimSet::Simulation),
            );
    }
}
