//! Creature module - roaming creatures that fight back and drop loot.

mod ai;
mod brain;
mod components;
mod data;
mod plugin;
mod spawning;

pub use ai::{
    creature_attacks, despawn_dead_creatures, detect_player, flash_hurt_creatures, pursue_player,
    regenerate_creatures, sync_creature_positions, wander_creatures,
};
pub use brain::{after_detection, after_pursuit, attack_ready, bound_heading, ground_distance};
pub use components::*;
pub use data::{
    load_creature_definitions, CreatureCatalog, CreatureDefinition, LootRoll, LootTable,
    CREATURES_DIR, DEFAULT_CREATURE,
};
pub use plugin::CreaturePlugin;
pub use spawning::{receive_damage, spawn_creature, unregister_creature, CreatureVisuals};
