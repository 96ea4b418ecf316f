//! Coinwood - a third-person forest game about coins, critters and hunger.
//!
//! # Architecture
//!
//! The game is organized into plugins, each handling a specific aspect:
//!
//! - **Core**: Event bus, app states, tuning, frame ordering
//! - **Combat**: Health registry, attack cooldowns, hit resolution
//! - **Loot**: Coin and meat registry, pickups
//! - **Session**: Hunger, player health, respawn, wallet and store
//! - **Player**: Movement controller, click-to-move, camera
//! - **Creatures**: Wandering creatures, pursuit and attacks
//! - **World**: Forest, home and store scenes
//! - **UI**: HUD and pause overlay
//!
//! Plugins never call into each other's state directly; cross-plugin effects
//! travel as typed topics on the [`core::EventBus`].

pub mod combat;
pub mod core;
pub mod creatures;
pub mod loot;
pub mod player;
pub mod session;
pub mod ui;
pub mod world;

use bevy::prelude::*;

/// Main game plugin that adds all sub-plugins.
pub struct CoinwoodPlugin;

impl Plugin for CoinwoodPlugin {
    fn build(&self, app: &mut App) {
        app
            // Core systems (must be first)
            .add_plugins(core::CorePlugin)

            // Health registry and combat resolver
            .add_plugins(combat::CombatPlugin)

            // Loot registry and pickups
            .add_plugins(loot::LootPlugin)

            // Player vitals, wallet and store
            .add_plugins(session::SessionPlugin)

            // Player systems
            .add_plugins(player::PlayerPlugin)

            // Creature systems
            .add_plugins(creatures::CreaturePlugin)

            // Scene layouts
            .add_plugins(world::WorldPlugin)

            // UI systems
            .add_plugins(ui::UiPlugin);
    }
}
