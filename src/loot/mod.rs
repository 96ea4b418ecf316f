//! Loot module - coins and meat, dropped or placed, and their pickup.

mod components;
mod plugin;
mod registry;
mod systems;

pub use components::*;
pub use plugin::LootPlugin;
pub use registry::{LootItem, LootRegistry};
pub use systems::{collect_nearby_loot, expire_loot, materialize_drop, spawn_pickup};
