//! Session module - the player's vitals, wallet and store purchases.

mod plugin;
mod store;
mod systems;
mod vitals;

pub use plugin::SessionPlugin;
pub use store::{find_item, StoreError, StoreItem, STORE_CATALOG};
pub use systems::{apply_loot_collected, apply_player_damage, tick_session};
pub use vitals::{SessionState, SessionTransition, VitalsConfig};
