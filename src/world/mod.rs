//! World module - the forest, home and store scenes.

mod layout;
mod plugin;
mod spawning;

pub use layout::{spawn_point, CreatureSpawn, SceneLayout};
pub use plugin::WorldPlugin;
pub use spawning::{build_scene, clear_scene, sync_scene, ActiveScene, SceneEntity};
