//! App flow states and the scenes a player can be in.

use bevy::prelude::*;
use serde::{Deserialize, Serialize};

/// Main app states - controls overall flow.
///
/// - Start in `Loading` while tuning and creature data are read
/// - `InGame` runs the simulation
/// - `Paused` freezes the simulation but keeps the world visible
#[derive(States, Debug, Clone, Copy, Eq, PartialEq, Hash, Default)]
pub enum GameState {
    #[default]
    Loading,
    InGame,
    Paused,
}

/// The three places the player can be.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum SceneId {
    #[default]
    Forest,
    Home,
    Store,
}

impl SceneId {
    pub const ALL: [SceneId; 3] = [SceneId::Forest, SceneId::Home, SceneId::Store];

    pub fn name(self) -> &'static str {
        match self {
            SceneId::Forest => "forest",
            SceneId::Home => "home",
            SceneId::Store => "store",
        }
    }
}
