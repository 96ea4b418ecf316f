//! World plugin - scene layouts and transitions.

use bevy::prelude::*;

use super::spawning::{sync_scene, ActiveScene};
use crate::core::{GameState, SimSet};

/// World plugin - keeps the spawned scene in step with the session.
pub struct WorldPlugin;

impl Plugin for WorldPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<ActiveScene>()
            .insert_resource(ClearColor(Color::srgb(0.13, 0.13, 0.2)))
            .add_systems(
                Update,
                sync_scene
                    .in_set(SimSet::Presentation)
                    .run_if(not(in_state(GameState::Loading))),
            );
    }
}
