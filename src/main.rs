//! Coinwood - Entry Point
//!
//! Controls:
//! - WASD / Arrows: Move
//! - Space: Jump
//! - E / Left click: Light attack
//! - Q / Right click: Heavy attack
//! - Left Shift: Dodge
//! - Tab: Toggle click-to-move
//! - 1 / 2 / 3: Forest, home, store
//! - F1-F4: Buy items in the store
//! - Escape: Pause/Unpause

use bevy::prelude::*;
use bevy_rapier3d::prelude::*;

fn main() {
    App::new()
        // Bevy default plugins
        .add_plugins(DefaultPlugins.set(WindowPlugin {
            primary_window: Some(Window {
                title: "Coinwood".to_string(),
                resolution: (1280.0, 720.0).into(),
                ..default()
            }),
            ..default()
        }))

        // Physics
        .add_plugins(RapierPhysicsPlugin::<NoUserData>::default())

        // Our game plugin
        .add_plugins(coinwood::CoinwoodPlugin)

        .run();
}
