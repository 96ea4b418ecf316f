//! Player module - input intents, the movement controller, and the camera.

mod body;
mod components;
mod input;
mod movement;
mod plugin;

pub use body::{PhysicsBody, RapierBody};
pub use components::*;
pub use input::{apply_navigation_request, ground_point, on_player_respawned, teleport_player};
pub use movement::{
    camera_relative, is_grounded, smooth_horizontal, step_player, steer_to, turn_towards,
    StepInput, StepOutcome,
};
pub use plugin::{spawn_player, PlayerPlugin};
