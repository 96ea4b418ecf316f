//! Player-related components and resources.

use std::time::Duration;

use bevy::prelude::*;
use serde::Deserialize;

use crate::core::SceneId;

/// Marker component for the player entity.
#[derive(Component)]
pub struct Player;

/// Marker component for the follow camera.
#[derive(Component)]
pub struct PlayerCamera;

/// Per-player controller state that survives between frames.
#[derive(Component, Debug, Clone)]
pub struct PlayerMotion {
    /// Last non-zero horizontal movement direction. Also the attack facing.
    pub heading: Vec3,
    /// Height of the floor the player last spawned on
    pub ground_level: f32,
    /// Where a fall below the floor threshold puts the player back
    pub spawn_point: Vec3,
    /// Pending click-to-move destination
    pub nav_target: Option<Vec3>,
    /// Serial of the last dodge whose impulse was applied
    pub applied_dodge: u64,
}

impl PlayerMotion {
    pub fn new(spawn_point: Vec3) -> Self {
        Self {
            heading: Vec3::NEG_Z,
            ground_level: 0.0,
            spawn_point,
            nav_target: None,
            applied_dodge: 0,
        }
    }
}

/// Player controller tuning.
#[derive(Resource, Debug, Clone, Deserialize)]
#[serde(default)]
pub struct PlayerConfig {
    /// Base movement speed in units per second
    pub move_speed: f32,
    /// Exponential smoothing rate for horizontal velocity, per second
    pub smoothing: f32,
    /// Vertical takeoff speed
    pub jump_speed: f32,
    /// Jumping is allowed below this height above the ground level
    pub ground_threshold: f32,
    /// Click-to-move stops within this distance of the target
    pub arrival_radius: f32,
    /// Falling below this height resets the player to the spawn point
    pub fall_floor: f32,
    /// Body turn rate in radians per second
    pub turn_rate: f32,
    /// Identical scene requests closer together than this are ignored
    pub scene_debounce: f32,
    /// Frame deltas are clamped to this many seconds
    pub max_delta: f32,
    pub camera_offset: Vec3,
    /// Camera follow rate, per second
    pub camera_follow: f32,
}

impl Default for PlayerConfig {
    fn default() -> Self {
        Self {
            move_speed: 5.0,
            smoothing: 10.0,
            jump_speed: 10.0,
            ground_threshold: 1.1,
            arrival_radius: 1.0,
            fall_floor: -10.0,
            turn_rate: 10.0,
            scene_debounce: 0.1,
            max_delta: 0.1,
            camera_offset: Vec3::new(0.0, 3.0, 5.0),
            camera_follow: 5.0,
        }
    }
}

/// Which navigation input drives the player. Exactly one is active.
#[derive(Resource, Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum NavigationMode {
    #[default]
    Keyboard,
    ClickToMove,
}

/// Snapshot of the player's input for this frame.
#[derive(Resource, Debug, Clone, Default, PartialEq)]
pub struct PlayerIntent {
    pub forward: bool,
    pub backward: bool,
    pub left: bool,
    pub right: bool,
    pub jump: bool,
    pub light_attack: bool,
    pub heavy_attack: bool,
    pub dodge: bool,
    pub scene: Option<SceneId>,
    /// Left click in click-to-move mode
    pub navigate_click: bool,
}

impl PlayerIntent {
    /// Movement axes: x to the right, y forward. Not normalized.
    pub fn axis(&self) -> Vec2 {
        let mut axis = Vec2::ZERO;
        if self.forward {
            axis.y += 1.0;
        }
        if self.backward {
            axis.y -= 1.0;
        }
        if self.right {
            axis.x += 1.0;
        }
        if self.left {
            axis.x -= 1.0;
        }
        axis
    }
}

/// One-shot gate for scene switch requests.
#[derive(Resource, Debug, Default)]
pub struct SceneDebounce {
    last: Option<(SceneId, Duration)>,
}

impl SceneDebounce {
    /// True if the request should go through. Repeats of the previous
    /// request inside `window` are swallowed.
    pub fn accept(&mut self, scene: SceneId, now: Duration, window: Duration) -> bool {
        if let Some((last_scene, at)) = self.last {
            if last_scene == scene && now.saturating_sub(at) < window {
                return false;
            }
        }
        self.last = Some((scene, now));
        true
    }
}
