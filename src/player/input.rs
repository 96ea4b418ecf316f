//! Keyboard and mouse input, turned into intents and bus events.

use std::time::Duration;

use bevy::prelude::*;
use bevy::window::PrimaryWindow;
use bevy_rapier3d::prelude::Velocity;

use super::components::*;
use super::movement::camera_relative;
use crate::combat::{CombatConfig, CombatState};
use crate::core::{
    player_id, AttackIntent, AttackKind, HandlerResult, NavigationRequest, PlayerRespawned,
    PublishCommandsExt, SceneChanged, SceneId, SimError,
};
use crate::session::SessionState;
use crate::world::spawn_point;

/// Snapshot keyboard and mouse state into [`PlayerIntent`].
pub fn read_player_input(
    keyboard: Option<Res<ButtonInput<KeyCode>>>,
    mouse: Option<Res<ButtonInput<MouseButton>>>,
    mode: Res<NavigationMode>,
    mut intent: ResMut<PlayerIntent>,
) {
    let mut next = PlayerIntent::default();

    if let Some(keys) = keyboard.as_deref() {
        next.forward = keys.any_pressed([KeyCode::KeyW, KeyCode::ArrowUp]);
        next.backward = keys.any_pressed([KeyCode::KeyS, KeyCode::ArrowDown]);
        next.left = keys.any_pressed([KeyCode::KeyA, KeyCode::ArrowLeft]);
        next.right = keys.any_pressed([KeyCode::KeyD, KeyCode::ArrowRight]);
        next.jump = keys.just_pressed(KeyCode::Space);
        next.light_attack = keys.just_pressed(KeyCode::KeyE);
        next.heavy_attack = keys.just_pressed(KeyCode::KeyQ);
        next.dodge = keys.just_pressed(KeyCode::ShiftLeft);
        next.scene = if keys.pressed(KeyCode::Digit1) {
            Some(SceneId::Forest)
        } else if keys.pressed(KeyCode::Digit2) {
            Some(SceneId::Home)
        } else if keys.pressed(KeyCode::Digit3) {
            Some(SceneId::Store)
        } else {
            None
        };
    }

    if let Some(buttons) = mouse.as_deref() {
        let left_click = buttons.just_pressed(MouseButton::Left);
        match *mode {
            NavigationMode::Keyboard => next.light_attack |= left_click,
            NavigationMode::ClickToMove => next.navigate_click = left_click,
        }
        next.heavy_attack |= buttons.just_pressed(MouseButton::Right);
    }

    intent.set_if_neq(next);
}

/// Tab switches between keyboard and click-to-move navigation.
pub fn toggle_navigation_mode(
    mut commands: Commands,
    keyboard: Option<Res<ButtonInput<KeyCode>>>,
    mut mode: ResMut<NavigationMode>,
) {
    if !keyboard.is_some_and(|keys| keys.just_pressed(KeyCode::Tab)) {
        return;
    }

    *mode = match *mode {
        NavigationMode::Keyboard => NavigationMode::ClickToMove,
        NavigationMode::ClickToMove => {
            commands.publish(NavigationRequest {
                target: Vec3::ZERO,
                enabled: false,
            });
            NavigationMode::Keyboard
        }
    };
    info!("Navigation mode: {:?}", *mode);
}

/// Where a ray meets the ground plane `y = 0`.
pub fn ground_point(ray: Ray3d) -> Option<Vec3> {
    ray.intersect_plane(Vec3::ZERO, InfinitePlane3d::new(Vec3::Y))
        .map(|distance| ray.get_point(distance))
}

/// Cast the clicked cursor position onto the ground and request navigation.
pub fn publish_click_navigation(
    mut commands: Commands,
    intent: Res<PlayerIntent>,
    window_query: Query<&Window, With<PrimaryWindow>>,
    camera_query: Query<(&Camera, &GlobalTransform), With<PlayerCamera>>,
) {
    if !intent.navigate_click {
        return;
    }
    let (Ok(window), Ok((camera, camera_transform))) =
        (window_query.get_single(), camera_query.get_single())
    else {
        return;
    };
    let Some(cursor) = window.cursor_position() else {
        return;
    };

    let Ok(ray) = camera.viewport_to_world(camera_transform, cursor) else {
        return;
    };
    match ground_point(ray) {
        Some(target) => commands.publish(NavigationRequest {
            target,
            enabled: true,
        }),
        None => debug!("Click at {} missed the ground", cursor),
    }
}

/// Turn attack and dodge intents into combat actions.
pub fn issue_combat_actions(
    mut commands: Commands,
    time: Res<Time>,
    intent: Res<PlayerIntent>,
    config: Res<CombatConfig>,
    mut combat: ResMut<CombatState>,
    session: Res<SessionState>,
    player_query: Query<(&Transform, &PlayerMotion), With<Player>>,
    camera_query: Query<&Transform, (With<PlayerCamera>, Without<Player>)>,
) {
    if session.is_dead() {
        return;
    }
    let Ok((transform, motion)) = player_query.get_single() else {
        return;
    };

    let kind = if intent.heavy_attack {
        Some(AttackKind::Heavy)
    } else if intent.light_attack {
        Some(AttackKind::Light)
    } else {
        None
    };
    if let Some(kind) = kind {
        commands.publish(AttackIntent {
            kind,
            origin: transform.translation,
            facing: motion.heading,
        });
    }

    if intent.dodge {
        let camera_forward = camera_query
            .get_single()
            .map(|camera| *camera.forward())
            .unwrap_or(Vec3::NEG_Z);
        let moving = camera_relative(intent.axis(), camera_forward);
        let direction = if moving == Vec3::ZERO { motion.heading } else { moving };

        match combat.perform_dodge(direction, time.elapsed(), &config) {
            Ok(serial) => debug!("Dodge #{} toward {}", serial, direction),
            Err(e) => trace!("{}", e),
        }
    }
}

/// Debounced scene switching from the number keys.
pub fn switch_scenes(
    mut commands: Commands,
    time: Res<Time>,
    config: Res<PlayerConfig>,
    intent: Res<PlayerIntent>,
    mut debounce: ResMut<SceneDebounce>,
    mut session: ResMut<SessionState>,
) {
    let Some(scene) = intent.scene else {
        return;
    };
    let window = Duration::from_secs_f32(config.scene_debounce.max(0.0));
    if !debounce.accept(scene, time.elapsed(), window) {
        return;
    }

    if let Some(from) = session.change_scene(scene) {
        info!("Travelling from {} to {}", from.name(), scene.name());
        commands.publish(SceneChanged { from, to: scene });
    }
}

/// Bus handler: set or clear the click-to-move target.
pub fn apply_navigation_request(world: &mut World, request: &NavigationRequest) -> HandlerResult {
    let mut query = world.query_filtered::<&mut PlayerMotion, With<Player>>();
    let Ok(mut motion) = query.get_single_mut(world) else {
        return Err(SimError::UnknownEntity(player_id()));
    };

    motion.nav_target = request.enabled.then_some(request.target);
    Ok(())
}

/// Put the player at `position` with no velocity and make it the new
/// fall-reset point.
pub fn teleport_player(world: &mut World, position: Vec3) -> HandlerResult {
    let mut query = world.query_filtered::<(
        &mut Transform,
        Option<&mut Velocity>,
        &mut PlayerMotion,
    ), With<Player>>();
    let Ok((mut transform, velocity, mut motion)) = query.get_single_mut(world) else {
        return Err(SimError::UnknownEntity(player_id()));
    };

    transform.translation = position;
    if let Some(mut velocity) = velocity {
        *velocity = Velocity::zero();
    }
    motion.spawn_point = position;
    motion.nav_target = None;
    Ok(())
}

/// Bus handler: respawned players start over at the scene's spawn point.
pub fn on_player_respawned(world: &mut World, respawned: &PlayerRespawned) -> HandlerResult {
    teleport_player(world, spawn_point(respawned.scene))
}
