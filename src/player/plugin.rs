//! Player plugin - input, movement, and camera.

use bevy::prelude::*;
use bevy_rapier3d::prelude::*;

use super::components::*;
use super::{input, movement};
use crate::combat::{EntityKind, HealthRegistry};
use crate::core::{player_id, EventBus, NavigationRequest, PlayerRespawned, SimSet};
use crate::session::SessionState;
use crate::world::spawn_point;

/// Player plugin - handles player spawning, movement, and camera.
pub struct PlayerPlugin;

impl Plugin for PlayerPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<PlayerConfig>()
            .init_resource::<PlayerIntent>()
            .init_resource::<NavigationMode>()
            .init_resource::<SceneDebounce>()
            .add_systems(Startup, setup_player)
            .add_systems(
                Update,
                (
                    input::read_player_input,
                    input::toggle_navigation_mode,
                    input::publish_click_navigation,
                    input::issue_combat_actions,
                )
                    .chain()
                    .in_set(SimSet::Input),
            )
            .add_systems(
                Update,
                (movement::move_player, movement::sync_player_position)
                    .chain()
                    .in_set(SimSet::Movement),
            )
            .add_systems(Update, movement::follow_camera.in_set(SimSet::Camera))
            .add_systems(Update, input::switch_scenes.in_set(SimSet::Simulation));

        let mut bus = app.world_mut().resource_mut::<EventBus>();
        let _ = bus.subscribe::<NavigationRequest, _>(input::apply_navigation_request);
        let _ = bus.subscribe::<PlayerRespawned, _>(input::on_player_respawned);
    }
}

/// Spawn the player and its camera at the current scene's spawn point.
fn setup_player(
    mut commands: Commands,
    config: Res<PlayerConfig>,
    session: Res<SessionState>,
    mut registry: ResMut<HealthRegistry>,
    meshes: Option<ResMut<Assets<Mesh>>>,
    materials: Option<ResMut<Assets<StandardMaterial>>>,
) {
    let position = spawn_point(session.current_scene());
    let player = spawn_player(&mut commands, position);

    if let (Some(mut meshes), Some(mut materials)) = (meshes, materials) {
        commands.entity(player).insert((
            Mesh3d(meshes.add(Capsule3d::new(0.3, 1.0))),
            MeshMaterial3d(materials.add(Color::srgb(0.3, 0.5, 0.9))),
        ));
    }

    commands.spawn((
        PlayerCamera,
        Camera3d::default(),
        Transform::from_translation(position + config.camera_offset).looking_at(position, Vec3::Y),
    ));

    registry.register(
        player_id(),
        EntityKind::Player,
        session.max_health(),
        session.health(),
        position,
    );
    info!("Player spawned at {}", position);
}

/// Spawn the player body.
pub fn spawn_player(commands: &mut Commands, position: Vec3) -> Entity {
    commands
        .spawn((
            Player,
            PlayerMotion::new(position),
            Transform::from_translation(position),
            Visibility::default(),
            // Rapier physics components
            RigidBody::Dynamic,
            Collider::capsule_y(0.5, 0.3),
            ColliderMassProperties::Mass(1.0),
            LockedAxes::ROTATION_LOCKED,
            Velocity::zero(),
            ExternalImpulse::default(),
            Sleeping::disabled(),
        ))
        .id()
}
