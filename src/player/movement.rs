//! Player controller step and the systems that drive it.
//!
//! `step_player` holds the per-frame rules and only talks to a
//! [`PhysicsBody`], so it runs the same against Rapier and in tests.

use bevy::prelude::*;
use bevy_rapier3d::prelude::*;

use super::body::{PhysicsBody, RapierBody};
use super::components::*;
use crate::combat::{CombatConfig, CombatState, HealthRegistry};
use crate::core::{player_id, SimError};
use crate::session::SessionState;

/// Inputs to one controller step, already resolved from intents.
#[derive(Debug, Clone, Copy, Default)]
pub struct StepInput {
    /// Camera-relative movement direction, length at most 1
    pub direction: Vec3,
    pub jump: bool,
    /// Dodge in progress; velocity is left alone while it lasts
    pub dodging: bool,
    /// Impulse to apply this frame for a newly started dodge
    pub dodge_impulse: Option<Vec3>,
}

/// What a step did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StepOutcome {
    Moved,
    /// Arrived at the click-to-move target this frame
    Arrived,
    /// Fell below the floor and was put back at the spawn point
    Reset,
}

/// Turn held axes into a world direction relative to the camera.
pub fn camera_relative(axis: Vec2, camera_forward: Vec3) -> Vec3 {
    let axis = if axis.length_squared() > 1.0 {
        axis.normalize()
    } else {
        axis
    };
    let forward = Vec3::new(camera_forward.x, 0.0, camera_forward.z).normalize_or_zero();
    let forward = if forward == Vec3::ZERO { Vec3::NEG_Z } else { forward };
    let right = forward.cross(Vec3::Y);

    right * axis.x + forward * axis.y
}

/// Exponentially approach `target` on the horizontal plane. The vertical
/// component of `current` is kept as is.
pub fn smooth_horizontal(current: Vec3, target: Vec3, rate: f32, delta: f32) -> Vec3 {
    let t = 1.0 - (-rate * delta).exp();
    let horizontal = Vec3::new(current.x, 0.0, current.z).lerp(Vec3::new(target.x, 0.0, target.z), t);
    Vec3::new(horizontal.x, current.y, horizontal.z)
}

pub fn is_grounded(height: f32, ground_level: f32, threshold: f32) -> bool {
    height < ground_level + threshold
}

/// Horizontal direction to a navigation target, or `None` once within
/// `radius` of it.
pub fn steer_to(position: Vec3, target: Vec3, radius: f32) -> Option<Vec3> {
    let offset = Vec3::new(target.x - position.x, 0.0, target.z - position.z);
    if offset.length() <= radius {
        None
    } else {
        Some(offset.normalize_or_zero())
    }
}

/// Rotate toward `heading` at `turn_rate` radians per second. A zero
/// heading keeps the current rotation.
pub fn turn_towards(current: Quat, heading: Vec3, turn_rate: f32, delta: f32) -> Quat {
    let heading = Vec3::new(heading.x, 0.0, heading.z);
    if heading.length_squared() <= f32::EPSILON {
        return current;
    }
    let target = Quat::from_rotation_y(f32::atan2(-heading.x, -heading.z));
    let angle = current.angle_between(target);
    if angle <= f32::EPSILON {
        return target;
    }
    current.slerp(target, (turn_rate * delta / angle).min(1.0))
}

/// Advance the player body by one frame.
pub fn step_player(
    body: &mut impl PhysicsBody,
    motion: &mut PlayerMotion,
    input: StepInput,
    config: &PlayerConfig,
    delta: f32,
) -> Result<StepOutcome, SimError> {
    let delta = delta.clamp(0.0, config.max_delta);
    let position = body.position()?;

    if position.y < config.fall_floor {
        body.set_position(motion.spawn_point)?;
        body.set_linear_velocity(Vec3::ZERO)?;
        motion.nav_target = None;
        warn!("Player fell to {:.1}, reset to spawn", position.y);
        return Ok(StepOutcome::Reset);
    }

    let mut outcome = StepOutcome::Moved;
    let direction = if input.direction != Vec3::ZERO {
        motion.nav_target = None;
        input.direction
    } else if let Some(target) = motion.nav_target {
        match steer_to(position, target, config.arrival_radius) {
            Some(direction) => direction,
            None => {
                motion.nav_target = None;
                outcome = StepOutcome::Arrived;
                Vec3::ZERO
            }
        }
    } else {
        Vec3::ZERO
    };

    let current = body.linear_velocity()?;
    let mut velocity = if input.dodging {
        current
    } else {
        smooth_horizontal(current, direction * config.move_speed, config.smoothing, delta)
    };
    if input.jump && is_grounded(position.y, motion.ground_level, config.ground_threshold) {
        velocity.y = config.jump_speed;
    }

    if !velocity.is_finite() {
        let vertical = if current.y.is_finite() { current.y } else { 0.0 };
        body.set_linear_velocity(Vec3::new(0.0, vertical, 0.0))?;
        warn!("Discarding non-finite player velocity {}", velocity);
        return Err(SimError::NumericInstability(player_id().to_string()));
    }

    body.set_linear_velocity(velocity)?;
    if let Some(impulse) = input.dodge_impulse {
        body.apply_impulse(impulse)?;
        body.wake_up()?;
    }
    if direction.length_squared() > f32::EPSILON {
        motion.heading = direction.normalize();
    }

    Ok(outcome)
}

/// Impulse that carries a unit-mass body `distance` units over the dodge.
pub fn dodge_impulse(direction: Vec3, combat: &CombatConfig) -> Vec3 {
    let duration = combat.dodge_duration.max(0.05);
    direction * combat.dodge_distance / duration
}

/// Drive the player body from this frame's intents.
#[allow(clippy::type_complexity)]
pub fn move_player(
    time: Res<Time>,
    config: Res<PlayerConfig>,
    combat_config: Res<CombatConfig>,
    intent: Res<PlayerIntent>,
    session: Res<SessionState>,
    combat: Res<CombatState>,
    camera_query: Query<&Transform, (With<PlayerCamera>, Without<Player>)>,
    mut player_query: Query<
        (
            &mut Transform,
            Option<&mut Velocity>,
            Option<&mut ExternalImpulse>,
            Option<&mut Sleeping>,
            &mut PlayerMotion,
        ),
        With<Player>,
    >,
) {
    let Ok((mut transform, velocity, impulse, sleeping, mut motion)) =
        player_query.get_single_mut()
    else {
        return;
    };
    let delta = time.delta_secs().min(config.max_delta);

    let camera_forward = camera_query
        .get_single()
        .map(|camera| *camera.forward())
        .unwrap_or(Vec3::NEG_Z);
    let mut input = StepInput {
        dodging: combat.is_dodging,
        ..default()
    };
    if !session.is_dead() {
        input.direction = camera_relative(intent.axis(), camera_forward);
        input.jump = intent.jump;
        if combat.dodge_serial() != motion.applied_dodge {
            motion.applied_dodge = combat.dodge_serial();
            input.dodge_impulse = combat
                .dodge_direction
                .map(|direction| dodge_impulse(direction, &combat_config));
        }
    }

    transform.rotation = turn_towards(transform.rotation, motion.heading, config.turn_rate, delta);
    let mut body = RapierBody {
        transform,
        velocity,
        impulse,
        sleeping,
    };
    match step_player(&mut body, &mut motion, input, &config, delta) {
        Ok(StepOutcome::Arrived) => debug!("Reached navigation target"),
        Ok(_) => {}
        Err(e) => warn!("Player step skipped: {}", e),
    }
}

/// Keep the registry's advisory player position current.
pub fn sync_player_position(
    player_query: Query<&Transform, (With<Player>, Changed<Transform>)>,
    mut registry: ResMut<HealthRegistry>,
) {
    if let Ok(transform) = player_query.get_single() {
        registry.update_position(&player_id(), transform.translation);
    }
}

/// Smoothly follow the player from a fixed offset.
pub fn follow_camera(
    time: Res<Time>,
    config: Res<PlayerConfig>,
    player_query: Query<&Transform, (With<Player>, Without<PlayerCamera>)>,
    mut camera_query: Query<&mut Transform, With<PlayerCamera>>,
) {
    let (Ok(player), Ok(mut camera)) = (player_query.get_single(), camera_query.get_single_mut())
    else {
        return;
    };

    let delta = time.delta_secs().min(config.max_delta);
    let t = 1.0 - (-config.camera_follow * delta).exp();
    let goal = player.translation + config.camera_offset;
    camera.translation = camera.translation.lerp(goal, t);
    camera.look_at(player.translation, Vec3::Y);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::player::body::TestBody;

    const DT: f32 = 1.0 / 60.0;

    fn standing() -> TestBody {
        TestBody {
            position: Vec3::new(0.0, 0.8, 0.0),
            ..default()
        }
    }

    fn run(
        body: &mut TestBody,
        motion: &mut PlayerMotion,
        input: StepInput,
        frames: usize,
    ) -> Vec<StepOutcome> {
        let config = PlayerConfig::default();
        (0..frames)
            .map(|_| {
                let outcome = step_player(body, motion, input, &config, DT).unwrap();
                body.position += body.velocity * DT;
                outcome
            })
            .collect()
    }

    fn horizontal_speed(velocity: Vec3) -> f32 {
        Vec2::new(velocity.x, velocity.z).length()
    }

    #[test]
    fn diagonal_speed_is_normalized() {
        let config = PlayerConfig::default();
        for axis in [Vec2::new(1.0, 1.0), Vec2::new(-1.0, 1.0), Vec2::new(1.0, -1.0), Vec2::new(-1.0, -1.0)] {
            let mut body = standing();
            let mut motion = PlayerMotion::new(Vec3::ZERO);
            let input = StepInput {
                direction: camera_relative(axis, Vec3::NEG_Z),
                ..default()
            };

            for _ in 0..120 {
                step_player(&mut body, &mut motion, input, &config, DT).unwrap();
                assert!(horizontal_speed(body.velocity) <= config.move_speed + 1e-3);
            }
            assert!(horizontal_speed(body.velocity) > config.move_speed * 0.9);
        }
    }

    #[test]
    fn velocity_is_smoothed_not_snapped() {
        let config = PlayerConfig::default();
        let mut body = standing();
        let mut motion = PlayerMotion::new(Vec3::ZERO);
        let input = StepInput {
            direction: Vec3::NEG_Z,
            ..default()
        };

        step_player(&mut body, &mut motion, input, &config, DT).unwrap();
        assert!(horizontal_speed(body.velocity) < config.move_speed * 0.5);
    }

    #[test]
    fn vertical_velocity_is_not_smoothed() {
        let config = PlayerConfig::default();
        let mut body = TestBody {
            position: Vec3::new(0.0, 3.0, 0.0),
            velocity: Vec3::new(0.0, -4.0, 0.0),
            ..default()
        };
        let mut motion = PlayerMotion::new(Vec3::ZERO);

        step_player(&mut body, &mut motion, StepInput::default(), &config, DT).unwrap();
        assert_eq!(body.velocity.y, -4.0);
    }

    #[test]
    fn click_target_is_cleared_on_arrival() {
        let mut body = standing();
        let mut motion = PlayerMotion::new(Vec3::ZERO);
        motion.nav_target = Some(Vec3::new(4.0, 0.0, 0.0));

        let outcomes = run(&mut body, &mut motion, StepInput::default(), 240);

        assert!(outcomes.contains(&StepOutcome::Arrived));
        assert_eq!(motion.nav_target, None);
        assert!((body.position.x - 4.0).abs() <= 1.5, "stopped at {}", body.position);
    }

    #[test]
    fn keyboard_input_cancels_click_target() {
        let mut body = standing();
        let mut motion = PlayerMotion::new(Vec3::ZERO);
        motion.nav_target = Some(Vec3::new(10.0, 0.0, 0.0));
        let input = StepInput {
            direction: Vec3::Z,
            ..default()
        };

        run(&mut body, &mut motion, input, 1);
        assert_eq!(motion.nav_target, None);
    }

    #[test]
    fn jump_needs_ground() {
        let config = PlayerConfig::default();
        let mut motion = PlayerMotion::new(Vec3::ZERO);
        let input = StepInput {
            jump: true,
            ..default()
        };

        let mut grounded = standing();
        step_player(&mut grounded, &mut motion, input, &config, DT).unwrap();
        assert_eq!(grounded.velocity.y, config.jump_speed);

        let mut airborne = TestBody {
            position: Vec3::new(0.0, 2.5, 0.0),
            velocity: Vec3::new(0.0, 3.0, 0.0),
            ..default()
        };
        step_player(&mut airborne, &mut motion, input, &config, DT).unwrap();
        assert_eq!(airborne.velocity.y, 3.0);
    }

    #[test]
    fn falling_below_floor_resets_to_spawn() {
        let config = PlayerConfig::default();
        let spawn = Vec3::new(2.0, 1.0, -3.0);
        let mut motion = PlayerMotion::new(spawn);
        motion.nav_target = Some(Vec3::X);
        let mut body = TestBody {
            position: Vec3::new(5.0, -10.5, 5.0),
            velocity: Vec3::new(1.0, -20.0, 0.0),
            ..default()
        };

        let outcome = step_player(&mut body, &mut motion, StepInput::default(), &config, DT);

        assert_eq!(outcome, Ok(StepOutcome::Reset));
        assert_eq!(body.position, spawn);
        assert_eq!(body.velocity, Vec3::ZERO);
        assert_eq!(motion.nav_target, None);
    }

    #[test]
    fn heading_is_kept_when_stationary() {
        let mut body = standing();
        let mut motion = PlayerMotion::new(Vec3::ZERO);

        run(&mut body, &mut motion, StepInput { direction: Vec3::X, ..default() }, 5);
        run(&mut body, &mut motion, StepInput::default(), 5);

        assert_eq!(motion.heading, Vec3::X);
        let rotation = turn_towards(Quat::IDENTITY, Vec3::ZERO, 10.0, DT);
        assert_eq!(rotation, Quat::IDENTITY);
    }

    #[test]
    fn turning_converges_on_heading() {
        let mut rotation = Quat::IDENTITY;
        for _ in 0..60 {
            rotation = turn_towards(rotation, Vec3::X, 10.0, DT);
        }
        assert!((rotation * Vec3::NEG_Z).distance(Vec3::X) < 1e-3);
    }

    #[test]
    fn dodge_impulse_is_applied_once() {
        let config = PlayerConfig::default();
        let combat = CombatConfig::default();
        let mut body = standing();
        let mut motion = PlayerMotion::new(Vec3::ZERO);
        let input = StepInput {
            dodging: true,
            dodge_impulse: Some(dodge_impulse(Vec3::X, &combat)),
            ..default()
        };

        step_player(&mut body, &mut motion, input, &config, DT).unwrap();
        assert!(body.impulse.distance(Vec3::X * 10.0) < 1e-4);
    }

    #[test]
    fn stale_body_is_reported() {
        let config = PlayerConfig::default();
        let mut body = TestBody {
            detached: true,
            ..default()
        };
        let mut motion = PlayerMotion::new(Vec3::ZERO);

        let result = step_player(&mut body, &mut motion, StepInput::default(), &config, DT);
        assert!(matches!(result, Err(SimError::InvalidHandle(_))));
    }

    #[test]
    fn non_finite_velocity_is_discarded() {
        let config = PlayerConfig::default();
        let mut body = TestBody {
            position: Vec3::new(0.0, 0.8, 0.0),
            velocity: Vec3::new(f32::NAN, 0.0, 1.0),
            ..default()
        };
        let mut motion = PlayerMotion::new(Vec3::ZERO);

        let result = step_player(&mut body, &mut motion, StepInput::default(), &config, DT);

        assert!(matches!(result, Err(SimError::NumericInstability(_))));
        assert_eq!(body.velocity, Vec3::ZERO);
    }
}
