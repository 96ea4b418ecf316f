//! Core plugin that sets up app states, the event bus and frame ordering.

use bevy::prelude::*;

use super::bus::{release_subscriptions, EventBus};
use super::config::load_tuning;
use super::states::*;

/// Per-frame ordering of the simulation.
///
/// Movement and physics writes happen first, the camera follows the moved
/// body, then combat, creatures, loot and the session react, and read-only
/// presentation runs last.
#[derive(SystemSet, Debug, Clone, PartialEq, Eq, Hash)]
pub enum SimSet {
    Input,
    Movement,
    Camera,
    Simulation,
    Presentation,
}

/// Core plugin - must be added first as other plugins depend on it.
///
/// This plugin sets up:
/// - Game states (Loading, InGame, Paused)
/// - The event bus and subscription teardown
/// - Tuning loading
/// - System set ordering shared by every other plugin
pub struct CorePlugin;

impl Plugin for CorePlugin {
    fn build(&self, app: &mut App) {
        app
            .init_state::<GameState>()
            .init_resource::<EventBus>()
            .add_observer(release_subscriptions)

            .configure_sets(
                Update,
                (
                    SimSet::Input,
                    SimSet::Movement,
                    SimSet::Camera,
                    SimSet::Simulation,
                    SimSet::Presentation,
                )
                    .chain(),
            )
            .configure_sets(
                Update,
                (
                    SimSet::Input,
                    SimSet::Movement,
                    SimSet::Camera,
                    SimSet::Simulation,
                )
                    .run_if(in_state(GameState::InGame)),
            )

            // Loading state - read data files, then start
            .add_systems(
                OnEnter(GameState::Loading),
                (load_tuning, transition_to_game).chain(),
            )

            // Paused time does not count towards any cadence
            .add_systems(OnEnter(GameState::Paused), pause_clock)
            .add_systems(OnExit(GameState::Paused), resume_clock)

            // Pause/unpause with Escape key
            .add_systems(
                Update,
                handle_pause_input
                    .run_if(in_state(GameState::InGame).or(in_state(GameState::Paused))),
            );
    }
}

/// Data files are read synchronously, so the game can start right away.
fn transition_to_game(mut next_state: ResMut<NextState<GameState>>) {
    next_state.set(GameState::InGame);
}

/// Stop virtual time so deadlines do not come due while paused.
fn pause_clock(time: Option<ResMut<Time<Virtual>>>) {
    if let Some(mut time) = time {
        time.pause();
        debug!("Clock paused at {:?}", time.elapsed());
    }
}

fn resume_clock(time: Option<ResMut<Time<Virtual>>>) {
    if let Some(mut time) = time {
        time.unpause();
    }
}

/// Handle Escape key to pause/unpause the game.
fn handle_pause_input(
    keyboard: Option<Res<ButtonInput<KeyCode>>>,
    current_state: Res<State<GameState>>,
    mut next_state: ResMut<NextState<GameState>>,
) {
    let Some(keyboard) = keyboard else {
        return;
    };
    if keyboard.just_pressed(KeyCode::Escape) {
        match current_state.get() {
            GameState::InGame => next_state.set(GameState::Paused),
            GameState::Paused => next_state.set(GameState::InGame),
            GameState::Loading => {}
        }
    }
}

#[cfg(test)]
mod tests {
    use bevy::ecs::system::RunSystemOnce;

    use super::*;

    #[test]
    fn pause_transitions_stop_and_restart_the_clock() {
        let mut world = World::new();
        world.insert_resource(Time::<Virtual>::default());

        world.run_system_once(pause_clock).unwrap();
        assert!(world.resource::<Time<Virtual>>().is_paused());

        world.run_system_once(resume_clock).unwrap();
        assert!(!world.resource::<Time<Virtual>>().is_paused());
    }
}
