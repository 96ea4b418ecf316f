#![allow(clippy::unwrap_used)]

use std::time::Duration;

use bevy::prelude::*;
use bevy::state::app::StatesPlugin;
use bevy::time::TimeUpdateStrategy;
use coinwood::combat::CombatPlugin;
use coinwood::core::{CorePlugin, GameState};
use coinwood::session::{SessionPlugin, SessionState, VitalsConfig};

const FRAME: Duration = Duration::from_millis(100);

fn app() -> App {
    let mut app = App::new();
    app.add_plugins((MinimalPlugins, StatesPlugin, CorePlugin, CombatPlugin, SessionPlugin))
        .insert_resource(TimeUpdateStrategy::ManualDuration(FRAME));
    // Loading reads the tuning file and requests InGame.
    app.update();
    app.insert_resource(VitalsConfig {
        hunger_decay_per_second: 50.0,
        ..default()
    });
    app
}

fn frames(app: &mut App, count: u32) {
    for _ in 0..count {
        app.update();
    }
}

fn set_state(app: &mut App, state: GameState) {
    app.world_mut()
        .resource_mut::<NextState<GameState>>()
        .set(state);
    app.update();
    assert_eq!(*app.world().resource::<State<GameState>>().get(), state);
}

fn session(app: &App) -> &SessionState {
    app.world().resource::<SessionState>()
}

#[test]
fn long_pause_does_not_bunch_starvation_ticks() {
    let mut app = app();
    frames(&mut app, 60);
    assert_eq!(session(&app).hunger(), 0.0);
    assert!(session(&app).health() < 100.0, "starvation has started");
    let before = session(&app).health();

    set_state(&mut app, GameState::Paused);
    frames(&mut app, 300);
    assert_eq!(session(&app).health(), before);

    set_state(&mut app, GameState::InGame);
    frames(&mut app, 2);
    let lost = before - session(&app).health();
    assert!(lost <= 5.0, "lost {lost} health on resume");
}

#[test]
fn pause_does_not_run_down_the_respawn_countdown() {
    let mut app = app();
    frames(&mut app, 5);
    let now = app.world().resource::<Time>().elapsed();
    app.world_mut()
        .resource_mut::<SessionState>()
        .damage_player(1000.0, now);

    set_state(&mut app, GameState::Paused);
    frames(&mut app, 100);
    set_state(&mut app, GameState::InGame);
    frames(&mut app, 2);

    assert!(session(&app).is_dead());
    assert!(session(&app).respawn_countdown() >= 4);
}
