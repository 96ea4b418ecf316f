//! UI plugin - HUD and pause overlay.

use bevy::prelude::*;

use super::hud;
use crate::core::GameState;
use crate::session::{SessionState, STORE_CATALOG};

const STORE_KEYS: [&str; 4] = ["F1", "F2", "F3", "F4"];

const CONTROLS: &[&str] = &[
    "WASD / Arrows - move, Space - jump",
    "E / Left click - light attack, Q / Right click - heavy attack",
    "Left Shift - dodge, Tab - click-to-move",
    "1 / 2 / 3 - forest, home, store",
];

/// UI plugin - read-only views of the session.
pub struct UiPlugin;

impl Plugin for UiPlugin {
    fn build(&self, app: &mut App) {
        hud::setup_hud_systems(app);

        app.add_systems(OnEnter(GameState::Paused), show_pause_overlay)
            .add_systems(OnExit(GameState::Paused), hide_pause_overlay);
    }
}

/// Marker for pause overlay entities.
#[derive(Component)]
struct PauseOverlay;

/// One line per catalog item, with its key and whether it is affordable.
pub fn store_lines(session: &SessionState) -> Vec<String> {
    STORE_KEYS
        .iter()
        .zip(STORE_CATALOG.iter())
        .map(|(key, item)| {
            let owned = session.inventory().contains(&item.name);
            let note = if owned {
                " (owned)"
            } else if session.coins() < item.price {
                " (not enough coins)"
            } else {
                ""
            };
            format!("{key}  {} - {} coins{note}", item.name, item.price)
        })
        .collect()
}

fn overlay_text(parent: &mut ChildBuilder, text: impl Into<String>, size: f32, gap: f32) {
    parent.spawn((
        Text::new(text),
        TextFont {
            font_size: size,
            ..default()
        },
        TextColor(Color::srgb(0.8, 0.8, 0.85)),
        Node {
            margin: UiRect::bottom(Val::Px(gap)),
            ..default()
        },
    ));
}

/// Dim the screen and list the controls and the store catalog.
fn show_pause_overlay(mut commands: Commands, session: Res<SessionState>) {
    let store = store_lines(&session);
    commands
        .spawn((
            Node {
                width: Val::Percent(100.0),
                height: Val::Percent(100.0),
                flex_direction: FlexDirection::Column,
                justify_content: JustifyContent::Center,
                align_items: AlignItems::Center,
                ..default()
            },
            BackgroundColor(Color::srgba(0.0, 0.0, 0.0, 0.7)),
            PauseOverlay,
        ))
        .with_children(|parent| {
            overlay_text(parent, "PAUSED", 48.0, 30.0);
            for line in CONTROLS {
                overlay_text(parent, *line, 16.0, 4.0);
            }
            overlay_text(parent, "Store (buy while in the store)", 22.0, 6.0);
            for line in store {
                overlay_text(parent, line, 16.0, 4.0);
            }
            overlay_text(parent, "Press Escape to resume", 14.0, 0.0);
        });
}

fn hide_pause_overlay(mut commands: Commands, query: Query<Entity, With<PauseOverlay>>) {
    for entity in query.iter() {
        commands.entity(entity).despawn_recursive();
    }
}
