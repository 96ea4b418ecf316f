//! In-game HUD - health, hunger, coins and the respawn countdown.

use std::time::Duration;

use bevy::prelude::*;

use crate::core::{
    elapsed, EventBus, GameState, HandlerResult, PlayerDied, SceneChanged, SimSet,
};
use crate::loot::LootRegistry;
use crate::session::SessionState;

/// How long a banner message stays up.
const MESSAGE_TIME: Duration = Duration::from_secs(3);

/// Marker for HUD root entity.
#[derive(Component)]
pub struct HudRoot;

/// Marker for health bar fill.
#[derive(Component)]
pub struct HealthBar;

/// Marker for hunger bar fill.
#[derive(Component)]
pub struct HungerBar;

/// Marker for the coin counter text.
#[derive(Component)]
pub struct CoinText;

/// Marker for the status line (scene, countdown, inventory).
#[derive(Component)]
pub struct StatusText;

/// Marker for the centre banner text.
#[derive(Component)]
pub struct BannerText;

/// Short-lived banner, set by bus handlers.
#[derive(Resource, Debug, Default)]
pub struct HudMessage {
    pub text: String,
    pub until: Duration,
}

/// Setup HUD systems.
pub fn setup_hud_systems(app: &mut App) {
    app.init_resource::<HudMessage>()
        .add_systems(OnExit(GameState::Loading), spawn_hud)
        .add_systems(
            Update,
            (
                update_health_bar,
                update_hunger_bar,
                update_coin_text,
                update_status_text,
                update_banner,
            )
                .in_set(SimSet::Presentation),
        );

    let mut bus = app.world_mut().resource_mut::<EventBus>();
    let _ = bus.subscribe::<SceneChanged, _>(announce_scene);
    let _ = bus.subscribe::<PlayerDied, _>(announce_death);
}

/// Fill width for a bar, in percent.
pub fn bar_percent(current: f32, max: f32) -> f32 {
    if max > 0.0 && current.is_finite() {
        (current / max * 100.0).clamp(0.0, 100.0)
    } else {
        0.0
    }
}

/// Scene, respawn countdown and inventory in one line.
pub fn status_line(session: &SessionState) -> String {
    let mut line = if session.is_dead() {
        format!("You died. Respawning in {}...", session.respawn_countdown())
    } else {
        format!("Location: {}", session.current_scene().name())
    };
    if !session.inventory().is_empty() {
        line.push_str(&format!("  |  Inventory: {}", session.inventory().join(", ")));
    }
    line
}

fn set_message(world: &mut World, text: String) {
    let until = elapsed(world) + MESSAGE_TIME;
    world.insert_resource(HudMessage { text, until });
}

fn announce_scene(world: &mut World, changed: &SceneChanged) -> HandlerResult {
    set_message(world, format!("Entered the {}", changed.to.name()));
    Ok(())
}

fn announce_death(world: &mut World, _: &PlayerDied) -> HandlerResult {
    set_message(world, "You died".to_string());
    Ok(())
}

/// Spawn the HUD UI.
fn spawn_hud(mut commands: Commands) {
    // HUD root container (bottom-left corner)
    commands
        .spawn((
            Node {
                width: Val::Percent(100.0),
                height: Val::Percent(100.0),
                flex_direction: FlexDirection::Column,
                justify_content: JustifyContent::End,
                align_items: AlignItems::Start,
                padding: UiRect::all(Val::Px(20.0)),
                ..default()
            },
            HudRoot,
        ))
        .with_children(|parent| {
            parent.spawn((
                Text::new(""),
                TextFont {
                    font_size: 14.0,
                    ..default()
                },
                TextColor(Color::srgb(0.8, 0.8, 0.8)),
                StatusText,
            ));
            parent.spawn((
                Text::new("Coins: 0"),
                TextFont {
                    font_size: 18.0,
                    ..default()
                },
                TextColor(Color::srgb(1.0, 0.84, 0.0)),
                Node {
                    margin: UiRect::bottom(Val::Px(5.0)),
                    ..default()
                },
                CoinText,
            ));
            spawn_bar(parent, "Hunger", Color::srgb(0.85, 0.55, 0.2), HungerBar);
            spawn_bar(parent, "Health", Color::srgb(0.8, 0.2, 0.2), HealthBar);
        });

    // Banner (top centre)
    commands
        .spawn((
            Node {
                width: Val::Percent(100.0),
                justify_content: JustifyContent::Center,
                position_type: PositionType::Absolute,
                top: Val::Px(40.0),
                ..default()
            },
            HudRoot,
        ))
        .with_children(|parent| {
            parent.spawn((
                Text::new(""),
                TextFont {
                    font_size: 32.0,
                    ..default()
                },
                TextColor(Color::srgb(0.9, 0.9, 0.95)),
                BannerText,
            ));
        });
}

/// Helper to spawn a status bar.
fn spawn_bar<M: Component>(parent: &mut ChildBuilder, label: &str, color: Color, bar_marker: M) {
    parent
        .spawn(Node {
            flex_direction: FlexDirection::Row,
            align_items: AlignItems::Center,
            margin: UiRect::bottom(Val::Px(5.0)),
            ..default()
        })
        .with_children(|bar_parent| {
            // Label
            bar_parent.spawn((
                Text::new(label),
                TextFont {
                    font_size: 14.0,
                    ..default()
                },
                TextColor(Color::srgb(0.8, 0.8, 0.8)),
                Node {
                    width: Val::Px(60.0),
                    ..default()
                },
            ));

            // Bar background
            bar_parent
                .spawn((
                    Node {
                        width: Val::Px(150.0),
                        height: Val::Px(12.0),
                        ..default()
                    },
                    BackgroundColor(Color::srgb(0.1, 0.1, 0.1)),
                ))
                .with_children(|bg| {
                    // Bar fill
                    bg.spawn((
                        Node {
                            width: Val::Percent(100.0),
                            height: Val::Percent(100.0),
                            ..default()
                        },
                        BackgroundColor(color),
                        bar_marker,
                    ));
                });
        });
}

/// Update health bar from the session.
fn update_health_bar(session: Res<SessionState>, mut bar_query: Query<&mut Node, With<HealthBar>>) {
    let Ok(mut bar) = bar_query.get_single_mut() else {
        return;
    };
    bar.width = Val::Percent(bar_percent(session.health(), session.max_health()));
}

/// Update hunger bar from the session.
fn update_hunger_bar(session: Res<SessionState>, mut bar_query: Query<&mut Node, With<HungerBar>>) {
    let Ok(mut bar) = bar_query.get_single_mut() else {
        return;
    };
    bar.width = Val::Percent(bar_percent(session.hunger(), session.max_hunger()));
}

fn update_coin_text(
    session: Res<SessionState>,
    loot: Res<LootRegistry>,
    mut text_query: Query<&mut Text, With<CoinText>>,
) {
    if !session.is_changed() && !loot.is_changed() {
        return;
    }
    let Ok(mut text) = text_query.get_single_mut() else {
        return;
    };
    text.0 = format!(
        "Coins: {} (collected {})",
        session.coins(),
        loot.total_collected()
    );
}

fn update_status_text(session: Res<SessionState>, mut text_query: Query<&mut Text, With<StatusText>>) {
    let Ok(mut text) = text_query.get_single_mut() else {
        return;
    };
    let line = status_line(&session);
    if text.0 != line {
        text.0 = line;
    }
}

fn update_banner(
    time: Res<Time>,
    message: Res<HudMessage>,
    mut text_query: Query<&mut Text, With<BannerText>>,
) {
    let Ok(mut text) = text_query.get_single_mut() else {
        return;
    };
    let shown = if time.elapsed() < message.until {
        message.text.as_str()
    } else {
        ""
    };
    if text.0 != shown {
        text.0 = shown.to_string();
    }
}
