//! UI module - HUD and pause overlay.

mod hud;
mod plugin;

pub use hud::{bar_percent, status_line, HudMessage};
pub use plugin::{store_lines, UiPlugin};
