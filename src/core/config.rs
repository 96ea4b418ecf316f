//! Gameplay tuning loaded from an external RON file.
//!
//! Allows tweaking cooldowns, speeds and vitals without recompilation. Each
//! section falls back to its code defaults when missing from the file.

use std::fs;

use bevy::prelude::*;
use serde::Deserialize;

use super::error::ConfigError;
use crate::combat::CombatConfig;
use crate::loot::LootConfig;
use crate::player::PlayerConfig;
use crate::session::VitalsConfig;

/// Default location of the tuning file.
pub const TUNING_PATH: &str = "assets/data/tuning.ron";

/// All tunable constants, grouped by the plugin that owns them.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Tuning {
    pub combat: CombatConfig,
    pub player: PlayerConfig,
    pub vitals: VitalsConfig,
    pub loot: LootConfig,
}

impl Tuning {
    /// Parse tuning from a RON file.
    pub fn load_from(path: &str) -> Result<Self, ConfigError> {
        let contents = fs::read_to_string(path).map_err(|e| ConfigError::read(path, e))?;
        Self::from_ron(path, &contents)
    }

    /// Parse tuning from RON text. `origin` is only used in error messages.
    pub fn from_ron(origin: &str, contents: &str) -> Result<Self, ConfigError> {
        ron::from_str(contents).map_err(|e| ConfigError::parse(origin, e))
    }

    /// Load tuning from the default path, falling back to defaults.
    pub fn load() -> Self {
        match Self::load_from(TUNING_PATH) {
            Ok(tuning) => {
                info!("Loaded tuning from {}", TUNING_PATH);
                tuning
            }
            Err(ConfigError::FileNotFound(path)) => {
                warn!("Could not find {}. Using defaults.", path);
                Self::default()
            }
            Err(e) => {
                error!("{}. Using defaults.", e);
                Self::default()
            }
        }
    }
}

/// System to load tuning and install each section as a resource.
pub fn load_tuning(mut commands: Commands) {
    let tuning = Tuning::load();
    commands.insert_resource(tuning.combat);
    commands.insert_resource(tuning.player);
    commands.insert_resource(tuning.vitals);
    commands.insert_resource(tuning.loot);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_file_keeps_other_defaults() {
        let tuning = Tuning::from_ron(
            "inline",
            "(player: (move_speed: 7.5), vitals: (hunger_decay_per_second: 1.0))",
        )
        .unwrap();

        assert_eq!(tuning.player.move_speed, 7.5);
        assert_eq!(tuning.player.arrival_radius, PlayerConfig::default().arrival_radius);
        assert_eq!(tuning.vitals.hunger_decay_per_second, 1.0);
        assert_eq!(tuning.combat.light_damage, CombatConfig::default().light_damage);
    }

    #[test]
    fn malformed_file_is_a_parse_error() {
        let err = Tuning::from_ron("broken.ron", "(player: (move_speed: ))").unwrap_err();
        assert!(matches!(err, ConfigError::ParseError { ref path, .. } if path == "broken.ron"));
    }

    #[test]
    fn missing_file_is_reported_as_not_found() {
        let err = Tuning::load_from("assets/data/does-not-exist.ron").unwrap_err();
        assert!(matches!(err, ConfigError::FileNotFound(_)));
    }

    #[test]
    fn shipped_tuning_parses() {
        let tuning = Tuning::load_from(TUNING_PATH).unwrap();
        assert_eq!(tuning.combat.heavy_range, 4.0);
        assert_eq!(tuning.vitals, crate::session::VitalsConfig::default());
        assert_eq!(tuning.player.camera_offset, Vec3::new(0.0, 3.0, 5.0));
    }
}
