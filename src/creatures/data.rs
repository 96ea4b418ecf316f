//! Creature data loading from RON files.

use std::collections::HashMap;
use std::fs;
use std::path::Path;

use bevy::prelude::*;
use rand::Rng;
use serde::Deserialize;

use crate::core::{ConfigError, LootKind};

/// Directory scanned for `*.ron` creature definitions.
pub const CREATURES_DIR: &str = "assets/data/creatures";

/// Name of the built-in definition used when no files are found.
pub const DEFAULT_CREATURE: &str = "critter";

/// One independent drop roll.
#[derive(Deserialize, Clone, Debug, PartialEq)]
pub struct LootRoll {
    pub kind: LootKind,
    /// Probability in `[0, 1]` that this row drops anything
    pub chance: f32,
    pub min: u32,
    pub max: u32,
}

impl LootRoll {
    /// Drop chance as a valid probability. Non-finite chances never drop.
    pub fn probability(&self) -> f64 {
        if self.chance.is_finite() {
            f64::from(self.chance.clamp(0.0, 1.0))
        } else {
            0.0
        }
    }
}

/// What a creature leaves behind.
#[derive(Deserialize, Clone, Debug, PartialEq)]
#[serde(default)]
pub struct LootTable {
    pub rows: Vec<LootRoll>,
    /// Horizontal scatter around the corpse, in each axis
    pub scatter: f32,
    /// Height above the corpse where drops appear
    pub lift: f32,
}

impl Default for LootTable {
    fn default() -> Self {
        Self {
            rows: vec![
                LootRoll {
                    kind: LootKind::Coin,
                    chance: 0.8,
                    min: 1,
                    max: 5,
                },
                LootRoll {
                    kind: LootKind::Meat,
                    chance: 0.5,
                    min: 1,
                    max: 1,
                },
            ],
            scatter: 1.0,
            lift: 0.5,
        }
    }
}

impl LootTable {
    /// Roll every row and scatter the results around `origin`.
    pub fn roll(&self, origin: Vec3, rng: &mut impl Rng) -> Vec<(LootKind, Vec3)> {
        let mut drops = Vec::new();
        for row in &self.rows {
            if !rng.gen_bool(row.probability()) {
                continue;
            }
            let count = rng.gen_range(row.min..=row.max.max(row.min));
            for _ in 0..count {
                drops.push((row.kind, self.scatter_around(origin, rng)));
            }
        }
        drops
    }

    fn scatter_around(&self, origin: Vec3, rng: &mut impl Rng) -> Vec3 {
        let spread = self.scatter.abs();
        let offset = if spread > 0.0 {
            Vec3::new(rng.gen_range(-spread..=spread), 0.0, rng.gen_range(-spread..=spread))
        } else {
            Vec3::ZERO
        };
        origin + offset + Vec3::Y * self.lift
    }
}

/// Creature definition loaded from a RON file.
#[derive(Deserialize, Clone, Debug)]
#[serde(default)]
pub struct CreatureDefinition {
    pub name: String,
    pub max_health: f32,
    /// Speed while wandering, units per second
    pub wander_speed: f32,
    /// Pursuit speed as a multiple of the wander speed
    pub pursuit_multiplier: f32,
    pub detection_range: f32,
    pub attack_range: f32,
    pub attack_damage: f32,
    pub attack_cooldown: f32,
    /// Distance from home before the heading is forced back
    pub wander_radius: f32,
    /// Bounds of the random delay between heading changes
    pub wander_interval: (f32, f32),
    /// Seconds between detection checks
    pub detection_interval: f32,
    pub loot: LootTable,
}

impl Default for CreatureDefinition {
    fn default() -> Self {
        Self {
            name: "Critter".to_string(),
            max_health: 100.0,
            wander_speed: 1.0,
            pursuit_multiplier: 2.0,
            detection_range: 10.0,
            attack_range: 2.0,
            attack_damage: 5.0,
            attack_cooldown: 2.0,
            wander_radius: 40.0,
            wander_interval: (2.0, 5.0),
            detection_interval: 1.0,
            loot: LootTable::default(),
        }
    }
}

impl CreatureDefinition {
    pub fn from_ron(origin: &str, contents: &str) -> Result<Self, ConfigError> {
        ron::from_str(contents).map_err(|e| ConfigError::parse(origin, e))
    }

    pub fn pursuit_speed(&self) -> f32 {
        self.wander_speed * self.pursuit_multiplier
    }
}

/// Resource holding all loaded creature definitions.
#[derive(Resource, Default)]
pub struct CreatureCatalog {
    pub definitions: HashMap<String, CreatureDefinition>,
}

impl CreatureCatalog {
    /// Get a definition by type name (the RON file stem).
    pub fn get(&self, creature_type: &str) -> Option<&CreatureDefinition> {
        self.definitions.get(creature_type)
    }

    /// The named definition, or the built-in default.
    pub fn get_or_default(&self, creature_type: &str) -> CreatureDefinition {
        self.get(creature_type).cloned().unwrap_or_default()
    }
}

/// Load all creature definitions from the creatures directory.
pub fn load_creature_definitions(mut catalog: ResMut<CreatureCatalog>) {
    let dir = Path::new(CREATURES_DIR);

    if dir.exists() {
        read_definitions(dir, &mut catalog);
    } else {
        warn!("Creature definitions directory not found: {:?}", dir);
    }

    if !catalog.definitions.contains_key(DEFAULT_CREATURE) {
        catalog
            .definitions
            .insert(DEFAULT_CREATURE.to_string(), CreatureDefinition::default());
    }
    info!("Loaded {} creature definitions", catalog.definitions.len());
}

fn read_definitions(dir: &Path, catalog: &mut CreatureCatalog) {
    let Ok(entries) = fs::read_dir(dir) else {
        warn!("Failed to read creature definitions directory");
        return;
    };

    for entry in entries.flatten() {
        let path = entry.path();
        if !path.extension().is_some_and(|ext| ext == "ron") {
            continue;
        }
        let creature_type = path
            .file_stem()
            .and_then(|s| s.to_str())
            .unwrap_or("unknown")
            .to_string();
        let origin = path.display().to_string();

        let parsed = fs::read_to_string(&path)
            .map_err(|e| ConfigError::read(&origin, e))
            .and_then(|contents| CreatureDefinition::from_ron(&origin, &contents));
        match parsed {
            Ok(definition) => {
                info!("Loaded creature definition: {} ({})", definition.name, creature_type);
                catalog.definitions.insert(creature_type, definition);
            }
            Err(e) => error!("{}", e),
        }
    }
}
