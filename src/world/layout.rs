//! Built-in layouts for the three scenes.

use bevy::prelude::*;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::core::{EntityId, LootId, SceneId};
use crate::creatures::DEFAULT_CREATURE;

/// Everything needed to build one scene.
#[derive(Debug, Clone)]
pub struct SceneLayout {
    pub scene: SceneId,
    pub spawn_point: Vec3,
    /// Side length of the square ground plane
    pub ground_size: f32,
    pub ground_color: Color,
    pub coins: Vec<(LootId, Vec3)>,
    pub creatures: Vec<CreatureSpawn>,
}

#[derive(Debug, Clone)]
pub struct CreatureSpawn {
    pub id: EntityId,
    pub creature_type: String,
    pub position: Vec3,
}

/// Where the player appears in `scene`.
pub fn spawn_point(scene: SceneId) -> Vec3 {
    match scene {
        SceneId::Forest => Vec3::new(0.0, 1.5, 0.0),
        SceneId::Home => Vec3::new(0.0, 1.0, 0.0),
        SceneId::Store => Vec3::new(0.0, 1.0, 5.0),
    }
}

impl SceneLayout {
    /// Build the layout for `scene`. Coin placement is seeded per scene so a
    /// coin keeps its id and position across visits.
    pub fn for_scene(scene: SceneId) -> Self {
        let mut rng = StdRng::seed_from_u64(scene_seed(scene));

        let (ground_size, ground_color, coin_count, coin_spread, creature_count): (
            f32,
            Color,
            usize,
            f32,
            usize,
        ) = match scene {
            SceneId::Forest => (100.0, Color::srgb(0.2, 0.35, 0.15), 20, 40.0, 8),
            SceneId::Home => (50.0, Color::srgb(0.45, 0.4, 0.3), 5, 20.0, 0),
            SceneId::Store => (30.0, Color::srgb(0.5, 0.5, 0.55), 0, 0.0, 0),
        };

        let coins = (0..coin_count)
            .map(|i| {
                let x = rng.gen_range(-0.5f32..0.5) * coin_spread;
                let z = rng.gen_range(-0.5f32..0.5) * coin_spread;
                (
                    LootId::new(format!("{}-coin-{}", scene.name(), i)),
                    Vec3::new(x, 1.0, z),
                )
            })
            .collect();

        let creatures = (0..creature_count)
            .map(|i| {
                let angle = rng.gen_range(0.0..std::f32::consts::TAU);
                let radius = rng.gen_range(10.0f32..25.0);
                CreatureSpawn {
                    id: EntityId::new(format!("{}-{}-{}", scene.name(), DEFAULT_CREATURE, i)),
                    creature_type: DEFAULT_CREATURE.to_string(),
                    position: Vec3::new(angle.cos() * radius, 0.5, angle.sin() * radius),
                }
            })
            .collect();

        Self {
            scene,
            spawn_point: spawn_point(scene),
            ground_size,
            ground_color,
            coins,
            creatures,
        }
    }
}

fn scene_seed(scene: SceneId) -> u64 {
    match scene {
        SceneId::Forest => 0x0f0_2e57,
        SceneId::Home => 0x40_3e,
        SceneId::Store => 0x5_702e,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn layouts_are_stable_between_visits() {
        let first = SceneLayout::for_scene(SceneId::Forest);
        let second = SceneLayout::for_scene(SceneId::Forest);

        assert_eq!(first.coins, second.coins);
        assert_eq!(first.coins.len(), 20);
        assert_eq!(first.coins[3].0, LootId::new("forest-coin-3"));
    }

    #[test]
    fn only_the_forest_has_creatures() {
        assert_eq!(SceneLayout::for_scene(SceneId::Forest).creatures.len(), 8);
        assert!(SceneLayout::for_scene(SceneId::Home).creatures.is_empty());
        assert!(SceneLayout::for_scene(SceneId::Store).coins.is_empty());
    }

    #[test]
    fn creatures_spawn_in_a_ring() {
        for spawn in SceneLayout::for_scene(SceneId::Forest).creatures {
            let radius = Vec2::new(spawn.position.x, spawn.position.z).length();
            assert!((10.0 - 1e-3..25.0 + 1e-3).contains(&radius), "{}", spawn.id);
        }
    }
}
