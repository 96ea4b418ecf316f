//! Bus topics used for cross-system communication.
//!
//! Combat, creatures, loot and the session never hold references to each
//! other. They talk through these payloads on the [`EventBus`]: the combat
//! resolver publishes [`CreatureDamage`], a creature listens for the ones
//! addressed to it, and so on. Every payload is serde-serializable.
//!
//! [`EventBus`]: super::EventBus

use bevy::prelude::*;
use serde::{Deserialize, Serialize};

use super::ids::{EntityId, LootId};
use super::states::SceneId;

/// A payload type that can travel on the event bus.
pub trait Topic: Send + Sync + 'static {
    /// Stable topic name, used in logs.
    const NAME: &'static str;
}

/// Light or heavy swing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AttackKind {
    Light,
    Heavy,
}

/// Kinds of collectibles a creature can drop.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum LootKind {
    Coin,
    Meat,
}

/// The player asked to swing. Gated by cooldowns in the combat resolver.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AttackIntent {
    pub kind: AttackKind,
    /// Where the swing starts (player position)
    pub origin: Vec3,
    /// Direction the player is facing, horizontal
    pub facing: Vec3,
}

/// A creature was hit by an attack.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreatureDamage {
    pub target: EntityId,
    pub amount: f32,
    pub attacker: EntityId,
}

/// A creature landed a hit on the player.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlayerDamage {
    pub amount: f32,
    pub source: Option<EntityId>,
}

/// Click-to-move destination (or cancellation when `enabled` is false).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NavigationRequest {
    pub target: Vec3,
    pub enabled: bool,
}

/// Something should be dropped into the world at `position`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LootDrop {
    pub kind: LootKind,
    pub position: Vec3,
}

/// A collectible was picked up. Published at most once per loot id.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LootCollected {
    pub loot_id: LootId,
    pub kind: LootKind,
    pub value: u32,
}

/// The player's health reached zero.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlayerDied;

/// The respawn sequence finished and the player is back in `scene`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlayerRespawned {
    pub scene: SceneId,
}

/// The active scene changed.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SceneChanged {
    pub from: SceneId,
    pub to: SceneId,
}

impl Topic for AttackIntent {
    const NAME: &'static str = "attack-intent";
}

impl Topic for CreatureDamage {
    const NAME: &'static str = "creature-damage";
}

impl Topic for PlayerDamage {
    const NAME: &'static str = "player-damage";
}

impl Topic for NavigationRequest {
    const NAME: &'static str = "navigation-request";
}

impl Topic for LootDrop {
    const NAME: &'static str = "loot-drop";
}

impl Topic for LootCollected {
    const NAME: &'static str = "loot-collected";
}

impl Topic for PlayerDied {
    const NAME: &'static str = "player-died";
}

impl Topic for PlayerRespawned {
    const NAME: &'static str = "player-respawned";
}

impl Topic for SceneChanged {
    const NAME: &'static str = "scene-changed";
}
