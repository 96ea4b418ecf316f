//! Loot tuning and pickup components.

use std::time::Duration;

use bevy::prelude::*;
use serde::Deserialize;

use crate::core::{Cadence, LootId, LootKind};

/// Loot tuning. Distances in world units, times in seconds.
#[derive(Resource, Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LootConfig {
    /// Currency value of one dropped coin
    pub coin_value: u32,
    pub coin_pickup_radius: f32,
    pub meat_pickup_radius: f32,
    /// Dropped meat rots away after this long
    pub meat_lifespan: f32,
    /// Hunger restored by eating one piece of meat
    pub meat_hunger: f32,
    /// Seconds between proximity scans
    pub scan_interval: f32,
}

impl Default for LootConfig {
    fn default() -> Self {
        Self {
            coin_value: 1,
            coin_pickup_radius: 2.0,
            meat_pickup_radius: 1.5,
            meat_lifespan: 30.0,
            meat_hunger: 25.0,
            scan_interval: 0.1,
        }
    }
}

impl LootConfig {
    pub fn pickup_radius(&self, kind: LootKind) -> f32 {
        match kind {
            LootKind::Coin => self.coin_pickup_radius,
            LootKind::Meat => self.meat_pickup_radius,
        }
    }

    /// Value and expiry for a freshly dropped item.
    pub fn drop_terms(&self, kind: LootKind, now: Duration) -> (u32, Option<Duration>) {
        match kind {
            LootKind::Coin => (self.coin_value, None),
            LootKind::Meat => (
                0,
                Some(now + Duration::from_secs_f32(self.meat_lifespan.max(0.0))),
            ),
        }
    }
}

/// Links a visible pickup to its registry entry.
#[derive(Component, Debug, Clone)]
pub struct LootPickup(pub LootId);

/// Cadence of the proximity scan.
#[derive(Resource, Debug)]
pub struct PickupScan(pub Cadence);

impl Default for PickupScan {
    fn default() -> Self {
        Self(Cadence::from_secs(LootConfig::default().scan_interval))
    }
}

/// Shared meshes and materials for pickups. Absent in headless runs.
#[derive(Resource, Clone)]
pub struct PickupVisuals {
    pub coin_mesh: Handle<Mesh>,
    pub coin_material: Handle<StandardMaterial>,
    pub meat_mesh: Handle<Mesh>,
    pub meat_material: Handle<StandardMaterial>,
}

impl PickupVisuals {
    pub fn for_kind(&self, kind: LootKind) -> (Mesh3d, MeshMaterial3d<StandardMaterial>) {
        match kind {
            LootKind::Coin => (
                Mesh3d(self.coin_mesh.clone()),
                MeshMaterial3d(self.coin_material.clone()),
            ),
            LootKind::Meat => (
                Mesh3d(self.meat_mesh.clone()),
                MeshMaterial3d(self.meat_material.clone()),
            ),
        }
    }
}
