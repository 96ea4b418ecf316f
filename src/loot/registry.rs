//! Collectible bookkeeping and the running coin total.

use std::collections::HashMap;
use std::time::Duration;

use bevy::prelude::*;

use crate::core::{LootId, LootKind};

/// One collectible, placed by a scene or dropped by a creature.
#[derive(Debug, Clone, PartialEq)]
pub struct LootItem {
    pub id: LootId,
    pub kind: LootKind,
    pub position: Vec3,
    /// Spawn point, fixed at registration
    pub initial_position: Vec3,
    pub value: u32,
    pub is_collected: bool,
    pub expires_at: Option<Duration>,
}

/// Collectibles keyed by id.
///
/// Collected entries stay in the registry so that a second collect, or a
/// scene re-registering the same coin, cannot pay out again.
#[derive(Resource, Debug, Default)]
pub struct LootRegistry {
    items: HashMap<LootId, LootItem>,
    total_collected: u32,
    drops: u64,
}

impl LootRegistry {
    /// Register a collectible. An existing entry with the same id is kept
    /// as-is (including its collected flag); returns whether a new entry
    /// was created.
    pub fn register(
        &mut self,
        id: LootId,
        kind: LootKind,
        position: Vec3,
        value: u32,
        expires_at: Option<Duration>,
    ) -> bool {
        if self.items.contains_key(&id) {
            return false;
        }
        self.items.insert(
            id.clone(),
            LootItem {
                id,
                kind,
                position,
                initial_position: position,
                value,
                is_collected: false,
                expires_at,
            },
        );
        true
    }

    /// Register a creature drop under a freshly minted id.
    pub fn spawn_drop(
        &mut self,
        kind: LootKind,
        position: Vec3,
        value: u32,
        expires_at: Option<Duration>,
    ) -> LootId {
        self.drops += 1;
        let id = LootId::new(format!("drop-{}", self.drops));
        self.register(id.clone(), kind, position, value, expires_at);
        id
    }

    /// Mark an item collected. Only the first call for an id returns the
    /// item; coin values are added to the running total at that moment.
    pub fn collect(&mut self, id: &LootId) -> Option<LootItem> {
        let item = self.items.get_mut(id)?;
        if item.is_collected {
            return None;
        }

        item.is_collected = true;
        if item.kind == LootKind::Coin {
            self.total_collected = self.total_collected.saturating_add(item.value);
        }
        Some(item.clone())
    }

    /// Remove uncollected items whose lifespan ran out. Returns their ids.
    pub fn expire(&mut self, now: Duration) -> Vec<LootId> {
        let expired: Vec<LootId> = self
            .items
            .values()
            .filter(|item| !item.is_collected && item.expires_at.is_some_and(|at| now >= at))
            .map(|item| item.id.clone())
            .collect();
        for id in &expired {
            self.items.remove(id);
        }
        expired
    }

    /// Uncollected items within pickup range of `point`. The radius depends
    /// on the kind of loot.
    pub fn within_reach(&self, point: Vec3, radius: impl Fn(LootKind) -> f32) -> Vec<LootId> {
        let mut ids: Vec<LootId> = self
            .uncollected()
            .filter(|item| item.position.distance(point) < radius(item.kind))
            .map(|item| item.id.clone())
            .collect();
        ids.sort();
        ids
    }

    /// Drop every uncollected item, e.g. when the scene holding them is
    /// torn down. Collected entries are kept. Returns how many were removed.
    pub fn forget_uncollected(&mut self) -> usize {
        let before = self.items.len();
        self.items.retain(|_, item| item.is_collected);
        before - self.items.len()
    }

    /// Mark everything uncollected again and zero the total.
    pub fn reset(&mut self) {
        for item in self.items.values_mut() {
            item.is_collected = false;
        }
        self.total_collected = 0;
    }

    pub fn get(&self, id: &LootId) -> Option<&LootItem> {
        self.items.get(id)
    }

    pub fn uncollected(&self) -> impl Iterator<Item = &LootItem> {
        self.items.values().filter(|item| !item.is_collected)
    }

    pub fn total_collected(&self) -> u32 {
        self.total_collected
    }
}
