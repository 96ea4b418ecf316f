//! Health records for every entity that can take damage.
//!
//! The registry is the only place health is mutated. Its damage call reports
//! the alive-to-dead transition exactly once, so death handling (loot, despawn)
//! can key off the return value instead of polling `is_alive`.

use std::collections::HashMap;

use bevy::prelude::*;
use serde::{Deserialize, Serialize};

use crate::core::EntityId;

/// Who a health record belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EntityKind {
    Player,
    Enemy,
}

/// Health and last known position of one entity.
#[derive(Debug, Clone, PartialEq)]
pub struct EntityHealth {
    pub id: EntityId,
    pub kind: EntityKind,
    pub max_health: f32,
    current_health: f32,
    /// Last reported world position. Advisory only; physics owns the truth.
    pub position: Vec3,
}

impl EntityHealth {
    pub fn current(&self) -> f32 {
        self.current_health
    }

    pub fn is_alive(&self) -> bool {
        self.current_health > 0.0
    }

    pub fn percentage(&self) -> f32 {
        self.current_health / self.max_health
    }
}

/// Result of a damage call.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum DamageOutcome {
    /// No record under that id. Not an error: entities unmount mid-flight.
    Unknown,
    /// The record was already dead; nothing changed.
    AlreadyDead,
    /// Health dropped but the entity survives.
    Damaged { remaining: f32 },
    /// This call took the entity from alive to dead.
    Killed,
}

/// Health records keyed by entity id.
#[derive(Resource, Debug, Default)]
pub struct HealthRegistry {
    entities: HashMap<EntityId, EntityHealth>,
}

impl HealthRegistry {
    /// Insert or replace a record. Returns true if a previous record under
    /// the same id was overwritten.
    pub fn register(
        &mut self,
        id: EntityId,
        kind: EntityKind,
        max_health: f32,
        initial_health: f32,
        position: Vec3,
    ) -> bool {
        let max_health = if max_health.is_finite() && max_health > 0.0 {
            max_health
        } else {
            warn!("Entity '{}' registered with max health {}, using 1", id, max_health);
            1.0
        };
        let current_health = sanitize(initial_health).min(max_health);

        let replaced = self
            .entities
            .insert(
                id.clone(),
                EntityHealth {
                    id: id.clone(),
                    kind,
                    max_health,
                    current_health,
                    position,
                },
            )
            .is_some();
        if replaced {
            debug!("Re-registered entity '{}'", id);
        }
        replaced
    }

    pub fn unregister(&mut self, id: &EntityId) -> Option<EntityHealth> {
        self.entities.remove(id)
    }

    /// Apply damage. Negative or non-finite amounts count as zero.
    pub fn damage(&mut self, id: &EntityId, amount: f32) -> DamageOutcome {
        let Some(entity) = self.entities.get_mut(id) else {
            return DamageOutcome::Unknown;
        };
        if !entity.is_alive() {
            return DamageOutcome::AlreadyDead;
        }

        entity.current_health = (entity.current_health - sanitize(amount)).max(0.0);
        if entity.is_alive() {
            DamageOutcome::Damaged {
                remaining: entity.current_health,
            }
        } else {
            DamageOutcome::Killed
        }
    }

    /// Restore health up to the maximum. Dead records stay dead. Returns the
    /// amount actually restored.
    pub fn heal(&mut self, id: &EntityId, amount: f32) -> f32 {
        let Some(entity) = self.entities.get_mut(id) else {
            return 0.0;
        };
        if !entity.is_alive() {
            return 0.0;
        }

        let before = entity.current_health;
        entity.current_health = (before + sanitize(amount)).min(entity.max_health);
        entity.current_health - before
    }

    /// Overwrite the current health, clamped to `[0, max]`. Used to mirror
    /// health that is owned elsewhere (the session owns the player's).
    pub fn set_current(&mut self, id: &EntityId, value: f32) -> bool {
        let Some(entity) = self.entities.get_mut(id) else {
            return false;
        };
        entity.current_health = sanitize(value).min(entity.max_health);
        true
    }

    pub fn update_position(&mut self, id: &EntityId, position: Vec3) -> bool {
        let Some(entity) = self.entities.get_mut(id) else {
            return false;
        };
        entity.position = position;
        true
    }

    pub fn get(&self, id: &EntityId) -> Option<&EntityHealth> {
        self.entities.get(id)
    }

    pub fn contains(&self, id: &EntityId) -> bool {
        self.entities.contains_key(id)
    }

    /// Records of one kind, e.g. "the player" or "all enemies".
    pub fn find_by_kind(&self, kind: EntityKind) -> impl Iterator<Item = &EntityHealth> {
        self.entities.values().filter(move |entity| entity.kind == kind)
    }

    pub fn iter(&self) -> impl Iterator<Item = &EntityHealth> {
        self.entities.values()
    }

    pub fn len(&self) -> usize {
        self.entities.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entities.is_empty()
    }
}

fn sanitize(amount: f32) -> f32 {
    if amount.is_finite() {
        amount.max(0.0)
    } else {
        0.0
    }
}
