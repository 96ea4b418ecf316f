//! Creature-related components.

use std::time::Duration;

use bevy::prelude::*;

use super::data::CreatureDefinition;
use crate::core::{Cadence, EntityId};

/// How long a hit creature shows as hurt.
pub const HURT_FLASH: Duration = Duration::from_millis(300);

/// Delay between death and despawn.
pub const CORPSE_LINGER: f32 = 1.0;

/// A creature and its registry id.
#[derive(Component, Debug, Clone)]
pub struct Creature {
    pub id: EntityId,
}

/// Definition the creature was spawned from.
#[derive(Component, Debug, Clone)]
pub struct CreatureStats(pub CreatureDefinition);

/// AI state machine for creature behavior.
#[derive(Component, Default, PartialEq, Eq, Clone, Copy, Debug)]
pub enum Brain {
    /// Roaming on random headings near home.
    #[default]
    Wandering,
    /// Locked onto the player and closing in.
    Aggressive,
    /// In attack range, hitting on cooldown.
    Attacking,
    /// Terminal. Waiting for the despawn timer.
    Dead,
}

/// Random roaming state.
#[derive(Component, Debug)]
pub struct Wander {
    /// Heading angle in radians on the XZ plane
    pub heading: f32,
    /// Fires when the next random heading is due
    pub timer: Timer,
    /// Centre of the allowed wander area
    pub home: Vec3,
}

/// Coarse player detection checks.
#[derive(Component, Debug)]
pub struct Detection(pub Cadence);

/// Time of the last accepted attack.
#[derive(Component, Debug, Default)]
pub struct AttackCooldown {
    pub last: Option<Duration>,
}

/// Damage bookkeeping for regeneration and the hurt flash.
#[derive(Component, Debug)]
pub struct CreatureVitals {
    pub last_damaged: Option<Duration>,
    pub hurt_until: Option<Duration>,
    pub regen: Cadence,
}

impl CreatureVitals {
    pub fn new(regen_interval: f32) -> Self {
        Self {
            last_damaged: None,
            hurt_until: None,
            regen: Cadence::from_secs(regen_interval),
        }
    }

    pub fn record_hit(&mut self, now: Duration) {
        self.last_damaged = Some(now);
        self.hurt_until = Some(now + HURT_FLASH);
    }

    pub fn is_hurt(&self, now: Duration) -> bool {
        self.hurt_until.is_some_and(|until| now < until)
    }
}

/// Timer for the corpse to linger before despawn.
#[derive(Component)]
pub struct DeathTimer(pub Timer);

impl Default for DeathTimer {
    fn default() -> Self {
        Self(Timer::from_seconds(CORPSE_LINGER, TimerMode::Once))
    }
}
