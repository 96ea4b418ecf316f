//! Combat state, tuning and per-swing bookkeeping.

use std::collections::HashSet;
use std::time::Duration;

use bevy::prelude::*;
use serde::Deserialize;

// Re-export from core to avoid duplication
pub use crate::core::{AttackKind, CreatureDamage, PlayerDamage};
use crate::core::{EntityId, SimError};

/// Combat tuning. Times are in seconds.
#[derive(Resource, Debug, Clone, Deserialize)]
#[serde(default)]
pub struct CombatConfig {
    pub light_damage: f32,
    pub heavy_damage: f32,
    /// Minimum time between two accepted light attacks
    pub light_cooldown: f32,
    /// Heavy cooldown as a multiple of the light one
    pub heavy_cooldown_factor: f32,
    /// How long a light swing stays active before reverting to idle
    pub light_recovery: f32,
    pub heavy_recovery: f32,
    pub light_range: f32,
    pub heavy_range: f32,
    /// Minimum dot product between facing and direction-to-target
    pub hit_cone: f32,
    pub dodge_cooldown: f32,
    pub dodge_duration: f32,
    /// Displacement impulse applied when a dodge starts
    pub dodge_distance: f32,
}

impl Default for CombatConfig {
    fn default() -> Self {
        Self {
            light_damage: 10.0,
            heavy_damage: 25.0,
            light_cooldown: 0.5,
            heavy_cooldown_factor: 1.5,
            light_recovery: 0.4,
            heavy_recovery: 0.7,
            light_range: 3.0,
            heavy_range: 4.0,
            hit_cone: 0.7,
            dodge_cooldown: 1.0,
            dodge_duration: 0.3,
            dodge_distance: 3.0,
        }
    }
}

impl CombatConfig {
    pub fn cooldown(&self, kind: AttackKind) -> Duration {
        let secs = match kind {
            AttackKind::Light => self.light_cooldown,
            AttackKind::Heavy => self.light_cooldown * self.heavy_cooldown_factor,
        };
        Duration::from_secs_f32(secs.max(0.0))
    }

    pub fn recovery(&self, kind: AttackKind) -> Duration {
        let secs = match kind {
            AttackKind::Light => self.light_recovery,
            AttackKind::Heavy => self.heavy_recovery,
        };
        Duration::from_secs_f32(secs.max(0.0))
    }

    pub fn damage(&self, kind: AttackKind) -> f32 {
        match kind {
            AttackKind::Light => self.light_damage,
            AttackKind::Heavy => self.heavy_damage,
        }
    }

    pub fn range(&self, kind: AttackKind) -> f32 {
        match kind {
            AttackKind::Light => self.light_range,
            AttackKind::Heavy => self.heavy_range,
        }
    }
}

/// One accepted attack. Remembers who it already hit so that re-evaluating
/// the same swing can never damage a target twice.
#[derive(Debug, Clone)]
pub struct Swing {
    pub id: u64,
    pub kind: AttackKind,
    hit: HashSet<EntityId>,
}

impl Swing {
    pub fn new(id: u64, kind: AttackKind) -> Self {
        Self {
            id,
            kind,
            hit: HashSet::new(),
        }
    }

    /// Returns true the first time a target is hit by this swing.
    pub fn try_hit(&mut self, target: &EntityId) -> bool {
        self.hit.insert(target.clone())
    }

    pub fn hit_count(&self) -> usize {
        self.hit.len()
    }
}

/// The player's attack and dodge tracks.
///
/// Both tracks are independent: `Idle -> Attacking -> Idle` and
/// `Idle -> Dodging -> Idle`. A request inside its cooldown is rejected with
/// no state change; an accepted one overwrites whatever was in flight.
#[derive(Resource, Debug, Default)]
pub struct CombatState {
    pub is_attacking: bool,
    pub attack_kind: Option<AttackKind>,
    pub last_attack_time: Option<Duration>,
    attack_ends_at: Duration,
    pub is_dodging: bool,
    pub dodge_direction: Option<Vec3>,
    pub last_dodge_time: Option<Duration>,
    dodge_ends_at: Duration,
    swings: u64,
    dodges: u64,
}

impl CombatState {
    pub fn perform_light_attack(
        &mut self,
        now: Duration,
        config: &CombatConfig,
    ) -> Result<Swing, SimError> {
        self.perform_attack(AttackKind::Light, now, config)
    }

    pub fn perform_heavy_attack(
        &mut self,
        now: Duration,
        config: &CombatConfig,
    ) -> Result<Swing, SimError> {
        self.perform_attack(AttackKind::Heavy, now, config)
    }

    /// Start a swing if the cooldown for `kind` has elapsed since the last
    /// accepted attack of either kind.
    pub fn perform_attack(
        &mut self,
        kind: AttackKind,
        now: Duration,
        config: &CombatConfig,
    ) -> Result<Swing, SimError> {
        check_cooldown(
            match kind {
                AttackKind::Light => "light attack",
                AttackKind::Heavy => "heavy attack",
            },
            self.last_attack_time,
            config.cooldown(kind),
            now,
        )?;

        self.is_attacking = true;
        self.attack_kind = Some(kind);
        self.last_attack_time = Some(now);
        self.attack_ends_at = now + config.recovery(kind);
        self.swings += 1;

        Ok(Swing::new(self.swings, kind))
    }

    /// Start a dodge along `direction` (flattened to the ground plane).
    /// Returns the dodge serial so movement can apply the impulse once.
    pub fn perform_dodge(
        &mut self,
        direction: Vec3,
        now: Duration,
        config: &CombatConfig,
    ) -> Result<u64, SimError> {
        check_cooldown(
            "dodge",
            self.last_dodge_time,
            Duration::from_secs_f32(config.dodge_cooldown.max(0.0)),
            now,
        )?;

        self.is_dodging = true;
        self.dodge_direction = Some(Vec3::new(direction.x, 0.0, direction.z).normalize_or_zero());
        self.last_dodge_time = Some(now);
        self.dodge_ends_at = now + Duration::from_secs_f32(config.dodge_duration.max(0.0));
        self.dodges += 1;

        Ok(self.dodges)
    }

    /// Revert expired attack/dodge windows to idle.
    pub fn tick(&mut self, now: Duration) {
        if self.is_attacking && now >= self.attack_ends_at {
            self.reset_attack();
        }
        if self.is_dodging && now >= self.dodge_ends_at {
            self.reset_dodge();
        }
    }

    pub fn reset_attack(&mut self) {
        self.is_attacking = false;
        self.attack_kind = None;
    }

    pub fn reset_dodge(&mut self) {
        self.is_dodging = false;
        self.dodge_direction = None;
    }

    /// Number of dodges accepted so far.
    pub fn dodge_serial(&self) -> u64 {
        self.dodges
    }
}

fn check_cooldown(
    action: &'static str,
    last: Option<Duration>,
    cooldown: Duration,
    now: Duration,
) -> Result<(), SimError> {
    let Some(last) = last else {
        return Ok(());
    };
    let elapsed = now.saturating_sub(last);
    if elapsed < cooldown {
        return Err(SimError::CooldownRejected {
            action,
            remaining: cooldown - elapsed,
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ms(ms: u64) -> Duration {
        Duration::from_millis(ms)
    }

    #[test]
    fn light_attacks_respect_cooldown() {
        let config = CombatConfig::default();
        let mut combat = CombatState::default();

        let mut accepted = Vec::new();
        for t in (0..3000).step_by(50) {
            if combat.perform_light_attack(ms(t), &config).is_ok() {
                accepted.push(t);
            }
        }

        assert_eq!(accepted.first(), Some(&0));
        for pair in accepted.windows(2) {
            assert!(pair[1] - pair[0] >= 500, "accepted {pair:?}");
        }
        assert_eq!(accepted.len(), 6);
    }

    #[test]
    fn heavy_cooldown_is_one_and_a_half_light() {
        let config = CombatConfig::default();
        let mut combat = CombatState::default();

        combat.perform_heavy_attack(ms(0), &config).unwrap();
        let rejected = combat.perform_heavy_attack(ms(700), &config).unwrap_err();
        assert!(matches!(
            rejected,
            SimError::CooldownRejected { action: "heavy attack", remaining } if remaining == ms(50)
        ));
        assert!(combat.perform_heavy_attack(ms(750), &config).is_ok());
    }

    #[test]
    fn rejected_attack_leaves_state_untouched() {
        let config = CombatConfig::default();
        let mut combat = CombatState::default();

        combat.perform_light_attack(ms(1000), &config).unwrap();
        assert!(combat.perform_heavy_attack(ms(1200), &config).is_err());

        assert_eq!(combat.attack_kind, Some(AttackKind::Light));
        assert_eq!(combat.last_attack_time, Some(ms(1000)));
    }

    #[test]
    fn attack_reverts_after_recovery_window() {
        let config = CombatConfig::default();
        let mut combat = CombatState::default();

        combat.perform_heavy_attack(ms(0), &config).unwrap();
        combat.tick(ms(699));
        assert!(combat.is_attacking);
        combat.tick(ms(700));
        assert!(!combat.is_attacking);
        assert_eq!(combat.attack_kind, None);
    }

    #[test]
    fn dodge_is_independent_of_attacks() {
        let config = CombatConfig::default();
        let mut combat = CombatState::default();

        combat.perform_light_attack(ms(0), &config).unwrap();
        let serial = combat.perform_dodge(Vec3::new(2.0, 1.0, 0.0), ms(10), &config).unwrap();

        assert_eq!(serial, 1);
        assert!(combat.is_attacking && combat.is_dodging);
        assert_eq!(combat.dodge_direction, Some(Vec3::X));

        assert!(combat.perform_dodge(Vec3::Z, ms(900), &config).is_err());
        combat.tick(ms(310));
        assert!(!combat.is_dodging);
        assert!(combat.perform_dodge(Vec3::Z, ms(1010), &config).is_ok());
    }

    #[test]
    fn swing_hits_each_target_once() {
        let mut swing = Swing::new(1, AttackKind::Light);
        let target = EntityId::new("critter-1");

        assert!(swing.try_hit(&target));
        assert!(!swing.try_hit(&target));
        assert_eq!(swing.hit_count(), 1);
    }
}
