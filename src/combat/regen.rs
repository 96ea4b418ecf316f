//! Passive health regeneration, shared by the player and creatures.

use std::time::Duration;

use serde::Deserialize;

/// When an entity is allowed to regenerate.
///
/// Regeneration needs the entity to be alive, hurt, and left alone for
/// `idle_delay` seconds. The player additionally needs hunger above
/// `min_hunger`; creatures have no hunger and leave it unset.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
#[serde(default)]
pub struct RegenRule {
    /// Seconds since the last hit before regeneration starts
    pub idle_delay: f32,
    /// Seconds between regeneration ticks
    pub interval: f32,
    /// Health restored per tick
    pub amount: f32,
    /// Hunger must be strictly above this, if set
    pub min_hunger: Option<f32>,
}

impl Default for RegenRule {
    fn default() -> Self {
        Self {
            idle_delay: 5.0,
            interval: 1.0,
            amount: 1.0,
            min_hunger: None,
        }
    }
}

impl RegenRule {
    pub fn with_min_hunger(self, min_hunger: f32) -> Self {
        Self {
            min_hunger: Some(min_hunger),
            ..self
        }
    }

    pub fn idle_delay(&self) -> Duration {
        Duration::from_secs_f32(self.idle_delay.max(0.0))
    }

    pub fn allows(
        &self,
        now: Duration,
        last_damaged: Option<Duration>,
        current: f32,
        max: f32,
        hunger: Option<f32>,
    ) -> bool {
        if current <= 0.0 || current >= max {
            return false;
        }

        let rested = last_damaged.map_or(true, |hit| now.saturating_sub(hit) >= self.idle_delay());
        let fed = match (self.min_hunger, hunger) {
            (Some(min), Some(hunger)) => hunger > min,
            (Some(_), None) => false,
            (None, _) => true,
        };

        rested && fed
    }

    /// Health after one tick, never above `max`.
    pub fn apply(&self, current: f32, max: f32) -> f32 {
        (current + self.amount).min(max)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn secs(s: u64) -> Duration {
        Duration::from_secs(s)
    }

    #[test]
    fn waits_for_idle_delay_after_damage() {
        let rule = RegenRule::default();
        assert!(!rule.allows(secs(14), Some(secs(10)), 50.0, 100.0, None));
        assert!(rule.allows(secs(15), Some(secs(10)), 50.0, 100.0, None));
        assert!(rule.allows(secs(1), None, 50.0, 100.0, None));
    }

    #[test]
    fn full_or_dead_entities_do_not_regenerate() {
        let rule = RegenRule::default();
        assert!(!rule.allows(secs(100), None, 100.0, 100.0, None));
        assert!(!rule.allows(secs(100), None, 0.0, 100.0, None));
    }

    #[test]
    fn hunger_gate_is_strict() {
        let rule = RegenRule::default().with_min_hunger(30.0);
        assert!(!rule.allows(secs(100), None, 50.0, 100.0, Some(30.0)));
        assert!(rule.allows(secs(100), None, 50.0, 100.0, Some(30.5)));
        assert!(!rule.allows(secs(100), None, 50.0, 100.0, None));
    }

    #[test]
    fn apply_caps_at_max() {
        let rule = RegenRule::default();
        assert_eq!(rule.apply(99.5, 100.0), 100.0);
        assert_eq!(rule.apply(50.0, 100.0), 51.0);
    }
}
