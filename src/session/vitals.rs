//! Player vitals: health, hunger, death and respawn.
//!
//! Four periodic effects run on independent cadences: hunger decay,
//! starvation, regeneration and the respawn countdown. Regeneration needs
//! hunger above its threshold, so it can never run in the same window as
//! starvation.

use std::time::Duration;

use bevy::prelude::*;
use serde::Deserialize;

use super::store::{find_item, StoreError, StoreItem};
use crate::combat::RegenRule;
use crate::core::{Cadence, SceneId};

/// Vitals tuning. Times in seconds.
#[derive(Resource, Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct VitalsConfig {
    pub max_health: f32,
    pub max_hunger: f32,
    pub hunger_decay_per_second: f32,
    /// Health lost per starvation tick while hunger is empty
    pub starvation_damage: f32,
    pub starvation_interval: f32,
    pub regen: RegenRule,
    /// Hunger spent on every regeneration tick
    pub regen_hunger_cost: f32,
    /// Seconds shown on the respawn countdown
    pub respawn_countdown: u32,
    /// Pause between the countdown reaching zero and the revive
    pub revive_delay: f32,
}

impl Default for VitalsConfig {
    fn default() -> Self {
        Self {
            max_health: 100.0,
            max_hunger: 100.0,
            hunger_decay_per_second: 0.5,
            starvation_damage: 5.0,
            starvation_interval: 2.0,
            regen: RegenRule::default().with_min_hunger(30.0),
            regen_hunger_cost: 0.5,
            respawn_countdown: 5,
            revive_delay: 1.0,
        }
    }
}

/// Alive/dead edges reported by the session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionTransition {
    Died,
    /// Revived at home; `from` is the scene the player died in.
    Respawned { from: SceneId },
}

/// Session-wide player state. Only mutated through its methods.
#[derive(Resource, Debug, Clone)]
pub struct SessionState {
    config: VitalsConfig,
    coins: u32,
    current_scene: SceneId,
    health: f32,
    hunger: f32,
    is_dead: bool,
    respawn_countdown: u32,
    revive_at: Option<Duration>,
    last_attacked: Option<Duration>,
    inventory: Vec<&'static str>,
    decay: Cadence,
    starvation: Cadence,
    regen: Cadence,
    countdown: Cadence,
}

impl Default for SessionState {
    fn default() -> Self {
        Self::new(&VitalsConfig::default())
    }
}

impl SessionState {
    pub fn new(config: &VitalsConfig) -> Self {
        Self {
            config: config.clone(),
            coins: 0,
            current_scene: SceneId::default(),
            health: config.max_health,
            hunger: config.max_hunger,
            is_dead: false,
            respawn_countdown: 0,
            revive_at: None,
            last_attacked: None,
            inventory: Vec::new(),
            decay: Cadence::from_secs(1.0),
            starvation: Cadence::from_secs(config.starvation_interval),
            regen: Cadence::from_secs(config.regen.interval),
            countdown: Cadence::from_secs(1.0),
        }
    }

    // --- Read access -------------------------------------------------------

    pub fn coins(&self) -> u32 {
        self.coins
    }

    pub fn current_scene(&self) -> SceneId {
        self.current_scene
    }

    pub fn health(&self) -> f32 {
        self.health
    }

    pub fn max_health(&self) -> f32 {
        self.config.max_health
    }

    pub fn hunger(&self) -> f32 {
        self.hunger
    }

    pub fn max_hunger(&self) -> f32 {
        self.config.max_hunger
    }

    pub fn is_dead(&self) -> bool {
        self.is_dead
    }

    pub fn respawn_countdown(&self) -> u32 {
        self.respawn_countdown
    }

    pub fn last_attacked(&self) -> Option<Duration> {
        self.last_attacked
    }

    pub fn inventory(&self) -> &[&'static str] {
        &self.inventory
    }

    // --- Mutations ---------------------------------------------------------

    /// Hurt the player. Ignored while dead. Returns `Died` on the killing blow.
    pub fn damage_player(&mut self, amount: f32, now: Duration) -> Option<SessionTransition> {
        if self.is_dead {
            return None;
        }
        self.last_attacked = Some(now);
        self.lose_health(amount, now)
    }

    /// Restore hunger, capped at the maximum. Returns false while dead.
    pub fn eat_meat(&mut self, amount: f32) -> bool {
        if self.is_dead {
            return false;
        }
        let amount = if amount.is_finite() { amount.max(0.0) } else { 0.0 };
        self.hunger = (self.hunger + amount).min(self.config.max_hunger);
        true
    }

    pub fn add_coins(&mut self, amount: u32) {
        self.coins = self.coins.saturating_add(amount);
    }

    /// Move to another scene. Returns the previous scene, or `None` when
    /// already there or dead.
    pub fn change_scene(&mut self, to: SceneId) -> Option<SceneId> {
        if self.is_dead || self.current_scene == to {
            return None;
        }
        let from = self.current_scene;
        self.current_scene = to;
        Some(from)
    }

    /// Buy a catalog item. Only possible while standing in the store.
    pub fn purchase(&mut self, name: &str) -> Result<&'static StoreItem, StoreError> {
        if self.current_scene != SceneId::Store {
            return Err(StoreError::NotInStore(self.current_scene));
        }
        let item = find_item(name).ok_or_else(|| StoreError::UnknownItem(name.to_string()))?;
        if self.coins < item.price {
            return Err(StoreError::InsufficientCoins {
                item: item.name,
                price: item.price,
                available: self.coins,
            });
        }

        self.coins -= item.price;
        self.inventory.push(item.name);
        Ok(item)
    }

    /// Advance every periodic effect to `now`.
    pub fn tick(&mut self, now: Duration, config: &VitalsConfig) -> Vec<SessionTransition> {
        if *config != self.config {
            self.retune(config);
        }

        let mut transitions = Vec::new();
        if self.is_dead {
            if let Some(transition) = self.tick_respawn(now) {
                transitions.push(transition);
            }
            return transitions;
        }

        for _ in 0..self.decay.ticks(now) {
            self.hunger = (self.hunger - self.config.hunger_decay_per_second).max(0.0);
        }

        for _ in 0..self.starvation.ticks(now) {
            if self.hunger > 0.0 || self.is_dead {
                continue;
            }
            if let Some(died) = self.lose_health(self.config.starvation_damage, now) {
                transitions.push(died);
            }
        }

        for _ in 0..self.regen.ticks(now) {
            let rule = self.config.regen;
            let max = self.config.max_health;
            if self.is_dead
                || !rule.allows(now, self.last_attacked, self.health, max, Some(self.hunger))
            {
                continue;
            }
            self.health = rule.apply(self.health, max);
            self.hunger = (self.hunger - self.config.regen_hunger_cost).max(0.0);
        }

        transitions
    }

    fn lose_health(&mut self, amount: f32, now: Duration) -> Option<SessionTransition> {
        let amount = if amount.is_finite() { amount.max(0.0) } else { 0.0 };
        self.health = (self.health - amount).max(0.0);
        if self.health > 0.0 {
            return None;
        }

        self.is_dead = true;
        self.respawn_countdown = self.config.respawn_countdown;
        self.revive_at = None;
        self.countdown.restart(now);
        info!("Player died, respawning in {}", self.respawn_countdown);
        Some(SessionTransition::Died)
    }

    fn tick_respawn(&mut self, now: Duration) -> Option<SessionTransition> {
        if self.revive_at.is_none() {
            let ticks = self.countdown.ticks(now);
            self.respawn_countdown = self.respawn_countdown.saturating_sub(ticks);
            if self.respawn_countdown == 0 {
                self.revive_at = Some(now + Duration::from_secs_f32(self.config.revive_delay.max(0.0)));
            }
        }

        match self.revive_at {
            Some(at) if now >= at => Some(self.revive(now)),
            _ => None,
        }
    }

    fn revive(&mut self, now: Duration) -> SessionTransition {
        let from = self.current_scene;
        self.health = self.config.max_health;
        self.hunger = self.config.max_hunger;
        self.is_dead = false;
        self.respawn_countdown = 0;
        self.revive_at = None;
        self.last_attacked = None;
        self.current_scene = SceneId::Home;

        self.decay.restart(now);
        self.starvation.restart(now);
        self.regen.restart(now);
        info!("Player respawned at home");
        SessionTransition::Respawned { from }
    }

    fn retune(&mut self, config: &VitalsConfig) {
        self.config = config.clone();
        self.health = self.health.min(config.max_health);
        self.hunger = self.hunger.min(config.max_hunger);
        self.starvation = Cadence::from_secs(config.starvation_interval);
        self.regen = Cadence::from_secs(config.regen.interval);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn secs(s: f32) -> Duration {
        Duration::from_secs_f32(s)
    }

    /// Tick every 100 ms from `from` to `to` seconds, collecting transitions.
    fn run(
        session: &mut SessionState,
        config: &VitalsConfig,
        from: f32,
        to: f32,
    ) -> Vec<SessionTransition> {
        let mut transitions = Vec::new();
        let mut t = from;
        while t <= to + 1e-4 {
            transitions.extend(session.tick(secs(t), config));
            t += 0.1;
        }
        transitions
    }

    #[test]
    fn lethal_damage_then_respawn_at_home() {
        let config = VitalsConfig::default();
        let mut session = SessionState::new(&config);
        session.tick(secs(0.0), &config);

        assert_eq!(session.damage_player(100.0, secs(0.0)), Some(SessionTransition::Died));
        assert!(session.is_dead());
        assert_eq!(session.respawn_countdown(), 5);
        assert_eq!(session.damage_player(100.0, secs(0.1)), None);

        let transitions = run(&mut session, &config, 0.1, 4.95);
        assert!(transitions.is_empty());
        assert!(session.is_dead());

        let transitions = run(&mut session, &config, 5.0, 6.5);
        assert_eq!(
            transitions,
            vec![SessionTransition::Respawned { from: SceneId::Forest }]
        );
        assert_eq!(session.health(), 100.0);
        assert_eq!(session.hunger(), 100.0);
        assert!(!session.is_dead());
        assert_eq!(session.current_scene(), SceneId::Home);
    }

    #[test]
    fn starvation_kills_without_regeneration() {
        let config = VitalsConfig::default();
        let mut session = SessionState::new(&config);

        let mut died_at = None;
        let mut previous_health = session.health();
        let mut t = 0.0;
        while t < 400.0 && died_at.is_none() {
            let transitions = session.tick(secs(t), &config);
            if session.hunger() <= 30.0 {
                assert!(session.health() <= previous_health, "regenerated at {t}");
            }
            previous_health = session.health();
            if transitions.contains(&SessionTransition::Died) {
                died_at = Some(t);
            }
            t += 0.5;
        }

        let died_at = died_at.expect("starvation should kill");
        // 200 s to empty hunger, then 20 starvation ticks of 2 s.
        assert!((235.0..=245.0).contains(&died_at), "died at {died_at}");
        assert_eq!(session.hunger(), 0.0);
    }

    #[test]
    fn regeneration_waits_for_idle_and_costs_hunger() {
        let config = VitalsConfig::default();
        let mut session = SessionState::new(&config);
        session.tick(secs(0.0), &config);
        session.damage_player(20.0, secs(0.0));

        run(&mut session, &config, 0.1, 4.9);
        assert_eq!(session.health(), 80.0);

        run(&mut session, &config, 5.0, 8.05);
        assert!(session.health() > 80.0);
        // Decay alone would leave 96 after 8 s; regen ticks cost extra.
        assert!(session.hunger() < 96.0);
    }

    #[test]
    fn eating_is_capped_and_ignored_while_dead() {
        let config = VitalsConfig::default();
        let mut session = SessionState::new(&config);

        assert!(session.eat_meat(25.0));
        assert_eq!(session.hunger(), 100.0);

        session.damage_player(500.0, secs(1.0));
        assert!(!session.eat_meat(25.0));
        assert_eq!(session.change_scene(SceneId::Store), None);
    }

    #[test]
    fn purchases_need_the_store_and_enough_coins() {
        let mut session = SessionState::default();
        session.add_coins(12);

        assert_eq!(
            session.purchase("Blue Cape"),
            Err(StoreError::NotInStore(SceneId::Forest))
        );

        session.change_scene(SceneId::Store);
        assert_eq!(session.purchase("blue cape").map(|item| item.price), Ok(10));
        assert_eq!(session.coins(), 2);
        assert!(matches!(
            session.purchase("Red Hat"),
            Err(StoreError::InsufficientCoins { price: 5, available: 2, .. })
        ));
        assert!(matches!(session.purchase("Crown"), Err(StoreError::UnknownItem(_))));
        assert_eq!(session.inventory(), ["Blue Cape"]);
    }
}
