//! Combat module - health, attacks, dodges and hit resolution.

mod components;
mod health;
mod plugin;
mod regen;
mod resolver;
mod systems;

pub use components::*;
pub use health::{DamageOutcome, EntityHealth, EntityKind, HealthRegistry};
pub use plugin::CombatPlugin;
pub use regen::RegenRule;
pub use resolver::{in_hit_cone, resolve_swing, Hit};
pub use systems::resolve_attack_intent;
