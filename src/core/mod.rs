//! Core module - event bus, ids, errors, tuning and app states.
//!
//! This module provides the foundation that all other game systems build upon.

mod bus;
mod cadence;
mod config;
mod error;
mod events;
mod ids;
mod plugin;
mod states;

pub use bus::*;
pub use cadence::{elapsed, Cadence};
pub use config::{load_tuning, Tuning, TUNING_PATH};
pub use error::{ConfigError, SimError};
pub use events::*;
pub use ids::{player_id, EntityId, LootId};
pub use plugin::{CorePlugin, SimSet};
pub use states::*;
