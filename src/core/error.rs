//! Error types for the simulation core and its data files.

use std::time::Duration;

use thiserror::Error;

use super::ids::EntityId;

/// Faults raised inside the simulation.
///
/// None of these ever reach the frame driver: the component that detects one
/// logs it and carries on with the next entity or the next frame.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum SimError {
    /// An operation referenced an id the registry does not know.
    #[error("unknown entity '{0}'")]
    UnknownEntity(EntityId),

    /// The physics body behind a handle is gone.
    #[error("physics handle for '{0}' is no longer valid")]
    InvalidHandle(String),

    /// A gated action arrived before its cooldown elapsed.
    #[error("{action} rejected, {remaining:?} of cooldown left")]
    CooldownRejected {
        action: &'static str,
        remaining: Duration,
    },

    /// A movement computation produced a non-finite value.
    #[error("non-finite movement for '{0}'")]
    NumericInstability(String),

    /// A bus subscriber could not process its event.
    #[error("handler failed: {0}")]
    Handler(String),
}

/// Errors that can occur when loading tuning or creature data.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// File could not be found.
    #[error("File not found: {0}")]
    FileNotFound(String),

    /// File could not be read.
    #[error("Failed to read file '{path}': {details}")]
    ReadError { path: String, details: String },

    /// RON parsing failed.
    #[error("Parse error in '{path}': {details}")]
    ParseError { path: String, details: String },
}

impl ConfigError {
    pub(crate) fn read(path: &str, err: std::io::Error) -> Self {
        if err.kind() == std::io::ErrorKind::NotFound {
            Self::FileNotFound(path.to_string())
        } else {
            Self::ReadError {
                path: path.to_string(),
                details: err.to_string(),
            }
        }
    }

    pub(crate) fn parse(path: &str, err: ron::error::SpannedError) -> Self {
        Self::ParseError {
            path: path.to_string(),
            details: err.to_string(),
        }
    }
}
