//! Error types for commands, resource loading and configuration.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Why a placement position was rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PlacementConflict {
    /// Within the clearance distance of a path segment.
    NearPath,
    /// Within the spacing distance of a placed or pending defender.
    NearDefender,
    /// Overlaps a static level structure.
    NearStructure,
    /// Outside the playable area.
    OutOfBounds,
}

/// Recoverable command failures. A failed command leaves state untouched,
/// except [`CommandError::GameOver`] which reports the terminal state.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum CommandError {
    #[error("insufficient funds: need {required} gold, have {available}")]
    InsufficientFunds { required: u32, available: u32 },

    #[error("invalid placement: {0:?}")]
    InvalidPlacement(PlacementConflict),

    #[error("a strike is already pending")]
    StrikePending,

    #[error("game over: reset required")]
    GameOver,
}

/// Resource loading failure reported by a loader.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum LoadError {
    #[error("failed to load {path}: {reason}")]
    LoadFailed { path: String, reason: String },
}

/// Configuration loading and validation failures.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("failed to read config: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("invalid config: {0}")]
    Invalid(String),
}

/// Result type for player commands.
pub type CommandResult<T> = Result<T, CommandError>;
