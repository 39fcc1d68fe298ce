//! Player commands sent from the frontend to the simulation.
//!
//! Commands are queued and processed at the next tick boundary. The engine
//! also exposes each one as a direct method returning its result.

use serde::{Deserialize, Serialize};

use crate::enums::DefenderKind;
use crate::types::Position;

/// All possible player actions.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum PlayerCommand {
    /// Place a defender of `kind` at `position`.
    Place {
        kind: DefenderKind,
        position: Position,
    },
    /// Start the next wave. Ignored while a wave is active.
    StartNextWave,
    /// Flip between running and paused.
    TogglePause,
    /// Pay for the full-map strike.
    TriggerStrike,
    /// Discard all state and start over. The only way out of game over.
    Reset,
}
