//! Events emitted by the simulation for audio and visual feedback.

use serde::{Deserialize, Serialize};

use crate::enums::*;
use crate::types::Position;

/// Fire-and-forget effect notifications. Collected per tick and handed to the
/// presentation layer in the snapshot; the simulation never reads them back.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum EffectEvent {
    /// A weapon fired a projectile.
    ShotFired { weapon: WeaponKind },
    /// A projectile reached its target.
    Hit { position: Position },
    /// Area-damage hit or full-map strike detonation.
    Explosion { position: Position },
    /// An attacker was killed.
    Death { position: Position },
    /// A wave was cleared and its bonus credited.
    WaveComplete { wave: u32, bonus: u32 },
}

/// Alert for the UI alert queue.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Alert {
    pub level: AlertLevel,
    pub message: String,
    pub tick: u64,
}
