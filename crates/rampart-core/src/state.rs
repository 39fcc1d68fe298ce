//! Game state snapshot: the complete visible state handed to presentation
//! after each tick. Presentation reads it; it never writes back.

use serde::{Deserialize, Serialize};

use crate::enums::*;
use crate::events::{Alert, EffectEvent};
use crate::types::{Handle, Position, SimTime};

/// Complete game state broadcast to the frontend after each tick.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GameStateSnapshot {
    pub time: SimTime,
    pub phase: GamePhase,
    pub economy: EconomyView,
    pub wave: WaveView,
    pub defenders: Vec<DefenderView>,
    pub attackers: Vec<AttackerView>,
    pub projectiles: Vec<ProjectileView>,
    /// Placements and spawns still waiting on the resource loader.
    pub pending_creations: u32,
    /// Ticks until a triggered full-map strike resolves.
    pub strike_remaining_ticks: Option<u32>,
    pub stats: StatsView,
    pub alerts: Vec<Alert>,
    pub effects: Vec<EffectEvent>,
}

/// Gold, lives and score.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EconomyView {
    pub gold: u32,
    pub lives: u32,
    pub score: u64,
}

/// Spawn director status.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct WaveView {
    pub number: u32,
    pub phase: WavePhase,
    pub enemies_in_wave: u32,
    pub enemies_spawned: u32,
    /// Attackers of this wave not yet spawned.
    pub remaining_to_spawn: u32,
    /// Attackers currently alive.
    pub alive: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DefenderView {
    pub handle: Handle,
    pub kind: DefenderKind,
    pub position: Position,
    pub range: f64,
    pub target: Option<Handle>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AttackerView {
    pub handle: Handle,
    pub position: Position,
    pub health: f64,
    pub max_health: f64,
    pub path_index: usize,
    pub target: Option<Handle>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProjectileView {
    pub handle: Handle,
    pub side: Side,
    pub position: Position,
    pub age_ticks: u32,
}

/// Running session statistics.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatsView {
    pub attackers_killed: u32,
    pub attackers_leaked: u32,
    pub shots_fired: u32,
    pub waves_cleared: u32,
}
