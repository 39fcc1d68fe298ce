//! Scripted player used by the driver binary: starts waves, spends gold on
//! defenders along the path and calls the strike when overrun.

use rampart_core::commands::PlayerCommand;
use rampart_core::config::{DefenderRoster, GameConfig};
use rampart_core::enums::{DefenderKind, GamePhase, WavePhase};
use rampart_core::state::GameStateSnapshot;
use rampart_core::types::Position;

/// Distance from the path centreline at which defenders are offered.
const SPOT_OFFSET: f64 = 6.0;
/// Live attacker count at which the strike is called.
const STRIKE_THRESHOLD: usize = 8;

pub struct Autopilot {
    spots: Vec<Position>,
    cursor: usize,
    target_waves: u32,
    roster: DefenderRoster,
    strike_cost: u32,
}

impl Autopilot {
    pub fn new(config: &GameConfig, target_waves: u32) -> Self {
        Self {
            spots: candidate_spots(&config.level.path, SPOT_OFFSET),
            cursor: 0,
            target_waves,
            roster: config.defenders.clone(),
            strike_cost: config.combat.strike_cost,
        }
    }

    /// Whether every requested wave has been cleared.
    pub fn finished(&self, snapshot: &GameStateSnapshot) -> bool {
        snapshot.stats.waves_cleared >= self.target_waves
    }

    /// Commands to issue in response to `snapshot`.
    pub fn decide(&mut self, snapshot: &GameStateSnapshot) -> Vec<PlayerCommand> {
        let mut commands = Vec::new();
        if snapshot.phase != GamePhase::Running {
            return commands;
        }

        if snapshot.wave.phase == WavePhase::Idle && snapshot.wave.number < self.target_waves {
            commands.push(PlayerCommand::StartNextWave);
        }

        let mut gold = snapshot.economy.gold;
        if snapshot.attackers.len() >= STRIKE_THRESHOLD
            && snapshot.strike_remaining_ticks.is_none()
            && gold >= self.strike_cost
        {
            commands.push(PlayerCommand::TriggerStrike);
            gold -= self.strike_cost;
        }

        if snapshot.pending_creations == 0 {
            if let Some(&position) = self.spots.get(self.cursor) {
                let kind = DefenderKind::ALL[self.cursor % DefenderKind::ALL.len()];
                if self.roster.stats(kind).cost <= gold {
                    commands.push(PlayerCommand::Place { kind, position });
                    self.cursor += 1;
                }
            }
        }
        commands
    }
}

/// Spots either side of every path segment midpoint.
fn candidate_spots(path: &[Position], offset: f64) -> Vec<Position> {
    path.windows(2)
        .flat_map(|seg| {
            let mid = seg[0].lerp(&seg[1], 0.5);
            let dir = seg[0].direction_to(&seg[1]);
            let normal = glam::DVec3::new(-dir.y, dir.x, 0.0);
            [mid.offset(normal, offset), mid.offset(normal, -offset)]
        })
        .collect()
}
