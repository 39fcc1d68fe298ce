//! Snapshot system: queries the registry and builds a complete
//! GameStateSnapshot. Read-only.

use hecs::World;

use rampart_core::components::*;
use rampart_core::enums::GamePhase;
use rampart_core::events::{Alert, EffectEvent};
use rampart_core::state::*;
use rampart_core::types::{Position, SimTime};

use crate::economy::Ledger;
use crate::registry::{handle_of, Registry};
use crate::systems::strike::StrikeCountdown;
use crate::systems::wave_spawner::WaveState;

/// Everything the snapshot needs beyond the registry.
pub struct SnapshotInputs<'a> {
    pub time: &'a SimTime,
    pub phase: GamePhase,
    pub ledger: &'a Ledger,
    pub waves: &'a WaveState,
    pub pending_creations: u32,
    pub strike: Option<StrikeCountdown>,
    pub alerts: Vec<Alert>,
    pub effects: Vec<EffectEvent>,
}

/// Build a complete GameStateSnapshot from the current registry state.
pub fn build_snapshot(registry: &Registry, inputs: SnapshotInputs<'_>) -> GameStateSnapshot {
    let world = registry.world();
    GameStateSnapshot {
        time: *inputs.time,
        phase: inputs.phase,
        economy: inputs.ledger.view(),
        wave: inputs.waves.view(registry.attacker_count()),
        defenders: build_defenders(world),
        attackers: build_attackers(world),
        projectiles: build_projectiles(world),
        pending_creations: inputs.pending_creations,
        strike_remaining_ticks: inputs.strike.map(|s| s.remaining_ticks),
        stats: inputs.ledger.stats(),
        alerts: inputs.alerts,
        effects: inputs.effects,
    }
}

fn build_defenders(world: &World) -> Vec<DefenderView> {
    let mut defenders: Vec<DefenderView> = world
        .query::<(&Defender, &Position, &Weapon, &Target)>()
        .iter()
        .map(|(entity, (defender, pos, weapon, target))| DefenderView {
            handle: handle_of(entity),
            kind: defender.kind,
            position: *pos,
            range: weapon.range,
            target: target.handle,
        })
        .collect();
    defenders.sort_by_key(|d| d.handle);
    defenders
}

fn build_attackers(world: &World) -> Vec<AttackerView> {
    let mut attackers: Vec<AttackerView> = world
        .query::<(&Attacker, &Position, &Health, &PathFollower, &Target)>()
        .iter()
        .map(|(entity, (_, pos, health, follower, target))| AttackerView {
            handle: handle_of(entity),
            position: *pos,
            health: health.current,
            max_health: health.max,
            path_index: follower.path_index,
            target: target.handle,
        })
        .collect();
    attackers.sort_by_key(|a| a.handle);
    attackers
}

fn build_projectiles(world: &World) -> Vec<ProjectileView> {
    let mut projectiles: Vec<ProjectileView> = world
        .query::<(&Projectile, &Position)>()
        .iter()
        .map(|(entity, (projectile, pos))| ProjectileView {
            handle: handle_of(entity),
            side: projectile.weapon.side(),
            position: *pos,
            age_ticks: projectile.age_ticks,
        })
        .collect();
    projectiles.sort_by_key(|p| p.handle);
    projectiles
}
