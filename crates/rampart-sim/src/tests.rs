//! Tests for the simulation engine: combat scenarios, the wave director,
//! loader interaction and command handling.

use rampart_core::commands::PlayerCommand;
use rampart_core::components::{Health, PathFollower, Projectile};
use rampart_core::config::{GameConfig, LevelLayout};
use rampart_core::enums::*;
use rampart_core::error::{CommandError, PlacementConflict};
use rampart_core::events::EffectEvent;
use rampart_core::types::{Handle, Position};

use crate::engine::SimulationEngine;
use crate::loader::{AssetKind, ManualLoader, ManualLoaderHandle};
use crate::registry::handle_of;

// ---- Helpers ----

/// Straight east-west path through the origin with no structures.
fn straight_config() -> GameConfig {
    GameConfig {
        level: LevelLayout {
            path: vec![Position::ground(-100.0, 0.0), Position::ground(100.0, 0.0)],
            structures: Vec::new(),
        },
        ..GameConfig::default()
    }
}

fn engine(config: GameConfig) -> SimulationEngine {
    SimulationEngine::with_instant_loader(config).unwrap()
}

fn manual_engine(config: GameConfig) -> (SimulationEngine, ManualLoaderHandle) {
    let (loader, handle) = ManualLoader::new();
    (SimulationEngine::new(config, Box::new(loader)).unwrap(), handle)
}

fn freeze(engine: &mut SimulationEngine, attacker: hecs::Entity) {
    engine
        .registry_mut()
        .world_mut()
        .get::<&mut PathFollower>(attacker)
        .unwrap()
        .speed = 0.0;
}

fn health(engine: &SimulationEngine, attacker: hecs::Entity) -> f64 {
    engine
        .registry()
        .world()
        .get::<&Health>(attacker)
        .unwrap()
        .current
}

fn run(engine: &mut SimulationEngine, ticks: usize) -> Vec<EffectEvent> {
    let mut effects = Vec::new();
    for _ in 0..ticks {
        effects.extend(engine.tick().effects);
    }
    effects
}

// ---- Determinism ----

#[test]
fn test_determinism_same_seed() {
    let mut config = straight_config();
    config.seed = 12345;
    config.waves.spawn_chance = 0.05;
    let mut engine_a = engine(config.clone());
    let mut engine_b = engine(config);

    let setup = [
        PlayerCommand::Place {
            kind: DefenderKind::Basic,
            position: Position::ground(-60.0, 6.0),
        },
        PlayerCommand::Place {
            kind: DefenderKind::Missile,
            position: Position::ground(-20.0, -8.0),
        },
        PlayerCommand::StartNextWave,
    ];
    engine_a.queue_commands(setup.clone());
    engine_b.queue_commands(setup);

    for _ in 0..900 {
        let json_a = serde_json::to_string(&engine_a.tick()).unwrap();
        let json_b = serde_json::to_string(&engine_b.tick()).unwrap();
        assert_eq!(json_a, json_b, "Snapshots diverged with same seed");
    }
}

#[test]
fn test_determinism_different_seeds() {
    let mut config_a = straight_config();
    config_a.seed = 111;
    let mut config_b = straight_config();
    config_b.seed = 222;
    let mut engine_a = engine(config_a);
    let mut engine_b = engine(config_b);
    engine_a.queue_command(PlayerCommand::StartNextWave);
    engine_b.queue_command(PlayerCommand::StartNextWave);

    let mut diverged = false;
    for _ in 0..1000 {
        let json_a = serde_json::to_string(&engine_a.tick()).unwrap();
        let json_b = serde_json::to_string(&engine_b.tick()).unwrap();
        if json_a != json_b {
            diverged = true;
            break;
        }
    }
    assert!(diverged, "Different seeds should produce divergent spawn timing");
}

// ---- Wave director ----

#[test]
fn test_wave_completes_with_bonus() {
    let mut config = straight_config();
    config.waves.spawn_chance = 1.0;
    let mut engine = engine(config);

    assert!(engine.start_next_wave());
    assert_eq!(engine.waves().enemies_in_wave, 5);

    for _ in 0..20 {
        engine.tick();
        if engine.waves().spawned == 5 {
            break;
        }
    }
    assert_eq!(engine.waves().spawned, 5);
    assert_eq!(engine.waves().pending, 0);
    assert_eq!(engine.registry().attacker_count(), 5);
    assert_eq!(engine.waves().phase, WavePhase::WaveActive);

    // Clear the wave without crediting kills.
    for attacker in engine.registry().attackers() {
        engine.registry_mut().remove_attacker(attacker);
    }
    let gold_before = engine.economy().gold;
    let snap = engine.tick();

    assert_eq!(snap.economy.gold, gold_before + 35);
    assert_eq!(snap.wave.phase, WavePhase::Idle);
    assert_eq!(snap.stats.waves_cleared, 1);
    assert!(snap
        .effects
        .contains(&EffectEvent::WaveComplete { wave: 1, bonus: 35 }));
}

#[test]
fn test_wave_not_complete_while_attackers_alive() {
    let mut config = straight_config();
    config.waves.spawn_chance = 1.0;
    let mut engine = engine(config);
    engine.start_next_wave();
    run(&mut engine, 8);
    assert_eq!(engine.waves().spawned, 5);
    assert_eq!(engine.waves().phase, WavePhase::WaveActive);
    assert_eq!(engine.ledger().stats().waves_cleared, 0);
}

#[test]
fn test_start_next_wave_idempotent_while_active() {
    let mut config = straight_config();
    config.waves.spawn_chance = 1.0;
    let mut engine = engine(config);
    assert!(engine.start_next_wave());
    run(&mut engine, 3);

    let before = *engine.waves();
    assert!(!engine.start_next_wave());
    assert_eq!(*engine.waves(), before);

    engine.queue_command(PlayerCommand::StartNextWave);
    engine.pump_loads();
    let snap = engine.tick();
    assert_eq!(snap.wave.number, 1);
}

#[test]
fn test_spawned_attackers_scale_with_wave() {
    let mut config = straight_config();
    config.waves.spawn_chance = 1.0;
    let mut engine = engine(config);
    let first = engine.spawn_test_attacker(1);
    let later = engine.spawn_test_attacker(6);
    assert!(health(&engine, later) > health(&engine, first));
}

// ---- Combat scenarios ----

#[test]
fn test_two_shots_kill_sixty_health_attacker() {
    let mut engine = engine(straight_config());
    let defender = engine.spawn_test_defender(DefenderKind::Basic, Position::ground(0.0, 5.0));
    let attacker = engine.spawn_test_attacker_at(1, 0, 0.5);
    freeze(&mut engine, attacker);
    assert_eq!(health(&engine, attacker), 60.0);

    // Fires on the first tick; the bolt covers 4 units at 0.8 per tick.
    run(&mut engine, 10);
    assert_eq!(health(&engine, attacker), 35.0);

    // Still short of the 900 ms interval.
    run(&mut engine, 44);
    assert_eq!(health(&engine, attacker), 35.0);
    assert!(engine.registry().resolve_attacker(handle_of(attacker)).is_some());

    let effects = run(&mut engine, 16);
    assert!(engine.registry().resolve_attacker(handle_of(attacker)).is_none());
    assert!(effects
        .iter()
        .any(|e| matches!(e, EffectEvent::Death { .. })));

    let economy = engine.economy();
    assert_eq!(economy.gold, 200 + 10);
    assert_eq!(economy.score, 100);
    assert_eq!(engine.ledger().stats().attackers_killed, 1);
    assert!(engine.registry().resolve_defender(handle_of(defender)).is_some());
}

#[test]
fn test_projectile_expires_after_ttl() {
    let mut engine = engine(straight_config());
    let attacker = engine.spawn_test_attacker_at(1, 0, 0.0);
    freeze(&mut engine, attacker);

    let origin = Position::ground(50.0, 50.0);
    let projectile = engine.registry_mut().insert_projectile(
        origin,
        Projectile {
            weapon: WeaponKind::Defender(DefenderKind::Basic),
            damage: 25.0,
            speed: 0.8,
            direction: glam::DVec3::X,
            origin,
            target: handle_of(attacker),
            age_ticks: 0,
            ttl_ticks: 100,
        },
    );

    let effects = run(&mut engine, 100);
    assert_eq!(engine.registry().projectile_count(), 1);
    assert_eq!(
        engine
            .registry()
            .world()
            .get::<&Projectile>(projectile)
            .unwrap()
            .age_ticks,
        100
    );

    let more = engine.tick().effects;
    assert_eq!(engine.registry().projectile_count(), 0);
    assert_eq!(health(&engine, attacker), 60.0);
    assert!(effects.iter().chain(more.iter()).all(|e| !matches!(
        e,
        EffectEvent::Hit { .. } | EffectEvent::Explosion { .. }
    )));
}

#[test]
fn test_leak_costs_one_life_regardless_of_health() {
    let mut engine = engine(straight_config());
    let attacker = engine.spawn_test_attacker_at(1, 0, 0.999);
    assert_eq!(health(&engine, attacker), 60.0);

    run(&mut engine, 5);
    assert_eq!(engine.economy().lives, 19);
    assert_eq!(engine.registry().attacker_count(), 0);
    assert_eq!(engine.ledger().stats().attackers_leaked, 1);

    run(&mut engine, 5);
    assert_eq!(engine.economy().lives, 19, "life taken exactly once");
}

#[test]
fn test_defenders_share_a_target() {
    let mut engine = engine(straight_config());
    engine.spawn_test_defender(DefenderKind::Basic, Position::ground(0.0, 5.0));
    engine.spawn_test_defender(DefenderKind::Laser, Position::ground(0.0, -5.0));
    let attacker = engine.spawn_test_attacker_at(1, 0, 0.5);
    freeze(&mut engine, attacker);

    let snap = engine.tick();
    assert_eq!(snap.defenders.len(), 2);
    for defender in &snap.defenders {
        assert_eq!(defender.target, Some(handle_of(attacker)));
    }
}

#[test]
fn test_targets_nearest_and_clears_when_gone() {
    let mut engine = engine(straight_config());
    engine.spawn_test_defender(DefenderKind::Basic, Position::ground(0.0, 5.0));
    let far = engine.spawn_test_attacker_at(1, 0, 0.52);
    let near = engine.spawn_test_attacker_at(1, 0, 0.5);
    freeze(&mut engine, far);
    freeze(&mut engine, near);

    let snap = engine.tick();
    assert_eq!(snap.defenders[0].target, Some(handle_of(near)));

    engine.registry_mut().remove_attacker(near);
    engine.registry_mut().remove_attacker(far);
    let snap = engine.tick();
    assert_eq!(snap.defenders[0].target, None);
}

#[test]
fn test_target_out_of_range_ignored() {
    let mut engine = engine(straight_config());
    engine.spawn_test_defender(DefenderKind::Basic, Position::ground(0.0, 12.0));
    let attacker = engine.spawn_test_attacker_at(1, 0, 0.5);
    freeze(&mut engine, attacker);

    // Exactly at range is not in range.
    let snap = engine.tick();
    assert_eq!(snap.defenders[0].target, None);
    assert_eq!(snap.stats.shots_fired, 0);
}

#[test]
fn test_area_weapon_hit_emits_explosion() {
    let mut engine = engine(straight_config());
    engine.spawn_test_defender(DefenderKind::Missile, Position::ground(0.0, 10.0));
    let attacker = engine.spawn_test_attacker_at(1, 0, 0.5);
    freeze(&mut engine, attacker);

    let effects = run(&mut engine, 30);
    let hit = effects
        .iter()
        .position(|e| matches!(e, EffectEvent::Hit { .. }))
        .unwrap();
    assert!(matches!(effects[hit + 1], EffectEvent::Explosion { .. }));
}

#[test]
fn test_attacker_counter_fire_is_harmless() {
    let mut engine = engine(straight_config());
    let defender = engine.spawn_test_defender(DefenderKind::Basic, Position::ground(0.0, 5.0));
    let attacker = engine.spawn_test_attacker_at(1, 0, 0.5);
    freeze(&mut engine, attacker);

    let snap = engine.tick();
    let attacker_view = snap.attackers.iter().find(|a| a.handle == handle_of(attacker));
    assert_eq!(attacker_view.unwrap().target, Some(handle_of(defender)));
    assert!(snap.effects.contains(&EffectEvent::ShotFired {
        weapon: WeaponKind::Attacker
    }));

    run(&mut engine, 30);
    assert!(engine.registry().resolve_defender(handle_of(defender)).is_some());
}

// ---- Strike ----

#[test]
fn test_strike_destroys_every_attacker() {
    let mut config = straight_config();
    config.economy.starting_gold = 1000;
    let mut engine = engine(config);
    for i in 0..3 {
        engine.spawn_test_attacker_at(1, 0, 0.1 * i as f64);
    }

    engine.trigger_strike().unwrap();
    assert_eq!(engine.economy().gold, 700);
    assert_eq!(engine.trigger_strike(), Err(CommandError::StrikePending));
    assert_eq!(engine.economy().gold, 700);

    run(&mut engine, 119);
    assert_eq!(engine.registry().attacker_count(), 3);
    assert_eq!(engine.strike().map(|s| s.remaining_ticks), Some(1));

    let snap = engine.tick();
    assert_eq!(snap.attackers.len(), 0);
    assert_eq!(snap.economy.gold, 730);
    assert_eq!(snap.stats.attackers_killed, 3);
    assert_eq!(snap.strike_remaining_ticks, None);
    let deaths = snap
        .effects
        .iter()
        .filter(|e| matches!(e, EffectEvent::Death { .. }))
        .count();
    assert_eq!(deaths, 3);
    assert!(snap.effects.contains(&EffectEvent::Explosion {
        position: engine.path().midpoint()
    }));
}

#[test]
fn test_strike_rejected_without_funds() {
    let mut engine = engine(straight_config());
    assert_eq!(
        engine.trigger_strike(),
        Err(CommandError::InsufficientFunds {
            required: 300,
            available: 200
        })
    );
    assert!(engine.strike().is_none());
}

// ---- Placement and economy ----

#[test]
fn test_placement_inserts_after_load() {
    let (mut engine, loader) = manual_engine(straight_config());
    let ticket = engine
        .place(DefenderKind::Basic, Position::ground(0.0, 10.0))
        .unwrap();
    assert_eq!(engine.economy().gold, 150);
    assert_eq!(engine.registry().defender_count(), 0);

    let snap = engine.tick();
    assert_eq!(snap.pending_creations, 1);
    assert!(snap.defenders.is_empty());

    let requests = loader.requests();
    assert_eq!(requests[0].ticket, ticket);
    assert_eq!(requests[0].asset, AssetKind::Defender(DefenderKind::Basic));
    loader.complete(ticket);

    let snap = engine.tick();
    assert_eq!(snap.pending_creations, 0);
    assert_eq!(snap.defenders.len(), 1);
    assert_eq!(snap.defenders[0].position, Position::ground(0.0, 10.0));
}

#[test]
fn test_rejected_placement_changes_nothing() {
    let mut config = straight_config();
    config.economy.starting_gold = 40;
    let mut engine = engine(config);
    engine.spawn_test_attacker(1);

    let before = engine.snapshot();
    assert_eq!(
        engine.place(DefenderKind::Basic, Position::ground(0.0, 10.0)),
        Err(CommandError::InsufficientFunds {
            required: 50,
            available: 40
        })
    );
    assert_eq!(
        engine.place(DefenderKind::Basic, Position::ground(0.0, 1.0)),
        Err(CommandError::InvalidPlacement(PlacementConflict::NearPath))
    );
    let after = engine.snapshot();
    assert_eq!(after.economy, before.economy);
    assert_eq!(after.attackers.len(), before.attackers.len());
    assert_eq!(engine.registry().defender_count(), 0);
    assert_eq!(engine.pending_creations(), 0);
}

#[test]
fn test_pending_placement_blocks_neighbour() {
    let (mut engine, _loader) = manual_engine(straight_config());
    engine
        .place(DefenderKind::Basic, Position::ground(0.0, 10.0))
        .unwrap();
    assert_eq!(
        engine.place(DefenderKind::Basic, Position::ground(1.0, 10.0)),
        Err(CommandError::InvalidPlacement(PlacementConflict::NearDefender))
    );
    assert_eq!(engine.economy().gold, 150);
}

#[test]
fn test_failed_placement_load_refunds() {
    let (mut engine, loader) = manual_engine(straight_config());
    let ticket = engine
        .place(DefenderKind::Laser, Position::ground(0.0, 10.0))
        .unwrap();
    assert_eq!(engine.economy().gold, 110);

    loader.fail(ticket, "missing model");
    let snap = engine.tick();
    assert_eq!(snap.economy.gold, 200);
    assert!(snap.defenders.is_empty());
    assert!(snap.alerts.iter().any(|a| a.level == AlertLevel::Warning));
}

#[test]
fn test_out_of_order_completion() {
    let (mut engine, loader) = manual_engine(straight_config());
    let first = engine
        .place(DefenderKind::Basic, Position::ground(0.0, 10.0))
        .unwrap();
    let second = engine
        .place(DefenderKind::Laser, Position::ground(0.0, -10.0))
        .unwrap();

    loader.complete(second);
    let snap = engine.tick();
    assert_eq!(snap.defenders.len(), 1);
    assert_eq!(snap.defenders[0].kind, DefenderKind::Laser);

    loader.complete(first);
    let snap = engine.tick();
    assert_eq!(snap.defenders.len(), 2);
}

#[test]
fn test_queued_rejection_becomes_alert() {
    let mut config = straight_config();
    config.economy.starting_gold = 0;
    let mut engine = engine(config);
    engine.queue_command(PlayerCommand::Place {
        kind: DefenderKind::Basic,
        position: Position::ground(0.0, 10.0),
    });
    let snap = engine.tick();
    assert_eq!(snap.alerts.len(), 1);
    assert_eq!(snap.alerts[0].level, AlertLevel::Warning);
    assert!(snap.alerts[0].message.contains("insufficient funds"));

    // Alerts are drained by the tick that reports them.
    assert!(engine.tick().alerts.is_empty());
}

// ---- Loader and spawning ----

#[test]
fn test_failed_spawn_load_not_counted() {
    let mut config = straight_config();
    config.waves.spawn_chance = 1.0;
    let (mut engine, loader) = manual_engine(config);
    engine.start_next_wave();

    engine.tick();
    assert_eq!(engine.waves().pending, 1);
    let request = loader.requests()[0].clone();
    assert_eq!(request.asset, AssetKind::Attacker);

    loader.fail(request.ticket, "timeout");
    engine.tick();
    assert_eq!(engine.waves().spawned, 0);
    assert_eq!(engine.registry().attacker_count(), 0);
    // The slot is rolled again.
    assert_eq!(engine.waves().pending, 1);
    assert_ne!(loader.requests()[0].ticket, request.ticket);
}

#[test]
fn test_pending_spawns_cap_requests() {
    let mut config = straight_config();
    config.waves.spawn_chance = 1.0;
    let (mut engine, loader) = manual_engine(config);
    engine.start_next_wave();
    run(&mut engine, 12);
    assert_eq!(loader.requests().len(), 5);
    assert_eq!(engine.waves().pending, 5);
    assert_eq!(engine.waves().spawned, 0);

    assert_eq!(loader.complete_all(), 5);
    engine.tick();
    assert_eq!(engine.waves().spawned, 5);
    assert_eq!(engine.registry().attacker_count(), 5);
}

// ---- Pause ----

#[test]
fn test_pause_skips_tick_but_applies_completions() {
    let (mut engine, loader) = manual_engine(straight_config());
    let ticket = engine
        .place(DefenderKind::Basic, Position::ground(0.0, 10.0))
        .unwrap();
    let attacker = engine.spawn_test_attacker(1);
    let start = engine.registry().position(attacker).unwrap();

    assert_eq!(engine.toggle_pause(), GamePhase::Paused);
    loader.complete(ticket);
    let snap = engine.tick();

    assert_eq!(snap.time.tick, 0);
    assert_eq!(snap.phase, GamePhase::Paused);
    assert_eq!(snap.defenders.len(), 1);
    assert_eq!(engine.registry().position(attacker), Some(start));

    engine.queue_command(PlayerCommand::TogglePause);
    let snap = engine.tick();
    assert_eq!(snap.time.tick, 1);
    assert_ne!(engine.registry().position(attacker), Some(start));
}

// ---- Game over and reset ----

#[test]
fn test_game_over_halts_until_reset() {
    let mut config = straight_config();
    config.economy.starting_lives = 1;
    let mut engine = engine(config);
    engine.spawn_test_attacker_at(1, 0, 0.999);

    let mut snap = engine.tick();
    for _ in 0..5 {
        if snap.phase == GamePhase::GameOver {
            break;
        }
        snap = engine.tick();
    }
    assert_eq!(snap.phase, GamePhase::GameOver);
    assert!(snap.alerts.iter().any(|a| a.level == AlertLevel::Critical));
    let frozen = engine.time();

    engine.tick();
    assert_eq!(engine.time(), frozen);
    assert_eq!(
        engine.place(DefenderKind::Basic, Position::ground(0.0, 10.0)),
        Err(CommandError::GameOver)
    );
    assert!(!engine.start_next_wave());
    assert_eq!(engine.toggle_pause(), GamePhase::GameOver);

    engine.queue_command(PlayerCommand::Reset);
    let snap = engine.tick();
    assert_eq!(snap.phase, GamePhase::Running);
    assert_eq!(snap.economy.lives, 1);
    assert_eq!(snap.economy.gold, 200);
    assert_eq!(snap.wave.number, 0);
    assert_eq!(snap.time.tick, 1);
}

#[test]
fn test_final_leak_ends_tick_before_wave_completion() {
    let mut config = straight_config();
    config.economy.starting_lives = 1;
    config.waves.base_enemies = 0;
    config.waves.enemies_per_wave = 1;
    config.waves.spawn_chance = 1.0;
    config.waves.base_speed = 3000.0;
    let mut engine = engine(config);
    assert!(engine.start_next_wave());
    assert_eq!(engine.waves().enemies_in_wave, 1);

    let mut effects = Vec::new();
    for _ in 0..30 {
        let snap = engine.tick();
        effects.extend(snap.effects);
        if snap.phase == GamePhase::GameOver {
            break;
        }
    }
    assert_eq!(engine.phase(), GamePhase::GameOver);
    assert_eq!(engine.waves().spawned, 1);
    assert_eq!(engine.economy().lives, 0);
    assert_eq!(engine.economy().gold, 200);
    assert_eq!(engine.ledger().stats().waves_cleared, 0);
    assert_eq!(engine.waves().phase, WavePhase::WaveActive);
    assert!(!effects
        .iter()
        .any(|e| matches!(e, EffectEvent::WaveComplete { .. })));
}

#[test]
fn test_reset_discards_late_completions() {
    let (mut engine, loader) = manual_engine(straight_config());
    let ticket = engine
        .place(DefenderKind::Basic, Position::ground(0.0, 10.0))
        .unwrap();
    engine.reset();
    assert_eq!(engine.economy().gold, 200);

    loader.complete(ticket);
    let snap = engine.tick();
    assert!(snap.defenders.is_empty());
    assert_eq!(snap.economy.gold, 200);
}

// ---- Handles ----

#[test]
fn test_stale_handle_in_snapshot_does_not_resolve() {
    let mut engine = engine(straight_config());
    let attacker = engine.spawn_test_attacker(1);
    let handle: Handle = engine.tick().attackers[0].handle;
    assert_eq!(handle, handle_of(attacker));

    engine.registry_mut().remove_attacker(attacker);
    engine.spawn_test_attacker(1);
    assert!(engine.registry().resolve_attacker(handle).is_none());
}

// ---- Snapshot ----

#[test]
fn test_snapshot_serializes() {
    let mut engine = engine(straight_config());
    engine.spawn_test_defender(DefenderKind::Colony, Position::ground(0.0, 5.0));
    let attacker = engine.spawn_test_attacker_at(1, 0, 0.5);
    freeze(&mut engine, attacker);
    engine.start_next_wave();
    let snap = engine.tick();

    let json = serde_json::to_value(&snap).unwrap();
    assert_eq!(json["wave"]["number"], 1);
    assert_eq!(json["wave"]["phase"], "WaveActive");
    assert_eq!(json["defenders"][0]["kind"], "colony");
    assert_eq!(json["phase"], "Running");
}
